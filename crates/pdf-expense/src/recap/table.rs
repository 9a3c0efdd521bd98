//! Bordered expense table

use crate::constants::*;
use crate::format::format_eur;
use crate::metrics::{FontFace, fit_single_line, truncate_to_width};
use crate::render::PageCanvas;
use crate::types::ExpenseLine;

const COLUMN_LABELS: [&str; 5] = ["Catégorie", "Description", "Tarif", "Kilomètres", "MONTANT"];

/// Rate and amount are right-aligned, everything else starts at the padding
const RIGHT_ALIGNED: [bool; 5] = [false, false, true, false, true];

const HEADER_LABEL_SIZE: f32 = 9.5;
const HEADER_BASELINE: f32 = 15.0;
const ROW_BASELINE: f32 = 14.0;

/// Column geometry shared by every page of the recap
#[derive(Debug, Clone)]
pub(crate) struct TableLayout {
    x: f32,
    width: f32,
    columns: [f32; 5],
    rate_label: String,
}

impl TableLayout {
    pub(crate) fn new(page_width: f32, rate_per_km: f64) -> Self {
        let width = page_width - 2.0 * TABLE_INSET;
        Self {
            x: TABLE_INSET,
            width,
            columns: COLUMN_FRACTIONS.map(|f| width * f),
            rate_label: format!("{}€", format_eur(rate_per_km)),
        }
    }

    /// Draw the header row below `top`, returning the top of the first row
    pub(crate) fn draw_header(&self, page: &mut PageCanvas, top: f32) -> f32 {
        self.draw_grid(page, top, TABLE_HEADER_HEIGHT);

        let mut cx = self.x;
        for (label, width) in COLUMN_LABELS.iter().zip(self.columns) {
            page.text(
                cx + CELL_PADDING,
                top - HEADER_BASELINE,
                label,
                FontFace::Bold,
                HEADER_LABEL_SIZE,
                BLACK,
            );
            cx += width;
        }
        top - TABLE_HEADER_HEIGHT
    }

    /// Draw one expense row below `top`, returning the top of the next row
    pub(crate) fn draw_row(&self, page: &mut PageCanvas, top: f32, line: &ExpenseLine) -> f32 {
        self.draw_grid(page, top, TABLE_ROW_HEIGHT);

        let baseline = top - ROW_BASELINE;
        let mut cx = self.x;
        for ((cell, width), right) in self.fitted_cells(line).iter().zip(self.columns).zip(RIGHT_ALIGNED) {
            if right {
                page.text_right(
                    cx + width - CELL_PADDING,
                    baseline,
                    cell,
                    FontFace::Regular,
                    BODY_FONT_SIZE,
                    BLACK,
                );
            } else {
                page.text(cx + CELL_PADDING, baseline, cell, FontFace::Regular, BODY_FONT_SIZE, BLACK);
            }
            cx += width;
        }
        top - TABLE_ROW_HEIGHT
    }

    /// Row cells cut to one line inside their column padding. Figures are
    /// cut by character so their digit grouping survives.
    fn fitted_cells(&self, line: &ExpenseLine) -> [String; 5] {
        let mut column = 0;
        self.cells(line).map(|cell| {
            let width = self.columns[column] - 2.0 * CELL_PADDING;
            let fitted = if RIGHT_ALIGNED[column] {
                truncate_to_width(&cell, width, BODY_FONT_SIZE, FontFace::Regular)
            } else {
                fit_single_line(&cell, width, BODY_FONT_SIZE, FontFace::Regular)
            };
            column += 1;
            fitted
        })
    }

    fn cells(&self, line: &ExpenseLine) -> [String; 5] {
        let (rate, distance) = if line.category.is_travel() {
            (
                self.rate_label.clone(),
                format!("{}", line.distance_km.round() as i64),
            )
        } else {
            (String::new(), String::new())
        };
        [
            line.category.label().to_string(),
            line.description.trim().to_string(),
            rate,
            distance,
            format!("{}€", format_eur(line.amount)),
        ]
    }

    /// Outer border plus one vertical rule per column edge
    fn draw_grid(&self, page: &mut PageCanvas, top: f32, height: f32) {
        page.stroke_rect(self.x, top - height, self.width, height, GRAY, 1.0);
        let mut cx = self.x;
        for width in self.columns {
            page.line((cx, top), (cx, top - height), GRAY, 1.0);
            cx += width;
        }
        let right = self.x + self.width;
        page.line((right, top), (right, top - height), GRAY, 1.0);
    }
}

/// Rows that fit between `top` and `floor`
pub(crate) fn rows_fitting(top: f32, floor: f32) -> usize {
    let available = top - floor;
    if available <= 0.0 {
        return 0;
    }
    (available / TABLE_ROW_HEIGHT).floor() as usize
}
