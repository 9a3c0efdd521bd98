//! Fixed blocks of the first recap page

use crate::constants::*;
use crate::format::{format_eur, format_mission_date};
use crate::metrics::{FontFace, text_width, wrap_text};
use crate::options::ReportOptions;
use crate::render::PageCanvas;
use crate::types::ReportMetadata;
use lopdf::ObjectId;

const EM_DASH: &str = "—";

// Info block
const INFO_LABEL_X: f32 = 70.0;
const INFO_VALUE_X: f32 = 260.0;
const INFO_RIGHT_MARGIN: f32 = 60.0;
const INFO_TOP_OFFSET: f32 = 285.0;
const INFO_LINE_STEP: f32 = 16.0;
const INFO_MAX_LINES: usize = 2;

// Total box
const TOTAL_BOX_WIDTH: f32 = 320.0;
const TOTAL_BOX_HEIGHT: f32 = 34.0;
const TOTAL_FONT_SIZE: f32 = 12.0;

// Signature boxes
const SIGNATURE_BOX_Y: f32 = 55.0;
const SIGNATURE_BOX_WIDTH: f32 = 210.0;
const SIGNATURE_BOX_HEIGHT: f32 = 78.0;
const SIGNATURE_MARGIN: f32 = 70.0;

/// An embedded logo and its pixel size
pub(crate) type PlacedLogo = (ObjectId, u32, u32);

/// Logo slots along the top edge. Empty slots get a light outline.
pub(crate) fn draw_logos(page: &mut PageCanvas, logos: &[Option<PlacedLogo>]) {
    let y = page.height() - LOGO_TOP_OFFSET;
    let mut x = LOGO_LEFT;
    for slot in 0..MAX_LOGO_SLOTS {
        match logos.get(slot).copied().flatten() {
            Some((id, px_w, px_h)) if px_w > 0 && px_h > 0 => {
                let scale = (LOGO_WIDTH / px_w as f32).min(LOGO_HEIGHT / px_h as f32);
                let (w, h) = (px_w as f32 * scale, px_h as f32 * scale);
                page.image(
                    id,
                    x + (LOGO_WIDTH - w) / 2.0,
                    y + (LOGO_HEIGHT - h) / 2.0,
                    w,
                    h,
                );
            }
            _ => page.stroke_rect(x, y, LOGO_WIDTH, LOGO_HEIGHT, PLACEHOLDER_GRAY, 1.0),
        }
        x += LOGO_WIDTH + LOGO_GAP;
    }
}

/// Organization lines, contact block and the two titles
pub(crate) fn draw_heading(page: &mut PageCanvas, options: &ReportOptions) {
    let h = page.height();

    for (i, line) in options.header_lines.iter().take(2).enumerate() {
        let y = h - 115.0 - 13.0 * i as f32;
        page.text_centered(y, line, FontFace::Bold, HEADER_FONT_SIZE, GRAY);
    }

    if let Some(contact) = &options.contact {
        page.text(55.0, h - 160.0, &contact.title, FontFace::Bold, HEADER_FONT_SIZE, GRAY);
        let mut y = h - 172.0;
        for line in &contact.lines {
            page.text(55.0, y, line, FontFace::Regular, HEADER_FONT_SIZE, GRAY);
            y -= 12.0;
        }
    }

    page.text_centered(h - 215.0, &options.title, FontFace::Bold, TITLE_FONT_SIZE, BLACK);
    page.text_centered(h - 240.0, &options.subtitle, FontFace::Bold, TITLE_FONT_SIZE, BLACK);
}

/// Labelled report information. Returns the Y below the block.
pub(crate) fn draw_info(page: &mut PageCanvas, metadata: &ReportMetadata, today: &str) -> f32 {
    let max_width = page.width() - INFO_VALUE_X - INFO_RIGHT_MARGIN;
    let mission_date = match format_mission_date(&metadata.mission_date) {
        date if date.is_empty() => today.to_string(),
        date => date,
    };

    let entries = [
        ("NOM - PRÉNOM et ADRESSE :", identity(metadata)),
        ("Motif du déplacement :", metadata.mission_reason.trim().to_string()),
        ("Lieu du déplacement :", metadata.mission_place.trim().to_string()),
        ("Date de la mission :", mission_date),
    ];

    let mut y = page.height() - INFO_TOP_OFFSET;
    for (label, value) in entries {
        page.text(INFO_LABEL_X, y, label, FontFace::Bold, INFO_FONT_SIZE, BLACK);

        let value = if value.is_empty() { EM_DASH.to_string() } else { value };
        let lines = wrap_text(&value, max_width, INFO_FONT_SIZE, FontFace::Regular);
        for line in lines.iter().take(INFO_MAX_LINES) {
            page.text(INFO_VALUE_X, y, line, FontFace::Regular, INFO_FONT_SIZE, BLACK);
            y -= INFO_LINE_STEP;
        }
    }
    y
}

/// `name, address` with empty parts dropped
fn identity(metadata: &ReportMetadata) -> String {
    [metadata.name.trim(), metadata.address.trim()]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Green regulatory paragraphs, wrapped to the page. Returns the Y below.
pub(crate) fn draw_rules(page: &mut PageCanvas, rules: &[String], mut y: f32) -> f32 {
    let max_width = page.width() - 2.0 * INFO_LABEL_X;
    y -= 10.0;
    for rule in rules {
        for line in wrap_text(rule, max_width, RULE_FONT_SIZE, FontFace::Regular) {
            page.text(INFO_LABEL_X, y, &line, FontFace::Regular, RULE_FONT_SIZE, GREEN);
            y -= 11.0;
        }
    }
    y
}

/// Centered total box below the table. Returns the Y of its top edge.
pub(crate) fn draw_total(page: &mut PageCanvas, total: f64, table_bottom: f32) -> f32 {
    let y = table_bottom - 18.0;
    let x = (page.width() - TOTAL_BOX_WIDTH) / 2.0;
    let baseline = y - 22.0;

    page.stroke_rect(x, y - TOTAL_BOX_HEIGHT, TOTAL_BOX_WIDTH, TOTAL_BOX_HEIGHT, GRAY, 1.0);
    page.text(x + 14.0, baseline, "Total général :", FontFace::Bold, TOTAL_FONT_SIZE, BLACK);
    page.text_right(
        x + TOTAL_BOX_WIDTH - 14.0,
        baseline,
        &format!("{} €", format_eur(total)),
        FontFace::Bold,
        TOTAL_FONT_SIZE,
        BLACK,
    );
    y
}

/// Certification line, plus the waiver stamp when reimbursement is waived
pub(crate) fn draw_certification(page: &mut PageCanvas, options: &ReportOptions, waived: bool, total_top: f32) {
    let y = total_top - 50.0;
    page.text_centered(y, &options.certification, FontFace::Bold, INFO_FONT_SIZE, RED);
    if waived {
        draw_stamp(page, &options.waiver_text, y - 22.0);
    }
}

fn draw_stamp(page: &mut PageCanvas, text: &str, center_y: f32) {
    const SIZE: f32 = 11.0;
    const PAD_X: f32 = 14.0;
    const PAD_Y: f32 = 10.0;

    let box_w = text_width(text, FontFace::Bold, SIZE) + 2.0 * PAD_X;
    let box_h = SIZE + 2.0 * PAD_Y;
    let x = (page.width() - box_w) / 2.0;
    let y = center_y - box_h / 2.0;
    page.stroke_rect(x, y, box_w, box_h, RED, 2.0);
    page.text(x + PAD_X, y + PAD_Y, text, FontFace::Bold, SIZE, RED);
}

/// Claimant and treasurer signature boxes at the foot of the page
pub(crate) fn draw_signatures(page: &mut PageCanvas, metadata: &ReportMetadata, today: &str) {
    let left = SIGNATURE_MARGIN;
    let right = page.width() - SIGNATURE_MARGIN - SIGNATURE_BOX_WIDTH;
    let top = SIGNATURE_BOX_Y + SIGNATURE_BOX_HEIGHT;

    for x in [left, right] {
        page.stroke_rect(x, SIGNATURE_BOX_Y, SIGNATURE_BOX_WIDTH, SIGNATURE_BOX_HEIGHT, GRAY, 1.0);
    }

    let name = match metadata.name.trim() {
        "" => EM_DASH,
        name => name,
    };
    page.text(left + 40.0, top - 20.0, "Nom prénom et Date", FontFace::Bold, BODY_FONT_SIZE, BLACK);
    page.text(
        left + 16.0,
        top - 36.0,
        &format!("{}, {}", name, today),
        FontFace::Regular,
        BODY_FONT_SIZE,
        BLACK,
    );
    page.text(right + 14.0, top - 22.0, "Le trésorier :", FontFace::Bold, BODY_FONT_SIZE, BLACK);
}
