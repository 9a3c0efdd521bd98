//! Recap pages: the summary placed in front of the attachments
//!
//! The first page carries the heading, report information, rules, the start
//! of the expense table and the closing blocks (total, certification,
//! signatures). Rows that do not fit continue on table-only pages.

mod blocks;
mod table;

use crate::constants::*;
use crate::format::format_date;
use crate::logos::load_logos;
use crate::metrics::FontFace;
use crate::options::ReportOptions;
use crate::render::{OutputDocument, PageCanvas, PreparedImage};
use crate::types::*;
use blocks::PlacedLogo;
use chrono::NaiveDate;
use lopdf::Document;
use std::ops::Range;
use table::{TableLayout, rows_fitting};

/// A rendered recap and how its rows were spread over pages
#[derive(Debug)]
pub struct RecapDocument {
    document: Document,
    page_rows: Vec<Range<usize>>,
    first_page_capacity: usize,
    continuation_capacity: usize,
}

impl RecapDocument {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn page_count(&self) -> usize {
        self.page_rows.len()
    }

    /// Table rows drawn on each page, by index into the input lines
    pub fn page_rows(&self) -> &[Range<usize>] {
        &self.page_rows
    }

    pub fn first_page_capacity(&self) -> usize {
        self.first_page_capacity
    }

    pub fn continuation_capacity(&self) -> usize {
        self.continuation_capacity
    }
}

/// Build the recap for a report.
///
/// Logos are loaded first; layout then runs on the blocking pool with
/// today's local date for the fallback mission date and the signature.
pub async fn build_recap(
    metadata: &ReportMetadata,
    lines: &[ExpenseLine],
    total: f64,
    options: &ReportOptions,
) -> Result<RecapDocument> {
    let logos = load_logos(&options.logos).await;

    let metadata = metadata.clone();
    let lines = lines.to_vec();
    let options = options.clone();
    let today = chrono::Local::now().date_naive();

    tokio::task::spawn_blocking(move || {
        render_recap(&metadata, &lines, total, &options, &logos, today)
    })
    .await?
}

/// Lay out the recap synchronously
pub fn render_recap(
    metadata: &ReportMetadata,
    lines: &[ExpenseLine],
    total: f64,
    options: &ReportOptions,
    logos: &[Option<PreparedImage>],
    today: NaiveDate,
) -> Result<RecapDocument> {
    let today = format_date(today);
    let mut output = OutputDocument::new();
    let placed: Vec<Option<PlacedLogo>> = logos
        .iter()
        .map(|logo| logo.as_ref().map(|img| (output.add_image(img), img.width, img.height)))
        .collect();

    let mut page = PageCanvas::new(A4_WIDTH_PT, A4_HEIGHT_PT);
    let table = TableLayout::new(page.width(), options.rate_per_km);

    blocks::draw_logos(&mut page, &placed);
    blocks::draw_heading(&mut page, options);
    let y = blocks::draw_info(&mut page, metadata, &today);
    let y = blocks::draw_rules(&mut page, &options.rules, y);
    let mut y = table.draw_header(&mut page, y - 12.0);

    let first_page_capacity = rows_fitting(y, FIRST_PAGE_TABLE_FLOOR);
    let continuation_capacity = continuation_capacity(A4_HEIGHT_PT);
    let page_rows = plan_pages(lines.len(), first_page_capacity, continuation_capacity);
    log::debug!(
        "Recap: {} rows, {} on the first page, {} per continuation page",
        lines.len(),
        first_page_capacity,
        continuation_capacity
    );

    for line in &lines[page_rows[0].clone()] {
        y = table.draw_row(&mut page, y, line);
    }
    let total_top = blocks::draw_total(&mut page, total, y);
    blocks::draw_certification(&mut page, options, metadata.waives_reimbursement, total_top);
    blocks::draw_signatures(&mut page, metadata, &today);
    output.push_canvas(page)?;

    let title = format!("{} (suite)", options.title);
    for rows in &page_rows[1..] {
        let mut page = PageCanvas::new(A4_WIDTH_PT, A4_HEIGHT_PT);
        let h = page.height();
        page.text_centered(h - CONTINUATION_TITLE_OFFSET, &title, FontFace::Bold, 12.0, BLACK);

        let mut y = table.draw_header(&mut page, h - CONTINUATION_TABLE_OFFSET);
        for line in &lines[rows.clone()] {
            y = table.draw_row(&mut page, y, line);
        }
        output.push_canvas(page)?;
    }

    let drawn = page_rows.last().map_or(0, |r| r.end);
    if drawn < lines.len() {
        log::warn!(
            "Continuation pages hold no rows, {} expense lines left out of the recap",
            lines.len() - drawn
        );
    }

    Ok(RecapDocument {
        document: output.into_document(),
        page_rows,
        first_page_capacity,
        continuation_capacity,
    })
}

/// Rows that fit on a continuation page of the given height
pub fn continuation_capacity(page_height: f32) -> usize {
    let rows_top = page_height - CONTINUATION_TABLE_OFFSET - TABLE_HEADER_HEIGHT;
    rows_fitting(rows_top, CONTINUATION_TABLE_FLOOR)
}

/// Spread `rows` table rows over pages.
///
/// The first page always exists and takes up to `first_capacity` rows; each
/// continuation page takes up to `continuation_capacity`. When continuation
/// pages cannot hold a single row, one empty continuation page is emitted
/// and the rest is dropped.
pub fn plan_pages(rows: usize, first_capacity: usize, continuation_capacity: usize) -> Vec<Range<usize>> {
    let first_end = rows.min(first_capacity);
    let mut pages = vec![0..first_end];

    let mut start = first_end;
    while start < rows {
        let end = rows.min(start + continuation_capacity);
        pages.push(start..end);
        if end == start {
            break;
        }
        start = end;
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_single_page() {
        assert_eq!(plan_pages(0, 10, 30), vec![0..0]);
        assert_eq!(plan_pages(10, 10, 30), vec![0..10]);
    }

    #[test]
    fn test_plan_continuations() {
        assert_eq!(plan_pages(11, 10, 30), vec![0..10, 10..11]);
        assert_eq!(plan_pages(75, 10, 30), vec![0..10, 10..40, 40..70, 70..75]);
    }

    #[test]
    fn test_plan_first_page_full() {
        assert_eq!(plan_pages(3, 0, 2), vec![0..0, 0..2, 2..3]);
    }

    #[test]
    fn test_plan_stops_without_capacity() {
        assert_eq!(plan_pages(5, 2, 0), vec![0..2, 2..2]);
    }

    #[test]
    fn test_continuation_capacity_a4() {
        // (841.89 - 75 - 22 - 50) / 20
        assert_eq!(continuation_capacity(A4_HEIGHT_PT), 34);
        assert_eq!(continuation_capacity(100.0), 0);
    }
}
