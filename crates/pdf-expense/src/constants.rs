//! Shared constants for recap layout and attachment merging
//!
//! All coordinates are PDF points with the origin at the bottom-left corner.

// =============================================================================
// Page Format
// =============================================================================

/// A4 portrait width in points
pub const A4_WIDTH_PT: f32 = 595.28;

/// A4 portrait height in points
pub const A4_HEIGHT_PT: f32 = 841.89;

// =============================================================================
// Pricing
// =============================================================================

/// Default mileage rate in euros per kilometre
pub const DEFAULT_RATE_PER_KM: f64 = 0.30;

/// Filename stem used when neither name nor mission date is known
pub const FALLBACK_FILENAME: &str = "note_de_frais";

// =============================================================================
// Image Pages
// =============================================================================

/// Margin kept free on every side of an image page
pub const IMAGE_PAGE_MARGIN: f32 = 24.0;

/// Small images are never enlarged past this factor
pub const MAX_IMAGE_UPSCALE: f32 = 1.2;

// =============================================================================
// Header
// =============================================================================

pub const MAX_LOGO_SLOTS: usize = 4;
pub const LOGO_LEFT: f32 = 40.0;
pub const LOGO_TOP_OFFSET: f32 = 90.0;
pub const LOGO_WIDTH: f32 = 110.0;
pub const LOGO_HEIGHT: f32 = 55.0;
pub const LOGO_GAP: f32 = 18.0;
/// Longest side, in pixels, of a rasterized SVG logo
pub const LOGO_RASTER_PX: u32 = 440;

// =============================================================================
// Recap Table
// =============================================================================

/// Left and right inset of the table
pub const TABLE_INSET: f32 = 85.0;

pub const TABLE_HEADER_HEIGHT: f32 = 22.0;
pub const TABLE_ROW_HEIGHT: f32 = 20.0;

/// Horizontal padding inside a cell
pub const CELL_PADDING: f32 = 6.0;

/// Category, description, rate, distance, amount
pub const COLUMN_FRACTIONS: [f32; 5] = [0.20, 0.32, 0.16, 0.16, 0.16];

/// Lowest Y a first-page row may reach; leaves room for the total box,
/// certification and signatures.
pub const FIRST_PAGE_TABLE_FLOOR: f32 = 250.0;

/// Lowest Y a continuation-page row may reach
pub const CONTINUATION_TABLE_FLOOR: f32 = 50.0;

/// Distance from the top edge to the continuation title baseline
pub const CONTINUATION_TITLE_OFFSET: f32 = 50.0;

/// Distance from the top edge to the continuation table header
pub const CONTINUATION_TABLE_OFFSET: f32 = 75.0;

// =============================================================================
// Font Sizes
// =============================================================================

pub const BODY_FONT_SIZE: f32 = 10.0;
pub const HEADER_FONT_SIZE: f32 = 9.0;
pub const TITLE_FONT_SIZE: f32 = 14.0;
pub const INFO_FONT_SIZE: f32 = 10.5;
pub const RULE_FONT_SIZE: f32 = 8.5;

// =============================================================================
// Colors
// =============================================================================

pub type Rgb = (f32, f32, f32);

pub const BLACK: Rgb = (0.0, 0.0, 0.0);
pub const GRAY: Rgb = (0.25, 0.25, 0.25);
pub const PLACEHOLDER_GRAY: Rgb = (0.85, 0.85, 0.85);
pub const GREEN: Rgb = (0.12, 0.45, 0.18);
pub const RED: Rgb = (0.82, 0.05, 0.05);
