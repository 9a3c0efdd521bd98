use crate::constants::DEFAULT_RATE_PER_KM;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Cannot read PDF attachment '{name}': {source}")]
    UnparsableDonorDocument {
        name: String,
        #[source]
        source: lopdf::Error,
    },
    #[error("Unsupported attachment '{name}' ({media_type})")]
    UnsupportedAttachmentKind { name: String, media_type: String },
    #[error("Logo slot {slot} unavailable: {reason}")]
    LogoAssetUnavailable { slot: usize, reason: String },
    #[error("Cannot decode image '{name}': {source}")]
    UnreadableImage {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Cannot rasterize SVG '{name}': {reason}")]
    UnreadableSvg { name: String, reason: String },
    #[error("PDF rendering unavailable: {0}")]
    DependencyUnavailable(String),
    #[error("Invalid edit: {0}")]
    InvalidEdit(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Expense lines
// =============================================================================

/// Fixed set of expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ExpenseCategory {
    /// Mileage, the only category priced per kilometre
    #[default]
    Travel,
    Toll,
    Meal,
    Hotel,
    Parking,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Travel,
        ExpenseCategory::Toll,
        ExpenseCategory::Meal,
        ExpenseCategory::Hotel,
        ExpenseCategory::Parking,
        ExpenseCategory::Other,
    ];

    /// Label printed in the recap table
    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Travel => "Déplacement",
            ExpenseCategory::Toll => "Péage",
            ExpenseCategory::Meal => "Repas",
            ExpenseCategory::Hotel => "Hôtel",
            ExpenseCategory::Parking => "Parking",
            ExpenseCategory::Other => "Divers",
        }
    }

    pub fn is_travel(self) -> bool {
        self == ExpenseCategory::Travel
    }
}

/// One itemized row of the report.
///
/// For [`ExpenseCategory::Travel`] the amount is derived from the distance;
/// for every other category the distance is zero and the amount is entered.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseLine {
    pub category: ExpenseCategory,
    pub description: String,
    pub distance_km: f64,
    pub amount: f64,
}

impl ExpenseLine {
    /// Travel line priced at `rate_per_km`
    pub fn travel(description: impl Into<String>, distance_km: f64, rate_per_km: f64) -> Self {
        let distance_km = non_negative(distance_km);
        Self {
            category: ExpenseCategory::Travel,
            description: description.into(),
            distance_km,
            amount: round2(distance_km * rate_per_km),
        }
    }

    /// Manually priced line.
    ///
    /// Travel is never priced by hand: a Travel category yields a travel
    /// line with no distance, and `amount` is ignored. Use
    /// [`ExpenseLine::travel`] to give it a distance.
    pub fn expense(
        category: ExpenseCategory,
        description: impl Into<String>,
        amount: f64,
    ) -> Self {
        if category.is_travel() {
            return Self::travel(description, 0.0, 0.0);
        }
        Self {
            category,
            description: description.into(),
            distance_km: 0.0,
            amount: non_negative(amount),
        }
    }
}

/// Amount a line is worth at the given rate.
pub fn derive_amount(line: &ExpenseLine, rate_per_km: f64) -> f64 {
    if line.category.is_travel() {
        round2(non_negative(line.distance_km) * rate_per_km)
    } else {
        line.amount
    }
}

pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Stable position of a line in the session, used to order its attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinePosition(pub usize);

// =============================================================================
// Attachments
// =============================================================================

/// Handle to an attachment, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentId(pub u64);

/// How an attachment will be merged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Pdf,
    Png,
    Jpeg,
    Unsupported,
}

impl MediaKind {
    /// Decide from the declared media type, falling back to the file extension
    pub fn detect(media_type: &str, file_name: &str) -> Self {
        let media_type = media_type.trim().to_ascii_lowercase();
        let name = file_name.trim().to_ascii_lowercase();

        if media_type == "application/pdf" || name.ends_with(".pdf") {
            MediaKind::Pdf
        } else if media_type == "image/png" || name.ends_with(".png") {
            MediaKind::Png
        } else if media_type == "image/jpeg"
            || media_type == "image/jpg"
            || name.ends_with(".jpg")
            || name.ends_with(".jpeg")
        {
            MediaKind::Jpeg
        } else {
            MediaKind::Unsupported
        }
    }

    pub fn is_image(self) -> bool {
        matches!(self, MediaKind::Png | MediaKind::Jpeg)
    }
}

/// Where an attachment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentSource {
    /// Receipt tied to one expense line
    LineLinked { line: LinePosition },
    /// Added through the generic picker
    ListAdded,
}

/// Attachment content, either in memory or read on demand
#[derive(Debug, Clone)]
pub enum AttachmentData {
    Bytes(Arc<[u8]>),
    File(PathBuf),
}

impl AttachmentData {
    pub async fn read(&self) -> Result<Arc<[u8]>> {
        match self {
            AttachmentData::Bytes(bytes) => Ok(Arc::clone(bytes)),
            AttachmentData::File(path) => Ok(tokio::fs::read(path).await?.into()),
        }
    }
}

/// A user-supplied file before it joins a session
#[derive(Debug, Clone)]
pub struct AttachmentFile {
    pub name: String,
    pub media_type: String,
    pub size: u64,
    pub data: AttachmentData,
}

impl AttachmentFile {
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size: bytes.len() as u64,
            data: AttachmentData::Bytes(bytes),
        }
    }

    /// Reference a file on disk. The media type is left empty so detection
    /// falls back to the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_owned();
        let size = tokio::fs::metadata(&path).await?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            media_type: String::new(),
            size,
            data: AttachmentData::File(path),
        })
    }
}

/// An attachment as held by a session
#[derive(Debug, Clone)]
pub struct Attachment {
    pub id: AttachmentId,
    pub name: String,
    pub media_type: String,
    pub size: u64,
    pub source: AttachmentSource,
    pub data: AttachmentData,
}

impl Attachment {
    pub fn media_kind(&self) -> MediaKind {
        MediaKind::detect(&self.media_type, &self.name)
    }

    pub fn line_position(&self) -> Option<LinePosition> {
        match self.source {
            AttachmentSource::LineLinked { line } => Some(line),
            AttachmentSource::ListAdded => None,
        }
    }
}

// =============================================================================
// Report
// =============================================================================

/// Header information of the report
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReportMetadata {
    pub name: String,
    pub address: String,
    pub mission_reason: String,
    pub mission_place: String,
    /// Free-form; ISO dates are reformatted, anything else is printed as is
    pub mission_date: String,
    pub waives_reimbursement: bool,
}

/// Immutable copy of a session taken when generation starts
#[derive(Debug, Clone)]
pub struct ReportSnapshot {
    pub metadata: ReportMetadata,
    pub lines: Vec<ExpenseLine>,
    pub attachments: Vec<Attachment>,
    /// Rate the travel amounts were derived with
    pub rate_per_km: f64,
}

impl Default for ReportSnapshot {
    fn default() -> Self {
        Self {
            metadata: ReportMetadata::default(),
            lines: Vec::new(),
            attachments: Vec::new(),
            rate_per_km: DEFAULT_RATE_PER_KM,
        }
    }
}

impl ReportSnapshot {
    pub fn total(&self) -> f64 {
        self.lines.iter().map(|l| l.amount).sum()
    }
}

/// Result of one generation run
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub page_count: usize,
    pub recap_page_count: usize,
}
