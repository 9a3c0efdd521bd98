//! Appending attachments to the output document
//!
//! PDF attachments contribute all of their pages in order. PNG and JPEG
//! attachments become one A4 page each with the image centered inside a
//! fixed margin. Anything else is refused with
//! [`ReportError::UnsupportedAttachmentKind`].

use crate::constants::*;
use crate::render::{OutputDocument, PageCanvas, copy_pages, prepare_image};
use crate::types::*;
use lopdf::Document;
use std::sync::Arc;

/// What one attachment added to the output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppendOutcome {
    /// Pages copied from a donor PDF
    Pages(usize),
    /// A single image page
    Image(ImagePlacement),
}

impl AppendOutcome {
    pub fn pages_added(&self) -> usize {
        match self {
            AppendOutcome::Pages(n) => *n,
            AppendOutcome::Image(_) => 1,
        }
    }
}

/// Where an image lands on its page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub scale: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Uniform scale that fits the image inside the page margins, capped at
/// `max_scale`, with the result centered on the page.
pub fn fit_image(
    page_width: f32,
    page_height: f32,
    image_width: f32,
    image_height: f32,
    margin: f32,
    max_scale: f32,
) -> ImagePlacement {
    let available_w = (page_width - 2.0 * margin).max(0.0);
    let available_h = (page_height - 2.0 * margin).max(0.0);
    let fit = (available_w / image_width).min(available_h / image_height);
    let scale = if fit.is_finite() { fit.min(max_scale) } else { max_scale };

    let width = image_width * scale;
    let height = image_height * scale;
    ImagePlacement {
        scale,
        x: (page_width - width) / 2.0,
        y: (page_height - height) / 2.0,
        width,
        height,
    }
}

/// Append one attachment, reading its bytes first.
///
/// Unsupported kinds fail with [`ReportError::UnsupportedAttachmentKind`]
/// before any byte is read.
pub async fn append_attachment(output: &mut OutputDocument, attachment: &Attachment) -> Result<AppendOutcome> {
    let kind = attachment.media_kind();
    if kind == MediaKind::Unsupported {
        return Err(unsupported(attachment));
    }
    let bytes = attachment.data.read().await?;
    append_bytes(output, &attachment.name, bytes, kind).await
}

/// Append an attachment given its bytes and media kind
pub async fn append_bytes(
    output: &mut OutputDocument,
    name: &str,
    bytes: Arc<[u8]>,
    kind: MediaKind,
) -> Result<AppendOutcome> {
    match kind {
        MediaKind::Pdf => {
            let donor = parse_donor(name, bytes).await?;
            let pages = copy_pages(output, &donor)?;
            log::debug!("Copied {} pages from {}", pages, name);
            Ok(AppendOutcome::Pages(pages))
        }
        MediaKind::Png | MediaKind::Jpeg => {
            let owned_name = name.to_string();
            let image =
                tokio::task::spawn_blocking(move || prepare_image(&owned_name, &bytes, kind))
                    .await??;

            let placement = fit_image(
                A4_WIDTH_PT,
                A4_HEIGHT_PT,
                image.width as f32,
                image.height as f32,
                IMAGE_PAGE_MARGIN,
                MAX_IMAGE_UPSCALE,
            );
            log::debug!(
                "Placing {} ({}x{} px) at scale {:.3}",
                name,
                image.width,
                image.height,
                placement.scale
            );

            let image_id = output.add_image(&image);
            let mut page = PageCanvas::new(A4_WIDTH_PT, A4_HEIGHT_PT);
            page.image(image_id, placement.x, placement.y, placement.width, placement.height);
            output.push_canvas(page)?;
            Ok(AppendOutcome::Image(placement))
        }
        MediaKind::Unsupported => Err(ReportError::UnsupportedAttachmentKind {
            name: name.to_string(),
            media_type: String::from("unknown"),
        }),
    }
}

async fn parse_donor(name: &str, bytes: Arc<[u8]>) -> Result<Document> {
    let parsed = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await?;
    let donor = parsed.map_err(|source| ReportError::UnparsableDonorDocument {
        name: name.to_string(),
        source,
    })?;
    if donor.get_pages().is_empty() {
        log::warn!("{} has no pages", name);
    }
    Ok(donor)
}

fn unsupported(attachment: &Attachment) -> ReportError {
    let media_type = if attachment.media_type.is_empty() {
        String::from("unknown")
    } else {
        attachment.media_type.clone()
    };
    ReportError::UnsupportedAttachmentKind {
        name: attachment.name.clone(),
        media_type,
    }
}
