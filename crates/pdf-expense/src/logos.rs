//! Header logo loading
//!
//! A logo that cannot be loaded never fails the report: its slot is drawn
//! as an empty placeholder instead.

use crate::constants::LOGO_RASTER_PX;
use crate::render::{PreparedImage, prepare_image, prepare_svg};
use crate::types::{MediaKind, ReportError};
use std::path::{Path, PathBuf};

/// Load every configured logo, one result per slot
pub async fn load_logos(paths: &[PathBuf]) -> Vec<Option<PreparedImage>> {
    let mut logos = Vec::with_capacity(paths.len());
    for (slot, path) in paths.iter().enumerate() {
        match load_logo(slot, path).await {
            Ok(image) => logos.push(Some(image)),
            Err(e) => {
                log::warn!("{}", e);
                logos.push(None);
            }
        }
    }
    logos
}

async fn load_logo(slot: usize, path: &Path) -> Result<PreparedImage, ReportError> {
    let unavailable = |reason: String| ReportError::LogoAssetUnavailable { slot, reason };

    let name = path.to_string_lossy().into_owned();
    let is_svg = name.to_ascii_lowercase().ends_with(".svg");
    let kind = MediaKind::detect("", &name);
    if !is_svg && !kind.is_image() {
        return Err(unavailable(format!("{} is not an SVG, PNG or JPEG image", name)));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| unavailable(format!("{}: {}", name, e)))?;

    let decoded = tokio::task::spawn_blocking(move || {
        if is_svg {
            prepare_svg(&name, &bytes, LOGO_RASTER_PX)
        } else {
            prepare_image(&name, &bytes, kind)
        }
    })
    .await
    .map_err(|e| unavailable(e.to_string()))?;
    decoded.map_err(|e| unavailable(e.to_string()))
}
