//! Raster images as PDF image XObjects

use crate::types::{MediaKind, ReportError, Result};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use std::io::Write;

/// A decoded image, already deflated and ready to embed
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl PreparedImage {
    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Add the image (and its soft mask) to `doc`, returning the XObject ID
    pub(crate) fn add_to(&self, doc: &mut Document) -> ObjectId {
        let smask_id = self.alpha.as_ref().map(|alpha| {
            let dict = image_dict(self.width, self.height, b"DeviceGray");
            doc.add_object(raw_stream(dict, alpha.clone()))
        });

        let mut dict = image_dict(self.width, self.height, b"DeviceRGB");
        if let Some(id) = smask_id {
            dict.set("SMask", Object::Reference(id));
        }
        doc.add_object(raw_stream(dict, self.rgb.clone()))
    }
}

/// Decode image bytes and deflate their pixels.
///
/// The declared kind picks the decoder; content sniffing is the fallback
/// so a mislabelled file still goes through.
pub fn prepare_image(name: &str, bytes: &[u8], kind: MediaKind) -> Result<PreparedImage> {
    let unreadable = |source| ReportError::UnreadableImage {
        name: name.to_string(),
        source,
    };

    let decoded = match kind {
        MediaKind::Png => image::load_from_memory_with_format(bytes, ImageFormat::Png),
        MediaKind::Jpeg => image::load_from_memory_with_format(bytes, ImageFormat::Jpeg),
        _ => image::load_from_memory(bytes),
    };
    let img = match decoded {
        Ok(img) => img,
        Err(_) => image::load_from_memory(bytes).map_err(unreadable)?,
    };

    from_dynamic(&img)
}

/// Rasterize an SVG document so its longest side spans `longest_px` pixels
pub fn prepare_svg(name: &str, bytes: &[u8], longest_px: u32) -> Result<PreparedImage> {
    let unreadable = |reason: String| ReportError::UnreadableSvg {
        name: name.to_string(),
        reason,
    };

    let tree = Tree::from_data(bytes, &Options::default()).map_err(|e| unreadable(e.to_string()))?;
    let size = tree.size();
    let scale = longest_px as f32 / size.width().max(size.height());
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| unreadable(format!("cannot rasterize at {}x{}", width, height)))?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied colors
    let rgba: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    let img = RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| unreadable("pixel buffer size mismatch".to_string()))?;
    from_dynamic(&DynamicImage::ImageRgba8(img))
}

fn from_dynamic(img: &DynamicImage) -> Result<PreparedImage> {
    let (width, height) = (img.width(), img.height());
    let alpha = extract_alpha(img);
    let rgb = img.to_rgb8().into_raw();

    Ok(PreparedImage {
        width,
        height,
        rgb: deflate(&rgb)?,
        alpha: alpha.map(|a| deflate(&a)).transpose()?,
    })
}

/// Alpha channel, or None when the image is fully opaque
fn extract_alpha(img: &DynamicImage) -> Option<Vec<u8>> {
    if !img.color().has_alpha() {
        return None;
    }
    let alpha: Vec<u8> = img.to_rgba8().pixels().map(|p| p.0[3]).collect();
    if alpha.iter().all(|&a| a == u8::MAX) {
        return None;
    }
    Some(alpha)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn image_dict(width: u32, height: u32, color_space: &[u8]) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(i64::from(width))),
        ("Height", Object::Integer(i64::from(height))),
        ("ColorSpace", Object::Name(color_space.to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
        ("Filter", Object::Name(b"FlateDecode".to_vec())),
    ])
}

/// Stream holding already-compressed data
fn raw_stream(dict: Dictionary, content: Vec<u8>) -> Stream {
    Stream::new(dict, content).with_compression(false)
}
