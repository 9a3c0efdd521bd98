//! PDF object plumbing shared by the recap builder and the merger
//!
//! - Building an output document page by page
//! - Drawing pages with text, strokes and images
//! - Deep copying pages out of donor documents
//! - Preparing raster images as XObjects

mod canvas;
mod copy;
mod image;

pub use canvas::PageCanvas;
pub use copy::copy_pages;
pub use image::{PreparedImage, prepare_image, prepare_svg};

use crate::metrics::FontFace;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// A document under construction.
///
/// The page tree root is reserved up front and written on
/// [`OutputDocument::into_document`], in the order pages were added.
pub struct OutputDocument {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
    fonts: Option<Dictionary>,
}

impl OutputDocument {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
            fonts: None,
        }
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Insert a page dictionary at a reserved ID and append it to the tree
    pub(crate) fn insert_page(&mut self, page_id: ObjectId, mut page: Dictionary) {
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(self.pages_id));
        self.doc.objects.insert(page_id, Object::Dictionary(page));
        self.kids.push(page_id);
    }

    /// Append a page drawn on a canvas
    pub fn push_canvas(&mut self, canvas: PageCanvas) -> Result<ObjectId> {
        let (width, height) = canvas.size();
        let (content, xobjects) = canvas.finish()?;

        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(self.font_resources()));
        if !xobjects.is_empty() {
            let mut dict = Dictionary::new();
            for (name, id) in xobjects {
                dict.set(name.into_bytes(), Object::Reference(id));
            }
            resources.set("XObject", Object::Dictionary(dict));
        }

        let content_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content));

        let mut page = Dictionary::new();
        page.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width),
                Object::Real(height),
            ]),
        );
        page.set("Contents", Object::Reference(content_id));
        page.set("Resources", Object::Dictionary(resources));

        let page_id = self.doc.new_object_id();
        self.insert_page(page_id, page);
        Ok(page_id)
    }

    /// Add a prepared image as an XObject, with its soft mask if any
    pub fn add_image(&mut self, image: &PreparedImage) -> ObjectId {
        image.add_to(&mut self.doc)
    }

    /// Font resources, created once per document
    fn font_resources(&mut self) -> Dictionary {
        if let Some(fonts) = &self.fonts {
            return fonts.clone();
        }

        let mut fonts = Dictionary::new();
        for face in [FontFace::Regular, FontFace::Bold] {
            let mut font_dict = Dictionary::new();
            font_dict.set("Type", Object::Name(b"Font".to_vec()));
            font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
            font_dict.set("BaseFont", Object::Name(face.base_font().as_bytes().to_vec()));
            font_dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
            let font_id = self.doc.add_object(font_dict);
            fonts.set(face.resource_name(), Object::Reference(font_id));
        }
        self.fonts = Some(fonts.clone());
        fonts
    }

    /// Write the page tree and catalog
    pub fn into_document(mut self) -> Document {
        let count = self.kids.len() as i64;
        let kids = self.kids.iter().map(|&id| Object::Reference(id)).collect();
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.doc.trailer.set("Root", catalog_id);

        self.doc
    }

    /// Finish the document and serialize it
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        let mut doc = self.into_document();
        doc.compress();
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok(writer)
    }
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}
