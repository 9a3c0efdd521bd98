//! Page drawing primitives on top of lopdf content operations

use crate::constants::Rgb;
use crate::metrics::{FontFace, encode_win_ansi, text_width};
use crate::types::Result;
use lopdf::content::{Content, Operation};
use lopdf::{Object, ObjectId, StringFormat};

/// Content of one page being drawn
pub struct PageCanvas {
    width: f32,
    height: f32,
    operations: Vec<Operation>,
    xobjects: Vec<(String, ObjectId)>,
}

impl PageCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            operations: Vec::new(),
            xobjects: Vec::new(),
        }
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Draw text with its baseline starting at (x, y)
    pub fn text(&mut self, x: f32, y: f32, text: &str, face: FontFace, size: f32, color: Rgb) {
        if text.is_empty() {
            return;
        }
        self.push("q", vec![]);
        self.push_fill_color(color);
        self.push("BT", vec![]);
        self.push(
            "Tf",
            vec![
                Object::Name(face.resource_name().as_bytes().to_vec()),
                Object::Real(size),
            ],
        );
        self.push("Td", vec![Object::Real(x), Object::Real(y)]);
        self.push(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        );
        self.push("ET", vec![]);
        self.push("Q", vec![]);
    }

    /// Draw text horizontally centered on the page
    pub fn text_centered(&mut self, y: f32, text: &str, face: FontFace, size: f32, color: Rgb) {
        let x = (self.width - text_width(text, face, size)) / 2.0;
        self.text(x, y, text, face, size, color);
    }

    /// Draw text so that it ends at `right`
    pub fn text_right(&mut self, right: f32, y: f32, text: &str, face: FontFace, size: f32, color: Rgb) {
        let x = right - text_width(text, face, size);
        self.text(x, y, text, face, size, color);
    }

    /// Stroke a rectangle outline
    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb, line_width: f32) {
        self.push("q", vec![]);
        self.push_stroke(color, line_width);
        self.push(
            "re",
            vec![
                Object::Real(x),
                Object::Real(y),
                Object::Real(width),
                Object::Real(height),
            ],
        );
        self.push("S", vec![]);
        self.push("Q", vec![]);
    }

    /// Stroke a straight line segment
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb, line_width: f32) {
        self.push("q", vec![]);
        self.push_stroke(color, line_width);
        self.push("m", vec![Object::Real(from.0), Object::Real(from.1)]);
        self.push("l", vec![Object::Real(to.0), Object::Real(to.1)]);
        self.push("S", vec![]);
        self.push("Q", vec![]);
    }

    /// Paint an image XObject into the given box
    pub fn image(&mut self, image_id: ObjectId, x: f32, y: f32, width: f32, height: f32) {
        let name = format!("Im{}", self.xobjects.len() + 1);
        self.push("q", vec![]);
        self.push(
            "cm",
            vec![
                Object::Real(width),
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(height),
                Object::Real(x),
                Object::Real(y),
            ],
        );
        self.push("Do", vec![Object::Name(name.as_bytes().to_vec())]);
        self.push("Q", vec![]);
        self.xobjects.push((name, image_id));
    }

    /// Encoded content stream and the XObjects it references
    pub(crate) fn finish(self) -> Result<(Vec<u8>, Vec<(String, ObjectId)>)> {
        let content = Content {
            operations: self.operations,
        };
        Ok((content.encode()?, self.xobjects))
    }

    fn push_fill_color(&mut self, (r, g, b): Rgb) {
        self.push("rg", vec![Object::Real(r), Object::Real(g), Object::Real(b)]);
    }

    fn push_stroke(&mut self, (r, g, b): Rgb, line_width: f32) {
        self.push("RG", vec![Object::Real(r), Object::Real(g), Object::Real(b)]);
        self.push("w", vec![Object::Real(line_width)]);
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }
}
