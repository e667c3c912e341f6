//! Page drawing on top of `lopdf`, in millimetres from the top-left corner.
//!
//! Only the two standard Helvetica faces are used, so no font data is
//! embedded. Content streams are left uncompressed and no document id or
//! creation date is written.

use image::GrayImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::error::DocsError;

pub(crate) const PAGE_WIDTH_MM: f32 = 210.0;
pub(crate) const PAGE_HEIGHT_MM: f32 = 297.0;
const PT_PER_MM: f32 = 72.0 / 25.4;
const PAGE_WIDTH_PT: f32 = 595.28;
const PAGE_HEIGHT_PT: f32 = 841.89;
/// Control-point distance for a quarter circle drawn as a cubic Bézier.
const KAPPA: f32 = 0.552_284_8;
const IMAGE_NAME: &str = "Im1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub(crate) const BLACK: Self = Self(0, 0, 0);
    pub(crate) const WHITE: Self = Self(255, 255, 255);

    fn components(self) -> Vec<Object> {
        [self.0, self.1, self.2]
            .into_iter()
            .map(|c| Object::Real(f32::from(c) / 255.0))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Font {
    Regular,
    Bold,
}

impl Font {
    const fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }

    /// Advance width in 1/1000 em from the standard Helvetica metrics.
    fn glyph_width(self, byte: u8) -> u16 {
        const REGULAR: [u16; 95] = [
            278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, 556,
            556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, 1015, 667,
            667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
            667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500,
            556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500, 278,
            556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
        ];
        const BOLD: [u16; 95] = [
            278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, 556,
            556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, 975, 722,
            722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722,
            667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556,
            611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556, 333,
            611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
        ];
        let table = match self {
            Self::Regular => &REGULAR,
            Self::Bold => &BOLD,
        };
        byte.checked_sub(32)
            .and_then(|i| table.get(usize::from(i)))
            .copied()
            .unwrap_or(556)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Center,
    Right,
}

/// Encodes text for a WinAnsi Type 1 font. Latin-1 passes through, other
/// characters become `?` and control characters become spaces.
pub(crate) fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            0x20..=0x7E | 0xA0..=0xFF => u8::try_from(u32::from(c)).unwrap_or(b'?'),
            0x00..=0x1F | 0x7F => b' ',
            _ => b'?',
        })
        .collect()
}

/// Rendered width of `text` in millimetres.
pub(crate) fn text_width_mm(text: &str, font: Font, size_pt: f32) -> f32 {
    let units: u32 = encode_text(text)
        .into_iter()
        .map(|b| u32::from(font.glyph_width(b)))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let units = units as f32;
    units / 1000.0 * size_pt / PT_PER_MM
}

/// Baseline-to-baseline distance for `size_pt` text, in millimetres.
pub(crate) fn line_height_mm(size_pt: f32) -> f32 {
    size_pt * 1.15 / PT_PER_MM
}

/// Height of a capital letter above the baseline, in millimetres.
pub(crate) fn cap_height_mm(size_pt: f32) -> f32 {
    size_pt * 0.718 / PT_PER_MM
}

/// Greedy word wrap to `width_mm`. Words wider than a line are split.
pub(crate) fn wrap_text(text: &str, width_mm: f32, font: Font, size_pt: f32) -> Vec<String> {
    let fits = |s: &str| text_width_mm(s, font, size_pt) <= width_mm;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_owned()
        } else {
            format!("{current} {word}")
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if fits(word) {
            current = word.to_owned();
            continue;
        }
        for c in word.chars() {
            current.push(c);
            if !fits(&current) && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn x_pt(x_mm: f32) -> Object {
    Object::Real(x_mm * PT_PER_MM)
}

fn y_pt(y_mm: f32) -> Object {
    Object::Real(PAGE_HEIGHT_PT - y_mm * PT_PER_MM)
}

fn len_pt(mm: f32) -> Object {
    Object::Real(mm * PT_PER_MM)
}

/// Drawing operations for one page.
#[derive(Debug, Default)]
pub(crate) struct Page {
    ops: Vec<Operation>,
}

impl Page {
    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }

    pub(crate) fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.op("rg", color.components());
        self.op("re", vec![x_pt(x), y_pt(y + h), len_pt(w), len_pt(h)]);
        self.op("f", vec![]);
    }

    pub(crate) fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32, color: Rgb) {
        let (left, right) = (x * PT_PER_MM, (x + w) * PT_PER_MM);
        let (top, bottom) = (
            PAGE_HEIGHT_PT - y * PT_PER_MM,
            PAGE_HEIGHT_PT - (y + h) * PT_PER_MM,
        );
        let r = r * PT_PER_MM;
        let k = r * KAPPA;
        let p = |v: f32| Object::Real(v);

        self.op("rg", color.components());
        self.op("m", vec![p(left + r), p(bottom)]);
        self.op("l", vec![p(right - r), p(bottom)]);
        self.op(
            "c",
            vec![p(right - r + k), p(bottom), p(right), p(bottom + r - k), p(right), p(bottom + r)],
        );
        self.op("l", vec![p(right), p(top - r)]);
        self.op(
            "c",
            vec![p(right), p(top - r + k), p(right - r + k), p(top), p(right - r), p(top)],
        );
        self.op("l", vec![p(left + r), p(top)]);
        self.op(
            "c",
            vec![p(left + r - k), p(top), p(left), p(top - r + k), p(left), p(top - r)],
        );
        self.op("l", vec![p(left), p(bottom + r)]);
        self.op(
            "c",
            vec![p(left), p(bottom + r - k), p(left + r - k), p(bottom), p(left + r), p(bottom)],
        );
        self.op("h", vec![]);
        self.op("f", vec![]);
    }

    pub(crate) fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb) {
        self.op("RG", color.components());
        self.op("w", vec![Object::Real(0.57)]);
        self.op("m", vec![x_pt(x1), y_pt(y1)]);
        self.op("l", vec![x_pt(x2), y_pt(y2)]);
        self.op("S", vec![]);
    }

    /// Draws one line of text with its baseline at `y`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn text(
        &mut self,
        x: f32,
        y: f32,
        text: &str,
        font: Font,
        size_pt: f32,
        color: Rgb,
        align: Align,
    ) {
        let width = text_width_mm(text, font, size_pt);
        let x = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        self.op("BT", vec![]);
        self.op(
            "Tf",
            vec![Object::Name(font.resource_name().as_bytes().to_vec()), Object::Real(size_pt)],
        );
        self.op("rg", color.components());
        self.op("Td", vec![x_pt(x), y_pt(y)]);
        self.op("Tj", vec![Object::string_literal(encode_text(text))]);
        self.op("ET", vec![]);
    }

    /// Places the document image into the box with top-left corner `(x, y)`.
    pub(crate) fn image(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let zero = || Object::Integer(0);
        self.op("q", vec![]);
        self.op(
            "cm",
            vec![len_pt(w), zero(), zero(), len_pt(h), x_pt(x), y_pt(y + h)],
        );
        self.op("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]);
        self.op("Q", vec![]);
    }
}

#[cfg(test)]
impl Page {
    /// Baselines of every text run, in mm from the top edge.
    pub(crate) fn text_baselines(&self) -> Vec<f32> {
        self.ops
            .iter()
            .filter(|op| op.operator == "Td")
            .filter_map(|op| match op.operands.get(1) {
                Some(Object::Real(y)) => Some((PAGE_HEIGHT_PT - y) / PT_PER_MM),
                _ => None,
            })
            .collect()
    }
}

/// Serializes `pages` into a PDF. `image` becomes the shared `/Im1` XObject.
pub(crate) fn assemble(pages: Vec<Page>, image: Option<&GrayImage>) -> Result<Vec<u8>, DocsError> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut resources = dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource_name() => regular,
            Font::Bold.resource_name() => bold,
        },
    };
    if let Some(image) = image {
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(image.width()),
                "Height" => i64::from(image.height()),
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8_i64,
            },
            image.as_raw().clone(),
        ));
        resources.set("XObject", dictionary! { IMAGE_NAME => image_id });
    }
    let resources_id = doc.add_object(resources);

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page.ops,
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), PAGE_WIDTH_PT.into(), PAGE_HEIGHT_PT.into()],
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| DocsError::Pdf(e.into()))?;
    Ok(bytes)
}
