//! PDF composition with `lopdf`: flowed body text followed by image
//! grid pages.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::io::Write;

use super::{fonts, grid_pages, ComposeOptions};
use crate::error::{Error, Result};
use crate::model::{ImageAsset, NormalizedDocument};

const BODY_FONT_SIZE: f32 = 12.0;
const BODY_LEADING: f32 = 13.8;
const PARAGRAPH_SPACING: f32 = 6.0;
/// Estimated average glyph width as a fraction of the font size, used
/// for greedy word wrapping.
const AVG_CHAR_WIDTH: f32 = 0.5;

/// Composer producing a fresh PDF document.
pub struct PdfComposer {
    options: ComposeOptions,
}

impl PdfComposer {
    pub fn new(options: ComposeOptions) -> Self {
        PdfComposer { options }
    }

    pub fn compose(&self, document: &NormalizedDocument, images: &[ImageAsset]) -> Result<Vec<u8>> {
        let geometry = self.options.geometry;
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => fonts::table().base_font,
            "Encoding" => "WinAnsiEncoding",
        });

        let mut kids: Vec<Object> = Vec::new();

        for page_lines in self.layout_text(document) {
            let page_id = self.text_page(&mut doc, pages_id, &page_lines)?;
            kids.push(page_id.into());
        }

        for page in grid_pages(images.len(), self.options.grid.cells_per_page()) {
            let page_id = self.grid_page(&mut doc, pages_id, &page, images)?;
            kids.push(page_id.into());
        }

        // A PDF with zero pages is invalid; an empty input still yields
        // one blank page.
        if kids.is_empty() {
            let page_id = self.text_page(&mut doc, pages_id, &[])?;
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        debug!("pdf composer: {} pages", count);
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
            "MediaBox" => vec![
                0.into(),
                0.into(),
                geometry.width.into(),
                geometry.height.into(),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| Error::Compose(format!("writing PDF: {}", e)))?;
        Ok(out)
    }

    /// Break the document's paragraphs into pages of `(y, text)` lines.
    fn layout_text(&self, document: &NormalizedDocument) -> Vec<Vec<(f32, String)>> {
        let geometry = self.options.geometry;
        let max_chars = ((geometry.usable_width() / (AVG_CHAR_WIDTH * BODY_FONT_SIZE)) as usize)
            .max(1);
        let top = geometry.height - geometry.margin - BODY_FONT_SIZE;
        let bottom = geometry.margin;

        let mut pages = Vec::new();
        let mut current: Vec<(f32, String)> = Vec::new();
        let mut y = top;

        for paragraph in &document.paragraphs {
            for line in wrap(paragraph, max_chars) {
                if y < bottom {
                    pages.push(std::mem::take(&mut current));
                    y = top;
                }
                current.push((y, line));
                y -= BODY_LEADING;
            }
            y -= PARAGRAPH_SPACING;
        }
        if !current.is_empty() {
            pages.push(current);
        }
        pages
    }

    fn text_page(
        &self,
        doc: &mut Document,
        pages_id: ObjectId,
        lines: &[(f32, String)],
    ) -> Result<ObjectId> {
        let margin = self.options.geometry.margin;
        let mut operations = Vec::new();
        for (y, line) in lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec!["F1".into(), BODY_FONT_SIZE.into()],
            ));
            operations.push(Operation::new("Td", vec![margin.into(), (*y).into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(
                    encode_win_ansi(line),
                    StringFormat::Literal,
                )],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| Error::Compose(format!("encoding content stream: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        Ok(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        }))
    }

    fn grid_page(
        &self,
        doc: &mut Document,
        pages_id: ObjectId,
        cells: &[Option<usize>],
        images: &[ImageAsset],
    ) -> Result<ObjectId> {
        let geometry = self.options.geometry;
        let grid = self.options.grid;
        let (slot_w, slot_h) = grid.slot_size(&geometry);
        let (cell_w, cell_h) = grid.cell_size(&geometry);
        let pad = super::CELL_PADDING / 2.0;

        let mut xobjects = lopdf::Dictionary::new();
        let mut operations = Vec::new();

        // cell borders, whole grid
        operations.push(Operation::new("q", vec![]));
        operations.push(Operation::new("w", vec![0.5f32.into()]));
        operations.push(Operation::new(
            "RG",
            vec![0.6f32.into(), 0.6f32.into(), 0.6f32.into()],
        ));
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                let x = geometry.margin + col as f32 * slot_w;
                let y = geometry.height - geometry.margin - (row + 1) as f32 * slot_h;
                operations.push(Operation::new(
                    "re",
                    vec![x.into(), y.into(), slot_w.into(), slot_h.into()],
                ));
            }
        }
        operations.push(Operation::new("S", vec![]));
        operations.push(Operation::new("Q", vec![]));

        for (cell, slot) in cells.iter().enumerate() {
            let Some(image_index) = slot else {
                continue;
            };
            let asset = &images[*image_index];
            let stream = image_xobject(asset)?;
            let xobject_id = doc.add_object(stream);
            let name = format!("Im{}", cell);
            xobjects.set(name.as_bytes().to_vec(), xobject_id);

            let row = cell / grid.cols;
            let col = cell % grid.cols;
            let x = geometry.margin + col as f32 * slot_w + pad;
            let y = geometry.height - geometry.margin - (row + 1) as f32 * slot_h + pad;

            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new(
                "cm",
                vec![
                    cell_w.into(),
                    0.into(),
                    0.into(),
                    cell_h.into(),
                    x.into(),
                    y.into(),
                ],
            ));
            operations.push(Operation::new("Do", vec![name.into()]));
            operations.push(Operation::new("Q", vec![]));
        }

        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| Error::Compose(format!("encoding content stream: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        Ok(doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "XObject" => Object::Dictionary(xobjects) },
        }))
    }
}

/// Encode text for a WinAnsi (CP1252-compatible) simple font. Glyphs
/// outside the Latin-1 range come out as `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

/// Greedy word wrap by character count.
fn wrap(paragraph: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for word in paragraph.split_whitespace() {
        let word_chars = word.chars().count();
        if current_chars > 0 && current_chars + 1 + word_chars > max_chars {
            lines.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if current_chars > 0 {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Build the image XObject stream for an asset.
///
/// JPEG payloads pass through verbatim under `DCTDecode`; everything
/// else is re-encoded as zlib-compressed raw RGB under `FlateDecode`.
fn image_xobject(asset: &ImageAsset) -> Result<Stream> {
    if asset.is_jpeg() {
        let decoded = image::load_from_memory(&asset.data)
            .map_err(|e| Error::Compose(format!("re-reading JPEG: {}", e)))?;
        let color_space = match decoded.color() {
            image::ColorType::L8 | image::ColorType::L16 => "DeviceGray",
            _ => "DeviceRGB",
        };
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => asset.width as i64,
            "Height" => asset.height as i64,
            "ColorSpace" => color_space,
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        };
        return Ok(Stream::new(dict, asset.data.clone()));
    }

    let decoded = image::load_from_memory(&asset.data)
        .map_err(|e| Error::Compose(format!("decoding image: {}", e)))?;
    let rgb = decoded.to_rgb8();
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(rgb.as_raw())
        .map_err(|e| Error::Compose(format!("compressing image: {}", e)))?;
    let compressed = encoder
        .finish()
        .map_err(|e| Error::Compose(format!("compressing image: {}", e)))?;

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => asset.width as i64,
        "Height" => asset.height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };
    Ok(Stream::new(dict, compressed))
}
