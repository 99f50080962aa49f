//! Word composition with `docx-rs`: flowed body paragraphs followed by
//! image placeholder grids.
//!
//! The Word arm renders each grid cell as a numbered caption
//! (`Image 1`, `Image 2`, ...) instead of embedding pixel data; the
//! numbering follows the deduplicated image order, so the grids stay in
//! step with the PDF arm's layout.

use std::io::Cursor;

use docx_rs::{
    BreakType, Docx, PageMargin, Paragraph, Run, RunFonts, Table, TableCell, TableRow,
};
use log::debug;

use super::{fonts, grid_pages, ComposeOptions};
use crate::error::{Error, Result};
use crate::model::{ImageAsset, NormalizedDocument};

/// 12 pt in half-points, the unit docx run sizes use.
const BODY_HALF_POINTS: usize = 24;
/// 0.4 inch page margin in twips.
const MARGIN_TWIPS: i32 = 576;
/// A4 usable width at that margin, split across the grid columns.
const GRID_COLUMN_TWIPS: usize = 3584;

/// Composer producing a fresh `.docx` package.
pub struct WordComposer {
    options: ComposeOptions,
}

impl WordComposer {
    pub fn new(options: ComposeOptions) -> Self {
        WordComposer { options }
    }

    pub fn compose(&self, document: &NormalizedDocument, images: &[ImageAsset]) -> Result<Vec<u8>> {
        let font = fonts::table().word_font;
        let mut docx = Docx::new().page_margin(
            PageMargin::new()
                .top(MARGIN_TWIPS)
                .bottom(MARGIN_TWIPS)
                .left(MARGIN_TWIPS)
                .right(MARGIN_TWIPS),
        );

        for paragraph in &document.paragraphs {
            docx = docx.add_paragraph(body_paragraph(paragraph, font));
        }

        let pages = grid_pages(images.len(), self.options.grid.cells_per_page());
        debug!(
            "word composer: {} paragraphs, {} grid pages",
            document.paragraphs.len(),
            pages.len()
        );
        // break before the first grid and between grids, never after the
        // last; a table directly after a break starts the next page
        for page in &pages {
            docx = docx.add_paragraph(page_break());
            docx = docx.add_table(self.grid_table(page, font));
        }

        let mut cursor = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut cursor)
            .map_err(|e| Error::Compose(format!("writing docx package: {}", e)))?;
        Ok(cursor.into_inner())
    }

    fn grid_table(&self, cells: &[Option<usize>], font: &str) -> Table {
        let grid = self.options.grid;
        let mut rows = Vec::with_capacity(grid.rows);
        for row in 0..grid.rows {
            let mut table_cells = Vec::with_capacity(grid.cols);
            for col in 0..grid.cols {
                let paragraph = match cells[row * grid.cols + col] {
                    Some(image_index) => caption_paragraph(image_index, font),
                    None => Paragraph::new(),
                };
                table_cells.push(TableCell::new().add_paragraph(paragraph));
            }
            rows.push(TableRow::new(table_cells));
        }
        Table::new(rows).set_grid(vec![GRID_COLUMN_TWIPS; grid.cols])
    }
}

fn body_paragraph(text: &str, font: &str) -> Paragraph {
    Paragraph::new().add_run(
        Run::new()
            .add_text(text)
            .size(BODY_HALF_POINTS)
            .fonts(RunFonts::new().ascii(font)),
    )
}

fn caption_paragraph(image_index: usize, font: &str) -> Paragraph {
    Paragraph::new().add_run(
        Run::new()
            .add_text(format!("Image {}", image_index + 1))
            .size(BODY_HALF_POINTS)
            .fonts(RunFonts::new().ascii(font)),
    )
}

fn page_break() -> Paragraph {
    Paragraph::new().add_run(Run::new().add_break(BreakType::Page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::content_key;
    use std::io::Read;

    fn document_xml(bytes: &[u8]) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entry = archive.by_name("word/document.xml").unwrap();
        let mut xml = String::new();
        entry.read_to_string(&mut xml).unwrap();
        xml
    }

    fn png_asset(width: u32, height: u32) -> ImageAsset {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([5, 5, 5]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        let data = out.into_inner();
        let key = content_key(&data);
        ImageAsset::new(data, width, height, key)
    }

    #[test]
    fn test_paragraph_text_lands_in_package() {
        let document = NormalizedDocument {
            paragraphs: vec!["First body paragraph".into(), "Second one".into()],
        };
        let bytes = WordComposer::new(ComposeOptions::default())
            .compose(&document, &[])
            .unwrap();
        let xml = document_xml(&bytes);
        assert!(xml.contains("First body paragraph"));
        assert!(xml.contains("Second one"));
        // no images, no grid, no page break
        assert!(!xml.contains("Image 1"));
    }

    #[test]
    fn test_grid_captions_numbered_in_order() {
        let document = NormalizedDocument {
            paragraphs: vec!["Body".into()],
        };
        let images: Vec<ImageAsset> = (0..13).map(|_| png_asset(150, 150)).collect();
        let bytes = WordComposer::new(ComposeOptions::default())
            .compose(&document, &images)
            .unwrap();
        let xml = document_xml(&bytes);
        assert!(xml.contains("Image 1"));
        assert!(xml.contains("Image 12"));
        assert!(xml.contains("Image 13"));
        assert!(!xml.contains("Image 14"));
    }

    #[test]
    fn test_empty_document_is_valid_package() {
        let document = NormalizedDocument { paragraphs: vec![] };
        let bytes = WordComposer::new(ComposeOptions::default())
            .compose(&document, &[])
            .unwrap();
        assert!(document_xml(&bytes).contains("w:document"));
    }
}
