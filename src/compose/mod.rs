//! Output composition: normalized text plus surviving images rendered
//! into a fresh PDF or Word document.
//!
//! Both arms share the same layout model: body text first, then image
//! grid pages of [`GridSpec::rows`] x [`GridSpec::cols`] cells in
//! row-major order, with a page break before the first grid and between
//! grids but not after the last.

pub mod fonts;
mod pdf;
mod word;

pub use pdf::PdfComposer;
pub use word::WordComposer;

use crate::convert::OutputFormat;
use crate::error::Result;
use crate::model::{ImageAsset, NormalizedDocument};

/// Points per millimetre (1 pt = 1/72 in).
pub const MM: f32 = 72.0 / 25.4;

/// Page frame in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// A4 portrait with a 10 mm margin on every side.
    pub fn a4() -> Self {
        PageGeometry {
            width: 595.276,
            height: 841.89,
            margin: 10.0 * MM,
        }
    }

    pub fn usable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn usable_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry::a4()
    }
}

/// Image grid shape: one grid fills one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
}

/// Gap between an image and its cell boundary.
pub const CELL_PADDING: f32 = 3.0 * MM;

/// Vertical slack reserved on grid pages so the last row clears the
/// bottom margin.
const GRID_VERTICAL_RESERVE: f32 = 10.0 * MM;

impl GridSpec {
    pub fn cells_per_page(&self) -> usize {
        self.rows * self.cols
    }

    /// Width/height of one grid slot (cell plus padding).
    pub fn slot_size(&self, geometry: &PageGeometry) -> (f32, f32) {
        let w = geometry.usable_width() / self.cols as f32;
        let h = (geometry.usable_height() - GRID_VERTICAL_RESERVE) / self.rows as f32;
        (w, h)
    }

    /// Width/height an image is stretched to inside its slot.
    pub fn cell_size(&self, geometry: &PageGeometry) -> (f32, f32) {
        let (w, h) = self.slot_size(geometry);
        (w - CELL_PADDING, h - CELL_PADDING)
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        GridSpec { rows: 4, cols: 3 }
    }
}

/// Partition `count` images into full grid pages.
///
/// Every page holds exactly `cells_per_page` cells in row-major order;
/// the trailing page is padded with empty cells. Zero images means zero
/// grid pages.
pub fn grid_pages(count: usize, cells_per_page: usize) -> Vec<Vec<Option<usize>>> {
    let mut pages = Vec::new();
    let mut index = 0;
    while index < count {
        let page: Vec<Option<usize>> = (0..cells_per_page)
            .map(|cell| {
                let i = index + cell;
                if i < count {
                    Some(i)
                } else {
                    None
                }
            })
            .collect();
        pages.push(page);
        index += cells_per_page;
    }
    pages
}

/// Layout knobs shared by both composer arms.
#[derive(Debug, Clone, Copy)]
pub struct ComposeOptions {
    pub geometry: PageGeometry,
    pub grid: GridSpec,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        ComposeOptions {
            geometry: PageGeometry::a4(),
            grid: GridSpec::default(),
        }
    }
}

/// Render a normalized document (and its surviving images) to the
/// requested output format.
pub fn compose(
    document: &NormalizedDocument,
    images: &[ImageAsset],
    format: OutputFormat,
    options: &ComposeOptions,
) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Pdf => PdfComposer::new(*options).compose(document, images),
        OutputFormat::Word => WordComposer::new(*options).compose(document, images),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_pages_empty() {
        assert!(grid_pages(0, 12).is_empty());
    }

    #[test]
    fn test_grid_pages_exact_fit() {
        let pages = grid_pages(12, 12);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].iter().all(|c| c.is_some()));
    }

    #[test]
    fn test_grid_pages_padding() {
        // 13 images: a full page plus one with a single populated cell
        let pages = grid_pages(13, 12);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0][11], Some(11));
        assert_eq!(pages[1][0], Some(12));
        assert_eq!(pages[1].iter().filter(|c| c.is_none()).count(), 11);
    }

    #[test]
    fn test_grid_pages_row_major() {
        let pages = grid_pages(5, 12);
        let populated: Vec<usize> = pages[0].iter().flatten().copied().collect();
        assert_eq!(populated, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_a4_geometry() {
        let geom = PageGeometry::a4();
        assert!((geom.margin - 28.346).abs() < 0.01);
        assert!(geom.usable_width() > 500.0);
    }

    #[test]
    fn test_cell_size_fits_page() {
        let geom = PageGeometry::a4();
        let grid = GridSpec::default();
        let (w, h) = grid.cell_size(&geom);
        assert!(w * grid.cols as f32 <= geom.usable_width());
        assert!(h * grid.rows as f32 <= geom.usable_height());
        assert!(w > 0.0 && h > 0.0);
    }
}
