//! Per-format text and image extraction.
//!
//! Each source format gets one extractor implementing the same
//! [`Extractor`] contract: a fallible text pass producing ordered
//! [`RawUnit`]s and a best-effort image pass that skips broken embedded
//! images instead of failing the conversion. The format set is closed,
//! so dispatch is a `match` over [`SourceFormat`], not an open registry.

mod pdf;
mod powerpoint;
mod word;

pub use pdf::PdfExtractor;
pub use powerpoint::PowerPointExtractor;
pub use word::WordExtractor;

use log::debug;

use crate::dedup::content_key;
use crate::detect::SourceFormat;
use crate::error::Result;
use crate::model::{ImageAsset, RawUnit};

/// Images with either dimension at or below this are discarded as
/// icons/bullets rather than content.
pub const MIN_IMAGE_DIM: u32 = 100;

/// Extraction contract implemented by every format arm.
pub trait Extractor: Send + Sync {
    /// Name of the format arm, for logging.
    fn name(&self) -> &'static str;

    /// Extract the ordered raw text units.
    ///
    /// A hard parse failure (corrupt container, unreadable stream)
    /// surfaces as an error and fails the whole conversion.
    fn extract_text(&self, data: &[u8]) -> Result<Vec<RawUnit>>;

    /// Extract embedded images, best-effort.
    ///
    /// Any per-image failure is swallowed and that image skipped; this
    /// never aborts the surrounding text extraction.
    fn extract_images(&self, data: &[u8]) -> Vec<ImageAsset>;
}

/// Return the extractor for a source format.
pub fn extractor_for(format: SourceFormat) -> &'static dyn Extractor {
    static WORD: WordExtractor = WordExtractor;
    static POWERPOINT: PowerPointExtractor = PowerPointExtractor;
    static PDF: PdfExtractor = PdfExtractor;

    match format {
        SourceFormat::Word => &WORD,
        SourceFormat::PowerPoint => &POWERPOINT,
        SourceFormat::Pdf => &PDF,
    }
}

/// Admit an extracted payload as an [`ImageAsset`].
///
/// Decodes pixel dimensions, applies the icon-size threshold and
/// computes the content key. Returns `None` (with a log line) for
/// undecodable payloads and icon-sized images.
pub(crate) fn admit_image(data: Vec<u8>, origin: &str) -> Option<ImageAsset> {
    let decoded = match image::load_from_memory(&data) {
        Ok(img) => img,
        Err(e) => {
            debug!("skipping undecodable image from {}: {}", origin, e);
            return None;
        }
    };
    let (width, height) = (decoded.width(), decoded.height());
    if width <= MIN_IMAGE_DIM || height <= MIN_IMAGE_DIM {
        debug!(
            "skipping icon-sized image from {} ({}x{})",
            origin, width, height
        );
        return None;
    }
    let key = content_key(&data);
    Some(ImageAsset::new(data, width, height, key))
}
