//! Source format detection and validation.

use crate::error::{Error, Result};
use std::io::Cursor;

/// Supported source document formats.
///
/// The format set is closed: dispatch over it is a plain `match`, not an
/// open registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Word processing document (.doc/.docx).
    Word,
    /// Presentation (.ppt/.pptx).
    PowerPoint,
    /// Paginated PDF.
    Pdf,
}

impl SourceFormat {
    /// Resolve a format from a declared file extension.
    ///
    /// Accepts the extension with or without a leading dot, in any case.
    ///
    /// # Example
    /// ```
    /// use docreflow::detect::SourceFormat;
    ///
    /// assert_eq!(SourceFormat::from_extension("PPTX").unwrap(), SourceFormat::PowerPoint);
    /// assert_eq!(SourceFormat::from_extension(".pdf").unwrap(), SourceFormat::Pdf);
    /// ```
    pub fn from_extension(ext: &str) -> Result<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "doc" | "docx" => Ok(SourceFormat::Word),
            "ppt" | "pptx" => Ok(SourceFormat::PowerPoint),
            "pdf" => Ok(SourceFormat::Pdf),
            _ => Err(Error::UnknownFormat),
        }
    }

    /// Human-readable name of the format.
    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Word => "word",
            SourceFormat::PowerPoint => "powerpoint",
            SourceFormat::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
/// ZIP local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

/// Detect the source format from raw bytes.
///
/// PDFs are recognized by their `%PDF-` header. OOXML packages are ZIP
/// archives; the package kind is determined by probing for the
/// `word/document.xml` entry or a `ppt/` prefix.
///
/// # Errors
/// Returns [`Error::UnknownFormat`] when the bytes match none of the
/// supported containers.
pub fn detect_from_bytes(data: &[u8]) -> Result<SourceFormat> {
    if data.starts_with(PDF_MAGIC) {
        return Ok(SourceFormat::Pdf);
    }

    if data.starts_with(ZIP_MAGIC) {
        if let Ok(mut archive) = zip::ZipArchive::new(Cursor::new(data)) {
            if archive.by_name("word/document.xml").is_ok() {
                return Ok(SourceFormat::Word);
            }
            if archive
                .file_names()
                .any(|name| name.starts_with("ppt/"))
            {
                return Ok(SourceFormat::PowerPoint);
            }
        }
    }

    Err(Error::UnknownFormat)
}

/// Check if bytes look like a supported source document.
pub fn is_supported(data: &[u8]) -> bool {
    detect_from_bytes(data).is_ok()
}
