//! Error types for the docreflow library.

use std::io;
use thiserror::Error;

/// Result type alias for docreflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document conversion.
///
/// `Corrupt`, `Extraction` and `Compose` are fatal to the whole
/// conversion; `ImageExtract` is recovered locally (the offending image
/// is skipped) and never escapes `extract_images`.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file extension or magic bytes do not match a supported format.
    #[error("Unknown file format: expected .doc/.docx, .ppt/.pptx or .pdf")]
    UnknownFormat,

    /// The source container is unreadable (not a ZIP/OOXML package,
    /// broken PDF cross-reference table, missing required entry).
    #[error("Corrupt source document: {0}")]
    Corrupt(String),

    /// Error extracting the text layer from a readable container.
    #[error("Text extraction error: {0}")]
    Extraction(String),

    /// Error extracting a single embedded image (non-fatal, skipped).
    #[error("Image extraction error: {0}")]
    ImageExtract(String),

    /// Error building the output document (PDF or Word).
    #[error("Composition error: {0}")]
    Compose(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Corrupt(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Corrupt(format!("malformed XML: {}", err))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Corrupt(err.to_string()),
        }
    }
}

impl From<pdf_extract::OutputError> for Error {
    fn from(err: pdf_extract::OutputError) -> Self {
        Error::Extraction(err.to_string())
    }
}
