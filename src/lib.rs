//! # docreflow
//!
//! Lecture-material recomposition library for Rust.
//!
//! Takes a Word, PowerPoint or PDF document, strips repeated
//! per-page/per-slide boilerplate, normalizes the remaining text, drops
//! duplicate embedded images, and composes a fresh PDF or Word document
//! from what survives.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docreflow::{Conversion, OutputFormat};
//!
//! fn main() -> docreflow::Result<()> {
//!     let result = Conversion::new(OutputFormat::Pdf)
//!         .with_images(true)
//!         .run_file("slides.pptx")?;
//!     std::fs::write(result.file_name("slides"), &result.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Format extractors**: per-page (PDF), per-slide (PowerPoint) and
//!   whole-document (Word) text units, plus embedded images
//! - **Boilerplate detector**: frequency-based removal of headers,
//!   footers and slide-number noise
//! - **Text normalizer**: Unicode NFC, typography cleanup, spacing
//!   repair
//! - **Image deduplicator**: content-keyed, order-preserving
//! - **Composer**: A4 body text plus 4x3 image grid pages, to PDF or
//!   Word

pub mod clean;
pub mod compose;
pub mod convert;
pub mod dedup;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;

// Re-export commonly used types
pub use clean::{BoilerplateDetector, BoilerplateOptions, BoilerplateSet, TextNormalizer};
pub use compose::{ComposeOptions, GridSpec, PageGeometry};
pub use convert::{
    convert_bytes, ConversionRequest, ConversionStats, ConvertResult, OutputFormat,
};
pub use detect::{detect_from_bytes, is_supported, SourceFormat};
pub use error::{Error, Result};
pub use extract::{Extractor, MIN_IMAGE_DIM};
pub use model::{ImageAsset, NormalizedDocument, RawUnit};

use std::path::Path;

/// Builder-style entry point for one conversion.
///
/// Collects the output choices, then runs the pipeline over bytes or a
/// file path. The source format is given explicitly for byte inputs and
/// derived from the extension (with a magic-byte fallback) for files.
#[derive(Debug, Clone)]
pub struct Conversion {
    output_format: OutputFormat,
    include_images: bool,
    output_name: Option<String>,
    compose_options: ComposeOptions,
}

impl Conversion {
    pub fn new(output_format: OutputFormat) -> Self {
        Conversion {
            output_format,
            include_images: false,
            output_name: None,
            compose_options: ComposeOptions::default(),
        }
    }

    /// Extract, deduplicate and render embedded images.
    pub fn with_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }

    /// Override the output file stem used by [`ConvertResult::file_name`].
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Override page geometry and grid shape.
    pub fn with_compose_options(mut self, options: ComposeOptions) -> Self {
        self.compose_options = options;
        self
    }

    fn request(&self, source_format: SourceFormat) -> ConversionRequest {
        let mut request = ConversionRequest::new(source_format, self.output_format)
            .with_images(self.include_images);
        if let Some(name) = &self.output_name {
            request = request.with_output_name(name.clone());
        }
        request.compose_options = self.compose_options;
        request
    }

    /// Convert in-memory input bytes of a known source format.
    pub fn run_bytes(&self, data: &[u8], source_format: SourceFormat) -> Result<ConvertResult> {
        convert::convert_bytes(data, &self.request(source_format))
    }

    /// Convert a file, deriving the source format from its extension and
    /// falling back to magic-byte detection.
    pub fn run_file<P: AsRef<Path>>(&self, path: P) -> Result<ConvertResult> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => SourceFormat::from_extension(ext)
                .or_else(|_| detect::detect_from_bytes(&data))?,
            None => detect::detect_from_bytes(&data)?,
        };
        self.run_bytes(&data, format)
    }
}

/// Convert in-memory bytes in one call, without images.
pub fn convert(
    data: &[u8],
    source_format: SourceFormat,
    output_format: OutputFormat,
) -> Result<ConvertResult> {
    Conversion::new(output_format).run_bytes(data, source_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_bytes(paragraph: &str) -> Vec<u8> {
        let xml = format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:body></w:document>"#,
            paragraph
        );
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_convert_word_to_pdf() {
        let result = convert(
            &docx_bytes("Hello from a docx"),
            SourceFormat::Word,
            OutputFormat::Pdf,
        )
        .unwrap();
        assert!(result.bytes.starts_with(b"%PDF-"));
        assert_eq!(result.mime_type, "application/pdf");
        assert_eq!(result.stats.units, 1);
        assert_eq!(result.stats.paragraphs, 1);
    }

    #[test]
    fn test_builder_output_name_flows_through() {
        let result = Conversion::new(OutputFormat::Word)
            .with_output_name("renamed")
            .run_bytes(&docx_bytes("Body"), SourceFormat::Word)
            .unwrap();
        assert_eq!(result.file_name("orig"), "renamed.docx");
    }

    #[test]
    fn test_run_file_unknown_extension_falls_back_to_sniffing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.bin");
        std::fs::write(&path, docx_bytes("Sniffed")).unwrap();

        let result = Conversion::new(OutputFormat::Pdf).run_file(&path).unwrap();
        assert!(result.bytes.starts_with(b"%PDF-"));
    }
}
