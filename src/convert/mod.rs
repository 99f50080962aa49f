//! One-shot conversion pipeline: extract, strip boilerplate, normalize,
//! deduplicate images, compose.

use log::{debug, info};
use serde::Serialize;

use crate::clean::{BoilerplateDetector, TextNormalizer};
use crate::compose::{self, ComposeOptions};
use crate::dedup;
use crate::detect::SourceFormat;
use crate::error::Result;
use crate::extract::extractor_for;
use crate::model::NormalizedDocument;

/// Target document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Pdf,
    Word,
}

impl OutputFormat {
    /// File extension for the produced document, without a dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Word => "docx",
        }
    }

    /// MIME type of the produced document.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Pdf => write!(f, "pdf"),
            OutputFormat::Word => write!(f, "word"),
        }
    }
}

/// Everything a single conversion needs besides the input bytes.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub source_format: SourceFormat,
    pub output_format: OutputFormat,
    /// Extract, deduplicate and render embedded images.
    pub include_images: bool,
    /// Output file stem override; the extension is always derived from
    /// the output format.
    pub output_name: Option<String>,
    pub compose_options: ComposeOptions,
}

impl ConversionRequest {
    pub fn new(source_format: SourceFormat, output_format: OutputFormat) -> Self {
        ConversionRequest {
            source_format,
            output_format,
            include_images: false,
            output_name: None,
            compose_options: ComposeOptions::default(),
        }
    }

    pub fn with_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }

    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }
}

/// Counters describing what the pipeline saw and kept.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ConversionStats {
    /// Raw units (pages/slides/pseudo-pages) extracted.
    pub units: usize,
    /// Distinct line fragments flagged as boilerplate.
    pub boilerplate_fragments: usize,
    /// Paragraphs in the normalized document.
    pub paragraphs: usize,
    /// Images admitted by extraction, before deduplication.
    pub images_extracted: usize,
    /// Images surviving deduplication.
    pub images_kept: usize,
}

/// A finished conversion: the output bytes plus naming metadata.
pub struct ConvertResult {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub extension: &'static str,
    /// Stem override carried over from the request.
    pub output_name: Option<String>,
    pub stats: ConversionStats,
}

impl ConvertResult {
    /// File name for the output, using the request's stem override when
    /// present and non-blank, else `fallback_stem`.
    pub fn file_name(&self, fallback_stem: &str) -> String {
        let stem = self
            .output_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback_stem);
        format!("{}.{}", stem, self.extension)
    }
}

/// Run the whole pipeline over an in-memory input document.
pub fn convert_bytes(data: &[u8], request: &ConversionRequest) -> Result<ConvertResult> {
    let extractor = extractor_for(request.source_format);
    info!(
        "converting {} input ({} bytes) to {}",
        extractor.name(),
        data.len(),
        request.output_format
    );

    let units = extractor.extract_text(data)?;
    debug!("extracted {} units", units.len());

    let detector = BoilerplateDetector::default();
    let boilerplate = detector.detect(&units);
    let cleaned = detector.filter(&units, &boilerplate);
    debug!("boilerplate pass: {} fragments flagged", boilerplate.len());

    let normalizer = TextNormalizer::new();
    let normalized = normalizer.normalize(&cleaned.join("\n\n"));
    let document = NormalizedDocument::from_normalized_text(&normalized);

    let (images_extracted, images) = if request.include_images {
        let extracted = extractor.extract_images(data);
        let extracted_count = extracted.len();
        let kept = dedup::dedup(extracted);
        debug!(
            "image pass: {} extracted, {} kept after dedup",
            extracted_count,
            kept.len()
        );
        (extracted_count, kept)
    } else {
        (0, Vec::new())
    };

    let stats = ConversionStats {
        units: units.len(),
        boilerplate_fragments: boilerplate.len(),
        paragraphs: document.len(),
        images_extracted,
        images_kept: images.len(),
    };

    let bytes = compose::compose(
        &document,
        &images,
        request.output_format,
        &request.compose_options,
    )?;
    info!(
        "composed {} output: {} bytes, {} paragraphs, {} images",
        request.output_format,
        bytes.len(),
        stats.paragraphs,
        stats.images_kept
    );

    Ok(ConvertResult {
        bytes,
        mime_type: request.output_format.mime_type(),
        extension: request.output_format.extension(),
        output_name: request.output_name.clone(),
        stats,
    })
}
