//! Text-stream types: raw per-unit text and the normalized paragraph stream.

use serde::{Deserialize, Serialize};

/// One page (PDF), slide (PowerPoint) or paragraph group (Word) of raw
/// extracted text.
///
/// Units are the granularity at which boilerplate repetition is measured.
/// The text may span multiple lines and is untouched by any cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUnit {
    /// 0-based position of the unit in the source document.
    pub index: usize,
    /// Raw extracted text, possibly empty and possibly multi-line.
    pub text: String,
}

impl RawUnit {
    /// Create a new raw unit.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Whether the unit carries no visible text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The normalized paragraph stream produced by the text normalizer.
///
/// Invariants: every paragraph is non-empty after trimming and contains
/// no literal blank line (`"\n\n"` is the paragraph delimiter one level
/// up, never part of a paragraph).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    /// Ordered paragraph strings.
    pub paragraphs: Vec<String>,
}

impl NormalizedDocument {
    /// Build a document from already-normalized text, splitting on blank
    /// lines and dropping empty fragments.
    pub fn from_normalized_text(text: &str) -> Self {
        let paragraphs = text
            .split("\n\n")
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string())
            .collect();
        Self { paragraphs }
    }

    /// Number of paragraphs.
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Whether the document has no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// The full text with paragraphs separated by one blank line.
    pub fn plain_text(&self) -> String {
        self.paragraphs.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_unit() {
        let unit = RawUnit::new(0, "Header\nBody text");
        assert_eq!(unit.index, 0);
        assert!(!unit.is_empty());
        assert!(RawUnit::new(3, "  \n ").is_empty());
    }

    #[test]
    fn test_from_normalized_text() {
        let doc = NormalizedDocument::from_normalized_text("First.\n\nSecond.\n\n\n");
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.paragraphs[0], "First.");
        assert_eq!(doc.paragraphs[1], "Second.");
        assert!(doc.paragraphs.iter().all(|p| !p.contains("\n\n")));
    }

    #[test]
    fn test_plain_text_round() {
        let doc = NormalizedDocument::from_normalized_text("A\n\nB");
        assert_eq!(doc.plain_text(), "A\n\nB");
    }

    #[test]
    fn test_empty_document() {
        let doc = NormalizedDocument::from_normalized_text("   \n\n ");
        assert!(doc.is_empty());
    }
}
