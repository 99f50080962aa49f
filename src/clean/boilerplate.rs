//! Detection and removal of text repeated across units (running
//! headers, footers, slide numbers).
//!
//! Headers and footers repeat near-identically across most pages without
//! being exact-substring matches of arbitrary length, so detection works
//! on short, whitespace-collapsed line fragments rather than whole-page
//! diffing. The length and word-count filters keep recurring short body
//! sentences out of the candidate pool while still catching running
//! titles.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::model::RawUnit;

/// Tunables for boilerplate detection.
#[derive(Debug, Clone)]
pub struct BoilerplateOptions {
    /// Minimum candidate line length in characters.
    pub min_len: usize,
    /// Maximum candidate line length in characters.
    pub max_len: usize,
    /// Candidate lines must have fewer words than this; longer lines are
    /// assumed to be body content.
    pub max_words: usize,
    /// A candidate is boilerplate when the fraction of distinct units
    /// containing it exceeds this threshold (strictly).
    pub repeat_threshold: f64,
}

impl Default for BoilerplateOptions {
    fn default() -> Self {
        Self {
            min_len: 5,
            max_len: 100,
            max_words: 20,
            repeat_threshold: 0.35,
        }
    }
}

/// The set of normalized line fragments deemed repeated noise.
///
/// Computed once per document and consumed read-only during unit
/// filtering.
#[derive(Debug, Clone, Default)]
pub struct BoilerplateSet {
    fragments: HashSet<String>,
}

impl BoilerplateSet {
    /// Number of detected fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether no fragments were detected.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Whether the exact fragment was flagged.
    pub fn contains(&self, fragment: &str) -> bool {
        self.fragments.contains(fragment)
    }

    /// Whether a normalized line should be dropped.
    ///
    /// A line is dropped when it embeds a flagged fragment and is shorter
    /// than twice the fragment's length — the length guard keeps a footer
    /// fragment from also deleting a long paragraph that quotes it.
    /// Purely numeric lines of up to four digits (page numbers) are
    /// always dropped, independent of the repeat threshold.
    pub fn is_junk_line(&self, line: &str) -> bool {
        let line_chars = line.chars().count();
        if !line.is_empty() && line_chars <= 4 && line.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }
        self.fragments
            .iter()
            .any(|frag| line.contains(frag.as_str()) && line_chars < 2 * frag.chars().count())
    }
}

/// Detects repeated fragments across units and strips them.
pub struct BoilerplateDetector {
    options: BoilerplateOptions,
    re_collapse: Regex,
}

impl BoilerplateDetector {
    /// Create a detector with the given options.
    pub fn new(options: BoilerplateOptions) -> Self {
        Self {
            options,
            re_collapse: Regex::new(r"\s+").unwrap(),
        }
    }

    fn collapse(&self, line: &str) -> String {
        self.re_collapse.replace_all(line, " ").trim().to_string()
    }

    /// Compute the boilerplate set over all units of a document.
    ///
    /// Every unit counts toward the denominator, including text-less
    /// ones; each candidate is counted at most once per unit.
    pub fn detect(&self, units: &[RawUnit]) -> BoilerplateSet {
        let total_units = units.len();
        if total_units == 0 {
            return BoilerplateSet::default();
        }

        let mut counts: HashMap<String, usize> = HashMap::new();
        for unit in units {
            let mut counted: HashSet<String> = HashSet::new();
            for raw_line in unit.text.split('\n') {
                let line = self.collapse(raw_line);
                if line.is_empty() {
                    continue;
                }
                let chars = line.chars().count();
                if chars < self.options.min_len || chars > self.options.max_len {
                    continue;
                }
                if line.split_whitespace().count() >= self.options.max_words {
                    continue;
                }
                if counted.insert(line.clone()) {
                    *counts.entry(line).or_insert(0) += 1;
                }
            }
        }

        let fragments = counts
            .into_iter()
            .filter(|(_, count)| *count as f64 / total_units as f64 > self.options.repeat_threshold)
            .map(|(line, _)| line)
            .collect();

        BoilerplateSet { fragments }
    }

    /// Strip boilerplate lines from every unit.
    ///
    /// Returns one cleaned string per unit, in order: surviving lines are
    /// whitespace-collapsed and space-joined (unit-internal line breaks
    /// carry no meaning after boilerplate removal). Units whose lines are
    /// all junk come back empty.
    pub fn filter(&self, units: &[RawUnit], junk: &BoilerplateSet) -> Vec<String> {
        units
            .iter()
            .map(|unit| {
                let kept: Vec<String> = unit
                    .text
                    .split('\n')
                    .map(|raw_line| self.collapse(raw_line))
                    .filter(|line| !line.is_empty() && !junk.is_junk_line(line))
                    .collect();
                kept.join(" ")
            })
            .collect()
    }

    /// Detect and strip in one pass.
    pub fn clean(&self, units: &[RawUnit]) -> (Vec<String>, BoilerplateSet) {
        let junk = self.detect(units);
        let cleaned = self.filter(units, &junk);
        (cleaned, junk)
    }
}

impl Default for BoilerplateDetector {
    fn default() -> Self {
        Self::new(BoilerplateOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units_from(texts: &[&str]) -> Vec<RawUnit> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| RawUnit::new(i, *t))
            .collect()
    }

    #[test]
    fn test_repeated_footer_detected() {
        let detector = BoilerplateDetector::default();
        // "Page Footer" on 2 of 5 units = 40% > 35%
        let units = units_from(&[
            "Alpha body text here\nPage Footer",
            "Beta body text here\nPage Footer",
            "Gamma body text here",
            "Delta body text here",
            "Epsilon body text here",
        ]);
        let junk = detector.detect(&units);
        assert!(junk.contains("Page Footer"));

        let cleaned = detector.filter(&units, &junk);
        assert!(cleaned.iter().all(|c| !c.contains("Page Footer")));
        assert!(cleaned[0].contains("Alpha body text here"));
    }

    #[test]
    fn test_rare_line_retained() {
        let detector = BoilerplateDetector::default();
        // "Rare line" on 1 of 10 units = 10% — retained
        let mut texts = vec!["Rare line\nSome body text"];
        for _ in 0..9 {
            texts.push("Other body text");
        }
        let units = units_from(&texts);
        let (cleaned, junk) = detector.clean(&units);
        assert!(!junk.contains("Rare line"));
        assert!(cleaned[0].contains("Rare line"));
    }

    #[test]
    fn test_numeric_footer_always_stripped() {
        let detector = BoilerplateDetector::default();
        let units = units_from(&[
            "Body content on this page\n42",
            "Entirely different text here",
            "More unrelated content here",
        ]);
        let (cleaned, junk) = detector.clean(&units);
        assert!(junk.is_empty());
        assert_eq!(cleaned[0], "Body content on this page");

        // Five digits is no longer a page number
        let units = units_from(&[
            "Body content on this page\n12345",
            "Entirely different text here",
            "More unrelated content here",
        ]);
        let (cleaned, _) = detector.clean(&units);
        assert!(cleaned[0].contains("12345"));
    }

    #[test]
    fn test_threshold_is_strict() {
        let options = BoilerplateOptions {
            repeat_threshold: 0.5,
            ..Default::default()
        };
        let detector = BoilerplateDetector::new(options);
        // Exactly 50% of units: not strictly greater, so retained
        let units = units_from(&["Running Header\nBody a", "Body b"]);
        let junk = detector.detect(&units);
        assert!(!junk.contains("Running Header"));
    }

    #[test]
    fn test_counted_once_per_unit() {
        let detector = BoilerplateDetector::default();
        // Fragment occurs 3 times inside one unit out of 4 = 25% of units
        let units = units_from(&[
            "Repeat me\nRepeat me\nRepeat me",
            "Body one",
            "Body two",
            "Body three",
        ]);
        let junk = detector.detect(&units);
        assert!(!junk.contains("Repeat me"));
    }

    #[test]
    fn test_long_quote_survives_substring_match() {
        let detector = BoilerplateDetector::default();
        let footer = "Confidential draft";
        let quote = "He wrote that the Confidential draft was leaked to the press on Tuesday";
        let units = units_from(&[
            &format!("{}\n{}", quote, footer),
            footer,
            footer,
            "Unrelated body text",
        ]);
        let (cleaned, junk) = detector.clean(&units);
        assert!(junk.contains(footer));
        // The short footer line is dropped, the long quoting line survives
        assert!(cleaned[0].contains("leaked to the press"));
        assert!(cleaned[1].is_empty());
    }

    #[test]
    fn test_word_count_filter() {
        let detector = BoilerplateDetector::default();
        let sentence = "this recurring sentence has quite a few words in it and \
                        therefore is body content not a running header of any kind";
        let units = units_from(&[sentence, sentence, sentence]);
        let junk = detector.detect(&units);
        assert!(junk.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let detector = BoilerplateDetector::default();
        let (cleaned, junk) = detector.clean(&[]);
        assert!(cleaned.is_empty());
        assert!(junk.is_empty());
    }
}
