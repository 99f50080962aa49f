//! Deterministic normalization of the boilerplate-filtered text stream.
//!
//! The transformation sequence is fixed and order-sensitive: later rules
//! assume earlier ones already ran. It is a best-effort repair of
//! extraction artifacts (fused words, missing spaces after punctuation,
//! layout-driven whitespace), not a grammar-aware reflow, and is applied
//! identically regardless of source format.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Literal substitution table applied right after NFC composition:
/// no-break space, soft hyphen, bullet glyphs and curly quotes.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("\u{00A0}", " "),  // no-break space
    ("\u{00AD}", ""),   // soft hyphen
    ("\u{2022}", "-"),  // •
    ("\u{25E6}", "-"),  // ◦
    ("\u{25CF}", "-"),  // ●
    ("\u{25AA}", "-"),  // ▪
    ("\u{2013}", "-"),  // en dash
    ("\u{2014}", "-"),  // em dash
    ("\u{00B7}", "-"),  // middle dot
    ("\u{F0B7}", "-"),  // private-use bullet (Wingdings)
    ("\u{201C}", "\""), // left curly double quote
    ("\u{201D}", "\""), // right curly double quote
    ("\u{201F}", "\""), // double high-reversed-9 quote
    ("\u{2019}", "'"),  // right curly single quote
    ("\u{2018}", "'"),  // left curly single quote
];

/// Sentence punctuation that must be followed by whitespace.
const SENTENCE_PUNCT: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Text normalizer with precompiled rules.
///
/// Normalization is idempotent: running it on its own output yields the
/// same text.
pub struct TextNormalizer {
    re_lower_upper: Regex,
    re_letter_digit: Regex,
    re_digit_letter: Regex,
    re_hspace: Regex,
    re_blank_lines: Regex,
}

impl TextNormalizer {
    /// Create a normalizer.
    ///
    /// The letter classes cover extended Latin as used by the Turkish
    /// alphabet (dotted/dotless I and cedilla variants) on top of ASCII.
    pub fn new() -> Self {
        Self {
            re_lower_upper: Regex::new(r"([a-zçğıöşü])([A-ZÇĞİÖŞÜ])").unwrap(),
            re_letter_digit: Regex::new(r"([A-Za-zÇĞİÖŞÜçğıöşü])([0-9])").unwrap(),
            re_digit_letter: Regex::new(r"([0-9])([A-Za-zÇĞİÖŞÜçğıöşü])").unwrap(),
            re_hspace: Regex::new(r"[ \t\x0B\x0C\r]+").unwrap(),
            re_blank_lines: Regex::new(r"\n\s*\n").unwrap(),
        }
    }

    /// Apply the full normalization sequence.
    pub fn normalize(&self, raw: &str) -> String {
        // 1. Unicode canonical composition
        let mut text: String = raw.nfc().collect();

        // 2. Literal substitutions
        for (from, to) in REPLACEMENTS {
            if text.contains(from) {
                text = text.replace(from, to);
            }
        }

        // 3. Space after sentence punctuation when none follows
        text = space_after_punctuation(&text);

        // 4. Space at a lowercase→uppercase boundary (words fused by
        //    layout-driven line breaks)
        text = self
            .re_lower_upper
            .replace_all(&text, "$1 $2")
            .into_owned();

        // 5. Spaces at letter↔digit boundaries, both directions
        text = self
            .re_letter_digit
            .replace_all(&text, "$1 $2")
            .into_owned();
        text = self
            .re_digit_letter
            .replace_all(&text, "$1 $2")
            .into_owned();

        // 6. Collapse runs of horizontal whitespace
        text = self.re_hspace.replace_all(&text, " ").into_owned();

        // 7. Collapse blank-line runs to exactly one blank line
        text = self.re_blank_lines.replace_all(&text, "\n\n").into_owned();

        // 8. Trim the whole result
        text.trim().to_string()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert a space after `. , ; : ! ?` when the next character is not
/// whitespace. A single forward scan with one character of lookahead;
/// the `regex` crate has no lookaround, and a scan stays correct for
/// adjacent punctuation (`".,"` becomes `". ,"` then `", "`).
fn space_after_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if SENTENCE_PUNCT.contains(&c) {
            if let Some(next) = chars.peek() {
                if !next.is_whitespace() {
                    out.push(' ');
                }
            }
        }
    }
    out
}
