//! Process-wide font selection table.
//!
//! Initialized once at first use and read-only afterwards. The body font
//! can be overridden with the `DOCREFLOW_BODY_FONT` env var; an unknown
//! value degrades to the Times fallback instead of aborting.

use log::warn;
use once_cell::sync::Lazy;

/// Environment variable naming the body font family.
pub const BODY_FONT_ENV: &str = "DOCREFLOW_BODY_FONT";

/// Resolved font selection shared by both composer arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontTable {
    /// PDF base-14 font name used in the PDF arm.
    pub base_font: &'static str,
    /// Run font family name used in the Word arm.
    pub word_font: &'static str,
}

const TIMES: FontTable = FontTable {
    base_font: "Times-Roman",
    word_font: "Times New Roman",
};

const HELVETICA: FontTable = FontTable {
    base_font: "Helvetica",
    word_font: "Arial",
};

const COURIER: FontTable = FontTable {
    base_font: "Courier",
    word_font: "Courier New",
};

static TABLE: Lazy<FontTable> = Lazy::new(|| match std::env::var(BODY_FONT_ENV) {
    Ok(value) => match value.to_ascii_lowercase().as_str() {
        "times" | "times-roman" => TIMES,
        "helvetica" | "arial" => HELVETICA,
        "courier" => COURIER,
        other => {
            warn!(
                "{}={:?} is not a registered font family, falling back to Times",
                BODY_FONT_ENV, other
            );
            TIMES
        }
    },
    Err(_) => TIMES,
});

/// The process-wide font table.
pub fn table() -> &'static FontTable {
    &TABLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_times() {
        // The Lazy cell is initialized without the env var in the test
        // environment.
        let table = table();
        assert_eq!(table.base_font, "Times-Roman");
        assert_eq!(table.word_font, "Times New Roman");
    }
}
