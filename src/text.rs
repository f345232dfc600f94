//! Markdown emphasis stripping for generator output
//!
//! The generator is prone to injecting `**bold**` and `*italic*` markers
//! into sentences despite being told not to. Every sentence that reaches
//! the user or a report passes through here first.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD_STARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
// Single-star italics are only stripped around non-space runs so a lone
// asterisk in running text survives. Runs after BOLD_STARS, so no `**`
// remains to mis-match.
static ITALIC_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*\s]+)\*").unwrap());
static BOLD_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"__([^_]+)__").unwrap());
static ITALIC_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_([^_\s]+)_").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Remove bold/italic markers and collapse extra whitespace.
///
/// Blank input comes back as an empty string.
pub fn strip_markdown(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let cleaned = BOLD_STARS.replace_all(text, "$1");
    let cleaned = ITALIC_STAR.replace_all(&cleaned, "$1");
    let cleaned = BOLD_UNDERSCORES.replace_all(&cleaned, "$1");
    let cleaned = ITALIC_UNDERSCORE.replace_all(&cleaned, "$1");

    WHITESPACE_RUN.replace_all(&cleaned, " ").trim().to_string()
}

/// Remove bold/italic markers but leave whitespace alone.
///
/// Used for multi-paragraph text where collapsing whitespace would
/// destroy the paragraph breaks.
pub fn strip_emphasis(text: &str) -> String {
    let cleaned = BOLD_STARS.replace_all(text, "$1");
    let cleaned = ITALIC_STAR.replace_all(&cleaned, "$1");
    let cleaned = BOLD_UNDERSCORES.replace_all(&cleaned, "$1");
    ITALIC_UNDERSCORE.replace_all(&cleaned, "$1").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_bold_stars() {
        assert_eq!(
            strip_markdown("The **ubiquitous** logo is everywhere."),
            "The ubiquitous logo is everywhere."
        );
    }

    #[test]
    fn test_strips_italic_stars() {
        assert_eq!(strip_markdown("An *important* point."), "An important point.");
    }

    #[test]
    fn test_strips_underscores() {
        assert_eq!(strip_markdown("__bold__ and _italic_"), "bold and italic");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(
            strip_markdown("No markup here at all."),
            "No markup here at all."
        );
    }

    #[test]
    fn test_collapses_whitespace_and_trims() {
        assert_eq!(strip_markdown("  spaced   out  "), "spaced out");
    }

    #[test]
    fn test_strip_emphasis_keeps_paragraphs() {
        assert_eq!(
            strip_emphasis("First **bold** line.\n\nSecond *line*."),
            "First bold line.\n\nSecond line."
        );
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(strip_markdown(""), "");
        assert_eq!(strip_markdown("   "), "");
    }
}
