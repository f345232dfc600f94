//! Normalization keys for duplicate detection
//!
//! Words and sentences are compared by a canonical key: lowercase,
//! punctuation-stripped, whitespace-collapsed. The same function runs at
//! record time and at lookup time; any asymmetry would leak duplicates.

/// Punctuation stripped from normalization keys
const STRIPPED_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '"', '\'', '(', ')', '[', ']', '{', '}',
];

/// Canonicalize a word or sentence into a comparable key.
///
/// Empty or whitespace-only input normalizes to the empty string.
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_strips_punctuation() {
        assert_eq!(normalize("Ubiquitous!"), "ubiquitous");
        assert_eq!(normalize("ubiquitous"), "ubiquitous");
        assert_eq!(
            normalize("The company's logo, sadly, is everywhere."),
            "the companys logo sadly is everywhere"
        );
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  hello   \t world \n"), "hello world");
    }

    #[test]
    fn test_normalize_empty_and_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t  "), "");
        assert_eq!(normalize("?!.,"), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for s in ["Hello, World!", "  (brackets) [and] {braces}  ", "", "a  b"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }
}
