//! HTML report generation
//!
//! Self-contained HTML files written next to where the user ran the tool
//! (or the configured report directory). All user- and generator-supplied
//! text is escaped; nothing else in the crate emits HTML.

mod article;
mod daily;
mod words;

pub use article::write_article_report;
pub use daily::{render_daily_report, write_daily_report};
pub use words::{render_words_report, write_words_report};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

/// Escape the five HTML special characters
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// CSS class for a 0-10 score
pub(crate) fn score_class(score: u8) -> &'static str {
    if score >= 8 {
        "score-high"
    } else if score >= 5 {
        "score-medium"
    } else {
        "score-low"
    }
}

/// `{prefix}_{yyyyMMdd_HHmmss}.html`, with a `_{n}` suffix if that
/// name is already taken
pub(crate) fn unique_report_path(dir: &Path, prefix: &str) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let mut path = dir.join(format!("{prefix}_{timestamp}.html"));
    let mut counter = 1;
    while path.exists() && counter < 100 {
        path = dir.join(format!("{prefix}_{timestamp}_{counter}.html"));
        counter += 1;
    }
    path
}

pub(crate) fn write_report(dir: &Path, prefix: &str, html: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = unique_report_path(dir, prefix);
    std::fs::write(&path, html)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Footer timestamp shown on every report
pub(crate) fn generated_at() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"A & B's"</b>"#),
            "&lt;b&gt;&quot;A &amp; B&#39;s&quot;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_score_class_bands() {
        assert_eq!(score_class(10), "score-high");
        assert_eq!(score_class(8), "score-high");
        assert_eq!(score_class(7), "score-medium");
        assert_eq!(score_class(5), "score-medium");
        assert_eq!(score_class(4), "score-low");
        assert_eq!(score_class(0), "score-low");
    }

    #[test]
    fn test_unique_report_path_adds_counter() {
        let dir = tempfile::tempdir().unwrap();
        let first = unique_report_path(dir.path(), "IELTS_Report");
        std::fs::write(&first, "x").unwrap();
        let second = unique_report_path(dir.path(), "IELTS_Report");
        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with("_1.html"));
    }
}
