//! Core contract types: clause segmentation, the multi-document corpus,
//! query intent and risk levels.

pub mod corpus;
pub mod intent;
pub mod risk;
pub mod segment;

pub use corpus::{Corpus, FileMap, FileRange};
pub use intent::{Intent, Step, classify};
pub use risk::RiskLevel;
pub use segment::segment;

use unicode_segmentation::UnicodeSegmentation;

/// Truncates `s` to at most `max` grapheme clusters, appending `...` when
/// anything was cut.
#[must_use]
pub fn truncate_graphemes(s: &str, max: usize) -> String {
    let mut graphemes = s.grapheme_indices(true);
    match graphemes.nth(max) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_unchanged() {
        assert_eq!(truncate_graphemes("short", 10), "short");
        assert_eq!(truncate_graphemes("exact", 5), "exact");
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate_graphemes("abcdefgh", 3), "abc...");
    }

    #[test]
    fn test_truncate_multibyte() {
        let s = "é".repeat(500);
        let out = truncate_graphemes(&s, 400);
        assert_eq!(out.chars().count(), 403);
        assert!(out.ends_with("..."));
    }
}
