//! Highlight rules for rendered diffs.
//!
//! A rule pairs a [`HighlightCategory`] with a regular expression over the
//! whole diff text. Rules are anchored to the start of a line: the pattern
//! matches either at the start of the text or right after a `\n`.

use std::ops::Range;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DiffError, Result};

/// Pattern for lines added on the right.
pub const ADDED_PATTERN: &str = r"(^|\n)\+.*";
/// Pattern for lines removed from the left.
pub const REMOVED_PATTERN: &str = r"(^|\n)-.*";
/// Pattern for intraline guide lines.
pub const EXPLANATION_PATTERN: &str = r"(^|\n)\?.*";

/// What a highlighted region represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightCategory {
    Added,
    Removed,
    Explanation,
}

/// A category with the pattern selecting its lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRule {
    pub category: HighlightCategory,
    pub pattern: String,
}

/// One match of a rule in a diff text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightSpan {
    pub category: HighlightCategory,
    /// Byte range of the highlighted line, without the preceding newline.
    pub range: Range<usize>,
}

impl HighlightRule {
    pub fn new(category: HighlightCategory, pattern: impl Into<String>) -> Self {
        Self {
            category,
            pattern: pattern.into(),
        }
    }

    /// Rule matching every line that starts with `prefix`.
    pub fn line_prefix(category: HighlightCategory, prefix: char) -> Self {
        let escaped = regex::escape(prefix.encode_utf8(&mut [0; 4]));
        Self::new(category, format!(r"(^|\n){escaped}.*"))
    }

    /// Compile the pattern.
    pub fn regex(&self) -> Result<Regex> {
        Regex::new(&self.pattern).map_err(|source| DiffError::InvalidPattern {
            pattern: self.pattern.clone(),
            source,
        })
    }
}

/// The rules shared by every ndiff-style engine.
pub fn ndiff_rules() -> Vec<HighlightRule> {
    vec![
        HighlightRule::new(HighlightCategory::Added, ADDED_PATTERN),
        HighlightRule::new(HighlightCategory::Removed, REMOVED_PATTERN),
        HighlightRule::new(HighlightCategory::Explanation, EXPLANATION_PATTERN),
    ]
}

/// Apply `rules` to `text`, in rule order.
pub fn spans(text: &str, rules: &[HighlightRule]) -> Result<Vec<HighlightSpan>> {
    let mut spans = Vec::new();
    for rule in rules {
        let regex = rule.regex()?;
        for m in regex.find_iter(text) {
            let start = if text[m.start()..].starts_with('\n') {
                m.start() + 1
            } else {
                m.start()
            };
            spans.push(HighlightSpan {
                category: rule.category,
                range: start..m.end(),
            });
        }
    }
    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_match_only_line_starts() {
        let text = "  a - b\n- c\n+ d\n? ^";
        let spans = spans(text, &ndiff_rules()).unwrap();
        let found: Vec<_> = spans
            .iter()
            .map(|s| (s.category, &text[s.range.clone()]))
            .collect();
        assert_eq!(
            found,
            vec![
                (HighlightCategory::Added, "+ d"),
                (HighlightCategory::Removed, "- c"),
                (HighlightCategory::Explanation, "? ^"),
            ]
        );
    }

    #[test]
    fn first_line_is_matched_without_newline() {
        let spans = spans("- gone\n  kept", &ndiff_rules()).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].range, 0..6);
    }

    #[test]
    fn line_prefix_escapes_metacharacters() {
        let rule = HighlightRule::line_prefix(HighlightCategory::Explanation, '[');
        let regex = rule.regex().unwrap();
        assert!(regex.is_match("[...]"));
        assert!(regex.is_match("  a\n[...]"));
        assert!(!regex.is_match("  [...]"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let rule = HighlightRule::new(HighlightCategory::Added, "(");
        assert!(matches!(rule.regex(), Err(DiffError::InvalidPattern { .. })));
    }

    #[test]
    fn category_serializes_snake_case() {
        let json = serde_json::to_string(&HighlightCategory::Explanation).unwrap();
        assert_eq!(json, "\"explanation\"");
    }
}
