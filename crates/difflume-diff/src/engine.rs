//! Diff engines and the name-based engine selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collapse::collapse;
use crate::error::{DiffError, Result};
use crate::highlight::{self, HighlightCategory, HighlightRule, HighlightSpan};
use crate::ndiff::ndiff;

/// Default number of context rows kept around a change when collapsing.
pub const DEFAULT_PRESERVE_ROWS: usize = 2;

/// Default marker for collapsed regions.
pub const DEFAULT_DELIMITER: &str = "[...]";

/// A diff text together with the rules to highlight it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub text: String,
    pub highlights: Vec<HighlightRule>,
}

impl DiffResult {
    /// Returns `true` if the diff has no output at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of `+` lines.
    pub fn added_lines(&self) -> usize {
        self.text.lines().filter(|l| l.starts_with('+')).count()
    }

    /// Number of `-` lines.
    pub fn removed_lines(&self) -> usize {
        self.text.lines().filter(|l| l.starts_with('-')).count()
    }

    /// Every highlighted region of the text.
    pub fn spans(&self) -> Result<Vec<HighlightSpan>> {
        highlight::spans(&self.text, &self.highlights)
    }
}

/// A line diff algorithm plus its highlight rules.
pub trait DiffEngine: Send + Sync {
    /// Diff `left` against `right`, returning `\n`-joined annotated lines.
    fn diff(&self, left: &str, right: &str) -> String;

    /// Rules for highlighting this engine's output.
    fn highlight_rules(&self) -> Vec<HighlightRule>;

    /// Diff and bundle the result with its highlight rules.
    fn create_diff(&self, left: &str, right: &str) -> DiffResult {
        let text = self.diff(left, right);
        debug!(lines = text.lines().count(), "diff created");
        DiffResult {
            text,
            highlights: self.highlight_rules(),
        }
    }
}

/// Full line diff with intraline guide lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ndiff;

impl DiffEngine for Ndiff {
    fn diff(&self, left: &str, right: &str) -> String {
        format_lines(ndiff(left, right))
    }

    fn highlight_rules(&self) -> Vec<HighlightRule> {
        highlight::ndiff_rules()
    }
}

/// [`Ndiff`] with far-away context collapsed behind a delimiter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NdiffCollapsed {
    pub preserve_rows: usize,
    pub delimiter: String,
}

impl NdiffCollapsed {
    pub fn new(preserve_rows: usize, delimiter: impl Into<String>) -> Self {
        Self {
            preserve_rows,
            delimiter: delimiter.into(),
        }
    }
}

impl Default for NdiffCollapsed {
    fn default() -> Self {
        Self::new(DEFAULT_PRESERVE_ROWS, DEFAULT_DELIMITER)
    }
}

impl DiffEngine for NdiffCollapsed {
    fn diff(&self, left: &str, right: &str) -> String {
        let lines = ndiff(left, right);
        format_lines(collapse(&lines, self.preserve_rows, &self.delimiter))
    }

    fn highlight_rules(&self) -> Vec<HighlightRule> {
        let mut rules = highlight::ndiff_rules();
        if let Some(first) = self.delimiter.chars().next() {
            rules.push(HighlightRule::line_prefix(HighlightCategory::Explanation, first));
        }
        rules
    }
}

fn format_lines<S: AsRef<str>>(lines: impl IntoIterator<Item = S>) -> String {
    lines
        .into_iter()
        .map(|line| line.as_ref().trim_end().to_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The available diff variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffType {
    #[default]
    Ndiff,
    NdiffCollapsed,
}

impl DiffType {
    pub const ALL: [DiffType; 2] = [DiffType::Ndiff, DiffType::NdiffCollapsed];

    pub fn name(&self) -> &'static str {
        match self {
            DiffType::Ndiff => "ndiff",
            DiffType::NdiffCollapsed => "ndiff_collapsed",
        }
    }

    /// The engine for this variant with default parameters.
    pub fn engine(&self) -> Box<dyn DiffEngine> {
        match self {
            DiffType::Ndiff => Box::new(Ndiff),
            DiffType::NdiffCollapsed => Box::new(NdiffCollapsed::default()),
        }
    }
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DiffType {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ndiff" => Ok(DiffType::Ndiff),
            "ndiff_collapsed" | "ndiff-collapsed" => Ok(DiffType::NdiffCollapsed),
            other => Err(DiffError::UnknownDiffType(other.to_string())),
        }
    }
}

/// Look up an engine by variant name.
pub fn select_engine(name: &str) -> Result<Box<dyn DiffEngine>> {
    Ok(name.parse::<DiffType>()?.engine())
}

/// Diff two texts with the default engine of `diff_type`.
pub fn create_diff(left: &str, right: &str, diff_type: DiffType) -> DiffResult {
    diff_type.engine().create_diff(left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collapse::is_change;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const PERSON: &str = r#"{
    "name": "John",
    "surname": "Doe",
    "birth": "1980-01-01",
    "sex": "male",
    "age": 30,
    "city": "New York",
    "children": 1,
    "hobbies": [
        "football",
        "programming",
        "reading"
    ]
}
"#;

    #[test]
    fn ndiff_marks_changed_digit() {
        let left = "{\n    \"name\": \"John\",\n    \"age\": 30,\n    \"city\": \"New York\"\n}\n";
        let right = left.replace("30", "31");
        let expected = r#"  {
      "name": "John",
-     "age": 30,
?             ^
+     "age": 31,
?             ^
      "city": "New York"
  }"#;
        assert_eq!(Ndiff.diff(left, &right), expected);
    }

    #[test]
    fn plain_scenario_line_prefixes() {
        let result = create_diff("a\nb\nc", "a\nx\nc", DiffType::Ndiff);
        assert_eq!(result.text, "  a\n- b\n+ x\n  c");
        assert_eq!(result.added_lines(), 1);
        assert_eq!(result.removed_lines(), 1);
    }

    #[test]
    fn collapsed_single_change() {
        let right = PERSON.replace("\"age\": 30", "\"age\": 31");
        let expected = r#"[...]
      "birth": "1980-01-01",
      "sex": "male",
-     "age": 30,
?             ^
+     "age": 31,
?             ^
      "city": "New York",
      "children": 1,
[...]"#;
        assert_eq!(NdiffCollapsed::default().diff(PERSON, &right), expected);
    }

    #[test]
    fn collapsed_in_middle() {
        let right = PERSON
            .replace("\"Doe\"", "\"Doe JR\"")
            .replace("\"hobbies\"", "\"interests\"");
        let expected = r#"  {
      "name": "John",
-     "surname": "Doe",
+     "surname": "Doe JR",
?                    +++
      "birth": "1980-01-01",
      "sex": "male",
[...]
      "city": "New York",
      "children": 1,
-     "hobbies": [
+     "interests": [
          "football",
          "programming",
[...]"#;
        assert_eq!(NdiffCollapsed::default().diff(PERSON, &right), expected);
    }

    #[test]
    fn collapsed_empty_texts() {
        assert_eq!(NdiffCollapsed::default().diff("", ""), "");
    }

    #[test]
    fn collapsed_rules_mark_delimiter() {
        let rules = NdiffCollapsed::default().highlight_rules();
        assert_eq!(rules.len(), 4);
        assert_eq!(rules[3].category, HighlightCategory::Explanation);
        assert!(rules[3].regex().unwrap().is_match("a\n[...]"));
    }

    #[test]
    fn collapsed_without_delimiter_has_no_extra_rule() {
        assert_eq!(NdiffCollapsed::new(2, "").highlight_rules().len(), 3);
    }

    #[test]
    fn trailing_whitespace_is_stripped() {
        assert_eq!(Ndiff.diff("a  \nb", "a  \nc"), "  a\n- b\n+ c");
    }

    #[test]
    fn diff_type_from_name() {
        assert_eq!("ndiff".parse::<DiffType>().unwrap(), DiffType::Ndiff);
        assert_eq!(
            "ndiff_collapsed".parse::<DiffType>().unwrap(),
            DiffType::NdiffCollapsed
        );
        for t in DiffType::ALL {
            assert_eq!(t.name().parse::<DiffType>().unwrap(), t);
        }
    }

    #[test]
    fn unknown_diff_type_is_an_error() {
        assert!(matches!(
            select_engine("unified"),
            Err(DiffError::UnknownDiffType(name)) if name == "unified"
        ));
    }

    #[test]
    fn result_serializes_with_rules() {
        let result = create_diff("a", "b", DiffType::Ndiff);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["text"], "- a\n+ b");
        assert_eq!(json["highlights"][0]["category"], "added");
    }

    #[test]
    fn spans_cover_changed_lines() {
        let result = create_diff("a\nb", "a\nc", DiffType::Ndiff);
        let spans = result.spans().unwrap();
        let categories: Vec<_> = spans.iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            vec![HighlightCategory::Added, HighlightCategory::Removed]
        );
    }

    fn text() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-c ]{0,4}", 0..12).prop_map(|lines| lines.join("\n"))
    }

    proptest! {
        #[test]
        fn identical_texts_have_no_changes(t in text()) {
            let result = create_diff(&t, &t, DiffType::Ndiff);
            prop_assert!(result.text.lines().all(|l| !is_change(l)));
        }

        #[test]
        fn identical_texts_collapse_to_nothing(t in text(), rows in 0usize..4) {
            prop_assert_eq!(NdiffCollapsed::new(rows, "[...]").diff(&t, &t), "");
        }

        #[test]
        fn collapsed_never_repeats_delimiter(a in text(), b in text(), rows in 0usize..4) {
            let out = NdiffCollapsed::new(rows, "[...]").diff(&a, &b);
            let lines: Vec<&str> = out.split('\n').collect();
            prop_assert!(lines.windows(2).all(|w| !(w[0] == "[...]" && w[1] == "[...]")));
        }

        #[test]
        fn collapsed_keeps_every_change(a in text(), b in text(), rows in 0usize..4) {
            let full = Ndiff.diff(&a, &b);
            let collapsed = NdiffCollapsed::new(rows, "[...]").diff(&a, &b);
            let changes = |s: &str| {
                s.lines()
                    .filter(|l| is_change(l))
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            };
            prop_assert_eq!(changes(&full), changes(&collapsed));
        }
    }
}
