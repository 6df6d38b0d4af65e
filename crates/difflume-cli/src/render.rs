//! Terminal rendering of diff results.

use std::collections::HashMap;

use colored::{ColoredString, Colorize};
use difflume_diff::{DiffResult, HighlightCategory};
use difflume_url::UrlParts;

/// Render `result` line by line, colouring each highlighted line.
///
/// A line takes the category of the first rule that matches it. With
/// `color` off the text is returned unchanged.
pub fn render_diff(result: &DiffResult, color: bool) -> anyhow::Result<String> {
    if !color {
        return Ok(result.text.clone());
    }

    let mut line_categories: HashMap<usize, HighlightCategory> = HashMap::new();
    for span in result.spans()? {
        line_categories.entry(span.range.start).or_insert(span.category);
    }

    let mut out = Vec::new();
    let mut offset = 0;
    for line in result.text.split('\n') {
        out.push(match line_categories.get(&offset).copied() {
            Some(category) => paint(line, category).to_string(),
            None => line.to_owned(),
        });
        offset += line.len() + 1;
    }
    Ok(out.join("\n"))
}

fn paint(line: &str, category: HighlightCategory) -> ColoredString {
    match category {
        HighlightCategory::Added => line.green(),
        HighlightCategory::Removed => line.red(),
        HighlightCategory::Explanation => line.cyan().dimmed(),
    }
}

/// Human-readable name for a source location.
///
/// URLs are shown as host plus decoded path; anything else, including a
/// URL whose path does not decode, is shown as given.
pub fn label(location: &str) -> String {
    let parts = UrlParts::parse(location);
    if parts.netloc.is_empty() {
        return location.to_owned();
    }
    match parts.display_path() {
        Ok(path) => format!("{}{}", parts.netloc, path),
        Err(_) => location.to_owned(),
    }
}

/// One-line summary of the changes in `result`.
pub fn summary(result: &DiffResult) -> String {
    if result.added_lines() == 0 && result.removed_lines() == 0 {
        "No differences.".to_string()
    } else {
        format!(
            "{} added, {} removed",
            result.added_lines(),
            result.removed_lines()
        )
    }
}
