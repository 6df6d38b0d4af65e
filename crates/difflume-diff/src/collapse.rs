//! Context collapsing for annotated diff lines.
//!
//! Keeps every changed line (`+`, `-`, `?`) plus up to `preserve_rows`
//! lines of context on each side of it. Each run of dropped lines is
//! replaced by a single delimiter line.
//!
//! The context before a change is always the `preserve_rows` lines that
//! precede it, whatever they are. The context after a change counts only
//! unchanged lines and restarts at every new change.

use std::collections::VecDeque;

const CHANGE_PREFIXES: &[char] = &['+', '-', '?'];

/// Collapse annotated diff `lines`, returning the lines to display.
///
/// Returns an empty list when no line is a change.
///
/// # Examples
///
/// ```
/// use difflume_diff::collapse;
///
/// let lines = ["  a", "  b", "  c", "- d", "+ e", "  f", "  g", "  h"];
/// assert_eq!(
///     collapse(&lines, 1, "[...]"),
///     vec!["[...]", "  c", "- d", "+ e", "  f", "[...]"]
/// );
/// ```
pub fn collapse<'a, S: AsRef<str>>(
    lines: &'a [S],
    preserve_rows: usize,
    delimiter: &'a str,
) -> Vec<&'a str> {
    let kept = kept_lines(lines, preserve_rows);

    let mut output = Vec::new();
    let mut previous: Option<usize> = None;
    for (i, line) in lines.iter().enumerate() {
        if !kept[i] {
            continue;
        }
        let gap = match previous {
            Some(p) => p + 1 != i,
            None => i != 0,
        };
        if gap {
            output.push(delimiter);
        }
        output.push(line.as_ref());
        previous = Some(i);
    }

    if previous.is_some() && kept.last() == Some(&false) {
        output.push(delimiter);
    }
    output
}

/// Whether an annotated line is a change rather than context.
pub fn is_change(line: &str) -> bool {
    line.starts_with(CHANGE_PREFIXES)
}

fn kept_lines<S: AsRef<str>>(lines: &[S], preserve_rows: usize) -> Vec<bool> {
    let mut kept = vec![false; lines.len()];
    let mut lookback: VecDeque<usize> = VecDeque::with_capacity(preserve_rows);
    let mut distance = preserve_rows.saturating_add(1);

    for (i, line) in lines.iter().enumerate() {
        if is_change(line.as_ref()) {
            for &before in &lookback {
                kept[before] = true;
            }
            kept[i] = true;
            distance = 0;
        } else {
            distance = distance.saturating_add(1);
            if distance <= preserve_rows {
                kept[i] = true;
            }
        }

        if preserve_rows > 0 {
            if lookback.len() == preserve_rows {
                lookback.pop_front();
            }
            lookback.push_back(i);
        }
    }
    kept
}
