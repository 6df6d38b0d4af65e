//! Line diff with intraline guide lines.
//!
//! Lines are matched with [`SequenceMatcher`]. Inside every replaced region
//! the most similar pair of lines (similarity ≥ 0.75, spaces and tabs treated
//! as junk) is used as a synchronisation point: that pair is emitted as a
//! `-`/`+` pair followed by `?` guide lines, and the regions before and after
//! it are processed recursively. Regions without a similar pair are dumped as
//! plain removals and additions.

use similar::DiffTag;

use crate::matcher::{real_quick_ratio, SequenceMatcher};

/// Minimum similarity for two lines to be shown as one changed line.
const CUTOFF: f32 = 0.75;

/// Starting bar for the best similarity, just below [`CUTOFF`].
const INITIAL_BEST: f32 = 0.74;

/// Diff `left` against `right` line by line.
///
/// Returned lines carry their two-character prefix. Guide lines are
/// right-trimmed; other lines are returned verbatim.
///
/// # Examples
///
/// ```
/// use difflume_diff::ndiff;
///
/// let lines = ndiff("a\nb\nc", "a\nx\nc");
/// assert_eq!(lines, vec!["  a", "- b", "+ x", "  c"]);
/// ```
pub fn ndiff(left: &str, right: &str) -> Vec<String> {
    let a = split_lines(left);
    let b = split_lines(right);
    LineDiffer::new(&a, &b).run()
}

/// Split `text` at every line boundary, dropping the boundaries.
///
/// Besides `\n` and `\r\n`, a lone `\r`, vertical tab, form feed, the
/// file/group/record separators, NEL, and the Unicode line and paragraph
/// separators all end a line. A trailing boundary does not produce an empty
/// last line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_boundary(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
            chars.next();
            start += 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn is_character_junk(c: &char) -> bool {
    matches!(c, ' ' | '\t')
}

struct LineDiffer<'a> {
    a: &'a [&'a str],
    b: &'a [&'a str],
    a_chars: Vec<Vec<char>>,
    b_chars: Vec<Vec<char>>,
    out: Vec<String>,
}

impl<'a> LineDiffer<'a> {
    fn new(a: &'a [&'a str], b: &'a [&'a str]) -> Self {
        Self {
            a,
            b,
            a_chars: a.iter().map(|line| line.chars().collect()).collect(),
            b_chars: b.iter().map(|line| line.chars().collect()).collect(),
            out: Vec::with_capacity(a.len().max(b.len())),
        }
    }

    fn run(mut self) -> Vec<String> {
        let ops = SequenceMatcher::new(self.a, self.b).ops();
        for op in ops {
            let (tag, old, new) = op.as_tag_tuple();
            match tag {
                DiffTag::Equal => self.dump(' ', Side::Left, old.start, old.end),
                DiffTag::Delete => self.dump('-', Side::Left, old.start, old.end),
                DiffTag::Insert => self.dump('+', Side::Right, new.start, new.end),
                DiffTag::Replace => self.fancy_replace(old.start, old.end, new.start, new.end),
            }
        }
        self.out
    }

    fn dump(&mut self, tag: char, side: Side, lo: usize, hi: usize) {
        let lines = match side {
            Side::Left => self.a,
            Side::Right => self.b,
        };
        for line in &lines[lo..hi] {
            self.out.push(format!("{tag} {line}"));
        }
    }

    fn plain_replace(&mut self, alo: usize, ahi: usize, blo: usize, bhi: usize) {
        // The shorter block goes first.
        if bhi - blo < ahi - alo {
            self.dump('+', Side::Right, blo, bhi);
            self.dump('-', Side::Left, alo, ahi);
        } else {
            self.dump('-', Side::Left, alo, ahi);
            self.dump('+', Side::Right, blo, bhi);
        }
    }

    fn fancy_replace(&mut self, alo: usize, ahi: usize, blo: usize, bhi: usize) {
        let mut best_ratio = INITIAL_BEST;
        let mut best = None;
        let mut first_identical = None;

        for j in blo..bhi {
            for i in alo..ahi {
                if self.a[i] == self.b[j] {
                    first_identical.get_or_insert((i, j));
                    continue;
                }
                let (ac, bc) = (&self.a_chars[i], &self.b_chars[j]);
                if real_quick_ratio(ac.len(), bc.len()) <= best_ratio {
                    continue;
                }
                let matcher = SequenceMatcher::with_junk(ac, bc, Some(is_character_junk));
                if matcher.quick_ratio() > best_ratio {
                    let ratio = matcher.ratio();
                    if ratio > best_ratio {
                        best_ratio = ratio;
                        best = Some((i, j));
                    }
                }
            }
        }

        let (best_i, best_j, identical) = match (best, first_identical) {
            (Some((i, j)), _) if best_ratio >= CUTOFF => (i, j, false),
            (_, Some((i, j))) => (i, j, true),
            _ => {
                self.plain_replace(alo, ahi, blo, bhi);
                return;
            }
        };

        self.fancy_helper(alo, best_i, blo, best_j);

        if identical {
            self.out.push(format!("  {}", self.a[best_i]));
        } else {
            self.mark_intraline(best_i, best_j);
        }

        self.fancy_helper(best_i + 1, ahi, best_j + 1, bhi);
    }

    fn fancy_helper(&mut self, alo: usize, ahi: usize, blo: usize, bhi: usize) {
        if alo < ahi {
            if blo < bhi {
                self.fancy_replace(alo, ahi, blo, bhi);
            } else {
                self.dump('-', Side::Left, alo, ahi);
            }
        } else if blo < bhi {
            self.dump('+', Side::Right, blo, bhi);
        }
    }

    fn mark_intraline(&mut self, i: usize, j: usize) {
        let (ac, bc) = (&self.a_chars[i], &self.b_chars[j]);
        let matcher = SequenceMatcher::with_junk(ac, bc, Some(is_character_junk));

        let mut atags = String::with_capacity(ac.len());
        let mut btags = String::with_capacity(bc.len());
        for op in matcher.ops() {
            let (tag, old, new) = op.as_tag_tuple();
            let (fill_a, fill_b) = match tag {
                DiffTag::Replace => ('^', '^'),
                DiffTag::Delete => ('-', ' '),
                DiffTag::Insert => (' ', '+'),
                DiffTag::Equal => (' ', ' '),
            };
            atags.extend(std::iter::repeat(fill_a).take(old.len()));
            btags.extend(std::iter::repeat(fill_b).take(new.len()));
        }

        let atags = keep_original_whitespace(ac, &atags);
        let btags = keep_original_whitespace(bc, &btags);
        let (aline, bline) = (self.a[i], self.b[j]);

        self.out.push(format!("- {aline}"));
        push_guide(&mut self.out, &atags);
        self.out.push(format!("+ {bline}"));
        push_guide(&mut self.out, &btags);
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Keep tabs and other whitespace of the source line under blank guide
/// positions, so markers line up when rendered.
fn keep_original_whitespace(line: &[char], tags: &str) -> String {
    line.iter()
        .zip(tags.chars())
        .map(|(&c, tag)| if tag == ' ' && c.is_whitespace() { c } else { tag })
        .collect()
}

fn push_guide(out: &mut Vec<String>, tags: &str) {
    let tags = tags.trim_end();
    if !tags.is_empty() {
        out.push(format!("? {tags}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn identical_texts_are_all_context() {
        assert_eq!(ndiff("one\ntwo", "one\ntwo"), vec!["  one", "  two"]);
    }

    #[test]
    fn empty_texts_produce_nothing() {
        assert!(ndiff("", "").is_empty());
    }

    #[test]
    fn dissimilar_lines_are_plain_replace() {
        assert_eq!(ndiff("a\nb\nc", "a\nx\nc"), vec!["  a", "- b", "+ x", "  c"]);
    }

    #[test]
    fn plain_replace_puts_shorter_block_first() {
        assert_eq!(
            ndiff("aaa\nbbb\nccc", "zzz"),
            vec!["+ zzz", "- aaa", "- bbb", "- ccc"]
        );
    }

    #[test]
    fn similar_lines_get_guide_lines() {
        let left = "{\n    \"name\": \"John\",\n    \"age\": 30,\n    \"city\": \"New York\"\n}\n";
        let right = "{\n    \"name\": \"John\",\n    \"age\": 31,\n    \"city\": \"New York\"\n}\n";
        assert_eq!(
            ndiff(left, right),
            vec![
                "  {",
                "      \"name\": \"John\",",
                "-     \"age\": 30,",
                "?             ^",
                "+     \"age\": 31,",
                "?             ^",
                "      \"city\": \"New York\"",
                "  }",
            ]
        );
    }

    #[test]
    fn insertion_only_marks_right_line() {
        assert_eq!(
            ndiff("    \"surname\": \"Doe\",", "    \"surname\": \"Doe JR\","),
            vec![
                "-     \"surname\": \"Doe\",",
                "+     \"surname\": \"Doe JR\",",
                "?                    +++",
            ]
        );
    }

    #[test]
    fn deletion_only_marks_left_line() {
        assert_eq!(
            ndiff("hello big world", "hello world"),
            vec!["- hello big world", "?       ----", "+ hello world"]
        );
    }

    #[test]
    fn guide_keeps_tabs() {
        assert_eq!(
            ndiff("\tvalue = 1", "\tvalue = 2"),
            vec!["- \tvalue = 1", "? \t        ^", "+ \tvalue = 2", "? \t        ^"]
        );
    }

    #[test]
    fn carriage_return_alone_ends_a_line() {
        assert_eq!(ndiff("a\rb", "a\rc"), vec!["  a", "- b", "+ c"]);
    }

    #[test]
    fn split_lines_boundaries() {
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\r\nb\rc\n"), vec!["a", "b", "c"]);
        assert_eq!(split_lines("a\r\rb"), vec!["a", "", "b"]);
        assert_eq!(
            split_lines("a\x0bb\x0cc\x1cd\x1de\x1ef\u{85}g\u{2028}h\u{2029}i"),
            vec!["a", "b", "c", "d", "e", "f", "g", "h", "i"]
        );
        assert_eq!(split_lines("tab\tstays"), vec!["tab\tstays"]);
    }

    #[test]
    fn added_and_removed_lines() {
        assert_eq!(ndiff("a\nb", "a\nb\nc"), vec!["  a", "  b", "+ c"]);
        assert_eq!(ndiff("a\nb\nc", "a\nc"), vec!["  a", "- b", "  c"]);
    }
}
