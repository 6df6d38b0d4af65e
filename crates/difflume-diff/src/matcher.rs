//! Longest-matching-block sequence matcher.
//!
//! Finds the longest contiguous matching block between two sequences, then
//! recurses on the pieces to its left and right. The resulting blocks are
//! reported through a [`similar::algorithms::DiffHook`], so the output
//! composes with the rest of the `similar` ecosystem ([`DiffOp`],
//! [`get_diff_ratio`], ...).
//!
//! Two heuristics keep the matches "human-looking":
//!
//! - **Junk**: elements selected by a caller-supplied predicate never start a
//!   match, but may extend one at its edges.
//! - **Popular elements**: in sequences of at least 200 items, elements that
//!   account for more than 1% of the second sequence are ignored as match
//!   anchors.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use similar::algorithms::{Capture, DiffHook};
use similar::{get_diff_ratio, DiffOp};

/// Minimum length of the second sequence for the popular-element heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

/// A block `a[a..a + len] == b[b..b + len]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub len: usize,
}

/// Matcher over two borrowed sequences.
pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    /// Positions of every non-junk, non-popular element of `b`.
    b2j: HashMap<&'a T, Vec<usize>>,
    bjunk: HashSet<&'a T>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    /// Create a matcher with no junk predicate.
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        Self::with_junk(a, b, None)
    }

    /// Create a matcher treating elements selected by `is_junk` as junk.
    pub fn with_junk(a: &'a [T], b: &'a [T], is_junk: Option<fn(&T) -> bool>) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }

        let mut bjunk = HashSet::new();
        if let Some(is_junk) = is_junk {
            b2j.retain(|elt, _| {
                if is_junk(elt) {
                    bjunk.insert(*elt);
                    false
                } else {
                    true
                }
            });
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self { a, b, b2j, bjunk }
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Ties are broken by the earliest start in `a`, then in `b`. A block of
    /// length zero means nothing matched.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);

        // j2len[j] = length of the longest match ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut new_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    new_j2len.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        let is_junk = |j: usize| self.bjunk.contains(&self.b[j]);

        // Grow the block over equal non-junk neighbours first, then over
        // equal junk so that junk never splits an otherwise whole match.
        for want_junk in [false, true] {
            while besti > alo
                && bestj > blo
                && is_junk(bestj - 1) == want_junk
                && self.a[besti - 1] == self.b[bestj - 1]
            {
                besti -= 1;
                bestj -= 1;
                bestsize += 1;
            }
            while besti + bestsize < ahi
                && bestj + bestsize < bhi
                && is_junk(bestj + bestsize) == want_junk
                && self.a[besti + bestsize] == self.b[bestj + bestsize]
            {
                bestsize += 1;
            }
        }

        Match {
            a: besti,
            b: bestj,
            len: bestsize,
        }
    }

    /// All matching blocks in ascending order, adjacent blocks merged.
    ///
    /// The last element is always the sentinel `(a.len(), b.len(), 0)`.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.len > 0 {
                if alo < m.a && blo < m.b {
                    queue.push((alo, m.a, blo, m.b));
                }
                if m.a + m.len < ahi && m.b + m.len < bhi {
                    queue.push((m.a + m.len, ahi, m.b + m.len, bhi));
                }
                blocks.push(m);
            }
        }
        blocks.sort_unstable();

        let mut merged: Vec<Match> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match merged.last_mut() {
                Some(last) if last.a + last.len == block.a && last.b + last.len == block.b => {
                    last.len += block.len;
                }
                _ => merged.push(block),
            }
        }
        merged.push(Match {
            a: la,
            b: lb,
            len: 0,
        });
        merged
    }

    /// Drive `hook` with the equal/delete/insert/replace regions.
    pub fn diff<D: DiffHook>(&self, hook: &mut D) -> Result<(), D::Error> {
        let (mut i, mut j) = (0, 0);
        for m in self.matching_blocks() {
            if i < m.a && j < m.b {
                hook.replace(i, m.a - i, j, m.b - j)?;
            } else if i < m.a {
                hook.delete(i, m.a - i, j)?;
            } else if j < m.b {
                hook.insert(i, j, m.b - j)?;
            }
            if m.len > 0 {
                hook.equal(m.a, m.b, m.len)?;
            }
            i = m.a + m.len;
            j = m.b + m.len;
        }
        hook.finish()
    }

    /// The diff as a list of [`DiffOp`]s.
    pub fn ops(&self) -> Vec<DiffOp> {
        let mut capture = Capture::new();
        self.diff(&mut capture).unwrap_or_else(|never| match never {});
        capture.into_ops()
    }

    /// Similarity in `[0, 1]`: twice the matched elements over the total.
    pub fn ratio(&self) -> f32 {
        get_diff_ratio(&self.ops(), self.a.len(), self.b.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from element counts alone.
    pub fn quick_ratio(&self) -> f32 {
        let mut available: HashMap<&T, usize> = HashMap::new();
        for elt in self.b {
            *available.entry(elt).or_default() += 1;
        }
        let mut matches = 0;
        for elt in self.a {
            if let Some(count) = available.get_mut(elt) {
                if *count > 0 {
                    *count -= 1;
                    matches += 1;
                }
            }
        }
        similarity(matches, self.a.len() + self.b.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from lengths alone.
    pub fn real_quick_ratio(&self) -> f32 {
        real_quick_ratio(self.a.len(), self.b.len())
    }
}

/// Length-only ratio bound, usable before building a matcher.
pub fn real_quick_ratio(la: usize, lb: usize) -> f32 {
    similarity(la.min(lb), la + lb)
}

fn similarity(matches: usize, total: usize) -> f32 {
    if total == 0 {
        1.0
    } else {
        2.0 * matches as f32 / total as f32
    }
}
