//! Stepping through a document's revision history.

use crate::cache::RevisionId;

/// Direction of a step through history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Older,
    Newer,
}

/// Position in a newest-first revision list.
///
/// Steps past either end are refused and leave the cursor where it was.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevisionCursor {
    revisions: Vec<RevisionId>,
    index: usize,
    last_step: Direction,
}

impl RevisionCursor {
    /// Cursor on the newest revision of `revisions`.
    pub fn new(revisions: Vec<RevisionId>) -> Self {
        Self {
            revisions,
            index: 0,
            last_step: Direction::Older,
        }
    }

    pub fn revisions(&self) -> &[RevisionId] {
        &self.revisions
    }

    pub fn current(&self) -> Option<&RevisionId> {
        self.revisions.get(self.index)
    }

    pub fn can_step(&self, direction: Direction) -> bool {
        match direction {
            Direction::Older => self.index + 1 < self.revisions.len(),
            Direction::Newer => self.index > 0,
        }
    }

    /// Move one step and return the new current revision.
    pub fn step(&mut self, direction: Direction) -> Option<&RevisionId> {
        if !self.can_step(direction) {
            return None;
        }
        match direction {
            Direction::Older => self.index += 1,
            Direction::Newer => self.index -= 1,
        }
        self.last_step = direction;
        self.current()
    }

    pub fn older(&mut self) -> Option<&RevisionId> {
        self.step(Direction::Older)
    }

    pub fn newer(&mut self) -> Option<&RevisionId> {
        self.step(Direction::Newer)
    }

    /// Jump to `revision`. Returns `false` if it is not in the list.
    pub fn seek(&mut self, revision: &RevisionId) -> bool {
        match self.revisions.iter().position(|r| r == revision) {
            Some(index) => {
                self.index = index;
                true
            }
            None => false,
        }
    }

    /// The revision one step further in the direction last moved, worth
    /// fetching ahead of time.
    pub fn preload_hint(&self) -> Option<&RevisionId> {
        match self.last_step {
            Direction::Older => self.revisions.get(self.index + 1),
            Direction::Newer => self.index.checked_sub(1).and_then(|i| self.revisions.get(i)),
        }
    }

    /// Step every cursor together, or none of them if any is at its end.
    pub fn step_all(cursors: &mut [&mut RevisionCursor], direction: Direction) -> bool {
        if cursors.is_empty() || !cursors.iter().all(|c| c.can_step(direction)) {
            return false;
        }
        for cursor in cursors.iter_mut() {
            cursor.step(direction);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> RevisionCursor {
        RevisionCursor::new(vec!["3-c".into(), "2-b".into(), "1-a".into()])
    }

    #[test]
    fn starts_at_newest() {
        let cursor = history();
        assert_eq!(cursor.current().map(RevisionId::as_str), Some("3-c"));
        assert_eq!(cursor.preload_hint().map(RevisionId::as_str), Some("2-b"));
    }

    #[test]
    fn steps_and_stops_at_ends() {
        let mut cursor = history();
        assert!(cursor.newer().is_none());
        assert_eq!(cursor.older().map(RevisionId::as_str), Some("2-b"));
        assert_eq!(cursor.older().map(RevisionId::as_str), Some("1-a"));
        assert!(cursor.older().is_none());
        assert_eq!(cursor.current().map(RevisionId::as_str), Some("1-a"));
        assert_eq!(cursor.newer().map(RevisionId::as_str), Some("2-b"));
    }

    #[test]
    fn preload_follows_last_direction() {
        let mut cursor = history();
        cursor.older();
        cursor.older();
        assert!(cursor.preload_hint().is_none());
        cursor.newer();
        assert_eq!(cursor.preload_hint().map(RevisionId::as_str), Some("3-c"));
    }

    #[test]
    fn empty_history() {
        let mut cursor = RevisionCursor::default();
        assert!(cursor.current().is_none());
        assert!(cursor.older().is_none());
        assert!(cursor.newer().is_none());
        assert!(cursor.preload_hint().is_none());
    }

    #[test]
    fn seek_to_known_revision() {
        let mut cursor = history();
        assert!(cursor.seek(&"1-a".into()));
        assert_eq!(cursor.current().map(RevisionId::as_str), Some("1-a"));
        assert!(!cursor.seek(&"9-z".into()));
        assert_eq!(cursor.current().map(RevisionId::as_str), Some("1-a"));
    }

    #[test]
    fn step_all_is_all_or_nothing() {
        let mut long = history();
        let mut short = RevisionCursor::new(vec!["2-y".into(), "1-x".into()]);

        assert!(RevisionCursor::step_all(&mut [&mut long, &mut short], Direction::Older));
        assert!(!RevisionCursor::step_all(&mut [&mut long, &mut short], Direction::Older));
        assert_eq!(long.current().map(RevisionId::as_str), Some("2-b"));
        assert_eq!(short.current().map(RevisionId::as_str), Some("1-x"));
    }
}
