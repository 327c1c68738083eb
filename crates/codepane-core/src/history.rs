//! Undo/redo history of whole-text snapshots.
//!
//! Since the buffer is replaced wholesale on every edit, an undo entry is simply the text and
//! selection from before the edit. Both stacks are bounded; the oldest entries are dropped first.

use crate::selection::SelectionSet;
use std::collections::VecDeque;
use std::sync::Arc;

/// One restorable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Text to restore.
    pub text: Arc<str>,
    /// Selection to restore.
    pub selections: SelectionSet,
}

/// Bounded undo/redo stacks.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    limit: usize,
    undo: VecDeque<HistoryEntry>,
    redo: Vec<HistoryEntry>,
}

impl UndoHistory {
    /// Create a history keeping at most `limit` undo entries.
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            undo: VecDeque::new(),
            redo: Vec::new(),
        }
    }

    /// Record the state from before a user edit. Clears the redo stack.
    pub fn record(&mut self, before: HistoryEntry) {
        self.redo.clear();
        self.push_undo(before);
    }

    fn push_undo(&mut self, entry: HistoryEntry) {
        if self.undo.len() == self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(entry);
    }

    /// Step back: returns the state to restore, saving `current` for redo.
    pub fn undo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let entry = self.undo.pop_back()?;
        self.redo.push(current);
        Some(entry)
    }

    /// Step forward: returns the state to restore, saving `current` for undo.
    pub fn redo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let entry = self.redo.pop()?;
        self.push_undo(current);
        Some(entry)
    }

    /// Whether undo is possible.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether redo is possible.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Undo stack depth.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Forget everything (e.g. a new document was loaded).
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str) -> HistoryEntry {
        HistoryEntry {
            text: Arc::from(text),
            selections: SelectionSet::default(),
        }
    }

    #[test]
    fn test_undo_redo_round() {
        let mut history = UndoHistory::new(10);
        history.record(entry("a"));
        history.record(entry("ab"));

        assert_eq!(history.undo(entry("abc")).unwrap().text.as_ref(), "ab");
        assert!(history.can_redo());
        assert_eq!(history.redo(entry("ab")).unwrap().text.as_ref(), "abc");
        assert!(!history.can_redo());
        assert_eq!(history.undo_depth(), 2);
    }

    #[test]
    fn test_new_record_clears_redo() {
        let mut history = UndoHistory::new(10);
        history.record(entry("a"));
        history.undo(entry("ab"));
        history.record(entry("a"));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = UndoHistory::new(2);
        history.record(entry("1"));
        history.record(entry("2"));
        history.record(entry("3"));
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.undo(entry("4")).unwrap().text.as_ref(), "3");
        assert_eq!(history.undo(entry("3")).unwrap().text.as_ref(), "2");
        assert!(history.undo(entry("2")).is_none());
    }
}
