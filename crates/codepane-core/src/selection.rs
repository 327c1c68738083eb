//! Selections and carets.
//!
//! A [`Selection`] is a half-open character range; a caret is an empty selection. The engine
//! keeps one or more of them in a [`SelectionSet`], normalized so that they are sorted and do not
//! overlap. Editing with several carets is not supported: extra selections are carried through
//! re-renders and edits but only the primary one is moved by engine operations.

use crate::delta::TextDelta;

/// A selected character range. Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Selection {
    /// Create a selection, swapping the bounds when given in reverse.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// An empty selection (caret) at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Returns `true` for a caret.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Clamp both ends into `0..=len`.
    pub fn clamped(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }

    /// Carry the selection across an edit.
    pub fn mapped(self, delta: &TextDelta) -> Self {
        let (start, end) = delta.map_range(self.start, self.end);
        Self { start, end }
    }
}

/// A normalized, non-empty set of selections with a primary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    selections: Vec<Selection>,
    primary: usize,
}

impl SelectionSet {
    /// A set holding a single selection.
    pub fn single(selection: Selection) -> Self {
        Self {
            selections: vec![selection],
            primary: 0,
        }
    }

    /// Build a normalized set. An empty input yields a caret at offset 0.
    pub fn from_selections(selections: Vec<Selection>, primary: usize) -> Self {
        if selections.is_empty() {
            return Self::single(Selection::caret(0));
        }
        let (selections, primary) = normalize_selections(selections, primary);
        Self {
            selections,
            primary,
        }
    }

    /// The primary selection.
    pub fn primary(&self) -> Selection {
        self.selections[self.primary]
    }

    /// Index of the primary selection in [`SelectionSet::as_slice`].
    pub fn primary_index(&self) -> usize {
        self.primary
    }

    /// All selections, sorted by start.
    pub fn as_slice(&self) -> &[Selection] {
        &self.selections
    }

    /// Clamp every selection into `0..=len` and re-normalize.
    pub fn clamped(&self, len: usize) -> Self {
        let selections = self.selections.iter().map(|s| s.clamped(len)).collect();
        Self::from_selections(selections, self.primary)
    }

    /// Carry every selection across an edit.
    pub fn mapped(&self, delta: &TextDelta) -> Self {
        let selections = self.selections.iter().map(|s| s.mapped(delta)).collect();
        Self::from_selections(selections, self.primary)
    }
}

impl Default for SelectionSet {
    fn default() -> Self {
        Self::single(Selection::caret(0))
    }
}

fn normalize_selections(
    mut selections: Vec<Selection>,
    primary_index: usize,
) -> (Vec<Selection>, usize) {
    let primary = selections
        .get(primary_index)
        .copied()
        .unwrap_or(selections[0]);

    selections.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));

    // Merge overlapping selections; selections that merely touch stay separate.
    let mut merged: Vec<Selection> = Vec::with_capacity(selections.len());
    for sel in selections {
        match merged.last_mut() {
            Some(last) if sel == *last => {}
            Some(last) if sel.start < last.end => {
                last.end = last.end.max(sel.end);
            }
            _ => merged.push(sel),
        }
    }

    let primary = merged
        .iter()
        .position(|s| s.start <= primary.start && primary.end <= s.end)
        .unwrap_or(merged.len() - 1);

    (merged, primary)
}
