//! Authoritative document text.
//!
//! The buffer is a flat string replaced wholesale on every change. Its [`LineIndex`] is derived
//! lazily: any mutation drops it and the next access rebuilds it in one linear scan.

use crate::delta::TextDelta;
use crate::line_index::LineIndex;
use crate::text::{char_len, char_slice};
use codepane_lang::Language;
use std::cell::OnceCell;
use std::sync::Arc;

/// Text of one open document plus its language.
#[derive(Debug, Clone)]
pub struct Buffer {
    text: Arc<str>,
    len: usize,
    language: Language,
    /// Bumped on every text mutation.
    revision: u64,
    line_index: OnceCell<LineIndex>,
}

impl Buffer {
    /// Create a buffer.
    pub fn new(text: &str, language: Language) -> Self {
        Self {
            text: Arc::from(text),
            len: char_len(text),
            language,
            revision: 0,
            line_index: OnceCell::new(),
        }
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shared handle to the current text, cheap to hand to collaborators.
    pub fn snapshot(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for an empty document.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Document language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Change the document language.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Revision counter, bumped on every text change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Line index of the current text, rebuilt on first access after a change.
    pub fn line_index(&self) -> &LineIndex {
        self.line_index
            .get_or_init(|| LineIndex::from_text(&self.text))
    }

    /// Text of `line` (0-based) without its `'\n'`, or `None` past the last line.
    pub fn line_text(&self, line: usize) -> Option<&str> {
        let range = self.line_index().try_range_for_line(line)?;
        Some(char_slice(&self.text, range.start, range.end))
    }

    /// Replace the text. Returns the edit that was applied, or `None` if nothing changed.
    pub fn replace(&mut self, text: &str) -> Option<TextDelta> {
        let delta = TextDelta::between(&self.text, text)?;
        self.text = Arc::from(text);
        self.len = self.len - delta.deleted_len + delta.inserted_len;
        self.revision += 1;
        self.line_index = OnceCell::new();
        Some(delta)
    }
}
