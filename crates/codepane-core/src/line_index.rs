//! Logical line index.
//!
//! Maps a flat text to line boundaries and back using an ordered list of line-start offsets.
//! The index is a pure function of the text: it is rebuilt wholesale after every edit, never
//! patched in place.
//!
//! # Line terminator policy
//!
//! Only `'\n'` terminates a line. A `'\r'` is ordinary line content, so `"a\r\nb"` has two lines
//! and the first line's range is `0..2` (it contains the `'\r'`). This keeps line numbering
//! identical for LF and CRLF documents.
//!
//! All offsets are character offsets (Unicode scalar values).

use std::ops::Range;

/// A half-open character range (`start..end`) covering one line, excluding its terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineRange {
    /// First character of the line.
    pub start: usize,
    /// One past the last character of the line (the `'\n'` offset, or the document length).
    pub end: usize,
}

impl LineRange {
    /// Create a new line range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the line in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for an empty line.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `offset` lies on this line.
    ///
    /// The end offset counts as part of the line: a caret placed right before the terminator
    /// belongs to the line it terminates.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Convert to a standard range.
    pub fn to_range(self) -> Range<usize> {
        self.start..self.end
    }
}

/// Line index over a text snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// `line_starts[0] == 0`, strictly increasing.
    line_starts: Vec<usize>,
    /// Document length in characters.
    len: usize,
}

impl LineIndex {
    /// Index for the empty document (a single empty line).
    pub fn new() -> Self {
        Self {
            line_starts: vec![0],
            len: 0,
        }
    }

    /// Build the index with a single linear scan over `text`.
    pub fn from_text(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut len = 0usize;
        for ch in text.chars() {
            len += 1;
            if ch == '\n' {
                line_starts.push(len);
            }
        }
        Self { line_starts, len }
    }

    /// Total line count (always at least 1).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Document length in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for the empty document.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw line-start offsets.
    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }

    /// 0-based line containing `offset`.
    ///
    /// Offsets past the end clamp to the last line; the offset of a `'\n'` belongs to the line
    /// it terminates.
    pub fn line_for_offset(&self, offset: usize) -> usize {
        let offset = offset.min(self.len);
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert_at) => insert_at - 1,
        }
    }

    /// Start offset of `line` (0-based).
    pub fn offset_for_line(&self, line: usize) -> usize {
        self.range_for_line(line).start
    }

    /// Character range of `line` (0-based), excluding the `'\n'` terminator.
    ///
    /// Asking for a line past the end is a caller bug: it asserts in debug builds and clamps to
    /// the last line otherwise. Use [`LineIndex::try_range_for_line`] for untrusted input.
    pub fn range_for_line(&self, line: usize) -> LineRange {
        debug_assert!(
            line < self.line_count(),
            "line {line} out of bounds (line count {})",
            self.line_count()
        );
        let line = line.min(self.line_count() - 1);
        self.range_unchecked(line)
    }

    /// Character range of `line` (0-based), or `None` when out of bounds.
    pub fn try_range_for_line(&self, line: usize) -> Option<LineRange> {
        (line < self.line_count()).then(|| self.range_unchecked(line))
    }

    fn range_unchecked(&self, line: usize) -> LineRange {
        let start = self.line_starts[line];
        let end = match self.line_starts.get(line + 1) {
            // Exclude the '\n' that starts the next line.
            Some(next) => next - 1,
            None => self.len,
        };
        LineRange::new(start, end)
    }

    /// `(line, column)` for a character offset (clamped to the document).
    pub fn position_for_offset(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len);
        let line = self.line_for_offset(offset);
        (line, offset - self.line_starts[line])
    }

    /// Character offset for `(line, column)`, clamping both to valid values.
    pub fn offset_for_position(&self, line: usize, column: usize) -> usize {
        let line = line.min(self.line_count() - 1);
        let range = self.range_unchecked(line);
        range.start + column.min(range.len())
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}
