//! Structured text change deltas.
//!
//! The buffer is replaced wholesale on every edit, but between an edit and the next highlight
//! pass the previously styled content, the overlays and the selection still need to follow the
//! text. [`TextDelta::between`] recovers the single contiguous edit that turns the old text into
//! the new one (common prefix/suffix), and [`TextDelta::map_offset`] carries offsets across it.
//!
//! All offsets are character offsets.

/// A single contiguous replacement expressed in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextDelta {
    /// Start of the edit (same in the old and the new text).
    pub start: usize,
    /// Number of characters removed from the old text at `start`.
    pub deleted_len: usize,
    /// Number of characters inserted into the new text at `start`.
    pub inserted_len: usize,
}

impl TextDelta {
    /// Compute the minimal single edit between `old` and `new`.
    ///
    /// Returns `None` when the texts are identical.
    pub fn between(old: &str, new: &str) -> Option<Self> {
        if old == new {
            return None;
        }

        let old_chars: Vec<char> = old.chars().collect();
        let new_chars: Vec<char> = new.chars().collect();

        let prefix = old_chars
            .iter()
            .zip(&new_chars)
            .take_while(|(a, b)| a == b)
            .count();

        let max_suffix = old_chars.len().min(new_chars.len()) - prefix;
        let suffix = old_chars
            .iter()
            .rev()
            .zip(new_chars.iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        Some(Self {
            start: prefix,
            deleted_len: old_chars.len() - prefix - suffix,
            inserted_len: new_chars.len() - prefix - suffix,
        })
    }

    /// Exclusive end of the replaced range in the old text.
    pub fn old_end(&self) -> usize {
        self.start + self.deleted_len
    }

    /// Exclusive end of the inserted range in the new text.
    pub fn new_end(&self) -> usize {
        self.start + self.inserted_len
    }

    /// Map an offset in the old text to the new text.
    ///
    /// Offsets before the edit are unchanged, offsets after it shift by the length difference,
    /// and offsets inside the replaced range collapse to the end of the insertion.
    pub fn map_offset(&self, offset: usize) -> usize {
        if offset <= self.start {
            offset
        } else if offset >= self.old_end() {
            offset - self.deleted_len + self.inserted_len
        } else {
            self.new_end()
        }
    }

    /// Map a half-open range; the result is never inverted.
    pub fn map_range(&self, start: usize, end: usize) -> (usize, usize) {
        let new_start = self.map_offset(start);
        let new_end = self.map_offset(end).max(new_start);
        (new_start, new_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts_have_no_delta() {
        assert_eq!(TextDelta::between("abc", "abc"), None);
    }

    #[test]
    fn test_insertion() {
        let delta = TextDelta::between("hello world", "hello brave world").unwrap();
        assert_eq!(
            delta,
            TextDelta {
                start: 6,
                deleted_len: 0,
                inserted_len: 6
            }
        );
        assert_eq!(delta.map_offset(3), 3);
        assert_eq!(delta.map_offset(6), 6);
        assert_eq!(delta.map_offset(7), 13);
    }

    #[test]
    fn test_deletion_collapses_inner_offsets() {
        let delta = TextDelta::between("abcdef", "af").unwrap();
        assert_eq!(delta.start, 1);
        assert_eq!(delta.deleted_len, 4);
        assert_eq!(delta.inserted_len, 0);
        assert_eq!(delta.map_offset(3), 1);
        assert_eq!(delta.map_offset(6), 2);
        assert_eq!(delta.map_range(2, 6), (1, 2));
    }

    #[test]
    fn test_repeated_characters_do_not_overlap() {
        // Prefix and suffix must not both claim the same characters.
        let delta = TextDelta::between("aaa", "aaaa").unwrap();
        assert_eq!(delta.start, 3);
        assert_eq!(delta.deleted_len, 0);
        assert_eq!(delta.inserted_len, 1);
    }

    #[test]
    fn test_multibyte() {
        let delta = TextDelta::between("a👋b", "a👋👋b").unwrap();
        assert_eq!(delta.start, 2);
        assert_eq!(delta.inserted_len, 1);
    }
}
