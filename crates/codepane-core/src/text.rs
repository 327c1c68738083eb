/// Number of `char`s in `text`.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the `char_offset`-th character (clamped to the end of `text`).
pub(crate) fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Slice `text` by character offsets (clamped).
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start_byte = byte_offset(text, start);
    let end_byte = byte_offset(text, end.max(start));
    &text[start_byte..end_byte]
}
