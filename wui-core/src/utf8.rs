//! Character-indexed helpers over UTF-8 strings.
//!
//! Text positions in wui are character indices, not byte offsets. Every helper
//! here clamps its indices to the string, so callers never have to check
//! bounds and no helper can slice inside a code point.

use simdutf8::basic::from_utf8;

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of the character at `char_index`, or `s.len()` past the end.
pub fn byte_offset(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(s.len())
}

/// The characters `from..to` of `s`. Indices are clamped and may come in any order.
pub fn slice_chars(s: &str, from: usize, to: usize) -> &str {
    let (from, to) = if from <= to { (from, to) } else { (to, from) };
    let start = byte_offset(s, from);
    let end = byte_offset(s, to);
    &s[start..end]
}

/// Insert `text` before the character at `char_index` and return the number
/// of characters inserted.
pub fn insert_at(s: &mut String, char_index: usize, text: &str) -> usize {
    let offset = byte_offset(s, char_index);
    s.insert_str(offset, text);
    char_len(text)
}

/// Remove the character at `char_index`.
pub fn remove_char_at(s: &mut String, char_index: usize) -> Option<char> {
    let offset = byte_offset(s, char_index);
    if offset < s.len() {
        Some(s.remove(offset))
    } else {
        None
    }
}

/// Remove the characters `from..to`. Indices are clamped and may come in any order.
pub fn remove_range(s: &mut String, from: usize, to: usize) {
    let (from, to) = if from <= to { (from, to) } else { (to, from) };
    let start = byte_offset(s, from);
    let end = byte_offset(s, to);
    s.replace_range(start..end, "");
}

/// Split text into lines on `\n`, dropping a `\r` that precedes a line feed.
///
/// Always returns at least one line.
pub fn split_lines(s: &str) -> Vec<String> {
    let mut lines: Vec<String> = s.split('\n').map(str::to_string).collect();
    let last = lines.len() - 1;
    for line in &mut lines[..last] {
        if line.ends_with('\r') {
            line.pop();
        }
    }
    lines
}

/// Strictly validate raw bytes as UTF-8.
///
/// Malformed input is rejected as a whole instead of being truncated.
pub fn validate(bytes: &[u8]) -> Option<&str> {
    from_utf8(bytes).ok()
}
