//! Text helpers

/// Truncate `text` to at most `max_chars` characters.
///
/// Counts `char`s, not bytes, so multi-byte characters are never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
