/// The Cloud API rejects text bodies longer than this many characters.
pub const MAX_TEXT_BODY_LENGTH: usize = 4096;

/// Truncates `body` to at most `max_chars` characters, respecting UTF-8 character boundaries.
pub fn truncate_body(body: &str, max_chars: usize) -> &str {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
