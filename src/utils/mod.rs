//! Common utilities and helper functions

pub mod error;
pub mod retry;

/// Strip the anti-JSON-hijacking prefix the trends API puts before its JSON
///
/// Bodies start with `)]}'` or `)]}',` followed by a newline. Anything before
/// the first `{` or `[` is discarded; a body without either is returned as-is.
pub fn strip_json_prefix(body: &str) -> &str {
    match body.find(['{', '[']) {
        Some(start) if body[..start].trim_start().starts_with(")]}'") => &body[start..],
        _ => body,
    }
}

/// Truncate text to a maximum length (in bytes, on a char boundary)
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    let mut end = max_len.saturating_sub(3);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
