//! Utility functions and helpers.

pub mod http;
pub mod url;

/// Shorten `text` to at most `limit` characters for log lines.
pub fn preview(text: &str, limit: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
