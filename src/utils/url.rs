// src/utils/url.rs

//! URL extraction from free-form message text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// http(s) URL up to the first whitespace, bracket, quote or pipe.
///
/// Chat platforms wrap links as `<https://x|label>`, so `<`, `>` and `|` end a match.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>"\[\]{}|\\^`]+"#).expect("URL pattern is valid")
});

/// Extract http(s) URLs from `text`.
///
/// Order follows first occurrence; exact duplicates are dropped.
///
/// # Examples
/// ```
/// use crawlbot::utils::url::extract_urls;
///
/// assert_eq!(
///     extract_urls("see https://a.com/x and <https://b.com/y|b> and https://a.com/x"),
///     vec!["https://a.com/x", "https://b.com/y"]
/// );
/// ```
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|url| seen.insert(*url))
        .map(String::from)
        .collect()
}
