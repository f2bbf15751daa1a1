//! HTML stripping for text that arrives with inline markup (HN comments,
//! search snippets).

use std::sync::LazyLock;

use regex::Regex;

static TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tags regex"));

/// Strip HTML tags, decode the handful of entities the sources emit, and
/// normalize whitespace.
pub(crate) fn strip_html(html: &str) -> String {
    let without_tags = TAGS.replace_all(html, " ");
    let decoded = without_tags
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&#x2F;", "/")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
