//! Entity decoding and tag detection around the transducer
//!
//! Neither is part of the single scan itself: entity decoding optionally runs
//! before and after it, and the tag probe lets callers skip the scan entirely
//! for text that contains no markup.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Decode HTML character references (`&amp;`, `&#233;`, `&eacute;`, ...)
///
/// ```rust
/// use onepass_markdown::entities::decode_entities;
///
/// assert_eq!(decode_entities("&lt;b&gt;Caf&eacute;&lt;/b&gt;"), "<b>Café</b>");
/// assert_eq!(decode_entities("plain"), "plain");
/// ```
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    html_escape::decode_html_entities(text)
}

/// Whether `text` contains anything that looks like a tag, comment or
/// declaration
///
/// ```rust
/// use onepass_markdown::entities::contains_tags;
///
/// assert!(contains_tags("a <b>bold</b> move"));
/// assert!(contains_tags("x<!-- note -->"));
/// assert!(!contains_tags("3 < 4 and 5 > 2"));
/// ```
pub fn contains_tags(text: &str) -> bool {
    static TAG_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let regex = TAG_REGEX.get_or_init(|| Regex::new(r"<(?:/?[A-Za-z][^<>]*|![^<>]*)>").ok());

    match regex {
        Some(regex) => regex.is_match(text),
        // Without a probe, run the full conversion
        None => true,
    }
}
