//! Anchor extraction
//!
//! Turns a simple, well-formed `<a href="...">text</a>` span into a Markdown
//! link in one step. Anything more complicated (nested markup in the link
//! text, a missing or garbled close tag, no `href`) is declined and the
//! caller falls back to generic tag handling.
//!
//! ```rust
//! use onepass_markdown::anchor::extract_anchor;
//!
//! let html = r#"See <a href="http://x.com">the site</a> now"#;
//! let anchor = extract_anchor(html, 4).unwrap();
//! assert_eq!(anchor.text, "the site");
//! assert_eq!(anchor.href, "http://x.com");
//! assert_eq!(&html[anchor.end..], " now");
//!
//! assert!(extract_anchor(r#"<a href="http://x.com">click"#, 0).is_none());
//! ```

use crate::scanner::{find_byte, find_subslice};

const CLOSE_TAG: &[u8] = b"</a>";
const HREF_PREFIX: &[u8] = b"href=\"";

/// A matched anchor span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorMatch {
    /// Link text, trimmed, with inner whitespace runs collapsed
    pub text: String,
    /// Raw `href` attribute value
    pub href: String,
    /// Index one past the closing `</a>`
    pub end: usize,
}

impl AnchorMatch {
    /// Render as a Markdown inline link
    pub fn to_markdown(&self) -> String {
        format!("[{}]({})", self.text, self.href)
    }
}

/// Try to match an anchor whose `<` is at `start`
pub fn extract_anchor(html: &str, start: usize) -> Option<AnchorMatch> {
    let bytes = html.as_bytes();

    let open_end = find_byte(bytes, start, b'>')?;
    if open_end < start + 3 {
        return None;
    }

    let text_start = open_end + 1;
    let close = find_byte(bytes, text_start, b'<')?;

    let raw_text = html[text_start..close].trim_matches(|c: char| c.is_ascii_whitespace());
    if raw_text.is_empty() {
        return None;
    }

    let candidate = bytes.get(close..close + CLOSE_TAG.len())?;
    if !candidate.eq_ignore_ascii_case(CLOSE_TAG) {
        return None;
    }

    let href_start = find_subslice(&bytes[..open_end], start, HREF_PREFIX)? + HREF_PREFIX.len();
    let href_end = find_byte(bytes, href_start, b'"')?;
    if href_end >= open_end {
        return None;
    }

    Some(AnchorMatch {
        text: collapse_whitespace(raw_text),
        href: html[href_start..href_end].to_string(),
        end: close + CLOSE_TAG.len(),
    })
}

fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    for word in text.split_ascii_whitespace() {
        if !collapsed.is_empty() {
            collapsed.push(' ');
        }
        collapsed.push_str(word);
    }
    collapsed
}
