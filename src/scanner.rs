//! Tag name scanning and byte-level search helpers
//!
//! The scanner works on the raw UTF-8 bytes of the input. Every byte it
//! stops on (`<`, `>`, `/`, quotes, ASCII whitespace) is ASCII, so every
//! index it hands back is also a valid `str` char boundary.
//!
//! # Tag names
//!
//! [`scan_tag_name`] is called with an index just past `<` (or `</`). A tag
//! name is a run of ASCII alphanumerics and `:` (namespace separator):
//!
//! - `>` ends the name and the tag.
//! - `/` or whitespace ends the name; the rest of the tag (attributes, a
//!   self-closing slash) is skipped up to the terminating `>`.
//! - Any other byte makes the tag invalid; it is still skipped to `>`.
//!
//! A tag with no terminating `>` before the end of input is reported as
//! [`TagName::Unterminated`], which makes the driver stop scanning.
//!
//! # Examples
//!
//! ```rust
//! use onepass_markdown::scanner::{scan_tag_name, TagName};
//!
//! let html = b"<P class=\"lead\">text";
//! assert_eq!(
//!     scan_tag_name(html, 1),
//!     TagName::Valid { name: "p".to_string(), end: 15 }
//! );
//! assert_eq!(scan_tag_name(b"<p class", 1), TagName::Unterminated);
//! ```

/// Result of scanning a tag name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagName {
    /// Lower-cased tag name and the index of the tag's terminating `>`
    Valid { name: String, end: usize },
    /// Not a usable tag; `end` is the index of the terminating `>`
    Invalid { end: usize },
    /// The input ended before a terminating `>` was found
    Unterminated,
}

/// Characters allowed inside a tag name
#[inline]
pub fn is_tag_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b':'
}

/// Characters allowed as the first character of a tag name
#[inline]
pub fn is_tag_start_char(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

/// Scan a tag name starting at `start` (the index just past `<` or `</`)
pub fn scan_tag_name(bytes: &[u8], start: usize) -> TagName {
    let mut i = start;

    while i < bytes.len() {
        let b = bytes[i];
        if is_tag_name_char(b) {
            i += 1;
            continue;
        }

        if b == b'>' {
            return finish_name(bytes, start, i, i);
        }

        let end = match find_byte(bytes, i, b'>') {
            Some(end) => end,
            None => return TagName::Unterminated,
        };

        if b == b'/' || b.is_ascii_whitespace() {
            return finish_name(bytes, start, i, end);
        }
        return TagName::Invalid { end };
    }

    TagName::Unterminated
}

fn finish_name(bytes: &[u8], start: usize, name_end: usize, end: usize) -> TagName {
    if name_end == start || !is_tag_start_char(bytes[start]) {
        return TagName::Invalid { end };
    }

    let name = bytes[start..name_end]
        .iter()
        .map(|b| b.to_ascii_lowercase() as char)
        .collect();
    TagName::Valid { name, end }
}

/// Skip a `<!...>` construct starting at the `<` at index `lt`
///
/// Comments (`<!--`) run to the next `-->`; doctypes and other declarations
/// run to the next `>`. Returns the index just past the construct, or `None`
/// when the input ends first.
pub fn skip_declaration(bytes: &[u8], lt: usize) -> Option<usize> {
    if bytes[lt..].starts_with(b"<!--") {
        return find_subslice(bytes, lt + 4, b"-->").map(|i| i + 3);
    }
    find_byte(bytes, lt, b'>').map(|i| i + 1)
}

/// Index of the first `needle` byte at or after `from`
#[inline]
pub fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|i| from + i)
}

/// Index of the first occurrence of `needle` at or after `from`
pub fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    let hay = bytes.get(from..)?;
    if needle.is_empty() || hay.len() < needle.len() {
        return None;
    }
    hay.windows(needle.len())
        .position(|w| w == needle)
        .map(|i| from + i)
}

/// Like [`find_subslice`], ignoring ASCII case
pub fn find_subslice_ignore_case(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    let hay = bytes.get(from..)?;
    if needle.is_empty() || hay.len() < needle.len() {
        return None;
    }
    hay.windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
        .map(|i| from + i)
}

/// Index of the first non-ASCII-whitespace byte at or after `from`
#[inline]
pub fn skip_ascii_whitespace(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(name: &str, end: usize) -> TagName {
        TagName::Valid {
            name: name.to_string(),
            end,
        }
    }

    // ============================================================================
    // Tag Name Scanning
    // ============================================================================

    #[test]
    fn test_scan_simple_tag() {
        assert_eq!(scan_tag_name(b"<b>", 1), valid("b", 2));
    }

    #[test]
    fn test_scan_lowercases_name() {
        assert_eq!(scan_tag_name(b"<BlockQuote>", 1), valid("blockquote", 11));
    }

    #[test]
    fn test_scan_closing_tag() {
        assert_eq!(scan_tag_name(b"</li>", 2), valid("li", 4));
    }

    #[test]
    fn test_scan_skips_attributes() {
        let html = b"<a href=\"x\" title='y'>";
        assert_eq!(scan_tag_name(html, 1), valid("a", html.len() - 1));
    }

    #[test]
    fn test_scan_self_closing() {
        assert_eq!(scan_tag_name(b"<br/>", 1), valid("br", 4));
        assert_eq!(scan_tag_name(b"<br />", 1), valid("br", 5));
    }

    #[test]
    fn test_scan_namespaced_name() {
        assert_eq!(scan_tag_name(b"<svg:rect>", 1), valid("svg:rect", 9));
    }

    #[test]
    fn test_scan_invalid_character_skips_to_end() {
        assert_eq!(scan_tag_name(b"<b$d>rest", 1), TagName::Invalid { end: 4 });
    }

    #[test]
    fn test_scan_digit_first_is_invalid() {
        assert_eq!(scan_tag_name(b"<1b>", 1), TagName::Invalid { end: 3 });
    }

    #[test]
    fn test_scan_unterminated() {
        assert_eq!(scan_tag_name(b"<b bad tag here", 1), TagName::Unterminated);
        assert_eq!(scan_tag_name(b"<div", 1), TagName::Unterminated);
        assert_eq!(scan_tag_name(b"<d$v", 1), TagName::Unterminated);
    }

    // ============================================================================
    // Declarations and Comments
    // ============================================================================

    #[test]
    fn test_skip_doctype() {
        let html = b"<!DOCTYPE html><p>";
        assert_eq!(skip_declaration(html, 0), Some(15));
    }

    #[test]
    fn test_skip_comment_containing_gt() {
        let html = b"<!-- a > b -->x";
        assert_eq!(skip_declaration(html, 0), Some(14));
    }

    #[test]
    fn test_skip_unterminated_comment() {
        assert_eq!(skip_declaration(b"<!-- never closed >", 0), None);
    }

    // ============================================================================
    // Search Helpers
    // ============================================================================

    #[test]
    fn test_find_helpers() {
        let hay = b"abc</A>def";
        assert_eq!(find_byte(hay, 0, b'<'), Some(3));
        assert_eq!(find_byte(hay, 4, b'<'), None);
        assert_eq!(find_byte(hay, 100, b'<'), None);
        assert_eq!(find_subslice(hay, 0, b"</A>"), Some(3));
        assert_eq!(find_subslice(hay, 0, b"</a>"), None);
        assert_eq!(find_subslice_ignore_case(hay, 0, b"</a>"), Some(3));
        assert_eq!(find_subslice_ignore_case(hay, 4, b"</a>"), None);
    }

    #[test]
    fn test_skip_ascii_whitespace() {
        assert_eq!(skip_ascii_whitespace(b"  \r\n\tx", 0), 5);
        assert_eq!(skip_ascii_whitespace(b"   ", 1), 3);
    }
}
