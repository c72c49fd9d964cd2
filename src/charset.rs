//! Character encoding detection and transcoding for byte input
//!
//! Feed and article markup often arrives as raw bytes in a legacy encoding.
//! Before the transducer can scan it, the bytes are decoded to UTF-8 using
//! a three-level cascade:
//!
//! 1. **Content-Type Header**: the `charset` parameter, if present
//! 2. **HTML Meta Tags**: `<meta charset>` or
//!    `<meta http-equiv="Content-Type" content="...; charset=...">`
//! 3. **Default to UTF-8**
//!
//! # Examples
//!
//! ```rust
//! use onepass_markdown::charset::detect_charset;
//!
//! let charset = detect_charset(Some("text/html; charset=ISO-8859-1"), b"<p>...</p>");
//! assert_eq!(charset, "ISO-8859-1");
//!
//! let html = b"<html><head><meta charset=\"utf-8\"></head></html>";
//! assert_eq!(detect_charset(None, html), "UTF-8");
//!
//! assert_eq!(detect_charset(None, b"<p>No charset</p>"), "UTF-8");
//! ```

use log::debug;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

use crate::error::ConversionError;
use crate::scanner::{find_byte, find_subslice_ignore_case};
use crate::tag::HtmlTag;

/// Default charset when detection fails
const DEFAULT_CHARSET: &str = "UTF-8";

/// Maximum bytes to scan for meta charset tags
const META_SCAN_LIMIT: usize = 1024;

/// Detect character encoding using the three-level cascade
///
/// Always returns a charset name, upper-cased.
pub fn detect_charset(content_type: Option<&str>, html: &[u8]) -> String {
    if let Some(ct) = content_type
        && let Some(charset) = extract_charset_from_content_type(ct)
    {
        debug!("charset {charset} taken from Content-Type header");
        return normalize_charset(&charset);
    }

    if let Some(charset) = extract_charset_from_html(html) {
        debug!("charset {charset} taken from meta tag");
        return normalize_charset(&charset);
    }

    DEFAULT_CHARSET.to_string()
}

/// Extract the `charset` parameter from a Content-Type value
///
/// ```rust
/// use onepass_markdown::charset::extract_charset_from_content_type;
///
/// assert_eq!(
///     extract_charset_from_content_type("text/html; charset=\"ISO-8859-1\""),
///     Some("ISO-8859-1".to_string())
/// );
/// assert_eq!(extract_charset_from_content_type("text/html"), None);
/// ```
pub fn extract_charset_from_content_type(content_type: &str) -> Option<String> {
    static CHARSET_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let regex =
        CHARSET_REGEX.get_or_init(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"';,\s]+)"#).ok());
    let regex = regex.as_ref()?;

    regex
        .captures(content_type)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract a charset declaration from the `<meta>` tags near the top of a
/// document
///
/// Only the first 1024 bytes are scanned.
pub fn extract_charset_from_html(html: &[u8]) -> Option<String> {
    let prefix = &html[..html.len().min(META_SCAN_LIMIT)];
    let text = String::from_utf8_lossy(prefix);
    let bytes = text.as_bytes();

    let mut pos = 0;
    while let Some(start) = find_subslice_ignore_case(bytes, pos, b"<meta") {
        let end = find_byte(bytes, start, b'>')?;
        pos = end + 1;

        let Ok(tag) = HtmlTag::parse(&text[start..=end], true) else {
            continue;
        };
        if tag.name != "meta" {
            continue;
        }

        if let Some(charset) = tag.attribute("charset")
            && !charset.trim().is_empty()
        {
            return Some(charset.trim().to_string());
        }

        let is_content_type = tag
            .attribute("http-equiv")
            .is_some_and(|v| v.eq_ignore_ascii_case("content-type"));
        if is_content_type
            && let Some(content) = tag.attribute("content")
            && let Some(charset) = extract_charset_from_content_type(content)
        {
            return Some(charset);
        }
    }

    None
}

/// Normalize charset name to uppercase
pub fn normalize_charset(charset: &str) -> String {
    charset.to_uppercase()
}

/// Decode `html` bytes to UTF-8 text using `charset`
///
/// # Errors
///
/// - `ConversionError::EncodingError` if the bytes are invalid for the
///   charset, or the charset label is unknown
pub fn decode_to_utf8<'a>(html: &'a [u8], charset: &str) -> Result<Cow<'a, str>, ConversionError> {
    if charset.eq_ignore_ascii_case(DEFAULT_CHARSET) {
        return std::str::from_utf8(html).map(Cow::Borrowed).map_err(|e| {
            ConversionError::EncodingError(format!(
                "Invalid UTF-8 at byte position {}: {} (detected charset: {})",
                e.valid_up_to(),
                e,
                charset
            ))
        });
    }

    let encoding = encoding_rs::Encoding::for_label(charset.as_bytes()).ok_or_else(|| {
        ConversionError::EncodingError(format!("Unsupported charset '{}'", charset))
    })?;
    debug!("transcoding input from {}", encoding.name());

    encoding
        .decode_without_bom_handling_and_without_replacement(html)
        .ok_or_else(|| {
            ConversionError::EncodingError(format!(
                "Invalid byte sequence for charset '{}'",
                charset
            ))
        })
}
