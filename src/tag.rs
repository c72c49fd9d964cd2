//! Standalone opening-tag parser
//!
//! [`HtmlTag::parse`] turns one complete opening tag such as
//! `<img src="a.png" alt='A' hidden>` into its name, a self-closing flag and
//! its attributes. It is independent of the main scan: the converter uses it
//! for bounded lookahead, and the charset detector uses it to read `<meta>`
//! tags.
//!
//! # Attribute syntax
//!
//! - `name="value"` and `name='value'` keep the value verbatim up to the
//!   matching quote.
//! - `name=value` runs to the next whitespace or the end of the tag.
//! - `name` alone (or `name` followed by another attribute) is a boolean
//!   attribute with an empty value.
//!
//! Attribute names are stored lower-cased. A repeated name keeps the last
//! value.
//!
//! # Examples
//!
//! ```rust
//! use onepass_markdown::tag::HtmlTag;
//!
//! let tag = HtmlTag::parse(r#"<IMG src="a.png" alt='An image' hidden/>"#, true).unwrap();
//! assert_eq!(tag.name, "img");
//! assert!(tag.self_closing);
//! assert_eq!(tag.attribute("src"), Some("a.png"));
//! assert_eq!(tag.attribute("alt"), Some("An image"));
//! assert_eq!(tag.attribute("hidden"), Some(""));
//! ```

use std::collections::HashMap;

use crate::error::TagParseError;
use crate::scanner::{find_byte, is_tag_name_char, is_tag_start_char};

/// A parsed opening tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlTag {
    /// Lower-cased tag name
    pub name: String,
    /// Whether the tag ends with `/>`
    pub self_closing: bool,
    /// Attribute values keyed by lower-cased attribute name
    pub attributes: HashMap<String, String>,
}

impl HtmlTag {
    /// Parse a single opening tag
    ///
    /// # Arguments
    ///
    /// * `text` - Text starting with `<`
    /// * `assume_full_tag` - When `true`, `text` is exactly one tag and must
    ///   end with `>`; otherwise the tag ends at the first `>`, and anything
    ///   after it is ignored
    ///
    /// # Errors
    ///
    /// Returns a [`TagParseError`] describing the first structural problem
    /// found. Failures are local: callers treat the tag as absent.
    pub fn parse(text: &str, assume_full_tag: bool) -> Result<Self, TagParseError> {
        let bytes = text.as_bytes();

        if bytes.len() < 3 {
            return Err(TagParseError::TooShort);
        }
        if bytes[0] != b'<' {
            return Err(TagParseError::MissingOpenBracket);
        }

        let end = if assume_full_tag {
            if bytes[bytes.len() - 1] != b'>' {
                return Err(TagParseError::MissingCloseBracket);
            }
            bytes.len() - 1
        } else {
            find_byte(bytes, 1, b'>').ok_or(TagParseError::MissingCloseBracket)?
        };

        let self_closing = end > 1 && bytes[end - 1] == b'/';
        let attr_end = if self_closing { end - 1 } else { end };

        let mut pos = 1;
        while pos < attr_end && is_tag_name_char(bytes[pos]) {
            pos += 1;
        }
        if pos == 1 {
            return Err(TagParseError::EmptyName);
        }
        if !is_tag_start_char(bytes[1]) {
            return Err(TagParseError::InvalidName);
        }
        if pos < attr_end && !bytes[pos].is_ascii_whitespace() {
            return Err(TagParseError::InvalidName);
        }
        let name = text[1..pos].to_ascii_lowercase();

        let mut attributes = HashMap::new();
        let mut parser = AttributeParser {
            text,
            bytes,
            pos,
            end: attr_end,
        };
        while let Some((key, value)) = parser.next_attribute()? {
            attributes.insert(key, value);
        }

        Ok(Self {
            name,
            self_closing,
            attributes,
        })
    }

    /// Look up an attribute by name (case-insensitive)
    pub fn attribute(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.attributes.get(name) {
            return Some(value.as_str());
        }
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Cursor over the attribute section of one tag
struct AttributeParser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    end: usize,
}

impl AttributeParser<'_> {
    fn next_attribute(&mut self) -> Result<Option<(String, String)>, TagParseError> {
        loop {
            self.skip_whitespace();
            if self.pos >= self.end {
                return Ok(None);
            }

            let name_start = self.pos;
            while self.pos < self.end && is_attribute_name_char(self.bytes[self.pos]) {
                self.pos += 1;
            }

            if self.pos == name_start {
                // Stray quote or punctuation between attributes
                self.pos += self.text[self.pos..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                continue;
            }

            let name = self.text[name_start..self.pos].to_ascii_lowercase();

            if self.pos < self.end && self.bytes[self.pos].is_ascii_whitespace() {
                let after = self.peek_past_whitespace();
                if after < self.end && self.bytes[after] == b'=' {
                    self.pos = after;
                }
            }

            if self.pos < self.end && self.bytes[self.pos] == b'=' {
                self.pos += 1;
                let value = self.value()?;
                return Ok(Some((name, value)));
            }

            return Ok(Some((name, String::new())));
        }
    }

    fn value(&mut self) -> Result<String, TagParseError> {
        self.skip_whitespace();
        if self.pos >= self.end {
            return Ok(String::new());
        }

        let quote = self.bytes[self.pos];
        if quote == b'"' || quote == b'\'' {
            let start = self.pos + 1;
            // The closing quote may sit past `end` when the value contains `/>`
            let close = find_byte(self.bytes, start, quote)
                .filter(|&i| i < self.bytes.len() - 1)
                .ok_or(TagParseError::UnterminatedValue)?;
            self.pos = close + 1;
            return Ok(self.text[start..close].to_string());
        }

        let start = self.pos;
        while self.pos < self.end && !self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        Ok(self.text[start..self.pos].to_string())
    }

    fn skip_whitespace(&mut self) {
        self.pos = self.peek_past_whitespace();
    }

    fn peek_past_whitespace(&self) -> usize {
        let mut i = self.pos;
        while i < self.end && self.bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    }
}

fn is_attribute_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> HtmlTag {
        HtmlTag::parse(text, true).expect("tag should parse")
    }

    // ============================================================================
    // Tag Names
    // ============================================================================

    #[test]
    fn test_parse_bare_tag() {
        let tag = parse("<p>");
        assert_eq!(tag.name, "p");
        assert!(!tag.self_closing);
        assert!(tag.attributes.is_empty());
    }

    #[test]
    fn test_parse_lowercases_name() {
        assert_eq!(parse("<BLOCKQUOTE>").name, "blockquote");
    }

    #[test]
    fn test_parse_self_closing() {
        let tag = parse("<br/>");
        assert_eq!(tag.name, "br");
        assert!(tag.self_closing);

        let tag = parse("<hr />");
        assert_eq!(tag.name, "hr");
        assert!(tag.self_closing);
    }

    #[test]
    fn test_parse_namespaced_name() {
        assert_eq!(parse("<dc:creator>").name, "dc:creator");
    }

    // ============================================================================
    // Attributes
    // ============================================================================

    #[test]
    fn test_parse_quoted_values() {
        let tag = parse(r#"<a href="http://x.com/?a=1&b=2" title='Say "hi"'>"#);
        assert_eq!(tag.attribute("href"), Some("http://x.com/?a=1&b=2"));
        assert_eq!(tag.attribute("title"), Some(r#"Say "hi""#));
    }

    #[test]
    fn test_parse_unquoted_value() {
        let tag = parse("<td colspan=2 align=left>");
        assert_eq!(tag.attribute("colspan"), Some("2"));
        assert_eq!(tag.attribute("align"), Some("left"));
    }

    #[test]
    fn test_parse_boolean_attributes() {
        let tag = parse("<input disabled checked>");
        assert_eq!(tag.attribute("disabled"), Some(""));
        assert_eq!(tag.attribute("checked"), Some(""));
    }

    #[test]
    fn test_parse_spaces_around_equals() {
        let tag = parse(r#"<meta charset = "utf-8">"#);
        assert_eq!(tag.attribute("charset"), Some("utf-8"));
    }

    #[test]
    fn test_parse_boolean_then_valued() {
        let tag = parse(r#"<option selected value="x">"#);
        assert_eq!(tag.attribute("selected"), Some(""));
        assert_eq!(tag.attribute("value"), Some("x"));
    }

    #[test]
    fn test_parse_last_value_wins() {
        let tag = parse(r#"<p class="a" CLASS="b">"#);
        assert_eq!(tag.attributes.len(), 1);
        assert_eq!(tag.attribute("class"), Some("b"));
    }

    #[test]
    fn test_attribute_lookup_is_case_insensitive() {
        let tag = parse(r#"<meta HTTP-EQUIV="Content-Type">"#);
        assert_eq!(tag.attribute("HTTP-EQUIV"), Some("Content-Type"));
        assert_eq!(tag.attribute("http-equiv"), Some("Content-Type"));
    }

    #[test]
    fn test_parse_quoted_value_with_slash_before_close() {
        let tag = parse(r#"<a href="/">"#);
        assert_eq!(tag.attribute("href"), Some("/"));
    }

    #[test]
    fn test_parse_without_full_tag_stops_at_first_gt() {
        let tag = HtmlTag::parse("<p class=lead>Text after</p>", false).expect("should parse");
        assert_eq!(tag.name, "p");
        assert_eq!(tag.attribute("class"), Some("lead"));
    }

    // ============================================================================
    // Failures
    // ============================================================================

    #[test]
    fn test_parse_failures() {
        assert_eq!(HtmlTag::parse("<>", true), Err(TagParseError::TooShort));
        assert_eq!(
            HtmlTag::parse("p class", true),
            Err(TagParseError::MissingOpenBracket)
        );
        assert_eq!(
            HtmlTag::parse("<p class", true),
            Err(TagParseError::MissingCloseBracket)
        );
        assert_eq!(
            HtmlTag::parse("<p class", false),
            Err(TagParseError::MissingCloseBracket)
        );
        assert_eq!(HtmlTag::parse("< p>", true), Err(TagParseError::EmptyName));
        assert_eq!(HtmlTag::parse("<9p>", true), Err(TagParseError::InvalidName));
        assert_eq!(HtmlTag::parse("<p$>", true), Err(TagParseError::InvalidName));
        assert_eq!(
            HtmlTag::parse(r#"<a href="x>"#, true),
            Err(TagParseError::UnterminatedValue)
        );
    }
}
