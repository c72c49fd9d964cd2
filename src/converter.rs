//! Single-pass HTML to Markdown converter
//!
//! This module holds the driver: one forward scan over the input that
//! classifies every position as plain text or the start of a tag, and emits
//! Markdown (or plain text) into an [`OutputBuffer`] as it goes. There is no
//! DOM and no backtracking; the only lookahead is bounded (an anchor span, or
//! the first tag inside a blockquote) and never moves the cursor backwards.
//!
//! # Conversion Rules
//!
//! - **Inline tags** (`b`, `strong`, `em`, `i`, `u`, `span`) are replaced by
//!   their marker (`**`, `*`, `_`, or nothing) and never add whitespace.
//! - **Anchors**: a simple `<a href="...">text</a>` becomes `[text](href)`;
//!   anything else drops the tag and keeps its text.
//! - **Blocks** (`p`, `div`, headings, lists, `blockquote`, `pre`, `hr`)
//!   request one or two line breaks of separation; headings get `#` prefixes,
//!   list items a `*   ` bullet, and lines inside a blockquote a `> ` prefix.
//! - **Everything else** is dropped, leaving at most one space behind.
//! - **Text**: whitespace runs collapse to one space; in Markdown mode `*`,
//!   `_` and `` ` `` are backslash-escaped.
//!
//! Malformed markup never fails the conversion. Invalid tags are skipped to
//! their `>`, and a tag that runs off the end of the input ends the scan.
//!
//! # Examples
//!
//! ```rust
//! use onepass_markdown::converter::MarkdownConverter;
//!
//! let converter = MarkdownConverter::new();
//!
//! let markdown = converter.convert("<h1>Title</h1><p>Some <b>bold</b> text.</p>");
//! assert_eq!(markdown, "# Title\r\n\r\nSome **bold** text.");
//!
//! let markdown = converter.convert("<ul><li>one</li><li>two</li></ul>");
//! assert_eq!(markdown, "*   one\r\n*   two");
//! ```
//!
//! ## Plain Text
//!
//! ```rust
//! use onepass_markdown::converter::{ConversionOptions, MarkdownConverter};
//!
//! let converter = MarkdownConverter::with_options(ConversionOptions {
//!     only_strip_tags: true,
//!     ..Default::default()
//! });
//! let text = converter.convert("<h2>Title</h2><p>3 * 4 = <i>12</i></p>");
//! assert_eq!(text, "Title\r\n\r\n3 * 4 = 12");
//! ```

use log::{debug, trace};
use std::borrow::Cow;

use crate::anchor::extract_anchor;
use crate::charset::{decode_to_utf8, detect_charset};
use crate::context::{BigBlock, BlockContext, SmallElement};
use crate::entities::{contains_tags, decode_entities};
use crate::error::ConversionError;
use crate::output::{HARD_BREAK, LINE_BREAK, OutputBuffer};
use crate::scanner::{
    TagName, find_byte, find_subslice_ignore_case, is_tag_start_char, scan_tag_name,
    skip_ascii_whitespace, skip_declaration,
};
use crate::tables::{block_spec, heading_level, inline_marker};
use crate::tag::HtmlTag;

/// Elements whose content is dropped along with the tags
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript"];

/// Markdown thematic break
const RULE: &str = "* * *";

/// Markdown list bullet
const BULLET: &str = "*   ";

/// Conversion options
#[derive(Debug, Clone, Default)]
pub struct ConversionOptions {
    /// Emit plain text: no `**`, `#`, bullets, rules or quote markers
    pub only_strip_tags: bool,
    /// Decode HTML entities before scanning, and again after
    pub html_decode_first: bool,
    /// Return the trimmed input untouched when it contains no tags
    pub short_circuit_if_no_tags: bool,
}

/// Main Markdown converter
///
/// Holds only its options, so a single converter can be shared between
/// threads and reused for any number of conversions. Each call to
/// [`convert`](Self::convert) owns its own cursor, output buffer and block
/// context.
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter {
    options: ConversionOptions,
}

impl MarkdownConverter {
    /// Create a new converter producing Markdown
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new converter with custom options
    pub fn with_options(options: ConversionOptions) -> Self {
        Self { options }
    }

    /// Options this converter was built with
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Convert an HTML string
    ///
    /// Never fails; malformed input produces best-effort output.
    pub fn convert(&self, html: &str) -> String {
        let html: Cow<'_, str> = if self.options.html_decode_first {
            decode_entities(html)
        } else {
            Cow::Borrowed(html)
        };

        if self.options.short_circuit_if_no_tags && !contains_tags(&html) {
            debug!("no tags found, returning trimmed input");
            return trim_ascii_whitespace(&html).to_string();
        }

        let markdown = Transducer::new(&html, !self.options.only_strip_tags).run();

        if self.options.html_decode_first {
            return decode_entities(&markdown).into_owned();
        }
        markdown
    }

    /// Convert raw HTML bytes, detecting their character encoding first
    ///
    /// # Arguments
    ///
    /// * `html` - Raw document bytes
    /// * `content_type` - Optional Content-Type header value
    ///
    /// # Errors
    ///
    /// - `ConversionError::InvalidInput` if `html` is empty
    /// - `ConversionError::EncodingError` if the bytes cannot be decoded
    ///
    /// # Examples
    ///
    /// ```rust
    /// use onepass_markdown::converter::MarkdownConverter;
    ///
    /// let converter = MarkdownConverter::new();
    /// let markdown = converter
    ///     .convert_bytes(b"<p>Caf\xE9</p>", Some("text/html; charset=ISO-8859-1"))
    ///     .unwrap();
    /// assert_eq!(markdown, "Café");
    /// ```
    pub fn convert_bytes(
        &self,
        html: &[u8],
        content_type: Option<&str>,
    ) -> Result<String, ConversionError> {
        if html.is_empty() {
            return Err(ConversionError::InvalidInput(
                "HTML input is empty".to_string(),
            ));
        }

        let charset = detect_charset(content_type, html);
        let text = decode_to_utf8(html, &charset)?;
        Ok(self.convert(&text))
    }
}

/// Outcome of handling one `<...>` construct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagOutcome {
    /// A tag was recognized and handled
    Consumed,
    /// Not a usable tag; skipped without output
    Skipped,
    /// The input ended inside the tag; stop scanning
    Truncated,
}

/// State of one conversion
struct Transducer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    out: OutputBuffer,
    context: BlockContext,
    markdown: bool,
}

impl<'a> Transducer<'a> {
    fn new(input: &'a str, markdown: bool) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            out: OutputBuffer::with_capacity(input.len()),
            context: BlockContext::new(),
            markdown,
        }
    }

    fn run(mut self) -> String {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'<' => {
                    if self.handle_tag() == TagOutcome::Truncated {
                        debug!("input ends inside a tag at byte {}", self.pos);
                        break;
                    }
                }
                b if b.is_ascii_whitespace() => {
                    self.out.push_collapsed_space();
                    self.pos += 1;
                }
                b @ (b'*' | b'_' | b'`') if self.markdown => {
                    self.out.push('\\');
                    self.out.push(char::from(b));
                    self.pos += 1;
                }
                _ => self.copy_text(),
            }
        }
        self.out.into_string()
    }

    /// Copy a run of ordinary text verbatim
    fn copy_text(&mut self) {
        let start = self.pos;
        while self.pos < self.bytes.len() && !self.is_special(self.bytes[self.pos]) {
            self.pos += 1;
        }
        self.out.push_str(&self.input[start..self.pos]);
    }

    #[inline]
    fn is_special(&self, b: u8) -> bool {
        b == b'<'
            || b.is_ascii_whitespace()
            || (self.markdown && matches!(b, b'*' | b'_' | b'`'))
    }

    fn handle_tag(&mut self) -> TagOutcome {
        let start = self.pos;
        if self.bytes.len() - start - 1 < 2 {
            return TagOutcome::Truncated;
        }

        let next = self.bytes[start + 1];
        if next == b'!' {
            return match skip_declaration(self.bytes, start) {
                Some(end) => {
                    self.pos = end;
                    TagOutcome::Skipped
                }
                None => TagOutcome::Truncated,
            };
        }

        let closing = next == b'/';
        let name_start = if closing { start + 2 } else { start + 1 };
        if name_start >= self.bytes.len() || !is_tag_start_char(self.bytes[name_start]) {
            return self.skip_to_tag_end(start);
        }

        match scan_tag_name(self.bytes, name_start) {
            TagName::Valid { name, end } => {
                self.pos = end + 1;
                if closing {
                    self.close_tag(&name);
                } else {
                    self.open_tag(&name, start);
                }
                TagOutcome::Consumed
            }
            TagName::Invalid { end } => {
                self.pos = end + 1;
                TagOutcome::Skipped
            }
            TagName::Unterminated => TagOutcome::Truncated,
        }
    }

    fn skip_to_tag_end(&mut self, from: usize) -> TagOutcome {
        match find_byte(self.bytes, from, b'>') {
            Some(end) => {
                self.pos = end + 1;
                TagOutcome::Skipped
            }
            None => TagOutcome::Truncated,
        }
    }

    fn open_tag(&mut self, name: &str, tag_start: usize) {
        if let Some(marker) = inline_marker(name) {
            if name == "a" && self.markdown {
                self.open_anchor(tag_start);
            } else if self.markdown {
                self.out.push_str(marker);
            }
            return;
        }

        if let Some(level) = heading_level(name) {
            self.context.open_small(SmallElement::Heading);
            self.separate(2, true, false);
            if self.markdown {
                for _ in 0..level {
                    self.out.push('#');
                }
                self.out.push(' ');
            }
            return;
        }

        match name {
            "p" => {
                self.context.open_small(SmallElement::Paragraph);
                self.separate(2, true, false);
            }
            "div" => {
                self.context.open_small(SmallElement::None);
                self.separate(2, true, false);
            }
            "ul" | "ol" | "pre" => {
                if let Some(big) = BigBlock::for_tag(name) {
                    self.context.open_big(big);
                }
                self.separate(2, false, false);
            }
            "blockquote" => {
                self.context.open_big(BigBlock::Blockquote);
                let lines = if self.next_tag_is_blockquote_sensitive() {
                    1
                } else {
                    2
                };
                self.separate(lines, true, false);
            }
            "li" => {
                self.context.open_small(SmallElement::ListItem);
                self.separate(1, false, false);
                if self.markdown {
                    self.out.push_str(BULLET);
                }
            }
            "hr" => {
                self.separate(1, true, false);
                if self.markdown {
                    self.out.push_str(RULE);
                    self.separate(2, true, true);
                }
            }
            "br" => self.line_break(),
            _ if RAW_TEXT_ELEMENTS.contains(&name) => self.skip_raw_text(name),
            _ => self.out.push_collapsed_space(),
        }
    }

    fn close_tag(&mut self, name: &str) {
        if let Some(marker) = inline_marker(name) {
            if name == "a" && self.markdown {
                self.out.push_collapsed_space();
            } else if self.markdown {
                self.out.push_str(marker);
            }
            return;
        }

        if name == "blockquote" {
            self.close_blockquote();
            return;
        }

        match block_spec(name) {
            Some(spec) => {
                self.context.close(spec.big_block);
                self.separate(spec.blank_lines, spec.blockquote_sensitive, true);
            }
            None => self.out.push_collapsed_space(),
        }
    }

    /// Leave the quote with at most one line break, never a doubled blank line
    fn close_blockquote(&mut self) {
        self.context.close(true);
        self.out.strip_quote_tail();
        if self.out.trailing_line_breaks(2) < 2 {
            self.out.strip_pending_space();
            self.out.push_str(LINE_BREAK);
        }
        self.pos = skip_ascii_whitespace(self.bytes, self.pos);
    }

    fn open_anchor(&mut self, tag_start: usize) {
        match extract_anchor(self.input, tag_start) {
            Some(anchor) => {
                self.out.push_str(&anchor.to_markdown());
                self.pos = anchor.end;
            }
            None => {
                trace!("anchor at byte {tag_start} is not a simple link");
                self.out.push_collapsed_space();
            }
        }
    }

    /// Request line-break separation and skip the source whitespace after
    /// the tag
    fn separate(&mut self, lines: usize, blockquote_sensitive: bool, closing: bool) {
        let in_blockquote = self.context.in_blockquote();
        let quoted = blockquote_sensitive && self.markdown && in_blockquote;

        if !quoted {
            self.out.strip_quote_tail();
        }
        self.out.separate(lines, quoted, closing && in_blockquote);
        self.pos = skip_ascii_whitespace(self.bytes, self.pos);
    }

    fn line_break(&mut self) {
        if !self.markdown {
            self.out.strip_pending_space();
            self.out.push_str(LINE_BREAK);
            return;
        }

        let in_blockquote = self.context.in_blockquote();
        if in_blockquote && self.out.ends_with_quoted_blank_line() {
            trace!("hard break after a quoted blank line dropped");
            return;
        }

        self.out.strip_pending_space();
        self.out.push_str(HARD_BREAK);
        if in_blockquote {
            self.out.push_quote_prefix();
        }
    }

    /// Peek at the first token after an opening `<blockquote>`
    fn next_tag_is_blockquote_sensitive(&self) -> bool {
        let start = skip_ascii_whitespace(self.bytes, self.pos);
        if self.bytes.get(start) != Some(&b'<') {
            return false;
        }
        let Some(end) = find_byte(self.bytes, start, b'>') else {
            return false;
        };

        HtmlTag::parse(&self.input[start..=end], true)
            .ok()
            .and_then(|tag| block_spec(&tag.name))
            .is_some_and(|spec| spec.blockquote_sensitive)
    }

    /// Drop everything up to and including the matching close tag
    fn skip_raw_text(&mut self, name: &str) {
        let mut close = Vec::with_capacity(name.len() + 2);
        close.extend_from_slice(b"</");
        close.extend_from_slice(name.as_bytes());

        self.pos = match find_subslice_ignore_case(self.bytes, self.pos, &close) {
            Some(i) => find_byte(self.bytes, i, b'>').map_or(self.bytes.len(), |end| end + 1),
            None => {
                debug!("unterminated <{name}>, dropping the rest of the input");
                self.bytes.len()
            }
        };
        self.out.push_collapsed_space();
    }
}

fn trim_ascii_whitespace(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_ascii_whitespace())
}
