//! Single-pass HTML to Markdown converter
//!
//! This library turns feed and article markup into normalized Markdown, or
//! into plain text, with one left-to-right scan over the input. It does not
//! build a DOM and does not validate the markup: mismatched or broken tags
//! degrade into best-effort text instead of errors.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `converter`: the scanning driver and its options
//! - `scanner`: tag name scanning and byte search helpers
//! - `tag`: standalone opening-tag parser used for lookahead
//! - `tables`: process-wide tag classification tables
//! - `context`: two-slot block context (container and leaf element)
//! - `output`: output buffer and line-break normalization
//! - `anchor`: `<a href>` to `[text](href)` extraction
//! - `entities`: entity decoding and the tag-presence probe
//! - `charset`: encoding detection and transcoding for byte input
//!
//! # Examples
//!
//! ```rust
//! use onepass_markdown::{ConversionOptions, convert, convert_with};
//!
//! assert_eq!(convert("<b>hi</b>"), "**hi**");
//! assert_eq!(
//!     convert(r#"<a href="http://x.com">click</a>"#),
//!     "[click](http://x.com)"
//! );
//!
//! let options = ConversionOptions {
//!     only_strip_tags: true,
//!     ..Default::default()
//! };
//! assert_eq!(convert_with("<p>A</p><p>B</p>", &options), "A\r\n\r\nB");
//! ```
//!
//! # Thread Safety
//!
//! Conversions share nothing but the read-only classification tables, so any
//! number of them may run concurrently.

pub mod anchor;
pub mod charset;
pub mod context;
pub mod converter;
pub mod entities;
pub mod error;
pub mod output;
pub mod scanner;
pub mod tables;
pub mod tag;

pub use converter::{ConversionOptions, MarkdownConverter};
pub use error::{ConversionError, TagParseError};
pub use tag::HtmlTag;

/// Convert HTML to Markdown with default options
pub fn convert(html: &str) -> String {
    MarkdownConverter::new().convert(html)
}

/// Convert HTML with explicit options
pub fn convert_with(html: &str, options: &ConversionOptions) -> String {
    MarkdownConverter::with_options(options.clone()).convert(html)
}
