//! Tag classification tables
//!
//! Two process-wide lookup tables, built on first use and never mutated
//! afterwards, so concurrent conversions share them without locking:
//!
//! - **Inline markers**: tags that must not inject surrounding whitespace,
//!   mapped to the Markdown marker emitted in their place.
//! - **Block specs**: tags whose close (and for some, open) requests blank-line
//!   separation.
//!
//! Keys are lower-case tag names as produced by the scanner.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Separation metadata for a block-level tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpec {
    /// Container that establishes a separation context (lists, quotes, pre)
    pub big_block: bool,
    /// Line breaks requested around the element (1 or 2)
    pub blank_lines: usize,
    /// Separation is rendered as `> ` continuation lines inside a blockquote
    pub blockquote_sensitive: bool,
}

const PARAGRAPH_LIKE: BlockSpec = BlockSpec {
    big_block: false,
    blank_lines: 2,
    blockquote_sensitive: true,
};

const LIST_ITEM: BlockSpec = BlockSpec {
    big_block: false,
    blank_lines: 1,
    blockquote_sensitive: false,
};

const CONTAINER: BlockSpec = BlockSpec {
    big_block: true,
    blank_lines: 2,
    blockquote_sensitive: false,
};

const BLOCKQUOTE: BlockSpec = BlockSpec {
    big_block: true,
    blank_lines: 2,
    blockquote_sensitive: true,
};

fn inline_table() -> &'static HashMap<&'static str, &'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| {
        HashMap::from([
            ("b", "**"),
            ("strong", "**"),
            ("em", "*"),
            ("i", "*"),
            ("u", "_"),
            ("span", ""),
            ("a", ""),
        ])
    })
}

fn block_table() -> &'static HashMap<&'static str, BlockSpec> {
    static TABLE: OnceLock<HashMap<&'static str, BlockSpec>> = OnceLock::new();
    TABLE.get_or_init(|| {
        HashMap::from([
            ("p", PARAGRAPH_LIKE),
            ("h1", PARAGRAPH_LIKE),
            ("h2", PARAGRAPH_LIKE),
            ("h3", PARAGRAPH_LIKE),
            ("h4", PARAGRAPH_LIKE),
            ("h5", PARAGRAPH_LIKE),
            ("h6", PARAGRAPH_LIKE),
            ("div", PARAGRAPH_LIKE),
            ("li", LIST_ITEM),
            ("ul", CONTAINER),
            ("ol", CONTAINER),
            ("pre", CONTAINER),
            ("blockquote", BLOCKQUOTE),
        ])
    })
}

/// Marker for a tag that must not inject surrounding whitespace
///
/// `Some("")` means the tag is inline but has no marker of its own
/// (`span`, and `a`, which gets dedicated anchor handling).
///
/// ```rust
/// use onepass_markdown::tables::inline_marker;
///
/// assert_eq!(inline_marker("strong"), Some("**"));
/// assert_eq!(inline_marker("span"), Some(""));
/// assert_eq!(inline_marker("div"), None);
/// ```
pub fn inline_marker(name: &str) -> Option<&'static str> {
    inline_table().get(name).copied()
}

/// Separation metadata for a block-level tag
pub fn block_spec(name: &str) -> Option<BlockSpec> {
    block_table().get(name).copied()
}

/// Heading level for `h1`..`h6`
///
/// Recognized by shape rather than by table lookup.
pub fn heading_level(name: &str) -> Option<usize> {
    match name.as_bytes() {
        [b'h', digit @ b'1'..=b'6'] => Some(usize::from(digit - b'0')),
        _ => None,
    }
}
