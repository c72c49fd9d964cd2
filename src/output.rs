//! Output buffer and line-break normalization
//!
//! The buffer starts with a single space sentinel so that "was the last
//! emitted character whitespace" never needs an empty-buffer special case.
//! The sentinel, like any other leading or trailing ASCII whitespace, is
//! trimmed away by [`OutputBuffer::into_string`].
//!
//! # Separation
//!
//! Block elements ask for a number of line breaks before or after them.
//! [`OutputBuffer::separate`] looks backward over what has already been
//! emitted and only adds the missing breaks, so asking twice for the same
//! separation emits nothing the second time. The start of the buffer counts
//! as fully separated.
//!
//! Inside a blockquote every break is written as a quoted continuation line
//! (`"\r\n> "`) and the backward scan treats a line consisting of only a quote
//! marker as an empty line. Only markers the buffer emitted itself count; a
//! `>` copied from the input is ordinary text.
//!
//! ```rust
//! use onepass_markdown::output::OutputBuffer;
//!
//! let mut out = OutputBuffer::new();
//! out.push_str("A");
//! out.separate(2, false, false);
//! out.separate(2, false, false);
//! out.push_str("B");
//! assert_eq!(out.into_string(), "A\r\n\r\nB");
//! ```

/// Plain line break
pub const LINE_BREAK: &str = "\r\n";

/// Line break that continues a blockquote
pub const QUOTED_BREAK: &str = "\r\n> ";

/// Markdown hard line break
pub const HARD_BREAK: &str = "  \r\n";

/// Quote prefix for a line that has already been started
pub const QUOTE_PREFIX: &str = "> ";

/// Growable output with whitespace-aware helpers
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    buf: String,
    /// Byte offsets of emitted quote markers after the last non-whitespace text
    quote_markers: Vec<usize>,
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a buffer with room for `capacity` bytes of output
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = String::with_capacity(capacity + 1);
        buf.push(' ');
        Self {
            buf,
            quote_markers: Vec::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    #[inline]
    pub fn push_str(&mut self, s: &str) {
        if !s.bytes().all(|b| b.is_ascii_whitespace()) {
            self.quote_markers.clear();
        }
        self.buf.push_str(s);
    }

    #[inline]
    pub fn push(&mut self, c: char) {
        if !c.is_ascii_whitespace() {
            self.quote_markers.clear();
        }
        self.buf.push(c);
    }

    /// Emit a line break that continues the blockquote
    pub fn push_quoted_break(&mut self) {
        self.buf.push_str(LINE_BREAK);
        self.push_quote_prefix();
    }

    /// Emit a quote marker on a line that has already been started
    pub fn push_quote_prefix(&mut self) {
        self.quote_markers.push(self.buf.len());
        self.buf.push_str(QUOTE_PREFIX);
    }

    #[inline]
    fn is_quote_marker(&self, i: usize) -> bool {
        self.quote_markers.binary_search(&i).is_ok()
    }

    fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
        self.quote_markers.retain(|&i| i < len);
    }

    /// Whether the last emitted character is collapsible whitespace
    ///
    /// A non-breaking space is not collapsible.
    #[inline]
    pub fn ends_with_whitespace(&self) -> bool {
        matches!(
            self.buf.as_bytes().last(),
            None | Some(b' ' | b'\t' | b'\r' | b'\n')
        )
    }

    /// Emit a single space unless the output already ends in whitespace
    #[inline]
    pub fn push_collapsed_space(&mut self) {
        if !self.ends_with_whitespace() {
            self.buf.push(' ');
        }
    }

    /// Remove one trailing space, never the sentinel
    pub fn strip_pending_space(&mut self) {
        if self.buf.len() > 1 && self.buf.ends_with(' ') {
            self.buf.pop();
        }
    }

    /// Add line breaks until `required` separate the tail from what follows
    ///
    /// # Arguments
    ///
    /// * `required` - Number of line breaks wanted (1 or 2)
    /// * `quoted` - Render breaks as blockquote continuation lines
    /// * `keep_pending_space` - Do not strip a trailing space before breaking
    pub fn separate(&mut self, required: usize, quoted: bool, keep_pending_space: bool) {
        if quoted {
            self.separate_quoted(required);
            return;
        }

        let existing = self.trailing_line_breaks(required);
        if !keep_pending_space {
            self.strip_pending_space();
        }
        for _ in existing..required {
            self.buf.push_str(LINE_BREAK);
        }
    }

    fn separate_quoted(&mut self, required: usize) {
        if self.buf.ends_with('\n') {
            self.push_quote_prefix();
        }

        match self.trailing_quoted_breaks(required) {
            // Nothing but whitespace and quote markers so far
            None => {
                if !self.on_fresh_quoted_line() {
                    self.push_quoted_break();
                }
            }
            Some(existing) => {
                if existing == 0 {
                    self.strip_pending_space();
                }
                for _ in existing..required {
                    self.push_quoted_break();
                }
            }
        }
    }

    /// Count line breaks at the end of the buffer, up to `limit`
    ///
    /// Spaces, tabs and carriage returns between the breaks are skipped.
    /// Reaching the start of the buffer counts as `limit`.
    pub fn trailing_line_breaks(&self, limit: usize) -> usize {
        let mut count = 0;
        for &b in self.buf.as_bytes().iter().rev() {
            match b {
                b'\n' => {
                    count += 1;
                    if count >= limit {
                        return count;
                    }
                }
                b' ' | b'\t' | b'\r' => {}
                _ => return count,
            }
        }
        limit
    }

    /// Like [`trailing_line_breaks`](Self::trailing_line_breaks), also skipping
    /// quote markers at the start of a line
    ///
    /// Returns `None` when the scan reaches the start of the buffer.
    fn trailing_quoted_breaks(&self, limit: usize) -> Option<usize> {
        let bytes = self.buf.as_bytes();
        let mut count = 0;
        let mut i = bytes.len();
        while i > 0 {
            i -= 1;
            match bytes[i] {
                b'\n' => {
                    count += 1;
                    if count >= limit {
                        return Some(count);
                    }
                }
                b' ' | b'\t' | b'\r' => {}
                b'>' if self.is_quote_marker(i) => {}
                _ => return Some(count),
            }
        }
        None
    }

    /// Whether the current line holds only an emitted quote marker
    pub fn on_fresh_quoted_line(&self) -> bool {
        let trimmed = self.buf.trim_end_matches([' ', '\t']).len();
        trimmed > 0 && self.is_quote_marker(trimmed - 1)
    }

    /// Whether the quoted tail already ends in a blank quoted line, or holds
    /// nothing but whitespace and quote markers
    pub fn ends_with_quoted_blank_line(&self) -> bool {
        self.trailing_quoted_breaks(2).is_none_or(|n| n >= 2)
    }

    /// Remove trailing whitespace and empty quoted lines
    ///
    /// Used when leaving a blockquote so the quote does not end with dangling
    /// `> ` lines. Does nothing unless the tail holds an emitted quote marker.
    pub fn strip_quote_tail(&mut self) {
        while self.on_fresh_quoted_line() {
            let marker = self.buf.trim_end_matches([' ', '\t']).len() - 1;
            let kept = self.buf[..marker]
                .trim_end_matches([' ', '\t', '\r', '\n'])
                .len()
                .max(1);
            self.truncate(kept);
        }
    }

    /// Finish the conversion, trimming surrounding ASCII whitespace
    pub fn into_string(self) -> String {
        let trimmed = self.buf.trim_matches(|c: char| c.is_ascii_whitespace());
        if trimmed.len() == self.buf.len() {
            return self.buf;
        }
        trimmed.to_string()
    }
}
