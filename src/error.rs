//! Error types for conversion operations
//!
//! The transducer itself never fails: malformed markup degrades into
//! best-effort text. Errors only surface at the two explicit boundaries,
//! the standalone tag parser and the byte-input decoding path.

use std::fmt;

/// Errors that can occur while preparing byte input for conversion
#[derive(Debug)]
pub enum ConversionError {
    /// Character encoding error
    EncodingError(String),
    /// Invalid input data
    InvalidInput(String),
}

impl ConversionError {
    /// Get numeric error code
    pub fn code(&self) -> u32 {
        match self {
            ConversionError::EncodingError(_) => 2,
            ConversionError::InvalidInput(_) => 5,
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
            ConversionError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for ConversionError {}

/// Reasons a standalone opening tag could not be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagParseError {
    /// Fewer than three characters (`<x>` is the shortest tag)
    TooShort,
    /// Text does not start with `<`
    MissingOpenBracket,
    /// No terminating `>`
    MissingCloseBracket,
    /// Zero-length tag name
    EmptyName,
    /// Tag name starts with or contains a character that cannot appear in a name
    InvalidName,
    /// A quoted attribute value has no matching closing quote
    UnterminatedValue,
}

impl fmt::Display for TagParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagParseError::TooShort => write!(f, "Tag is too short"),
            TagParseError::MissingOpenBracket => write!(f, "Tag does not start with '<'"),
            TagParseError::MissingCloseBracket => write!(f, "Tag has no terminating '>'"),
            TagParseError::EmptyName => write!(f, "Tag name is empty"),
            TagParseError::InvalidName => write!(f, "Tag name is invalid"),
            TagParseError::UnterminatedValue => {
                write!(f, "Quoted attribute value is not terminated")
            }
        }
    }
}

impl std::error::Error for TagParseError {}
