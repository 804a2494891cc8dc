//! vCard parse error types.

use std::fmt;

/// Result type for vCard parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A structural error that stops reading.
///
/// Problems inside a single property never produce a `ParseError`; they are
/// reported as [`ParseWarning`](crate::rfc::vcard::scribe::ParseWarning)s.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Line number where the error occurred (1-based).
    pub line: usize,
    /// Additional context or message.
    pub message: String,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ParseErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }

    /// A vCard that is never closed with `END:VCARD`.
    #[must_use]
    pub fn missing_end(line: usize) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEof,
            line,
            "vCard not closed with END:VCARD",
        )
    }

    #[must_use]
    pub fn unsupported_version(line: usize, version: &str) -> Self {
        Self::new(
            ParseErrorKind::UnsupportedVersion,
            line,
            format!("unsupported vCard version: {version}"),
        )
    }

    /// A content line without a name/value separator.
    #[must_use]
    pub fn malformed_line(line: usize, content: &str) -> Self {
        Self::new(
            ParseErrorKind::MalformedLine,
            line,
            format!("missing colon separator in {content:?}"),
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.kind, self.message)
    }
}

impl std::error::Error for ParseError {}

/// The kind of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Input ended inside a vCard.
    UnexpectedEof,
    /// A content line could not be split into name and value.
    MalformedLine,
    /// Empty or otherwise unusable property name.
    InvalidPropertyName,
    /// VERSION names a version this library does not know.
    UnsupportedVersion,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::MalformedLine => write!(f, "malformed content line"),
            Self::InvalidPropertyName => write!(f, "invalid property name"),
            Self::UnsupportedVersion => write!(f, "unsupported version"),
        }
    }
}
