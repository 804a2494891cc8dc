//! vCard text parsing (RFC 2426, RFC 6350 and vCard 2.1).
//!
//! ## Usage
//!
//! ```rust
//! use cardwright_rfc::rfc::vcard::parse::parse_single;
//!
//! let input = "BEGIN:VCARD\r\n\
//! VERSION:4.0\r\n\
//! FN:John Doe\r\n\
//! EMAIL:john@example.com\r\n\
//! END:VCARD\r\n";
//!
//! let card = parse_single(input).unwrap();
//! assert_eq!(card.formatted_name(), Some("John Doe"));
//! ```
//!
//! Use [`VCardReader`] directly to read warnings, share a
//! [`ScribeRegistry`](crate::rfc::vcard::scribe::ScribeRegistry) or change
//! the default version.

mod error;
mod lexer;
mod reader;
mod values;


pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{ContentLine, LexOptions, Lines, decode_caret, parse_content_line};
pub use reader::VCardReader;
pub use values::{
    component_values, decode_charset, decode_quoted_printable, split_component, split_structured,
    unescape_text,
};

use crate::rfc::vcard::core::VCard;

/// Parses a vCard document into one or more vCards.
///
/// ## Errors
/// Returns a parse error if the document is structurally malformed.
/// Unreadable property values are kept raw; use [`VCardReader`] to see the
/// warnings.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse(input: &str) -> ParseResult<Vec<VCard>> {
    let cards = VCardReader::new(input).read_all()?;

    tracing::debug!(count = cards.len(), "Parsed vCards");

    Ok(cards)
}

/// Parses the first vCard of a document.
///
/// ## Errors
/// Returns an error if the document contains no vCards or is malformed.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse_single(input: &str) -> ParseResult<VCard> {
    VCardReader::new(input).read_next()?.ok_or_else(|| {
        tracing::warn!("No vCard found in document");
        ParseError::new(
            ParseErrorKind::UnexpectedEof,
            1,
            "no vCard found in document",
        )
    })
}
