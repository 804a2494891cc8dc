//! vCard object model, validation and text encoding (vCard 2.1, RFC 2426,
//! RFC 6350).
//!
//! One in-memory model serves all three versions. Each [`core::Property`]
//! declares the versions it exists in; [`validate`] reports what a vCard
//! lacks or carries that a target version does not allow; the [`scribe`]
//! registry maps every property kind to the codec that reads and writes it.
//!
//! ## Submodules
//!
//! - [`core`] - `VCard`, `Property`, `Parameters` and the value types
//! - [`validate`] - Version-aware validation warnings
//! - [`scribe`] - Per-kind codecs and the `ScribeRegistry`
//! - [`parse`] - Text reader
//! - [`build`] - Text writer
//!
//! ## Example
//!
//! ```rust
//! use cardwright_rfc::rfc::vcard::build::VCardWriter;
//! use cardwright_rfc::rfc::vcard::core::VCardVersion;
//! use cardwright_rfc::rfc::vcard::parse::parse_single;
//!
//! let card = parse_single(
//!     "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Roe\r\nEND:VCARD\r\n",
//! )
//! .unwrap();
//!
//! // 3.0 also requires N.
//! assert!(!card.validate(VCardVersion::V3_0).is_empty());
//!
//! let output = VCardWriter::new()
//!     .with_version(Some(VCardVersion::V3_0))
//!     .with_product_id(false)
//!     .write(&card)
//!     .unwrap();
//! assert!(output.contains("VERSION:3.0\r\nFN:Jane Roe\r\n"));
//! ```

pub mod build;
pub mod core;
pub mod parse;
pub mod scribe;
pub mod validate;

#[cfg(test)]
mod tests;

pub use build::{VCardWriter, serialize, serialize_single};
pub use self::core::{Parameters, Property, PropertyKind, PropertyValue, VCard, VCardVersion};
pub use parse::{VCardReader, parse, parse_single};
