//! vCard serialization (vCard 2.1, RFC 2426 and RFC 6350).
//!
//! ## Usage
//!
//! ```rust
//! use cardwright_rfc::rfc::vcard::build::VCardWriter;
//! use cardwright_rfc::rfc::vcard::core::{Property, VCard, VCardVersion};
//!
//! let mut card = VCard::with_version(VCardVersion::V4_0);
//! card.add_property(Property::formatted_name("John Doe"));
//! card.add_property(Property::email("john@example.com"));
//!
//! let output = VCardWriter::new().with_product_id(false).write(&card).unwrap();
//! assert!(output.starts_with("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:John Doe\r\n"));
//! ```
//!
//! ## Features
//!
//! - Line folding at 75 octets (UTF-8 safe), soft line breaks for
//!   quoted-printable 2.1 values
//! - Text escaping per version
//! - RFC 6868 caret encoding for parameters
//! - PREF / `TYPE=pref` conversion, LABEL properties and AGENT blocks for
//!   versions before 4.0

mod escape;
mod fold;
mod writer;

pub use escape::{encode_quoted_printable, escape_param_value, escape_text, join_escaped};
pub use fold::{fold_line, fold_quoted_printable};
pub use writer::{VCardWriter, serialize, serialize_single};
