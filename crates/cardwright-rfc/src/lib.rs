//! vCard object model, validation engine and wire-format scribes.
//!
//! See [`rfc::vcard`] for an overview.

pub mod error;
pub mod rfc;
