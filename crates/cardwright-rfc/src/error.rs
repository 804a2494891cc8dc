use thiserror::Error;

use crate::rfc::vcard::core::{ParameterError, PropertyKind};
use crate::rfc::vcard::parse::ParseError;
use crate::rfc::vcard::scribe::ScribeError;

/// RFC parsing, serialization and model errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Scribe error: {0}")]
    ScribeError(#[from] ScribeError),

    #[error("Parameter error: {0}")]
    ParameterError(#[from] ParameterError),

    #[error("Value does not match property kind {kind}: expected {expected}, got {actual}")]
    ValueMismatch {
        kind: PropertyKind,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Alternative representations must share one kind: found {first} and {other}")]
    MixedKinds {
        first: PropertyKind,
        other: PropertyKind,
    },

    #[error("Unsupported vCard version: {0}")]
    UnsupportedVersion(String),

    #[error(transparent)]
    CoreError(#[from] cardwright_core::error::CoreError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
