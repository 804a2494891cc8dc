//! Scribes: per-kind codecs between the object model and the text encoding.
//!
//! A [`PropertyScribe`] turns one property's wire value into a
//! [`PropertyValue`] and back. The [`ScribeRegistry`] maps kinds and wire
//! names to scribes; names nobody claims fall back to [`RawScribe`], which
//! keeps the value verbatim.
//!
//! ## Example
//!
//! ```rust
//! use cardwright_rfc::rfc::vcard::core::{PropertyKind, VCardVersion};
//! use cardwright_rfc::rfc::vcard::scribe::ScribeRegistry;
//!
//! let registry = ScribeRegistry::new();
//! let scribe = registry.by_name("fn").unwrap();
//! assert_eq!(scribe.kind(), PropertyKind::FormattedName);
//! assert!(registry.by_name("X-CUSTOM").is_none());
//! ```

mod builtin;
mod raw;
mod registry;

use std::fmt;

use thiserror::Error;

pub use builtin::BuiltinScribe;
pub use raw::RawScribe;
pub use registry::{EncodedProperty, ScribeRegistry};

use crate::rfc::vcard::core::{
    Parameterized, Parameters, Property, PropertyKind, PropertyValue, VCard, VCardVersion,
    ValueDataType, param_names as names, types,
};

/// Errors raised by scribes.
#[derive(Error, Debug)]
pub enum ScribeError {
    #[error("Cannot parse {name} value {value:?}: {reason}")]
    CannotParse {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Cannot write {name} in vCard {version}: {reason}")]
    CannotWrite {
        name: String,
        version: VCardVersion,
        reason: String,
    },

    #[error("No scribe registered for property {0}")]
    NoScribe(String),
}

impl ScribeError {
    pub(crate) fn cannot_parse(name: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::CannotParse {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// A non-fatal problem found while reading one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// Line of the content line (1-based).
    pub line: usize,
    /// Wire name of the property, when the warning concerns one.
    pub property: Option<String>,
    pub message: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.property {
            Some(property) => write!(f, "line {} [{property}]: {}", self.line, self.message),
            None => write!(f, "line {}: {}", self.line, self.message),
        }
    }
}

/// State handed to a scribe while it decodes one property.
#[derive(Debug)]
pub struct ParseContext<'a> {
    version: VCardVersion,
    line: usize,
    name: &'a str,
    warnings: &'a mut Vec<ParseWarning>,
}

impl<'a> ParseContext<'a> {
    #[must_use]
    pub fn new(
        version: VCardVersion,
        line: usize,
        name: &'a str,
        warnings: &'a mut Vec<ParseWarning>,
    ) -> Self {
        Self {
            version,
            line,
            name,
            warnings,
        }
    }

    #[must_use]
    pub fn version(&self) -> VCardVersion {
        self.version
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Wire name of the property being decoded, as written.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name
    }

    /// Records a warning against the current property.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(line = self.line, property = self.name, %message, "Property decode warning");
        self.warnings.push(ParseWarning {
            line: self.line,
            property: Some(self.name.to_string()),
            message,
        });
    }
}

/// Codec for one property kind.
pub trait PropertyScribe: fmt::Debug + Send + Sync {
    fn kind(&self) -> PropertyKind;

    /// Name the property is written with.
    fn wire_name(&self) -> &str {
        self.kind().wire_name()
    }

    /// Data type a value has when no VALUE parameter is given.
    fn default_data_type(&self, version: VCardVersion) -> Option<ValueDataType>;

    /// Data type of a specific property's value. The writer emits VALUE only
    /// when this differs from [`Self::default_data_type`].
    fn data_type(&self, _property: &Property, version: VCardVersion) -> Option<ValueDataType> {
        self.default_data_type(version)
    }

    /// Parameters to write for a property in a target version.
    fn prepare_parameters(
        &self,
        property: &Property,
        version: VCardVersion,
        vcard: &VCard,
    ) -> Parameters {
        prepare_standard_parameters(property, version, vcard)
    }

    /// Decodes a wire value. `parameters` may be adjusted, e.g. to drop an
    /// ENCODING the value no longer needs.
    ///
    /// ## Errors
    /// Returns [`ScribeError::CannotParse`] if the value cannot be read; the
    /// registry then keeps the property raw.
    fn decode(
        &self,
        value: &str,
        data_type: Option<&ValueDataType>,
        parameters: &mut Parameters,
        ctx: &mut ParseContext<'_>,
    ) -> Result<PropertyValue, ScribeError>;

    /// Encodes the property's value for a target version.
    ///
    /// ## Errors
    /// Returns [`ScribeError::CannotWrite`] if the value has no text form in
    /// that version.
    fn encode(&self, property: &Property, version: VCardVersion) -> Result<String, ScribeError>;
}

/// PREF handling shared by every scribe.
///
/// vCard 4.0 writes PREF; earlier versions only know `TYPE=pref`, given to
/// the most preferred property of its kind.
#[must_use]
pub fn prepare_standard_parameters(
    property: &Property,
    version: VCardVersion,
    vcard: &VCard,
) -> Parameters {
    let mut parameters = property.parameters().clone();

    match version {
        VCardVersion::V4_0 => {
            if parameters.remove(names::TYPE, types::PREF) && !parameters.contains(names::PREF) {
                parameters.set_pref(Some(1));
            }
        }
        VCardVersion::V2_1 | VCardVersion::V3_0 => {
            if !parameters.remove_all(names::PREF).is_empty()
                && is_most_preferred(property, vcard)
                && !parameters.has_type(types::PREF)
            {
                parameters.add_type(types::PREF);
            }
        }
    }

    parameters
}

fn is_most_preferred(property: &Property, vcard: &VCard) -> bool {
    if !matches!(property.pref(), Ok(Some(_))) {
        return false;
    }
    vcard
        .properties_by_pref(property.kind())
        .first()
        .is_some_and(|first| std::ptr::eq(*first, property))
}
