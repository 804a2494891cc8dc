//! Validation report types.

use std::fmt;

use crate::rfc::vcard::core::{Property, PropertyKind, VCardVersion};

/// Identifies the rule a warning comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    MissingStructuredName,
    MissingFormattedName,
    UnsupportedProperty,
    UnsupportedParameter,
    InvalidParameterName,
    InvalidParameterValue,
    InvalidGroup,
    InvalidPropertyName,
    EmptyValue,
    MultipleComponentValues,
    MissingBinaryValue,
    UnsupportedType,
    TelUriUnsupported,
    TextDateUnsupported,
    PartialDateUnsupported,
    TextTimezoneUnsupported,
    LatitudeOutOfRange,
    LongitudeOutOfRange,
    NestedVCard,
    MalformedXml,
    UnsupportedEncoding,
    UnsupportedDataType,
    MalformedParameter,
    EmptyAltId,
}

impl WarningCode {
    /// Stable numeric code, shown in rendered warnings.
    #[must_use]
    pub const fn number(self) -> u16 {
        match self {
            Self::MissingStructuredName => 0,
            Self::MissingFormattedName => 1,
            Self::UnsupportedProperty => 2,
            Self::UnsupportedParameter => 3,
            Self::InvalidParameterName => 4,
            Self::InvalidParameterValue => 5,
            Self::InvalidGroup => 6,
            Self::InvalidPropertyName => 7,
            Self::EmptyValue => 8,
            Self::MultipleComponentValues => 9,
            Self::MissingBinaryValue => 10,
            Self::UnsupportedType => 11,
            Self::TelUriUnsupported => 12,
            Self::TextDateUnsupported => 13,
            Self::PartialDateUnsupported => 14,
            Self::TextTimezoneUnsupported => 15,
            Self::LatitudeOutOfRange => 16,
            Self::LongitudeOutOfRange => 17,
            Self::NestedVCard => 18,
            Self::MalformedXml => 19,
            Self::UnsupportedEncoding => 20,
            Self::UnsupportedDataType => 21,
            Self::MalformedParameter => 22,
            Self::EmptyAltId => 23,
        }
    }
}

/// One validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    code: Option<WarningCode>,
    message: String,
}

impl ValidationWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// A warning raised by caller-defined rules.
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> Option<WarningCode> {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "W{:02}: {}", code.number(), self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// The warnings of one property, or of the document itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningsGroup {
    property: Option<Property>,
    warnings: Vec<ValidationWarning>,
}

impl WarningsGroup {
    pub(crate) fn new(property: Option<Property>, warnings: Vec<ValidationWarning>) -> Self {
        Self { property, warnings }
    }

    /// The offending property; `None` for document-level warnings.
    #[must_use]
    pub fn property(&self) -> Option<&Property> {
        self.property.as_ref()
    }

    #[must_use]
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }
}

impl fmt::Display for WarningsGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, warning) in self.warnings.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            if let Some(property) = &self.property {
                write!(f, "[{}] | ", property.name())?;
            }
            write!(f, "{warning}")?;
        }
        Ok(())
    }
}

/// The result of validating a vCard against one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarnings {
    version: VCardVersion,
    groups: Vec<WarningsGroup>,
}

impl ValidationWarnings {
    pub(crate) fn new(version: VCardVersion, groups: Vec<WarningsGroup>) -> Self {
        Self { version, groups }
    }

    /// The version the vCard was validated against.
    #[must_use]
    pub fn version(&self) -> VCardVersion {
        self.version
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn groups(&self) -> &[WarningsGroup] {
        &self.groups
    }

    /// Looks up groups by property kind, or the document group with `None`.
    #[must_use]
    pub fn by_kind(&self, kind: Option<PropertyKind>) -> Vec<&WarningsGroup> {
        self.groups
            .iter()
            .filter(|g| g.property().map(Property::kind) == kind)
            .collect()
    }

    /// Document-level warnings (missing required properties).
    #[must_use]
    pub fn document_warnings(&self) -> Vec<&ValidationWarning> {
        self.by_kind(None)
            .into_iter()
            .flat_map(|g| g.warnings.iter())
            .collect()
    }

    /// Every warning code, in report order.
    #[must_use]
    pub fn codes(&self) -> Vec<WarningCode> {
        self.groups
            .iter()
            .flat_map(|g| g.warnings.iter())
            .filter_map(ValidationWarning::code)
            .collect()
    }
}

impl fmt::Display for ValidationWarnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{group}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_display() {
        let warning = ValidationWarning::new(WarningCode::MissingFormattedName, "FN required");
        assert_eq!(warning.to_string(), "W01: FN required");
        assert_eq!(ValidationWarning::custom("odd").to_string(), "odd");
    }

    #[test]
    fn report_rendering_prefixes_property_lines() {
        let report = ValidationWarnings::new(
            VCardVersion::V4_0,
            vec![
                WarningsGroup::new(
                    None,
                    vec![ValidationWarning::new(
                        WarningCode::MissingFormattedName,
                        "FN required",
                    )],
                ),
                WarningsGroup::new(
                    Some(Property::note("")),
                    vec![ValidationWarning::new(WarningCode::EmptyValue, "no value")],
                ),
            ],
        );

        assert_eq!(report.to_string(), "W01: FN required\n[NOTE] | W08: no value");
        assert_eq!(report.by_kind(Some(PropertyKind::Note)).len(), 1);
        assert_eq!(report.by_kind(Some(PropertyKind::Email)).len(), 0);
        assert_eq!(report.document_warnings().len(), 1);
    }
}
