//! Version-aware validation.
//!
//! Validation never fails: every problem becomes a [`ValidationWarning`],
//! grouped by the property that caused it in a [`ValidationWarnings`] report.
//! Callers decide whether warnings block anything.

mod parameters;
mod rules;
mod warning;

pub use parameters::validate_parameters;
pub use rules::validate_kind;
pub use warning::{ValidationWarning, ValidationWarnings, WarningCode, WarningsGroup};

use crate::rfc::vcard::core::chars;
use crate::rfc::vcard::core::{Parameterized, Property, PropertyKind, VCard, VCardVersion};

/// Validates one property.
///
/// Runs the supported-version check, the parameter rules, the group-name
/// check and the kind rules. Every step runs; warnings are concatenated.
#[must_use]
pub fn validate_property(
    property: &Property,
    version: VCardVersion,
    vcard: &VCard,
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if !property.is_supported_by(version) {
        warnings.push(ValidationWarning::new(
            WarningCode::UnsupportedProperty,
            format!(
                "Property is not supported in vCard {version}; supported versions are {}",
                property.supported_versions()
            ),
        ));
    }

    warnings.extend(validate_parameters(property.parameters(), version));

    if let Some(group) = property.group() {
        let style = version.syntax_style();
        if !chars::is_valid_name(group, style) {
            warnings.push(ValidationWarning::new(
                WarningCode::InvalidGroup,
                format!(
                    "Group {group:?} contains characters not allowed in vCard {version}: {:?}",
                    chars::invalid_characters(group, style, true)
                ),
            ));
        }
    }

    warnings.extend(validate_kind(property, version, vcard));
    warnings
}

/// Validates a whole vCard.
///
/// Document rules come first (N for 2.1 and 3.0, FN for 3.0 and 4.0) and are
/// reported without a property. Each property with warnings then gets its own
/// group, in iteration order.
#[tracing::instrument(skip(vcard), fields(count = vcard.len()))]
#[must_use]
pub fn validate_vcard(vcard: &VCard, version: VCardVersion) -> ValidationWarnings {
    let mut groups = Vec::new();
    let mut document = Vec::new();

    let requires_n = matches!(version, VCardVersion::V2_1 | VCardVersion::V3_0);
    if requires_n && vcard.property(PropertyKind::StructuredName).is_none() {
        document.push(ValidationWarning::new(
            WarningCode::MissingStructuredName,
            format!("A structured name (N) property is required for vCard {version}"),
        ));
    }

    let requires_fn = matches!(version, VCardVersion::V3_0 | VCardVersion::V4_0);
    if requires_fn && vcard.property(PropertyKind::FormattedName).is_none() {
        document.push(ValidationWarning::new(
            WarningCode::MissingFormattedName,
            format!("A formatted name (FN) property is required for vCard {version}"),
        ));
    }

    if !document.is_empty() {
        groups.push(WarningsGroup::new(None, document));
    }

    for property in vcard {
        let warnings = validate_property(property, version, vcard);
        if !warnings.is_empty() {
            groups.push(WarningsGroup::new(Some(property.clone()), warnings));
        }
    }

    tracing::debug!(groups = groups.len(), "Validated vCard");
    ValidationWarnings::new(version, groups)
}
