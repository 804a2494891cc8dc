//! Parameter-level rules.

use super::warning::{ValidationWarning, WarningCode};
use crate::rfc::vcard::core::chars;
use crate::rfc::vcard::core::{ParameterError, Parameters, VCardVersion, param_names as names};

/// Parameters that only vCard 4.0 defines.
const V4_ONLY: [&str; 10] = [
    names::ALTID,
    names::CALSCALE,
    names::GEO,
    names::INDEX,
    names::LEVEL,
    names::MEDIATYPE,
    names::PID,
    names::PREF,
    names::SORT_AS,
    names::TZ,
];

/// Parameters that vCard 4.0 dropped.
const PRE_V4_ONLY: [&str; 2] = [names::CHARSET, names::ENCODING];

fn is_one_of(name: &str, list: &[&str]) -> bool {
    list.iter().any(|n| n.eq_ignore_ascii_case(name))
}

fn malformed(err: &ParameterError) -> ValidationWarning {
    ValidationWarning::new(WarningCode::MalformedParameter, err.to_string())
}

/// Checks a property's parameters against the rules of a version.
#[must_use]
pub fn validate_parameters(params: &Parameters, version: VCardVersion) -> Vec<ValidationWarning> {
    let style = version.syntax_style();
    let mut warnings = Vec::new();

    for param in params {
        if !chars::is_valid_name(&param.name, style) {
            warnings.push(ValidationWarning::new(
                WarningCode::InvalidParameterName,
                format!(
                    "Parameter name {:?} contains characters not allowed in vCard {version}: {:?}",
                    param.name,
                    chars::invalid_characters(&param.name, style, true)
                ),
            ));
        }

        for value in &param.values {
            if !chars::is_valid_parameter_value(value, style) {
                warnings.push(ValidationWarning::new(
                    WarningCode::InvalidParameterValue,
                    format!(
                        "{} parameter value {value:?} contains characters not allowed in vCard {version}: {:?}",
                        param.name,
                        chars::invalid_characters(value, style, false)
                    ),
                ));
            }
        }

        let unsupported = match version {
            VCardVersion::V4_0 => is_one_of(&param.name, &PRE_V4_ONLY),
            VCardVersion::V2_1 | VCardVersion::V3_0 => is_one_of(&param.name, &V4_ONLY),
        };
        if unsupported {
            warnings.push(ValidationWarning::new(
                WarningCode::UnsupportedParameter,
                format!(
                    "{} parameter is not supported in vCard {version}",
                    param.name.to_ascii_uppercase()
                ),
            ));
        }
    }

    if let Some(encoding) = params.encoding()
        && !encoding.supported_versions().contains(version)
    {
        warnings.push(ValidationWarning::new(
            WarningCode::UnsupportedEncoding,
            format!("ENCODING value {encoding} is not supported in vCard {version}"),
        ));
    }

    if let Some(data_type) = params.value_type()
        && !data_type.supported_versions().contains(version)
    {
        warnings.push(ValidationWarning::new(
            WarningCode::UnsupportedDataType,
            format!("VALUE data type {data_type} is not supported in vCard {version}"),
        ));
    }

    if let Err(err) = params.pref() {
        warnings.push(malformed(&err));
    }
    if let Err(err) = params.pids() {
        warnings.push(malformed(&err));
    }
    if let Err(err) = params.index() {
        warnings.push(malformed(&err));
    }
    if let Err(err) = params.geo() {
        warnings.push(malformed(&err));
    }

    if params.altid().is_some_and(str::is_empty) {
        warnings.push(ValidationWarning::new(
            WarningCode::EmptyAltId,
            "ALTID parameter is empty",
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(params: &Parameters, version: VCardVersion) -> Vec<WarningCode> {
        validate_parameters(params, version)
            .iter()
            .filter_map(ValidationWarning::code)
            .collect()
    }

    #[test]
    fn version_4_parameters_are_flagged_earlier() {
        let mut params = Parameters::new();
        params.set_altid(Some("1"));
        params.set_pref(Some(1));

        assert!(codes(&params, VCardVersion::V4_0).is_empty());
        assert_eq!(
            codes(&params, VCardVersion::V3_0),
            [WarningCode::UnsupportedParameter, WarningCode::UnsupportedParameter]
        );
    }

    #[test]
    fn encoding_is_flagged_in_4_0() {
        let mut params = Parameters::new();
        params.put("ENCODING", "b");
        assert!(codes(&params, VCardVersion::V3_0).is_empty());
        assert_eq!(
            codes(&params, VCardVersion::V4_0),
            [WarningCode::UnsupportedParameter, WarningCode::UnsupportedEncoding]
        );
    }

    #[test]
    fn encoding_value_must_match_version() {
        let mut params = Parameters::new();
        params.put("ENCODING", "BASE64");
        assert_eq!(
            codes(&params, VCardVersion::V3_0),
            [WarningCode::UnsupportedEncoding]
        );
    }

    #[test]
    fn malformed_values() {
        let mut params = Parameters::new();
        params.put("PREF", "0");
        params.put("PID", "x");
        params.put("INDEX", "-1");
        params.put("GEO", "nowhere");
        params.put("ALTID", "");

        let codes = codes(&params, VCardVersion::V4_0);
        assert_eq!(
            codes.iter().filter(|c| **c == WarningCode::MalformedParameter).count(),
            4
        );
        assert!(codes.contains(&WarningCode::EmptyAltId));
    }

    #[test]
    fn parameter_name_characters() {
        let mut params = Parameters::new();
        params.put("X_FOO", "bar");
        assert_eq!(
            codes(&params, VCardVersion::V4_0),
            [WarningCode::InvalidParameterName]
        );
        assert!(codes(&params, VCardVersion::V2_1).is_empty());
    }

    #[test]
    fn data_type_version() {
        let mut params = Parameters::new();
        params.put("VALUE", "url");
        assert!(codes(&params, VCardVersion::V2_1).is_empty());
        assert_eq!(
            codes(&params, VCardVersion::V4_0),
            [WarningCode::UnsupportedDataType]
        );
    }
}
