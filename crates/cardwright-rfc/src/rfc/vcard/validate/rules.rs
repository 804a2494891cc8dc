//! Kind-specific property rules.

use quick_xml::Reader;
use quick_xml::events::Event;

use super::warning::{ValidationWarning, WarningCode};
use crate::rfc::vcard::core::chars;
use crate::rfc::vcard::core::{
    Agent, Binary, GeoUri, Parameterized, Place, Property, PropertyKind, PropertyValue, Telephone,
    Timezone, VCard, VCardVersion,
};

const TEL_TYPES_2_1: &[&str] = &[
    "home", "work", "pref", "voice", "fax", "msg", "cell", "pager", "bbs", "modem", "car", "isdn",
    "video",
];
const TEL_TYPES_3_0: &[&str] = &[
    "home", "work", "pref", "voice", "fax", "msg", "cell", "pager", "bbs", "modem", "car", "isdn",
    "video", "pcs",
];
const TEL_TYPES_4_0: &[&str] = &[
    "home", "work", "text", "voice", "fax", "cell", "video", "pager", "textphone",
];

const EMAIL_TYPES_2_1: &[&str] = &[
    "home", "work", "pref", "aol", "applelink", "attmail", "cis", "eworld", "internet", "ibmmail",
    "mcimail", "powershare", "prodigy", "tlx", "x400",
];
const EMAIL_TYPES_3_0: &[&str] = &["home", "work", "pref", "internet", "x400"];
const HOME_WORK: &[&str] = &["home", "work"];

const ADR_TYPES_PRE_4_0: &[&str] = &["home", "work", "pref", "dom", "intl", "postal", "parcel"];

fn allowed_types(kind: PropertyKind, version: VCardVersion) -> Option<&'static [&'static str]> {
    let table = match (kind, version) {
        (PropertyKind::Telephone, VCardVersion::V2_1) => TEL_TYPES_2_1,
        (PropertyKind::Telephone, VCardVersion::V3_0) => TEL_TYPES_3_0,
        (PropertyKind::Telephone, VCardVersion::V4_0) => TEL_TYPES_4_0,
        (PropertyKind::Email, VCardVersion::V2_1) => EMAIL_TYPES_2_1,
        (PropertyKind::Email, VCardVersion::V3_0) => EMAIL_TYPES_3_0,
        (PropertyKind::Address, VCardVersion::V2_1 | VCardVersion::V3_0) => ADR_TYPES_PRE_4_0,
        (PropertyKind::Email | PropertyKind::Address, VCardVersion::V4_0) => HOME_WORK,
        _ => return None,
    };
    Some(table)
}

fn check_types(property: &Property, version: VCardVersion, warnings: &mut Vec<ValidationWarning>) {
    let Some(allowed) = allowed_types(property.kind(), version) else {
        return;
    };

    for value in property.types() {
        let is_extension = value
            .get(..2)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("x-"));
        if is_extension || allowed.iter().any(|t| t.eq_ignore_ascii_case(value)) {
            continue;
        }
        warnings.push(ValidationWarning::new(
            WarningCode::UnsupportedType,
            format!(
                "TYPE value {value:?} is not defined for {} in vCard {version}",
                property.name()
            ),
        ));
    }
}

fn check_single_values<'a>(
    components: impl IntoIterator<Item = &'a Vec<String>>,
    version: VCardVersion,
    warnings: &mut Vec<ValidationWarning>,
) {
    if version != VCardVersion::V2_1 {
        return;
    }
    if components.into_iter().any(|c| c.len() > 1) {
        warnings.push(ValidationWarning::new(
            WarningCode::MultipleComponentValues,
            "vCard 2.1 allows at most one value per component",
        ));
    }
}

fn check_geo(geo: &GeoUri, warnings: &mut Vec<ValidationWarning>) {
    if !(-90.0..=90.0).contains(&geo.latitude) {
        warnings.push(ValidationWarning::new(
            WarningCode::LatitudeOutOfRange,
            format!("Latitude {} is outside [-90, 90]", geo.latitude),
        ));
    }
    if !(-180.0..=180.0).contains(&geo.longitude) {
        warnings.push(ValidationWarning::new(
            WarningCode::LongitudeOutOfRange,
            format!("Longitude {} is outside [-180, 180]", geo.longitude),
        ));
    }
}

/// Checks that `xml` holds exactly one well-formed element.
fn check_xml(xml: &str) -> Result<(), String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth: usize = 0;
    let mut roots: usize = 0;
    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Empty(_)) if depth == 0 => roots += 1,
            Ok(Event::Text(_) | Event::CData(_)) if depth == 0 => {
                return Err("text outside of the root element".to_string());
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(err.to_string()),
        }
    }

    if depth != 0 {
        return Err("unclosed element".to_string());
    }
    if roots != 1 {
        return Err(format!("expected one root element, found {roots}"));
    }
    Ok(())
}

/// Runs the rules specific to a property's kind and payload.
#[must_use]
pub fn validate_kind(
    property: &Property,
    version: VCardVersion,
    vcard: &VCard,
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let value = property.value();

    let checks_emptiness = !matches!(
        value,
        PropertyValue::Raw(_)
            | PropertyValue::Custom(_)
            | PropertyValue::Binary(_)
            | PropertyValue::StructuredName(_)
            | PropertyValue::Address(_)
    );
    if checks_emptiness && value.is_empty() {
        warnings.push(ValidationWarning::new(
            WarningCode::EmptyValue,
            "Property has no value",
        ));
    }

    check_types(property, version, &mut warnings);

    match value {
        PropertyValue::StructuredName(name) => {
            check_single_values(name.components(), version, &mut warnings);
        }
        PropertyValue::Address(address) => {
            check_single_values(address.components(), version, &mut warnings);
        }
        PropertyValue::Binary(binary) => {
            let missing = match binary {
                Binary::Data { data, .. } => data.is_empty(),
                Binary::Url(url) => url.is_empty(),
                Binary::Text(text) => property.kind() != PropertyKind::Key || text.is_empty(),
            };
            if missing {
                warnings.push(ValidationWarning::new(
                    WarningCode::MissingBinaryValue,
                    "Property must carry either inline data or a URL",
                ));
            }
        }
        PropertyValue::Telephone(Telephone::Uri(_)) if version != VCardVersion::V4_0 => {
            warnings.push(ValidationWarning::new(
                WarningCode::TelUriUnsupported,
                format!("TEL URI values are not supported in vCard {version}"),
            ));
        }
        PropertyValue::DateAndOrTime(date) if version != VCardVersion::V4_0 => {
            if date.is_text() {
                warnings.push(ValidationWarning::new(
                    WarningCode::TextDateUnsupported,
                    format!("Text date values are not supported in vCard {version}"),
                ));
            }
            if date.is_partial() {
                warnings.push(ValidationWarning::new(
                    WarningCode::PartialDateUnsupported,
                    format!("Partial dates and times are not supported in vCard {version}"),
                ));
            }
        }
        PropertyValue::Timezone(Timezone::Text(_)) if version == VCardVersion::V2_1 => {
            warnings.push(ValidationWarning::new(
                WarningCode::TextTimezoneUnsupported,
                "vCard 2.1 time zones must be UTC offsets",
            ));
        }
        PropertyValue::Geo(geo) | PropertyValue::Place(Place::Geo(geo)) => {
            check_geo(geo, &mut warnings);
        }
        PropertyValue::Agent(Agent::VCard(nested)) => {
            let nested_warnings = nested.validate(version);
            if !nested_warnings.is_empty() {
                warnings.push(ValidationWarning::new(
                    WarningCode::NestedVCard,
                    format!("Embedded vCard has warnings:\n{nested_warnings}"),
                ));
            }
        }
        PropertyValue::Xml(xml) if !xml.is_empty() => {
            if let Err(reason) = check_xml(xml) {
                warnings.push(ValidationWarning::new(
                    WarningCode::MalformedXml,
                    format!("XML value is not well-formed: {reason}"),
                ));
            }
        }
        PropertyValue::Raw(raw) => {
            let style = version.syntax_style();
            if !chars::is_valid_name(&raw.name, style) {
                warnings.push(ValidationWarning::new(
                    WarningCode::InvalidPropertyName,
                    format!(
                        "Property name {:?} contains characters not allowed in vCard {version}: {:?}",
                        raw.name,
                        chars::invalid_characters(&raw.name, style, true)
                    ),
                ));
            }
        }
        PropertyValue::Custom(custom) => warnings.extend(custom.validate(version, vcard)),
        _ => {}
    }

    warnings
}
