//! Scribes for the built-in property kinds.
//!
//! One [`BuiltinScribe`] per kind; the kind selects the codec. Values are
//! written in the form each version expects: basic ISO 8601 in 2.1 and 4.0,
//! extended in 3.0; `geo:` URIs and data URIs in 4.0, plain coordinates and
//! base64 with an ENCODING parameter before that.

use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose::STANDARD};

use super::{ParseContext, PropertyScribe, ScribeError, prepare_standard_parameters};
use crate::rfc::vcard::build::{escape_text, join_escaped};
use crate::rfc::vcard::core::{
    Address, Agent, Binary, ClientPidMap, DateAndOrTime, DateFormat, Encoding, Gender, GeoUri,
    Organization, Parameters, Place, Property, PropertyKind, PropertyValue, Related, Sex,
    StructuredName, SyntaxStyle, Telephone, Timestamp, Timezone, VCard, VCardVersion,
    ValueDataType, format_utc_offset, param_names as names, parse_utc_offset,
};
use crate::rfc::vcard::parse::{component_values, split_component, split_structured, unescape_text};

/// Codec for one built-in [`PropertyKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinScribe {
    kind: PropertyKind,
}

impl BuiltinScribe {
    /// Returns `None` for [`PropertyKind::Raw`] and custom kinds.
    #[must_use]
    pub fn new(kind: PropertyKind) -> Option<Self> {
        PropertyKind::BUILTIN
            .contains(&kind)
            .then_some(Self { kind })
    }

    /// One scribe per built-in kind.
    pub fn all() -> impl Iterator<Item = Self> {
        PropertyKind::BUILTIN.into_iter().map(|kind| Self { kind })
    }

    fn cannot_parse(self, value: &str, reason: &str) -> ScribeError {
        ScribeError::cannot_parse(self.kind.wire_name(), value, reason)
    }

    fn cannot_write(self, version: VCardVersion, reason: &str) -> ScribeError {
        ScribeError::CannotWrite {
            name: self.kind.wire_name().to_string(),
            version,
            reason: reason.to_string(),
        }
    }
}

fn has_scheme(value: &str, scheme: &str) -> bool {
    value
        .get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}

fn structured_components(value: &str, style: SyntaxStyle) -> Vec<Vec<String>> {
    split_structured(value)
        .into_iter()
        .map(|component| component_values(component, style))
        .collect()
}

fn write_components(components: &[&Vec<String>], style: SyntaxStyle) -> String {
    components
        .iter()
        .map(|values| join_escaped(values, style))
        .collect::<Vec<_>>()
        .join(";")
}

fn decode_geo(value: &str) -> Option<GeoUri> {
    let value = value.trim();
    if has_scheme(value, "geo:") {
        return GeoUri::from_str(value).ok();
    }
    let (latitude, longitude) = value.split_once([';', ','])?;
    Some(GeoUri::new(
        latitude.trim().parse().ok()?,
        longitude.trim().parse().ok()?,
    ))
}

fn decode_gender(value: &str) -> Option<Gender> {
    let parts = split_structured(value);
    let sex = match parts.first().map(|s| s.trim()) {
        None | Some("") => None,
        Some(code) => {
            let mut chars = code.chars();
            let sex = chars.next().and_then(Sex::from_char)?;
            if chars.next().is_some() {
                return None;
            }
            Some(sex)
        }
    };
    let identity = parts
        .get(1)
        .map(|s| unescape_text(s))
        .filter(|s| !s.is_empty());
    Some(Gender { sex, identity })
}

fn decode_client_pid_map(value: &str) -> Option<ClientPidMap> {
    let (id, uri) = value.split_once(';')?;
    let id = id.trim();
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let uri = unescape_text(uri.trim());
    if uri.is_empty() {
        return None;
    }
    Some(ClientPidMap::new(id.parse().ok()?, uri))
}

/// Parses `data:[<media type>][;base64],<data>`.
fn decode_data_uri(value: &str) -> Option<(Vec<u8>, Option<String>)> {
    let rest = value.get(5..).filter(|_| has_scheme(value, "data:"))?;
    let (header, data) = rest.split_once(',')?;
    let (media_type, base64) = match header.strip_suffix(";base64") {
        Some(media_type) => (media_type, true),
        None => (header, false),
    };
    let bytes = if base64 {
        STANDARD.decode(strip_whitespace(data)).ok()?
    } else {
        data.as_bytes().to_vec()
    };
    let media_type = (!media_type.is_empty()).then(|| media_type.to_string());
    Some((bytes, media_type))
}

fn strip_whitespace(data: &str) -> String {
    data.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

/// Top-level media type implied by a binary kind's TYPE values before 4.0.
fn implied_media_class(kind: PropertyKind) -> &'static str {
    match kind {
        PropertyKind::Sound => "audio",
        PropertyKind::Key => "application",
        _ => "image",
    }
}

/// TYPE value carrying a media type before 4.0: `image/jpeg` on PHOTO becomes
/// `jpeg`, a media type outside the kind's class is written whole.
fn type_from_media_type(kind: PropertyKind, media_type: &str) -> &str {
    match media_type.split_once('/') {
        Some((class, subtype)) if class.eq_ignore_ascii_case(implied_media_class(kind)) => subtype,
        _ => media_type,
    }
}

fn media_type_from_type(kind: PropertyKind, value: &str) -> String {
    let media_type = if value.contains('/') {
        value.to_string()
    } else {
        format!("{}/{value}", implied_media_class(kind))
    };
    media_type.to_ascii_lowercase()
}

/// TYPE values that describe usage rather than format.
fn is_usage_type(value: &str) -> bool {
    ["home", "work", "pref"]
        .iter()
        .any(|usage| usage.eq_ignore_ascii_case(value))
}

impl BuiltinScribe {
    fn decode_binary(
        self,
        value: &str,
        data_type: Option<&ValueDataType>,
        parameters: &mut Parameters,
    ) -> Result<Binary, ScribeError> {
        if parameters.encoding().is_some_and(|e| e.is_base64()) {
            let data = STANDARD
                .decode(strip_whitespace(value))
                .map_err(|err| self.cannot_parse(value, &format!("invalid base64: {err}")))?;
            parameters.set_encoding(None);
            return Ok(Binary::Data {
                data,
                media_type: self.take_media_type(parameters),
            });
        }

        if has_scheme(value.trim(), "data:") {
            let (data, media_type) = decode_data_uri(value.trim())
                .ok_or_else(|| self.cannot_parse(value, "malformed data URI"))?;
            return Ok(Binary::Data { data, media_type });
        }

        if data_type == Some(&ValueDataType::Text) {
            return Ok(Binary::Text(unescape_text(value)));
        }

        Ok(Binary::Url(value.trim().to_string()))
    }

    /// Removes the first format TYPE value and returns it as a media type.
    fn take_media_type(self, parameters: &mut Parameters) -> Option<String> {
        let value = parameters
            .types()
            .iter()
            .find(|t| !is_usage_type(t))?
            .clone();
        parameters.remove_type(&value);
        Some(media_type_from_type(self.kind, &value))
    }

    fn decode_timezone(value: &str, data_type: Option<&ValueDataType>) -> Timezone {
        match data_type {
            Some(ValueDataType::Text) => Timezone::Text(unescape_text(value)),
            Some(ValueDataType::Uri) => Timezone::Uri(value.trim().to_string()),
            _ => parse_utc_offset(value)
                .map_or_else(|| Timezone::Text(unescape_text(value)), Timezone::Offset),
        }
    }

    fn decode_place(self, value: &str, data_type: Option<&ValueDataType>) -> Result<Place, ScribeError> {
        if data_type != Some(&ValueDataType::Uri) {
            return Ok(Place::Text(unescape_text(value)));
        }
        let value = value.trim();
        if has_scheme(value, "geo:") {
            return GeoUri::from_str(value)
                .map(Place::Geo)
                .map_err(|_err| self.cannot_parse(value, "malformed geo: URI"));
        }
        Ok(Place::Uri(value.to_string()))
    }

    fn encode_binary(binary: &Binary, version: VCardVersion) -> String {
        match binary {
            Binary::Data { data, media_type } => {
                let encoded = STANDARD.encode(data);
                match version {
                    VCardVersion::V4_0 => format!(
                        "data:{};base64,{encoded}",
                        media_type.as_deref().unwrap_or_default()
                    ),
                    VCardVersion::V2_1 | VCardVersion::V3_0 => encoded,
                }
            }
            Binary::Url(url) => url.clone(),
            Binary::Text(text) => escape_text(text, version.syntax_style()),
        }
    }

    fn prepare_binary(self, binary: &Binary, version: VCardVersion, parameters: &mut Parameters) {
        parameters.set_encoding(None);
        let Binary::Data { media_type, .. } = binary else {
            return;
        };
        let encoding = match version {
            VCardVersion::V4_0 => return,
            VCardVersion::V3_0 => Encoding::B,
            VCardVersion::V2_1 => Encoding::Base64,
        };
        parameters.set_encoding(Some(&encoding));

        // The media type travels as the first TYPE value.
        let Some(media_type) = media_type else {
            return;
        };
        let format = type_from_media_type(self.kind, media_type);
        let types: Vec<String> = std::iter::once(format.to_string())
            .chain(parameters.types().iter().cloned())
            .collect();
        parameters.replace_all(names::TYPE, types);
    }

    /// Pre-4.0 TEL values are plain text: a `tel:` URI loses its scheme and
    /// URI parameters.
    fn telephone_text(telephone: &Telephone) -> &str {
        match telephone {
            Telephone::Text(text) => text,
            Telephone::Uri(_) => telephone
                .number()
                .split_once(';')
                .map_or(telephone.number(), |(number, _)| number),
        }
    }
}

impl PropertyScribe for BuiltinScribe {
    fn kind(&self) -> PropertyKind {
        self.kind
    }

    fn default_data_type(&self, version: VCardVersion) -> Option<ValueDataType> {
        use PropertyKind as K;

        let v4 = version == VCardVersion::V4_0;
        let data_type = match self.kind {
            K::Anniversary | K::Birthday | K::Deathdate => {
                if v4 {
                    ValueDataType::DateAndOrTime
                } else {
                    ValueDataType::Date
                }
            }
            K::Revision => {
                if v4 {
                    ValueDataType::Timestamp
                } else {
                    ValueDataType::DateTime
                }
            }
            K::Geo => {
                if v4 {
                    ValueDataType::Uri
                } else {
                    ValueDataType::Float
                }
            }
            K::Timezone => {
                if v4 {
                    ValueDataType::Text
                } else {
                    ValueDataType::UtcOffset
                }
            }
            K::Language => {
                if v4 {
                    ValueDataType::LanguageTag
                } else {
                    ValueDataType::Text
                }
            }
            K::Uid => {
                if v4 {
                    ValueDataType::Uri
                } else {
                    ValueDataType::Text
                }
            }
            K::Url => {
                if version == VCardVersion::V2_1 {
                    ValueDataType::Url
                } else {
                    ValueDataType::Uri
                }
            }
            K::Key | K::Logo | K::Photo | K::Sound => match version {
                VCardVersion::V2_1 => return None,
                VCardVersion::V3_0 => ValueDataType::Binary,
                VCardVersion::V4_0 => ValueDataType::Uri,
            },
            K::Agent | K::Raw | K::Custom(_) => return None,
            K::CalendarRequestUri
            | K::CalendarUri
            | K::FreeBusyUrl
            | K::Impp
            | K::Member
            | K::OrgDirectory
            | K::Related
            | K::Source => ValueDataType::Uri,
            _ => ValueDataType::Text,
        };
        Some(data_type)
    }

    fn data_type(&self, property: &Property, version: VCardVersion) -> Option<ValueDataType> {
        let url_type = if version == VCardVersion::V2_1 {
            ValueDataType::Url
        } else {
            ValueDataType::Uri
        };

        let data_type = match property.value() {
            PropertyValue::DateAndOrTime(DateAndOrTime::Text(_))
            | PropertyValue::Related(Related::Text(_))
            | PropertyValue::Place(Place::Text(_))
            | PropertyValue::Binary(Binary::Text(_))
            | PropertyValue::Timezone(Timezone::Text(_)) => ValueDataType::Text,
            PropertyValue::DateAndOrTime(DateAndOrTime::DateTime { .. })
                if version != VCardVersion::V4_0 =>
            {
                ValueDataType::DateTime
            }
            PropertyValue::DateAndOrTime(DateAndOrTime::Time { .. })
                if version != VCardVersion::V4_0 =>
            {
                ValueDataType::Time
            }
            PropertyValue::Telephone(Telephone::Uri(_)) if version == VCardVersion::V4_0 => {
                ValueDataType::Uri
            }
            PropertyValue::Timezone(Timezone::Offset(_)) => ValueDataType::UtcOffset,
            PropertyValue::Timezone(Timezone::Uri(_))
            | PropertyValue::Place(Place::Geo(_) | Place::Uri(_)) => ValueDataType::Uri,
            PropertyValue::Binary(Binary::Url(_)) | PropertyValue::Agent(Agent::Url(_)) => {
                url_type
            }
            _ => return self.default_data_type(version),
        };
        Some(data_type)
    }

    fn prepare_parameters(
        &self,
        property: &Property,
        version: VCardVersion,
        vcard: &VCard,
    ) -> Parameters {
        let mut parameters = prepare_standard_parameters(property, version, vcard);
        match property.value() {
            PropertyValue::Binary(binary) => self.prepare_binary(binary, version, &mut parameters),
            _ if version != VCardVersion::V2_1 => parameters.set_encoding(None),
            _ => {}
        }
        parameters
    }

    #[expect(
        clippy::too_many_lines,
        reason = "Decoder dispatch covers every built-in kind"
    )]
    fn decode(
        &self,
        value: &str,
        data_type: Option<&ValueDataType>,
        parameters: &mut Parameters,
        ctx: &mut ParseContext<'_>,
    ) -> Result<PropertyValue, ScribeError> {
        use PropertyKind as K;

        let style = ctx.version().syntax_style();
        let explicit_text = data_type == Some(&ValueDataType::Text);

        let decoded = match self.kind {
            K::StructuredName => PropertyValue::StructuredName(StructuredName::from_components(
                structured_components(value, style),
            )),
            K::Address => {
                PropertyValue::Address(Address::from_components(structured_components(value, style)))
            }
            K::Organization => {
                let mut parts = split_structured(value).into_iter().map(unescape_text);
                let name = parts.next().unwrap_or_default();
                let units = parts.collect();
                PropertyValue::Organization(Organization::with_units(name, units))
            }
            K::Categories | K::Nickname => PropertyValue::TextList(split_component(value)),
            K::Anniversary | K::Birthday | K::Deathdate => {
                let date = if explicit_text {
                    DateAndOrTime::Text(unescape_text(value))
                } else {
                    DateAndOrTime::parse(value)
                        .ok_or_else(|| self.cannot_parse(value, "not a date, time or date-time"))?
                };
                PropertyValue::DateAndOrTime(date)
            }
            K::Revision => PropertyValue::Timestamp(
                Timestamp::parse(value).ok_or_else(|| self.cannot_parse(value, "not a timestamp"))?,
            ),
            K::Telephone => {
                let telephone = if data_type == Some(&ValueDataType::Uri)
                    || has_scheme(value.trim(), "tel:")
                {
                    Telephone::Uri(value.trim().to_string())
                } else {
                    Telephone::Text(unescape_text(value))
                };
                PropertyValue::Telephone(telephone)
            }
            K::Geo => PropertyValue::Geo(
                decode_geo(value)
                    .ok_or_else(|| self.cannot_parse(value, "expected latitude and longitude"))?,
            ),
            K::Gender => PropertyValue::Gender(
                decode_gender(value).ok_or_else(|| self.cannot_parse(value, "unknown sex code"))?,
            ),
            K::Timezone => PropertyValue::Timezone(Self::decode_timezone(value, data_type)),
            K::ClientPidMap => PropertyValue::ClientPidMap(
                decode_client_pid_map(value)
                    .ok_or_else(|| self.cannot_parse(value, "expected <source id>;<uri>"))?,
            ),
            K::Related => PropertyValue::Related(if explicit_text {
                Related::Text(unescape_text(value))
            } else {
                Related::Uri(value.trim().to_string())
            }),
            K::Birthplace | K::Deathplace => {
                PropertyValue::Place(self.decode_place(value, data_type)?)
            }
            K::Key | K::Logo | K::Photo | K::Sound => {
                PropertyValue::Binary(self.decode_binary(value, data_type, parameters)?)
            }
            K::Agent => {
                if has_scheme(value.trim(), "BEGIN:VCARD") {
                    return Err(self.cannot_parse(value, "embedded vCards are read by the reader"));
                }
                PropertyValue::Agent(Agent::Url(value.trim().to_string()))
            }
            K::Xml => PropertyValue::Xml(unescape_text(value)),
            K::Raw | K::Custom(_) => return Err(ScribeError::NoScribe(ctx.name().to_string())),
            K::CalendarRequestUri
            | K::CalendarUri
            | K::FreeBusyUrl
            | K::Impp
            | K::Member
            | K::OrgDirectory
            | K::Source
            | K::Uid
            | K::Url => {
                let text = explicit_text
                    || self.default_data_type(ctx.version()) == Some(ValueDataType::Text);
                PropertyValue::Uri(if text {
                    unescape_text(value)
                } else {
                    value.trim().to_string()
                })
            }
            _ => PropertyValue::Text(unescape_text(value)),
        };

        Ok(decoded)
    }

    fn encode(&self, property: &Property, version: VCardVersion) -> Result<String, ScribeError> {
        let style = version.syntax_style();
        let format = DateFormat::for_version(version);

        let encoded = match property.value() {
            PropertyValue::Text(text)
            | PropertyValue::Xml(text)
            | PropertyValue::DateAndOrTime(DateAndOrTime::Text(text))
            | PropertyValue::Timezone(Timezone::Text(text))
            | PropertyValue::Related(Related::Text(text))
            | PropertyValue::Place(Place::Text(text)) => escape_text(text, style),
            PropertyValue::TextList(list) => join_escaped(list, style),
            PropertyValue::Uri(uri) => {
                if self.data_type(property, version) == Some(ValueDataType::Text) {
                    escape_text(uri, style)
                } else {
                    uri.clone()
                }
            }
            PropertyValue::DateAndOrTime(date) => date.format(format),
            PropertyValue::Timestamp(timestamp) => timestamp.format(format),
            PropertyValue::StructuredName(name) => write_components(&name.components(), style),
            PropertyValue::Address(address) => write_components(&address.components(), style),
            PropertyValue::Organization(org) => org
                .components()
                .map(|part| escape_text(part, style))
                .collect::<Vec<_>>()
                .join(";"),
            PropertyValue::Telephone(Telephone::Uri(uri)) if version == VCardVersion::V4_0 => {
                uri.clone()
            }
            PropertyValue::Telephone(telephone) => {
                escape_text(Self::telephone_text(telephone), style)
            }
            PropertyValue::Geo(geo) => match version {
                VCardVersion::V4_0 => geo.to_string(),
                VCardVersion::V3_0 => format!("{};{}", geo.latitude, geo.longitude),
                VCardVersion::V2_1 => format!("{},{}", geo.latitude, geo.longitude),
            },
            PropertyValue::Gender(gender) => {
                let mut out = gender.sex.map(|sex| sex.as_char().to_string()).unwrap_or_default();
                if let Some(identity) = &gender.identity {
                    out.push(';');
                    out.push_str(&escape_text(identity, style));
                }
                out
            }
            PropertyValue::Timezone(Timezone::Offset(offset)) => format_utc_offset(*offset, format),
            PropertyValue::Timezone(Timezone::Uri(uri))
            | PropertyValue::Related(Related::Uri(uri))
            | PropertyValue::Place(Place::Uri(uri))
            | PropertyValue::Agent(Agent::Url(uri)) => uri.clone(),
            PropertyValue::ClientPidMap(map) => format!("{};{}", map.source_id, map.uri),
            PropertyValue::Place(Place::Geo(geo)) => geo.to_string(),
            PropertyValue::Binary(binary) => Self::encode_binary(binary, version),
            PropertyValue::Agent(Agent::VCard(_)) => {
                return Err(self.cannot_write(version, "embedded vCards are written by the writer"));
            }
            PropertyValue::Raw(raw) => raw.value.clone(),
            PropertyValue::Custom(_) => {
                return Err(self.cannot_write(version, "custom values need their own scribe"));
            }
        };

        Ok(encoded)
    }
}
