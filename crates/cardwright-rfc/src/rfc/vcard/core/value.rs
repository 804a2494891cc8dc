//! Property payloads.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::data_type::ValueDataType;
use super::datetime::{DateAndOrTime, Timestamp};
use super::geo::GeoUri;
use super::pid::ClientPidMap;
use super::structured::{
    Address, Agent, Binary, Gender, Organization, Place, Related, StructuredName, Telephone,
    Timezone,
};
use super::vcard::VCard;
use super::version::{SupportedVersions, VCardVersion};
use crate::rfc::vcard::validate::ValidationWarning;

/// The payload of a property.
///
/// Which variant a property may carry is fixed by its [`PropertyKind`].
///
/// [`PropertyKind`]: super::property::PropertyKind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyValue {
    /// Text value (RFC 6350 §4.1).
    Text(String),
    /// Multi-valued text (comma-separated on the wire).
    TextList(Vec<String>),
    /// URI value (RFC 6350 §4.2).
    Uri(String),
    DateAndOrTime(DateAndOrTime),
    Timestamp(Timestamp),
    StructuredName(StructuredName),
    Address(Address),
    Organization(Organization),
    Telephone(Telephone),
    Geo(GeoUri),
    Gender(Gender),
    Timezone(Timezone),
    ClientPidMap(ClientPidMap),
    Related(Related),
    Place(Place),
    Binary(Binary),
    Agent(Agent),
    /// Serialized XML element (XML property).
    Xml(String),
    /// Unrecognized property, preserved verbatim.
    Raw(RawValue),
    /// Caller-defined payload.
    Custom(Box<dyn CustomValue>),
}

impl PropertyValue {
    /// Short name of the payload shape, for error messages.
    #[must_use]
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::TextList(_) => "text list",
            Self::Uri(_) => "uri",
            Self::DateAndOrTime(_) => "date-and-or-time",
            Self::Timestamp(_) => "timestamp",
            Self::StructuredName(_) => "structured name",
            Self::Address(_) => "address",
            Self::Organization(_) => "organization",
            Self::Telephone(_) => "telephone",
            Self::Geo(_) => "geo",
            Self::Gender(_) => "gender",
            Self::Timezone(_) => "timezone",
            Self::ClientPidMap(_) => "client pid map",
            Self::Related(_) => "related",
            Self::Place(_) => "place",
            Self::Binary(_) => "binary",
            Self::Agent(_) => "agent",
            Self::Xml(_) => "xml",
            Self::Raw(_) => "raw",
            Self::Custom(_) => "custom",
        }
    }

    /// Returns whether the payload carries no usable value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) | Self::Uri(s) | Self::Xml(s) => s.is_empty(),
            Self::TextList(list) => list.iter().all(String::is_empty),
            Self::DateAndOrTime(DateAndOrTime::Text(s)) => s.is_empty(),
            Self::StructuredName(n) => n.is_empty(),
            Self::Address(a) => a.is_empty(),
            Self::Organization(o) => o.is_empty(),
            Self::Telephone(Telephone::Text(s) | Telephone::Uri(s))
            | Self::Related(Related::Text(s) | Related::Uri(s))
            | Self::Place(Place::Text(s) | Place::Uri(s))
            | Self::Timezone(Timezone::Text(s) | Timezone::Uri(s))
            | Self::Agent(Agent::Url(s)) => s.is_empty(),
            Self::Gender(g) => g.is_empty(),
            Self::ClientPidMap(map) => map.uri.is_empty(),
            Self::Binary(b) => b.is_empty(),
            Self::Raw(raw) => raw.value.is_empty(),
            Self::Custom(custom) => custom.is_empty(),
            Self::DateAndOrTime(_)
            | Self::Timestamp(_)
            | Self::Geo(_)
            | Self::Place(Place::Geo(_))
            | Self::Timezone(Timezone::Offset(_))
            | Self::Agent(Agent::VCard(_)) => false,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Self::Uri(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_structured_name(&self) -> Option<&StructuredName> {
        match self {
            Self::StructuredName(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Self::Address(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_telephone(&self) -> Option<&Telephone> {
        match self {
            Self::Telephone(t) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_client_pid_map(&self) -> Option<&ClientPidMap> {
        match self {
            Self::ClientPidMap(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_raw(&self) -> Option<&RawValue> {
        match self {
            Self::Raw(raw) => Some(raw),
            _ => None,
        }
    }

    /// Downcasts a custom payload.
    #[must_use]
    pub fn as_custom<T: CustomValue>(&self) -> Option<&T> {
        match self {
            Self::Custom(custom) => custom.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }
}

/// An extension or unrecognized property kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawValue {
    /// Property name as written.
    pub name: String,
    /// Unparsed value.
    pub value: String,
    /// Explicit VALUE data type, if one was given.
    pub data_type: Option<ValueDataType>,
}

impl RawValue {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            data_type: None,
        }
    }
}

/// A caller-defined property payload.
///
/// Implementors provide copy, equality and hashing explicitly so custom
/// properties behave like built-in ones inside a [`VCard`].
pub trait CustomValue: fmt::Debug + Send + Sync + 'static {
    /// Returns an independent copy of this payload.
    fn clone_value(&self) -> Box<dyn CustomValue>;

    /// Structural equality against another custom payload.
    fn eq_value(&self, other: &dyn CustomValue) -> bool;

    fn hash_value(&self, state: &mut dyn Hasher);

    fn as_any(&self) -> &dyn Any;

    /// Versions this payload can be written in.
    fn supported_versions(&self) -> SupportedVersions {
        SupportedVersions::ALL
    }

    /// Kind-specific validation rules.
    fn validate(&self, _version: VCardVersion, _vcard: &VCard) -> Vec<ValidationWarning> {
        Vec::new()
    }

    fn is_empty(&self) -> bool {
        false
    }
}

impl Clone for Box<dyn CustomValue> {
    fn clone(&self) -> Self {
        self.clone_value()
    }
}

impl PartialEq for Box<dyn CustomValue> {
    fn eq(&self, other: &Self) -> bool {
        self.eq_value(other.as_ref())
    }
}

impl Eq for Box<dyn CustomValue> {}

impl Hash for Box<dyn CustomValue> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_value(state);
    }
}
