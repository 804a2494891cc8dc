//! vCard properties (RFC 6350 §6).
//!
//! Every property is one [`Property`]: an optional group label, its own
//! [`Parameters`] and a payload whose shape is fixed by the [`PropertyKind`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::datetime::{DateAndOrTime, Timestamp};
use super::geo::GeoUri;
use super::parameter::{ParameterError, Parameters};
use super::pid::{ClientPidMap, Pid};
use super::structured::{
    Address, Agent, Binary, Gender, Organization, Place, Related, StructuredName, Telephone,
    Timezone,
};
use super::value::{CustomValue, PropertyValue, RawValue};
use super::vcard::VCard;
use super::version::{SupportedVersions, VCardVersion};
use crate::error::{RfcError, RfcResult};
use crate::rfc::vcard::validate::{self, ValidationWarning};

/// The kind of a property.
///
/// Built-in kinds map to one wire name each. [`PropertyKind::Raw`] covers
/// every unrecognized name; [`PropertyKind::Custom`] names a caller-registered
/// kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Address,
    Agent,
    Anniversary,
    Birthday,
    Birthplace,
    CalendarRequestUri,
    CalendarUri,
    Categories,
    Classification,
    ClientPidMap,
    Deathdate,
    Deathplace,
    Email,
    Expertise,
    FormattedName,
    FreeBusyUrl,
    Gender,
    Geo,
    Hobby,
    Impp,
    Interest,
    Key,
    Kind,
    Label,
    Language,
    Logo,
    Mailer,
    Member,
    Nickname,
    Note,
    Organization,
    OrgDirectory,
    Photo,
    ProductId,
    Profile,
    Related,
    Revision,
    Role,
    SortString,
    Sound,
    Source,
    SourceDisplayText,
    StructuredName,
    Telephone,
    Timezone,
    Title,
    Uid,
    Url,
    Xml,
    /// Extension or unrecognized property.
    Raw,
    /// Caller-registered kind, identified by its wire name.
    Custom(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Text,
    TextList,
    Uri,
    DateAndOrTime,
    Timestamp,
    StructuredName,
    Address,
    Organization,
    Telephone,
    Geo,
    Gender,
    Timezone,
    ClientPidMap,
    Related,
    Place,
    Binary,
    Agent,
    Xml,
    Raw,
    Custom,
}

impl Shape {
    const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::TextList => "text list",
            Self::Uri => "uri",
            Self::DateAndOrTime => "date-and-or-time",
            Self::Timestamp => "timestamp",
            Self::StructuredName => "structured name",
            Self::Address => "address",
            Self::Organization => "organization",
            Self::Telephone => "telephone",
            Self::Geo => "geo",
            Self::Gender => "gender",
            Self::Timezone => "timezone",
            Self::ClientPidMap => "client pid map",
            Self::Related => "related",
            Self::Place => "place",
            Self::Binary => "binary",
            Self::Agent => "agent",
            Self::Xml => "xml",
            Self::Raw => "raw",
            Self::Custom => "custom",
        }
    }

    fn matches(self, value: &PropertyValue) -> bool {
        matches!(
            (self, value),
            (Self::Text, PropertyValue::Text(_))
                | (Self::TextList, PropertyValue::TextList(_))
                | (Self::Uri, PropertyValue::Uri(_))
                | (Self::DateAndOrTime, PropertyValue::DateAndOrTime(_))
                | (Self::Timestamp, PropertyValue::Timestamp(_))
                | (Self::StructuredName, PropertyValue::StructuredName(_))
                | (Self::Address, PropertyValue::Address(_))
                | (Self::Organization, PropertyValue::Organization(_))
                | (Self::Telephone, PropertyValue::Telephone(_))
                | (Self::Geo, PropertyValue::Geo(_))
                | (Self::Gender, PropertyValue::Gender(_))
                | (Self::Timezone, PropertyValue::Timezone(_))
                | (Self::ClientPidMap, PropertyValue::ClientPidMap(_))
                | (Self::Related, PropertyValue::Related(_))
                | (Self::Place, PropertyValue::Place(_))
                | (Self::Binary, PropertyValue::Binary(_))
                | (Self::Agent, PropertyValue::Agent(_))
                | (Self::Xml, PropertyValue::Xml(_))
                | (Self::Raw, PropertyValue::Raw(_))
                | (Self::Custom, PropertyValue::Custom(_))
        )
    }
}

impl PropertyKind {
    /// Every built-in kind, in alphabetical order of variant name.
    pub const BUILTIN: [Self; 49] = [
        Self::Address,
        Self::Agent,
        Self::Anniversary,
        Self::Birthday,
        Self::Birthplace,
        Self::CalendarRequestUri,
        Self::CalendarUri,
        Self::Categories,
        Self::Classification,
        Self::ClientPidMap,
        Self::Deathdate,
        Self::Deathplace,
        Self::Email,
        Self::Expertise,
        Self::FormattedName,
        Self::FreeBusyUrl,
        Self::Gender,
        Self::Geo,
        Self::Hobby,
        Self::Impp,
        Self::Interest,
        Self::Key,
        Self::Kind,
        Self::Label,
        Self::Language,
        Self::Logo,
        Self::Mailer,
        Self::Member,
        Self::Nickname,
        Self::Note,
        Self::Organization,
        Self::OrgDirectory,
        Self::Photo,
        Self::ProductId,
        Self::Profile,
        Self::Related,
        Self::Revision,
        Self::Role,
        Self::SortString,
        Self::Sound,
        Self::Source,
        Self::SourceDisplayText,
        Self::StructuredName,
        Self::Telephone,
        Self::Timezone,
        Self::Title,
        Self::Uid,
        Self::Url,
        Self::Xml,
    ];

    /// Wire name of the kind. Raw properties carry their own name.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Address => "ADR",
            Self::Agent => "AGENT",
            Self::Anniversary => "ANNIVERSARY",
            Self::Birthday => "BDAY",
            Self::Birthplace => "BIRTHPLACE",
            Self::CalendarRequestUri => "CALADRURI",
            Self::CalendarUri => "CALURI",
            Self::Categories => "CATEGORIES",
            Self::Classification => "CLASS",
            Self::ClientPidMap => "CLIENTPIDMAP",
            Self::Deathdate => "DEATHDATE",
            Self::Deathplace => "DEATHPLACE",
            Self::Email => "EMAIL",
            Self::Expertise => "EXPERTISE",
            Self::FormattedName => "FN",
            Self::FreeBusyUrl => "FBURL",
            Self::Gender => "GENDER",
            Self::Geo => "GEO",
            Self::Hobby => "HOBBY",
            Self::Impp => "IMPP",
            Self::Interest => "INTEREST",
            Self::Key => "KEY",
            Self::Kind => "KIND",
            Self::Label => "LABEL",
            Self::Language => "LANG",
            Self::Logo => "LOGO",
            Self::Mailer => "MAILER",
            Self::Member => "MEMBER",
            Self::Nickname => "NICKNAME",
            Self::Note => "NOTE",
            Self::Organization => "ORG",
            Self::OrgDirectory => "ORG-DIRECTORY",
            Self::Photo => "PHOTO",
            Self::ProductId => "PRODID",
            Self::Profile => "PROFILE",
            Self::Related => "RELATED",
            Self::Revision => "REV",
            Self::Role => "ROLE",
            Self::SortString => "SORT-STRING",
            Self::Sound => "SOUND",
            Self::Source => "SOURCE",
            Self::SourceDisplayText => "NAME",
            Self::StructuredName => "N",
            Self::Telephone => "TEL",
            Self::Timezone => "TZ",
            Self::Title => "TITLE",
            Self::Uid => "UID",
            Self::Url => "URL",
            Self::Xml => "XML",
            Self::Raw => "X-RAW",
            Self::Custom(name) => name,
        }
    }

    /// Looks up a built-in kind by wire name (case-insensitive).
    #[must_use]
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::BUILTIN
            .into_iter()
            .find(|kind| kind.wire_name().eq_ignore_ascii_case(name))
    }

    /// Versions the kind exists in.
    #[must_use]
    pub const fn supported_versions(self) -> SupportedVersions {
        match self {
            Self::Agent | Self::Label | Self::Mailer => SupportedVersions::V2_1_AND_3_0,
            Self::Categories
            | Self::Impp
            | Self::Nickname
            | Self::ProductId
            | Self::Source => SupportedVersions::V3_0_AND_4_0,
            Self::Classification | Self::Profile | Self::SortString | Self::SourceDisplayText => {
                SupportedVersions::V3_0
            }
            Self::Anniversary
            | Self::Birthplace
            | Self::CalendarRequestUri
            | Self::CalendarUri
            | Self::ClientPidMap
            | Self::Deathdate
            | Self::Deathplace
            | Self::Expertise
            | Self::FreeBusyUrl
            | Self::Gender
            | Self::Hobby
            | Self::Interest
            | Self::Kind
            | Self::Language
            | Self::Member
            | Self::OrgDirectory
            | Self::Related
            | Self::Xml => SupportedVersions::V4_0,
            Self::Address
            | Self::Birthday
            | Self::Email
            | Self::FormattedName
            | Self::Geo
            | Self::Key
            | Self::Logo
            | Self::Note
            | Self::Organization
            | Self::Photo
            | Self::Revision
            | Self::Role
            | Self::Sound
            | Self::StructuredName
            | Self::Telephone
            | Self::Timezone
            | Self::Title
            | Self::Uid
            | Self::Url
            | Self::Raw
            | Self::Custom(_) => SupportedVersions::ALL,
        }
    }

    const fn shape(self) -> Shape {
        match self {
            Self::Classification
            | Self::Email
            | Self::Expertise
            | Self::FormattedName
            | Self::Hobby
            | Self::Interest
            | Self::Kind
            | Self::Label
            | Self::Language
            | Self::Mailer
            | Self::Note
            | Self::ProductId
            | Self::Profile
            | Self::Role
            | Self::SortString
            | Self::SourceDisplayText
            | Self::Title => Shape::Text,
            Self::Categories | Self::Nickname => Shape::TextList,
            Self::CalendarRequestUri
            | Self::CalendarUri
            | Self::FreeBusyUrl
            | Self::Impp
            | Self::Member
            | Self::OrgDirectory
            | Self::Source
            | Self::Uid
            | Self::Url => Shape::Uri,
            Self::Anniversary | Self::Birthday | Self::Deathdate => Shape::DateAndOrTime,
            Self::Revision => Shape::Timestamp,
            Self::StructuredName => Shape::StructuredName,
            Self::Address => Shape::Address,
            Self::Organization => Shape::Organization,
            Self::Telephone => Shape::Telephone,
            Self::Geo => Shape::Geo,
            Self::Gender => Shape::Gender,
            Self::Timezone => Shape::Timezone,
            Self::ClientPidMap => Shape::ClientPidMap,
            Self::Related => Shape::Related,
            Self::Birthplace | Self::Deathplace => Shape::Place,
            Self::Key | Self::Logo | Self::Photo | Self::Sound => Shape::Binary,
            Self::Agent => Shape::Agent,
            Self::Xml => Shape::Xml,
            Self::Raw => Shape::Raw,
            Self::Custom(_) => Shape::Custom,
        }
    }

    /// Returns whether a payload has the shape this kind requires.
    #[must_use]
    pub fn accepts(self, value: &PropertyValue) -> bool {
        self.shape().matches(value)
    }

    /// Name of the payload shape this kind requires.
    #[must_use]
    pub const fn expected_shape(self) -> &'static str {
        self.shape().name()
    }

    /// Returns whether the kind carries a binary payload.
    #[must_use]
    pub const fn is_binary(self) -> bool {
        matches!(self.shape(), Shape::Binary)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Shared accessors over a property's parameters.
pub trait Parameterized {
    fn parameters(&self) -> &Parameters;

    fn parameters_mut(&mut self) -> &mut Parameters;

    fn altid(&self) -> Option<&str> {
        self.parameters().altid()
    }

    fn set_altid(&mut self, altid: Option<&str>) {
        self.parameters_mut().set_altid(altid);
    }

    /// ## Errors
    /// Returns the raw value when PREF is not an integer in `1..=100`.
    fn pref(&self) -> Result<Option<u8>, ParameterError> {
        self.parameters().pref()
    }

    fn set_pref(&mut self, pref: Option<u8>) {
        self.parameters_mut().set_pref(pref);
    }

    /// ## Errors
    /// Returns the first PID value that is not of the form `N` or `N.M`.
    fn pids(&self) -> Result<Vec<Pid>, ParameterError> {
        self.parameters().pids()
    }

    fn add_pid(&mut self, pid: Pid) {
        self.parameters_mut().add_pid(pid);
    }

    fn language(&self) -> Option<&str> {
        self.parameters().language()
    }

    fn set_language(&mut self, language: Option<&str>) {
        self.parameters_mut().set_language(language);
    }

    fn types(&self) -> &[String] {
        self.parameters().types()
    }

    fn add_type(&mut self, value: &str) {
        self.parameters_mut().add_type(value);
    }
}

/// A vCard property.
#[derive(Debug, Clone)]
pub struct Property {
    group: Option<String>,
    parameters: Parameters,
    kind: PropertyKind,
    value: PropertyValue,
}

impl Property {
    /// Creates a property, checking the payload shape against the kind.
    ///
    /// ## Errors
    /// Returns [`RfcError::ValueMismatch`] if the kind cannot carry the payload.
    pub fn new(kind: PropertyKind, value: PropertyValue) -> RfcResult<Self> {
        Self::from_parts(kind, None, Parameters::new(), value)
    }

    /// Creates a property from all of its parts.
    ///
    /// ## Errors
    /// Returns [`RfcError::ValueMismatch`] if the kind cannot carry the payload.
    pub fn from_parts(
        kind: PropertyKind,
        group: Option<String>,
        parameters: Parameters,
        value: PropertyValue,
    ) -> RfcResult<Self> {
        if !kind.accepts(&value) {
            return Err(RfcError::ValueMismatch {
                kind,
                expected: kind.expected_shape(),
                actual: value.shape_name(),
            });
        }
        Ok(Self {
            group,
            parameters,
            kind,
            value,
        })
    }

    /// Builds a property whose shape is known to match.
    fn typed(kind: PropertyKind, value: PropertyValue) -> Self {
        debug_assert!(kind.accepts(&value));
        Self {
            group: None,
            parameters: Parameters::new(),
            kind,
            value,
        }
    }

    /// Creates a text property. Non-text kinds are rejected.
    ///
    /// ## Errors
    /// Returns [`RfcError::ValueMismatch`] if `kind` does not carry text.
    pub fn text(kind: PropertyKind, text: impl Into<String>) -> RfcResult<Self> {
        Self::new(kind, PropertyValue::Text(text.into()))
    }

    /// Creates a URI property. Non-URI kinds are rejected.
    ///
    /// ## Errors
    /// Returns [`RfcError::ValueMismatch`] if `kind` does not carry a URI.
    pub fn uri(kind: PropertyKind, uri: impl Into<String>) -> RfcResult<Self> {
        Self::new(kind, PropertyValue::Uri(uri.into()))
    }

    #[must_use]
    pub fn formatted_name(name: impl Into<String>) -> Self {
        Self::typed(PropertyKind::FormattedName, PropertyValue::Text(name.into()))
    }

    #[must_use]
    pub fn structured_name(name: StructuredName) -> Self {
        Self::typed(PropertyKind::StructuredName, PropertyValue::StructuredName(name))
    }

    #[must_use]
    pub fn email(email: impl Into<String>) -> Self {
        Self::typed(PropertyKind::Email, PropertyValue::Text(email.into()))
    }

    #[must_use]
    pub fn telephone(telephone: Telephone) -> Self {
        Self::typed(PropertyKind::Telephone, PropertyValue::Telephone(telephone))
    }

    #[must_use]
    pub fn address(address: Address) -> Self {
        Self::typed(PropertyKind::Address, PropertyValue::Address(address))
    }

    #[must_use]
    pub fn organization(organization: Organization) -> Self {
        Self::typed(
            PropertyKind::Organization,
            PropertyValue::Organization(organization),
        )
    }

    #[must_use]
    pub fn note(note: impl Into<String>) -> Self {
        Self::typed(PropertyKind::Note, PropertyValue::Text(note.into()))
    }

    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self::typed(PropertyKind::Title, PropertyValue::Text(title.into()))
    }

    #[must_use]
    pub fn uid(uid: impl Into<String>) -> Self {
        Self::typed(PropertyKind::Uid, PropertyValue::Uri(uid.into()))
    }

    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self::typed(PropertyKind::Url, PropertyValue::Uri(url.into()))
    }

    #[must_use]
    pub fn nickname(nicknames: Vec<String>) -> Self {
        Self::typed(PropertyKind::Nickname, PropertyValue::TextList(nicknames))
    }

    #[must_use]
    pub fn categories(categories: Vec<String>) -> Self {
        Self::typed(PropertyKind::Categories, PropertyValue::TextList(categories))
    }

    #[must_use]
    pub fn birthday(date: DateAndOrTime) -> Self {
        Self::typed(PropertyKind::Birthday, PropertyValue::DateAndOrTime(date))
    }

    #[must_use]
    pub fn anniversary(date: DateAndOrTime) -> Self {
        Self::typed(PropertyKind::Anniversary, PropertyValue::DateAndOrTime(date))
    }

    #[must_use]
    pub fn revision(timestamp: Timestamp) -> Self {
        Self::typed(PropertyKind::Revision, PropertyValue::Timestamp(timestamp))
    }

    #[must_use]
    pub fn geo(geo: GeoUri) -> Self {
        Self::typed(PropertyKind::Geo, PropertyValue::Geo(geo))
    }

    #[must_use]
    pub fn gender(gender: Gender) -> Self {
        Self::typed(PropertyKind::Gender, PropertyValue::Gender(gender))
    }

    #[must_use]
    pub fn timezone(timezone: Timezone) -> Self {
        Self::typed(PropertyKind::Timezone, PropertyValue::Timezone(timezone))
    }

    #[must_use]
    pub fn client_pid_map(map: ClientPidMap) -> Self {
        Self::typed(PropertyKind::ClientPidMap, PropertyValue::ClientPidMap(map))
    }

    #[must_use]
    pub fn related(related: Related) -> Self {
        Self::typed(PropertyKind::Related, PropertyValue::Related(related))
    }

    #[must_use]
    pub fn agent(agent: Agent) -> Self {
        Self::typed(PropertyKind::Agent, PropertyValue::Agent(agent))
    }

    #[must_use]
    pub fn xml(xml: impl Into<String>) -> Self {
        Self::typed(PropertyKind::Xml, PropertyValue::Xml(xml.into()))
    }

    /// Creates a PHOTO, LOGO, SOUND or KEY property.
    ///
    /// ## Errors
    /// Returns [`RfcError::ValueMismatch`] if `kind` is not a binary kind.
    pub fn binary(kind: PropertyKind, binary: Binary) -> RfcResult<Self> {
        Self::new(kind, PropertyValue::Binary(binary))
    }

    /// Creates a BIRTHPLACE or DEATHPLACE property.
    ///
    /// ## Errors
    /// Returns [`RfcError::ValueMismatch`] if `kind` is not a place kind.
    pub fn place(kind: PropertyKind, place: Place) -> RfcResult<Self> {
        Self::new(kind, PropertyValue::Place(place))
    }

    /// Creates an extension property kept verbatim.
    #[must_use]
    pub fn raw(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::from_raw(RawValue::new(name, value))
    }

    /// Creates an extension property from a raw payload, keeping its data type.
    #[must_use]
    pub fn from_raw(raw: RawValue) -> Self {
        Self::typed(PropertyKind::Raw, PropertyValue::Raw(raw))
    }

    /// Creates a property of a caller-registered kind.
    #[must_use]
    pub fn custom(name: &'static str, value: Box<dyn CustomValue>) -> Self {
        Self::typed(PropertyKind::Custom(name), PropertyValue::Custom(value))
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        self.parameters.put(name, value);
        self
    }

    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Wire name: the kind's name, or the stored name of a raw property.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.value {
            PropertyValue::Raw(raw) => &raw.name,
            _ => self.kind.wire_name(),
        }
    }

    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn set_group(&mut self, group: Option<String>) {
        self.group = group;
    }

    #[must_use]
    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    /// Replaces the payload.
    ///
    /// ## Errors
    /// Returns [`RfcError::ValueMismatch`] if the kind cannot carry the payload;
    /// the property is left unchanged.
    pub fn set_value(&mut self, value: PropertyValue) -> RfcResult<PropertyValue> {
        if !self.kind.accepts(&value) {
            return Err(RfcError::ValueMismatch {
                kind: self.kind,
                expected: self.kind.expected_shape(),
                actual: value.shape_name(),
            });
        }
        Ok(std::mem::replace(&mut self.value, value))
    }

    #[must_use]
    pub fn into_value(self) -> PropertyValue {
        self.value
    }

    /// Versions this property can be written in.
    #[must_use]
    pub fn supported_versions(&self) -> SupportedVersions {
        match &self.value {
            PropertyValue::Custom(custom) => custom.supported_versions(),
            _ => self.kind.supported_versions(),
        }
    }

    #[must_use]
    pub fn is_supported_by(&self, version: VCardVersion) -> bool {
        self.supported_versions().contains(version)
    }

    /// Checks the property against the rules of a version.
    ///
    /// Runs the supported-version check, parameter checks, the group-name
    /// check and the kind's own rules, concatenating their warnings.
    #[must_use]
    pub fn validate(&self, version: VCardVersion, vcard: &VCard) -> Vec<ValidationWarning> {
        validate::validate_property(self, version, vcard)
    }

    /// Orders by PREF ascending. Properties without a valid PREF sort last and
    /// compare equal to each other.
    #[must_use]
    pub fn compare_by_pref(&self, other: &Self) -> Ordering {
        let pref = |p: &Self| p.parameters.pref().ok().flatten();
        match (pref(self), pref(other)) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl Parameterized for Property {
    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }
}

fn group_eq(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}

/// Structural equality; the group label compares case-insensitively.
impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && group_eq(self.group(), other.group())
            && self.parameters == other.parameters
            && self.value == other.value
    }
}

impl Eq for Property {}

impl Hash for Property {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.group.as_ref().map(|g| g.to_ascii_lowercase()).hash(state);
        self.parameters.hash(state);
        self.value.hash(state);
    }
}
