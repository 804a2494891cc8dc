//! vCard core types.
//!
//! This module provides the object model shared by every wire format:
//!
//! - [`VCard`] - The aggregate, with ALTID grouping and PID bookkeeping
//! - [`Property`] - One field: group, [`Parameters`] and a [`PropertyValue`]
//! - [`PropertyKind`] - Built-in kinds with their wire names and versions
//! - [`Parameters`] - Case-insensitive, multi-valued parameter storage
//!
//! ## Structured Types
//!
//! - [`StructuredName`] - N property (family, given, etc.)
//! - [`Address`] - ADR property
//! - [`Organization`] - ORG property
//! - [`Gender`] - GENDER property
//!
//! ## Date/Time Types
//!
//! vCard supports partial/truncated dates that iCalendar doesn't:
//!
//! - [`VCardDate`] - Full or partial date
//! - [`VCardTime`] - Full or partial time
//! - [`DateAndOrTime`] - Combined date/time or text
//!
//! ## Example
//!
//! ```rust
//! use cardwright_rfc::rfc::vcard::core::{Property, PropertyKind, StructuredName, VCard};
//!
//! let mut card = VCard::new();
//! card.add_property(Property::formatted_name("John Doe"));
//! card.add_property(Property::structured_name(StructuredName::simple("Doe", "John")));
//! card.add_property(Property::email("john@example.com"));
//!
//! assert_eq!(card.properties(PropertyKind::Email).len(), 1);
//! ```

pub mod chars;
mod data_type;
mod datetime;
mod geo;
mod parameter;
mod pid;
mod property;
mod structured;
mod value;
mod vcard;
mod version;

pub use data_type::{Encoding, ValueDataType};
pub use datetime::{
    DateAndOrTime, DateFormat, Timestamp, VCardDate, VCardTime, format_utc_offset,
    parse_utc_offset,
};
pub use geo::{GeoUri, InvalidGeoUri};
pub use parameter::{
    Parameter, ParameterError, ParameterListMut, Parameters, names as param_names, types,
};
pub use pid::{ClientPidMap, InvalidPid, Pid};
pub use property::{Parameterized, Property, PropertyKind};
pub use structured::{
    Address, Agent, Binary, Gender, Organization, Place, Related, Sex, StructuredName, Telephone,
    Timezone,
};
pub use value::{CustomValue, PropertyValue, RawValue};
pub use vcard::{VCard, VCardKind};
pub use version::{SupportedVersions, SyntaxStyle, VCardVersion};
