//! Property values with more than one part: N, ADR, ORG, GENDER, TEL,
//! RELATED, the place and binary kinds, TZ and AGENT.

use chrono::FixedOffset;

use super::geo::GeoUri;
use super::vcard::VCard;

/// The N property: five positional components, each a list.
///
/// Before 4.0 the lists hold at most one value on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StructuredName {
    pub family: Vec<String>,
    pub given: Vec<String>,
    /// Middle names.
    pub additional: Vec<String>,
    /// Honorifics written before the name.
    pub prefixes: Vec<String>,
    /// Honorifics and credentials written after the name.
    pub suffixes: Vec<String>,
}

impl StructuredName {
    /// A name with one family and one given name.
    #[must_use]
    pub fn simple(family: impl Into<String>, given: impl Into<String>) -> Self {
        Self {
            family: vec![family.into()],
            given: vec![given.into()],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        all_empty(&self.components())
    }

    /// Family, given, additional, prefixes, suffixes.
    #[must_use]
    pub fn components(&self) -> [&Vec<String>; 5] {
        [
            &self.family,
            &self.given,
            &self.additional,
            &self.prefixes,
            &self.suffixes,
        ]
    }

    /// Inverse of [`Self::components`]. Absent components stay empty and
    /// extra ones are dropped.
    #[must_use]
    pub fn from_components(components: Vec<Vec<String>>) -> Self {
        let [family, given, additional, prefixes, suffixes] = positional(components);
        Self {
            family,
            given,
            additional,
            prefixes,
            suffixes,
        }
    }
}

/// The ADR property's seven positional components.
///
/// A delivery label is not part of the value; it rides on the LABEL
/// parameter (or a LABEL property before 4.0).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Address {
    pub po_box: Vec<String>,
    /// Apartment, suite or floor.
    pub extended: Vec<String>,
    pub street: Vec<String>,
    /// City.
    pub locality: Vec<String>,
    /// State or province.
    pub region: Vec<String>,
    pub postal_code: Vec<String>,
    pub country: Vec<String>,
}

impl Address {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        all_empty(&self.components())
    }

    /// PO box, extended, street, locality, region, postal code, country.
    #[must_use]
    pub fn components(&self) -> [&Vec<String>; 7] {
        [
            &self.po_box,
            &self.extended,
            &self.street,
            &self.locality,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
    }

    /// Inverse of [`Self::components`].
    #[must_use]
    pub fn from_components(components: Vec<Vec<String>>) -> Self {
        let [po_box, extended, street, locality, region, postal_code, country] =
            positional(components);
        Self {
            po_box,
            extended,
            street,
            locality,
            region,
            postal_code,
            country,
        }
    }
}

fn all_empty(components: &[&Vec<String>]) -> bool {
    components.iter().all(|values| values.is_empty())
}

/// Pads or truncates to exactly `N` components.
fn positional<const N: usize>(components: Vec<Vec<String>>) -> [Vec<String>; N] {
    let mut components = components.into_iter();
    std::array::from_fn(|_| components.next().unwrap_or_default())
}

/// The ORG property: a name followed by units, broadest first.
///
/// Units are positional; an empty unit keeps its slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Organization {
    pub name: String,
    pub units: Vec<String>,
}

impl Organization {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_units(name, Vec::new())
    }

    #[must_use]
    pub fn with_units(name: impl Into<String>, units: Vec<String>) -> Self {
        Self {
            name: name.into(),
            units,
        }
    }

    /// The name, then each unit, in wire order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.units.iter().map(String::as_str))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.units.is_empty()
    }
}

/// The GENDER property (4.0): an optional sex code and free-form identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Gender {
    pub sex: Option<Sex>,
    pub identity: Option<String>,
}

impl Gender {
    #[must_use]
    pub fn sex(sex: Sex) -> Self {
        Self {
            sex: Some(sex),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn identity(text: impl Into<String>) -> Self {
        Self {
            identity: Some(text.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn full(sex: Sex, identity: impl Into<String>) -> Self {
        Self {
            identity: Some(identity.into()),
            ..Self::sex(sex)
        }
    }

    /// No code and no (or a blank) identity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sex.is_none() && self.identity.as_deref().is_none_or(str::is_empty)
    }
}

/// One-letter sex code of GENDER.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
    Other,
    /// Not applicable.
    None,
    Unknown,
}

impl Sex {
    const ALL: [Self; 5] = [
        Self::Male,
        Self::Female,
        Self::Other,
        Self::None,
        Self::Unknown,
    ];

    /// Case-insensitive: `m` and `M` are both [`Sex::Male`].
    #[must_use]
    pub fn from_char(code: char) -> Option<Self> {
        let code = code.to_ascii_uppercase();
        Self::ALL.into_iter().find(|sex| sex.as_char() == code)
    }

    /// The upper-case wire code.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Male => 'M',
            Self::Female => 'F',
            Self::Other => 'O',
            Self::None => 'N',
            Self::Unknown => 'U',
        }
    }
}

/// Telephone number (TEL property).
///
/// vCard 4.0 favours `tel:` URIs; earlier versions only carry free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Telephone {
    Text(String),
    /// A `tel:` (or other scheme) URI, stored verbatim.
    Uri(String),
}

impl Telephone {
    /// Returns the number as written, without a `tel:` prefix.
    #[must_use]
    pub fn number(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Uri(uri) => uri
                .get(..4)
                .filter(|scheme| scheme.eq_ignore_ascii_case("tel:"))
                .map_or(uri.as_str(), |_| &uri[4..]),
        }
    }
}

/// Target of a RELATED property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Related {
    /// Usually a `urn:uuid:` naming another card's UID.
    Uri(String),
    /// Written with VALUE=text.
    Text(String),
}

/// A place (BIRTHPLACE / DEATHPLACE, RFC 6474).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Place {
    Geo(GeoUri),
    Uri(String),
    Text(String),
}

/// Binary payload of PHOTO, LOGO, SOUND and KEY.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Binary {
    /// Inline data.
    Data {
        data: Vec<u8>,
        /// Media type of the data (`image/png`), written into 4.0 data URIs.
        media_type: Option<String>,
    },
    /// Reference to externally stored data.
    Url(String),
    /// Plain text (KEY only).
    Text(String),
}

impl Binary {
    #[must_use]
    pub fn data(data: Vec<u8>, media_type: Option<&str>) -> Self {
        Self::Data {
            data,
            media_type: media_type.map(ToString::to_string),
        }
    }

    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Returns whether the value carries neither data nor a URL.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Data { data, .. } => data.is_empty(),
            Self::Url(url) => url.is_empty(),
            Self::Text(text) => text.is_empty(),
        }
    }
}

/// Time zone (TZ property).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Timezone {
    /// UTC offset.
    Offset(FixedOffset),
    /// Time zone identifier or description (e.g. `America/New_York`).
    Text(String),
    Uri(String),
}

/// AGENT value (vCard 2.1 / 3.0).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Agent {
    /// Reference to the agent's vCard.
    Url(String),
    /// The agent's vCard, owned by this property.
    VCard(Box<VCard>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_names_and_addresses() {
        assert!(StructuredName::default().is_empty());
        assert!(!StructuredName::simple("Doe", "John").is_empty());
        assert!(Address::new().is_empty());
        assert!(
            !Address {
                country: strings(&["Canada"]),
                ..Address::new()
            }
            .is_empty()
        );
    }

    #[test]
    fn components_are_padded_and_truncated() {
        let name = StructuredName::from_components(vec![strings(&["Doe"]), strings(&["John"])]);
        assert_eq!(name, StructuredName::simple("Doe", "John"));

        let mut components: Vec<Vec<String>> = (0..9).map(|i| vec![i.to_string()]).collect();
        components[2] = strings(&["1 Main St", "Apt 2"]);
        let address = Address::from_components(components);
        assert_eq!(address.street, ["1 Main St", "Apt 2"]);
        assert_eq!(address.country, ["6"]);
        assert_eq!(address.components()[2], &address.street);
    }

    #[test]
    fn organization_components_keep_empty_units() {
        let org = Organization::with_units("ABC", strings(&["", "Dept"]));
        assert_eq!(org.components().collect::<Vec<_>>(), ["ABC", "", "Dept"]);
        assert!(Organization::new("").is_empty());
    }

    #[test]
    fn gender_emptiness() {
        assert!(Gender::default().is_empty());
        assert!(Gender::identity("").is_empty());
        assert!(!Gender::sex(Sex::Female).is_empty());
        assert_eq!(Gender::full(Sex::Other, "x").sex, Some(Sex::Other));
    }

    #[test]
    fn sex_codes() {
        for sex in Sex::ALL {
            assert_eq!(Sex::from_char(sex.as_char()), Some(sex));
            assert_eq!(Sex::from_char(sex.as_char().to_ascii_lowercase()), Some(sex));
        }
        assert_eq!(Sex::from_char('X'), None);
    }

    #[test]
    fn telephone_number_strips_scheme() {
        assert_eq!(Telephone::Uri("tel:+1-555".to_string()).number(), "+1-555");
        assert_eq!(Telephone::Uri("TEL:+1-555".to_string()).number(), "+1-555");
        assert_eq!(Telephone::Text("555-1234".to_string()).number(), "555-1234");
    }
}
