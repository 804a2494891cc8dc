//! The vCard aggregate.

use std::collections::HashSet;

use super::pid::ClientPidMap;
use super::property::{Parameterized, Property, PropertyKind};
use super::structured::{Address, Organization, StructuredName, Telephone};
use super::value::PropertyValue;
use super::version::VCardVersion;
use crate::error::{RfcError, RfcResult};
use crate::rfc::vcard::validate::{self, ValidationWarnings};

/// vCard KIND property values (RFC 6350 §6.1.4).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VCardKind {
    /// An individual person.
    #[default]
    Individual,
    Group,
    Organization,
    /// A named location.
    Location,
    /// Extension or unknown kind.
    Other(String),
}

impl VCardKind {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "individual" => Self::Individual,
            "group" => Self::Group,
            "org" | "organization" => Self::Organization,
            "location" => Self::Location,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Individual => "individual",
            Self::Group => "group",
            Self::Organization => "org",
            Self::Location => "location",
            Self::Other(s) => s,
        }
    }
}

/// A complete vCard.
///
/// Properties are kept in insertion order. Within a kind, the first property
/// is the primary instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VCard {
    version: VCardVersion,
    properties: Vec<Property>,
}

impl VCard {
    /// Creates an empty vCard 3.0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_version(version: VCardVersion) -> Self {
        Self {
            version,
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn version(&self) -> VCardVersion {
        self.version
    }

    pub fn set_version(&mut self, version: VCardVersion) {
        self.version = version;
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterates all properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Returns the first property of a kind.
    #[must_use]
    pub fn property(&self, kind: PropertyKind) -> Option<&Property> {
        self.properties.iter().find(|p| p.kind() == kind)
    }

    /// Returns every property of a kind, in insertion order.
    #[must_use]
    pub fn properties(&self, kind: PropertyKind) -> Vec<&Property> {
        self.properties.iter().filter(|p| p.kind() == kind).collect()
    }

    pub fn properties_mut(&mut self, kind: PropertyKind) -> impl Iterator<Item = &mut Property> {
        self.properties.iter_mut().filter(move |p| p.kind() == kind)
    }

    /// Replaces every property of `kind` with `property` (or with nothing).
    ///
    /// The replacement takes the position of the first removed property.
    /// Returns the removed properties.
    ///
    /// ## Errors
    /// Returns [`RfcError::MixedKinds`] if `property` is not of `kind`; the
    /// vCard is left unchanged.
    pub fn set_property(
        &mut self,
        kind: PropertyKind,
        property: Option<Property>,
    ) -> RfcResult<Vec<Property>> {
        if let Some(other) = property.as_ref().map(Property::kind).filter(|k| *k != kind) {
            return Err(RfcError::MixedKinds { first: kind, other });
        }

        Ok(self.replace_kind(kind, property))
    }

    /// Removes the first property structurally equal to `property`.
    pub fn remove_property(&mut self, property: &Property) -> Option<Property> {
        let index = self.properties.iter().position(|p| p == property)?;
        Some(self.properties.remove(index))
    }

    /// Removes every property of a kind, returning them in order.
    pub fn remove_properties(&mut self, kind: PropertyKind) -> Vec<Property> {
        let (removed, kept) = std::mem::take(&mut self.properties)
            .into_iter()
            .partition(|p| p.kind() == kind);
        self.properties = kept;
        removed
    }

    /// Groups the properties of a kind by ALTID.
    ///
    /// ALTID groups come first, in order of first appearance, each keeping
    /// insertion order. Properties without an ALTID follow as singletons.
    #[must_use]
    pub fn properties_alt(&self, kind: PropertyKind) -> Vec<Vec<&Property>> {
        let mut keyed: Vec<(&str, Vec<&Property>)> = Vec::new();
        let mut singletons: Vec<Vec<&Property>> = Vec::new();

        for property in self.properties.iter().filter(|p| p.kind() == kind) {
            let Some(altid) = property.altid() else {
                singletons.push(vec![property]);
                continue;
            };

            match keyed.iter_mut().find(|(key, _)| *key == altid) {
                Some((_, group)) => group.push(property),
                None => keyed.push((altid, vec![property])),
            }
        }

        keyed
            .into_iter()
            .map(|(_, group)| group)
            .chain(singletons)
            .collect()
    }

    /// Returns the smallest positive integer, as a string, that no property
    /// uses as its ALTID.
    ///
    /// Non-numeric ALTIDs never block a candidate.
    #[must_use]
    pub fn generate_alt_id<'a>(properties: impl IntoIterator<Item = &'a Property>) -> String {
        let taken: HashSet<&str> = properties.into_iter().filter_map(|p| p.altid()).collect();

        let mut candidate: u64 = 1;
        loop {
            let id = candidate.to_string();
            if !taken.contains(id.as_str()) {
                return id;
            }
            candidate += 1;
        }
    }

    /// Adds a set of alternative representations, stamping them with one
    /// fresh ALTID.
    ///
    /// ## Errors
    /// Returns [`RfcError::MixedKinds`] if any property is not of `kind`;
    /// nothing is added in that case.
    pub fn add_properties_alt(
        &mut self,
        kind: PropertyKind,
        alternatives: impl IntoIterator<Item = Property>,
    ) -> RfcResult<()> {
        let mut alternatives: Vec<Property> = alternatives.into_iter().collect();
        if let Some(other) = alternatives.iter().map(Property::kind).find(|k| *k != kind) {
            return Err(RfcError::MixedKinds { first: kind, other });
        }

        let altid = Self::generate_alt_id(self.properties.iter().filter(|p| p.kind() == kind));
        tracing::trace!(%kind, %altid, count = alternatives.len(), "Adding alternative representations");

        for property in &mut alternatives {
            property.set_altid(Some(&altid));
        }
        self.properties.extend(alternatives);
        Ok(())
    }

    /// Replaces every property of `kind` with a set of alternative
    /// representations. Returns the removed properties.
    ///
    /// ## Errors
    /// Returns [`RfcError::MixedKinds`] if any property is not of `kind`; the
    /// vCard is left unchanged.
    pub fn set_properties_alt(
        &mut self,
        kind: PropertyKind,
        alternatives: impl IntoIterator<Item = Property>,
    ) -> RfcResult<Vec<Property>> {
        let alternatives: Vec<Property> = alternatives.into_iter().collect();
        if let Some(other) = alternatives.iter().map(Property::kind).find(|k| *k != kind) {
            return Err(RfcError::MixedKinds { first: kind, other });
        }

        let removed = self.remove_properties(kind);
        self.add_properties_alt(kind, alternatives)?;
        Ok(removed)
    }

    /// Returns the properties of a kind sorted by PREF (stable).
    #[must_use]
    pub fn properties_by_pref(&self, kind: PropertyKind) -> Vec<&Property> {
        let mut properties = self.properties(kind);
        properties.sort_by(|a, b| a.compare_by_pref(b));
        properties
    }

    // --- Extended properties ---

    /// Returns the extension properties with a given name (case-insensitive).
    #[must_use]
    pub fn extended_properties(&self, name: &str) -> Vec<&Property> {
        self.properties
            .iter()
            .filter(|p| p.kind() == PropertyKind::Raw && p.name().eq_ignore_ascii_case(name))
            .collect()
    }

    #[must_use]
    pub fn extended_property(&self, name: &str) -> Option<&Property> {
        self.extended_properties(name).into_iter().next()
    }

    pub fn add_extended_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.push(Property::raw(name, value));
    }

    pub fn remove_extended_properties(&mut self, name: &str) -> Vec<Property> {
        let (removed, kept) = std::mem::take(&mut self.properties)
            .into_iter()
            .partition(|p| p.kind() == PropertyKind::Raw && p.name().eq_ignore_ascii_case(name));
        self.properties = kept;
        removed
    }

    // --- PID / CLIENTPIDMAP ---

    /// Returns every CLIENTPIDMAP binding.
    #[must_use]
    pub fn client_pid_maps(&self) -> Vec<&ClientPidMap> {
        self.properties
            .iter()
            .filter_map(|p| p.value().as_client_pid_map())
            .collect()
    }

    pub fn add_client_pid_map(&mut self, map: ClientPidMap) {
        self.properties.push(Property::client_pid_map(map));
    }

    // --- Typed conveniences ---

    /// Returns the FN (formatted name) value.
    #[must_use]
    pub fn formatted_name(&self) -> Option<&str> {
        self.property(PropertyKind::FormattedName)?.value().as_text()
    }

    pub fn set_formatted_name(&mut self, name: Option<&str>) {
        let property = name.map(Property::formatted_name);
        self.replace_kind(PropertyKind::FormattedName, property);
    }

    /// Returns the N (structured name) value.
    #[must_use]
    pub fn structured_name(&self) -> Option<&StructuredName> {
        self.property(PropertyKind::StructuredName)?
            .value()
            .as_structured_name()
    }

    pub fn set_structured_name(&mut self, name: Option<StructuredName>) {
        let property = name.map(Property::structured_name);
        self.replace_kind(PropertyKind::StructuredName, property);
    }

    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.property(PropertyKind::Uid)?.value().as_uri()
    }

    pub fn set_uid(&mut self, uid: Option<&str>) {
        let property = uid.map(Property::uid);
        self.replace_kind(PropertyKind::Uid, property);
    }

    /// Returns the KIND value.
    #[must_use]
    pub fn kind(&self) -> VCardKind {
        self.property(PropertyKind::Kind)
            .and_then(|p| p.value().as_text())
            .map(VCardKind::parse)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self.kind(), VCardKind::Group)
    }

    #[must_use]
    pub fn emails(&self) -> Vec<&str> {
        self.iter_values(PropertyKind::Email)
            .filter_map(PropertyValue::as_text)
            .collect()
    }

    #[must_use]
    pub fn telephones(&self) -> Vec<&Telephone> {
        self.iter_values(PropertyKind::Telephone)
            .filter_map(PropertyValue::as_telephone)
            .collect()
    }

    #[must_use]
    pub fn addresses(&self) -> Vec<&Address> {
        self.iter_values(PropertyKind::Address)
            .filter_map(PropertyValue::as_address)
            .collect()
    }

    #[must_use]
    pub fn organization(&self) -> Option<&Organization> {
        match self.property(PropertyKind::Organization)?.value() {
            PropertyValue::Organization(o) => Some(o),
            _ => None,
        }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.property(PropertyKind::Title)?.value().as_text()
    }

    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.property(PropertyKind::Note)?.value().as_text()
    }

    #[must_use]
    pub fn urls(&self) -> Vec<&str> {
        self.iter_values(PropertyKind::Url)
            .filter_map(PropertyValue::as_uri)
            .collect()
    }

    /// Returns MEMBER URIs for group vCards.
    #[must_use]
    pub fn members(&self) -> Vec<&str> {
        self.iter_values(PropertyKind::Member)
            .filter_map(PropertyValue::as_uri)
            .collect()
    }

    /// Validates the vCard against the rules of a version.
    #[must_use]
    pub fn validate(&self, version: VCardVersion) -> ValidationWarnings {
        validate::validate_vcard(self, version)
    }

    fn iter_values(&self, kind: PropertyKind) -> impl Iterator<Item = &PropertyValue> {
        self.properties
            .iter()
            .filter(move |p| p.kind() == kind)
            .map(Property::value)
    }

    fn replace_kind(&mut self, kind: PropertyKind, property: Option<Property>) -> Vec<Property> {
        let position = self.properties.iter().position(|p| p.kind() == kind);
        let removed = self.remove_properties(kind);
        if let Some(property) = property {
            let index = position.unwrap_or(self.properties.len());
            self.properties.insert(index, property);
        }
        removed
    }
}

impl<'a> IntoIterator for &'a VCard {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::core::Pid;

    fn note(text: &str, altid: Option<&str>) -> Property {
        let mut property = Property::note(text);
        property.set_altid(altid);
        property
    }

    #[test]
    fn vcard_defaults_to_3_0() {
        let card = VCard::new();
        assert_eq!(card.version(), VCardVersion::V3_0);
        assert!(card.is_empty());
    }

    #[test]
    fn vcard_kind_parse() {
        assert_eq!(VCardKind::parse("individual"), VCardKind::Individual);
        assert_eq!(VCardKind::parse("GROUP"), VCardKind::Group);
        assert_eq!(VCardKind::parse("org"), VCardKind::Organization);
    }

    #[test]
    fn vcard_formatted_name() {
        let mut card = VCard::new();
        card.add_property(Property::formatted_name("John Doe"));
        assert_eq!(card.formatted_name(), Some("John Doe"));

        card.set_formatted_name(None);
        assert!(card.property(PropertyKind::FormattedName).is_none());
    }

    #[test]
    fn vcard_emails_keep_insertion_order() {
        let mut card = VCard::new();
        card.add_property(Property::email("john@example.com"));
        card.add_property(Property::note("between"));
        card.add_property(Property::email("john.doe@work.com"));

        assert_eq!(card.emails(), ["john@example.com", "john.doe@work.com"]);
        assert_eq!(
            card.property(PropertyKind::Email).unwrap().value().as_text(),
            Some("john@example.com")
        );
    }

    #[test]
    fn set_property_replaces_in_place() {
        let mut card = VCard::new();
        card.add_property(Property::title("a"));
        card.add_property(Property::note("n1"));
        card.add_property(Property::note("n2"));
        card.add_property(Property::title("b"));

        let removed = card
            .set_property(PropertyKind::Note, Some(Property::note("n3")))
            .unwrap();
        assert_eq!(removed.len(), 2);

        let names: Vec<_> = card.iter().map(|p| p.value().as_text().unwrap()).collect();
        assert_eq!(names, ["a", "n3", "b"]);

        card.set_property(PropertyKind::Note, None).unwrap();
        assert!(card.properties(PropertyKind::Note).is_empty());
    }

    #[test]
    fn set_property_rejects_other_kind() {
        let mut card = VCard::new();
        card.add_property(Property::note("keep"));
        let err = card
            .set_property(PropertyKind::Note, Some(Property::title("x")))
            .unwrap_err();
        assert!(matches!(err, RfcError::MixedKinds { .. }));
        assert_eq!(card.note(), Some("keep"));
    }

    #[test]
    fn remove_property_removes_first_equal() {
        let mut card = VCard::new();
        card.add_property(Property::note("a"));
        card.add_property(Property::note("b"));
        card.add_property(Property::note("a"));

        assert!(card.remove_property(&Property::note("a")).is_some());
        let notes: Vec<_> = card.iter().map(|p| p.value().as_text().unwrap()).collect();
        assert_eq!(notes, ["b", "a"]);
        assert!(card.remove_property(&Property::note("zzz")).is_none());
    }

    fn altids(values: &[&str]) -> Vec<Property> {
        values.iter().map(|v| note("x", Some(v))).collect()
    }

    #[test]
    fn generate_alt_id_examples() {
        assert_eq!(VCard::generate_alt_id(&altids(&["1", "1", "2"])), "3");
        assert_eq!(VCard::generate_alt_id(&altids(&["1", "1", "3"])), "2");
        assert_eq!(VCard::generate_alt_id(std::iter::empty()), "1");
        assert_eq!(VCard::generate_alt_id(&altids(&["one", "one", "three"])), "1");
    }

    #[test]
    fn generate_alt_id_ignores_properties_without_altid() {
        let props = vec![note("x", None), note("y", Some("1"))];
        assert_eq!(VCard::generate_alt_id(&props), "2");
    }

    #[test]
    fn properties_alt_grouping_order() {
        let mut card = VCard::new();
        card.add_property(note("a", Some("1")));
        card.add_property(note("b", None));
        card.add_property(note("c", Some("3")));
        card.add_property(note("d", None));
        card.add_property(note("e", Some("1")));

        let groups: Vec<Vec<&str>> = card
            .properties_alt(PropertyKind::Note)
            .into_iter()
            .map(|g| g.into_iter().map(|p| p.value().as_text().unwrap()).collect())
            .collect();
        assert_eq!(groups, vec![vec!["a", "e"], vec!["c"], vec!["b"], vec!["d"]]);
    }

    #[test]
    fn add_properties_alt_stamps_fresh_altid() {
        let mut card = VCard::new();
        card.add_property(note("existing", Some("1")));

        card.add_properties_alt(
            PropertyKind::Note,
            [note("hello", None), note("bonjour", Some("9"))],
        )
        .unwrap();

        let alternatives: Vec<_> = card
            .properties(PropertyKind::Note)
            .into_iter()
            .skip(1)
            .map(|p| p.altid().unwrap().to_string())
            .collect();
        assert_eq!(alternatives, ["2", "2"]);
        assert_eq!(
            card.properties(PropertyKind::Note)[0].altid(),
            Some("1"),
            "existing ALTIDs are not renumbered"
        );
    }

    #[test]
    fn add_properties_alt_rejects_mixed_kinds() {
        let mut card = VCard::new();
        let err = card
            .add_properties_alt(PropertyKind::Note, [Property::note("a"), Property::title("b")])
            .unwrap_err();
        assert!(matches!(
            err,
            RfcError::MixedKinds {
                first: PropertyKind::Note,
                other: PropertyKind::Title
            }
        ));
        assert!(card.is_empty());
    }

    #[test]
    fn set_properties_alt_replaces_kind() {
        let mut card = VCard::new();
        card.add_property(note("old", Some("5")));
        let removed = card
            .set_properties_alt(PropertyKind::Note, [note("a", None), note("b", None)])
            .unwrap();

        assert_eq!(removed.len(), 1);
        assert_eq!(card.properties_alt(PropertyKind::Note).len(), 1);
        assert_eq!(card.properties(PropertyKind::Note)[0].altid(), Some("1"));
    }

    #[test]
    fn extended_properties() {
        let mut card = VCard::new();
        card.add_extended_property("X-SPOUSE", "Jane");
        card.add_extended_property("X-KID", "Jim");
        card.add_extended_property("x-spouse", "Janet");

        assert_eq!(card.extended_properties("X-SPOUSE").len(), 2);
        assert_eq!(card.extended_property("x-kid").unwrap().name(), "X-KID");

        let removed = card.remove_extended_properties("X-SPOUSE");
        assert_eq!(removed.len(), 2);
        assert_eq!(card.len(), 1);
    }

    #[test]
    fn pid_and_client_pid_map_association() {
        let mut card = VCard::new();
        card.add_client_pid_map(ClientPidMap::new(1, "urn:uuid:53e374d9-337e-4727-8803-a1e9c14e0556"));

        let mut email = Property::email("a@example.com");
        email.add_pid(Pid::with_map_ref(1, 1));
        card.add_property(email);

        let maps = card.client_pid_maps();
        let pid = card.property(PropertyKind::Email).unwrap().pids().unwrap()[0];
        assert_eq!(Some(maps[0].source_id), pid.client_pid_map_ref);
    }

    #[test]
    fn properties_by_pref() {
        let mut card = VCard::new();
        card.add_property(Property::email("c"));
        card.add_property(Property::email("b").with_parameter("PREF", "50"));
        card.add_property(Property::email("a").with_parameter("PREF", "1"));

        let order: Vec<_> = card
            .properties_by_pref(PropertyKind::Email)
            .into_iter()
            .map(|p| p.value().as_text().unwrap())
            .collect();
        assert_eq!(order, ["a", "b", "c"]);
    }
}
