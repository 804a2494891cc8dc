//! Kind and wire-name lookup of scribes.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::{BuiltinScribe, ParseContext, PropertyScribe, RawScribe, ScribeError};
use crate::rfc::vcard::core::{
    Parameterized, Parameters, Property, PropertyKind, PropertyValue, RawValue, VCard,
    VCardVersion,
};

/// A property ready for the line writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedProperty {
    pub group: Option<String>,
    pub name: String,
    /// Parameters for the target version, VALUE included when needed.
    pub parameters: Parameters,
    pub value: String,
}

#[derive(Debug, Default)]
struct Scribes {
    by_kind: HashMap<PropertyKind, Arc<dyn PropertyScribe>>,
    /// Keyed by upper-cased wire name.
    by_name: HashMap<String, Arc<dyn PropertyScribe>>,
}

impl Scribes {
    /// Drops the wire-name entry only while it still belongs to `kind`.
    fn forget_name(&mut self, wire_name: &str, kind: PropertyKind) {
        let name = wire_name.to_ascii_uppercase();
        if self.by_name.get(&name).is_some_and(|owner| owner.kind() == kind) {
            self.by_name.remove(&name);
        }
    }
}

/// Maps property kinds and wire names to scribes.
///
/// Shared read-mostly; readers and writers hold it through an `Arc`.
/// Registration replaces any scribe previously bound to the same kind or
/// wire name.
#[derive(Debug)]
pub struct ScribeRegistry {
    scribes: RwLock<Scribes>,
    raw: Arc<dyn PropertyScribe>,
}

impl Default for ScribeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScribeRegistry {
    /// Creates a registry with one scribe per built-in kind.
    #[must_use]
    pub fn new() -> Self {
        let registry = Self::empty();
        for scribe in BuiltinScribe::all() {
            registry.register(scribe);
        }
        registry
    }

    /// Creates a registry that only knows the raw fallback.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            scribes: RwLock::new(Scribes::default()),
            raw: Arc::new(RawScribe),
        }
    }

    /// Registers a scribe under its kind and wire name.
    ///
    /// Returns the scribe previously registered for the kind, if any.
    pub fn register(&self, scribe: impl PropertyScribe + 'static) -> Option<Arc<dyn PropertyScribe>> {
        let scribe: Arc<dyn PropertyScribe> = Arc::new(scribe);
        let kind = scribe.kind();
        let name = scribe.wire_name().to_ascii_uppercase();

        tracing::trace!(%kind, name, "Registering scribe");

        let mut scribes = self.scribes.write().unwrap_or_else(PoisonError::into_inner);
        let previous = scribes.by_kind.insert(kind, Arc::clone(&scribe));
        if let Some(previous) = &previous {
            scribes.forget_name(previous.wire_name(), kind);
        }
        scribes.by_name.insert(name, scribe);
        previous
    }

    /// Removes the scribe of a kind. Its properties decode as raw afterwards.
    pub fn unregister(&self, kind: PropertyKind) -> Option<Arc<dyn PropertyScribe>> {
        let mut scribes = self.scribes.write().unwrap_or_else(PoisonError::into_inner);
        let removed = scribes.by_kind.remove(&kind)?;
        scribes.forget_name(removed.wire_name(), kind);
        Some(removed)
    }

    #[must_use]
    pub fn by_kind(&self, kind: PropertyKind) -> Option<Arc<dyn PropertyScribe>> {
        let scribes = self.scribes.read().unwrap_or_else(PoisonError::into_inner);
        scribes.by_kind.get(&kind).cloned()
    }

    /// Looks up a scribe by wire name, ignoring case.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<Arc<dyn PropertyScribe>> {
        let scribes = self.scribes.read().unwrap_or_else(PoisonError::into_inner);
        scribes.by_name.get(&name.to_ascii_uppercase()).cloned()
    }

    /// The scribe for unrecognized names.
    #[must_use]
    pub fn raw(&self) -> Arc<dyn PropertyScribe> {
        Arc::clone(&self.raw)
    }

    /// Decodes one property read from the wire.
    ///
    /// The scribe is found by `ctx.name()`. A name with no scribe, a value the
    /// scribe rejects, or a payload its kind cannot carry yields a raw
    /// property holding the name and value verbatim; the last two also record
    /// a warning.
    pub fn decode(
        &self,
        group: Option<String>,
        value: &str,
        mut parameters: Parameters,
        ctx: &mut ParseContext<'_>,
    ) -> Property {
        let data_type = parameters.value_type();

        if let Some(scribe) = self.by_name(ctx.name()) {
            let mut decoded_parameters = parameters.clone();
            match scribe.decode(value, data_type.as_ref(), &mut decoded_parameters, ctx) {
                Ok(decoded) => {
                    decoded_parameters.set_value_type(None);
                    match Property::from_parts(
                        scribe.kind(),
                        group.clone(),
                        decoded_parameters,
                        decoded,
                    ) {
                        Ok(property) => return property,
                        Err(err) => ctx.warn(format!("{err}; kept as raw")),
                    }
                }
                Err(err) => ctx.warn(format!("{err}; kept as raw")),
            }
        }

        tracing::trace!(name = ctx.name(), "Decoding as raw property");
        parameters.set_value_type(None);
        let mut property = Property::from_raw(RawValue {
            name: ctx.name().to_string(),
            value: value.to_string(),
            data_type,
        });
        property.set_group(group);
        *property.parameters_mut() = parameters;
        property
    }

    /// Encodes one property for a target version.
    ///
    /// Returns `Ok(None)` when `strict` is set and the property does not
    /// exist in `version`.
    ///
    /// ## Errors
    /// Returns [`ScribeError::NoScribe`] if the property's kind has no
    /// registered scribe, or the scribe's own error if the value cannot be
    /// written.
    pub fn encode(
        &self,
        property: &Property,
        version: VCardVersion,
        vcard: &VCard,
        strict: bool,
    ) -> Result<Option<EncodedProperty>, ScribeError> {
        if strict && !property.is_supported_by(version) {
            tracing::debug!(
                property = property.name(),
                %version,
                "Skipping property unsupported by target version"
            );
            return Ok(None);
        }

        let (scribe, name) = match property.value() {
            PropertyValue::Raw(raw) => (self.raw(), raw.name.clone()),
            _ => {
                let scribe = self
                    .by_kind(property.kind())
                    .ok_or_else(|| ScribeError::NoScribe(property.name().to_string()))?;
                let name = scribe.wire_name().to_string();
                (scribe, name)
            }
        };

        let value = scribe.encode(property, version)?;
        let mut parameters = scribe.prepare_parameters(property, version, vcard);
        let data_type = scribe.data_type(property, version);
        if data_type == scribe.default_data_type(version) {
            parameters.set_value_type(None);
        } else {
            parameters.set_value_type(data_type.as_ref());
        }

        Ok(Some(EncodedProperty {
            group: property.group().map(String::from),
            name,
            parameters,
            value,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::hash::{Hash, Hasher};

    use super::*;
    use crate::rfc::vcard::core::{CustomValue, DateAndOrTime, Telephone, ValueDataType};
    use crate::rfc::vcard::scribe::ParseWarning;

    #[derive(Debug, Clone, PartialEq, Hash)]
    struct Rating(u8);

    impl CustomValue for Rating {
        fn clone_value(&self) -> Box<dyn CustomValue> {
            Box::new(self.clone())
        }

        fn eq_value(&self, other: &dyn CustomValue) -> bool {
            other.as_any().downcast_ref::<Self>() == Some(self)
        }

        fn hash_value(&self, mut state: &mut dyn Hasher) {
            self.hash(&mut state);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct RatingScribe;

    impl PropertyScribe for RatingScribe {
        fn kind(&self) -> PropertyKind {
            PropertyKind::Custom("X-RATING")
        }

        fn default_data_type(&self, _version: VCardVersion) -> Option<ValueDataType> {
            Some(ValueDataType::Integer)
        }

        fn decode(
            &self,
            value: &str,
            _data_type: Option<&ValueDataType>,
            _parameters: &mut Parameters,
            _ctx: &mut ParseContext<'_>,
        ) -> Result<PropertyValue, ScribeError> {
            value
                .trim()
                .parse()
                .map(|stars| PropertyValue::Custom(Box::new(Rating(stars))))
                .map_err(|_err| ScribeError::cannot_parse("X-RATING", value, "not a number"))
        }

        fn encode(&self, property: &Property, version: VCardVersion) -> Result<String, ScribeError> {
            property
                .value()
                .as_custom::<Rating>()
                .map(|rating| rating.0.to_string())
                .ok_or_else(|| ScribeError::CannotWrite {
                    name: "X-RATING".into(),
                    version,
                    reason: "not a rating".into(),
                })
        }
    }

    /// Ratings bound to any kind under any wire name.
    #[derive(Debug)]
    struct AliasScribe {
        kind: PropertyKind,
        name: &'static str,
    }

    const STARS: AliasScribe = AliasScribe {
        kind: PropertyKind::Custom("X-STARS"),
        name: "X-RATING",
    };

    impl PropertyScribe for AliasScribe {
        fn kind(&self) -> PropertyKind {
            self.kind
        }

        fn wire_name(&self) -> &str {
            self.name
        }

        fn default_data_type(&self, version: VCardVersion) -> Option<ValueDataType> {
            RatingScribe.default_data_type(version)
        }

        fn decode(
            &self,
            value: &str,
            data_type: Option<&ValueDataType>,
            parameters: &mut Parameters,
            ctx: &mut ParseContext<'_>,
        ) -> Result<PropertyValue, ScribeError> {
            RatingScribe.decode(value, data_type, parameters, ctx)
        }

        fn encode(&self, property: &Property, version: VCardVersion) -> Result<String, ScribeError> {
            RatingScribe.encode(property, version)
        }
    }

    fn decode(
        registry: &ScribeRegistry,
        name: &str,
        value: &str,
        parameters: Parameters,
    ) -> (Property, Vec<ParseWarning>) {
        let mut warnings = Vec::new();
        let mut ctx = ParseContext::new(VCardVersion::V4_0, 7, name, &mut warnings);
        let property = registry.decode(None, value, parameters, &mut ctx);
        (property, warnings)
    }

    #[test]
    fn seeded_with_every_builtin_kind() {
        let registry = ScribeRegistry::new();
        for kind in PropertyKind::BUILTIN {
            let scribe = registry.by_kind(kind).unwrap();
            assert_eq!(scribe.kind(), kind);
            assert_eq!(registry.by_name(&kind.wire_name().to_lowercase()).unwrap().kind(), kind);
        }
    }

    #[test_log::test]
    fn unknown_names_fall_back_to_raw() {
        let registry = ScribeRegistry::new();
        let mut params = Parameters::new();
        params.put("VALUE", "integer");
        params.put("X-FLAG", "on");

        let (property, warnings) = decode(&registry, "X-SCORE", "42", params);

        assert!(warnings.is_empty());
        assert_eq!(property.kind(), PropertyKind::Raw);
        assert_eq!(property.name(), "X-SCORE");
        let raw = property.value().as_raw().unwrap();
        assert_eq!(raw.value, "42");
        assert_eq!(raw.data_type, Some(ValueDataType::Integer));
        assert!(property.parameters().value_type().is_none());
        assert_eq!(property.parameters().first("X-FLAG"), Some("on"));
    }

    #[test_log::test]
    fn rejected_values_are_kept_raw_with_a_warning() {
        let registry = ScribeRegistry::new();
        let (property, warnings) = decode(&registry, "BDAY", "sometime", Parameters::new());

        assert_eq!(property.kind(), PropertyKind::Raw);
        assert_eq!(property.name(), "BDAY");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line, 7);
        assert_eq!(warnings[0].property.as_deref(), Some("BDAY"));
    }

    #[test]
    fn decoded_properties_drop_value() {
        let registry = ScribeRegistry::new();
        let mut params = Parameters::new();
        params.put("VALUE", "text");
        let (property, _) = decode(&registry, "bday", "circa 1800", params);

        assert_eq!(property.kind(), PropertyKind::Birthday);
        assert_eq!(
            *property.value(),
            PropertyValue::DateAndOrTime(DateAndOrTime::text("circa 1800"))
        );
        assert!(property.parameters().value_type().is_none());
    }

    #[test]
    fn value_is_written_only_when_it_differs_from_the_default() {
        let registry = ScribeRegistry::new();
        let card = VCard::new();

        let text_bday = Property::birthday(DateAndOrTime::text("circa 1800"));
        let encoded = registry
            .encode(&text_bday, VCardVersion::V4_0, &card, false)
            .unwrap()
            .unwrap();
        assert_eq!(encoded.parameters.value_type(), Some(ValueDataType::Text));

        let tel = Property::telephone(Telephone::Text("555-1234".into()));
        let encoded = registry
            .encode(&tel, VCardVersion::V4_0, &card, false)
            .unwrap()
            .unwrap();
        assert!(encoded.parameters.value_type().is_none());
        assert_eq!(encoded.name, "TEL");
    }

    #[test]
    fn strict_skips_unsupported_properties() {
        let registry = ScribeRegistry::new();
        let card = VCard::new();
        let mailer = Property::text(PropertyKind::Mailer, "Outlook").unwrap();

        assert!(
            registry
                .encode(&mailer, VCardVersion::V4_0, &card, true)
                .unwrap()
                .is_none()
        );
        let encoded = registry
            .encode(&mailer, VCardVersion::V4_0, &card, false)
            .unwrap()
            .unwrap();
        assert_eq!(encoded.value, "Outlook");
    }

    #[test]
    fn custom_scribes_round_trip() {
        let registry = ScribeRegistry::new();
        assert!(registry.register(RatingScribe).is_none());

        let (property, warnings) = decode(&registry, "x-rating", "4", Parameters::new());
        assert!(warnings.is_empty());
        assert_eq!(property.kind(), PropertyKind::Custom("X-RATING"));
        assert_eq!(property.value().as_custom::<Rating>(), Some(&Rating(4)));

        let encoded = registry
            .encode(&property, VCardVersion::V3_0, &VCard::new(), true)
            .unwrap()
            .unwrap();
        assert_eq!(encoded.name, "X-RATING");
        assert_eq!(encoded.value, "4");
        assert!(encoded.parameters.value_type().is_none());
    }

    #[test]
    fn unregistered_kinds_decode_raw_and_cannot_be_encoded() {
        let registry = ScribeRegistry::new();
        assert!(registry.unregister(PropertyKind::Note).is_some());
        assert!(registry.by_name("NOTE").is_none());

        let (property, _) = decode(&registry, "NOTE", "hello", Parameters::new());
        assert_eq!(property.kind(), PropertyKind::Raw);

        let note = Property::note("hello");
        assert!(matches!(
            registry.encode(&note, VCardVersion::V4_0, &VCard::new(), false),
            Err(ScribeError::NoScribe(name)) if name == "NOTE"
        ));
    }

    #[test]
    fn unregister_keeps_a_wire_name_claimed_by_another_kind() {
        let registry = ScribeRegistry::new();
        registry.register(RatingScribe);
        registry.register(STARS);
        assert_eq!(
            registry.by_name("X-RATING").unwrap().kind(),
            PropertyKind::Custom("X-STARS")
        );

        assert!(registry.unregister(PropertyKind::Custom("X-RATING")).is_some());
        assert_eq!(
            registry.by_name("x-rating").unwrap().kind(),
            PropertyKind::Custom("X-STARS")
        );

        assert!(registry.unregister(PropertyKind::Custom("X-STARS")).is_some());
        assert!(registry.by_name("X-RATING").is_none());
    }

    #[test]
    fn replacing_a_scribe_keeps_a_wire_name_claimed_by_another_kind() {
        let registry = ScribeRegistry::new();
        registry.register(RatingScribe);
        registry.register(STARS);

        let renamed = AliasScribe {
            kind: PropertyKind::Custom("X-RATING"),
            name: "X-SCORE",
        };
        assert!(registry.register(renamed).is_some());
        assert_eq!(
            registry.by_name("X-RATING").unwrap().kind(),
            PropertyKind::Custom("X-STARS")
        );
        assert_eq!(
            registry.by_name("X-SCORE").unwrap().kind(),
            PropertyKind::Custom("X-RATING")
        );
    }
}
