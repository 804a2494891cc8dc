//! Fallback scribe for extension and unrecognized properties.

use super::{ParseContext, PropertyScribe, ScribeError};
use crate::rfc::vcard::core::{
    Parameters, Property, PropertyKind, PropertyValue, RawValue, VCardVersion, ValueDataType,
};

/// Keeps values verbatim, along with any explicit VALUE data type.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawScribe;

impl PropertyScribe for RawScribe {
    fn kind(&self) -> PropertyKind {
        PropertyKind::Raw
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<ValueDataType> {
        None
    }

    fn data_type(&self, property: &Property, _version: VCardVersion) -> Option<ValueDataType> {
        property.value().as_raw().and_then(|raw| raw.data_type.clone())
    }

    fn decode(
        &self,
        value: &str,
        data_type: Option<&ValueDataType>,
        _parameters: &mut Parameters,
        ctx: &mut ParseContext<'_>,
    ) -> Result<PropertyValue, ScribeError> {
        Ok(PropertyValue::Raw(RawValue {
            name: ctx.name().to_string(),
            value: value.to_string(),
            data_type: data_type.cloned(),
        }))
    }

    fn encode(&self, property: &Property, version: VCardVersion) -> Result<String, ScribeError> {
        property
            .value()
            .as_raw()
            .map(|raw| raw.value.clone())
            .ok_or_else(|| ScribeError::CannotWrite {
                name: property.name().to_string(),
                version,
                reason: "not an extension property".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_value_and_data_type() {
        let mut warnings = Vec::new();
        let mut ctx = ParseContext::new(VCardVersion::V4_0, 1, "X-FOO", &mut warnings);
        let value = RawScribe
            .decode(
                r"a\,b",
                Some(&ValueDataType::Integer),
                &mut Parameters::new(),
                &mut ctx,
            )
            .unwrap();

        let raw = value.as_raw().unwrap();
        assert_eq!(raw.name, "X-FOO");
        assert_eq!(raw.value, r"a\,b");
        assert_eq!(raw.data_type, Some(ValueDataType::Integer));

        let property = Property::from_raw(raw.clone());
        assert_eq!(RawScribe.encode(&property, VCardVersion::V3_0).unwrap(), r"a\,b");
        assert_eq!(
            RawScribe.data_type(&property, VCardVersion::V3_0),
            Some(ValueDataType::Integer)
        );
        assert!(warnings.is_empty());
    }
}
