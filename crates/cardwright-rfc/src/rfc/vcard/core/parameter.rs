//! vCard parameter container (RFC 6350 §5).
//!
//! Parameter names compare case-insensitively but keep the casing they were
//! first written with. A name may carry several values (e.g. `TYPE=home,work`).
//! Typed accessors parse and format over the raw string storage, so raw access
//! always succeeds even when a value cannot be interpreted.

use std::hash::{Hash, Hasher};

use thiserror::Error;

use super::data_type::{Encoding, ValueDataType};
use super::geo::GeoUri;
use super::pid::Pid;

/// Well-known parameter names.
pub mod names {
    pub const ALTID: &str = "ALTID";
    pub const CALSCALE: &str = "CALSCALE";
    pub const CHARSET: &str = "CHARSET";
    pub const ENCODING: &str = "ENCODING";
    pub const GEO: &str = "GEO";
    pub const INDEX: &str = "INDEX";
    pub const LABEL: &str = "LABEL";
    pub const LANGUAGE: &str = "LANGUAGE";
    pub const LEVEL: &str = "LEVEL";
    pub const MEDIATYPE: &str = "MEDIATYPE";
    pub const PID: &str = "PID";
    pub const PREF: &str = "PREF";
    pub const SORT_AS: &str = "SORT-AS";
    pub const TYPE: &str = "TYPE";
    pub const TZ: &str = "TZ";
    pub const VALUE: &str = "VALUE";
}

/// Common TYPE values as constants.
pub mod types {
    pub const HOME: &str = "home";
    pub const WORK: &str = "work";
    pub const PREF: &str = "pref";

    pub const TEXT: &str = "text";
    pub const VOICE: &str = "voice";
    pub const FAX: &str = "fax";
    pub const CELL: &str = "cell";
    pub const VIDEO: &str = "video";
    pub const PAGER: &str = "pager";
    pub const TEXTPHONE: &str = "textphone";

    pub const INTERNET: &str = "internet";
    pub const X400: &str = "x400";

    pub const DOM: &str = "dom";
    pub const INTL: &str = "intl";
    pub const POSTAL: &str = "postal";
    pub const PARCEL: &str = "parcel";
}

/// A typed parameter value that could not be interpreted.
///
/// Carries the raw value so callers can still inspect or repair it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("{name} parameter value {value:?} is malformed: {reason}")]
    Malformed {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl ParameterError {
    fn malformed(name: &'static str, value: &str, reason: &'static str) -> Self {
        Self::Malformed {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Returns the raw value that failed to parse.
    #[must_use]
    pub fn raw_value(&self) -> &str {
        match self {
            Self::Malformed { value, .. } => value,
        }
    }
}

/// A single parameter name with its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name, as first written.
    pub name: String,
    /// Parameter values in order of appearance.
    pub values: Vec<String>,
}

impl Parameter {
    /// Returns the first value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Returns whether the parameter has the specified value (case-insensitive).
    #[must_use]
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v.eq_ignore_ascii_case(value))
    }
}

/// The parameters of one property.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    entries: Vec<Parameter>,
}

impl Parameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Returns all values of a parameter (empty if absent).
    #[must_use]
    pub fn get(&self, name: &str) -> &[String] {
        self.position(name)
            .map_or(&[], |i| self.entries[i].values.as_slice())
    }

    /// Returns the first value of a parameter.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).first().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Appends a value to a parameter, creating it if needed.
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(i) => self.entries[i].values.push(value),
            None => self.entries.push(Parameter {
                name,
                values: vec![value],
            }),
        }
    }

    /// Appends several values to a parameter.
    pub fn put_all<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        for value in values {
            self.put(name.clone(), value);
        }
    }

    /// Replaces every value of a parameter with `value`, or removes the
    /// parameter when `value` is `None`. Returns the previous values.
    pub fn replace(&mut self, name: &str, value: Option<&str>) -> Vec<String> {
        match (self.position(name), value) {
            (Some(i), Some(value)) => {
                std::mem::replace(&mut self.entries[i].values, vec![value.to_string()])
            }
            (Some(i), None) => self.entries.remove(i).values,
            (None, Some(value)) => {
                self.entries.push(Parameter {
                    name: name.to_string(),
                    values: vec![value.to_string()],
                });
                Vec::new()
            }
            (None, None) => Vec::new(),
        }
    }

    /// Replaces every value of a parameter with `values`. An empty list
    /// removes the parameter. Returns the previous values.
    pub fn replace_all<I, S>(&mut self, name: &str, values: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        match (self.position(name), values.is_empty()) {
            (Some(i), true) => self.entries.remove(i).values,
            (Some(i), false) => std::mem::replace(&mut self.entries[i].values, values),
            (None, true) => Vec::new(),
            (None, false) => {
                self.entries.push(Parameter {
                    name: name.to_string(),
                    values,
                });
                Vec::new()
            }
        }
    }

    /// Removes a parameter entirely, returning its values.
    pub fn remove_all(&mut self, name: &str) -> Vec<String> {
        self.position(name)
            .map(|i| self.entries.remove(i).values)
            .unwrap_or_default()
    }

    /// Removes the first matching value (case-insensitive). Returns whether a
    /// value was removed.
    pub fn remove(&mut self, name: &str, value: &str) -> bool {
        let Some(i) = self.position(name) else {
            return false;
        };

        let values = &mut self.entries[i].values;
        let Some(j) = values.iter().position(|v| v.eq_ignore_ascii_case(value)) else {
            return false;
        };
        values.remove(j);

        if values.is_empty() {
            self.entries.remove(i);
        }
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns whether there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of distinct parameter names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates parameters in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.entries.iter()
    }

    /// Returns a mutable list view over the values of one parameter.
    pub fn list_mut(&mut self, name: &str) -> ParameterListMut<'_> {
        ParameterListMut {
            params: self,
            name: name.to_string(),
        }
    }

    fn normalized(&self) -> Vec<(String, Vec<String>)> {
        let mut normalized: Vec<(String, Vec<String>)> = self
            .entries
            .iter()
            .map(|p| {
                let mut values: Vec<String> =
                    p.values.iter().map(|v| v.to_ascii_lowercase()).collect();
                values.sort();
                (p.name.to_ascii_uppercase(), values)
            })
            .collect();
        normalized.sort();
        normalized
    }
}

/// Equality ignores parameter order and the case of names and values.
impl PartialEq for Parameters {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.normalized() == other.normalized()
    }
}

impl Eq for Parameters {}

impl Hash for Parameters {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A mutable view over the values of one parameter, bound to the container
/// that owns them.
pub struct ParameterListMut<'a> {
    params: &'a mut Parameters,
    name: String,
}

impl ParameterListMut<'_> {
    #[must_use]
    pub fn values(&self) -> &[String] {
        self.params.get(&self.name)
    }

    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.values().iter().any(|v| v.eq_ignore_ascii_case(value))
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.params.put(self.name.clone(), value);
    }

    pub fn remove(&mut self, value: &str) -> bool {
        self.params.remove(&self.name, value)
    }

    pub fn clear(&mut self) {
        self.params.remove_all(&self.name);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

macro_rules! text_parameter {
    ($(#[$doc:meta])* $get:ident, $set:ident, $name:expr) => {
        $(#[$doc])*
        #[must_use]
        pub fn $get(&self) -> Option<&str> {
            self.first($name)
        }

        $(#[$doc])*
        pub fn $set(&mut self, value: Option<&str>) {
            self.replace($name, value);
        }
    };
}

// --- Typed accessors ---
impl Parameters {
    text_parameter!(
        /// ALTID: marks alternative representations of the same value.
        altid, set_altid, names::ALTID
    );
    text_parameter!(
        /// CALSCALE: calendar system of a date value.
        calscale, set_calscale, names::CALSCALE
    );
    text_parameter!(
        /// CHARSET: character set of a 2.1 value.
        charset, set_charset, names::CHARSET
    );
    text_parameter!(
        /// LABEL: formatted delivery label of an address.
        label, set_label, names::LABEL
    );
    text_parameter!(
        /// LANGUAGE: language tag of the value.
        language, set_language, names::LANGUAGE
    );
    text_parameter!(
        /// LEVEL: skill or interest level (RFC 6715).
        level, set_level, names::LEVEL
    );
    text_parameter!(
        /// MEDIATYPE: media type of a URI value.
        media_type, set_media_type, names::MEDIATYPE
    );
    text_parameter!(
        /// TZ: time zone of an address.
        tz, set_tz, names::TZ
    );

    /// PREF: preference between 1 (most preferred) and 100.
    ///
    /// ## Errors
    /// Returns the raw value if it is not an integer in `1..=100`.
    pub fn pref(&self) -> Result<Option<u8>, ParameterError> {
        let Some(raw) = self.first(names::PREF) else {
            return Ok(None);
        };

        match raw.parse::<u8>() {
            Ok(pref) if (1..=100).contains(&pref) => Ok(Some(pref)),
            Ok(_) => Err(ParameterError::malformed(
                names::PREF,
                raw,
                "must be between 1 and 100",
            )),
            Err(_) => Err(ParameterError::malformed(
                names::PREF,
                raw,
                "not an integer",
            )),
        }
    }

    pub fn set_pref(&mut self, pref: Option<u8>) {
        let value = pref.map(|p| p.to_string());
        self.replace(names::PREF, value.as_deref());
    }

    /// INDEX: position of a multi-valued property (RFC 6715).
    ///
    /// ## Errors
    /// Returns the raw value if it is not a positive integer.
    pub fn index(&self) -> Result<Option<u32>, ParameterError> {
        let Some(raw) = self.first(names::INDEX) else {
            return Ok(None);
        };

        match raw.parse::<u32>() {
            Ok(index) if index > 0 => Ok(Some(index)),
            _ => Err(ParameterError::malformed(
                names::INDEX,
                raw,
                "not a positive integer",
            )),
        }
    }

    pub fn set_index(&mut self, index: Option<u32>) {
        let value = index.map(|i| i.to_string());
        self.replace(names::INDEX, value.as_deref());
    }

    /// PID: property identifiers used for synchronization.
    ///
    /// ## Errors
    /// Returns the first raw value that is not of the form `N` or `N.M`.
    pub fn pids(&self) -> Result<Vec<Pid>, ParameterError> {
        self.get(names::PID)
            .iter()
            .map(|raw| {
                raw.parse::<Pid>().map_err(|_err| {
                    ParameterError::malformed(names::PID, raw, "expected N or N.M")
                })
            })
            .collect()
    }

    pub fn add_pid(&mut self, pid: Pid) {
        self.put(names::PID, pid.to_string());
    }

    pub fn remove_pids(&mut self) -> Vec<String> {
        self.remove_all(names::PID)
    }

    /// GEO: position of an address.
    ///
    /// ## Errors
    /// Returns the raw value if it is not a `geo:` URI.
    pub fn geo(&self) -> Result<Option<GeoUri>, ParameterError> {
        let Some(raw) = self.first(names::GEO) else {
            return Ok(None);
        };

        raw.parse::<GeoUri>()
            .map(Some)
            .map_err(|_err| ParameterError::malformed(names::GEO, raw, "not a geo: URI"))
    }

    pub fn set_geo(&mut self, geo: Option<&GeoUri>) {
        let value = geo.map(ToString::to_string);
        self.replace(names::GEO, value.as_deref());
    }

    /// ENCODING: transfer encoding of a 2.1 or 3.0 value.
    #[must_use]
    pub fn encoding(&self) -> Option<Encoding> {
        self.first(names::ENCODING).map(Encoding::parse)
    }

    pub fn set_encoding(&mut self, encoding: Option<&Encoding>) {
        self.replace(names::ENCODING, encoding.map(Encoding::as_str));
    }

    /// VALUE: explicit data type of the value.
    #[must_use]
    pub fn value_type(&self) -> Option<ValueDataType> {
        self.first(names::VALUE).map(ValueDataType::parse)
    }

    pub fn set_value_type(&mut self, data_type: Option<&ValueDataType>) {
        self.replace(names::VALUE, data_type.map(ValueDataType::as_str));
    }

    /// TYPE values.
    #[must_use]
    pub fn types(&self) -> &[String] {
        self.get(names::TYPE)
    }

    /// Returns whether a TYPE value is present (case-insensitive).
    #[must_use]
    pub fn has_type(&self, value: &str) -> bool {
        self.types().iter().any(|t| t.eq_ignore_ascii_case(value))
    }

    pub fn add_type(&mut self, value: impl Into<String>) {
        self.put(names::TYPE, value);
    }

    pub fn remove_type(&mut self, value: &str) -> bool {
        self.remove(names::TYPE, value)
    }

    /// Replaces all TYPE values with a single value (or none).
    pub fn set_type(&mut self, value: Option<&str>) {
        self.replace(names::TYPE, value);
    }

    /// SORT-AS: sort keys of a structured value.
    #[must_use]
    pub fn sort_as(&self) -> &[String] {
        self.get(names::SORT_AS)
    }

    pub fn set_sort_as<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replace_all(names::SORT_AS, values);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn hash_of(params: &Parameters) -> u64 {
        let mut hasher = DefaultHasher::new();
        params.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn names_are_case_insensitive_and_keep_casing() {
        let mut params = Parameters::new();
        params.put("Type", "home");
        params.put("TYPE", "work");

        assert_eq!(params.get("type"), ["home", "work"]);
        assert_eq!(params.iter().next().unwrap().name, "Type");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn replace_leaves_exactly_one_value() {
        let mut params = Parameters::new();
        params.put_all("TYPE", ["a", "b", "c"]);

        let previous = params.replace("type", Some("d"));
        assert_eq!(previous, ["a", "b", "c"]);
        assert_eq!(params.get("TYPE"), ["d"]);

        params.replace("TYPE", None);
        assert!(params.get("TYPE").is_empty());
        assert!(!params.contains("TYPE"));
    }

    #[test]
    fn replace_on_absent_name_inserts() {
        let mut params = Parameters::new();
        assert!(params.replace("LANGUAGE", Some("en")).is_empty());
        assert_eq!(params.first("language"), Some("en"));
    }

    #[test]
    fn remove_single_value() {
        let mut params = Parameters::new();
        params.put_all("TYPE", ["home", "work"]);

        assert!(params.remove("TYPE", "HOME"));
        assert_eq!(params.get("TYPE"), ["work"]);
        assert!(params.remove("TYPE", "work"));
        assert!(params.is_empty());
        assert!(!params.remove("TYPE", "work"));
    }

    #[test]
    fn equality_ignores_order_and_case() {
        let mut a = Parameters::new();
        a.put("TYPE", "home");
        a.put("TYPE", "work");
        a.put("PREF", "1");

        let mut b = Parameters::new();
        b.put("pref", "1");
        b.put("type", "WORK");
        b.put("type", "home");

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        b.put("TYPE", "cell");
        assert_ne!(a, b);
    }

    #[test]
    fn pref_round_trip() {
        let mut params = Parameters::new();
        params.set_pref(Some(42));
        assert_eq!(params.pref(), Ok(Some(42)));

        params.set_pref(None);
        assert_eq!(params.pref(), Ok(None));
    }

    #[test]
    fn malformed_pref_is_retrievable() {
        let mut params = Parameters::new();
        params.put("PREF", "high");

        let err = params.pref().unwrap_err();
        assert_eq!(err.raw_value(), "high");
        assert_eq!(params.first("PREF"), Some("high"));

        params.replace("PREF", Some("101"));
        assert!(params.pref().is_err());
    }

    #[test]
    fn pid_round_trip() {
        let mut params = Parameters::new();
        params.add_pid(Pid::new(1));
        params.add_pid(Pid::with_map_ref(2, 1));

        assert_eq!(
            params.pids().unwrap(),
            vec![Pid::new(1), Pid::with_map_ref(2, 1)]
        );
        assert_eq!(params.get("PID"), ["1", "2.1"]);
    }

    #[test]
    fn malformed_pid_is_reported() {
        let mut params = Parameters::new();
        params.put("PID", "1.x");
        assert!(params.pids().is_err());
        assert_eq!(params.get("PID"), ["1.x"]);
    }

    #[test]
    fn geo_round_trip() {
        let mut params = Parameters::new();
        let geo = GeoUri::new(45.5, -73.25);
        params.set_geo(Some(&geo));
        assert_eq!(params.geo(), Ok(Some(geo)));
    }

    #[test]
    fn type_list_view() {
        let mut params = Parameters::new();
        {
            let mut list = params.list_mut("TYPE");
            list.push("home");
            list.push("voice");
            assert!(list.contains("HOME"));
            assert_eq!(list.len(), 2);
            assert!(list.remove("home"));
        }
        assert_eq!(params.types(), ["voice"]);

        params.list_mut("TYPE").clear();
        assert!(params.types().is_empty());
    }

    #[test]
    fn value_type_and_encoding() {
        let mut params = Parameters::new();
        params.set_value_type(Some(&ValueDataType::Uri));
        params.set_encoding(Some(&Encoding::B));
        assert_eq!(params.value_type(), Some(ValueDataType::Uri));
        assert_eq!(params.encoding(), Some(Encoding::B));
        assert_eq!(params.first("VALUE"), Some("uri"));
    }

    #[test]
    fn sort_as_values() {
        let mut params = Parameters::new();
        params.set_sort_as(["Doe", "John"]);
        assert_eq!(params.sort_as(), ["Doe", "John"]);
        params.set_sort_as(Vec::<String>::new());
        assert!(!params.contains("SORT-AS"));
    }
}
