//! vCard versions and supported-version metadata.

use std::fmt;

/// vCard version.
///
/// Ordering follows declaration order, not the numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum VCardVersion {
    /// vCard 2.1 (the versit specification).
    V2_1,
    /// vCard 3.0 (RFC 2426).
    #[default]
    V3_0,
    /// vCard 4.0 (RFC 6350).
    V4_0,
}

/// The content-line grammar a version uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxStyle {
    /// vCard 2.1 grammar: nameless parameters, permissive names.
    Old,
    /// vCard 3.0 and 4.0 grammar.
    New,
}

impl VCardVersion {
    /// All versions in declaration order.
    pub const ALL: [Self; 3] = [Self::V2_1, Self::V3_0, Self::V4_0];

    /// Parses from version string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "2.1" => Some(Self::V2_1),
            "3.0" => Some(Self::V3_0),
            "4.0" => Some(Self::V4_0),
            _ => None,
        }
    }

    /// Returns the version string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V2_1 => "2.1",
            Self::V3_0 => "3.0",
            Self::V4_0 => "4.0",
        }
    }

    #[must_use]
    pub const fn syntax_style(self) -> SyntaxStyle {
        match self {
            Self::V2_1 => SyntaxStyle::Old,
            Self::V3_0 | Self::V4_0 => SyntaxStyle::New,
        }
    }

    /// Returns the xCard namespace, if the version has one.
    #[must_use]
    pub const fn xml_namespace(self) -> Option<&'static str> {
        match self {
            Self::V4_0 => Some("urn:ietf:params:xml:ns:vcard-4.0"),
            Self::V2_1 | Self::V3_0 => None,
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::V2_1 => 0b001,
            Self::V3_0 => 0b010,
            Self::V4_0 => 0b100,
        }
    }
}

impl fmt::Display for VCardVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for VCardVersion {
    type Err = crate::error::RfcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| crate::error::RfcError::UnsupportedVersion(s.to_string()))
    }
}

/// A set of versions, declared as static metadata on property kinds,
/// parameter names and parameter values.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SupportedVersions(u8);

impl SupportedVersions {
    pub const ALL: Self = Self(0b111);
    pub const V2_1: Self = Self(0b001);
    pub const V3_0: Self = Self(0b010);
    pub const V4_0: Self = Self(0b100);
    pub const V2_1_AND_3_0: Self = Self(0b011);
    pub const V3_0_AND_4_0: Self = Self(0b110);

    /// Builds a set from a list of versions.
    #[must_use]
    pub const fn of(versions: &[VCardVersion]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < versions.len() {
            bits |= versions[i].bit();
            i += 1;
        }
        Self(bits)
    }

    #[must_use]
    pub const fn contains(self, version: VCardVersion) -> bool {
        self.0 & version.bit() != 0
    }

    #[must_use]
    pub const fn is_all(self) -> bool {
        self.0 == Self::ALL.0
    }

    /// Iterates the contained versions in order.
    pub fn iter(self) -> impl Iterator<Item = VCardVersion> {
        VCardVersion::ALL.into_iter().filter(move |v| self.contains(*v))
    }
}

impl Default for SupportedVersions {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Debug for SupportedVersions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for SupportedVersions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, version) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(version.as_str())?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parse() {
        assert_eq!(VCardVersion::parse("2.1"), Some(VCardVersion::V2_1));
        assert_eq!(VCardVersion::parse(" 3.0 "), Some(VCardVersion::V3_0));
        assert_eq!(VCardVersion::parse("4.0"), Some(VCardVersion::V4_0));
        assert_eq!(VCardVersion::parse("5.0"), None);
    }

    #[test]
    fn version_order_is_declaration_order() {
        assert!(VCardVersion::V2_1 < VCardVersion::V3_0);
        assert!(VCardVersion::V3_0 < VCardVersion::V4_0);
        assert_eq!(VCardVersion::default(), VCardVersion::V3_0);
    }

    #[test]
    fn supported_versions_membership() {
        let set = SupportedVersions::of(&[VCardVersion::V2_1, VCardVersion::V4_0]);
        assert!(set.contains(VCardVersion::V2_1));
        assert!(!set.contains(VCardVersion::V3_0));
        assert!(set.contains(VCardVersion::V4_0));
        assert_eq!(set.to_string(), "[2.1, 4.0]");
        assert!(SupportedVersions::ALL.is_all());
    }
}
