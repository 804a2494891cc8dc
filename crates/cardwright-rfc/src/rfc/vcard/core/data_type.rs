//! VALUE and ENCODING parameter values.

use std::fmt;

use super::version::SupportedVersions;

/// A value data type (VALUE parameter).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueDataType {
    Binary,
    Boolean,
    ContentId,
    Date,
    DateTime,
    DateAndOrTime,
    Float,
    Integer,
    LanguageTag,
    Text,
    Time,
    Timestamp,
    Uri,
    Url,
    UtcOffset,
    /// Extension or unknown data type (preserved as written).
    Other(String),
}

impl ValueDataType {
    /// Parses a data type name (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "binary" => Self::Binary,
            "boolean" => Self::Boolean,
            "content-id" | "cid" => Self::ContentId,
            "date" => Self::Date,
            "date-time" => Self::DateTime,
            "date-and-or-time" => Self::DateAndOrTime,
            "float" => Self::Float,
            "integer" => Self::Integer,
            "language-tag" => Self::LanguageTag,
            "text" => Self::Text,
            "time" => Self::Time,
            "timestamp" => Self::Timestamp,
            "uri" => Self::Uri,
            "url" => Self::Url,
            "utc-offset" => Self::UtcOffset,
            _ => Self::Other(s.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Binary => "binary",
            Self::Boolean => "boolean",
            Self::ContentId => "content-id",
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::DateAndOrTime => "date-and-or-time",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::LanguageTag => "language-tag",
            Self::Text => "text",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::Uri => "uri",
            Self::Url => "url",
            Self::UtcOffset => "utc-offset",
            Self::Other(s) => s,
        }
    }

    /// Versions that define this data type.
    #[must_use]
    pub fn supported_versions(&self) -> SupportedVersions {
        match self {
            Self::ContentId | Self::Url => SupportedVersions::V2_1,
            Self::Binary => SupportedVersions::V3_0,
            Self::DateAndOrTime | Self::LanguageTag | Self::Timestamp => SupportedVersions::V4_0,
            Self::Boolean
            | Self::Date
            | Self::DateTime
            | Self::Float
            | Self::Integer
            | Self::Time
            | Self::Uri
            | Self::UtcOffset => SupportedVersions::V3_0_AND_4_0,
            Self::Text | Self::Other(_) => SupportedVersions::ALL,
        }
    }
}

impl fmt::Display for ValueDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value encoding (ENCODING parameter).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Encoding {
    QuotedPrintable,
    Base64,
    EightBit,
    SevenBit,
    /// Base64 as spelled by vCard 3.0.
    B,
    Other(String),
}

impl Encoding {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "quoted-printable" => Self::QuotedPrintable,
            "base64" => Self::Base64,
            "8bit" => Self::EightBit,
            "7bit" => Self::SevenBit,
            "b" => Self::B,
            _ => Self::Other(s.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::QuotedPrintable => "QUOTED-PRINTABLE",
            Self::Base64 => "BASE64",
            Self::EightBit => "8BIT",
            Self::SevenBit => "7BIT",
            Self::B => "b",
            Self::Other(s) => s,
        }
    }

    #[must_use]
    pub fn supported_versions(&self) -> SupportedVersions {
        match self {
            Self::QuotedPrintable | Self::Base64 | Self::EightBit | Self::SevenBit => {
                SupportedVersions::V2_1
            }
            Self::B => SupportedVersions::V3_0,
            Self::Other(_) => SupportedVersions::ALL,
        }
    }

    /// Returns whether this encoding carries base64 data.
    #[must_use]
    pub fn is_base64(&self) -> bool {
        matches!(self, Self::Base64 | Self::B)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::core::VCardVersion;

    #[test]
    fn data_type_parse_is_case_insensitive() {
        assert_eq!(ValueDataType::parse("URI"), ValueDataType::Uri);
        assert_eq!(ValueDataType::parse("cid"), ValueDataType::ContentId);
        assert_eq!(
            ValueDataType::parse("x-custom"),
            ValueDataType::Other("x-custom".to_string())
        );
    }

    #[test]
    fn data_type_versions() {
        assert!(!ValueDataType::DateAndOrTime.supported_versions().contains(VCardVersion::V3_0));
        assert!(ValueDataType::Url.supported_versions().contains(VCardVersion::V2_1));
        assert!(!ValueDataType::Uri.supported_versions().contains(VCardVersion::V2_1));
    }

    #[test]
    fn encoding_versions() {
        assert!(Encoding::parse("b").supported_versions().contains(VCardVersion::V3_0));
        assert!(!Encoding::parse("BASE64").supported_versions().contains(VCardVersion::V3_0));
        assert!(!Encoding::parse("quoted-printable").is_base64());
    }
}
