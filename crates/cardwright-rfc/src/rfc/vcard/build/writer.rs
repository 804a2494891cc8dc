//! vCard text writer.

use std::sync::Arc;

use cardwright_core::config::WriterConfig;

use super::escape::{encode_quoted_printable, escape_param_value, escape_text};
use super::fold::{fold_line, fold_quoted_printable};
use crate::error::{RfcError, RfcResult};
use crate::rfc::vcard::core::{
    Agent, Encoding, Parameters, Property, PropertyKind, PropertyValue, SyntaxStyle, VCard,
    VCardVersion, param_names as names,
};
use crate::rfc::vcard::scribe::{EncodedProperty, ScribeRegistry, prepare_standard_parameters};

const PRODUCT_ID: &str = concat!("-//cardwright//cardwright ", env!("CARGO_PKG_VERSION"), "//EN");

/// Writes vCards in the text encoding.
///
/// By default each vCard is written in its own version, properties the
/// version does not support are skipped, a PRODID is generated, lines are
/// folded at 75 octets and parameter values use RFC 6868 caret encoding.
#[derive(Debug, Clone)]
pub struct VCardWriter {
    registry: Arc<ScribeRegistry>,
    version: Option<VCardVersion>,
    strict: bool,
    product_id: bool,
    fold_lines: bool,
    caret_encoding: bool,
}

impl Default for VCardWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl VCardWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ScribeRegistry::new()),
            version: None,
            strict: true,
            product_id: true,
            fold_lines: true,
            caret_encoding: true,
        }
    }

    /// Creates a writer from configuration.
    ///
    /// ## Errors
    /// Returns [`RfcError::UnsupportedVersion`] if the configured target
    /// version is not 2.1, 3.0 or 4.0.
    pub fn from_config(config: &WriterConfig) -> RfcResult<Self> {
        let version = config
            .version
            .as_deref()
            .map(|v| {
                VCardVersion::parse(v).ok_or_else(|| RfcError::UnsupportedVersion(v.to_string()))
            })
            .transpose()?;

        Ok(Self::new()
            .with_version(version)
            .with_strict(config.strict)
            .with_product_id(config.product_id)
            .with_fold_lines(config.fold_lines)
            .with_caret_encoding(config.caret_encoding))
    }

    #[must_use]
    pub fn with_registry(mut self, registry: Arc<ScribeRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Target version; `None` writes each vCard in its own version.
    #[must_use]
    pub fn with_version(mut self, version: Option<VCardVersion>) -> Self {
        self.version = version;
        self
    }

    /// Skip properties the target version does not support.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Generate a PRODID (X-PRODID in 2.1), replacing any the vCard has.
    #[must_use]
    pub fn with_product_id(mut self, enabled: bool) -> Self {
        self.product_id = enabled;
        self
    }

    #[must_use]
    pub fn with_fold_lines(mut self, enabled: bool) -> Self {
        self.fold_lines = enabled;
        self
    }

    #[must_use]
    pub fn with_caret_encoding(mut self, enabled: bool) -> Self {
        self.caret_encoding = enabled;
        self
    }

    /// Writes one vCard.
    ///
    /// ## Errors
    /// Returns an error if a property has no scribe or its value cannot be
    /// written in the target version.
    #[tracing::instrument(skip(self, card), fields(count = card.len()))]
    pub fn write(&self, card: &VCard) -> RfcResult<String> {
        let mut output = String::new();
        let version = self.version.unwrap_or_else(|| card.version());
        self.write_vcard(card, version, false, &mut output)?;

        tracing::debug!(%version, bytes = output.len(), "Wrote vCard");

        Ok(output)
    }

    /// Writes several vCards one after another.
    ///
    /// ## Errors
    /// Returns the first error of [`Self::write`].
    pub fn write_all(&self, cards: &[VCard]) -> RfcResult<String> {
        let mut output = String::new();
        for card in cards {
            output.push_str(&self.write(card)?);
        }
        Ok(output)
    }

    fn write_vcard(
        &self,
        card: &VCard,
        version: VCardVersion,
        nested: bool,
        output: &mut String,
    ) -> RfcResult<()> {
        output.push_str("BEGIN:VCARD\r\n");
        output.push_str("VERSION:");
        output.push_str(version.as_str());
        output.push_str("\r\n");

        let generate_product_id = self.product_id && !nested;
        if generate_product_id {
            let name = match version {
                VCardVersion::V2_1 => "X-PRODID",
                VCardVersion::V3_0 | VCardVersion::V4_0 => PropertyKind::ProductId.wire_name(),
            };
            self.write_line(
                EncodedProperty {
                    group: None,
                    name: name.to_string(),
                    parameters: Parameters::new(),
                    value: PRODUCT_ID.to_string(),
                },
                version,
                output,
            );
        }

        for property in card {
            if generate_product_id && is_product_id(property) {
                continue;
            }
            self.write_property(card, property, version, output)?;
        }

        output.push_str("END:VCARD\r\n");
        Ok(())
    }

    fn write_property(
        &self,
        card: &VCard,
        property: &Property,
        version: VCardVersion,
        output: &mut String,
    ) -> RfcResult<()> {
        if let PropertyValue::Agent(Agent::VCard(nested)) = property.value() {
            return self.write_agent(card, property, nested, version, output);
        }

        let Some(mut encoded) = self
            .registry
            .encode(property, version, card, self.strict)?
        else {
            return Ok(());
        };

        // Before 4.0 the delivery label is a property of its own.
        let label = if property.kind() == PropertyKind::Address && version != VCardVersion::V4_0 {
            encoded.parameters.remove_all(names::LABEL).into_iter().next()
        } else {
            None
        };
        let group = encoded.group.clone();
        let types = encoded.parameters.types().to_vec();

        self.write_line(encoded, version, output);

        if let Some(label) = label {
            let mut parameters = Parameters::new();
            parameters.put_all(names::TYPE, types);
            self.write_line(
                EncodedProperty {
                    group,
                    name: PropertyKind::Label.wire_name().to_string(),
                    parameters,
                    value: escape_text(&label, version.syntax_style()),
                },
                version,
                output,
            );
        }

        Ok(())
    }

    /// Embedded AGENT vCards follow the property line as a block in 2.1 and
    /// are written as one escaped text value otherwise.
    fn write_agent(
        &self,
        card: &VCard,
        property: &Property,
        nested: &VCard,
        version: VCardVersion,
        output: &mut String,
    ) -> RfcResult<()> {
        if self.strict && !property.is_supported_by(version) {
            tracing::debug!(%version, "Skipping AGENT unsupported by target version");
            return Ok(());
        }

        let mut parameters = prepare_standard_parameters(property, version, card);
        parameters.set_value_type(None);
        let group = property.group().map(String::from);
        let name = PropertyKind::Agent.wire_name().to_string();

        match version {
            VCardVersion::V2_1 => {
                self.write_line(
                    EncodedProperty {
                        group,
                        name,
                        parameters,
                        value: String::new(),
                    },
                    version,
                    output,
                );
                self.write_vcard(nested, version, true, output)
            }
            VCardVersion::V3_0 | VCardVersion::V4_0 => {
                let inline = Self {
                    fold_lines: false,
                    ..self.clone()
                };
                let mut text = String::new();
                inline.write_vcard(nested, version, true, &mut text)?;

                self.write_line(
                    EncodedProperty {
                        group,
                        name,
                        parameters,
                        value: escape_text(text.trim_end(), SyntaxStyle::New),
                    },
                    version,
                    output,
                );
                Ok(())
            }
        }
    }

    fn write_line(&self, encoded: EncodedProperty, version: VCardVersion, output: &mut String) {
        let EncodedProperty {
            group,
            name,
            mut parameters,
            mut value,
        } = encoded;

        // 2.1 has no newline escape.
        let quoted_printable = version == VCardVersion::V2_1
            && (value.contains('\n') || parameters.encoding() == Some(Encoding::QuotedPrintable));
        if quoted_printable {
            value = encode_quoted_printable(&value);
            parameters.set_encoding(Some(&Encoding::QuotedPrintable));
            if parameters.charset().is_none() {
                parameters.set_charset(Some("UTF-8"));
            }
        }

        let mut line = String::new();
        if let Some(group) = group {
            line.push_str(&group);
            line.push('.');
        }
        line.push_str(&name);
        self.write_parameters(&parameters, version.syntax_style(), &mut line);
        line.push(':');
        line.push_str(&value);

        let line = match (self.fold_lines, quoted_printable) {
            (false, _) => line,
            (true, true) => fold_quoted_printable(&line),
            (true, false) => fold_line(&line),
        };
        output.push_str(&line);
        output.push_str("\r\n");
    }

    fn write_parameters(&self, parameters: &Parameters, style: SyntaxStyle, line: &mut String) {
        for parameter in parameters {
            match style {
                // One parameter per value; TYPE values go nameless.
                SyntaxStyle::Old => {
                    for value in &parameter.values {
                        line.push(';');
                        if !parameter.name.eq_ignore_ascii_case(names::TYPE) {
                            line.push_str(&parameter.name);
                            line.push('=');
                        }
                        let (escaped, _) = escape_param_value(value, style, self.caret_encoding);
                        line.push_str(&escaped);
                    }
                }
                SyntaxStyle::New => {
                    line.push(';');
                    line.push_str(&parameter.name);
                    if parameter.values.is_empty() {
                        continue;
                    }
                    line.push('=');

                    for (i, value) in parameter.values.iter().enumerate() {
                        if i > 0 {
                            line.push(',');
                        }

                        let (escaped, needs_quotes) =
                            escape_param_value(value, style, self.caret_encoding);

                        if needs_quotes {
                            line.push('"');
                            line.push_str(&escaped);
                            line.push('"');
                        } else {
                            line.push_str(&escaped);
                        }
                    }
                }
            }
        }
    }
}

fn is_product_id(property: &Property) -> bool {
    property.kind() == PropertyKind::ProductId
        || (property.kind() == PropertyKind::Raw && property.name().eq_ignore_ascii_case("X-PRODID"))
}

/// Serializes vCards with the default [`VCardWriter`].
///
/// ## Errors
/// Returns an error if a property cannot be written in its vCard's version.
pub fn serialize(cards: &[VCard]) -> RfcResult<String> {
    VCardWriter::new().write_all(cards)
}

/// Serializes a single vCard with the default [`VCardWriter`].
///
/// ## Errors
/// Returns an error if a property cannot be written in the vCard's version.
pub fn serialize_single(card: &VCard) -> RfcResult<String> {
    VCardWriter::new().write(card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::core::{
        Address, DateAndOrTime, Parameterized, StructuredName, Telephone, types,
    };
    use crate::rfc::vcard::parse::VCardReader;

    fn writer() -> VCardWriter {
        VCardWriter::new().with_product_id(false)
    }

    fn lines(output: &str) -> Vec<&str> {
        output.split("\r\n").filter(|l| !l.is_empty()).collect()
    }

    fn card(version: VCardVersion) -> VCard {
        let mut card = VCard::with_version(version);
        card.add_property(Property::formatted_name("John Doe"));
        card.add_property(Property::structured_name(StructuredName::simple("Doe", "John")));
        card
    }

    #[test]
    fn writes_a_basic_card() {
        let output = writer().write(&card(VCardVersion::V4_0)).unwrap();
        assert_eq!(
            output,
            "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:John Doe\r\nN:Doe;John;;;\r\nEND:VCARD\r\n"
        );
    }

    #[test]
    fn parameter_styles() {
        let tel = Property::telephone(Telephone::Text("555-1234".into()))
            .with_parameter("TYPE", "home")
            .with_parameter("TYPE", "voice");

        let mut old = card(VCardVersion::V2_1);
        old.add_property(tel.clone());
        let output = writer().write(&old).unwrap();
        assert!(lines(&output).contains(&"TEL;home;voice:555-1234"));

        let mut new = card(VCardVersion::V3_0);
        new.add_property(tel);
        let output = writer().write(&new).unwrap();
        assert!(lines(&output).contains(&"TEL;TYPE=home,voice:555-1234"));
    }

    #[test]
    fn values_needing_quotes() {
        let mut card = card(VCardVersion::V4_0);
        card.add_property(
            Property::email("john@example.com").with_parameter("X-NOTE", "a:b"),
        );
        let output = writer().write(&card).unwrap();
        assert!(lines(&output).contains(&"EMAIL;X-NOTE=\"a:b\":john@example.com"));
    }

    #[test]
    fn pref_becomes_type_before_4_0() {
        let mut card = card(VCardVersion::V3_0);
        card.add_property(Property::email("second@example.com").with_parameter("PREF", "2"));
        card.add_property(Property::email("first@example.com").with_parameter("PREF", "1"));

        let output = writer().write(&card).unwrap();
        let written = lines(&output);
        assert!(written.contains(&"EMAIL:second@example.com"));
        assert!(written.contains(&"EMAIL;TYPE=pref:first@example.com"));

        let output = writer()
            .with_version(Some(VCardVersion::V4_0))
            .write(&card)
            .unwrap();
        assert!(lines(&output).contains(&"EMAIL;PREF=1:first@example.com"));
    }

    #[test]
    fn type_pref_becomes_pref_in_4_0() {
        let mut card = card(VCardVersion::V4_0);
        card.add_property(Property::email("a@example.com").with_parameter("TYPE", types::PREF));
        let output = writer().write(&card).unwrap();
        assert!(lines(&output).contains(&"EMAIL;PREF=1:a@example.com"));
    }

    #[test]
    fn value_parameter_only_when_not_default() {
        let mut card = card(VCardVersion::V4_0);
        card.add_property(Property::birthday(DateAndOrTime::text("circa 1800")));
        card.add_property(Property::anniversary(DateAndOrTime::full_date(2000, 6, 1).unwrap()));

        let output = writer().write(&card).unwrap();
        let written = lines(&output);
        assert!(written.contains(&"BDAY;VALUE=text:circa 1800"));
        assert!(written.contains(&"ANNIVERSARY:20000601"));
    }

    #[test]
    fn address_labels_before_4_0() {
        let mut address = Property::address(Address::from_components(vec![
            vec![],
            vec![],
            vec!["1 Main St".into()],
            vec!["Town".into()],
        ]))
        .with_parameter("TYPE", "home");
        address.parameters_mut().set_label(Some("1 Main St\nTown"));

        let mut card = card(VCardVersion::V3_0);
        card.add_property(address);

        let output = writer().write(&card).unwrap();
        let written = lines(&output);
        assert!(written.contains(&"ADR;TYPE=home:;;1 Main St;Town;;;"));
        assert!(written.contains(&"LABEL;TYPE=home:1 Main St\\nTown"));

        let output = writer()
            .with_version(Some(VCardVersion::V4_0))
            .write(&card)
            .unwrap();
        assert!(lines(&output).contains(&"ADR;TYPE=home;LABEL=1 Main St^nTown:;;1 Main St;Town;;;"));
    }

    #[test]
    fn quoted_printable_in_2_1() {
        let mut card = card(VCardVersion::V2_1);
        card.add_property(Property::note("line1\nline2"));

        let output = writer().write(&card).unwrap();
        assert!(lines(&output).contains(
            &"NOTE;ENCODING=QUOTED-PRINTABLE;CHARSET=UTF-8:line1=0D=0Aline2"
        ));

        let read = VCardReader::new(&output).read_next().unwrap().unwrap();
        assert_eq!(read.note(), Some("line1\nline2"));
    }

    #[test]
    fn product_id_generation() {
        let mut source = card(VCardVersion::V3_0);
        source.add_property(Property::text(PropertyKind::ProductId, "-//Other//EN").unwrap());

        let output = VCardWriter::new().write(&source).unwrap();
        let written = lines(&output);
        assert_eq!(written[2], format!("PRODID:{PRODUCT_ID}"));
        assert!(!written.iter().any(|l| l.contains("Other")));

        let output = VCardWriter::new()
            .with_version(Some(VCardVersion::V2_1))
            .write(&source)
            .unwrap();
        assert!(output.contains("\r\nX-PRODID:-//cardwright//cardwright "));
    }

    #[test_log::test]
    fn strict_mode_skips_unsupported_properties() {
        let mut card = card(VCardVersion::V4_0);
        card.add_property(Property::text(PropertyKind::Mailer, "Outlook").unwrap());

        let output = writer().write(&card).unwrap();
        assert!(!output.contains("MAILER"));

        let output = writer().with_strict(false).write(&card).unwrap();
        assert!(output.contains("MAILER:Outlook"));
    }

    #[test]
    fn folding_toggle() {
        let mut card = card(VCardVersion::V4_0);
        card.add_property(Property::note("x".repeat(100)));

        let folded = writer().write(&card).unwrap();
        assert!(folded.split("\r\n").all(|l| l.len() <= 75));

        let unfolded = writer().with_fold_lines(false).write(&card).unwrap();
        assert!(unfolded.contains(&format!("NOTE:{}", "x".repeat(100))));
    }

    #[test]
    fn agent_block_in_2_1() {
        let mut card = card(VCardVersion::V2_1);
        card.add_property(Property::agent(Agent::VCard(Box::new(self::card(
            VCardVersion::V2_1,
        )))));

        let output = VCardWriter::new().write(&card).unwrap();
        let written = lines(&output);
        let agent = written.iter().position(|l| *l == "AGENT:").unwrap();
        assert_eq!(written[agent + 1], "BEGIN:VCARD");
        assert_eq!(written.iter().filter(|l| l.starts_with("X-PRODID")).count(), 1);

        let read = VCardReader::new(&output).read_next().unwrap().unwrap();
        let PropertyValue::Agent(Agent::VCard(nested)) =
            read.property(PropertyKind::Agent).unwrap().value()
        else {
            panic!("expected an embedded vCard");
        };
        assert_eq!(nested.formatted_name(), Some("John Doe"));
    }

    #[test]
    fn agent_inline_in_3_0() {
        let mut card = card(VCardVersion::V3_0);
        card.add_property(Property::agent(Agent::VCard(Box::new(self::card(
            VCardVersion::V3_0,
        )))));

        let output = writer().with_fold_lines(false).write(&card).unwrap();
        assert!(output.contains(
            "AGENT:BEGIN:VCARD\\nVERSION:3.0\\nFN:John Doe\\nN:Doe\\;John\\;\\;\\;\\nEND:VCARD\r\n"
        ));

        let read = VCardReader::new(&output).read_next().unwrap().unwrap();
        assert_eq!(read, card);
    }

    #[test]
    fn writer_from_config() {
        let config = WriterConfig {
            version: Some("2.1".into()),
            strict: false,
            product_id: false,
            fold_lines: false,
            caret_encoding: false,
        };
        let writer = VCardWriter::from_config(&config).unwrap();
        assert_eq!(writer.version, Some(VCardVersion::V2_1));
        assert!(!writer.strict && !writer.product_id && !writer.fold_lines);

        let config = WriterConfig {
            version: Some("1.0".into()),
            ..WriterConfig::default()
        };
        assert!(matches!(
            VCardWriter::from_config(&config),
            Err(RfcError::UnsupportedVersion(v)) if v == "1.0"
        ));
    }

    #[test]
    fn serialize_many() {
        let output = serialize(&[card(VCardVersion::V4_0), card(VCardVersion::V3_0)]).unwrap();
        assert_eq!(output.matches("BEGIN:VCARD").count(), 2);
        assert!(serialize_single(&card(VCardVersion::V4_0)).unwrap().contains("PRODID"));
    }
}
