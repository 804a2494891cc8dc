//! Streaming vCard reader.

use std::collections::BTreeSet;
use std::sync::Arc;

use cardwright_core::config::ReaderConfig;

use super::error::{ParseError, ParseResult};
use super::lexer::{ContentLine, LexOptions, Lines, parse_content_line};
use super::values::{decode_charset, decode_quoted_printable, unescape_text};
use crate::error::{RfcError, RfcResult};
use crate::rfc::vcard::core::{
    Agent, Encoding, Parameterized, Parameters, Property, PropertyKind, VCard, VCardVersion,
};
use crate::rfc::vcard::scribe::{ParseContext, ParseWarning, ScribeRegistry};

const BEGIN_VCARD: &str = "BEGIN:VCARD";

/// Reads vCards one at a time from a text document.
///
/// Structural problems (an unclosed vCard, an unknown VERSION, a line with
/// no value separator) are errors. Problems inside a single property are
/// collected as [`ParseWarning`]s and the property is kept, raw if need be.
#[derive(Debug)]
pub struct VCardReader<'a> {
    lines: Lines<'a>,
    registry: Arc<ScribeRegistry>,
    default_version: VCardVersion,
    caret_decoding: bool,
    warnings: Vec<ParseWarning>,
}

impl<'a> VCardReader<'a> {
    /// Creates a reader with the built-in scribes, assuming vCard 3.0 when
    /// a vCard has no VERSION.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: Lines::new(input),
            registry: Arc::new(ScribeRegistry::new()),
            default_version: VCardVersion::V3_0,
            caret_decoding: true,
            warnings: Vec::new(),
        }
    }

    /// Creates a reader from configuration.
    ///
    /// ## Errors
    /// Returns [`RfcError::UnsupportedVersion`] if the configured default
    /// version is not 2.1, 3.0 or 4.0.
    pub fn from_config(input: &'a str, config: &ReaderConfig) -> RfcResult<Self> {
        let version = VCardVersion::parse(&config.default_version)
            .ok_or_else(|| RfcError::UnsupportedVersion(config.default_version.clone()))?;
        Ok(Self::new(input)
            .with_default_version(version)
            .with_caret_decoding(config.caret_encoding))
    }

    #[must_use]
    pub fn with_registry(mut self, registry: Arc<ScribeRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Version assumed for a vCard without a VERSION property.
    #[must_use]
    pub fn with_default_version(mut self, version: VCardVersion) -> Self {
        self.default_version = version;
        self
    }

    /// Toggles RFC 6868 decoding of parameter values (3.0 and 4.0 only).
    #[must_use]
    pub fn with_caret_decoding(mut self, enabled: bool) -> Self {
        self.caret_decoding = enabled;
        self
    }

    /// Warnings raised while reading the last vCard, or every vCard after
    /// [`Self::read_all`].
    #[must_use]
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Reads the next vCard, or `None` at the end of input.
    ///
    /// Content outside `BEGIN:VCARD`/`END:VCARD` is skipped.
    ///
    /// ## Errors
    /// Returns a [`ParseError`] for structural failures. No partially read
    /// vCard is returned.
    #[tracing::instrument(skip(self), fields(line = self.lines.line()))]
    pub fn read_next(&mut self) -> ParseResult<Option<VCard>> {
        self.warnings.clear();

        while let Some((line_num, line)) = self.lines.next_logical() {
            if line.trim().eq_ignore_ascii_case(BEGIN_VCARD) {
                let card = self.read_body(line_num)?;
                tracing::debug!(
                    version = %card.version(),
                    count = card.len(),
                    warnings = self.warnings.len(),
                    "Read vCard"
                );
                return Ok(Some(card));
            }
            tracing::trace!(line = line_num, "Skipping content outside a vCard");
        }

        Ok(None)
    }

    /// Reads every remaining vCard. [`Self::warnings`] then holds the
    /// warnings of all of them.
    ///
    /// ## Errors
    /// Returns the first structural [`ParseError`].
    pub fn read_all(&mut self) -> ParseResult<Vec<VCard>> {
        let mut cards = Vec::new();
        let mut warnings = Vec::new();

        while let Some(card) = self.read_next()? {
            warnings.append(&mut self.warnings);
            cards.push(card);
        }

        self.warnings = warnings;
        Ok(cards)
    }

    fn lex_options(&self, version: VCardVersion) -> LexOptions {
        LexOptions {
            style: version.syntax_style(),
            caret_decoding: self.caret_decoding,
        }
    }

    fn warn(&mut self, line: usize, property: Option<&str>, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(line, property, %message, "vCard read warning");
        self.warnings.push(ParseWarning {
            line,
            property: property.map(String::from),
            message,
        });
    }

    /// Reads properties up to the matching END, the BEGIN line already
    /// consumed.
    fn read_body(&mut self, begin_line: usize) -> ParseResult<VCard> {
        let mut version = None;
        let mut card = VCard::new();

        loop {
            let Some((line_num, line)) = self.lines.next_logical() else {
                return Err(ParseError::missing_end(begin_line));
            };
            let current = version.unwrap_or(self.default_version);
            let content = parse_content_line(&line, line_num, self.lex_options(current))?;

            if content.is("END") && content.value.trim().eq_ignore_ascii_case("VCARD") {
                break;
            }

            if content.is("BEGIN") && content.value.trim().eq_ignore_ascii_case("VCARD") {
                self.warn(line_num, None, "Nested vCard outside an AGENT property ignored");
                self.read_body(line_num)?;
                continue;
            }

            if content.is("VERSION") {
                let value = content.value.trim();
                version = Some(
                    VCardVersion::parse(value)
                        .ok_or_else(|| ParseError::unsupported_version(line_num, value))?,
                );
                continue;
            }

            let property = if content.is("AGENT") {
                self.read_agent(content, current)?
            } else {
                self.decode_property(content, current)
            };
            card.add_property(property);
        }

        let version = version.unwrap_or_else(|| {
            let assumed = self.default_version;
            self.warn(
                begin_line,
                None,
                format!("No VERSION property; assuming {assumed}"),
            );
            assumed
        });
        card.set_version(version);

        if version != VCardVersion::V4_0 {
            attach_labels(&mut card);
        }

        Ok(card)
    }

    fn decode_property(&mut self, content: ContentLine, version: VCardVersion) -> Property {
        let ContentLine {
            group,
            name,
            mut parameters,
            mut value,
            line,
        } = content;

        if parameters.encoding() == Some(Encoding::QuotedPrintable) {
            value = self.decode_quoted_printable(value, &mut parameters, line, &name);
        }

        let mut ctx = ParseContext::new(version, line, &name, &mut self.warnings);
        self.registry.decode(group, &value, parameters, &mut ctx)
    }

    /// Decodes a quoted-printable value, following soft line breaks onto
    /// the next physical lines.
    fn decode_quoted_printable(
        &mut self,
        mut value: String,
        parameters: &mut Parameters,
        line: usize,
        name: &str,
    ) -> String {
        while value.ends_with('=') {
            value.pop();
            match self.lines.next_raw() {
                Some(next) => value.push_str(next),
                None => break,
            }
        }

        let bytes = decode_quoted_printable(&value);
        let charset = parameters.charset().map(String::from);
        let text = decode_charset(&bytes, charset.as_deref()).unwrap_or_else(|| {
            self.warn(
                line,
                Some(name),
                format!(
                    "Unknown charset {}; decoded as UTF-8",
                    charset.as_deref().unwrap_or_default()
                ),
            );
            String::from_utf8_lossy(&bytes).into_owned()
        });

        parameters.set_encoding(None);
        parameters.set_charset(None);
        text.replace("\r\n", "\n")
    }

    fn next_is_begin(&self) -> bool {
        let mut ahead = self.lines.clone();
        ahead
            .next_logical()
            .is_some_and(|(_, line)| line.trim().eq_ignore_ascii_case(BEGIN_VCARD))
    }

    /// AGENT carries a whole vCard either as a block on the following lines
    /// (2.1) or as an escaped text value (3.0). Anything else is a URL.
    fn read_agent(&mut self, content: ContentLine, version: VCardVersion) -> ParseResult<Property> {
        let value = content.value.trim();
        let inline_begin = value.eq_ignore_ascii_case(BEGIN_VCARD);

        if inline_begin || (value.is_empty() && self.next_is_begin()) {
            if !inline_begin {
                self.lines.next_logical();
            }
            let nested = self.read_body(content.line)?;
            return Ok(agent_property(content.group, content.parameters, nested));
        }

        let text = unescape_text(&content.value);
        if text
            .trim_start()
            .get(..BEGIN_VCARD.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(BEGIN_VCARD))
        {
            let mut nested_reader = VCardReader {
                lines: Lines::new(&text),
                registry: Arc::clone(&self.registry),
                default_version: self.default_version,
                caret_decoding: self.caret_decoding,
                warnings: Vec::new(),
            };
            match nested_reader.read_next() {
                Ok(Some(nested)) => {
                    self.warnings.append(&mut nested_reader.warnings);
                    return Ok(agent_property(content.group, content.parameters, nested));
                }
                Ok(None) => {}
                Err(err) => self.warn(
                    content.line,
                    Some(&content.name),
                    format!("Embedded vCard unreadable: {err}"),
                ),
            }
        }

        Ok(self.decode_property(content, version))
    }
}

impl Iterator for VCardReader<'_> {
    type Item = ParseResult<VCard>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}

fn agent_property(group: Option<String>, mut parameters: Parameters, nested: VCard) -> Property {
    parameters.set_value_type(None);
    let mut property = Property::agent(Agent::VCard(Box::new(nested)));
    property.set_group(group);
    *property.parameters_mut() = parameters;
    property
}

fn type_set(parameters: &Parameters) -> BTreeSet<String> {
    parameters
        .types()
        .iter()
        .map(|t| t.to_ascii_lowercase())
        .collect()
}

/// Moves each LABEL property onto the first ADR with the same TYPE values
/// and no label of its own. Unmatched LABELs stay as they are.
fn attach_labels(card: &mut VCard) {
    let labels: Vec<Property> = card
        .properties(PropertyKind::Label)
        .into_iter()
        .cloned()
        .collect();

    for label in labels {
        let Some(text) = label.value().as_text() else {
            continue;
        };
        let types = type_set(label.parameters());
        let Some(address) = card.properties_mut(PropertyKind::Address).find(|adr| {
            adr.parameters().label().is_none() && type_set(adr.parameters()) == types
        }) else {
            continue;
        };

        address.parameters_mut().set_label(Some(text));
        tracing::trace!(label = text, "Attached LABEL to ADR");
        card.remove_property(&label);
    }
}
