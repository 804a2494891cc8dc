//! vCard lexer: line unfolding and content line splitting.
//!
//! Folded lines continue with a single space or tab (RFC 6350 §3.2); the
//! whitespace is removed when unfolding. Bare LF line endings are accepted.

use super::error::{ParseError, ParseErrorKind, ParseResult};
use crate::rfc::vcard::core::{Parameters, SyntaxStyle, param_names as names};

/// Reads logical lines out of a document, tracking line numbers.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Lines<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 0,
        }
    }

    /// Number of the last physical line consumed (1-based).
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    fn take_physical(&mut self) -> Option<&'a str> {
        let rest = self.input.get(self.pos..).filter(|r| !r.is_empty())?;
        let (line, advance) = match rest.find('\n') {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        self.pos += advance;
        self.line += 1;
        Some(line.strip_suffix('\r').unwrap_or(line))
    }

    fn continues(&self) -> bool {
        self.input
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with([' ', '\t']))
    }

    /// Returns the next non-blank logical line and the number of its first
    /// physical line.
    pub fn next_logical(&mut self) -> Option<(usize, String)> {
        loop {
            let first = self.take_physical()?;
            if first.trim().is_empty() {
                continue;
            }
            let number = self.line;
            let mut logical = first.to_string();
            while self.continues() {
                if let Some(next) = self.take_physical() {
                    logical.push_str(next.get(1..).unwrap_or_default());
                }
            }
            return Some((number, logical));
        }
    }

    /// Returns the next physical line verbatim.
    ///
    /// Used for quoted-printable soft line breaks, whose continuation lines
    /// are not indented.
    pub fn next_raw(&mut self) -> Option<&'a str> {
        self.take_physical()
    }
}

/// How parameter values are tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexOptions {
    pub style: SyntaxStyle,
    /// Decode RFC 6868 caret escapes (3.0 and 4.0 only).
    pub caret_decoding: bool,
}

/// A parsed content line before value interpretation.
#[derive(Debug, Clone)]
pub struct ContentLine {
    /// Property group (e.g., "item1" in "item1.TEL").
    pub group: Option<String>,
    /// Property name, as written.
    pub name: String,
    pub parameters: Parameters,
    /// Raw, still-escaped value.
    pub value: String,
    /// Line number of the content line (1-based).
    pub line: usize,
}

impl ContentLine {
    /// Returns whether the name matches, ignoring case.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Parses a single content line into its components.
///
/// Format: `[group.]name[;param[=value]]*:value`
///
/// ## Errors
/// Returns an error if the line has no colon separator or no name.
pub fn parse_content_line(
    line: &str,
    line_num: usize,
    options: LexOptions,
) -> ParseResult<ContentLine> {
    let colon = find_value_separator(line, options.style)
        .ok_or_else(|| ParseError::malformed_line(line_num, line))?;
    let head = &line[..colon];
    let value = &line[colon + 1..];

    let (name_part, params_part) = match head.find(';') {
        Some(i) => (&head[..i], Some(&head[i + 1..])),
        None => (head, None),
    };

    let (group, name) = match name_part.rfind('.') {
        Some(i) => (Some(&name_part[..i]), &name_part[i + 1..]),
        None => (None, name_part),
    };
    let name = name.trim();

    if name.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::InvalidPropertyName,
            line_num,
            format!("missing property name in {line:?}"),
        ));
    }

    let mut parameters = Parameters::new();
    if let Some(params) = params_part {
        parse_parameters(params, options, &mut parameters);
    }

    Ok(ContentLine {
        group: group.filter(|g| !g.is_empty()).map(String::from),
        name: name.to_string(),
        parameters,
        value: value.to_string(),
        line: line_num,
    })
}

/// Finds the colon that separates name/params from value.
///
/// Quoted parameter values may contain colons in the 3.0/4.0 grammar.
fn find_value_separator(line: &str, style: SyntaxStyle) -> Option<usize> {
    let mut in_quotes = false;

    for (i, c) in line.char_indices() {
        match c {
            '"' if style == SyntaxStyle::New => in_quotes = !in_quotes,
            ':' if !in_quotes => return Some(i),
            _ => {}
        }
    }

    None
}

fn split_outside_quotes(s: &str, delimiter: char, style: SyntaxStyle) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (i, c) in s.char_indices() {
        match c {
            '"' if style == SyntaxStyle::New => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    parts.push(&s[start..]);
    parts
}

fn parse_parameters(s: &str, options: LexOptions, parameters: &mut Parameters) {
    for token in split_outside_quotes(s, ';', options.style) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        match token.find('=') {
            Some(eq) => {
                let name = token[..eq].trim();
                for value in parse_param_values(&token[eq + 1..], options) {
                    parameters.put(name, value);
                }
            }
            None => parameters.put(nameless_parameter_name(token), token),
        }
    }
}

/// Names a parameter written without a name (`TEL;HOME;VOICE:`).
///
/// Encoding and data type keywords are recognized; everything else is a
/// TYPE value.
fn nameless_parameter_name(value: &str) -> &'static str {
    match value.to_ascii_uppercase().as_str() {
        "QUOTED-PRINTABLE" | "BASE64" | "8BIT" | "7BIT" => names::ENCODING,
        "INLINE" | "URL" | "CONTENT-ID" | "CID" => names::VALUE,
        _ => names::TYPE,
    }
}

fn parse_param_values(s: &str, options: LexOptions) -> Vec<String> {
    match options.style {
        SyntaxStyle::Old => vec![unquote(s.trim()).to_string()],
        SyntaxStyle::New => split_outside_quotes(s, ',', SyntaxStyle::New)
            .into_iter()
            .map(|v| {
                let v = unquote(v.trim());
                if options.caret_decoding {
                    decode_caret(v)
                } else {
                    v.to_string()
                }
            })
            .collect(),
    }
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
}

/// Decodes RFC 6868 caret escapes: `^n` newline, `^'` quote, `^^` caret.
#[must_use]
pub fn decode_caret(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '^' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('n' | 'N') => {
                chars.next();
                result.push('\n');
            }
            Some('\'') => {
                chars.next();
                result.push('"');
            }
            Some('^') => {
                chars.next();
                result.push('^');
            }
            _ => result.push('^'),
        }
    }

    result
}
