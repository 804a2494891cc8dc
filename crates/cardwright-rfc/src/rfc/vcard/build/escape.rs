//! vCard text escaping.

use crate::rfc::vcard::core::SyntaxStyle;

/// Escapes a text value for serialization.
///
/// Escapes backslash, comma and semicolon. Newlines become `\n` in the
/// 3.0/4.0 grammar; in 2.1 they stay literal so the writer can switch the
/// value to quoted-printable.
#[must_use]
pub fn escape_text(s: &str, style: SyntaxStyle) -> String {
    let mut result = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            ',' => result.push_str("\\,"),
            ';' => result.push_str("\\;"),
            '\n' if style == SyntaxStyle::New => result.push_str("\\n"),
            '\r' => {}
            _ => result.push(c),
        }
    }

    result
}

/// Escapes each value and joins them with commas.
#[must_use]
pub fn join_escaped(values: &[String], style: SyntaxStyle) -> String {
    values
        .iter()
        .map(|v| escape_text(v, style))
        .collect::<Vec<_>>()
        .join(",")
}

/// Escapes a parameter value.
///
/// With caret encoding (RFC 6868, 3.0/4.0 only) newlines, quotes and carets
/// survive the trip; without it newlines become spaces and double quotes
/// become single quotes. Returns `(value, needs_quotes)`; 2.1 values are
/// never quoted.
#[must_use]
pub fn escape_param_value(s: &str, style: SyntaxStyle, caret_encoding: bool) -> (String, bool) {
    let caret = caret_encoding && style == SyntaxStyle::New;
    let mut result = String::with_capacity(s.len());
    let mut needs_quotes = false;

    for c in s.chars() {
        match c {
            '^' if caret => result.push_str("^^"),
            '\n' if caret => result.push_str("^n"),
            '"' if caret => result.push_str("^'"),
            '\n' => result.push(' '),
            '"' => result.push('\''),
            ':' | ';' | ',' => {
                result.push(c);
                needs_quotes = style == SyntaxStyle::New;
            }
            _ if c.is_control() && c != '\t' => {}
            _ => result.push(c),
        }
    }

    (result, needs_quotes)
}

/// Encodes a value as quoted-printable (vCard 2.1).
///
/// Newlines are written as `=0D=0A`; printable ASCII other than `=` is kept.
#[must_use]
pub fn encode_quoted_printable(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for byte in s.bytes() {
        match byte {
            b'\n' => result.push_str("=0D=0A"),
            b'\r' => {}
            b'=' => result.push_str("=3D"),
            b' ' | b'\t' | 0x21..=0x7E => result.push(char::from(byte)),
            _ => result.push_str(&format!("={byte:02X}")),
        }
    }

    result
}
