//! Value-level text helpers shared by the scribes and the reader.

use crate::rfc::vcard::core::SyntaxStyle;

/// Unescapes a vCard text value.
///
/// vCard escapes: \n, \N (newline), \, (comma), \; (semicolon), \\ (backslash).
/// Unknown escapes are kept as written.
#[must_use]
pub fn unescape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('n' | 'N') => {
                chars.next();
                result.push('\n');
            }
            Some(&next @ (',' | ';' | '\\' | ':')) => {
                chars.next();
                result.push(next);
            }
            _ => result.push(c),
        }
    }

    result
}

/// Splits on an unescaped delimiter without unescaping the parts.
fn split_unescaped(s: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            c if c == delimiter => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    parts.push(&s[start..]);
    parts
}

/// Splits a structured value on unescaped semicolons.
///
/// The parts are still escaped.
#[must_use]
pub fn split_structured(s: &str) -> Vec<&str> {
    split_unescaped(s, ';')
}

/// Splits a list value on unescaped commas and unescapes each item.
#[must_use]
pub fn split_component(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    split_unescaped(s, ',')
        .into_iter()
        .map(unescape_text)
        .collect()
}

/// Values of one structured component.
///
/// vCard 2.1 has no multi-valued components, so commas stay literal there.
#[must_use]
pub fn component_values(s: &str, style: SyntaxStyle) -> Vec<String> {
    match style {
        SyntaxStyle::New => split_component(s),
        SyntaxStyle::Old if s.is_empty() => Vec::new(),
        SyntaxStyle::Old => vec![unescape_text(s)],
    }
}

/// Decodes `=XX` escapes. Malformed escapes are kept verbatim.
///
/// Soft line breaks must already be joined by the caller.
#[must_use]
pub fn decode_quoted_printable(value: &str) -> Vec<u8> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while let Some(&byte) = bytes.get(i) {
        if byte == b'='
            && let Some(decoded) = bytes.get(i + 1..i + 3).and_then(hex_pair)
        {
            out.push(decoded);
            i += 3;
        } else {
            out.push(byte);
            i += 1;
        }
    }

    out
}

fn hex_pair(pair: &[u8]) -> Option<u8> {
    let digits = std::str::from_utf8(pair).ok()?;
    u8::from_str_radix(digits, 16).ok()
}

/// Decodes bytes in a CHARSET.
///
/// Returns `None` for a charset this library cannot decode; callers fall back
/// to lossy UTF-8.
#[must_use]
pub fn decode_charset(bytes: &[u8], charset: Option<&str>) -> Option<String> {
    let charset = charset.map(str::to_ascii_uppercase);
    match charset.as_deref() {
        None | Some("UTF-8" | "UTF8") => Some(String::from_utf8_lossy(bytes).into_owned()),
        Some("ISO-8859-1" | "LATIN1" | "US-ASCII" | "ASCII") => {
            Some(bytes.iter().copied().map(char::from).collect())
        }
        Some(_) => None,
    }
}
