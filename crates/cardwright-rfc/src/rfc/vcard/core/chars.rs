//! Character rules for names and parameter values per syntax style.

use super::version::SyntaxStyle;

/// Characters 2.1 forbids in group, property and parameter names.
const OLD_STYLE_NAME_FORBIDDEN: &[char] = &['[', ']', '=', ':', '.', ',', ';'];

/// Returns whether a group, property or parameter name is valid.
///
/// vCard 2.1 allows any printable ASCII except `[]=:.,;` and whitespace;
/// 3.0 and 4.0 allow only letters, digits and `-`.
#[must_use]
pub fn is_valid_name(name: &str, style: SyntaxStyle) -> bool {
    if name.is_empty() {
        return false;
    }

    match style {
        SyntaxStyle::Old => name
            .chars()
            .all(|c| c.is_ascii_graphic() && !OLD_STYLE_NAME_FORBIDDEN.contains(&c)),
        SyntaxStyle::New => name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'),
    }
}

/// Returns whether a parameter value can be written in the syntax style.
///
/// vCard 2.1 values are printable ASCII without `,:;`. In 3.0 and 4.0 any
/// character except ASCII controls is allowed; tabs and newlines are accepted
/// because they can be caret-encoded.
#[must_use]
pub fn is_valid_parameter_value(value: &str, style: SyntaxStyle) -> bool {
    match style {
        SyntaxStyle::Old => value
            .chars()
            .all(|c| (c.is_ascii_graphic() || c == ' ') && !matches!(c, ',' | ':' | ';')),
        SyntaxStyle::New => value
            .chars()
            .all(|c| !c.is_ascii_control() || matches!(c, '\t' | '\r' | '\n')),
    }
}

/// Returns the characters of `value` that the syntax style forbids, deduplicated.
#[must_use]
pub fn invalid_characters(value: &str, style: SyntaxStyle, is_name: bool) -> Vec<char> {
    let mut invalid: Vec<char> = Vec::new();
    for c in value.chars() {
        let mut buf = [0u8; 4];
        let single = c.encode_utf8(&mut buf);
        let ok = if is_name {
            is_valid_name(single, style)
        } else {
            is_valid_parameter_value(single, style)
        };
        if !ok && !invalid.contains(&c) {
            invalid.push(c);
        }
    }
    invalid
}
