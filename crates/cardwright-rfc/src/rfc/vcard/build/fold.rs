//! vCard line folding.

/// Maximum line length in octets (not characters) per RFC 6350.
const MAX_LINE_OCTETS: usize = 75;

/// Folds a line to the maximum length.
///
/// Lines longer than 75 octets are folded by inserting CRLF + space; every
/// physical line, including the leading space, stays within 75 octets.
/// Folds at UTF-8 character boundaries.
#[must_use]
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut current_len = 0;

    for c in line.chars() {
        let char_len = c.len_utf8();

        if current_len + char_len > MAX_LINE_OCTETS {
            result.push_str("\r\n ");
            current_len = 1;
        }

        result.push(c);
        current_len += char_len;
    }

    result
}

/// Folds a quoted-printable line with soft line breaks (`=` CRLF).
///
/// Continuation lines are not indented and `=XX` escapes are never split.
#[must_use]
pub fn fold_quoted_printable(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    // Room for the trailing '=' of a soft break.
    let max = MAX_LINE_OCTETS - 1;
    let mut result = String::with_capacity(line.len() + line.len() / max * 3);
    let mut current_len = 0;
    let mut rest = line;

    while let Some(c) = rest.chars().next() {
        let token_len = if c == '=' {
            rest.get(..3).map_or(c.len_utf8(), str::len)
        } else {
            c.len_utf8()
        };

        if current_len + token_len > max {
            result.push_str("=\r\n");
            current_len = 0;
        }

        let token = &rest[..token_len];
        rest = &rest[token_len..];
        // Leading whitespace would read as a folded continuation.
        let token = match token {
            " " if current_len == 0 => "=20",
            "\t" if current_len == 0 => "=09",
            _ => token,
        };
        result.push_str(token);
        current_len += token.len();
    }

    result
}
