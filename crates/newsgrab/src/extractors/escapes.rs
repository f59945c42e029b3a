// ABOUTME: Backslash escape decoder for string values lifted out of embedded JSON and script blobs.
// ABOUTME: Understands JSON and Python-style escapes and reports malformed sequences as errors.

use std::iter::Peekable;
use std::str::Chars;

/// Why an escaped string could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EscapeError {
    #[error("backslash at end of string")]
    TrailingBackslash,
    #[error("truncated \\{kind} escape")]
    Truncated { kind: char },
    #[error("invalid hex digit {found:?} in \\{kind} escape")]
    InvalidHex { kind: char, found: char },
    #[error("lone surrogate U+{0:04X}")]
    LoneSurrogate(u32),
    #[error("code point U+{0:X} out of range")]
    OutOfRange(u32),
}

/// Decodes backslash escapes into the characters they stand for.
///
/// Supported: `\uXXXX` (surrogate pairs are joined), `\UXXXXXXXX`, `\xHH`,
/// octal `\ooo`, and the single-character escapes `\n \t \r \b \f \v \a \0 \\
/// \' \" \/`. A backslash followed by a newline is a line continuation and is
/// dropped. Any other escape is kept verbatim, backslash included.
pub fn decode_escapes(input: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(kind) = chars.next() else {
            return Err(EscapeError::TrailingBackslash);
        };

        match kind {
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            '/' => out.push('/'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            'a' => out.push('\u{7}'),
            '\n' => {}
            'x' => out.push(code_point(read_hex(&mut chars, 'x', 2)?)?),
            'U' => out.push(code_point(read_hex(&mut chars, 'U', 8)?)?),
            'u' => {
                let high = read_hex(&mut chars, 'u', 4)?;
                out.push(utf16_unit(high, &mut chars)?);
            }
            '0'..='7' => out.push(read_octal(kind, &mut chars)),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

fn read_hex(chars: &mut Peekable<Chars<'_>>, kind: char, digits: usize) -> Result<u32, EscapeError> {
    let mut value = 0u32;
    for _ in 0..digits {
        let c = chars.next().ok_or(EscapeError::Truncated { kind })?;
        let d = c
            .to_digit(16)
            .ok_or(EscapeError::InvalidHex { kind, found: c })?;
        value = value * 16 + d;
    }
    Ok(value)
}

fn read_octal(first: char, chars: &mut Peekable<Chars<'_>>) -> char {
    let mut value = first.to_digit(8).unwrap_or(0);
    for _ in 0..2 {
        match chars.peek().and_then(|c| c.to_digit(8)) {
            Some(d) => {
                value = value * 8 + d;
                chars.next();
            }
            None => break,
        }
    }
    // At most 0o777, always a valid scalar value.
    char::from_u32(value).unwrap_or('\u{FFFD}')
}

/// Resolves a `\u` unit, consuming a following low surrogate when `high` needs one.
fn utf16_unit(high: u32, chars: &mut Peekable<Chars<'_>>) -> Result<char, EscapeError> {
    if !(0xD800..0xDC00).contains(&high) {
        return code_point(high);
    }

    let mut lookahead = chars.clone();
    if lookahead.next() != Some('\\') || lookahead.next() != Some('u') {
        return Err(EscapeError::LoneSurrogate(high));
    }
    let low = read_hex(&mut lookahead, 'u', 4)?;
    if !(0xDC00..0xE000).contains(&low) {
        return Err(EscapeError::LoneSurrogate(high));
    }
    *chars = lookahead;

    let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
    code_point(combined)
}

fn code_point(value: u32) -> Result<char, EscapeError> {
    if (0xD800..0xE000).contains(&value) {
        return Err(EscapeError::LoneSurrogate(value));
    }
    char::from_u32(value).ok_or(EscapeError::OutOfRange(value))
}
