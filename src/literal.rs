//! Literal grammar shared by statements and expressions.
//!
//! - integers: `[1-9][0-9]*|0`
//! - booleans: `true|false`
//! - text: quoted, with C-style escapes (unescaped by the tokenizer)
//! - byte strings: `0x` followed by hex digits, two per byte, an odd run
//!   padded with a trailing `0`

use crate::error::{Error, Result};
use crate::value::Value;

/// What a bare word of an expression stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Literal(Value),
    /// Column name. For dotted names only the last segment is kept.
    Column(String),
}

/// Classifies a bare word as a literal or a column reference.
///
/// # Example
/// ```
/// # use memdb::literal::{classify, Atom};
/// # use memdb::Value;
/// assert_eq!(classify("42").unwrap(), Atom::Literal(Value::Int32(42)));
/// assert_eq!(classify("tab1.name").unwrap(), Atom::Column("name".into()));
/// ```
pub fn classify(word: &str) -> Result<Atom> {
    match word {
        "true" => return Ok(Atom::Literal(Value::Bool(true))),
        "false" => return Ok(Atom::Literal(Value::Bool(false))),
        _ => {}
    }
    if let Some(hex) = word.strip_prefix("0x") {
        return parse_hex(hex).map(Atom::Literal);
    }
    if word.starts_with(|c: char| c.is_ascii_digit()) {
        return parse_int(word, false).map(|i| Atom::Literal(Value::Int32(i)));
    }
    column_name(word).map(|name| Atom::Column(name.to_string()))
}

/// Parses an unsigned run of decimal digits, negating it if asked.
///
/// Leading zeros are rejected, as is anything outside the `i32` range.
pub fn parse_int(digits: &str, negative: bool) -> Result<i32> {
    let well_formed = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'));
    if !well_formed {
        return Err(Error::InvalidToken(digits.to_string()));
    }
    let text = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };
    text.parse::<i32>()
        .map_err(|_| Error::InvalidToken(text.clone()))
}

/// Parses the hex digits following a `0x` prefix.
fn parse_hex(hex: &str) -> Result<Value> {
    let invalid = || Error::InvalidToken(format!("0x{hex}"));
    if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let mut digits = hex.to_string();
    if digits.len() % 2 != 0 {
        digits.push('0');
    }
    let bytes = digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(invalid)
        })
        .collect::<Result<Vec<u8>>>()?;
    Value::bytes(&bytes)
}

/// Validates a possibly dotted identifier and returns its last segment.
pub fn column_name(word: &str) -> Result<&str> {
    let valid_segment = |s: &str| {
        s.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
            && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    if !word.split('.').all(valid_segment) {
        return Err(Error::InvalidToken(word.to_string()));
    }
    Ok(word.rsplit('.').next().unwrap_or(word))
}

/// Resolves the escape sequences of a quoted text body.
///
/// Supported: `\a \b \f \n \r \t \v \' \" \\ \?` and `\xHH` with exactly two
/// hex digits. `\xHH` yields the single raw byte `HH`, so the result is not
/// necessarily UTF-8.
pub fn unescape(raw: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut utf8 = [0; 4];
            out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            continue;
        }
        let escaped = match chars.next() {
            Some('a') => 0x07,
            Some('b') => 0x08,
            Some('f') => 0x0C,
            Some('n') => b'\n',
            Some('r') => b'\r',
            Some('t') => b'\t',
            Some('v') => 0x0B,
            Some('\'') => b'\'',
            Some('"') => b'"',
            Some('\\') => b'\\',
            Some('?') => b'?',
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                if hex.len() != 2 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(Error::InvalidToken(format!("\\x{hex}")));
                }
                u8::from_str_radix(&hex, 16)
                    .map_err(|_| Error::InvalidToken(format!("\\x{hex}")))?
            }
            Some(other) => return Err(Error::InvalidToken(format!("\\{other}"))),
            None => return Err(Error::InvalidToken("\\".into())),
        };
        out.push(escaped);
    }

    Ok(out)
}
