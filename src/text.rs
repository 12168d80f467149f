//! Purpose: Stateless text helpers for trimming, casing, escaping, and counting.
//! Exports: `is_blank`, `capitalize`, `reverse`, `random_alphanumeric`,
//! Exports: `escape_html`, `unescape_html`, `join`, `split_and_trim`, `count_occurrences`.
//! Role: Pure transforms with no dependency on the record codec.
//! Invariants: Blank input passes through `capitalize` and `reverse` unchanged.
//! Invariants: `unescape_html(escape_html(s)) == s` for every `s`.

use getrandom::fill as fill_random;

use crate::core::error::{Error, ErrorKind};

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Longest entity accepted by `unescape_html`, ampersand through semicolon.
const MAX_ENTITY_CHARS: usize = 12;

/// True when the input is empty or whitespace only.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Uppercases the first character, leaving the rest untouched.
///
/// Blank input comes back unchanged. Characters whose uppercase form expands
/// (such as the German sharp s) expand here too.
pub fn capitalize(text: &str) -> String {
    if is_blank(text) {
        return text.to_string();
    }
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Reverses the input character by character. Blank input comes back unchanged.
pub fn reverse(text: &str) -> String {
    if is_blank(text) {
        return text.to_string();
    }
    text.chars().rev().collect()
}

/// Generates a random string of ASCII letters and digits.
pub fn random_alphanumeric(length: usize) -> Result<String, Error> {
    // 248 is the largest multiple of 62 that fits in a byte; draws at or
    // above it are discarded so every alphabet index stays equally likely.
    const LIMIT: u8 = 248;
    let mut out = String::with_capacity(length);
    let mut bytes = [0u8; 64];
    while out.len() < length {
        fill_random(&mut bytes).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message(format!("failed to generate random bytes: {err}"))
        })?;
        for byte in bytes {
            if out.len() == length {
                break;
            }
            if byte < LIMIT {
                out.push(char::from(ALPHANUMERIC[usize::from(byte % 62)]));
            }
        }
    }
    Ok(out)
}

/// Escapes the five HTML-significant characters as named or numeric entities.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Replaces recognized HTML entities with their characters.
///
/// Handles the named entities `escape_html` produces plus `&apos;` and
/// decimal/hex numeric references. Unrecognized or unterminated entities are
/// left untouched.
pub fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match parse_entity(rest) {
            Some((ch, len)) => {
                out.push(ch);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Parses one entity at the start of `text`, which begins with an ampersand.
/// Returns the decoded character and the entity's byte length.
fn parse_entity(text: &str) -> Option<(char, usize)> {
    let mut end = None;
    for (idx, ch) in text.char_indices().take(MAX_ENTITY_CHARS) {
        if ch == ';' {
            end = Some(idx);
            break;
        }
    }
    let end = end?;
    let body = &text[1..end];
    let ch = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let reference = body.strip_prefix('#')?;
            let code = match reference.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => reference.parse::<u32>().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some((ch, end + 1))
}

/// Joins items with a separator. An empty list yields empty text.
pub fn join<S: AsRef<str>>(items: &[S], separator: &str) -> String {
    items
        .iter()
        .map(|item| item.as_ref())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Splits on a separator, trims each piece, and drops the blank ones.
///
/// Blank input yields an empty list. An empty separator yields the whole
/// trimmed input as a single segment.
pub fn split_and_trim(text: &str, separator: &str) -> Vec<String> {
    if is_blank(text) {
        return Vec::new();
    }
    if separator.is_empty() {
        return vec![text.trim().to_string()];
    }
    text.split(separator)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Counts non-overlapping occurrences of `needle` in `text`.
/// Returns 0 when either argument is blank.
pub fn count_occurrences(text: &str, needle: &str) -> usize {
    if is_blank(text) || is_blank(needle) {
        return 0;
    }
    text.matches(needle).count()
}
