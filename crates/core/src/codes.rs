//! Text codes used when attribute values are persisted as source text.
//!
//! Parsing is shallow: nested content is returned as raw strings for the
//! caller to interpret.

use crate::error::{ModelError, Result};

/// Split the body of a dict literal into its top-level chunks.
///
/// The text is cut at every `:` or `,` that is outside brackets and quotes, so
/// `"'a': 1, 'b': (2, 3)"` yields `'a'`, `1`, `'b'`, `(2, 3)`. Chunks are
/// trimmed. The chunk after the last separator is always yielded, even when
/// empty.
pub fn parse_dict_strings(code: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut level: i32 = 0;
    let mut chunk_start = 0;
    let mut quote: Option<char> = None;

    for (i, ch) in code.char_indices() {
        match ch {
            '(' | '[' | '{' if quote.is_none() => level += 1,
            ')' | ']' | '}' if quote.is_none() => level -= 1,
            '"' | '\'' => match quote {
                Some(q) if q == ch => quote = None,
                None => quote = Some(ch),
                Some(_) => {}
            },
            ':' | ',' if level == 0 && quote.is_none() => {
                chunks.push(code[chunk_start..i].trim());
                chunk_start = i + ch.len_utf8();
            }
            _ => {}
        }
    }

    chunks.push(code[chunk_start..].trim());
    chunks
}

/// Strip one layer of quoting from a string literal.
///
/// Text that does not open with a quote is taken to carry a one-letter
/// prefix such as `u'...'` or `r"..."`, which is dropped along with the
/// quotes. Counting is by character. Text too short to hold anything
/// between the quotes yields `""`.
pub fn unquote_string(code: &str) -> &str {
    let skip = match code.chars().next() {
        None => return code,
        Some('"' | '\'') => 1,
        Some(_) => 2,
    };
    let start = code.char_indices().nth(skip).map_or(code.len(), |(i, _)| i);
    let end = code.char_indices().next_back().map_or(0, |(i, _)| i);
    code.get(start..end).unwrap_or("")
}

/// Render an 8-bit RGB colour as a tuple of floats in `[0.0, 1.0]`.
pub fn color_to_code(rgb: (u8, u8, u8)) -> String {
    let channel = |c: u8| f64::from(c) / 255.0;
    format!("({:?}, {:?}, {:?})", channel(rgb.0), channel(rgb.1), channel(rgb.2))
}

/// Parse a tuple of three floats in `[0.0, 1.0]` back into an 8-bit RGB colour.
pub fn code_to_color(code: &str) -> Result<(u8, u8, u8)> {
    let invalid = || ModelError::InvalidColorCode(code.to_string());

    let inner = code
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(invalid)?;

    let channels = inner
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>>>()?;

    match channels.as_slice() {
        [r, g, b] if channels.iter().all(|c| (0.0..=1.0).contains(c)) => {
            let to_byte = |c: f64| (c * 255.0).round() as u8;
            Ok((to_byte(*r), to_byte(*g), to_byte(*b)))
        }
        _ => Err(invalid()),
    }
}
