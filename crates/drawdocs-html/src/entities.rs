//! Entity decoding and escaping.

use std::borrow::Cow;

/// Longest reference we attempt to decode, semicolon included.
const MAX_REFERENCE_LEN: usize = 32;

/// Decode the basic named entities and numeric character references.
///
/// Only `&lt;`, `&gt;`, `&amp;`, `&quot;`, `&apos;` and `&#N;`/`&#xN;` are
/// decoded; any other reference is kept verbatim.
#[must_use]
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let semi = rest[1..].find(';').map(|i| i + 1);
        match semi {
            Some(semi) if semi <= MAX_REFERENCE_LEN => {
                if let Some(decoded) = decode_reference(&rest[1..semi]) {
                    out.push(decoded);
                    rest = &rest[semi + 1..];
                } else {
                    out.push('&');
                    rest = &rest[1..];
                }
            }
            _ => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decode a single reference name (without `&` and `;`).
fn decode_reference(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = if let Some(hex) = num.strip_prefix(['x', 'X']) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                num.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// Escape text for HTML content.
#[must_use]
pub fn escape_text(text: &str) -> String {
    escape(text, false)
}

/// Escape text for a double-quoted attribute value.
#[must_use]
pub fn escape_attr(text: &str) -> String {
    escape(text, true)
}

/// Escape HTML special characters.
fn escape(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}
