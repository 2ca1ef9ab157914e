//! Form data module
//!
//! Decodes `application/x-www-form-urlencoded` data from the query string
//! and request body, and percent-encoded request paths.

use std::borrow::Cow;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Decoded form fields in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(Vec<u8>, Vec<u8>)>,
}

impl FormData {
    /// Parse `key=value&key=value` data
    ///
    /// `+` decodes to a space and `%XX` to its byte; malformed escapes are
    /// kept literally. Empty pairs are skipped.
    pub fn parse(input: &[u8]) -> Self {
        let fields = input
            .split(|&b| b == b'&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = match pair.iter().position(|&b| b == b'=') {
                    Some(idx) => (&pair[..idx], &pair[idx + 1..]),
                    None => (pair, &[][..]),
                };
                (percent_decode(key, true), percent_decode(value, true))
            })
            .collect();
        Self { fields }
    }

    /// First value submitted for a key
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|(k, _)| k.as_slice() == key.as_bytes())
            .map(|(_, v)| v.as_slice())
    }
}

/// Check whether a `Content-Type` header value denotes url-encoded form data
pub fn is_form_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Look up a form field, preferring body fields over query fields
pub fn form_value(body: &FormData, query: &FormData, key: &str) -> Vec<u8> {
    body.get(key)
        .or_else(|| query.get(key))
        .map(<[u8]>::to_vec)
        .unwrap_or_default()
}

/// Percent-decode a request path
///
/// `+` is left as is. Returns `None` if the decoded bytes are not UTF-8.
pub fn decode_path(path: &str) -> Option<Cow<'_, str>> {
    if !path.contains('%') {
        return Some(Cow::Borrowed(path));
    }
    String::from_utf8(percent_decode(path.as_bytes(), false))
        .ok()
        .map(Cow::Owned)
}

fn percent_decode(input: &[u8], plus_as_space: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        match input[i] {
            b'+' if plus_as_space => {
                out.push(b' ');
                i += 1;
            }
            b'%' => match (input.get(i + 1), input.get(i + 2)) {
                (Some(&hi), Some(&lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                    out.push((hex_value(hi) << 4) | hex_value(lo));
                    i += 3;
                }
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    out
}

const fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}
