//! Query-string codec.
//!
//! `parse` turns the search portion of a URL into [`Params`]; `stringify`
//! is its inverse. Both follow `application/x-www-form-urlencoded` rules,
//! keys are emitted in sorted order and multi-valued fields are written as
//! repeated `key=value` pairs.

use url::form_urlencoded;

use crate::Params;

/// Parse a query string. A single leading `?` or `#` is ignored.
///
/// Repeated keys accumulate, a bare key (`?flag`) yields an empty-string
/// value and undecodable escapes are replaced lossily, so this never fails.
pub fn parse(input: &str) -> Params {
    let body = input
        .strip_prefix('?')
        .or_else(|| input.strip_prefix('#'))
        .unwrap_or(input);
    let mut params = Params::new();
    for (key, value) in form_urlencoded::parse(body.as_bytes()) {
        if key.is_empty() {
            continue;
        }
        params.append(key, value);
    }
    params
}

/// Encode `params` as a query string (without the leading `?`).
/// Fields with no values are left out.
pub fn stringify(params: &Params) -> String {
    let mut ser = form_urlencoded::Serializer::new(String::new());
    for (name, values) in params.iter() {
        for value in values {
            ser.append_pair(name, value);
        }
    }
    ser.finish()
}
