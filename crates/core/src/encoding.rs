//! Percent-encoding for identifiers and search terms placed in URLs, and
//! for form bodies posted upstream.
//!
//! InChI strings contain `?`, `+` and occasionally `#` or `%`, which would
//! otherwise be read as query, space, fragment or escape characters.

/// Bytes left as-is inside a path (the identifier's own `/` separators stay).
const PATH_SAFE: &[u8] = b"-._~/,=;()*:@!$'";

/// Bytes left as-is inside a query value.
const QUERY_SAFE: &[u8] = b"-._~";

/// Bytes left as-is inside an `application/x-www-form-urlencoded` value.
const FORM_SAFE: &[u8] = b"*-._";

/// Encode a value for use after a wildcard path segment, e.g. `/inchi/{value}`.
pub fn encode_path_component(value: &str) -> String {
    percent_encode(value, PATH_SAFE)
}

/// Encode a value for use as a single query-string parameter value.
pub fn encode_query_value(value: &str) -> String {
    percent_encode(value, QUERY_SAFE)
}

/// Encode raw bytes as one `application/x-www-form-urlencoded` value.
///
/// Spaces become `+`. Every other byte outside the safe set is escaped as
/// is, so binary structure files survive unchanged.
pub fn encode_form_value(value: &[u8]) -> String {
    let mut out = String::with_capacity(value.len());
    for &byte in value {
        if byte == b' ' {
            out.push('+');
        } else {
            push_byte(&mut out, byte, FORM_SAFE);
        }
    }
    out
}

fn percent_encode(value: &str, safe: &[u8]) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        push_byte(&mut out, byte, safe);
    }
    out
}

fn push_byte(out: &mut String, byte: u8, safe: &[u8]) {
    if byte.is_ascii_alphanumeric() || safe.contains(&byte) {
        out.push(byte as char);
    } else {
        out.push_str(&format!("%{byte:02X}"));
    }
}
