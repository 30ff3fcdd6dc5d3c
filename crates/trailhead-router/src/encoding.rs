//! Percent-encoding for generated URLs and decoding of captured segments.

use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes escaped in a query key or value: everything except alphanumerics
/// and `-_.!~*'()`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Bytes escaped in a whole path. URI delimiters pass through.
const PATH: &AsciiSet = &COMPONENT
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'#');

/// Bytes escaped in a variable value substituted into a path. Delimiters that
/// would split the segment or end the path are escaped too.
const SEGMENT: &AsciiSet = &PATH.add(b'/').add(b'?').add(b'#');

/// Encode an assembled path.
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH).to_string()
}

/// Encode a variable value for substitution into a path.
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

/// Percent-decode a captured path value. Text that does not decode to UTF-8
/// is returned unchanged.
pub fn decode_component(text: &str) -> Cow<'_, str> {
    percent_decode_str(text)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(text))
}

/// Encode a query key or value, with spaces rendered as `+`.
pub fn encode_query_component(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT)
        .to_string()
        .replace("%20", "+")
}

/// Render `pairs` as `?k=v&k2=v2`, or an empty string when there are none.
pub fn query_string<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut query = String::new();
    for (key, value) in pairs {
        query.push(if query.is_empty() { '?' } else { '&' });
        query.push_str(&encode_query_component(key));
        query.push('=');
        query.push_str(&encode_query_component(value));
    }
    query
}
