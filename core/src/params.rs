//! Path, query, and header parameter helpers used by every endpoint.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::form_urlencoded;

/// Characters escaped inside a single path segment. `/`, `\` and `%` are
/// included so a parameter value can never split or re-encode the path.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

pub fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Replace `{name}` in `template` with the percent-encoded `value`.
pub fn substitute_path(template: &str, name: &str, value: &str) -> String {
    template.replace(&format!("{{{name}}}"), &encode_path_segment(value))
}

/// Keep only the query pairs that carry a value.
pub fn query_items(pairs: &[(&str, Option<String>)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), v.clone())))
        .collect()
}

/// Append `items` to `url` as a form-encoded query string.
pub fn append_query(url: &str, items: &[(String, String)]) -> String {
    if items.is_empty() {
        return url.to_string();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(items)
        .finish();
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

/// Drop headers whose value is absent.
pub fn reject_nil_headers(pairs: Vec<(&str, Option<String>)>) -> Vec<(String, String)> {
    pairs
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
        .collect()
}
