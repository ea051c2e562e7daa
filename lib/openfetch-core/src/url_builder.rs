//! URL building: path template expansion and query serialization.
//!
//! The default query serializer follows `OpenAPI` `style: form, explode: true`
//! for scalars and arrays, and `deepObject` bracket paths for nested objects:
//!
//! ```
//! use openfetch_core::default_query_serializer;
//! use serde_json::json;
//!
//! let query = json!({"tags": ["a", "b"], "filter": {"status": "open"}, "page": null});
//! let query = query.as_object().expect("object");
//! assert_eq!(default_query_serializer(query), "tags=a&tags=b&filter[status]=open");
//! ```

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Number, Value};

/// Characters left unescaped by a URI component encoder:
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
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

/// Serializes the query bag of a call into a query string (without `?`).
///
/// Closures `Fn(&Map<String, Value>) -> String` implement this trait.
pub trait QuerySerializer: Send + Sync {
    /// Serialize the query parameters.
    fn serialize(&self, query: &Map<String, Value>) -> String;
}

impl<F> QuerySerializer for F
where
    F: Fn(&Map<String, Value>) -> String + Send + Sync,
{
    fn serialize(&self, query: &Map<String, Value>) -> String {
        self(query)
    }
}

/// The default query serializer, see [`default_query_serializer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultQuerySerializer;

impl QuerySerializer for DefaultQuerySerializer {
    fn serialize(&self, query: &Map<String, Value>) -> String {
        default_query_serializer(query)
    }
}

/// Percent-encodes a URI component.
#[must_use]
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, COMPONENT).to_string()
}

/// Serializes top-level query parameters in insertion order, joining the
/// non-empty fragments with `&`.
#[must_use]
pub fn default_query_serializer(query: &Map<String, Value>) -> String {
    let fragments = query
        .iter()
        .map(|(key, value)| serialize_query_param(&[key.as_str()], value))
        .filter(|fragment| !fragment.is_empty());
    join_fragments(fragments)
}

/// Serializes one query value found at `path` (`["filter", "status"]` renders
/// as `filter[status]`).
///
/// - `null` produces nothing
/// - strings are percent-encoded, booleans are written as-is and numbers in
///   their shortest form (`1.0` is written `1`)
/// - arrays repeat the same key for every element
/// - objects recurse with the child key appended to the path
#[must_use]
pub fn serialize_query_param(path: &[&str], value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => format!("{}={}", deep_object_path(path), encode_component(text)),
        Value::Number(number) => format!("{}={}", deep_object_path(path), number_text(number)),
        Value::Bool(flag) => format!("{}={flag}", deep_object_path(path)),
        Value::Array(items) => join_fragments(
            items
                .iter()
                .map(|item| serialize_query_param(path, item))
                .filter(|fragment| !fragment.is_empty()),
        ),
        Value::Object(children) => join_fragments(
            children
                .iter()
                .map(|(key, child)| {
                    let mut child_path = path.to_vec();
                    child_path.push(key);
                    serialize_query_param(&child_path, child)
                })
                .filter(|fragment| !fragment.is_empty()),
        ),
    }
}

/// Renders a key path in bracket notation: `first[second][third]`.
#[must_use]
pub fn deep_object_path(path: &[&str]) -> String {
    let mut segments = path.iter();
    let mut output = segments.next().map(ToString::to_string).unwrap_or_default();
    for segment in segments {
        output.push('[');
        output.push_str(segment);
        output.push(']');
    }
    output
}

/// Replaces every `{name}` placeholder whose name is a key of `params` with
/// the percent-encoded value. Unknown placeholders are left verbatim.
#[must_use]
pub fn expand_path(template: &str, params: &Map<String, Value>) -> String {
    let mut path = template.to_string();
    for (name, value) in params {
        let placeholder = format!("{{{name}}}");
        if path.contains(&placeholder) {
            path = path.replace(&placeholder, &encode_component(&path_value(value)));
        }
    }
    path
}

/// Builds the final URL of a call: `base_url` + expanded `path_template`,
/// plus `?` and the serialized query when it is not empty.
#[must_use]
pub fn build_url(
    path_template: &str,
    base_url: &str,
    path_params: &Map<String, Value>,
    query_params: &Map<String, Value>,
    query_serializer: &dyn QuerySerializer,
) -> String {
    let mut url = format!("{base_url}{}", expand_path(path_template, path_params));
    let search = query_serializer.serialize(query_params);
    let search = search.strip_prefix('?').unwrap_or(&search);
    if !search.is_empty() {
        url.push('?');
        url.push_str(search);
    }
    url
}

/// Strips one trailing `/` from a base URL.
#[must_use]
pub fn normalize_base_url(base_url: &str) -> &str {
    base_url.strip_suffix('/').unwrap_or(base_url)
}

fn path_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number_text(number),
        Value::Array(items) => items.iter().map(path_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// Integral floats render without a fraction: `1.0` is written `1`.
fn number_text(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() => float.to_string(),
        _ => number.to_string(),
    }
}

fn join_fragments(fragments: impl Iterator<Item = String>) -> String {
    fragments.collect::<Vec<_>>().join("&")
}
