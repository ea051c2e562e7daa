//! Route information carried alongside a request for middleware access.
//!
//! - [`PathTemplate`] - The unexpanded path (e.g. `/users/{id}`)
//! - [`Params`] - The `path`, `query` and `header` parameter bags of a call

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{HeaderPatch, Result};

/// The original path template before parameter substitution.
///
/// Attached to every request seen by middleware so they can branch on the
/// logical route (`/users/{id}`) rather than the expanded URL (`/users/123`).
///
/// # Example
///
/// ```ignore
/// // In middleware
/// if request.path_template().is_some_and(|t| t.as_str() == "/users/{id}") {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathTemplate(Arc<str>);

impl PathTemplate {
    /// Create a new path template.
    #[must_use]
    pub fn new(template: impl Into<Arc<str>>) -> Self {
        Self(template.into())
    }

    /// Get the template string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Names of the `{name}` placeholders in order of appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.as_str();
        while let Some((_, after)) = rest.split_once('{') {
            let Some((name, tail)) = after.split_once('}') else {
                break;
            };
            names.push(name);
            rest = tail;
        }
        names
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PathTemplate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PathTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

/// Parameters of a single call, grouped by location.
///
/// Path values are stringified and percent-encoded into the template, query
/// values go through the query serializer, and header values are merged last
/// so they override every other header source.
///
/// # Example
///
/// ```
/// use openfetch_core::Params;
/// use serde_json::json;
///
/// let params = Params::new()
///     .path("id", 42)
///     .query("tags", json!(["a", "b"]))
///     .header("x-request-id", "abc");
///
/// assert_eq!(params.path_params().get("id"), Some(&json!(42)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    path: Map<String, Value>,
    query: Map<String, Value>,
    header: HeaderPatch,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a path parameter.
    #[must_use]
    pub fn path(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.path.insert(name.into(), value.into());
        self
    }

    /// Sets a query parameter. A `null` value is omitted from the query string.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Replaces the query bag with the fields of a serializable struct or map.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not serialize to a JSON object.
    pub fn query_from<T: serde::Serialize>(mut self, query: &T) -> Result<Self> {
        match serde_json::to_value(query)? {
            Value::Object(map) => {
                self.query = map;
                Ok(self)
            }
            Value::Null => {
                self.query = Map::new();
                Ok(self)
            }
            other => Err(crate::Error::invalid_request(format!(
                "query parameters must serialize to an object, got {other}"
            ))),
        }
    }

    /// Sets a header parameter.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header = self.header.set(name, value);
        self
    }

    /// Replaces the header bag.
    #[must_use]
    pub fn headers(mut self, headers: HeaderPatch) -> Self {
        self.header = headers;
        self
    }

    /// Path parameters.
    #[must_use]
    pub fn path_params(&self) -> &Map<String, Value> {
        &self.path
    }

    /// Query parameters.
    #[must_use]
    pub fn query_params(&self) -> &Map<String, Value> {
        &self.query
    }

    /// Header parameters.
    #[must_use]
    pub fn header_params(&self) -> &HeaderPatch {
        &self.header
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn path_template_as_str() {
        let template = PathTemplate::new("/users/{id}/posts/{post_id}");
        assert_eq!(template.as_str(), "/users/{id}/posts/{post_id}");
        assert_eq!(template.to_string(), "/users/{id}/posts/{post_id}");
    }

    #[test]
    fn path_template_placeholders() {
        let template = PathTemplate::from("/users/{id}/posts/{post_id}/{id}");
        assert_eq!(template.placeholders(), vec!["id", "post_id", "id"]);

        let template = PathTemplate::from("/health");
        assert!(template.placeholders().is_empty());

        let template = PathTemplate::from("/broken/{id");
        assert!(template.placeholders().is_empty());
    }

    #[test]
    fn params_builders() {
        let params = Params::new()
            .path("id", 7)
            .query("page", 2)
            .query("filter", json!({"status": "open"}))
            .header("x-trace", "on");

        assert_eq!(params.path_params().get("id"), Some(&json!(7)));
        let keys: Vec<_> = params.query_params().keys().cloned().collect();
        assert_eq!(keys, vec!["page", "filter"]);
        assert!(!params.header_params().is_empty());
    }

    #[test]
    fn params_query_from_struct() {
        #[derive(serde::Serialize)]
        struct Search {
            q: &'static str,
            page: Option<u32>,
        }

        let params = Params::new()
            .query_from(&Search { q: "rust", page: None })
            .expect("object");
        assert_eq!(params.query_params().get("q"), Some(&json!("rust")));
        assert_eq!(params.query_params().get("page"), Some(&Value::Null));
    }

    #[test]
    fn params_query_from_rejects_scalars() {
        let err = Params::new().query_from(&42).expect_err("not an object");
        assert!(err.to_string().contains("must serialize to an object"));
    }
}
