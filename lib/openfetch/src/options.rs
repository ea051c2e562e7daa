//! Per-call options.

use std::fmt;
use std::sync::Arc;

use http::Extensions;
use serde::Serialize;
use serde_json::Value;

use crate::{BodySerializer, Fetcher, HeaderPatch, Params, ParseAs, QuerySerializer, Result};

/// Everything a single call adds to, or overrides on, the client defaults.
///
/// # Example
///
/// ```
/// use openfetch::{CallOptions, Params, ParseAs};
/// use serde_json::json;
///
/// let options = CallOptions::new()
///     .params(Params::new().path("petId", 42))
///     .header("x-request-id", "abc")
///     .parse_as(ParseAs::Text);
///
/// let create = CallOptions::new().json(json!({"name": "Rex"}));
/// # let _ = (options, create);
/// ```
#[derive(Clone, Default)]
pub struct CallOptions {
    pub(crate) params: Params,
    pub(crate) body: Option<Value>,
    pub(crate) query_serializer: Option<Arc<dyn QuerySerializer>>,
    pub(crate) body_serializer: Option<Arc<dyn BodySerializer>>,
    pub(crate) parse_as: ParseAs,
    pub(crate) fetch: Option<Fetcher>,
    pub(crate) headers: HeaderPatch,
    pub(crate) base_url: Option<String>,
    pub(crate) extensions: Extensions,
}

impl CallOptions {
    /// Options that change nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path, query and header parameters.
    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Set the request body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as JSON.
    pub fn body<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Set the request body from a JSON value. `null` sends no body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Override the query serializer for this call.
    #[must_use]
    pub fn query_serializer(mut self, serializer: impl QuerySerializer + 'static) -> Self {
        self.query_serializer = Some(Arc::new(serializer));
        self
    }

    /// Override the body serializer for this call.
    #[must_use]
    pub fn body_serializer(mut self, serializer: impl BodySerializer + 'static) -> Self {
        self.body_serializer = Some(Arc::new(serializer));
        self
    }

    /// Choose how a successful body is read. Defaults to [`ParseAs::Json`].
    #[must_use]
    pub fn parse_as(mut self, parse_as: impl Into<ParseAs>) -> Self {
        self.parse_as = parse_as.into();
        self
    }

    /// Override the network function for this call.
    #[must_use]
    pub fn fetch(mut self, fetch: impl Into<Fetcher>) -> Self {
        self.fetch = Some(fetch.into());
        self
    }

    /// Set a header for this call.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers = self.headers.set(name, value);
        self
    }

    /// Merge headers for this call, later entries winning.
    #[must_use]
    pub fn headers(mut self, headers: impl Into<HeaderPatch>) -> Self {
        self.headers = self.headers.extend(headers.into());
        self
    }

    /// Override the base URL for this call. One trailing `/` is stripped.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a pass-through option for the network function.
    #[must_use]
    pub fn extension<T>(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.extensions.insert(value);
        self
    }
}

impl fmt::Debug for CallOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOptions")
            .field("params", &self.params)
            .field("body", &self.body)
            .field("parse_as", &self.parse_as)
            .field("headers", &self.headers)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl From<Params> for CallOptions {
    fn from(params: Params) -> Self {
        Self::new().params(params)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn body_from_serializable() {
        #[derive(Serialize)]
        struct NewPet {
            name: &'static str,
            tag: Option<&'static str>,
        }

        let options = CallOptions::new()
            .body(&NewPet {
                name: "Rex",
                tag: None,
            })
            .expect("serializable");
        assert_eq!(options.body, Some(json!({"name": "Rex", "tag": null})));
    }

    #[test]
    fn parse_as_accepts_names() {
        assert_eq!(CallOptions::new().parse_as, ParseAs::Json);
        assert_eq!(CallOptions::new().parse_as("blob").parse_as, ParseAs::Blob);
        assert_eq!(CallOptions::new().parse_as("formData").parse_as, ParseAs::Text);
    }

    #[test]
    fn headers_accumulate() {
        let options = CallOptions::new()
            .header("a", "1")
            .headers(HeaderPatch::new().set("b", "2").remove("a"));
        assert_eq!(options.headers.iter().count(), 3);
    }
}
