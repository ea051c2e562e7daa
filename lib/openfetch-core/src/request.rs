//! Outgoing HTTP requests.
//!
//! Use [`Request::builder`] to construct requests with headers, a body and
//! pass-through extensions.
//!
//! # Example
//!
//! ```
//! use openfetch_core::{Method, Request};
//! use openfetch_core::header::{ACCEPT, HeaderValue};
//!
//! let request = Request::builder(Method::Get, "https://api.example.com/pets".parse().unwrap())
//!     .header(ACCEPT, HeaderValue::from_static("application/json"))
//!     .build();
//! assert_eq!(request.header("accept"), Some("application/json"));
//! ```

use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Extensions;

use crate::{Method, Params, PathTemplate};

/// An HTTP request with method, URL, headers and optional body.
///
/// Besides the wire data, a request seen by middleware carries the route it
/// was built from: the unexpanded [`PathTemplate`] and the original
/// [`Params`]. Extensions hold caller-supplied options for the network
/// function and are never inspected by openfetch itself.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: url::Url,
    headers: HeaderMap,
    body: Option<Bytes>,
    extensions: Extensions,
    path_template: Option<PathTemplate>,
    params: Option<Arc<Params>>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, url: url::Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Single header value by name, if it is visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Pass-through options for the network function.
    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable access to the pass-through options.
    #[must_use]
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// The unexpanded path template this request was built from.
    #[must_use]
    pub const fn path_template(&self) -> Option<&PathTemplate> {
        self.path_template.as_ref()
    }

    /// The parameters this request was built from.
    #[must_use]
    pub fn params(&self) -> Option<&Params> {
        self.params.as_deref()
    }

    /// Returns a copy of this request carrying the given route information.
    #[must_use]
    pub fn with_route(mut self, path_template: PathTemplate, params: Arc<Params>) -> Self {
        self.path_template = Some(path_template);
        self.params = Some(params);
        self
    }

    /// Starts a builder pre-filled with this request's data, to construct a
    /// fresh replacement.
    #[must_use]
    pub fn to_builder(&self) -> RequestBuilder {
        RequestBuilder {
            method: self.method,
            url: self.url.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            extensions: self.extensions.clone(),
        }
    }

    /// Consume into (method, url, headers, body, extensions).
    #[must_use]
    pub fn into_parts(self) -> (Method, url::Url, HeaderMap, Option<Bytes>, Extensions) {
        (
            self.method,
            self.url,
            self.headers,
            self.body,
            self.extensions,
        )
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: url::Url,
    headers: HeaderMap,
    body: Option<Bytes>,
    extensions: Extensions,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            extensions: Extensions::new(),
        }
    }

    /// Sets the method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the URL.
    #[must_use]
    pub fn url(mut self, url: url::Url) -> Self {
        self.url = url;
        self
    }

    /// Sets a header, replacing previous values.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replaces all headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Removes the request body.
    #[must_use]
    pub fn no_body(mut self) -> Self {
        self.body = None;
        self
    }

    /// Adds a pass-through option.
    #[must_use]
    pub fn extension<T>(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.extensions.insert(value);
        self
    }

    /// Replaces all pass-through options.
    #[must_use]
    pub fn extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            extensions: self.extensions,
            path_template: None,
            params: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use http::header::{ACCEPT, CONTENT_TYPE};

    use super::*;

    fn parse_url(input: &str) -> url::Url {
        url::Url::parse(input).expect("valid URL")
    }

    #[test]
    fn request_builder_basic() {
        let request = Request::builder(Method::Get, parse_url("https://api.example.com/users"))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .build();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.url().as_str(), "https://api.example.com/users");
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert!(request.body().is_none());
        assert!(request.path_template().is_none());
        assert!(request.params().is_none());
    }

    #[test]
    fn request_builder_with_body() {
        let body = Bytes::from(r#"{"name":"test"}"#);
        let request = Request::builder(Method::Post, parse_url("https://api.example.com/users"))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body.clone())
            .build();

        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.body(), Some(&body));
    }

    #[test]
    fn request_carries_extensions() {
        #[derive(Debug, Clone, PartialEq)]
        struct Credentials(&'static str);

        let request = Request::builder(Method::Get, parse_url("https://api.example.com"))
            .extension(Credentials("include"))
            .build();

        assert_eq!(
            request.extensions().get::<Credentials>(),
            Some(&Credentials("include"))
        );
    }

    #[test]
    fn route_survives_rebuild_only_when_reattached() {
        let params = Arc::new(Params::new().path("id", 1));
        let request = Request::builder(Method::Get, parse_url("https://api.example.com/users/1"))
            .build()
            .with_route(PathTemplate::new("/users/{id}"), Arc::clone(&params));

        assert_eq!(
            request.path_template().map(PathTemplate::as_str),
            Some("/users/{id}")
        );
        assert_eq!(request.params(), Some(params.as_ref()));

        let rebuilt = request.to_builder().method(Method::Head).build();
        assert_eq!(rebuilt.method(), Method::Head);
        assert_eq!(rebuilt.url(), request.url());
        assert!(rebuilt.path_template().is_none());
    }
}
