//! Client configuration types.

use std::fmt;
use std::sync::Arc;

use http::Extensions;

use crate::{
    BodySerializer, DefaultQuerySerializer, Fetcher, HeaderPatch, HyperClient,
    JsonBodySerializer, Middleware, QuerySerializer, normalize_base_url,
};

/// Defaults shared by every call of a [`Client`](crate::Client).
///
/// Immutable once built. The client keeps it behind an [`Arc`], so calls in
/// flight at the same time only ever read it.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: Arc<str>,
    fetch: Fetcher,
    query_serializer: Arc<dyn QuerySerializer>,
    body_serializer: Arc<dyn BodySerializer>,
    middleware: Arc<[Arc<dyn Middleware>]>,
    headers: HeaderPatch,
    extensions: Extensions,
}

impl ClientConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(base_url)
    }

    /// Base URL, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn shared_base_url(&self) -> Arc<str> {
        Arc::clone(&self.base_url)
    }

    /// Default network function.
    #[must_use]
    pub const fn fetch(&self) -> &Fetcher {
        &self.fetch
    }

    /// Default query serializer.
    #[must_use]
    pub fn query_serializer(&self) -> &Arc<dyn QuerySerializer> {
        &self.query_serializer
    }

    /// Default body serializer.
    #[must_use]
    pub fn body_serializer(&self) -> &Arc<dyn BodySerializer> {
        &self.body_serializer
    }

    /// Registered middleware, in registration order.
    #[must_use]
    pub fn middleware(&self) -> &[Arc<dyn Middleware>] {
        &self.middleware
    }

    /// Default headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderPatch {
        &self.headers
    }

    /// Default pass-through options for the network function.
    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let middleware: Vec<_> = self.middleware.iter().map(|m| m.name()).collect();
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("middleware", &middleware)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    base_url: String,
    fetch: Option<Fetcher>,
    query_serializer: Option<Arc<dyn QuerySerializer>>,
    body_serializer: Option<Arc<dyn BodySerializer>>,
    middleware: Vec<Arc<dyn Middleware>>,
    headers: HeaderPatch,
    extensions: Extensions,
}

impl ClientConfigBuilder {
    /// Create a builder for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the base URL. One trailing `/` is stripped.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the network function.
    ///
    /// Defaults to a [`HyperClient`] created when the configuration is built.
    #[must_use]
    pub fn fetch(mut self, fetch: impl Into<Fetcher>) -> Self {
        self.fetch = Some(fetch.into());
        self
    }

    /// Set the query serializer.
    #[must_use]
    pub fn query_serializer(mut self, serializer: impl QuerySerializer + 'static) -> Self {
        self.query_serializer = Some(Arc::new(serializer));
        self
    }

    /// Set the body serializer.
    #[must_use]
    pub fn body_serializer(mut self, serializer: impl BodySerializer + 'static) -> Self {
        self.body_serializer = Some(Arc::new(serializer));
        self
    }

    /// Register a middleware. Registration order is the request pass order.
    #[must_use]
    pub fn middleware(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Register an already shared middleware.
    #[must_use]
    pub fn middleware_arc(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Set a default header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers = self.headers.set(name, value);
        self
    }

    /// Merge default headers, later entries winning.
    #[must_use]
    pub fn headers(mut self, headers: impl Into<HeaderPatch>) -> Self {
        self.headers = self.headers.extend(headers.into());
        self
    }

    /// Add a default pass-through option.
    #[must_use]
    pub fn extension<T>(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.extensions.insert(value);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        ClientConfig {
            base_url: Arc::from(normalize_base_url(&self.base_url)),
            fetch: self
                .fetch
                .unwrap_or_else(|| Fetcher::new(HyperClient::new())),
            query_serializer: self
                .query_serializer
                .unwrap_or_else(|| Arc::new(DefaultQuerySerializer)),
            body_serializer: self
                .body_serializer
                .unwrap_or_else(|| Arc::new(JsonBodySerializer)),
            middleware: self.middleware.into(),
            headers: self.headers,
            extensions: self.extensions,
        }
    }
}

impl fmt::Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("base_url", &self.base_url)
            .field("middleware_count", &self.middleware.len())
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
