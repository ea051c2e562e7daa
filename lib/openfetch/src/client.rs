//! The client factory.

use std::sync::Arc;

use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::dispatch::dispatch;
use crate::{
    BodySerializer, CallOptions, FetchResult, Fetcher, HeaderPatch, Method, Middleware,
    QuerySerializer, Result,
};

/// Typed HTTP request wrapper.
///
/// Binds a [`ClientConfig`] and exposes one entry point per HTTP verb. Every
/// verb delegates to the same dispatcher with the method fixed. Cloning is
/// cheap and clones share the configuration.
///
/// # Example
///
/// ```ignore
/// use openfetch::{CallOptions, Client, FetchResult, Params};
///
/// let client = Client::builder("https://petstore.example.com/v1/")
///     .header("accept", "application/json")
///     .build();
///
/// let result = client
///     .get("/pets/{petId}", Params::new().path("petId", 42))
///     .await?;
///
/// match result {
///     FetchResult::Data { data, .. } => println!("{data:?}"),
///     FetchResult::Error { error, response } => eprintln!("{}: {error:?}", response.status()),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
}

impl Client {
    /// Create a client from a built configuration.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Get the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform a call with an explicit method.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or headers are invalid, the body cannot be
    /// serialized, a middleware fails or breaks its contract, or the network
    /// function fails. Non-2xx responses are not errors.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: impl Into<CallOptions>,
    ) -> Result<FetchResult> {
        dispatch(&self.config, method, path, options.into()).await
    }

    /// `GET` request.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get(&self, path: &str, options: impl Into<CallOptions>) -> Result<FetchResult> {
        self.request(Method::Get, path, options).await
    }

    /// `PUT` request.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn put(&self, path: &str, options: impl Into<CallOptions>) -> Result<FetchResult> {
        self.request(Method::Put, path, options).await
    }

    /// `POST` request.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn post(&self, path: &str, options: impl Into<CallOptions>) -> Result<FetchResult> {
        self.request(Method::Post, path, options).await
    }

    /// `DELETE` request.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn delete(
        &self,
        path: &str,
        options: impl Into<CallOptions>,
    ) -> Result<FetchResult> {
        self.request(Method::Delete, path, options).await
    }

    /// `OPTIONS` request.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn options(
        &self,
        path: &str,
        options: impl Into<CallOptions>,
    ) -> Result<FetchResult> {
        self.request(Method::Options, path, options).await
    }

    /// `HEAD` request.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn head(&self, path: &str, options: impl Into<CallOptions>) -> Result<FetchResult> {
        self.request(Method::Head, path, options).await
    }

    /// `PATCH` request.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn patch(&self, path: &str, options: impl Into<CallOptions>) -> Result<FetchResult> {
        self.request(Method::Patch, path, options).await
    }

    /// `TRACE` request.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn trace(&self, path: &str, options: impl Into<CallOptions>) -> Result<FetchResult> {
        self.request(Method::Trace, path, options).await
    }
}

/// Builder for [`Client`].
///
/// Provides the same settings as [`ClientConfigBuilder`].
#[derive(Debug)]
pub struct ClientBuilder {
    config: ClientConfigBuilder,
}

impl ClientBuilder {
    /// Create a builder for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: ClientConfigBuilder::new(base_url),
        }
    }

    /// Set the network function.
    ///
    /// Defaults to a [`HyperClient`](crate::HyperClient).
    #[must_use]
    pub fn fetch(mut self, fetch: impl Into<Fetcher>) -> Self {
        self.config = self.config.fetch(fetch);
        self
    }

    /// Set the query serializer.
    #[must_use]
    pub fn query_serializer(mut self, serializer: impl QuerySerializer + 'static) -> Self {
        self.config = self.config.query_serializer(serializer);
        self
    }

    /// Set the body serializer.
    #[must_use]
    pub fn body_serializer(mut self, serializer: impl BodySerializer + 'static) -> Self {
        self.config = self.config.body_serializer(serializer);
        self
    }

    /// Register a middleware. Registration order is the request pass order.
    #[must_use]
    pub fn middleware(mut self, middleware: impl Middleware) -> Self {
        self.config = self.config.middleware(middleware);
        self
    }

    /// Register an already shared middleware.
    #[must_use]
    pub fn middleware_arc(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.config = self.config.middleware_arc(middleware);
        self
    }

    /// Set a default header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.header(name, value);
        self
    }

    /// Merge default headers, later entries winning.
    #[must_use]
    pub fn headers(mut self, headers: impl Into<HeaderPatch>) -> Self {
        self.config = self.config.headers(headers);
        self
    }

    /// Add a default pass-through option for the network function.
    #[must_use]
    pub fn extension<T>(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.config = self.config.extension(value);
        self
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> Client {
        Client::new(self.config.build())
    }
}
