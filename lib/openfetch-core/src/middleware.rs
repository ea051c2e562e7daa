//! The interceptor contract.
//!
//! A [`Middleware`] is invoked twice per call: once with the outgoing
//! [`Request`] before the network call, and once with the incoming
//! [`Response`] after it. Each pass resolves to an [`Outcome`]: either
//! [`Outcome::NoChange`] to pass the current value through, or
//! [`Outcome::Replace`] carrying a fresh value of the same kind.
//!
//! Request passes run in registration order, response passes in reverse.

use std::fmt;
use std::future::{Future, ready};
use std::pin::Pin;
use std::sync::Arc;

use derive_more::Display;

use crate::{BodySerializer, Fetcher, ParseAs, QuerySerializer, Request, Response, Result};

/// Future returned by middleware passes.
pub type MiddlewareFuture<'a> = Pin<Box<dyn Future<Output = Result<Outcome>> + Send + 'a>>;

/// Pipeline phase of a middleware pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Phase {
    /// Before the network call.
    #[display("request")]
    Request,
    /// After the network call.
    #[display("response")]
    Response,
}

/// A replacement value handed back by a middleware.
#[derive(Debug, Clone)]
pub enum Exchange {
    /// A new outgoing request.
    Request(Request),
    /// A new incoming response.
    Response(Response),
}

impl Exchange {
    /// The phase this value belongs to.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Request(_) => Phase::Request,
            Self::Response(_) => Phase::Response,
        }
    }
}

/// Result of one middleware pass.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Keep the in-flight value.
    NoChange,
    /// Replace the in-flight value.
    ///
    /// The replacement must match the pass: a request during the request pass,
    /// a response during the response pass. Anything else aborts the call with
    /// [`Error::MiddlewareContract`](crate::Error::MiddlewareContract).
    Replace(Exchange),
}

impl Outcome {
    /// Replace the outgoing request.
    #[must_use]
    pub const fn request(request: Request) -> Self {
        Self::Replace(Exchange::Request(request))
    }

    /// Replace the incoming response.
    #[must_use]
    pub const fn response(response: Response) -> Self {
        Self::Replace(Exchange::Response(response))
    }
}

/// Read-only snapshot of the effective settings of a call.
///
/// Middleware that wants different behavior must act on the request or
/// response it is given; the snapshot only exposes getters.
#[derive(Clone)]
pub struct MiddlewareOptions {
    base_url: Arc<str>,
    fetch: Fetcher,
    parse_as: ParseAs,
    query_serializer: Arc<dyn QuerySerializer>,
    body_serializer: Arc<dyn BodySerializer>,
}

impl MiddlewareOptions {
    /// Captures the effective settings of a call.
    #[must_use]
    pub fn new(
        base_url: Arc<str>,
        fetch: Fetcher,
        parse_as: ParseAs,
        query_serializer: Arc<dyn QuerySerializer>,
        body_serializer: Arc<dyn BodySerializer>,
    ) -> Self {
        Self {
            base_url,
            fetch,
            parse_as,
            query_serializer,
            body_serializer,
        }
    }

    /// Base URL, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Network-call function.
    #[must_use]
    pub const fn fetch(&self) -> &Fetcher {
        &self.fetch
    }

    /// How a successful body will be read.
    #[must_use]
    pub const fn parse_as(&self) -> ParseAs {
        self.parse_as
    }

    /// Query serializer.
    #[must_use]
    pub fn query_serializer(&self) -> &dyn QuerySerializer {
        self.query_serializer.as_ref()
    }

    /// Body serializer.
    #[must_use]
    pub fn body_serializer(&self) -> &dyn BodySerializer {
        self.body_serializer.as_ref()
    }
}

impl fmt::Debug for MiddlewareOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareOptions")
            .field("base_url", &self.base_url)
            .field("parse_as", &self.parse_as)
            .finish_non_exhaustive()
    }
}

/// A request/response interceptor.
///
/// Both passes default to [`Outcome::NoChange`], so implementors only
/// override the phase they care about.
///
/// # Example
///
/// ```
/// use openfetch_core::header::{AUTHORIZATION, HeaderValue};
/// use openfetch_core::{Middleware, MiddlewareFuture, MiddlewareOptions, Outcome, Request};
///
/// struct Auth(HeaderValue);
///
/// impl Middleware for Auth {
///     fn on_request<'a>(
///         &'a self,
///         request: &'a Request,
///         _options: &'a MiddlewareOptions,
///     ) -> MiddlewareFuture<'a> {
///         let request = request.to_builder().header(AUTHORIZATION, self.0.clone()).build();
///         Box::pin(async move { Ok(Outcome::request(request)) })
///     }
/// }
/// ```
pub trait Middleware: Send + Sync + 'static {
    /// Name used in contract violation errors and logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Request pass.
    ///
    /// `request` carries the unexpanded path template and the original
    /// parameters of the call.
    fn on_request<'a>(
        &'a self,
        request: &'a Request,
        options: &'a MiddlewareOptions,
    ) -> MiddlewareFuture<'a> {
        let _ = (request, options);
        Box::pin(ready(Ok(Outcome::NoChange)))
    }

    /// Response pass. `request` is the request that was sent.
    fn on_response<'a>(
        &'a self,
        request: &'a Request,
        response: &'a Response,
        options: &'a MiddlewareOptions,
    ) -> MiddlewareFuture<'a> {
        let _ = (request, response, options);
        Box::pin(ready(Ok(Outcome::NoChange)))
    }
}

/// Request-only middleware built by [`request_fn`].
pub struct RequestFn<F> {
    name: String,
    call: F,
}

/// Response-only middleware built by [`response_fn`].
pub struct ResponseFn<F> {
    name: String,
    call: F,
}

/// Wraps a closure as a request-pass middleware.
///
/// # Example
///
/// ```
/// use openfetch_core::Outcome;
/// use openfetch_core::middleware::request_fn;
///
/// let tag = request_fn("tag", |request, _options| {
///     let request = request.to_builder().extension("tagged").build();
///     Ok(Outcome::request(request))
/// });
/// # let _ = tag;
/// ```
pub fn request_fn<F>(name: impl Into<String>, call: F) -> RequestFn<F>
where
    F: Fn(&Request, &MiddlewareOptions) -> Result<Outcome> + Send + Sync + 'static,
{
    RequestFn {
        name: name.into(),
        call,
    }
}

/// Wraps a closure as a response-pass middleware.
pub fn response_fn<F>(name: impl Into<String>, call: F) -> ResponseFn<F>
where
    F: Fn(&Request, &Response, &MiddlewareOptions) -> Result<Outcome> + Send + Sync + 'static,
{
    ResponseFn {
        name: name.into(),
        call,
    }
}

impl<F> Middleware for RequestFn<F>
where
    F: Fn(&Request, &MiddlewareOptions) -> Result<Outcome> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_request<'a>(
        &'a self,
        request: &'a Request,
        options: &'a MiddlewareOptions,
    ) -> MiddlewareFuture<'a> {
        Box::pin(ready((self.call)(request, options)))
    }
}

impl<F> Middleware for ResponseFn<F>
where
    F: Fn(&Request, &Response, &MiddlewareOptions) -> Result<Outcome> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_response<'a>(
        &'a self,
        request: &'a Request,
        response: &'a Response,
        options: &'a MiddlewareOptions,
    ) -> MiddlewareFuture<'a> {
        Box::pin(ready((self.call)(request, response, options)))
    }
}

impl<F> fmt::Debug for RequestFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestFn").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<F> fmt::Debug for ResponseFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseFn").field("name", &self.name).finish_non_exhaustive()
    }
}
