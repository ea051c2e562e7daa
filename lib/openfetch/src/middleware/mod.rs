//! Request/response interceptors.
//!
//! Middleware registered on a [`Client`](crate::Client) wraps every call:
//! request passes run in registration order before the network call, and
//! response passes run in reverse order after it. Each pass either leaves the
//! in-flight value alone or replaces it with a fresh one of the same kind.
//!
//! # Available Middleware
//!
//! - [`LoggingMiddleware`] - Logs requests/responses using `tracing`
//! - [`request_fn`] / [`response_fn`] - Wrap a closure as a one-phase middleware
//!
//! # Example
//!
//! ```ignore
//! use openfetch::Client;
//! use openfetch::header::{AUTHORIZATION, HeaderValue};
//! use openfetch::middleware::{LoggingMiddleware, Outcome, request_fn};
//!
//! let client = Client::builder("https://petstore.example.com")
//!     .middleware(request_fn("auth", |request, _options| {
//!         let request = request
//!             .to_builder()
//!             .header(AUTHORIZATION, HeaderValue::from_static("Bearer token"))
//!             .build();
//!         Ok(Outcome::request(request))
//!     }))
//!     .middleware(LoggingMiddleware::new())
//!     .build();
//! ```

mod logging;

pub use logging::{LogLevel, LoggingMiddleware, RequestStart};
pub use openfetch_core::middleware::{
    Exchange, Middleware, MiddlewareFuture, MiddlewareOptions, Outcome, Phase, RequestFn,
    ResponseFn, request_fn, response_fn,
};
