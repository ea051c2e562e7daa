//! Request/response logging middleware.
//!
//! This middleware logs HTTP requests and responses using the `tracing` crate.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::{Middleware, MiddlewareFuture, MiddlewareOptions, Outcome, Request, Response};

/// Log level for the logging middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Log at debug level (request/response details).
    Debug,
    /// Log at info level (summary only).
    #[default]
    Info,
}

/// When the request pass of [`LoggingMiddleware`] saw the request.
#[derive(Debug, Clone, Copy)]
pub struct RequestStart(pub Instant);

/// Middleware that logs requests and responses.
///
/// The request pass stamps the outgoing request with a [`RequestStart`]
/// extension so the response pass can report the elapsed time.
///
/// # Example
///
/// ```ignore
/// use openfetch::Client;
/// use openfetch::middleware::LoggingMiddleware;
///
/// let client = Client::builder("https://petstore.example.com")
///     .middleware(LoggingMiddleware::new())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware {
    level: LogLevel,
}

impl LoggingMiddleware {
    /// Create a new logging middleware with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logging middleware that logs at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// Configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl Middleware for LoggingMiddleware {
    fn name(&self) -> &str {
        "logging"
    }

    fn on_request<'a>(
        &'a self,
        request: &'a Request,
        _options: &'a MiddlewareOptions,
    ) -> MiddlewareFuture<'a> {
        let method = request.method();
        let url = request.url();
        let route = request.path_template().map(ToString::to_string);

        match self.level {
            LogLevel::Debug => {
                debug!(
                    %method,
                    %url,
                    route = route.as_deref(),
                    headers = ?request.headers(),
                    "sending request"
                );
            }
            LogLevel::Info => {
                info!(%method, %url, "sending request");
            }
        }

        let stamped = request
            .to_builder()
            .extension(RequestStart(Instant::now()))
            .build();
        Box::pin(async move { Ok(Outcome::request(stamped)) })
    }

    fn on_response<'a>(
        &'a self,
        request: &'a Request,
        response: &'a Response,
        _options: &'a MiddlewareOptions,
    ) -> MiddlewareFuture<'a> {
        // Saturating conversion to u64 (truncates after ~584 million years)
        let elapsed_ms = request
            .extensions()
            .get::<RequestStart>()
            .map(|start| u64::try_from(start.0.elapsed().as_millis()).unwrap_or(u64::MAX));
        let status = response.status();

        if response.is_success() {
            info!(status, elapsed_ms, "request completed");
        } else {
            warn!(status, elapsed_ms, "request failed with HTTP error");
        }
        if self.level == LogLevel::Debug {
            debug!(headers = ?response.headers(), "response headers");
        }

        Box::pin(async { Ok(Outcome::NoChange) })
    }
}
