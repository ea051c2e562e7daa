//! The network-call function.
//!
//! - [`HttpClient`] - Implement this to plug a transport in
//! - [`Fetcher`] - Cheap, cloneable, type-erased handle used by the dispatcher
//!
//! Implement [`HttpClient`] directly for custom transports or testing, or wrap
//! a closure with [`Fetcher::from_fn`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Future returned by [`Fetcher::fetch`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'a>>;

/// Core HTTP client trait.
///
/// Accepts a fully built request and resolves to a response with a status,
/// headers and a body. Any status is a successful call; only transport
/// failures are errors.
pub trait HttpClient: Send + Sync + 'static {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Invalid response
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

/// Object-safe mirror of [`HttpClient`].
trait ErasedClient: Send + Sync {
    fn execute_boxed(&self, request: Request) -> FetchFuture<'_>;
}

impl<C: HttpClient> ErasedClient for C {
    fn execute_boxed(&self, request: Request) -> FetchFuture<'_> {
        Box::pin(self.execute(request))
    }
}

/// An [`HttpClient`] backed by a closure.
struct FnClient<F> {
    call: F,
}

impl<F, Fut> HttpClient for FnClient<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response>> + Send,
{
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (self.call)(request)
    }
}

/// Shared handle to the effective network-call function.
///
/// # Example
///
/// ```
/// use openfetch_core::{Fetcher, Response};
/// use openfetch_core::header::HeaderMap;
///
/// let fetcher = Fetcher::from_fn(|_request| async {
///     Ok(Response::new(204, HeaderMap::new(), ""))
/// });
/// # let _ = fetcher;
/// ```
#[derive(Clone)]
pub struct Fetcher {
    inner: Arc<dyn ErasedClient>,
}

impl Fetcher {
    /// Wraps an [`HttpClient`].
    #[must_use]
    pub fn new<C: HttpClient>(client: C) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    /// Wraps a closure returning a response future.
    #[must_use]
    pub fn from_fn<F, Fut>(call: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response>> + Send,
    {
        Self::new(FnClient { call })
    }

    /// Performs the network call.
    ///
    /// # Errors
    ///
    /// Propagates the transport error untouched.
    pub fn fetch(&self, request: Request) -> FetchFuture<'_> {
        self.inner.execute_boxed(request)
    }

    /// Returns `true` if both handles point to the same client.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher").finish_non_exhaustive()
    }
}

impl<C: HttpClient> From<C> for Fetcher {
    fn from(client: C) -> Self {
        Self::new(client)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use http::HeaderMap;

    use super::*;
    use crate::Method;

    struct Teapot;

    impl HttpClient for Teapot {
        async fn execute(&self, _request: Request) -> Result<Response> {
            Ok(Response::new(418, HeaderMap::new(), "short and stout"))
        }
    }

    fn request() -> Request {
        Request::builder(Method::Get, url::Url::parse("http://localhost/").expect("url")).build()
    }

    #[tokio::test]
    async fn fetcher_wraps_http_client() {
        let fetcher = Fetcher::new(Teapot);
        let response = fetcher.fetch(request()).await.expect("response");
        assert_eq!(response.status(), 418);
    }

    #[tokio::test]
    async fn fetcher_from_closure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let fetcher = Fetcher::from_fn(move |request: Request| {
            counter.fetch_add(1, Ordering::SeqCst);
            let path = request.url().path().to_string();
            async move { Ok(Response::new(200, HeaderMap::new(), path)) }
        });

        let response = fetcher.fetch(request()).await.expect("response");
        assert_eq!(response.text().await.expect("text"), "/");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fetcher_propagates_transport_errors() {
        let fetcher = Fetcher::from_fn(|_request| async { Err(crate::Error::connection("refused")) });
        let err = fetcher.fetch(request()).await.expect_err("transport error");
        assert!(err.is_connection());
    }

    #[test]
    fn fetcher_clone_shares_client() {
        let fetcher = Fetcher::new(Teapot);
        let clone = fetcher.clone();
        assert!(fetcher.ptr_eq(&clone));
        assert!(!fetcher.ptr_eq(&Fetcher::new(Teapot)));
    }
}
