//! Tower services as network functions.

use tower::ServiceExt;
use tower_service::Service;

use crate::{Error, HttpClient, Request, Response, Result};

/// Adapts a Tower [`Service`] into an [`HttpClient`].
///
/// The service is cloned for each call and driven with
/// [`oneshot`](ServiceExt::oneshot), so layers such as concurrency limits or
/// retries from the Tower ecosystem can wrap the network call.
///
/// # Example
///
/// ```ignore
/// use openfetch::{Client, HyperClient, ServiceClient};
/// use tower::ServiceBuilder;
/// use tower::limit::ConcurrencyLimitLayer;
///
/// let service = ServiceBuilder::new()
///     .layer(ConcurrencyLimitLayer::new(8))
///     .service(HyperClient::new());
///
/// let client = Client::builder("https://petstore.example.com")
///     .fetch(ServiceClient::new(service))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ServiceClient<S> {
    inner: S,
}

impl<S> ServiceClient<S> {
    /// Wraps a service.
    #[must_use]
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Get a reference to the inner service.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Consume the wrapper and return the inner service.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S> HttpClient for ServiceClient<S>
where
    S: Service<Request, Response = Response, Error = Error> + Clone + Send + Sync + 'static,
    S::Future: Send,
{
    async fn execute(&self, request: Request) -> Result<Response> {
        self.inner.clone().oneshot(request).await
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderMap;
    use tower::ServiceBuilder;

    use super::*;
    use crate::{Fetcher, Method};

    #[tokio::test]
    async fn service_client_drives_tower_stack() {
        let echo = tower::service_fn(|request: Request| async move {
            let path = request.url().path().to_string();
            Ok::<_, Error>(Response::new(200, HeaderMap::new(), path))
        });
        let service = ServiceBuilder::new()
            .map_response(|response: Response| {
                let (_, headers, body) = response.into_parts();
                Response::with_body(201, headers, body)
            })
            .service(echo);

        let fetcher = Fetcher::new(ServiceClient::new(service));
        let request = Request::builder(
            Method::Get,
            url::Url::parse("http://localhost/pets").expect("url"),
        )
        .build();

        let response = fetcher.fetch(request).await.expect("response");
        assert_eq!(response.status(), 201);
        assert_eq!(response.text().await.expect("text"), "/pets");
    }
}
