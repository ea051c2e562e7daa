//! Platform-default network function using hyper-util.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::TryStreamExt;
use http_body_util::{BodyStream, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower_service::Service;
use tracing::trace;

use crate::{Error, HttpClient, Request, Response, Result};

/// Future type for the Tower [`Service`] implementation.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'static>>;

/// Create an HTTPS connector with rustls.
///
/// This connector supports both HTTP/1.1 and HTTP/2, with TLS enabled
/// using the Mozilla root certificates. Plain `http://` URLs are allowed.
fn https_connector() -> HttpsConnector<HttpConnector> {
    let root_store: rustls::RootCertStore =
        webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();

    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build()
}

/// HTTP client using hyper-util with connection pooling and TLS.
///
/// This is the network function a [`Client`](crate::Client) falls back to when
/// none is configured. It applies no timeout and no retry. The response is
/// handed back as soon as its head arrives; the body is read on demand.
///
/// Extensions of the [`Request`] are moved onto the `http::Request` given to
/// hyper.
///
/// # Example
///
/// ```ignore
/// use openfetch::{Client, HyperClient};
///
/// let client = Client::builder("https://petstore.example.com")
///     .fetch(HyperClient::new())
///     .build();
/// ```
#[derive(Clone)]
pub struct HyperClient {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient").finish_non_exhaustive()
    }
}

impl HyperClient {
    /// Create a new client.
    #[must_use]
    pub fn new() -> Self {
        let inner = Client::builder(TokioExecutor::new()).build(https_connector());
        Self { inner }
    }

    /// Build a hyper request from an openfetch request.
    fn build_hyper_request(request: Request) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, headers, body, extensions) = request.into_parts();

        let body = body.map_or_else(Full::default, Full::new);
        let mut http_request = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str())
            .body(body)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        *http_request.headers_mut() = headers;
        *http_request.extensions_mut() = extensions;

        Ok(http_request)
    }

    async fn send(&self, request: Request) -> Result<Response> {
        let hyper_request = Self::build_hyper_request(request)?;
        trace!(uri = %hyper_request.uri(), "dispatching with hyper");

        let response = self
            .inner
            .request(hyper_request)
            .await
            .map_err(Self::map_hyper_error)?;

        let (parts, body) = response.into_parts();
        let body: crate::BodyStream = Box::pin(
            BodyStream::new(body)
                .map_ok(|frame| frame.into_data().unwrap_or_default())
                .map_err(|err| Error::connection(err.to_string())),
        );

        Ok(Response::streaming(parts.status.as_u16(), parts.headers, body))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = err.to_string();

        if err.is_connect() {
            return Error::connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for HyperClient {
    async fn execute(&self, request: Request) -> Result<Response> {
        self.send(request).await
    }
}

impl Service<Request> for HyperClient {
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let client = self.clone();
        Box::pin(async move { client.send(request).await })
    }
}

#[cfg(test)]
mod tests {
    use http::header::{ACCEPT, HeaderValue};

    use super::*;
    use crate::Method;

    #[derive(Debug, Clone, PartialEq)]
    struct Credentials(&'static str);

    #[test]
    fn hyper_request_carries_headers_body_and_extensions() {
        let url = url::Url::parse("https://api.example.com/pets?limit=1").expect("url");
        let request = Request::builder(Method::Post, url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .body(r#"{"name":"Rex"}"#)
            .extension(Credentials("include"))
            .build();

        let hyper_request = HyperClient::build_hyper_request(request).expect("hyper request");

        assert_eq!(hyper_request.method(), http::Method::POST);
        assert_eq!(
            hyper_request.uri().to_string(),
            "https://api.example.com/pets?limit=1"
        );
        assert_eq!(
            hyper_request.headers().get(ACCEPT),
            Some(&HeaderValue::from_static("application/json"))
        );
        assert_eq!(
            hyper_request.extensions().get::<Credentials>(),
            Some(&Credentials("include"))
        );
    }
}
