//! HTTP response handling.
//!
//! [`Response`] exposes status, headers and a [`Body`]. A body is either
//! buffered bytes or a stream that is only read when a reader asks for it.
//! Cloning a response is the defensive copy: clones share the body, the first
//! reader buffers it, and every later reader gets the same bytes.
//!
//! # Example
//!
//! ```ignore
//! let pet: Pet = response.clone().json().await?;
//! let raw = response.text().await?;
//! ```

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use futures_core::Stream;
use futures_util::StreamExt;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};
use tokio::sync::Mutex;

use crate::{Error, Result};

/// A body as a stream of chunks.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Body of a [`Response`].
#[derive(Clone)]
pub struct Body {
    inner: BodyInner,
}

#[derive(Clone)]
enum BodyInner {
    Full(Bytes),
    Lazy(Arc<Mutex<LazyBody>>),
}

enum LazyBody {
    Unread(BodyStream),
    Buffered(Bytes),
    Failed(String),
    Streamed,
}

impl Body {
    /// A body that is already in memory.
    #[must_use]
    pub fn full(bytes: impl Into<Bytes>) -> Self {
        Self {
            inner: BodyInner::Full(bytes.into()),
        }
    }

    /// A body read from `stream` on first demand.
    #[must_use]
    pub fn from_stream(stream: BodyStream) -> Self {
        Self {
            inner: BodyInner::Lazy(Arc::new(Mutex::new(LazyBody::Unread(stream)))),
        }
    }

    /// Reads the whole body.
    ///
    /// The first read of a streamed body collects it; clones sharing the body
    /// then see the buffered bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream fails, or if the unread stream was
    /// already handed over by [`Body::into_stream`].
    pub async fn bytes(self) -> Result<Bytes> {
        let shared = match self.inner {
            BodyInner::Full(bytes) => return Ok(bytes),
            BodyInner::Lazy(shared) => shared,
        };

        let mut state = shared.lock().await;
        match std::mem::replace(&mut *state, LazyBody::Streamed) {
            LazyBody::Unread(stream) => match collect(stream).await {
                Ok(bytes) => {
                    *state = LazyBody::Buffered(bytes.clone());
                    Ok(bytes)
                }
                Err(err) => {
                    *state = LazyBody::Failed(err.to_string());
                    Err(err)
                }
            },
            LazyBody::Buffered(bytes) => {
                *state = LazyBody::Buffered(bytes.clone());
                Ok(bytes)
            }
            LazyBody::Failed(message) => {
                let err =
                    Error::connection(format!("body unavailable after a failed read: {message}"));
                *state = LazyBody::Failed(message);
                Err(err)
            }
            LazyBody::Streamed => Err(Error::invalid_request(
                "response body was already handed over as a stream",
            )),
        }
    }

    /// Hands the body over as a stream of chunks.
    ///
    /// An unread streamed body is passed through as is, and clones sharing it
    /// can no longer read it. A buffered body yields a single chunk.
    #[must_use]
    pub fn into_stream(self) -> BodyStream {
        let shared = match self.inner {
            BodyInner::Full(bytes) => return single_chunk(bytes),
            BodyInner::Lazy(shared) => shared,
        };

        if let Ok(mut state) = shared.try_lock() {
            match std::mem::replace(&mut *state, LazyBody::Streamed) {
                LazyBody::Unread(stream) => return stream,
                LazyBody::Buffered(bytes) => {
                    *state = LazyBody::Buffered(bytes.clone());
                    return single_chunk(bytes);
                }
                other => *state = other,
            }
        }

        // Another reader holds the body, or it cannot be read any more.
        let body = Self {
            inner: BodyInner::Lazy(shared),
        };
        Box::pin(futures_util::stream::once(body.bytes()))
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::full(bytes)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            BodyInner::Full(bytes) => f.debug_tuple("Full").field(&bytes.len()).finish(),
            BodyInner::Lazy(_) => f.write_str("Lazy"),
        }
    }
}

async fn collect(mut stream: BodyStream) -> Result<Bytes> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer.freeze())
}

fn single_chunk(bytes: Bytes) -> BodyStream {
    let chunks = if bytes.is_empty() {
        Vec::new()
    } else {
        vec![Ok(bytes)]
    };
    Box::pin(futures_util::stream::iter(chunks))
}

/// Raw bytes paired with their declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    content_type: Option<String>,
    bytes: Bytes,
}

impl Blob {
    /// Creates a blob.
    #[must_use]
    pub fn new(content_type: Option<String>, bytes: Bytes) -> Self {
        Self {
            content_type,
            bytes,
        }
    }

    /// Media type from the response `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Blob contents.
    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Number of bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the blob has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    body: Body,
}

impl Response {
    /// Creates a response with a body already in memory.
    #[must_use]
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self::with_body(status, headers, Body::full(body))
    }

    /// Creates a response whose body is read from `stream` on first demand.
    #[must_use]
    pub fn streaming(status: u16, headers: HeaderMap, stream: BodyStream) -> Self {
        Self::with_body(status, headers, Body::from_stream(stream))
    }

    /// Creates a response from its parts.
    #[must_use]
    pub const fn with_body(status: u16, headers: HeaderMap, body: Body) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
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

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Status is 204, or the `Content-Length` header is exactly `0`.
    #[must_use]
    pub fn is_empty_content(&self) -> bool {
        self.status == 204
            || self
                .headers
                .get(CONTENT_LENGTH)
                .is_some_and(|length| length.as_bytes() == b"0")
    }

    /// Deserialize the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be read or deserialization fails.
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        let bytes = self.body.bytes().await?;
        crate::from_json(&bytes)
    }

    /// Read the body as text, replacing invalid UTF-8 sequences.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be read.
    pub async fn text(self) -> Result<String> {
        let bytes = self.body.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read the body as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be read.
    pub async fn bytes(self) -> Result<Bytes> {
        self.body.bytes().await
    }

    /// Read the body as a [`Blob`] typed by the `Content-Type` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be read.
    pub async fn blob(self) -> Result<Blob> {
        let content_type = self
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let bytes = self.body.bytes().await?;
        Ok(Blob::new(content_type, bytes))
    }

    /// Hand the body over as a stream of chunks, see [`Body::into_stream`].
    #[must_use]
    pub fn into_stream(self) -> BodyStream {
        self.body.into_stream()
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, HeaderMap, Body) {
        (self.status, self.headers, self.body)
    }
}

#[cfg(test)]
mod tests {
    use futures_util::stream;
    use http::header::HeaderValue;

    use super::*;

    fn with_header(name: http::header::HeaderName, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    fn chunked(chunks: &[&'static str]) -> BodyStream {
        let chunks: Vec<Result<Bytes>> = chunks
            .iter()
            .map(|chunk| Ok(Bytes::from_static(chunk.as_bytes())))
            .collect();
        Box::pin(stream::iter(chunks))
    }

    #[test]
    fn response_basic() {
        let response = Response::new(
            200,
            with_header(CONTENT_TYPE, "application/json"),
            r#"{"id":1}"#,
        );

        assert_eq!(response.status(), 200);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert!(response.is_success());
        assert!(!response.is_client_error());
        assert!(!response.is_server_error());
    }

    #[test]
    fn response_status_checks() {
        assert!(Response::new(404, HeaderMap::new(), Bytes::new()).is_client_error());
        assert!(Response::new(500, HeaderMap::new(), Bytes::new()).is_server_error());
        assert!(!Response::new(302, HeaderMap::new(), Bytes::new()).is_success());
    }

    #[test]
    fn response_empty_content() {
        assert!(Response::new(204, HeaderMap::new(), Bytes::new()).is_empty_content());
        assert!(Response::new(200, with_header(CONTENT_LENGTH, "0"), Bytes::new()).is_empty_content());
        assert!(!Response::new(200, with_header(CONTENT_LENGTH, "2"), "{}").is_empty_content());
        assert!(!Response::new(200, HeaderMap::new(), Bytes::new()).is_empty_content());
    }

    #[tokio::test]
    async fn response_json() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Pet {
            id: u64,
            name: String,
        }

        let response = Response::new(200, HeaderMap::new(), r#"{"id":1,"name":"Rex"}"#);

        let pet: Pet = response.json().await.expect("deserialize");
        assert_eq!(
            pet,
            Pet {
                id: 1,
                name: "Rex".to_string()
            }
        );
    }

    #[tokio::test]
    async fn response_text_is_lossy() {
        let response = Response::new(200, HeaderMap::new(), Bytes::from_static(b"ok \xFF"));
        assert_eq!(response.text().await.expect("text"), "ok \u{FFFD}");
    }

    #[tokio::test]
    async fn clone_is_a_defensive_copy() {
        let response = Response::new(200, HeaderMap::new(), "Hello, World!");
        let copy = response.clone();

        assert_eq!(copy.text().await.expect("text"), "Hello, World!");
        assert_eq!(
            response.bytes().await.expect("bytes"),
            Bytes::from_static(b"Hello, World!")
        );
    }

    #[tokio::test]
    async fn streamed_clone_buffers_for_every_reader() {
        let response = Response::streaming(200, HeaderMap::new(), chunked(&["Hello, ", "World!"]));
        let copy = response.clone();

        assert_eq!(copy.text().await.expect("text"), "Hello, World!");
        assert_eq!(response.clone().text().await.expect("text"), "Hello, World!");

        let chunks: Vec<_> = response.into_stream().collect().await;
        assert_eq!(chunks.len(), 1);
    }

    #[tokio::test]
    async fn unread_stream_is_handed_over_without_waiting_for_the_end() {
        let open_ended =
            stream::iter(vec![Ok::<_, Error>(Bytes::from_static(b"hello"))]).chain(stream::pending());
        let response = Response::streaming(200, HeaderMap::new(), Box::pin(open_ended));
        let copy = response.clone();

        let mut body = response.into_stream();
        let first = body.next().await.expect("first chunk").expect("ok");
        assert_eq!(first, Bytes::from_static(b"hello"));

        let err = copy.bytes().await.expect_err("stream already taken");
        assert!(err.to_string().contains("handed over as a stream"), "{err}");
    }

    #[tokio::test]
    async fn failed_stream_read_is_reported_to_every_reader() {
        let failing: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"par")),
            Err(Error::connection("reset by peer")),
        ];
        let response = Response::streaming(200, HeaderMap::new(), Box::pin(stream::iter(failing)));
        let copy = response.clone();

        let err = response.text().await.expect_err("read failure");
        assert!(err.is_connection());

        let err = copy.text().await.expect_err("read failure is sticky");
        assert!(err.to_string().contains("reset by peer"), "{err}");
    }

    #[tokio::test]
    async fn response_blob_keeps_content_type() {
        let response = Response::new(200, with_header(CONTENT_TYPE, "image/png"), vec![1_u8, 2, 3]);
        let blob = response.blob().await.expect("blob");

        assert_eq!(blob.content_type(), Some("image/png"));
        assert_eq!(blob.len(), 3);
    }

    #[tokio::test]
    async fn response_into_stream_yields_body() {
        let response = Response::new(200, HeaderMap::new(), "chunk");
        let chunks: Vec<_> = response.into_stream().collect().await;

        assert_eq!(chunks.len(), 1);
        let first = chunks.into_iter().next().expect("chunk").expect("ok");
        assert_eq!(first, Bytes::from_static(b"chunk"));

        let empty = Response::new(200, HeaderMap::new(), Bytes::new());
        assert_eq!(empty.into_stream().count().await, 0);
    }
}
