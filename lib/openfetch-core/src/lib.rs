//! Core types and traits for the openfetch typed HTTP request wrapper.
//!
//! This crate provides the foundational types used by openfetch:
//! - [`Method`] - HTTP method enum
//! - [`Request`] and [`RequestBuilder`] - Outgoing requests
//! - [`Response`] - Incoming responses with a lazily read body
//! - [`PathTemplate`] and [`Params`] - Route information of a call
//! - [`build_url`] and [`QuerySerializer`] - URL building
//! - [`HeaderPatch`] and [`merge_headers`] - Layered header merging
//! - [`BodySerializer`] - Request body encoding
//! - [`Middleware`] - The request/response interceptor contract
//! - [`HttpClient`] and [`Fetcher`] - The network-call function
//! - [`ParseAs`], [`Payload`] and [`FetchResult`] - Normalized results
//! - [`Error`] and [`Result`] - Error handling
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod body;
mod error;
mod fetch;
mod headers;
mod method;
pub mod middleware;
mod payload;
pub mod prelude;
mod request;
mod response;
mod result;
mod route;
mod url_builder;

pub use body::{
    BodySerializer, ContentType, FormBodySerializer, JsonBodySerializer, from_json, to_form,
    to_json,
};
pub use error::{Error, Result};
pub use fetch::{FetchFuture, Fetcher, HttpClient};
pub use headers::{HeaderEntry, HeaderPatch, merge_headers};
pub use method::Method;
pub use middleware::{
    Exchange, Middleware, MiddlewareFuture, MiddlewareOptions, Outcome, Phase,
};
pub use payload::{ParseAs, Payload};
pub use request::{Request, RequestBuilder};
pub use response::{Blob, Body, BodyStream, Response};
pub use result::FetchResult;
pub use route::{Params, PathTemplate};
pub use url_builder::{
    DefaultQuerySerializer, QuerySerializer, build_url, deep_object_path,
    default_query_serializer, encode_component, expand_path, normalize_base_url,
    serialize_query_param,
};

// Re-export http crate types for status codes, headers and pass-through options
pub use http::{Extensions, StatusCode, header};
pub use url::Url;
