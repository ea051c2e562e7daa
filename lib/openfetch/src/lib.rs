//! Typed HTTP request wrapper for Rust.
//!
//! Give it a path template, parameters, a body and a chain of interceptors;
//! it builds one well-formed request, sends it, and normalizes the outcome
//! into either `data` or `error`, always alongside the response.
//!
//! # Example
//!
//! ```ignore
//! use openfetch::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Pet {
//!     id: u64,
//!     name: String,
//! }
//!
//! let client = Client::builder("https://petstore.example.com/v1").build();
//!
//! let result = client
//!     .get("/pets/{petId}", Params::new().path("petId", 42))
//!     .await?;
//!
//! if let FetchResult::Data { data, .. } = result {
//!     let pet: Pet = data.json()?;
//! }
//! ```

mod client;
mod config;
mod dispatch;
mod hyper_client;
pub mod middleware;
mod options;
pub mod prelude;
mod service;

pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use hyper_client::{HyperClient, ServiceFuture};
pub use options::CallOptions;
pub use service::ServiceClient;

// Re-export tower for network-function composition
pub use tower;

// Re-export core types
pub use openfetch_core::{
    Blob, Body, BodySerializer, BodyStream, ContentType, DefaultQuerySerializer, Error, Exchange,
    FetchFuture, FetchResult, Fetcher, FormBodySerializer, HeaderEntry, HeaderPatch, HttpClient,
    JsonBodySerializer, Method, Middleware, MiddlewareFuture, MiddlewareOptions, Outcome, Params,
    ParseAs, PathTemplate, Payload, Phase, QuerySerializer, Request, RequestBuilder, Response,
    Result, build_url, deep_object_path, default_query_serializer, encode_component,
    expand_path, from_json, merge_headers, normalize_base_url, serialize_query_param, to_form,
    to_json,
};

// Re-export http types for status codes, headers and pass-through options
pub use openfetch_core::{Extensions, StatusCode, Url, header};
