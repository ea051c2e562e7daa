//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use openfetch_core::prelude::*;
//! ```

pub use crate::{
    BodySerializer, Error, FetchResult, Fetcher, HeaderPatch, HttpClient, Method, Middleware,
    MiddlewareFuture, MiddlewareOptions, Outcome, Params, ParseAs, Payload, QuerySerializer,
    Request, RequestBuilder, Response, Result,
};
