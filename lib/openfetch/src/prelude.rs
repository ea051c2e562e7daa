//! Prelude module for convenient imports.
//!
//! ```ignore
//! use openfetch::prelude::*;
//! ```

pub use crate::{
    CallOptions, Client, Error, FetchResult, Fetcher, HeaderPatch, HttpClient, HyperClient,
    Method, Middleware, MiddlewareOptions, Outcome, Params, ParseAs, Payload, Request, Response,
    Result,
};

pub use serde::{Deserialize, Serialize};
