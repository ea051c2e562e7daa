//! Error types for openfetch.
//!
//! Only failures that abort a call live here. A well-formed response with a
//! non-2xx status is not an [`Error`]: it is normalized into
//! [`FetchResult::Error`](crate::FetchResult::Error).

use derive_more::{Display, Error, From};

use crate::Phase;

/// Main error type for openfetch operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// A middleware returned a replacement of the wrong kind for its phase.
    #[display("middleware `{middleware}` must return a new {phase} when modifying the {phase}")]
    #[from(skip)]
    MiddlewareContract {
        /// Name of the offending middleware.
        #[error(not(source))]
        middleware: String,
        /// Pipeline phase during which the violation happened.
        #[error(not(source))]
        phase: Phase,
    },

    /// A middleware deliberately aborted the call.
    #[display("middleware error: {_0}")]
    #[from(skip)]
    Middleware(#[error(not(source))] String),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// Header name or value rejected while merging headers.
    #[display("invalid header `{name}`: {message}")]
    #[from(skip)]
    InvalidHeader {
        /// Header name as supplied.
        #[error(not(source))]
        name: String,
        /// Reason the header was rejected.
        #[error(not(source))]
        message: String,
    },

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_html_form::ser::Error),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a middleware contract violation.
    #[must_use]
    pub fn middleware_contract(middleware: impl Into<String>, phase: Phase) -> Self {
        Self::MiddlewareContract {
            middleware: middleware.into(),
            phase,
        }
    }

    /// Create an error for a middleware that aborts the call.
    #[must_use]
    pub fn middleware(message: impl Into<String>) -> Self {
        Self::Middleware(message.into())
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an invalid header error.
    #[must_use]
    pub fn invalid_header(name: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if a middleware broke the replacement contract.
    #[must_use]
    pub const fn is_middleware_contract(&self) -> bool {
        matches!(self, Self::MiddlewareContract { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::middleware_contract("auth", Phase::Request);
        assert_eq!(
            err.to_string(),
            "middleware `auth` must return a new request when modifying the request"
        );

        let err = Error::middleware_contract("cache", Phase::Response);
        assert_eq!(
            err.to_string(),
            "middleware `cache` must return a new response when modifying the response"
        );

        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "connection error: failed to connect");

        let err = Error::invalid_header("x bad", "invalid HTTP header name");
        assert_eq!(
            err.to_string(),
            "invalid header `x bad`: invalid HTTP header name"
        );

        let err = Error::json_deserialization("user.address.city", "missing field `city`");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'user.address.city': missing field `city`"
        );
    }

    #[test]
    fn error_predicates() {
        assert!(Error::connection("refused").is_connection());
        assert!(!Error::tls("bad cert").is_connection());

        assert!(Error::middleware_contract("m", Phase::Request).is_middleware_contract());
        assert!(!Error::middleware("stop").is_middleware_contract());
    }

    #[test]
    fn error_from_url_parse() {
        let err: Error = url::Url::parse("not a url").expect_err("invalid").into();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
