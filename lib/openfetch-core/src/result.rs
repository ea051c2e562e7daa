//! The normalized outcome of a call.

use crate::{Payload, Response};

/// Outcome of every completed call: exactly one of `data` or `error`, always
/// alongside the response it was read from.
///
/// Network failures and middleware contract violations are not represented
/// here; they surface as [`Error`](crate::Error) instead.
///
/// # Example
///
/// ```ignore
/// match client.get("/pets/{id}", options).await? {
///     FetchResult::Data { data, .. } => println!("pet: {data:?}"),
///     FetchResult::Error { error, response } => {
///         eprintln!("{} {error:?}", response.status());
///     }
/// }
/// ```
#[derive(Debug)]
pub enum FetchResult {
    /// 2xx response.
    Data {
        /// The body, read per the effective parse mode.
        data: Payload,
        /// The response.
        response: Response,
    },
    /// Non-2xx response.
    Error {
        /// The body, parsed as JSON when possible, text otherwise.
        error: Payload,
        /// The response.
        response: Response,
    },
}

impl FetchResult {
    /// The response, for either outcome.
    #[must_use]
    pub const fn response(&self) -> &Response {
        match self {
            Self::Data { response, .. } | Self::Error { response, .. } => response,
        }
    }

    /// Returns `true` for a 2xx outcome.
    #[must_use]
    pub const fn is_data(&self) -> bool {
        matches!(self, Self::Data { .. })
    }

    /// The success payload.
    #[must_use]
    pub const fn data(&self) -> Option<&Payload> {
        match self {
            Self::Data { data, .. } => Some(data),
            Self::Error { .. } => None,
        }
    }

    /// The error payload.
    #[must_use]
    pub const fn error(&self) -> Option<&Payload> {
        match self {
            Self::Data { .. } => None,
            Self::Error { error, .. } => Some(error),
        }
    }

    /// Splits into the payload and the response.
    #[must_use]
    pub fn into_parts(self) -> (Payload, Response) {
        match self {
            Self::Data { data, response } => (data, response),
            Self::Error { error, response } => (error, response),
        }
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderMap;
    use serde_json::json;

    use super::*;

    #[test]
    fn data_outcome_accessors() {
        let result = FetchResult::Data {
            data: Payload::Json(json!({"id": 1})),
            response: Response::new(200, HeaderMap::new(), r#"{"id":1}"#),
        };

        assert!(result.is_data());
        assert!(result.error().is_none());
        assert_eq!(
            result.data().and_then(Payload::as_json),
            Some(&json!({"id": 1}))
        );
        assert_eq!(result.response().status(), 200);
    }

    #[test]
    fn error_outcome_into_parts() {
        let result = FetchResult::Error {
            error: Payload::Text("boom".to_string()),
            response: Response::new(500, HeaderMap::new(), "boom"),
        };

        assert!(!result.is_data());
        assert!(result.data().is_none());
        let (error, response) = result.into_parts();
        assert_eq!(error.as_text(), Some("boom"));
        assert_eq!(response.status(), 500);
    }
}
