//! Parse modes and the payloads they produce.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use derive_more::Display;
use serde_json::Value;

use crate::{Blob, BodyStream, Response, Result};

/// How a successful response body is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum ParseAs {
    /// Parse as JSON, falling back to text if the body is not valid JSON.
    #[default]
    #[display("json")]
    Json,
    /// Read as text.
    #[display("text")]
    Text,
    /// Read as raw bytes.
    #[display("arrayBuffer")]
    ArrayBuffer,
    /// Read as bytes typed by the `Content-Type` header.
    #[display("blob")]
    Blob,
    /// Hand the body over unread.
    #[display("stream")]
    Stream,
}

impl ParseAs {
    /// Reads `response` according to this mode.
    ///
    /// JSON that fails to parse degrades to [`Payload::Text`]. The stream mode
    /// hands the body over without reading it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the body itself cannot be read.
    pub async fn read(self, response: Response) -> Result<Payload> {
        let payload = match self {
            Self::Json => {
                let bytes = response.bytes().await?;
                match crate::from_json::<Value>(&bytes) {
                    Ok(value) => Payload::Json(value),
                    Err(_) => Payload::Text(String::from_utf8_lossy(&bytes).into_owned()),
                }
            }
            Self::Text => Payload::Text(response.text().await?),
            Self::ArrayBuffer => Payload::Bytes(response.bytes().await?),
            Self::Blob => Payload::Blob(response.blob().await?),
            Self::Stream => Payload::Stream(response.into_stream()),
        };
        Ok(payload)
    }
}

/// Maps a reader name to its mode. Unknown names read as text.
impl From<&str> for ParseAs {
    fn from(name: &str) -> Self {
        match name {
            "json" => Self::Json,
            "arrayBuffer" => Self::ArrayBuffer,
            "blob" => Self::Blob,
            "stream" => Self::Stream,
            _ => Self::Text,
        }
    }
}

impl FromStr for ParseAs {
    type Err = std::convert::Infallible;

    fn from_str(name: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(name))
    }
}

/// A read response body, carried as `data` or `error` of a
/// [`FetchResult`](crate::FetchResult).
pub enum Payload {
    /// No content (204 or `Content-Length: 0`). Decodes as `{}`.
    Empty,
    /// Parsed JSON.
    Json(Value),
    /// Text.
    Text(String),
    /// Raw bytes.
    Bytes(Bytes),
    /// Bytes with their media type.
    Blob(Blob),
    /// Unread body.
    Stream(BodyStream),
}

impl Payload {
    /// Returns `true` for [`Payload::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The JSON value, if this payload was parsed as JSON.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The text, if this payload was read as text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The raw bytes, for byte and blob payloads.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Blob(blob) => Some(blob.bytes()),
            _ => None,
        }
    }

    /// Takes the stream out of a [`Payload::Stream`].
    #[must_use]
    pub fn into_stream(self) -> Option<BodyStream> {
        match self {
            Self::Stream(stream) => Some(stream),
            _ => None,
        }
    }

    /// Decodes the payload into `T` as JSON.
    ///
    /// Text and byte payloads are parsed; an empty payload decodes from `{}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid JSON for `T`, or is a
    /// stream.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        match self {
            Self::Empty => crate::from_json(b"{}"),
            Self::Json(value) => serde_path_to_error::deserialize(value).map_err(|err| {
                crate::Error::json_deserialization(err.path().to_string(), err.inner().to_string())
            }),
            Self::Text(text) => crate::from_json(text.as_bytes()),
            Self::Bytes(bytes) => crate::from_json(bytes),
            Self::Blob(blob) => crate::from_json(blob.bytes()),
            Self::Stream(_) => Err(crate::Error::invalid_request(
                "a streamed payload must be read from its stream",
            )),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(bytes).finish(),
            Self::Blob(blob) => f.debug_tuple("Blob").field(blob).finish(),
            Self::Stream(_) => f.debug_tuple("Stream").finish_non_exhaustive(),
        }
    }
}
