//! Body serialization utilities.
//!
//! Request bodies are held as [`serde_json::Value`] until the dispatcher hands
//! them to the effective [`BodySerializer`].

use bytes::Bytes;
use serde_json::Value;

use crate::Result;

/// Turns a request body into wire bytes.
///
/// The declared [`content_type`](Self::content_type) becomes the built-in
/// default `Content-Type` header, which any configured header overrides.
/// Closures `Fn(&Value) -> Result<Bytes>` implement this trait and declare no
/// content type.
pub trait BodySerializer: Send + Sync {
    /// Serialize the body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be represented in this format.
    fn serialize(&self, body: &Value) -> Result<Bytes>;

    /// Content type produced by this serializer.
    fn content_type(&self) -> Option<ContentType> {
        None
    }
}

impl<F> BodySerializer for F
where
    F: Fn(&Value) -> Result<Bytes> + Send + Sync,
{
    fn serialize(&self, body: &Value) -> Result<Bytes> {
        self(body)
    }
}

/// Serializes bodies as JSON. This is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBodySerializer;

impl BodySerializer for JsonBodySerializer {
    fn serialize(&self, body: &Value) -> Result<Bytes> {
        to_json(body)
    }

    fn content_type(&self) -> Option<ContentType> {
        Some(ContentType::Json)
    }
}

/// Serializes flat object bodies as `application/x-www-form-urlencoded`.
///
/// Array fields become repeated keys (`tags=a&tags=b`).
#[derive(Debug, Clone, Copy, Default)]
pub struct FormBodySerializer;

impl BodySerializer for FormBodySerializer {
    fn serialize(&self, body: &Value) -> Result<Bytes> {
        to_form(body)
    }

    fn content_type(&self) -> Option<ContentType> {
        Some(ContentType::FormUrlEncoded)
    }
}

/// Content type for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
    /// Plain text content type (`text/plain`).
    PlainText,
    /// Binary content type (`application/octet-stream`).
    OctetStream,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::PlainText => "text/plain",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use openfetch_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct NewPet { name: String }
///
/// let pet = NewPet { name: "Rex".to_string() };
/// let bytes = to_json(&pet).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"name":"Rex"}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to form URL-encoded bytes.
///
/// Sequences become repeated fields (`tags=a&tags=b`); nested maps are
/// rejected by `serde_html_form`.
///
/// # Errors
///
/// Returns an error if form serialization fails.
///
/// # Example
///
/// ```
/// use openfetch_core::to_form;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Login { username: String, password: String }
///
/// let login = Login { username: "alice".to_string(), password: "secret".to_string() };
/// let bytes = to_form(&login).expect("serialize");
/// assert_eq!(bytes.as_ref(), b"username=alice&password=secret");
/// ```
pub fn to_form<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_html_form::to_string(value)
        .map(|s| Bytes::from(s.into_bytes()))
        .map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` to provide detailed error messages that include
/// the exact path to the field that failed to deserialize.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., "user.address.city").
///
/// # Example
///
/// ```
/// use openfetch_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct User { name: String }
///
/// let bytes = br#"{"name":"Alice"}"#;
/// let user: User = from_json(bytes).expect("deserialize");
/// assert_eq!(user, User { name: "Alice".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_as_str() {
        assert_eq!(ContentType::Json.as_str(), "application/json");
        assert_eq!(
            ContentType::FormUrlEncoded.as_str(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(ContentType::PlainText.as_str(), "text/plain");
        assert_eq!(
            ContentType::OctetStream.as_str(),
            "application/octet-stream"
        );
    }

    #[test]
    fn content_type_display() {
        assert_eq!(ContentType::Json.to_string(), "application/json");
    }

    #[test]
    fn json_body_serializer() {
        let body = serde_json::json!({"name": "Alice", "tags": ["a"]});
        let bytes = JsonBodySerializer.serialize(&body).expect("serialize");
        assert_eq!(bytes.as_ref(), br#"{"name":"Alice","tags":["a"]}"#);
        assert_eq!(JsonBodySerializer.content_type(), Some(ContentType::Json));
    }

    #[test]
    fn form_body_serializer() {
        let body = serde_json::json!({"username": "alice", "scope": ["read", "write"]});
        let bytes = FormBodySerializer.serialize(&body).expect("serialize");
        assert_eq!(bytes.as_ref(), b"username=alice&scope=read&scope=write");
        assert_eq!(
            FormBodySerializer.content_type(),
            Some(ContentType::FormUrlEncoded)
        );
    }

    #[test]
    fn form_body_serializer_rejects_nested_objects() {
        let body = serde_json::json!({"user": {"name": "alice"}});
        let err = FormBodySerializer.serialize(&body).expect_err("nested");
        assert!(matches!(err, crate::Error::FormSerialization(_)));
    }

    #[test]
    fn closure_body_serializer() {
        let serializer =
            |body: &Value| -> Result<Bytes> { Ok(Bytes::from(body.to_string().to_uppercase())) };
        let bytes = serializer.serialize(&serde_json::json!("abc")).expect("serialize");
        assert_eq!(bytes.as_ref(), br#""ABC""#);
        assert_eq!(BodySerializer::content_type(&serializer), None);
    }

    #[test]
    fn from_json_deserialize() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct User {
            name: String,
            age: u32,
        }

        let bytes = br#"{"name":"Alice","age":30}"#;
        let user: User = from_json(bytes).expect("deserialize");

        assert_eq!(
            user,
            User {
                name: "Alice".to_string(),
                age: 30,
            }
        );
    }

    #[test]
    fn from_json_syntax_error() {
        #[derive(Debug, serde::Deserialize)]
        struct User {
            #[allow(dead_code)]
            name: String,
        }

        let bytes = b"not json";
        let result: Result<User> = from_json(bytes);

        assert!(result.is_err());
        let err = result.expect_err("should fail");
        // Syntax errors have empty path
        assert!(err.to_string().contains("JSON deserialization error"));
    }

    #[test]
    fn from_json_missing_field_error_with_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Address {
            #[allow(dead_code)]
            city: String,
        }

        #[derive(Debug, serde::Deserialize)]
        struct User {
            #[allow(dead_code)]
            address: Address,
        }

        // Missing 'city' field inside 'address'
        let bytes = br#"{"address":{}}"#;
        let result: Result<User> = from_json(bytes);

        assert!(result.is_err());
        let err = result.expect_err("should fail");
        let msg = err.to_string();
        // Should include the path context and mention the missing field
        assert!(
            msg.contains("address"),
            "Expected path 'address' in error: {msg}"
        );
        assert!(
            msg.contains("city"),
            "Expected field 'city' mentioned in error: {msg}"
        );
    }
}
