//! Request-side types: methods, payloads, and response decoding modes.

use std::fmt;

use serde::Serialize;

/// HTTP methods supported by [`Client`](crate::Client).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the equivalent `reqwest` method.
    #[must_use]
    pub fn as_method(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// A request body.
///
/// # Example
///
/// ```rust
/// use http_utils::Payload;
/// use serde_json::json;
///
/// let payload = Payload::from(json!({"a": "b"}));
/// assert_eq!(payload.into_bytes(), br#"{"a":"b"}"#.to_vec());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// A UTF-8 body sent as-is.
    Text(String),
    /// Raw bytes sent as-is.
    Bytes(Vec<u8>),
    /// A JSON document, serialized when the request is built.
    Json(serde_json::Value),
}

impl Payload {
    /// Serializes `value` into a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error if `value` cannot be represented as
    /// JSON (for example a map with non-string keys).
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Json)
    }

    /// Returns the bytes that go on the wire.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.into_bytes(),
            Self::Bytes(bytes) => bytes,
            // Serializing a `Value` cannot fail.
            Self::Json(value) => serde_json::to_vec(&value).unwrap_or_default(),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// How a successful response body is decoded.
///
/// Exactly one decoder runs per response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Decoding {
    /// Plain `serde_json` decoding.
    #[default]
    PlainJson,
    /// Lenient protobuf JSON mapping: lowerCamelCase member names are
    /// accepted for snake_case fields and `null` members count as absent.
    Structured,
}
