//! HTTP-specific error types.
//!
//! - [`HttpResponseError`]: a non-2xx response, raw body included
//! - [`OptionError`]: a client option that could not be applied
//! - [`HttpError`]: unified error type returned by every dispatch
//!
//! # Example
//!
//! ```rust,ignore
//! use http_utils::HttpError;
//!
//! match client.get::<serde_json::Value>().await {
//!     Ok(body) => println!("Success: {body:?}"),
//!     Err(HttpError::Response(e)) => {
//!         println!("API error {}: {}", e.code, e.body);
//!     }
//!     Err(HttpError::Transport(e)) => println!("Network error: {e}"),
//!     Err(e) => println!("Request failed: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::error::{ConfigError, ErrorChain};

/// Error returned when a request receives a non-2xx response.
///
/// The raw response body is kept so callers can inspect whatever the server
/// sent back.
///
/// # Example
///
/// ```rust
/// use http_utils::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 404,
///     status: "Not Found".to_string(),
///     body: r#"{"error":"no such user"}"#.to_string(),
/// };
///
/// assert_eq!(error.to_string(), "HTTP 404 Not Found");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("HTTP {code} {status}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The canonical reason phrase for the status code.
    pub status: String,
    /// The raw response body.
    pub body: String,
}

/// Error recorded when a client option cannot be applied.
///
/// Option failures do not abort construction. They accumulate and are
/// reported by [`Client::validate`](crate::Client::validate) and by the first
/// dispatch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionError {
    /// A header name or value is not valid HTTP.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader {
        /// The header name as supplied.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A payload could not be serialized to JSON.
    #[error("failed to serialize payload: {reason}")]
    Payload {
        /// The serializer's message.
        reason: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request URL could not be parsed.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        /// The URL as it was handed to the parser.
        url: String,
        /// The underlying parse failure.
        #[source]
        source: url::ParseError,
    },

    /// Network or connection error.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    ResponseRead(#[source] reqwest::Error),

    /// A non-2xx response.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// The response body could not be decoded into the requested type.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// One or more client options failed to apply.
    #[error("invalid client options: {0:#}")]
    InvalidOptions(ErrorChain<OptionError>),

    /// The client configuration is invalid.
    #[error("invalid client configuration: {0:#}")]
    Config(ErrorChain<ConfigError>),
}

impl HttpError {
    /// Returns the status code if this error is a non-2xx response.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            _ => None,
        }
    }

    /// Returns the raw response body if this error is a non-2xx response.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Response(e) => Some(&e.body),
            _ => None,
        }
    }
}
