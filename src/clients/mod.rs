//! HTTP client types.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`Client`]: the HTTP client wrapper, built from a target URL and options
//! - [`ClientBuilder`]: fluent construction of a [`Client`]
//! - [`ClientOption`]: a single construction step
//! - [`Payload`]: request body from text, bytes, or JSON
//! - [`Decoding`]: plain JSON or structured (protobuf JSON) decoding
//! - [`HttpError`]: unified error type for dispatch
//!
//! # Example
//!
//! ```rust,ignore
//! use http_utils::{Client, ClientOption};
//!
//! let client = Client::new(
//!     "https://api.example.com",
//!     [
//!         ClientOption::path("/api/v1/post"),
//!         ClientOption::payload(r#"{"field1":"value1"}"#),
//!     ],
//! );
//!
//! let created: Option<serde_json::Value> = client.post().await?;
//! ```
//!
//! # Retries
//!
//! Requests are sent exactly once. [`ClientConfig`](crate::ClientConfig)
//! carries retry settings for callers that implement their own policy.

mod decode;
mod errors;
mod http_client;
mod http_request;
mod options;
mod transport;

pub use errors::{HttpError, HttpResponseError, OptionError};
pub use http_client::{Client, ClientBuilder, DEFAULT_TIMEOUT};
pub use http_request::{Decoding, HttpMethod, Payload};
pub use options::ClientOption;
pub use transport::build_transport;
