//! # HTTP Utils
//!
//! A configurable HTTP client wrapper. A [`Client`] is assembled from a
//! target URL and an ordered list of options (path, query parameters,
//! headers, payload, decoding mode), issues the request, and decodes a 2xx
//! response into a caller-supplied type. Non-2xx responses and transport
//! failures come back as a structured [`HttpError`].
//!
//! A second layer, [`ClientConfig`], builds validated client configuration
//! (normalized base URL, timeouts, proxy, retry settings) from options,
//! collecting every validation failure into one [`ErrorChain`].
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use http_utils::{logger, Client, ClientOption};
//!
//! let log = logger::init(logger::DEFAULT_LOG_LEVEL)?;
//!
//! let client = Client::new(
//!     "https://api.example.com",
//!     [
//!         ClientOption::path("/api/v1/post"),
//!         ClientOption::header("Content-Type", "application/json"),
//!         ClientOption::payload(r#"{"field1":"value1","field2":"value2"}"#),
//!         ClientOption::Logger(log),
//!     ],
//! );
//!
//! let response: Option<serde_json::Value> = client.post().await?;
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use std::time::Duration;
//! use http_utils::{ClientConfig, ConfigError};
//!
//! let config = ClientConfig::builder()
//!     .base_url("api.example.com")
//!     .request_timeout(Duration::from_secs(30))
//!     .build()
//!     .unwrap();
//! assert_eq!(config.base_url().unwrap().port(), 443);
//!
//! let errors = ClientConfig::builder().base_url("").build().unwrap_err();
//! assert!(errors.is(&ConfigError::MissingBaseUrl));
//! ```
//!
//! ## Design Principles
//!
//! - **No implicit global state**: loggers are explicit handles injected into
//!   each component
//! - **Deferred validation**: option failures accumulate and surface together
//! - **Immutable clients**: a [`Client`] is read-only after construction
//! - **Thread-safe**: all types are `Send + Sync`

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;

pub use config::{BaseUrl, ClientConfig, ClientConfigBuilder, ConfigOption};
pub use error::{ConfigError, ErrorChain};

pub use clients::{
    build_transport, Client, ClientBuilder, ClientOption, Decoding, HttpError, HttpMethod,
    HttpResponseError, OptionError, Payload,
};
