//! Construction options for [`Client`](crate::Client).
//!
//! Options are applied in the order supplied. Options targeting a single
//! field are last-write-wins; [`ClientOption::QueryParam`] is additive.

use std::time::Duration;

use tracing::Dispatch;

use crate::clients::http_request::Payload;

/// A single client construction step.
#[derive(Clone, Debug)]
pub enum ClientOption {
    /// Sets a header, replacing any earlier value for the same name.
    Header(String, String),
    /// Adds a query parameter. Repeated keys keep every value.
    QueryParam(String, String),
    /// Sets the request path, resolved against the target's scheme and host.
    Path(String),
    /// Replaces the HTTP sender. `None` restores the default sender.
    Transport(Option<reqwest::Client>),
    /// Per-request timeout. Zero falls back to
    /// [`DEFAULT_TIMEOUT`](crate::clients::DEFAULT_TIMEOUT).
    Timeout(Duration),
    /// Sets the request body.
    Payload(Payload),
    /// Logger handle every dispatch runs under.
    Logger(Dispatch),
    /// Selects [`Decoding::Structured`](crate::Decoding::Structured) when `true`.
    UseProto(bool),
    /// When `true`, requests go to the target URL verbatim, ignoring path
    /// and query options.
    SignedUrl(bool),
}

impl ClientOption {
    /// Shorthand for [`ClientOption::Header`].
    #[must_use]
    pub fn header(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Header(name.into(), value.into())
    }

    /// Shorthand for [`ClientOption::QueryParam`].
    #[must_use]
    pub fn query_param(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::QueryParam(key.into(), value.into())
    }

    /// Shorthand for [`ClientOption::Path`].
    #[must_use]
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Shorthand for [`ClientOption::Payload`].
    #[must_use]
    pub fn payload(payload: impl Into<Payload>) -> Self {
        Self::Payload(payload.into())
    }
}
