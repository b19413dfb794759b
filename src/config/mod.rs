//! Client configuration.
//!
//! A [`ClientConfig`] is assembled by applying an ordered list of
//! [`ConfigOption`]s. Options never stop each other: a failing option appends
//! its error to an internal [`ErrorChain`] and application continues. The
//! accumulated failures surface once, when the configuration is validated.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use http_utils::ClientConfig;
//!
//! let config = ClientConfig::builder()
//!     .base_url("api.example.com")
//!     .request_timeout(Duration::from_secs(10))
//!     .retry()
//!     .max_retry_attempts(3)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url().unwrap().to_string(), "https://api.example.com:443/");
//! assert!(config.retry_on_failure());
//! ```
//!
//! Multiple failures are reported together:
//!
//! ```rust
//! use http_utils::{ClientConfig, ConfigError};
//!
//! let errors = ClientConfig::builder()
//!     .base_url("")
//!     .base_url("http://[::1")
//!     .build()
//!     .unwrap_err();
//!
//! assert_eq!(errors.len(), 2);
//! assert!(errors.contains(&ConfigError::MissingBaseUrl));
//! ```

mod base_url;

pub use base_url::{normalize_base_url, BaseUrl};

use std::time::Duration;

use tracing::Dispatch;
use url::Url;

use crate::error::{ConfigError, ErrorChain};

/// A single configuration step.
///
/// Options are applied in order; later options overwrite fields set by
/// earlier ones.
#[derive(Clone, Debug)]
pub enum ConfigOption {
    /// Validates and normalizes the base URL.
    BaseUrl(String),
    /// Overall request timeout.
    RequestTimeout(Duration),
    /// TLS handshake timeout.
    TlsHandshakeTimeout(Duration),
    /// Proxy for outbound requests.
    ProxyUrl(Url),
    /// Marks the client as retry-enabled.
    Retry,
    /// Maximum number of retry attempts.
    MaxRetryAttempts(u32),
    /// Logger handle for components built from this configuration.
    Logger(Dispatch),
}

/// Validated client configuration.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
///
/// # Retries
///
/// `retry_on_failure` and `max_retry_attempts` are carried for callers that
/// implement their own retry policy. Dispatch never retries.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    base_url: Option<BaseUrl>,
    request_timeout: Duration,
    tls_handshake_timeout: Duration,
    proxy_url: Option<Url>,
    retry_on_failure: bool,
    max_retry_attempts: u32,
    logger: Option<Dispatch>,
    errors: Option<ErrorChain<ConfigError>>,
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Applies `options` in order and validates the result.
    ///
    /// # Errors
    ///
    /// Returns every failure produced while applying the options, most
    /// recent first.
    pub fn from_options<I>(options: I) -> Result<Self, ErrorChain<ConfigError>>
    where
        I: IntoIterator<Item = ConfigOption>,
    {
        let mut config = Self::default();
        for option in options {
            config.apply(option);
        }
        config.into_validated()
    }

    /// Applies a single option.
    ///
    /// Failures are recorded rather than returned; see
    /// [`validate`](Self::validate).
    pub fn apply(&mut self, option: ConfigOption) {
        match option {
            ConfigOption::BaseUrl(base_url) => {
                if base_url.is_empty() {
                    self.append_error(ConfigError::MissingBaseUrl);
                    return;
                }
                match normalize_base_url(&base_url) {
                    Ok(url) => self.base_url = Some(url),
                    Err(err) => self.append_error(err),
                }
            }
            ConfigOption::RequestTimeout(timeout) => self.request_timeout = timeout,
            ConfigOption::TlsHandshakeTimeout(timeout) => self.tls_handshake_timeout = timeout,
            ConfigOption::ProxyUrl(url) => self.proxy_url = Some(url),
            ConfigOption::Retry => self.retry_on_failure = true,
            ConfigOption::MaxRetryAttempts(attempts) => self.max_retry_attempts = attempts,
            ConfigOption::Logger(logger) => self.logger = Some(logger),
        }
    }

    /// Records a configuration failure.
    pub fn append_error(&mut self, err: ConfigError) {
        ErrorChain::append(&mut self.errors, err);
    }

    /// Returns the accumulated failures, if any.
    ///
    /// # Errors
    ///
    /// Returns a copy of the error chain when at least one option failed.
    pub fn validate(&self) -> Result<(), ErrorChain<ConfigError>> {
        self.errors.clone().map_or(Ok(()), Err)
    }

    fn into_validated(mut self) -> Result<Self, ErrorChain<ConfigError>> {
        match self.errors.take() {
            Some(errors) => Err(errors),
            None => Ok(self),
        }
    }

    /// Returns the normalized base URL, if configured.
    #[must_use]
    pub const fn base_url(&self) -> Option<&BaseUrl> {
        self.base_url.as_ref()
    }

    /// Returns the request timeout. Zero means unset.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns the TLS handshake timeout. Zero means unset.
    #[must_use]
    pub const fn tls_handshake_timeout(&self) -> Duration {
        self.tls_handshake_timeout
    }

    /// Returns the proxy URL, if configured.
    #[must_use]
    pub const fn proxy_url(&self) -> Option<&Url> {
        self.proxy_url.as_ref()
    }

    /// Returns whether retries were requested.
    #[must_use]
    pub const fn retry_on_failure(&self) -> bool {
        self.retry_on_failure
    }

    /// Returns the maximum number of retry attempts.
    #[must_use]
    pub const fn max_retry_attempts(&self) -> u32 {
        self.max_retry_attempts
    }

    /// Returns the logger handle, if configured.
    #[must_use]
    pub const fn logger(&self) -> Option<&Dispatch> {
        self.logger.as_ref()
    }
}

/// Builder for constructing [`ClientConfig`] instances.
///
/// Each method applies its option immediately, in call order, so the result
/// is identical to [`ClientConfig::from_options`] with the same sequence.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an arbitrary option.
    #[must_use]
    pub fn option(mut self, option: ConfigOption) -> Self {
        self.config.apply(option);
        self
    }

    /// Sets the base URL. Empty or unparseable values are recorded as errors.
    #[must_use]
    pub fn base_url(self, base_url: impl Into<String>) -> Self {
        self.option(ConfigOption::BaseUrl(base_url.into()))
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn request_timeout(self, timeout: Duration) -> Self {
        self.option(ConfigOption::RequestTimeout(timeout))
    }

    /// Sets the TLS handshake timeout.
    #[must_use]
    pub fn tls_handshake_timeout(self, timeout: Duration) -> Self {
        self.option(ConfigOption::TlsHandshakeTimeout(timeout))
    }

    /// Sets the proxy URL.
    #[must_use]
    pub fn proxy_url(self, url: Url) -> Self {
        self.option(ConfigOption::ProxyUrl(url))
    }

    /// Enables retries.
    #[must_use]
    pub fn retry(self) -> Self {
        self.option(ConfigOption::Retry)
    }

    /// Sets the maximum number of retry attempts.
    #[must_use]
    pub fn max_retry_attempts(self, attempts: u32) -> Self {
        self.option(ConfigOption::MaxRetryAttempts(attempts))
    }

    /// Sets the logger handle.
    #[must_use]
    pub fn logger(self, logger: Dispatch) -> Self {
        self.option(ConfigOption::Logger(logger))
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns every failure recorded by the applied options, most recent
    /// first.
    pub fn build(self) -> Result<ClientConfig, ErrorChain<ConfigError>> {
        self.config.into_validated()
    }
}
