//! Base URL normalization.
//!
//! Users frequently hand over a bare DNS name (`api.example.com`) or a URL
//! without a port. [`normalize_base_url`] turns either into a [`BaseUrl`]
//! carrying an explicit scheme and port.

use std::fmt;

use url::{Position, Url};

use crate::error::ConfigError;

/// A fully qualified base URL with an explicit port.
///
/// The `url` crate drops a scheme's default port from its serialization, so
/// the resolved port is kept alongside the parsed URL and rendered explicitly
/// by [`authority`](Self::authority) and `Display`.
///
/// # Example
///
/// ```rust
/// use http_utils::config::normalize_base_url;
///
/// let url = normalize_base_url("api.example.com/v1").unwrap();
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.port(), 443);
/// assert_eq!(url.to_string(), "https://api.example.com:443/v1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: Url,
    port: u16,
}

impl BaseUrl {
    /// Returns the URL scheme (`http` or `https`).
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Returns the host portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Returns the explicit or conventional port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns `host:port`.
    #[must_use]
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host_name(), self.port)
    }

    /// Returns the parsed URL.
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}{}",
            self.scheme(),
            self.authority(),
            &self.url[Position::BeforePath..]
        )
    }
}

/// Normalizes `base_url` into a fully qualified URL.
///
/// Inputs without an `http://` or `https://` prefix get `https://`
/// prepended. When the parsed URL has no explicit port, the scheme's
/// conventional port is used: 80 for `http`, 443 for anything else.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidUrl`] if the (prefixed) input cannot be
/// parsed or has no host.
pub fn normalize_base_url(base_url: &str) -> Result<BaseUrl, ConfigError> {
    // Bare DNS names do not parse as URLs.
    let candidate = if base_url.starts_with("https://") || base_url.starts_with("http://") {
        base_url.to_string()
    } else {
        format!("https://{base_url}")
    };

    let invalid = |source| ConfigError::InvalidUrl {
        url: candidate.clone(),
        source,
    };

    let url = Url::parse(&candidate).map_err(invalid)?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(url::ParseError::EmptyHost));
    }

    let port = url
        .port()
        .unwrap_or(if url.scheme() == "http" { 80 } else { 443 });

    Ok(BaseUrl { url, port })
}
