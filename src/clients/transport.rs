//! HTTP sender construction from a [`ClientConfig`].

use crate::clients::errors::HttpError;
use crate::config::ClientConfig;

/// Builds a `reqwest::Client` honouring the configured proxy and timeouts.
///
/// Zero timeouts leave `reqwest`'s defaults in place. The TLS handshake
/// timeout bounds connection establishment as a whole, since `reqwest` does
/// not expose the handshake separately.
///
/// Log records go to the configuration's logger when one is set.
///
/// # Errors
///
/// Returns [`HttpError::Transport`] if the proxy URL is rejected or the
/// client cannot be built.
pub fn build_transport(config: &ClientConfig) -> Result<reqwest::Client, HttpError> {
    match config.logger() {
        Some(logger) => tracing::dispatcher::with_default(logger, || build(config)),
        None => build(config),
    }
}

fn build(config: &ClientConfig) -> Result<reqwest::Client, HttpError> {
    let mut builder = reqwest::Client::builder().use_rustls_tls();

    if let Some(proxy_url) = config.proxy_url() {
        tracing::info!(proxy = %proxy_url, "Setting proxy URL manually");
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }

    if !config.tls_handshake_timeout().is_zero() {
        tracing::info!(
            timeout = ?config.tls_handshake_timeout(),
            "Overriding TLS handshake timeout"
        );
        builder = builder.connect_timeout(config.tls_handshake_timeout());
    }

    if !config.request_timeout().is_zero() {
        tracing::info!(timeout = ?config.request_timeout(), "Overriding request timeout");
        builder = builder.timeout(config.request_timeout());
    }

    Ok(builder.build()?)
}
