//! Process-wide default logger.
//!
//! Components take an explicit [`Dispatch`] handle. This module builds the
//! default one: JSON records on stdout, filtered by a level string.
//!
//! ```rust,no_run
//! use http_utils::{logger, Client, ClientOption};
//!
//! let log = logger::build(logger::DEFAULT_LOG_LEVEL);
//! let client = Client::new("https://api.example.com", [ClientOption::Logger(log)]);
//! ```

use tracing::level_filters::LevelFilter;
use tracing::Dispatch;

/// Level used when none is given.
pub const DEFAULT_LOG_LEVEL: &str = "debug";

/// Parses a level string.
///
/// An empty string selects `debug`. Anything unrecognised falls back to
/// `info`, with a notice on stderr since no logger exists yet.
#[must_use]
pub fn parse_level(level: &str) -> LevelFilter {
    if level.is_empty() {
        return LevelFilter::DEBUG;
    }

    level.parse().unwrap_or_else(|_| {
        eprintln!("Falling back to the info log level. You specified: {level}.");
        LevelFilter::INFO
    })
}

/// Builds a JSON logger writing to stdout at `level`.
#[must_use]
pub fn build(level: &str) -> Dispatch {
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(parse_level(level))
        .with_writer(std::io::stdout)
        .finish();

    Dispatch::new(subscriber)
}

/// Builds the default logger and installs it as the global default.
///
/// Call once at startup and pass the returned handle to the components that
/// log.
///
/// # Errors
///
/// Returns an error if a global default was already installed.
pub fn init(level: &str) -> Result<Dispatch, tracing::dispatcher::SetGlobalDefaultError> {
    let dispatch = build(level);
    tracing::dispatcher::set_global_default(dispatch.clone())?;
    Ok(dispatch)
}
