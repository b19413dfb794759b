//! Configuration errors and the error chain used to accumulate them.
//!
//! Configuration is assembled from an ordered list of options. A failing
//! option does not stop the ones after it; instead its error is appended to an
//! [`ErrorChain`] that only becomes visible when the configuration is
//! validated.
//!
//! # Example
//!
//! ```rust
//! use http_utils::{ConfigError, ErrorChain};
//!
//! let mut errors = None;
//! ErrorChain::append(&mut errors, ConfigError::MissingBaseUrl);
//! ErrorChain::append(&mut errors, ConfigError::InvalidUrl {
//!     url: "http://[::1".to_string(),
//!     source: url::ParseError::InvalidIpv6Address,
//! });
//!
//! let chain = errors.unwrap();
//! assert_eq!(chain.len(), 2);
//! assert!(chain.contains(&ConfigError::MissingBaseUrl));
//! assert!(!chain.is(&ConfigError::MissingBaseUrl));
//! ```

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Errors that can occur while building a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An empty base URL was supplied.
    #[error("no base URL given")]
    MissingBaseUrl,

    /// The URL could not be parsed.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        /// The URL as it was handed to the parser.
        url: String,
        /// The underlying parse failure.
        #[source]
        source: url::ParseError,
    },
}

/// A reverse-linked chain of errors, most recent first.
///
/// Each node holds one error and, optionally, the node that was the head
/// before it was appended. The default `Display` output shows only the most
/// recent error; the alternate form (`{:#}`) renders the whole chain,
/// comma-separated with the oldest entry last.
///
/// [`source`](std::error::Error::source) returns the next (older) node, so
/// any code that walks error sources will visit every accumulated entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorChain<E> {
    err: E,
    next: Option<Box<ErrorChain<E>>>,
}

impl<E> ErrorChain<E> {
    /// Creates a single-entry chain.
    #[must_use]
    pub const fn new(err: E) -> Self {
        Self { err, next: None }
    }

    /// Wraps `err` together with the current head, making it the new head.
    pub fn append(head: &mut Option<Self>, err: E) {
        let next = head.take().map(Box::new);
        *head = Some(Self { err, next });
    }

    /// Returns the error held by this node.
    #[must_use]
    pub const fn error(&self) -> &E {
        &self.err
    }

    /// Returns the previous (older) node, if any.
    #[must_use]
    pub fn next(&self) -> Option<&Self> {
        self.next.as_deref()
    }

    /// Iterates over the accumulated errors, most recent first.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, E> {
        Iter { node: Some(self) }
    }

    /// Returns the number of errors in the chain.
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Compares `err` against the error held by this node only.
    ///
    /// Older entries are not consulted; use [`contains`](Self::contains) for
    /// that.
    #[must_use]
    pub fn is(&self, err: &E) -> bool
    where
        E: PartialEq,
    {
        self.err == *err
    }

    /// Returns `true` if any entry in the chain equals `err`.
    #[must_use]
    pub fn contains(&self, err: &E) -> bool
    where
        E: PartialEq,
    {
        self.iter().any(|e| e == err)
    }
}

/// Iterator over the errors of an [`ErrorChain`].
#[derive(Debug)]
pub struct Iter<'a, E> {
    node: Option<&'a ErrorChain<E>>,
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.node?;
        self.node = node.next();
        Some(&node.err)
    }
}

impl<'a, E> IntoIterator for &'a ErrorChain<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E: fmt::Display> fmt::Display for ErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return write!(f, "{}", self.err);
        }

        for (i, err) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl<E> StdError for ErrorChain<E>
where
    E: StdError + 'static,
{
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.next
            .as_deref()
            .map(|next| next as &(dyn StdError + 'static))
    }
}
