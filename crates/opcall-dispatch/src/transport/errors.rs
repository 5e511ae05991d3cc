use std::error::Error as StdError;

use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Network-level failure reported by a [`super::Transport`].
///
/// The message flattens the whole source chain so a single line explains
/// what went wrong (for example `request failed: client error (Connect):
/// tcp connect error: Connection refused (os error 111)`).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    /// Creates an error with a message and no underlying cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps `source`, prefixing its flattened chain with `context`.
    pub fn with_source<E>(context: &str, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let mut message = format!("{context}: {source}");
        let mut cause = source.source();
        while let Some(inner) = cause {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            cause = inner.source();
        }
        Self {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Returns the flattened message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
