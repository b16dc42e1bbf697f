//! Error types.
//!
//! Nothing in the presentation path is fatal: a [`FetchError`] makes the
//! affected tag fall back to a text label, and is otherwise only logged.

use std::time::Duration;

use thiserror::Error;

/// Failure to load the asset behind an image key.
///
/// `Clone` because one settled outcome is handed to every caller waiting on
/// the same key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("{url} answered with HTTP status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode image from {url}: {message}")]
    Decode { url: String, message: String },

    /// The fetch task went away before producing a result (runtime shutdown).
    #[error("fetch of {url} was cancelled")]
    Cancelled { url: String },
}

impl FetchError {
    pub fn network(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Network {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn decode(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// The URL whose fetch failed.
    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. }
            | Self::Status { url, .. }
            | Self::Decode { url, .. }
            | Self::Cancelled { url } => url,
        }
    }
}

/// Rejected [`SessionConfig`](crate::SessionConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    ZeroDelay { field: &'static str },

    #[error(
        "visibility_done_delay ({visibility:?}) must be longer than hide_after_done_delay ({hide:?})"
    )]
    DelayOrdering { hide: Duration, visibility: Duration },

    #[error("palette must contain at least one color")]
    EmptyPalette,
}
