// ABOUTME: Error types for the feed engine.
// ABOUTME: Provides FeedError for invalid requests/config and FetchFailure for failed page fetches.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building feed configuration or page requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Page indexes are 1-based.
    #[error("invalid page index {0}: pages start at 1")]
    InvalidPageIndex(u32),

    /// A page must hold at least one item.
    #[error("invalid page size {0}: must be at least 1")]
    InvalidPageSize(u32),
}

/// Why a page fetch failed. Kept for diagnostics only; the controller treats
/// every kind the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transport,
    Timeout,
    Status,
    Malformed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Transport => "transport error",
            FailureKind::Timeout => "timeout",
            FailureKind::Status => "unexpected status",
            FailureKind::Malformed => "malformed response",
        };
        write!(f, "{}", s)
    }
}

/// A page request that did not produce a usable page.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("failed to load videos ({kind}): {message}")]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transport, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, message)
    }

    pub fn status(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Status, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Malformed, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failure_display_includes_kind_and_message() {
        let err = FetchFailure::status("HTTP status 503");
        assert_eq!(
            err.to_string(),
            "failed to load videos (unexpected status): HTTP status 503"
        );
    }

    #[test]
    fn feed_error_messages() {
        assert_eq!(
            FeedError::InvalidPageIndex(0).to_string(),
            "invalid page index 0: pages start at 1"
        );
        assert_eq!(
            FeedError::InvalidPageSize(0).to_string(),
            "invalid page size 0: must be at least 1"
        );
    }
}
