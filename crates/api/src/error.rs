// ABOUTME: Error types for the vidstream API client including ErrorCode enum and ApiError struct.
// ABOUTME: Provides categorized errors with convenience constructors, boolean helpers and FetchFailure mapping.

use std::fmt;

use vidstream_feed::{FailureKind, FetchFailure};

/// Error codes representing different categories of API failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    InvalidInput,
    Config,
    Fetch,
    Timeout,
    Status,
    Decode,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::InvalidInput => "invalid input",
            ErrorCode::Config => "configuration error",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Status => "unexpected status",
            ErrorCode::Decode => "decode error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for API operations.
#[derive(Debug, thiserror::Error)]
pub struct ApiError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    /// HTTP status, for `ErrorCode::Status`.
    pub status: Option<u16>,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vidstream: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ApiError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            status: None,
            source,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidInput, url, op, source)
    }

    /// Create a Config error.
    pub fn config(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(ErrorCode::Config, String::new(), op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Fetch, url, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Timeout, url, op, source)
    }

    /// Create a Status error for a non-success HTTP response.
    pub fn status(url: impl Into<String>, op: impl Into<String>, status: u16) -> Self {
        let mut err = Self::new(
            ErrorCode::Status,
            url,
            op,
            Some(anyhow::anyhow!("HTTP status {}", status)),
        );
        err.status = Some(status);
        err
    }

    /// Create a Decode error for a body that is not the expected shape.
    pub fn decode(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Decode, url, op, source)
    }

    /// Map a reqwest send/read error, distinguishing timeouts.
    pub fn from_reqwest(url: impl Into<String>, op: impl Into<String>, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(url, op, Some(anyhow::anyhow!("request timed out: {}", err)))
        } else {
            Self::fetch(url, op, Some(anyhow::anyhow!("request failed: {}", err)))
        }
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a Status error.
    pub fn is_status(&self) -> bool {
        self.code == ErrorCode::Status
    }

    /// Returns true if this is a Decode error.
    pub fn is_decode(&self) -> bool {
        self.code == ErrorCode::Decode
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }
}

impl From<ApiError> for FetchFailure {
    fn from(err: ApiError) -> Self {
        let kind = match err.code {
            ErrorCode::Timeout => FailureKind::Timeout,
            ErrorCode::Status => FailureKind::Status,
            ErrorCode::Decode => FailureKind::Malformed,
            ErrorCode::InvalidUrl
            | ErrorCode::InvalidInput
            | ErrorCode::Config
            | ErrorCode::Fetch => FailureKind::Transport,
        };
        FetchFailure::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_url_code_and_source() {
        let err = ApiError::status("http://api/videos", "FetchPage", 502);
        assert_eq!(
            err.to_string(),
            "vidstream: FetchPage http://api/videos: unexpected status: HTTP status 502"
        );
        assert_eq!(err.status, Some(502));
        assert!(err.is_status());
    }

    #[test]
    fn maps_to_fetch_failure_kinds() {
        let cases = [
            (ApiError::timeout("u", "op", None), FailureKind::Timeout),
            (ApiError::status("u", "op", 404), FailureKind::Status),
            (ApiError::decode("u", "op", None), FailureKind::Malformed),
            (ApiError::fetch("u", "op", None), FailureKind::Transport),
            (ApiError::invalid_url("u", "op", None), FailureKind::Transport),
        ];
        for (err, kind) in cases {
            let failure: FetchFailure = err.into();
            assert_eq!(failure.kind, kind);
        }
    }
}
