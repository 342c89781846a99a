//! Per-host collection errors.
//!
//! None of these escape a collection pass: they are logged and folded into
//! an unreachable snapshot.

use std::time::Duration;
use thiserror::Error;

/// Failure to obtain a status body from an upstream host.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("No response headers within {0:?}")]
    HeaderTimeout(Duration),

    #[error("Unexpected status code: {0}")]
    Status(u16),

    #[error("Failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("Response body not received within {0:?}")]
    BodyTimeout(Duration),
}

impl FetchError {
    /// Classify a reqwest send error.
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_connect() {
            FetchError::Connect(err)
        } else {
            FetchError::Request(err)
        }
    }
}

/// Status body that does not match the stub status layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Body is not valid UTF-8")]
    Utf8,

    #[error("Expected {expected} lines, found {found}")]
    LineCount { expected: usize, found: usize },

    #[error("Line {line}: expected {expected} tokens, found {found}")]
    TokenCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: expected {expected:?}, found {found:?}")]
    UnexpectedToken {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("Line {line}: invalid number {token:?}")]
    InvalidNumber { line: usize, token: String },
}
