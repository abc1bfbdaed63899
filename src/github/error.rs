// src/github/error.rs
// =============================================================================
// The single error shape used by every part of the indexer.
//
// Every failure (bad input, GitHub being down, a path that doesn't exist)
// ends up as one IndexError: a machine-readable code, a human message, and
// optionally the HTTP status and rate-limit details that came with it.
//
// Rust concepts:
// - thiserror: derives std::error::Error so IndexError works with `?`
// - serde: the same struct is printed as JSON by `--json`
// =============================================================================

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Machine-readable error codes, serialized as snake_case strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input validation (detected before any network access)
    InvalidInput,
    InvalidUrl,
    InvalidHost,
    InvalidPath,
    InvalidRef,
    UnsupportedPath,

    // Upstream communication
    NetworkError,
    InvalidResponse,
    GithubError,
    Unauthorized,
    Forbidden,
    RateLimit,
    NotFound,
    MissingDefaultBranch,

    // Traversal
    MissingRef,
    ExpectedFile,
    UnsupportedBlob,
    NotADirectory,

    // Caller-level deadline
    Timeout,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "invalid_input",
            ErrorCode::InvalidUrl => "invalid_url",
            ErrorCode::InvalidHost => "invalid_host",
            ErrorCode::InvalidPath => "invalid_path",
            ErrorCode::InvalidRef => "invalid_ref",
            ErrorCode::UnsupportedPath => "unsupported_path",
            ErrorCode::NetworkError => "network_error",
            ErrorCode::InvalidResponse => "invalid_response",
            ErrorCode::GithubError => "github_error",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::Forbidden => "forbidden",
            ErrorCode::RateLimit => "rate_limit",
            ErrorCode::NotFound => "not_found",
            ErrorCode::MissingDefaultBranch => "missing_default_branch",
            ErrorCode::MissingRef => "missing_ref",
            ErrorCode::ExpectedFile => "expected_file",
            ErrorCode::UnsupportedBlob => "unsupported_blob",
            ErrorCode::NotADirectory => "not_a_directory",
            ErrorCode::Timeout => "timeout",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rate-limit and retry metadata copied from GitHub's response.
///
/// Every field is optional because GitHub only sends some of them,
/// depending on which limit was hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_remaining: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_reset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
}

impl ErrorDetails {
    pub fn is_empty(&self) -> bool {
        self.rate_limit_remaining.is_none()
            && self.rate_limit_reset.is_none()
            && self.retry_after_seconds.is_none()
            && self.documentation_url.is_none()
    }
}

/// The one error type returned by parsing, resolving and traversing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct IndexError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

impl IndexError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            details: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches details, dropping them when nothing is set.
    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = if details.is_empty() { None } else { Some(details) };
        self
    }

    /// Status an HTTP front end would answer with for this error.
    pub fn http_status(&self) -> u16 {
        match (self.status, self.code) {
            (Some(status), _) => status,
            (None, ErrorCode::RateLimit) => 429,
            (None, _) => 500,
        }
    }

    pub fn retry_after_seconds(&self) -> Option<u64> {
        self.details.as_ref().and_then(|d| d.retry_after_seconds)
    }
}
