//! Error types shared by the HTTP pipeline, storage, and configuration.
//!
//! ERROR HANDLING
//! ==============
//! Stores catch these at their boundary and record a message instead of
//! returning them, so nothing here is ever fatal to the client. `ApiError`
//! distinguishes the 401 sentinel from every other failure because that one
//! status drives global session invalidation.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::path::PathBuf;

/// HTTP status that marks an invalid or expired session everywhere.
pub const UNAUTHORIZED_STATUS: u16 = 401;

// =============================================================================
// API
// =============================================================================

/// Errors produced by requests through the API pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server rejected the bearer credential.
    #[error("session rejected by server")]
    Unauthorized,

    /// The server returned a non-success status other than 401.
    #[error("server returned status {status}")]
    Status { status: u16, body: String },

    /// The request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(String),

    /// The response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// HTTP status carried by this error, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(UNAUTHORIZED_STATUS),
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Encode(_) | Self::Decode(_) | Self::HttpClientBuild(_) => None,
        }
    }

    /// True for the authentication-rejection sentinel.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        self.status() == Some(UNAUTHORIZED_STATUS)
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_TRANSPORT",
            Self::Unauthorized => "E_UNAUTHORIZED",
            Self::Status { .. } => "E_STATUS",
            Self::Encode(_) => "E_ENCODE",
            Self::Decode(_) => "E_DECODE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    /// Whether a caller could reasonably retry. Informational only; the
    /// client itself never retries.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Errors produced by durable token storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("token storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// CONFIG
// =============================================================================

/// Errors produced while reading client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API base URL: {0} (expected http:// or https://)")]
    InvalidBaseUrl(String),
}
