//! Error types for the fetch module.
//!
//! This module defines structured errors for all transport operations,
//! providing context-rich error messages for debugging and user feedback.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching an artifact into a staging file.
///
/// A transport failure never removes the staging file: the partial bytes stay
/// on disk so a later fetch with the same parameters can resume them.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error during the transfer (create file, write, etc.)
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The staging file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The proxy URL could not be applied to the HTTP client.
    #[error("invalid proxy URL {url}: {source}")]
    InvalidProxy {
        /// The rejected proxy URL.
        url: String,
        /// The underlying client builder error.
        #[source]
        source: reqwest::Error,
    },

    /// Transfer ended short of the server-advertised content length.
    #[error("incomplete transfer to {path}: expected {expected_bytes} bytes, got {actual_bytes}")]
    Incomplete {
        /// Staging file holding the partial bytes.
        path: PathBuf,
        /// Expected size in bytes.
        expected_bytes: u64,
        /// Actual size in bytes.
        actual_bytes: u64,
    },
}

impl TransportError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an invalid proxy error.
    pub fn invalid_proxy(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::InvalidProxy {
            url: url.into(),
            source,
        }
    }

    /// Creates an incomplete-transfer error.
    pub fn incomplete(path: impl Into<PathBuf>, expected_bytes: u64, actual_bytes: u64) -> Self {
        Self::Incomplete {
            path: path.into(),
            expected_bytes,
            actual_bytes,
        }
    }
}

// Note on From trait implementations:
// We intentionally do NOT implement `From<reqwest::Error>` or `From<std::io::Error>`
// because our error variants require context (url, path) that the source errors
// don't provide. The helper constructor methods (network(), io(), etc.) are the
// correct pattern here as they allow callers to provide necessary context.
