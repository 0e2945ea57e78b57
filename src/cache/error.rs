//! Error types for the cache module.

use std::path::PathBuf;

use thiserror::Error;

use crate::fetch::TransportError;

/// Errors that can occur while caching an artifact.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The network fetch failed; the staging file is retained for resume.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The cache root directory could not be created.
    #[error("failed to create cache root {path}: {source}")]
    Root {
        /// The cache root path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Promoting the staging file into its cache slot failed.
    #[error("failed to install {from} as {to}: {source}")]
    Install {
        /// The staging file path.
        from: PathBuf,
        /// The final entry path.
        to: PathBuf,
        /// The underlying rename error.
        #[source]
        source: std::io::Error,
    },

    /// A supplied verifier rejected the installed artifact.
    #[error("integrity check failed for {path}: {detail}")]
    Integrity {
        /// The rejected entry path.
        path: PathBuf,
        /// Human-readable mismatch description.
        detail: String,
    },
}

impl CacheError {
    /// Creates a cache-root creation error.
    pub fn root(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Root {
            path: path.into(),
            source,
        }
    }

    /// Creates an install (rename) error.
    pub fn install(from: impl Into<PathBuf>, to: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Install {
            from: from.into(),
            to: to.into(),
            source,
        }
    }

    /// Creates an integrity failure.
    pub fn integrity(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::Integrity {
            path: path.into(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_install_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory");
        let error = CacheError::install("/c/tmp-1-0-t.bin", "/c/t.bin", io_error);
        let msg = error.to_string();
        assert!(msg.contains("tmp-1-0-t.bin"), "Expected staging path in: {msg}");
        assert!(msg.contains("/c/t.bin"), "Expected entry path in: {msg}");
    }

    #[test]
    fn test_cache_error_integrity_display() {
        let error = CacheError::integrity("/c/t.bin", "sha256 mismatch");
        let msg = error.to_string();
        assert!(msg.contains("integrity"), "Expected 'integrity' in: {msg}");
        assert!(msg.contains("sha256 mismatch"), "Expected detail in: {msg}");
    }

    #[test]
    fn test_cache_error_wraps_transport_transparently() {
        let transport = TransportError::timeout("https://example.test/tool.bin");
        let error = CacheError::from(transport);
        assert!(error.to_string().contains("timeout"));
    }
}
