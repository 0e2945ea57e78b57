//! Post-install integrity verification.
//!
//! The cache accepts every download unless a verifier says otherwise. The
//! default [`NoopVerifier`] preserves that pass-through behavior; deployments
//! that need a trustworthy cache supply a real verifier such as
//! [`Sha256Verifier`]. Without one, a cache root writable by another user is
//! open to poisoning.

use std::path::Path;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;
use tracing::debug;

use super::error::CacheError;

/// Pluggable check run once per fetch, immediately after install.
///
/// Returning `Ok(false)` or an error fails the `get()` call with
/// `CacheError::Integrity`; the orchestrator then removes the entry so a
/// rejected artifact is not served from cache later.
#[async_trait]
pub trait IntegrityVerifier: Send + Sync {
    /// Checks the installed artifact at `entry_path`.
    ///
    /// # Errors
    ///
    /// Implementations may return `CacheError` when the entry cannot be read.
    async fn verify(&self, entry_path: &Path) -> Result<bool, CacheError>;
}

/// Default verifier: accepts every artifact unconditionally.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopVerifier;

#[async_trait]
impl IntegrityVerifier for NoopVerifier {
    async fn verify(&self, _entry_path: &Path) -> Result<bool, CacheError> {
        Ok(true)
    }
}

/// Verifier comparing the entry's SHA-256 digest against an expected value.
#[derive(Debug, Clone)]
pub struct Sha256Verifier {
    expected_hex: String,
}

impl Sha256Verifier {
    /// Creates a verifier expecting the given lowercase/uppercase hex digest.
    #[must_use]
    pub fn new(expected_hex: impl Into<String>) -> Self {
        Self {
            expected_hex: expected_hex.into(),
        }
    }
}

#[async_trait]
impl IntegrityVerifier for Sha256Verifier {
    async fn verify(&self, entry_path: &Path) -> Result<bool, CacheError> {
        let mut file = tokio::fs::File::open(entry_path)
            .await
            .map_err(|e| CacheError::integrity(entry_path, format!("cannot open entry: {e}")))?;

        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; 64 * 1024];
        loop {
            let read = file
                .read(&mut buffer)
                .await
                .map_err(|e| CacheError::integrity(entry_path, format!("cannot read entry: {e}")))?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        let actual = hex::encode(hasher.finalize());
        let matches = actual.eq_ignore_ascii_case(self.expected_hex.trim());
        debug!(path = %entry_path.display(), matches, "sha256 verification");
        Ok(matches)
    }
}
