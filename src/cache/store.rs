//! The `ArtifactCache` orchestrator: cached path in, download only on miss.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::error::CacheError;
use super::install;
use super::paths::{entry_path, resolve_cache_root};
use super::verify::{IntegrityVerifier, NoopVerifier};
use crate::fetch::{FetchRequest, Transport, TransportConfig};

/// Construction-time configuration for an [`ArtifactCache`].
///
/// All ambient inputs (cache location override, timeouts) are explicit here;
/// the cache never reads configuration files itself.
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    /// Cache root override; platform default when `None`.
    pub root_override: Option<PathBuf>,
    /// Transport timeouts.
    pub transport: TransportConfig,
}

/// Result of a [`ArtifactCache::get`] call.
#[derive(Debug, Clone, Serialize)]
pub struct FetchOutcome {
    /// Local path of the cached artifact.
    pub path: PathBuf,
    /// Whether this call performed a network fetch (false on a cache hit).
    pub freshly_downloaded: bool,
}

/// Idempotent fetch-and-cache orchestrator.
///
/// `get()` returns the cached local path for a request, downloading the
/// artifact only when it is absent. Presence at the canonical path alone is
/// treated as validity: a pre-existing entry is never re-verified or
/// re-downloaded.
///
/// Two concurrent `get()` calls for the same destination name are not
/// coordinated: each downloads to its own staging file and both install to
/// the same final name. The rename-based install keeps the final state
/// consistent (last writer wins); the duplicate transfer is an accepted
/// inefficiency, not a correctness bug.
pub struct ArtifactCache {
    root: PathBuf,
    transport: Transport,
    verifier: Arc<dyn IntegrityVerifier>,
}

impl ArtifactCache {
    /// Creates a cache with the default pass-through verifier.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            root: resolve_cache_root(config.root_override.as_deref()),
            transport: Transport::with_config(config.transport),
            verifier: Arc::new(NoopVerifier),
        }
    }

    /// Replaces the integrity verifier.
    ///
    /// A rejected artifact fails `get()` with `CacheError::Integrity` and is
    /// removed from the cache.
    #[must_use]
    pub fn with_verifier(mut self, verifier: Arc<dyn IntegrityVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    /// The resolved cache root directory.
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Returns the local path for the requested artifact, fetching it first
    /// if it is not cached yet.
    ///
    /// # Errors
    ///
    /// - `CacheError::Root` when the cache root cannot be created
    /// - `CacheError::Transport` when the fetch fails (staging file retained)
    /// - `CacheError::Install` when the staging file cannot be promoted
    /// - `CacheError::Integrity` when a supplied verifier rejects the entry
    #[instrument(skip(self), fields(url = %request.source_url, dest = %request.destination_name))]
    pub async fn get(&self, request: &FetchRequest) -> Result<FetchOutcome, CacheError> {
        let path = entry_path(&self.root, &request.destination_name);

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!(path = %path.display(), "cache hit");
            return Ok(FetchOutcome {
                path,
                freshly_downloaded: false,
            });
        }

        info!(path = %path.display(), "cache miss, fetching");
        install::ensure_cache_root(&self.root).await?;

        let staging = self.transport.fetch(request, &self.root).await?;
        install::install(&self.root, &staging.name, &request.destination_name).await?;

        if !self.verifier.verify(&path).await? {
            // Drop the poisoned entry so the next get() does not serve it.
            if let Err(cleanup_error) = tokio::fs::remove_file(&path).await {
                warn!(
                    path = %path.display(),
                    error = %cleanup_error,
                    "failed to remove entry after integrity rejection"
                );
            }
            return Err(CacheError::integrity(path, "verifier rejected artifact"));
        }

        Ok(FetchOutcome {
            path,
            freshly_downloaded: true,
        })
    }
}
