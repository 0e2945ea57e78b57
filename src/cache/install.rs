//! Atomic promotion of a staging file into its cache slot.

use std::path::Path;

use tracing::{debug, instrument, warn};

use super::error::CacheError;
use super::paths::entry_path;

/// Creates the cache root and any missing parents.
///
/// Idempotent: an already-existing root is not an error.
///
/// # Errors
///
/// Returns `CacheError::Root` if the directory cannot be created.
#[instrument]
pub async fn ensure_cache_root(root: &Path) -> Result<(), CacheError> {
    tokio::fs::create_dir_all(root)
        .await
        .map_err(|e| CacheError::root(root, e))
}

/// Promotes a completed staging file to the destination name.
///
/// A same-directory rename is used because it is the only operation atomic
/// with respect to concurrent readers: an observer sees the entry either
/// absent or complete, never partially written.
///
/// # Errors
///
/// Returns `CacheError::Install` if the rename fails. Best-effort cleanup of
/// the cache root path is attempted on that path; a cleanup failure is logged
/// and never replaces the original error.
#[instrument]
pub async fn install(
    root: &Path,
    staging_name: &str,
    destination_name: &str,
) -> Result<(), CacheError> {
    ensure_cache_root(root).await?;

    let from = root.join(staging_name);
    let to = entry_path(root, destination_name);

    match tokio::fs::rename(&from, &to).await {
        Ok(()) => {
            debug!(path = %to.display(), "staging file promoted");
            Ok(())
        }
        Err(rename_error) => {
            if let Err(cleanup_error) = tokio::fs::remove_dir(root).await {
                warn!(
                    path = %root.display(),
                    error = %cleanup_error,
                    "cache root cleanup failed after install error"
                );
            }
            Err(CacheError::install(from, to, rename_error))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ensure_cache_root_creates_missing_parents() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("a").join("b").join("cache");

        ensure_cache_root(&root).await.unwrap();
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn test_ensure_cache_root_is_idempotent() {
        let temp = TempDir::new().unwrap();
        ensure_cache_root(temp.path()).await.unwrap();
        ensure_cache_root(temp.path()).await.unwrap();
    }

    #[tokio::test]
    async fn test_install_renames_staging_to_destination() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("tmp-1-0-tool.bin");
        tokio::fs::write(&staging, b"artifact bytes").await.unwrap();

        install(temp.path(), "tmp-1-0-tool.bin", "tool.bin")
            .await
            .unwrap();

        assert!(!staging.exists(), "staging file should be consumed");
        let installed = tokio::fs::read(temp.path().join("tool.bin")).await.unwrap();
        assert_eq!(installed, b"artifact bytes");
    }

    #[tokio::test]
    async fn test_install_missing_staging_surfaces_install_error() {
        let temp = TempDir::new().unwrap();
        let result = install(temp.path(), "tmp-1-0-missing.bin", "tool.bin").await;

        match result {
            Err(CacheError::Install { from, .. }) => {
                assert!(from.ends_with("tmp-1-0-missing.bin"));
            }
            other => panic!("expected Install error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_install_error_surfaces_even_when_cleanup_fails() {
        // A non-empty root makes remove_dir fail; the Install error must win.
        let temp = TempDir::new().unwrap();
        tokio::fs::write(temp.path().join("occupant"), b"x")
            .await
            .unwrap();

        let result = install(temp.path(), "tmp-1-0-missing.bin", "tool.bin").await;
        assert!(matches!(result, Err(CacheError::Install { .. })));
        assert!(
            temp.path().join("occupant").exists(),
            "unrelated entries must survive best-effort cleanup"
        );
    }
}
