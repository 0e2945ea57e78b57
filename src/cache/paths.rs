//! Cache root resolution and entry path derivation.
//!
//! Resolution is pure: no directory is created here. Creation happens
//! lazily in [`ensure_cache_root`](super::install::ensure_cache_root) right
//! before the first write.

use std::path::{Path, PathBuf};

use crate::fetch::sanitize_destination_name;

/// Directory name the cache lives under (inside the platform cache location).
pub const CACHE_DIR_NAME: &str = "artifact-cache";

/// Resolves the cache root for this process.
///
/// An explicit override is used verbatim. Otherwise the platform default
/// applies: `~/Library/Caches/artifact-cache` on macOS, `~/.artifact-cache`
/// everywhere else.
#[must_use]
pub fn resolve_cache_root(explicit_override: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit_override {
        return path.to_path_buf();
    }
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    cache_root_for_platform(std::env::consts::OS, &home)
}

/// Computes the platform-default cache root under the given home directory.
///
/// Parameterized over the platform identifier so both branches are testable
/// on any host.
#[must_use]
pub fn cache_root_for_platform(os: &str, home: &Path) -> PathBuf {
    match os {
        "macos" => home.join("Library").join("Caches").join(CACHE_DIR_NAME),
        _ => home.join(format!(".{CACHE_DIR_NAME}")),
    }
}

/// Derives the canonical path of a cache entry. Pure join, no existence check.
///
/// The destination name is reduced to a single sanitized path component so an
/// entry can never land outside the root.
#[must_use]
pub fn entry_path(root: &Path, destination_name: &str) -> PathBuf {
    root.join(sanitize_destination_name(destination_name))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_override_used_verbatim() {
        let root = resolve_cache_root(Some(Path::new("/opt/artifacts")));
        assert_eq!(root, PathBuf::from("/opt/artifacts"));
    }

    #[test]
    fn test_macos_uses_library_caches() {
        let root = cache_root_for_platform("macos", Path::new("/Users/alice"));
        assert_eq!(
            root,
            PathBuf::from("/Users/alice/Library/Caches/artifact-cache")
        );
    }

    #[test]
    fn test_other_platforms_fall_back_to_home_directory() {
        for os in ["linux", "windows", "freebsd", "plan9"] {
            let root = cache_root_for_platform(os, Path::new("/home/bob"));
            assert_eq!(root, PathBuf::from("/home/bob/.artifact-cache"), "os: {os}");
        }
    }

    #[test]
    fn test_entry_path_is_pure_join() {
        let path = entry_path(Path::new("/cache"), "tool-1.0.0.bin");
        assert_eq!(path, PathBuf::from("/cache/tool-1.0.0.bin"));
    }

    #[test]
    fn test_entry_path_cannot_escape_root() {
        let path = entry_path(Path::new("/cache"), "../outside.bin");
        assert_eq!(path, PathBuf::from("/cache/outside.bin"));
    }
}
