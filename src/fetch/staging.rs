//! Staging file naming.
//!
//! Staging names embed the process id and a process-global counter so that
//! concurrent fetches, from this process or another one on the same host,
//! never write to the same file. The destination name is appended (sanitized
//! to a single path component) so leftover staging files are attributable.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A staging file inside the cache root, holding in-progress download bytes.
///
/// Created by the transport, consumed (renamed away) by the installer on
/// success, and deliberately left on disk when a transfer fails.
#[derive(Debug, Clone)]
pub struct StagingFile {
    /// Filename within the cache root.
    pub name: String,
    /// Full path (`<root>/<name>`).
    pub path: PathBuf,
    /// Bytes on disk after the transfer.
    pub bytes_written: u64,
    /// Whether an HTTP range resume was used.
    pub resumed: bool,
}

/// Generates a staging filename unique within this process.
///
/// Shape: `tmp-<pid>-<hex counter>-<sanitized destination name>`.
#[must_use]
pub fn staging_file_name(destination_name: &str) -> String {
    let counter = STAGING_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!(
        "tmp-{}-{:x}-{}",
        std::process::id(),
        counter,
        sanitize_destination_name(destination_name)
    )
}

/// Reduces a destination name to a safe single path component.
///
/// Path separators and control characters are replaced with `_`; an empty
/// result falls back to `_` so the join below can never escape the root.
#[must_use]
pub fn sanitize_destination_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    let sanitized: String = base
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        return "_".to_string();
    }
    sanitized
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_staging_name_embeds_pid_and_destination() {
        let name = staging_file_name("tool-1.0.0.bin");
        assert!(name.starts_with(&format!("tmp-{}-", std::process::id())));
        assert!(name.ends_with("-tool-1.0.0.bin"));
    }

    #[test]
    fn test_staging_names_are_unique_for_same_destination() {
        let first = staging_file_name("tool-1.0.0.bin");
        let second = staging_file_name("tool-1.0.0.bin");
        assert_ne!(first, second);
    }

    #[test]
    fn test_staging_names_differ_across_destinations() {
        // Collision-freedom property: distinct destinations, distinct names.
        let names: HashSet<String> = ["a.bin", "b.bin", "c.bin"]
            .iter()
            .map(|dest| staging_file_name(dest))
            .collect();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_destination_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_destination_name("dir/tool.bin"), "tool.bin");
    }

    #[test]
    fn test_sanitize_replaces_reserved_characters() {
        assert_eq!(sanitize_destination_name("a:b*c?.bin"), "a_b_c_.bin");
    }

    #[test]
    fn test_sanitize_empty_falls_back_to_underscore() {
        assert_eq!(sanitize_destination_name(""), "_");
        assert_eq!(sanitize_destination_name(".."), "_");
    }
}
