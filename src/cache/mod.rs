//! Artifact cache: path resolution, atomic install, and orchestration.
//!
//! A cache entry lives at `<root>/<destination name>` and is either fully
//! absent or fully present. The transport only ever writes staging files; the
//! installer promotes a completed staging file with a same-directory rename,
//! the sole primitive that is atomic with respect to concurrent readers.

mod error;
mod install;
mod paths;
mod store;
mod verify;

pub use error::CacheError;
pub use install::{ensure_cache_root, install};
pub use paths::{cache_root_for_platform, entry_path, resolve_cache_root};
pub use store::{ArtifactCache, CacheConfig, FetchOutcome};
pub use verify::{IntegrityVerifier, NoopVerifier, Sha256Verifier};
