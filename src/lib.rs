//! Artifact Cache Core Library
//!
//! This library fetches a versioned binary artifact from a remote source
//! exactly once, stores it in a per-user cache keyed by destination filename,
//! and hands back a reliable local path on every subsequent call.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`fetch`] - HTTP transport with streaming and resumable staging files
//! - [`cache`] - Cache path resolution, atomic install, integrity verification,
//!   and the [`ArtifactCache`] orchestrator
//!
//! # Example
//!
//! ```no_run
//! use artifact_cache_core::{ArtifactCache, CacheConfig, FetchRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = ArtifactCache::new(CacheConfig::default());
//! let request = FetchRequest::new("https://example.test/tool.bin", "tool-1.0.0.bin");
//! let outcome = cache.get(&request).await?;
//! println!("artifact at {}", outcome.path.display());
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod fetch;

// Re-export commonly used types
pub use cache::{
    ArtifactCache, CacheConfig, CacheError, FetchOutcome, IntegrityVerifier, NoopVerifier,
    Sha256Verifier, cache_root_for_platform, entry_path, resolve_cache_root,
};
pub use fetch::{FetchRequest, StagingFile, Transport, TransportConfig, TransportError};
