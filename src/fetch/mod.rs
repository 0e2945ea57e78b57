//! HTTP transport for streaming artifacts into staging files.
//!
//! The transport never writes to an artifact's final cache path. It downloads
//! into a uniquely named staging file inside the cache root, leaving promotion
//! to the installer. A staging file left behind by a failed transfer is
//! retained on disk so a later attempt can resume it.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large artifacts)
//! - Resume of partial staging files via HTTP Range requests
//! - Configurable proxy, TLS strictness, and custom headers
//! - Progress bar output, suppressed when quiet or not a terminal
//! - Structured error types with full context

mod client;
mod constants;
mod error;
mod request;
mod staging;

pub use client::Transport;
pub use constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::TransportError;
pub use request::{FetchRequest, TransportConfig};
pub use staging::{StagingFile, sanitize_destination_name, staging_file_name};

// Note: no module-local Result aliases. Use `Result<T, TransportError>`
// explicitly in function signatures.
