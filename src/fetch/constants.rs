//! Constants for the fetch module (timeouts).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large artifacts).
pub const READ_TIMEOUT_SECS: u64 = 300;
