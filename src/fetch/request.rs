//! Fetch request description and transport configuration.

use std::io::IsTerminal;

/// One fetch operation, fully determined at construction time.
///
/// A `FetchRequest` is immutable once handed to the cache: it names the
/// remote source, the destination filename inside the cache root, and the
/// per-request transport knobs (headers, proxy, TLS strictness, quiet).
///
/// # Example
///
/// ```
/// use artifact_cache_core::FetchRequest;
///
/// let request = FetchRequest::new("https://example.test/tool.bin", "tool-1.0.0.bin")
///     .with_header("authorization", "Bearer token")
///     .with_strict_tls(false);
/// assert_eq!(request.destination_name, "tool-1.0.0.bin");
/// ```
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// The URL to fetch the artifact from.
    pub source_url: String,
    /// Filename the artifact is cached under (one cache entry per name).
    pub destination_name: String,
    /// Extra request headers, applied in order.
    pub headers: Vec<(String, String)>,
    /// Optional HTTP(S) proxy URL routed through for this fetch.
    pub proxy_url: Option<String>,
    /// Verify TLS certificates. Disabling this accepts invalid certs.
    pub strict_tls: bool,
    /// Suppress progress output. `None` infers from terminal state.
    pub quiet: Option<bool>,
}

impl FetchRequest {
    /// Creates a request with default options: no headers, no proxy,
    /// strict TLS, quiet inferred from the terminal.
    #[must_use]
    pub fn new(source_url: impl Into<String>, destination_name: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            destination_name: destination_name.into(),
            headers: Vec::new(),
            proxy_url: None,
            strict_tls: true,
            quiet: None,
        }
    }

    /// Adds a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Routes the fetch through an HTTP(S) proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    /// Sets TLS certificate verification strictness.
    #[must_use]
    pub fn with_strict_tls(mut self, strict_tls: bool) -> Self {
        self.strict_tls = strict_tls;
        self
    }

    /// Forces progress output on or off instead of inferring it.
    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = Some(quiet);
        self
    }

    /// Resolves the effective quiet flag.
    ///
    /// Progress output is forced off when stdout is not an interactive
    /// terminal, regardless of the requested value.
    #[must_use]
    pub fn effective_quiet(&self) -> bool {
        if !std::io::stdout().is_terminal() {
            return true;
        }
        self.quiet.unwrap_or(false)
    }
}

/// Transport-level configuration shared across requests.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// HTTP read timeout in seconds.
    pub read_timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: super::constants::CONNECT_TIMEOUT_SECS,
            read_timeout_secs: super::constants::READ_TIMEOUT_SECS,
        }
    }
}
