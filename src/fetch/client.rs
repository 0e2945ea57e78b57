//! HTTP transport for streaming an artifact into a staging file.
//!
//! This module provides the `Transport` struct which downloads a URL into a
//! uniquely named staging file inside the cache root, with resume support for
//! partial staging files and proper timeout configuration.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{ACCEPT_RANGES, CONTENT_LENGTH, RANGE};
use reqwest::{Client, Proxy};
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::TransportError;
use super::request::{FetchRequest, TransportConfig};
use super::staging::{StagingFile, staging_file_name};

/// HTTP transport for fetching artifacts with streaming support.
///
/// The transport writes only to staging files inside the cache root; it never
/// touches an artifact's final path. One transport can serve many fetches.
///
/// # Example
///
/// ```no_run
/// use artifact_cache_core::{FetchRequest, Transport};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = Transport::new();
/// let request = FetchRequest::new("https://example.test/tool.bin", "tool-1.0.0.bin");
/// let staging = transport.fetch(&request, Path::new("/tmp/cache")).await?;
/// println!("staged at {}", staging.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Transport {
    config: TransportConfig,
}

impl Transport {
    /// Creates a transport with default timeouts (30s connect, 5min read).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport with explicit timeout configuration.
    #[must_use]
    pub fn with_config(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Fetches the request's URL into a freshly named staging file.
    ///
    /// The staging name embeds the process id and a per-process counter, so
    /// concurrent fetches never collide. Callers that persisted a staging
    /// name from an earlier failed attempt should use
    /// [`fetch_resumable`](Self::fetch_resumable) instead.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if:
    /// - The URL or proxy URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - Writing to the staging file fails
    /// - The transfer ends short of the advertised content length
    ///
    /// On failure the staging file is left on disk for later resumption.
    #[must_use = "the staging file must be installed or retained for resume"]
    #[instrument(skip(self, root), fields(url = %request.source_url))]
    pub async fn fetch(
        &self,
        request: &FetchRequest,
        root: &Path,
    ) -> Result<StagingFile, TransportError> {
        let staging_name = staging_file_name(&request.destination_name);
        self.fetch_resumable(request, root, &staging_name).await
    }

    /// Fetches into a caller-supplied staging name, resuming partial bytes.
    ///
    /// If a file already exists at `<root>/<staging_name>` and the server
    /// advertises `Accept-Ranges: bytes`, the transfer continues from the
    /// existing length with an HTTP Range request; otherwise the file is
    /// rewritten from scratch.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`fetch`](Self::fetch).
    #[must_use = "the staging file must be installed or retained for resume"]
    #[instrument(skip(self, root), fields(url = %request.source_url, staging = %staging_name))]
    pub async fn fetch_resumable(
        &self,
        request: &FetchRequest,
        root: &Path,
        staging_name: &str,
    ) -> Result<StagingFile, TransportError> {
        debug!("starting fetch");

        Url::parse(&request.source_url)
            .map_err(|_| TransportError::invalid_url(request.source_url.clone()))?;

        let client = self.build_client(request)?;
        let staging_path = root.join(staging_name);

        let (existing_bytes, supports_ranges) = self
            .determine_resume_state(&client, request, &staging_path)
            .await;
        let use_resume = supports_ranges && existing_bytes > 0;
        let range_value = use_resume.then(|| format!("bytes={existing_bytes}-"));

        // The staging file exists from this point on, request failure
        // included, so callers can resume it later.
        if existing_bytes == 0 {
            drop(
                File::create(&staging_path)
                    .await
                    .map_err(|e| TransportError::io(staging_path.clone(), e))?,
            );
        }

        let response = send_request(&client, request, "GET", range_value.as_deref()).await?;
        let resumed = use_resume && response.status().as_u16() == 206;

        // Open staging file (append for a granted resume, create/truncate otherwise)
        let mut file = if resumed {
            let mut handle = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&staging_path)
                .await
                .map_err(|e| TransportError::io(staging_path.clone(), e))?;
            handle
                .seek(std::io::SeekFrom::End(0))
                .await
                .map_err(|e| TransportError::io(staging_path.clone(), e))?;
            handle
        } else {
            File::create(&staging_path)
                .await
                .map_err(|e| TransportError::io(staging_path.clone(), e))?
        };

        let prior_bytes = if resumed { existing_bytes } else { 0 };
        let expected_total = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(|remaining| prior_bytes.saturating_add(remaining));

        let progress = make_progress_bar(request, expected_total, prior_bytes);

        // Stream response body to the staging file. On error the partial file
        // is retained: resumability is the recovery path, not cleanup.
        let bytes_written =
            stream_to_file(&mut file, response, &request.source_url, &staging_path, &progress)
                .await?;

        if let Some(bar) = &progress {
            bar.finish_and_clear();
        }

        let final_size = prior_bytes.saturating_add(bytes_written);
        if let Some(expected) = expected_total
            && expected != final_size
        {
            return Err(TransportError::incomplete(
                staging_path.clone(),
                expected,
                final_size,
            ));
        }

        info!(
            path = %staging_path.display(),
            bytes = final_size,
            resumed,
            "fetch complete"
        );

        Ok(StagingFile {
            name: staging_name.to_string(),
            path: staging_path,
            bytes_written: final_size,
            resumed,
        })
    }

    fn build_client(&self, request: &FetchRequest) -> Result<Client, TransportError> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(self.config.connect_timeout_secs))
            .timeout(Duration::from_secs(self.config.read_timeout_secs))
            .gzip(true);

        if let Some(proxy_url) = &request.proxy_url {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| TransportError::invalid_proxy(proxy_url.clone(), e))?;
            builder = builder.proxy(proxy);
        }

        if !request.strict_tls {
            warn!(url = %request.source_url, "TLS certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|e| TransportError::network(request.source_url.clone(), e))
    }

    /// Probes whether an existing partial staging file can be resumed.
    ///
    /// Returns (existing bytes, server supports byte ranges).
    async fn determine_resume_state(
        &self,
        client: &Client,
        request: &FetchRequest,
        staging_path: &Path,
    ) -> (u64, bool) {
        let existing_bytes = tokio::fs::metadata(staging_path)
            .await
            .map(|meta| meta.len())
            .unwrap_or(0);

        if existing_bytes == 0 {
            return (0, false);
        }

        let head_response = send_request(client, request, "HEAD", None).await.ok();
        let supports_ranges = head_response
            .as_ref()
            .and_then(|r| r.headers().get(ACCEPT_RANGES))
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("bytes"));

        debug!(existing_bytes, supports_ranges, "resume state determined");
        (existing_bytes, supports_ranges)
    }
}

async fn send_request(
    client: &Client,
    request: &FetchRequest,
    method: &str,
    range_header: Option<&str>,
) -> Result<reqwest::Response, TransportError> {
    let url = request.source_url.as_str();
    let mut builder = match method {
        "HEAD" => client.head(url),
        _ => client.get(url),
    };
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    if let Some(range) = range_header {
        builder = builder.header(RANGE, range);
    }

    let response = builder.send().await.map_err(|e| {
        if e.is_timeout() {
            TransportError::timeout(url)
        } else {
            TransportError::network(url, e)
        }
    })?;

    if !response.status().is_success() {
        return Err(TransportError::http_status(url, response.status().as_u16()));
    }

    Ok(response)
}

/// Streams the response body to the staging file, returning bytes written.
///
/// Errors are surfaced to the caller without touching the partial file.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    staging_path: &Path,
    progress: &Option<ProgressBar>,
) -> Result<u64, TransportError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| {
            if e.is_timeout() {
                TransportError::timeout(url)
            } else {
                TransportError::network(url, e)
            }
        })?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| TransportError::io(staging_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
        if let Some(bar) = progress {
            bar.inc(chunk.len() as u64);
        }
    }

    // Ensure all data is flushed to disk before the size check and rename
    writer
        .flush()
        .await
        .map_err(|e| TransportError::io(staging_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

/// Builds the download progress bar, or `None` when output is suppressed.
fn make_progress_bar(
    request: &FetchRequest,
    expected_total: Option<u64>,
    prior_bytes: u64,
) -> Option<ProgressBar> {
    if request.effective_quiet() {
        return None;
    }

    let bar = match expected_total {
        Some(total) => {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template(
                    "{msg} [{bar:30}] {bytes}/{total_bytes} ({bytes_per_sec})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar.set_position(prior_bytes);
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner} {msg} {bytes}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        }
    };
    bar.set_message(request.destination_name.clone());
    Some(bar)
}
