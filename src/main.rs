//! CLI entry point for the artifact cache tool.

use std::sync::Arc;

use anyhow::{Context, Result};
use artifact_cache_core::{
    ArtifactCache, CacheConfig, FetchRequest, Sha256Verifier, TransportConfig,
};
use clap::Parser;
use tracing::debug;

mod cli;
mod npmrc;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    // Ambient npm config supplies proxy/TLS defaults; CLI flags win.
    let ambient = npmrc::load_user_config();
    let proxy = args.proxy.clone().or_else(|| ambient.effective_proxy());
    let strict_tls = if args.no_strict_tls {
        false
    } else {
        ambient.strict_ssl.unwrap_or(true)
    };

    let mut request = FetchRequest::new(&args.url, &args.destination_name)
        .with_strict_tls(strict_tls)
        .with_quiet(args.quiet);
    for (name, value) in &args.headers {
        request = request.with_header(name, value);
    }
    if let Some(proxy_url) = proxy {
        request = request.with_proxy(proxy_url);
    }

    let mut cache = ArtifactCache::new(CacheConfig {
        root_override: args.cache_dir.clone(),
        transport: TransportConfig::default(),
    });
    if let Some(checksum) = &args.checksum {
        cache = cache.with_verifier(Arc::new(Sha256Verifier::new(checksum)));
    }

    let outcome = cache
        .get(&request)
        .await
        .with_context(|| format!("failed to fetch {}", args.url))?;

    if args.json {
        println!("{}", serde_json::to_string(&outcome)?);
    } else {
        println!("{}", outcome.path.display());
    }

    Ok(())
}
