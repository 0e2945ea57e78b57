//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Fetch a versioned binary artifact once and serve it from a local cache.
///
/// Prints the cached local path on success. The artifact is downloaded only
/// when absent from the cache; repeated invocations are network-free.
#[derive(Parser, Debug)]
#[command(name = "artifact-cache")]
#[command(author, version, about)]
pub struct Args {
    /// Source URL to fetch the artifact from
    pub url: String,

    /// Filename the artifact is cached under
    pub destination_name: String,

    /// Cache directory override (default: per-user platform cache)
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Extra request header, repeatable (NAME=VALUE)
    #[arg(long = "header", value_name = "NAME=VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// HTTP(S) proxy URL (default: proxy / https-proxy from the npm config)
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Disable TLS certificate verification
    #[arg(long)]
    pub no_strict_tls: bool,

    /// Expected SHA-256 digest of the artifact (hex); mismatch fails the fetch
    #[arg(long, value_name = "HEX")]
    pub checksum: Option<String>,

    /// Print the outcome as JSON instead of the bare path
    #[arg(long)]
    pub json: bool,

    /// Suppress progress output and non-error logs
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let Some((name, value)) = raw.split_once('=') else {
        return Err(format!("expected NAME=VALUE, got `{raw}`"));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in `{raw}`"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_minimal_args_parse_successfully() {
        let args = Args::try_parse_from([
            "artifact-cache",
            "https://example.test/tool.bin",
            "tool-1.0.0.bin",
        ])
        .unwrap();
        assert_eq!(args.url, "https://example.test/tool.bin");
        assert_eq!(args.destination_name, "tool-1.0.0.bin");
        assert!(args.cache_dir.is_none());
        assert!(args.headers.is_empty());
        assert!(!args.no_strict_tls);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_missing_destination_is_an_error() {
        let result = Args::try_parse_from(["artifact-cache", "https://example.test/tool.bin"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_headers_parse_into_pairs() {
        let args = Args::try_parse_from([
            "artifact-cache",
            "https://example.test/tool.bin",
            "tool-1.0.0.bin",
            "--header",
            "authorization=Bearer abc",
            "--header",
            "x-trace=1",
        ])
        .unwrap();
        assert_eq!(
            args.headers,
            vec![
                ("authorization".to_string(), "Bearer abc".to_string()),
                ("x-trace".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_cli_malformed_header_is_an_error() {
        let result = Args::try_parse_from([
            "artifact-cache",
            "https://example.test/tool.bin",
            "tool-1.0.0.bin",
            "--header",
            "no-separator",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from([
            "artifact-cache",
            "https://example.test/tool.bin",
            "tool-1.0.0.bin",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
    }
}
