//! Ambient npm configuration collaborator.
//!
//! The cache core consumes already-resolved proxy and TLS settings; this
//! module is the external component that resolves them from the user-level
//! npm configuration file (`~/.npmrc`, ini-style `key = value` lines).
//!
//! Reading or parsing failures are non-fatal by contract: they are logged and
//! defaults are used.

use std::path::PathBuf;

use tracing::{debug, warn};

/// Settings the npm configuration can contribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NpmrcConfig {
    /// `proxy` setting.
    pub proxy: Option<String>,
    /// `https-proxy` setting; preferred over `proxy` when both are set.
    pub https_proxy: Option<String>,
    /// `strict-ssl = false` disables TLS verification.
    pub strict_ssl: Option<bool>,
}

impl NpmrcConfig {
    /// The proxy URL to use, https-proxy winning over proxy.
    #[must_use]
    pub fn effective_proxy(&self) -> Option<String> {
        self.https_proxy.clone().or_else(|| self.proxy.clone())
    }
}

/// Loads the user npm configuration, returning defaults on any failure.
///
/// The file location follows npm's convention: `NPM_CONFIG_USERCONFIG` when
/// set, `~/.npmrc` otherwise.
#[must_use]
pub fn load_user_config() -> NpmrcConfig {
    let Some(path) = user_config_path() else {
        debug!("no npm user config location, using defaults");
        return NpmrcConfig::default();
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => parse_npmrc(&contents),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no npm config file, using defaults");
            NpmrcConfig::default()
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "failed reading the npm configuration, using defaults");
            NpmrcConfig::default()
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("NPM_CONFIG_USERCONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".npmrc"))
}

/// Parses the ini-style npm config, keeping only the keys we recognize.
///
/// Unknown keys and malformed lines are skipped, never errors.
fn parse_npmrc(contents: &str) -> NpmrcConfig {
    let mut config = NpmrcConfig::default();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim().trim_matches('"');

        match key {
            "proxy" => config.proxy = Some(value.to_string()),
            "https-proxy" => config.https_proxy = Some(value.to_string()),
            "strict-ssl" => config.strict_ssl = value.parse::<bool>().ok(),
            _ => {}
        }
    }

    config
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_npmrc_extracts_recognized_keys() {
        let config = parse_npmrc(
            "registry=https://registry.npmjs.org/\n\
             proxy=http://proxy.corp.test:3128\n\
             https-proxy=http://secure-proxy.corp.test:3128\n\
             strict-ssl=false\n",
        );
        assert_eq!(config.proxy.as_deref(), Some("http://proxy.corp.test:3128"));
        assert_eq!(
            config.https_proxy.as_deref(),
            Some("http://secure-proxy.corp.test:3128")
        );
        assert_eq!(config.strict_ssl, Some(false));
    }

    #[test]
    fn test_parse_npmrc_skips_comments_and_malformed_lines() {
        let config = parse_npmrc(
            "# comment\n\
             ; other comment\n\
             not a key value line\n\
             proxy = http://proxy.corp.test:3128\n",
        );
        assert_eq!(config.proxy.as_deref(), Some("http://proxy.corp.test:3128"));
        assert!(config.https_proxy.is_none());
    }

    #[test]
    fn test_effective_proxy_prefers_https_proxy() {
        let config = NpmrcConfig {
            proxy: Some("http://plain.test".to_string()),
            https_proxy: Some("http://secure.test".to_string()),
            strict_ssl: None,
        };
        assert_eq!(config.effective_proxy().as_deref(), Some("http://secure.test"));
    }

    #[test]
    fn test_effective_proxy_falls_back_to_proxy() {
        let config = NpmrcConfig {
            proxy: Some("http://plain.test".to_string()),
            https_proxy: None,
            strict_ssl: None,
        };
        assert_eq!(config.effective_proxy().as_deref(), Some("http://plain.test"));
    }

    #[test]
    fn test_empty_contents_yield_defaults() {
        assert_eq!(parse_npmrc(""), NpmrcConfig::default());
    }
}
