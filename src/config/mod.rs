mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

pub const ENV_OPENSUBTITLES_API_KEY: &str = "SUBSIFT_OPENSUBTITLES_API_KEY";
pub const ENV_TRAKT_CLIENT_ID: &str = "SUBSIFT_TRAKT_CLIENT_ID";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./subsift.toml",
        "~/.config/subsift/config.toml",
        "/etc/subsift/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Credentials from the environment win over the file.
fn apply_env_overrides(config: &mut Config) {
    if let Some(key) = env_non_empty(ENV_OPENSUBTITLES_API_KEY) {
        config.providers.opensubtitles_api_key = key;
    }
    if let Some(id) = env_non_empty(ENV_TRAKT_CLIENT_ID) {
        config.providers.trakt_client_id = id;
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Fatal validation
fn validate_config(config: &Config) -> Result<()> {
    if config.resolver.concurrency == 0 {
        anyhow::bail!("resolver.concurrency must be at least 1");
    }
    if config.scan.video_extensions.is_empty() {
        anyhow::bail!("scan.video_extensions cannot be empty");
    }
    if config.scan.subtitle_extensions.is_empty() {
        anyhow::bail!("scan.subtitle_extensions cannot be empty");
    }
    if config.providers.request_timeout_secs == 0 {
        anyhow::bail!("providers.request_timeout_secs must be at least 1");
    }

    for warning in config.validate() {
        tracing::warn!("{}", warning);
    }

    Ok(())
}

impl Config {
    /// Non-fatal problems worth telling the user about.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let p = &self.providers;

        if p.opensubtitles_api_key.is_empty() {
            warnings.push(format!(
                "No OpenSubtitles API key (set providers.opensubtitles_api_key or {}); fingerprint lookups are disabled",
                ENV_OPENSUBTITLES_API_KEY
            ));
        }
        if p.trakt_client_id.is_empty() {
            warnings.push(format!(
                "No Trakt client id (set providers.trakt_client_id or {}); catalog lookups are disabled",
                ENV_TRAKT_CLIENT_ID
            ));
        }
        if self.resolver.suggestions && p.imdb_suggest_url.trim().is_empty() {
            warnings.push("resolver.suggestions is enabled but providers.imdb_suggest_url is empty".into());
        }
        if p.requests_per_second == 0 {
            warnings.push("providers.requests_per_second is 0; using 1".into());
        }
        for (name, url) in [
            ("opensubtitles_url", &p.opensubtitles_url),
            ("trakt_url", &p.trakt_url),
            ("imdb_suggest_url", &p.imdb_suggest_url),
        ] {
            if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
                warnings.push(format!("providers.{name} is not an http(s) URL: {url}"));
            }
        }

        warnings
    }
}
