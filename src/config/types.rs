use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::identity::providers::{imdb, opensubtitles, trakt, HttpSettings};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    /// OpenSubtitles API key (empty disables fingerprint lookups)
    #[serde(default)]
    pub opensubtitles_api_key: String,

    #[serde(default = "default_opensubtitles_url")]
    pub opensubtitles_url: String,

    /// Trakt client id (empty disables cross-reference lookups)
    #[serde(default)]
    pub trakt_client_id: String,

    #[serde(default = "default_trakt_url")]
    pub trakt_url: String,

    #[serde(default = "default_imdb_suggest_url")]
    pub imdb_suggest_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Per-provider request rate (default: 4)
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

fn default_opensubtitles_url() -> String {
    opensubtitles::DEFAULT_BASE_URL.to_string()
}
fn default_trakt_url() -> String {
    trakt::DEFAULT_BASE_URL.to_string()
}
fn default_imdb_suggest_url() -> String {
    imdb::DEFAULT_BASE_URL.to_string()
}
fn default_user_agent() -> String {
    format!("subsift v{}", env!("CARGO_PKG_VERSION"))
}
fn default_request_timeout() -> u64 {
    30
}
fn default_requests_per_second() -> u32 {
    4
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            opensubtitles_api_key: String::new(),
            opensubtitles_url: default_opensubtitles_url(),
            trakt_client_id: String::new(),
            trakt_url: default_trakt_url(),
            imdb_suggest_url: default_imdb_suggest_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

impl ProvidersConfig {
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout: Duration::from_secs(self.request_timeout_secs),
            requests_per_second: self.requests_per_second,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Fall back to free-text suggestions when nothing else identified a video
    #[serde(default = "default_suggestions")]
    pub suggestions: bool,

    /// Pairs resolved in parallel by `scan`
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_suggestions() -> bool {
    true
}
fn default_concurrency() -> usize {
    4
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            suggestions: default_suggestions(),
            concurrency: default_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScanConfig {
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,

    #[serde(default = "default_subtitle_extensions")]
    pub subtitle_extensions: Vec<String>,
}

fn default_recursive() -> bool {
    true
}
fn default_video_extensions() -> Vec<String> {
    sift_core::paths::video_extensions()
        .iter()
        .map(|e| e.to_string())
        .collect()
}
fn default_subtitle_extensions() -> Vec<String> {
    sift_core::paths::subtitle_extensions()
        .iter()
        .map(|e| e.to_string())
        .collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: default_recursive(),
            video_extensions: default_video_extensions(),
            subtitle_extensions: default_subtitle_extensions(),
        }
    }
}

impl ScanConfig {
    pub fn is_video(&self, path: &std::path::Path) -> bool {
        has_extension(path, &self.video_extensions)
    }

    pub fn is_subtitle(&self, path: &std::path::Path) -> bool {
        has_extension(path, &self.subtitle_extensions)
    }
}

fn has_extension(path: &std::path::Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}
