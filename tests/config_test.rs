//! Integration tests for configuration loading and validation.

use serial_test::serial;
use std::fs;
use subsift::config::{
    load_config, load_config_or_default, Config, ENV_OPENSUBTITLES_API_KEY, ENV_TRAKT_CLIENT_ID,
};
use tempfile::tempdir;

fn clear_env() {
    std::env::remove_var(ENV_OPENSUBTITLES_API_KEY);
    std::env::remove_var(ENV_TRAKT_CLIENT_ID);
}

#[test]
#[serial]
fn defaults_fill_every_section() {
    clear_env();
    let temp = tempdir().unwrap();
    let path = temp.path().join("empty.toml");
    fs::write(&path, "").unwrap();

    let config = load_config(&path).unwrap();
    assert!(config.providers.opensubtitles_api_key.is_empty());
    assert_eq!(config.providers.trakt_url, "https://api.trakt.tv");
    assert_eq!(config.providers.request_timeout_secs, 30);
    assert_eq!(config.providers.requests_per_second, 4);
    assert!(config.resolver.suggestions);
    assert_eq!(config.resolver.concurrency, 4);
    assert!(config.scan.recursive);
    assert!(config.scan.video_extensions.iter().any(|e| e == "mkv"));
    assert!(config.scan.subtitle_extensions.iter().any(|e| e == "srt"));
}

#[test]
#[serial]
fn file_values_are_read() {
    clear_env();
    let temp = tempdir().unwrap();
    let path = temp.path().join("subsift.toml");
    fs::write(
        &path,
        r#"
[providers]
opensubtitles_api_key = "os-key"
opensubtitles_url = "http://localhost:9000/api/v1"
request_timeout_secs = 5

[resolver]
suggestions = false
concurrency = 2

[scan]
recursive = false
video_extensions = ["mkv"]
subtitle_extensions = ["srt", "ass"]
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.providers.opensubtitles_api_key, "os-key");
    assert_eq!(config.providers.opensubtitles_url, "http://localhost:9000/api/v1");
    assert_eq!(
        config.providers.http_settings().timeout,
        std::time::Duration::from_secs(5)
    );
    assert!(!config.resolver.suggestions);
    assert_eq!(config.resolver.concurrency, 2);
    assert!(!config.scan.recursive);
    assert!(config.scan.is_video(std::path::Path::new("a/B.MKV")));
    assert!(!config.scan.is_video(std::path::Path::new("a/b.mp4")));
    assert!(config.scan.is_subtitle(std::path::Path::new("b.ass")));
}

#[test]
#[serial]
fn environment_overrides_credentials() {
    clear_env();
    let temp = tempdir().unwrap();
    let path = temp.path().join("subsift.toml");
    fs::write(&path, "[providers]\nopensubtitles_api_key = \"from-file\"\n").unwrap();

    std::env::set_var(ENV_OPENSUBTITLES_API_KEY, "from-env");
    std::env::set_var(ENV_TRAKT_CLIENT_ID, "trakt-env");
    let config = load_config(&path).unwrap();
    clear_env();

    assert_eq!(config.providers.opensubtitles_api_key, "from-env");
    assert_eq!(config.providers.trakt_client_id, "trakt-env");
}

#[test]
#[serial]
fn blank_environment_is_ignored() {
    clear_env();
    let temp = tempdir().unwrap();
    let path = temp.path().join("subsift.toml");
    fs::write(&path, "[providers]\ntrakt_client_id = \"file-id\"\n").unwrap();

    std::env::set_var(ENV_TRAKT_CLIENT_ID, "   ");
    let config = load_config(&path).unwrap();
    clear_env();

    assert_eq!(config.providers.trakt_client_id, "file-id");
}

#[test]
#[serial]
fn explicit_path_wins_over_defaults() {
    clear_env();
    let temp = tempdir().unwrap();
    let path = temp.path().join("custom.toml");
    fs::write(&path, "[resolver]\nconcurrency = 9\n").unwrap();

    let config = load_config_or_default(Some(&path)).unwrap();
    assert_eq!(config.resolver.concurrency, 9);
}

#[test]
#[serial]
fn fatal_validation() {
    clear_env();
    let temp = tempdir().unwrap();

    let cases = [
        ("[resolver]\nconcurrency = 0\n", "concurrency"),
        ("[scan]\nvideo_extensions = []\n", "video_extensions"),
        ("[scan]\nsubtitle_extensions = []\n", "subtitle_extensions"),
        ("[providers]\nrequest_timeout_secs = 0\n", "request_timeout_secs"),
    ];
    for (i, (body, needle)) in cases.iter().enumerate() {
        let path = temp.path().join(format!("bad{i}.toml"));
        fs::write(&path, body).unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains(needle), "{body:?} -> {err}");
    }
}

#[test]
fn missing_file_is_an_error() {
    let temp = tempdir().unwrap();
    let err = load_config(&temp.path().join("nope.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn warnings_for_missing_credentials_and_bad_urls() {
    let mut config = Config::default();
    let warnings = config.validate();
    assert!(warnings.iter().any(|w| w.contains("OpenSubtitles")));
    assert!(warnings.iter().any(|w| w.contains("Trakt")));

    config.providers.opensubtitles_api_key = "k".into();
    config.providers.trakt_client_id = "c".into();
    assert!(config.validate().is_empty());

    config.providers.trakt_url = "ftp://example.com".into();
    config.providers.requests_per_second = 0;
    let warnings = config.validate();
    assert_eq!(warnings.len(), 2, "{warnings:?}");
}
