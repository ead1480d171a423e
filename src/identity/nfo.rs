//! Sidecar `.nfo` scanning.
//!
//! An NFO sits next to the video with the same stem (`Movie.mkv` →
//! `Movie.nfo` or `Movie.NFO`). It may be XML, a URL, or free text; the
//! first `tt` identifier anywhere in it is taken.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use sift_core::ImdbId;
use tracing::{debug, warn};

static IMDB_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"tt\d{7,}").expect("imdb id regex should compile"));

/// Candidate sidecar paths for `video`, in lookup order.
pub fn nfo_candidates(video: &Path) -> Vec<PathBuf> {
    ["nfo", "NFO"]
        .iter()
        .map(|ext| video.with_extension(ext))
        .collect()
}

/// First identifier found in `text`.
pub fn extract_imdb_id(text: &str) -> Option<ImdbId> {
    IMDB_ID_REGEX
        .find_iter(text)
        .find_map(|m| ImdbId::parse(m.as_str()))
}

/// Look for a sidecar NFO next to `video` and pull an identifier out of it.
///
/// A missing or unreadable NFO is not an error: it only means there is no
/// NFO evidence.
pub fn find_imdb_id(video: &Path) -> Option<ImdbId> {
    for candidate in nfo_candidates(video) {
        match std::fs::read(&candidate) {
            Ok(bytes) => {
                let id = extract_imdb_id(&String::from_utf8_lossy(&bytes));
                debug!(path = %candidate.display(), id = ?id.as_ref().map(ImdbId::as_str), "read NFO");
                if id.is_some() {
                    return id;
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %candidate.display(), error = %e, "failed to read NFO");
            }
        }
    }
    None
}
