//! Per-file metadata records produced by identity resolution.
//!
//! A [`VideoInfo`] and a [`SubtitleInfo`] are built fresh for every run and
//! handed to downstream tooling (queues, uploaders) as plain serializable
//! values. Nothing in this crate persists them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::ids::ImdbId;

// ---------------------------------------------------------------------------
// HintSource
// ---------------------------------------------------------------------------

/// Where an identity hint came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintSource {
    /// A sidecar `.nfo` file next to the video.
    Nfo,
    /// A content-fingerprint lookup against a hash-indexed catalog.
    Hash,
    /// A title search against the cross-reference catalog.
    Catalog,
    /// The free-text suggestion search fallback.
    Suggestion,
}

impl fmt::Display for HintSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nfo => write!(f, "nfo"),
            Self::Hash => write!(f, "hash"),
            Self::Catalog => write!(f, "catalog"),
            Self::Suggestion => write!(f, "suggestion"),
        }
    }
}

// ---------------------------------------------------------------------------
// VideoInfo
// ---------------------------------------------------------------------------

/// Derived metadata for one video file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub path: PathBuf,
    pub file_name: String,
    /// File size in bytes.
    pub size: u64,
    /// 16-character hex content fingerprint; `None` when the file is too
    /// small for the fingerprint windows.
    pub hash: Option<String>,

    /// Parsed title, or the cleaned file stem when parsing found nothing.
    pub title: String,
    pub year: Option<u32>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub resolution: Option<String>,
    pub source: Option<String>,
    pub release_group: Option<String>,

    /// Identifier found in a sidecar NFO file.
    pub nfo_imdb_id: Option<ImdbId>,
    /// Identifier returned by the fingerprint lookup.
    pub hash_imdb_id: Option<ImdbId>,
    /// Identifier carried by a cross-reference catalog title match.
    pub catalog_imdb_id: Option<ImdbId>,
    /// Identifier picked from the suggestion search.
    pub suggested_imdb_id: Option<ImdbId>,
    /// Secondary catalog ID attached alongside the resolved identifier.
    pub trakt_id: Option<String>,

    /// The final, precedence-applied identifier.
    pub imdb_id: Option<ImdbId>,
    /// Which hint `imdb_id` was taken from.
    pub resolved_from: Option<HintSource>,
}

impl VideoInfo {
    /// Create a record with only file-system identity populated.
    ///
    /// The title starts out as the file stem; callers overwrite it with the
    /// parsed release title.
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        let file_name = file_name_of(&path);
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            file_name,
            size,
            hash: None,
            title,
            year: None,
            season: None,
            episode: None,
            resolution: None,
            source: None,
            release_group: None,
            nfo_imdb_id: None,
            hash_imdb_id: None,
            catalog_imdb_id: None,
            suggested_imdb_id: None,
            trakt_id: None,
            imdb_id: None,
            resolved_from: None,
        }
    }

    /// Whether a season number was parsed, i.e. this looks like an episode.
    pub fn is_episode(&self) -> bool {
        self.season.is_some_and(|s| s > 0)
    }

    /// Whether any identity hint was found.
    pub fn has_hints(&self) -> bool {
        self.nfo_imdb_id.is_some()
            || self.hash_imdb_id.is_some()
            || self.catalog_imdb_id.is_some()
            || self.suggested_imdb_id.is_some()
    }
}

// ---------------------------------------------------------------------------
// SubtitleInfo
// ---------------------------------------------------------------------------

/// Derived metadata for one subtitle file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleInfo {
    pub path: PathBuf,
    pub file_name: String,
    /// File size in bytes.
    pub size: u64,
    /// MD5 of the whole file, lowercase hex. Used for de-duplication.
    pub checksum: String,
    /// Canonical language code; never a raw filename fragment.
    pub language: Option<String>,
    /// File extension without the dot, lowercase.
    pub format: String,
    pub hearing_impaired: bool,
    pub forced: bool,
}

impl SubtitleInfo {
    /// Create a record with file-system identity and checksum populated.
    pub fn new(path: impl Into<PathBuf>, size: u64, checksum: impl Into<String>) -> Self {
        let path = path.into();
        let file_name = file_name_of(&path);
        let format = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        Self {
            path,
            file_name,
            size,
            checksum: checksum.into(),
            language: None,
            format,
            hearing_impaired: false,
            forced: false,
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
