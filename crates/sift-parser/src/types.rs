//! Parsed release data.

use serde::{Deserialize, Serialize};

/// What could be read out of a release name.
///
/// Fields are populated on a best-effort basis. `title` may be empty when
/// the name consists solely of recognized tags; [`ParsedRelease::is_empty`]
/// reports that case so callers can fall back to the raw name.
///
/// # Examples
///
/// ```
/// use sift_parser::parse;
///
/// let r = parse("Heat.1995.720p.BluRay.x264-CREW");
/// assert_eq!(r.title, "Heat");
/// assert_eq!(r.year, Some(1995));
/// assert_eq!(r.resolution.as_deref(), Some("720p"));
/// assert_eq!(r.source.as_deref(), Some("BluRay"));
/// assert_eq!(r.group.as_deref(), Some("CREW"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedRelease {
    /// The cleaned title (separators replaced with spaces, trimmed).
    pub title: String,

    /// Four-digit year in 1900..=2099.
    pub year: Option<u32>,

    /// Season number (from S01E01, 1x01 or S01 tags).
    pub season: Option<u32>,

    /// Episode number (from S01E01 or 1x01 tags).
    pub episode: Option<u32>,

    /// Last episode of a multi-episode file (`S01E01E02` gives 2).
    pub episode_end: Option<u32>,

    /// Canonical resolution; `4k` is reported as `2160p`.
    pub resolution: Option<String>,

    /// Media source, e.g. `"BluRay"`, `"WEB-DL"`, `"WEBRip"`, `"HDTV"`, `"Remux"`.
    pub source: Option<String>,

    /// Codec as written, `x264`, `HEVC`, ...
    pub video_codec: Option<String>,

    /// Audio codec, e.g. `"AAC"`, `"DTS"`, `"DTS-HD"`, `"TrueHD Atmos"`, `"EAC3"`, `"AC3"`.
    pub audio_codec: Option<String>,

    /// HDR format, e.g. `"HDR"`, `"HDR10"`, `"HDR10+"`, `"DV"`.
    pub hdr: Option<String>,

    /// Edition, e.g. `"Director's Cut"`, `"Extended"`, `"Unrated"`.
    pub edition: Option<String>,

    /// Word after the final hyphen.
    pub group: Option<String>,

    /// Revision indicator: `"PROPER"`/`"REPACK"` → 1, `"v2"` → 2, etc.
    pub revision: Option<u8>,
}

impl ParsedRelease {
    /// A release that carries nothing but a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Whether parsing produced no usable title.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty()
    }

    /// Whether a season tag was found.
    pub fn is_episode(&self) -> bool {
        self.season.is_some()
    }
}
