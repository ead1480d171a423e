//! Path utilities for detecting file types by extension.
//!
//! The scanner uses these to classify directory entries, and the filename
//! normalizer uses [`strip_known_extension`] so that only real container
//! extensions are removed (`The.Matrix.1999` keeps its year).

use std::path::Path;

/// Video container extensions.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "ts", "m2ts", "webm", "mov", "wmv", "flv", "mpg", "mpeg",
    "ogm", "divx", "vob",
];

/// Subtitle file extensions.
const SUBTITLE_EXTENSIONS: &[&str] = &[
    "srt", "ass", "ssa", "sub", "vtt", "idx", "smi", "sami", "txt", "mpl", "sup",
];

/// Sidecar metadata extensions.
const NFO_EXTENSIONS: &[&str] = &["nfo"];

fn extension_in(path: &Path, list: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| list.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check if a path has a video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use sift_core::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("movie.mkv")));
/// assert!(is_video_file(Path::new("/path/to/VIDEO.MP4")));
/// assert!(!is_video_file(Path::new("subtitle.srt")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    extension_in(path, VIDEO_EXTENSIONS)
}

/// Check if a path has a subtitle file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use sift_core::paths::is_subtitle_file;
///
/// assert!(is_subtitle_file(Path::new("movie.en.srt")));
/// assert!(!is_subtitle_file(Path::new("video.mkv")));
/// ```
pub fn is_subtitle_file(path: &Path) -> bool {
    extension_in(path, SUBTITLE_EXTENSIONS)
}

/// Strip a trailing `.ext` from `name` if `ext` is one of `extensions`
/// (case-insensitive). Anything else is returned unchanged.
pub fn strip_extension_in<'a>(name: &'a str, extensions: &[&str]) -> &'a str {
    match name.rfind('.') {
        Some(dot) if dot > 0 => {
            let ext = name[dot + 1..].to_ascii_lowercase();
            if extensions.contains(&ext.as_str()) {
                &name[..dot]
            } else {
                name
            }
        }
        _ => name,
    }
}

/// Strip a video, subtitle, or NFO extension from a file name.
///
/// # Examples
///
/// ```
/// use sift_core::paths::strip_known_extension;
///
/// assert_eq!(strip_known_extension("Movie.2020.mkv"), "Movie.2020");
/// assert_eq!(strip_known_extension("Movie.en.SRT"), "Movie.en");
/// assert_eq!(strip_known_extension("The.Matrix.1999"), "The.Matrix.1999");
/// ```
pub fn strip_known_extension(name: &str) -> &str {
    let stripped = strip_extension_in(name, VIDEO_EXTENSIONS);
    if stripped.len() != name.len() {
        return stripped;
    }
    let stripped = strip_extension_in(name, SUBTITLE_EXTENSIONS);
    if stripped.len() != name.len() {
        return stripped;
    }
    strip_extension_in(name, NFO_EXTENSIONS)
}

/// Strip a subtitle extension only.
pub fn strip_subtitle_extension(name: &str) -> &str {
    strip_extension_in(name, SUBTITLE_EXTENSIONS)
}

/// Get the list of video file extensions.
#[must_use]
pub fn video_extensions() -> &'static [&'static str] {
    VIDEO_EXTENSIONS
}

/// Get the list of subtitle file extensions.
#[must_use]
pub fn subtitle_extensions() -> &'static [&'static str] {
    SUBTITLE_EXTENSIONS
}
