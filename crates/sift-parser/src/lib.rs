//! sift-parser: file-name analysis for media files.
//!
//! - [`parse`] extracts structured metadata from scene/P2P release names
//!   such as `"The.Matrix.1999.1080p.BluRay.x264-GROUP"`.
//! - [`LanguageTable`] maps language aliases to canonical provider codes.
//! - [`Normalizer`] reduces video and subtitle names to comparison keys.
//! - [`detect_language`] and [`detect_flags`] classify subtitle names.
//!
//! # Quick start
//!
//! ```
//! use sift_parser::parse;
//!
//! let r = parse("The.Matrix.1999.1080p.BluRay.x264-GROUP");
//! assert_eq!(r.title, "The Matrix");
//! assert_eq!(r.year, Some(1999));
//! assert_eq!(r.resolution.as_deref(), Some("1080p"));
//! assert_eq!(r.source.as_deref(), Some("BluRay"));
//! assert_eq!(r.video_codec.as_deref(), Some("x264"));
//! assert_eq!(r.group.as_deref(), Some("GROUP"));
//! ```

pub mod detect;
pub mod language;
pub mod normalize;
pub mod tokenizer;
pub mod types;
mod parser;

pub use detect::{detect_flags, detect_language, SubtitleFlags};
pub use language::{LanguageInfo, LanguageTable};
pub use normalize::Normalizer;
pub use parser::clean_name;
pub use types::ParsedRelease;

/// Parse a release name into structured metadata.
///
/// This is the primary entry point. It tokenizes the input using a
/// Logos-based lexer, then applies heuristics to extract the title,
/// year, season/episode, resolution, source, codecs, HDR format, edition,
/// release group, and revision.
///
/// # Examples
///
/// ```
/// let r = sift_parser::parse("Inception.2010.2160p.BluRay.x265.HDR.DTS-HD.MA.5.1-RELEASE.mkv");
/// assert_eq!(r.title, "Inception");
/// assert_eq!(r.year, Some(2010));
/// assert_eq!(r.resolution.as_deref(), Some("2160p"));
/// assert_eq!(r.video_codec.as_deref(), Some("x265"));
/// ```
pub fn parse(input: &str) -> ParsedRelease {
    parser::parse(input)
}
