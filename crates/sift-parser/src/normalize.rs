//! Filename normalization for video/subtitle comparison.
//!
//! [`Normalizer::normalize`] reduces a file name to a lowercase,
//! space-separated key with the extension, flag markers, a trailing
//! language tag and release/quality vocabulary removed. Keys are only ever
//! compared for equality; they are not meant for display.

use std::sync::Arc;

use sift_core::paths::strip_known_extension;

use crate::detect::is_flag_token;
use crate::language::LanguageTable;

/// Release, quality, source and codec tags removed from names. Multi-word
/// entries are matched as consecutive whole words.
const RELEASE_VOCABULARY: &[&str] = &[
    // resolution
    "2160p", "1080p", "1080i", "720p", "576p", "480p", "4k", "uhd",
    // source
    "bluray", "blu ray", "bdrip", "brrip", "bd", "web dl", "webdl", "web rip", "webrip",
    "web", "hdtv", "hdrip", "dvdrip", "dvdscr", "dvd", "remux", "amzn", "nf", "hulu", "dsnp",
    // video codec
    "x264", "x265", "h 264", "h 265", "h264", "h265", "hevc", "avc", "av1", "xvid", "divx",
    "10bit", "8bit",
    // audio
    "aac", "aac2", "ac3", "e ac3", "eac3", "dd", "dd5", "ddp", "ddp5", "dd+", "dts", "dts hd",
    "dts hd ma", "dts x", "truehd", "atmos", "flac", "mp3", "opus",
    // hdr
    "hdr", "hdr10", "hdr10+", "dv", "dovi", "dolby vision",
    // edition and revision
    "extended", "extended cut", "extended edition", "directors cut", "director's cut",
    "unrated", "uncut", "remastered", "imax", "theatrical", "theatrical cut", "proper",
    "repack", "rerip", "internal", "limited",
];

/// Builds canonical comparison keys from file names.
#[derive(Debug, Clone)]
pub struct Normalizer {
    languages: Arc<LanguageTable>,
    /// Vocabulary split into words, longest entry first.
    vocabulary: Vec<Vec<String>>,
}

impl Normalizer {
    pub fn new(languages: Arc<LanguageTable>) -> Self {
        let mut vocabulary: Vec<Vec<String>> = RELEASE_VOCABULARY
            .iter()
            .map(|entry| entry.split(' ').map(str::to_string).collect())
            .collect();
        // Stable sort keeps declaration order within one length.
        vocabulary.sort_by(|a, b| b.len().cmp(&a.len()));
        Self {
            languages,
            vocabulary,
        }
    }

    /// The language table this normalizer strips tags with.
    pub fn languages(&self) -> &Arc<LanguageTable> {
        &self.languages
    }

    /// Normalize a file name into its comparison key.
    ///
    /// The result is stable under repeated application:
    /// `normalize(&normalize(x)) == normalize(x)`.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use sift_parser::{LanguageTable, Normalizer};
    ///
    /// let n = Normalizer::new(Arc::new(LanguageTable::build()));
    /// assert_eq!(
    ///     n.normalize("My.Movie.2023.BluRay.x264-GRP.eng.sdh.forced.srt"),
    ///     "my movie 2023 grp",
    /// );
    /// ```
    pub fn normalize(&self, name: &str) -> String {
        let stem = strip_known_extension(name.trim());
        let lowered = stem.replace(['.', '_', '-'], " ").to_lowercase();
        let mut tokens: Vec<String> = lowered.split_whitespace().map(str::to_string).collect();

        // Reduction only ever removes tokens, so an unchanged length means
        // a fixpoint.
        loop {
            let before = tokens.len();
            self.reduce(&mut tokens);
            if tokens.len() == before {
                break;
            }
        }

        tokens.join(" ")
    }

    /// One reduction pass over the token list.
    fn reduce(&self, tokens: &mut Vec<String>) {
        tokens.retain(|t| !is_flag_token(t));
        self.strip_trailing_language(tokens);
        for _ in 0..2 {
            for entry in &self.vocabulary {
                remove_phrase(tokens, entry);
            }
        }
        tokens.retain(|t| !(t.len() == 1 && t.chars().all(|c| c.is_ascii_digit())));
    }

    /// Drop a trailing one- or two-word language tag. The tag is kept when
    /// it is all that is left of the name.
    fn strip_trailing_language(&self, tokens: &mut Vec<String>) {
        let n = tokens.len();
        if n >= 3 {
            let pair = format!("{} {}", tokens[n - 2], tokens[n - 1]);
            if self.languages.lookup(&pair).is_some() {
                tokens.truncate(n - 2);
                return;
            }
        }
        if n >= 2 && self.languages.lookup(&tokens[n - 1]).is_some() {
            tokens.truncate(n - 1);
        }
    }
}

/// Remove every whole-word occurrence of `phrase` from `tokens`.
fn remove_phrase(tokens: &mut Vec<String>, phrase: &[String]) {
    let len = phrase.len();
    if len == 0 || tokens.len() < len {
        return;
    }
    let mut i = 0;
    while i + len <= tokens.len() {
        if tokens[i..i + len] == *phrase {
            tokens.drain(i..i + len);
        } else {
            i += 1;
        }
    }
}
