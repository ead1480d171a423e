//! Subtitle language and flag detection from file names.

use serde::{Deserialize, Serialize};
use sift_core::paths::strip_subtitle_extension;

use crate::language::LanguageTable;

/// Whole-word markers for hearing-impaired subtitles.
pub const HEARING_IMPAIRED_TOKENS: &[&str] = &["sdh", "hi", "hearingimpaired"];

/// Whole-word markers for forced subtitles.
pub const FORCED_TOKENS: &[&str] = &["forced", "frc"];

/// Flags carried in a subtitle file name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleFlags {
    pub hearing_impaired: bool,
    pub forced: bool,
}

/// Whether `token` (lowercase) is one of the flag markers.
pub fn is_flag_token(token: &str) -> bool {
    HEARING_IMPAIRED_TOKENS.contains(&token) || FORCED_TOKENS.contains(&token)
}

/// Split a subtitle file name into lowercase tokens on `.`, `_`, `-` and
/// whitespace, after removing a subtitle extension.
fn name_tokens(file_name: &str) -> Vec<String> {
    strip_subtitle_extension(file_name.trim())
        .split(|c: char| matches!(c, '.' | '_' | '-') || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Detect the subtitle language from its file name.
///
/// Tokens are scanned right to left and the first one found in `table`
/// wins; a two-word key ending at a position (`pt br`) is tried before the
/// single word. Flag markers are never read as languages.
///
/// ```
/// use sift_parser::{detect_language, LanguageTable};
///
/// let table = LanguageTable::build();
/// assert_eq!(detect_language(&table, "movie.en.subtitle.fr.srt"), Some("fre"));
/// assert_eq!(detect_language(&table, "Movie.2020.pt-BR.srt"), Some("pob"));
/// assert_eq!(detect_language(&table, "Movie.2020.srt"), None);
/// ```
pub fn detect_language(table: &LanguageTable, file_name: &str) -> Option<&'static str> {
    let tokens = name_tokens(file_name);
    for i in (0..tokens.len()).rev() {
        let token = &tokens[i];
        if is_flag_token(token) {
            continue;
        }
        if i > 0 && !is_flag_token(&tokens[i - 1]) {
            let pair = format!("{} {}", tokens[i - 1], token);
            if let Some(code) = table.canonical_code(&pair) {
                return Some(code);
            }
        }
        if let Some(code) = table.canonical_code(token) {
            return Some(code);
        }
    }
    None
}

/// Detect hearing-impaired and forced markers anywhere in the file name.
pub fn detect_flags(file_name: &str) -> SubtitleFlags {
    let mut flags = SubtitleFlags::default();
    for token in name_tokens(file_name) {
        if HEARING_IMPAIRED_TOKENS.contains(&token.as_str()) {
            flags.hearing_impaired = true;
        }
        if FORCED_TOKENS.contains(&token.as_str()) {
            flags.forced = true;
        }
    }
    flags
}
