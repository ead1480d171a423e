//! Release-name parsing.
//!
//! A name is lexed once; the group, tag fields and title are then each read
//! off the same token list.

use sift_core::paths::strip_known_extension;

use crate::tokenizer::{tokenize, SpannedToken, Token};
use crate::types::ParsedRelease;

/// Break a release name into its title and tags.
///
/// A trailing video, subtitle or NFO extension is ignored.
pub fn parse(input: &str) -> ParsedRelease {
    let input = strip_known_extension(input);
    let tokens = tokenize(input);

    if tokens.is_empty() {
        return ParsedRelease::new(clean_name(input));
    }

    let mut release = ParsedRelease::default();
    extract_group(&tokens, &mut release);
    extract_metadata(&tokens, &mut release);
    extract_title(&tokens, &mut release);
    release
}

/// Lightly clean a raw name for display: separators become spaces and
/// whitespace is collapsed. Case is preserved.
///
/// ```
/// assert_eq!(sift_parser::clean_name("just_a.file"), "just a file");
/// ```
pub fn clean_name(raw: &str) -> String {
    raw.replace(['.', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The release group is the plain word after the last hyphen, provided
/// nothing but separators or numbers follows it.
fn extract_group(tokens: &[SpannedToken<'_>], release: &mut ParsedRelease) {
    let Some(hyphen) = tokens.iter().rposition(|t| t.token == Token::Hyphen) else {
        return;
    };
    let Some(candidate) = tokens.get(hyphen + 1) else {
        return;
    };
    if !candidate.token.is_plain() || matches!(candidate.token, Token::Number(_)) {
        return;
    }
    let trailing_significant = tokens[hyphen + 2..]
        .iter()
        .any(|t| !t.token.is_separator() && !matches!(t.token, Token::Number(_)));
    if trailing_significant {
        return;
    }
    // A group only makes sense after at least one tag; otherwise the hyphen
    // is part of the title ("Spider-Man").
    if !tokens[..hyphen].iter().any(|t| t.token.ends_title()) {
        return;
    }
    release.group = candidate.token.text().map(str::to_string);
}

/// Fill the tag fields of `release`. The first tag of each kind wins.
fn extract_metadata(tokens: &[SpannedToken<'_>], release: &mut ParsedRelease) {
    let mut has_truehd = false;
    let mut has_atmos = false;
    let mut has_eac3 = false;

    for st in tokens {
        match &st.token {
            Token::Year(text) => {
                if release.year.is_none() {
                    release.year = text.parse().ok();
                }
            }

            Token::SeasonEpisode(text) => {
                if release.season.is_none() {
                    parse_season_episode(text, release);
                }
            }
            Token::CrossEpisode(text) => {
                if release.season.is_none() {
                    parse_cross_episode(text, release);
                }
            }
            Token::Season(text) => {
                if release.season.is_none() {
                    release.season = text[1..].parse().ok();
                }
            }

            Token::Resolution(text) => {
                if release.resolution.is_none() {
                    release.resolution = Some(normalize_resolution(text));
                }
            }

            Token::SourceBluRay(_) => set_if_none(&mut release.source, "BluRay"),
            Token::SourceWebDL(_) => set_if_none(&mut release.source, "WEB-DL"),
            Token::SourceWebRip(_) => set_if_none(&mut release.source, "WEBRip"),
            Token::SourceWeb(_) => set_if_none(&mut release.source, "WEB"),
            Token::SourceHDTV(_) => set_if_none(&mut release.source, "HDTV"),
            Token::SourceHDRip(_) => set_if_none(&mut release.source, "HDRip"),
            Token::SourceDVDRip(_) => set_if_none(&mut release.source, "DVDRip"),
            Token::SourceRemux(_) => set_if_none(&mut release.source, "Remux"),

            Token::CodecX264(_) => set_if_none(&mut release.video_codec, "x264"),
            Token::CodecX265(_) => set_if_none(&mut release.video_codec, "x265"),
            Token::CodecH264(_) => set_if_none(&mut release.video_codec, "H.264"),
            Token::CodecH265(_) => set_if_none(&mut release.video_codec, "H.265"),
            Token::CodecAV1(_) => set_if_none(&mut release.video_codec, "AV1"),
            Token::CodecXviD(_) => set_if_none(&mut release.video_codec, "XviD"),
            Token::CodecDivX(_) => set_if_none(&mut release.video_codec, "DivX"),

            // Compound codecs (TrueHD + Atmos, EAC3 + Atmos) are resolved
            // after the loop.
            Token::AudioDTSHD(_) => set_if_none(&mut release.audio_codec, "DTS-HD"),
            Token::AudioTrueHD(_) => has_truehd = true,
            Token::AudioAtmos(_) => has_atmos = true,
            Token::AudioEAC3(_) => has_eac3 = true,
            Token::AudioAC3(_) => set_if_none(&mut release.audio_codec, "AC3"),
            Token::AudioDTS(_) => set_if_none(&mut release.audio_codec, "DTS"),
            Token::AudioAAC(_) => set_if_none(&mut release.audio_codec, "AAC"),
            Token::AudioFLAC(_) => set_if_none(&mut release.audio_codec, "FLAC"),

            Token::HdrHDR10Plus(_) => set_if_none(&mut release.hdr, "HDR10+"),
            Token::HdrHDR10(_) => set_if_none(&mut release.hdr, "HDR10"),
            Token::HdrGeneric(_) => set_if_none(&mut release.hdr, "HDR"),
            Token::HdrDolbyVision(_) => set_if_none(&mut release.hdr, "DV"),

            Token::EditionDirectorsCut(_) => {
                set_if_none(&mut release.edition, "Director's Cut");
            }
            Token::EditionExtended(_) => set_if_none(&mut release.edition, "Extended"),
            Token::EditionUnrated(_) => set_if_none(&mut release.edition, "Unrated"),
            Token::EditionRemastered(_) => set_if_none(&mut release.edition, "Remastered"),
            Token::EditionIMAX(_) => set_if_none(&mut release.edition, "IMAX"),
            Token::EditionTheatrical(_) => set_if_none(&mut release.edition, "Theatrical"),

            Token::Proper(_) => {
                if release.revision.is_none() {
                    release.revision = Some(1);
                }
            }
            Token::Version(text) => {
                if let Ok(v) = text[1..].parse::<u8>() {
                    release.revision = Some(v);
                }
            }

            Token::Dot | Token::Hyphen | Token::Underscore | Token::Word(_) | Token::Number(_) => {}
        }
    }

    if release.audio_codec.is_none() {
        release.audio_codec = match (has_truehd, has_eac3, has_atmos) {
            (true, _, true) => Some("TrueHD Atmos".into()),
            (true, _, false) => Some("TrueHD".into()),
            (false, true, true) => Some("EAC3 Atmos".into()),
            (false, true, false) => Some("EAC3".into()),
            (false, false, true) => Some("Atmos".into()),
            (false, false, false) => None,
        };
    }
}

/// Build the title from the free-text tokens preceding the first tag.
///
/// A name that *starts* with a year ("2012.2009.1080p") keeps that year as
/// the title when another year follows.
fn extract_title(tokens: &[SpannedToken<'_>], release: &mut ParsedRelease) {
    let stop = tokens
        .iter()
        .position(|st| st.token.ends_title())
        .unwrap_or(tokens.len());

    if stop == 0 {
        if let Token::Year(text) = &tokens[0].token {
            let later_year = tokens[1..]
                .iter()
                .find_map(|t| match &t.token {
                    Token::Year(y) => y.parse::<u32>().ok(),
                    _ => None,
                });
            if let Some(year) = later_year {
                release.title = text.to_string();
                release.year = Some(year);
                return;
            }
        }
    }

    let parts: Vec<&str> = tokens[..stop]
        .iter()
        .filter(|st| st.token.is_plain())
        .filter_map(|st| st.token.text())
        .collect();

    release.title = parts.join(" ");
}

/// Parse a SeasonEpisode token like "S01E01" or "S02E03E04".
fn parse_season_episode(text: &str, release: &mut ParsedRelease) {
    let upper = text.to_ascii_uppercase();
    let after_s = &upper[1..];
    let Some(e_pos) = after_s.find('E') else {
        return;
    };
    release.season = after_s[..e_pos].parse().ok();

    let episodes: Vec<u32> = after_s[e_pos..]
        .split('E')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();
    release.episode = episodes.first().copied();
    if episodes.len() > 1 {
        release.episode_end = episodes.last().copied();
    }
}

/// Parse a CrossEpisode token like "1x02".
fn parse_cross_episode(text: &str, release: &mut ParsedRelease) {
    let lower = text.to_ascii_lowercase();
    if let Some((season, episode)) = lower.split_once('x') {
        release.season = season.parse().ok();
        release.episode = episode.parse().ok();
    }
}

/// Normalize a resolution token to its canonical form ("1080P" -> "1080p",
/// "4K" -> "2160p").
fn normalize_resolution(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    if lower == "4k" {
        "2160p".to_string()
    } else {
        lower
    }
}

/// First writer wins.
fn set_if_none(field: &mut Option<String>, value: &str) {
    if field.is_none() {
        *field = Some(value.to_string());
    }
}
