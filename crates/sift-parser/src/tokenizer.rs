//! Release-name lexer.
//!
//! Keyword patterns are case-insensitive. Where two patterns can match the
//! same span, the more specific one carries the higher priority.

use logos::Logos;

/// One lexed piece of a release name.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")]
pub enum Token<'src> {
    /// `1080p`, `720i`, ... and the `4k` alias.
    #[regex(r"(?i)(2160|1080|720|576|480)[pi]", priority = 10)]
    #[regex(r"(?i)4k", priority = 10)]
    Resolution(&'src str),

    /// Any Blu-ray derived source.
    #[regex(r"(?i)(Blu-?Ray|BRRip|BDRip)", priority = 8)]
    SourceBluRay(&'src str),

    #[regex(r"(?i)WEB-?DL", priority = 8)]
    SourceWebDL(&'src str),

    #[regex(r"(?i)WEB-?Rip", priority = 8)]
    SourceWebRip(&'src str),

    /// Bare `WEB`; loses to the longer web sources.
    #[regex(r"(?i)WEB", priority = 5)]
    SourceWeb(&'src str),

    #[regex(r"(?i)HDTV", priority = 8)]
    SourceHDTV(&'src str),

    #[regex(r"(?i)HDRip", priority = 8)]
    SourceHDRip(&'src str),

    #[regex(r"(?i)DVDRip", priority = 8)]
    SourceDVDRip(&'src str),

    #[regex(r"(?i)Remux", priority = 8)]
    SourceRemux(&'src str),

    #[regex(r"(?i)x264", priority = 9)]
    CodecX264(&'src str),

    #[regex(r"(?i)x265", priority = 9)]
    CodecX265(&'src str),

    #[regex(r"(?i)(H\.?264|AVC)", priority = 8)]
    CodecH264(&'src str),

    #[regex(r"(?i)(H\.?265|HEVC)", priority = 8)]
    CodecH265(&'src str),

    #[regex(r"(?i)AV1", priority = 8)]
    CodecAV1(&'src str),

    #[regex(r"(?i)XviD", priority = 8)]
    CodecXviD(&'src str),

    #[regex(r"(?i)DivX", priority = 8)]
    CodecDivX(&'src str),

    /// `DTS-HD` with optional `.MA`; outranks plain `DTS`.
    #[regex(r"(?i)DTS-?HD(\.?MA)?", priority = 10)]
    AudioDTSHD(&'src str),

    #[regex(r"(?i)TrueHD", priority = 9)]
    AudioTrueHD(&'src str),

    /// Combined with a preceding TrueHD/EAC3 by the parser.
    #[regex(r"(?i)Atmos", priority = 9)]
    AudioAtmos(&'src str),

    /// Dolby Digital Plus spellings.
    #[regex(r"(?i)(E-?AC-?3|DD\+|DDP)", priority = 9)]
    AudioEAC3(&'src str),

    #[regex(r"(?i)AC-?3", priority = 7)]
    #[regex(r"(?i)DD5\.1", priority = 10)]
    AudioAC3(&'src str),

    #[regex(r"(?i)DTS", priority = 6)]
    AudioDTS(&'src str),

    #[regex(r"(?i)AAC", priority = 8)]
    AudioAAC(&'src str),

    #[regex(r"(?i)FLAC", priority = 8)]
    AudioFLAC(&'src str),

    #[regex(r"(?i)HDR10\+", priority = 11)]
    HdrHDR10Plus(&'src str),

    #[regex(r"(?i)HDR10", priority = 10)]
    HdrHDR10(&'src str),

    #[regex(r"(?i)HDR", priority = 7)]
    HdrGeneric(&'src str),

    #[regex(r"(?i)(DoVi|DV)", priority = 9)]
    HdrDolbyVision(&'src str),

    /// `Directors.Cut`, `Director's Cut`, ...
    #[regex(r"(?i)Directors?[.\s'-]*Cut", priority = 8)]
    EditionDirectorsCut(&'src str),

    #[regex(r"(?i)Extended", priority = 7)]
    EditionExtended(&'src str),

    #[regex(r"(?i)(Unrated|Uncut)", priority = 7)]
    EditionUnrated(&'src str),

    #[regex(r"(?i)Remastered", priority = 7)]
    EditionRemastered(&'src str),

    #[regex(r"(?i)IMAX", priority = 7)]
    EditionIMAX(&'src str),

    #[regex(r"(?i)Theatrical", priority = 7)]
    EditionTheatrical(&'src str),

    /// Revision 1.
    #[regex(r"(?i)(PROPER|REPACK)", priority = 7)]
    Proper(&'src str),

    /// `v2`..`v9`, revision N.
    #[regex(r"(?i)v[2-9]", priority = 7)]
    Version(&'src str),

    /// `S01E01`, or `S01E01E02` for a multi-episode file.
    #[regex(r"(?i)S\d{1,2}E\d{1,3}(E\d{1,3})*", priority = 12)]
    SeasonEpisode(&'src str),

    /// `1x02` style.
    #[regex(r"(?i)\d{1,2}x\d{2,3}", priority = 12)]
    CrossEpisode(&'src str),

    /// Season pack, `S01`.
    #[regex(r"(?i)S\d{1,2}", priority = 11)]
    Season(&'src str),

    #[regex(r"(19|20)\d{2}", priority = 5)]
    Year(&'src str),

    #[token(".")]
    Dot,

    #[token("-")]
    Hyphen,

    #[token("_")]
    Underscore,

    /// Anything else that starts with a letter.
    #[regex(r"[a-zA-Z][a-zA-Z0-9']*", priority = 1)]
    Word(&'src str),

    #[regex(r"\d+", priority = 2)]
    Number(&'src str),
}

impl<'src> Token<'src> {
    /// The source text carried by this token, if any.
    pub fn text(&self) -> Option<&'src str> {
        match self {
            Token::Dot | Token::Hyphen | Token::Underscore => None,
            Token::Resolution(s)
            | Token::SourceBluRay(s)
            | Token::SourceWebDL(s)
            | Token::SourceWebRip(s)
            | Token::SourceWeb(s)
            | Token::SourceHDTV(s)
            | Token::SourceHDRip(s)
            | Token::SourceDVDRip(s)
            | Token::SourceRemux(s)
            | Token::CodecX264(s)
            | Token::CodecX265(s)
            | Token::CodecH264(s)
            | Token::CodecH265(s)
            | Token::CodecAV1(s)
            | Token::CodecXviD(s)
            | Token::CodecDivX(s)
            | Token::AudioDTSHD(s)
            | Token::AudioTrueHD(s)
            | Token::AudioAtmos(s)
            | Token::AudioEAC3(s)
            | Token::AudioAC3(s)
            | Token::AudioDTS(s)
            | Token::AudioAAC(s)
            | Token::AudioFLAC(s)
            | Token::HdrHDR10Plus(s)
            | Token::HdrHDR10(s)
            | Token::HdrGeneric(s)
            | Token::HdrDolbyVision(s)
            | Token::EditionDirectorsCut(s)
            | Token::EditionExtended(s)
            | Token::EditionUnrated(s)
            | Token::EditionRemastered(s)
            | Token::EditionIMAX(s)
            | Token::EditionTheatrical(s)
            | Token::Proper(s)
            | Token::Version(s)
            | Token::SeasonEpisode(s)
            | Token::CrossEpisode(s)
            | Token::Season(s)
            | Token::Year(s)
            | Token::Word(s)
            | Token::Number(s) => Some(s),
        }
    }

    /// Whether this token is free text (a word or number).
    pub fn is_plain(&self) -> bool {
        matches!(self, Token::Word(_) | Token::Number(_))
    }

    /// Whether this token is a separator.
    pub fn is_separator(&self) -> bool {
        matches!(self, Token::Dot | Token::Hyphen | Token::Underscore)
    }

    /// Whether this token marks the end of the title portion of a name.
    ///
    /// Everything that is neither free text nor a separator qualifies:
    /// years, episode tags, and every quality keyword.
    pub fn ends_title(&self) -> bool {
        !self.is_plain() && !self.is_separator()
    }
}

/// A token together with the byte span it occupies in the original input.
#[derive(Debug, Clone)]
pub struct SpannedToken<'src> {
    pub token: Token<'src>,
    pub span: std::ops::Range<usize>,
}

/// Tokenize an input string into a `Vec` of spanned tokens.
///
/// Characters the lexer does not recognize (brackets, punctuation) are
/// dropped.
pub fn tokenize(input: &str) -> Vec<SpannedToken<'_>> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| SpannedToken { token, span }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token<'_>> {
        tokenize(input).into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn tokenize_basic_movie() {
        let kinds = kinds("The.Matrix.1999.1080p.BluRay.x264-GROUP");
        assert!(kinds.contains(&Token::Year("1999")));
        assert!(kinds.contains(&Token::Resolution("1080p")));
        assert!(kinds.contains(&Token::SourceBluRay("BluRay")));
        assert!(kinds.contains(&Token::CodecX264("x264")));
        assert!(kinds.contains(&Token::Word("GROUP")));
    }

    #[test]
    fn tokenize_webdl_beats_web() {
        let kinds = kinds("Show.2020.WEB-DL.720p");
        assert!(kinds.iter().any(|t| matches!(t, Token::SourceWebDL(_))));
        assert!(!kinds.iter().any(|t| matches!(t, Token::SourceWeb(_))));
    }

    #[test]
    fn tokenize_4k_resolution() {
        let kinds = kinds("Movie.2021.4K.HDR");
        assert!(kinds.contains(&Token::Resolution("4K")));
    }

    #[test]
    fn tokenize_word_containing_keyword_prefix() {
        // Longest match keeps "Webster" a plain word.
        let kinds = kinds("Webster.1983");
        assert_eq!(kinds[0], Token::Word("Webster"));
    }

    #[test]
    fn tokenize_season_episode_variants() {
        let se = kinds("Breaking.Bad.S01E01.720p");
        assert!(se.contains(&Token::SeasonEpisode("S01E01")));

        let cross = kinds("Show.3x07.HDTV");
        assert!(cross.contains(&Token::CrossEpisode("3x07")));

        let pack = kinds("Show.S02.1080p");
        assert!(pack.contains(&Token::Season("S02")));
    }

    #[test]
    fn tokenize_multi_episode() {
        let kinds = kinds("Show.S02E03E04.1080p");
        assert!(kinds.contains(&Token::SeasonEpisode("S02E03E04")));
    }

    #[test]
    fn tokenize_dd51_and_dtshd() {
        let kinds = kinds("Movie.DD5.1.DTS-HD.MA");
        assert!(kinds.contains(&Token::AudioAC3("DD5.1")));
        assert!(kinds.iter().any(|t| matches!(t, Token::AudioDTSHD(_))));
    }

    #[test]
    fn classification_helpers() {
        assert!(Token::Word("x").is_plain());
        assert!(Token::Dot.is_separator());
        assert!(Token::Year("1999").ends_title());
        assert!(Token::CodecX265("x265").ends_title());
        assert!(!Token::Number("7").ends_title());
        assert_eq!(Token::Hyphen.text(), None);
        assert_eq!(Token::Number("7").text(), Some("7"));
    }
}
