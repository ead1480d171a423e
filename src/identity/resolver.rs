//! Identity resolution for one video (and optionally its subtitle).
//!
//! Resolution runs a fixed chain of steps over a working identifier:
//!
//! 1. [`nfo_step`](IdentityResolver::nfo_step): a sidecar NFO id, which
//!    nothing later can override.
//! 2. [`hash_step`](IdentityResolver::hash_step): fingerprint lookup, only
//!    when there is no working id yet.
//! 3. [`catalog_step`](IdentityResolver::catalog_step): always runs. With a
//!    working id it only attaches the Trakt cross-reference; without one it
//!    searches by title and may adopt the hit's id.
//! 4. [`suggestion_step`](IdentityResolver::suggestion_step): free-text
//!    fallback, only when still unidentified.
//!
//! Lookup failures are logged and treated as missing evidence. Cancellation
//! is the only lookup outcome that aborts the chain.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use sift_core::ids::IMDB_PREFIX;
use sift_core::{Error, HintSource, ImdbId, Result, SubtitleInfo, VideoInfo};
use sift_parser::{clean_name, detect_flags, detect_language, LanguageTable};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::nfo;
use super::provider::{CatalogEntry, Lookup, Suggestion};
use super::registry::ProviderSet;
use crate::hash;

/// The identifier chosen so far and where it came from.
#[derive(Debug, Default)]
struct Working {
    id: Option<ImdbId>,
    source: Option<HintSource>,
}

impl Working {
    fn adopt(&mut self, id: &ImdbId, source: HintSource) {
        if self.id.is_none() {
            self.id = Some(id.clone());
            self.source = Some(source);
        }
    }
}

/// Resolves file identity against NFO sidecars and the configured providers.
///
/// Holds only shared, immutable state: clone it freely and run resolutions
/// concurrently.
#[derive(Clone)]
pub struct IdentityResolver {
    languages: Arc<LanguageTable>,
    providers: ProviderSet,
    suggestions_enabled: bool,
}

impl IdentityResolver {
    pub fn new(languages: Arc<LanguageTable>, providers: ProviderSet) -> Self {
        Self {
            languages,
            providers,
            suggestions_enabled: true,
        }
    }

    /// Enable or disable the suggestion fallback.
    pub fn with_suggestions(mut self, enabled: bool) -> Self {
        self.suggestions_enabled = enabled;
        self
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    /// Resolve a video file's metadata and identity.
    ///
    /// Fails only if the video cannot be read, or with [`Error::Cancelled`]
    /// once `cancel` fires. A video nothing could identify is returned with
    /// `imdb_id == None`.
    pub async fn resolve_video(&self, path: &Path, cancel: &CancellationToken) -> Result<VideoInfo> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let size = regular_file_size(path)?;
        let mut info = VideoInfo::new(path, size);

        let hash_path = path.to_path_buf();
        info.hash = tokio::task::spawn_blocking(move || hash::fingerprint_opt(&hash_path))
            .await
            .map_err(|e| Error::Internal(format!("fingerprint task failed: {e}")))??;
        if info.hash.is_none() {
            debug!(path = %path.display(), size, "too small to fingerprint");
        }

        apply_release(&mut info);

        let mut working = Working::default();
        self.nfo_step(&mut info, &mut working);
        self.hash_step(&mut info, &mut working, cancel).await?;
        self.catalog_step(&mut info, &mut working, cancel).await?;
        self.suggestion_step(&mut info, &mut working, cancel).await?;
        finish(&mut info, working);

        info!(
            path = %path.display(),
            title = %info.title,
            imdb_id = info.imdb_id.as_ref().map(ImdbId::as_str).unwrap_or("-"),
            source = ?info.resolved_from,
            "resolved video"
        );
        Ok(info)
    }

    /// Describe a subtitle file: checksum, language and flags.
    pub fn describe_subtitle(&self, path: &Path) -> Result<SubtitleInfo> {
        let size = regular_file_size(path)?;
        let checksum = hash::checksum(path)?;
        let mut info = SubtitleInfo::new(path, size, checksum);

        info.language = detect_language(&self.languages, &info.file_name).map(str::to_string);
        let flags = detect_flags(&info.file_name);
        info.hearing_impaired = flags.hearing_impaired;
        info.forced = flags.forced;

        debug!(
            path = %path.display(),
            language = info.language.as_deref().unwrap_or("-"),
            hi = info.hearing_impaired,
            forced = info.forced,
            "described subtitle"
        );
        Ok(info)
    }

    /// Resolve a video and describe its subtitle. The subtitle checksum
    /// runs on the blocking pool.
    pub async fn resolve_pair(
        &self,
        video: &Path,
        subtitle: &Path,
        cancel: &CancellationToken,
    ) -> Result<(VideoInfo, SubtitleInfo)> {
        let video_info = self.resolve_video(video, cancel).await?;

        let resolver = self.clone();
        let subtitle = subtitle.to_path_buf();
        let subtitle_info = tokio::task::spawn_blocking(move || resolver.describe_subtitle(&subtitle))
            .await
            .map_err(|e| Error::Internal(format!("checksum task failed: {e}")))??;
        Ok((video_info, subtitle_info))
    }

    // -----------------------------------------------------------------------
    // Steps
    // -----------------------------------------------------------------------

    fn nfo_step(&self, info: &mut VideoInfo, working: &mut Working) {
        if let Some(id) = nfo::find_imdb_id(&info.path) {
            working.adopt(&id, HintSource::Nfo);
            info.nfo_imdb_id = Some(id);
        }
    }

    async fn hash_step(
        &self,
        info: &mut VideoInfo,
        working: &mut Working,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if working.id.is_some() {
            return Ok(());
        }
        let Some(fingerprint) = info.hash.clone() else {
            return Ok(());
        };

        let provider = &self.providers.features;
        let params = HashMap::from([("hash".to_string(), fingerprint)]);
        let outcome = provider.search_features(&params, cancel).await;
        let Some(features) = evidence(provider.name(), "hash", outcome)? else {
            return Ok(());
        };

        if let Some(id) = features
            .iter()
            .find_map(|f| ImdbId::from_numeric(f.external_id))
        {
            working.adopt(&id, HintSource::Hash);
            info.hash_imdb_id = Some(id);
        }
        Ok(())
    }

    async fn catalog_step(
        &self,
        info: &mut VideoInfo,
        working: &mut Working,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let provider = &self.providers.catalog;

        if let Some(id) = &working.id {
            let outcome = provider.search_catalog("imdb", id.as_str(), cancel).await;
            if let Some(hits) = evidence(provider.name(), "catalog", outcome)? {
                info.trakt_id = hits
                    .first()
                    .and_then(|e| e.id("trakt"))
                    .map(str::to_string);
            }
            return Ok(());
        }

        if info.title.trim().is_empty() {
            return Ok(());
        }
        let query = match info.year {
            Some(year) => format!("{} {}", info.title, year),
            None => info.title.clone(),
        };
        let query_type = if info.is_episode() {
            "show,episode"
        } else {
            "movie,show"
        };

        let outcome = provider.search_catalog(query_type, &query, cancel).await;
        let Some(hits) = evidence(provider.name(), "catalog", outcome)? else {
            return Ok(());
        };
        let Some(hit) = hits.iter().find(|e| accepts(info, e)) else {
            debug!(query = %query, "no catalog hit of the expected shape");
            return Ok(());
        };

        info.trakt_id = hit.id("trakt").map(str::to_string);
        if let Some(id) = hit.id("imdb").and_then(ImdbId::parse) {
            working.adopt(&id, HintSource::Catalog);
            info.catalog_imdb_id = Some(id);
        }
        Ok(())
    }

    async fn suggestion_step(
        &self,
        info: &mut VideoInfo,
        working: &mut Working,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if working.id.is_some() || !self.suggestions_enabled || info.title.trim().is_empty() {
            return Ok(());
        }

        let provider = &self.providers.suggestions;
        let outcome = provider.search_suggestions(&info.title, cancel).await;
        let Some(suggestions) = evidence(provider.name(), "suggestion", outcome)? else {
            return Ok(());
        };

        if let Some(id) = best_suggestion(&suggestions, info.year) {
            working.adopt(&id, HintSource::Suggestion);
            info.suggested_imdb_id = Some(id);
        }
        Ok(())
    }
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("languages", &self.languages.len())
            .field("providers", &self.providers)
            .field("suggestions_enabled", &self.suggestions_enabled)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn regular_file_size(path: &Path) -> Result<u64> {
    let meta = std::fs::metadata(path).map_err(|e| Error::file_io(path, e))?;
    if !meta.is_file() {
        return Err(Error::file_io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    Ok(meta.len())
}

/// Copy parsed release fields onto `info`. A name with no recognizable
/// title keeps only its cleaned stem.
fn apply_release(info: &mut VideoInfo) {
    let parsed = sift_parser::parse(&info.file_name);
    if parsed.is_empty() {
        let stem = Path::new(&info.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        info.title = clean_name(&stem);
        debug!(file = %info.file_name, title = %info.title, "no parsable title, using file name");
        return;
    }
    info.title = parsed.title;
    info.year = parsed.year;
    info.season = parsed.season;
    info.episode = parsed.episode;
    info.resolution = parsed.resolution;
    info.source = parsed.source;
    info.release_group = parsed.group;
}

/// Unwrap a lookup outcome. Failures and empty results become `None`;
/// cancellation becomes an error.
fn evidence<T>(provider: &str, step: &'static str, outcome: Lookup<T>) -> Result<Option<T>> {
    match outcome {
        Lookup::Found(value) => Ok(Some(value)),
        Lookup::Empty => {
            debug!(provider, step, "no result");
            Ok(None)
        }
        Lookup::Failed(message) => {
            let error = Error::lookup(provider, message);
            warn!(step, %error, "lookup failed, continuing without it");
            Ok(None)
        }
        Lookup::Cancelled => Err(Error::Cancelled),
    }
}

fn accepts(info: &VideoInfo, entry: &CatalogEntry) -> bool {
    let kind_ok = if info.is_episode() {
        matches!(entry.kind.as_str(), "episode" | "show")
    } else {
        entry.kind == "movie"
    };
    let year_ok = match (info.year, entry.year) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    };
    kind_ok && year_ok
}

fn suggestion_score(s: &Suggestion, year: Option<u32>) -> u8 {
    let year_match = year.is_some() && s.year == year;
    let prefixed = s.id.starts_with(IMDB_PREFIX);
    u8::from(year_match) + u8::from(prefixed)
}

/// Highest-scoring suggestion with a valid id; the earliest wins ties.
fn best_suggestion(suggestions: &[Suggestion], year: Option<u32>) -> Option<ImdbId> {
    let mut best: Option<(u8, ImdbId)> = None;
    for s in suggestions {
        let Some(id) = ImdbId::parse(&s.id) else {
            continue;
        };
        let score = suggestion_score(s, year);
        if best.as_ref().map_or(true, |(top, _)| score > *top) {
            best = Some((score, id));
        }
    }
    best.map(|(_, id)| id)
}

fn finish(info: &mut VideoInfo, working: Working) {
    info.imdb_id = working.id;
    info.resolved_from = working.source;
}
