//! Directory scanning.
//!
//! [`scan_directory`] walks a tree, splits it into videos and subtitles, and
//! pairs each video with a subtitle through the [`Matcher`]. A subtitle in
//! the video's own directory is preferred over one elsewhere in the tree.
//! [`resolve_plan`] then resolves every pair concurrently.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use serde::Serialize;
use sift_core::{Error, Result, SubtitleInfo, VideoInfo};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::identity::IdentityResolver;
use crate::matcher::Matcher;

/// A video and the subtitle chosen for it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaPair {
    pub video: PathBuf,
    pub subtitle: Option<PathBuf>,
}

/// Everything a scan found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanPlan {
    /// One entry per video, in path order.
    pub pairs: Vec<MediaPair>,
    /// Subtitles no video claimed.
    pub orphan_subtitles: Vec<PathBuf>,
}

impl ScanPlan {
    pub fn matched(&self) -> usize {
        self.pairs.iter().filter(|p| p.subtitle.is_some()).count()
    }
}

/// Outcome of resolving one pair.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPair {
    pub video: PathBuf,
    pub subtitle: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_info: Option<VideoInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_info: Option<SubtitleInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Walk `root` and pair its videos with subtitles.
pub fn scan_directory(root: &Path, config: &ScanConfig, matcher: &Matcher) -> Result<ScanPlan> {
    let meta = std::fs::metadata(root).map_err(|e| Error::file_io(root, e))?;
    if !meta.is_dir() {
        return Err(Error::file_io(
            root,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }
    info!("Scanning directory: {:?}", root);

    let max_depth = if config.recursive { usize::MAX } else { 1 };
    let mut videos = Vec::new();
    let mut subtitles = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).max_depth(max_depth) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if config.is_video(&path) {
            videos.push(path);
        } else if config.is_subtitle(&path) {
            subtitles.push(path);
        }
    }
    videos.sort();
    subtitles.sort();

    let chosen = matcher.pair(&videos, &subtitles);
    let mut claimed = HashSet::new();
    let mut pairs = Vec::with_capacity(videos.len());

    for (video, chosen) in videos.into_iter().zip(chosen) {
        if let Some(i) = chosen {
            claimed.insert(i);
            debug!(video = %video.display(), subtitle = %subtitles[i].display(), "paired");
        }
        pairs.push(MediaPair {
            video,
            subtitle: chosen.map(|i| subtitles[i].clone()),
        });
    }

    let orphan_subtitles = subtitles
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !claimed.contains(i))
        .map(|(_, p)| p)
        .collect();

    let plan = ScanPlan {
        pairs,
        orphan_subtitles,
    };
    info!(
        videos = plan.pairs.len(),
        matched = plan.matched(),
        orphans = plan.orphan_subtitles.len(),
        "Scan complete"
    );
    Ok(plan)
}

/// Resolve every pair in `plan` that has a subtitle, up to `concurrency` at
/// a time.
///
/// A pair that fails is reported with its error; the scan goes on. Only
/// cancellation fails the whole call.
pub async fn resolve_plan(
    resolver: &IdentityResolver,
    plan: &ScanPlan,
    concurrency: usize,
    cancel: &CancellationToken,
) -> Result<Vec<ResolvedPair>> {
    let pending = plan
        .pairs
        .iter()
        .filter_map(|p| p.subtitle.as_deref().map(|s| (p.video.as_path(), s)));

    let outcomes: Vec<_> = stream::iter(pending)
        .map(|(video, subtitle)| async move {
            let outcome = resolver.resolve_pair(video, subtitle, cancel).await;
            (video, subtitle, outcome)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut resolved = Vec::with_capacity(outcomes.len());
    for (video, subtitle, outcome) in outcomes {
        let (video_info, subtitle_info, error) = match outcome {
            Ok((v, s)) => (Some(v), Some(s), None),
            Err(Error::Cancelled) => return Err(Error::Cancelled),
            Err(e) => {
                warn!(video = %video.display(), error = %e, "failed to resolve pair");
                (None, None, Some(e.to_string()))
            }
        };
        resolved.push(ResolvedPair {
            video: video.to_path_buf(),
            subtitle: subtitle.to_path_buf(),
            video_info,
            subtitle_info,
            error,
        });
    }
    resolved.sort_by(|a, b| a.video.cmp(&b.video));
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_parser::{LanguageTable, Normalizer};
    use std::sync::Arc;

    fn matcher() -> Matcher {
        Matcher::new(Normalizer::new(Arc::new(LanguageTable::build())))
    }

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn same_directory_subtitle_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("a/Movie.2020.1080p.mkv"));
        touch(&root.join("a/Movie.2020.en.srt"));
        touch(&root.join("b/Movie.2020.mkv"));
        touch(&root.join("Movie.2020.fr.srt"));

        let plan = scan_directory(root, &ScanConfig::default(), &matcher()).unwrap();

        assert_eq!(plan.pairs.len(), 2);
        assert_eq!(plan.pairs[0].video, root.join("a/Movie.2020.1080p.mkv"));
        assert_eq!(plan.pairs[0].subtitle, Some(root.join("a/Movie.2020.en.srt")));
        // No subtitle beside b/, so the first one in path order is used.
        assert_eq!(plan.pairs[1].subtitle, Some(root.join("Movie.2020.fr.srt")));
        assert!(plan.orphan_subtitles.is_empty());
    }

    #[test]
    fn non_recursive_stays_at_top_level() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("Top.2001.mkv"));
        touch(&root.join("nested/Deep.2002.mkv"));
        touch(&root.join("Stray.1999.en.srt"));
        touch(&root.join("notes.md"));

        let config = ScanConfig {
            recursive: false,
            ..ScanConfig::default()
        };
        let plan = scan_directory(root, &config, &matcher()).unwrap();

        assert_eq!(
            plan.pairs,
            vec![MediaPair {
                video: root.join("Top.2001.mkv"),
                subtitle: None
            }]
        );
        assert_eq!(plan.orphan_subtitles, vec![root.join("Stray.1999.en.srt")]);
        assert_eq!(plan.matched(), 0);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_directory(&dir.path().join("nope"), &ScanConfig::default(), &matcher())
            .unwrap_err();
        assert!(matches!(err, Error::FileIo { .. }));
    }
}
