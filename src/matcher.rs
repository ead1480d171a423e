//! Video/subtitle pairing by normalized file name.
//!
//! Two files match when their normalized keys are exactly equal and not
//! empty. Matching is symmetric but not transitive.

use std::path::Path;

use sift_parser::Normalizer;

/// Pairs videos with subtitles using a shared [`Normalizer`].
#[derive(Debug, Clone)]
pub struct Matcher {
    normalizer: Normalizer,
}

impl Matcher {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// The comparison key of a file name or path.
    pub fn key(&self, name: impl AsRef<Path>) -> String {
        self.normalizer.normalize(&file_name(name.as_ref()))
    }

    /// Whether a video name and a subtitle name refer to the same media.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use sift_parser::{LanguageTable, Normalizer};
    /// use subsift::matcher::Matcher;
    ///
    /// let m = Matcher::new(Normalizer::new(Arc::new(LanguageTable::build())));
    /// assert!(m.matches("Movie.2020.1080p.mkv", "Movie.2020.en.srt"));
    /// assert!(!m.matches("Movie.2020.mkv", "Movie.2021.srt"));
    /// ```
    pub fn matches(&self, video_name: impl AsRef<Path>, subtitle_name: impl AsRef<Path>) -> bool {
        keys_match(&self.key(video_name), &self.key(subtitle_name))
    }

    /// First subtitle in `candidates`, in input order, that matches `video`.
    pub fn find_matching_subtitle<'a, P: AsRef<Path>>(
        &self,
        video: impl AsRef<Path>,
        candidates: &'a [P],
    ) -> Option<&'a P> {
        self.first_match(video.as_ref(), candidates)
    }

    /// First video in `candidates`, in input order, that matches `subtitle`.
    pub fn find_matching_video<'a, P: AsRef<Path>>(
        &self,
        subtitle: impl AsRef<Path>,
        candidates: &'a [P],
    ) -> Option<&'a P> {
        self.first_match(subtitle.as_ref(), candidates)
    }

    /// The comparison key of a file whose kind the caller has already
    /// decided. Its extension is dropped whatever it is, so extensions
    /// outside the built-in lists still pair.
    pub fn classified_key(&self, path: impl AsRef<Path>) -> String {
        let path = path.as_ref();
        match path.file_stem() {
            Some(stem) => self.normalizer.normalize(&stem.to_string_lossy()),
            None => self.key(path),
        }
    }

    /// For every video, the index of the subtitle it pairs with.
    ///
    /// A matching subtitle in the video's own directory wins; otherwise the
    /// first match in `subtitles` order. Subtitles are not consumed: two
    /// videos with the same key get the same subtitle.
    pub fn pair<V, S>(&self, videos: &[V], subtitles: &[S]) -> Vec<Option<usize>>
    where
        V: AsRef<Path>,
        S: AsRef<Path>,
    {
        let subtitle_keys: Vec<String> = subtitles.iter().map(|s| self.classified_key(s)).collect();
        videos
            .iter()
            .map(|video| {
                let video = video.as_ref();
                let key = self.classified_key(video);
                let matching = |i: &usize| keys_match(&key, &subtitle_keys[*i]);
                (0..subtitles.len())
                    .filter(matching)
                    .find(|&i| subtitles[i].as_ref().parent() == video.parent())
                    .or_else(|| (0..subtitles.len()).find(matching))
            })
            .collect()
    }

    fn first_match<'a, P: AsRef<Path>>(&self, target: &Path, candidates: &'a [P]) -> Option<&'a P> {
        let key = self.key(target);
        if key.is_empty() {
            return None;
        }
        candidates.iter().find(|c| keys_match(&key, &self.key(c)))
    }
}

fn keys_match(a: &str, b: &str) -> bool {
    !a.is_empty() && a == b
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
