//! End-to-end identity resolution scenarios with in-process stub providers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sift_core::{Error, HintSource};
use sift_parser::LanguageTable;
use subsift::identity::{
    CatalogEntry, CatalogSearch, Feature, FeatureSearch, IdentityResolver, Lookup, ProviderSet,
    Suggestion, SuggestionSearch,
};
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Stub providers
// ---------------------------------------------------------------------------

/// Records every call and answers with a canned outcome.
struct StubProvider {
    features: Lookup<Vec<Feature>>,
    catalog: Lookup<Vec<CatalogEntry>>,
    suggestions: Lookup<Vec<Suggestion>>,
    feature_calls: Mutex<Vec<HashMap<String, String>>>,
    catalog_calls: Mutex<Vec<(String, String)>>,
    suggestion_calls: Mutex<Vec<String>>,
}

impl StubProvider {
    fn new(
        features: Lookup<Vec<Feature>>,
        catalog: Lookup<Vec<CatalogEntry>>,
        suggestions: Lookup<Vec<Suggestion>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            features,
            catalog,
            suggestions,
            feature_calls: Mutex::new(Vec::new()),
            catalog_calls: Mutex::new(Vec::new()),
            suggestion_calls: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Self::new(
            Lookup::Failed("connection refused".into()),
            Lookup::Failed("connection refused".into()),
            Lookup::Failed("connection refused".into()),
        )
    }

    fn catalog_calls(&self) -> Vec<(String, String)> {
        self.catalog_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeatureSearch for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn search_features(
        &self,
        params: &HashMap<String, String>,
        _cancel: &CancellationToken,
    ) -> Lookup<Vec<Feature>> {
        self.feature_calls.lock().unwrap().push(params.clone());
        self.features.clone()
    }
}

#[async_trait]
impl CatalogSearch for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn search_catalog(
        &self,
        query_type: &str,
        query: &str,
        _cancel: &CancellationToken,
    ) -> Lookup<Vec<CatalogEntry>> {
        self.catalog_calls
            .lock()
            .unwrap()
            .push((query_type.to_string(), query.to_string()));
        self.catalog.clone()
    }
}

#[async_trait]
impl SuggestionSearch for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn search_suggestions(
        &self,
        query: &str,
        _cancel: &CancellationToken,
    ) -> Lookup<Vec<Suggestion>> {
        self.suggestion_calls.lock().unwrap().push(query.to_string());
        self.suggestions.clone()
    }
}

/// Answers every lookup with `Cancelled` after cancelling the shared token.
struct CancellingProvider(CancellationToken);

#[async_trait]
impl FeatureSearch for CancellingProvider {
    fn name(&self) -> &'static str {
        "cancelling"
    }

    async fn search_features(
        &self,
        _params: &HashMap<String, String>,
        _cancel: &CancellationToken,
    ) -> Lookup<Vec<Feature>> {
        self.0.cancel();
        Lookup::Cancelled
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolver_with(stub: Arc<StubProvider>) -> IdentityResolver {
    IdentityResolver::new(
        Arc::new(LanguageTable::build()),
        ProviderSet::new(stub.clone(), stub.clone(), stub),
    )
}

fn feature(external_id: u64) -> Feature {
    Feature {
        external_id,
        title: "Some Movie".into(),
        year: Some(2010),
        kind: "movie".into(),
    }
}

fn catalog_entry(imdb: &str, trakt: &str) -> CatalogEntry {
    CatalogEntry {
        kind: "movie".into(),
        title: "Some Movie".into(),
        year: Some(2010),
        ids: HashMap::from([
            ("imdb".to_string(), imdb.to_string()),
            ("trakt".to_string(), trakt.to_string()),
        ]),
    }
}

/// A video large enough to fingerprint.
fn hashable_video(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    std::fs::write(&path, data).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn nfo_takes_precedence_over_hash_and_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let video = hashable_video(dir.path(), "Some.Movie.2010.1080p.BluRay.x264-GRP.mkv");
    std::fs::write(
        dir.path().join("Some.Movie.2010.1080p.BluRay.x264-GRP.nfo"),
        "<movie><imdbid>tt0000001</imdbid></movie>",
    )
    .unwrap();

    let stub = StubProvider::new(
        Lookup::Found(vec![feature(2)]),
        Lookup::Found(vec![catalog_entry("tt0000003", "4242")]),
        Lookup::Empty,
    );
    let info = resolver_with(stub.clone())
        .resolve_video(&video, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(info.imdb_id.as_ref().unwrap().as_str(), "tt0000001");
    assert_eq!(info.nfo_imdb_id, info.imdb_id);
    assert_eq!(info.resolved_from, Some(HintSource::Nfo));
    assert!(info.hash_imdb_id.is_none());
    assert!(info.catalog_imdb_id.is_none());
    // The cross-reference is still fetched, keyed by the NFO id.
    assert_eq!(info.trakt_id.as_deref(), Some("4242"));
    assert_eq!(
        stub.catalog_calls(),
        vec![("imdb".to_string(), "tt0000001".to_string())]
    );
    assert!(stub.feature_calls.lock().unwrap().is_empty());
    assert!(stub.suggestion_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn hash_lookup_used_without_nfo() {
    let dir = tempfile::tempdir().unwrap();
    let video = hashable_video(dir.path(), "Some.Movie.2010.mkv");

    let stub = StubProvider::new(
        Lookup::Found(vec![feature(0), feature(1122334)]),
        Lookup::Found(vec![catalog_entry("tt1122334", "777")]),
        Lookup::Empty,
    );
    let info = resolver_with(stub.clone())
        .resolve_video(&video, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(info.hash.as_deref(), Some("e19d5212c9812cd6"));
    assert_eq!(info.hash_imdb_id.as_ref().unwrap().as_str(), "tt1122334");
    assert_eq!(info.imdb_id, info.hash_imdb_id);
    assert_eq!(info.resolved_from, Some(HintSource::Hash));
    assert_eq!(info.trakt_id.as_deref(), Some("777"));

    let feature_calls = stub.feature_calls.lock().unwrap().clone();
    assert_eq!(feature_calls.len(), 1);
    assert_eq!(feature_calls[0].get("hash").map(String::as_str), Some("e19d5212c9812cd6"));
    // Catalog is searched by the id, not by title.
    assert_eq!(
        stub.catalog_calls(),
        vec![("imdb".to_string(), "tt1122334".to_string())]
    );
}

#[tokio::test]
async fn no_evidence_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("justafile.mkv");
    std::fs::write(&video, b"too small to hash").unwrap();

    let stub = StubProvider::failing();
    let info = resolver_with(stub.clone())
        .resolve_video(&video, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(info.title, "justafile");
    assert!(info.hash.is_none());
    assert!(info.imdb_id.is_none());
    assert!(info.resolved_from.is_none());
    assert!(!info.has_hints());
    assert!(info.trakt_id.is_none());
    // Hash lookup needs a fingerprint; catalog and suggestions were tried.
    assert!(stub.feature_calls.lock().unwrap().is_empty());
    assert_eq!(
        stub.catalog_calls(),
        vec![("movie,show".to_string(), "justafile".to_string())]
    );
    assert_eq!(
        stub.suggestion_calls.lock().unwrap().as_slice(),
        &["justafile".to_string()]
    );
}

#[tokio::test]
async fn cancellation_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let video = hashable_video(dir.path(), "Some.Movie.2010.mkv");
    let cancel = CancellationToken::new();

    let rest = StubProvider::new(Lookup::Empty, Lookup::Empty, Lookup::Empty);
    let resolver = IdentityResolver::new(
        Arc::new(LanguageTable::build()),
        ProviderSet::new(
            Arc::new(CancellingProvider(cancel.clone())),
            rest.clone(),
            rest.clone(),
        ),
    );

    let err = resolver.resolve_video(&video, &cancel).await.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert!(rest.catalog_calls().is_empty());

    // An already-cancelled token stops before any work.
    let err = resolver.resolve_video(&video, &cancel).await.unwrap_err();
    assert!(err.is_cancelled());
}

#[tokio::test]
async fn resolve_pair_describes_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let video = hashable_video(dir.path(), "My.Movie.2023.1080p.BluRay.x264-GRP.mkv");
    let subtitle = dir
        .path()
        .join("My.Movie.2023.BluRay.x264-GRP.eng.sdh.forced.srt");
    std::fs::write(&subtitle, b"hello world\n").unwrap();

    let stub = StubProvider::new(Lookup::Empty, Lookup::Empty, Lookup::Empty);
    let (v, s) = resolver_with(stub)
        .resolve_pair(&video, &subtitle, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(v.title, "My Movie");
    assert_eq!(v.year, Some(2023));
    assert_eq!(v.release_group.as_deref(), Some("GRP"));
    assert_eq!(s.language.as_deref(), Some("eng"));
    assert!(s.hearing_impaired);
    assert!(s.forced);
    assert_eq!(s.checksum, "6f5902ac237024bdd0c176cb93063dc4");
}

#[tokio::test]
async fn missing_subtitle_is_hard_error() {
    let dir = tempfile::tempdir().unwrap();
    let video = hashable_video(dir.path(), "Some.Movie.2010.mkv");
    let stub = StubProvider::new(Lookup::Empty, Lookup::Empty, Lookup::Empty);

    let err = resolver_with(stub)
        .resolve_pair(
            &video,
            &dir.path().join("Some.Movie.2010.en.srt"),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FileIo { .. }));
}
