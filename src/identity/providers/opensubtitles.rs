//! OpenSubtitles REST feature search.
//!
//! Implements [`FeatureSearch`]:
//! - a `hash` parameter becomes `GET /subtitles?moviehash=...`, and the
//!   features are read from each subtitle's `feature_details`;
//! - anything else is forwarded to `GET /features` as query parameters.
//!
//! Requests carry the `Api-Key` header; without a key the provider reports
//! a failed lookup without touching the network.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde::Deserialize;
use sift_core::Result;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::http::{year_from_json, ApiClient};
use super::HttpSettings;
use crate::identity::provider::{Feature, FeatureSearch, Lookup};

pub const DEFAULT_BASE_URL: &str = "https://api.opensubtitles.com/api/v1";

// ---------------------------------------------------------------------------
// API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    data: Vec<Item<T>>,
}

#[derive(Debug, Deserialize)]
struct Item<T> {
    attributes: T,
}

#[derive(Debug, Deserialize)]
struct SubtitleAttributes {
    feature_details: Option<FeatureDetails>,
}

/// Shared shape of `feature_details` and `/features` attributes.
#[derive(Debug, Deserialize)]
struct FeatureDetails {
    imdb_id: Option<u64>,
    title: Option<String>,
    movie_name: Option<String>,
    year: Option<serde_json::Value>,
    feature_type: Option<String>,
}

impl FeatureDetails {
    fn into_feature(self) -> Feature {
        Feature {
            external_id: self.imdb_id.unwrap_or(0),
            year: year_from_json(self.year.as_ref()),
            title: self.title.or(self.movie_name).unwrap_or_default(),
            kind: self.feature_type.unwrap_or_default().to_ascii_lowercase(),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// OpenSubtitles feature search provider.
///
/// ```no_run
/// use subsift::identity::providers::{HttpSettings, OpenSubtitlesProvider};
///
/// let provider = OpenSubtitlesProvider::new(
///     "https://api.opensubtitles.com/api/v1",
///     "your-api-key",
///     &HttpSettings::default(),
/// ).unwrap();
/// ```
pub struct OpenSubtitlesProvider {
    api: ApiClient,
    base_url: String,
    api_key: String,
}

impl OpenSubtitlesProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        settings: &HttpSettings,
    ) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new("opensubtitles", settings)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn search_by_hash(&self, hash: &str, cancel: &CancellationToken) -> Lookup<Vec<Feature>> {
        let url = format!("{}/subtitles", self.base_url);
        debug!(url = %url, hash, "OpenSubtitles hash search");
        let request = self
            .api
            .get(&url)
            .header("Api-Key", &self.api_key)
            .query(&[("moviehash", hash)]);

        self.api
            .fetch::<ListResponse<SubtitleAttributes>>(request, cancel)
            .await
            .map(|body| {
                // Many subtitles share one feature; keep the first of each.
                let mut seen = HashSet::new();
                body.data
                    .into_iter()
                    .filter_map(|item| item.attributes.feature_details)
                    .map(FeatureDetails::into_feature)
                    .filter(|f| seen.insert(f.external_id))
                    .collect::<Vec<_>>()
            })
            .non_empty()
    }

    async fn search_by_params(
        &self,
        params: &HashMap<String, String>,
        cancel: &CancellationToken,
    ) -> Lookup<Vec<Feature>> {
        let url = format!("{}/features", self.base_url);
        let mut query: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        query.sort();
        debug!(url = %url, ?query, "OpenSubtitles feature search");
        let request = self
            .api
            .get(&url)
            .header("Api-Key", &self.api_key)
            .query(&query);

        self.api
            .fetch::<ListResponse<FeatureDetails>>(request, cancel)
            .await
            .map(|body| {
                body.data
                    .into_iter()
                    .map(|item| item.attributes.into_feature())
                    .collect::<Vec<_>>()
            })
            .non_empty()
    }
}

#[async_trait]
impl FeatureSearch for OpenSubtitlesProvider {
    fn name(&self) -> &'static str {
        "opensubtitles"
    }

    async fn search_features(
        &self,
        params: &HashMap<String, String>,
        cancel: &CancellationToken,
    ) -> Lookup<Vec<Feature>> {
        if !self.is_available() {
            return Lookup::Failed("not configured".into());
        }
        match params.get("hash") {
            Some(hash) => self.search_by_hash(hash, cancel).await,
            None => self.search_by_params(params, cancel).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base: &str, key: &str) -> OpenSubtitlesProvider {
        OpenSubtitlesProvider::new(base, key, &HttpSettings::default()).unwrap()
    }

    fn hash_params(hash: &str) -> HashMap<String, String> {
        HashMap::from([("hash".to_string(), hash.to_string())])
    }

    #[tokio::test]
    async fn hash_search_reads_feature_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subtitles"))
            .and(query_param("moviehash", "8e245d9679d31e12"))
            .and(header("Api-Key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"attributes": {"feature_details": {
                        "imdb_id": 1122334, "title": "Some Movie",
                        "year": 2010, "feature_type": "Movie"
                    }}},
                    {"attributes": {"feature_details": {
                        "imdb_id": 1122334, "title": "Some Movie",
                        "year": 2010, "feature_type": "Movie"
                    }}},
                    {"attributes": {}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = provider(&server.uri(), "secret")
            .search_features(&hash_params("8e245d9679d31e12"), &CancellationToken::new())
            .await;

        assert_eq!(
            outcome,
            Lookup::Found(vec![Feature {
                external_id: 1122334,
                title: "Some Movie".into(),
                year: Some(2010),
                kind: "movie".into(),
            }])
        );
    }

    #[tokio::test]
    async fn empty_data_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/subtitles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let outcome = provider(&server.uri(), "secret")
            .search_features(&hash_params("0000000000000000"), &CancellationToken::new())
            .await;
        assert_eq!(outcome, Lookup::Empty);
    }

    #[tokio::test]
    async fn feature_search_forwards_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/features"))
            .and(query_param("query", "the matrix"))
            .and(query_param("year", "1999"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"attributes": {
                    "imdb_id": 133093, "title": "The Matrix",
                    "year": "1999", "feature_type": "Movie"
                }}]
            })))
            .mount(&server)
            .await;

        let params = HashMap::from([
            ("query".to_string(), "the matrix".to_string()),
            ("year".to_string(), "1999".to_string()),
        ]);
        let outcome = provider(&server.uri(), "secret")
            .search_features(&params, &CancellationToken::new())
            .await;
        let features = outcome.found().unwrap();
        assert_eq!(features[0].external_id, 133093);
        assert_eq!(features[0].year, Some(1999));
    }

    #[tokio::test]
    async fn server_error_is_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let outcome = provider(&server.uri(), "secret")
            .search_features(&hash_params("abc"), &CancellationToken::new())
            .await;
        assert!(matches!(outcome, Lookup::Failed(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let outcome = provider(&server.uri(), "secret")
            .search_features(&hash_params("abc"), &CancellationToken::new())
            .await;
        assert!(matches!(outcome, Lookup::Failed(_)));
    }

    #[tokio::test]
    async fn missing_key_never_calls_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let p = provider(&server.uri(), "");
        assert!(!p.is_available());
        let outcome = p
            .search_features(&hash_params("abc"), &CancellationToken::new())
            .await;
        assert_eq!(outcome, Lookup::Failed("not configured".into()));
    }
}
