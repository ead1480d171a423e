//! Trakt cross-reference search.
//!
//! `query_type == "imdb"` looks an identifier up via
//! `GET /search/imdb/{id}`; any other type hint (`movie,show`,
//! `show,episode`, ...) becomes `GET /search/{types}?query=...`.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use sift_core::Result;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::http::{year_from_json, ApiClient};
use super::HttpSettings;
use crate::identity::provider::{CatalogEntry, CatalogSearch, Lookup};

pub const DEFAULT_BASE_URL: &str = "https://api.trakt.tv";

const API_VERSION: &str = "2";

// ---------------------------------------------------------------------------
// API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TraktResult {
    #[serde(rename = "type")]
    kind: String,
    movie: Option<TraktMedia>,
    show: Option<TraktMedia>,
    episode: Option<TraktMedia>,
}

#[derive(Debug, Deserialize)]
struct TraktMedia {
    title: Option<String>,
    year: Option<serde_json::Value>,
    #[serde(default = "HashMap::new")]
    ids: HashMap<String, serde_json::Value>,
}

impl TraktResult {
    /// Flatten one hit. Episodes carry their own ids but take title and year
    /// from the parent show.
    fn into_entry(self) -> Option<CatalogEntry> {
        let (ids_from, title_from) = match self.kind.as_str() {
            "movie" => (self.movie?, None),
            "show" => (self.show?, None),
            "episode" => (self.episode?, self.show),
            _ => return None,
        };
        let named = title_from.as_ref().unwrap_or(&ids_from);
        Some(CatalogEntry {
            title: named.title.clone().unwrap_or_default(),
            year: year_from_json(named.year.as_ref()),
            ids: flatten_ids(&ids_from.ids),
            kind: self.kind,
        })
    }
}

fn flatten_ids(ids: &HashMap<String, serde_json::Value>) -> HashMap<String, String> {
    ids.iter()
        .filter_map(|(k, v)| {
            let v = match v {
                serde_json::Value::String(s) if !s.is_empty() => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some((k.clone(), v))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

pub struct TraktProvider {
    api: ApiClient,
    base_url: String,
    client_id: String,
}

impl TraktProvider {
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        settings: &HttpSettings,
    ) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new("trakt", settings)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
        })
    }

    pub fn is_available(&self) -> bool {
        !self.client_id.is_empty()
    }
}

#[async_trait]
impl CatalogSearch for TraktProvider {
    fn name(&self) -> &'static str {
        "trakt"
    }

    async fn search_catalog(
        &self,
        query_type: &str,
        query: &str,
        cancel: &CancellationToken,
    ) -> Lookup<Vec<CatalogEntry>> {
        if !self.is_available() {
            return Lookup::Failed("not configured".into());
        }
        let query = query.trim();
        if query.is_empty() {
            return Lookup::Empty;
        }

        let request = if query_type == "imdb" {
            let url = format!("{}/search/imdb/{}", self.base_url, urlencoding::encode(query));
            debug!(url = %url, "Trakt id lookup");
            self.api.get(&url)
        } else {
            let url = format!("{}/search/{}", self.base_url, query_type);
            debug!(url = %url, query, "Trakt text search");
            self.api.get(&url).query(&[("query", query)])
        };
        let request = request
            .header("trakt-api-version", API_VERSION)
            .header("trakt-api-key", &self.client_id);

        self.api
            .fetch::<Vec<TraktResult>>(request, cancel)
            .await
            .map(|hits| {
                hits.into_iter()
                    .filter_map(TraktResult::into_entry)
                    .collect::<Vec<_>>()
            })
            .non_empty()
    }
}
