//! IMDb title suggestion search.
//!
//! The suggestion endpoint is keyed by the first character of the lowercased
//! query: `GET /{c}/{query}.json`. Hits arrive under `d` with `id`, `l`
//! (label) and `y` (year).

use async_trait::async_trait;
use serde::Deserialize;
use sift_core::Result;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::http::{year_from_json, ApiClient};
use super::HttpSettings;
use crate::identity::provider::{Lookup, Suggestion, SuggestionSearch};

pub const DEFAULT_BASE_URL: &str = "https://v3.sg.media-imdb.com/suggestion";

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(default = "Vec::new")]
    d: Vec<SuggestHit>,
}

#[derive(Debug, Deserialize)]
struct SuggestHit {
    id: Option<String>,
    l: Option<String>,
    y: Option<serde_json::Value>,
}

pub struct ImdbSuggestProvider {
    api: ApiClient,
    base_url: String,
}

impl ImdbSuggestProvider {
    pub fn new(base_url: impl Into<String>, settings: &HttpSettings) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new("imdb", settings)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, query: &str) -> Option<String> {
        let first = query.chars().next()?;
        Some(format!(
            "{}/{}/{}.json",
            self.base_url,
            urlencoding::encode(&first.to_string()),
            urlencoding::encode(query)
        ))
    }
}

#[async_trait]
impl SuggestionSearch for ImdbSuggestProvider {
    fn name(&self) -> &'static str {
        "imdb"
    }

    async fn search_suggestions(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Lookup<Vec<Suggestion>> {
        if self.base_url.is_empty() {
            return Lookup::Failed("not configured".into());
        }
        let query = query.trim().to_lowercase();
        let Some(url) = self.url_for(&query) else {
            return Lookup::Empty;
        };
        debug!(url = %url, "IMDb suggestion search");

        self.api
            .fetch::<SuggestResponse>(self.api.get(&url), cancel)
            .await
            .map(|body| {
                body.d
                    .into_iter()
                    .filter_map(|hit| {
                        Some(Suggestion {
                            id: hit.id?,
                            title: hit.l.unwrap_or_default(),
                            year: year_from_json(hit.y.as_ref()),
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .non_empty()
    }
}
