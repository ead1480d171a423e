//! The set of providers an [`IdentityResolver`](super::IdentityResolver)
//! consults, one per capability.

use std::sync::Arc;

use sift_core::Result;

use super::provider::{CatalogSearch, FeatureSearch, SuggestionSearch};
use super::providers::{ImdbSuggestProvider, OfflineProvider, OpenSubtitlesProvider, TraktProvider};
use crate::config::ProvidersConfig;

/// One provider per capability, shared behind `Arc`s so the resolver stays
/// cheap to clone.
#[derive(Clone)]
pub struct ProviderSet {
    pub features: Arc<dyn FeatureSearch>,
    pub catalog: Arc<dyn CatalogSearch>,
    pub suggestions: Arc<dyn SuggestionSearch>,
}

impl ProviderSet {
    pub fn new(
        features: Arc<dyn FeatureSearch>,
        catalog: Arc<dyn CatalogSearch>,
        suggestions: Arc<dyn SuggestionSearch>,
    ) -> Self {
        Self {
            features,
            catalog,
            suggestions,
        }
    }

    /// Build the HTTP providers described by `config`.
    ///
    /// Missing credentials do not fail here; the affected provider reports
    /// `not configured` on every lookup instead.
    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        let settings = config.http_settings();
        Ok(Self {
            features: Arc::new(OpenSubtitlesProvider::new(
                &config.opensubtitles_url,
                &config.opensubtitles_api_key,
                &settings,
            )?),
            catalog: Arc::new(TraktProvider::new(
                &config.trakt_url,
                &config.trakt_client_id,
                &settings,
            )?),
            suggestions: Arc::new(ImdbSuggestProvider::new(&config.imdb_suggest_url, &settings)?),
        })
    }

    /// Providers that never touch the network.
    pub fn offline() -> Self {
        let offline = Arc::new(OfflineProvider);
        Self {
            features: offline.clone(),
            catalog: offline.clone(),
            suggestions: offline,
        }
    }

    /// `features/catalog/suggestions` provider names, for logging.
    pub fn describe(&self) -> String {
        format!(
            "{}/{}/{}",
            self.features.name(),
            self.catalog.name(),
            self.suggestions.name()
        )
    }
}

impl std::fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSet")
            .field("features", &self.features.name())
            .field("catalog", &self.catalog.name())
            .field("suggestions", &self.suggestions.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_set_names() {
        assert_eq!(ProviderSet::offline().describe(), "offline/offline/offline");
    }

    #[test]
    fn from_default_config() {
        let set = ProviderSet::from_config(&ProvidersConfig::default()).unwrap();
        assert_eq!(set.describe(), "opensubtitles/trakt/imdb");
    }
}
