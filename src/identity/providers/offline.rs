//! A provider that never leaves the machine.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::identity::provider::{
    CatalogEntry, CatalogSearch, Feature, FeatureSearch, Lookup, Suggestion, SuggestionSearch,
};

/// Answers every lookup with [`Lookup::Empty`], or [`Lookup::Cancelled`]
/// once the token has fired.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

fn empty<T>(cancel: &CancellationToken) -> Lookup<T> {
    if cancel.is_cancelled() {
        Lookup::Cancelled
    } else {
        Lookup::Empty
    }
}

#[async_trait]
impl FeatureSearch for OfflineProvider {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn search_features(
        &self,
        _params: &HashMap<String, String>,
        cancel: &CancellationToken,
    ) -> Lookup<Vec<Feature>> {
        empty(cancel)
    }
}

#[async_trait]
impl CatalogSearch for OfflineProvider {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn search_catalog(
        &self,
        _query_type: &str,
        _query: &str,
        cancel: &CancellationToken,
    ) -> Lookup<Vec<CatalogEntry>> {
        empty(cancel)
    }
}

#[async_trait]
impl SuggestionSearch for OfflineProvider {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn search_suggestions(
        &self,
        _query: &str,
        cancel: &CancellationToken,
    ) -> Lookup<Vec<Suggestion>> {
        empty(cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_empty_until_cancelled() {
        let cancel = CancellationToken::new();
        let p = OfflineProvider;
        assert_eq!(p.search_features(&HashMap::new(), &cancel).await, Lookup::Empty);
        assert_eq!(p.search_catalog("imdb", "tt0133093", &cancel).await, Lookup::Empty);
        assert_eq!(p.search_suggestions("matrix", &cancel).await, Lookup::Empty);

        cancel.cancel();
        assert!(p.search_suggestions("matrix", &cancel).await.is_cancelled());
    }
}
