//! Capability traits for the external identity sources, and the values
//! they return.
//!
//! Each trait has exactly one lookup method so tests can substitute a stub
//! without standing up a server. Lookups never return `Err`: every outcome,
//! including failure and cancellation, is a [`Lookup`] variant.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Tagged outcome of one external lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The source returned usable data.
    Found(T),
    /// The source answered but had nothing for this query.
    Empty,
    /// Transport error, bad status, malformed body, or missing credentials.
    Failed(String),
    /// The cancellation token fired before the source answered.
    Cancelled,
}

impl<T> Lookup<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(v) => Lookup::Found(f(v)),
            Lookup::Empty => Lookup::Empty,
            Lookup::Failed(msg) => Lookup::Failed(msg),
            Lookup::Cancelled => Lookup::Cancelled,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Lookup::Cancelled)
    }

    /// The found value, if any.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> Lookup<Vec<T>> {
    /// `Found` for a non-empty list, `Empty` otherwise.
    pub fn from_vec(items: Vec<T>) -> Self {
        if items.is_empty() {
            Lookup::Empty
        } else {
            Lookup::Found(items)
        }
    }

    /// Collapse `Found` with an empty list into `Empty`.
    pub fn non_empty(self) -> Self {
        match self {
            Lookup::Found(items) => Lookup::from_vec(items),
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Result records
// ---------------------------------------------------------------------------

/// A catalog feature (movie or episode) returned by a feature search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Numeric IMDb id; zero when the catalog has none.
    pub external_id: u64,
    pub title: String,
    pub year: Option<u32>,
    /// Feature type as reported by the catalog (`movie`, `episode`, ...).
    pub kind: String,
}

/// One cross-reference catalog hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// `movie`, `show` or `episode`.
    pub kind: String,
    pub title: String,
    pub year: Option<u32>,
    /// Identifiers keyed by catalog name (`imdb`, `trakt`, `tmdb`, ...).
    pub ids: HashMap<String, String>,
}

impl CatalogEntry {
    pub fn id(&self, catalog: &str) -> Option<&str> {
        self.ids.get(catalog).map(String::as_str)
    }
}

/// One free-text suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    pub year: Option<u32>,
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Feature search against a hash-indexed subtitle catalog.
///
/// Called with a `hash` key for fingerprint lookups, or with free-text /
/// identifier keys (`query`, `imdb_id`, `year`) otherwise.
#[async_trait]
pub trait FeatureSearch: Send + Sync {
    /// Short provider name used in logs (e.g. `"opensubtitles"`).
    fn name(&self) -> &'static str;

    async fn search_features(
        &self,
        params: &HashMap<String, String>,
        cancel: &CancellationToken,
    ) -> Lookup<Vec<Feature>>;
}

/// Cross-reference catalog search.
///
/// `query_type` is `"imdb"` to search by a known identifier, or a
/// comma-joined type hint such as `"movie,show"` to search by title.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search_catalog(
        &self,
        query_type: &str,
        query: &str,
        cancel: &CancellationToken,
    ) -> Lookup<Vec<CatalogEntry>>;
}

/// Free-text title suggestion search.
#[async_trait]
pub trait SuggestionSearch: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search_suggestions(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Lookup<Vec<Suggestion>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_distinguishes_empty() {
        assert_eq!(Lookup::<Vec<u8>>::from_vec(vec![]), Lookup::Empty);
        assert_eq!(Lookup::from_vec(vec![1]), Lookup::Found(vec![1]));
        assert_eq!(Lookup::<Vec<u8>>::Found(vec![]).non_empty(), Lookup::Empty);
        assert_eq!(Lookup::<Vec<u8>>::Cancelled.non_empty(), Lookup::Cancelled);
    }

    #[test]
    fn map_preserves_non_found_variants() {
        assert_eq!(Lookup::Found(2).map(|v| v * 2), Lookup::Found(4));
        assert_eq!(Lookup::<u8>::Empty.map(|v| v), Lookup::Empty);
        assert_eq!(
            Lookup::<u8>::Failed("boom".into()).map(|v| v),
            Lookup::Failed("boom".into())
        );
        assert!(Lookup::<u8>::Cancelled.map(|v| v).is_cancelled());
    }

    #[test]
    fn found_extracts_value() {
        assert_eq!(Lookup::Found("x").found(), Some("x"));
        assert_eq!(Lookup::<&str>::Empty.found(), None);
    }

    #[test]
    fn catalog_entry_id_lookup() {
        let entry = CatalogEntry {
            kind: "movie".into(),
            title: "The Matrix".into(),
            year: Some(1999),
            ids: HashMap::from([("imdb".to_string(), "tt0133093".to_string())]),
        };
        assert_eq!(entry.id("imdb"), Some("tt0133093"));
        assert_eq!(entry.id("trakt"), None);
    }
}
