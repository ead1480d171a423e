//! Identity resolution: NFO sidecars, external lookups, and the resolver
//! that applies their precedence.

pub mod nfo;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod resolver;

pub use provider::{
    CatalogEntry, CatalogSearch, Feature, FeatureSearch, Lookup, Suggestion, SuggestionSearch,
};
pub use registry::ProviderSet;
pub use resolver::IdentityResolver;
