//! Concrete identity providers.
//!
//! Each network provider owns a shared [`http::ApiClient`] built from
//! [`HttpSettings`]. [`OfflineProvider`] answers every query with
//! [`Lookup::Empty`](crate::identity::provider::Lookup::Empty) and is used
//! when network lookups are disabled.

pub(crate) mod http;
pub mod imdb;
pub mod offline;
pub mod opensubtitles;
pub mod trakt;

use std::time::Duration;

pub use imdb::ImdbSuggestProvider;
pub use offline::OfflineProvider;
pub use opensubtitles::OpenSubtitlesProvider;
pub use trakt::TraktProvider;

/// Transport settings shared by the HTTP providers.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Requests per second allowed for one provider; zero is treated as one.
    pub requests_per_second: u32,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            requests_per_second: 4,
            user_agent: format!("subsift v{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
