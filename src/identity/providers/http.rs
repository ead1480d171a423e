//! Shared HTTP plumbing for the concrete providers: one `reqwest` client,
//! a `governor` rate limiter, and a request helper that races the call
//! against the caller's cancellation token.

use std::num::NonZeroU32;

use anyhow::Context;
use governor::{Quota, RateLimiter};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use sift_core::{Error, Result};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::HttpSettings;
use crate::identity::provider::Lookup;

type DirectLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

pub(crate) struct ApiClient {
    provider: &'static str,
    client: reqwest::Client,
    rate_limiter: DirectLimiter,
}

impl ApiClient {
    pub(crate) fn new(provider: &'static str, settings: &HttpSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| Error::Config(format!("failed to build {provider} HTTP client: {e}")))?;

        let per_second = NonZeroU32::new(settings.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(per_second));

        Ok(Self {
            provider,
            client,
            rate_limiter,
        })
    }

    /// Start a GET request.
    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url)
    }

    /// Send `request` and decode a JSON body, unless `cancel` fires first.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Lookup<T> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Lookup::Cancelled,
            outcome = self.send::<T>(request) => match outcome {
                Ok(body) => Lookup::Found(body),
                Err(e) => {
                    debug!(provider = self.provider, error = %format!("{e:#}"), "request failed");
                    Lookup::Failed(format!("{e:#}"))
                }
            },
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> anyhow::Result<T> {
        self.rate_limiter.until_ready().await;

        let resp = request
            .send()
            .await
            .with_context(|| format!("{} request failed", self.provider))?;
        let url = resp.url().to_string();
        debug!(provider = self.provider, url = %url, status = %resp.status(), "response");

        let resp = resp
            .error_for_status()
            .with_context(|| format!("{} request returned error: {url}", self.provider))?;

        resp.json::<T>()
            .await
            .with_context(|| format!("failed to parse {} response", self.provider))
    }
}

/// Read a year that a catalog may send either as a number or as a string
/// such as `"1999"` or `"1999-03-31"`.
pub(crate) fn year_from_json(value: Option<&serde_json::Value>) -> Option<u32> {
    let year: Option<u32> = match value? {
        serde_json::Value::Number(n) => n.as_u64().and_then(|y| u32::try_from(y).ok()),
        serde_json::Value::String(s) => s.get(..4).and_then(|y| y.parse().ok()),
        _ => None,
    };
    year.filter(|&y| y > 0)
}
