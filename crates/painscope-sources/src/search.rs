//! Search-engine provider client and the `search` signal source built on it.
//!
//! The same [`SearchProvider`] serves two consumers: the collector (search
//! hits become signals) and the saturation scorer (search hits are
//! classified as competitor domains).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use painscope_core::{DateRange, Signal, SourceSpec};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::html::strip_html;
use crate::http::send_json;
use crate::source::{max_results, SignalSource};

const GOOGLE_DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";
/// Google Custom Search returns at most ten results per request.
pub const GOOGLE_MAX_RESULTS: usize = 10;

/// One organic search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// A search engine that returns ordered results for a query.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short provider name used in logs and warnings.
    fn name(&self) -> &str;

    /// Return up to `limit` results in rank order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the provider call fails or its response
    /// cannot be decoded.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SourceError>;
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

/// Google Custom Search JSON API client.
pub struct GoogleSearchClient {
    client: Client,
    base_url: String,
    api_key: String,
    cx: String,
}

impl GoogleSearchClient {
    #[must_use]
    pub fn new(client: Client, api_key: &str, cx: &str) -> Self {
        Self::with_base_url(client, api_key, cx, GOOGLE_DEFAULT_BASE_URL)
    }

    /// Create a client with a custom endpoint (for testing with wiremock).
    #[must_use]
    pub fn with_base_url(client: Client, api_key: &str, cx: &str, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_owned(),
            cx: cx.to_owned(),
        }
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchClient {
    fn name(&self) -> &str {
        "google"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SourceError> {
        let num = limit.clamp(1, GOOGLE_MAX_RESULTS);
        let num_param = num.to_string();
        let request = self.client.get(&self.base_url).query(&[
            ("key", self.api_key.as_str()),
            ("cx", self.cx.as_str()),
            ("q", query),
            ("num", num_param.as_str()),
        ]);

        let response: GoogleResponse = send_json("google", request).await?;

        Ok(response
            .items
            .into_iter()
            .take(num)
            .map(|item| SearchResult {
                url: item.link,
                title: item.title.trim().to_string(),
                snippet: strip_html(&item.snippet),
            })
            .collect())
    }
}

/// The `search` signal source: each search hit's title and snippet becomes
/// one signal.
///
/// Search hits carry no publication time, so they are stamped with the
/// fetch time, clamped to the window end.
pub struct SearchSource {
    provider: Arc<dyn SearchProvider>,
}

impl SearchSource {
    pub const ID: &'static str = "search";

    #[must_use]
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl SignalSource for SearchSource {
    fn id(&self) -> &str {
        Self::ID
    }

    async fn fetch(
        &self,
        spec: &SourceSpec,
        window: &DateRange,
    ) -> Result<Vec<Signal>, SourceError> {
        let limit = max_results(spec).min(GOOGLE_MAX_RESULTS);
        let results = self.provider.search(&spec.query, limit).await?;
        let captured_at = Utc::now().min(window.end);

        let signals: Vec<Signal> = results
            .into_iter()
            .filter_map(|result| {
                let text = if result.snippet.is_empty() {
                    result.title.clone()
                } else {
                    format!("{} {}", result.title, result.snippet)
                };
                Signal::new(Self::ID, captured_at, &spec.query, &text)
                    .ok()
                    .map(|signal| signal.with_url(result.url))
            })
            .collect();

        tracing::debug!(
            source = Self::ID,
            provider = self.provider.name(),
            query = %spec.query,
            count = signals.len(),
            "collected search results"
        );

        Ok(signals)
    }
}
