//! Hacker News collector backed by the Algolia search API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use painscope_core::{DateRange, Signal, SourceSpec};
use reqwest::Client;
use serde::Deserialize;

use crate::error::SourceError;
use crate::html::{strip_html, truncate_chars};
use crate::http::send_json;
use crate::source::{max_results, SignalSource};

const DEFAULT_BASE_URL: &str = "https://hn.algolia.com/api/v1";
const HITS_PER_PAGE_MAX: usize = 100;
const TEXT_SNIPPET_CHARS: usize = 420;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "objectID")]
    object_id: String,
    title: Option<String>,
    story_text: Option<String>,
    comment_text: Option<String>,
    created_at_i: i64,
    num_comments: Option<u32>,
}

/// Searches stories and comments via `search_by_date`, restricted to the window.
pub struct HackerNewsSource {
    client: Client,
    base_url: String,
}

impl HackerNewsSource {
    pub const ID: &'static str = "hackernews";

    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Create a source with a custom base URL (for testing with wiremock).
    #[must_use]
    pub fn with_base_url(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SignalSource for HackerNewsSource {
    fn id(&self) -> &str {
        Self::ID
    }

    async fn fetch(
        &self,
        spec: &SourceSpec,
        window: &DateRange,
    ) -> Result<Vec<Signal>, SourceError> {
        let hits_per_page = max_results(spec).min(HITS_PER_PAGE_MAX).to_string();
        let numeric_filters = format!(
            "created_at_i>={},created_at_i<={}",
            window.start.timestamp(),
            window.end.timestamp()
        );
        let request = self
            .client
            .get(format!("{}/search_by_date", self.base_url))
            .query(&[
                ("query", spec.query.as_str()),
                ("tags", "(story,comment)"),
                ("numericFilters", numeric_filters.as_str()),
                ("hitsPerPage", hits_per_page.as_str()),
            ]);

        let response: SearchResponse = send_json(Self::ID, request).await?;

        let signals: Vec<Signal> = response
            .hits
            .iter()
            .filter_map(|hit| to_signal(hit, &spec.query))
            .collect();

        tracing::debug!(
            source = Self::ID,
            query = %spec.query,
            count = signals.len(),
            "collected Hacker News items"
        );

        Ok(signals)
    }
}

fn to_signal(hit: &Hit, query: &str) -> Option<Signal> {
    let title = hit.title.as_deref().map(str::trim).unwrap_or_default();
    let body = hit
        .story_text
        .as_deref()
        .or(hit.comment_text.as_deref())
        .map(strip_html)
        .map(|text| truncate_chars(&text, TEXT_SNIPPET_CHARS))
        .unwrap_or_default();

    let text = match (title.is_empty(), body.is_empty()) {
        (false, false) => format!("{title} {body}"),
        (false, true) => title.to_string(),
        (true, false) => body,
        (true, true) => return None,
    };

    let captured_at = DateTime::<Utc>::from_timestamp(hit.created_at_i, 0)?;
    let signal = Signal::new(HackerNewsSource::ID, captured_at, query, &text)
        .ok()?
        .with_url(format!(
            "https://news.ycombinator.com/item?id={}",
            hit.object_id
        ))
        .with_reply_count(hit.num_comments.unwrap_or(0));
    Some(signal)
}
