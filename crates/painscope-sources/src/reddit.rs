//! Reddit public search collector.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use painscope_core::{DateRange, Signal, SourceSpec};
use reqwest::Client;
use serde::Deserialize;

use crate::error::SourceError;
use crate::html::truncate_chars;
use crate::http::send_json;
use crate::source::{max_results, SignalSource};

const DEFAULT_BASE_URL: &str = "https://www.reddit.com";
/// Reddit caps `limit` at 100 per listing page.
const PAGE_LIMIT_MAX: usize = 100;
const SELFTEXT_SNIPPET_CHARS: usize = 280;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    title: Option<String>,
    selftext: Option<String>,
    permalink: Option<String>,
    created_utc: Option<f64>,
    num_comments: Option<u32>,
}

/// Searches Reddit's public `search.json` listing.
pub struct RedditSource {
    client: Client,
    base_url: String,
}

impl RedditSource {
    pub const ID: &'static str = "reddit";

    /// Create a source pointed at the production Reddit host.
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
impl SignalSource for RedditSource {
    fn id(&self) -> &str {
        Self::ID
    }

    async fn fetch(
        &self,
        spec: &SourceSpec,
        window: &DateRange,
    ) -> Result<Vec<Signal>, SourceError> {
        let limit = max_results(spec).min(PAGE_LIMIT_MAX).to_string();
        let request = self
            .client
            .get(format!("{}/search.json", self.base_url))
            .query(&[
                ("q", spec.query.as_str()),
                ("sort", "new"),
                ("t", time_filter(window)),
                ("limit", limit.as_str()),
                ("raw_json", "1"),
            ]);

        let listing: Listing = send_json(Self::ID, request).await?;

        let signals: Vec<Signal> = listing
            .data
            .children
            .iter()
            .filter_map(|post| to_signal(&post.data, &spec.query))
            .collect();

        tracing::debug!(
            source = Self::ID,
            query = %spec.query,
            count = signals.len(),
            "collected Reddit posts"
        );

        Ok(signals)
    }
}

/// Narrowest Reddit `t` filter that still covers the whole window.
fn time_filter(window: &DateRange) -> &'static str {
    match window.days() {
        ..=1 => "day",
        2..=7 => "week",
        8..=31 => "month",
        32..=366 => "year",
        _ => "all",
    }
}

fn to_signal(post: &PostData, query: &str) -> Option<Signal> {
    let title = post
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())?;

    let text = match post.selftext.as_deref().map(str::trim) {
        Some(body) if !body.is_empty() && body != "[deleted]" && body != "[removed]" => {
            let snippet = truncate_chars(body, SELFTEXT_SNIPPET_CHARS);
            format!("{title} {snippet}")
        }
        _ => title.to_string(),
    };

    #[allow(clippy::cast_possible_truncation)]
    let captured_at = DateTime::<Utc>::from_timestamp(post.created_utc? as i64, 0)?;

    let mut signal = Signal::new(RedditSource::ID, captured_at, query, &text)
        .ok()?
        .with_reply_count(post.num_comments.unwrap_or(0));
    if let Some(permalink) = &post.permalink {
        signal = signal.with_url(format!("https://reddit.com{permalink}"));
    }
    Some(signal)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn post(title: Option<&str>, selftext: Option<&str>) -> PostData {
        PostData {
            title: title.map(ToString::to_string),
            selftext: selftext.map(ToString::to_string),
            permalink: Some("/r/SaaS/comments/abc/post/".to_string()),
            created_utc: Some(1_741_000_000.0),
            num_comments: Some(12),
        }
    }

    #[test]
    fn to_signal_joins_title_and_snippet() {
        let signal = to_signal(
            &post(Some("Invoicing is killing me"), Some("Clients pay late")),
            "invoicing",
        )
        .unwrap();
        assert_eq!(signal.raw_text, "Invoicing is killing me Clients pay late");
        assert_eq!(signal.source_id, "reddit");
        assert_eq!(signal.query, "invoicing");
        assert_eq!(signal.reply_count, 12);
        assert_eq!(
            signal.url.as_deref(),
            Some("https://reddit.com/r/SaaS/comments/abc/post/")
        );
        assert_eq!(signal.captured_at.timestamp(), 1_741_000_000);
    }

    #[test]
    fn to_signal_skips_removed_selftext() {
        let signal = to_signal(&post(Some("Need a CRM"), Some("[removed]")), "crm").unwrap();
        assert_eq!(signal.raw_text, "Need a CRM");
    }

    #[test]
    fn to_signal_requires_title_and_timestamp() {
        assert!(to_signal(&post(None, Some("body")), "crm").is_none());
        assert!(to_signal(&post(Some("   "), None), "crm").is_none());
        let mut undated = post(Some("title"), None);
        undated.created_utc = None;
        assert!(to_signal(&undated, "crm").is_none());
    }

    #[test]
    fn to_signal_truncates_long_selftext() {
        let body = "x".repeat(1000);
        let signal = to_signal(&post(Some("t"), Some(&body)), "q").unwrap();
        assert_eq!(signal.raw_text.chars().count(), 2 + SELFTEXT_SNIPPET_CHARS);
    }

    #[test]
    fn time_filter_covers_window() {
        let end = Utc.with_ymd_and_hms(2025, 3, 31, 0, 0, 0).unwrap();
        assert_eq!(time_filter(&DateRange::last_days(end, 1)), "day");
        assert_eq!(time_filter(&DateRange::last_days(end, 7)), "week");
        assert_eq!(time_filter(&DateRange::last_days(end, 30)), "month");
        assert_eq!(time_filter(&DateRange::last_days(end, 90)), "year");
        assert_eq!(time_filter(&DateRange::last_days(end, 800)), "all");
    }
}
