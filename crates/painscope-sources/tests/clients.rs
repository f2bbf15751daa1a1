//! Integration tests for the source clients using wiremock HTTP mocks.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use painscope_core::{parse_sources, DateRange, SourceSpec};
use painscope_sources::{
    build_client, Collector, FetchPolicy, GoogleSearchClient, HackerNewsSource, RedditSource,
    SearchProvider, SearchSource, SignalSource, SourceError,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn window() -> DateRange {
    DateRange::new(
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 3, 8, 0, 0, 0).unwrap(),
    )
    .unwrap()
}

fn http() -> reqwest::Client {
    build_client(5, "painscope-test/0.1").expect("client construction should not fail")
}

#[tokio::test]
async fn reddit_search_returns_signals() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "data": {
            "children": [
                { "data": {
                    "title": "Chasing late invoices every month",
                    "selftext": "Is there a tool that nags clients for me?",
                    "permalink": "/r/freelance/comments/1/late_invoices/",
                    "created_utc": 1_741_100_000.0,
                    "num_comments": 17
                }},
                { "data": {
                    "title": "Removed post",
                    "selftext": "[removed]",
                    "permalink": "/r/freelance/comments/2/removed/",
                    "created_utc": 1_741_200_000.0,
                    "num_comments": 0
                }}
            ]
        }
    });

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("q", "invoicing"))
        .and(query_param("sort", "new"))
        .and(query_param("t", "week"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let source = RedditSource::with_base_url(http(), &server.uri());
    let signals = source
        .fetch(&SourceSpec::new("reddit", "invoicing"), &window())
        .await
        .expect("should parse listing");

    assert_eq!(signals.len(), 2);
    assert_eq!(
        signals[0].raw_text,
        "Chasing late invoices every month Is there a tool that nags clients for me?"
    );
    assert_eq!(signals[0].reply_count, 17);
    assert_eq!(signals[1].raw_text, "Removed post");
}

#[tokio::test]
async fn reddit_server_error_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = RedditSource::with_base_url(http(), &server.uri());
    let err = source
        .fetch(&SourceSpec::new("reddit", "crm"), &window())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SourceError::UnexpectedStatus { status: 503, .. }
    ));
    assert!(err.is_transient());
}

#[tokio::test]
async fn reddit_rate_limit_reads_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
        .mount(&server)
        .await;

    let source = RedditSource::with_base_url(http(), &server.uri());
    let err = source
        .fetch(&SourceSpec::new("reddit", "crm"), &window())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SourceError::RateLimited {
            retry_after_secs: 12,
            ..
        }
    ));
}

#[tokio::test]
async fn hackernews_search_filters_by_window() {
    let server = MockServer::start().await;
    let w = window();

    let body = serde_json::json!({
        "hits": [
            {
                "objectID": "900",
                "title": null,
                "comment_text": "<p>Scheduling shifts in spreadsheets is a nightmare</p>",
                "created_at_i": 1_741_150_000,
                "num_comments": null
            },
            {
                "objectID": "901",
                "title": "Ask HN: Tools for client onboarding?",
                "story_text": null,
                "created_at_i": 1_741_160_000,
                "num_comments": 41
            }
        ]
    });

    let filters = format!(
        "created_at_i>={},created_at_i<={}",
        w.start.timestamp(),
        w.end.timestamp()
    );
    Mock::given(method("GET"))
        .and(path("/search_by_date"))
        .and(query_param("query", "scheduling"))
        .and(query_param("tags", "(story,comment)"))
        .and(query_param("numericFilters", filters.as_str()))
        .and(query_param("hitsPerPage", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let source = HackerNewsSource::with_base_url(http(), &server.uri());
    let spec = SourceSpec::new("hackernews", "scheduling").with_max_results(10);
    let signals = source.fetch(&spec, &w).await.expect("should parse hits");

    assert_eq!(signals.len(), 2);
    assert_eq!(
        signals[0].raw_text,
        "Scheduling shifts in spreadsheets is a nightmare"
    );
    assert_eq!(
        signals[1].url.as_deref(),
        Some("https://news.ycombinator.com/item?id=901")
    );
    assert_eq!(signals[1].reply_count, 41);
}

#[tokio::test]
async fn hn_alias_in_sources_file_collects_from_hackernews() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "hits": [{
            "objectID": "77",
            "title": "Ask HN: How do you chase unpaid invoices?",
            "created_at_i": 1_741_150_000,
            "num_comments": 12
        }]
    });
    Mock::given(method("GET"))
        .and(path("/search_by_date"))
        .and(query_param("query", "invoicing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let sources = parse_sources("sources:\n  - source: hn\n    query: invoicing\n")
        .expect("hn alias should be accepted");
    let collector = Collector::new(FetchPolicy {
        max_retries: 0,
        backoff_base_ms: 0,
        timeout: Duration::from_secs(5),
        max_concurrent: 1,
    })
    .with_source(Arc::new(HackerNewsSource::with_base_url(http(), &server.uri())));

    let collection = collector
        .collect(&sources.sources, &window())
        .await
        .expect("collection should succeed");

    assert!(collection.warnings.is_empty(), "{:?}", collection.warnings);
    assert_eq!(collection.signals.len(), 1);
    assert_eq!(collection.signals[0].source_id, "hackernews");
    assert_eq!(collection.contributing_sources(), vec!["hackernews"]);
}

#[tokio::test]
async fn hackernews_malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search_by_date"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let source = HackerNewsSource::with_base_url(http(), &server.uri());
    let err = source
        .fetch(&SourceSpec::new("hackernews", "crm"), &window())
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Deserialize { .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn google_search_returns_ranked_results() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "items": [
            { "link": "https://www.invoiceninja.com/", "title": "Invoice Ninja", "snippet": "Free <b>invoicing</b> software" },
            { "link": "https://www.reddit.com/r/smallbusiness/", "title": "r/smallbusiness", "snippet": "" }
        ]
    });

    Mock::given(method("GET"))
        .and(query_param("key", "test-key"))
        .and(query_param("cx", "test-cx"))
        .and(query_param("q", "invoicing software"))
        .and(query_param("num", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = GoogleSearchClient::with_base_url(http(), "test-key", "test-cx", &server.uri());
    let results = client
        .search("invoicing software", 50)
        .await
        .expect("should parse results");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].url, "https://www.invoiceninja.com/");
    assert_eq!(results[0].snippet, "Free invoicing software");
}

#[tokio::test]
async fn google_search_without_items_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let client = GoogleSearchClient::with_base_url(http(), "k", "cx", &server.uri());
    let results = client.search("nothing", 10).await.expect("should parse");
    assert!(results.is_empty());
}

#[tokio::test]
async fn search_source_turns_hits_into_signals() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "items": [
            { "link": "https://example.com/a", "title": "Payroll is painful", "snippet": "Small teams struggle" }
        ]
    });

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let provider = GoogleSearchClient::with_base_url(http(), "k", "cx", &server.uri());
    let source = SearchSource::new(Arc::new(provider));
    let w = window();
    let signals = source
        .fetch(&SourceSpec::new("search", "payroll pain"), &w)
        .await
        .expect("should build signals");

    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].raw_text, "Payroll is painful Small teams struggle");
    assert_eq!(signals[0].url.as_deref(), Some("https://example.com/a"));
    assert!(w.contains(signals[0].captured_at));
}
