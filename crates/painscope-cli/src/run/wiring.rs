//! Builds live pipeline stages from [`AppConfig`].

use std::sync::Arc;
use std::time::Duration;

use painscope_core::{AppConfig, SummarizerKind};
use painscope_metrics::{CsvSink, MetricsLogger, SheetsMirrorSink};
use painscope_saturation::NicheScorer;
use painscope_sources::{
    build_client, Collector, FetchPolicy, GoogleSearchClient, HackerNewsSource, RedditSource,
    SearchProvider, SearchSource,
};
use painscope_themes::{LlmSummarizer, ThemeExtractor};

use super::pipeline::Pipeline;

/// Wire every stage against the real upstream services.
///
/// The `search` source and the niche scorer share one search provider and
/// are left out when no search credentials are configured.
///
/// # Errors
///
/// Returns an error if an HTTP client cannot be built or the LLM
/// summarizer is selected without an API key.
pub(super) fn build_pipeline(config: &AppConfig) -> anyhow::Result<Pipeline> {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let client = build_client(config.request_timeout_secs, &config.user_agent)
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

    let provider: Option<Arc<dyn SearchProvider>> =
        config.search_credentials().map(|(key, cx)| {
            Arc::new(GoogleSearchClient::with_base_url(
                client.clone(),
                key,
                cx,
                &config.search_base_url,
            )) as Arc<dyn SearchProvider>
        });
    if provider.is_none() {
        tracing::warn!(
            "GOOGLE_SEARCH_API_KEY / GOOGLE_SEARCH_CX not set; search and saturation checks disabled"
        );
    }

    let policy = FetchPolicy {
        max_retries: config.max_retries,
        backoff_base_ms: config.retry_backoff_base_ms,
        timeout,
        max_concurrent: config.max_concurrent_requests,
    };
    let mut collector = Collector::new(policy)
        .with_source(Arc::new(RedditSource::with_base_url(
            client.clone(),
            &config.reddit_base_url,
        )))
        .with_source(Arc::new(HackerNewsSource::with_base_url(
            client,
            &config.hn_base_url,
        )));
    if let Some(provider) = &provider {
        collector = collector.with_source(Arc::new(SearchSource::new(Arc::clone(provider))));
    }

    let extractor = match config.summarizer {
        SummarizerKind::Heuristic => ThemeExtractor::heuristic(),
        SummarizerKind::Llm => {
            let api_key = config.openai_api_key.as_deref().ok_or_else(|| {
                anyhow::anyhow!("OPENAI_API_KEY is required for the llm summarizer")
            })?;
            let llm = LlmSummarizer::with_base_url(
                api_key,
                &config.llm_model,
                config.llm_seed,
                config.llm_timeout_secs,
                &config.llm_base_url,
            )
            .map_err(|e| anyhow::anyhow!("failed to build LLM summarizer: {e}"))?;
            ThemeExtractor::with_heuristic_fallback(Arc::new(llm))
        }
    };

    let scorer = provider
        .map(|provider| NicheScorer::new(provider, timeout, config.max_concurrent_requests));

    let mut logger = MetricsLogger::new(Arc::new(CsvSink::new(&config.metrics_csv_path)), timeout);
    if let Some(mirror) = &config.sheets_mirror {
        let sheets = SheetsMirrorSink::with_base_url(
            &mirror.spreadsheet_id,
            &mirror.range,
            &mirror.access_token,
            config.request_timeout_secs,
            &mirror.base_url,
        )
        .map_err(|e| anyhow::anyhow!("failed to build Sheets mirror: {e}"))?;
        logger = logger.with_mirror(Arc::new(sheets));
    }

    tracing::debug!(
        sources = ?collector.source_ids(),
        summarizer = %config.summarizer,
        mirror = config.sheets_mirror.is_some(),
        "pipeline wired"
    );

    Ok(Pipeline {
        collector,
        extractor,
        scorer,
        logger,
    })
}
