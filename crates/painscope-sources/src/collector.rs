//! Fan-out collection across every configured (source, query) pair.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use painscope_core::{DateRange, RunWarning, Signal, SourceSpec};

use crate::error::SourceError;
use crate::retry::retry_with_backoff;
use crate::source::{max_results, SignalSource};

/// Retry, timeout and concurrency policy applied to every source fetch.
#[derive(Debug, Clone, Copy)]
pub struct FetchPolicy {
    /// Additional attempts after the first failure (capped at 2).
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    /// Hard deadline for a single fetch attempt.
    pub timeout: Duration,
    /// How many (source, query) fetches run at once.
    pub max_concurrent: usize,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_base_ms: 500,
            timeout: Duration::from_secs(30),
            max_concurrent: 4,
        }
    }
}

/// Signals gathered by one run plus the non-fatal failures met on the way.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Grouped by source (in first-configured order), each group sorted by
    /// `captured_at` ascending.
    pub signals: Vec<Signal>,
    pub warnings: Vec<RunWarning>,
}

impl Collection {
    /// Distinct source ids that contributed at least one signal.
    #[must_use]
    pub fn contributing_sources(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.signals
            .iter()
            .filter(|s| seen.insert(s.source_id.as_str()))
            .map(|s| s.source_id.clone())
            .collect()
    }
}

/// Drives registered [`SignalSource`]s for a list of [`SourceSpec`]s.
pub struct Collector {
    sources: HashMap<String, Arc<dyn SignalSource>>,
    policy: FetchPolicy,
}

impl Collector {
    #[must_use]
    pub fn new(policy: FetchPolicy) -> Self {
        Self {
            sources: HashMap::new(),
            policy,
        }
    }

    /// Register a source under its [`SignalSource::id`], replacing any
    /// previous source with the same id.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn SignalSource>) -> Self {
        self.sources.insert(source.id().to_string(), source);
        self
    }

    #[must_use]
    pub fn source_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Collect signals for every spec inside `window`.
    ///
    /// Specs are fetched concurrently (bounded by the policy). A spec whose
    /// fetch still fails after its retries contributes no signals and adds a
    /// [`RunWarning::SourceUnavailable`]; no single source failure is fatal.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidInput`] when `specs` is empty or the
    /// window is inverted.
    pub async fn collect(
        &self,
        specs: &[SourceSpec],
        window: &DateRange,
    ) -> Result<Collection, SourceError> {
        validate_input(specs, window)?;

        let outcomes: Vec<(&SourceSpec, Result<Vec<Signal>, SourceError>)> = stream::iter(specs)
            .map(|spec| async move { (spec, self.fetch_spec(spec, window).await) })
            .buffered(self.policy.max_concurrent.max(1))
            .collect()
            .await;

        let mut fetched = Vec::new();
        let mut warnings = Vec::new();

        for (spec, outcome) in outcomes {
            match outcome {
                Ok(signals) => {
                    tracing::debug!(
                        source = %spec.source_id,
                        query = %spec.query,
                        count = signals.len(),
                        "source fetch succeeded"
                    );
                    fetched.push((spec, signals));
                }
                Err(e) => {
                    tracing::warn!(
                        source = %spec.source_id,
                        query = %spec.query,
                        error = %e,
                        "source unavailable, continuing with partial data"
                    );
                    warnings.push(RunWarning::SourceUnavailable {
                        source_id: spec.source_id.clone(),
                        query: spec.query.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let signals = group_by_source(specs, fetched, window);

        tracing::info!(
            specs = specs.len(),
            signals = signals.len(),
            failed = warnings.len(),
            "collection finished"
        );

        Ok(Collection { signals, warnings })
    }

    async fn fetch_spec(
        &self,
        spec: &SourceSpec,
        window: &DateRange,
    ) -> Result<Vec<Signal>, SourceError> {
        let source = self
            .sources
            .get(&spec.source_id)
            .ok_or_else(|| SourceError::UnknownSource(spec.source_id.clone()))?;

        let timeout = self.policy.timeout;
        retry_with_backoff(self.policy.max_retries, self.policy.backoff_base_ms, || {
            let source = Arc::clone(source);
            async move {
                tokio::time::timeout(timeout, source.fetch(spec, window))
                    .await
                    .map_err(|_| SourceError::Timeout {
                        source_id: spec.source_id.clone(),
                        timeout_secs: timeout.as_secs(),
                    })?
            }
        })
        .await
    }
}

pub(crate) fn validate_input(specs: &[SourceSpec], window: &DateRange) -> Result<(), SourceError> {
    if specs.is_empty() {
        return Err(SourceError::InvalidInput(
            "at least one source must be requested".to_string(),
        ));
    }
    if window.start > window.end {
        return Err(SourceError::InvalidInput(format!(
            "window start {} is after end {}",
            window.start, window.end
        )));
    }
    Ok(())
}

/// Apply the per-spec cap and window filter, then lay signals out grouped by
/// source in first-configured order, deduplicated by URL within a source
/// and sorted by `captured_at` ascending (stable, so fetch order breaks ties).
pub(crate) fn group_by_source(
    specs: &[SourceSpec],
    fetched: Vec<(&SourceSpec, Vec<Signal>)>,
    window: &DateRange,
) -> Vec<Signal> {
    let mut source_order: Vec<&str> = Vec::new();
    for spec in specs {
        if !source_order.contains(&spec.source_id.as_str()) {
            source_order.push(&spec.source_id);
        }
    }

    let mut groups: HashMap<&str, Vec<Signal>> = HashMap::new();
    for (spec, signals) in fetched {
        let cap = max_results(spec);
        let group = groups.entry(spec.source_id.as_str()).or_default();
        group.extend(
            signals
                .into_iter()
                .filter(|s| window.contains(s.captured_at))
                .take(cap),
        );
    }

    let mut out = Vec::new();
    for source_id in source_order {
        let Some(mut group) = groups.remove(source_id) else {
            continue;
        };
        let mut seen_urls = HashSet::new();
        group.retain(|s| s.url.as_ref().is_none_or(|url| seen_urls.insert(url.clone())));
        group.sort_by_key(|s| s.captured_at);
        out.extend(group);
    }
    out
}
