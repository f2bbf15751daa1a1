//! Stage ordering for a single run.
//!
//! Collector, extractor, scorer, renderer, logger: each stage only starts
//! once the previous one has finished, and every non-fatal failure is
//! carried forward as a [`RunWarning`].

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use painscope_core::{DateRange, RunWarning, Signal, SourceSpec, ThemeCluster};
use painscope_metrics::{MetricsLogger, MetricsRow, MAX_PAIN_POINTS};
use painscope_report::{render, write_report, Report, ReportFormat, ReportMetadata};
use painscope_saturation::NicheScorer;
use painscope_sources::{replay, save_signals, Collection, Collector};
use painscope_themes::ThemeExtractor;
use rust_decimal::Decimal;

use super::error::RunError;

/// The wired stages of the pipeline.
pub(crate) struct Pipeline {
    pub collector: Collector,
    pub extractor: ThemeExtractor,
    /// `None` when no search provider is configured; every candidate niche
    /// is then reported as unavailable.
    pub scorer: Option<NicheScorer>,
    pub logger: MetricsLogger,
}

/// Everything one run needs besides the wired stages.
pub(crate) struct RunRequest {
    pub specs: Vec<SourceSpec>,
    pub window: DateRange,
    pub generated_at: DateTime<Utc>,
    /// A previously saved signal set to replay instead of collecting.
    pub replay: Option<Vec<Signal>>,
    /// Where to save freshly collected signals.
    pub cache_path: Option<PathBuf>,
    /// Explicit niche queries; empty means derive them from the themes.
    pub niches: Vec<String>,
    pub revenue: Decimal,
    pub output: PathBuf,
    pub format: ReportFormat,
}

#[derive(Debug)]
pub(crate) struct RunOutcome {
    pub report: Report,
    pub report_path: PathBuf,
    pub metrics_row: MetricsRow,
    /// Every non-fatal failure of the run, in stage order.
    pub warnings: Vec<RunWarning>,
}

impl Pipeline {
    /// Run every stage once.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] when the input is unusable, theme extraction
    /// fails without a working fallback, the report cannot be written, or
    /// the primary metrics write fails.
    pub(crate) async fn execute(&self, request: RunRequest) -> Result<RunOutcome, RunError> {
        let RunRequest {
            specs,
            window,
            generated_at,
            replay: saved,
            cache_path,
            niches,
            revenue,
            output,
            format,
        } = request;

        let collection = match saved {
            Some(saved) => {
                tracing::info!(signals = saved.len(), "replaying saved signal set");
                replay(saved, &specs, &window)?
            }
            None => {
                let collection = self.collector.collect(&specs, &window).await?;
                if let Some(path) = &cache_path {
                    save_cache(path, &collection).await;
                }
                collection
            }
        };
        let mut warnings = collection.warnings.clone();
        tracing::info!(
            signals = collection.signals.len(),
            failed_fetches = warnings.len(),
            "collection finished"
        );

        let extraction = self.extractor.extract(&collection.signals).await?;
        warnings.extend(extraction.warnings);
        let clusters = extraction.clusters;
        tracing::info!(
            clusters = clusters.len(),
            backend = %extraction.backend,
            "theme extraction finished"
        );

        let queries = candidate_niches(&niches, &clusters);
        let niche_scores = match &self.scorer {
            Some(scorer) => {
                let scoring = scorer.score_all(&queries).await;
                warnings.extend(scoring.warnings);
                scoring.scores
            }
            None => {
                if !queries.is_empty() {
                    tracing::warn!(
                        niches = queries.len(),
                        "no search provider configured, skipping saturation checks"
                    );
                }
                warnings.extend(queries.iter().map(|query| RunWarning::ScoreUnavailable {
                    query: query.clone(),
                    reason: "no search provider configured".to_string(),
                }));
                Vec::new()
            }
        };

        let metadata = ReportMetadata {
            generated_at,
            period: window,
            signal_count: collection.signals.len(),
            sources: collection.contributing_sources(),
            warnings: warnings.clone(),
        };
        let report = render(&clusters, &niche_scores, &metadata);
        let report_path = write_report(&report, &output, format).await?;

        let metrics_row = metrics_row(generated_at, &specs, &collection.signals, &report, revenue);
        let appended = self.logger.append(&metrics_row).await?;
        warnings.extend(appended.warnings);

        tracing::info!(
            report = %report_path.display(),
            warnings = warnings.len(),
            "run complete"
        );
        Ok(RunOutcome {
            report,
            report_path,
            metrics_row,
            warnings,
        })
    }
}

/// Save a live collection for later `--use-cache` runs. An empty collection
/// never replaces an earlier cache.
async fn save_cache(path: &std::path::Path, collection: &Collection) {
    if collection.signals.is_empty() {
        tracing::debug!("no signals collected, keeping existing signal cache");
        return;
    }
    if let Err(e) = save_signals(path, &collection.signals).await {
        tracing::warn!(path = %path.display(), error = %e, "failed to save signal cache");
    }
}

/// Explicit queries when given, otherwise one `"<theme> software"` query
/// per cluster. Blank and repeated (case-insensitive) queries are dropped.
pub(crate) fn candidate_niches(explicit: &[String], clusters: &[ThemeCluster]) -> Vec<String> {
    let raw: Vec<String> = if explicit.is_empty() {
        clusters
            .iter()
            .map(|c| format!("{} software", c.name.to_lowercase()))
            .collect()
    } else {
        explicit.iter().map(|q| q.trim().to_string()).collect()
    };

    let mut queries: Vec<String> = Vec::with_capacity(raw.len());
    for query in raw {
        if !query.is_empty() && !queries.iter().any(|q| q.eq_ignore_ascii_case(&query)) {
            queries.push(query);
        }
    }
    queries
}

/// The audit row for a finished run.
pub(crate) fn metrics_row(
    generated_at: DateTime<Utc>,
    specs: &[SourceSpec],
    signals: &[Signal],
    report: &Report,
    revenue: Decimal,
) -> MetricsRow {
    let mut queries: Vec<&str> = Vec::new();
    for spec in specs {
        if !queries.iter().any(|q| q.eq_ignore_ascii_case(&spec.query)) {
            queries.push(&spec.query);
        }
    }
    let leads = u32::try_from(signals.len()).unwrap_or(u32::MAX);
    let replies = signals
        .iter()
        .fold(0u32, |total, s| total.saturating_add(s.reply_count));
    let pain_points = report
        .clusters
        .iter()
        .take(MAX_PAIN_POINTS)
        .map(|c| c.name.clone())
        .collect();

    MetricsRow::new(
        generated_at.date_naive(),
        &queries.join("; "),
        leads,
        replies,
        revenue,
        pain_points,
    )
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
