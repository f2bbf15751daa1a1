//! Pooled extraction with a degraded fallback path.

use std::sync::Arc;

use painscope_core::{RunWarning, Signal, ThemeCluster};

use crate::error::ExtractError;
use crate::heuristic::HeuristicSummarizer;
use crate::summarizer::Summarizer;

/// Clusters produced for one run and the warnings raised getting them.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub clusters: Vec<ThemeCluster>,
    pub warnings: Vec<RunWarning>,
    /// Name of the backend whose clusters were kept.
    pub backend: String,
}

/// Runs a primary [`Summarizer`] and falls back to a secondary one when the
/// primary fails.
pub struct ThemeExtractor {
    primary: Arc<dyn Summarizer>,
    fallback: Option<Arc<dyn Summarizer>>,
}

impl ThemeExtractor {
    #[must_use]
    pub fn new(primary: Arc<dyn Summarizer>, fallback: Option<Arc<dyn Summarizer>>) -> Self {
        Self { primary, fallback }
    }

    /// The deterministic heuristic summarizer with no fallback.
    #[must_use]
    pub fn heuristic() -> Self {
        Self::new(Arc::new(HeuristicSummarizer::new()), None)
    }

    /// `primary`, backed by the heuristic summarizer.
    #[must_use]
    pub fn with_heuristic_fallback(primary: Arc<dyn Summarizer>) -> Self {
        Self::new(primary, Some(Arc::new(HeuristicSummarizer::new())))
    }

    /// Extract theme clusters from the pooled `signals` of one run.
    ///
    /// An empty batch returns no clusters without calling any backend. When
    /// the primary backend fails and a fallback is configured, the failure
    /// becomes a [`RunWarning::ExtractionUnavailable`] and the fallback's
    /// clusters are returned.
    ///
    /// # Errors
    ///
    /// Returns the primary's error when no fallback is configured, or the
    /// fallback's error when both fail.
    pub async fn extract(&self, signals: &[Signal]) -> Result<Extraction, ExtractError> {
        if signals.is_empty() {
            tracing::info!("no signals collected, skipping theme extraction");
            return Ok(Extraction {
                backend: self.primary.name().to_string(),
                ..Extraction::default()
            });
        }

        let texts: Vec<String> = signals.iter().map(|s| s.raw_text.clone()).collect();

        let primary_err = match self.primary.summarize(&texts).await {
            Ok(clusters) => {
                return Ok(finish(self.primary.name(), clusters, Vec::new()));
            }
            Err(e) => e,
        };

        let Some(fallback) = &self.fallback else {
            tracing::error!(
                backend = self.primary.name(),
                error = %primary_err,
                "theme extraction failed with no fallback configured"
            );
            return Err(primary_err);
        };

        tracing::warn!(
            backend = self.primary.name(),
            fallback = fallback.name(),
            error = %primary_err,
            "summarizer unavailable, falling back"
        );
        let warning = RunWarning::ExtractionUnavailable {
            backend: self.primary.name().to_string(),
            reason: primary_err.to_string(),
        };

        match fallback.summarize(&texts).await {
            Ok(clusters) => Ok(finish(fallback.name(), clusters, vec![warning])),
            Err(e) => {
                tracing::error!(
                    backend = fallback.name(),
                    error = %e,
                    "fallback summarizer also failed"
                );
                Err(e)
            }
        }
    }
}

fn finish(backend: &str, clusters: Vec<ThemeCluster>, warnings: Vec<RunWarning>) -> Extraction {
    let clusters: Vec<ThemeCluster> = clusters
        .into_iter()
        .filter(|c| c.validate().is_ok())
        .collect();
    tracing::info!(backend, clusters = clusters.len(), "theme extraction finished");
    Extraction {
        clusters,
        warnings,
        backend: backend.to_string(),
    }
}
