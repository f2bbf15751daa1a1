//! Niche saturation scoring.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use painscope_core::{NicheScore, RunWarning};
use painscope_sources::SearchProvider;

use crate::classify::{domain_of, is_saas_competitor};
use crate::error::ScoreError;

/// Number of ranked search results inspected per query.
pub const RESULTS_INSPECTED: usize = 10;

/// Score lost per recognised competitor.
pub const PENALTY_PER_COMPETITOR: f64 = 1.3;

/// `10.0 - competitor_count * 1.3`, clamped to `[0.0, 10.0]`.
#[must_use]
pub fn opportunity_score(competitor_count: u32) -> f64 {
    (10.0 - f64::from(competitor_count) * PENALTY_PER_COMPETITOR).clamp(0.0, 10.0)
}

/// Scores for the queries that succeeded, plus one warning per query that
/// did not.
#[derive(Debug, Clone, Default)]
pub struct Scoring {
    /// In the order the queries were given.
    pub scores: Vec<NicheScore>,
    pub warnings: Vec<RunWarning>,
}

/// Looks each candidate niche up with a [`SearchProvider`] and counts the
/// competitor domains on the first results page.
pub struct NicheScorer {
    provider: Arc<dyn SearchProvider>,
    timeout: Duration,
    max_concurrent: usize,
}

impl NicheScorer {
    #[must_use]
    pub fn new(provider: Arc<dyn SearchProvider>, timeout: Duration, max_concurrent: usize) -> Self {
        Self {
            provider,
            timeout,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Score a single query with one search lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::Search`] when the lookup fails,
    /// [`ScoreError::Timeout`] when it exceeds the configured timeout and
    /// [`ScoreError::BlankQuery`] for an empty query.
    pub async fn score(&self, query: &str) -> Result<NicheScore, ScoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ScoreError::BlankQuery);
        }

        let results = tokio::time::timeout(
            self.timeout,
            self.provider.search(query, RESULTS_INSPECTED),
        )
        .await
        .map_err(|_| ScoreError::Timeout {
            query: query.to_string(),
            timeout_secs: self.timeout.as_secs(),
        })?
        .map_err(|source| ScoreError::Search {
            query: query.to_string(),
            source,
        })?;

        let mut competitors: Vec<String> = Vec::new();
        for result in results.iter().take(RESULTS_INSPECTED) {
            if !is_saas_competitor(&result.url) {
                continue;
            }
            if let Some(domain) = domain_of(&result.url) {
                if !competitors.contains(&domain) {
                    competitors.push(domain);
                }
            }
        }

        let count = u32::try_from(competitors.len()).unwrap_or(u32::MAX);
        let score = NicheScore::new(query, count, competitors, opportunity_score(count));

        tracing::debug!(
            query,
            provider = self.provider.name(),
            competitors = score.competitor_count,
            score = score.opportunity_score,
            label = %score.label,
            "scored niche"
        );
        Ok(score)
    }

    /// Score every query concurrently, keeping input order.
    ///
    /// A failed query is left out of the scores and recorded as a
    /// [`RunWarning::ScoreUnavailable`].
    pub async fn score_all(&self, queries: &[String]) -> Scoring {
        let outcomes: Vec<(&String, Result<NicheScore, ScoreError>)> = stream::iter(queries)
            .map(|query| async move { (query, self.score(query).await) })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let mut scoring = Scoring::default();
        for (query, outcome) in outcomes {
            match outcome {
                Ok(score) => scoring.scores.push(score),
                Err(e) => {
                    tracing::warn!(query = %query, error = %e, "saturation check unavailable");
                    scoring.warnings.push(RunWarning::ScoreUnavailable {
                        query: query.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            queries = queries.len(),
            scored = scoring.scores.len(),
            "saturation scoring finished"
        );
        scoring
    }
}

#[cfg(test)]
mod tests {
    use painscope_core::OpportunityLabel;

    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn formula_matches_for_zero_through_eight() {
        let expected = [10.0, 8.7, 7.4, 6.1, 4.8, 3.5, 2.2, 0.9, 0.0];
        for (count, want) in (0u32..=8).zip(expected) {
            let got = opportunity_score(count);
            assert!(approx(got, want), "count {count}: got {got}, want {want}");
            assert!(approx(got, (10.0 - f64::from(count) * 1.3).clamp(0.0, 10.0)));
        }
    }

    #[test]
    fn labels_follow_bands() {
        let labels: Vec<OpportunityLabel> = [2u32, 3, 6, 7]
            .into_iter()
            .map(|c| OpportunityLabel::from_score(opportunity_score(c)))
            .collect();
        assert_eq!(
            labels,
            vec![
                OpportunityLabel::High,
                OpportunityLabel::Moderate,
                OpportunityLabel::Crowded,
                OpportunityLabel::Crowded,
            ]
        );
    }

    #[test]
    fn score_never_negative() {
        assert!(approx(opportunity_score(100), 0.0));
        assert!(approx(opportunity_score(u32::MAX), 0.0));
    }
}
