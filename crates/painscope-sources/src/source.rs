//! The capability every signal source exposes to the collector.

use async_trait::async_trait;
use painscope_core::{DateRange, Signal, SourceSpec};

use crate::error::SourceError;

/// Default per-query result cap when a [`SourceSpec`] does not set one.
pub const DEFAULT_MAX_RESULTS: usize = 25;

/// A named place pain-point text can be fetched from.
///
/// Implementations perform exactly one logical fetch per call; retries,
/// timeouts and window filtering are applied by the
/// [`Collector`](crate::Collector).
#[async_trait]
pub trait SignalSource: Send + Sync {
    /// Identifier matched against [`SourceSpec::source_id`].
    fn id(&self) -> &str;

    /// Fetch raw signals for one query.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the upstream call fails or its response
    /// cannot be decoded.
    async fn fetch(&self, spec: &SourceSpec, window: &DateRange)
        -> Result<Vec<Signal>, SourceError>;
}

/// Effective result cap for a spec.
#[must_use]
pub fn max_results(spec: &SourceSpec) -> usize {
    spec.max_results.unwrap_or(DEFAULT_MAX_RESULTS).max(1)
}
