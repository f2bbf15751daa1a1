use async_trait::async_trait;
use painscope_core::ThemeCluster;

use crate::error::ExtractError;

/// Turns a pooled batch of raw texts into theme clusters.
///
/// Implementations must be deterministic for identical input (and, for
/// model-backed variants, an identical model and seed). They return only
/// the clusters the data justifies; an empty batch yields no clusters.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Backend name used in logs and warnings.
    fn name(&self) -> &str;

    /// # Errors
    ///
    /// Returns [`ExtractError`] when the backend cannot be reached or its
    /// output cannot be interpreted.
    async fn summarize(&self, texts: &[String]) -> Result<Vec<ThemeCluster>, ExtractError>;
}
