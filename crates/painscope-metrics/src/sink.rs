use async_trait::async_trait;

use crate::error::SinkError;
use crate::row::MetricsRow;

/// A destination metrics rows are appended to.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Sink name used in logs and warnings.
    fn name(&self) -> &str;

    /// Append one row. Previously written rows must never be modified.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the row could not be durably appended.
    async fn append(&self, row: &MetricsRow) -> Result<(), SinkError>;
}
