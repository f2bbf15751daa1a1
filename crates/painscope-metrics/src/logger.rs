//! Two-tier metrics writer: one primary sink that must succeed, any number
//! of best-effort mirrors.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use painscope_core::RunWarning;

use crate::error::{LogError, SinkError};
use crate::row::MetricsRow;
use crate::sink::MetricsSink;

/// Where an append ended up. There are only two states and the second is
/// terminal whatever the mirrors did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogState {
    PrimaryWritten,
    MirrorAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    pub state: LogState,
    /// One [`RunWarning::MirrorWriteFailed`] per failed mirror.
    pub warnings: Vec<RunWarning>,
}

pub struct MetricsLogger {
    primary: Arc<dyn MetricsSink>,
    mirrors: Vec<Arc<dyn MetricsSink>>,
    timeout: Duration,
}

impl MetricsLogger {
    #[must_use]
    pub fn new(primary: Arc<dyn MetricsSink>, timeout: Duration) -> Self {
        Self {
            primary,
            mirrors: Vec::new(),
            timeout,
        }
    }

    #[must_use]
    pub fn with_mirror(mut self, mirror: Arc<dyn MetricsSink>) -> Self {
        self.mirrors.push(mirror);
        self
    }

    /// Append `row` to the primary sink, then to every mirror.
    ///
    /// Mirrors are only attempted after the primary write succeeded, and a
    /// mirror failure never changes the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::PrimaryLogWriteFailed`] when the primary sink
    /// fails or times out.
    pub async fn append(&self, row: &MetricsRow) -> Result<AppendOutcome, LogError> {
        let primary = self.primary.name().to_string();
        with_timeout(&primary, self.timeout, self.primary.append(row))
            .await
            .map_err(|source| {
                tracing::error!(sink = %primary, error = %source, "primary metrics write failed");
                LogError::PrimaryLogWriteFailed {
                    sink: primary.clone(),
                    source,
                }
            })?;
        let mut outcome = AppendOutcome {
            state: LogState::PrimaryWritten,
            warnings: Vec::new(),
        };
        tracing::info!(sink = %primary, date = %row.date, leads = row.leads, "metrics row logged");

        for mirror in &self.mirrors {
            let name = mirror.name().to_string();
            if let Err(e) = with_timeout(&name, self.timeout, mirror.append(row)).await {
                tracing::warn!(sink = %name, error = %e, "metrics mirror write failed");
                outcome.warnings.push(RunWarning::MirrorWriteFailed {
                    sink: name,
                    reason: e.to_string(),
                });
            }
        }
        outcome.state = LogState::MirrorAttempted;
        Ok(outcome)
    }
}

async fn with_timeout(
    sink: &str,
    timeout: Duration,
    write: impl Future<Output = Result<(), SinkError>>,
) -> Result<(), SinkError> {
    tokio::time::timeout(timeout, write)
        .await
        .map_err(|_| SinkError::Timeout {
            sink: sink.to_string(),
            timeout_secs: timeout.as_secs(),
        })?
}
