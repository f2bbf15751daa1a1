use painscope_metrics::LogError;
use painscope_report::ReportError;
use painscope_sources::SourceError;
use painscope_themes::ExtractError;
use thiserror::Error;

/// Failures that abort a run. Everything else ends up as a
/// [`RunWarning`](painscope_core::RunWarning) on the outcome.
#[derive(Debug, Error)]
pub(crate) enum RunError {
    #[error("invalid run input: {0}")]
    InvalidInput(#[from] SourceError),

    #[error("theme extraction failed and no fallback succeeded: {0}")]
    ExtractionFailed(#[from] ExtractError),

    #[error("report could not be written: {0}")]
    ReportWriteFailed(#[from] ReportError),

    #[error("run not recorded: {0}")]
    PrimaryLogWriteFailed(#[from] LogError),
}
