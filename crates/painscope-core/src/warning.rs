use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A non-fatal failure recorded during a run.
///
/// Warnings travel alongside the finished report so callers can tell a
/// degraded run from a clean one.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunWarning {
    #[error("source '{source_id}' unavailable for query \"{query}\": {reason}")]
    SourceUnavailable {
        source_id: String,
        query: String,
        reason: String,
    },

    #[error("summarizer '{backend}' unavailable: {reason}")]
    ExtractionUnavailable { backend: String, reason: String },

    #[error("saturation check unavailable for \"{query}\": {reason}")]
    ScoreUnavailable { query: String, reason: String },

    #[error("mirror sink '{sink}' write failed: {reason}")]
    MirrorWriteFailed { sink: String, reason: String },
}

impl RunWarning {
    /// Short machine-friendly tag for the warning kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RunWarning::SourceUnavailable { .. } => "source_unavailable",
            RunWarning::ExtractionUnavailable { .. } => "extraction_unavailable",
            RunWarning::ScoreUnavailable { .. } => "score_unavailable",
            RunWarning::MirrorWriteFailed { .. } => "mirror_write_failed",
        }
    }
}
