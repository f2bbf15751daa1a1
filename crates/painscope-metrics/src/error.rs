use thiserror::Error;

/// Failure of a single sink write.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {sink}")]
    UnexpectedStatus { sink: String, status: u16 },

    #[error("{sink} did not finish within {timeout_secs}s")]
    Timeout { sink: String, timeout_secs: u64 },

    #[error("malformed metrics row {line} in {path}: {reason}")]
    MalformedRow {
        path: String,
        line: u64,
        reason: String,
    },
}

/// Failure of [`MetricsLogger::append`](crate::MetricsLogger::append).
///
/// Only the primary sink can fail an append; mirror failures are warnings.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("primary metrics log '{sink}' write failed: {source}")]
    PrimaryLogWriteFailed {
        sink: String,
        #[source]
        source: SinkError,
    },
}
