use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {source_id} (retry after {retry_after_secs}s)")]
    RateLimited {
        source_id: String,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {source_id}")]
    UnexpectedStatus { source_id: String, status: u16 },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{source_id} did not respond within {timeout_secs}s")]
    Timeout { source_id: String, timeout_secs: u64 },

    #[error("source '{0}' is not registered")]
    UnknownSource(String),

    #[error("source '{source_id}' is not configured: {reason}")]
    NotConfigured { source_id: String, reason: String },

    #[error("invalid collection input: {0}")]
    InvalidInput(String),

    #[error("signal cache I/O error at {path}: {source}")]
    CacheIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    /// Whether a retry after back-off could plausibly succeed.
    ///
    /// Timeouts, connection failures, 429 and 5xx responses are transient;
    /// client errors, parse failures and configuration problems are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            SourceError::RateLimited { .. } | SourceError::Timeout { .. } => true,
            SourceError::UnexpectedStatus { status, .. } => *status >= 500,
            SourceError::Deserialize { .. }
            | SourceError::UnknownSource(_)
            | SourceError::NotConfigured { .. }
            | SourceError::InvalidInput(_)
            | SourceError::CacheIo { .. } => false,
        }
    }
}
