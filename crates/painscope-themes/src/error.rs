use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("summarizer '{backend}' unavailable: {reason}")]
    Unavailable { backend: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("summarizer '{backend}' did not respond within {timeout_secs}s")]
    Timeout { backend: String, timeout_secs: u64 },

    #[error("summarizer '{backend}' returned an unusable response: {reason}")]
    InvalidResponse { backend: String, reason: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
