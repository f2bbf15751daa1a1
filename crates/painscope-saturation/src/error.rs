use painscope_sources::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("search lookup failed for \"{query}\": {source}")]
    Search {
        query: String,
        #[source]
        source: SourceError,
    },

    #[error("search lookup for \"{query}\" did not finish within {timeout_secs}s")]
    Timeout { query: String, timeout_secs: u64 },

    #[error("niche query must not be blank")]
    BlankQuery,
}
