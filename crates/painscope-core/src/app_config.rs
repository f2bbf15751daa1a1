use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which summarization backend the theme extractor starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarizerKind {
    /// Deterministic keyword-frequency clustering, no network.
    Heuristic,
    /// OpenAI-compatible chat completion backend, heuristic fallback on failure.
    Llm,
}

impl std::fmt::Display for SummarizerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummarizerKind::Heuristic => write!(f, "heuristic"),
            SummarizerKind::Llm => write!(f, "llm"),
        }
    }
}

/// Credentials and target for the Google Sheets metrics mirror.
#[derive(Clone)]
pub struct SheetsMirrorConfig {
    pub base_url: String,
    pub spreadsheet_id: String,
    pub range: String,
    pub access_token: String,
}

impl std::fmt::Debug for SheetsMirrorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsMirrorConfig")
            .field("base_url", &self.base_url)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .field("access_token", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub sources_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub max_concurrent_requests: usize,
    pub summarizer: SummarizerKind,
    pub openai_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_seed: u64,
    pub llm_timeout_secs: u64,
    pub google_search_api_key: Option<String>,
    pub google_search_cx: Option<String>,
    pub search_base_url: String,
    pub reddit_base_url: String,
    pub hn_base_url: String,
    pub metrics_csv_path: PathBuf,
    pub signal_cache_path: PathBuf,
    pub sheets_mirror: Option<SheetsMirrorConfig>,
}

impl AppConfig {
    /// Both halves of the Google search credentials, when configured.
    #[must_use]
    pub fn search_credentials(&self) -> Option<(&str, &str)> {
        match (&self.google_search_api_key, &self.google_search_cx) {
            (Some(key), Some(cx)) => Some((key.as_str(), cx.as_str())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("sources_path", &self.sources_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("summarizer", &self.summarizer)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("llm_seed", &self.llm_seed)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field(
                "google_search_api_key",
                &self.google_search_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("google_search_cx", &self.google_search_cx)
            .field("search_base_url", &self.search_base_url)
            .field("reddit_base_url", &self.reddit_base_url)
            .field("hn_base_url", &self.hn_base_url)
            .field("metrics_csv_path", &self.metrics_csv_path)
            .field("signal_cache_path", &self.signal_cache_path)
            .field("sheets_mirror", &self.sheets_mirror)
            .finish()
    }
}
