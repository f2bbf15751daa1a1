use crate::app_config::{AppConfig, Environment, SheetsMirrorConfig, SummarizerKind};
use crate::ConfigError;

/// The collector never retries a source more than this many times.
pub const MAX_SOURCE_RETRIES: u32 = 2;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("PAINSCOPE_ENV", "development"));
    let log_level = or_default("PAINSCOPE_LOG_LEVEL", "info");
    let sources_path = PathBuf::from(or_default(
        "PAINSCOPE_SOURCES_PATH",
        "./config/sources.yaml",
    ));

    let request_timeout_secs = require_nonzero_timeout(
        "PAINSCOPE_REQUEST_TIMEOUT_SECS",
        parse_u64("PAINSCOPE_REQUEST_TIMEOUT_SECS", "30")?,
    )?;
    let user_agent = or_default(
        "PAINSCOPE_USER_AGENT",
        "painscope/0.1 (pain-point-research)",
    );
    let max_retries = parse_u32("PAINSCOPE_MAX_RETRIES", "2")?;
    if max_retries > MAX_SOURCE_RETRIES {
        return Err(ConfigError::InvalidEnvVar {
            var: "PAINSCOPE_MAX_RETRIES".to_string(),
            reason: format!("at most {MAX_SOURCE_RETRIES} retries are allowed, got {max_retries}"),
        });
    }
    let retry_backoff_base_ms = parse_u64("PAINSCOPE_RETRY_BACKOFF_BASE_MS", "500")?;
    let max_concurrent_requests = parse_usize("PAINSCOPE_MAX_CONCURRENT_REQUESTS", "4")?.max(1);

    let summarizer = parse_summarizer(&or_default("PAINSCOPE_SUMMARIZER", "heuristic"))?;
    let openai_api_key = optional("OPENAI_API_KEY");
    if summarizer == SummarizerKind::Llm && openai_api_key.is_none() {
        return Err(ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()));
    }
    let llm_base_url = or_default("PAINSCOPE_LLM_BASE_URL", "https://api.openai.com/v1");
    let llm_model = or_default("PAINSCOPE_LLM_MODEL", "gpt-4o-mini");
    let llm_seed = parse_u64("PAINSCOPE_LLM_SEED", "42")?;
    let llm_timeout_secs = require_nonzero_timeout(
        "PAINSCOPE_LLM_TIMEOUT_SECS",
        parse_u64("PAINSCOPE_LLM_TIMEOUT_SECS", "90")?,
    )?;

    let google_search_api_key = optional("GOOGLE_SEARCH_API_KEY");
    let google_search_cx = optional("GOOGLE_SEARCH_CX");
    let search_base_url = or_default(
        "PAINSCOPE_SEARCH_BASE_URL",
        "https://www.googleapis.com/customsearch/v1",
    );
    let reddit_base_url = or_default("PAINSCOPE_REDDIT_BASE_URL", "https://www.reddit.com");
    let hn_base_url = or_default("PAINSCOPE_HN_BASE_URL", "https://hn.algolia.com/api/v1");

    let metrics_csv_path = PathBuf::from(or_default(
        "PAINSCOPE_METRICS_CSV_PATH",
        "./data/metrics.csv",
    ));
    let signal_cache_path = PathBuf::from(or_default(
        "PAINSCOPE_SIGNAL_CACHE_PATH",
        "./data/signals.json",
    ));

    let sheets_mirror = match (
        optional("PAINSCOPE_SHEETS_SPREADSHEET_ID"),
        optional("GOOGLE_SHEETS_ACCESS_TOKEN"),
    ) {
        (Some(spreadsheet_id), Some(access_token)) => Some(SheetsMirrorConfig {
            base_url: or_default(
                "PAINSCOPE_SHEETS_BASE_URL",
                "https://sheets.googleapis.com/v4",
            ),
            spreadsheet_id,
            range: or_default("PAINSCOPE_SHEETS_RANGE", "Metrics!A:H"),
            access_token,
        }),
        _ => None,
    };

    Ok(AppConfig {
        env,
        log_level,
        sources_path,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        max_concurrent_requests,
        summarizer,
        openai_api_key,
        llm_base_url,
        llm_model,
        llm_seed,
        llm_timeout_secs,
        google_search_api_key,
        google_search_cx,
        search_base_url,
        reddit_base_url,
        hn_base_url,
        metrics_csv_path,
        signal_cache_path,
        sheets_mirror,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_summarizer(s: &str) -> Result<SummarizerKind, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "heuristic" => Ok(SummarizerKind::Heuristic),
        "llm" => Ok(SummarizerKind::Llm),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PAINSCOPE_SUMMARIZER".to_string(),
            reason: format!("expected 'heuristic' or 'llm', got '{other}'"),
        }),
    }
}

fn require_nonzero_timeout(var: &str, secs: u64) -> Result<u64, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }
    Ok(secs)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
