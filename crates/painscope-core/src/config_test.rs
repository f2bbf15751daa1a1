use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(parse_environment("development"), Environment::Development);
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.sources_path.to_str(), Some("./config/sources.yaml"));
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "painscope/0.1 (pain-point-research)");
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert_eq!(cfg.max_concurrent_requests, 4);
    assert_eq!(cfg.summarizer, SummarizerKind::Heuristic);
    assert!(cfg.openai_api_key.is_none());
    assert_eq!(cfg.llm_model, "gpt-4o-mini");
    assert_eq!(cfg.llm_seed, 42);
    assert!(cfg.search_credentials().is_none());
    assert_eq!(cfg.metrics_csv_path.to_str(), Some("./data/metrics.csv"));
    assert!(cfg.sheets_mirror.is_none());
}

#[test]
fn build_app_config_rejects_more_than_two_retries() {
    let mut map = HashMap::new();
    map.insert("PAINSCOPE_MAX_RETRIES", "3");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PAINSCOPE_MAX_RETRIES"),
        "expected InvalidEnvVar(PAINSCOPE_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn build_app_config_accepts_zero_retries() {
    let mut map = HashMap::new();
    map.insert("PAINSCOPE_MAX_RETRIES", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_retries, 0);
}

#[test]
fn build_app_config_rejects_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("PAINSCOPE_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PAINSCOPE_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PAINSCOPE_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_timeout() {
    let mut map = HashMap::new();
    map.insert("PAINSCOPE_REQUEST_TIMEOUT_SECS", "0");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn build_app_config_rejects_zero_llm_timeout() {
    let mut map = HashMap::new();
    map.insert("PAINSCOPE_LLM_TIMEOUT_SECS", "0");
    let err = build_app_config(lookup_from_map(&map)).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidEnvVar { ref var, .. } if var == "PAINSCOPE_LLM_TIMEOUT_SECS"
    ));

    map.insert("PAINSCOPE_LLM_TIMEOUT_SECS", "1");
    assert_eq!(build_app_config(lookup_from_map(&map)).unwrap().llm_timeout_secs, 1);
}

#[test]
fn build_app_config_clamps_concurrency_to_one() {
    let mut map = HashMap::new();
    map.insert("PAINSCOPE_MAX_CONCURRENT_REQUESTS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_concurrent_requests, 1);
}

#[test]
fn llm_summarizer_requires_api_key() {
    let mut map = HashMap::new();
    map.insert("PAINSCOPE_SUMMARIZER", "llm");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "OPENAI_API_KEY"),
        "expected MissingEnvVar(OPENAI_API_KEY), got: {result:?}"
    );

    map.insert("OPENAI_API_KEY", "sk-test");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.summarizer, SummarizerKind::Llm);
    assert_eq!(cfg.openai_api_key.as_deref(), Some("sk-test"));
}

#[test]
fn unknown_summarizer_is_rejected() {
    let mut map = HashMap::new();
    map.insert("PAINSCOPE_SUMMARIZER", "magic");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PAINSCOPE_SUMMARIZER"),
        "expected InvalidEnvVar(PAINSCOPE_SUMMARIZER), got: {result:?}"
    );
}

#[test]
fn search_credentials_require_both_values() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_SEARCH_API_KEY", "key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.search_credentials().is_none());

    map.insert("GOOGLE_SEARCH_CX", "engine");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.search_credentials(), Some(("key", "engine")));
}

#[test]
fn sheets_mirror_enabled_only_with_id_and_token() {
    let mut map = HashMap::new();
    map.insert("PAINSCOPE_SHEETS_SPREADSHEET_ID", "sheet-123");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.sheets_mirror.is_none());

    map.insert("GOOGLE_SHEETS_ACCESS_TOKEN", "ya29.token");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let mirror = cfg.sheets_mirror.expect("mirror should be configured");
    assert_eq!(mirror.spreadsheet_id, "sheet-123");
    assert_eq!(mirror.range, "Metrics!A:H");
    assert_eq!(mirror.base_url, "https://sheets.googleapis.com/v4");
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = HashMap::new();
    map.insert("OPENAI_API_KEY", "sk-secret");
    map.insert("GOOGLE_SEARCH_API_KEY", "search-secret");
    map.insert("PAINSCOPE_SHEETS_SPREADSHEET_ID", "sheet-123");
    map.insert("GOOGLE_SHEETS_ACCESS_TOKEN", "token-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("sk-secret"));
    assert!(!rendered.contains("search-secret"));
    assert!(!rendered.contains("token-secret"));
    assert!(rendered.contains("[redacted]"));
}
