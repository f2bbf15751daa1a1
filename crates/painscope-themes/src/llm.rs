//! Summarizer backed by an OpenAI-compatible chat-completions endpoint.
//!
//! Requests run at temperature 0 with a fixed seed and JSON response mode.
//! The reply is validated field by field: clusters with out-of-set enum
//! values or no pain points are dropped, and duplicate names are collapsed.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use painscope_core::ThemeCluster;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::ExtractError;
use crate::summarizer::Summarizer;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const MAX_INPUT_TEXTS: usize = 200;
const MAX_INPUT_CHARS: usize = 500;

const SYSTEM_PROMPT: &str = "You analyse complaints posted by people who run or work in \
businesses. Group the numbered texts into distinct pain-point themes. Only create a theme \
when the texts justify it; never invent filler themes. Reply with a JSON object of the form \
{\"clusters\": [{\"name\": string, \"pain_points\": [string], \"market_size\": \
\"Small\"|\"Medium\"|\"Large\"|\"Massive\", \"urgency\": \"Low\"|\"Medium\"|\"High\"|\"Critical\", \
\"solution_complexity\": \"Simple\"|\"Moderate\"|\"Complex\", \"target_personas\": string, \
\"opportunity_summary\": string}]}.";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClusterEnvelope {
    #[serde(default)]
    clusters: Vec<serde_json::Value>,
}

/// Model-backed summarizer.
pub struct LlmSummarizer {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    seed: u64,
    timeout_secs: u64,
}

impl LlmSummarizer {
    pub const NAME: &'static str = "llm";

    /// Creates a summarizer pointed at the OpenAI API.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, model: &str, seed: u64, timeout_secs: u64) -> Result<Self, ExtractError> {
        Self::with_base_url(api_key, model, seed, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a summarizer with a custom endpoint (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        seed: u64,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ExtractError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("painscope/0.1 (pain-point-research)")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            seed,
            timeout_secs,
        })
    }

    fn request_body(&self, texts: &[String]) -> serde_json::Value {
        let numbered: Vec<String> = texts
            .iter()
            .take(MAX_INPUT_TEXTS)
            .enumerate()
            .map(|(i, text)| {
                let clipped: String = text.chars().take(MAX_INPUT_CHARS).collect();
                format!("{}. {}", i + 1, clipped)
            })
            .collect();

        serde_json::json!({
            "model": self.model,
            "temperature": 0,
            "seed": self.seed,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": numbered.join("\n") }
            ]
        })
    }

    async fn complete(&self, texts: &[String]) -> Result<String, ExtractError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(texts))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ExtractError::Unavailable {
                backend: Self::NAME.to_string(),
                reason: format!("credentials rejected (HTTP {})", status.as_u16()),
            });
        }
        if !status.is_success() {
            return Err(ExtractError::Unavailable {
                backend: Self::NAME.to_string(),
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        let body = response.text().await?;
        let chat: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ExtractError::Deserialize {
                context: "chat completion".to_string(),
                source: e,
            })?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ExtractError::InvalidResponse {
                backend: Self::NAME.to_string(),
                reason: "missing message content".to_string(),
            })
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn summarize(&self, texts: &[String]) -> Result<Vec<ThemeCluster>, ExtractError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let content = tokio::time::timeout(Duration::from_secs(self.timeout_secs), self.complete(texts))
            .await
            .map_err(|_| ExtractError::Timeout {
                backend: Self::NAME.to_string(),
                timeout_secs: self.timeout_secs,
            })??;

        let clusters = parse_clusters(&content)?;
        tracing::debug!(
            model = %self.model,
            texts = texts.len(),
            clusters = clusters.len(),
            "llm summarization finished"
        );
        Ok(clusters)
    }
}

/// Decode and validate the model's JSON reply.
fn parse_clusters(content: &str) -> Result<Vec<ThemeCluster>, ExtractError> {
    let envelope: ClusterEnvelope =
        serde_json::from_str(content).map_err(|e| ExtractError::Deserialize {
            context: "summarizer cluster payload".to_string(),
            source: e,
        })?;

    let mut names = HashSet::new();
    let mut clusters = Vec::new();
    for value in envelope.clusters {
        let mut cluster: ThemeCluster = match serde_json::from_value(value) {
            Ok(cluster) => cluster,
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed cluster from summarizer");
                continue;
            }
        };
        cluster.name = cluster.name.trim().to_string();
        cluster.pain_points = cluster
            .pain_points
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if let Err(e) = cluster.validate() {
            tracing::warn!(error = %e, "dropping invalid cluster from summarizer");
            continue;
        }
        if !names.insert(cluster.name.to_lowercase()) {
            tracing::debug!(name = %cluster.name, "dropping duplicate cluster name");
            continue;
        }
        clusters.push(cluster);
    }
    Ok(clusters)
}
