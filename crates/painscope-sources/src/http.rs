//! Shared HTTP plumbing for the source clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::SourceError;

/// Builds the `reqwest::Client` every source client uses.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the client cannot be constructed
/// (e.g. invalid TLS config).
pub fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, SourceError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Sends `request`, maps non-2xx statuses to typed errors, and decodes the
/// JSON body.
///
/// # Errors
///
/// - [`SourceError::RateLimited`] on HTTP 429 (honours `Retry-After`).
/// - [`SourceError::UnexpectedStatus`] on any other non-2xx status.
/// - [`SourceError::Http`] on network failure.
/// - [`SourceError::Deserialize`] when the body does not match `T`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    source_id: &str,
    request: RequestBuilder,
) -> Result<T, SourceError> {
    let response = request.send().await?;
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        return Err(SourceError::RateLimited {
            source_id: source_id.to_string(),
            retry_after_secs,
        });
    }

    if !status.is_success() {
        return Err(SourceError::UnexpectedStatus {
            source_id: source_id.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
        context: format!("{source_id} response"),
        source: e,
    })
}
