//! Google Sheets `values:append` mirror.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::SinkError;
use crate::row::MetricsRow;
use crate::sink::MetricsSink;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Best-effort copy of each metrics row into a hosted spreadsheet.
pub struct SheetsMirrorSink {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    range: String,
    access_token: String,
}

impl SheetsMirrorSink {
    /// Creates a sink pointed at the production Sheets API.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Http`] if the HTTP client cannot be built.
    pub fn new(
        spreadsheet_id: &str,
        range: &str,
        access_token: &str,
        timeout_secs: u64,
    ) -> Result<Self, SinkError> {
        Self::with_base_url(spreadsheet_id, range, access_token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a sink with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        spreadsheet_id: &str,
        range: &str,
        access_token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("painscope/0.1 (pain-point-research)")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_owned(),
            range: range.to_owned(),
            access_token: access_token.to_owned(),
        })
    }
}

#[async_trait]
impl MetricsSink for SheetsMirrorSink {
    fn name(&self) -> &str {
        "google_sheets"
    }

    async fn append(&self, row: &MetricsRow) -> Result<(), SinkError> {
        let url = format!(
            "{}/spreadsheets/{}/values/{}:append",
            self.base_url, self.spreadsheet_id, self.range
        );
        let body = serde_json::json!({ "values": [row.to_record()] });

        let response = self
            .client
            .post(url)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::UnexpectedStatus {
                sink: self.name().to_string(),
                status: status.as_u16(),
            });
        }
        tracing::debug!(spreadsheet = %self.spreadsheet_id, "metrics row mirrored");
        Ok(())
    }
}
