use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Inclusive time window a collection run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Build a window, rejecting `start > end`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidWindow`] when the bounds are inverted.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidWindow {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    /// The `days`-long window ending at `end`.
    #[must_use]
    pub fn last_days(end: DateTime<Utc>, days: u32) -> Self {
        Self {
            start: end - Duration::days(i64::from(days)),
            end,
        }
    }

    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }

    /// Whole days covered, rounded up. A zero-length window counts as one day.
    #[must_use]
    pub fn days(&self) -> i64 {
        let span = self.end - self.start;
        let days = span.num_days();
        if span > Duration::days(days) || days == 0 {
            days + 1
        } else {
            days
        }
    }
}

/// One configured (source, query) pair to collect from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    #[serde(rename = "source")]
    pub source_id: String,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

impl SourceSpec {
    #[must_use]
    pub fn new(source_id: &str, query: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            query: query.to_string(),
            max_results: None,
        }
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// One observed data point (post, comment, search hit) before interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub source_id: String,
    pub captured_at: DateTime<Utc>,
    pub query: String,
    pub raw_text: String,
    /// Canonical link back to the post or page, when the source exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Number of replies/comments observed on the item. Zero for search hits.
    #[serde(default)]
    pub reply_count: u32,
}

impl Signal {
    /// Build a signal, trimming the text and rejecting empty content.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptySignalText`] when `raw_text` is blank.
    pub fn new(
        source_id: &str,
        captured_at: DateTime<Utc>,
        query: &str,
        raw_text: &str,
    ) -> Result<Self, CoreError> {
        let raw_text = raw_text.trim();
        if raw_text.is_empty() {
            return Err(CoreError::EmptySignalText {
                source_id: source_id.to_string(),
            });
        }
        Ok(Self {
            source_id: source_id.to_string(),
            captured_at,
            query: query.to_string(),
            raw_text: raw_text.to_string(),
            url: None,
            reply_count: 0,
        })
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_reply_count(mut self, reply_count: u32) -> Self {
        self.reply_count = reply_count;
        self
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        let err = DateRange::new(ts(10), ts(3)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidWindow { .. }));
    }

    #[test]
    fn date_range_accepts_equal_bounds() {
        let range = DateRange::new(ts(3), ts(3)).unwrap();
        assert!(range.contains(ts(3)));
        assert_eq!(range.days(), 1);
    }

    #[test]
    fn last_days_spans_requested_days() {
        let range = DateRange::last_days(ts(10), 7);
        assert_eq!(range.start, ts(3));
        assert_eq!(range.days(), 7);
        assert!(range.contains(ts(5)));
        assert!(!range.contains(ts(2)));
        assert!(!range.contains(ts(11)));
    }

    #[test]
    fn signal_rejects_blank_text() {
        let err = Signal::new("reddit", ts(1), "crm", "   \n ").unwrap_err();
        assert_eq!(
            err,
            CoreError::EmptySignalText {
                source_id: "reddit".to_string()
            }
        );
    }

    #[test]
    fn signal_trims_text() {
        let signal = Signal::new("reddit", ts(1), "crm", "  invoicing is painful ").unwrap();
        assert_eq!(signal.raw_text, "invoicing is painful");
        assert!(signal.url.is_none());
        assert_eq!(signal.reply_count, 0);
    }

    #[test]
    fn source_spec_deserializes_source_key() {
        let spec: SourceSpec =
            serde_json::from_str(r#"{"source":"reddit","query":"need a tool","max_results":25}"#)
                .unwrap();
        assert_eq!(spec, SourceSpec::new("reddit", "need a tool").with_max_results(25));
    }
}
