use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed column order shared by every sink.
pub const COLUMNS: [&str; 8] = [
    "date",
    "query",
    "leads",
    "replies",
    "revenue",
    "pain_point_1",
    "pain_point_2",
    "pain_point_3",
];

pub const MAX_PAIN_POINTS: usize = 3;

/// One append-only audit record per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsRow {
    pub date: NaiveDate,
    pub query: String,
    pub leads: u32,
    pub replies: u32,
    pub revenue: Decimal,
    /// At most three entries.
    pub top_pain_points: Vec<String>,
}

impl MetricsRow {
    /// Build a row, keeping only the first three pain points.
    #[must_use]
    pub fn new(
        date: NaiveDate,
        query: &str,
        leads: u32,
        replies: u32,
        revenue: Decimal,
        mut top_pain_points: Vec<String>,
    ) -> Self {
        top_pain_points.truncate(MAX_PAIN_POINTS);
        Self {
            date,
            query: query.to_string(),
            leads,
            replies,
            revenue,
            top_pain_points,
        }
    }

    /// The row as eight cells in [`COLUMNS`] order; missing pain points are empty.
    #[must_use]
    pub fn to_record(&self) -> [String; 8] {
        let pain_point = |i: usize| self.top_pain_points.get(i).cloned().unwrap_or_default();
        [
            self.date.format("%Y-%m-%d").to_string(),
            self.query.clone(),
            self.leads.to_string(),
            self.replies.to_string(),
            self.revenue.to_string(),
            pain_point(0),
            pain_point(1),
            pain_point(2),
        ]
    }

    /// Parse eight cells in [`COLUMNS`] order.
    ///
    /// # Errors
    ///
    /// Returns a description of the first cell that fails to parse.
    pub fn from_record<S: AsRef<str>>(cells: &[S]) -> Result<Self, String> {
        if cells.len() != COLUMNS.len() {
            return Err(format!("expected {} columns, found {}", COLUMNS.len(), cells.len()));
        }
        let cell = |i: usize| cells[i].as_ref().trim();

        let date = NaiveDate::parse_from_str(cell(0), "%Y-%m-%d")
            .map_err(|e| format!("date '{}': {e}", cell(0)))?;
        let leads = cell(2)
            .parse::<u32>()
            .map_err(|e| format!("leads '{}': {e}", cell(2)))?;
        let replies = cell(3)
            .parse::<u32>()
            .map_err(|e| format!("replies '{}': {e}", cell(3)))?;
        let revenue =
            Decimal::from_str(cell(4)).map_err(|e| format!("revenue '{}': {e}", cell(4)))?;
        let top_pain_points = (5..8)
            .map(cell)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            date,
            query: cells[1].as_ref().to_string(),
            leads,
            replies,
            revenue,
            top_pain_points,
        })
    }
}
