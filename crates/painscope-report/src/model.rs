use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use painscope_core::{DateRange, NicheScore, RunWarning, ThemeCluster};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Run facts the renderer needs besides clusters and scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub period: DateRange,
    pub signal_count: usize,
    /// Sources that contributed at least one signal.
    pub sources: Vec<String>,
    pub warnings: Vec<RunWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub signal_count: usize,
    pub sources: Vec<String>,
    pub warnings: Vec<RunWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadMagnet {
    pub title: String,
    pub outline: Vec<String>,
    /// Name of the cluster the suggestion was built from; `None` when the
    /// run produced no clusters.
    pub source_cluster: Option<String>,
}

/// The final artifact of one run.
///
/// Field order mirrors the rendered section order: summary, themes,
/// underserved niches, saturation check, lead magnet, next steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub summary: ReportSummary,
    pub clusters: Vec<ThemeCluster>,
    /// High and Moderate niches, best score first.
    pub underserved_niches: Vec<NicheScore>,
    /// Every scored niche in scoring order.
    pub niche_scores: Vec<NicheScore>,
    pub lead_magnet: LeadMagnet,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

impl ReportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}
