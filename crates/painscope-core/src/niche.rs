use std::fmt;

use serde::{Deserialize, Serialize};

/// Scores at or above this are labelled [`OpportunityLabel::High`].
pub const HIGH_OPPORTUNITY_THRESHOLD: f64 = 7.0;

/// Scores at or above this (and below the high threshold) are
/// [`OpportunityLabel::Moderate`]; anything lower is crowded.
pub const MODERATE_OPPORTUNITY_THRESHOLD: f64 = 4.0;

/// Fixed band label derived from an opportunity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpportunityLabel {
    High,
    Moderate,
    Crowded,
}

impl OpportunityLabel {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_OPPORTUNITY_THRESHOLD {
            OpportunityLabel::High
        } else if score >= MODERATE_OPPORTUNITY_THRESHOLD {
            OpportunityLabel::Moderate
        } else {
            OpportunityLabel::Crowded
        }
    }
}

impl fmt::Display for OpportunityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpportunityLabel::High => write!(f, "High"),
            OpportunityLabel::Moderate => write!(f, "Moderate"),
            OpportunityLabel::Crowded => write!(f, "Crowded"),
        }
    }
}

/// Saturation assessment for one candidate niche query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NicheScore {
    pub query: String,
    pub competitor_count: u32,
    /// Up to five competitor domains, in search-result order.
    pub top_domains: Vec<String>,
    /// In `[0.0, 10.0]`.
    pub opportunity_score: f64,
    /// Always `OpportunityLabel::from_score(opportunity_score)`.
    pub label: OpportunityLabel,
}

impl NicheScore {
    /// Maximum number of domains retained in `top_domains`.
    pub const MAX_TOP_DOMAINS: usize = 5;

    /// Build a score, clamping it to `[0.0, 10.0]`, truncating
    /// `top_domains` and deriving the label.
    #[must_use]
    pub fn new(
        query: &str,
        competitor_count: u32,
        mut top_domains: Vec<String>,
        opportunity_score: f64,
    ) -> Self {
        top_domains.truncate(Self::MAX_TOP_DOMAINS);
        let opportunity_score = opportunity_score.clamp(0.0, 10.0);
        Self {
            query: query.to_string(),
            competitor_count,
            top_domains,
            opportunity_score,
            label: OpportunityLabel::from_score(opportunity_score),
        }
    }
}
