use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Qualitative size of the market a theme addresses. Ordered smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum MarketSize {
    Small,
    Medium,
    Large,
    Massive,
}

/// How pressing the pain is for the people reporting it. Ordered lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum SolutionComplexity {
    Simple,
    Moderate,
    Complex,
}

impl fmt::Display for MarketSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketSize::Small => write!(f, "Small"),
            MarketSize::Medium => write!(f, "Medium"),
            MarketSize::Large => write!(f, "Large"),
            MarketSize::Massive => write!(f, "Massive"),
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Urgency::Low => write!(f, "Low"),
            Urgency::Medium => write!(f, "Medium"),
            Urgency::High => write!(f, "High"),
            Urgency::Critical => write!(f, "Critical"),
        }
    }
}

impl fmt::Display for SolutionComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionComplexity::Simple => write!(f, "Simple"),
            SolutionComplexity::Moderate => write!(f, "Moderate"),
            SolutionComplexity::Complex => write!(f, "Complex"),
        }
    }
}

// Parsing is case-insensitive: summarization backends are inconsistent
// about capitalization.
impl FromStr for MarketSize {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(MarketSize::Small),
            "medium" => Ok(MarketSize::Medium),
            "large" => Ok(MarketSize::Large),
            "massive" => Ok(MarketSize::Massive),
            _ => Err(CoreError::UnknownVariant {
                kind: "market_size",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for Urgency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            "critical" => Ok(Urgency::Critical),
            _ => Err(CoreError::UnknownVariant {
                kind: "urgency",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for SolutionComplexity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(SolutionComplexity::Simple),
            "moderate" => Ok(SolutionComplexity::Moderate),
            "complex" => Ok(SolutionComplexity::Complex),
            _ => Err(CoreError::UnknownVariant {
                kind: "solution_complexity",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for MarketSize {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for Urgency {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for SolutionComplexity {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A named group of related pain points with qualitative sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeCluster {
    pub name: String,
    pub pain_points: Vec<String>,
    pub market_size: MarketSize,
    pub urgency: Urgency,
    pub solution_complexity: SolutionComplexity,
    pub target_personas: String,
    pub opportunity_summary: String,
}

impl ThemeCluster {
    /// Check the cluster invariants: a non-blank name and at least one
    /// non-blank pain point.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyPainPoints`] when the cluster carries no
    /// usable pain point.
    pub fn validate(&self) -> Result<(), CoreError> {
        let has_pain_point = self.pain_points.iter().any(|p| !p.trim().is_empty());
        if self.name.trim().is_empty() || !has_pain_point {
            return Err(CoreError::EmptyPainPoints {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(pain_points: Vec<&str>) -> ThemeCluster {
        ThemeCluster {
            name: "Invoicing".to_string(),
            pain_points: pain_points.into_iter().map(str::to_string).collect(),
            market_size: MarketSize::Medium,
            urgency: Urgency::High,
            solution_complexity: SolutionComplexity::Moderate,
            target_personas: "freelancers".to_string(),
            opportunity_summary: "chasing late invoices".to_string(),
        }
    }

    #[test]
    fn urgency_orders_low_to_critical() {
        assert!(Urgency::Critical > Urgency::High);
        assert!(Urgency::High > Urgency::Medium);
        assert!(Urgency::Medium > Urgency::Low);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("MASSIVE".parse::<MarketSize>().unwrap(), MarketSize::Massive);
        assert_eq!(" critical ".parse::<Urgency>().unwrap(), Urgency::Critical);
        assert_eq!(
            "simple".parse::<SolutionComplexity>().unwrap(),
            SolutionComplexity::Simple
        );
    }

    #[test]
    fn rejects_values_outside_declared_set() {
        let err = "huge".parse::<MarketSize>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownVariant { kind: "market_size", .. }));
    }

    #[test]
    fn deserializes_enum_fields_from_lowercase() {
        let json = r#"{
            "name": "Scheduling",
            "pain_points": ["double bookings"],
            "market_size": "large",
            "urgency": "Medium",
            "solution_complexity": "complex",
            "target_personas": "clinics",
            "opportunity_summary": "calendar sync"
        }"#;
        let cluster: ThemeCluster = serde_json::from_str(json).unwrap();
        assert_eq!(cluster.market_size, MarketSize::Large);
        assert_eq!(cluster.urgency, Urgency::Medium);
        assert_eq!(cluster.solution_complexity, SolutionComplexity::Complex);
    }

    #[test]
    fn validate_rejects_empty_pain_points() {
        assert!(cluster(vec![]).validate().is_err());
        assert!(cluster(vec!["  "]).validate().is_err());
        assert!(cluster(vec!["late payments"]).validate().is_ok());
    }
}
