//! Niche saturation scoring for painscope.
//!
//! Each candidate niche query is looked up once on a search provider; the
//! recognisable SaaS competitor domains among the top results drive a fixed
//! opportunity score (see [`opportunity_score`]).

pub mod classify;
pub mod error;
pub mod scorer;

pub use classify::{domain_of, is_saas_competitor};
pub use error::ScoreError;
pub use scorer::{opportunity_score, NicheScorer, Scoring, PENALTY_PER_COMPETITOR, RESULTS_INSPECTED};
