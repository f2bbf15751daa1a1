//! Theme extraction for painscope.
//!
//! Turns the pooled signals of a run into [`ThemeCluster`](painscope_core::ThemeCluster)s
//! through a [`Summarizer`]: either the deterministic [`HeuristicSummarizer`] or the
//! model-backed [`LlmSummarizer`], with the heuristic as fallback.

pub mod error;
pub mod extract;
pub mod heuristic;
pub mod llm;
pub mod summarizer;

mod lexicon;

pub use error::ExtractError;
pub use extract::{Extraction, ThemeExtractor};
pub use heuristic::HeuristicSummarizer;
pub use llm::LlmSummarizer;
pub use summarizer::Summarizer;
