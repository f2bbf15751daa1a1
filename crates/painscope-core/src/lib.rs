//! Shared domain types and configuration for the painscope pipeline.
//!
//! Every pipeline stage (collector, extractor, scorer, renderer, logger)
//! exchanges the types defined here. Nothing in this crate performs I/O
//! beyond reading configuration.

pub mod app_config;
pub mod config;
pub mod error;
pub mod niche;
pub mod signal;
pub mod sources;
pub mod theme;
pub mod warning;

pub use app_config::{AppConfig, Environment, SheetsMirrorConfig, SummarizerKind};
pub use config::{load_app_config, load_app_config_from_env, MAX_SOURCE_RETRIES};
pub use error::{ConfigError, CoreError};
pub use niche::{
    NicheScore, OpportunityLabel, HIGH_OPPORTUNITY_THRESHOLD, MODERATE_OPPORTUNITY_THRESHOLD,
};
pub use signal::{DateRange, Signal, SourceSpec};
pub use sources::{load_sources, parse_sources, SourceKind, SourcesFile};
pub use theme::{MarketSize, SolutionComplexity, ThemeCluster, Urgency};
pub use warning::RunWarning;
