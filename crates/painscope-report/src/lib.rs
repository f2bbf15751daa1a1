//! Report rendering for painscope.
//!
//! [`render`] is pure: it assembles a [`Report`] from clusters, niche scores
//! and run metadata. Serialization to markdown or JSON and the file write
//! are separate steps.

pub mod error;
pub mod markdown;
pub mod model;
pub mod render;
pub mod writer;

pub use error::ReportError;
pub use model::{LeadMagnet, Report, ReportFormat, ReportMetadata, ReportSummary};
pub use render::render;
pub use writer::{default_output_path, write_report};
