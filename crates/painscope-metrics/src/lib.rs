//! Append-only run metrics for painscope.
//!
//! Every run appends one [`MetricsRow`] to a local CSV file (the system of
//! record) and, optionally, mirrors it to a hosted spreadsheet.

pub mod csv_sink;
pub mod error;
pub mod logger;
pub mod row;
pub mod sheets;
pub mod sink;

pub use csv_sink::{read_rows, CsvSink};
pub use error::{LogError, SinkError};
pub use logger::{AppendOutcome, LogState, MetricsLogger};
pub use row::{MetricsRow, COLUMNS, MAX_PAIN_POINTS};
pub use sheets::SheetsMirrorSink;
pub use sink::MetricsSink;
