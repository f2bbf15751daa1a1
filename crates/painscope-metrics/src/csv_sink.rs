//! Local CSV file: the primary, append-only system of record.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::SinkError;
use crate::row::{MetricsRow, COLUMNS};
use crate::sink::MetricsSink;

pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// Encode `row` (and the header line when `with_header`) as CSV bytes.
fn encode(row: &MetricsRow, with_header: bool) -> Result<Vec<u8>, SinkError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    if with_header {
        writer.write_record(COLUMNS)?;
    }
    writer.write_record(row.to_record())?;
    writer
        .into_inner()
        .map_err(|e| SinkError::Csv(csv::Error::from(e.into_error())))
}

#[async_trait]
impl MetricsSink for CsvSink {
    fn name(&self) -> &str {
        "csv"
    }

    async fn append(&self, row: &MetricsRow) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        let is_empty = file
            .metadata()
            .await
            .map_err(|e| self.io_error(e))?
            .len()
            == 0;

        // One write per row keeps the append atomic at the OS level.
        let bytes = encode(row, is_empty)?;
        file.write_all(&bytes).await.map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;
        file.sync_data().await.map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), date = %row.date, "metrics row appended");
        Ok(())
    }
}

/// Read every row from a metrics CSV written by [`CsvSink`].
///
/// A missing file reads as no rows.
///
/// # Errors
///
/// Returns [`SinkError::Io`] when the file cannot be read and
/// [`SinkError::MalformedRow`] for a row that does not parse.
pub async fn read_rows(path: &Path) -> Result<Vec<MetricsRow>, SinkError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(SinkError::Io {
                path: path.display().to_string(),
                source,
            })
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes.as_slice());
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let cells: Vec<&str> = record.iter().collect();
        let row = MetricsRow::from_record(&cells).map_err(|reason| SinkError::MalformedRow {
            path: path.display().to_string(),
            line,
            reason,
        })?;
        rows.push(row);
    }
    Ok(rows)
}
