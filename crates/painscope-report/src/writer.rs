use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;

use crate::error::ReportError;
use crate::model::{Report, ReportFormat};

/// `reports/pain-points-<period end date>.<ext>` under `dir`.
#[must_use]
pub fn default_output_path(dir: &Path, period_end: DateTime<Utc>, format: ReportFormat) -> PathBuf {
    dir.join(format!(
        "pain-points-{}.{}",
        period_end.format("%Y-%m-%d"),
        format.extension()
    ))
}

/// Highest numeric suffix tried before giving up on a free file name.
const MAX_NAME_SUFFIX: u32 = 999;

/// Serialize `report` in `format` and write it to a new file at `path`,
/// creating parent directories as needed.
///
/// An existing report is never overwritten: if `path` is taken the report
/// goes to `<stem>-1.<ext>`, `<stem>-2.<ext>` and so on. Returns the path
/// actually written.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file cannot be written and
/// [`ReportError::Serialize`] if JSON serialization fails.
pub async fn write_report(
    report: &Report,
    path: &Path,
    format: ReportFormat,
) -> Result<PathBuf, ReportError> {
    let body = match format {
        ReportFormat::Markdown => report.to_markdown(),
        ReportFormat::Json => report.to_json()?,
    };

    let io_err = |path: &Path, source: std::io::Error| ReportError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_err(parent, e))?;
    }

    let mut suffix = 0;
    let (written, mut file) = loop {
        let candidate = numbered_path(path, suffix);
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(file) => break (candidate, file),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && suffix < MAX_NAME_SUFFIX => {
                tracing::debug!(path = %candidate.display(), "report file exists, trying next name");
                suffix += 1;
            }
            Err(e) => return Err(io_err(&candidate, e)),
        }
    };

    file.write_all(body.as_bytes())
        .await
        .map_err(|e| io_err(&written, e))?;
    file.flush().await.map_err(|e| io_err(&written, e))?;

    tracing::info!(path = %written.display(), %format, "report written");
    Ok(written)
}

fn numbered_path(path: &Path, suffix: u32) -> PathBuf {
    if suffix == 0 {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}-{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{suffix}"),
    };
    path.with_file_name(name)
}
