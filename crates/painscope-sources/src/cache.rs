//! On-disk snapshot of collected signals.
//!
//! A run can save what it collected and a later run can replay that
//! snapshot instead of hitting the network, which keeps report tweaks
//! reproducible.

use std::path::Path;

use chrono::{DateTime, Utc};
use painscope_core::{DateRange, Signal, SourceSpec};
use serde::{Deserialize, Serialize};

use crate::collector::{group_by_source, validate_input, Collection};
use crate::error::SourceError;

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    saved_at: DateTime<Utc>,
    signals: Vec<Signal>,
}

fn cache_io(path: &Path, source: std::io::Error) -> SourceError {
    SourceError::CacheIo {
        path: path.display().to_string(),
        source,
    }
}

/// Write `signals` to `path` as JSON, creating parent directories.
///
/// # Errors
///
/// Returns [`SourceError::CacheIo`] if the file cannot be written.
pub async fn save_signals(path: &Path, signals: &[Signal]) -> Result<(), SourceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| cache_io(parent, e))?;
    }

    let file = CacheFile {
        saved_at: Utc::now(),
        signals: signals.to_vec(),
    };
    let body = serde_json::to_vec_pretty(&file).map_err(|e| SourceError::Deserialize {
        context: "signal cache".to_string(),
        source: e,
    })?;
    tokio::fs::write(path, body)
        .await
        .map_err(|e| cache_io(path, e))?;

    tracing::info!(path = %path.display(), count = signals.len(), "saved signal cache");
    Ok(())
}

/// Read a snapshot previously written by [`save_signals`].
///
/// # Errors
///
/// Signals with blank text are dropped; the rest have their text trimmed.
///
/// # Errors
///
/// Returns [`SourceError::CacheIo`] if the file cannot be read and
/// [`SourceError::Deserialize`] if it is not a valid snapshot.
pub async fn load_signals(path: &Path) -> Result<Vec<Signal>, SourceError> {
    let body = tokio::fs::read(path)
        .await
        .map_err(|e| cache_io(path, e))?;
    let file: CacheFile = serde_json::from_slice(&body).map_err(|e| SourceError::Deserialize {
        context: format!("signal cache {}", path.display()),
        source: e,
    })?;

    let total = file.signals.len();
    let signals: Vec<Signal> = file.signals.into_iter().filter_map(revalidate).collect();
    if signals.len() < total {
        tracing::warn!(
            path = %path.display(),
            dropped = total - signals.len(),
            "dropped cached signals with empty text"
        );
    }

    tracing::info!(
        path = %path.display(),
        count = signals.len(),
        saved_at = %file.saved_at,
        "loaded signal cache"
    );
    Ok(signals)
}

/// Rebuild a cached signal through [`Signal::new`] so a hand-edited or stale
/// snapshot obeys the same text rules as a live collection.
fn revalidate(cached: Signal) -> Option<Signal> {
    let Signal {
        source_id,
        captured_at,
        query,
        raw_text,
        url,
        reply_count,
    } = cached;
    let mut signal = Signal::new(&source_id, captured_at, &query, &raw_text)
        .ok()?
        .with_reply_count(reply_count);
    signal.url = url;
    Some(signal)
}

/// Replay cached signals as if they had just been collected for `specs`.
///
/// Only signals whose (source, query) pair is among `specs` and whose
/// timestamp falls inside `window` are kept, laid out in the same order a
/// live collection would produce.
///
/// # Errors
///
/// Returns [`SourceError::InvalidInput`] for an empty spec list or an
/// inverted window.
pub fn replay(
    signals: Vec<Signal>,
    specs: &[SourceSpec],
    window: &DateRange,
) -> Result<Collection, SourceError> {
    validate_input(specs, window)?;

    let mut buckets: Vec<(&SourceSpec, Vec<Signal>)> =
        specs.iter().map(|spec| (spec, Vec::new())).collect();
    for signal in signals {
        if let Some((_, bucket)) = buckets.iter_mut().find(|(spec, _)| {
            spec.source_id == signal.source_id && spec.query.eq_ignore_ascii_case(&signal.query)
        }) {
            bucket.push(signal);
        }
    }

    Ok(Collection {
        signals: group_by_source(specs, buckets, window),
        warnings: Vec::new(),
    })
}
