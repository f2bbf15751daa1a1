use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::signal::SourceSpec;
use crate::ConfigError;

/// Upper bound accepted for a per-source `max_results`.
pub const MAX_RESULTS_LIMIT: usize = 100;

/// The source capabilities the collector knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Reddit,
    HackerNews,
    Search,
}

impl SourceKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Reddit => "reddit",
            SourceKind::HackerNews => "hackernews",
            SourceKind::Search => "search",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reddit" => Ok(SourceKind::Reddit),
            "hackernews" | "hn" => Ok(SourceKind::HackerNews),
            "search" => Ok(SourceKind::Search),
            other => Err(ConfigError::Validation(format!(
                "unknown source '{other}'; expected reddit, hackernews, or search"
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceSpec>,
}

impl SourcesFile {
    /// Keep only specs whose source id is in `allowed`. An empty filter keeps all.
    /// Aliases in `allowed` match their canonical id.
    #[must_use]
    pub fn filtered(&self, allowed: &[String]) -> Vec<SourceSpec> {
        let allowed: Vec<&str> = allowed
            .iter()
            .map(|a| a.parse::<SourceKind>().map_or(a.as_str(), |kind| kind.as_str()))
            .collect();
        self.sources
            .iter()
            .filter(|spec| allowed.is_empty() || allowed.contains(&spec.source_id.as_str()))
            .cloned()
            .collect()
    }
}

/// Load and validate the sources configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_sources(&content)
}

/// Parse and validate sources YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_sources(content: &str) -> Result<SourcesFile, ConfigError> {
    let mut sources_file: SourcesFile = serde_yaml::from_str(content)?;
    validate_sources(&mut sources_file)?;
    Ok(sources_file)
}

/// Validates every entry and rewrites aliases such as `hn` to the canonical
/// source id the collector registers sources under.
fn validate_sources(sources_file: &mut SourcesFile) -> Result<(), ConfigError> {
    if sources_file.sources.is_empty() {
        return Err(ConfigError::Validation(
            "at least one source must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();

    for spec in &mut sources_file.sources {
        let kind = spec.source_id.parse::<SourceKind>()?;
        spec.source_id = kind.as_str().to_string();

        if spec.query.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "source '{}' has an empty query",
                spec.source_id
            )));
        }

        if let Some(max) = spec.max_results {
            if max == 0 || max > MAX_RESULTS_LIMIT {
                return Err(ConfigError::Validation(format!(
                    "source '{}' query \"{}\" has invalid max_results {max}; must be 1..={MAX_RESULTS_LIMIT}",
                    spec.source_id, spec.query
                )));
            }
        }

        let key = (spec.source_id.clone(), spec.query.trim().to_lowercase());
        if !seen.insert(key) {
            return Err(ConfigError::Validation(format!(
                "duplicate source entry: '{}' / \"{}\"",
                spec.source_id, spec.query
            )));
        }
    }

    Ok(())
}
