//! `sources` command handlers.

use clap::Subcommand;
use painscope_core::{load_sources, AppConfig, SourceKind, SourceSpec};
use painscope_sources::source::DEFAULT_MAX_RESULTS;

#[derive(Debug, Subcommand)]
pub enum SourcesCommands {
    /// List the sources and queries a run would use
    List,
}

/// Print every configured (source, query) pair.
///
/// # Errors
///
/// Returns an error if the sources file cannot be read or fails validation.
pub(crate) fn run_sources_list(config: &AppConfig) -> anyhow::Result<()> {
    let file = load_sources(&config.sources_path)?;
    let search_ready = config.search_credentials().is_some();
    print!("{}", format_sources(&file.sources, search_ready));
    Ok(())
}

fn format_sources(specs: &[SourceSpec], search_ready: bool) -> String {
    let mut out = String::new();
    for spec in specs {
        let max = spec.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        let note = if spec.source_id == SourceKind::Search.as_str() && !search_ready {
            "  (disabled: search credentials not set)"
        } else {
            ""
        };
        out.push_str(&format!(
            "{:<10}  max {max:>3}  \"{}\"{note}\n",
            spec.source_id, spec.query
        ));
    }
    out
}
