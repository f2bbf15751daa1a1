//! The `run` command: one pass of collect, extract, score, render and log.

mod error;
mod pipeline;
mod wiring;

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Args, ValueEnum};
use painscope_core::{load_sources, AppConfig, DateRange};
use painscope_report::{default_output_path, ReportFormat};
use rust_decimal::Decimal;

use pipeline::{RunOutcome, RunRequest};

/// Directory reports land in when `--output` is not given.
const DEFAULT_REPORT_DIR: &str = "./reports";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Markdown,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => ReportFormat::Markdown,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Days of history to collect, ending now
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=365))]
    pub window_days: u32,

    /// Comma-separated source ids to use (default: every configured source)
    #[arg(long, value_delimiter = ',')]
    pub sources: Vec<String>,

    /// Report path (default: ./reports/pain-points-<date>.<ext>)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = FormatArg::Markdown)]
    pub format: FormatArg,

    /// Replay the saved signal set instead of fetching live
    #[arg(long)]
    pub use_cache: bool,

    /// Niche query to score; repeat for several (default: one per theme)
    #[arg(long = "niche")]
    pub niches: Vec<String>,

    /// Revenue to record against this run
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub revenue: Decimal,
}

/// Execute one run from CLI arguments and print its outcome.
///
/// # Errors
///
/// Returns an error when the sources file is unusable, the signal cache
/// cannot be read, a client cannot be built, or the run hits a fatal
/// [`RunError`](error::RunError).
pub(crate) async fn run_pipeline(config: &AppConfig, args: RunArgs) -> anyhow::Result<()> {
    let sources_file = load_sources(&config.sources_path)?;
    let specs = sources_file.filtered(&args.sources);
    if specs.is_empty() {
        anyhow::bail!(
            "no configured source matches --sources {}; see `painscope sources list`",
            args.sources.join(",")
        );
    }
    for requested in &args.sources {
        if !specs.iter().any(|s| &s.source_id == requested) {
            tracing::warn!(source = %requested, "requested source is not configured");
        }
    }

    let generated_at = Utc::now();
    let window = DateRange::last_days(generated_at, args.window_days);
    let format = ReportFormat::from(args.format);
    let output = args.output.unwrap_or_else(|| {
        default_output_path(Path::new(DEFAULT_REPORT_DIR), generated_at, format)
    });

    let replay = if args.use_cache {
        let saved = painscope_sources::load_signals(&config.signal_cache_path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load signal cache: {e}"))?;
        Some(saved)
    } else {
        None
    };

    let pipeline = wiring::build_pipeline(config)?;
    let request = RunRequest {
        specs,
        window,
        generated_at,
        replay,
        cache_path: (!args.use_cache).then(|| config.signal_cache_path.clone()),
        niches: args.niches,
        revenue: args.revenue,
        output,
        format,
    };

    let outcome = pipeline.execute(request).await?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &RunOutcome) {
    let report = &outcome.report;
    println!("report written to {}", outcome.report_path.display());
    println!(
        "{} signals from [{}], {} themes, {} niches scored",
        report.summary.signal_count,
        report.summary.sources.join(", "),
        report.clusters.len(),
        report.niche_scores.len()
    );
    println!(
        "metrics row logged for {} ({} leads, {} replies)",
        outcome.metrics_row.date, outcome.metrics_row.leads, outcome.metrics_row.replies
    );
    if !outcome.warnings.is_empty() {
        println!("completed with {} warning(s):", outcome.warnings.len());
        for warning in &outcome.warnings {
            println!("  - [{}] {warning}", warning.kind());
        }
    }
}
