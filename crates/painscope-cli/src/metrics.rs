//! `metrics` command handlers.

use clap::Subcommand;
use painscope_core::AppConfig;
use painscope_metrics::{read_rows, MetricsRow};

#[derive(Debug, Subcommand)]
pub enum MetricsCommands {
    /// Print the most recent rows of the metrics log
    Show {
        /// Number of rows to show, newest last
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

/// Print the last `limit` rows of the primary metrics CSV.
///
/// # Errors
///
/// Returns an error if the log exists but cannot be read or parsed.
pub(crate) async fn run_metrics_show(config: &AppConfig, limit: usize) -> anyhow::Result<()> {
    let rows = read_rows(&config.metrics_csv_path).await?;
    if rows.is_empty() {
        println!(
            "no runs logged yet in {}",
            config.metrics_csv_path.display()
        );
        return Ok(());
    }
    print!("{}", format_rows(&rows, limit));
    Ok(())
}

fn format_rows(rows: &[MetricsRow], limit: usize) -> String {
    let start = rows.len().saturating_sub(limit);
    let mut out = format!(
        "{:<10}  {:>5}  {:>7}  {:>10}  {}\n",
        "date", "leads", "replies", "revenue", "top pain points"
    );
    for row in &rows[start..] {
        out.push_str(&format!(
            "{:<10}  {:>5}  {:>7}  {:>10}  {}\n",
            row.date,
            row.leads,
            row.replies,
            row.revenue,
            row.top_pain_points.join(" | ")
        ));
    }
    out
}
