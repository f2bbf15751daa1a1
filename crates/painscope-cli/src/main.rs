mod metrics;
mod run;
mod sources;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::metrics::MetricsCommands;
use crate::run::RunArgs;
use crate::sources::SourcesCommands;

#[derive(Debug, Parser)]
#[command(name = "painscope", version)]
#[command(about = "Mine SaaS pain points, score niche saturation and log run metrics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect signals, extract themes, score niches and write a report
    Run(RunArgs),
    /// Inspect the metrics log
    Metrics {
        #[command(subcommand)]
        command: MetricsCommands,
    },
    /// Inspect the configured signal sources
    Sources {
        #[command(subcommand)]
        command: SourcesCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse first so `--help` and `--version` work without a configured env.
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("painscope ready; try `painscope run --help`");
        return Ok(());
    };

    // Loads `.env` once, then reads the process environment.
    let config = painscope_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Run(args) => run::run_pipeline(&config, args).await?,
        Commands::Metrics {
            command: MetricsCommands::Show { limit },
        } => metrics::run_metrics_show(&config, limit).await?,
        Commands::Sources {
            command: SourcesCommands::List,
        } => sources::run_sources_list(&config)?,
    }

    Ok(())
}
