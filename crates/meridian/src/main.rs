use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use meridian::commands::{self, FilterOptions, ProviderOptions};

#[derive(Parser)]
#[command(name = "meridian")]
#[command(
  about = "Meridian - Pharma Intelligence Dashboard\nAggregated regulatory, clinical, and public-health intelligence from spreadsheet sources"
)]
#[command(version)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Fetch all sources once and display metrics and records
  Fetch {
    #[command(flatten)]
    provider: ProviderOptions,
    #[command(flatten)]
    filters: FilterOptions,
  },
  /// Keep refreshing on an interval, printing notifications as they arrive
  Watch {
    #[command(flatten)]
    provider: ProviderOptions,
    /// Seconds between refresh cycles
    #[arg(short, long, default_value_t = 600)]
    interval: u64,
  },
  /// Export the filtered records as a CSV file
  Export {
    #[command(flatten)]
    provider: ProviderOptions,
    #[command(flatten)]
    filters: FilterOptions,
    /// Directory the export file is written into
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
    /// Report name used in the export filename
    #[arg(short, long, default_value = "IntelligenceReport")]
    report: String,
  },
  /// List the configured source sheets
  Sources {
    /// Source registry config file (YAML); built-in defaults if omitted
    #[arg(long)]
    registry: Option<PathBuf>,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Fetch { provider, filters } => commands::fetch(&provider, &filters).await,
    Commands::Watch { provider, interval } => commands::watch(&provider, interval).await,
    Commands::Export { provider, filters, output, report } => {
      commands::export_csv(&provider, &filters, &output, &report).await
    }
    Commands::Sources { registry } => commands::sources(registry.as_deref()),
  }
}
