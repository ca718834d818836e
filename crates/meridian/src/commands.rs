//! CLI command handlers. Each command is a thin consumer of the engine:
//! the filter flags build one `FilterState`, and no command carries its own
//! copy of the filtering, aggregation, or pagination logic.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use herald::{ConsoleNotifier, Notification, NotificationKind, Notifier};

use crate::aggregate::Metrics;
use crate::display;
use crate::export;
use crate::filter::FilterState;
use crate::paginate::{self, DEFAULT_PAGE_SIZE};
use crate::provider::SheetClient;
use crate::refresh::RefreshController;
use crate::registry::SourceRegistry;

/// Connection settings for the tabular data provider
#[derive(Args, Debug, Clone)]
pub struct ProviderOptions {
  /// Spreadsheet identifier at the tabular data provider
  #[arg(long, env = "MERIDIAN_SPREADSHEET_ID")]
  pub spreadsheet_id: String,
  /// API key for the tabular data provider
  #[arg(long, env = "MERIDIAN_API_KEY")]
  pub api_key: String,
  /// Source registry config file (YAML); built-in defaults if omitted
  #[arg(long)]
  pub registry: Option<PathBuf>,
  /// Ceiling in seconds for any single provider call
  #[arg(long, default_value_t = 15)]
  pub timeout: u64,
}

impl ProviderOptions {
  pub fn client(&self) -> SheetClient {
    SheetClient::new(&self.spreadsheet_id, &self.api_key)
      .with_timeout(Duration::from_secs(self.timeout))
  }

  pub fn load_registry(&self) -> Result<SourceRegistry> {
    SourceRegistry::load_or_default(self.registry.as_deref())
  }
}

/// Filter criteria shared by `fetch` and `export`
#[derive(Args, Debug, Clone)]
pub struct FilterOptions {
  /// Free-text search across title, summary, source, and compound names
  #[arg(short, long)]
  pub search: Option<String>,
  /// Accept only these categories (repeatable; none means all)
  #[arg(long)]
  pub category: Vec<String>,
  /// Accept only these impact levels (repeatable; none means all)
  #[arg(long)]
  pub impact: Vec<String>,
  /// Accept only these regions (repeatable; none means all)
  #[arg(long)]
  pub region: Vec<String>,
  /// Inclusive start date (YYYY-MM-DD)
  #[arg(long)]
  pub from: Option<NaiveDate>,
  /// Inclusive end date (YYYY-MM-DD); covers the entire day
  #[arg(long)]
  pub to: Option<NaiveDate>,
  /// Page of results to display
  #[arg(short, long, default_value_t = 1)]
  pub page: usize,
  /// Records per page
  #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
  pub page_size: usize,
}

impl FilterOptions {
  pub fn to_filter_state(&self) -> FilterState {
    let mut state = FilterState::new();
    if let Some(search) = &self.search {
      state.set_search(search);
    }
    state.set_selection("category", self.category.iter().cloned());
    state.set_selection("impact", self.impact.iter().cloned());
    state.set_selection("region", self.region.iter().cloned());
    state.set_date_range(self.from, self.to);
    // Page last: criteria mutations above reset it to 1
    state.set_page(self.page);
    state
  }
}

/// One-shot load: print the metric cards and a paginated table
pub async fn fetch(provider: &ProviderOptions, filters: &FilterOptions) -> Result<()> {
  let records = load_records(provider).await?;

  // Metric cards read the full collection, the table the filtered one -
  // matching the landing page's documented choice
  let metrics = Metrics::compute(&records);
  display::display_metrics(&metrics);

  let state = filters.to_filter_state();
  let filtered = state.apply(&records);
  let page = paginate::paginate(&filtered, filters.page_size, state.page());
  display::display_page(&page);

  Ok(())
}

/// Run the refresh controller on an interval until interrupted
pub async fn watch(provider: &ProviderOptions, interval_secs: u64) -> Result<()> {
  let controller = Arc::new(RefreshController::new(
    Arc::new(provider.client()),
    provider.load_registry()?,
    Arc::new(ConsoleNotifier),
  ));

  herald::info(&format!("Watching sources, refreshing every {interval_secs}s (Ctrl-C to stop)"));
  controller.refresh().await;
  let ticker = controller.spawn_interval(Duration::from_secs(interval_secs));

  tokio::signal::ctrl_c().await?;
  ticker.abort();
  herald::info("Watch stopped");

  Ok(())
}

/// Load, filter, and write the CSV export
pub async fn export_csv(
  provider: &ProviderOptions,
  filters: &FilterOptions,
  output_dir: &PathBuf,
  report_name: &str,
) -> Result<()> {
  let records = load_records(provider).await?;
  let state = filters.to_filter_state();
  let filtered = state.apply(&records);

  let filename =
    export::write_csv(output_dir, report_name, &filtered, &export::default_columns())?;

  ConsoleNotifier.notify(Notification::new(
    NotificationKind::ExportSuccess,
    format!("Exported {} records to {filename}", filtered.len()),
  ));

  Ok(())
}

/// List the configured sources
pub fn sources(registry_path: Option<&std::path::Path>) -> Result<()> {
  let registry = SourceRegistry::load_or_default(registry_path)?;
  display::display_sources(&registry);
  Ok(())
}

/// One refresh cycle through the controller, returning the merged snapshot
async fn load_records(provider: &ProviderOptions) -> Result<Vec<crate::record::Record>> {
  let controller = RefreshController::new(
    Arc::new(provider.client()),
    provider.load_registry()?,
    Arc::new(ConsoleNotifier),
  );

  controller.refresh().await;
  Ok(controller.records().await)
}
