//! Terminal rendering for the dashboard views: metric cards, the record
//! table, and the source list.

use colored::*;

use crate::aggregate::Metrics;
use crate::paginate::Page;
use crate::record::Record;
use crate::registry::SourceRegistry;

const TITLE_WIDTH: usize = 48;
const SUMMARY_WIDTH: usize = 60;

/// Render the metric cards: today's volume, high-impact count, and the top
/// category bucket
pub fn display_metrics(metrics: &Metrics) {
  herald::as_banner(|msg| eprintln!("{msg}"), "Intelligence Summary", Some(50), Some('-'));

  eprintln!("  {} {}", "Updates today:".bold(), metrics.total_today.to_string().cyan());
  eprintln!("  {} {}", "High impact:  ".bold(), metrics.high_impact.to_string().yellow());

  match metrics.top_category() {
    Some((label, count)) => {
      eprintln!("  {} {} ({count})", "Top category: ".bold(), label.green())
    }
    None => eprintln!("  {} {}", "Top category: ".bold(), "-".dimmed()),
  }
  eprintln!();
}

/// Render one page of records. Shows an explicit no-data line when the
/// filtered collection is empty - an empty result is a state, not an error.
pub fn display_page(page: &Page) {
  if page.records.is_empty() {
    herald::info("No updates found");
    return;
  }

  for record in &page.records {
    display_record_line(record);
  }

  eprintln!();
  eprintln!(
    "  Page {} of {} ({} records)",
    page.number.to_string().bold(),
    page.total_pages,
    page.total_records
  );
}

/// One table row: date, impact badge, title, then the summary line
fn display_record_line(record: &Record) {
  let date = match record.parsed_timestamp() {
    Some(timestamp) => timestamp.format("%Y-%m-%d").to_string(),
    None => "----------".to_string(),
  };

  eprintln!(
    "{}  {}  {}",
    date.dimmed(),
    impact_badge(&record.impact),
    truncate(&record.title, TITLE_WIDTH).bold()
  );

  if !record.summary.is_empty() {
    eprintln!("            {}", truncate(&record.summary, SUMMARY_WIDTH).dimmed());
  }

  let mut tags = Vec::new();
  if !record.category.is_empty() {
    tags.push(record.category.clone());
  }
  if !record.region.is_empty() {
    tags.push(record.region.clone());
  }
  tags.push(record.source_label.clone());
  eprintln!("            {}", tags.join(" | ").cyan());
}

/// Render every registry entry with its label, color, schema, and state
pub fn display_sources(registry: &SourceRegistry) {
  herald::as_banner(|msg| eprintln!("{msg}"), "Configured Sources", Some(50), Some('-'));

  for entry in &registry.entries {
    let state = if entry.enabled { "enabled".green() } else { "disabled".red() };
    eprintln!(
      "  {} ({}) [{:?}] - {}",
      entry.label.bold(),
      entry.sheet.dimmed(),
      entry.schema,
      state
    );
    eprintln!("      {}", entry.description.dimmed());
  }
}

/// Impact badge colored the way the dashboard colors impact chips:
/// "high" amber-red, "medium" cyan, everything else muted
fn impact_badge(impact: &str) -> ColoredString {
  let lower = impact.to_lowercase();
  let label = if impact.is_empty() { "  -   " } else { impact };
  if lower.contains("high") {
    format!("{label:<6}").red().bold()
  } else if lower.contains("medium") {
    format!("{label:<6}").cyan()
  } else {
    format!("{label:<6}").dimmed()
  }
}

fn truncate(text: &str, width: usize) -> String {
  if text.chars().count() <= width {
    text.to_string()
  } else {
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
  }
}
