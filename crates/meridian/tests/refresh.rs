use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use herald::{MemoryNotifier, NotificationKind};
use meridian::provider::{FetchError, RowProvider};
use meridian::refresh::{RefreshController, RefreshOutcome};
use meridian::registry::SourceRegistry;

/// Mock provider for testing: serves canned rows per sheet, can be flipped
/// into failure mode, and counts fetch calls
struct MockProvider {
  sheets: HashMap<String, Vec<Vec<String>>>,
  titles: Vec<String>,
  should_fail: AtomicBool,
  fetch_calls: AtomicUsize,
  delay: Duration,
}

impl MockProvider {
  fn new() -> Self {
    Self {
      sheets: HashMap::new(),
      titles: Vec::new(),
      should_fail: AtomicBool::new(false),
      fetch_calls: AtomicUsize::new(0),
      delay: Duration::ZERO,
    }
  }

  fn with_sheet(mut self, sheet: &str, rows: &[&[&str]]) -> Self {
    let rows: Vec<Vec<String>> =
      rows.iter().map(|row| row.iter().map(|cell| cell.to_string()).collect()).collect();
    self.sheets.insert(sheet.to_string(), rows);
    self
  }

  fn with_titles(mut self, titles: &[&str]) -> Self {
    self.titles = titles.iter().map(|title| title.to_string()).collect();
    self
  }

  fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = delay;
    self
  }

  fn set_failing(&self, failing: bool) {
    self.should_fail.store(failing, Ordering::SeqCst);
  }

  fn fetch_calls(&self) -> usize {
    self.fetch_calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl RowProvider for MockProvider {
  async fn fetch_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, FetchError> {
    self.fetch_calls.fetch_add(1, Ordering::SeqCst);
    if !self.delay.is_zero() {
      tokio::time::sleep(self.delay).await;
    }
    if self.should_fail.load(Ordering::SeqCst) {
      return Err(FetchError::Timeout(Duration::from_millis(1)));
    }
    self
      .sheets
      .get(sheet)
      .cloned()
      .ok_or(FetchError::Status(reqwest::StatusCode::NOT_FOUND))
  }

  async fn sheet_titles(&self) -> Result<Vec<String>, FetchError> {
    if self.should_fail.load(Ordering::SeqCst) {
      return Err(FetchError::Timeout(Duration::from_millis(1)));
    }
    Ok(self.titles.clone())
  }
}

const INTEL_HEADER: &[&str] =
  &["Date", "Title", "Summary", "Category", "Source", "Impact", "Region"];

fn intel_provider() -> MockProvider {
  MockProvider::new().with_sheet(
    "Sheet1",
    &[
      INTEL_HEADER,
      &["2024-05-03 08:00:00", "Older update", "s", "Regulatory", "src", "Low", "Global"],
      &["2024-05-04 08:00:00", "Newer update", "s", "Clinical", "src", "High", "Global"],
    ],
  )
}

fn controller_with(provider: MockProvider) -> (Arc<RefreshController>, Arc<MemoryNotifier>) {
  let notifier = Arc::new(MemoryNotifier::new());
  let controller = Arc::new(
    RefreshController::new(Arc::new(provider), SourceRegistry::default(), notifier.clone())
      .with_min_visible(Duration::ZERO),
  );
  (controller, notifier)
}

#[cfg(test)]
mod refresh_tests {
  use super::*;

  #[tokio::test]
  async fn test_successful_refresh_replaces_and_sorts() {
    let (controller, notifier) = controller_with(intel_provider());

    let outcome = controller.refresh().await;
    assert_eq!(outcome, RefreshOutcome::Refreshed { records: 2 });

    let records = controller.records().await;
    assert_eq!(records[0].title, "Newer update");
    assert_eq!(records[1].title, "Older update");

    let events = notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, NotificationKind::RefreshSuccess);
    assert!(events[0].message.contains("updated at"));
  }

  #[tokio::test]
  async fn test_partial_sheet_failure_still_succeeds() {
    // Only Sheet1 exists; the other seeded sheets 404 and are skipped
    let (controller, _) = controller_with(intel_provider());

    let outcome = controller.refresh().await;
    assert_eq!(outcome, RefreshOutcome::Refreshed { records: 2 });
  }

  #[tokio::test]
  async fn test_failure_retains_previous_collection() {
    let provider = intel_provider();
    let notifier = Arc::new(MemoryNotifier::new());
    let provider = Arc::new(provider);
    let controller = Arc::new(
      RefreshController::new(provider.clone(), SourceRegistry::default(), notifier.clone())
        .with_min_visible(Duration::ZERO),
    );

    controller.refresh().await;
    let before = controller.records().await;
    assert_eq!(before.len(), 2);

    provider.set_failing(true);
    let outcome = controller.refresh().await;
    assert_eq!(outcome, RefreshOutcome::Failed);

    let after = controller.records().await;
    assert_eq!(after.len(), before.len());
    assert_eq!(after[0].title, before[0].title);

    let events = notifier.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].kind, NotificationKind::RefreshFailure);
  }

  #[tokio::test]
  async fn test_failure_with_empty_store_serves_sample_feed() {
    let provider = MockProvider::new();
    provider.set_failing(true);
    let (controller, notifier) = controller_with(provider);

    let outcome = controller.refresh().await;
    assert_eq!(outcome, RefreshOutcome::Failed);

    // Never-loaded dashboard falls back to the built-in sample feed
    let records = controller.records().await;
    assert!(!records.is_empty());
    assert!(records.iter().all(|record| record.source_tag == "Sheet1"));

    assert_eq!(notifier.events()[0].kind, NotificationKind::RefreshFailure);
  }

  #[tokio::test]
  async fn test_concurrent_trigger_is_coalesced() {
    // Scenario D: a trigger while refreshing is a no-op, not a queue entry
    let provider = intel_provider().with_delay(Duration::from_millis(50));
    let (controller, _) = controller_with(provider);

    let (first, second) = tokio::join!(controller.refresh(), async {
      // Let the first refresh claim the in-flight slot
      tokio::time::sleep(Duration::from_millis(10)).await;
      assert!(controller.is_refreshing());
      controller.refresh().await
    });

    assert!(matches!(first, RefreshOutcome::Refreshed { .. }));
    assert_eq!(second, RefreshOutcome::AlreadyRefreshing);
    assert!(!controller.is_refreshing());
  }

  #[tokio::test]
  async fn test_coalesced_trigger_issues_no_fetches() {
    let provider = Arc::new(intel_provider().with_delay(Duration::from_millis(50)));
    let controller = Arc::new(
      RefreshController::new(
        provider.clone(),
        SourceRegistry::default(),
        Arc::new(MemoryNotifier::new()),
      )
      .with_min_visible(Duration::ZERO),
    );

    let (_, _) = tokio::join!(controller.refresh(), async {
      tokio::time::sleep(Duration::from_millis(10)).await;
      controller.refresh().await
    });

    // One fetch per enabled source, from the single winning cycle
    assert_eq!(provider.fetch_calls(), SourceRegistry::default().enabled().count());
  }

  #[tokio::test]
  async fn test_minimum_visible_refreshing_window() {
    let notifier = Arc::new(MemoryNotifier::new());
    let controller = RefreshController::new(
      Arc::new(intel_provider()),
      SourceRegistry::default(),
      notifier,
    )
    .with_min_visible(Duration::from_millis(40));

    let started = std::time::Instant::now();
    controller.refresh().await;
    assert!(started.elapsed() >= Duration::from_millis(40));
  }

  #[tokio::test]
  async fn test_discovered_sheets_join_the_registry() {
    let provider = intel_provider().with_titles(&["Sheet1", "Market_Signals"]);
    let (controller, _) = controller_with(provider);

    controller.refresh().await;

    let registry = controller.registry().await;
    let entry = registry.get("Market_Signals").expect("discovered sheet");
    assert_eq!(entry.label, "Market Signals");
  }

  #[tokio::test]
  async fn test_controller_starts_idle_and_empty() {
    let (controller, notifier) = controller_with(MockProvider::new());
    assert!(!controller.is_refreshing());
    assert!(controller.records().await.is_empty());
    assert!(notifier.events().is_empty());
  }
}
