//! Refresh coordination for the record collection.
//!
//! The controller is the single writer: it fetches every enabled source,
//! normalizes and merges the rows, and replaces the collection wholesale.
//! Readers only ever see a complete snapshot. Two states exist, idle and
//! refreshing; a trigger while a refresh is already in flight is coalesced
//! into a no-op rather than queued, so at most one fetch cycle runs per
//! controller at any time. That single-in-flight guarantee is also what the
//! host's coarse page-reload timer relies on to never interleave with a
//! running refresh.

use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::{Instant, MissedTickBehavior};

use herald::{Notification, NotificationKind, Notifier};

use crate::normalize::normalize_sheet;
use crate::provider::{sample_records, RowProvider};
use crate::record::{sort_newest_first, Record};
use crate::registry::SourceRegistry;

/// Floor for how long the refreshing state stays observable, so the UI
/// affordance registers even when the fetch settles instantly
pub const DEFAULT_MIN_VISIBLE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
  /// Collection replaced with this many records
  Refreshed { records: usize },
  /// A refresh was already in flight; this trigger did nothing
  AlreadyRefreshing,
  /// Every source failed; previous collection retained
  Failed,
}

pub struct RefreshController {
  provider: Arc<dyn RowProvider>,
  registry: RwLock<SourceRegistry>,
  records: RwLock<Vec<Record>>,
  refreshing: AtomicBool,
  notifier: Arc<dyn Notifier>,
  min_visible: Duration,
}

impl RefreshController {
  pub fn new(
    provider: Arc<dyn RowProvider>,
    registry: SourceRegistry,
    notifier: Arc<dyn Notifier>,
  ) -> Self {
    Self {
      provider,
      registry: RwLock::new(registry),
      records: RwLock::new(Vec::new()),
      refreshing: AtomicBool::new(false),
      notifier,
      min_visible: DEFAULT_MIN_VISIBLE,
    }
  }

  pub fn with_min_visible(mut self, min_visible: Duration) -> Self {
    self.min_visible = min_visible;
    self
  }

  pub fn is_refreshing(&self) -> bool {
    self.refreshing.load(Ordering::Acquire)
  }

  /// Snapshot of the current collection
  pub async fn records(&self) -> Vec<Record> {
    self.records.read().await.clone()
  }

  /// Snapshot of the registry, including any sheets discovered since
  /// construction
  pub async fn registry(&self) -> SourceRegistry {
    self.registry.read().await.clone()
  }

  /// Run one refresh cycle. Coalesces concurrent triggers; on failure the
  /// previous collection stays intact and a failure notification goes out.
  pub async fn refresh(&self) -> RefreshOutcome {
    if self
      .refreshing
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_err()
    {
      return RefreshOutcome::AlreadyRefreshing;
    }

    let started = Instant::now();
    let result = self.load_all().await;

    // Keep the refreshing state observable for the minimum window
    let elapsed = started.elapsed();
    if elapsed < self.min_visible {
      tokio::time::sleep(self.min_visible - elapsed).await;
    }

    let outcome = match result {
      Ok(records) => {
        let count = records.len();
        *self.records.write().await = records;

        let time = chrono::Local::now().format("%I:%M %p");
        self.notifier.notify(Notification::new(
          NotificationKind::RefreshSuccess,
          format!("Data refreshed successfully - updated at {time}"),
        ));

        RefreshOutcome::Refreshed { records: count }
      }
      Err(error) => {
        tracing::warn!(%error, "refresh cycle failed");

        // A dashboard that has never loaded shows the built-in sample
        // feed instead of nothing
        let mut records = self.records.write().await;
        if records.is_empty() {
          *records = sample_records();
        }
        drop(records);

        self.notifier.notify(Notification::new(
          NotificationKind::RefreshFailure,
          "Refresh failed - please try again",
        ));

        RefreshOutcome::Failed
      }
    };

    self.refreshing.store(false, Ordering::Release);
    outcome
  }

  /// Drive periodic refreshes until the returned task is aborted
  pub fn spawn_interval(self: &Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
    let controller = Arc::clone(self);
    tokio::spawn(async move {
      let mut ticker = tokio::time::interval(period);
      ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
      // The first tick of an interval fires immediately; consume it so the
      // first periodic refresh happens one full period from now
      ticker.tick().await;
      loop {
        ticker.tick().await;
        let _ = controller.refresh().await;
      }
    })
  }

  /// Fetch, normalize, and merge every enabled source. Individual sheet
  /// failures are skipped; only a cycle where no sheet at all could be
  /// fetched counts as a failure.
  async fn load_all(&self) -> Result<Vec<Record>> {
    if let Ok(titles) = self.provider.sheet_titles().await {
      self.registry.write().await.register_discovered(&titles);
    }

    let registry = self.registry.read().await.clone();

    let mut merged = Vec::new();
    let mut fetched_any = false;
    for entry in registry.enabled() {
      match self.provider.fetch_rows(&entry.sheet).await {
        Ok(rows) => {
          fetched_any = true;
          merged.extend(normalize_sheet(entry, &rows));
        }
        Err(error) => {
          tracing::warn!(sheet = %entry.sheet, %error, "sheet fetch failed, skipping");
        }
      }
    }

    if !fetched_any {
      return Err(anyhow!("no source sheet could be fetched"));
    }

    sort_newest_first(&mut merged);
    Ok(merged)
  }
}
