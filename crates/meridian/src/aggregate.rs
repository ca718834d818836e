//! Summary metrics for the dashboard's metric cards.
//!
//! Callers decide whether to feed the full collection or the currently
//! filtered one - both appear across the views, so the choice stays a
//! per-call parameter.

use chrono::NaiveDate;

use crate::record::Record;

/// Bucket label for records carrying neither a category nor a source label
const FALLBACK_BUCKET: &str = "Other";

#[derive(Debug, Clone, Default)]
pub struct Metrics {
  /// Records timestamped on the given calendar day
  pub total_today: usize,
  /// Records whose impact contains "high", case-insensitively
  pub high_impact: usize,
  /// Count per category bucket, in first-encountered order
  pub category_breakdown: Vec<(String, usize)>,
}

impl Metrics {
  /// Compute metrics against the local calendar day
  pub fn compute(records: &[Record]) -> Self {
    Self::compute_at(records, chrono::Local::now().date_naive())
  }

  /// Compute metrics against an explicit "today"
  pub fn compute_at(records: &[Record], today: NaiveDate) -> Self {
    let mut metrics = Self::default();

    for record in records {
      if record.parsed_timestamp().is_some_and(|timestamp| timestamp.date() == today) {
        metrics.total_today += 1;
      }

      if record.impact.to_lowercase().contains("high") {
        metrics.high_impact += 1;
      }

      let bucket = bucket_label(record);
      match metrics.category_breakdown.iter_mut().find(|(label, _)| label == bucket) {
        Some((_, count)) => *count += 1,
        None => metrics.category_breakdown.push((bucket.to_string(), 1)),
      }
    }

    metrics
  }

  /// Bucket with the highest count. Ties break toward the bucket seen
  /// first, so the answer is stable across recomputation.
  pub fn top_category(&self) -> Option<(&str, usize)> {
    let mut best: Option<(&str, usize)> = None;
    for (label, count) in &self.category_breakdown {
      if best.is_none_or(|(_, best_count)| *count > best_count) {
        best = Some((label.as_str(), *count));
      }
    }
    best
  }

  pub fn category_count(&self, label: &str) -> usize {
    self
      .category_breakdown
      .iter()
      .find(|(bucket, _)| bucket == label)
      .map(|(_, count)| *count)
      .unwrap_or(0)
  }
}

fn bucket_label(record: &Record) -> &str {
  if !record.category.is_empty() {
    &record.category
  } else if !record.source_label.is_empty() {
    &record.source_label
  } else {
    FALLBACK_BUCKET
  }
}
