use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One normalized unit of intelligence content.
///
/// The known core fields cover every dashboard view; anything a source sheet
/// carries beyond them (trial phase, agency, compound name, ...) lands in
/// `extras` and is looked up by name through [`Record::field`], which never
/// fails - absent fields read as the empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
  pub timestamp: String,
  pub title: String,
  pub summary: String,
  pub category: String,
  pub impact: String,
  pub region: String,
  pub source: String,

  /// Sheet name this record came from. Internal provenance, never
  /// user-entered.
  pub source_tag: String,
  /// Friendly display label for the source sheet, assigned at normalize
  /// time from the registry.
  pub source_label: String,

  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub extras: BTreeMap<String, String>,
}

impl Record {
  pub fn new(source_tag: &str, source_label: &str) -> Self {
    Self {
      source_tag: source_tag.to_string(),
      source_label: source_label.to_string(),
      ..Self::default()
    }
  }

  /// Look up a field by name. Core fields first, then the extras side-map,
  /// then the empty string. Safe for any name.
  pub fn field(&self, name: &str) -> &str {
    match name {
      "timestamp" => &self.timestamp,
      "title" => &self.title,
      "summary" => &self.summary,
      "category" => &self.category,
      "impact" => &self.impact,
      "region" => &self.region,
      "source" => &self.source,
      _ => self.extras.get(name).map(String::as_str).unwrap_or(""),
    }
  }

  /// Assign a field by name, routing known names to the core fields and
  /// everything else to the extras side-map.
  pub fn set_field(&mut self, name: &str, value: String) {
    match name {
      "timestamp" => self.timestamp = value,
      "title" => self.title = value,
      "summary" => self.summary = value,
      "category" => self.category = value,
      "impact" => self.impact = value,
      "region" => self.region = value,
      "source" => self.source = value,
      _ => {
        self.extras.insert(name.to_string(), value);
      }
    }
  }

  /// Parsed timestamp, if the raw value is parseable at all.
  pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
    parse_timestamp(&self.timestamp)
  }

  /// Timestamp for ordering. Unparseable timestamps sort as the epoch so
  /// they fall to the oldest end instead of raising.
  pub fn sort_timestamp(&self) -> NaiveDateTime {
    self.parsed_timestamp().unwrap_or(NaiveDateTime::UNIX_EPOCH)
  }
}

/// Parse the timestamp formats the source sheets actually contain. RFC 3339
/// first (the sample feed), then the date-time and date-only spellings seen
/// in manually maintained tabs.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
    return Some(parsed.naive_local());
  }

  const DATETIME_FORMATS: [&str; 4] =
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%m/%d/%Y %H:%M:%S"];
  for format in DATETIME_FORMATS {
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
      return Some(parsed);
    }
  }

  const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
  for format in DATE_FORMATS {
    if let Ok(parsed) = chrono::NaiveDate::parse_from_str(trimmed, format) {
      return parsed.and_hms_opt(0, 0, 0);
    }
  }

  None
}

/// Sort newest-first, the display order every view uses. Stable, so records
/// sharing a timestamp keep their merge order.
pub fn sort_newest_first(records: &mut [Record]) {
  records.sort_by_key(|record| std::cmp::Reverse(record.sort_timestamp()));
}
