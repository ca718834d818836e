//! Filter state and the composed visibility predicate.
//!
//! Every view drives the same engine: a free-text query over a fixed field
//! list, any number of multi-select set filters, and an optional inclusive
//! date range. All active criteria AND together. An empty multi-select set
//! means "no restriction", never "match nothing".

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet};

use crate::record::Record;

/// Fields the free-text query is matched against
pub const SEARCH_FIELDS: [&str; 5] =
  ["title", "summary", "source", "compound_name", "generic_name"];

/// UI-local filter criteria plus the current page. Any criterion change
/// resets the page to 1; the reset is enforced here, in one place, rather
/// than re-remembered by every view.
#[derive(Debug, Clone)]
pub struct FilterState {
  search: String,
  selections: BTreeMap<String, BTreeSet<String>>,
  start_date: Option<NaiveDate>,
  end_date: Option<NaiveDate>,
  page: usize,
}

impl Default for FilterState {
  fn default() -> Self {
    Self {
      search: String::new(),
      selections: BTreeMap::new(),
      start_date: None,
      end_date: None,
      page: 1,
    }
  }
}

impl FilterState {
  pub fn new() -> Self {
    Self::default()
  }

  /// Default view state: a trailing window ending today
  pub fn with_trailing_days(days: i64) -> Self {
    let today = chrono::Local::now().date_naive();
    let mut state = Self::default();
    state.start_date = Some(today - chrono::Duration::days(days));
    state.end_date = Some(today);
    state
  }

  pub fn set_search(&mut self, query: &str) {
    self.search = query.to_string();
    self.page = 1;
  }

  /// Replace the accepted-value set for one multi-select filter. An empty
  /// set removes the restriction.
  pub fn set_selection<I, S>(&mut self, field: &str, values: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
    if set.is_empty() {
      self.selections.remove(field);
    } else {
      self.selections.insert(field.to_string(), set);
    }
    self.page = 1;
  }

  /// Add one accepted value to a multi-select filter
  pub fn select(&mut self, field: &str, value: &str) {
    self.selections.entry(field.to_string()).or_default().insert(value.to_string());
    self.page = 1;
  }

  /// Remove one accepted value; dropping the last value drops the
  /// restriction entirely
  pub fn deselect(&mut self, field: &str, value: &str) {
    if let Some(set) = self.selections.get_mut(field) {
      set.remove(value);
      if set.is_empty() {
        self.selections.remove(field);
      }
    }
    self.page = 1;
  }

  pub fn clear_selection(&mut self, field: &str) {
    self.selections.remove(field);
    self.page = 1;
  }

  /// Inclusive date range. Either bound may be absent, which removes that
  /// side of the constraint.
  pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
    self.start_date = start;
    self.end_date = end;
    self.page = 1;
  }

  pub fn set_page(&mut self, page: usize) {
    self.page = page.max(1);
  }

  pub fn page(&self) -> usize {
    self.page
  }

  pub fn search(&self) -> &str {
    &self.search
  }

  /// Is this record visible under every active criterion?
  pub fn matches(&self, record: &Record) -> bool {
    self.matches_search(record) && self.matches_selections(record) && self.matches_dates(record)
  }

  /// One pass over the collection, preserving order
  pub fn apply(&self, records: &[Record]) -> Vec<Record> {
    records.iter().filter(|record| self.matches(record)).cloned().collect()
  }

  fn matches_search(&self, record: &Record) -> bool {
    if self.search.is_empty() {
      return true;
    }

    let query = self.search.to_lowercase();
    SEARCH_FIELDS
      .iter()
      .any(|field| record.field(field).to_lowercase().contains(&query))
  }

  fn matches_selections(&self, record: &Record) -> bool {
    self
      .selections
      .iter()
      .all(|(field, accepted)| accepted.contains(record.field(field)))
  }

  fn matches_dates(&self, record: &Record) -> bool {
    if self.start_date.is_none() && self.end_date.is_none() {
      return true;
    }

    // A record whose timestamp cannot be parsed fails any active range
    let Some(timestamp) = record.parsed_timestamp() else {
      return false;
    };

    if let Some(start) = self.start_date {
      if timestamp < day_start(start) {
        return false;
      }
    }
    if let Some(end) = self.end_date {
      if timestamp > day_end(end) {
        return false;
      }
    }
    true
  }
}

fn day_start(date: NaiveDate) -> NaiveDateTime {
  date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

/// End bounds are inclusive through the whole calendar day
fn day_end(date: NaiveDate) -> NaiveDateTime {
  date.and_hms_milli_opt(23, 59, 59, 999).unwrap_or_default()
}
