//! Filter option extraction.
//!
//! Pure derivation from the current record collection: the sentinel
//! ("match-all") label first, then the distinct non-empty values for the
//! field in first-seen order. The sentinel is prepended, never data-derived,
//! so it cannot collide with a real value by construction.

use std::collections::BTreeSet;

use crate::record::Record;

/// Distinct options for one filter control. Deterministic for a given
/// input: first-seen order after the sentinel.
pub fn options_for(records: &[Record], field: &str, sentinel: &str) -> Vec<String> {
  let mut options = vec![sentinel.to_string()];
  let mut seen = BTreeSet::new();

  for record in records {
    let value = record.field(field);
    if value.is_empty() || !seen.insert(value.to_string()) {
      continue;
    }
    options.push(value.to_string());
  }

  options
}
