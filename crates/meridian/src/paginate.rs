//! Pagination over a filtered collection.
//!
//! Page numbers are 1-based. An empty collection still renders as one empty
//! page, and a requested page beyond the end clamps back into range - a
//! filter change that shrinks the collection must never strand the view on
//! a page that no longer exists.

use crate::record::Record;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct Page {
  pub records: Vec<Record>,
  /// The page actually served, after clamping
  pub number: usize,
  pub total_pages: usize,
  pub total_records: usize,
}

impl Page {
  pub fn has_previous(&self) -> bool {
    self.number > 1
  }

  pub fn has_next(&self) -> bool {
    self.number < self.total_pages
  }
}

/// Slice out one page. `page_size` of zero is treated as one record per
/// page rather than a division error.
pub fn paginate(records: &[Record], page_size: usize, requested_page: usize) -> Page {
  let page_size = page_size.max(1);
  let total_records = records.len();
  let total_pages = total_records.div_ceil(page_size).max(1);
  let number = requested_page.clamp(1, total_pages);

  let start = (number - 1) * page_size;
  let end = (start + page_size).min(total_records);
  let records = if start < total_records { records[start..end].to_vec() } else { Vec::new() };

  Page { records, number, total_pages, total_records }
}
