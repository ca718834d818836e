//! Row normalization: raw sheet rows in, typed records out.
//!
//! Two modes, chosen by the source's registry schema. Positional sheets map
//! cell index to field name through a fixed column list; header-driven
//! sheets take their field keys from the first row. Either way a malformed
//! row is logged and skipped - one bad row never aborts the batch.

use crate::record::Record;
use crate::registry::SourceEntry;

/// Normalize one sheet's raw rows. The first row is always consumed as the
/// header row: skipped for positional schemas, used as the key row for
/// header-driven ones. Returns the well-formed subset.
pub fn normalize_sheet(entry: &SourceEntry, rows: &[Vec<String>]) -> Vec<Record> {
  let Some((header_row, data_rows)) = rows.split_first() else {
    return Vec::new();
  };

  match entry.schema.columns() {
    Some(columns) => data_rows
      .iter()
      .filter_map(|row| match positional_record(entry, columns, row) {
        Some(record) => Some(record),
        None => {
          tracing::warn!(sheet = %entry.sheet, cells = row.len(), "skipping malformed row");
          None
        }
      })
      .collect(),
    None => {
      let headers: Vec<String> = header_row.iter().map(|header| header_key(header)).collect();
      data_rows
        .iter()
        .filter_map(|row| match header_record(entry, &headers, row) {
          Some(record) => Some(record),
          None => {
            tracing::warn!(sheet = %entry.sheet, cells = row.len(), "skipping malformed row");
            None
          }
        })
        .collect()
    }
  }
}

/// Field key derived from a header cell: lower-cased, spaces to underscores
pub fn header_key(header: &str) -> String {
  header.trim().to_lowercase().replace(' ', "_")
}

/// Map a row by column position. Missing trailing cells become empty
/// strings; a row wider than the schema is malformed.
fn positional_record(
  entry: &SourceEntry,
  columns: &[&str],
  row: &[String],
) -> Option<Record> {
  if row.len() > columns.len() || row.iter().all(|cell| cell.trim().is_empty()) {
    return None;
  }

  let mut record = Record::new(&entry.sheet, &entry.label);
  for (index, column) in columns.iter().enumerate() {
    let value = row.get(index).cloned().unwrap_or_default();
    record.set_field(column, value);
  }
  Some(record)
}

/// Map a row through the sheet's own header row
fn header_record(entry: &SourceEntry, headers: &[String], row: &[String]) -> Option<Record> {
  if headers.is_empty() || row.len() > headers.len() || row.iter().all(|cell| cell.trim().is_empty())
  {
    return None;
  }

  let mut record = Record::new(&entry.sheet, &entry.label);
  for (index, header) in headers.iter().enumerate() {
    let value = row.get(index).cloned().unwrap_or_default();
    record.set_field(header, value);
  }
  Some(record)
}
