//! CSV export of a filtered collection.
//!
//! Output is UTF-8 with a byte-order-mark prefix so spreadsheet tools pick
//! the right encoding, CRLF line endings, and every field individually
//! quoted with internal quotes doubled. Given the same records and columns
//! the output is byte-for-byte identical, which the golden-file tests rely
//! on.

use anyhow::Result;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::record::Record;

pub const UTF8_BOM: &str = "\u{feff}";
const LINE_ENDING: &str = "\r\n";

/// One export column: the header label and the record field it reads
#[derive(Debug, Clone)]
pub struct Column {
  pub header: String,
  pub field: String,
}

impl Column {
  pub fn new(header: &str, field: &str) -> Self {
    Self { header: header.to_string(), field: field.to_string() }
  }
}

/// The intelligence table's standard column set
pub fn default_columns() -> Vec<Column> {
  vec![
    Column::new("Date", "timestamp"),
    Column::new("Title", "title"),
    Column::new("Summary", "summary"),
    Column::new("Category", "category"),
    Column::new("Source", "source"),
    Column::new("Impact", "impact"),
    Column::new("Region", "region"),
  ]
}

/// Render records as CSV text, in display order. Absent fields export as
/// empty strings.
pub fn to_csv(records: &[Record], columns: &[Column]) -> String {
  let mut output = String::from(UTF8_BOM);

  let header_row: Vec<String> =
    columns.iter().map(|column| quote_field(&column.header)).collect();
  output.push_str(&header_row.join(","));
  output.push_str(LINE_ENDING);

  for record in records {
    let row: Vec<String> =
      columns.iter().map(|column| quote_field(record.field(&column.field))).collect();
    output.push_str(&row.join(","));
    output.push_str(LINE_ENDING);
  }

  output
}

/// Write the CSV to disk under the report's dated filename, returning the
/// filename used
pub fn write_csv(
  directory: &Path,
  report_name: &str,
  records: &[Record],
  columns: &[Column],
) -> Result<String> {
  let filename = export_filename(report_name, chrono::Local::now().date_naive());
  fs::create_dir_all(directory)?;
  fs::write(directory.join(&filename), to_csv(records, columns))?;
  Ok(filename)
}

/// `{ReportName}_{ISO-date}.csv`
pub fn export_filename(report_name: &str, date: NaiveDate) -> String {
  format!("{}_{}.csv", report_name, date.format("%Y-%m-%d"))
}

fn quote_field(value: &str) -> String {
  format!("\"{}\"", value.replace('"', "\"\""))
}
