//! The tabular data provider.
//!
//! `RowProvider` is the seam between the engine and whatever spreadsheet
//! service the rows live in. The shipped implementation speaks the values
//! API of a hosted spreadsheet (`GET {base}/{id}/values/{range}?key=...`).
//! Every call runs under a global timeout ceiling so an unresponsive
//! provider can never hang a refresh; callers treat rejection and timeout
//! alike as "no new data this cycle".

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::record::Record;

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
  #[error("request failed: {0}")]
  Request(#[from] reqwest::Error),
  #[error("provider returned status {0}")]
  Status(reqwest::StatusCode),
  #[error("request timed out after {0:?}")]
  Timeout(Duration),
  #[error("invalid provider url: {0}")]
  Url(#[from] url::ParseError),
}

/// Source of raw tabular rows, one sheet at a time
#[async_trait]
pub trait RowProvider: Send + Sync {
  /// All rows of one sheet, header row included
  async fn fetch_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, FetchError>;

  /// Titles of every sheet the spreadsheet currently has
  async fn sheet_titles(&self) -> Result<Vec<String>, FetchError>;
}

/// HTTP client for the hosted spreadsheet's values API
#[derive(Debug, Clone)]
pub struct SheetClient {
  http: reqwest::Client,
  base_url: String,
  spreadsheet_id: String,
  api_key: String,
  timeout: Duration,
}

impl SheetClient {
  pub fn new(spreadsheet_id: &str, api_key: &str) -> Self {
    Self {
      http: reqwest::Client::new(),
      base_url: DEFAULT_BASE_URL.to_string(),
      spreadsheet_id: spreadsheet_id.to_string(),
      api_key: api_key.to_string(),
      timeout: DEFAULT_TIMEOUT,
    }
  }

  /// Point the client at a different endpoint (used by tests)
  pub fn with_base_url(mut self, base_url: &str) -> Self {
    self.base_url = base_url.trim_end_matches('/').to_string();
    self
  }

  /// Ceiling for any single provider call
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  fn values_url(&self, sheet: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(&self.base_url)?;
    url
      .path_segments_mut()
      .map_err(|_| FetchError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
      .push(&self.spreadsheet_id)
      .push("values")
      .push(&format!("{sheet}!A:Z"));
    url.query_pairs_mut().append_pair("key", &self.api_key);
    Ok(url)
  }

  fn metadata_url(&self) -> Result<Url, FetchError> {
    let mut url = Url::parse(&self.base_url)?;
    url
      .path_segments_mut()
      .map_err(|_| FetchError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
      .push(&self.spreadsheet_id);
    url.query_pairs_mut().append_pair("key", &self.api_key);
    Ok(url)
  }

  async fn get_json<T>(&self, url: Url) -> Result<T, FetchError>
  where
    T: serde::de::DeserializeOwned,
  {
    let request = async {
      let response = self.http.get(url).send().await?;
      if !response.status().is_success() {
        return Err(FetchError::Status(response.status()));
      }
      Ok(response.json::<T>().await?)
    };

    match tokio::time::timeout(self.timeout, request).await {
      Ok(result) => result,
      Err(_) => Err(FetchError::Timeout(self.timeout)),
    }
  }
}

#[async_trait]
impl RowProvider for SheetClient {
  async fn fetch_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>, FetchError> {
    let url = self.values_url(sheet)?;
    let response: ValuesResponse = self.get_json(url).await?;
    Ok(response.values)
  }

  async fn sheet_titles(&self) -> Result<Vec<String>, FetchError> {
    let url = self.metadata_url()?;
    let response: SpreadsheetResponse = self.get_json(url).await?;
    Ok(response.sheets.into_iter().map(|sheet| sheet.properties.title).collect())
  }
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
  #[serde(default)]
  values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetResponse {
  #[serde(default)]
  sheets: Vec<SheetInfo>,
}

#[derive(Debug, Deserialize)]
struct SheetInfo {
  properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
  title: String,
}

/// Built-in sample records, served for the primary feed when the provider
/// is unreachable so a fresh dashboard is never empty.
pub fn sample_records() -> Vec<Record> {
  let now = chrono::Local::now();
  let sample = |hours_ago: i64, title: &str, summary: &str, category: &str, source: &str,
                impact: &str, region: &str| {
    let mut record = Record::new("Sheet1", "Global Intelligence");
    record.timestamp = (now - chrono::Duration::hours(hours_ago)).to_rfc3339();
    record.title = title.to_string();
    record.summary = summary.to_string();
    record.category = category.to_string();
    record.source = source.to_string();
    record.impact = impact.to_string();
    record.region = region.to_string();
    record
  };

  vec![
    sample(
      0,
      "New FDA Guidance on Clinical Trial Data",
      "FDA releases updated guidance on electronic data submission requirements for clinical trials",
      "Regulatory",
      "FDA.gov",
      "High",
      "United States",
    ),
    sample(
      24,
      "EMA Approves Novel Cancer Treatment",
      "European Medicines Agency grants approval for breakthrough oncology therapy",
      "Drug Approval",
      "EMA Press Release",
      "High",
      "European Union",
    ),
    sample(
      48,
      "WHO Updates Vaccine Guidelines",
      "World Health Organization publishes revised recommendations for vaccine deployment",
      "Medical Guidelines",
      "WHO",
      "Medium",
      "Global",
    ),
    sample(
      0,
      "Japan Regulatory Update on Biosimilars",
      "PMDA announces streamlined approval pathway for biosimilar medications",
      "Regulatory",
      "PMDA Japan",
      "Medium",
      "Japan",
    ),
    sample(
      12,
      "Clinical Trial Results: Phase III Success",
      "Positive results announced for Phase III trial of investigational respiratory treatment",
      "Clinical Research",
      "Clinical Trials Journal",
      "High",
      "Global",
    ),
  ]
}
