//! Source registry for the upstream spreadsheet tabs.
//!
//! The registry is an explicit value owned by whoever drives the refresh
//! cycle and is passed where needed, replacing the lazily populated global
//! label map the dashboard grew up with. It carries, per sheet: the display
//! label and color, a description, the row schema, and an enabled flag for
//! per-source exclusion.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Colors handed out round-robin to sheets discovered at runtime
const COLOR_PALETTE: [&str; 7] = ["cyan", "teal", "green", "purple", "orange", "indigo", "pink"];

/// How raw rows from a sheet map onto record fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowSchema {
  /// Fixed 7-column intelligence feed layout
  Intelligence,
  /// Fixed 21-column regulatory submission tracker layout
  Regulatory,
  /// Fixed 22-column medical research mention layout
  Research,
  /// First row is a header row; field keys are derived from it
  Headers,
}

impl RowSchema {
  /// Column order for positional schemas; `None` for header-driven sheets
  pub fn columns(&self) -> Option<&'static [&'static str]> {
    match self {
      RowSchema::Intelligence => {
        Some(&["timestamp", "title", "summary", "category", "source", "impact", "region"])
      }
      RowSchema::Regulatory => Some(&[
        "timestamp",
        "agency",
        "region",
        "submission_id",
        "submission_type",
        "compound_name",
        "generic_name",
        "therapeutic_area",
        "indication",
        "status",
        "priority_designation",
        "submission_date",
        "target_decision_date",
        "approval_date",
        "review_cycle",
        "key_issues",
        "risk_level",
        "impact",
        "source",
        "summary",
        "last_updated_by",
      ]),
      RowSchema::Research => Some(&[
        "timestamp",
        "title",
        "sentiment",
        "source",
        "source_type",
        "publication_date",
        "therapeutic_area",
        "impact_level",
        "reach",
        "mentions",
        "engagement",
        "region",
        "summary",
        "key_findings",
        "study_design",
        "sample_size",
        "journal",
        "authors",
        "affiliation",
        "impact_score",
        "data_source",
        "last_updated_by",
      ]),
      RowSchema::Headers => None,
    }
  }
}

/// One registered source sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
  /// Sheet title as the provider knows it
  pub sheet: String,
  /// Friendly display label
  pub label: String,
  /// Display color for badges and metric cards
  pub color: String,
  pub description: String,
  pub schema: RowSchema,
  #[serde(default = "default_enabled")]
  pub enabled: bool,
}

fn default_enabled() -> bool {
  true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRegistry {
  pub entries: Vec<SourceEntry>,
}

impl Default for SourceRegistry {
  fn default() -> Self {
    Self {
      entries: vec![
        SourceEntry {
          sheet: "Sheet1".to_string(),
          label: "Global Intelligence".to_string(),
          color: "cyan".to_string(),
          description: "Aggregated medical and pharma news updates".to_string(),
          schema: RowSchema::Intelligence,
          enabled: true,
        },
        SourceEntry {
          sheet: "Regulatory_Intelligence_Tracker".to_string(),
          label: "Regulatory Intelligence".to_string(),
          color: "teal".to_string(),
          description: "Global submission tracking and compliance updates".to_string(),
          schema: RowSchema::Regulatory,
          enabled: true,
        },
        SourceEntry {
          sheet: "Medical_Research_Insights".to_string(),
          label: "Medical Research".to_string(),
          color: "green".to_string(),
          description: "Recent peer-reviewed publications and discoveries".to_string(),
          schema: RowSchema::Research,
          enabled: true,
        },
        SourceEntry {
          sheet: "Clinical_Trials".to_string(),
          label: "Clinical Trials".to_string(),
          color: "purple".to_string(),
          description: "Ongoing or completed trial data and results".to_string(),
          schema: RowSchema::Headers,
          enabled: true,
        },
        SourceEntry {
          sheet: "Public_Health".to_string(),
          label: "Public Health & Forecasts".to_string(),
          color: "orange".to_string(),
          description: "Epidemiological trends and outbreak insights".to_string(),
          schema: RowSchema::Headers,
          enabled: true,
        },
      ],
    }
  }
}

impl SourceRegistry {
  pub fn get(&self, sheet: &str) -> Option<&SourceEntry> {
    self.entries.iter().find(|entry| entry.sheet == sheet)
  }

  /// Sources that participate in the next load, in registry order
  pub fn enabled(&self) -> impl Iterator<Item = &SourceEntry> {
    self.entries.iter().filter(|entry| entry.enabled)
  }

  /// Exclude a source from future loads without forgetting it
  pub fn disable(&mut self, sheet: &str) -> bool {
    match self.entries.iter_mut().find(|entry| entry.sheet == sheet) {
      Some(entry) => {
        entry.enabled = false;
        true
      }
      None => false,
    }
  }

  pub fn enable(&mut self, sheet: &str) -> bool {
    match self.entries.iter_mut().find(|entry| entry.sheet == sheet) {
      Some(entry) => {
        entry.enabled = true;
        true
      }
      None => false,
    }
  }

  /// Register sheet titles reported by the provider that the registry has
  /// not seen before. New sheets get a friendly label derived from the
  /// title, the next palette color, and the header-driven schema.
  pub fn register_discovered(&mut self, titles: &[String]) {
    for title in titles {
      if self.get(title).is_some() {
        continue;
      }

      let label = friendly_label(title);
      let color = COLOR_PALETTE[self.entries.len() % COLOR_PALETTE.len()].to_string();
      tracing::debug!(sheet = %title, label = %label, color = %color, "registering discovered sheet");

      self.entries.push(SourceEntry {
        sheet: title.clone(),
        description: format!("Data from {label}"),
        label,
        color,
        schema: RowSchema::Headers,
        enabled: true,
      });
    }
  }

  /// Load a registry from a YAML config file
  pub fn load(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path)
      .with_context(|| format!("Could not read source registry at {}", path.display()))?;
    serde_yaml::from_str(&content)
      .with_context(|| format!("Invalid source registry at {}", path.display()))
  }

  /// Persist the registry to a YAML config file
  pub fn save(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    let content = serde_yaml::to_string(self)?;
    fs::write(path, content)?;
    Ok(())
  }

  /// Load the registry from `path` when given, otherwise the built-in
  /// default set of sheets
  pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
    match path {
      Some(path) => Self::load(path),
      None => Ok(Self::default()),
    }
  }
}

/// Derive a display label from a sheet title: underscores split words,
/// each word capitalized
pub fn friendly_label(sheet: &str) -> String {
  sheet
    .split('_')
    .filter(|word| !word.is_empty())
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}
