use meridian::registry::{friendly_label, RowSchema, SourceRegistry};

#[cfg(test)]
mod registry_tests {
  use super::*;

  #[test]
  fn test_default_registry_seeds_the_known_sheets() {
    let registry = SourceRegistry::default();
    assert_eq!(registry.entries.len(), 5);
    assert!(registry.get("Sheet1").is_some());
    assert!(registry.get("Regulatory_Intelligence_Tracker").is_some());
    assert!(registry.get("Clinical_Trials").is_some());
    assert!(registry.enabled().count() == 5);
  }

  #[test]
  fn test_friendly_label_from_sheet_title() {
    assert_eq!(friendly_label("Public_Health"), "Public Health");
    assert_eq!(friendly_label("MEDICAL_research_INSIGHTS"), "Medical Research Insights");
    assert_eq!(friendly_label("Single"), "Single");
    assert_eq!(friendly_label("__odd__"), "Odd");
  }

  #[test]
  fn test_discovery_registers_unknown_sheets_only() {
    let mut registry = SourceRegistry::default();
    registry.register_discovered(&[
      "Sheet1".to_string(),
      "Market_Signals".to_string(),
      "Market_Signals".to_string(),
    ]);

    assert_eq!(registry.entries.len(), 6);
    let entry = registry.get("Market_Signals").expect("discovered sheet");
    assert_eq!(entry.label, "Market Signals");
    assert_eq!(entry.schema, RowSchema::Headers);
    assert_eq!(entry.description, "Data from Market Signals");
    assert!(entry.enabled);
  }

  #[test]
  fn test_discovered_sheets_rotate_the_palette() {
    let mut registry = SourceRegistry::default();
    registry.register_discovered(&["A".to_string(), "B".to_string(), "C".to_string()]);

    let a = registry.get("A").unwrap().color.clone();
    let b = registry.get("B").unwrap().color.clone();
    let c = registry.get("C").unwrap().color.clone();
    assert_ne!(a, b);
    assert_ne!(b, c);
  }

  #[test]
  fn test_disable_excludes_without_forgetting() {
    let mut registry = SourceRegistry::default();
    assert!(registry.disable("Public_Health"));

    assert_eq!(registry.enabled().count(), 4);
    assert!(registry.get("Public_Health").is_some());
    assert!(registry.enabled().all(|entry| entry.sheet != "Public_Health"));

    assert!(registry.enable("Public_Health"));
    assert_eq!(registry.enabled().count(), 5);
  }

  #[test]
  fn test_disable_unknown_sheet_reports_false() {
    let mut registry = SourceRegistry::default();
    assert!(!registry.disable("No_Such_Sheet"));
  }

  #[test]
  fn test_yaml_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sources.yaml");

    let mut registry = SourceRegistry::default();
    registry.disable("Sheet1");
    registry.register_discovered(&["Market_Signals".to_string()]);
    registry.save(&path).unwrap();

    let loaded = SourceRegistry::load(&path).unwrap();
    assert_eq!(loaded.entries.len(), registry.entries.len());
    assert!(!loaded.get("Sheet1").unwrap().enabled);
    assert_eq!(loaded.get("Market_Signals").unwrap().label, "Market Signals");
  }

  #[test]
  fn test_load_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = SourceRegistry::load(&dir.path().join("absent.yaml"));
    assert!(result.is_err());
  }

  #[test]
  fn test_load_or_default_without_path() {
    let registry = SourceRegistry::load_or_default(None).unwrap();
    assert_eq!(registry.entries.len(), 5);
  }

  #[test]
  fn test_positional_schemas_expose_column_lists() {
    assert_eq!(RowSchema::Intelligence.columns().map(|c| c.len()), Some(7));
    assert_eq!(RowSchema::Regulatory.columns().map(|c| c.len()), Some(21));
    assert_eq!(RowSchema::Research.columns().map(|c| c.len()), Some(22));
    assert!(RowSchema::Headers.columns().is_none());
  }
}
