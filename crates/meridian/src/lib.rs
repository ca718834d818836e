//! Meridian - Pharma Intelligence Aggregation Engine
//!
//! Aggregates rows from several spreadsheet tabs (regulatory submissions,
//! clinical trials, medical research mentions, public-health forecasts)
//! into one normalized record collection, and provides the shared
//! filter/aggregate/paginate/export engine every dashboard view consumes.

pub mod aggregate;
pub mod commands;
pub mod display;
pub mod export;
pub mod filter;
pub mod normalize;
pub mod options;
pub mod paginate;
pub mod provider;
pub mod record;
pub mod refresh;
pub mod registry;

// Re-export commonly used types for easier testing
pub use filter::FilterState;
pub use provider::{RowProvider, SheetClient};
pub use record::Record;
pub use refresh::{RefreshController, RefreshOutcome};
pub use registry::SourceRegistry;
