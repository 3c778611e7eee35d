//! Synthetic real-estate listing dataset generator.
//!
//! One seeded pipeline: independent field generators, same-row
//! cross-field composition, corruption (outliers, missingness,
//! duplicates, shuffle), and CSV persistence with a summary report.

pub mod catalog;
pub mod compose;
pub mod config;
pub mod corrupt;
pub mod engine;
pub mod error;
pub mod fields;
pub mod output;
pub mod record;
pub mod report;

pub use config::DatasetConfig;
pub use corrupt::CorruptionSummary;
pub use engine::{GenerationEngine, GenerationResult};
pub use error::GenerationError;
pub use record::{COLUMNS, ColumnKind, ColumnSpec, ListingRecord};
pub use report::DatasetReport;
