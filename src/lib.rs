//! # dataset-usage - Dataset Licence Reports
//!
//! Pulls dataset metadata records from the gateway's document store, flattens
//! their nested fields into a table and classifies each dataset by what its
//! usage terms allow.
//!
//! ## Modules
//!
//! - **collector**: run the dataset aggregation against a document store
//! - **flatten**: turn nested documents into single-level records
//! - **table**: build a table from flattened records
//! - **classify**: commercial-use and not-for-profit rules
//! - **project**: reduce a classified subset to the export columns
//! - **export**: write tables as CSV
//! - **report**: run every stage and write the three exports
//!
//! ## Quick Start
//!
//! ```rust
//! use dataset_usage::{flatten, FlattenConfig, Report};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), dataset_usage::ReportError> {
//! let record = flatten(json!({"datasetfields": {"datautility": {"title": "Asthma"}}}));
//! assert_eq!(record["datasetfields_datautility_title"], "Asthma");
//!
//! let documents = vec![json!({
//!     "_id": "5f3f98068af2ef61552e1d75",
//!     "pid": "b7a62c6d",
//!     "datasetfields": {
//!         "datautility": {"allowable_uses": "Platinum", "title": "Asthma"},
//!         "metadataschema": {"url": "https://example.org/asthma"}
//!     },
//!     "datasetv2": {
//!         "accessibility": {"usage": {"dataUseLimitation": null, "dataUseRequirements": null}},
//!         "summary": {"publisher": {"name": "SAIL", "memberOf": "ALLIANCE"}}
//!     }
//! })];
//!
//! let report = Report::build(documents, &FlattenConfig::default())?;
//! assert_eq!(report.summary().commercial, 1);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod collector;
pub mod config;
pub mod error;
pub mod export;
pub mod flatten;
pub mod project;
pub mod report;
pub mod schema;
pub mod table;
pub mod types;

// Re-export commonly used types for convenience
pub use collector::{DocumentStore, JsonFileStore, MongoStore};
pub use config::Config;
pub use error::{ReportError, Result};
pub use flatten::{flatten, Flattener};
pub use report::{run_report, Report, ReportPaths, ReportSummary};
pub use table::Table;
pub use types::{FlattenConfig, Record};

/// Main entry point: connect to the configured database and write the exports
pub fn export_reports(
    config: &Config,
    paths: &ReportPaths,
    flatten_config: &FlattenConfig,
) -> Result<ReportSummary> {
    let store = MongoStore::connect(config)?;
    run_report(&store, &config.collection, paths, flatten_config)
}
