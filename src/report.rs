//! End-to-end report run: collect, flatten, tabulate, classify, export

use crate::classify::{commercial_datasets, not_for_profit_datasets};
use crate::collector::{collect, DocumentStore};
use crate::error::Result;
use crate::export::write_csv;
use crate::flatten::Flattener;
use crate::project::project_for_export;
use crate::schema::DatasetColumns;
use crate::table::Table;
use crate::types::FlattenConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub const FULL_EXPORT: &str = "gateway-datasets.csv";
pub const COMMERCIAL_EXPORT: &str = "commercial-datasets.csv";
pub const NOT_FOR_PROFIT_EXPORT: &str = "non-commercial-datasets.csv";

/// Destinations of the three exports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub full: PathBuf,
    pub commercial: PathBuf,
    pub not_for_profit: PathBuf,
}

impl ReportPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        ReportPaths {
            full: dir.join(FULL_EXPORT),
            commercial: dir.join(COMMERCIAL_EXPORT),
            not_for_profit: dir.join(NOT_FOR_PROFIT_EXPORT),
        }
    }
}

impl Default for ReportPaths {
    fn default() -> Self {
        ReportPaths::in_dir(".")
    }
}

/// Row counts of the exports written by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub commercial: usize,
    pub not_for_profit: usize,
}

/// The three tables a run exports
#[derive(Debug, Clone)]
pub struct Report {
    pub full: Table,
    pub commercial: Table,
    pub not_for_profit: Table,
}

impl Report {
    /// Tabulate and classify already-collected documents
    ///
    /// # Errors
    ///
    /// Fails when an allowable-use value is not a string or when the
    /// tabulated columns lack a field the exports need.
    pub fn build(documents: Vec<serde_json::Value>, config: &FlattenConfig) -> Result<Self> {
        let flattener = Flattener::new(config.clone());
        let columns = DatasetColumns::new(flattener.separator());

        let records = flattener.flatten_all(documents);
        let full = Table::from_records(&records);
        info!(rows = full.len(), columns = full.columns().len(), "Tabulated datasets");

        let commercial = project_for_export(commercial_datasets(&full, &columns)?, &columns)?;
        let not_for_profit =
            project_for_export(not_for_profit_datasets(&full, &columns)?, &columns)?;

        Ok(Report {
            full,
            commercial,
            not_for_profit,
        })
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            total: self.full.len(),
            commercial: self.commercial.len(),
            not_for_profit: self.not_for_profit.len(),
        }
    }

    /// Write all three exports
    pub fn write(&self, paths: &ReportPaths) -> Result<()> {
        write_csv(&self.full, &paths.full)?;
        write_csv(&self.commercial, &paths.commercial)?;
        write_csv(&self.not_for_profit, &paths.not_for_profit)?;
        Ok(())
    }
}

/// Collect datasets from `store` and write the full, commercial and
/// not-for-profit exports
///
/// Nothing is written unless every stage succeeds.
pub fn run_report<S: DocumentStore + ?Sized>(
    store: &S,
    collection: &str,
    paths: &ReportPaths,
    config: &FlattenConfig,
) -> Result<ReportSummary> {
    let documents = collect(store, collection)?;
    let report = Report::build(documents, config)?;
    report.write(paths)?;

    let summary = report.summary();
    info!(
        total = summary.total,
        commercial = summary.commercial,
        not_for_profit = summary.not_for_profit,
        "Report complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_paths() {
        let paths = ReportPaths::default();

        assert_eq!(paths.full, Path::new("./gateway-datasets.csv"));
        assert_eq!(paths.commercial, Path::new("./commercial-datasets.csv"));
        assert_eq!(paths.not_for_profit, Path::new("./non-commercial-datasets.csv"));
    }

    #[test]
    fn test_build_without_documents_fails_projection() {
        let err = Report::build(vec![], &FlattenConfig::default()).unwrap_err();
        assert!(matches!(err, crate::error::ReportError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_build_with_custom_separator() {
        let documents = vec![json!({
            "_id": "1",
            "pid": "p-1",
            "datasetfields": {
                "datautility": {"allowable_uses": "Gold", "title": "Asthma"},
                "metadataschema": {"url": "https://example.org/1"}
            },
            "datasetv2": {
                "accessibility": {"usage": {"dataUseLimitation": "", "dataUseRequirements": ""}},
                "summary": {"publisher": {"name": "SAIL", "memberOf": "ALLIANCE"}}
            }
        })];

        let report = Report::build(documents, &FlattenConfig::with_separator(".")).unwrap();

        assert!(report
            .full
            .columns()
            .contains(&"datasetfields.datautility.title".to_string()));
        assert_eq!(
            report.summary(),
            ReportSummary {
                total: 1,
                commercial: 1,
                not_for_profit: 0
            }
        );
        assert_eq!(report.commercial.get(0, "Dataset Name").unwrap(), "Asthma");
    }
}
