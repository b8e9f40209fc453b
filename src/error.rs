use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the dataset usage reports.
///
/// Every variant is fatal: the run stops at the first failure and no
/// partial exports are recovered.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("document store error: {0}")]
    Connection(#[from] mongodb::error::Error),

    #[error("failed to read documents from {path}: {message}")]
    Source { path: PathBuf, message: String },

    #[error("column not found: {column}")]
    SchemaMismatch { column: String },

    #[error("column {column} at row {row} must be a string or null, found {found}")]
    FieldType {
        column: String,
        row: usize,
        found: String,
    },

    #[error("failed to write {path}")]
    Export {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ReportError {
    pub(crate) fn missing_column(column: impl Into<String>) -> Self {
        ReportError::SchemaMismatch {
            column: column.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
