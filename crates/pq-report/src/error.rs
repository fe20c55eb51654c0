//! Error types for report export.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing report artifacts.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write mapping log: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Metrics(#[from] pq_metrics::MetricsError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl ReportError {
    pub(crate) fn write(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<polars::prelude::PolarsError> for ReportError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
