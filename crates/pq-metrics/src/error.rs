//! Error types for the metrics engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    /// A column the stage cannot run without is absent.
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    /// No date layout parsed a single row.
    #[error("no timestamps could be parsed from {rows} rows")]
    NoParsableTimestamps { rows: usize },

    #[error(transparent)]
    Model(#[from] pq_model::ModelError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl MetricsError {
    pub(crate) fn column_not_found(column: &str) -> Self {
        Self::ColumnNotFound {
            column: column.to_string(),
        }
    }
}

impl From<polars::prelude::PolarsError> for MetricsError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MetricsError>;
