//! Error types for pre-cleaning and ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while cleaning or loading an export.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file does not exist.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// File has no header line.
    #[error("file is empty: {path}")]
    EmptyFile { path: PathBuf },

    /// Tab-separated record could not be read.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    // === Schema Errors ===
    /// Required logical columns are not mapped.
    #[error(transparent)]
    Mapping(#[from] pq_map::MapError),

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    pub(crate) fn read(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::EmptyFile {
            path: PathBuf::from("/data/export.txt"),
        };
        assert_eq!(err.to_string(), "file is empty: /data/export.txt");
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("P_total".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }

    #[test]
    fn test_not_found_is_classified() {
        let io = std::io::Error::from(std::io::ErrorKind::NotFound);
        let err = IngestError::read(std::path::Path::new("missing.txt"), io);
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }
}
