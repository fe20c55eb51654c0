use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration parse error: {message}")]
    ConfigParse { message: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("result '{name}' was already recorded")]
    DuplicateResult { name: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
