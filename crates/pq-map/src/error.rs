//! Error types for column resolution.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Required logical columns that matched no header.
    #[error("required columns not found: {}", .missing.join(", "))]
    MissingRequiredColumns { missing: Vec<String> },
}

pub type Result<T> = std::result::Result<T, MapError>;
