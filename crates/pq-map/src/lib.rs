//! Column resolution: header normalization and fuzzy keyword matching.

pub mod error;
pub mod normalize;
pub mod resolver;
pub mod types;

pub use error::{MapError, Result};
pub use normalize::{normalize, word_count};
pub use resolver::{ColumnResolver, resolve, resolve_columns};
pub use types::{ColumnCandidate, ColumnMapping, MappingLogEntry, NOT_FOUND, Resolution};
