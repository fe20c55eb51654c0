//! Power-quality export ingestion.
//!
//! This crate repairs raw instrument exports and loads the columns selected
//! by the column resolver into Polars DataFrames.
//!
//! # Features
//!
//! - **Pre-cleaning**: encoding repair and decimal-literal fixes
//! - **Header reading**: positional header strings for the resolver
//! - **Mapped loading**: only resolved columns, decimal comma, optional chunking

mod encoding;
mod error;
mod header;
mod preclean;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Pre-cleaning ===
pub use encoding::{SourceEncoding, decode};
pub use preclean::{PrecleanStats, clean_line, default_output_path, preclean_file};

// === Reading ===
pub use header::{FileInfo, estimate_file_info, read_header, split_header_line};
pub use reader::{
    CHUNK_THRESHOLD_BYTES, DEFAULT_CHUNK_SIZE, LoadMode, LoadOptions, LoadedTable,
    load_mapped_columns, parse_decimal,
};
