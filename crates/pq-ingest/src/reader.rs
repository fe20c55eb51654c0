//! Mapped-column loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use polars::prelude::*;
use pq_map::ColumnMapping;
use pq_model::columns;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};

/// Default row count per chunk in chunked mode.
pub const DEFAULT_CHUNK_SIZE: usize = 20_000;
/// File size above which [`LoadMode::Auto`] switches to chunked reading.
pub const CHUNK_THRESHOLD_BYTES: u64 = 100 * 1024 * 1024;
/// Chunks between progress messages.
const PROGRESS_EVERY_CHUNKS: usize = 10;

/// How rows are buffered while reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Chunked above [`LoadOptions::chunk_threshold_bytes`], single pass otherwise.
    #[default]
    Auto,
    SinglePass,
    Chunked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub mode: LoadMode,
    pub chunk_size: usize,
    pub chunk_threshold_bytes: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            mode: LoadMode::Auto,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_threshold_bytes: CHUNK_THRESHOLD_BYTES,
        }
    }
}

impl LoadOptions {
    /// Resolves [`LoadMode::Auto`] against the file size.
    pub fn effective_mode(&self, file_size: u64) -> LoadMode {
        match self.mode {
            LoadMode::Auto if file_size > self.chunk_threshold_bytes => LoadMode::Chunked,
            LoadMode::Auto => LoadMode::SinglePass,
            mode => mode,
        }
    }
}

/// Loaded data keyed by logical column name.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub data: DataFrame,
    pub rows_loaded: usize,
    /// Records with more fields than the header.
    pub skipped_records: usize,
    pub mode: LoadMode,
    pub chunks: usize,
}

/// Parses a decimal-comma number. Empty or malformed cells are `None`.
pub fn parse_decimal(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', ".").parse::<f64>().ok()
}

/// Loads only the mapped columns of a tab-separated export.
///
/// Required columns are checked before the file is opened. `datum` and `cas`
/// stay text; every other column is parsed with [`parse_decimal`].
pub fn load_mapped_columns<S: AsRef<str>>(
    path: &Path,
    mapping: &ColumnMapping,
    required: &[S],
    options: &LoadOptions,
) -> Result<LoadedTable> {
    mapping.ensure_required(required)?;

    let file_size = std::fs::metadata(path)
        .map_err(|e| IngestError::read(path, e))?
        .len();
    let mode = options.effective_mode(file_size);
    let chunk_rows = match mode {
        LoadMode::Chunked => Some(options.chunk_size.max(1)),
        LoadMode::Auto | LoadMode::SinglePass => None,
    };

    let mut selected: Vec<(&str, usize)> = mapping.resolved().collect();
    selected.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
    info!(
        path = %path.display(),
        columns = selected.len(),
        mode = ?mode,
        "loading mapped columns"
    );

    let file = File::open(path).map_err(|e| IngestError::read(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(BufReader::new(file));
    let parse_err = |source| IngestError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut record = csv::ByteRecord::new();
    if !reader.read_byte_record(&mut record).map_err(parse_err)? {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    let header_width = record.len();

    let mut buffers = ColumnBuffers::new(&selected);
    let mut frame: Option<DataFrame> = None;
    let mut rows_loaded = 0usize;
    let mut skipped_records = 0usize;
    let mut chunks = 0usize;

    while reader.read_byte_record(&mut record).map_err(parse_err)? {
        if record.len() > header_width {
            skipped_records += 1;
            continue;
        }
        buffers.push(&record);
        rows_loaded += 1;

        if chunk_rows.is_some_and(|limit| buffers.len() >= limit) {
            append(&mut frame, buffers.take_frame()?)?;
            chunks += 1;
            if chunks % PROGRESS_EVERY_CHUNKS == 0 {
                debug!(chunks, rows = rows_loaded, "loaded chunks");
            }
        }
    }
    if !buffers.is_empty() || frame.is_none() {
        append(&mut frame, buffers.take_frame()?)?;
        chunks += 1;
    }

    if skipped_records > 0 {
        warn!(
            skipped = skipped_records,
            "skipped records with more fields than the header"
        );
    }
    let data = frame.unwrap_or_else(DataFrame::empty);
    info!(rows = rows_loaded, chunks, "loading complete");

    Ok(LoadedTable {
        data,
        rows_loaded,
        skipped_records,
        mode,
        chunks,
    })
}

fn append(frame: &mut Option<DataFrame>, chunk: DataFrame) -> Result<()> {
    match frame {
        Some(existing) => {
            existing.vstack_mut(&chunk)?;
        }
        None => *frame = Some(chunk),
    }
    Ok(())
}

enum Values {
    Text(Vec<Option<String>>),
    Number(Vec<Option<f64>>),
}

struct ColumnBuffer {
    name: String,
    index: usize,
    values: Values,
}

/// Per-column row buffers flushed into a `DataFrame` per chunk.
struct ColumnBuffers {
    columns: Vec<ColumnBuffer>,
    rows: usize,
}

impl ColumnBuffers {
    fn new(selected: &[(&str, usize)]) -> Self {
        let columns = selected
            .iter()
            .map(|(name, index)| ColumnBuffer {
                name: (*name).to_string(),
                index: *index,
                values: if columns::is_text_column(name) {
                    Values::Text(Vec::new())
                } else {
                    Values::Number(Vec::new())
                },
            })
            .collect();
        Self { columns, rows: 0 }
    }

    fn push(&mut self, record: &csv::ByteRecord) {
        for column in &mut self.columns {
            let cell = record
                .get(column.index)
                .map(String::from_utf8_lossy)
                .unwrap_or_default();
            match &mut column.values {
                Values::Text(values) => {
                    let value = (!cell.trim().is_empty()).then(|| cell.into_owned());
                    values.push(value);
                }
                Values::Number(values) => values.push(parse_decimal(&cell)),
            }
        }
        self.rows += 1;
    }

    fn len(&self) -> usize {
        self.rows
    }

    fn is_empty(&self) -> bool {
        self.rows == 0
    }

    fn take_frame(&mut self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .columns
            .iter_mut()
            .map(|column| match &mut column.values {
                Values::Text(values) => {
                    Column::new(column.name.as_str().into(), std::mem::take(values))
                }
                Values::Number(values) => {
                    Column::new(column.name.as_str().into(), std::mem::take(values))
                }
            })
            .collect();
        self.rows = 0;
        Ok(DataFrame::new(columns)?)
    }
}
