//! Tab-separated time-series export of the analyzed frame.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use pq_metrics::AnalyzedFrame;
use pq_model::columns;
use tracing::info;

use crate::error::{ReportError, Result};

/// Exported columns in output order; absent ones are skipped.
pub const TIMESERIES_COLUMNS: [&str; 20] = [
    columns::TIMESTAMP,
    columns::DT,
    columns::P_TOTAL,
    columns::S_TOTAL,
    columns::Q_TOTAL,
    columns::PF_TOTAL,
    columns::PF_CALC,
    columns::P_L1N,
    columns::P_L2N,
    columns::P_L3N,
    columns::S_L1N,
    columns::S_L2N,
    columns::S_L3N,
    columns::Q_L1N,
    columns::Q_L2N,
    columns::Q_L3N,
    columns::U_L1N,
    columns::U_L2N,
    columns::U_L3N,
    columns::FREQUENCY,
];

/// Materializes the analyzed frame restricted to [`TIMESERIES_COLUMNS`].
pub fn timeseries_frame(frame: &AnalyzedFrame) -> Result<DataFrame> {
    let full = frame.to_dataframe()?;
    let present: Vec<&str> = TIMESERIES_COLUMNS
        .iter()
        .copied()
        .filter(|name| full.column(name).is_ok())
        .collect();
    Ok(full.select(present)?)
}

/// Writes the time series with a header row, tab-separated.
pub fn write_timeseries(frame: &AnalyzedFrame, path: &Path) -> Result<PathBuf> {
    let mut df = timeseries_frame(frame)?;
    let mut file = std::fs::File::create(path).map_err(|e| ReportError::write(path, e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b'\t')
        .finish(&mut df)?;
    info!(path = %path.display(), rows = df.height(), "wrote time series");
    Ok(path.to_path_buf())
}
