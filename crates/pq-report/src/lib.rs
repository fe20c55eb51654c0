//! Report export for power-quality analyses.
//!
//! - **Summary**: pretty JSON of the metrics summary and data-quality figures
//! - **Mapping log**: `target,source,index` CSV
//! - **Time series**: tab-separated analyzed frame
//! - **Workbook**: XLSX with summary, validation, time-series, data-quality
//!   and mapping-log sheets

mod error;
mod mapping_log;
mod summary;
mod timeseries;
mod workbook;
mod writer;

pub use error::{ReportError, Result};
pub use mapping_log::write_mapping_log;
pub use summary::{DataQuality, write_summary_json};
pub use timeseries::{TIMESERIES_COLUMNS, timeseries_frame, write_timeseries};
pub use workbook::{
    DATA_QUALITY_SHEET, MAPPING_LOG_SHEET, MAX_TIMESERIES_ROWS, SHEETS, SUMMARY_SHEET,
    TIMESERIES_SHEET, VALIDATION_SHEET, write_workbook,
};
pub use writer::{ReportPaths, ReportWriter};
