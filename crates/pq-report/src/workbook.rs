//! XLSX workbook combining the summary, validations, time series, data
//! quality and mapping log.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use pq_map::MappingLogEntry;
use pq_metrics::{AnalyzedFrame, MetricsSummary, names};
use pq_model::MetricValue;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{info, warn};

use crate::error::Result;
use crate::summary::DataQuality;
use crate::timeseries::timeseries_frame;

pub const SUMMARY_SHEET: &str = "summary";
pub const VALIDATION_SHEET: &str = "validation";
pub const TIMESERIES_SHEET: &str = "timeseries_power";
pub const DATA_QUALITY_SHEET: &str = "data_quality";
pub const MAPPING_LOG_SHEET: &str = "mapping_log";

/// Sheet names in workbook order.
pub const SHEETS: [&str; 5] = [
    SUMMARY_SHEET,
    VALIDATION_SHEET,
    TIMESERIES_SHEET,
    DATA_QUALITY_SHEET,
    MAPPING_LOG_SHEET,
];

/// Time-series rows beyond this are truncated.
pub const MAX_TIMESERIES_ROWS: usize = 1_000_000;

/// Results listed on the validation sheet.
const VALIDATIONS: [(&str, &str); 3] = [
    (names::POWER_BALANCE_P, "P: sum of phases vs total"),
    (names::POWER_BALANCE_S, "S: sum of phases vs total"),
    (names::VECTOR_IDENTITY, "Vector identity (S² = P² + Q²)"),
];

/// Writes the five-sheet workbook.
pub fn write_workbook(
    summary: &MetricsSummary,
    quality: &DataQuality,
    mapping_log: &[MappingLogEntry],
    frame: &AnalyzedFrame,
    path: &Path,
) -> Result<PathBuf> {
    let bold = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet().set_name(SUMMARY_SHEET)?;
    write_summary_sheet(sheet, summary, &bold)?;

    let sheet = workbook.add_worksheet().set_name(VALIDATION_SHEET)?;
    write_validation_sheet(sheet, summary, &bold)?;

    let sheet = workbook.add_worksheet().set_name(TIMESERIES_SHEET)?;
    let df = timeseries_frame(frame)?;
    write_frame(sheet, &df, &bold)?;

    let sheet = workbook.add_worksheet().set_name(DATA_QUALITY_SHEET)?;
    write_data_quality_sheet(sheet, quality, &bold)?;

    let sheet = workbook.add_worksheet().set_name(MAPPING_LOG_SHEET)?;
    write_mapping_sheet(sheet, mapping_log, &bold)?;

    workbook.save(path)?;
    info!(path = %path.display(), "wrote workbook");
    Ok(path.to_path_buf())
}

fn write_header(sheet: &mut Worksheet, titles: &[&str], bold: &Format) -> Result<()> {
    for (col, title) in titles.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, bold)?;
    }
    Ok(())
}

/// Non-finite numbers are written as text; the format has no NaN.
fn write_value(sheet: &mut Worksheet, row: u32, col: u16, value: &MetricValue) -> Result<()> {
    match value {
        MetricValue::Number(n) if n.is_finite() => sheet.write_number(row, col, *n)?,
        MetricValue::Count(n) => sheet.write_number(row, col, *n as f64)?,
        MetricValue::Flag(flag) => sheet.write_boolean(row, col, *flag)?,
        other => sheet.write_string(row, col, other.to_string())?,
    };
    Ok(())
}

/// One `=== SECTION ===` block per flattened section, blank row between.
fn write_summary_sheet(
    sheet: &mut Worksheet,
    summary: &MetricsSummary,
    bold: &Format,
) -> Result<()> {
    write_header(sheet, &["Metric", "Value"], bold)?;
    let mut row = 1u32;
    let mut current: Option<String> = None;
    for (key, value) in summary.flatten() {
        let (section, name) = key.split_once('.').unwrap_or(("", key.as_str()));
        if current.as_deref() != Some(section) {
            if current.is_some() {
                row += 1;
            }
            let title = format!("=== {} ===", section.to_uppercase());
            sheet.write_string_with_format(row, 0, title, bold)?;
            row += 1;
            current = Some(section.to_string());
        }
        sheet.write_string(row, 0, name)?;
        write_value(sheet, row, 1, &value)?;
        row += 1;
    }
    Ok(())
}

fn write_validation_sheet(
    sheet: &mut Worksheet,
    summary: &MetricsSummary,
    bold: &Format,
) -> Result<()> {
    write_header(sheet, &["Validation", "Value"], bold)?;
    let mut row = 1u32;
    for (name, title) in VALIDATIONS {
        let Some(result) = summary.results.get(name) else {
            continue;
        };
        sheet.write_string_with_format(row, 0, title, bold)?;
        row += 1;
        if !result.available {
            sheet.write_string(row, 0, "  unavailable")?;
            sheet.write_string(row, 1, result.reason.as_deref().unwrap_or_default())?;
            row += 2;
            continue;
        }
        for (key, value) in &result.values {
            sheet.write_string(row, 0, format!("  {key}"))?;
            write_value(sheet, row, 1, value)?;
            row += 1;
        }
        row += 1;
    }
    Ok(())
}

fn write_frame(sheet: &mut Worksheet, df: &DataFrame, bold: &Format) -> Result<()> {
    let height = df.height();
    let rows = height.min(MAX_TIMESERIES_ROWS);
    if rows < height {
        warn!(rows = height, kept = rows, "time series truncated for the workbook");
    }

    for (col, column) in df.get_columns().iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, column.name().as_str(), bold)?;
        if column.dtype() == &DataType::String {
            for (row, cell) in column.str()?.into_iter().take(rows).enumerate() {
                if let Some(text) = cell {
                    sheet.write_string(row as u32 + 1, col, text)?;
                }
            }
        } else {
            let numbers = column.cast(&DataType::Float64)?;
            for (row, cell) in numbers.f64()?.into_iter().take(rows).enumerate() {
                if let Some(n) = cell.filter(|n| n.is_finite()) {
                    sheet.write_number(row as u32 + 1, col, n)?;
                }
            }
        }
    }
    Ok(())
}

fn write_data_quality_sheet(
    sheet: &mut Worksheet,
    quality: &DataQuality,
    bold: &Format,
) -> Result<()> {
    write_header(sheet, &["Rank", "Interval (s)", "Count", "Percent"], bold)?;
    let mut row = 1u32;
    for (rank, share) in quality.top_intervals.iter().enumerate() {
        sheet.write_string(row, 0, format!("Interval {}", rank + 1))?;
        sheet.write_number(row, 1, share.seconds)?;
        sheet.write_number(row, 2, share.count as f64)?;
        sheet.write_number(row, 3, share.percent)?;
        row += 1;
    }

    row += 1;
    let mut figures = vec![
        ("Dropped rows", MetricValue::from(quality.dropped_rows)),
        ("Skipped records", MetricValue::from(quality.skipped_records)),
        ("Mixed sampling", MetricValue::from(quality.mixed_sampling)),
    ];
    if let Some(preclean) = &quality.preclean {
        figures.extend([
            ("Pre-clean lines", MetricValue::from(preclean.total_lines)),
            ("Pre-clean lines modified", MetricValue::from(preclean.lines_modified)),
            ("Encoding errors", MetricValue::from(preclean.encoding_errors)),
            ("Source encoding", MetricValue::from(preclean.source_encoding.label())),
        ]);
    }
    for (label, value) in &figures {
        sheet.write_string(row, 0, *label)?;
        write_value(sheet, row, 1, value)?;
        row += 1;
    }
    Ok(())
}

fn write_mapping_sheet(
    sheet: &mut Worksheet,
    mapping_log: &[MappingLogEntry],
    bold: &Format,
) -> Result<()> {
    write_header(sheet, &["target", "source", "index"], bold)?;
    for (row, entry) in mapping_log.iter().enumerate() {
        let row = row as u32 + 1;
        sheet.write_string(row, 0, &entry.target)?;
        sheet.write_string(row, 1, &entry.source)?;
        sheet.write_number(row, 2, entry.index as f64)?;
    }
    Ok(())
}
