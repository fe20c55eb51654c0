//! JSON summary document.

use std::path::{Path, PathBuf};

use chrono::Utc;
use pq_ingest::PrecleanStats;
use pq_metrics::{Analysis, IntervalShare, MetricsSummary};
use serde::Serialize;
use tracing::info;

use crate::error::{ReportError, Result};

const REPORT_SCHEMA: &str = "pq-analysis-summary";
const REPORT_SCHEMA_VERSION: u32 = 1;

/// Degradations observed while cleaning, loading and timestamping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataQuality {
    /// Rows removed because their timestamp did not parse.
    pub dropped_rows: usize,
    /// Records with more fields than the header.
    pub skipped_records: usize,
    pub mixed_sampling: bool,
    pub top_intervals: Vec<IntervalShare>,
    /// `None` when pre-cleaning was skipped.
    pub preclean: Option<PrecleanStats>,
}

impl DataQuality {
    /// Collects the quality figures of one analysis run.
    pub fn from_analysis(
        analysis: &Analysis,
        skipped_records: usize,
        preclean: Option<PrecleanStats>,
    ) -> Self {
        let profile = &analysis.frame.sampled.profile;
        Self {
            dropped_rows: analysis.summary.dropped_rows,
            skipped_records,
            mixed_sampling: profile.mixed_sampling,
            top_intervals: profile.top_intervals.clone(),
            preclean,
        }
    }
}

#[derive(Serialize)]
struct SummaryPayload<'a> {
    schema: &'static str,
    schema_version: u32,
    generated_at: String,
    input_file: Option<&'a Path>,
    data_quality: &'a DataQuality,
    #[serde(flatten)]
    summary: &'a MetricsSummary,
}

/// Writes the summary as pretty JSON. Non-finite numbers become `null`.
pub fn write_summary_json(
    summary: &MetricsSummary,
    quality: &DataQuality,
    input_file: Option<&Path>,
    path: &Path,
) -> Result<PathBuf> {
    let payload = SummaryPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        input_file,
        data_quality: quality,
        summary,
    };
    let json = serde_json::to_string_pretty(&payload)?;
    std::fs::write(path, format!("{json}\n")).map_err(|e| ReportError::write(path, e))?;
    info!(path = %path.display(), "wrote summary");
    Ok(path.to_path_buf())
}
