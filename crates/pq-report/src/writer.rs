//! Timestamped artifact naming inside one output directory.

use std::path::{Path, PathBuf};

use chrono::Local;
use pq_map::MappingLogEntry;
use pq_metrics::{AnalyzedFrame, MetricsSummary};
use serde::Serialize;

use crate::error::{ReportError, Result};
use crate::mapping_log::write_mapping_log;
use crate::summary::{DataQuality, write_summary_json};
use crate::timeseries::write_timeseries;
use crate::workbook::write_workbook;

/// Paths of the artifacts written by [`ReportWriter::write_all`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPaths {
    pub summary: PathBuf,
    pub mapping_log: PathBuf,
    pub timeseries: PathBuf,
    pub workbook: PathBuf,
}

/// Writes `pq_analysis_<YYYYmmdd_HHMMSS>_*` artifacts into one directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    stem: String,
}

impl ReportWriter {
    /// Creates the directory and stamps artifact names with the local time.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let stem = format!("pq_analysis_{}", Local::now().format("%Y%m%d_%H%M%S"));
        Self::with_stem(output_dir, stem)
    }

    /// Same as [`ReportWriter::new`] with a fixed artifact stem.
    pub fn with_stem(output_dir: impl Into<PathBuf>, stem: impl Into<String>) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir).map_err(|source| ReportError::CreateDir {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self {
            output_dir,
            stem: stem.into(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn summary_path(&self) -> PathBuf {
        self.artifact("summary.json")
    }

    pub fn mapping_log_path(&self) -> PathBuf {
        self.artifact("mapping_log.csv")
    }

    pub fn timeseries_path(&self) -> PathBuf {
        self.artifact("timeseries.tsv")
    }

    /// `<stem>.xlsx`
    pub fn workbook_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.xlsx", self.stem))
    }

    fn artifact(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{}_{suffix}", self.stem))
    }

    pub fn write_all(
        &self,
        summary: &MetricsSummary,
        quality: &DataQuality,
        input_file: Option<&Path>,
        mapping_log: &[MappingLogEntry],
        frame: &AnalyzedFrame,
    ) -> Result<ReportPaths> {
        Ok(ReportPaths {
            summary: write_summary_json(summary, quality, input_file, &self.summary_path())?,
            mapping_log: write_mapping_log(mapping_log, &self.mapping_log_path())?,
            timeseries: write_timeseries(frame, &self.timeseries_path())?,
            workbook: write_workbook(
                summary,
                quality,
                mapping_log,
                frame,
                &self.workbook_path(),
            )?,
        })
    }
}
