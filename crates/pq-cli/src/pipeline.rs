//! Analysis pipeline stages used by the `analyze` and `headers` commands.
//!
//! Each stage maps its crate error into `anyhow` with context naming the
//! file involved; a fatal error in any stage aborts the run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use tracing::{info, info_span, warn};

use pq_ingest::{
    FileInfo, LoadMode, LoadOptions, LoadedTable, PrecleanStats, default_output_path,
    estimate_file_info, load_mapped_columns, preclean_file, read_header,
};
use pq_map::{Resolution, resolve};
use pq_metrics::{Analysis, MetricsEngine};
use pq_model::{AnalysisConfig, Verdict};
use pq_report::{DataQuality, ReportPaths, ReportWriter};

/// Exit code for a completed run with the given overall verdict.
pub fn exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Info => 1,
        Verdict::Alert => 2,
    }
}

/// Options for one `analyze` run.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub config: AnalysisConfig,
    pub skip_preclean: bool,
    pub load: LoadOptions,
    /// Report directory; `None` skips export.
    pub output_dir: Option<PathBuf>,
}

/// Everything produced by [`analyze_file`].
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub input: PathBuf,
    /// File actually loaded: the cleaned copy unless pre-cleaning was skipped.
    pub data_file: PathBuf,
    pub file_info: FileInfo,
    pub preclean: Option<PrecleanStats>,
    pub resolution: Resolution,
    pub rows_loaded: usize,
    pub skipped_records: usize,
    pub load_mode: LoadMode,
    pub analysis: Analysis,
    pub quality: DataQuality,
    pub reports: Option<ReportPaths>,
}

impl AnalysisRun {
    pub fn verdict(&self) -> Verdict {
        self.analysis.summary.acceptance.overall()
    }

    pub fn exit_code(&self) -> i32 {
        exit_code(self.verdict())
    }
}

/// Writes `<stem>_clean.txt` next to the input unless `skip` is set.
pub fn prepare_input(input: &Path, skip: bool) -> Result<(PathBuf, Option<PrecleanStats>)> {
    if skip {
        info!(path = %input.display(), "pre-cleaning skipped");
        return Ok((input.to_path_buf(), None));
    }
    let output = default_output_path(input);
    let stats = preclean_file(input, &output)
        .with_context(|| format!("pre-clean {}", input.display()))?;
    Ok((output, Some(stats)))
}

/// Reads the header line and resolves it without checking required columns.
pub fn resolve_headers(path: &Path, config: &AnalysisConfig) -> Result<Resolution> {
    let headers = read_header(path).with_context(|| format!("read header of {}", path.display()))?;
    info!(columns = headers.len(), "read header");
    Ok(resolve(
        &headers,
        &config.keyword_specs,
        &config.aggregation_preference,
    ))
}

/// Runs pre-cleaning, resolution, loading, the metrics engine and export.
pub fn analyze_file(
    input: &Path,
    options: &AnalyzeOptions,
    progress: &ProgressBar,
) -> Result<AnalysisRun> {
    let span = info_span!("analyze", input = %input.display());
    let _guard = span.enter();
    let config = &options.config;
    config.validate().context("validate configuration")?;

    progress.set_message("pre-cleaning");
    let (data_file, preclean) = prepare_input(input, options.skip_preclean)?;
    if let Some(stats) = &preclean
        && stats.encoding_errors > 0
    {
        warn!(lines = stats.encoding_errors, "lines with undecodable bytes");
    }

    let file_info = estimate_file_info(&data_file)
        .with_context(|| format!("inspect {}", data_file.display()))?;
    info!(
        size_mb = file_info.size_mb,
        rows = file_info.estimated_rows,
        columns = file_info.estimated_cols,
        "file info"
    );

    progress.set_message("resolving columns");
    let resolution = resolve_headers(&data_file, config)?;
    resolution
        .ensure_required(&config.required_columns)
        .context("resolve required columns")?;

    progress.set_message("loading data");
    let LoadedTable {
        data,
        rows_loaded,
        skipped_records,
        mode,
        ..
    } = load_mapped_columns(
        &data_file,
        &resolution.mapping,
        &config.required_columns,
        &options.load,
    )
    .with_context(|| format!("load {}", data_file.display()))?;

    progress.set_message("computing metrics");
    let analysis = MetricsEngine::new(config)
        .run(data)
        .context("compute metrics")?;
    let quality = DataQuality::from_analysis(&analysis, skipped_records, preclean.clone());

    let reports = match &options.output_dir {
        Some(dir) => {
            progress.set_message("writing reports");
            let writer = ReportWriter::new(dir)
                .with_context(|| format!("create output directory {}", dir.display()))?;
            let paths = writer
                .write_all(
                    &analysis.summary,
                    &quality,
                    Some(input),
                    &resolution.log,
                    &analysis.frame,
                )
                .context("write reports")?;
            Some(paths)
        }
        None => None,
    };

    Ok(AnalysisRun {
        input: input.to_path_buf(),
        data_file,
        file_info,
        preclean,
        resolution,
        rows_loaded,
        skipped_records,
        load_mode: mode,
        analysis,
        quality,
        reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_verdict() {
        assert_eq!(exit_code(Verdict::Pass), 0);
        assert_eq!(exit_code(Verdict::Info), 1);
        assert_eq!(exit_code(Verdict::Alert), 2);
    }
}
