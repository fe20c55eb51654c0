use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use pq_cli::pipeline::{AnalysisRun, AnalyzeOptions, analyze_file, resolve_headers};
use pq_ingest::{LoadMode, LoadOptions};
use pq_map::Resolution;
use pq_model::AnalysisConfig;

use crate::cli::{AnalyzeArgs, HeadersArgs, LoadModeArg};

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalysisRun> {
    let config = load_config(args.config.as_deref())?;
    let options = AnalyzeOptions {
        config,
        skip_preclean: args.skip_preclean,
        load: load_options(args),
        output_dir: (!args.no_export).then(|| args.output_dir.clone()),
    };

    let progress = stage_spinner()?;
    let run = analyze_file(&args.input, &options, &progress);
    progress.finish_and_clear();
    let run = run?;
    info!(verdict = %run.verdict(), "analysis finished");
    Ok(run)
}

/// `--chunk-size` cannot be combined with `--load-mode`, so a chunk size
/// always means chunked loading.
fn load_options(args: &AnalyzeArgs) -> LoadOptions {
    let mut load = LoadOptions {
        mode: match args.load_mode {
            LoadModeArg::Auto => LoadMode::Auto,
            LoadModeArg::Single => LoadMode::SinglePass,
            LoadModeArg::Chunked => LoadMode::Chunked,
        },
        ..LoadOptions::default()
    };
    if let Some(chunk_size) = args.chunk_size {
        load.mode = LoadMode::Chunked;
        load.chunk_size = chunk_size;
    }
    load
}

pub fn run_headers(args: &HeadersArgs) -> Result<Resolution> {
    let config = load_config(args.config.as_deref())?;
    resolve_headers(&args.input, &config)
}

pub fn run_config() -> Result<()> {
    let toml = AnalysisConfig::default()
        .to_toml_string()
        .context("render default configuration")?;
    print!("{toml}");
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("load configuration {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

/// Spinner on stderr; hidden when stderr is not a terminal.
fn stage_spinner() -> Result<ProgressBar> {
    if !io::stderr().is_terminal() {
        return Ok(ProgressBar::hidden());
    }
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("progress template")?,
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    Ok(progress)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};

    fn analyze_args(args: &[&str]) -> Result<AnalyzeArgs, clap::Error> {
        let cli = Cli::try_parse_from(["pq", "analyze", "export.txt"].iter().chain(args))?;
        match cli.command {
            Command::Analyze(args) => Ok(args),
            _ => unreachable!("analyze subcommand"),
        }
    }

    #[test]
    fn chunk_size_implies_chunked_loading() {
        let load = load_options(&analyze_args(&["--chunk-size", "500"]).unwrap());
        assert_eq!(load.mode, LoadMode::Chunked);
        assert_eq!(load.chunk_size, 500);
    }

    #[test]
    fn explicit_load_mode_is_kept() {
        let load = load_options(&analyze_args(&["--load-mode", "single"]).unwrap());
        assert_eq!(load.mode, LoadMode::SinglePass);
        assert_eq!(load.chunk_size, LoadOptions::default().chunk_size);
    }

    #[test]
    fn chunk_size_conflicts_with_load_mode() {
        let err = analyze_args(&["--chunk-size", "500", "--load-mode", "single"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
