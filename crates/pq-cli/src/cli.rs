//! CLI argument definitions for the power-quality analyzer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pq",
    version,
    about = "Power-quality export analyzer",
    long_about = "Analyze tab-separated power-quality instrument exports.\n\n\
                  Resolves localized column headers, integrates energy, cross-validates\n\
                  power measurements and grades the results against acceptance thresholds.\n\
                  Exit code: 0 PASS, 1 INFO or error, 2 ALERT."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze one export and write the report artifacts.
    Analyze(AnalyzeArgs),

    /// Show how the export's headers resolve to logical columns.
    Headers(HeadersArgs),

    /// Print the default analysis configuration as TOML.
    Config,
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Tab-separated instrument export.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory for the summary, mapping log, time series and workbook.
    #[arg(long = "output-dir", short = 'o', value_name = "DIR", default_value = "results")]
    pub output_dir: PathBuf,

    /// Read the input as-is instead of writing a `<stem>_clean.txt` copy first.
    #[arg(long = "skip-preclean")]
    pub skip_preclean: bool,

    /// Rows per chunk; implies chunked loading.
    #[arg(long = "chunk-size", value_name = "ROWS", conflicts_with = "load_mode")]
    pub chunk_size: Option<usize>,

    /// Load strategy (auto switches to chunked above 100 MB).
    #[arg(long = "load-mode", value_enum, default_value = "auto")]
    pub load_mode: LoadModeArg,

    /// TOML analysis configuration (keywords, thresholds, layouts).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the summary without writing report files.
    #[arg(long = "no-export")]
    pub no_export: bool,
}

#[derive(Parser)]
pub struct HeadersArgs {
    /// Tab-separated instrument export.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// TOML analysis configuration.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LoadModeArg {
    Auto,
    Single,
    Chunked,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
