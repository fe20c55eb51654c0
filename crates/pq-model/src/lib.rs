pub mod columns;
pub mod config;
pub mod error;
pub mod metric;
pub mod verdict;

pub use config::{
    AnalysisConfig, CheckedMetric, DateLayout, KeywordSpec, MatchMode, ThresholdBand, Thresholds,
    default_keyword_specs,
};
pub use error::{ModelError, Result};
pub use metric::{MetricResult, MetricValue, ResultsRegister};
pub use verdict::{AcceptanceReport, CheckOutcome, Verdict};
