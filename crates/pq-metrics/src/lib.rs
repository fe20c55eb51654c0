//! Power-quality metrics engine.
//!
//! Stages run in a fixed order, each consuming the record of the previous
//! one: timestamps, sampling analysis, energy integration, cross-validations
//! and finally acceptance classification against configured thresholds.

pub mod acceptance;
pub mod checks;
pub mod energy;
pub mod engine;
pub mod error;
pub mod frame;
pub mod names;
pub mod sampling;
pub mod stats;
pub mod summary;
pub mod timestamp;

pub use acceptance::{classify, evaluate};
pub use energy::{EnergyResult, calculate_energy, compare_energy, delta_e_percent};
pub use engine::{Analysis, MetricsEngine};
pub use error::{MetricsError, Result};
pub use frame::{AnalyzedFrame, DerivedColumn, SampledFrame, Stage, TimestampedFrame};
pub use sampling::{IntervalShare, SamplingProfile, analyze_sampling, profile_intervals};
pub use summary::MetricsSummary;
pub use timestamp::{build_timestamp, parse_timestamp};
