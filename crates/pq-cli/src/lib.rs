//! CLI library components for the power-quality analyzer.

pub mod logging;
pub mod pipeline;
