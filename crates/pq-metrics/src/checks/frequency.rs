use polars::prelude::DataFrame;
use pq_model::{MetricResult, columns};
use tracing::info;

use crate::error::Result;
use crate::frame::f64_values;
use crate::stats::{Distribution, sample_std};

/// Mean, extremes and sample standard deviation of the grid frequency.
pub fn frequency(df: &DataFrame) -> Result<MetricResult> {
    let Some(values) = f64_values(df, columns::FREQUENCY)? else {
        return Ok(MetricResult::unavailable(format!(
            "missing column {}",
            columns::FREQUENCY
        )));
    };
    let present: Vec<f64> = values.into_iter().flatten().collect();
    let distribution = Distribution::from_values(&present);
    let std = sample_std(&present);

    info!(mean_hz = distribution.mean, std_hz = std, "frequency");
    Ok(MetricResult::available()
        .with("f_mean_hz", distribution.mean)
        .with("f_min_hz", distribution.min)
        .with("f_max_hz", distribution.max)
        .with("f_std_hz", std)
        .with("samples", distribution.count))
}
