use polars::prelude::DataFrame;
use pq_model::{MetricResult, columns};
use tracing::{info, warn};

use super::{Operands, complete_rows, insert_distribution, missing_result, operands};
use crate::error::Result;
use crate::stats::Distribution;

/// Largest deviation of one phase from the phase average, in percent of
/// the average. `None` when the average is zero or not finite.
pub fn row_imbalance(voltages: &[f64]) -> Option<f64> {
    let average = voltages.iter().sum::<f64>() / voltages.len() as f64;
    if average == 0.0 || !average.is_finite() {
        return None;
    }
    voltages
        .iter()
        .map(|u| (u - average).abs() / average * 100.0)
        .reduce(f64::max)
}

/// Per-row voltage imbalance over the three phase voltages.
pub fn voltage_imbalance(df: &DataFrame) -> Result<MetricResult> {
    let voltage_columns = match operands(df, &columns::PHASE_VOLTAGE)? {
        Operands::Present(columns) => columns,
        Operands::Missing(missing) => {
            warn!(missing = ?missing, "voltage columns not found");
            return Ok(missing_result(&missing));
        }
    };

    let imbalances: Vec<f64> = complete_rows(&voltage_columns)
        .filter_map(|row| row_imbalance(&row))
        .collect();
    let distribution = Distribution::from_values(&imbalances);

    let mut result = MetricResult::available().with("samples", distribution.count);
    insert_distribution(&mut result, "imbalance", "_percent", &distribution);
    info!(
        mean_percent = distribution.mean,
        p95_percent = distribution.p95,
        "voltage imbalance"
    );
    Ok(result)
}
