use polars::prelude::DataFrame;
use pq_model::MetricResult;
use tracing::{info, warn};

use super::{EPSILON, Operands, complete_rows, insert_distribution, missing_result, operands};
use crate::error::Result;
use crate::stats::Distribution;

/// Relative error of the phase sum against the total:
/// `|sum(phases) - total| / (|total| + 1e-6)`.
pub fn power_balance(df: &DataFrame, total: &str, phases: &[&str]) -> Result<MetricResult> {
    let mut names = vec![total];
    names.extend_from_slice(phases);
    let columns = match operands(df, &names)? {
        Operands::Present(columns) => columns,
        Operands::Missing(missing) => {
            warn!(total, missing = ?missing, "columns not found, skipping power balance");
            return Ok(missing_result(&missing));
        }
    };

    let errors: Vec<f64> = complete_rows(&columns)
        .map(|row| {
            let phase_sum: f64 = row[1..].iter().sum();
            (phase_sum - row[0]).abs() / (row[0].abs() + EPSILON)
        })
        .collect();
    let distribution = Distribution::from_values(&errors);

    let mut result = MetricResult::available()
        .with("total_column", total)
        .with("phase_columns", phases.join(","))
        .with("samples", distribution.count);
    insert_distribution(&mut result, "rel_err", "", &distribution);
    info!(
        total,
        mean = distribution.mean,
        p95 = distribution.p95,
        "power balance"
    );
    Ok(result)
}
