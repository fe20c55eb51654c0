use polars::prelude::DataFrame;
use pq_model::{MetricResult, columns};
use tracing::{info, warn};

use super::{Operands, complete_rows, insert_distribution, missing_result, operands};
use crate::error::Result;
use crate::stats::Distribution;

/// Apparent power below which rows are excluded, in VA.
const MIN_APPARENT_VA: f64 = 1.0;

/// Checks `S^2 = P^2 + Q^2` on rows with measured `S > 1 VA`.
pub fn vector_identity(df: &DataFrame) -> Result<MetricResult> {
    let names = [columns::P_TOTAL, columns::Q_TOTAL, columns::S_TOTAL];
    let operand_columns = match operands(df, &names)? {
        Operands::Present(columns) => columns,
        Operands::Missing(missing) => {
            warn!(missing = ?missing, "columns not found, skipping vector validation");
            return Ok(missing_result(&missing));
        }
    };

    let errors: Vec<f64> = complete_rows(&operand_columns)
        .filter(|row| row[2] > MIN_APPARENT_VA)
        .map(|row| {
            let (p, q, s) = (row[0], row[1], row[2]);
            let s_calc = p.hypot(q);
            (s - s_calc).abs() / s
        })
        .collect();
    let distribution = Distribution::from_values(&errors);

    let mut result = MetricResult::available().with("samples_used", errors.len());
    insert_distribution(&mut result, "rel_err", "", &distribution);
    info!(
        samples = errors.len(),
        mean = distribution.mean,
        p95 = distribution.p95,
        "vector validation"
    );
    Ok(result)
}
