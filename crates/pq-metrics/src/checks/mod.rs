//! Physics-based cross-validations.
//!
//! Every check reports `available: false` when one of its columns is not
//! loaded; a missing optional column is never an error. Rows with a missing
//! operand are skipped.

mod balance;
mod frequency;
mod imbalance;
mod power_factor;
mod vector;

use polars::prelude::DataFrame;
use pq_model::MetricResult;

use crate::error::Result;
use crate::frame::f64_values;
use crate::stats::Distribution;

pub use balance::power_balance;
pub use frequency::frequency;
pub use imbalance::voltage_imbalance;
pub use power_factor::{PowerFactorOutcome, power_factor};
pub use vector::vector_identity;

/// Additive guard in relative-error denominators.
pub const EPSILON: f64 = 1e-6;

/// Loaded columns, or the names of those that are missing.
pub(crate) enum Operands {
    Present(Vec<Vec<Option<f64>>>),
    Missing(Vec<String>),
}

pub(crate) fn operands(df: &DataFrame, names: &[&str]) -> Result<Operands> {
    let mut present = Vec::with_capacity(names.len());
    let mut missing = Vec::new();
    for name in names {
        match f64_values(df, name)? {
            Some(values) => present.push(values),
            None => missing.push((*name).to_string()),
        }
    }
    Ok(if missing.is_empty() {
        Operands::Present(present)
    } else {
        Operands::Missing(missing)
    })
}

pub(crate) fn missing_result(missing: &[String]) -> MetricResult {
    MetricResult::unavailable(format!("missing columns: {}", missing.join(", ")))
}

/// Rows where every operand is present and not NaN.
pub(crate) fn complete_rows(columns: &[Vec<Option<f64>>]) -> impl Iterator<Item = Vec<f64>> + '_ {
    let height = columns.first().map_or(0, Vec::len);
    (0..height).filter_map(move |row| {
        columns
            .iter()
            .map(|column| column.get(row).copied().flatten().filter(|v| !v.is_nan()))
            .collect::<Option<Vec<f64>>>()
    })
}

/// Writes `<prefix>_mean`, `_p50`, `_p95`, `_max`, plus `suffix` when given.
pub(crate) fn insert_distribution(
    result: &mut MetricResult,
    prefix: &str,
    suffix: &str,
    distribution: &Distribution,
) {
    result.insert(&format!("{prefix}_mean{suffix}"), distribution.mean);
    result.insert(&format!("{prefix}_p50{suffix}"), distribution.p50);
    result.insert(&format!("{prefix}_p95{suffix}"), distribution.p95);
    result.insert(&format!("{prefix}_max{suffix}"), distribution.max);
}
