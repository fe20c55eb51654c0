use polars::prelude::DataFrame;
use pq_model::{MetricResult, columns};
use tracing::{info, warn};

use super::{EPSILON, insert_distribution};
use crate::error::Result;
use crate::frame::f64_values;
use crate::stats::{Distribution, mean};

/// Result of the power-factor check plus the derived `PF_calc` column.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerFactorOutcome {
    pub result: MetricResult,
    /// `None` when active or apparent power is not loaded.
    pub pf_calc: Option<Vec<Option<f64>>>,
}

/// `PF_calc = clip(P / (S + 1e-6), -1, 1)`, compared with the measured
/// power factor when that column is loaded.
pub fn power_factor(df: &DataFrame) -> Result<PowerFactorOutcome> {
    let (Some(p), Some(s)) = (
        f64_values(df, columns::P_TOTAL)?,
        f64_values(df, columns::S_TOTAL)?,
    ) else {
        warn!("active or apparent power missing, skipping power factor");
        return Ok(PowerFactorOutcome {
            result: MetricResult::unavailable(format!(
                "missing columns: {}, {}",
                columns::P_TOTAL,
                columns::S_TOTAL
            )),
            pf_calc: None,
        });
    };

    let pf_calc: Vec<Option<f64>> = p
        .iter()
        .zip(&s)
        .map(|(p, s)| match (p, s) {
            (Some(p), Some(s)) => Some((p / (s + EPSILON)).clamp(-1.0, 1.0)),
            _ => None,
        })
        .collect();
    let calculated = Distribution::from_values(&pf_calc.iter().flatten().copied().collect::<Vec<_>>());

    let mut result = MetricResult::available()
        .with("pf_calc_mean", calculated.mean)
        .with("pf_calc_min", calculated.min)
        .with("pf_calc_max", calculated.max);

    if let Some(measured) = f64_values(df, columns::PF_TOTAL)? {
        let measured_present: Vec<f64> = measured.iter().flatten().copied().collect();
        let diffs: Vec<f64> = measured
            .iter()
            .zip(&pf_calc)
            .filter_map(|(m, c)| Some((m.as_ref()? - c.as_ref()?).abs()))
            .collect();
        let distribution = Distribution::from_values(&diffs);
        result.insert("pf_measured_mean", mean(&measured_present));
        insert_distribution(&mut result, "pf_diff", "", &distribution);
        info!(
            mean = distribution.mean,
            p95 = distribution.p95,
            "power factor difference"
        );
    } else {
        info!(pf_calc_mean = calculated.mean, "no measured power factor column");
    }

    Ok(PowerFactorOutcome {
        result,
        pf_calc: Some(pf_calc),
    })
}
