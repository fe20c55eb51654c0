//! Energy integration over the dominant sampling interval.

use pq_model::{MetricResult, columns};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{MetricsError, Result};
use crate::frame::SampledFrame;
use crate::stats::mean;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyResult {
    pub power_column: String,
    pub e_kwh: f64,
    pub p_mean_w: f64,
    pub p_min_w: f64,
    pub p_max_w: f64,
    /// Dominant interval in hours.
    pub dt_h: f64,
    /// Samples that contributed to the sum.
    pub samples: usize,
}

impl EnergyResult {
    pub fn to_result(&self) -> MetricResult {
        MetricResult::available()
            .with("power_column", self.power_column.as_str())
            .with("e_kwh", self.e_kwh)
            .with("p_mean_w", self.p_mean_w)
            .with("p_min_w", self.p_min_w)
            .with("p_max_w", self.p_max_w)
            .with("dt_h", self.dt_h)
            .with("samples", self.samples)
    }
}

/// `E_kWh = sum(P_W) * dt_mode_h / 1000`, skipping missing samples.
pub fn calculate_energy(sampled: &SampledFrame, power_column: &str) -> Result<EnergyResult> {
    let values = sampled
        .values(power_column)?
        .ok_or_else(|| MetricsError::column_not_found(power_column))?;
    let present: Vec<f64> = values.into_iter().flatten().filter(|v| !v.is_nan()).collect();

    let dt_h = sampled.profile.dt_mode_hours();
    let e_kwh = present.iter().sum::<f64>() * dt_h / 1000.0;
    let result = EnergyResult {
        power_column: power_column.to_string(),
        e_kwh,
        p_mean_w: mean(&present),
        p_min_w: present.iter().copied().reduce(f64::min).unwrap_or(f64::NAN),
        p_max_w: present.iter().copied().reduce(f64::max).unwrap_or(f64::NAN),
        dt_h,
        samples: present.len(),
    };
    info!(column = power_column, e_kwh, samples = result.samples, "integrated energy");
    Ok(result)
}

/// Relative gap between phase-sum and total energy, in percent.
///
/// Zero when both energies are zero, infinite when only the total is zero.
pub fn delta_e_percent(e_phase_sum: f64, e_total: f64) -> f64 {
    let gap = (e_phase_sum - e_total).abs();
    if e_total == 0.0 {
        if gap == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        gap / e_total.abs() * 100.0
    }
}

/// Compares total energy with the sum of per-phase energies.
///
/// Unavailable unless all three phase active-power columns are loaded.
pub fn compare_energy(sampled: &SampledFrame, total: &EnergyResult) -> Result<MetricResult> {
    let mut phase_energies = Vec::with_capacity(columns::PHASE_ACTIVE.len());
    for phase in columns::PHASE_ACTIVE {
        if sampled.values(phase)?.is_none() {
            warn!(column = phase, "phase column missing, skipping energy comparison");
            return Ok(MetricResult::unavailable(format!("missing column {phase}")));
        }
        phase_energies.push((phase, calculate_energy(sampled, phase)?.e_kwh));
    }

    let e_phase_sum: f64 = phase_energies.iter().map(|(_, e)| e).sum();
    let delta = delta_e_percent(e_phase_sum, total.e_kwh);
    let mut result = MetricResult::available()
        .with("e_total_kwh", total.e_kwh)
        .with("e_phase_sum_kwh", e_phase_sum)
        .with("delta_e_percent", delta);
    for (phase, energy) in &phase_energies {
        result.insert(&format!("e_{}_kwh", phase.to_lowercase()), *energy);
    }
    info!(delta_e_percent = delta, "energy comparison");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_e_handles_zero_total() {
        assert_eq!(delta_e_percent(0.0, 0.0), 0.0);
        assert_eq!(delta_e_percent(1.0, 0.0), f64::INFINITY);
        assert!((delta_e_percent(101.0, 100.0) - 1.0).abs() < 1e-12);
        assert!((delta_e_percent(-99.0, -100.0) - 1.0).abs() < 1e-12);
    }
}
