//! Three-tier acceptance classification.

use pq_model::{
    AcceptanceReport, AnalysisConfig, CheckOutcome, CheckedMetric, ResultsRegister,
    ThresholdBand, Verdict,
};
use tracing::{info, warn};

use crate::names;

/// `value <= pass` is PASS, `value <= info` is INFO, anything else
/// (including NaN) is ALERT.
pub fn classify(value: f64, band: ThresholdBand) -> Verdict {
    if value <= band.pass {
        Verdict::Pass
    } else if value <= band.info {
        Verdict::Info
    } else {
        Verdict::Alert
    }
}

/// Register entry holding the graded value of a metric.
pub const fn source(metric: CheckedMetric) -> (&'static str, &'static str) {
    match metric {
        CheckedMetric::DeltaEPercent => (names::ENERGY_COMPARISON, "delta_e_percent"),
        CheckedMetric::PfDiffP95 => (names::POWER_FACTOR, "pf_diff_p95"),
        CheckedMetric::SVecErrP95 => (names::VECTOR_IDENTITY, "rel_err_p95"),
        CheckedMetric::VoltageImbalanceP95 => (names::VOLTAGE_IMBALANCE, "imbalance_p95_percent"),
    }
}

/// Grades every configured metric that has a value in the register.
/// Metrics without a value are omitted.
pub fn evaluate(register: &ResultsRegister, config: &AnalysisConfig) -> AcceptanceReport {
    let checks: Vec<CheckOutcome> = config
        .checked_metrics
        .iter()
        .filter_map(|&metric| {
            let (name, key) = source(metric);
            let value = register.value(name, key)?.as_f64()?;
            let band = config.thresholds.band(metric);
            Some(CheckOutcome {
                metric,
                value,
                band,
                verdict: classify(value, band),
            })
        })
        .collect();

    let report = AcceptanceReport::new(checks);
    for check in &report.checks {
        info!(metric = %check.metric, value = check.value, verdict = %check.verdict, "acceptance");
    }
    match report.overall() {
        Verdict::Alert => warn!(overall = %Verdict::Alert, "acceptance criteria violated"),
        overall => info!(overall = %overall, "acceptance"),
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pq_model::MetricResult;

    #[test]
    fn boundaries_are_inclusive() {
        let band = ThresholdBand::new(1.0, 3.0);
        assert_eq!(classify(1.0, band), Verdict::Pass);
        assert_eq!(classify(1.0001, band), Verdict::Info);
        assert_eq!(classify(3.0, band), Verdict::Info);
        assert_eq!(classify(3.0001, band), Verdict::Alert);
        assert_eq!(classify(f64::NAN, band), Verdict::Alert);
        assert_eq!(classify(f64::INFINITY, band), Verdict::Alert);
    }

    #[test]
    fn unavailable_metrics_are_omitted() {
        let mut register = ResultsRegister::new();
        register
            .insert(
                names::ENERGY_COMPARISON,
                MetricResult::unavailable("missing column P_L1N"),
            )
            .unwrap();
        register
            .insert(
                names::POWER_FACTOR,
                MetricResult::available().with("pf_diff_p95", 0.07),
            )
            .unwrap();
        let report = evaluate(&register, &AnalysisConfig::default());
        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.verdict(CheckedMetric::PfDiffP95), Some(Verdict::Info));
        assert_eq!(report.overall(), Verdict::Info);
    }

    #[test]
    fn empty_register_passes() {
        let report = evaluate(&ResultsRegister::new(), &AnalysisConfig::default());
        assert!(report.checks.is_empty());
        assert_eq!(report.overall(), Verdict::Pass);
    }

    #[test]
    fn only_configured_metrics_are_graded() {
        let mut register = ResultsRegister::new();
        register
            .insert(
                names::VECTOR_IDENTITY,
                MetricResult::available().with("rel_err_p95", 0.9),
            )
            .unwrap();
        assert!(evaluate(&register, &AnalysisConfig::default()).checks.is_empty());

        let config = AnalysisConfig {
            checked_metrics: vec![CheckedMetric::SVecErrP95],
            ..AnalysisConfig::default()
        };
        assert_eq!(evaluate(&register, &config).overall(), Verdict::Alert);
    }
}
