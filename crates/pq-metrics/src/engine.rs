//! Stage-by-stage orchestration of one analysis run.

use polars::prelude::DataFrame;
use pq_model::{AnalysisConfig, ResultsRegister, columns};
use tracing::info;

use crate::acceptance::evaluate;
use crate::checks::{
    frequency, power_balance, power_factor, vector_identity, voltage_imbalance,
};
use crate::energy::{calculate_energy, compare_energy};
use crate::error::Result;
use crate::frame::AnalyzedFrame;
use crate::names;
use crate::sampling::analyze_sampling;
use crate::summary::MetricsSummary;
use crate::timestamp::build_timestamp;

/// Output of [`MetricsEngine::run`].
#[derive(Debug, Clone)]
pub struct Analysis {
    pub summary: MetricsSummary,
    pub frame: AnalyzedFrame,
}

/// Runs every stage in a fixed order against one configuration.
#[derive(Debug, Clone, Copy)]
pub struct MetricsEngine<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> MetricsEngine<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, data: DataFrame) -> Result<Analysis> {
        let timestamped = build_timestamp(
            data,
            columns::DATE,
            columns::TIME,
            &self.config.date_layouts,
        )?;
        let sampled = analyze_sampling(timestamped, self.config.mixed_sampling_threshold);

        let mut register = ResultsRegister::new();
        register.insert(names::SAMPLING, sampled.profile.to_result())?;

        let energy_total = calculate_energy(&sampled, columns::P_TOTAL)?;
        register.insert(names::ENERGY_TOTAL, energy_total.to_result())?;
        register.insert(
            names::ENERGY_COMPARISON,
            compare_energy(&sampled, &energy_total)?,
        )?;

        let df = sampled.data();
        let pf = power_factor(df)?;
        register.insert(names::POWER_FACTOR, pf.result)?;
        register.insert(
            names::POWER_BALANCE_P,
            power_balance(df, columns::P_TOTAL, &columns::PHASE_ACTIVE)?,
        )?;
        register.insert(
            names::POWER_BALANCE_S,
            power_balance(df, columns::S_TOTAL, &columns::PHASE_APPARENT)?,
        )?;
        register.insert(names::VECTOR_IDENTITY, vector_identity(df)?)?;
        register.insert(names::FREQUENCY, frequency(df)?)?;
        register.insert(names::VOLTAGE_IMBALANCE, voltage_imbalance(df)?)?;

        let acceptance = evaluate(&register, self.config);
        let timestamped = &sampled.timestamped;
        let summary = MetricsSummary {
            measurement_start: timestamped.start(),
            measurement_end: timestamped.end(),
            duration_hours: timestamped.duration_hours(),
            total_samples: timestamped.height(),
            dropped_rows: timestamped.dropped_rows,
            date_layout: timestamped.layout.to_string(),
            results: register,
            acceptance,
        };
        info!(
            samples = summary.total_samples,
            hours = summary.duration_hours,
            overall = %summary.acceptance.overall(),
            "analysis complete"
        );

        Ok(Analysis {
            summary,
            frame: AnalyzedFrame::new(sampled, pf.pf_calc),
        })
    }
}
