//! Run summary and its flat key-value view.

use chrono::NaiveDateTime;
use pq_model::{AcceptanceReport, MetricValue, ResultsRegister};
use serde::Serialize;

use crate::frame::TIMESTAMP_FORMAT;

/// Measurement window plus every engine result and the acceptance report.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub measurement_start: Option<NaiveDateTime>,
    pub measurement_end: Option<NaiveDateTime>,
    pub duration_hours: f64,
    pub total_samples: usize,
    /// Rows removed by the timestamp stage.
    pub dropped_rows: usize,
    /// Date layout that produced the timestamps.
    pub date_layout: String,
    pub results: ResultsRegister,
    pub acceptance: AcceptanceReport,
}

impl MetricsSummary {
    /// `section.key -> value` pairs in engine order.
    pub fn flatten(&self) -> Vec<(String, MetricValue)> {
        let format = |t: &Option<NaiveDateTime>| {
            t.map_or_else(String::new, |t| t.format(TIMESTAMP_FORMAT).to_string())
        };
        let mut flat = vec![
            (
                "measurement.start".to_string(),
                MetricValue::Text(format(&self.measurement_start)),
            ),
            (
                "measurement.end".to_string(),
                MetricValue::Text(format(&self.measurement_end)),
            ),
            (
                "measurement.duration_hours".to_string(),
                MetricValue::Number(self.duration_hours),
            ),
            (
                "measurement.total_samples".to_string(),
                MetricValue::from(self.total_samples),
            ),
            (
                "measurement.dropped_rows".to_string(),
                MetricValue::from(self.dropped_rows),
            ),
            (
                "measurement.date_layout".to_string(),
                MetricValue::Text(self.date_layout.clone()),
            ),
        ];
        flat.extend(self.results.flatten());
        for check in &self.acceptance.checks {
            flat.push((
                format!("acceptance.{}", check.metric),
                MetricValue::Text(check.verdict.to_string()),
            ));
        }
        flat.push((
            "acceptance.overall".to_string(),
            MetricValue::Text(self.acceptance.overall().to_string()),
        ));
        flat
    }

    /// Looks up one flattened key.
    pub fn get(&self, key: &str) -> Option<MetricValue> {
        self.flatten()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}
