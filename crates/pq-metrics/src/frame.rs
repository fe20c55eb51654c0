//! Stage records passed between engine stages.
//!
//! Each stage consumes the previous record and returns a new one, so a stage
//! that needs sampling information cannot be called on a frame that has not
//! been through sampling analysis.

use chrono::NaiveDateTime;
use polars::prelude::*;
use pq_model::{DateLayout, columns};
use serde::Serialize;

use crate::error::Result;
use crate::sampling::SamplingProfile;

/// Format used when timestamps are materialized as text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Engine stage that produced a derived column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Timestamp,
    Sampling,
    PowerFactor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedColumn {
    pub name: &'static str,
    pub stage: Stage,
}

/// Numeric view of a column, cast to `f64` when stored otherwise.
/// `Ok(None)` when the column does not exist.
pub fn f64_values(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<f64>>>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let cast = column.cast(&DataType::Float64)?;
    let values = cast.f64()?.into_iter().collect();
    Ok(Some(values))
}

/// Text view of a column. `Ok(None)` when the column does not exist.
pub fn str_values(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<String>>>> {
    let Ok(column) = df.column(name) else {
        return Ok(None);
    };
    let cast = column.cast(&DataType::String)?;
    let values = cast
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Ok(Some(values))
}

/// Rows with a parsed timestamp, sorted ascending.
#[derive(Debug, Clone)]
pub struct TimestampedFrame {
    pub data: DataFrame,
    pub timestamps: Vec<NaiveDateTime>,
    pub layout: DateLayout,
    /// Rows removed because their date or time did not parse.
    pub dropped_rows: usize,
}

impl TimestampedFrame {
    pub fn height(&self) -> usize {
        self.timestamps.len()
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.timestamps.first().copied()
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.timestamps.last().copied()
    }

    pub fn duration_hours(&self) -> f64 {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => micros(end - start) as f64 / 3_600_000_000.0,
            _ => 0.0,
        }
    }

    pub fn values(&self, name: &str) -> Result<Option<Vec<Option<f64>>>> {
        f64_values(&self.data, name)
    }
}

/// Timestamped rows plus inter-sample intervals and the sampling profile.
#[derive(Debug, Clone)]
pub struct SampledFrame {
    pub timestamped: TimestampedFrame,
    /// Seconds since the previous row; `None` for the first row.
    pub dt: Vec<Option<f64>>,
    pub profile: SamplingProfile,
}

impl SampledFrame {
    pub fn data(&self) -> &DataFrame {
        &self.timestamped.data
    }

    pub fn height(&self) -> usize {
        self.timestamped.height()
    }

    pub fn values(&self, name: &str) -> Result<Option<Vec<Option<f64>>>> {
        self.timestamped.values(name)
    }
}

/// Sampled rows plus the columns computed by the checks.
#[derive(Debug, Clone)]
pub struct AnalyzedFrame {
    pub sampled: SampledFrame,
    pub pf_calc: Option<Vec<Option<f64>>>,
}

impl AnalyzedFrame {
    pub fn new(sampled: SampledFrame, pf_calc: Option<Vec<Option<f64>>>) -> Self {
        Self { sampled, pf_calc }
    }

    pub fn height(&self) -> usize {
        self.sampled.height()
    }

    /// Derived columns in the order they were produced.
    pub fn derived_columns(&self) -> Vec<DerivedColumn> {
        let mut derived = vec![
            DerivedColumn {
                name: columns::TIMESTAMP,
                stage: Stage::Timestamp,
            },
            DerivedColumn {
                name: columns::DT,
                stage: Stage::Sampling,
            },
        ];
        if self.pf_calc.is_some() {
            derived.push(DerivedColumn {
                name: columns::PF_CALC,
                stage: Stage::PowerFactor,
            });
        }
        derived
    }

    /// Loaded columns with `timestamp` and `dt` in front and `PF_calc` last.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let timestamps: Vec<String> = self
            .sampled
            .timestamped
            .timestamps
            .iter()
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            .collect();

        let mut frame_columns = vec![
            Column::new(columns::TIMESTAMP.into(), timestamps),
            Column::new(columns::DT.into(), self.sampled.dt.clone()),
        ];
        frame_columns.extend(self.sampled.data().get_columns().iter().cloned());
        if let Some(pf_calc) = &self.pf_calc {
            frame_columns.push(Column::new(columns::PF_CALC.into(), pf_calc.clone()));
        }
        Ok(DataFrame::new(frame_columns)?)
    }
}

/// Signed duration in whole microseconds, saturating on overflow.
pub(crate) fn micros(delta: chrono::TimeDelta) -> i64 {
    delta
        .num_microseconds()
        .unwrap_or_else(|| delta.num_milliseconds().saturating_mul(1000))
}
