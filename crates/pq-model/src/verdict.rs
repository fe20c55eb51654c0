//! Acceptance tiers.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::config::{CheckedMetric, ThresholdBand};

/// Acceptance tier, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Info,
    Alert,
}

impl Verdict {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Info => "INFO",
            Self::Alert => "ALERT",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grade of one checked metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub metric: CheckedMetric,
    pub value: f64,
    pub band: ThresholdBand,
    pub verdict: Verdict,
}

/// Per-metric verdicts. The overall tier is derived on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcceptanceReport {
    pub checks: Vec<CheckOutcome>,
}

impl AcceptanceReport {
    pub fn new(checks: Vec<CheckOutcome>) -> Self {
        Self { checks }
    }

    /// ALERT if any check alerts, PASS if every check passes (vacuously for
    /// an empty report), INFO otherwise.
    pub fn overall(&self) -> Verdict {
        self.checks
            .iter()
            .map(|check| check.verdict)
            .max()
            .unwrap_or(Verdict::Pass)
    }

    pub fn verdict(&self, metric: CheckedMetric) -> Option<Verdict> {
        self.checks
            .iter()
            .find(|check| check.metric == metric)
            .map(|check| check.verdict)
    }
}

impl Serialize for AcceptanceReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AcceptanceReport", 2)?;
        state.serialize_field("overall", &self.overall())?;
        state.serialize_field("checks", &self.checks)?;
        state.end()
    }
}
