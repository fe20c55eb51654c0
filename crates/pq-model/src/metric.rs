//! Metric results and the write-once results register.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{ModelError, Result};

/// One scalar statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Count(u64),
    Flag(bool),
    Text(String),
}

impl MetricValue {
    /// Numeric view; counts are widened, flags and text have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Count(value) => Some(*value as f64),
            Self::Flag(_) | Self::Text(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) if value.is_finite() => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    write!(f, "{value:.1}")
                } else {
                    write!(f, "{value:.6}")
                }
            }
            Self::Number(value) => write!(f, "{value}"),
            Self::Count(value) => write!(f, "{value}"),
            Self::Flag(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        Self::Count(value)
    }
}

impl From<usize> for MetricValue {
    fn from(value: usize) -> Self {
        Self::Count(value as u64)
    }
}

impl From<bool> for MetricValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Flat set of named statistics produced by one engine stage.
///
/// An unavailable result carries the reason instead of values; missing input
/// columns never make a check fail.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MetricResult {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub values: BTreeMap<String, MetricValue>,
}

impl MetricResult {
    pub fn available() -> Self {
        Self {
            available: true,
            reason: None,
            values: BTreeMap::new(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            reason: Some(reason.into()),
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<MetricValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<MetricValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.values.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(MetricValue::as_f64)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some(MetricValue::Flag(value)) => Some(*value),
            _ => None,
        }
    }
}

/// Results keyed by name, each written once.
///
/// Iteration follows insertion order so summaries list stages in the order
/// the engine ran them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsRegister {
    entries: Vec<(String, MetricResult)>,
}

impl ResultsRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a result. A second insert under the same name is rejected.
    pub fn insert(&mut self, name: &str, result: MetricResult) -> Result<()> {
        if self.contains(name) {
            return Err(ModelError::DuplicateResult {
                name: name.to_string(),
            });
        }
        self.entries.push((name.to_string(), result));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    pub fn get(&self, name: &str) -> Option<&MetricResult> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, result)| result)
    }

    /// Looks up `result.key` when the result is available.
    pub fn value(&self, name: &str, key: &str) -> Option<&MetricValue> {
        self.get(name)
            .filter(|result| result.available)
            .and_then(|result| result.get(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricResult)> {
        self.entries
            .iter()
            .map(|(name, result)| (name.as_str(), result))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens every result to `name.key -> value`, including an
    /// `name.available` flag per result.
    pub fn flatten(&self) -> Vec<(String, MetricValue)> {
        let mut flat = Vec::new();
        for (name, result) in &self.entries {
            flat.push((
                format!("{name}.available"),
                MetricValue::Flag(result.available),
            ));
            for (key, value) in &result.values {
                flat.push((format!("{name}.{key}"), value.clone()));
            }
        }
        flat
    }
}

impl Serialize for ResultsRegister {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, result) in &self.entries {
            map.serialize_entry(name, result)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_second_write() {
        let mut register = ResultsRegister::new();
        register
            .insert("frequency", MetricResult::available().with("mean", 50.0))
            .unwrap();
        let err = register
            .insert("frequency", MetricResult::unavailable("no column"))
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateResult { name } if name == "frequency"));
        assert_eq!(register.get("frequency").and_then(|r| r.number("mean")), Some(50.0));
    }

    #[test]
    fn value_ignores_unavailable_results() {
        let mut register = ResultsRegister::new();
        let mut result = MetricResult::unavailable("missing phases");
        result.insert("delta_e_percent", 0.5);
        register.insert("energy_comparison", result).unwrap();
        assert!(register.value("energy_comparison", "delta_e_percent").is_none());
    }

    #[test]
    fn flatten_keeps_insertion_order() {
        let mut register = ResultsRegister::new();
        register
            .insert("sampling", MetricResult::available().with("dt_mode_s", 60.0))
            .unwrap();
        register
            .insert("energy_total", MetricResult::available().with("samples", 3usize))
            .unwrap();
        let keys: Vec<String> = register.flatten().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            [
                "sampling.available",
                "sampling.dt_mode_s",
                "energy_total.available",
                "energy_total.samples"
            ]
        );
    }

    #[test]
    fn count_widens_to_number() {
        assert_eq!(MetricValue::Count(7).as_f64(), Some(7.0));
        assert_eq!(MetricValue::Flag(true).as_f64(), None);
    }
}
