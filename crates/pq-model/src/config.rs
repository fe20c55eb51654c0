//! Analysis configuration.
//!
//! One explicit object carries the keyword table, aggregation preference,
//! acceptance thresholds and sampling tolerance. It is passed into the
//! resolver, the metrics engine and the classifier; nothing reads global
//! state.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::columns;
use crate::error::{ModelError, Result};

/// How the keywords of a [`KeywordSpec`] combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Every keyword must occur in the normalized header.
    #[default]
    All,
    /// At least one keyword must occur.
    Any,
}

/// Binds a logical column to the keywords that identify its header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSpec {
    /// Logical column name, e.g. `P_total`.
    pub name: String,
    /// Substrings searched in the normalized header.
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "is_default_mode")]
    pub mode: MatchMode,
    /// Scoring preference overriding [`AnalysisConfig::aggregation_preference`].
    /// Never affects eligibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefer: Option<Vec<String>>,
}

fn is_default_mode(mode: &MatchMode) -> bool {
    *mode == MatchMode::All
}

impl KeywordSpec {
    /// Creates an AND-semantics spec without its own preference list.
    pub fn all(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            mode: MatchMode::All,
            prefer: None,
        }
    }

    /// Creates an OR-semantics spec.
    pub fn any(name: &str, keywords: &[&str]) -> Self {
        Self {
            mode: MatchMode::Any,
            ..Self::all(name, keywords)
        }
    }

    #[must_use]
    pub fn with_preference(mut self, prefer: &[&str]) -> Self {
        self.prefer = Some(prefer.iter().map(|p| (*p).to_string()).collect());
        self
    }
}

/// Two-threshold acceptance band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBand {
    pub pass: f64,
    pub info: f64,
}

impl ThresholdBand {
    pub const fn new(pass: f64, info: f64) -> Self {
        Self { pass, info }
    }
}

/// Metrics the acceptance classifier knows how to grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckedMetric {
    /// Relative gap between total and phase-sum energy, in percent.
    DeltaEPercent,
    /// 95th percentile of |PF_measured - PF_calc|.
    PfDiffP95,
    /// 95th percentile of the vector power identity relative error.
    SVecErrP95,
    /// 95th percentile of the per-row voltage imbalance, in percent.
    VoltageImbalanceP95,
}

impl CheckedMetric {
    pub const ALL: [CheckedMetric; 4] = [
        CheckedMetric::DeltaEPercent,
        CheckedMetric::PfDiffP95,
        CheckedMetric::SVecErrP95,
        CheckedMetric::VoltageImbalanceP95,
    ];

    pub const fn key(&self) -> &'static str {
        match self {
            Self::DeltaEPercent => "delta_e_percent",
            Self::PfDiffP95 => "pf_diff_p95",
            Self::SVecErrP95 => "s_vec_err_p95",
            Self::VoltageImbalanceP95 => "voltage_imbalance_p95",
        }
    }
}

impl fmt::Display for CheckedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Acceptance bands, one per [`CheckedMetric`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub delta_e_percent: ThresholdBand,
    pub pf_diff_p95: ThresholdBand,
    pub s_vec_err_p95: ThresholdBand,
    pub voltage_imbalance_p95: ThresholdBand,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            delta_e_percent: ThresholdBand::new(1.0, 3.0),
            pf_diff_p95: ThresholdBand::new(0.05, 0.1),
            s_vec_err_p95: ThresholdBand::new(0.3, 0.6),
            voltage_imbalance_p95: ThresholdBand::new(2.0, 3.0),
        }
    }
}

impl Thresholds {
    pub fn band(&self, metric: CheckedMetric) -> ThresholdBand {
        match metric {
            CheckedMetric::DeltaEPercent => self.delta_e_percent,
            CheckedMetric::PfDiffP95 => self.pf_diff_p95,
            CheckedMetric::SVecErrP95 => self.s_vec_err_p95,
            CheckedMetric::VoltageImbalanceP95 => self.voltage_imbalance_p95,
        }
    }
}

/// Accepted date layouts for the `datum` column, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateLayout {
    #[serde(rename = "dd.mm.yyyy")]
    DayMonthYearDots,
    #[serde(rename = "yyyy-mm-dd")]
    YearMonthDayDashes,
    #[serde(rename = "dd/mm/yyyy")]
    DayMonthYearSlashes,
}

impl DateLayout {
    /// `chrono` pattern for the date part.
    pub const fn pattern(&self) -> &'static str {
        match self {
            Self::DayMonthYearDots => "%d.%m.%Y",
            Self::YearMonthDayDashes => "%Y-%m-%d",
            Self::DayMonthYearSlashes => "%d/%m/%Y",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::DayMonthYearDots => "dd.mm.yyyy",
            Self::YearMonthDayDashes => "yyyy-mm-dd",
            Self::DayMonthYearSlashes => "dd/mm/yyyy",
        }
    }
}

impl fmt::Display for DateLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Complete configuration of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Aggregation terms, best first. A header containing an earlier term
    /// outranks one containing a later term.
    pub aggregation_preference: Vec<String>,
    /// Logical columns whose absence aborts the run before loading data.
    pub required_columns: Vec<String>,
    /// Dominant-interval share below which sampling is flagged as mixed.
    pub mixed_sampling_threshold: f64,
    pub date_layouts: Vec<DateLayout>,
    /// Metrics graded by the acceptance classifier.
    pub checked_metrics: Vec<CheckedMetric>,
    pub thresholds: Thresholds,
    pub keyword_specs: Vec<KeywordSpec>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            aggregation_preference: ["priem", "avg", "mean", "priemer"]
                .into_iter()
                .map(String::from)
                .collect(),
            required_columns: columns::REQUIRED.iter().map(|c| (*c).to_string()).collect(),
            mixed_sampling_threshold: 0.95,
            date_layouts: vec![
                DateLayout::DayMonthYearDots,
                DateLayout::YearMonthDayDashes,
                DateLayout::DayMonthYearSlashes,
            ],
            checked_metrics: vec![CheckedMetric::DeltaEPercent, CheckedMetric::PfDiffP95],
            thresholds: Thresholds::default(),
            keyword_specs: default_keyword_specs(),
        }
    }
}

/// Built-in keyword table for Slovak/Czech instrument exports.
pub fn default_keyword_specs() -> Vec<KeywordSpec> {
    use crate::columns::{
        DATE, DPF_TOTAL, FREQUENCY, P_L1N, P_L2N, P_L3N, P_TOTAL, PF_TOTAL, Q_L1N, Q_L2N, Q_L3N,
        Q_TOTAL, S_L1N, S_L2N, S_L3N, S_TOTAL, THD_A_L1, THD_A_L2, THD_A_L3, THD_V_L1N,
        THD_V_L2N, THD_V_L3N, TIME, U_L1N, U_L2N, U_L3N,
    };

    vec![
        KeywordSpec::all(DATE, &["datum"]),
        KeywordSpec::all(TIME, &["cas"]),
        KeywordSpec::all(P_TOTAL, &["cinny", "vykon", "celkom"]),
        KeywordSpec::all(S_TOTAL, &["va", "full", "celkom"]),
        KeywordSpec::all(Q_TOTAL, &["var", "celkom"]),
        KeywordSpec::all(PF_TOTAL, &["pf", "celkom"]),
        KeywordSpec::all(DPF_TOTAL, &["dpf", "celkom"]),
        KeywordSpec::all(P_L1N, &["cinny", "vykon", "l1n"]),
        KeywordSpec::all(P_L2N, &["cinny", "vykon", "l2n"]),
        KeywordSpec::all(P_L3N, &["cinny", "vykon", "l3n"]),
        KeywordSpec::all(S_L1N, &["va", "full", "l1n"]),
        KeywordSpec::all(S_L2N, &["va", "full", "l2n"]),
        KeywordSpec::all(S_L3N, &["va", "full", "l3n"]),
        KeywordSpec::all(Q_L1N, &["var", "l1n"]),
        KeywordSpec::all(Q_L2N, &["var", "l2n"]),
        KeywordSpec::all(Q_L3N, &["var", "l3n"]),
        KeywordSpec::all(U_L1N, &["napatie", "l1n"]),
        KeywordSpec::all(U_L2N, &["napatie", "l2n"]),
        KeywordSpec::all(U_L3N, &["napatie", "l3n"]),
        KeywordSpec::all(FREQUENCY, &["frekvencia"]),
        KeywordSpec::all(THD_V_L1N, &["thd", "v", "l1n"]),
        KeywordSpec::all(THD_V_L2N, &["thd", "v", "l2n"]),
        KeywordSpec::all(THD_V_L3N, &["thd", "v", "l3n"]),
        KeywordSpec::all(THD_A_L1, &["thd", "a", "l1"]),
        KeywordSpec::all(THD_A_L2, &["thd", "a", "l2"]),
        KeywordSpec::all(THD_A_L3, &["thd", "a", "l3"]),
    ]
}

impl AnalysisConfig {
    /// Parses and validates a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ModelError::ConfigParse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ModelError::ConfigParse {
            message: e.to_string(),
        })
    }

    /// Looks up the spec for a logical column.
    pub fn spec(&self, name: &str) -> Option<&KeywordSpec> {
        self.keyword_specs.iter().find(|spec| spec.name == name)
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for spec in &self.keyword_specs {
            if spec.name.trim().is_empty() {
                return Err(invalid("keyword spec with empty logical name"));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(invalid(format!(
                    "logical column '{}' is declared more than once",
                    spec.name
                )));
            }
            if spec.keywords.is_empty() || spec.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(invalid(format!(
                    "logical column '{}' needs at least one non-empty keyword",
                    spec.name
                )));
            }
        }
        for required in &self.required_columns {
            if !seen.contains(required.as_str()) {
                return Err(invalid(format!(
                    "required column '{required}' has no keyword spec"
                )));
            }
        }
        if !(self.mixed_sampling_threshold > 0.0 && self.mixed_sampling_threshold <= 1.0) {
            return Err(invalid(format!(
                "mixed_sampling_threshold must be in (0, 1], got {}",
                self.mixed_sampling_threshold
            )));
        }
        if self.date_layouts.is_empty() {
            return Err(invalid("at least one date layout is required"));
        }
        for metric in CheckedMetric::ALL {
            let band = self.thresholds.band(metric);
            if band.pass.is_nan() || band.info.is_nan() || band.pass > band.info {
                return Err(invalid(format!(
                    "threshold '{metric}' needs pass <= info, got pass={} info={}",
                    band.pass, band.info
                )));
            }
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ModelError {
    ModelError::InvalidConfig(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        AnalysisConfig::default().validate().unwrap();
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = AnalysisConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = AnalysisConfig::from_toml_str(&text).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let parsed = AnalysisConfig::from_toml_str(
            "mixed_sampling_threshold = 0.9\n\n[thresholds.delta_e_percent]\npass = 0.5\ninfo = 2.0\n",
        )
        .unwrap();
        assert_eq!(parsed.mixed_sampling_threshold, 0.9);
        assert_eq!(parsed.thresholds.delta_e_percent, ThresholdBand::new(0.5, 2.0));
        assert_eq!(parsed.thresholds.pf_diff_p95, ThresholdBand::new(0.05, 0.1));
        assert_eq!(parsed.keyword_specs, default_keyword_specs());
    }

    #[test]
    fn duplicate_logical_names_are_rejected() {
        let mut config = AnalysisConfig::default();
        config
            .keyword_specs
            .push(KeywordSpec::all(columns::P_TOTAL, &["p"]));
        assert!(matches!(
            config.validate(),
            Err(ModelError::InvalidConfig(message)) if message.contains("P_total")
        ));
    }

    #[test]
    fn empty_keyword_list_is_rejected() {
        let mut config = AnalysisConfig::default();
        config.keyword_specs.push(KeywordSpec::all("X", &[]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_band_is_rejected() {
        let mut config = AnalysisConfig::default();
        config.thresholds.pf_diff_p95 = ThresholdBand::new(0.2, 0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_mixed_threshold_is_rejected() {
        let config = AnalysisConfig {
            mixed_sampling_threshold: 1.5,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn keyword_spec_builders() {
        let spec = KeywordSpec::any("F", &["frekvencia", "frequency"]).with_preference(&["avg"]);
        assert_eq!(spec.mode, MatchMode::Any);
        assert_eq!(spec.prefer, Some(vec!["avg".to_string()]));
    }
}
