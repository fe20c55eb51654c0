//! Tests for pq-model types.

use pq_model::{
    AnalysisConfig, CheckedMetric, MetricResult, ResultsRegister, ThresholdBand, columns,
};

#[test]
fn metric_result_serializes_flat() {
    let result = MetricResult::available()
        .with("E_kWh", 1.5)
        .with("samples", 60usize)
        .with("power_column", columns::P_TOTAL);
    let json = serde_json::to_value(&result).expect("serialize result");
    assert_eq!(json["available"], true);
    assert_eq!(json["E_kWh"], 1.5);
    assert_eq!(json["samples"], 60);
    assert_eq!(json["power_column"], "P_total");
    assert!(json.get("reason").is_none());
}

#[test]
fn unavailable_result_carries_reason() {
    let json = serde_json::to_value(MetricResult::unavailable("missing column F"))
        .expect("serialize result");
    assert_eq!(json["available"], false);
    assert_eq!(json["reason"], "missing column F");
}

#[test]
fn register_serializes_in_insertion_order() {
    let mut register = ResultsRegister::new();
    register
        .insert("sampling", MetricResult::available().with("mixed_sampling", false))
        .expect("first insert");
    register
        .insert("frequency", MetricResult::unavailable("missing column F"))
        .expect("second insert");
    let json = serde_json::to_string(&register).expect("serialize register");
    let sampling = json.find("\"sampling\"").expect("sampling key");
    let frequency = json.find("\"frequency\"").expect("frequency key");
    assert!(sampling < frequency);
}

#[test]
fn config_toml_overrides_checked_metrics() {
    let config = AnalysisConfig::from_toml_str(
        r#"
checked_metrics = ["delta_e_percent", "s_vec_err_p95", "voltage_imbalance_p95"]

[thresholds.voltage_imbalance_p95]
pass = 1.5
info = 2.5
"#,
    )
    .expect("parse config");
    assert_eq!(
        config.checked_metrics,
        [
            CheckedMetric::DeltaEPercent,
            CheckedMetric::SVecErrP95,
            CheckedMetric::VoltageImbalanceP95
        ]
    );
    assert_eq!(
        config.thresholds.band(CheckedMetric::VoltageImbalanceP95),
        ThresholdBand::new(1.5, 2.5)
    );
}

#[test]
fn config_rejects_unknown_required_column() {
    let err = AnalysisConfig::from_toml_str("required_columns = [\"datum\", \"nope\"]\n")
        .expect_err("unknown required column");
    assert!(err.to_string().contains("nope"));
}

#[test]
fn config_rejects_malformed_toml() {
    let err = AnalysisConfig::from_toml_str("mixed_sampling_threshold = [").expect_err("bad toml");
    assert!(err.to_string().starts_with("configuration parse error"));
}

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("pq.toml");
    std::fs::write(&path, "aggregation_preference = [\"avg\"]\n").expect("write config");
    let config = AnalysisConfig::load(&path).expect("load config");
    assert_eq!(config.aggregation_preference, ["avg"]);
    assert_eq!(config.required_columns, columns::REQUIRED);
}
