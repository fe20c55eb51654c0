//! Resolution behavior over realistic instrument headers.

use pq_map::{ColumnResolver, MapError, NOT_FOUND, normalize, resolve, resolve_columns};
use pq_model::{AnalysisConfig, KeywordSpec, columns};
use proptest::prelude::*;

const PREFERENCE: [&str; 4] = ["priem", "avg", "mean", "priemer"];

fn slovak_headers() -> Vec<String> {
    [
        "Dátum",
        "Čas",
        "Činný výkon Celkom Max (W)",
        "Činný výkon Celkom Priem (W)",
        "Činný výkon L1 N Priem (W)",
        "Činný výkon L2 N Priem (W)",
        "Činný výkon L3 N Priem (W)",
        "Zdanlivý výkon Full Celkom Priem (VA)",
        "Jalový výkon Celkom Priem (var)",
        "Účinník Celkom Priem (PF)",
        "Napätie L1 N Priem (V)",
        "Frekvencia Priem (Hz)",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[test]
fn normalization_ignores_diacritics_and_case() {
    assert_eq!(normalize("Napätie"), normalize("NAPATIE"));
}

#[test]
fn default_table_resolves_slovak_export() {
    let config = AnalysisConfig::default();
    let resolution = resolve_columns(&slovak_headers(), &config).expect("required columns");
    let mapping = &resolution.mapping;
    assert_eq!(mapping.get(columns::DATE), Some(0));
    assert_eq!(mapping.get(columns::TIME), Some(1));
    assert_eq!(mapping.get(columns::P_TOTAL), Some(3));
    assert_eq!(mapping.get(columns::P_L2N), Some(5));
    assert_eq!(mapping.get(columns::S_TOTAL), Some(7));
    assert_eq!(mapping.get(columns::Q_TOTAL), Some(8));
    assert_eq!(mapping.get(columns::PF_TOTAL), Some(9));
    assert_eq!(mapping.get(columns::U_L1N), Some(10));
    assert_eq!(mapping.get(columns::FREQUENCY), Some(11));
    assert_eq!(mapping.get(columns::U_L2N), None);
    assert_eq!(resolution.log.len(), config.keyword_specs.len());
}

#[test]
fn lowest_index_wins_full_ties() {
    let headers = vec![
        "Frekvencia Priem".to_string(),
        "Napätie".to_string(),
        "Frekvencia Priem".to_string(),
    ];
    let spec = KeywordSpec::all(columns::FREQUENCY, &["frekvencia"]);
    let resolver = ColumnResolver::new(headers, &PREFERENCE);
    let candidates = resolver.candidates(&spec);
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].score, candidates[1].score);
    assert_eq!(candidates[0].specificity, candidates[1].specificity);
    assert_eq!(resolver.find_column(&spec), Some(0));
}

#[test]
fn resolution_is_independent_of_other_specs() {
    let headers = slovak_headers();
    let p_total = KeywordSpec::all(columns::P_TOTAL, &["cinny", "vykon", "celkom"]);
    let alone = resolve(&headers, std::slice::from_ref(&p_total), &PREFERENCE);
    let with_others = resolve(
        &headers,
        &[
            KeywordSpec::all("greedy", &["vykon"]),
            p_total.clone(),
            KeywordSpec::all(columns::U_L1N, &["napatie", "l1n"]),
        ],
        &PREFERENCE,
    );
    assert_eq!(
        alone.mapping.get(columns::P_TOTAL),
        with_others.mapping.get(columns::P_TOTAL)
    );
}

#[test]
fn shared_claims_are_accepted() {
    let headers = vec!["Činný výkon Celkom Priem (W)".to_string()];
    let resolution = resolve(
        &headers,
        &[
            KeywordSpec::all("a", &["cinny"]),
            KeywordSpec::all("b", &["vykon"]),
        ],
        &PREFERENCE,
    );
    assert_eq!(resolution.mapping.get("a"), Some(0));
    assert_eq!(resolution.mapping.get("b"), Some(0));
    assert_eq!(resolution.mapping.indices(), [0]);
}

#[test]
fn missing_required_columns_fail_resolution() {
    let headers = vec![
        "Dátum".to_string(),
        "Činný výkon Celkom Priem (W)".to_string(),
    ];
    let err = resolve_columns(&headers, &AnalysisConfig::default()).unwrap_err();
    assert_eq!(
        err,
        MapError::MissingRequiredColumns {
            missing: vec![columns::TIME.to_string(), columns::S_TOTAL.to_string()]
        }
    );
}

#[test]
fn zero_keyword_hits_never_qualify() {
    let headers = vec!["Prúd L1 Priem (A)".to_string()];
    let spec = KeywordSpec::any(columns::FREQUENCY, &["frekvencia", "hz"]);
    let resolution = resolve(&headers, &[spec], &PREFERENCE);
    let entry = &resolution.log[0];
    assert_eq!(entry.source, NOT_FOUND);
    assert_eq!(entry.index, -1);
    assert!(!entry.is_found());
}

#[test]
fn mapping_log_is_sorted_by_logical_name() {
    let config = AnalysisConfig::default();
    let specs: Vec<KeywordSpec> = [
        columns::DATE,
        columns::TIME,
        columns::P_TOTAL,
        columns::S_TOTAL,
        columns::PF_TOTAL,
        columns::DPF_TOTAL,
        columns::U_L1N,
    ]
    .into_iter()
    .filter_map(|name| config.spec(name).cloned())
    .collect();
    let resolution = resolve(&slovak_headers(), &specs, &config.aggregation_preference);
    let rendered = resolution
        .log
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(rendered, @r"
    DPF_total <- NOT FOUND [-1]
    PF_total <- Účinník Celkom Priem (PF) [9]
    P_total <- Činný výkon Celkom Priem (W) [3]
    S_total <- Zdanlivý výkon Full Celkom Priem (VA) [7]
    U_L1N <- Napätie L1 N Priem (V) [10]
    cas <- Čas [1]
    datum <- Dátum [0]
    ");
}

#[test]
fn mapping_log_serializes_for_export() {
    let resolution = resolve(
        &["Čas".to_string()],
        &[KeywordSpec::all(columns::TIME, &["cas"])],
        &PREFERENCE,
    );
    let json = serde_json::to_value(&resolution.log).expect("serialize log");
    assert_eq!(json[0]["target"], "cas");
    assert_eq!(json[0]["source"], "Čas");
    assert_eq!(json[0]["index"], 0);
}

proptest! {
    #[test]
    fn normalization_is_idempotent(raw in "\\PC{0,40}") {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalized_keys_use_restricted_alphabet(raw in "\\PC{0,40}") {
        let key = normalize(&raw);
        prop_assert!(key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
        prop_assert!(!key.starts_with(' ') && !key.ends_with(' '));
        prop_assert!(!key.contains("  "));
    }

    #[test]
    fn phase_tokens_survive_any_separator(sep in "[ _\\-./]{1,3}", phase in 1u8..=3) {
        let key = normalize(&format!("Napätie L{phase}{sep}N Priem"));
        prop_assert_eq!(key, format!("napatie l{phase}n priem"));
    }
}
