//! Artifact export of a small analysis.

use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::*;
use pq_map::{MappingLogEntry, NOT_FOUND};
use pq_metrics::{Analysis, MetricsEngine};
use pq_model::{AnalysisConfig, columns};
use pq_report::{
    DataQuality, ReportWriter, SHEETS, timeseries_frame, write_mapping_log, write_workbook,
};

fn analysis() -> Analysis {
    let df = DataFrame::new(vec![
        Column::new(
            columns::DATE.into(),
            ["01.03.2024", "01.03.2024", "bad", "01.03.2024"],
        ),
        Column::new(
            columns::TIME.into(),
            ["10:00:00", "10:01:00", "10:02:00", "10:02:00"],
        ),
        Column::new(columns::P_TOTAL.into(), [600.0, 600.0, 600.0, 600.0]),
        Column::new(columns::S_TOTAL.into(), [1000.0, 1000.0, 1000.0, 1000.0]),
        Column::new(columns::PF_TOTAL.into(), [0.6, 0.6, 0.6, 0.6]),
        Column::new(columns::U_L1N.into(), [230.0, 231.0, 229.0, 230.0]),
    ])
    .expect("frame");
    let config = AnalysisConfig::default();
    MetricsEngine::new(&config).run(df).expect("analysis")
}

fn log() -> Vec<MappingLogEntry> {
    vec![
        MappingLogEntry {
            target: "P_total".to_string(),
            source: "Činný výkon Celkom Priem".to_string(),
            index: 3,
        },
        MappingLogEntry {
            target: "Q_total".to_string(),
            source: NOT_FOUND.to_string(),
            index: -1,
        },
    ]
}

#[test]
fn writes_all_artifacts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let analysis = analysis();
    let quality = DataQuality::from_analysis(&analysis, 2, None);
    let writer = ReportWriter::with_stem(dir.path(), "pq_analysis_test").expect("writer");
    let paths = writer
        .write_all(
            &analysis.summary,
            &quality,
            Some(std::path::Path::new("export.txt")),
            &log(),
            &analysis.frame,
        )
        .expect("write");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.summary).expect("summary"))
            .expect("json");
    assert_eq!(json["schema"], "pq-analysis-summary");
    assert_eq!(json["input_file"], "export.txt");
    assert_eq!(json["data_quality"]["dropped_rows"], 1);
    assert_eq!(json["data_quality"]["skipped_records"], 2);
    assert!(json["data_quality"]["preclean"].is_null());
    assert_eq!(json["total_samples"], 3);
    assert_eq!(json["results"]["energy_total"]["available"], true);
    assert_eq!(json["results"]["power_balance_p"]["available"], false);
    assert_eq!(json["acceptance"]["overall"], "PASS");

    let mapping = std::fs::read_to_string(&paths.mapping_log).expect("mapping log");
    assert_eq!(
        mapping,
        "target,source,index\nP_total,Činný výkon Celkom Priem,3\nQ_total,NOT FOUND,-1\n"
    );

    let tsv = std::fs::read_to_string(&paths.timeseries).expect("time series");
    let mut lines = tsv.lines();
    assert_eq!(
        lines.next(),
        Some("timestamp\tdt\tP_total\tS_total\tPF_total\tPF_calc\tU_L1N")
    );
    assert_eq!(lines.count(), 3);
    assert!(paths.timeseries.ends_with("pq_analysis_test_timeseries.tsv"));
}

#[test]
fn timeseries_drops_date_and_time_text() {
    let analysis = analysis();
    let df = timeseries_frame(&analysis.frame).expect("frame");
    let names = df.get_column_names_str();
    assert!(!names.contains(&columns::DATE));
    assert!(!names.contains(&columns::TIME));
    assert_eq!(names[0], columns::TIMESTAMP);
}

#[test]
fn empty_mapping_log_has_header() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("log.csv");
    write_mapping_log(&[], &path).expect("write");
    assert_eq!(
        std::fs::read_to_string(path).expect("read"),
        "target,source,index\n"
    );
}

fn sheet_rows(path: &std::path::Path, sheet: &str) -> Vec<Vec<Data>> {
    let mut workbook = open_workbook_auto(path).expect("open workbook");
    let range = workbook.worksheet_range(sheet).expect("sheet");
    range.rows().map(<[Data]>::to_vec).collect()
}

#[test]
fn workbook_has_the_five_sheets() {
    let dir = tempfile::tempdir().expect("tempdir");
    let analysis = analysis();
    let quality = DataQuality::from_analysis(&analysis, 0, None);
    let writer = ReportWriter::with_stem(dir.path(), "pq_analysis_test").expect("writer");
    let paths = writer
        .write_all(&analysis.summary, &quality, None, &log(), &analysis.frame)
        .expect("write");

    assert!(paths.workbook.is_file());
    assert!(paths.workbook.ends_with("pq_analysis_test.xlsx"));
    let workbook = open_workbook_auto(&paths.workbook).expect("open workbook");
    assert_eq!(workbook.sheet_names(), SHEETS.map(String::from).to_vec());
}

#[test]
fn workbook_sheets_carry_the_analysis() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("report.xlsx");
    let analysis = analysis();
    let quality = DataQuality::from_analysis(&analysis, 0, None);
    write_workbook(&analysis.summary, &quality, &log(), &analysis.frame, &path)
        .expect("write workbook");

    let summary = sheet_rows(&path, "summary");
    assert_eq!(summary[0][0], Data::String("Metric".into()));
    assert_eq!(summary[1][0], Data::String("=== MEASUREMENT ===".into()));
    assert!(
        summary
            .iter()
            .any(|row| row[0] == Data::String("overall".into())
                && row[1] == Data::String("PASS".into()))
    );

    let validation = sheet_rows(&path, "validation");
    assert!(
        validation
            .iter()
            .any(|row| row[0] == Data::String("  unavailable".into()))
    );

    let timeseries = sheet_rows(&path, "timeseries_power");
    assert_eq!(timeseries.len(), 4);
    assert_eq!(timeseries[0][0], Data::String(columns::TIMESTAMP.into()));
    assert_eq!(timeseries[1][2], Data::Float(600.0));

    let quality_rows = sheet_rows(&path, "data_quality");
    assert_eq!(
        quality_rows[1][..4],
        [
            Data::String("Interval 1".into()),
            Data::Float(60.0),
            Data::Float(2.0),
            Data::Float(100.0),
        ]
    );

    let mapping = sheet_rows(&path, "mapping_log");
    assert_eq!(mapping.len(), 3);
    assert_eq!(
        mapping[2],
        vec![
            Data::String("Q_total".into()),
            Data::String(NOT_FOUND.into()),
            Data::Float(-1.0),
        ]
    );
}
