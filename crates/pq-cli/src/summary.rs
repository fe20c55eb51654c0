use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pq_map::{MappingLogEntry, Resolution};
use pq_model::{MetricResult, MetricValue, Verdict};
use pq_cli::pipeline::AnalysisRun;

pub fn print_summary(run: &AnalysisRun) {
    let summary = &run.analysis.summary;
    println!("Input: {}", run.input.display());
    if let Some(stats) = &run.preclean {
        println!(
            "Pre-clean: {} ({} of {} lines modified, {})",
            stats.output_file.display(),
            stats.lines_modified,
            stats.total_lines,
            stats.source_encoding.label()
        );
    }
    if let Some(paths) = &run.reports {
        println!("Summary: {}", paths.summary.display());
        println!("Mapping log: {}", paths.mapping_log.display());
        println!("Time series: {}", paths.timeseries.display());
        println!("Workbook: {}", paths.workbook.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Measurement"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let unknown = || "-".to_string();
    let rows: Vec<(&str, String)> = vec![
        (
            "Start",
            summary
                .measurement_start
                .map_or_else(unknown, |t| t.to_string()),
        ),
        (
            "End",
            summary.measurement_end.map_or_else(unknown, |t| t.to_string()),
        ),
        ("Duration (h)", format!("{:.2}", summary.duration_hours)),
        ("Samples", summary.total_samples.to_string()),
        ("Rows loaded", run.rows_loaded.to_string()),
        ("Dropped rows", summary.dropped_rows.to_string()),
        ("Skipped records", run.skipped_records.to_string()),
        ("Date layout", summary.date_layout.clone()),
        ("Load mode", format!("{:?}", run.load_mode)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    println!("{table}");

    print_checks_table(run);
    print_verdict_table(run);
}

fn print_checks_table(run: &AnalysisRun) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Check"),
        header_cell("Available"),
        header_cell("Values"),
    ]);
    apply_wide_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for (name, result) in run.analysis.summary.results.iter() {
        table.add_row(vec![
            Cell::new(name).add_attribute(Attribute::Bold),
            available_cell(result.available),
            Cell::new(result_values(result)),
        ]);
    }
    println!();
    println!("Checks:");
    println!("{table}");
}

fn print_verdict_table(run: &AnalysisRun) {
    let acceptance = &run.analysis.summary.acceptance;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Metric"),
        header_cell("Value"),
        header_cell("PASS ≤"),
        header_cell("INFO ≤"),
        header_cell("Verdict"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 4, CellAlignment::Center);
    for check in &acceptance.checks {
        table.add_row(vec![
            Cell::new(check.metric),
            Cell::new(format!("{:.4}", check.value)),
            Cell::new(check.band.pass),
            Cell::new(check.band.info),
            verdict_cell(check.verdict),
        ]);
    }
    table.add_row(vec![
        Cell::new("OVERALL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        verdict_cell(acceptance.overall()).add_attribute(Attribute::Bold),
    ]);
    println!();
    println!("Acceptance:");
    println!("{table}");
}

pub fn print_mapping(resolution: &Resolution) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Logical"),
        header_cell("Header"),
        header_cell("Index"),
    ]);
    apply_wide_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for entry in &resolution.log {
        table.add_row(mapping_row(entry));
    }
    println!("{table}");
    let unresolved = resolution.mapping.unresolved().count();
    println!(
        "{} of {} logical columns resolved",
        resolution.mapping.len() - unresolved,
        resolution.mapping.len()
    );
}

fn mapping_row(entry: &MappingLogEntry) -> Vec<Cell> {
    if entry.is_found() {
        vec![
            Cell::new(&entry.target).add_attribute(Attribute::Bold),
            Cell::new(&entry.source),
            Cell::new(entry.index),
        ]
    } else {
        vec![
            Cell::new(&entry.target).add_attribute(Attribute::Bold),
            dim_cell(&entry.source),
            dim_cell(entry.index),
        ]
    }
}

fn result_values(result: &MetricResult) -> String {
    if let Some(reason) = &result.reason {
        return reason.clone();
    }
    result
        .values
        .iter()
        .map(|(key, value)| format!("{key} = {}", format_value(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_value(value: &MetricValue) -> String {
    match value {
        MetricValue::Number(number) if number.is_finite() && number.abs() >= 100.0 => {
            format!("{number:.2}")
        }
        MetricValue::Number(number) if number.is_finite() => format!("{number:.6}"),
        other => other.to_string(),
    }
}

fn available_cell(available: bool) -> Cell {
    if available {
        Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn verdict_cell(verdict: Verdict) -> Cell {
    let color = match verdict {
        Verdict::Pass => Color::Green,
        Verdict::Info => Color::Yellow,
        Verdict::Alert => Color::Red,
    };
    Cell::new(verdict).fg(color).add_attribute(Attribute::Bold)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_wide_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
