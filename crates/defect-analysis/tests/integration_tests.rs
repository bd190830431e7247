//! Integration tests for the defect report pipeline.
//!
//! These tests run the whole pipeline over small CSV files and check the
//! exported dataset and report against values recomputed independently.

use defect_analysis::charts::{HEATMAP_FILE, PARETO_FILE, SHIFT_FILE};
use defect_analysis::io::load_csv;
use defect_analysis::{AnalysisReport, ReportConfig, ReportPipeline};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn sample_csv() -> PathBuf {
    fixtures_path().join("manufacturing_defects_sample.csv")
}

fn config_for(input: &Path, output: &Path, charts: bool) -> ReportConfig {
    ReportConfig::builder()
        .input_path(input)
        .output_dir(output)
        .render_charts(charts)
        .build()
        .unwrap()
}

fn run_sample(charts: bool) -> (TempDir, AnalysisReport) {
    let dir = tempfile::tempdir().unwrap();
    let report = ReportPipeline::new(config_for(&sample_csv(), dir.path(), charts))
        .run()
        .expect("pipeline should succeed on the sample data");
    (dir, report)
}

fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::String)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

fn write_csv_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ============================================================================
// Full Pipeline Tests
// ============================================================================

#[test]
fn test_quality_and_cleaning_on_sample() {
    let (_dir, report) = run_sample(false);

    assert_eq!(report.quality.rows, 24);
    assert_eq!(report.quality.columns, 6);
    assert_eq!(report.quality.duplicate_rows, 0);
    assert_eq!(report.quality.total_missing(), 0);

    assert_eq!(report.timestamps.parsed, 23);
    assert_eq!(report.timestamps.unparsed, 1);

    assert_eq!(report.clipping.outliers_clipped, 1);
    assert_eq!(report.clipping.shape_after, (24, 8));
    assert!(report.clipping.upper_bound > 9_000.0 && report.clipping.upper_bound < 11_000.0);
}

#[test]
fn test_exported_dataset_keeps_rows_and_adds_time_fields() {
    let (dir, report) = run_sample(false);

    let exported = load_csv(&dir.path().join("manufacturing_defects_cleaned.csv")).unwrap();
    assert_eq!(exported.height(), 24);
    assert_eq!(exported.width(), 8);
    let cleaned = dir.path().join("manufacturing_defects_cleaned.csv");
    assert_eq!(report.cleaned_file, cleaned.display().to_string());

    let names: Vec<String> = exported
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert!(names.contains(&"date".to_string()));
    assert!(names.contains(&"hour".to_string()));

    let timestamps = strings(&exported, "timestamp");
    assert_eq!(timestamps[0].as_deref(), Some("2024-03-01 00:00:00"));
    assert_eq!(timestamps[9], None);

    let hours = floats(&exported, "hour");
    assert_eq!(hours[1], Some(5.0));
    assert_eq!(hours[9], None);
}

#[test]
fn test_clipping_caps_only_values_above_bound() {
    let (dir, report) = run_sample(false);

    let original = load_csv(&sample_csv()).unwrap();
    let exported = load_csv(&dir.path().join("manufacturing_defects_cleaned.csv")).unwrap();

    let bound = report.clipping.upper_bound;
    let before = floats(&original, "defect_cost_pln");
    let after = floats(&exported, "defect_cost_pln");

    for (old, new) in before.iter().zip(&after) {
        let (old, new) = (old.unwrap(), new.unwrap());
        // exported with full float precision, so values round-trip
        assert!(new <= bound + 1e-6);
        if old <= bound {
            assert!(approx_eq(old, new), "{} changed to {}", old, new);
        } else {
            assert!(approx_eq(new, bound));
        }
    }
}

#[test]
fn test_pareto_is_ranked_and_reaches_100() {
    let (_dir, report) = run_sample(false);
    let rows = &report.pareto.rows;

    assert_eq!(rows[0].defect_type, "Discoloration");
    assert!(rows.windows(2).all(|w| w[0].total_cost >= w[1].total_cost));
    assert!(rows.windows(2).all(|w| w[0].cumulative_pct <= w[1].cumulative_pct));
    assert!(approx_eq(rows.last().unwrap().cumulative_pct, 100.0));
}

#[test]
fn test_headlines_match_exported_dataset() {
    let (dir, report) = run_sample(false);
    let exported = load_csv(&dir.path().join("manufacturing_defects_cleaned.csv")).unwrap();

    let shifts = strings(&exported, "shift");
    let machines = strings(&exported, "machine_id");
    let types = strings(&exported, "defect_type");
    let costs = floats(&exported, "defect_cost_pln");

    // shift share over all rows
    let night = shifts.iter().filter(|s| s.as_deref() == Some("Night")).count();
    let expected_share = night as f64 / shifts.len() as f64 * 100.0;
    assert!(approx_eq(report.headlines.shift_pct, expected_share));
    assert!(approx_eq(report.shift_share_pct, expected_share));

    // top 3 cumulative share
    let mut by_type: BTreeMap<String, f64> = BTreeMap::new();
    for (t, c) in types.iter().zip(&costs) {
        *by_type.entry(t.clone().unwrap()).or_insert(0.0) += c.unwrap();
    }
    let mut totals: Vec<f64> = by_type.values().copied().collect();
    totals.sort_by(|a, b| b.total_cmp(a));
    let all: f64 = totals.iter().sum();
    let top3: f64 = totals.iter().take(3).sum();
    assert_eq!(report.headlines.top_n, 3);
    assert!((report.headlines.top_n_cumulative_pct - top3 / all * 100.0).abs() < 1e-4);

    // machine with the highest mean cost
    let mut by_machine: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for (m, c) in machines.iter().zip(&costs) {
        let entry = by_machine.entry(m.clone().unwrap()).or_insert((0.0, 0));
        entry.0 += c.unwrap();
        entry.1 += 1;
    }
    let (best_machine, best_mean) = by_machine
        .iter()
        .map(|(m, (sum, n))| (m.clone(), sum / *n as f64))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap();
    assert_eq!(report.headlines.machine_id, best_machine);
    assert_eq!(best_machine, "M002");
    assert!((report.headlines.machine_mean_cost - best_mean).abs() < 1e-4);
    assert!(report.headlines.machine_is_highest);
}

#[test]
fn test_shift_and_machine_tables() {
    let (_dir, report) = run_sample(false);

    let counts: Vec<(String, usize)> = report
        .shifts
        .rows
        .iter()
        .map(|r| (r.shift.clone(), r.count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("Afternoon".to_string(), 8),
            ("Morning".to_string(), 8),
            ("Night".to_string(), 8),
        ]
    );

    assert_eq!(report.machines.rows.len(), 4);
    let crosstab = &report.machine_shift_crosstab;
    assert_eq!(crosstab.row_labels, vec!["M001", "M002", "M003", "M004"]);
    for row in &crosstab.values {
        assert!(approx_eq(row.iter().sum::<f64>(), 100.0));
    }
}

// ============================================================================
// Output Tests
// ============================================================================

#[test]
fn test_charts_are_written() {
    let (dir, report) = run_sample(true);

    assert_eq!(report.charts.len(), 3);
    for file in [PARETO_FILE, SHIFT_FILE, HEATMAP_FILE] {
        let path = dir.path().join(file);
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"), "{} is not an SVG", path.display());
    }
}

#[test]
fn test_no_charts_writes_only_csv() {
    let (dir, report) = run_sample(false);

    assert!(report.charts.is_empty());
    assert!(!dir.path().join(PARETO_FILE).exists());
    assert!(dir.path().join("manufacturing_defects_cleaned.csv").exists());
}

#[test]
fn test_json_report_round_trip() {
    let (dir, report) = run_sample(false);

    let path = report.write_to_file(dir.path(), "manufacturing_defects_sample").unwrap();
    assert_eq!(path, dir.path().join("manufacturing_defects_sample_report.json"));

    let content = fs::read_to_string(&path).unwrap();
    let parsed: AnalysisReport = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.headlines, report.headlines);
    assert_eq!(parsed.pareto, report.pareto);
    assert!(parsed.quality.preview.is_empty());
}

#[test]
fn test_console_report_sections() {
    let (_dir, report) = run_sample(false);
    let text = report.to_string();

    for section in [
        "DATA QUALITY CHECK",
        "DATA CLEANING",
        "PARETO ANALYSIS",
        "SHIFT ANALYSIS",
        "MACHINE ANALYSIS",
        "SUMMARY",
    ] {
        assert!(text.contains(section), "missing section {}", section);
    }
    assert!(text.contains("Outliers clipped: 1 -> 0"));
    assert!(text.contains("- Machine M002:"));
    assert!(text.contains("(highest)"));

    let night = report.shifts.get("Night").unwrap().count;
    assert!(text.contains(&format!("% of defects ({} recorded)", night)));
    assert!(text.contains("M002 on "));
    assert!(text.contains("% of its defects"));
}

// ============================================================================
// Configuration and Error Tests
// ============================================================================

#[test]
fn test_focus_machine_override() {
    let dir = tempfile::tempdir().unwrap();
    let config = ReportConfig::builder()
        .input_path(sample_csv())
        .output_dir(dir.path())
        .render_charts(false)
        .focus_machine("M001")
        .build()
        .unwrap();

    let report = ReportPipeline::new(config).run().unwrap();
    assert_eq!(report.headlines.machine_id, "M001");
    assert!(!report.headlines.machine_is_highest);
    assert!(!report.to_string().contains("(highest)"));
}

#[test]
fn test_unknown_focus_machine_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = ReportConfig::builder()
        .input_path(sample_csv())
        .output_dir(dir.path())
        .render_charts(false)
        .focus_machine("M999")
        .build()
        .unwrap();

    let err = ReportPipeline::new(config).run().unwrap_err();
    assert_eq!(err.error_code(), "MACHINE_NOT_FOUND");
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir.path().join("nope.csv"), dir.path(), false);

    let err = ReportPipeline::new(config).run().unwrap_err();
    assert_eq!(err.error_code(), "IO_ERROR");
    assert!(!dir.path().join("manufacturing_defects_cleaned.csv").exists());
}

#[test]
fn test_missing_required_column() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv_file(
        dir.path(),
        "no_machine.csv",
        "defect_id,timestamp,defect_type,defect_cost_pln,shift\n\
         D1,2024-01-01 08:00:00,Scratch,100,Morning\n",
    );

    let err = ReportPipeline::new(config_for(&input, dir.path(), false))
        .run()
        .unwrap_err();
    assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    assert!(err.to_string().contains("machine_id"));
}

#[test]
fn test_non_numeric_cost_column() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv_file(
        dir.path(),
        "text_cost.csv",
        "defect_id,timestamp,defect_type,defect_cost_pln,shift,machine_id\n\
         D1,2024-01-01 08:00:00,Scratch,cheap,Morning,M001\n\
         D2,2024-01-01 09:00:00,Dent,expensive,Morning,M002\n",
    );

    let err = ReportPipeline::new(config_for(&input, dir.path(), false))
        .run()
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_COLUMN_TYPE");
}

fn defects_with_markers(cost_marker: &str, shift_marker: &str) -> String {
    let mut content =
        String::from("defect_id,timestamp,defect_type,defect_cost_pln,shift,machine_id\n");
    let shifts = ["Morning", "Afternoon", "Night"];
    for i in 0..20 {
        content.push_str(&format!(
            "D{i},2024-02-01 {:02}:00:00,Crack,{},{},M00{}\n",
            i % 24,
            450 + i * 5,
            shifts[i % 3],
            i % 2 + 1
        ));
    }
    content.push_str("D20,2024-02-02 10:00:00,Dent,100000,Morning,M001\n");
    content.push_str(&format!(
        "D21,2024-02-02 11:00:00,Scratch,{},{},M002\n",
        cost_marker, shift_marker
    ));
    content
}

#[test]
fn test_missing_markers_are_treated_as_missing() {
    for (cost_marker, shift_marker) in [("NaN", "NA"), ("NA", "N/A"), ("null", "None")] {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv_file(
            dir.path(),
            "markers.csv",
            &defects_with_markers(cost_marker, shift_marker),
        );

        let report = ReportPipeline::new(config_for(&input, dir.path(), false))
            .run()
            .unwrap_or_else(|e| panic!("{} / {}: {}", cost_marker, shift_marker, e));

        let missing: BTreeMap<&str, usize> = report
            .quality
            .missing_values
            .iter()
            .map(|m| (m.column.as_str(), m.count))
            .collect();
        assert_eq!(missing["defect_cost_pln"], 1);
        assert_eq!(missing["shift"], 1);

        // the extreme cost is still clipped at a finite bound
        assert!(report.clipping.upper_bound.is_finite());
        assert_eq!(report.clipping.outliers_clipped, 1);

        assert!(report.pareto.total_cost.is_finite());
        let last = report.pareto.rows.last().unwrap();
        assert!(approx_eq(last.cumulative_pct, 100.0));

        let shift_names: Vec<&str> = report.shifts.rows.iter().map(|r| r.shift.as_str()).collect();
        assert_eq!(shift_names, vec!["Afternoon", "Morning", "Night"]);

        // the row with the missing shift still counts in the denominator
        let night = report.shifts.rows.iter().find(|r| r.shift == "Night").unwrap();
        let expected = night.count as f64 / 22.0 * 100.0;
        assert!(approx_eq(report.headlines.shift_pct, expected));
        assert!(report.headlines.machine_mean_cost.is_finite());
    }
}

#[test]
fn test_all_night_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let mut content =
        String::from("defect_id,timestamp,defect_type,defect_cost_pln,shift,machine_id\n");
    for i in 0..12 {
        content.push_str(&format!(
            "D{i},2024-02-{:02} 23:15:00,Crack,{},Night,M00{}\n",
            i + 1,
            100 + i * 10,
            i % 3 + 1
        ));
    }
    let input = write_csv_file(dir.path(), "night.csv", &content);

    let report = ReportPipeline::new(config_for(&input, dir.path(), false))
        .run()
        .unwrap();

    assert_eq!(report.headlines.shift_pct, 100.0);
    assert_eq!(report.clipping.outliers_clipped, 0);
    assert_eq!(report.pareto.rows.len(), 1);
    assert!(approx_eq(report.headlines.top_n_cumulative_pct, 100.0));
}
