//! Integration tests for Aqualytics.

use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

use aqualytics::aggregate::{Period, Trend, best_of, team_comparison};
use aqualytics::metrics::MetricRow;
use aqualytics::race::{RuleId, plan};
use aqualytics::scoring::{ComparisonMember, normalize};
use aqualytics::{
    AnalyticsConfig, Aqualytics, ComparisonSet, CourseLength, DerivationError, DerivedMetricRecord,
    DiagnosticCode, MetricCatalog, MetricGroup, RaceContext, RaceTotals, RawSegmentInput,
};
use chrono::NaiveDate;

const HEADER: &str =
    "fecha,nadador,competencia,distancia,estilo,fase,t15_1,brz_1,t25_1,f1,t15_2,brz_2,t25_2,f2,t_total,brz_total";

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

/// A 50 m short-course results file with `rows` consistent races.
fn canonical_file(rows: usize) -> String {
    let mut content = format!("{}\n", HEADER);
    for i in 0..rows {
        let offset = i as f64 * 0.1;
        content.push_str(&format!(
            "2024-05-{:02},Swimmer {},Open,50,libre,final,{:.1},10,{:.1},10,{:.1},12,{:.1},6,{:.1},22\n",
            i + 1,
            i % 3,
            6.0 + offset,
            12.5 + offset,
            7.0 + offset,
            14.0 + offset,
            26.5 + 2.0 * offset,
        ));
    }
    content
}

fn record(swimmer: &str, day: u32, metrics: &[(&str, f64)]) -> DerivedMetricRecord {
    let context = RaceContext::new(
        swimmer,
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
        50,
        CourseLength::Short,
        "libre",
        "final",
    );
    DerivedMetricRecord::new(
        context,
        metrics.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
    )
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_canonical_file_is_valid_and_scores_100() {
    let file = create_test_file(&canonical_file(10));

    let report = Aqualytics::new()
        .validate_file(file.path())
        .expect("Validation failed");

    assert!(report.is_valid);
    assert_eq!(report.score, 100.0);
    assert_eq!(report.total_rows, 10);
    assert_eq!(report.columns.len(), 16);
}

#[test]
fn test_header_only_file_has_no_columns() {
    let file = create_test_file(&canonical_file(0));

    let report = Aqualytics::new()
        .validate_file(file.path())
        .expect("Validation failed");

    assert!(!report.is_valid);
    assert!(report.has(DiagnosticCode::NoDataRows));
    assert!(report.columns.is_empty());
}

#[test]
fn test_extra_columns_are_tolerated() {
    let content = canonical_file(3)
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!("{},notas", line)
            } else {
                format!("{},ok", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let report = Aqualytics::new().validate(&content);
    assert!(report.is_valid);
    assert!(report.has(DiagnosticCode::UnexpectedHeader));
}

#[test]
fn test_ragged_rows_block() {
    let content = format!("{}2024-05-20,Ana,Open,50\n", canonical_file(2));

    let report = Aqualytics::new().validate(&content);
    assert!(!report.is_valid);
    assert!(report.has(DiagnosticCode::InconsistentRowLength));
}

// =============================================================================
// Import
// =============================================================================

#[test]
fn test_import_file_describes_source() {
    let file = create_test_file(&canonical_file(4));

    let result = Aqualytics::new()
        .import_file(file.path())
        .expect("Import failed");

    assert!(result.is_clean());
    assert_eq!(result.summary.imported, 4);
    assert_eq!(result.summary.success_rate(), 1.0);

    let source = result.source.expect("source metadata");
    assert_eq!(source.format, "csv");
    assert_eq!(source.row_count, 4);
    assert!(source.hash.starts_with("sha256:"));
}

#[test]
fn test_bad_row_does_not_abort_batch() {
    // Second row: 25m split before the 15m split
    let content = format!(
        "{}\n\
         2024-05-01,Ana,Open,50,libre,final,6.0,10,12.5,10,7.0,12,14.0,6,26.5,22\n\
         2024-05-01,Luis,Open,50,libre,final,6.0,10,5.5,10,7.0,12,14.0,6,26.5,22\n\
         2024-05-01,Eva,Open,50,libre,final,6.2,11,12.9,9,7.1,12,14.2,6,27.1,23\n",
        HEADER
    );

    let result = Aqualytics::new().import(&content);
    assert_eq!(result.summary.total_rows, 3);
    assert_eq!(result.summary.imported, 2);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].line, 3);
    assert_eq!(result.failures[0].swimmer.as_deref(), Some("Luis"));
}

#[test]
fn test_zero_strokes_yields_partial_record() {
    let content = format!(
        "{}\n2024-05-01,Ana,Open,50,libre,final,6.0,0,12.5,10,7.0,0,14.0,6,26.5,0\n",
        HEADER
    );

    let result = Aqualytics::new().import(&content);
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.partials.len(), 1);

    let record = &result.records[0];
    assert!(record.get("dist_x_brz").is_none());
    assert!((record.get("v_promedio").unwrap() - 50.0 / 26.5).abs() < 1e-12);
    assert!(result.partials[0].omitted.iter().any(|e| matches!(
        e,
        DerivationError::ZeroDenominator { metric, .. } if metric == "dist_x_brz"
    )));
}

#[test]
fn test_long_distance_short_course_uses_cumulative_splits() {
    let content = "fecha,nadador,distancia,estilo,fase,split_25,split_50,split_75,split_100,split_125,split_150,split_175,t_total,brz_total\n\
                   2024-05-01,Ana,200,libre,final,12.0,26.0,40.5,55.0,69.8,84.6,99.5,114.0,80\n";

    let result = Aqualytics::new().import(content);
    assert!(result.failures.is_empty(), "{:?}", result.failures);

    let record = &result.records[0];
    assert_eq!(record.get("t_total"), Some(114.0));
    assert!((record.get("v1").unwrap() - 25.0 / 12.0).abs() < 1e-12);
    assert!((record.get("v8").unwrap() - 25.0 / 14.5).abs() < 1e-12);
    assert!((record.get("dist_x_brz").unwrap() - 2.5).abs() < 1e-12);
}

#[test]
fn test_canonical_columns_beyond_fifty_meters() {
    let content = format!(
        "{}\n\
         2024-05-01,Ana,Open,100,libre,final,6.1,10,13.5,8,7.0,11,14.1,6,58.2,44\n\
         2024-05-02,Ana,Open,200,libre,final,6.1,10,13.5,8,7.0,11,15.0,6,130.4,88\n",
        HEADER
    );

    let result = Aqualytics::new().import(&content);
    assert!(result.failures.is_empty(), "{:?}", result.failures);
    assert_eq!(result.summary.imported, 2);
    assert_eq!(result.summary.partial, 2);

    let hundred = &result.records[0];
    assert!((hundred.get("v_promedio").unwrap() - 100.0 / 58.2).abs() < 1e-12);
    assert!((hundred.get("dist_x_brz").unwrap() - 100.0 / 44.0).abs() < 1e-12);
    assert_eq!(hundred.get("dist_sin_f"), Some(86.0));
    assert_eq!(hundred.get("f_promedio"), Some(7.0));
    assert!(hundred.get("v3").is_none());

    let two_hundred = &result.records[1];
    assert!((two_hundred.get("v2").unwrap() - 25.0 / 15.0).abs() < 1e-12);
    assert!((two_hundred.get("v_promedio").unwrap() - 200.0 / 130.4).abs() < 1e-12);

    let omitted: Vec<&str> = result.partials[1].omitted.iter().map(|e| e.metric()).collect();
    assert_eq!(omitted, vec!["v3", "v4", "v5", "v6", "v7", "v8"]);
}

#[test]
fn test_oversized_distance_is_a_row_failure() {
    let content = format!(
        "{}\n\
         2024-05-01,Ana,Open,4000000000,libre,final,6.0,10,12.5,10,7.0,12,14.0,6,26.5,22\n\
         2024-05-01,Eva,Open,50,libre,final,6.2,11,12.9,9,7.1,12,14.2,6,27.1,23\n",
        HEADER
    );

    let aqua = Aqualytics::new();
    let result = aqua.import(&content);
    assert_eq!(result.summary.imported, 1);
    assert_eq!(result.failures[0].line, 2);
    assert!(aqua.segments(4_000_000_000, CourseLength::Short).is_err());
}

#[test]
fn test_storage_rows_round_trip() {
    let result = Aqualytics::new().import(&canonical_file(2));
    let catalog = MetricCatalog::global();

    let rows: Vec<MetricRow> = result
        .records
        .iter()
        .flat_map(|r| r.to_rows(catalog).unwrap())
        .collect();
    assert!(rows.iter().any(|r| r.metric == "v_promedio" && r.unit == "m/s"));

    assert_eq!(DerivedMetricRecord::from_rows(rows), result.records);
}

// =============================================================================
// Derivation
// =============================================================================

#[test]
fn test_derive_single_race() {
    let ctx = RaceContext::new(
        "Ana",
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        100,
        CourseLength::Long,
        "espalda",
        "final",
    );
    let inputs = vec![
        RawSegmentInput::new()
            .with_segment_time(30.0)
            .with_stroke_count(20)
            .with_underwater(12.0),
        RawSegmentInput::new()
            .with_segment_time(32.0)
            .with_stroke_count(22)
            .with_underwater(8.0),
    ];

    let derivation = Aqualytics::new()
        .derive(&ctx, &inputs, &RaceTotals::new())
        .expect("Derivation failed");

    assert!(derivation.is_complete());
    let record = derivation.record;
    assert_eq!(record.get("t_total"), Some(62.0));
    assert_eq!(record.get("brz_total"), Some(42.0));
    assert_eq!(record.get("dist_sin_f"), Some(80.0));
    assert_eq!(record.get("f_promedio"), Some(10.0));
    assert!((record.get("v1").unwrap() * 30.0 - 50.0).abs() < 1e-9);
}

#[test]
fn test_resolver_plans() {
    let lc50 = plan(50, CourseLength::Long);
    assert_eq!(lc50.segments.len(), 1);
    assert_eq!(lc50.segments[0].rule, RuleId::FiftyLongFirst);

    let sc400 = plan(400, CourseLength::Short);
    assert_eq!(sc400.segments.len(), 16);
    assert!(sc400.segments.iter().all(|s| s.rule == RuleId::LongDistanceShortCourse));
    assert_eq!(sc400.aggregate_splits.len(), 15);
}

// =============================================================================
// Aggregation and scoring
// =============================================================================

#[test]
fn test_best_of_time_metric() {
    let records = vec![
        record("Ana", 1, &[("t_total", 27.3)]),
        record("Ana", 2, &[("t_total", 26.8)]),
        record("Ana", 3, &[("t_total", 28.1)]),
    ];
    let metric = MetricCatalog::global().get("t_total").unwrap();

    let best = best_of(&records, &metric).unwrap();
    assert_eq!(best.get("t_total"), Some(26.8));
}

#[test]
fn test_team_comparison_faster_is_positive() {
    let swimmer = vec![record("Ana", 1, &[("t_total", 26.5)])];
    let team = vec![
        record("Ana", 1, &[("t_total", 26.5)]),
        record("Luis", 1, &[("t_total", 27.0)]),
        record("Eva", 1, &[("t_total", 27.5)]),
    ];
    let metric = MetricCatalog::global().get("t_total").unwrap();

    let comparison = team_comparison(&swimmer, &team, &metric).unwrap();
    assert_eq!(comparison.team_average, 27.0);
    assert!((comparison.percent_diff - 1.85).abs() < 0.01);
}

#[test]
fn test_normalize_degenerate_set() {
    let set = ComparisonSet::new(
        ["Ana", "Luis", "Eva"]
            .iter()
            .map(|s| ComparisonMember::new(*s, record(s, 1, &[("v_promedio", 10.0)])))
            .collect(),
    );

    assert_eq!(
        normalize(&set, "v_promedio"),
        vec![Some(50.0), Some(50.0), Some(50.0)]
    );
}

#[test]
fn test_pipeline_from_file_to_views() {
    let aqua = Aqualytics::new();
    let records = aqua.import(&canonical_file(9)).records;

    let page = aqua
        .rankings(&records, &aqua.ranking_query("v_promedio"))
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.entries[0].line.swimmer, "Swimmer 0");
    assert_eq!(page.entries[0].gap_to_leader, 0.0);

    let swimmers: Vec<String> = (0..3).map(|i| format!("Swimmer {}", i)).collect();
    let board = aqua
        .compare(&records, &swimmers, MetricGroup::Velocidad, Some("libre"), Some(50))
        .unwrap();
    assert!(board.applicable);
    assert_eq!(board.members.len(), 3);
    assert_eq!(board.members[0].swimmer, "Swimmer 0");

    let as_of = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
    let prog = aqua
        .progression(&records, "Swimmer 1", "t_total", Period::All, as_of)
        .unwrap();
    assert_eq!(prog.points.len(), 3);
    assert_eq!(prog.trend, Trend::Declining);
}

#[test]
fn test_config_file_drives_facade() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("aqualytics.json");
    std::fs::write(&path, r#"{"import": {"default_course": "long"}}"#).unwrap();

    let config = AnalyticsConfig::load(&path).unwrap();
    let aqua = Aqualytics::with_config(config);

    // 50 m long course is a single segment
    let content = "fecha,nadador,distancia,estilo,fase,t15_1,t25_1,brz_1,t_total\n\
                   2024-05-01,Ana,50,libre,final,6.0,11.9,24,27.4\n";
    let result = aqua.import(content);

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].context.course, CourseLength::Long);
    assert_eq!(result.records[0].get("v1"), Some(50.0 / 27.4));
}
