//! Swimmer versus team comparisons.

use std::cmp::Ordering;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::{DerivedMetricRecord, Directionality, MetricCatalog, MetricDefinition};

/// How a swimmer's average compares with the team's for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamComparison {
    pub metric: String,
    pub swimmer_average: f64,
    pub team_average: f64,
    /// Positive when the swimmer is better than the team, whatever the
    /// metric's directionality.
    pub percent_diff: f64,
    pub swimmer_samples: usize,
    pub team_samples: usize,
}

fn average(records: &[DerivedMetricRecord], key: &str) -> (f64, usize) {
    let values: Vec<f64> = records
        .iter()
        .filter_map(|r| r.get(key))
        .filter(|v| !v.is_nan())
        .collect();
    if values.is_empty() {
        (0.0, 0)
    } else {
        (values.iter().sum::<f64>() / values.len() as f64, values.len())
    }
}

/// Direction-aware percentage difference of a swimmer against a baseline.
pub fn percent_diff(directionality: Directionality, swimmer: f64, team: f64) -> f64 {
    match directionality {
        Directionality::LowerIsBetter => (team - swimmer) / team * 100.0,
        Directionality::HigherIsBetter => (swimmer - team) / team * 100.0,
    }
}

/// Compare a swimmer's average with the team average.
///
/// `None` when the team has at most one sample, the swimmer has none, or the
/// team average is zero.
pub fn team_comparison(
    swimmer_records: &[DerivedMetricRecord],
    all_records: &[DerivedMetricRecord],
    metric: &MetricDefinition,
) -> Option<TeamComparison> {
    let (team_average, team_samples) = average(all_records, &metric.key);
    let (swimmer_average, swimmer_samples) = average(swimmer_records, &metric.key);

    if team_samples <= 1 || swimmer_samples == 0 || team_average == 0.0 {
        return None;
    }

    Some(TeamComparison {
        metric: metric.key.clone(),
        swimmer_average,
        team_average,
        percent_diff: percent_diff(metric.directionality, swimmer_average, team_average),
        swimmer_samples,
        team_samples,
    })
}

/// The `top_n` metrics where the swimmer differs most from the team.
pub fn notable_differences(
    swimmer_records: &[DerivedMetricRecord],
    all_records: &[DerivedMetricRecord],
    catalog: &MetricCatalog,
    top_n: usize,
) -> Result<Vec<TeamComparison>> {
    let keys: IndexSet<&str> = swimmer_records.iter().flat_map(|r| r.keys()).collect();

    let mut comparisons = Vec::new();
    for key in keys {
        let definition = catalog.get(key)?;
        if let Some(comparison) = team_comparison(swimmer_records, all_records, &definition) {
            comparisons.push(comparison);
        }
    }

    comparisons.sort_by(|a, b| {
        b.percent_diff
            .abs()
            .partial_cmp(&a.percent_diff.abs())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.metric.cmp(&b.metric))
    });
    comparisons.truncate(top_n);

    Ok(comparisons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::{CourseLength, RaceContext};
    use chrono::NaiveDate;

    fn record(swimmer: &str, metrics: &[(&str, f64)]) -> DerivedMetricRecord {
        let context = RaceContext::new(
            swimmer,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
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

    #[test]
    fn test_faster_swimmer_is_positive() {
        let swimmer = vec![record("ana", &[("t_total", 26.5)])];
        let team = vec![
            record("ana", &[("t_total", 26.5)]),
            record("luis", &[("t_total", 27.5)]),
        ];
        let metric = MetricCatalog::global().get("t_total").unwrap();

        let cmp = team_comparison(&swimmer, &team, &metric).unwrap();
        assert_eq!(cmp.team_average, 27.0);
        assert!((cmp.percent_diff - 1.851_851_851_851_852).abs() < 1e-9);
    }

    #[test]
    fn test_higher_is_better_formula() {
        assert!((percent_diff(Directionality::HigherIsBetter, 2.0, 1.6) - 25.0).abs() < 1e-9);
        assert!(percent_diff(Directionality::LowerIsBetter, 28.0, 27.0) < 0.0);
    }

    #[test]
    fn test_single_team_sample_is_excluded() {
        let swimmer = vec![record("ana", &[("t_total", 26.5)])];
        let metric = MetricCatalog::global().get("t_total").unwrap();
        assert!(team_comparison(&swimmer, &swimmer, &metric).is_none());
    }

    #[test]
    fn test_notable_differences_sorted_and_truncated() {
        let swimmer = vec![record(
            "ana",
            &[("t_total", 26.0), ("v_promedio", 1.9), ("dist_x_brz", 2.0)],
        )];
        let team = vec![
            swimmer[0].clone(),
            record("luis", &[("t_total", 28.0), ("v_promedio", 1.7), ("dist_x_brz", 1.0)]),
        ];

        let diffs = notable_differences(&swimmer, &team, MetricCatalog::global(), 2).unwrap();
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].metric, "dist_x_brz");
        assert_eq!(diffs[1].metric, "v_promedio");
        assert!(diffs[0].percent_diff.abs() >= diffs[1].percent_diff.abs());
    }
}
