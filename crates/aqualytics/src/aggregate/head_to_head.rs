//! Metric-by-metric comparison of two records.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::{DerivedMetricRecord, MetricCatalog};

/// Which side of a comparison is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    First,
    Second,
    Tie,
}

/// One metric compared across the two records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub metric: String,
    pub first: f64,
    pub second: f64,
    /// `first - second`.
    pub difference: f64,
    /// `difference / second * 100`, absent when `second` is zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage_diff: Option<f64>,
    pub winner: Winner,
}

/// Comparison of two records over their common metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHead {
    pub first: String,
    pub second: String,
    pub comparisons: Vec<MetricComparison>,
    pub first_wins: usize,
    pub second_wins: usize,
    /// Side winning the most metrics.
    pub overall: Winner,
}

/// Compare two records over the metrics both hold, in the first record's
/// order.
pub fn head_to_head(
    first: &DerivedMetricRecord,
    second: &DerivedMetricRecord,
    catalog: &MetricCatalog,
) -> Result<HeadToHead> {
    let mut comparisons = Vec::new();

    for (metric, &a) in first.metrics() {
        let Some(b) = second.get(metric) else {
            continue;
        };
        if a.is_nan() || b.is_nan() {
            continue;
        }
        let directionality = catalog.directionality(metric)?;

        let winner = if directionality.is_better(a, b) {
            Winner::First
        } else if directionality.is_better(b, a) {
            Winner::Second
        } else {
            Winner::Tie
        };

        comparisons.push(MetricComparison {
            metric: metric.clone(),
            first: a,
            second: b,
            difference: a - b,
            percentage_diff: (b != 0.0).then(|| (a - b) / b * 100.0),
            winner,
        });
    }

    let first_wins = comparisons.iter().filter(|c| c.winner == Winner::First).count();
    let second_wins = comparisons.iter().filter(|c| c.winner == Winner::Second).count();
    let overall = match first_wins.cmp(&second_wins) {
        std::cmp::Ordering::Greater => Winner::First,
        std::cmp::Ordering::Less => Winner::Second,
        std::cmp::Ordering::Equal => Winner::Tie,
    };

    Ok(HeadToHead {
        first: first.context.swimmer.clone(),
        second: second.context.swimmer.clone(),
        comparisons,
        first_wins,
        second_wins,
        overall,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::{CourseLength, RaceContext};
    use chrono::NaiveDate;

    fn record(swimmer: &str, metrics: &[(&str, f64)]) -> DerivedMetricRecord {
        let context = RaceContext::new(
            swimmer,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            100,
            CourseLength::Long,
            "pecho",
            "final",
        );
        DerivedMetricRecord::new(
            context,
            metrics.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        )
    }

    #[test]
    fn test_head_to_head() {
        let a = record("ana", &[("t_total", 70.0), ("v_promedio", 1.43), ("fatiga", 0.05)]);
        let b = record("luis", &[("t_total", 72.0), ("v_promedio", 1.39), ("brz_total", 40.0)]);

        let result = head_to_head(&a, &b, MetricCatalog::global()).unwrap();
        assert_eq!(result.comparisons.len(), 2);
        assert_eq!(result.comparisons[0].winner, Winner::First);
        assert_eq!(result.comparisons[0].difference, -2.0);
        assert!((result.comparisons[0].percentage_diff.unwrap() + 2.0 / 72.0 * 100.0).abs() < 1e-9);
        assert_eq!(result.overall, Winner::First);
        assert_eq!(result.first_wins, 2);
    }

    #[test]
    fn test_tie_and_zero_baseline() {
        let a = record("ana", &[("fatiga", 0.0)]);
        let b = record("luis", &[("fatiga", 0.0)]);

        let result = head_to_head(&a, &b, MetricCatalog::global()).unwrap();
        assert_eq!(result.comparisons[0].winner, Winner::Tie);
        assert_eq!(result.comparisons[0].percentage_diff, None);
        assert_eq!(result.overall, Winner::Tie);
    }
}
