//! A swimmer's progression on one metric over a period.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AquaError, Result};
use crate::metrics::{DerivedMetricRecord, Directionality, MetricDefinition};

/// Look-back window ending at the reference date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Days7,
    #[default]
    Days30,
    Months3,
    Year1,
    All,
}

impl Period {
    /// First date inside the window, or `None` for an unbounded window.
    pub fn start(&self, as_of: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::Days7 => as_of.checked_sub_days(Days::new(7)),
            Period::Days30 => as_of.checked_sub_days(Days::new(30)),
            Period::Months3 => as_of.checked_sub_months(Months::new(3)),
            Period::Year1 => as_of.checked_sub_months(Months::new(12)),
            Period::All => None,
        }
    }
}

impl FromStr for Period {
    type Err = AquaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "7d" => Ok(Period::Days7),
            "30d" => Ok(Period::Days30),
            "3m" => Ok(Period::Months3),
            "1y" => Ok(Period::Year1),
            "all" => Ok(Period::All),
            other => Err(AquaError::InvalidInput(format!(
                "unknown period '{}'; use 7d, 30d, 3m, 1y or all",
                other
            ))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Period::Days7 => "7d",
            Period::Days30 => "30d",
            Period::Months3 => "3m",
            Period::Year1 => "1y",
            Period::All => "all",
        };
        f.write_str(s)
    }
}

/// Direction of change over the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

/// One race on the progression chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

/// Progression of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub swimmer: String,
    pub metric: String,
    pub period: Period,
    /// Points in date order.
    pub points: Vec<ProgressPoint>,
    pub best: Option<f64>,
    pub worst: Option<f64>,
    pub mean: Option<f64>,
    /// Change from the first to the last point; positive means better.
    pub improvement_percent: Option<f64>,
    pub trend: Trend,
}

/// Build the progression of `swimmer` on `metric` within `period` ending at
/// `as_of`. A change within `stable_threshold` percent counts as stable.
pub fn progression(
    records: &[DerivedMetricRecord],
    swimmer: &str,
    metric: &MetricDefinition,
    period: Period,
    as_of: NaiveDate,
    stable_threshold: f64,
) -> Progression {
    let start = period.start(as_of);

    let mut points: Vec<ProgressPoint> = records
        .iter()
        .filter(|r| r.context.swimmer == swimmer)
        .filter(|r| r.context.date <= as_of && start.is_none_or(|s| r.context.date >= s))
        .filter_map(|r| {
            let value = r.get(&metric.key).filter(|v| !v.is_nan())?;
            Some(ProgressPoint {
                date: r.context.date,
                value,
                event: r.context.event.clone(),
            })
        })
        .collect();
    points.sort_by_key(|p| p.date);

    let direction = metric.directionality;
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();

    let best = values.iter().copied().reduce(|a, b| direction.best(b, a));
    let worst = values
        .iter()
        .copied()
        .reduce(|a, b| if direction.is_better(a, b) { b } else { a });
    let mean = (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64);

    let improvement_percent = match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if values.len() >= 2 && first != 0.0 => Some(match direction {
            Directionality::LowerIsBetter => (first - last) / first * 100.0,
            Directionality::HigherIsBetter => (last - first) / first * 100.0,
        }),
        _ => None,
    };

    let trend = match improvement_percent {
        Some(p) if p > stable_threshold => Trend::Improving,
        Some(p) if p < -stable_threshold => Trend::Declining,
        _ => Trend::Stable,
    };

    Progression {
        swimmer: swimmer.to_string(),
        metric: metric.key.clone(),
        period,
        points,
        best,
        worst,
        mean,
        improvement_percent,
        trend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricCatalog;
    use crate::race::{CourseLength, RaceContext};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn record(swimmer: &str, on: NaiveDate, time: f64) -> DerivedMetricRecord {
        let context = RaceContext::new(swimmer, on, 50, CourseLength::Short, "libre", "final");
        DerivedMetricRecord::new(context, [("t_total".to_string(), time)].into_iter().collect())
    }

    fn history() -> Vec<DerivedMetricRecord> {
        vec![
            record("ana", date(6, 20), 27.0),
            record("ana", date(1, 10), 29.0),
            record("ana", date(5, 1), 28.0),
            record("luis", date(6, 1), 25.0),
            record("ana", date(7, 2), 26.0),
        ]
    }

    #[test]
    fn test_period_start() {
        assert_eq!(Period::Days7.start(date(3, 10)), Some(date(3, 3)));
        assert_eq!(Period::Months3.start(date(5, 31)), Some(date(2, 29)));
        assert_eq!(Period::All.start(date(3, 10)), None);
        assert_eq!("1Y".parse::<Period>().unwrap(), Period::Year1);
        assert!("2w".parse::<Period>().is_err());
    }

    #[test]
    fn test_progression_improving_time() {
        let metric = MetricCatalog::global().get("t_total").unwrap();
        let prog = progression(&history(), "ana", &metric, Period::Months3, date(6, 30), 1.0);

        let dates: Vec<NaiveDate> = prog.points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(5, 1), date(6, 20)]);
        assert_eq!(prog.best, Some(27.0));
        assert_eq!(prog.worst, Some(28.0));
        assert_eq!(prog.mean, Some(27.5));
        assert!((prog.improvement_percent.unwrap() - 100.0 / 28.0).abs() < 1e-9);
        assert_eq!(prog.trend, Trend::Improving);
    }

    #[test]
    fn test_progression_all_and_stable() {
        let metric = MetricCatalog::global().get("t_total").unwrap();
        let prog = progression(&history(), "ana", &metric, Period::All, date(12, 31), 20.0);

        assert_eq!(prog.points.len(), 4);
        assert_eq!(prog.points[0].date, date(1, 10));
        assert_eq!(prog.trend, Trend::Stable);
    }

    #[test]
    fn test_progression_empty() {
        let metric = MetricCatalog::global().get("t_total").unwrap();
        let prog = progression(&history(), "eva", &metric, Period::All, date(12, 31), 1.0);

        assert!(prog.points.is_empty());
        assert_eq!(prog.best, None);
        assert_eq!(prog.improvement_percent, None);
        assert_eq!(prog.trend, Trend::Stable);
    }
}
