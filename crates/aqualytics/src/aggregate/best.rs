//! Best performances.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::{DerivedMetricRecord, MetricCatalog, MetricDefinition};

/// The record holding the best value of a metric.
///
/// Records lacking the metric (or holding NaN) are skipped. Ties go to the
/// earliest race date, then to the first occurrence.
pub fn best_of<'a>(
    records: &'a [DerivedMetricRecord],
    metric: &MetricDefinition,
) -> Option<&'a DerivedMetricRecord> {
    let mut best: Option<(&DerivedMetricRecord, f64)> = None;

    for record in records {
        let Some(value) = record.get(&metric.key).filter(|v| !v.is_nan()) else {
            continue;
        };

        best = match best {
            None => Some((record, value)),
            Some((incumbent, incumbent_value)) => {
                let better = metric.directionality.is_better(value, incumbent_value);
                let earlier_tie =
                    value == incumbent_value && record.context.date < incumbent.context.date;
                if better || earlier_tie {
                    Some((record, value))
                } else {
                    Some((incumbent, incumbent_value))
                }
            }
        };
    }

    best.map(|(record, _)| record)
}

/// A swimmer's best value for one metric in one event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalBest {
    pub style: String,
    pub distance: u32,
    pub metric: String,
    pub value: f64,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

/// Personal bests of a swimmer, one per (style, distance, metric), in
/// first-seen order.
pub fn personal_bests(
    records: &[DerivedMetricRecord],
    swimmer: &str,
    catalog: &MetricCatalog,
) -> Result<Vec<PersonalBest>> {
    let mut bests: IndexMap<(String, u32, String), PersonalBest> = IndexMap::new();

    for record in records.iter().filter(|r| r.context.swimmer == swimmer) {
        for (metric, &value) in record.metrics() {
            if value.is_nan() {
                continue;
            }
            let directionality = catalog.directionality(metric)?;
            let key = (
                record.context.style.clone(),
                record.context.distance,
                metric.clone(),
            );

            let candidate = PersonalBest {
                style: record.context.style.clone(),
                distance: record.context.distance,
                metric: metric.clone(),
                value,
                date: record.context.date,
                event: record.context.event.clone(),
            };

            match bests.get_mut(&key) {
                None => {
                    bests.insert(key, candidate);
                }
                Some(current) => {
                    let better = directionality.is_better(value, current.value);
                    let earlier_tie = value == current.value && candidate.date < current.date;
                    if better || earlier_tie {
                        *current = candidate;
                    }
                }
            }
        }
    }

    Ok(bests.into_values().collect())
}
