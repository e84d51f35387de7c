//! Derived metric records and the storage row contract.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::race::{CourseLength, RaceContext};

use super::catalog::MetricCatalog;

/// All metrics computed for one race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetricRecord {
    /// The race these metrics belong to.
    pub context: RaceContext,
    metrics: IndexMap<String, f64>,
}

/// Storage key of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub swimmer: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

/// One persisted metric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub swimmer: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    pub distance: u32,
    pub course: CourseLength,
    pub style: String,
    pub phase: String,
    pub metric: String,
    pub value: f64,
    pub unit: String,
}

impl MetricRow {
    fn context(&self) -> RaceContext {
        RaceContext {
            swimmer: self.swimmer.clone(),
            date: self.date,
            distance: self.distance,
            course: self.course,
            style: self.style.clone(),
            phase: self.phase.clone(),
            event: self.event.clone(),
        }
    }
}

impl DerivedMetricRecord {
    /// Create a record from a metric map.
    pub fn new(context: RaceContext, metrics: IndexMap<String, f64>) -> Self {
        Self { context, metrics }
    }

    /// Value of a metric.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).copied()
    }

    /// Metric keys in derivation order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(|k| k.as_str())
    }

    /// Metric map.
    pub fn metrics(&self) -> &IndexMap<String, f64> {
        &self.metrics
    }

    /// Number of metrics held.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Storage key.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            swimmer: self.context.swimmer.clone(),
            date: self.context.date,
            event: self.context.event.clone(),
        }
    }

    /// Flatten into one storage row per metric.
    pub fn to_rows(&self, catalog: &MetricCatalog) -> Result<Vec<MetricRow>> {
        self.metrics
            .iter()
            .map(|(metric, value)| {
                let definition = catalog.get(metric)?;
                Ok(MetricRow {
                    swimmer: self.context.swimmer.clone(),
                    date: self.context.date,
                    event: self.context.event.clone(),
                    distance: self.context.distance,
                    course: self.context.course,
                    style: self.context.style.clone(),
                    phase: self.context.phase.clone(),
                    metric: metric.clone(),
                    value: *value,
                    unit: definition.unit,
                })
            })
            .collect()
    }

    /// Regroup storage rows into records, in first-seen order.
    pub fn from_rows(rows: impl IntoIterator<Item = MetricRow>) -> Vec<DerivedMetricRecord> {
        let mut grouped: IndexMap<RaceContext, IndexMap<String, f64>> = IndexMap::new();

        for row in rows {
            grouped
                .entry(row.context())
                .or_default()
                .insert(row.metric, row.value);
        }

        grouped
            .into_iter()
            .map(|(context, metrics)| DerivedMetricRecord::new(context, metrics))
            .collect()
    }
}
