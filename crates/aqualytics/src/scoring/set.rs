//! Comparison sets for radar-style scoring.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::metrics::DerivedMetricRecord;

/// Smallest set that can be compared.
pub const MIN_MEMBERS: usize = 2;
/// Largest set that can be compared.
pub const MAX_MEMBERS: usize = 5;

/// One swimmer in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMember {
    pub swimmer: String,
    pub record: DerivedMetricRecord,
}

impl ComparisonMember {
    pub fn new(swimmer: impl Into<String>, record: DerivedMetricRecord) -> Self {
        Self {
            swimmer: swimmer.into(),
            record,
        }
    }

    /// Member whose metrics are the per-metric averages of several records.
    ///
    /// The most recent record provides the race context. `None` when there
    /// are no records.
    pub fn averaged(swimmer: impl Into<String>, records: &[&DerivedMetricRecord]) -> Option<Self> {
        let latest = records.iter().max_by_key(|r| r.context.date)?;

        let mut sums: IndexMap<String, (f64, usize)> = IndexMap::new();
        for record in records {
            for (metric, &value) in record.metrics() {
                if value.is_nan() {
                    continue;
                }
                let entry = sums.entry(metric.clone()).or_insert((0.0, 0));
                entry.0 += value;
                entry.1 += 1;
            }
        }

        let metrics = sums
            .into_iter()
            .map(|(metric, (sum, count))| (metric, sum / count as f64))
            .collect();

        Some(Self::new(
            swimmer,
            DerivedMetricRecord::new(latest.context.clone(), metrics),
        ))
    }

    /// Value of a metric, NaN treated as absent.
    pub fn value(&self, metric: &str) -> Option<f64> {
        self.record.get(metric).filter(|v| !v.is_nan())
    }
}

/// Swimmers compared in one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSet {
    pub members: Vec<ComparisonMember>,
}

impl ComparisonSet {
    pub fn new(members: Vec<ComparisonMember>) -> Self {
        Self { members }
    }

    /// Build a set from stored records: one averaged member per swimmer, in
    /// the requested order, restricted to a style and distance when given.
    /// Swimmers without matching records are left out.
    pub fn from_records(
        records: &[DerivedMetricRecord],
        swimmers: &[String],
        style: Option<&str>,
        distance: Option<u32>,
    ) -> Self {
        let members = swimmers
            .iter()
            .filter_map(|swimmer| {
                let mine: Vec<&DerivedMetricRecord> = records
                    .iter()
                    .filter(|r| &r.context.swimmer == swimmer)
                    .filter(|r| style.is_none_or(|s| r.context.style.eq_ignore_ascii_case(s)))
                    .filter(|r| distance.is_none_or(|d| r.context.distance == d))
                    .collect();
                ComparisonMember::averaged(swimmer.as_str(), &mine)
            })
            .collect();
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True for sets of two to five members.
    pub fn is_comparable(&self) -> bool {
        (MIN_MEMBERS..=MAX_MEMBERS).contains(&self.members.len())
    }

    /// Metric keys reported by any member, in first-seen order.
    pub fn metric_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for member in &self.members {
            for key in member.record.keys() {
                if !keys.iter().any(|k| k == key) {
                    keys.push(key.to_string());
                }
            }
        }
        keys
    }
}
