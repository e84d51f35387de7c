//! Min-max normalization and composite scores.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::set::ComparisonSet;
use crate::error::Result;
use crate::metrics::{Directionality, MetricCatalog, MetricGroup};

/// Score given to every member when all reported values are equal.
pub const DEGENERATE_SCORE: f64 = 50.0;

/// Min-max normalize one metric across a set onto 0-100.
///
/// Members lacking the metric get `None` and do not take part in the range.
/// Values are not inverted for lower-is-better metrics.
pub fn normalize(set: &ComparisonSet, metric: &str) -> Vec<Option<f64>> {
    let values: Vec<Option<f64>> = set.members.iter().map(|m| m.value(metric)).collect();

    let present = values.iter().flatten().copied();
    let Some((min, max)) = present.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    }) else {
        return values;
    };

    let span = max - min;
    values
        .into_iter()
        .map(|v| {
            v.map(|v| {
                if span == 0.0 {
                    DEGENERATE_SCORE
                } else {
                    100.0 * (v - min) / span
                }
            })
        })
        .collect()
}

/// Scorer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Flip lower-is-better metrics so that a higher score is always better.
    pub orient_by_direction: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            orient_by_direction: true,
        }
    }
}

/// Normalized values of one metric, one per member in set order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricScores {
    pub metric: String,
    pub directionality: Directionality,
    pub raw: Vec<Option<f64>>,
    pub scores: Vec<Option<f64>>,
    /// True when `scores` were flipped for a lower-is-better metric.
    pub oriented: bool,
}

/// A member's composite score and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberScore {
    pub swimmer: String,
    /// Mean of the member's scores; absent when it reports none of the metrics.
    pub composite: Option<f64>,
    /// 1-based position by composite.
    pub rank: usize,
}

/// Scores for a comparison set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub metrics: Vec<MetricScores>,
    /// Members ordered by rank.
    pub members: Vec<MemberScore>,
    pub applicable: bool,
}

impl ScoreBoard {
    /// Board for a set too small or too large to compare.
    pub fn not_applicable() -> Self {
        Self {
            metrics: Vec::new(),
            members: Vec::new(),
            applicable: false,
        }
    }

    /// Member entry by swimmer name.
    pub fn member(&self, swimmer: &str) -> Option<&MemberScore> {
        self.members.iter().find(|m| m.swimmer == swimmer)
    }

    pub fn metric(&self, key: &str) -> Option<&MetricScores> {
        self.metrics.iter().find(|m| m.metric == key)
    }
}

/// Builds score boards for comparison sets.
pub struct Scorer<'a> {
    catalog: &'a MetricCatalog,
    config: ScoringConfig,
}

impl Default for Scorer<'static> {
    fn default() -> Self {
        Self::new(MetricCatalog::global())
    }
}

impl<'a> Scorer<'a> {
    pub fn new(catalog: &'a MetricCatalog) -> Self {
        Self {
            catalog,
            config: ScoringConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ScoringConfig) -> Self {
        self.config = config;
        self
    }

    /// Score the set over every metric of `group` its members report.
    pub fn score(&self, set: &ComparisonSet, group: MetricGroup) -> Result<ScoreBoard> {
        if !set.is_comparable() {
            return Ok(ScoreBoard::not_applicable());
        }

        let mut metrics = Vec::new();
        for key in set.metric_keys() {
            if self.catalog.get(&key)?.group == group {
                metrics.push(key);
            }
        }
        self.score_metrics(set, &metrics)
    }

    /// Score the set over an explicit list of metrics.
    pub fn score_metrics(&self, set: &ComparisonSet, metrics: &[String]) -> Result<ScoreBoard> {
        if !set.is_comparable() {
            return Ok(ScoreBoard::not_applicable());
        }

        let mut scored = Vec::with_capacity(metrics.len());
        for key in metrics {
            let directionality = self.catalog.directionality(key)?;
            let oriented =
                self.config.orient_by_direction && directionality == Directionality::LowerIsBetter;
            let scores = normalize(set, key)
                .into_iter()
                .map(|s| {
                    if oriented {
                        s.map(|s| directionality.orient(s))
                    } else {
                        s
                    }
                })
                .collect();

            scored.push(MetricScores {
                metric: key.clone(),
                directionality,
                raw: set.members.iter().map(|m| m.value(key)).collect(),
                scores,
                oriented,
            });
        }

        let mut members: Vec<MemberScore> = set
            .members
            .iter()
            .enumerate()
            .map(|(i, member)| {
                let own: Vec<f64> = scored.iter().filter_map(|m| m.scores[i]).collect();
                MemberScore {
                    swimmer: member.swimmer.clone(),
                    composite: (!own.is_empty())
                        .then(|| own.iter().sum::<f64>() / own.len() as f64),
                    rank: 0,
                }
            })
            .collect();

        members.sort_by(|a, b| {
            compare_composite(a.composite, b.composite).then_with(|| a.swimmer.cmp(&b.swimmer))
        });
        for (i, member) in members.iter_mut().enumerate() {
            member.rank = i + 1;
        }

        log::debug!(
            "scored {} members over {} metrics",
            members.len(),
            scored.len()
        );

        Ok(ScoreBoard {
            metrics: scored,
            members,
            applicable: true,
        })
    }
}

/// Higher composites first; members without one go last.
fn compare_composite(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::DerivedMetricRecord;
    use crate::race::{CourseLength, RaceContext};
    use crate::scoring::ComparisonMember;
    use chrono::NaiveDate;

    fn member(swimmer: &str, metrics: &[(&str, f64)]) -> ComparisonMember {
        let context = RaceContext::new(
            swimmer,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            100,
            CourseLength::Short,
            "libre",
            "final",
        );
        ComparisonMember::new(
            swimmer,
            DerivedMetricRecord::new(
                context,
                metrics.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            ),
        )
    }

    fn trio() -> ComparisonSet {
        ComparisonSet::new(vec![
            member("ana", &[("brz_total", 60.0), ("dist_x_brz", 1.6)]),
            member("luis", &[("brz_total", 70.0), ("dist_x_brz", 1.4)]),
            member("eva", &[("brz_total", 80.0)]),
        ])
    }

    #[test]
    fn test_normalize_range() {
        let set = trio();
        assert_eq!(
            normalize(&set, "brz_total"),
            vec![Some(0.0), Some(50.0), Some(100.0)]
        );
        assert_eq!(
            normalize(&set, "dist_x_brz"),
            vec![Some(100.0), Some(0.0), None]
        );
        assert_eq!(normalize(&set, "v_promedio"), vec![None, None, None]);
    }

    #[test]
    fn test_normalize_equal_values() {
        let set = ComparisonSet::new(vec![
            member("ana", &[("fatiga", 0.1)]),
            member("luis", &[("fatiga", 0.1)]),
        ]);
        assert_eq!(normalize(&set, "fatiga"), vec![Some(50.0), Some(50.0)]);
    }

    #[test]
    fn test_score_orients_lower_is_better() {
        let board = Scorer::default().score(&trio(), MetricGroup::Brazadas).unwrap();
        assert!(board.applicable);

        let strokes = board.metric("brz_total").unwrap();
        assert!(strokes.oriented);
        assert_eq!(strokes.scores, vec![Some(100.0), Some(50.0), Some(0.0)]);

        // ana: (100 + 100) / 2, luis: (50 + 0) / 2, eva: 0
        assert_eq!(board.members[0].swimmer, "ana");
        assert_eq!(board.member("ana").unwrap().composite, Some(100.0));
        assert_eq!(board.member("luis").unwrap().composite, Some(25.0));
        assert_eq!(board.member("eva").unwrap().rank, 3);
    }

    #[test]
    fn test_score_without_orientation() {
        let scorer = Scorer::default().with_config(ScoringConfig {
            orient_by_direction: false,
        });
        let board = scorer.score(&trio(), MetricGroup::Brazadas).unwrap();

        let strokes = board.metric("brz_total").unwrap();
        assert!(!strokes.oriented);
        assert_eq!(strokes.scores, vec![Some(0.0), Some(50.0), Some(100.0)]);
        assert_eq!(board.members[0].swimmer, "eva");
    }

    #[test]
    fn test_ties_rank_by_name() {
        let set = ComparisonSet::new(vec![
            member("luis", &[("v_promedio", 1.8)]),
            member("ana", &[("v_promedio", 1.8)]),
        ]);
        let board = Scorer::default().score(&set, MetricGroup::Velocidad).unwrap();

        assert_eq!(board.members[0].swimmer, "ana");
        assert_eq!(board.members[0].rank, 1);
        assert_eq!(board.members[1].rank, 2);
        assert_eq!(board.members[0].composite, Some(50.0));
    }

    #[test]
    fn test_not_applicable_sizes() {
        let single = ComparisonSet::new(vec![member("ana", &[("t_total", 60.0)])]);
        let board = Scorer::default().score(&single, MetricGroup::Tiempo).unwrap();
        assert!(!board.applicable);
        assert!(board.members.is_empty());

        let crowd = ComparisonSet::new(vec![member("ana", &[("t_total", 60.0)]); 6]);
        assert!(!Scorer::default().score(&crowd, MetricGroup::Tiempo).unwrap().applicable);
    }

    #[test]
    fn test_group_without_metrics() {
        let board = Scorer::default().score(&trio(), MetricGroup::Insights).unwrap();
        assert!(board.applicable);
        assert!(board.metrics.is_empty());
        assert!(board.members.iter().all(|m| m.composite.is_none()));
    }
}
