//! Metric derivation engine.
//!
//! Turns the raw values captured for each segment of one race into a
//! [`DerivedMetricRecord`]. A missing required field aborts the whole race;
//! anything else that prevents a formula from being computed only drops that
//! metric and is reported in [`Derivation::failures`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AquaError, DerivationError, Result};
use crate::race::{RaceContext, RawSegmentInput, SegmentConfig, SegmentField, plan};

use super::checks::InputLimits;
use super::record::DerivedMetricRecord;

/// Race-level totals reported alongside the segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceTotals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_strokes: Option<u32>,
}

impl RaceTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_total_time(mut self, seconds: f64) -> Self {
        self.total_time = Some(seconds);
        self
    }

    pub fn with_total_strokes(mut self, strokes: u32) -> Self {
        self.total_strokes = Some(strokes);
        self
    }
}

/// Outcome of deriving one race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derivation {
    pub record: DerivedMetricRecord,
    /// Metrics that could not be computed, in derivation order.
    pub failures: Vec<DerivationError>,
}

impl Derivation {
    /// True if every formula produced a value.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Per-segment values after the configuration has been applied.
struct SegmentValues {
    time: Option<f64>,
    strokes: Option<u32>,
    rate: Option<f64>,
    underwater: Option<f64>,
    velocity: Option<f64>,
}

/// Collects metrics and failures in derivation order.
#[derive(Default)]
struct Accumulator {
    metrics: IndexMap<String, f64>,
    failures: Vec<DerivationError>,
}

impl Accumulator {
    fn put(&mut self, key: impl Into<String>, value: f64) {
        self.metrics.insert(key.into(), value);
    }

    fn fail(&mut self, error: DerivationError) {
        log::debug!("{}", error);
        self.failures.push(error);
    }

    /// `numerator / denominator`, failing the metric when the denominator is
    /// missing or not positive.
    fn ratio(
        &mut self,
        metric: &str,
        numerator: f64,
        denominator: Option<f64>,
        denominator_name: &str,
    ) -> Option<f64> {
        match denominator {
            None => {
                self.fail(DerivationError::MissingValue {
                    metric: metric.to_string(),
                    input: denominator_name.to_string(),
                });
                None
            }
            Some(d) if d <= 0.0 => {
                self.fail(DerivationError::ZeroDenominator {
                    metric: metric.to_string(),
                    denominator: denominator_name.to_string(),
                });
                None
            }
            Some(d) => {
                let value = numerator / d;
                self.put(metric, value);
                Some(value)
            }
        }
    }
}

/// Engine deriving metrics for one race at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricEngine {
    limits: InputLimits,
}

impl MetricEngine {
    /// Create a new metric engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine bounded by custom input limits.
    pub fn with_limits(limits: InputLimits) -> Self {
        Self { limits }
    }

    /// Derive metrics from segment inputs paired with their configurations.
    pub fn derive(
        &self,
        context: &RaceContext,
        segments: &[(SegmentConfig, RawSegmentInput)],
    ) -> Result<Derivation> {
        self.derive_with_totals(context, segments, &RaceTotals::default())
    }

    /// Derive metrics, preferring explicit race totals over segment sums.
    pub fn derive_with_totals(
        &self,
        context: &RaceContext,
        segments: &[(SegmentConfig, RawSegmentInput)],
        totals: &RaceTotals,
    ) -> Result<Derivation> {
        for (config, input) in segments {
            for field in config.captured_fields() {
                if config.is_required(field) && input.get(field).is_none() {
                    return Err(AquaError::IncompleteInput {
                        segment: config.index,
                        field,
                    });
                }
            }
        }

        let mut acc = Accumulator::default();
        let values = self.segment_values(segments, &mut acc);
        self.race_level(context, segments, &values, totals, &mut acc);

        Ok(Derivation {
            record: DerivedMetricRecord::new(context.clone(), acc.metrics),
            failures: acc.failures,
        })
    }

    /// Resolve the configuration of every segment of the race, then derive.
    ///
    /// `inputs[i]` belongs to segment `i`; missing trailing inputs count as
    /// empty segments.
    pub fn derive_race(
        &self,
        context: &RaceContext,
        inputs: &[RawSegmentInput],
        totals: &RaceTotals,
    ) -> Result<Derivation> {
        self.limits.check_distance(context.distance)?;
        let plan = plan(context.distance, context.course);
        if inputs.len() > plan.segments.len() {
            return Err(AquaError::InvalidInput(format!(
                "{} segment inputs supplied for a {}m {} course race of {} segments",
                inputs.len(),
                context.distance,
                context.course,
                plan.segments.len()
            )));
        }

        let segments: Vec<(SegmentConfig, RawSegmentInput)> = plan
            .segments
            .into_iter()
            .enumerate()
            .map(|(i, config)| {
                let input = inputs.get(i).cloned().unwrap_or_default();
                (config, input)
            })
            .collect();

        self.derive_with_totals(context, &segments, totals)
    }

    fn segment_values(
        &self,
        segments: &[(SegmentConfig, RawSegmentInput)],
        acc: &mut Accumulator,
    ) -> Vec<SegmentValues> {
        let mut previous_split: Option<f64> = Some(0.0);
        let mut values = Vec::with_capacity(segments.len());

        for (config, input) in segments {
            let n = config.index + 1;
            let read = |field: SegmentField| input.configured(config, field);

            if let Some(t15) = read(SegmentField::Split15) {
                acc.put(format!("t15_{}", n), t15);
            }
            if let Some(t25) = read(SegmentField::Split25) {
                acc.put(format!("t25_{}", n), t25);
            }

            let time = if config.captures(SegmentField::SegmentTime) {
                read(SegmentField::SegmentTime)
            } else if config.captures(SegmentField::CumulativeSplit) {
                let split = read(SegmentField::CumulativeSplit);
                let time = match (split, previous_split) {
                    (Some(split), Some(previous)) => Some(split - previous),
                    _ => None,
                };
                previous_split = split;
                time
            } else {
                // An untimed segment breaks the running split chain.
                previous_split = None;
                None
            };
            if let Some(time) = time {
                acc.put(format!("t_seg_{}", n), time);
            }

            let strokes = if config.captures(SegmentField::StrokeCount) {
                input.stroke_count
            } else {
                None
            };
            if let Some(strokes) = strokes {
                acc.put(format!("brz_{}", n), f64::from(strokes));
            }

            let underwater = read(SegmentField::Underwater);
            if let Some(underwater) = underwater {
                acc.put(format!("f{}", n), underwater);
            }

            let length = f64::from(config.length_m);
            let velocity_key = format!("v{}", n);
            let time_name = format!("t_seg_{}", n);
            let velocity = acc.ratio(&velocity_key, length, time, &time_name);

            values.push(SegmentValues {
                time,
                strokes,
                rate: read(SegmentField::StrokeRate),
                underwater,
                velocity,
            });
        }

        values
    }

    fn race_level(
        &self,
        context: &RaceContext,
        segments: &[(SegmentConfig, RawSegmentInput)],
        values: &[SegmentValues],
        totals: &RaceTotals,
        acc: &mut Accumulator,
    ) {
        let distance = f64::from(context.distance);

        // Totals
        let total_time = totals.total_time.or_else(|| {
            let cumulative = segments
                .last()
                .filter(|(config, _)| config.captures(SegmentField::CumulativeSplit))
                .and_then(|(config, input)| {
                    input.configured(config, SegmentField::CumulativeSplit)
                });
            cumulative.or_else(|| sum_all(values.iter().map(|v| v.time)))
        });
        if let Some(total) = total_time {
            acc.put("t_total", total);
        }

        let total_strokes = totals
            .total_strokes
            .map(f64::from)
            .or_else(|| sum_all(values.iter().map(|v| v.strokes.map(f64::from))));
        if let Some(total) = total_strokes {
            acc.put("brz_total", total);
        }

        let average_velocity = acc.ratio("v_promedio", distance, total_time, "t_total");
        acc.ratio("dist_x_brz", distance, total_strokes, "brz_total");

        // Underwater
        let underwater: Vec<f64> = values.iter().filter_map(|v| v.underwater).collect();
        let (dist_sin_f, f_promedio) = if underwater.is_empty() {
            for metric in ["dist_sin_f", "f_promedio"] {
                acc.fail(DerivationError::NoSamples {
                    metric: metric.to_string(),
                });
            }
            (None, None)
        } else {
            let sum: f64 = underwater.iter().sum();
            let mean = sum / underwater.len() as f64;
            acc.put("dist_sin_f", distance - sum);
            acc.put("f_promedio", mean);
            (Some(distance - sum), Some(mean))
        };

        let rates: Vec<f64> = values.iter().filter_map(|v| v.rate).collect();
        if !rates.is_empty() {
            acc.put("frec_promedio", rates.iter().sum::<f64>() / rates.len() as f64);
        }

        // Insights, only from inputs that were derived
        if let Some(v_avg) = average_velocity {
            if total_strokes.is_some() {
                acc.ratio("eficiencia", v_avg, total_strokes, "brz_total");
            }

            if let Some((first, last)) = first_and_last_velocity(values) {
                acc.put("consistencia", 1.0 - (first - last).abs() / v_avg);
            }
        }

        if let Some((first, last)) = first_and_last_velocity(values) {
            acc.ratio("fatiga", first - last, Some(first), "v1");
        }

        if let (Some(mean), Some(_)) = (f_promedio, dist_sin_f) {
            acc.ratio("tecnica", mean, dist_sin_f, "dist_sin_f");
        }

        let omitted = values.iter().filter(|v| v.velocity.is_none()).count();
        if omitted > 0 {
            log::debug!(
                "{} of {} segment velocities omitted for {} {}m",
                omitted,
                values.len(),
                context.swimmer,
                context.distance
            );
        }
    }
}

/// Sum of every value, or `None` if the sequence is empty or any is missing.
fn sum_all(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut total = 0.0;
    let mut seen = false;
    for value in values {
        total += value?;
        seen = true;
    }
    seen.then_some(total)
}

/// Velocities of the first and last segment, when the race has at least two
/// segments and both were derived.
fn first_and_last_velocity(values: &[SegmentValues]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let first = values.first()?.velocity?;
    let last = values.last()?.velocity?;
    Some((first, last))
}
