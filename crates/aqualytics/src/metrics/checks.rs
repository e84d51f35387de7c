//! Plausibility and consistency checks on raw race input.
//!
//! These run before derivation. Out-of-range values are warnings since odd
//! but real swims exist; contradictions between values are errors.

use serde::{Deserialize, Serialize};

use crate::error::{AquaError, Result};
use crate::race::{RaceContext, RawSegmentInput, SegmentConfig, SegmentField};
use crate::validation::{Diagnostic, DiagnosticCode};

use super::engine::RaceTotals;

/// Plausible ranges for raw values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    pub min_time: f64,
    pub max_time: f64,
    pub min_strokes: u32,
    pub max_strokes: u32,
    pub min_underwater: f64,
    pub max_underwater: f64,
    /// Longest race accepted, in meters.
    pub max_distance: u32,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            min_time: 0.1,
            max_time: 300.0,
            min_strokes: 1,
            max_strokes: 200,
            min_underwater: 0.0,
            max_underwater: 20.0,
            max_distance: 1500,
        }
    }
}

impl InputLimits {
    pub fn with_time_range(mut self, min: f64, max: f64) -> Self {
        self.min_time = min;
        self.max_time = max;
        self
    }

    pub fn with_stroke_range(mut self, min: u32, max: u32) -> Self {
        self.min_strokes = min;
        self.max_strokes = max;
        self
    }

    pub fn with_underwater_range(mut self, min: f64, max: f64) -> Self {
        self.min_underwater = min;
        self.max_underwater = max;
        self
    }

    pub fn with_max_distance(mut self, meters: u32) -> Self {
        self.max_distance = meters;
        self
    }

    /// Reject races longer than `max_distance`.
    pub fn check_distance(&self, distance: u32) -> Result<()> {
        if distance > self.max_distance {
            return Err(AquaError::InvalidInput(format!(
                "distance {}m exceeds the maximum of {}m",
                distance, self.max_distance
            )));
        }
        Ok(())
    }

    fn range(&self, field: SegmentField) -> Option<(f64, f64)> {
        match field {
            f if f.is_time() => Some((self.min_time, self.max_time)),
            SegmentField::StrokeCount => {
                Some((f64::from(self.min_strokes), f64::from(self.max_strokes)))
            }
            SegmentField::Underwater => Some((self.min_underwater, self.max_underwater)),
            _ => None,
        }
    }
}

/// Check one race's raw input against its configurations and the limits.
pub fn check_race(
    context: &RaceContext,
    segments: &[(SegmentConfig, RawSegmentInput)],
    totals: &RaceTotals,
    limits: &InputLimits,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (config, input) in segments {
        diagnostics.extend(input.check(config));
        check_ranges(config, input, limits, &mut diagnostics);

        if let (Some(t15), Some(t25)) = (
            input.configured(config, SegmentField::Split15),
            input.configured(config, SegmentField::Split25),
        ) {
            if t25 <= t15 {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticCode::SplitOrder,
                        format!(
                            "25m split ({}) must be greater than 15m split ({})",
                            t25, t15
                        ),
                    )
                    .with_column(SegmentField::Split25.name())
                    .with_segment(config.index),
                );
            }
        }
    }

    check_cumulative_order(segments, &mut diagnostics);
    check_totals(context, segments, totals, &mut diagnostics);

    diagnostics
}

fn check_ranges(
    config: &SegmentConfig,
    input: &RawSegmentInput,
    limits: &InputLimits,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for field in config.captured_fields() {
        let (Some(value), Some((min, max))) = (input.get(field), limits.range(field)) else {
            continue;
        };
        // Cumulative splits grow with the race; only the lower bound applies.
        let max = if field == SegmentField::CumulativeSplit {
            f64::INFINITY
        } else {
            max
        };
        if value.is_finite() && (value < min || value > max) {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::OutOfRange,
                    format!(
                        "'{}' = {} is outside the expected range {}..={}",
                        field, value, min, max
                    ),
                )
                .with_column(field.name())
                .with_segment(config.index),
            );
        }
    }
}

fn check_cumulative_order(
    segments: &[(SegmentConfig, RawSegmentInput)],
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut previous: Option<f64> = None;
    for (config, input) in segments {
        let Some(split) = input.configured(config, SegmentField::CumulativeSplit) else {
            continue;
        };
        if let Some(prev) = previous {
            if split <= prev {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticCode::SplitOrder,
                        format!(
                            "Split at {}m ({}) is not after the previous split ({})",
                            config.end_m(),
                            split,
                            prev
                        ),
                    )
                    .with_column(SegmentField::CumulativeSplit.name())
                    .with_segment(config.index),
                );
            }
        }
        previous = Some(split);
    }
}

fn check_totals(
    context: &RaceContext,
    segments: &[(SegmentConfig, RawSegmentInput)],
    totals: &RaceTotals,
    diagnostics: &mut Vec<Diagnostic>,
) {
    // Small tolerance for hand-typed hundredths.
    const TIME_EPSILON: f64 = 1e-6;

    if let Some(total) = totals.total_time {
        let segment_sum: f64 = segments
            .iter()
            .filter_map(|(config, input)| input.configured(config, SegmentField::SegmentTime))
            .sum();
        if total + TIME_EPSILON < segment_sum {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticCode::TotalTime,
                    format!(
                        "Total time {} is less than the sum of segment times {}",
                        total, segment_sum
                    ),
                )
                .with_column("t_total"),
            );
        }
    }

    if let Some(total) = totals.total_strokes {
        let segment_sum: u64 = segments
            .iter()
            .filter(|(config, _)| config.captures(SegmentField::StrokeCount))
            .filter_map(|(_, input)| input.stroke_count)
            .map(u64::from)
            .sum();
        if u64::from(total) < segment_sum {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticCode::TotalStrokes,
                    format!(
                        "Total strokes {} are less than the sum of segment strokes {}",
                        total, segment_sum
                    ),
                )
                .with_column("brz_total"),
            );
        }
    }

    let underwater: f64 = segments
        .iter()
        .filter_map(|(config, input)| input.configured(config, SegmentField::Underwater))
        .sum();
    if underwater >= f64::from(context.distance) && underwater > 0.0 {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::UnderwaterTotal,
            format!(
                "Underwater distance {}m reaches the race distance {}m",
                underwater, context.distance
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::{CourseLength, resolve};
    use chrono::NaiveDate;

    fn context(distance: u32, course: CourseLength) -> RaceContext {
        RaceContext::new(
            "luis",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            distance,
            course,
            "mariposa",
            "serie",
        )
    }

    #[test]
    fn test_clean_race_has_no_diagnostics() {
        let segments = vec![(
            resolve(50, CourseLength::Long, 0),
            RawSegmentInput::new()
                .with_split_15(6.2)
                .with_split_25(11.8)
                .with_segment_time(27.1)
                .with_stroke_count(22)
                .with_underwater(12.0),
        )];
        let totals = RaceTotals::new().with_total_time(27.1).with_total_strokes(22);

        let diags = check_race(
            &context(50, CourseLength::Long),
            &segments,
            &totals,
            &InputLimits::default(),
        );
        assert!(diags.is_empty(), "{:?}", diags);
    }

    #[test]
    fn test_split_order_and_totals() {
        let segments = vec![(
            resolve(50, CourseLength::Long, 0),
            RawSegmentInput::new()
                .with_split_15(12.0)
                .with_split_25(11.0)
                .with_segment_time(27.0)
                .with_stroke_count(24),
        )];
        let totals = RaceTotals::new().with_total_time(26.0).with_total_strokes(20);

        let codes: Vec<DiagnosticCode> = check_race(
            &context(50, CourseLength::Long),
            &segments,
            &totals,
            &InputLimits::default(),
        )
        .into_iter()
        .map(|d| d.code)
        .collect();

        assert!(codes.contains(&DiagnosticCode::SplitOrder));
        assert!(codes.contains(&DiagnosticCode::TotalTime));
        assert!(codes.contains(&DiagnosticCode::TotalStrokes));
    }

    #[test]
    fn test_out_of_range_is_warning() {
        let segments = vec![(
            resolve(100, CourseLength::Long, 0),
            RawSegmentInput::new()
                .with_segment_time(31.0)
                .with_stroke_count(250),
        )];

        let diags = check_race(
            &context(100, CourseLength::Long),
            &segments,
            &RaceTotals::default(),
            &InputLimits::default(),
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::OutOfRange);
        assert!(!diags[0].is_blocking());
    }

    #[test]
    fn test_stroke_sum_beyond_u32() {
        let segments: Vec<(SegmentConfig, RawSegmentInput)> = (0..2)
            .map(|i| {
                (
                    resolve(50, CourseLength::Short, i),
                    RawSegmentInput::new()
                        .with_segment_time(13.0)
                        .with_stroke_count(4_000_000_000),
                )
            })
            .collect();
        let totals = RaceTotals::new().with_total_strokes(5);

        let diags = check_race(
            &context(50, CourseLength::Short),
            &segments,
            &totals,
            &InputLimits::default(),
        );
        let strokes = diags
            .iter()
            .find(|d| d.code == DiagnosticCode::TotalStrokes)
            .unwrap();
        assert!(strokes.is_blocking());
        assert!(strokes.message.contains("8000000000"));
    }

    #[test]
    fn test_check_distance() {
        let limits = InputLimits::default();
        assert!(limits.check_distance(1500).is_ok());
        assert!(matches!(
            limits.check_distance(4_000_000_000),
            Err(AquaError::InvalidInput(_))
        ));
        assert!(limits.with_max_distance(5000).check_distance(3000).is_ok());
    }

    #[test]
    fn test_cumulative_splits_must_increase() {
        let segments: Vec<(SegmentConfig, RawSegmentInput)> = [15.0, 31.0, 30.0]
            .into_iter()
            .enumerate()
            .map(|(i, split)| {
                (
                    resolve(200, CourseLength::Short, i),
                    RawSegmentInput::new().with_cumulative_split(split),
                )
            })
            .collect();

        let diags = check_race(
            &context(200, CourseLength::Short),
            &segments,
            &RaceTotals::default(),
            &InputLimits::default(),
        );
        assert!(diags
            .iter()
            .any(|d| d.code == DiagnosticCode::SplitOrder && d.segment == Some(2)));
    }
}
