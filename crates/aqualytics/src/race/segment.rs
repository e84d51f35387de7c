//! Segment capture configuration and raw per-segment inputs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::{Diagnostic, DiagnosticCode};

/// Whether a raw field is captured for a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capture {
    /// Not captured; any supplied value is ignored.
    Off,
    /// Captured when available.
    Optional,
    /// Must be supplied.
    Required,
}

impl Capture {
    /// True unless the field is off.
    pub fn is_captured(&self) -> bool {
        !matches!(self, Capture::Off)
    }
}

/// A raw field that can be captured for a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentField {
    Split15,
    Split25,
    SegmentTime,
    CumulativeSplit,
    StrokeCount,
    StrokeRate,
    Underwater,
}

impl SegmentField {
    /// All fields in capture order.
    pub const ALL: [SegmentField; 7] = [
        SegmentField::Split15,
        SegmentField::Split25,
        SegmentField::SegmentTime,
        SegmentField::CumulativeSplit,
        SegmentField::StrokeCount,
        SegmentField::StrokeRate,
        SegmentField::Underwater,
    ];

    /// Snake-case field name.
    pub fn name(&self) -> &'static str {
        match self {
            SegmentField::Split15 => "split_15",
            SegmentField::Split25 => "split_25",
            SegmentField::SegmentTime => "segment_time",
            SegmentField::CumulativeSplit => "cumulative_split",
            SegmentField::StrokeCount => "stroke_count",
            SegmentField::StrokeRate => "stroke_rate",
            SegmentField::Underwater => "underwater",
        }
    }

    /// True for fields measured in seconds.
    pub fn is_time(&self) -> bool {
        matches!(
            self,
            SegmentField::Split15
                | SegmentField::Split25
                | SegmentField::SegmentTime
                | SegmentField::CumulativeSplit
        )
    }
}

impl fmt::Display for SegmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies which resolver rule produced a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    FiftyLongFirst,
    FiftyShort,
    LongCourse,
    LongDistanceShortCourse,
    Standard,
}

/// Which raw fields to capture for one segment of a race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Zero-based segment position.
    pub index: usize,
    /// Distance at which the segment starts.
    pub start_m: u32,
    /// Nominal segment length in meters.
    pub length_m: u32,
    /// Display label, e.g. "25-50m".
    pub label: String,
    pub split_15: Capture,
    pub split_25: Capture,
    pub segment_time: Capture,
    /// Race-level split taken at the end of this segment.
    pub cumulative_split: Capture,
    pub stroke_count: Capture,
    pub stroke_rate: Capture,
    pub underwater: Capture,
    /// Rule that produced this configuration.
    pub rule: RuleId,
}

impl SegmentConfig {
    /// Capture setting for a field.
    pub fn capture(&self, field: SegmentField) -> Capture {
        match field {
            SegmentField::Split15 => self.split_15,
            SegmentField::Split25 => self.split_25,
            SegmentField::SegmentTime => self.segment_time,
            SegmentField::CumulativeSplit => self.cumulative_split,
            SegmentField::StrokeCount => self.stroke_count,
            SegmentField::StrokeRate => self.stroke_rate,
            SegmentField::Underwater => self.underwater,
        }
    }

    /// True if the field is captured (required or optional).
    pub fn captures(&self, field: SegmentField) -> bool {
        self.capture(field).is_captured()
    }

    /// True if the field must be supplied.
    pub fn is_required(&self, field: SegmentField) -> bool {
        self.capture(field) == Capture::Required
    }

    /// Fields this segment captures, in capture order.
    pub fn captured_fields(&self) -> Vec<SegmentField> {
        SegmentField::ALL
            .into_iter()
            .filter(|f| self.captures(*f))
            .collect()
    }

    /// Distance at which the segment ends.
    pub fn end_m(&self) -> u32 {
        self.start_m + self.length_m
    }

    /// Copy of this configuration capturing nothing, for segments a source
    /// did not report.
    pub fn uncaptured(mut self) -> Self {
        self.split_15 = Capture::Off;
        self.split_25 = Capture::Off;
        self.segment_time = Capture::Off;
        self.cumulative_split = Capture::Off;
        self.stroke_count = Capture::Off;
        self.stroke_rate = Capture::Off;
        self.underwater = Capture::Off;
        self
    }
}

/// Values supplied for one segment by a form or a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSegmentInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_15: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_25: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cumulative_split: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_count: Option<u32>,
    /// Stroke cycles per minute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_rate: Option<f64>,
    /// Underwater distance in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underwater: Option<f64>,
}

impl RawSegmentInput {
    /// Create an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_split_15(mut self, seconds: f64) -> Self {
        self.split_15 = Some(seconds);
        self
    }

    pub fn with_split_25(mut self, seconds: f64) -> Self {
        self.split_25 = Some(seconds);
        self
    }

    pub fn with_segment_time(mut self, seconds: f64) -> Self {
        self.segment_time = Some(seconds);
        self
    }

    pub fn with_cumulative_split(mut self, seconds: f64) -> Self {
        self.cumulative_split = Some(seconds);
        self
    }

    pub fn with_stroke_count(mut self, strokes: u32) -> Self {
        self.stroke_count = Some(strokes);
        self
    }

    pub fn with_stroke_rate(mut self, cycles_per_minute: f64) -> Self {
        self.stroke_rate = Some(cycles_per_minute);
        self
    }

    pub fn with_underwater(mut self, meters: f64) -> Self {
        self.underwater = Some(meters);
        self
    }

    /// Value of a field as a float, regardless of its configuration.
    pub fn get(&self, field: SegmentField) -> Option<f64> {
        match field {
            SegmentField::Split15 => self.split_15,
            SegmentField::Split25 => self.split_25,
            SegmentField::SegmentTime => self.segment_time,
            SegmentField::CumulativeSplit => self.cumulative_split,
            SegmentField::StrokeCount => self.stroke_count.map(f64::from),
            SegmentField::StrokeRate => self.stroke_rate,
            SegmentField::Underwater => self.underwater,
        }
    }

    /// Value of a field only if the configuration captures it.
    pub fn configured(&self, config: &SegmentConfig, field: SegmentField) -> Option<f64> {
        if config.captures(field) {
            self.get(field)
        } else {
            None
        }
    }

    /// Copy of this input with every unconfigured field cleared.
    pub fn restricted_to(&self, config: &SegmentConfig) -> Self {
        let keep = |field: SegmentField| config.captures(field);
        Self {
            split_15: self.split_15.filter(|_| keep(SegmentField::Split15)),
            split_25: self.split_25.filter(|_| keep(SegmentField::Split25)),
            segment_time: self.segment_time.filter(|_| keep(SegmentField::SegmentTime)),
            cumulative_split: self
                .cumulative_split
                .filter(|_| keep(SegmentField::CumulativeSplit)),
            stroke_count: self.stroke_count.filter(|_| keep(SegmentField::StrokeCount)),
            stroke_rate: self.stroke_rate.filter(|_| keep(SegmentField::StrokeRate)),
            underwater: self.underwater.filter(|_| keep(SegmentField::Underwater)),
        }
    }

    /// Check this input against the invariants of its segment configuration.
    pub fn check(&self, config: &SegmentConfig) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for field in SegmentField::ALL {
            let Some(value) = self.get(field) else {
                continue;
            };

            if !config.captures(field) {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticCode::UnconfiguredField,
                        format!(
                            "Segment {} ({}) does not capture '{}'",
                            config.index + 1,
                            config.label,
                            field
                        ),
                    )
                    .with_column(field.name())
                    .with_segment(config.index),
                );
                continue;
            }

            if !value.is_finite() {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticCode::NonFiniteValue,
                        format!("'{}' must be a finite number", field),
                    )
                    .with_column(field.name())
                    .with_segment(config.index),
                );
            } else if value < 0.0 {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticCode::NegativeValue,
                        format!("'{}' cannot be negative (got {})", field, value),
                    )
                    .with_column(field.name())
                    .with_segment(config.index),
                );
            } else if field == SegmentField::Underwater && value > f64::from(config.length_m) {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticCode::UnderwaterExceedsSegment,
                        format!(
                            "Underwater distance {}m exceeds the {}m segment",
                            value, config.length_m
                        ),
                    )
                    .with_column(field.name())
                    .with_segment(config.index),
                );
            }
        }

        diagnostics
    }
}
