//! Segment configuration resolver.
//!
//! Which raw fields a timer captures depends on the race distance, the pool
//! and the position of the segment. The decision matrix is an ordered rule
//! table; the first rule whose predicate matches decides the capture shape.
//! Unknown combinations fall through to the standard rule, so resolution never
//! fails.

use serde::{Deserialize, Serialize};

use super::context::CourseLength;
use super::segment::{Capture, RuleId, SegmentConfig};

use Capture::{Off, Optional, Required};

/// Capture flags for one rule, before segment geometry is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureShape {
    pub split_15: Capture,
    pub split_25: Capture,
    pub segment_time: Capture,
    pub cumulative_split: Capture,
    pub stroke_count: Capture,
    pub stroke_rate: Capture,
    pub underwater: Capture,
}

/// A predicate paired with the capture shape it selects.
pub struct CaptureRule {
    pub id: RuleId,
    pub applies: fn(u32, CourseLength, usize) -> bool,
    pub shape: CaptureShape,
}

const STANDARD: CaptureShape = CaptureShape {
    split_15: Off,
    split_25: Off,
    segment_time: Required,
    cumulative_split: Off,
    stroke_count: Optional,
    stroke_rate: Optional,
    underwater: Optional,
};

/// The resolver's rule table, in priority order.
pub static RULES: &[CaptureRule] = &[
    CaptureRule {
        id: RuleId::FiftyLongFirst,
        applies: |distance, course, index| {
            distance == 50 && course == CourseLength::Long && index == 0
        },
        shape: CaptureShape {
            split_15: Optional,
            split_25: Optional,
            ..STANDARD
        },
    },
    CaptureRule {
        id: RuleId::FiftyShort,
        applies: |distance, course, _| distance == 50 && course == CourseLength::Short,
        shape: CaptureShape {
            split_15: Optional,
            ..STANDARD
        },
    },
    CaptureRule {
        id: RuleId::LongCourse,
        applies: |distance, course, _| distance > 50 && course == CourseLength::Long,
        shape: STANDARD,
    },
    CaptureRule {
        id: RuleId::LongDistanceShortCourse,
        applies: |distance, course, _| distance >= 200 && course == CourseLength::Short,
        shape: CaptureShape {
            segment_time: Off,
            cumulative_split: Required,
            ..STANDARD
        },
    },
    CaptureRule {
        id: RuleId::Standard,
        applies: |_, _, _| true,
        shape: STANDARD,
    },
];

/// Find the first rule matching a race position.
pub fn matching_rule(distance: u32, course: CourseLength, segment_index: usize) -> &'static CaptureRule {
    RULES
        .iter()
        .find(|rule| (rule.applies)(distance, course, segment_index))
        .unwrap_or(&RULES[RULES.len() - 1])
}

/// Number of segments a race splits into.
pub fn segment_count(distance: u32, course: CourseLength) -> usize {
    let pool = course.pool_length();
    distance.div_ceil(pool) as usize
}

/// Resolve the capture configuration for one segment.
pub fn resolve(distance: u32, course: CourseLength, segment_index: usize) -> SegmentConfig {
    let rule = matching_rule(distance, course, segment_index);
    let pool = course.pool_length();

    let start_m = (segment_index as u32).saturating_mul(pool);
    let length_m = if start_m < distance {
        (distance - start_m).min(pool)
    } else {
        pool
    };
    let label = format!("{}-{}m", start_m, start_m.saturating_add(length_m));

    SegmentConfig {
        index: segment_index,
        start_m,
        length_m,
        label,
        split_15: rule.shape.split_15,
        split_25: rule.shape.split_25,
        segment_time: rule.shape.segment_time,
        cumulative_split: rule.shape.cumulative_split,
        stroke_count: rule.shape.stroke_count,
        stroke_rate: rule.shape.stroke_rate,
        underwater: rule.shape.underwater,
        rule: rule.id,
    }
}

/// Full capture plan for a race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPlan {
    pub distance: u32,
    pub course: CourseLength,
    pub segments: Vec<SegmentConfig>,
    /// Cumulative split marks in meters, for races timed with aggregate splits.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aggregate_splits: Vec<u32>,
}

/// Resolve every segment of a race.
pub fn plan(distance: u32, course: CourseLength) -> SplitPlan {
    let segments: Vec<SegmentConfig> = (0..segment_count(distance, course))
        .map(|index| resolve(distance, course, index))
        .collect();

    let aggregate_splits = if segments.iter().any(|s| s.cumulative_split.is_captured()) {
        (1..)
            .map(|n| n * 25)
            .take_while(|&mark| mark < distance)
            .collect()
    } else {
        Vec::new()
    };

    SplitPlan {
        distance,
        course,
        segments,
        aggregate_splits,
    }
}
