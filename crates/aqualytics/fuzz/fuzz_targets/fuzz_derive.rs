//! Fuzz target for the derivation engine.
//!
//! Arbitrary distances, pools and raw values: the engine either derives a
//! record or reports missing input, and never panics.

#![no_main]

use aqualytics::{CourseLength, MetricEngine, RaceContext, RaceTotals, RawSegmentInput};
use arbitrary::Arbitrary;
use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Segment {
    split_15: Option<f64>,
    split_25: Option<f64>,
    segment_time: Option<f64>,
    cumulative_split: Option<f64>,
    stroke_count: Option<u32>,
    stroke_rate: Option<f64>,
    underwater: Option<f64>,
}

#[derive(Debug, Arbitrary)]
struct Race {
    distance: u16,
    long_course: bool,
    segments: Vec<Segment>,
    total_time: Option<f64>,
    total_strokes: Option<u32>,
}

fuzz_target!(|race: Race| {
    if race.distance == 0 || race.segments.len() > 64 {
        return;
    }
    let course = if race.long_course {
        CourseLength::Long
    } else {
        CourseLength::Short
    };
    let Some(date) = NaiveDate::from_ymd_opt(2024, 1, 1) else {
        return;
    };
    let ctx = RaceContext::new("fuzz", date, u32::from(race.distance), course, "libre", "final");

    let inputs: Vec<RawSegmentInput> = race
        .segments
        .into_iter()
        .map(|s| RawSegmentInput {
            split_15: s.split_15,
            split_25: s.split_25,
            segment_time: s.segment_time,
            cumulative_split: s.cumulative_split,
            stroke_count: s.stroke_count,
            stroke_rate: s.stroke_rate,
            underwater: s.underwater,
        })
        .collect();
    let totals = RaceTotals {
        total_time: race.total_time,
        total_strokes: race.total_strokes,
    };

    let _ = MetricEngine::new().derive_race(&ctx, &inputs, &totals);
});
