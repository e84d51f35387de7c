//! Property-based tests for the resolver, engine, validator and scorer.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p aqualytics --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p aqualytics --test property_tests
//! ```

use proptest::prelude::*;

use aqualytics::race::{SegmentField, plan, resolve};
use aqualytics::scoring::{ComparisonMember, normalize};
use aqualytics::validation::CsvValidator;
use aqualytics::{
    ComparisonSet, CourseLength, DerivedMetricRecord, MetricEngine, RaceContext, RaceTotals,
    RawSegmentInput,
};
use chrono::NaiveDate;

// =============================================================================
// Test Strategies
// =============================================================================

fn course() -> impl Strategy<Value = CourseLength> {
    prop_oneof![Just(CourseLength::Short), Just(CourseLength::Long)]
}

/// Competitive distances plus arbitrary ones that must fall through.
fn distance() -> impl Strategy<Value = u32> {
    prop_oneof![
        prop::sample::select(vec![50u32, 100, 200, 400, 800, 1500]),
        1u32..2000,
    ]
}

fn context(distance: u32, course: CourseLength) -> RaceContext {
    RaceContext::new(
        "swimmer",
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        distance,
        course,
        "libre",
        "final",
    )
}

/// Inputs filling every captured field of every segment.
fn full_inputs(distance: u32, course: CourseLength, seed: &[f64]) -> Vec<RawSegmentInput> {
    let plan = plan(distance, course);
    let mut elapsed = 0.0;

    plan.segments
        .iter()
        .enumerate()
        .map(|(i, config)| {
            let time = seed[i % seed.len()];
            elapsed += time;
            let mut input = RawSegmentInput::new();
            if config.captures(SegmentField::Split15) {
                input = input.with_split_15(time * 0.4);
            }
            if config.captures(SegmentField::Split25) {
                input = input.with_split_25(time * 0.5);
            }
            if config.captures(SegmentField::SegmentTime) {
                input = input.with_segment_time(time);
            }
            if config.captures(SegmentField::CumulativeSplit) {
                input = input.with_cumulative_split(elapsed);
            }
            if config.captures(SegmentField::StrokeCount) {
                input = input.with_stroke_count(10 + i as u32);
            }
            if config.captures(SegmentField::Underwater) {
                input = input.with_underwater(5.0);
            }
            input
        })
        .collect()
}

// =============================================================================
// Resolver
// =============================================================================

proptest! {
    #[test]
    fn resolve_always_captures_something(
        distance in distance(),
        course in course(),
        index in 0usize..64,
    ) {
        let config = resolve(distance, course, index);
        prop_assert!(!config.captured_fields().is_empty());
    }

    #[test]
    fn split_25_only_for_first_fifty_long(
        distance in distance(),
        course in course(),
        index in 0usize..64,
    ) {
        let config = resolve(distance, course, index);
        let expected = distance == 50 && course == CourseLength::Long && index == 0;
        prop_assert_eq!(config.captures(SegmentField::Split25), expected);
    }

    #[test]
    fn timing_fields_never_conflict(
        distance in distance(),
        course in course(),
        index in 0usize..64,
    ) {
        let config = resolve(distance, course, index);
        // A segment is timed either by its own time or by a running split
        prop_assert!(
            config.captures(SegmentField::SegmentTime)
                != config.captures(SegmentField::CumulativeSplit)
        );
    }

    #[test]
    fn plan_lengths_cover_distance(distance in distance(), course in course()) {
        let plan = plan(distance, course);
        let covered: u32 = plan.segments.iter().map(|s| s.length_m).sum();
        prop_assert_eq!(covered, distance);
    }
}

// =============================================================================
// Derivation
// =============================================================================

proptest! {
    #[test]
    fn derive_is_deterministic(
        distance in prop::sample::select(vec![50u32, 100, 200, 400]),
        course in course(),
        seed in prop::collection::vec(10.0f64..40.0, 1..8),
    ) {
        let ctx = context(distance, course);
        let inputs = full_inputs(distance, course, &seed);
        let engine = MetricEngine::new();

        let first = engine.derive_race(&ctx, &inputs, &RaceTotals::new()).unwrap();
        let second = engine.derive_race(&ctx, &inputs, &RaceTotals::new()).unwrap();

        prop_assert_eq!(first.record.metrics().len(), second.record.metrics().len());
        for ((ka, va), (kb, vb)) in first.record.metrics().iter().zip(second.record.metrics()) {
            prop_assert_eq!(ka, kb);
            prop_assert_eq!(va.to_bits(), vb.to_bits());
        }
    }

    #[test]
    fn velocity_times_time_is_length(time in 0.5f64..300.0, course in course()) {
        let distance = course.pool_length();
        let ctx = context(distance * 2, course);
        let inputs = vec![
            RawSegmentInput::new().with_segment_time(time),
            RawSegmentInput::new().with_segment_time(time),
        ];

        let derivation = MetricEngine::new()
            .derive_race(&ctx, &inputs, &RaceTotals::new())
            .unwrap();
        let velocity = derivation.record.get("v1").unwrap();

        prop_assert!((velocity * time - f64::from(distance)).abs() < 1e-9);
    }

    #[test]
    fn validator_never_panics(content in "[a-z0-9,;\\t\\n\" -]{0,400}") {
        let report = CsvValidator::new().validate(&content);
        prop_assert!((0.0..=100.0).contains(&report.score));
        prop_assert_eq!(report.is_valid, report.errors.is_empty());
    }
}

// =============================================================================
// Scoring
// =============================================================================

proptest! {
    #[test]
    fn normalize_stays_in_range(values in prop::collection::vec(-1000.0f64..1000.0, 1..6)) {
        let members = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let record = DerivedMetricRecord::new(
                    context(100, CourseLength::Short),
                    [("v_promedio".to_string(), *v)].into_iter().collect(),
                );
                ComparisonMember::new(format!("s{}", i), record)
            })
            .collect();
        let set = ComparisonSet::new(members);

        for score in normalize(&set, "v_promedio") {
            let score = score.unwrap();
            prop_assert!((0.0..=100.0).contains(&score));
        }
    }
}
