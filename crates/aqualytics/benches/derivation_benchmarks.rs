//! Derivation and aggregation performance benchmarks.
//!
//! Measures the resolver, per-race derivation and the aggregate views over
//! randomly generated races.

use chrono::{Days, NaiveDate};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;

use aqualytics::aggregate::{LineValue, RankingQuery, notable_differences, rankings};
use aqualytics::race::{SegmentField, plan};
use aqualytics::scoring::Scorer;
use aqualytics::{
    ComparisonSet, CourseLength, DerivedMetricRecord, MetricCatalog, MetricEngine, MetricGroup,
    RaceContext, RaceTotals, RawSegmentInput,
};

const SWIMMERS: &[&str] = &["ana", "luis", "eva", "marta", "pablo", "sofia", "diego", "lucia"];

fn context(rng: &mut StdRng, distance: u32, course: CourseLength) -> RaceContext {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    RaceContext::new(
        SWIMMERS[rng.gen_range(0..SWIMMERS.len())],
        base + Days::new(rng.gen_range(0..365)),
        distance,
        course,
        "libre",
        "final",
    )
}

/// Random inputs filling every captured field.
fn random_inputs(rng: &mut StdRng, distance: u32, course: CourseLength) -> Vec<RawSegmentInput> {
    let mut elapsed = 0.0;
    plan(distance, course)
        .segments
        .iter()
        .map(|config| {
            let time: f64 = rng.gen_range(11.0..35.0);
            elapsed += time;
            let mut input = RawSegmentInput::new()
                .with_stroke_count(rng.gen_range(8..30))
                .with_underwater(rng.gen_range(0.0..12.0));
            if config.captures(SegmentField::CumulativeSplit) {
                input = input.with_cumulative_split(elapsed);
            } else {
                input = input.with_segment_time(time);
            }
            if config.captures(SegmentField::Split15) {
                input = input.with_split_15(time * 0.45);
            }
            input.restricted_to(config)
        })
        .collect()
}

fn random_records(count: usize) -> Vec<DerivedMetricRecord> {
    let mut rng = StdRng::seed_from_u64(7);
    let engine = MetricEngine::new();
    (0..count)
        .filter_map(|_| {
            let ctx = context(&mut rng, 100, CourseLength::Long);
            let inputs = random_inputs(&mut rng, 100, CourseLength::Long);
            engine
                .derive_race(&ctx, &inputs, &RaceTotals::new())
                .ok()
                .map(|d| d.record)
        })
        .collect()
}

/// Benchmark segment resolution.
fn bench_resolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver");

    for (distance, course) in [
        (50, CourseLength::Long),
        (200, CourseLength::Short),
        (1500, CourseLength::Short),
    ] {
        group.bench_with_input(
            BenchmarkId::new("plan", format!("{}{}", distance, course)),
            &(distance, course),
            |b, &(distance, course)| b.iter(|| black_box(plan(distance, course))),
        );
    }

    group.finish();
}

/// Benchmark single-race derivation.
fn bench_derive(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive");
    let engine = MetricEngine::new();
    let mut rng = StdRng::seed_from_u64(42);

    for (distance, course) in [
        (50, CourseLength::Short),
        (200, CourseLength::Long),
        (400, CourseLength::Short),
    ] {
        let ctx = context(&mut rng, distance, course);
        let inputs = random_inputs(&mut rng, distance, course);

        group.bench_with_input(
            BenchmarkId::new("race", format!("{}{}", distance, course)),
            &inputs,
            |b, inputs| b.iter(|| black_box(engine.derive_race(&ctx, inputs, &RaceTotals::new()))),
        );
    }

    group.finish();
}

/// Benchmark aggregate views with varying record counts.
fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let catalog = MetricCatalog::global();

    for count in [100, 1_000, 5_000] {
        let records = random_records(count);
        let query = RankingQuery::new("v_promedio");

        group.bench_with_input(BenchmarkId::new("rankings", count), &records, |b, records| {
            b.iter(|| black_box(rankings(records, &query, catalog, LineValue::Best)))
        });

        let own: Vec<DerivedMetricRecord> = records
            .iter()
            .filter(|r| r.context.swimmer == "ana")
            .cloned()
            .collect();
        group.bench_with_input(BenchmarkId::new("team", count), &records, |b, records| {
            b.iter(|| black_box(notable_differences(&own, records, catalog, 5)))
        });
    }

    let records = random_records(1_000);
    let swimmers: Vec<String> = SWIMMERS.iter().take(5).map(|s| s.to_string()).collect();
    let set = ComparisonSet::from_records(&records, &swimmers, Some("libre"), Some(100));
    let scorer = Scorer::new(catalog);
    group.bench_function("score_velocidad", |b| {
        b.iter(|| black_box(scorer.score(&set, MetricGroup::Velocidad)))
    });

    group.finish();
}

criterion_group!(benches, bench_resolver, bench_derive, bench_aggregate);
criterion_main!(benches);
