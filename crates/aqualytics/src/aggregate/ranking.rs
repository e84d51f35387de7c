//! Rankings over performance lines.
//!
//! Records are grouped by (swimmer, style, distance); each group is one
//! performance line carrying a single value per metric. Lines are then
//! sorted by the requested metric, in the metric's own better-first order
//! unless the query overrides the direction.

use std::cmp::Ordering;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::{DerivedMetricRecord, MetricCatalog, SortDirection};
use crate::race::CourseLength;

/// Default number of entries per ranking page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Which value of a metric represents a performance line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineValue {
    /// The best value across the line's races.
    #[default]
    Best,
    /// The value from the most recent race.
    Latest,
}

/// One (swimmer, style, distance) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceLine {
    pub swimmer: String,
    pub style: String,
    pub distance: u32,
    pub latest_date: NaiveDate,
    /// Number of races in the group.
    pub races: usize,
    pub values: IndexMap<String, f64>,
}

/// Filters, sort and paging for a ranking request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingQuery {
    pub metric: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<CourseLength>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    /// Explicit sort direction; the metric's directionality otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
}

impl RankingQuery {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            style: None,
            distance: None,
            course: None,
            date_from: None,
            date_to: None,
            direction: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_distance(mut self, distance: u32) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_course(mut self, course: CourseLength) -> Self {
        self.course = Some(course);
        self
    }

    pub fn with_dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// True if a record passes the record-level filters (course and dates).
    pub fn admits(&self, record: &DerivedMetricRecord) -> bool {
        let context = &record.context;
        self.course.is_none_or(|c| context.course == c)
            && self.date_from.is_none_or(|d| context.date >= d)
            && self.date_to.is_none_or(|d| context.date <= d)
    }

    fn matches(&self, line: &PerformanceLine) -> bool {
        self.style.as_ref().is_none_or(|s| line.style.eq_ignore_ascii_case(s))
            && self.distance.is_none_or(|d| line.distance == d)
    }
}

/// One ranked line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// Competition rank: equal values share a rank.
    pub rank: usize,
    pub line: PerformanceLine,
    pub value: f64,
    /// Absolute difference to the first entry.
    pub gap_to_leader: f64,
}

/// One page of a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingPage {
    pub metric: String,
    pub entries: Vec<RankingEntry>,
    /// Lines ranked across all pages.
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub direction: SortDirection,
}

/// Group records into performance lines, in first-seen order.
pub fn build_lines(
    records: &[DerivedMetricRecord],
    catalog: &MetricCatalog,
    mode: LineValue,
) -> Result<Vec<PerformanceLine>> {
    let mut lines: IndexMap<(String, String, u32), PerformanceLine> = IndexMap::new();

    for record in records {
        let ctx = &record.context;
        let key = (ctx.swimmer.clone(), ctx.style.clone(), ctx.distance);
        let line = lines.entry(key).or_insert_with(|| PerformanceLine {
            swimmer: ctx.swimmer.clone(),
            style: ctx.style.clone(),
            distance: ctx.distance,
            latest_date: ctx.date,
            races: 0,
            values: IndexMap::new(),
        });

        line.races += 1;
        let newer = ctx.date >= line.latest_date;
        if ctx.date > line.latest_date {
            line.latest_date = ctx.date;
        }

        for (metric, &value) in record.metrics() {
            if value.is_nan() {
                continue;
            }
            let directionality = catalog.directionality(metric)?;
            match line.values.get_mut(metric) {
                None => {
                    line.values.insert(metric.clone(), value);
                }
                Some(current) => match mode {
                    LineValue::Best => *current = directionality.best(value, *current),
                    LineValue::Latest if newer => *current = value,
                    LineValue::Latest => {}
                },
            }
        }
    }

    Ok(lines.into_values().collect())
}

/// Rank performance lines for a query.
pub fn rank(
    lines: Vec<PerformanceLine>,
    query: &RankingQuery,
    catalog: &MetricCatalog,
) -> Result<RankingPage> {
    let direction = match query.direction {
        Some(direction) => direction,
        None => catalog.directionality(&query.metric)?.best_first(),
    };

    let mut ranked: Vec<(PerformanceLine, f64)> = lines
        .into_iter()
        .filter(|line| query.matches(line))
        .filter_map(|line| {
            let value = line.values.get(&query.metric).copied()?;
            Some((line, value))
        })
        .collect();

    ranked.sort_by(|(a, va), (b, vb)| {
        let by_value = match direction {
            SortDirection::Ascending => va.partial_cmp(vb),
            SortDirection::Descending => vb.partial_cmp(va),
        }
        .unwrap_or(Ordering::Equal);
        by_value.then_with(|| a.swimmer.cmp(&b.swimmer))
    });

    let total = ranked.len();
    let page_size = query.page_size.max(1);
    let total_pages = total.div_ceil(page_size);
    let page = query.page.max(1);
    let leader = ranked.first().map(|(_, v)| *v).unwrap_or_default();

    let mut entries = Vec::with_capacity(page_size);
    let mut rank = 0;
    let mut previous: Option<f64> = None;
    for (position, (line, value)) in ranked.into_iter().enumerate() {
        if previous != Some(value) {
            rank = position + 1;
            previous = Some(value);
        }
        if position / page_size + 1 != page {
            continue;
        }
        entries.push(RankingEntry {
            rank,
            line,
            value,
            gap_to_leader: (value - leader).abs(),
        });
    }

    Ok(RankingPage {
        metric: query.metric.clone(),
        entries,
        total,
        page,
        total_pages,
        direction,
    })
}

/// Filter records, build lines and rank them in one call.
pub fn rankings(
    records: &[DerivedMetricRecord],
    query: &RankingQuery,
    catalog: &MetricCatalog,
    mode: LineValue,
) -> Result<RankingPage> {
    let admitted: Vec<DerivedMetricRecord> =
        records.iter().filter(|r| query.admits(r)).cloned().collect();
    let lines = build_lines(&admitted, catalog, mode)?;
    rank(lines, query, catalog)
}
