//! Directionality-aware aggregation over derived records.
//!
//! Every function here reads a metric's directionality from the catalog; no
//! metric is assumed to be a time or a velocity by its name.

mod best;
mod head_to_head;
mod progression;
mod ranking;
mod team;

use serde::{Deserialize, Serialize};

pub use best::{PersonalBest, best_of, personal_bests};
pub use head_to_head::{HeadToHead, MetricComparison, Winner, head_to_head};
pub use progression::{Period, ProgressPoint, Progression, Trend, progression};
pub use ranking::{
    DEFAULT_PAGE_SIZE, LineValue, PerformanceLine, RankingEntry, RankingPage, RankingQuery,
    build_lines, rank, rankings,
};
pub use team::{TeamComparison, notable_differences, percent_diff, team_comparison};

/// Defaults for aggregate views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Entries kept in the notable-differences view.
    pub top_n: usize,
    pub page_size: usize,
    pub line_value: LineValue,
    /// Percentage change below which a progression is stable.
    pub stable_threshold: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            page_size: DEFAULT_PAGE_SIZE,
            line_value: LineValue::Best,
            stable_threshold: 1.0,
        }
    }
}

impl AggregationConfig {
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_line_value(mut self, line_value: LineValue) -> Self {
        self.line_value = line_value;
        self
    }
}
