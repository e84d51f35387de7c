//! Normalization and composite scoring for small comparison sets.

mod scorer;
mod set;

pub use scorer::{
    DEGENERATE_SCORE, MemberScore, MetricScores, ScoreBoard, Scorer, ScoringConfig, normalize,
};
pub use set::{ComparisonMember, ComparisonSet, MAX_MEMBERS, MIN_MEMBERS};
