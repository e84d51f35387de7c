//! Race descriptors, segment capture configuration and the resolver.

mod context;
mod resolver;
mod segment;

pub use context::{CourseLength, RaceContext};
pub use resolver::{
    CaptureRule, CaptureShape, RULES, SplitPlan, matching_rule, plan, resolve, segment_count,
};
pub use segment::{Capture, RawSegmentInput, RuleId, SegmentConfig, SegmentField};
