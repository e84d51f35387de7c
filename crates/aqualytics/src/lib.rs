//! Aqualytics: swim race metric derivation and analytics.
//!
//! Raw timing captures (splits, stroke counts, underwater distances) go in;
//! derived performance metrics and comparisons come out. Every metric carries
//! a directionality in the catalog, so "best" means the smallest time and the
//! largest velocity without any caller-side guessing.
//!
//! # Components
//!
//! - **race**: which fields a segment captures, for any distance and pool
//! - **metrics**: the metric catalog and the derivation engine
//! - **validation**: structural checks on uploaded CSV files
//! - **import**: CSV rows to derived records
//! - **aggregate**: personal bests, rankings, team and head-to-head views
//! - **scoring**: min-max normalized scores for small comparison sets
//!
//! # Example
//!
//! ```no_run
//! use aqualytics::Aqualytics;
//!
//! let aqua = Aqualytics::new();
//! let result = aqua.import_file("results.csv").unwrap();
//!
//! println!("Imported: {}", result.summary.imported);
//! for failure in &result.failures {
//!     println!("Row {}: {}", failure.line, failure.reasons.join("; "));
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod import;
pub mod metrics;
pub mod race;
pub mod scoring;
pub mod validation;

mod aqualytics;

pub use crate::aqualytics::Aqualytics;
pub use config::AnalyticsConfig;
pub use error::{AquaError, DerivationError, Result};
pub use import::{ImportResult, SourceMetadata};
pub use metrics::{
    DerivedMetricRecord, Directionality, MetricCatalog, MetricDefinition, MetricEngine,
    MetricGroup, RaceTotals,
};
pub use race::{CourseLength, RaceContext, RawSegmentInput, SegmentConfig, SegmentField};
pub use scoring::{ComparisonSet, ScoreBoard, Scorer};
pub use validation::{Diagnostic, DiagnosticCode, Severity, ValidationReport};
