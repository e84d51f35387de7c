//! Metric catalog, derivation engine and derived records.

pub mod catalog;
pub mod checks;
pub mod engine;
pub mod record;

pub use catalog::{
    CATALOG_VERSION, Directionality, MetricCatalog, MetricDefinition, MetricGroup, MetricKind,
    SortDirection,
};
pub use checks::{InputLimits, check_race};
pub use engine::{Derivation, MetricEngine, RaceTotals};
pub use record::{DerivedMetricRecord, MetricRow, RecordKey};
