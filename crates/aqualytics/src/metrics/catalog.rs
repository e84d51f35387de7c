//! Static metric catalog.
//!
//! Every metric key a record may hold is declared here with its unit and its
//! directionality. Aggregation and scoring look directionality up in this
//! table instead of guessing it from the key.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{AquaError, Result};

/// Version of the built-in catalog table.
pub const CATALOG_VERSION: u32 = 1;

static CATALOG: Lazy<MetricCatalog> = Lazy::new(MetricCatalog::builtin);

/// Whether smaller or larger values mean better performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directionality {
    LowerIsBetter,
    HigherIsBetter,
}

impl Directionality {
    /// True if `candidate` is strictly better than `incumbent`.
    pub fn is_better(&self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Directionality::LowerIsBetter => candidate < incumbent,
            Directionality::HigherIsBetter => candidate > incumbent,
        }
    }

    /// The better of two values; `incumbent` wins ties.
    pub fn best(&self, candidate: f64, incumbent: f64) -> f64 {
        if self.is_better(candidate, incumbent) {
            candidate
        } else {
            incumbent
        }
    }

    /// Sort direction that puts the best value first.
    pub fn best_first(&self) -> SortDirection {
        match self {
            Directionality::LowerIsBetter => SortDirection::Ascending,
            Directionality::HigherIsBetter => SortDirection::Descending,
        }
    }

    /// Map a 0-100 normalized value so that higher always means better.
    pub fn orient(&self, normalized: f64) -> f64 {
        match self {
            Directionality::LowerIsBetter => 100.0 - normalized,
            Directionality::HigherIsBetter => normalized,
        }
    }
}

/// Sort direction for ranked output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = AquaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(AquaError::InvalidInput(format!(
                "unknown sort direction '{}'; use asc or desc",
                other
            ))),
        }
    }
}

/// Metric family used for grouped views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricGroup {
    Tiempo,
    Brazadas,
    Velocidad,
    Insights,
}

impl MetricGroup {
    pub const ALL: [MetricGroup; 4] = [
        MetricGroup::Tiempo,
        MetricGroup::Brazadas,
        MetricGroup::Velocidad,
        MetricGroup::Insights,
    ];

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            MetricGroup::Tiempo => "Time",
            MetricGroup::Brazadas => "Strokes",
            MetricGroup::Velocidad => "Velocity",
            MetricGroup::Insights => "Insights",
        }
    }
}

impl FromStr for MetricGroup {
    type Err = AquaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tiempo" | "time" => Ok(MetricGroup::Tiempo),
            "brazadas" | "strokes" => Ok(MetricGroup::Brazadas),
            "velocidad" | "velocity" | "speed" => Ok(MetricGroup::Velocidad),
            "insights" => Ok(MetricGroup::Insights),
            other => Err(AquaError::InvalidInput(format!(
                "unknown metric group '{}'; use tiempo, brazadas, velocidad or insights",
                other
            ))),
        }
    }
}

impl fmt::Display for MetricGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricGroup::Tiempo => "tiempo",
            MetricGroup::Brazadas => "brazadas",
            MetricGroup::Velocidad => "velocidad",
            MetricGroup::Insights => "insights",
        };
        f.write_str(name)
    }
}

/// Whether a metric is captured by hand or computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Manual,
    Derived,
}

/// A resolved catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub key: String,
    pub label: String,
    pub unit: String,
    pub directionality: Directionality,
    pub group: MetricGroup,
    pub kind: MetricKind,
}

/// Static table row. Indexed rows describe a family such as `v{n}`.
#[derive(Debug, Clone, Copy)]
struct MetricSpec {
    key: &'static str,
    label: &'static str,
    unit: &'static str,
    directionality: Directionality,
    group: MetricGroup,
    kind: MetricKind,
    indexed: bool,
}

impl MetricSpec {
    /// Prefix that precedes the segment number of an indexed key.
    fn prefix(&self) -> &'static str {
        self.key.trim_end_matches("{n}")
    }

    /// Segment number if `key` belongs to this indexed family.
    fn match_index(&self, key: &str) -> Option<usize> {
        if !self.indexed {
            return None;
        }
        let rest = key.strip_prefix(self.prefix())?;
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        rest.parse::<usize>().ok().filter(|n| *n > 0)
    }

    fn definition(&self, key: String, index: Option<usize>) -> MetricDefinition {
        let label = match index {
            Some(n) => self.label.replace("{n}", &n.to_string()),
            None => self.label.to_string(),
        };
        MetricDefinition {
            key,
            label,
            unit: self.unit.to_string(),
            directionality: self.directionality,
            group: self.group,
            kind: self.kind,
        }
    }
}

use Directionality::{HigherIsBetter, LowerIsBetter};
use MetricGroup::{Brazadas, Insights, Tiempo, Velocidad};
use MetricKind::{Derived, Manual};

const fn spec(
    key: &'static str,
    label: &'static str,
    unit: &'static str,
    directionality: Directionality,
    group: MetricGroup,
    kind: MetricKind,
) -> MetricSpec {
    MetricSpec {
        key,
        label,
        unit,
        directionality,
        group,
        kind,
        indexed: false,
    }
}

const fn family(
    key: &'static str,
    label: &'static str,
    unit: &'static str,
    directionality: Directionality,
    group: MetricGroup,
    kind: MetricKind,
) -> MetricSpec {
    MetricSpec {
        key,
        label,
        unit,
        directionality,
        group,
        kind,
        indexed: true,
    }
}

const BUILTIN: &[MetricSpec] = &[
    // Manual captures
    family("t15_{n}", "15m split (segment {n})", "s", LowerIsBetter, Tiempo, Manual),
    family("t25_{n}", "25m split (segment {n})", "s", LowerIsBetter, Tiempo, Manual),
    family("t_seg_{n}", "Segment time (segment {n})", "s", LowerIsBetter, Tiempo, Manual),
    spec("t_total", "Total time", "s", LowerIsBetter, Tiempo, Manual),
    family("brz_{n}", "Strokes (segment {n})", "strokes", LowerIsBetter, Brazadas, Manual),
    spec("brz_total", "Total strokes", "strokes", LowerIsBetter, Brazadas, Manual),
    family("f{n}", "Underwater distance (segment {n})", "m", HigherIsBetter, Insights, Manual),
    // Derived
    family("v{n}", "Velocity (segment {n})", "m/s", HigherIsBetter, Velocidad, Derived),
    spec("v_promedio", "Average velocity", "m/s", HigherIsBetter, Velocidad, Derived),
    spec("dist_x_brz", "Distance per stroke", "m/stroke", HigherIsBetter, Brazadas, Derived),
    spec("frec_promedio", "Average stroke rate", "cycles/min", HigherIsBetter, Brazadas, Derived),
    spec("dist_sin_f", "Distance without underwater", "m", LowerIsBetter, Insights, Derived),
    spec("f_promedio", "Average underwater distance", "m", HigherIsBetter, Insights, Derived),
    spec("eficiencia", "Efficiency", "(m/s)/stroke", HigherIsBetter, Insights, Derived),
    spec("consistencia", "Consistency", "index", HigherIsBetter, Insights, Derived),
    spec("fatiga", "Fatigue index", "ratio", LowerIsBetter, Insights, Derived),
    spec("tecnica", "Technique ratio", "ratio", HigherIsBetter, Insights, Derived),
];

/// Read-only catalog of metric definitions.
#[derive(Debug, Clone)]
pub struct MetricCatalog {
    version: u32,
    specs: Vec<MetricSpec>,
}

impl MetricCatalog {
    /// The process-wide catalog, built on first use and never mutated.
    pub fn global() -> &'static MetricCatalog {
        &CATALOG
    }

    fn builtin() -> Self {
        Self {
            version: CATALOG_VERSION,
            specs: BUILTIN.to_vec(),
        }
    }

    /// Catalog table version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Look up a metric key, including indexed keys such as `v2`.
    pub fn get(&self, key: &str) -> Result<MetricDefinition> {
        if let Some(spec) = self.specs.iter().find(|s| !s.indexed && s.key == key) {
            return Ok(spec.definition(key.to_string(), None));
        }

        self.specs
            .iter()
            .find_map(|s| s.match_index(key).map(|n| s.definition(key.to_string(), Some(n))))
            .ok_or_else(|| AquaError::UnknownMetric(key.to_string()))
    }

    /// True if the key resolves.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_ok()
    }

    /// Directionality of a key.
    pub fn directionality(&self, key: &str) -> Result<Directionality> {
        self.get(key).map(|d| d.directionality)
    }

    /// Every table entry; indexed families keep their `{n}` placeholder.
    pub fn definitions(&self) -> Vec<MetricDefinition> {
        self.specs
            .iter()
            .map(|s| s.definition(s.key.to_string(), None))
            .collect()
    }

    /// Table entries belonging to a group.
    pub fn group(&self, group: MetricGroup) -> Vec<MetricDefinition> {
        self.definitions()
            .into_iter()
            .filter(|d| d.group == group)
            .collect()
    }
}
