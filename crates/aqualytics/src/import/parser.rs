//! Row parser for results files.
//!
//! Maps header aliases onto canonical names, parses dates and numbers, and
//! turns each row into a race context plus the raw values its segments need.

use std::str::FromStr;

use chrono::NaiveDate;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AquaError, Result};
use crate::metrics::RaceTotals;
use crate::race::{CourseLength, RaceContext, RawSegmentInput, SegmentConfig, SegmentField, plan};
use crate::validation::table::{TableRow, parse_number};
use crate::validation::{CsvTable, Diagnostic, DiagnosticCode, expected_type};

/// Accepted date formats, tried in order.
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Fixed aliases: canonical name and the alternatives that map to it.
const ALIASES: &[(&str, &[&str])] = &[
    ("fecha", &["date", "fecha_competencia"]),
    ("nadador", &["swimmer", "nombre", "athlete"]),
    ("competencia", &["competition", "evento", "event"]),
    ("distancia", &["distance", "dist"]),
    ("estilo", &["stroke", "style"]),
    ("fase", &["phase", "tipo"]),
    ("curso", &["course", "piscina", "pool"]),
    ("t_total", &["tiempo_total", "total_time", "tiempo"]),
    ("brz_total", &["brazadas_total", "total_strokes", "# de brz total"]),
];

/// Indexed aliases such as `tiempo_25_1` for `t25_1`.
static INDEXED_ALIASES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"^(?:t15\((\d+)\)|tiempo_15_(\d+)|time_15_(\d+))$").unwrap(), "t15_"),
        (Regex::new(r"^(?:t25\((\d+)\)|tiempo_25_(\d+)|time_25_(\d+))$").unwrap(), "t25_"),
        (Regex::new(r"^(?:brazadas_(\d+)|strokes_(\d+)|# de brz (\d+))$").unwrap(), "brz_"),
        (Regex::new(r"^(?:flecha_?(\d+)|underwater_(\d+))$").unwrap(), "f"),
        (Regex::new(r"^(?:frecuencia_(\d+)|rate_(\d+))$").unwrap(), "frec_"),
    ]
});

/// Row fields every race needs.
const REQUIRED_FIELDS: &[&str] = &["fecha", "nadador", "distancia", "estilo", "fase"];

/// Import configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Rows read before the importer stops.
    pub max_rows: usize,
    /// Course used when the file has no `curso` column or the cell is blank.
    pub default_course: CourseLength,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_rows: 10_000,
            default_course: CourseLength::Short,
        }
    }
}

impl ImportConfig {
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn with_default_course(mut self, course: CourseLength) -> Self {
        self.default_course = course;
        self
    }
}

/// Canonical name for a (normalized) header.
pub fn canonical_header(header: &str) -> String {
    if let Some((canonical, _)) = ALIASES
        .iter()
        .find(|(canonical, aliases)| *canonical == header || aliases.contains(&header))
    {
        return canonical.to_string();
    }

    for (pattern, prefix) in INDEXED_ALIASES.iter() {
        if let Some(caps) = pattern.captures(header) {
            if let Some(n) = caps.iter().skip(1).flatten().next() {
                return format!("{}{}", prefix, n.as_str());
            }
        }
    }

    header.to_string()
}

/// Parse a date in any accepted format.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// One data row turned into a race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    /// 1-based line in the source.
    pub line: usize,
    pub context: RaceContext,
    /// Numeric cells keyed by canonical header.
    pub values: IndexMap<String, f64>,
}

impl ImportRow {
    fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Segment inputs for this race, restricted to each segment's capture
    /// configuration, plus the race totals the row reports.
    ///
    /// Segments after the last one the row reports anything for are left
    /// uncaptured, so a file carrying only the first segments still yields
    /// race-level metrics from its totals. Where a race is timed with running
    /// splits, missing splits are rebuilt from per-segment times.
    pub fn segments(&self) -> (Vec<(SegmentConfig, RawSegmentInput)>, RaceTotals) {
        let plan = plan(self.context.distance, self.context.course);
        let mut segments: Vec<(SegmentConfig, RawSegmentInput)> =
            Vec::with_capacity(plan.segments.len());
        let mut elapsed = Some(0.0);

        for config in plan.segments {
            let n = config.index + 1;
            let t25 = self.value(&format!("t25_{}", n));
            let t_seg = self.value(&format!("t_seg_{}", n));

            // Inside a 50m long course segment the 25m column is an intermediate split.
            let segment_time = if config.captures(SegmentField::Split25) {
                t_seg
            } else {
                t_seg.or(t25)
            };

            let cumulative = self
                .value(&format!("split_{}", config.end_m()))
                .or_else(|| elapsed.zip(segment_time).map(|(e, t)| e + t));
            elapsed = cumulative;

            let raw = RawSegmentInput {
                split_15: self.value(&format!("t15_{}", n)),
                split_25: t25,
                segment_time,
                cumulative_split: cumulative,
                stroke_count: self
                    .value(&format!("brz_{}", n))
                    .map(|v| v as u32),
                stroke_rate: self.value(&format!("frec_{}", n)),
                underwater: self.value(&format!("f{}", n)),
            };

            let input = raw.restricted_to(&config);
            segments.push((config, input));
        }

        let total_time = self.value("t_total");
        let reported = segments
            .iter()
            .rposition(|(_, input)| *input != RawSegmentInput::default())
            .map_or(0, |last| last + 1);
        // The race total can still time the final segment.
        let kept = if total_time.is_some() && reported + 1 == segments.len() {
            segments.len()
        } else {
            reported
        };

        for (config, _) in segments.iter_mut().skip(kept) {
            *config = config.clone().uncaptured();
        }

        let single_segment = segments.len() == 1;
        if let (Some(total), Some((config, input))) = (total_time, segments.last_mut()) {
            if config.captures(SegmentField::CumulativeSplit) && input.cumulative_split.is_none() {
                input.cumulative_split = Some(total);
            } else if single_segment
                && config.captures(SegmentField::SegmentTime)
                && input.segment_time.is_none()
            {
                input.segment_time = Some(total);
            }
        }

        let totals = RaceTotals {
            total_time,
            total_strokes: self.value("brz_total").map(|v| v as u32),
        };

        (segments, totals)
    }
}

/// A row that could not become a race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFailure {
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swimmer: Option<String>,
    pub reasons: Vec<String>,
}

/// Output of parsing a table.
#[derive(Debug, Clone, Default)]
pub struct ParsedRows {
    pub rows: Vec<ImportRow>,
    pub failures: Vec<RowFailure>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Turns table rows into races.
pub struct ImportParser {
    config: ImportConfig,
}

impl ImportParser {
    /// Create a parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ImportConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ImportConfig) -> Self {
        Self { config }
    }

    /// Parse every data row of a table, up to the row cap.
    pub fn parse(&self, table: &CsvTable) -> ParsedRows {
        let headers: Vec<String> = table.headers.iter().map(|h| canonical_header(h)).collect();
        let mut parsed = ParsedRows::default();

        if table.rows.len() > self.config.max_rows {
            parsed.diagnostics.push(Diagnostic::warning(
                DiagnosticCode::RowLimit,
                format!(
                    "Only the first {} of {} rows were imported",
                    self.config.max_rows,
                    table.rows.len()
                ),
            ));
        }

        for row in table.rows.iter().take(self.config.max_rows) {
            match self.parse_row(&headers, row) {
                Ok(import_row) => parsed.rows.push(import_row),
                Err(failure) => parsed.failures.push(failure),
            }
        }

        parsed
    }

    /// Parse one row against canonical headers.
    pub fn parse_row(
        &self,
        headers: &[String],
        row: &TableRow,
    ) -> std::result::Result<ImportRow, RowFailure> {
        let cell = |name: &str| headers.iter().position(|h| h == name).and_then(|i| row.cell(i));
        let mut reasons = Vec::new();

        for field in REQUIRED_FIELDS {
            if cell(field).is_none() {
                reasons.push(format!("missing required field '{}'", field));
            }
        }

        let date = cell("fecha").and_then(|raw| {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                reasons.push(format!("invalid date '{}'", raw));
            }
            parsed
        });

        let distance = cell("distancia").and_then(|raw| match parse_distance(raw) {
            Ok(d) => Some(d),
            Err(e) => {
                reasons.push(e.to_string());
                None
            }
        });

        let course = match cell("curso") {
            None => self.config.default_course,
            Some(raw) => CourseLength::from_str(raw).unwrap_or_else(|e| {
                reasons.push(e.to_string());
                self.config.default_course
            }),
        };

        let mut values = IndexMap::new();
        for (index, header) in headers.iter().enumerate() {
            if expected_type(header).is_none() || header == "fecha" || header == "distancia" {
                continue;
            }
            let Some(raw) = row.cell(index) else {
                continue;
            };
            match parse_number(raw) {
                Some(v) if is_count(header) && (v < 0.0 || v.fract() != 0.0) => {
                    reasons.push(format!("'{}' must be a whole number of strokes, got '{}'", header, raw));
                }
                Some(v) if is_count(header) && v > f64::from(u32::MAX) => {
                    reasons.push(format!("'{}' stroke count '{}' is too large", header, raw));
                }
                Some(v) => {
                    values.insert(header.clone(), v);
                }
                None => reasons.push(format!("invalid number '{}' in column '{}'", raw, header)),
            }
        }

        let swimmer = cell("nadador").map(str::to_string);

        match (reasons.is_empty(), date, distance, swimmer.clone()) {
            (true, Some(date), Some(distance), Some(swimmer)) => {
                let mut context = RaceContext::new(
                    swimmer,
                    date,
                    distance,
                    course,
                    cell("estilo").unwrap_or_default(),
                    cell("fase").unwrap_or_default(),
                );
                if let Some(event) = cell("competencia") {
                    context = context.with_event(event);
                }
                Ok(ImportRow {
                    line: row.line,
                    context,
                    values,
                })
            }
            _ => Err(RowFailure {
                line: row.line,
                swimmer,
                reasons,
            }),
        }
    }
}

impl Default for ImportParser {
    fn default() -> Self {
        Self::new()
    }
}

fn is_count(header: &str) -> bool {
    header.starts_with("brz_")
}

fn parse_distance(raw: &str) -> Result<u32> {
    let cleaned = raw.trim().trim_end_matches(['m', 'M']).trim();
    match parse_number(cleaned) {
        Some(v) if v > 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) => Ok(v as u32),
        _ => Err(AquaError::InvalidInput(format!("invalid distance '{}'", raw))),
    }
}
