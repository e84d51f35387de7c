//! Batch import: validate, parse, check and derive every row of a file.
//!
//! Rows are independent. A row that cannot be derived is reported as a
//! [`RowFailure`] and the batch moves on; only a structurally invalid file
//! stops the import before any row is read.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AquaError, DerivationError, Result};
use crate::metrics::{DerivedMetricRecord, InputLimits, MetricEngine, check_race};
use crate::validation::table::delimiter_format;
use crate::validation::{CsvValidator, Diagnostic, ValidationReport, ValidatorConfig};

use super::parser::{ImportConfig, ImportParser, ImportRow, RowFailure};
use super::source::SourceMetadata;

/// A row that was imported with some metrics omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowPartial {
    pub line: usize,
    pub swimmer: String,
    pub omitted: Vec<DerivationError>,
}

/// Counts for one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Data rows read, up to the row cap.
    pub total_rows: usize,
    pub imported: usize,
    pub failed: usize,
    /// Imported rows with at least one omitted metric.
    pub partial: usize,
    /// Non-blocking row diagnostics.
    pub warnings: usize,
}

impl ImportSummary {
    /// Percentage of rows imported.
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            self.imported as f64 / self.total_rows as f64 * 100.0
        }
    }
}

/// Everything an import produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    pub report: ValidationReport,
    pub records: Vec<DerivedMetricRecord>,
    pub failures: Vec<RowFailure>,
    pub partials: Vec<RowPartial>,
    /// Non-blocking row diagnostics, each tagged with its line.
    pub warnings: Vec<Diagnostic>,
    pub summary: ImportSummary,
}

impl ImportResult {
    fn rejected(report: ValidationReport) -> Self {
        Self {
            source: None,
            report,
            records: Vec::new(),
            failures: Vec::new(),
            partials: Vec::new(),
            warnings: Vec::new(),
            summary: ImportSummary::default(),
        }
    }

    /// True when the file passed validation and no row failed.
    pub fn is_clean(&self) -> bool {
        self.report.is_valid && self.failures.is_empty()
    }
}

/// Runs the validator, parser, input checks and engine over a file.
pub struct BatchImporter {
    validator: CsvValidator,
    parser: ImportParser,
    engine: MetricEngine,
    limits: InputLimits,
}

impl BatchImporter {
    /// Create an importer with default configuration.
    pub fn new() -> Self {
        Self::with_parts(
            ValidatorConfig::default(),
            ImportConfig::default(),
            InputLimits::default(),
        )
    }

    /// Create an importer from its component configurations.
    pub fn with_parts(validator: ValidatorConfig, import: ImportConfig, limits: InputLimits) -> Self {
        Self {
            validator: CsvValidator::with_config(validator),
            parser: ImportParser::with_config(import),
            engine: MetricEngine::with_limits(limits),
            limits,
        }
    }

    /// Import file content.
    pub fn run(&self, content: &str) -> ImportResult {
        let report = self.validator.validate(content);
        if !report.is_valid {
            log::warn!(
                "Import rejected: {} structural error(s)",
                report.errors.len()
            );
            return ImportResult::rejected(report);
        }

        let table = self.validator.read_table(content);
        let parsed = self.parser.parse(&table);

        let mut result = ImportResult::rejected(report);
        for diagnostic in parsed.diagnostics {
            log::warn!("{}", diagnostic);
            result.report.push(diagnostic);
        }

        result.summary.total_rows = parsed.rows.len() + parsed.failures.len();
        for failure in parsed.failures {
            log::warn!("Row {} rejected: {}", failure.line, failure.reasons.join("; "));
            result.failures.push(failure);
        }

        for row in &parsed.rows {
            self.import_row(row, &mut result);
        }

        result.summary.imported = result.records.len();
        result.summary.failed = result.failures.len();
        result.summary.partial = result.partials.len();
        result.summary.warnings = result.warnings.len();

        log::info!(
            "Imported {} of {} rows ({} failed, {} partial)",
            result.summary.imported,
            result.summary.total_rows,
            result.summary.failed,
            result.summary.partial
        );

        result
    }

    /// Import a file on disk and describe its source.
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<ImportResult> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| AquaError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let content = String::from_utf8_lossy(&bytes);

        let mut result = self.run(&content);
        let format = delimiter_format(self.validator.read_table(&content).delimiter);
        result.source = Some(SourceMetadata::new(
            path.to_path_buf(),
            &bytes,
            format,
            result.report.total_rows,
            result.report.total_columns,
        ));

        Ok(result)
    }

    fn import_row(&self, row: &ImportRow, result: &mut ImportResult) {
        let swimmer = row.context.swimmer.clone();

        if let Err(e) = self.limits.check_distance(row.context.distance) {
            log::warn!("Row {} rejected: {}", row.line, e);
            result.failures.push(RowFailure {
                line: row.line,
                swimmer: Some(swimmer),
                reasons: vec![e.to_string()],
            });
            return;
        }

        let (segments, totals) = row.segments();

        let (errors, warnings): (Vec<Diagnostic>, Vec<Diagnostic>) =
            check_race(&row.context, &segments, &totals, &self.limits)
                .into_iter()
                .partition(|d| d.is_blocking());

        for warning in warnings {
            log::debug!("Row {}: {}", row.line, warning);
            result.warnings.push(warning.with_rows(vec![row.line]));
        }

        if !errors.is_empty() {
            let reasons: Vec<String> = errors.iter().map(|d| d.message.clone()).collect();
            log::warn!("Row {} rejected: {}", row.line, reasons.join("; "));
            result.failures.push(RowFailure {
                line: row.line,
                swimmer: Some(swimmer),
                reasons,
            });
            return;
        }

        match self.engine.derive_with_totals(&row.context, &segments, &totals) {
            Ok(derivation) => {
                if !derivation.failures.is_empty() {
                    log::debug!(
                        "Row {}: {} metric(s) omitted",
                        row.line,
                        derivation.failures.len()
                    );
                    result.partials.push(RowPartial {
                        line: row.line,
                        swimmer,
                        omitted: derivation.failures,
                    });
                }
                result.records.push(derivation.record);
            }
            Err(e) => {
                log::warn!("Row {} rejected: {}", row.line, e);
                result.failures.push(RowFailure {
                    line: row.line,
                    swimmer: Some(swimmer),
                    reasons: vec![e.to_string()],
                });
            }
        }
    }
}

impl Default for BatchImporter {
    fn default() -> Self {
        Self::new()
    }
}
