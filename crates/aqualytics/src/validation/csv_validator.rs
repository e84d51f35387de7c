//! CSV structural validator.
//!
//! Checks an uploaded results file against the canonical import header set
//! before any row is derived. The validator never fails: malformed content is
//! described by diagnostics in the returned [`ValidationReport`].

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AquaError, Result};

use super::diagnostic::{Diagnostic, DiagnosticCode};
use super::report::{ColumnDescriptor, InferredType, ValidationReport};
use super::table::{CsvTable, count_non_blank, parse_number};
use super::validators::CheckSuite;

/// Canonical header set for batch import.
pub const EXPECTED_HEADERS: [&str; 16] = [
    "fecha",
    "nadador",
    "competencia",
    "distancia",
    "estilo",
    "fase",
    "t15_1",
    "brz_1",
    "t25_1",
    "f1",
    "t15_2",
    "brz_2",
    "t25_2",
    "f2",
    "t_total",
    "brz_total",
];

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Indexed headers that hold numbers, by prefix.
const NUMERIC_PREFIXES: &[&str] = &["t15_", "t25_", "t_seg_", "brz_", "split_", "frec_", "f"];

/// Validator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Number of data rows copied into the report preview.
    pub preview_rows: usize,
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<char>,
    /// Headers the file is expected to carry.
    pub expected_headers: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            delimiter: None,
            expected_headers: EXPECTED_HEADERS.iter().map(|h| h.to_string()).collect(),
        }
    }
}

impl ValidatorConfig {
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Delimiter as a byte, when configured and ASCII.
    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        match self.delimiter {
            None => Ok(None),
            Some(c) if c.is_ascii() => Ok(Some(c as u8)),
            Some(c) => Err(AquaError::Config(format!(
                "delimiter '{}' is not an ASCII character",
                c
            ))),
        }
    }
}

/// Type of a single non-empty value.
pub fn infer_value(value: &str) -> InferredType {
    let value = value.trim();
    if value.is_empty() {
        InferredType::Unknown
    } else if ISO_DATE.is_match(value) {
        InferredType::Date
    } else if parse_number(value).is_some() {
        InferredType::Number
    } else {
        InferredType::String
    }
}

/// Type the domain expects for a header, if it constrains one.
pub fn expected_type(header: &str) -> Option<InferredType> {
    match header {
        "fecha" => Some(InferredType::Date),
        "distancia" | "t_total" | "brz_total" => Some(InferredType::Number),
        _ => NUMERIC_PREFIXES
            .iter()
            .filter_map(|prefix| header.strip_prefix(prefix))
            .any(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
            .then_some(InferredType::Number),
    }
}

/// Validates delimited results files.
pub struct CsvValidator {
    config: ValidatorConfig,
    checks: CheckSuite,
}

impl CsvValidator {
    /// Create a validator with default configuration.
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// Create a validator with custom configuration.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            config,
            checks: CheckSuite::new(),
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate file content.
    pub fn validate(&self, content: &str) -> ValidationReport {
        let mut report = ValidationReport::new();

        if content.contains('\u{FFFD}') {
            report.push(Diagnostic::warning(
                DiagnosticCode::Encoding,
                "Content contains replacement characters; the file may not be UTF-8",
            ));
        }

        match count_non_blank(content) {
            0 => {
                report.push(Diagnostic::error(
                    DiagnosticCode::EmptyFile,
                    "The file is empty: no data rows",
                ));
                return report;
            }
            1 => {
                report.headers = self.read_table(content).headers;
                report.total_columns = report.headers.len();
                report.push(Diagnostic::error(
                    DiagnosticCode::NoDataRows,
                    "The file only has a header row: no data rows",
                ));
                return report;
            }
            _ => {}
        }

        let table = self.read_table(content);
        let columns = describe_columns(&table);

        for diagnostic in self
            .checks
            .run(&table, &columns, &self.config.expected_headers)
        {
            report.push(diagnostic);
        }

        report.score = self.score(&table, &columns);
        report.preview_rows = table
            .rows
            .iter()
            .take(self.config.preview_rows)
            .map(|row| row.cells.clone())
            .collect();
        report.total_rows = table.rows.len();
        report.total_columns = table.headers.len();
        report.headers = table.headers;
        report.columns = columns;

        report
    }

    /// Validate a file on disk. Bytes that are not UTF-8 are replaced and
    /// reported as an encoding warning.
    pub fn validate_file(&self, path: impl AsRef<Path>) -> Result<ValidationReport> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| AquaError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let report = self.validate(&String::from_utf8_lossy(&bytes));
        log::info!(
            "Validated {}: {} rows, {} errors, {} warnings, score {:.1}",
            path.display(),
            report.total_rows,
            report.errors.len(),
            report.warnings.len(),
            report.score
        );
        Ok(report)
    }

    /// Read content with the configured delimiter. An invalid configured
    /// delimiter falls back to detection.
    pub fn read_table(&self, content: &str) -> CsvTable {
        CsvTable::read(content, self.config.delimiter_byte().ok().flatten())
    }

    fn score(&self, table: &CsvTable, columns: &[ColumnDescriptor]) -> f64 {
        let expected = &self.config.expected_headers;
        let header_fraction = if expected.is_empty() {
            1.0
        } else {
            let present = expected.iter().filter(|h| table.headers.contains(h)).count();
            present as f64 / expected.len() as f64
        };

        let row_credit = if table.rows.is_empty() { 0.0 } else { 1.0 };

        let type_fraction = if columns.is_empty() {
            0.0
        } else {
            let matching = columns.iter().filter(|c| c.matches_expectation()).count();
            matching as f64 / columns.len() as f64
        };

        40.0 * header_fraction + 30.0 * row_credit + 30.0 * type_fraction
    }
}

impl Default for CsvValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn describe_columns(table: &CsvTable) -> Vec<ColumnDescriptor> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let mut inferred: Option<InferredType> = None;
            let mut sample = None;

            for (_, value) in table.values(index) {
                if sample.is_none() {
                    sample = Some(value.to_string());
                }
                let kind = infer_value(value);
                inferred = Some(match inferred {
                    None => kind,
                    Some(current) if current == kind => current,
                    Some(_) => InferredType::String,
                });
            }

            ColumnDescriptor {
                name: name.clone(),
                inferred_type: inferred.unwrap_or(InferredType::Unknown),
                is_empty: sample.is_none(),
                sample,
                expected_type: expected_type(name),
            }
        })
        .collect()
}
