//! Structural checks run by the CSV validator.

use super::diagnostic::{Diagnostic, DiagnosticCode};
use super::report::{ColumnDescriptor, InferredType};
use super::table::CsvTable;

/// Sample line numbers kept per diagnostic.
const SAMPLE_ROWS: usize = 5;

/// A single structural check over a parsed table.
pub trait StructureCheck {
    /// Run the check and return its findings.
    fn check(
        &self,
        table: &CsvTable,
        columns: &[ColumnDescriptor],
        expected_headers: &[String],
    ) -> Vec<Diagnostic>;
}

/// Rows whose cell count differs from the header row.
pub struct RowShapeCheck;

impl StructureCheck for RowShapeCheck {
    fn check(&self, table: &CsvTable, _: &[ColumnDescriptor], _: &[String]) -> Vec<Diagnostic> {
        let expected = table.headers.len();
        let bad: Vec<usize> = table
            .rows
            .iter()
            .filter(|row| row.cells.len() != expected)
            .map(|row| row.line)
            .collect();

        let mut diagnostics = Vec::new();
        if !bad.is_empty() {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticCode::InconsistentRowLength,
                    format!(
                        "{} row(s) do not have {} cells like the header row",
                        bad.len(),
                        expected
                    ),
                )
                .with_rows(bad.into_iter().take(SAMPLE_ROWS).collect()),
            );
        }

        for (line, message) in &table.unreadable {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticCode::UnparseableValue,
                    format!("Line {} could not be read: {}", line, message),
                )
                .with_rows(vec![*line]),
            );
        }

        diagnostics
    }
}

/// Missing and unexpected headers. Both are tolerated.
pub struct HeaderSetCheck;

impl StructureCheck for HeaderSetCheck {
    fn check(
        &self,
        table: &CsvTable,
        _: &[ColumnDescriptor],
        expected_headers: &[String],
    ) -> Vec<Diagnostic> {
        let missing = expected_headers
            .iter()
            .filter(|h| !table.headers.contains(h))
            .map(|h| {
                Diagnostic::warning(
                    DiagnosticCode::MissingHeader,
                    format!("Expected header '{}' is missing", h),
                )
                .with_column(h.as_str())
            });

        let unexpected = table
            .headers
            .iter()
            .filter(|h| !expected_headers.contains(h))
            .map(|h| {
                Diagnostic::warning(
                    DiagnosticCode::UnexpectedHeader,
                    format!("Header '{}' is not part of the expected set", h),
                )
                .with_column(h.as_str())
            });

        missing.chain(unexpected).collect()
    }
}

/// Columns without a single value.
pub struct EmptyColumnCheck;

impl StructureCheck for EmptyColumnCheck {
    fn check(&self, _: &CsvTable, columns: &[ColumnDescriptor], _: &[String]) -> Vec<Diagnostic> {
        columns
            .iter()
            .filter(|c| c.is_empty)
            .map(|c| {
                Diagnostic::warning(
                    DiagnosticCode::EmptyColumn,
                    format!("Column '{}' is empty", c.name),
                )
                .with_column(c.name.as_str())
            })
            .collect()
    }
}

/// Columns whose values do not have the type the domain expects.
///
/// A wrong date column blocks the import; numeric columns typed by hand only
/// warn.
pub struct ColumnTypeCheck;

impl StructureCheck for ColumnTypeCheck {
    fn check(&self, table: &CsvTable, columns: &[ColumnDescriptor], _: &[String]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for (index, column) in columns.iter().enumerate() {
            let Some(expected) = column.expected_type else {
                continue;
            };
            if column.is_empty || column.inferred_type == expected {
                continue;
            }

            let offending: Vec<usize> = table
                .values(index)
                .filter(|(_, value)| super::csv_validator::infer_value(value) != expected)
                .map(|(line, _)| line)
                .take(SAMPLE_ROWS)
                .collect();

            let diagnostic = match expected {
                InferredType::Date => Diagnostic::error(
                    DiagnosticCode::DateFormat,
                    format!("Column '{}' must hold dates as YYYY-MM-DD", column.name),
                ),
                _ => Diagnostic::warning(
                    DiagnosticCode::NumericType,
                    format!(
                        "Column '{}' should be numeric but looks like {}",
                        column.name,
                        column.inferred_type.label()
                    ),
                ),
            };
            diagnostics.push(diagnostic.with_column(column.name.as_str()).with_rows(offending));
        }

        diagnostics
    }
}

/// Ordered set of structure checks.
pub struct CheckSuite {
    checks: Vec<Box<dyn StructureCheck>>,
}

impl CheckSuite {
    /// Suite with every built-in check.
    pub fn new() -> Self {
        Self {
            checks: vec![
                Box::new(RowShapeCheck),
                Box::new(HeaderSetCheck),
                Box::new(EmptyColumnCheck),
                Box::new(ColumnTypeCheck),
            ],
        }
    }

    /// Add a custom check.
    pub fn with_check(mut self, check: Box<dyn StructureCheck>) -> Self {
        self.checks.push(check);
        self
    }

    /// Run every check and collect diagnostics, errors first.
    pub fn run(
        &self,
        table: &CsvTable,
        columns: &[ColumnDescriptor],
        expected_headers: &[String],
    ) -> Vec<Diagnostic> {
        let mut all: Vec<Diagnostic> = self
            .checks
            .iter()
            .flat_map(|c| c.check(table, columns, expected_headers))
            .collect();
        all.sort_by(|a, b| b.severity.cmp(&a.severity));
        all
    }
}

impl Default for CheckSuite {
    fn default() -> Self {
        Self::new()
    }
}
