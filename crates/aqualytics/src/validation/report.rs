//! Structural validation report.

use serde::{Deserialize, Serialize};

use super::diagnostic::{Diagnostic, DiagnosticCode, Severity};

/// Type inferred from a column's non-empty values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferredType {
    /// Every value matches `YYYY-MM-DD`.
    Date,
    /// Every value parses as a number.
    Number,
    String,
    /// The column holds no values.
    Unknown,
}

impl InferredType {
    pub fn label(&self) -> &'static str {
        match self {
            InferredType::Date => "date",
            InferredType::Number => "number",
            InferredType::String => "string",
            InferredType::Unknown => "unknown",
        }
    }
}

/// What the validator learned about one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub inferred_type: InferredType,
    /// First non-empty value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
    pub is_empty: bool,
    /// Type the domain expects, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_type: Option<InferredType>,
}

impl ColumnDescriptor {
    /// True when the column has no expectation or meets it.
    pub fn matches_expectation(&self) -> bool {
        match self.expected_type {
            None => true,
            Some(expected) => self.inferred_type == expected,
        }
    }
}

/// Result of validating one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when no blocking diagnostic was raised.
    pub is_valid: bool,
    /// Advisory 0-100 structural score.
    pub score: f64,
    pub columns: Vec<ColumnDescriptor>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub headers: Vec<String>,
    /// First data rows, as read.
    pub preview_rows: Vec<Vec<String>>,
    pub total_rows: usize,
    pub total_columns: usize,
}

impl ValidationReport {
    /// An empty, valid report to be filled in by the validator.
    pub(crate) fn new() -> Self {
        Self {
            is_valid: true,
            score: 0.0,
            columns: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            headers: Vec::new(),
            preview_rows: Vec::new(),
            total_rows: 0,
            total_columns: 0,
        }
    }

    /// File the diagnostic under errors or warnings by severity.
    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => {
                self.is_valid = false;
                self.errors.push(diagnostic);
            }
            Severity::Warning | Severity::Info => self.warnings.push(diagnostic),
        }
    }

    /// All diagnostics, errors first.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().chain(self.warnings.iter())
    }

    /// True if any diagnostic carries this code.
    pub fn has(&self, code: DiagnosticCode) -> bool {
        self.diagnostics().any(|d| d.code == code)
    }

    /// Look up a column descriptor by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_sorts_by_severity() {
        let mut report = ValidationReport::new();
        report.push(Diagnostic::warning(DiagnosticCode::EmptyColumn, "empty"));
        assert!(report.is_valid);

        report.push(Diagnostic::error(DiagnosticCode::DateFormat, "dates"));
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.has(DiagnosticCode::EmptyColumn));
        assert_eq!(
            report.diagnostics().next().map(|d| d.code),
            Some(DiagnosticCode::DateFormat)
        );
    }

    #[test]
    fn test_matches_expectation() {
        let column = ColumnDescriptor {
            name: "nadador".to_string(),
            inferred_type: InferredType::Number,
            sample: Some("7".to_string()),
            is_empty: false,
            expected_type: None,
        };
        assert!(column.matches_expectation());

        let dated = ColumnDescriptor {
            expected_type: Some(InferredType::Date),
            ..column
        };
        assert!(!dated.matches_expectation());
    }
}
