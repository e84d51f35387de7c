//! Severity-tagged diagnostics shared by the CSV validator, the importer and
//! the raw input checks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only, may not require action.
    Info,
    /// Non-blocking issue that should be reviewed.
    Warning,
    /// Blocking issue.
    Error,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// What kind of problem a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// The file has no non-blank lines at all.
    EmptyFile,
    /// The file has a header row but nothing else.
    NoDataRows,
    /// A row's cell count differs from the header's.
    InconsistentRowLength,
    /// An expected header is absent.
    MissingHeader,
    /// A header outside the canonical set is present.
    UnexpectedHeader,
    /// A column has no values at all.
    EmptyColumn,
    /// The date column does not hold `YYYY-MM-DD` values.
    DateFormat,
    /// A numeric column holds non-numeric values.
    NumericType,
    /// The content contains replacement characters.
    Encoding,
    /// The importer stopped at its row cap.
    RowLimit,
    /// A cell could not be parsed into the value its column expects.
    UnparseableValue,
    /// A field outside the segment's capture configuration is populated.
    UnconfiguredField,
    /// A time, count or rate is negative.
    NegativeValue,
    /// A value is NaN or infinite.
    NonFiniteValue,
    /// Underwater distance exceeds the segment length.
    UnderwaterExceedsSegment,
    /// A value lies outside the plausible range.
    OutOfRange,
    /// Splits are not strictly increasing.
    SplitOrder,
    /// Total time is below the sum of segment times.
    TotalTime,
    /// Total strokes are below the sum of segment strokes.
    TotalStrokes,
    /// Summed underwater distance reaches the race distance.
    UnderwaterTotal,
}

/// A single finding with its severity and location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    /// Affected column or field name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Affected segment index (0-based).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<usize>,
    /// Human-readable description.
    pub message: String,
    /// Sample 1-based line numbers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<usize>,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            column: None,
            segment: None,
            message: message.into(),
            rows: Vec::new(),
        }
    }

    /// Create a blocking diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, message)
    }

    /// Create a non-blocking diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warning, message)
    }

    /// Set the column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Set the segment.
    pub fn with_segment(mut self, segment: usize) -> Self {
        self.segment = Some(segment);
        self
    }

    /// Set sample rows.
    pub fn with_rows(mut self, rows: Vec<usize>) -> Self {
        self.rows = rows;
        self
    }

    /// True for blocking diagnostics.
    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity.label(), self.message)
    }
}
