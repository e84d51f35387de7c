//! CSV structural validation and severity-tagged diagnostics.

mod csv_validator;
mod diagnostic;
mod report;
pub mod table;
mod validators;

pub use csv_validator::{
    CsvValidator, EXPECTED_HEADERS, ValidatorConfig, expected_type, infer_value,
};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use report::{ColumnDescriptor, InferredType, ValidationReport};
pub use table::{CsvTable, TableRow};
pub use validators::{
    CheckSuite, ColumnTypeCheck, EmptyColumnCheck, HeaderSetCheck, RowShapeCheck, StructureCheck,
};
