//! Batch import of results files.

mod batch;
mod parser;
mod source;

pub use batch::{BatchImporter, ImportResult, ImportSummary, RowPartial};
pub use parser::{
    DATE_FORMATS, ImportConfig, ImportParser, ImportRow, ParsedRows, RowFailure, canonical_header,
    parse_date,
};
pub use source::{SourceMetadata, content_hash};
