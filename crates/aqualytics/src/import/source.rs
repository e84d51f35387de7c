//! Metadata about an imported file.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Metadata about the source data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// `utf-8`, or `utf-8-lossy` when invalid bytes were replaced.
    pub encoding: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    pub column_count: usize,
    pub imported_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe file contents that have just been read.
    pub fn new(
        path: PathBuf,
        contents: &[u8],
        format: impl Into<String>,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let encoding = if std::str::from_utf8(contents).is_ok() {
            "utf-8"
        } else {
            "utf-8-lossy"
        };

        Self {
            file,
            path,
            hash: content_hash(contents),
            size_bytes: contents.len() as u64,
            format: format.into(),
            encoding: encoding.to_string(),
            row_count,
            column_count,
            imported_at: Utc::now(),
        }
    }
}

/// `sha256:<hex>` digest of raw bytes.
pub fn content_hash(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    format!("sha256:{:x}", hasher.finalize())
}
