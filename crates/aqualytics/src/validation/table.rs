//! Delimited text reading shared by the validator and the importer.

use serde::{Deserialize, Serialize};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// One data row with its 1-based line number in the original content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub line: usize,
    pub cells: Vec<String>,
}

impl TableRow {
    /// Cell at a column position, trimmed; empty cells read as `None`.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells
            .get(index)
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }
}

/// Header row plus data rows of a delimited file, blank lines removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvTable {
    /// Trimmed, lower-cased header names.
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
    pub delimiter: u8,
    /// Records the reader could not decode, with their line numbers.
    pub unreadable: Vec<(usize, String)>,
}

impl CsvTable {
    /// Read delimited text. Never fails; undecodable records are collected.
    pub fn read(content: &str, delimiter: Option<u8>) -> Self {
        let (text, line_numbers) = non_blank_lines(content);
        let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&text));
        let original_line = |filtered: u64| -> usize {
            let idx = filtered.saturating_sub(1) as usize;
            line_numbers.get(idx).copied().unwrap_or(idx + 1)
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut headers = Vec::new();
        let mut rows = Vec::new();
        let mut unreadable = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            match result {
                Ok(record) => {
                    let line = record
                        .position()
                        .map(|p| original_line(p.line()))
                        .unwrap_or(idx + 1);
                    if idx == 0 {
                        headers = record.iter().map(normalize_header).collect();
                    } else {
                        rows.push(TableRow {
                            line,
                            cells: record.iter().map(|c| c.to_string()).collect(),
                        });
                    }
                }
                Err(e) => {
                    let line = e
                        .position()
                        .map(|p| original_line(p.line()))
                        .unwrap_or(idx + 1);
                    unreadable.push((line, e.to_string()));
                }
            }
        }

        Self {
            headers,
            rows,
            delimiter,
            unreadable,
        }
    }

    /// Position of a header.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Non-empty values of a column with their line numbers.
    pub fn values(&self, index: usize) -> impl Iterator<Item = (usize, &str)> {
        self.rows
            .iter()
            .filter_map(move |row| row.cell(index).map(|v| (row.line, v)))
    }
}

/// Trimmed, lower-cased header name with any byte order mark removed.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Content with blank lines dropped, plus the original line number of each
/// kept line.
fn non_blank_lines(content: &str) -> (String, Vec<usize>) {
    let mut text = String::with_capacity(content.len());
    let mut numbers = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        text.push_str(line);
        text.push('\n');
        numbers.push(idx + 1);
    }
    (text, numbers)
}

/// Number of non-blank lines.
pub fn count_non_blank(content: &str) -> usize {
    content.lines().filter(|l| !l.trim().is_empty()).count()
}

/// Detect the delimiter by analyzing the first few lines.
///
/// Falls back to a comma when no candidate appears.
pub fn detect_delimiter(content: &str) -> u8 {
    let lines: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let Some(&first_count) = counts.first() else {
            continue;
        };
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Tab gets a slight bonus as it rarely appears inside values
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    best_delimiter
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

/// Short format name for a delimiter.
pub fn delimiter_format(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

/// Parse a number, accepting a decimal comma.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = match trimmed.parse::<f64>() {
        Ok(v) => v,
        Err(_) if trimmed.matches(',').count() == 1 && !trimmed.contains('.') => {
            trimmed.replace(',', ".").parse::<f64>().ok()?
        }
        Err(_) => return None,
    };
    value.is_finite().then_some(value)
}
