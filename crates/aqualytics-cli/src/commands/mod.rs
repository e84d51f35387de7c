//! CLI command implementations.

pub mod bests;
pub mod compare;
pub mod import;
pub mod metrics;
pub mod progress;
pub mod rankings;
pub mod segments;
pub mod team;
pub mod validate;

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use aqualytics::{AnalyticsConfig, Aqualytics, Diagnostic, DerivedMetricRecord, Severity};
use colored::Colorize;

pub type CommandResult = Result<(), Box<dyn Error>>;

/// Build the library entry point from an optional config file.
pub fn build(config: Option<&Path>) -> Result<Aqualytics, Box<dyn Error>> {
    let config = match config {
        Some(path) => {
            log::debug!("Loading configuration from {}", path.display());
            AnalyticsConfig::load(path)?
        }
        None => AnalyticsConfig::default(),
    };
    Ok(Aqualytics::with_config(config))
}

/// Read a records file written by `import`.
pub fn load_records(path: &Path) -> Result<Vec<DerivedMetricRecord>, Box<dyn Error>> {
    if !path.exists() {
        return Err(format!(
            "Records file not found: {}\nRun 'aqualytics import <FILE>' first.",
            path.display()
        )
        .into());
    }

    let file = File::open(path)?;
    let records: Vec<DerivedMetricRecord> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("Failed to parse records '{}': {}", path.display(), e))?;
    log::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// One diagnostic on one line, colored by severity.
pub fn print_diagnostic(diagnostic: &Diagnostic) {
    let label = format!("{:8}", diagnostic.severity.label());
    let label = match diagnostic.severity {
        Severity::Error => label.red().bold(),
        Severity::Warning => label.yellow().bold(),
        Severity::Info => label.blue().bold(),
    };
    let rows = if diagnostic.rows.is_empty() {
        String::new()
    } else {
        let shown: Vec<String> = diagnostic.rows.iter().take(5).map(|r| r.to_string()).collect();
        format!(" (rows {})", shown.join(", "))
    };
    println!("  {} {}{}", label, diagnostic.message, rows.dimmed());
}

/// Format a metric value for tables.
pub fn fmt_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{}", value as i64)
    } else {
        format!("{:.3}", value)
    }
}
