//! Validate command - check the structure of a results file.

use std::path::PathBuf;

use aqualytics::Aqualytics;
use colored::Colorize;

use super::{CommandResult, print_diagnostic};

pub fn run(aqua: &Aqualytics, file: PathBuf, json_output: bool) -> CommandResult {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let report = aqua.validate_file(&file)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Validating".cyan().bold(),
        file.display().to_string().white()
    );
    println!();
    println!(
        "Rows: {}  Columns: {}",
        report.total_rows.to_string().white().bold(),
        report.total_columns.to_string().white().bold()
    );

    if !report.columns.is_empty() {
        println!();
        println!("{}", "Columns:".yellow().bold());
        for column in &report.columns {
            let marker = if column.matches_expectation() {
                format!("{:10}", "ok").green()
            } else {
                format!("{:10}", "mismatch").red()
            };
            println!(
                "  {:14} {:8} {} {}",
                column.name,
                column.inferred_type.label(),
                marker,
                column.sample.as_deref().unwrap_or("").dimmed()
            );
        }
    }

    if report.errors.len() + report.warnings.len() > 0 {
        println!();
        println!("{}", "Diagnostics:".yellow().bold());
        for diagnostic in report.diagnostics() {
            print_diagnostic(diagnostic);
        }
    }

    println!();
    let score = format!("{:.0}", report.score);
    let score = if report.score >= 80.0 {
        score.green()
    } else if report.score >= 50.0 {
        score.yellow()
    } else {
        score.red()
    };
    println!("Structure score: {}/100", score);

    if report.is_valid {
        println!("{}", "File is valid".green().bold());
    } else {
        println!(
            "{}",
            format!("File has {} blocking error(s)", report.errors.len())
                .red()
                .bold()
        );
    }

    Ok(())
}
