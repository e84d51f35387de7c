//! Import command - validate a results file and derive metrics.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use aqualytics::{Aqualytics, CourseLength};
use colored::Colorize;

use super::{CommandResult, print_diagnostic};

pub fn run(
    aqua: Aqualytics,
    file: PathBuf,
    output: Option<PathBuf>,
    course: Option<CourseLength>,
    json_output: bool,
) -> CommandResult {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let aqua = match course {
        Some(course) => {
            let mut config = aqua.config().clone();
            config.import = config.import.with_default_course(course);
            Aqualytics::with_config(config)
        }
        None => aqua,
    };

    let result = aqua.import_file(&file)?;

    if !result.report.is_valid {
        if json_output {
            println!("{}", serde_json::to_string_pretty(&result.report)?);
        } else {
            println!("{}", "File failed structural validation:".red().bold());
            for diagnostic in &result.report.errors {
                print_diagnostic(diagnostic);
            }
        }
        return Err(format!("Nothing imported from {}", file.display()).into());
    }

    let output_path = output.unwrap_or_else(|| {
        let mut p = file.clone();
        let stem = p.file_stem().unwrap_or_default().to_string_lossy();
        p.set_file_name(format!("{}.records.json", stem));
        p
    });

    let writer = BufWriter::new(File::create(&output_path)?);
    serde_json::to_writer_pretty(writer, &result.records)?;

    if json_output {
        let summary = serde_json::json!({
            "source": result.source,
            "summary": result.summary,
            "failures": result.failures,
            "partials": result.partials,
            "warnings": result.warnings,
            "output": output_path,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let summary = &result.summary;
    println!(
        "{} {}",
        "Imported".cyan().bold(),
        file.display().to_string().white()
    );
    println!();
    println!(
        "Rows: {}  Imported: {}  Failed: {}  Partial: {}",
        summary.total_rows.to_string().white().bold(),
        summary.imported.to_string().green(),
        summary.failed.to_string().red(),
        summary.partial.to_string().yellow()
    );

    if !result.failures.is_empty() {
        println!();
        println!("{}", "Rejected rows:".red().bold());
        for failure in &result.failures {
            println!(
                "  line {:4} {:16} {}",
                failure.line,
                failure.swimmer.as_deref().unwrap_or("-"),
                failure.reasons.join("; ")
            );
        }
    }

    if !result.partials.is_empty() {
        println!();
        println!("{}", "Omitted metrics:".yellow().bold());
        for partial in &result.partials {
            let omitted: Vec<String> = partial.omitted.iter().map(|e| e.to_string()).collect();
            println!(
                "  line {:4} {:16} {}",
                partial.line,
                partial.swimmer,
                omitted.join("; ")
            );
        }
    }

    if !result.warnings.is_empty() {
        println!();
        println!("{}", "Warnings:".yellow().bold());
        for warning in &result.warnings {
            print_diagnostic(warning);
        }
    }

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
