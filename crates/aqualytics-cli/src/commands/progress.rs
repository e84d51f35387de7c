//! Progress command - a swimmer's progression on one metric.

use std::path::PathBuf;

use aqualytics::Aqualytics;
use aqualytics::aggregate::{Period, Trend};
use chrono::{Local, NaiveDate};
use colored::Colorize;

use super::{CommandResult, fmt_value, load_records};

pub fn run(
    aqua: &Aqualytics,
    records: PathBuf,
    swimmer: String,
    metric: String,
    period: Period,
    as_of: Option<NaiveDate>,
    json_output: bool,
) -> CommandResult {
    let records = load_records(&records)?;
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let progression = aqua.progression(&records, &swimmer, &metric, period, as_of)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&progression)?);
        return Ok(());
    }

    println!(
        "{} {} on {} ({} to {})",
        "Progression of".cyan().bold(),
        swimmer.white().bold(),
        metric.white().bold(),
        period,
        as_of
    );
    println!();

    if progression.points.is_empty() {
        println!("No races in this period.");
        return Ok(());
    }

    for point in &progression.points {
        println!(
            "  {}  {:>10}  {}",
            point.date,
            fmt_value(point.value),
            point.event.as_deref().unwrap_or("").dimmed()
        );
    }

    println!();
    if let (Some(best), Some(worst), Some(mean)) =
        (progression.best, progression.worst, progression.mean)
    {
        println!(
            "Best: {}  Worst: {}  Mean: {}",
            fmt_value(best).green(),
            fmt_value(worst).red(),
            fmt_value(mean)
        );
    }

    let trend = match progression.trend {
        Trend::Improving => "improving".green().bold(),
        Trend::Declining => "declining".red().bold(),
        Trend::Stable => "stable".white().bold(),
    };
    match progression.improvement_percent {
        Some(change) => println!("Trend: {} ({:+.1}%)", trend, change),
        None => println!("Trend: {}", trend),
    }

    Ok(())
}
