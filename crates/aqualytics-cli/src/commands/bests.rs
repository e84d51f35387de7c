//! Bests command - personal bests of a swimmer.

use std::path::PathBuf;

use aqualytics::Aqualytics;
use colored::Colorize;

use super::{CommandResult, fmt_value, load_records};

pub fn run(aqua: &Aqualytics, records: PathBuf, swimmer: String, json_output: bool) -> CommandResult {
    let records = load_records(&records)?;
    let bests = aqua.personal_bests(&records, &swimmer)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&bests)?);
        return Ok(());
    }

    if bests.is_empty() {
        println!("No races found for {}", swimmer.white().bold());
        return Ok(());
    }

    println!("{} {}", "Personal bests for".cyan().bold(), swimmer.white().bold());

    let mut current: Option<(String, u32)> = None;
    for best in &bests {
        let event = (best.style.clone(), best.distance);
        if current.as_ref() != Some(&event) {
            println!();
            println!(
                "{}",
                format!("{}m {}:", best.distance, best.style).yellow().bold()
            );
            current = Some(event);
        }
        println!(
            "  {:14} {:>10}  {}  {}",
            best.metric,
            fmt_value(best.value),
            best.date,
            best.event.as_deref().unwrap_or("").dimmed()
        );
    }

    Ok(())
}
