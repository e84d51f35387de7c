//! Compare command - normalized scores for a small group of swimmers.

use std::path::PathBuf;

use aqualytics::scoring::{MAX_MEMBERS, MIN_MEMBERS};
use aqualytics::{Aqualytics, MetricGroup};
use colored::Colorize;

use super::{CommandResult, load_records};

pub fn run(
    aqua: &Aqualytics,
    records: PathBuf,
    swimmers: Vec<String>,
    group: MetricGroup,
    style: Option<String>,
    distance: Option<u32>,
    json_output: bool,
) -> CommandResult {
    let records = load_records(&records)?;
    let board = aqua.compare(&records, &swimmers, group, style.as_deref(), distance)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&board)?);
        return Ok(());
    }

    if !board.applicable {
        println!(
            "{}",
            format!(
                "Comparison needs {} to {} swimmers with matching races",
                MIN_MEMBERS, MAX_MEMBERS
            )
            .yellow()
        );
        return Ok(());
    }

    println!(
        "{} {}",
        "Scores for".cyan().bold(),
        group.label().white().bold()
    );
    println!();

    for metric in &board.metrics {
        let cells: Vec<String> = metric
            .scores
            .iter()
            .map(|s| match s {
                Some(s) => format!("{:>6.1}", s),
                None => format!("{:>6}", "-"),
            })
            .collect();
        println!("  {:14} {}", metric.metric, cells.join(" "));
    }

    println!();
    println!("{}", "Overall:".yellow().bold());
    for member in &board.members {
        let composite = member
            .composite
            .map(|c| format!("{:.1}", c))
            .unwrap_or_else(|| "-".to_string());
        let line = format!("  {:>2}. {:20} {:>6}", member.rank, member.swimmer, composite);
        if member.rank == 1 {
            println!("{}", line.green().bold());
        } else {
            println!("{}", line);
        }
    }

    Ok(())
}
