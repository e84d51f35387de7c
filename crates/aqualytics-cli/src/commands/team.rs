//! Team command - metrics where a swimmer stands out from the team.

use std::path::PathBuf;

use aqualytics::Aqualytics;
use colored::Colorize;

use super::{CommandResult, fmt_value, load_records};

pub fn run(
    aqua: Aqualytics,
    records: PathBuf,
    swimmer: String,
    top: Option<usize>,
    json_output: bool,
) -> CommandResult {
    let records = load_records(&records)?;

    let aqua = match top {
        Some(top) => {
            let mut config = aqua.config().clone();
            config.aggregation = config.aggregation.with_top_n(top);
            Aqualytics::with_config(config)
        }
        None => aqua,
    };

    let differences = aqua.team_differences(&records, &swimmer)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&differences)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        "Compared with the team:".cyan().bold(),
        swimmer.white().bold(),
        format!("({} races in total)", records.len()).dimmed()
    );
    println!();

    if differences.is_empty() {
        println!("Not enough races to compare.");
        return Ok(());
    }

    for diff in &differences {
        let percent = format!("{:+.1}%", diff.percent_diff);
        let percent = if diff.percent_diff >= 0.0 {
            percent.green()
        } else {
            percent.red()
        };
        println!(
            "  {:14} {:>10} vs {:>10}  {}",
            diff.metric,
            fmt_value(diff.swimmer_average),
            fmt_value(diff.team_average),
            percent
        );
    }

    Ok(())
}
