//! Metrics command - list the metric catalog.

use aqualytics::{Aqualytics, Directionality, MetricGroup};
use colored::Colorize;

use super::CommandResult;

pub fn run(aqua: &Aqualytics, group: Option<MetricGroup>, json_output: bool) -> CommandResult {
    let catalog = aqua.catalog();
    let definitions = match group {
        Some(group) => catalog.group(group),
        None => catalog.definitions(),
    };

    if json_output {
        let listing = serde_json::json!({
            "version": catalog.version(),
            "metrics": definitions,
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!(
        "{} (version {})",
        "Metric catalog".cyan().bold(),
        catalog.version()
    );

    for group in MetricGroup::ALL {
        let members: Vec<_> = definitions.iter().filter(|d| d.group == group).collect();
        if members.is_empty() {
            continue;
        }

        println!();
        println!("{}", format!("{}:", group.label()).yellow().bold());
        for definition in members {
            let direction = match definition.directionality {
                Directionality::LowerIsBetter => "lower is better".blue(),
                Directionality::HigherIsBetter => "higher is better".green(),
            };
            println!(
                "  {:14} {:36} {:14} {}",
                definition.key, definition.label, definition.unit, direction
            );
        }
    }

    Ok(())
}
