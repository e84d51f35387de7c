//! Aqualytics CLI - swim race metric derivation and analytics.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use env_logger::Env;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let result = commands::build(cli.config.as_deref()).and_then(|aqua| match cli.command {
        Commands::Validate { file, json } => commands::validate::run(&aqua, file, json),

        Commands::Import {
            file,
            output,
            course,
            json,
        } => commands::import::run(aqua, file, output, course, json),

        Commands::Segments {
            distance,
            course,
            json,
        } => commands::segments::run(&aqua, distance, course, json),

        Commands::Metrics { group, json } => commands::metrics::run(&aqua, group, json),

        Commands::Bests {
            records,
            swimmer,
            json,
        } => commands::bests::run(&aqua, records, swimmer, json),

        Commands::Rankings {
            records,
            metric,
            style,
            distance,
            course,
            sort,
            page,
            json,
        } => commands::rankings::run(
            &aqua,
            records,
            commands::rankings::Filters {
                metric,
                style,
                distance,
                course,
                sort,
                page,
            },
            json,
        ),

        Commands::Team {
            records,
            swimmer,
            top,
            json,
        } => commands::team::run(aqua, records, swimmer, top, json),

        Commands::Compare {
            records,
            swimmers,
            group,
            style,
            distance,
            json,
        } => commands::compare::run(&aqua, records, swimmers, group, style, distance, json),

        Commands::Progress {
            records,
            swimmer,
            metric,
            period,
            as_of,
            json,
        } => commands::progress::run(&aqua, records, swimmer, metric, period, as_of, json),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
