//! Rankings command - rank performance lines by a metric.

use std::path::PathBuf;

use aqualytics::metrics::SortDirection;
use aqualytics::{Aqualytics, CourseLength};
use colored::Colorize;

use super::{CommandResult, fmt_value, load_records};

/// Query options taken from the command line.
pub struct Filters {
    pub metric: String,
    pub style: Option<String>,
    pub distance: Option<u32>,
    pub course: Option<CourseLength>,
    pub sort: Option<SortDirection>,
    pub page: usize,
}

pub fn run(aqua: &Aqualytics, records: PathBuf, filters: Filters, json_output: bool) -> CommandResult {
    let records = load_records(&records)?;

    let page_size = aqua.config().aggregation.page_size;
    let mut query = aqua
        .ranking_query(&filters.metric)
        .with_page(filters.page, page_size);
    if let Some(style) = filters.style {
        query = query.with_style(style);
    }
    if let Some(distance) = filters.distance {
        query = query.with_distance(distance);
    }
    if let Some(course) = filters.course {
        query = query.with_course(course);
    }
    if let Some(sort) = filters.sort {
        query = query.with_direction(sort);
    }

    let page = aqua.rankings(&records, &query)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    let unit = aqua.catalog().get(&page.metric)?.unit;
    println!(
        "{} {} ({}, {})",
        "Ranking by".cyan().bold(),
        page.metric.white().bold(),
        unit,
        match page.direction {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    );
    println!();

    if page.entries.is_empty() {
        println!("No performance lines match.");
        return Ok(());
    }

    for entry in &page.entries {
        let rank = format!("{:>3}", entry.rank);
        let rank = if entry.rank == 1 {
            rank.green().bold()
        } else {
            rank.white()
        };
        let gap = if entry.gap_to_leader == 0.0 {
            String::new()
        } else {
            format!("+{}", fmt_value(entry.gap_to_leader))
        };
        println!(
            "  {} {:20} {:>5}m {:10} {:>10} {:>10}  {} race(s)",
            rank,
            entry.line.swimmer,
            entry.line.distance,
            entry.line.style,
            fmt_value(entry.value),
            gap,
            entry.line.races
        );
    }

    println!();
    println!(
        "Page {} of {} ({} lines)",
        page.page,
        page.total_pages.max(1),
        page.total
    );

    Ok(())
}
