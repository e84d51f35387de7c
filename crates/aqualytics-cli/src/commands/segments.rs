//! Segments command - show the capture plan of a race.

use aqualytics::race::{Capture, SegmentField};
use aqualytics::{Aqualytics, CourseLength};
use colored::Colorize;

use super::CommandResult;

pub fn run(aqua: &Aqualytics, distance: u32, course: CourseLength, json_output: bool) -> CommandResult {
    if distance == 0 {
        return Err("Distance must be positive".into());
    }

    let plan = aqua.segments(distance, course)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!(
        "{} {}m {}",
        "Capture plan for".cyan().bold(),
        distance,
        course
    );
    println!();

    let header: Vec<String> = SegmentField::ALL
        .iter()
        .map(|f| format!("{:>9}", short_name(*f)))
        .collect();
    println!("  {:12} {:24} {}", "segment", "rule", header.join(""));

    for segment in &plan.segments {
        let flags: Vec<String> = SegmentField::ALL
            .iter()
            .map(|f| {
                let cell = format!("{:>9}", flag(segment.capture(*f)));
                match segment.capture(*f) {
                    Capture::Required => cell.green().bold().to_string(),
                    Capture::Optional => cell.white().to_string(),
                    Capture::Off => cell.dimmed().to_string(),
                }
            })
            .collect();
        println!(
            "  {:12} {:24} {}",
            segment.label,
            format!("{:?}", segment.rule),
            flags.join("")
        );
    }

    if !plan.aggregate_splits.is_empty() {
        let marks: Vec<String> = plan.aggregate_splits.iter().map(|m| format!("{}m", m)).collect();
        println!();
        println!("Cumulative splits at: {}", marks.join(", "));
    }

    Ok(())
}

fn short_name(field: SegmentField) -> &'static str {
    match field {
        SegmentField::Split15 => "15m",
        SegmentField::Split25 => "25m",
        SegmentField::SegmentTime => "time",
        SegmentField::CumulativeSplit => "split",
        SegmentField::StrokeCount => "strokes",
        SegmentField::StrokeRate => "rate",
        SegmentField::Underwater => "under",
    }
}

fn flag(capture: Capture) -> &'static str {
    match capture {
        Capture::Required => "required",
        Capture::Optional => "optional",
        Capture::Off => "-",
    }
}
