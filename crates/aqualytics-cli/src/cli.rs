//! CLI argument definitions using clap.

use aqualytics::aggregate::Period;
use aqualytics::metrics::SortDirection;
use aqualytics::{CourseLength, MetricGroup};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Aqualytics: swim race metric derivation and analytics
#[derive(Parser)]
#[command(name = "aqualytics")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check the structure of a results CSV
    Validate {
        /// Path to the results file (CSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a results CSV and derive metrics for every race
    Import {
        /// Path to the results file (CSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for records (default: <file>.records.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Course for rows without a `curso` value (short, long)
        #[arg(long)]
        course: Option<CourseLength>,

        /// Print the import summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which fields each segment of a race captures
    Segments {
        /// Race distance in meters
        #[arg(short, long)]
        distance: u32,

        /// Pool (short, long)
        #[arg(long, default_value = "short")]
        course: CourseLength,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the metric catalog
    Metrics {
        /// Only metrics of this group (tiempo, brazadas, velocidad, insights)
        #[arg(short, long)]
        group: Option<MetricGroup>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Personal bests of a swimmer
    Bests {
        /// Records file written by `import`
        #[arg(value_name = "RECORDS")]
        records: PathBuf,

        /// Swimmer name
        #[arg(short, long)]
        swimmer: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank performance lines by a metric
    Rankings {
        /// Records file written by `import`
        #[arg(value_name = "RECORDS")]
        records: PathBuf,

        /// Metric to rank by
        #[arg(short, long)]
        metric: String,

        /// Filter by style
        #[arg(long)]
        style: Option<String>,

        /// Filter by distance
        #[arg(long)]
        distance: Option<u32>,

        /// Filter by pool
        #[arg(long)]
        course: Option<CourseLength>,

        /// Override the metric's sort direction (asc, desc)
        #[arg(long)]
        sort: Option<SortDirection>,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Metrics where a swimmer differs most from the team
    Team {
        /// Records file written by `import`
        #[arg(value_name = "RECORDS")]
        records: PathBuf,

        /// Swimmer name
        #[arg(short, long)]
        swimmer: String,

        /// Number of metrics to show
        #[arg(short, long)]
        top: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score two to five swimmers against each other
    Compare {
        /// Records file written by `import`
        #[arg(value_name = "RECORDS")]
        records: PathBuf,

        /// Swimmers, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        swimmers: Vec<String>,

        /// Metric group (tiempo, brazadas, velocidad, insights)
        #[arg(short, long, default_value = "brazadas")]
        group: MetricGroup,

        /// Only races of this style
        #[arg(long)]
        style: Option<String>,

        /// Only races of this distance
        #[arg(long)]
        distance: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Progression of a swimmer on one metric
    Progress {
        /// Records file written by `import`
        #[arg(value_name = "RECORDS")]
        records: PathBuf,

        /// Swimmer name
        #[arg(short, long)]
        swimmer: String,

        /// Metric to follow
        #[arg(short, long)]
        metric: String,

        /// Period (7d, 30d, 3m, 1y, all)
        #[arg(short, long, default_value = "30d")]
        period: Period,

        /// End of the period (YYYY-MM-DD, default: today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
