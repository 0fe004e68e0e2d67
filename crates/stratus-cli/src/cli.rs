//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Export file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Parser)]
#[command(name = "stratus")]
#[command(author, version, about = "CLI for the stratus weather archive", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Database path (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Provider base URL (overrides config)
    #[arg(short = 'p', long, global = true)]
    pub provider_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register provider locations and backfill a year of readings
    Init {
        /// Year to backfill (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// List registered locations
    Locations {
        /// Discover provider locations and register new ones first
        #[arg(short, long)]
        register: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the current reading for a location, refreshing it when stale
    Current {
        /// Location name
        name: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Merge a provider year series into the archive
    Sync {
        /// Location name
        name: String,

        /// Year to merge (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Query archived readings by temporal window
    Query {
        #[command(subcommand)]
        window: QueryWindow,
    },

    /// Show archive statistics
    Status {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Export archived readings to CSV or JSON
    Export {
        /// Location name
        #[arg(short, long)]
        location: String,

        /// Export readings since this date/time (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,

        /// Export readings until this date/time (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        until: Option<String>,

        /// Export format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete every archived location and reading
    Reset {
        /// Confirm the deletion (required)
        #[arg(long)]
        yes: bool,
    },
}

/// Temporal windows accepted by the query command.
///
/// Out-of-range values (month 13, day difference 400) are not arg errors;
/// they produce an empty result set, matching the archive's window
/// semantics.
#[derive(Debug, Clone, Subcommand)]
pub enum QueryWindow {
    /// Readings recorded during a calendar year
    Year {
        /// Four-digit year
        year: i32,

        /// Restrict to one location (searches all locations when omitted)
        #[arg(short, long)]
        location: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Readings recorded during a month of the current year
    Month {
        /// Month number (1-12)
        month: u8,

        /// Location name
        #[arg(short, long)]
        location: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Readings recorded during a seven-day week of the current year
    Week {
        /// Week number (1-52)
        week: u8,

        /// Location name
        #[arg(short, long)]
        location: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Readings recorded within the last N days, across all locations
    Days {
        /// Days back from now (1-365)
        days: u16,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Readings recorded between two instants (inclusive)
    Span {
        /// Location name
        #[arg(short, long)]
        location: String,

        /// Start of the span (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// End of the span (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}
