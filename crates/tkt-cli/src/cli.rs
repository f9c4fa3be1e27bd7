//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Support-ticket time analyzer.
///
/// Replays each ticket's reply timeline and splits its lifetime into
/// customer, support, bug, and ignored buckets, in wall-clock time and in
/// configured business hours.
#[derive(Debug, Parser)]
#[command(name = "tkt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Attribute time for a file of vendor ticket records.
    Analyze {
        /// JSON file containing an array of ticket records.
        file: PathBuf,

        /// Emit machine-readable JSON instead of the table.
        #[arg(long)]
        json: bool,

        /// Closing instant for still-open tickets (defaults to now),
        /// e.g. "2025-03-10 12:00:00".
        #[arg(long)]
        now: Option<String>,
    },

    /// Wall and business time between two instants.
    Check {
        /// Start instant, e.g. "2025-03-03 09:00:00".
        start: String,

        /// End instant.
        end: String,
    },

    /// Show the effective weekly schedule and holidays.
    Hours,
}
