//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "siplog")]
#[command(author, version, about = "Personal coffee consumption log", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding the log snapshots (overrides the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log and inspect drinks
    #[command(subcommand)]
    Drink(DrinkAction),

    /// Log and inspect grain purchases
    #[command(subcommand)]
    Grain(GrainAction),

    /// Show or update the configuration file
    ///
    /// A global `--data-dir`, if given, is persisted as the default
    /// snapshot directory.
    Config {
        /// Set the currency symbol used in text output
        #[arg(long)]
        currency: Option<String>,

        /// Set the snapshot debounce interval in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum DrinkAction {
    /// Record a drink
    Add {
        /// Volume in milliliters
        #[arg(long)]
        ml: u32,

        /// Money spent
        #[arg(long)]
        price: f64,

        /// Where the drink was had
        #[arg(long, default_value = "")]
        place: String,

        /// Drink kind (espresso, latte, ...); unknown names are kept verbatim
        #[arg(long, default_value = "espresso")]
        kind: String,

        /// Date of the drink (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Edit an existing drink; omitted flags keep their current value
    Edit {
        /// Id of the drink to edit
        id: Uuid,

        #[arg(long)]
        ml: Option<u32>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        place: Option<String>,

        #[arg(long)]
        kind: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a drink by id
    Remove {
        /// Id of the drink to remove
        id: Uuid,
    },

    /// List drinks in a window, newest first
    List {
        /// Window: `all`, `YYYY`, or `YYYY-MM`
        #[arg(short, long, default_value = "all")]
        window: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show aggregate statistics for a window
    Stats {
        /// Window: `all`, `YYYY`, or `YYYY-MM`
        #[arg(short, long, default_value = "all")]
        window: String,

        #[arg(short, long, value_enum, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },

    /// Show summaries for recent calendar months, newest first
    History {
        /// Number of recent months to cover
        #[arg(short, long, default_value_t = 12)]
        months: u32,

        /// Cover this many recent years instead of months
        #[arg(short, long, conflicts_with = "months")]
        years: Option<u32>,

        #[arg(short, long, value_enum, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },

    /// Export drinks as CSV
    Export {
        /// Window: `all`, `YYYY`, or `YYYY-MM`
        #[arg(short, long, default_value = "all")]
        window: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete every drink and the persisted snapshot
    Clear {
        /// Skip the safety check
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum GrainAction {
    /// Record a grain purchase
    Add {
        /// Label of the beans (roaster, origin, blend)
        #[arg(long)]
        name: String,

        /// Weight in grams
        #[arg(long)]
        weight: f64,

        /// Money spent
        #[arg(long)]
        price: f64,

        /// Date of the purchase (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Edit an existing purchase; omitted flags keep their current value
    Edit {
        /// Id of the purchase to edit
        id: Uuid,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        weight: Option<f64>,

        #[arg(long)]
        price: Option<f64>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a purchase by id
    Remove {
        /// Id of the purchase to remove
        id: Uuid,
    },

    /// List purchases in a window, newest first
    List {
        /// Window: `all`, `YYYY`, or `YYYY-MM`
        #[arg(short, long, default_value = "all")]
        window: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show aggregate statistics for a window
    Stats {
        /// Window: `all`, `YYYY`, or `YYYY-MM`
        #[arg(short, long, default_value = "all")]
        window: String,

        #[arg(short, long, value_enum, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },

    /// Show summaries for recent calendar months, newest first
    History {
        /// Number of recent months to cover
        #[arg(short, long, default_value_t = 12)]
        months: u32,

        /// Cover this many recent years instead of months
        #[arg(short, long, conflicts_with = "months")]
        years: Option<u32>,

        #[arg(short, long, value_enum, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },

    /// Export purchases as CSV
    Export {
        /// Window: `all`, `YYYY`, or `YYYY-MM`
        #[arg(short, long, default_value = "all")]
        window: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete every purchase and the persisted snapshot
    Clear {
        /// Skip the safety check
        #[arg(long)]
        yes: bool,
    },
}

/// Output format for record listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Output format for aggregate statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatsFormat {
    Text,
    Json,
}
