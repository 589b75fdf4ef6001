//! CLI argument parsing for tagrank
//!
//! Global flags: --config, --format, --quiet, --verbose, --log-level,
//! --log-json. Subcommands cover store setup, tag-weight editing, and the
//! ranking run itself.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for tagrank commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for machine consumption
    Json,
}

/// Tagrank - weighted tag ranking and archiving for Hydrus
#[derive(Parser, Debug)]
#[command(name = "tagrank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, default_value = "tagrank.toml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Explicit log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the config file and tag database
    Init {
        /// Seed the database with example tag records
        #[arg(long)]
        examples: bool,
    },

    /// Manage stored tag weights
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Rank files by accumulated tag weights and push the top of the list
    /// onto the destination page
    Rank {
        /// Maximum number of files to push (overrides config)
        #[arg(long, short)]
        limit: Option<usize>,

        /// Destination page name (overrides config)
        #[arg(long, short)]
        page: Option<String>,

        /// Client API access key (overrides config)
        #[arg(long, env = "TAGRANK_ACCESS_KEY", hide_env_values = true)]
        access_key: Option<String>,

        /// Compute the ranking without delivering it
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// Add a tag record
    Add {
        /// Search predicate (plain tag or system predicate)
        tag: String,

        /// Score contribution, may be negative; unset uses the default score
        #[arg(long, short, allow_negative_numbers = true)]
        weight: Option<f64>,

        /// Informational sibling tags
        #[arg(long)]
        siblings: Option<String>,

        /// Free-text annotation
        #[arg(long, short)]
        comment: Option<String>,
    },

    /// List all tag records
    List,

    /// Update the first record with the given tag
    Set {
        tag: String,

        #[arg(long, short, allow_negative_numbers = true)]
        weight: Option<f64>,

        #[arg(long)]
        siblings: Option<String>,

        #[arg(long, short)]
        comment: Option<String>,
    },

    /// Remove the first record with the given tag
    Rm { tag: String },
}
