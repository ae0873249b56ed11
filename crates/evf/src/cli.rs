//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the evf CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use event_filter_rs::filter::OrderBy;

/// evf - compile and run calendar event filters
#[derive(Parser, Debug)]
#[command(name = "evf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// User the filter is evaluated for (default: from config)
    #[arg(long, global = true, env = "EVF_USER_ID")]
    pub user: Option<i64>,

    /// Reject unknown teacher codes instead of searching them as text
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show how each word of a filter is classified
    #[command(alias = "t")]
    Tokens {
        /// Filter words (joined with spaces)
        filter: Vec<String>,
    },

    /// Show the canonical query for a filter
    #[command(alias = "q")]
    Query {
        /// Filter words (joined with spaces)
        filter: Vec<String>,

        /// Result ordering
        #[arg(short, long, value_enum, default_value_t = OrderArg::Relevance)]
        order: OrderArg,
    },

    /// Compile a filter into a search statement
    #[command(alias = "c")]
    Compile {
        /// Filter words (joined with spaces)
        filter: Vec<String>,

        /// Result ordering
        #[arg(short, long, value_enum, default_value_t = OrderArg::Relevance)]
        order: OrderArg,
    },

    /// Run a filter against an event database
    #[command(alias = "s")]
    Search {
        /// Filter words (joined with spaces)
        filter: Vec<String>,

        /// Result ordering
        #[arg(short, long, value_enum, default_value_t = OrderArg::Relevance)]
        order: OrderArg,

        /// SQLite event database (default: from config)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Limit results (default: 50)
        #[arg(long, default_value = "50")]
        limit: u32,

        /// Show all results (no limit)
        #[arg(long)]
        all: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print config file path
    Path,

    /// Write a default config file if none exists
    Init,
}

/// Result ordering
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderArg {
    /// Search engine ranking
    Relevance,
    /// Latest first
    Newest,
    /// Earliest first
    Oldest,
}

impl From<OrderArg> for OrderBy {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Relevance => OrderBy::Relevance,
            OrderArg::Newest => OrderBy::Newest,
            OrderArg::Oldest => OrderBy::Oldest,
        }
    }
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}
