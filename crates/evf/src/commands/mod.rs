//! Command implementations for the evf CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod filter;
pub mod search;

use std::path::PathBuf;

use event_filter_rs::directory::ManagerList;
use event_filter_rs::filter::{Tokenizer, UnresolvedTeacher, UserId};

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter compilation error.
    #[error("filter error: {0}")]
    Filter(#[from] event_filter_rs::filter::FilterError),

    /// Event database error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// User filters are evaluated for, from `--user` or the config file.
    pub user_id: Option<UserId>,
    /// Policy for teacher codes missing from the directory.
    pub unresolved_teacher: UnresolvedTeacher,
    /// Teacher directory from the config file.
    pub managers: ManagerList,
    /// Event database from the config file.
    pub database: Option<PathBuf>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the loaded config.
    ///
    /// Flags take priority over config values. Colors are also disabled when
    /// `NO_COLOR` is set.
    pub fn new(cli: &Cli, config: Config) -> Self {
        let unresolved_teacher = if cli.strict {
            UnresolvedTeacher::Error
        } else {
            config.unresolved_teacher.unwrap_or_default()
        };

        Self {
            json_output: cli.json,
            use_colors: !cli.no_color
                && std::env::var_os("NO_COLOR").is_none()
                && config.output.color.unwrap_or(true),
            quiet: cli.quiet,
            verbose: cli.verbose,
            user_id: cli.user.or(config.user_id),
            unresolved_teacher,
            managers: ManagerList::new(config.managers),
            database: config.database,
        }
    }

    /// Builds a tokenizer over the configured teacher directory.
    pub fn tokenizer(&self) -> Tokenizer<'_> {
        Tokenizer::new(&self.managers).unresolved_teacher(self.unresolved_teacher)
    }
}
