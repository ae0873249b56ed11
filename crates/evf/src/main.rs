use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::config::{load_config, Config};
use commands::search::SearchOptions;
use commands::{CommandContext, CommandError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level follows `--verbose` and
/// `--quiet`.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // These must work even when the config file is broken.
    match command {
        Commands::Completions { shell } => return Ok(commands::completions::execute(shell)?),
        Commands::Config {
            command: Some(ConfigCommands::Path),
        } => return commands::config::execute_path(&CommandContext::new(cli, Config::default())),
        Commands::Config {
            command: Some(ConfigCommands::Init),
        } => return commands::config::execute_init(&CommandContext::new(cli, Config::default())),
        _ => {}
    }

    let ctx = CommandContext::new(cli, load_config()?);

    match command {
        Commands::Tokens { filter } => commands::filter::execute_tokens(&ctx, filter),
        Commands::Query { filter, order } => {
            commands::filter::execute_query(&ctx, filter, (*order).into())
        }
        Commands::Compile { filter, order } => {
            commands::filter::execute_compile(&ctx, filter, (*order).into())
        }
        Commands::Search {
            filter,
            order,
            db,
            limit,
            all,
        } => {
            let opts = SearchOptions {
                filter: filter.clone(),
                order: (*order).into(),
                db: db.clone(),
                limit: *limit,
                all: *all,
            };
            commands::search::execute(&ctx, &opts)
        }
        Commands::Config { command: None }
        | Commands::Config {
            command: Some(ConfigCommands::Show),
        } => commands::config::execute_show(&ctx),
        Commands::Config { command: Some(_) } | Commands::Completions { .. } => Ok(()),
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Database(_) => "DATABASE_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(exit_status(e))
}

/// Exit status per error kind: 1 filter, 3 I/O, 4 database, 5 config.
fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Filter(_) | CommandError::Json(_) => 1,
        CommandError::Io(_) => 3,
        CommandError::Database(_) => 4,
        CommandError::Config(_) => 5,
    }
}
