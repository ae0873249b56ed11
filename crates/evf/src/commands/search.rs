//! Search command implementation.
//!
//! Compiles a filter and runs it against a SQLite event database.

use std::io;
use std::path::PathBuf;

use event_filter_rs::executor::{SqliteExecutor, StatementExecutor};
use event_filter_rs::filter::{compile, OrderBy};
use event_filter_rs::EventRow;
use tracing::{debug, info};

use super::filter::{build_query, join_filter};
use super::{CommandContext, CommandError, Result};
use crate::output::{format_events_json, format_events_table};

/// Options for the search command.
#[derive(Debug)]
pub struct SearchOptions {
    /// Filter words.
    pub filter: Vec<String>,
    /// Result ordering.
    pub order: OrderBy,
    /// Database path override.
    pub db: Option<PathBuf>,
    /// Maximum number of events to display.
    pub limit: u32,
    /// Show every event regardless of limit.
    pub all: bool,
}

/// Resolves the database path from the flag, then the config file.
fn database_path(ctx: &CommandContext, opts: &SearchOptions) -> Result<PathBuf> {
    let path = opts
        .db
        .clone()
        .or_else(|| ctx.database.clone())
        .ok_or_else(|| {
            CommandError::Config(
                "No event database. Pass --db or set database in the config file".to_string(),
            )
        })?;

    if !path.exists() {
        return Err(CommandError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("event database not found: {}", path.display()),
        )));
    }

    Ok(path)
}

/// Runs the filter and returns every matching event.
pub fn search(ctx: &CommandContext, opts: &SearchOptions) -> Result<Vec<EventRow>> {
    let path = database_path(ctx, opts)?;
    let query = build_query(ctx, &join_filter(&opts.filter), opts.order)?;
    let statement = compile(&query);

    let executor = SqliteExecutor::open(&path)?;
    let events = executor.execute(&statement)?;
    info!(
        database = %path.display(),
        matches = events.len(),
        "search finished"
    );

    Ok(events)
}

/// Executes the search command.
pub fn execute(ctx: &CommandContext, opts: &SearchOptions) -> Result<()> {
    let events = search(ctx, opts)?;
    let total = events.len();

    let shown = if opts.all {
        &events[..]
    } else {
        &events[..total.min(opts.limit as usize)]
    };
    debug!(total, shown = shown.len(), "applying display limit");

    if ctx.json_output {
        println!("{}", format_events_json(shown, total)?);
    } else if !ctx.quiet {
        print!("{}", format_events_table(shown, total, ctx.use_colors));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_filter_rs::directory::ManagerList;
    use event_filter_rs::executor::IndexFields;
    use event_filter_rs::filter::UnresolvedTeacher;

    fn ctx(database: Option<PathBuf>) -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            verbose: false,
            user_id: Some(42),
            unresolved_teacher: UnresolvedTeacher::Keyword,
            managers: ManagerList::default(),
            database,
        }
    }

    fn opts(filter: &[&str], db: Option<PathBuf>) -> SearchOptions {
        SearchOptions {
            filter: filter.iter().map(|w| w.to_string()).collect(),
            order: OrderBy::Oldest,
            db,
            limit: 50,
            all: false,
        }
    }

    fn seed(path: &std::path::Path) {
        let executor = SqliteExecutor::open(path).unwrap();
        executor.create_schema().unwrap();
        for (id, title, activity, start) in [
            ("e1", "Algebra revision", 1, 1_000),
            ("e2", "Chemistry practical", 2, 2_000),
        ] {
            let event = EventRow {
                id: id.to_string(),
                title: title.to_string(),
                description: String::new(),
                activity_id: activity,
                location_id: None,
                manager_id: 7,
                all_day: false,
                cancelled: false,
                start_time: start,
                end_time: start + 500,
                has_changed: false,
                hash: String::new(),
            };
            executor.insert_event(&event, &IndexFields::default()).unwrap();
        }
        executor.subscribe(42, 2).unwrap();
    }

    #[test]
    fn test_database_path_requires_setting() {
        let result = database_path(&ctx(None), &opts(&[], None));
        assert!(matches!(result, Err(CommandError::Config(_))));
    }

    #[test]
    fn test_database_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.db");
        let result = database_path(&ctx(None), &opts(&[], Some(missing.clone())));

        assert!(matches!(result, Err(CommandError::Io(_))));
        assert!(!missing.exists());
    }

    #[test]
    fn test_flag_overrides_config_database() {
        let dir = tempfile::tempdir().unwrap();
        let flag = dir.path().join("flag.db");
        std::fs::write(&flag, b"").unwrap();

        let path = database_path(
            &ctx(Some(dir.path().join("config.db"))),
            &opts(&[], Some(flag.clone())),
        )
        .unwrap();
        assert_eq!(path, flag);
    }

    #[test]
    fn test_search_runs_filter() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("events.db");
        seed(&db);

        let all = search(&ctx(Some(db.clone())), &opts(&[], None)).unwrap();
        let ids: Vec<&str> = all.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2"]);

        let subscribed = search(&ctx(Some(db.clone())), &opts(&["subscribed"], None)).unwrap();
        assert_eq!(subscribed.len(), 1);
        assert_eq!(subscribed[0].id, "e2");

        let keyword = search(&ctx(Some(db)), &opts(&["algebra"], None)).unwrap();
        assert_eq!(keyword.len(), 1);
        assert_eq!(keyword[0].id, "e1");
    }

    #[test]
    fn test_search_without_schema_is_database_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("empty.db");
        std::fs::write(&db, b"").unwrap();

        let result = search(&ctx(Some(db)), &opts(&[], None));
        assert!(matches!(result, Err(CommandError::Database(_))));
    }
}
