//! Execution of compiled statements.
//!
//! The compiler never runs statements itself. Hosts implement
//! [`StatementExecutor`] over their storage; the `sqlite` feature provides
//! [`SqliteExecutor`] for a SQLite event store with an FTS5 index.

use crate::event::EventRow;
use crate::filter::CompiledStatement;

/// Runs a [`CompiledStatement`] and returns the matching events.
pub trait StatementExecutor {
    /// Error raised by the underlying store.
    type Error: std::error::Error;

    /// Executes the statement with its bound parameters.
    fn execute(&self, statement: &CompiledStatement) -> Result<Vec<EventRow>, Self::Error>;
}

#[cfg(feature = "sqlite")]
pub use self::sqlite::{IndexFields, SqliteExecutor};

#[cfg(feature = "sqlite")]
mod sqlite {
    use std::path::Path;

    use rusqlite::types::ToSql;
    use rusqlite::{params, Connection, Row};
    use tracing::debug;

    use super::StatementExecutor;
    use crate::event::EventRow;
    use crate::filter::CompiledStatement;

    /// Tables the compiled statements expect.
    const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS Events (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    activity_id INTEGER NOT NULL,
    location_id INTEGER,
    manager_id INTEGER NOT NULL,
    all_day INTEGER NOT NULL DEFAULT 0,
    cancelled INTEGER NOT NULL DEFAULT 0,
    start_time INTEGER NOT NULL,
    end_time INTEGER NOT NULL,
    has_changed INTEGER NOT NULL DEFAULT 0,
    hash TEXT NOT NULL DEFAULT ''
);
CREATE VIRTUAL TABLE IF NOT EXISTS EventsIndex USING fts5(
    id UNINDEXED,
    title,
    description,
    location_short,
    location_full,
    manager_id,
    manager_full
);
CREATE TABLE IF NOT EXISTS Subscriptions (
    user_id INTEGER NOT NULL,
    activity_id INTEGER NOT NULL,
    PRIMARY KEY (user_id, activity_id)
);
"#;

    /// Denormalized text indexed next to an event for full-text search.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct IndexFields {
        /// Room code, e.g. `101`.
        pub location_short: String,
        /// Room name, e.g. `Science Lab 1`.
        pub location_full: String,
        /// Teacher's full name.
        pub manager_full: String,
    }

    /// [`StatementExecutor`] over a SQLite connection.
    #[derive(Debug)]
    pub struct SqliteExecutor {
        conn: Connection,
    }

    impl SqliteExecutor {
        /// Opens (or creates) a database file.
        pub fn open(path: impl AsRef<Path>) -> rusqlite::Result<Self> {
            Ok(Self::new(Connection::open(path)?))
        }

        /// Opens a private in-memory database.
        pub fn open_in_memory() -> rusqlite::Result<Self> {
            Ok(Self::new(Connection::open_in_memory()?))
        }

        /// Wraps an existing connection.
        pub fn new(conn: Connection) -> Self {
            Self { conn }
        }

        /// Returns the underlying connection.
        pub fn connection(&self) -> &Connection {
            &self.conn
        }

        /// Creates the `Events`, `EventsIndex` and `Subscriptions` tables if
        /// they do not exist.
        pub fn create_schema(&self) -> rusqlite::Result<()> {
            self.conn.execute_batch(SCHEMA)
        }

        /// Stores an event and its full-text index entry, replacing any
        /// previous version with the same id.
        ///
        /// Both rows are written in one transaction, so a failure leaves
        /// neither behind.
        pub fn insert_event(&self, event: &EventRow, index: &IndexFields) -> rusqlite::Result<()> {
            let tx = self.conn.unchecked_transaction()?;
            tx.execute(
                "REPLACE INTO Events (id, title, description, activity_id, location_id, \
                 manager_id, all_day, cancelled, start_time, end_time, has_changed, hash) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    event.id,
                    event.title,
                    event.description,
                    event.activity_id,
                    event.location_id,
                    event.manager_id,
                    event.all_day,
                    event.cancelled,
                    event.start_time,
                    event.end_time,
                    event.has_changed,
                    event.hash,
                ],
            )?;
            tx.execute("DELETE FROM EventsIndex WHERE id = ?1", params![event.id])?;
            tx.execute(
                "INSERT INTO EventsIndex (id, title, description, location_short, \
                 location_full, manager_id, manager_full) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    event.id,
                    event.title,
                    event.description,
                    index.location_short,
                    index.location_full,
                    event.manager_id.to_string(),
                    index.manager_full,
                ],
            )?;
            tx.commit()
        }

        /// Records that `user_id` follows `activity_id`.
        pub fn subscribe(&self, user_id: i64, activity_id: i64) -> rusqlite::Result<()> {
            self.conn.execute(
                "INSERT OR IGNORE INTO Subscriptions (user_id, activity_id) VALUES (?1, ?2)",
                params![user_id, activity_id],
            )?;
            Ok(())
        }
    }

    impl StatementExecutor for SqliteExecutor {
        type Error = rusqlite::Error;

        fn execute(&self, statement: &CompiledStatement) -> Result<Vec<EventRow>, Self::Error> {
            debug!(sql = %statement.sql, "executing event query");

            let mut stmt = self.conn.prepare(&statement.sql)?;
            let named: Vec<(&str, &dyn ToSql)> = statement
                .params
                .iter()
                .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
                .collect();

            let events = stmt
                .query_map(named.as_slice(), event_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(events)
        }
    }

    fn event_from_row(row: &Row<'_>) -> rusqlite::Result<EventRow> {
        Ok(EventRow {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            activity_id: row.get(3)?,
            location_id: row.get(4)?,
            manager_id: row.get(5)?,
            all_day: row.get(6)?,
            cancelled: row.get(7)?,
            start_time: row.get(8)?,
            end_time: row.get(9)?,
            has_changed: row.get(10)?,
            hash: row.get(11)?,
        })
    }
}
