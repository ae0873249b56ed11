//! Compiler for free-text calendar event filters.
//!
//! Users narrow a calendar by typing filters such as
//! `subscribed teacher:JS room:101 before:2020-01-01`. This crate turns that
//! text into a parameterized full-text search statement:
//!
//! 1. [`filter::Tokenizer`] classifies each word, resolving teacher codes
//!    through a caller-supplied [`directory::ManagerDirectory`]
//! 2. [`filter::reduce`] folds the tokens into a canonical [`filter::Query`]
//! 3. [`filter::compile`] turns the query into a [`filter::CompiledStatement`]
//!
//! Executing the statement is left to a [`executor::StatementExecutor`]. With
//! the `sqlite` feature, [`executor::SqliteExecutor`] runs it against a
//! SQLite event store.

pub mod directory;
pub mod event;
pub mod executor;
pub mod filter;

pub use event::EventRow;
