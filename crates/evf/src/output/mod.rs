//! Output formatting utilities for the evf CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by what is being shown:
//!
//! - [`filter`] - Tokens, canonical queries and compiled statements
//! - [`events`] - Search results
//! - [`helpers`] - Common formatting utilities (truncation, times, headers)

mod events;
mod filter;
pub mod helpers;

// Filter pipeline
pub use filter::{
    format_query_json, format_query_table, format_statement_json, format_statement_table,
    format_tokens_json, format_tokens_table,
};

// Events
pub use events::{format_events_json, format_events_table};
