//! Filter compiler for free-text event filters.
//!
//! A filter is a space-separated list of words typed by a user to narrow a
//! calendar of events. Words are classified into tokens, folded into one
//! canonical [`Query`], and compiled into a parameterized full-text search
//! statement.
//!
//! # Supported Syntax
//!
//! ## Free Text
//! - `maths exam` - Events matching these words
//!
//! ## Fields
//! - `title:VALUE` - Title contains VALUE
//! - `room:VALUE` - Location short or full name contains VALUE
//! - `teacher:CODE` - Managed by the teacher with this display code
//!
//! ## Date Ranges
//! - `after:YYYY-M-D` - Starting on or after the date
//! - `before:YYYY-M-D` - Ending on or before the date
//! - `during:YYYY-M-D` - Both of the above for the same date
//!
//! ## Subscriptions
//! - `subscribed` - Events of activities the current user follows
//!
//! Anything else, including a directive whose argument does not parse, is
//! searched as free text.
//!
//! # Example
//!
//! ```
//! use event_filter_rs::directory::ManagerList;
//! use event_filter_rs::filter::{compile, filter_to_query, Tokenizer};
//!
//! let managers = ManagerList::default();
//! let tokenizer = Tokenizer::new(&managers);
//!
//! let query = filter_to_query("subscribed room:101 after:2020-01-01", &tokenizer, 42).unwrap();
//! assert_eq!(query.location.as_deref(), Some("101"));
//! assert_eq!(query.subscribed_user_id, Some(42));
//!
//! let statement = compile(&query);
//! assert_eq!(statement.params.len(), 2);
//! ```

mod compiler;
mod date;
mod error;
mod lexer;
mod query;
mod reducer;

pub use compiler::{
    compile, escape, unescape, CompiledStatement, EVENT_COLUMNS, PARAM_AFTER, PARAM_BEFORE,
    PARAM_SUBSCRIBED_USER_ID,
};
pub use date::{date_bound_millis, date_end_bound_millis, parse_date};
pub use error::{FilterError, FilterResult};
pub use lexer::{FilterToken, Tokenizer, UnresolvedTeacher, SUBSCRIBED};
pub use query::{OrderBy, Query, UserId};
pub use reducer::reduce;

/// Tokenizes and reduces a filter string in one step.
///
/// # Errors
///
/// Returns an error only if the tokenizer rejects an unresolved `teacher:`
/// code (see [`UnresolvedTeacher::Error`]).
pub fn filter_to_query(
    filter: &str,
    tokenizer: &Tokenizer<'_>,
    current_user: UserId,
) -> FilterResult<Query> {
    let tokens = tokenizer.tokenize(filter)?;
    Ok(reduce(&tokens, current_user))
}
