//! Compiles a canonical [`Query`] into a parameterized SQLite statement.
//!
//! Structured text predicates become one FTS5 `MATCH` expression against the
//! `EventsIndex` table. Range and subscription predicates are bound as named
//! parameters and never spliced into the statement text.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use super::date::{date_bound_millis, date_end_bound_millis};
use super::query::{OrderBy, Query};

/// Columns selected from the `Events` table, in row order.
pub const EVENT_COLUMNS: &str = "id, title, description, activity_id, location_id, manager_id, \
all_day, cancelled, start_time, end_time, has_changed, hash";

/// Parameter bound to the subscribing user's id.
pub const PARAM_SUBSCRIBED_USER_ID: &str = ":subscribed_user_id";

/// Parameter bound to the lower start-time bound (epoch millis).
pub const PARAM_AFTER: &str = ":after";

/// Parameter bound to the upper end-time bound (epoch millis).
pub const PARAM_BEFORE: &str = ":before";

/// Delimiter of an FTS5 string.
const QUOTE: char = '"';

/// Delimiter of the SQL literal holding the match expression.
const SQL_QUOTE: char = '\'';

/// A statement ready to hand to a [`StatementExecutor`](crate::executor::StatementExecutor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledStatement {
    /// Statement text.
    pub sql: String,
    /// Named parameters, keyed by their placeholder (e.g. `:after`).
    pub params: BTreeMap<String, i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    match_expression: Option<String>,
}

impl CompiledStatement {
    /// Returns the full-text match expression embedded in the statement, if
    /// the query needed one.
    ///
    /// This is the text exactly as it appears between the SQL quotes, so
    /// apostrophes in user input show up doubled.
    pub fn match_expression(&self) -> Option<&str> {
        self.match_expression.as_deref()
    }
}

/// Escapes user text into an FTS5 string that is also safe inside a
/// single-quoted SQL literal.
///
/// The result is wrapped in `"`. Embedded `"` are doubled for FTS5 and
/// embedded `'` are doubled for SQL. Backslashes carry no meaning in either
/// layer and pass through. NUL cannot appear in statement text and becomes a
/// space, which the FTS5 tokenizer treats as a separator anyway.
///
/// This function is total: every input, including the empty string, yields a
/// single well-formed string.
///
/// # Example
///
/// ```
/// use event_filter_rs::filter::escape;
///
/// assert_eq!(escape("exam week"), r#""exam week""#);
/// assert_eq!(escape(r#"say "hi""#), r#""say ""hi""""#);
/// assert_eq!(escape("it's"), r#""it''s""#);
/// ```
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push(QUOTE);
    for c in text.chars() {
        match c {
            QUOTE => escaped.push_str("\"\""),
            SQL_QUOTE => escaped.push_str("''"),
            '\0' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }
    escaped.push(QUOTE);
    escaped
}

/// Reverses [`escape`].
///
/// Returns `None` if `escaped` is not something `escape` could have produced:
/// missing delimiters, or a lone `"` or `'` inside.
pub fn unescape(escaped: &str) -> Option<String> {
    let inner = escaped.strip_prefix(QUOTE)?.strip_suffix(QUOTE)?;

    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == QUOTE || c == SQL_QUOTE {
            if chars.next() != Some(c) {
                return None;
            }
        }
        text.push(c);
    }
    Some(text)
}

/// Builds the FTS5 match expression for a query, or `None` if the query has
/// no text predicates.
fn build_match_expression(query: &Query) -> Option<String> {
    let mut clauses: Vec<String> = Vec::new();

    if !query.keywords.is_empty() {
        clauses.push(escape(&query.keywords.join(" ")));
    }
    if let Some(title) = &query.title {
        clauses.push(format!("(title : {})", escape(title)));
    }
    if let Some(location) = &query.location {
        clauses.push(format!(
            "({{ location_short location_full }} : {})",
            escape(location)
        ));
    }
    if let Some(manager_id) = query.manager_id {
        clauses.push(format!("(manager_id : {})", escape(&manager_id.to_string())));
    }

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(" AND "))
    }
}

/// Compiles a query into a statement over the event store.
///
/// The statement selects [`EVENT_COLUMNS`] from `Events`, restricted by
/// whichever of these predicates the query needs:
///
/// - membership in the `EventsIndex` full-text results
/// - activity followed by the subscribing user (`:subscribed_user_id`)
/// - `start_time >= :after`
/// - `end_time < :before`, bound at the midnight that ends the date
///
/// followed by an `ORDER BY` for [`OrderBy::Newest`] and [`OrderBy::Oldest`].
/// The function is pure: the same query always yields the same statement.
///
/// # Example
///
/// ```
/// use event_filter_rs::filter::{compile, Query};
///
/// let statement = compile(&Query {
///     title: Some("exam".to_string()),
///     subscribed_user_id: Some(42),
///     ..Query::default()
/// });
///
/// assert_eq!(statement.match_expression(), Some(r#"(title : "exam")"#));
/// assert_eq!(statement.params.get(":subscribed_user_id"), Some(&42));
/// ```
pub fn compile(query: &Query) -> CompiledStatement {
    let match_expression = build_match_expression(query);
    let mut predicates: Vec<String> = Vec::new();
    let mut params = BTreeMap::new();

    if let Some(expression) = &match_expression {
        predicates.push(format!(
            "id IN (SELECT id FROM EventsIndex WHERE EventsIndex MATCH '{expression}' ORDER BY rank)"
        ));
    }
    if let Some(user_id) = query.subscribed_user_id {
        predicates.push(format!(
            "activity_id IN (SELECT activity_id FROM Subscriptions WHERE user_id = {PARAM_SUBSCRIBED_USER_ID})"
        ));
        params.insert(PARAM_SUBSCRIBED_USER_ID.to_string(), user_id);
    }
    if let Some(after) = query.after {
        predicates.push(format!("start_time >= {PARAM_AFTER}"));
        params.insert(PARAM_AFTER.to_string(), date_bound_millis(after));
    }
    if let Some(before) = query.before {
        predicates.push(format!("end_time < {PARAM_BEFORE}"));
        params.insert(PARAM_BEFORE.to_string(), date_end_bound_millis(before));
    }

    let mut sql = format!("SELECT {EVENT_COLUMNS} FROM Events");
    if !predicates.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));
    }
    match query.order_by {
        OrderBy::Relevance => {}
        OrderBy::Newest => sql.push_str(" ORDER BY start_time DESC"),
        OrderBy::Oldest => sql.push_str(" ORDER BY start_time ASC"),
    }

    trace!(%sql, ?params, "compiled event query");

    CompiledStatement {
        sql,
        params,
        match_expression,
    }
}
