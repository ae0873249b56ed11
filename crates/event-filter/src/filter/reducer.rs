//! Folds tokens into a canonical [`Query`].

use super::lexer::FilterToken;
use super::query::{Query, UserId};

/// Folds a token sequence into a canonical query.
///
/// Tokens are applied left to right:
///
/// - keywords are appended in order; empty keywords are skipped
/// - `title`, `location` and `managerid` overwrite, so the last one wins
/// - `before` keeps the earliest date seen, `after` keeps the latest
/// - `during` tightens both bounds at once
/// - `subscribed` scopes the query to `current_user`
///
/// The fold never fails. The resulting [`Query`] uses the default ordering.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use event_filter_rs::filter::{reduce, FilterToken};
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2020, m, day).unwrap();
/// let query = reduce(
///     &[FilterToken::Before(d(5, 1)), FilterToken::Before(d(1, 1))],
///     42,
/// );
/// assert_eq!(query.before, Some(d(1, 1)));
/// ```
pub fn reduce(tokens: &[FilterToken], current_user: UserId) -> Query {
    tokens.iter().fold(Query::default(), |mut query, token| {
        match token {
            FilterToken::Keyword(word) => {
                if !word.is_empty() {
                    query.keywords.push(word.clone());
                }
            }
            FilterToken::Title(title) => query.title = Some(title.clone()),
            FilterToken::Location(location) => query.location = Some(location.clone()),
            FilterToken::ManagerId(id) => query.manager_id = Some(*id),
            FilterToken::Before(date) => {
                query.before = Some(query.before.map_or(*date, |b| b.min(*date)));
            }
            FilterToken::After(date) => {
                query.after = Some(query.after.map_or(*date, |a| a.max(*date)));
            }
            FilterToken::During(date) => {
                query.before = Some(query.before.map_or(*date, |b| b.min(*date)));
                query.after = Some(query.after.map_or(*date, |a| a.max(*date)));
            }
            FilterToken::Subscribed => query.subscribed_user_id = Some(current_user),
        }
        query
    })
}
