//! Tokenizer for filter strings.
//!
//! A filter is a space-separated list of words. Each word is classified on its
//! own into a [`FilterToken`]; there are no operators or grouping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::date::parse_date;
use super::error::{FilterError, FilterResult};
use crate::directory::{find_similar_code, Lookup, ManagerDirectory, ManagerId};

/// The bare word that restricts results to the caller's subscriptions.
pub const SUBSCRIBED: &str = "subscribed";

/// A classified word of a filter string.
///
/// Serializes as `{"type": "...", "data": ...}` so that every host of the
/// compiler shares one representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum FilterToken {
    /// Free text, searched across all indexed columns.
    Keyword(String),

    /// `title:VALUE` - restrict to the event title.
    Title(String),

    /// `room:VALUE` - restrict to the location short or full name.
    Location(String),

    /// `teacher:CODE` after the code was resolved.
    ManagerId(ManagerId),

    /// `before:DATE` - events ending by this date.
    Before(NaiveDate),

    /// `after:DATE` - events starting from this date.
    After(NaiveDate),

    /// `during:DATE` - shorthand for `after:DATE before:DATE`.
    During(NaiveDate),

    /// `subscribed` - events of activities the current user follows.
    Subscribed,
}

/// What to do with a `teacher:` code the directory cannot resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedTeacher {
    /// Search for the whole word as free text, like an unparseable date.
    #[default]
    Keyword,
    /// Fail with [`FilterError::UnknownTeacher`].
    Error,
}

/// Splits filter strings into [`FilterToken`]s.
///
/// The tokenizer borrows the manager directory used to resolve `teacher:`
/// codes; it holds no other state and may be reused across filters.
///
/// # Example
///
/// ```
/// use event_filter_rs::directory::{Manager, ManagerList};
/// use event_filter_rs::filter::{FilterToken, Tokenizer};
///
/// let managers = ManagerList::new(vec![Manager {
///     id: 7,
///     display_code: "JS".to_string(),
///     name: None,
/// }]);
/// let tokenizer = Tokenizer::new(&managers);
///
/// let tokens = tokenizer.tokenize("teacher:JS maths").unwrap();
/// assert_eq!(
///     tokens,
///     vec![
///         FilterToken::ManagerId(7),
///         FilterToken::Keyword("maths".to_string()),
///     ]
/// );
/// ```
pub struct Tokenizer<'a> {
    directory: &'a dyn ManagerDirectory,
    unresolved_teacher: UnresolvedTeacher,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer that degrades unknown teacher codes to keywords.
    pub fn new(directory: &'a dyn ManagerDirectory) -> Self {
        Self {
            directory,
            unresolved_teacher: UnresolvedTeacher::default(),
        }
    }

    /// Sets the policy for unresolved `teacher:` codes.
    pub fn unresolved_teacher(mut self, policy: UnresolvedTeacher) -> Self {
        self.unresolved_teacher = policy;
        self
    }

    /// Tokenizes a filter string.
    ///
    /// The input is trimmed and split on single spaces. Consecutive spaces
    /// produce empty keyword tokens, which the reducer ignores. An empty input
    /// produces no tokens.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownTeacher`] only when the policy is
    /// [`UnresolvedTeacher::Error`] and a `teacher:` code cannot be resolved.
    pub fn tokenize(&self, filter: &str) -> FilterResult<Vec<FilterToken>> {
        let trimmed = filter.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        trimmed.split(' ').map(|word| self.classify(word)).collect()
    }

    /// Classifies a single word.
    fn classify(&self, word: &str) -> FilterResult<FilterToken> {
        let (prefix, value) = match word.split_once(':') {
            Some((prefix, value)) if !value.is_empty() => (prefix, value),
            // No argument: either the bare `subscribed` word or free text.
            _ if prefix_or_word(word) == SUBSCRIBED => return Ok(FilterToken::Subscribed),
            _ => return Ok(keyword(word)),
        };

        let token = match prefix {
            "before" => date_or_keyword(word, value, FilterToken::Before),
            "after" => date_or_keyword(word, value, FilterToken::After),
            "during" => date_or_keyword(word, value, FilterToken::During),
            "title" => FilterToken::Title(value.to_string()),
            "room" => FilterToken::Location(value.to_string()),
            "teacher" => self.resolve_teacher(word, value)?,
            _ => keyword(word),
        };
        Ok(token)
    }

    /// Resolves a `teacher:` code against the directory.
    fn resolve_teacher(&self, word: &str, code: &str) -> FilterResult<FilterToken> {
        match self.directory.resolve(code) {
            Lookup::Found(id) => Ok(FilterToken::ManagerId(id)),
            Lookup::NotFound => match self.unresolved_teacher {
                UnresolvedTeacher::Keyword => {
                    debug!(code, "unknown teacher code, searching as keyword");
                    Ok(keyword(word))
                }
                UnresolvedTeacher::Error => {
                    let suggestion = find_similar_code(code, self.directory.codes());
                    Err(FilterError::unknown_teacher(code, suggestion))
                }
            },
        }
    }
}

/// Returns the part before the first `:`, or the whole word.
fn prefix_or_word(word: &str) -> &str {
    word.split_once(':').map_or(word, |(prefix, _)| prefix)
}

fn keyword(word: &str) -> FilterToken {
    FilterToken::Keyword(word.to_string())
}

/// Builds a range token, or keeps the whole word as a keyword when the date
/// does not parse.
fn date_or_keyword(word: &str, value: &str, make: fn(NaiveDate) -> FilterToken) -> FilterToken {
    match parse_date(value) {
        Some(date) => make(date),
        None => {
            debug!(word, "unparseable date, searching as keyword");
            keyword(word)
        }
    }
}
