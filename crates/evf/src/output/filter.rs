//! Filter output formatting (tokens, query, compiled statement).

use std::collections::BTreeMap;

use event_filter_rs::filter::{CompiledStatement, FilterToken, OrderBy, Query};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{format_date, format_header};

/// JSON output structure for the tokens command.
#[derive(Serialize)]
pub struct TokensOutput<'a> {
    pub filter: &'a str,
    pub tokens: &'a [FilterToken],
}

/// JSON output structure for the compile command.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementOutput<'a> {
    pub sql: &'a str,
    pub params: &'a BTreeMap<String, i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_expression: Option<&'a str>,
}

/// Returns the type tag and display value of a token.
fn token_parts(token: &FilterToken) -> (&'static str, String) {
    match token {
        FilterToken::Keyword(text) => ("keyword", text.clone()),
        FilterToken::Title(text) => ("title", text.clone()),
        FilterToken::Location(text) => ("location", text.clone()),
        FilterToken::ManagerId(id) => ("managerid", id.to_string()),
        FilterToken::Before(date) => ("before", format_date(Some(*date))),
        FilterToken::After(date) => ("after", format_date(Some(*date))),
        FilterToken::During(date) => ("during", format_date(Some(*date))),
        FilterToken::Subscribed => ("subscribed", String::new()),
    }
}

/// Formats tokens as JSON.
pub fn format_tokens_json(filter: &str, tokens: &[FilterToken]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&TokensOutput { filter, tokens })
}

/// Formats tokens as a table.
pub fn format_tokens_table(tokens: &[FilterToken], use_colors: bool) -> String {
    if tokens.is_empty() {
        return "No tokens (empty filter).\n".to_string();
    }

    let mut output = format_header(&format!("{:<4} {:<11} {}", "#", "Type", "Value"), use_colors);

    for (index, token) in tokens.iter().enumerate() {
        let (kind, value) = token_parts(token);
        let kind = format!("{kind:<11}");
        let kind = if use_colors && !matches!(token, FilterToken::Keyword(_)) {
            kind.cyan().to_string()
        } else {
            kind
        };
        output.push_str(&format!("{:<4} {} {}\n", index + 1, kind, value));
    }

    output
}

/// Formats a query as JSON.
pub fn format_query_json(query: &Query) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(query)
}

/// Formats a query as a key/value listing.
pub fn format_query_table(query: &Query, use_colors: bool) -> String {
    let mut rows: Vec<(&str, String)> = Vec::new();

    if !query.keywords.is_empty() {
        rows.push(("Keywords", query.keywords.join(" ")));
    }
    if let Some(ref title) = query.title {
        rows.push(("Title", title.clone()));
    }
    if let Some(ref location) = query.location {
        rows.push(("Location", location.clone()));
    }
    if let Some(id) = query.manager_id {
        rows.push(("Teacher", id.to_string()));
    }
    if query.after.is_some() {
        rows.push(("After", format_date(query.after)));
    }
    if query.before.is_some() {
        rows.push(("Before", format_date(query.before)));
    }
    if let Some(user) = query.subscribed_user_id {
        rows.push(("Subscribed", format!("user {user}")));
    }

    let order = match query.order_by {
        OrderBy::Relevance => "relevance",
        OrderBy::Newest => "newest",
        OrderBy::Oldest => "oldest",
    };
    rows.push(("Order", order.to_string()));

    let mut output = String::new();
    if query.is_unfiltered() {
        output.push_str("(no filters, matches every event)\n");
    }
    for (label, value) in rows {
        let label = format!("{:<12}", format!("{label}:"));
        if use_colors {
            output.push_str(&format!("{} {}\n", label.bold(), value));
        } else {
            output.push_str(&format!("{label} {value}\n"));
        }
    }

    output
}

/// Formats a compiled statement as JSON.
pub fn format_statement_json(statement: &CompiledStatement) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&StatementOutput {
        sql: &statement.sql,
        params: &statement.params,
        match_expression: statement.match_expression(),
    })
}

/// Formats a compiled statement with its parameters.
pub fn format_statement_table(statement: &CompiledStatement, use_colors: bool) -> String {
    let mut output = format!("{}\n", statement.sql);

    if !statement.params.is_empty() {
        output.push('\n');
        output.push_str(&format_header(&format!("{:<22} {}", "Parameter", "Value"), use_colors));
        for (name, value) in &statement.params {
            output.push_str(&format!("{:<22} {}\n", name, value));
        }
    }

    output
}
