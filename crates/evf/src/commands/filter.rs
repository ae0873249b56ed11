//! Filter inspection commands: tokens, query and compile.
//!
//! These run the compiler pipeline without touching an event database.

use event_filter_rs::filter::{compile, reduce, FilterToken, OrderBy, Query};
use tracing::debug;

use super::{CommandContext, CommandError, Result};
use crate::output::{
    format_query_json, format_query_table, format_statement_json, format_statement_table,
    format_tokens_json, format_tokens_table,
};

/// Joins positional filter words back into one filter string.
pub fn join_filter(words: &[String]) -> String {
    words.join(" ")
}

/// Tokenizes and reduces a filter for the current context.
///
/// # Errors
///
/// Returns a filter error if the tokenizer rejects a teacher code, or a
/// config error if the filter uses `subscribed` and no user id is known.
pub fn build_query(ctx: &CommandContext, filter: &str, order: OrderBy) -> Result<Query> {
    let tokens = ctx.tokenizer().tokenize(filter)?;
    debug!(filter, tokens = tokens.len(), "tokenized filter");

    let current_user = match ctx.user_id {
        Some(user_id) => user_id,
        None if tokens.contains(&FilterToken::Subscribed) => {
            return Err(CommandError::Config(
                "'subscribed' needs a user id. Pass --user, set EVF_USER_ID, or set user_id in the config file".to_string(),
            ));
        }
        // Only read by `subscribed`, which is absent.
        None => 0,
    };

    Ok(reduce(&tokens, current_user).with_order(order))
}

/// Executes the tokens command.
pub fn execute_tokens(ctx: &CommandContext, words: &[String]) -> Result<()> {
    let filter = join_filter(words);
    let tokens = ctx.tokenizer().tokenize(&filter)?;

    if ctx.json_output {
        println!("{}", format_tokens_json(&filter, &tokens)?);
    } else if !ctx.quiet {
        print!("{}", format_tokens_table(&tokens, ctx.use_colors));
    }

    Ok(())
}

/// Executes the query command.
pub fn execute_query(ctx: &CommandContext, words: &[String], order: OrderBy) -> Result<()> {
    let query = build_query(ctx, &join_filter(words), order)?;

    if ctx.json_output {
        println!("{}", format_query_json(&query)?);
    } else if !ctx.quiet {
        print!("{}", format_query_table(&query, ctx.use_colors));
    }

    Ok(())
}

/// Executes the compile command.
pub fn execute_compile(ctx: &CommandContext, words: &[String], order: OrderBy) -> Result<()> {
    let query = build_query(ctx, &join_filter(words), order)?;
    let statement = compile(&query);

    if ctx.json_output {
        println!("{}", format_statement_json(&statement)?);
    } else if !ctx.quiet {
        print!("{}", format_statement_table(&statement, ctx.use_colors));
    }

    Ok(())
}
