//! Shared helpers for command implementations.

use std::process::ExitCode;

use ht_filter::{FilterExpr, parse};

use crate::cli::context::CommandContext;

/// Resolves `@name` and parses the query, printing syntax errors.
pub fn parse_query(ctx: &CommandContext, query: &str) -> Result<FilterExpr, ExitCode> {
    let text = ctx.resolve_query(query)?;
    parse(text).map_err(|e| {
        eprintln!("{e}");
        ExitCode::FAILURE
    })
}
