//! Implementation of `ht parse`.

use std::process::ExitCode;

use ht_filter::FilterExpr;
use serde::Serialize;

use super::shared::parse_query;
use crate::cli::{
    args::ParseCommand,
    context::CommandContext,
    output::{dim, paint_query, print_json},
};

/// JSON output for `ht parse --json`.
#[derive(Serialize)]
struct JsonParseOutput<'a> {
    /// Canonical query text.
    canonical: String,
    /// Qualifier names, left to right.
    qualifiers: Vec<&'a str>,
    /// The change `ht apply` would make, if any.
    change: Option<String>,
    /// The expression tree.
    tree: &'a FilterExpr,
}

/// Parses a filter and prints its canonical form, tree or JSON description.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let expr = match parse_query(ctx, &cmd.query) {
        Ok(expr) => expr,
        Err(code) => return code,
    };

    if cmd.json {
        return print_json(&JsonParseOutput {
            canonical: expr.to_string(),
            qualifiers: expr.qualifier_names(),
            change: expr.field_change().ok().map(|c| c.to_string()),
            tree: &expr,
        });
    }

    if cmd.tree {
        print!("{}", expr.to_tree_string());
        return ExitCode::SUCCESS;
    }

    if expr.is_empty() {
        println!("{}", dim("(empty filter: matches every issue)"));
        return ExitCode::SUCCESS;
    }

    println!("{}", paint_query(&expr.to_string()));
    if let Ok(change) = expr.field_change() {
        println!("{}", dim(&format!("applicable: sets {change}")));
    }

    ExitCode::SUCCESS
}
