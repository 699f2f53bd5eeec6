//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL_CONDENSED};
use ht_filter::{IssueAccessor, Token, TokenKind};
pub use ht_highlight::{dim, header, paint_query, success, warning};
use serde::Serialize;

use crate::issues::Issue;

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Builds the table printed by `ht filter`.
pub fn issue_table(issues: &[&Issue]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        "#", "Title", "State", "Labels", "Milestone", "Assignee", "Updated",
    ]);

    for issue in issues {
        table.add_row(vec![
            Cell::new(issue.id).set_alignment(CellAlignment::Right),
            Cell::new(&issue.title),
            Cell::new(state_label(issue)),
            Cell::new(issue.labels.join(", ")),
            Cell::new(issue.milestone.as_deref().unwrap_or("")),
            Cell::new(issue.assignee.as_deref().unwrap_or("")),
            Cell::new(issue.updated_at.format("%Y-%m-%d")),
        ]);
    }

    table
}

/// Short state text, marking pull requests.
fn state_label(issue: &Issue) -> &'static str {
    match (issue.is_open(), issue.is_pull_request()) {
        (true, false) => "open",
        (false, false) => "closed",
        (true, true) => "open (pr)",
        (false, true) => "closed (pr)",
    }
}

/// Builds the table printed by `ht tokens`, leaving out the end-of-input marker.
pub fn token_table(tokens: &[Token]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Pos", "Kind", "Text"]);

    for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
        table.add_row(vec![
            Cell::new(token.position).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:?}", token.kind)),
            Cell::new(&token.text),
        ]);
    }

    table
}
