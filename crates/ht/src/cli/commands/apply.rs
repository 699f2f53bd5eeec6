//! Implementation of `ht apply`.

use std::process::ExitCode;

use chrono::Utc;
use tracing::info;

use super::shared::parse_query;
use crate::{
    cli::{args::ApplyCommand, context::CommandContext, output::success},
    issues::IssueEditor,
};

/// Applies a single-field filter to one issue and saves its file.
pub fn run(ctx: &CommandContext, cmd: &ApplyCommand) -> ExitCode {
    let expr = match parse_query(ctx, &cmd.query) {
        Ok(expr) => expr,
        Err(code) => return code,
    };
    let change = match expr.field_change() {
        Ok(change) => change,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("Only a lone milestone:, label:, state:open|closed or assignee: filter can be applied.");
            return ExitCode::FAILURE;
        }
    };

    let mut stores = match ctx.load_issues(&cmd.issues) {
        Ok(stores) => stores,
        Err(code) => return code,
    };

    let mut editor = IssueEditor::new(Utc::now());
    for store in &mut stores {
        let Some(issue) = store.issue_mut(cmd.issue) else {
            continue;
        };
        if let Err(e) = expr.apply_to(issue, &mut editor) {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
        if let Err(e) = store.save() {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
        info!(issue = cmd.issue, %change, file = %store.path().display(), "applied filter");
        println!("{} #{}: {change}", success("Updated"), cmd.issue);
        return ExitCode::SUCCESS;
    }

    eprintln!("error: issue #{} not found", cmd.issue);
    ExitCode::FAILURE
}
