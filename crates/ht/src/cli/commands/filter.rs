//! Implementation of `ht filter`.

use std::process::ExitCode;

use chrono::NaiveDate;
use ht_filter::{FilterExpr, MetaQualifierInfo, QualifierKind};
use serde::Serialize;
use tracing::info;

use super::shared::parse_query;
use crate::{
    cli::{
        args::FilterCommand,
        context::CommandContext,
        output::{dim, issue_table, print_json},
    },
    issues::{Issue, IssueStore},
};

/// JSON output for `ht filter --json`.
#[derive(Serialize)]
struct JsonFilterOutput<'a> {
    /// Canonical query text.
    query: String,
    /// Reference date used for `updated:` ages.
    today: NaiveDate,
    /// Matches before the limit was applied.
    total_matches: usize,
    /// Matching issues, up to the limit.
    issues: &'a [&'a Issue],
}

/// Lists the issues that match a filter.
pub fn run(ctx: &CommandContext, cmd: &FilterCommand) -> ExitCode {
    let expr = match parse_query(ctx, &cmd.query) {
        Ok(expr) => expr,
        Err(code) => return code,
    };
    let stores = match ctx.load_issues(&cmd.issues) {
        Ok(stores) => stores,
        Err(code) => return code,
    };
    let issues: Vec<Issue> = stores.into_iter().flat_map(IssueStore::into_issues).collect();

    let today = ctx.today(cmd.today);
    let info = MetaQualifierInfo::from_issues(&issues, today);
    let matches = matching_issues(&expr, &issues, &info);
    info!(
        query = %expr,
        matches = matches.len(),
        issues = issues.len(),
        "filtered issues"
    );

    let limit = cmd.limit.unwrap_or(ctx.config.settings.limit);
    let shown = if limit == 0 {
        &matches[..]
    } else {
        &matches[..matches.len().min(limit)]
    };

    if cmd.json {
        return print_json(&JsonFilterOutput {
            query: expr.to_string(),
            today,
            total_matches: matches.len(),
            issues: shown,
        });
    }

    if matches.is_empty() {
        println!("{}", dim("No matching issues."));
        return ExitCode::SUCCESS;
    }

    println!("{}", issue_table(shown));
    if shown.len() < matches.len() {
        println!(
            "{}",
            dim(&format!(
                "{} of {} matches shown (use -n 0 for all)",
                shown.len(),
                matches.len()
            ))
        );
    }

    ExitCode::SUCCESS
}

/// Returns the issues matching `expr`, in file order.
///
/// A filter that is a lone `parent` qualifier lists shallower issues first.
fn matching_issues<'a>(
    expr: &FilterExpr,
    issues: &'a [Issue],
    info: &MetaQualifierInfo,
) -> Vec<&'a Issue> {
    let mut matches: Vec<&Issue> = issues
        .iter()
        .filter(|issue| expr.is_satisfied_by(*issue, info))
        .collect();

    if is_parent_filter(expr) {
        matches.sort_by_key(|issue| info.depth(issue.id));
    }

    matches
}

/// Whether the expression is a single `parent` qualifier.
fn is_parent_filter(expr: &FilterExpr) -> bool {
    matches!(
        expr,
        FilterExpr::Qualifier(q) if QualifierKind::from_name(&q.name) == Some(QualifierKind::Parent)
    )
}
