//! Implementation of `ht check`.

use std::process::ExitCode;

use ht_config::{ConfigWarning, is_global_config};
use ht_filter::parse;

use crate::{
    cli::{
        context::CommandContext,
        output::{dim, header, paint_query, warning},
    },
    issues::IssueStore,
};

/// Shows configuration files, issue files and saved filters, and reports problems.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = &ctx.config.files;
    if config_files.is_empty() {
        println!("{}", dim("No configuration files found."));
        println!();
        println!("Run {} to create a configuration file.", header("ht init"));
        return ExitCode::SUCCESS;
    }

    println!("{}", header("Config files:"));
    for path in config_files {
        if is_global_config(path) {
            println!("   {} {}", path.display(), dim("(global)"));
        } else {
            println!("   {}", path.display());
        }
    }
    println!();

    let config = &ctx.config;
    let mut problems = 0;

    println!("{}", header("Issues:"));
    if config.settings.issues.is_empty() {
        println!("   {}", dim("(none configured)"));
    }
    for path in &config.settings.issues {
        if !path.is_file() {
            println!("   {} {}", path.display(), warning("[missing]"));
            continue;
        }
        match IssueStore::load(path) {
            Ok(store) => println!(
                "   {} {}",
                path.display(),
                dim(&format!("({} issues)", store.issues().len()))
            ),
            Err(e) => {
                problems += 1;
                println!("   {} {}", path.display(), warning("[unreadable]"));
                println!("      {}", warning(&e.to_string()));
            }
        }
    }
    println!();

    println!("{}", header("Saved filters:"));
    if config.filters.is_empty() {
        println!("   {}", dim("(none defined)"));
    }
    for (name, query) in &config.filters {
        match parse(query) {
            Ok(expr) => println!("   @{name} {}", paint_query(&expr.to_string())),
            Err(_) => println!("   @{name} {} {}", query, warning("[invalid]")),
        }
    }
    println!();

    let warnings = config.validate();
    if warnings.is_empty() && problems == 0 {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    if !warnings.is_empty() {
        println!("{}", header(&format!("Warnings ({}):", warnings.len())));
        for w in &warnings {
            println!("   {}", warning(&w.to_string()));
        }
        println!();
        print_hints(&warnings);
    }

    ExitCode::FAILURE
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .map(|w| match w {
            ConfigWarning::NoIssuesConfigured => "Hint: set settings.issues in .ht.toml",
            ConfigWarning::IssuesFileMissing { .. } => {
                "Hint: create the issues file or fix the path in settings.issues"
            }
            ConfigWarning::SavedFilterName { .. } => {
                "Hint: rename the filter so it can be used as @name"
            }
            ConfigWarning::SavedFilterInvalid { .. } => {
                "Hint: try the query with 'ht parse' to see where it fails"
            }
            ConfigWarning::SavedFilterUnknownQualifier { .. } => {
                "Hint: unknown qualifiers never match; check the spelling"
            }
        })
        .collect();

    hints.sort_unstable();
    hints.dedup();
    for hint in hints {
        println!("{}", dim(hint));
    }
}
