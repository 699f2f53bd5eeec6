//! Implementation of `ht tokens`.

use std::process::ExitCode;

use ht_filter::tokenize;

use crate::cli::{args::TokensCommand, output::token_table};

/// Prints the token stream of a query.
pub fn run(cmd: &TokensCommand) -> ExitCode {
    let tokens = tokenize(&cmd.query);
    println!("{}", token_table(&tokens));
    ExitCode::SUCCESS
}
