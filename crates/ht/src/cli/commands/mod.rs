//! Command implementations and dispatch.

pub mod apply;
pub mod check;
pub mod config;
pub mod filter;
pub mod init;
pub mod parse;
mod shared;
pub mod tokens;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Parse(cmd) => parse::run(ctx, &cmd),
        Commands::Tokens(cmd) => tokens::run(&cmd),
        Commands::Filter(cmd) => filter::run(ctx, &cmd),
        Commands::Apply(cmd) => apply::run(ctx, &cmd),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Check => check::run(ctx),
        Commands::Config => config::run(ctx),
    }
}
