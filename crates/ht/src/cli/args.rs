//! Clap argument definitions for the `ht` CLI.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use ht_filter::{parse_date, parse_issue_ref};

/// Parses a `--today` date.
fn parse_today(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("'{s}' is not a date (expected YYYY-M-D)"))
}

/// Parses an `--issue` reference, `12` or `#12`.
fn parse_issue_id(s: &str) -> Result<u64, String> {
    parse_issue_ref(s).ok_or_else(|| format!("'{s}' is not an issue number"))
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "ht")]
#[command(about = "Filter and update issue lists with a small query language")]
pub struct Cli {
    /// Log more detail to stderr (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Selects the issue files to read.
#[derive(Args, Debug, Clone, Default)]
pub struct IssuesArgs {
    /// Issues file to use instead of the configured ones
    #[arg(long)]
    pub issues: Option<PathBuf>,
}

/// Arguments for `ht parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Filter query, or @name for a saved filter
    #[arg(allow_hyphen_values = true)]
    pub query: String,

    /// Print the expression tree
    #[arg(long)]
    pub tree: bool,

    /// Output in JSON format
    #[arg(long, conflicts_with = "tree")]
    pub json: bool,
}

/// Arguments for `ht tokens`.
#[derive(Args, Debug, Clone)]
pub struct TokensCommand {
    /// Filter query text
    #[arg(allow_hyphen_values = true)]
    pub query: String,
}

/// Arguments for `ht filter`.
#[derive(Args, Debug, Clone)]
pub struct FilterCommand {
    /// Filter query, or @name for a saved filter
    #[arg(allow_hyphen_values = true)]
    pub query: String,

    #[command(flatten)]
    /// Issue file selection.
    pub issues: IssuesArgs,

    /// Reference date for `updated:` ages [default: settings.today or the current date]
    #[arg(long, value_parser = parse_today)]
    pub today: Option<NaiveDate>,

    /// Maximum issues to print, 0 for all [default: settings.limit]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `ht apply`.
#[derive(Args, Debug, Clone)]
pub struct ApplyCommand {
    /// Single-field filter such as milestone:0.4, or @name
    #[arg(allow_hyphen_values = true)]
    pub query: String,

    /// Issue to change
    #[arg(long, value_parser = parse_issue_id)]
    pub issue: u64,

    #[command(flatten)]
    /// Issue file selection.
    pub issues: IssuesArgs,
}

/// Arguments for `ht init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.ht.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `ht` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse a filter and print its canonical form
    Parse(ParseCommand),

    /// Print the tokens of a filter
    Tokens(TokensCommand),

    /// List the issues matching a filter
    #[command(after_help = "\
QUERY SYNTAX:
  word              Title or body contains the word
  \"two words\"       Title or body contains both words
  name:value        Qualifier, e.g. label:bug, milestone:0.4
  a b, a AND b      Both must match (also & and &&)
  a OR b            Either must match (also | and ||)
  NOT a             Must not match (also !, - and ~)
  (expr)            Grouping

QUALIFIERS:
  title body milestone label assignee author involves
  state:open|closed  is:open|closed|pr|issue  has:FIELD  no:FIELD
  id:12  parent:#12
  created:2014-6-1  created:>=2014-6-1  created:2014-1-1 .. 2014-6-30
  updated:7 (days since update < 7)  updated:>=30  updated:1 .. 7

EXAMPLES:
  ht filter 'milestone:0.4 state:open OR label:urgent'
  ht filter 'label:type.bug -assignee:darius'
  ht filter 'updated:>=30 state:open' --today 2014-06-30
  ht filter @urgent --json")]
    Filter(FilterCommand),

    /// Apply a single-field filter to an issue
    Apply(ApplyCommand),

    /// Initialize ht configuration in current directory
    Init(InitCommand),

    /// Validate configuration and saved filters
    Check,

    /// Show effective configuration settings
    Config,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn value_parsers() {
        assert_eq!(parse_today("2014-6-1"), Ok(NaiveDate::from_ymd_opt(2014, 6, 1).unwrap()));
        assert!(parse_today("june").is_err());
        assert_eq!(parse_issue_id("#12"), Ok(12));
        assert_eq!(parse_issue_id("12"), Ok(12));
        assert!(parse_issue_id("twelve").is_err());
    }

    #[test]
    fn verbosity_is_global() {
        let cli = Cli::try_parse_from(["ht", "-vv", "parse", "a"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn negated_query_is_a_value() {
        let cli = Cli::try_parse_from(["ht", "filter", "-label:bug"]).unwrap();
        let Commands::Filter(cmd) = cli.command else {
            panic!("expected filter command");
        };
        assert_eq!(cmd.query, "-label:bug");
    }

    #[test]
    fn tree_and_json_conflict() {
        assert!(Cli::try_parse_from(["ht", "parse", "a", "--tree", "--json"]).is_err());
    }
}
