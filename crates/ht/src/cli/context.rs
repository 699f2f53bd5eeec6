//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use chrono::{Local, NaiveDate};
use ht_config::Config;
use tracing::debug;

use crate::{cli::args::IssuesArgs, issues::IssueStore};

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init` and `tokens`, which should work even when an existing config file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Expands `@name` to the text of the saved filter; other queries pass through.
    pub fn resolve_query<'a>(&'a self, query: &'a str) -> Result<&'a str, ExitCode> {
        let Some(name) = query.strip_prefix('@') else {
            return Ok(query);
        };

        match self.config.saved_filter(name) {
            Some(saved) => {
                debug!(name, query = saved, "expanded saved filter");
                Ok(saved)
            }
            None => {
                eprintln!("error: unknown saved filter '@{name}'");
                if self.config.filters.is_empty() {
                    eprintln!("Define filters in the [filters] section of .ht.toml.");
                } else {
                    let names: Vec<&str> = self.config.filters.keys().map(String::as_str).collect();
                    eprintln!("Saved filters: {}", names.join(", "));
                }
                Err(ExitCode::FAILURE)
            }
        }
    }

    /// Returns the issue files to read: `--issues` if given, else the configured ones.
    pub fn issue_files(&self, args: &IssuesArgs) -> Result<Vec<PathBuf>, ExitCode> {
        if let Some(path) = &args.issues {
            return Ok(vec![self.cwd.join(path)]);
        }
        if self.config.settings.issues.is_empty() {
            eprintln!("error: no issues file configured");
            eprintln!("Pass --issues FILE, or run 'ht init' and set settings.issues.");
            return Err(ExitCode::FAILURE);
        }
        Ok(self.config.settings.issues.clone())
    }

    /// Loads every selected issue file.
    pub fn load_issues(&self, args: &IssuesArgs) -> Result<Vec<IssueStore>, ExitCode> {
        let files = self.issue_files(args)?;
        let stores = IssueStore::load_all(&files).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })?;
        debug!(
            files = stores.len(),
            issues = stores.iter().map(|s| s.issues().len()).sum::<usize>(),
            "loaded issues"
        );
        Ok(stores)
    }

    /// Reference date: the override, else `settings.today`, else the local date.
    pub fn today(&self, today: Option<NaiveDate>) -> NaiveDate {
        today
            .or(self.config.settings.today)
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
