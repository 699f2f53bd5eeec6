//! Configuration system for ht.
//!
//! ht uses TOML configuration files named `.ht.toml`. Configuration is resolved by walking up
//! the directory tree from the current working directory, collecting any `.ht.toml` files found,
//! then loading `~/.ht.toml` as the global config with lowest precedence.
//!
//! A configuration names the issue collection to filter, a few display settings, and a table
//! of saved filters that can be referred to as `@name`.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod resolve;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
pub use discovery::{CONFIG_FILENAME, discover_configs, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{RawConfig, RawSettings, parse_config_file, parse_config_str};
pub use resolve::resolve_issues_path;
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for ht.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// General settings.
    pub settings: Settings,
    /// Saved filters by name.
    pub filters: BTreeMap<String, String>,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
    /// Files the configuration was merged from, highest precedence first.
    pub files: Vec<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.ht.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        merge_configs(&discover_configs(cwd)?)
    }

    /// Looks up a saved filter by name.
    pub fn saved_filter(&self, name: &str) -> Option<&str> {
        self.filters.get(name).map(String::as_str)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output has the same shape as a `.ht.toml` file, with issue paths already resolved.
    pub fn settings_to_toml(&self) -> Result<String, toml::ser::Error> {
        let serializable = SerializableConfig {
            settings: &self.settings,
            filters: &self.filters,
        };
        toml::to_string_pretty(&serializable)
    }
}

/// General settings for ht.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Resolved issue collection files.
    pub issues: Vec<PathBuf>,
    /// Fixed reference day for relative dates; `None` means the current date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today: Option<NaiveDate>,
    /// Maximum rows printed by `ht filter`.
    pub limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            issues: Vec::new(),
            today: None,
            limit: 50,
        }
    }
}

/// Internal struct for TOML serialization of the effective configuration.
#[derive(Serialize)]
struct SerializableConfig<'a> {
    /// General settings.
    settings: &'a Settings,
    /// Saved filters, sorted by name.
    filters: &'a BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestDir;

    #[test]
    fn settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.limit, 50);
        assert!(settings.issues.is_empty());
        assert!(settings.today.is_none());
    }

    #[test]
    fn settings_to_toml() {
        let mut config = Config::default();
        config.settings.today = NaiveDate::from_ymd_opt(2014, 6, 1);
        config
            .filters
            .insert("urgent".into(), "label:urgent".into());
        let toml = config.settings_to_toml().unwrap();

        assert!(toml.contains("[settings]"));
        assert!(toml.contains("limit = 50"));
        assert!(toml.contains("today = \"2014-06-01\""));
        assert!(toml.contains("[filters]"));
        assert!(toml.contains("urgent = \"label:urgent\""));

        let parsed: toml::Value = toml::from_str(&toml).unwrap();
        assert!(parsed.get("settings").is_some());
    }

    #[test]
    fn load_discovers_and_merges() {
        let test_dir = TestDir::new();
        test_dir.create_config_with_content(
            "",
            "root = true\n[settings]\nissues = \"issues.json\"\n[filters]\nmine = \"assignee:me\"\n",
        );
        let working_dir = test_dir.create_dir("src");
        test_dir.create_config_with_content("src", "[settings]\nlimit = 7\n");

        let config = Config::load(&working_dir).unwrap();
        assert_eq!(config.settings.limit, 7);
        assert_eq!(config.settings.issues, vec![test_dir.path().join("issues.json")]);
        assert_eq!(config.saved_filter("mine"), Some("assignee:me"));
        assert_eq!(config.saved_filter("other"), None);
        assert_eq!(config.config_root, Some(working_dir));
        assert_eq!(
            config.files,
            vec![
                test_dir.path().join("src").join(CONFIG_FILENAME),
                test_dir.path().join(CONFIG_FILENAME)
            ]
        );
    }

    #[test]
    fn load_reports_parse_errors() {
        let test_dir = TestDir::new();
        test_dir.create_config_with_content("", "root = true\n[settings]\nlimit = \"many\"\n");
        let err = Config::load(test_dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }
}
