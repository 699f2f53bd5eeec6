//! Configuration file parsing.
//!
//! Parses individual `.ht.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{collections::BTreeMap, fs, path::Path};

use chrono::NaiveDate;
use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// General settings section.
    pub settings: Option<RawSettings>,
    /// Saved filters: name -> query text.
    pub filters: Option<BTreeMap<String, String>>,
}

/// Raw general settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    /// Issue collection file(s), relative to the config file.
    /// Accepts either a single string or an array of strings.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub issues: Option<Vec<String>>,
    /// Fixed reference day for relative dates.
    pub today: Option<NaiveDate>,
    /// Maximum rows printed by `ht filter`.
    pub limit: Option<usize>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestDir;

    #[test]
    fn empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.root.is_none());
        assert!(config.settings.is_none());
        assert!(config.filters.is_none());
    }

    #[test]
    fn single_issues_path() {
        let toml = r#"
[settings]
issues = "issues.json"
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let settings = config.settings.unwrap();
        assert_eq!(settings.issues, Some(vec!["issues.json".to_string()]));
        assert!(settings.today.is_none());
        assert!(settings.limit.is_none());
    }

    #[test]
    fn issues_path_list() {
        let toml = r#"
[settings]
issues = ["a.json", "b.json"]
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        assert_eq!(
            config.settings.unwrap().issues,
            Some(vec!["a.json".to_string(), "b.json".to_string()])
        );
    }

    #[test]
    fn full_settings() {
        let toml = r#"
root = true

[settings]
issues = "issues.json"
today = "2014-06-01"
limit = 10

[filters]
urgent = "label:urgent state:open"
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        assert_eq!(config.root, Some(true));
        let settings = config.settings.unwrap();
        assert_eq!(settings.today, NaiveDate::from_ymd_opt(2014, 6, 1));
        assert_eq!(settings.limit, Some(10));
        let filters = config.filters.unwrap();
        assert_eq!(filters["urgent"], "label:urgent state:open");
    }

    #[test]
    fn bad_date_is_an_error() {
        let toml = r#"
[settings]
today = "yesterday"
"#;
        let err = parse_config_str(toml, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn invalid_toml() {
        let err = parse_config_str("[settings\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn missing_file() {
        let err = parse_config_file(Path::new("/nonexistent/.ht.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
