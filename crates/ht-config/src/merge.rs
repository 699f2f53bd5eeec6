//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules and resolving paths.

use std::{collections::BTreeMap, path::PathBuf};

use crate::{
    Config, ConfigError, Settings,
    parse::{RawConfig, RawSettings},
    resolve::resolve_issues_path,
};

/// A parsed config file with its source path.
#[derive(Debug)]
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory containing the config file.
    fn dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default()
    }
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - Issues: the list from the winning file, resolved relative to that file
/// - Saved filters: merged by name, first definition wins
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let settings = merge_settings(configs)?;
    let filters = merge_filters(configs);
    let config_root = configs.first().map(ParsedConfig::dir);

    Ok(Config {
        settings,
        filters,
        config_root,
        files: configs.iter().map(|c| c.path.clone()).collect(),
    })
}

/// Merges general settings, taking first defined value for each field.
fn merge_settings(configs: &[ParsedConfig]) -> Result<Settings, ConfigError> {
    let mut result = Settings::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref settings) = parsed.config.settings {
            apply_raw_settings(&mut result, settings, parsed)?;
        }
    }

    Ok(result)
}

/// Applies raw settings to result, overwriting any present values.
fn apply_raw_settings(
    result: &mut Settings,
    raw: &RawSettings,
    parsed: &ParsedConfig,
) -> Result<(), ConfigError> {
    if let Some(ref paths) = raw.issues {
        let dir = parsed.dir();
        result.issues = paths
            .iter()
            .map(|path| resolve_issues_path(path, &dir))
            .collect::<Result<_, _>>()?;
    }
    if let Some(v) = raw.today {
        result.today = Some(v);
    }
    if let Some(v) = raw.limit {
        result.limit = v;
    }
    Ok(())
}

/// Merges saved filters by name; the first definition of each name wins.
fn merge_filters(configs: &[ParsedConfig]) -> BTreeMap<String, String> {
    let mut filters = BTreeMap::new();

    for parsed in configs {
        let Some(ref defined) = parsed.config.filters else {
            continue;
        };
        for (name, query) in defined {
            filters
                .entry(name.clone())
                .or_insert_with(|| query.clone());
        }
    }

    filters
}
