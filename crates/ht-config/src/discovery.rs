//! Configuration file discovery.
//!
//! Discovers `.ht.toml` files by walking up the directory tree from a starting point,
//! then appending the global `~/.ht.toml` if present.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::debug;

use crate::{ConfigError, merge::ParsedConfig, parse::parse_config_file};

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".ht.toml";

/// Finds and parses every configuration file that applies to `cwd`.
///
/// Each directory from `cwd` upward contributes its `.ht.toml`, closest first. A file with
/// `root = true` ends the walk and also excludes the global file; otherwise `~/.ht.toml` comes
/// last. Any file that cannot be read or parsed fails the whole discovery.
pub fn discover_configs(cwd: &Path) -> Result<Vec<ParsedConfig>, ConfigError> {
    let mut configs = Vec::new();

    for dir in cwd.ancestors() {
        let path = dir.join(CONFIG_FILENAME);
        if !path.is_file() {
            continue;
        }
        let config = parse_config_file(&path)?;
        let is_root = config.root == Some(true);
        debug!(path = %path.display(), is_root, "found config file");
        configs.push(ParsedConfig { path, config });
        if is_root {
            return Ok(configs);
        }
    }

    if let Some(path) = global_config_path()
        && path.is_file()
        && !configs.iter().any(|c| c.path == path)
    {
        let config = parse_config_file(&path)?;
        configs.push(ParsedConfig { path, config });
    }

    Ok(configs)
}

/// Returns the path to the global configuration file (`~/.ht.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
