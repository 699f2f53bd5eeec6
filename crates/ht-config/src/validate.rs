//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use ht_filter::{KNOWN_QUALIFIERS, QualifierKind, parse};

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// No issue collection is configured.
    NoIssuesConfigured,
    /// A configured issues file does not exist.
    IssuesFileMissing {
        /// Path that doesn't exist.
        path: String,
    },
    /// A saved filter name cannot be written as `@name`.
    SavedFilterName {
        /// The offending name.
        name: String,
    },
    /// A saved filter does not parse.
    SavedFilterInvalid {
        /// Name of the filter.
        name: String,
        /// Parse error message.
        message: String,
    },
    /// A saved filter uses a qualifier that never matches.
    SavedFilterUnknownQualifier {
        /// Name of the filter.
        name: String,
        /// The unknown qualifier name.
        qualifier: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoIssuesConfigured => {
                write!(f, "no issues file is configured")
            }
            Self::IssuesFileMissing { path } => {
                write!(f, "issues file does not exist: {path}")
            }
            Self::SavedFilterName { name } => {
                write!(
                    f,
                    "saved filter name '{name}' should use only letters, digits, '-' and '_'"
                )
            }
            Self::SavedFilterInvalid { name, message } => {
                write!(f, "saved filter '{name}' does not parse: {message}")
            }
            Self::SavedFilterUnknownQualifier { name, qualifier } => {
                write!(
                    f,
                    "saved filter '{name}' uses unknown qualifier '{qualifier}' (known: {KNOWN_QUALIFIERS})"
                )
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
///
/// This checks for:
/// - Missing or nonexistent issues files
/// - Saved filters that do not parse or use unknown qualifiers
/// - Saved filter names that are not bare words
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.settings.issues.is_empty() {
        warnings.push(ConfigWarning::NoIssuesConfigured);
    }
    for path in &config.settings.issues {
        if !path.is_file() {
            warnings.push(ConfigWarning::IssuesFileMissing {
                path: path.display().to_string(),
            });
        }
    }

    for (name, query) in &config.filters {
        warnings.extend(validate_filter(name, query));
    }

    warnings
}

/// Validates a single saved filter.
fn validate_filter(name: &str, query: &str) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if !is_bare_name(name) {
        warnings.push(ConfigWarning::SavedFilterName {
            name: name.to_string(),
        });
    }

    match parse(query) {
        Ok(expr) => {
            for qualifier in expr.qualifier_names() {
                if QualifierKind::from_name(qualifier).is_none() {
                    warnings.push(ConfigWarning::SavedFilterUnknownQualifier {
                        name: name.to_string(),
                        qualifier: qualifier.to_string(),
                    });
                }
            }
        }
        Err(err) => warnings.push(ConfigWarning::SavedFilterInvalid {
            name: name.to_string(),
            message: err.message,
        }),
    }

    warnings
}

/// Returns true for names made of letters, digits, `-` and `_`.
fn is_bare_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{Settings, test_support::TestDir};

    fn config_with_filters(filters: &[(&str, &str)]) -> (TestDir, Config) {
        let test_dir = TestDir::new();
        let issues = test_dir.create_file("issues.json", "[]");
        let config = Config {
            settings: Settings {
                issues: vec![issues],
                ..Settings::default()
            },
            filters: filters
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect::<BTreeMap<_, _>>(),
            ..Config::default()
        };
        (test_dir, config)
    }

    #[test]
    fn clean_config() {
        let (_dir, config) = config_with_filters(&[("urgent", "label:urgent state:open")]);
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn no_issues() {
        let warnings = validate_config(&Config::default());
        assert_eq!(warnings, vec![ConfigWarning::NoIssuesConfigured]);
    }

    #[test]
    fn missing_issues_file() {
        let config = Config {
            settings: Settings {
                issues: vec!["/nonexistent/issues.json".into()],
                ..Settings::default()
            },
            ..Config::default()
        };
        let warnings = validate_config(&config);
        assert_eq!(
            warnings,
            vec![ConfigWarning::IssuesFileMissing {
                path: "/nonexistent/issues.json".into()
            }]
        );
    }

    #[test]
    fn invalid_filter() {
        let (_dir, config) = config_with_filters(&[("broken", "label:bug OR")]);
        let warnings = validate_config(&config);
        assert_eq!(
            warnings,
            vec![ConfigWarning::SavedFilterInvalid {
                name: "broken".into(),
                message: "unexpected end of input".into()
            }]
        );
    }

    #[test]
    fn filter_name_and_unknown_qualifier() {
        let (_dir, config) = config_with_filters(&[("my filter", "colour:red")]);
        let warnings = validate_config(&config);
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], ConfigWarning::SavedFilterName { .. }));
        assert!(warnings[1].to_string().contains("unknown qualifier 'colour'"));
    }

    #[test]
    fn bare_names() {
        assert!(is_bare_name("open-bugs_2"));
        assert!(!is_bare_name(""));
        assert!(!is_bare_name("a b"));
        assert!(!is_bare_name("@x"));
    }
}
