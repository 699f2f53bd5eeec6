//! Error types for filter parsing and application.

use std::{error::Error, fmt};

use thiserror::Error;

/// Malformed filter text.
///
/// Displays the message, the query with a caret under the offending
/// character, and a hint for common mistakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// Character offset in the query where the error was detected.
    pub position: usize,
    /// The query being parsed.
    pub query: String,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, position: usize, query: &str) -> Self {
        Self {
            message: message.into(),
            position,
            query: query.to_string(),
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        let message = self.message.as_str();
        if message.starts_with("empty content") {
            Some("Give the qualifier a value, e.g. 'milestone:0.4'")
        } else if message.contains("to close '('") {
            Some("Add a closing parenthesis ) to match the opening one")
        } else if message.contains("unexpected ')'") {
            Some("Remove the extra ) or add a matching (")
        } else if message == "unexpected end of input" {
            Some("Operators need an expression on both sides, e.g. 'a OR b', '-label:bug'")
        } else {
            None
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "filter syntax error: {}", self.message)?;
        writeln!(f, "  {}", self.query)?;
        let clamped = self.position.min(self.query.chars().count());
        write!(f, "  {}^", " ".repeat(clamped))?;
        if let Some(suggestion) = self.suggestion() {
            write!(f, "\nhint: {suggestion}")?;
        }
        Ok(())
    }
}

impl Error for ParseError {}

/// Failure to apply a filter to an issue.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplyError {
    /// The expression does not describe a single field change.
    ///
    /// Callers should check [`crate::FilterExpr::can_be_applied_to_issue`]
    /// first; seeing this means that check was skipped.
    #[error("'{expression}' cannot be applied to an issue")]
    Unsupported {
        /// The expression as query text.
        expression: String,
    },

    /// The qualifier names an applicable field but the value is not valid for it.
    #[error("invalid value '{value}' for {qualifier}")]
    InvalidValue {
        /// Qualifier name.
        qualifier: String,
        /// Offending value.
        value: String,
    },

    /// The issue store refused the change.
    #[error("could not apply {change}: {reason}")]
    Rejected {
        /// The change as query text.
        change: String,
        /// Reason reported by the store.
        reason: String,
    },
}
