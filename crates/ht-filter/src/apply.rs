//! Turning a filter into a field change on an issue.
//!
//! A lone qualifier on a mutable single-valued field (`milestone:0.4`,
//! `label:bug`, `state:closed`, `assignee:darius`) describes one change.
//! The change itself is carried out by an [`IssueMutator`] owned by the
//! caller.

use std::fmt;

use tracing::debug;

use crate::{
    ast::{FilterExpr, QualifierContent},
    error::ApplyError,
    kind::QualifierKind,
};

/// A single-field change described by an applicable qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldChange<'a> {
    /// Set the milestone to the given title.
    Milestone(&'a str),
    /// Add the given label.
    AddLabel(&'a str),
    /// Open or close the issue.
    State {
        /// Whether the issue ends up open.
        open: bool,
    },
    /// Assign the issue to the given login.
    Assignee(&'a str),
}

impl fmt::Display for FieldChange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Milestone(title) => write!(f, "milestone:{title}"),
            Self::AddLabel(label) => write!(f, "label:{label}"),
            Self::State { open: true } => f.write_str("state:open"),
            Self::State { open: false } => f.write_str("state:closed"),
            Self::Assignee(login) => write!(f, "assignee:{login}"),
        }
    }
}

/// Performs field changes on issues it knows about.
pub trait IssueMutator {
    /// The issue type being changed.
    type Issue: ?Sized;
    /// Why a change was refused.
    type Error: fmt::Display;

    /// Applies one change to `issue`.
    fn apply_change(
        &mut self,
        issue: &mut Self::Issue,
        change: FieldChange<'_>,
    ) -> Result<(), Self::Error>;
}

impl FilterExpr {
    /// Returns the change this expression describes.
    ///
    /// Only a lone text qualifier on `milestone`, `label`, `state` or
    /// `assignee` describes a change; composite expressions never do.
    pub fn field_change(&self) -> Result<FieldChange<'_>, ApplyError> {
        let unsupported = || ApplyError::Unsupported {
            expression: self.to_string(),
        };

        let Self::Qualifier(qualifier) = self else {
            return Err(unsupported());
        };
        let QualifierContent::Text(value) = &qualifier.content else {
            return Err(unsupported());
        };

        match QualifierKind::from_name(&qualifier.name) {
            Some(QualifierKind::Milestone) => Ok(FieldChange::Milestone(value)),
            Some(QualifierKind::Label) => Ok(FieldChange::AddLabel(value)),
            Some(QualifierKind::Assignee) => Ok(FieldChange::Assignee(value)),
            Some(QualifierKind::State) => match value.to_ascii_lowercase().as_str() {
                "open" => Ok(FieldChange::State { open: true }),
                "closed" => Ok(FieldChange::State { open: false }),
                _ => Err(ApplyError::InvalidValue {
                    qualifier: qualifier.name.clone(),
                    value: value.clone(),
                }),
            },
            _ => Err(unsupported()),
        }
    }

    /// Returns true if [`FilterExpr::apply_to`] can succeed for this expression.
    pub fn can_be_applied_to_issue(&self) -> bool {
        self.field_change().is_ok()
    }

    /// Applies the change this expression describes to `issue` through `store`.
    ///
    /// Fails with [`ApplyError::Unsupported`] when the expression describes
    /// no change, which callers avoid by checking
    /// [`FilterExpr::can_be_applied_to_issue`] first.
    pub fn apply_to<M: IssueMutator>(
        &self,
        issue: &mut M::Issue,
        store: &mut M,
    ) -> Result<(), ApplyError> {
        let change = self.field_change()?;
        debug!(%change, "applying filter");
        store
            .apply_change(issue, change)
            .map_err(|err| ApplyError::Rejected {
                change: change.to_string(),
                reason: err.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{eval::test_issue::TestIssue, parse};

    /// Applies changes directly to test issues.
    #[derive(Default)]
    struct Recorder {
        /// Changes seen so far, as query text.
        seen: Vec<String>,
    }

    impl IssueMutator for Recorder {
        type Issue = TestIssue;
        type Error = String;

        fn apply_change(
            &mut self,
            issue: &mut TestIssue,
            change: FieldChange<'_>,
        ) -> Result<(), String> {
            self.seen.push(change.to_string());
            match change {
                FieldChange::Milestone(title) if title.trim().is_empty() => {
                    return Err("blank milestone".into());
                }
                FieldChange::Milestone(title) => issue.milestone = Some(title.into()),
                FieldChange::AddLabel(label) => issue.labels.push(label.into()),
                FieldChange::State { open } => issue.open = open,
                FieldChange::Assignee(login) => issue.assignee = Some(login.into()),
            }
            Ok(())
        }
    }

    #[test]
    fn applicable_qualifiers() {
        for query in ["milestone:0.4", "label:bug", "state:open", "state:closed", "assignee:darius"] {
            assert!(parse(query).unwrap().can_be_applied_to_issue(), "{query}");
        }
    }

    #[test]
    fn composite_expressions_are_not_applicable() {
        for query in [
            "milestone:0.4 label:bug",
            "milestone:0.4 OR label:bug",
            "-label:bug",
            "",
            "keyword",
            "title:x",
            "created:2014-1-1",
            "state:pending",
        ] {
            assert!(!parse(query).unwrap().can_be_applied_to_issue(), "{query}");
        }
    }

    #[test]
    fn applies_each_field() {
        let mut issue = TestIssue::new(1, "a");
        let mut store = Recorder::default();

        for query in ["milestone:0.5", "label:type.bug", "state:closed", "assignee:jane"] {
            parse(query).unwrap().apply_to(&mut issue, &mut store).unwrap();
        }

        assert_eq!(issue.milestone.as_deref(), Some("0.5"));
        assert_eq!(issue.labels, vec!["type.bug".to_string()]);
        assert!(!issue.open);
        assert_eq!(issue.assignee.as_deref(), Some("jane"));
        assert_eq!(
            store.seen,
            vec!["milestone:0.5", "label:type.bug", "state:closed", "assignee:jane"]
        );
    }

    #[test]
    fn composite_apply_is_refused() {
        let mut issue = TestIssue::new(1, "a");
        let mut store = Recorder::default();
        let err = parse("label:a OR label:b")
            .unwrap()
            .apply_to(&mut issue, &mut store)
            .unwrap_err();
        assert_eq!(
            err,
            ApplyError::Unsupported {
                expression: "label:a OR label:b".into()
            }
        );
        assert!(store.seen.is_empty());
        assert!(issue.labels.is_empty());
    }

    #[test]
    fn invalid_state() {
        let mut issue = TestIssue::new(1, "a");
        let err = parse("state:pending")
            .unwrap()
            .apply_to(&mut issue, &mut Recorder::default())
            .unwrap_err();
        assert!(matches!(err, ApplyError::InvalidValue { .. }));
        assert!(issue.open);
    }

    #[test]
    fn store_rejection() {
        let mut issue = TestIssue::new(1, "a");
        let err = parse("milestone:\" \"")
            .unwrap()
            .apply_to(&mut issue, &mut Recorder::default())
            .unwrap_err();
        assert_eq!(
            err,
            ApplyError::Rejected {
                change: "milestone: ".into(),
                reason: "blank milestone".into()
            }
        );
    }
}
