//! Issue collections stored as JSON.
//!
//! An issues file holds a JSON array of issues. [`IssueStore`] loads and saves one file, and
//! [`IssueEditor`] carries out the field changes that applicable filters describe.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use ht_filter::{FieldChange, IssueAccessor, IssueMutator};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Open or closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// The issue is open.
    #[default]
    Open,
    /// The issue is closed.
    Closed,
}

/// One issue as stored in an issues file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number.
    pub id: u64,
    /// One-line title.
    pub title: String,
    /// Description text.
    #[serde(default)]
    pub body: String,
    /// Labels, conventionally `group.name`.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Milestone title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
    /// Login of the assignee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Login of the author.
    #[serde(default)]
    pub author: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Open or closed.
    #[serde(default)]
    pub state: IssueState,
    /// Whether this is a pull request rather than an issue.
    #[serde(default)]
    pub pull_request: bool,
    /// Number of the parent issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
}

impl IssueAccessor for Issue {
    fn id(&self) -> u64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn milestone(&self) -> Option<&str> {
        self.milestone.as_deref()
    }

    fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    fn author(&self) -> &str {
        &self.author
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }

    fn is_pull_request(&self) -> bool {
        self.pull_request
    }

    fn parent(&self) -> Option<u64> {
        self.parent
    }
}

/// Errors reading or writing an issues file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read the file.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path to the file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The file is not a JSON array of issues.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path to the file.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the file.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Path to the file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Failed to serialize the issues.
    #[error("failed to serialize issues: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// The issues of one file.
#[derive(Debug)]
pub struct IssueStore {
    /// File the issues were loaded from.
    path: PathBuf,
    /// Issues in file order.
    issues: Vec<Issue>,
}

impl IssueStore {
    /// Loads an issues file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let contents = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let issues = serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            issues,
        })
    }

    /// Loads several issues files, in order.
    pub fn load_all(paths: &[PathBuf]) -> Result<Vec<Self>, StoreError> {
        paths.iter().map(|path| Self::load(path)).collect()
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All issues, in file order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Consumes the store, returning its issues.
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// Looks up an issue by number.
    pub fn issue_mut(&mut self, id: u64) -> Option<&mut Issue> {
        self.issues.iter_mut().find(|issue| issue.id == id)
    }

    /// Writes the issues back to the file as pretty-printed JSON.
    pub fn save(&self) -> Result<(), StoreError> {
        let mut json = serde_json::to_string_pretty(&self.issues).map_err(StoreError::Serialize)?;
        json.push('\n');
        fs::write(&self.path, json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Why an edit was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    /// The new value is blank.
    #[error("{field} cannot be empty")]
    EmptyValue {
        /// Field being set.
        field: &'static str,
    },
}

/// Applies field changes to issues, stamping them with a fixed update time.
#[derive(Debug, Clone, Copy)]
pub struct IssueEditor {
    /// Time recorded as `updated_at` on every edited issue.
    now: DateTime<Utc>,
}

impl IssueEditor {
    /// Creates an editor that stamps edits with `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl IssueMutator for IssueEditor {
    type Issue = Issue;
    type Error = EditError;

    fn apply_change(&mut self, issue: &mut Issue, change: FieldChange<'_>) -> Result<(), EditError> {
        match change {
            FieldChange::Milestone(title) => {
                issue.milestone = Some(non_empty("milestone", title)?.to_string());
            }
            FieldChange::AddLabel(label) => {
                add_label(&mut issue.labels, non_empty("label", label)?);
            }
            FieldChange::State { open } => {
                issue.state = if open {
                    IssueState::Open
                } else {
                    IssueState::Closed
                };
            }
            FieldChange::Assignee(login) => {
                issue.assignee = Some(non_empty("assignee", login)?.to_string());
            }
        }
        issue.updated_at = self.now;
        Ok(())
    }
}

/// Returns the trimmed value, or an error if nothing is left.
fn non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str, EditError> {
    let value = value.trim();
    if value.is_empty() {
        Err(EditError::EmptyValue { field })
    } else {
        Ok(value)
    }
}

/// Adds a label, replacing any other label of the same `group.`.
fn add_label(labels: &mut Vec<String>, label: &str) {
    if let Some((group, _)) = label.split_once('.')
        && !group.is_empty()
    {
        let prefix = format!("{}.", group.to_lowercase());
        labels.retain(|existing| {
            existing.eq_ignore_ascii_case(label) || !existing.to_lowercase().starts_with(&prefix)
        });
    }
    if !labels.iter().any(|existing| existing.eq_ignore_ascii_case(label)) {
        labels.push(label.to_string());
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use ht_filter::{ApplyError, MetaQualifierInfo, parse};

    use super::*;

    fn time(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2014, 6, day, 12, 0, 0).unwrap()
    }

    fn issue(id: u64, title: &str) -> Issue {
        Issue {
            id,
            title: title.to_string(),
            body: String::new(),
            labels: Vec::new(),
            milestone: None,
            assignee: None,
            author: "darius".to_string(),
            created_at: time(1),
            updated_at: time(1),
            state: IssueState::Open,
            pull_request: false,
            parent: None,
        }
    }

    #[test]
    fn minimal_json_uses_defaults() {
        let json = r#"[{
            "id": 7,
            "title": "Crash on start",
            "created_at": "2014-06-01T12:00:00Z",
            "updated_at": "2014-06-02T08:30:00Z"
        }]"#;
        let issues: Vec<Issue> = serde_json::from_str(json).unwrap();
        let issue = &issues[0];
        assert_eq!(issue.id, 7);
        assert_eq!(issue.state, IssueState::Open);
        assert!(issue.labels.is_empty());
        assert!(issue.milestone.is_none());
        assert!(!issue.pull_request);
        assert_eq!(issue.created_at, time(1));
    }

    #[test]
    fn serialization_skips_missing_fields() {
        let json = serde_json::to_string(&issue(1, "a")).unwrap();
        assert!(!json.contains("milestone"));
        assert!(!json.contains("parent"));
        assert!(json.contains("\"state\":\"open\""));
    }

    #[test]
    fn issues_satisfy_filters() {
        let mut bug = issue(1, "Crash on start");
        bug.labels = vec!["type.bug".into()];
        bug.milestone = Some("0.4".into());
        let mut closed = issue(2, "Docs");
        closed.state = IssueState::Closed;

        let info = MetaQualifierInfo::new(time(11).date_naive());
        let expr = parse("milestone:0.4 state:open OR label:urgent").unwrap();
        assert!(expr.is_satisfied_by(&bug, &info));
        assert!(!expr.is_satisfied_by(&closed, &info));
        assert!(parse("state:closed").unwrap().is_satisfied_by(&closed, &info));
        assert!(parse("updated:>=10").unwrap().is_satisfied_by(&bug, &info));
    }

    #[test]
    fn editor_sets_fields() {
        let mut editor = IssueEditor::new(time(9));
        let mut target = issue(1, "a");

        parse("milestone:0.5").unwrap().apply_to(&mut target, &mut editor).unwrap();
        parse("assignee:dana").unwrap().apply_to(&mut target, &mut editor).unwrap();
        parse("state:closed").unwrap().apply_to(&mut target, &mut editor).unwrap();

        assert_eq!(target.milestone.as_deref(), Some("0.5"));
        assert_eq!(target.assignee.as_deref(), Some("dana"));
        assert_eq!(target.state, IssueState::Closed);
        assert_eq!(target.updated_at, time(9));
    }

    #[test]
    fn editor_replaces_label_in_group() {
        let mut editor = IssueEditor::new(time(9));
        let mut target = issue(1, "a");
        target.labels = vec!["priority.low".into(), "type.bug".into()];

        parse("label:priority.high").unwrap().apply_to(&mut target, &mut editor).unwrap();
        assert_eq!(target.labels, vec!["type.bug", "priority.high"]);

        parse("label:Priority.High").unwrap().apply_to(&mut target, &mut editor).unwrap();
        assert_eq!(target.labels, vec!["type.bug", "priority.high"]);

        parse("label:wontfix").unwrap().apply_to(&mut target, &mut editor).unwrap();
        assert_eq!(target.labels, vec!["type.bug", "priority.high", "wontfix"]);
    }

    #[test]
    fn editor_rejects_blank_values() {
        let mut editor = IssueEditor::new(time(9));
        let mut target = issue(1, "a");

        let err = parse("milestone:\" \"")
            .unwrap()
            .apply_to(&mut target, &mut editor)
            .unwrap_err();
        assert_eq!(
            err,
            ApplyError::Rejected {
                change: "milestone: ".into(),
                reason: "milestone cannot be empty".into(),
            }
        );
        assert!(target.milestone.is_none());
        assert_eq!(target.updated_at, time(1));
    }

    #[test]
    fn store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issues.json");
        let issues = vec![issue(1, "a"), issue(2, "b")];
        fs::write(&path, serde_json::to_string(&issues).unwrap()).unwrap();

        let mut store = IssueStore::load(&path).unwrap();
        assert_eq!(store.path(), path);
        assert_eq!(store.issues().len(), 2);
        store.issue_mut(2).unwrap().title = "renamed".into();
        assert!(store.issue_mut(3).is_none());
        store.save().unwrap();

        let reloaded = IssueStore::load(&path).unwrap().into_issues();
        assert_eq!(reloaded[1].title, "renamed");
        assert_eq!(reloaded[0], issues[0]);
    }

    #[test]
    fn load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            IssueStore::load(&missing),
            Err(StoreError::Read { .. })
        ));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{\"id\": 1}").unwrap();
        let err = IssueStore::load(&broken).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));

        let all = IssueStore::load_all(&[broken, missing]);
        assert!(all.is_err());
    }
}
