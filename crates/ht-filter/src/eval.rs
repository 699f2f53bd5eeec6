//! Evaluating filter expressions against issues.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    ast::{FilterExpr, Qualifier, QualifierContent},
    kind::QualifierKind,
};

/// Read access to the issue fields qualifiers match against.
pub trait IssueAccessor {
    /// Issue number.
    fn id(&self) -> u64;
    /// Title text.
    fn title(&self) -> &str;
    /// Body text.
    fn body(&self) -> &str;
    /// Label names, `group.name` or plain.
    fn labels(&self) -> &[String];
    /// Milestone title, if any.
    fn milestone(&self) -> Option<&str>;
    /// Assignee login, if any.
    fn assignee(&self) -> Option<&str>;
    /// Author login.
    fn author(&self) -> &str;
    /// Creation time.
    fn created_at(&self) -> DateTime<Utc>;
    /// Last update time.
    fn updated_at(&self) -> DateTime<Utc>;
    /// Whether the issue is open.
    fn is_open(&self) -> bool;
    /// Whether the issue is a pull request.
    fn is_pull_request(&self) -> bool;
    /// Number of the parent issue, if any.
    fn parent(&self) -> Option<u64>;
}

/// Evaluation context supplied alongside each issue.
///
/// Carries facts that are not part of the issue itself: the reference day
/// for relative dates and the parent links of the whole collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaQualifierInfo {
    /// Day that `updated` ages are measured from.
    today: NaiveDate,
    /// Parent of each issue that has one.
    parents: HashMap<u64, u64>,
}

impl MetaQualifierInfo {
    /// Creates a context with no hierarchy.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            parents: HashMap::new(),
        }
    }

    /// Records `parent` as the parent of `child`.
    pub fn with_parent(mut self, child: u64, parent: u64) -> Self {
        self.parents.insert(child, parent);
        self
    }

    /// Builds a context from the parent links of a collection.
    pub fn from_issues<I: IssueAccessor>(issues: &[I], today: NaiveDate) -> Self {
        let parents = issues
            .iter()
            .filter_map(|issue| issue.parent().map(|parent| (issue.id(), parent)))
            .collect();
        Self { today, parents }
    }

    /// Reference day.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Ancestors of `id`, nearest first. Stops if the links form a cycle.
    pub fn ancestors(&self, id: u64) -> Vec<u64> {
        let mut seen = HashSet::from([id]);
        let mut chain = Vec::new();
        let mut current = id;
        while let Some(&parent) = self.parents.get(&current) {
            if !seen.insert(parent) {
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Number of ancestors of `id`.
    pub fn depth(&self, id: u64) -> usize {
        self.ancestors(id).len()
    }
}

impl FilterExpr {
    /// Returns true if `issue` matches the expression.
    ///
    /// Total: unknown qualifier names and mismatched content never match, and
    /// the empty expression matches everything.
    pub fn is_satisfied_by<I: IssueAccessor + ?Sized>(
        &self,
        issue: &I,
        info: &MetaQualifierInfo,
    ) -> bool {
        match self {
            Self::Empty => true,
            Self::Qualifier(q) => q.is_satisfied_by(issue, info),
            Self::Conjunction { left, right } => {
                left.is_satisfied_by(issue, info) && right.is_satisfied_by(issue, info)
            }
            Self::Disjunction { left, right } => {
                left.is_satisfied_by(issue, info) || right.is_satisfied_by(issue, info)
            }
            Self::Negation { inner } => !inner.is_satisfied_by(issue, info),
        }
    }
}

impl Qualifier {
    /// Returns true if `issue` matches this qualifier.
    pub fn is_satisfied_by<I: IssueAccessor + ?Sized>(
        &self,
        issue: &I,
        info: &MetaQualifierInfo,
    ) -> bool {
        let Some(kind) = QualifierKind::from_name(&self.name) else {
            return false;
        };

        match (kind, &self.content) {
            (QualifierKind::Created, content) => {
                let day = issue.created_at().date_naive();
                match content {
                    QualifierContent::Date(date) => day == *date,
                    QualifierContent::DateRange(range) => range.encloses(day),
                    _ => false,
                }
            }
            (QualifierKind::Updated, content) => {
                let age = (info.today - issue.updated_at().date_naive()).num_days();
                match content {
                    QualifierContent::Number(days) => age == *days,
                    QualifierContent::NumberRange(range) => range.encloses(age),
                    _ => false,
                }
            }
            (QualifierKind::Id, QualifierContent::Number(n)) => {
                u64::try_from(*n).is_ok_and(|n| n == issue.id())
            }
            (QualifierKind::Id, QualifierContent::Text(text)) => {
                parse_issue_ref(text).is_some_and(|n| n == issue.id())
            }
            (kind, QualifierContent::Text(text)) => matches_text(kind, text, issue, info),
            _ => false,
        }
    }
}

/// Matches text-valued qualifiers.
fn matches_text<I: IssueAccessor + ?Sized>(
    kind: QualifierKind,
    text: &str,
    issue: &I,
    info: &MetaQualifierInfo,
) -> bool {
    let value = text.to_lowercase();
    match kind {
        QualifierKind::Keyword => value
            .split_whitespace()
            .all(|word| contains(issue.title(), word) || contains(issue.body(), word)),
        QualifierKind::Title => value
            .split_whitespace()
            .all(|word| contains(issue.title(), word)),
        QualifierKind::Body => value
            .split_whitespace()
            .all(|word| contains(issue.body(), word)),
        QualifierKind::Milestone => issue.milestone().is_some_and(|m| contains(m, &value)),
        QualifierKind::Label => issue.labels().iter().any(|label| label_matches(label, &value)),
        QualifierKind::Assignee => issue.assignee().is_some_and(|a| contains(a, &value)),
        QualifierKind::Author => contains(issue.author(), &value),
        QualifierKind::Involves => {
            contains(issue.author(), &value) || issue.assignee().is_some_and(|a| contains(a, &value))
        }
        QualifierKind::State => match value.as_str() {
            "open" => issue.is_open(),
            "closed" => !issue.is_open(),
            _ => false,
        },
        QualifierKind::Is => match value.as_str() {
            "open" => issue.is_open(),
            "closed" => !issue.is_open(),
            "pr" => issue.is_pull_request(),
            "issue" => !issue.is_pull_request(),
            _ => false,
        },
        QualifierKind::Has => has_field(&value, issue).unwrap_or(false),
        QualifierKind::No => has_field(&value, issue).is_some_and(|present| !present),
        QualifierKind::Parent => parse_issue_ref(&value)
            .is_some_and(|parent| info.ancestors(issue.id()).contains(&parent)),
        QualifierKind::Id | QualifierKind::Created | QualifierKind::Updated => false,
    }
}

/// Case-insensitive substring test; `needle` must already be lowercase.
fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Matches a label against a lowercase query value.
///
/// `group.` matches every label in the group, `group.name` matches exactly,
/// and a value without a dot matches the name part of any label.
fn label_matches(label: &str, value: &str) -> bool {
    let label = label.to_lowercase();
    if value.ends_with('.') {
        label.starts_with(value)
    } else if value.contains('.') {
        label == value
    } else {
        let name = label.split_once('.').map_or(label.as_str(), |(_, name)| name);
        name == value
    }
}

/// Whether the named optional field is present; `None` for unknown fields.
fn has_field<I: IssueAccessor + ?Sized>(field: &str, issue: &I) -> Option<bool> {
    let present = match field {
        "label" | "labels" => !issue.labels().is_empty(),
        "milestone" => issue.milestone().is_some(),
        "assignee" => issue.assignee().is_some(),
        "parent" => issue.parent().is_some(),
        _ => return None,
    };
    Some(present)
}

/// Parses an issue reference, `#12` or `12`.
pub fn parse_issue_ref(text: &str) -> Option<u64> {
    let digits = text.trim().strip_prefix('#').unwrap_or(text.trim());
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
