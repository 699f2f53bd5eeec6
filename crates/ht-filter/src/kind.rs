//! Qualifier names and the value grammar each one expects.

/// The value grammar a qualifier's content is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Plain text.
    Text,
    /// Dates, with comparators and `..` ranges.
    Date,
    /// Integers, with comparators and `..` ranges; a bare number means `<`.
    Number,
    /// An exact integer; anything else stays text.
    Integer,
}

/// The qualifiers the evaluator knows how to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualifierKind {
    /// Free text over title and body.
    Keyword,
    /// Text in the title only.
    Title,
    /// Text in the body only (`body` or `desc`).
    Body,
    /// Issue number.
    Id,
    /// Milestone title.
    Milestone,
    /// Label membership.
    Label,
    /// Assignee login.
    Assignee,
    /// Author login.
    Author,
    /// Author or assignee login.
    Involves,
    /// `open` or `closed`.
    State,
    /// State or kind: `open`, `closed`, `pr`, `issue`.
    Is,
    /// Presence of an optional field.
    Has,
    /// Absence of an optional field.
    No,
    /// Ancestry in the issue hierarchy.
    Parent,
    /// Creation date.
    Created,
    /// Days since the last update.
    Updated,
}

impl QualifierKind {
    /// Resolves a qualifier name. Unknown names return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "keyword" => Self::Keyword,
            "title" => Self::Title,
            "body" | "desc" => Self::Body,
            "id" => Self::Id,
            "milestone" => Self::Milestone,
            "label" => Self::Label,
            "assignee" => Self::Assignee,
            "author" => Self::Author,
            "involves" => Self::Involves,
            "state" => Self::State,
            "is" => Self::Is,
            "has" => Self::Has,
            "no" => Self::No,
            "parent" => Self::Parent,
            "created" => Self::Created,
            "updated" => Self::Updated,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns the value grammar for this qualifier.
    pub fn value_type(self) -> ValueType {
        match self {
            Self::Created => ValueType::Date,
            Self::Updated => ValueType::Number,
            Self::Id => ValueType::Integer,
            _ => ValueType::Text,
        }
    }

    /// Whether the qualifier names a mutable single-valued field.
    pub fn is_applicable(self) -> bool {
        matches!(
            self,
            Self::Milestone | Self::Label | Self::State | Self::Assignee
        )
    }
}

/// Returns the value grammar for a qualifier name; unknown names take text.
pub fn value_type_of(name: &str) -> ValueType {
    QualifierKind::from_name(name).map_or(ValueType::Text, QualifierKind::value_type)
}

/// Comma-separated list of known qualifier names, for hints.
pub const KNOWN_QUALIFIERS: &str = "keyword, title, body, desc, id, milestone, label, assignee, \
                                    author, involves, state, is, has, no, parent, created, updated";
