//! Filter expression tree.
//!
//! Trees are immutable values: every transform returns a new tree, and
//! equality and hashing are structural.

use std::fmt;

use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::range::{DateRange, NumberRange, RangeBound};

/// The value a qualifier carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize),
    serde(tag = "type", content = "value", rename_all = "snake_case")
)]
pub enum QualifierContent {
    /// A plain string.
    Text(String),
    /// A single calendar day.
    Date(NaiveDate),
    /// A range of days.
    DateRange(DateRange),
    /// A single integer.
    Number(i64),
    /// A range of integers.
    NumberRange(NumberRange),
}

impl From<&str> for QualifierContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for QualifierContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<NaiveDate> for QualifierContent {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<DateRange> for QualifierContent {
    fn from(range: DateRange) -> Self {
        Self::DateRange(range)
    }
}

impl From<i64> for QualifierContent {
    fn from(number: i64) -> Self {
        Self::Number(number)
    }
}

impl From<NumberRange> for QualifierContent {
    fn from(range: NumberRange) -> Self {
        Self::NumberRange(range)
    }
}

impl fmt::Display for QualifierContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write_text(f, text),
            Self::Date(date) => date.fmt_literal(f),
            Self::DateRange(range) => write!(f, "{range}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::NumberRange(range) => write!(f, "{range}"),
        }
    }
}

/// A named predicate leaf, e.g. `label:bug`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Qualifier {
    /// Qualifier name as written.
    pub name: String,
    /// Parsed value.
    pub content: QualifierContent,
}

impl Qualifier {
    /// Name given to barewords and quoted free text.
    pub const KEYWORD: &'static str = "keyword";

    /// Creates a qualifier.
    pub fn new(name: impl Into<String>, content: impl Into<QualifierContent>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Creates a free-text `keyword` qualifier.
    pub fn keyword(text: impl Into<String>) -> Self {
        Self::new(Self::KEYWORD, QualifierContent::Text(text.into()))
    }

    /// Returns the text content, if this qualifier carries text.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            QualifierContent::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == Self::KEYWORD
            && let QualifierContent::Text(text) = &self.content
        {
            return write_text(f, text);
        }
        write_text(f, &self.name)?;
        write!(f, ":{}", self.content)
    }
}

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum FilterExpr {
    /// Matches every issue; the result of parsing empty input.
    Empty,
    /// A single qualifier.
    Qualifier(Qualifier),
    /// Both sides must match.
    Conjunction {
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// Either side must match.
    Disjunction {
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// The inner expression must not match.
    Negation {
        /// Negated expression.
        inner: Box<Self>,
    },
}

impl From<Qualifier> for FilterExpr {
    fn from(qualifier: Qualifier) -> Self {
        Self::Qualifier(qualifier)
    }
}

impl FilterExpr {
    /// The canonical empty expression.
    pub const EMPTY: Self = Self::Empty;

    /// Creates a qualifier leaf.
    pub fn qualifier(name: impl Into<String>, content: impl Into<QualifierContent>) -> Self {
        Self::Qualifier(Qualifier::new(name, content))
    }

    /// Creates a conjunction.
    pub fn and(left: Self, right: Self) -> Self {
        Self::Conjunction {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a disjunction.
    pub fn or(left: Self, right: Self) -> Self {
        Self::Disjunction {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a negation.
    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Self) -> Self {
        Self::Negation {
            inner: Box::new(inner),
        }
    }

    /// Returns true for the empty expression.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Rebuilds the tree keeping only qualifiers that satisfy `pred`.
    ///
    /// Operands that prune away entirely disappear: a binary node with one
    /// surviving side becomes that side, and a negation of nothing becomes
    /// [`FilterExpr::Empty`] rather than `NOT` of an empty expression.
    pub fn filter<P>(&self, pred: P) -> Self
    where
        P: Fn(&Qualifier) -> bool,
    {
        self.filter_with(&pred)
    }

    /// Recursive worker for [`FilterExpr::filter`].
    fn filter_with(&self, pred: &dyn Fn(&Qualifier) -> bool) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Qualifier(q) => {
                if pred(q) {
                    self.clone()
                } else {
                    Self::Empty
                }
            }
            Self::Conjunction { left, right } => {
                combine(left.filter_with(pred), right.filter_with(pred), Self::and)
            }
            Self::Disjunction { left, right } => {
                combine(left.filter_with(pred), right.filter_with(pred), Self::or)
            }
            Self::Negation { inner } => match inner.filter_with(pred) {
                Self::Empty => Self::Empty,
                kept => Self::not(kept),
            },
        }
    }

    /// Collects qualifiers satisfying `pred`, in left-to-right order.
    pub fn find<P>(&self, pred: P) -> Vec<&Qualifier>
    where
        P: Fn(&Qualifier) -> bool,
    {
        let mut found = Vec::new();
        self.visit(&mut |q| {
            if pred(q) {
                found.push(q);
            }
        });
        found
    }

    /// Names of all qualifiers in the tree, left to right, with duplicates.
    pub fn qualifier_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.visit(&mut |q| names.push(q.name.as_str()));
        names
    }

    /// Calls `f` on every qualifier leaf, left to right.
    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Qualifier)) {
        match self {
            Self::Empty => {}
            Self::Qualifier(q) => f(q),
            Self::Conjunction { left, right } | Self::Disjunction { left, right } => {
                left.visit(f);
                right.visit(f);
            }
            Self::Negation { inner } => inner.visit(f),
        }
    }

    /// Renders the tree structure, one node per line.
    pub fn to_tree_string(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    /// Writes the tree structure with the given indentation level.
    fn write_tree(&self, out: &mut String, indent: usize) {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Empty => out.push_str(&format!("{prefix}Empty\n")),
            Self::Qualifier(q) => out.push_str(&format!(
                "{prefix}Qualifier({:?}, {})\n",
                q.name,
                describe_content(&q.content)
            )),
            Self::Conjunction { left, right } => {
                out.push_str(&format!("{prefix}And\n"));
                left.write_tree(out, indent + 1);
                right.write_tree(out, indent + 1);
            }
            Self::Disjunction { left, right } => {
                out.push_str(&format!("{prefix}Or\n"));
                left.write_tree(out, indent + 1);
                right.write_tree(out, indent + 1);
            }
            Self::Negation { inner } => {
                out.push_str(&format!("{prefix}Not\n"));
                inner.write_tree(out, indent + 1);
            }
        }
    }
}

/// Joins two pruned operands, dropping whichever side became empty.
fn combine(left: FilterExpr, right: FilterExpr, join: fn(FilterExpr, FilterExpr) -> FilterExpr) -> FilterExpr {
    match (left, right) {
        (FilterExpr::Empty, FilterExpr::Empty) => FilterExpr::Empty,
        (FilterExpr::Empty, kept) | (kept, FilterExpr::Empty) => kept,
        (left, right) => join(left, right),
    }
}

/// Short description of qualifier content for tree output.
fn describe_content(content: &QualifierContent) -> String {
    match content {
        QualifierContent::Text(text) => format!("text {text:?}"),
        QualifierContent::Date(_) => format!("date {content}"),
        QualifierContent::DateRange(r) => format!("dates {content} strict={}", r.strict),
        QualifierContent::Number(_) => format!("number {content}"),
        QualifierContent::NumberRange(r) => format!("numbers {content} strict={}", r.strict),
    }
}

impl fmt::Display for FilterExpr {
    /// Writes query text that parses back to an equal tree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Qualifier(q) => write!(f, "{q}"),
            Self::Disjunction { left, right } => {
                write!(f, "{left} OR ")?;
                write_operand(f, right, matches!(**right, Self::Disjunction { .. }))
            }
            Self::Conjunction { left, right } => {
                write_operand(f, left, matches!(**left, Self::Disjunction { .. }))?;
                f.write_str(" AND ")?;
                write_operand(
                    f,
                    right,
                    matches!(
                        **right,
                        Self::Disjunction { .. } | Self::Conjunction { .. }
                    ),
                )
            }
            Self::Negation { inner } => {
                f.write_str("NOT ")?;
                write_operand(
                    f,
                    inner,
                    matches!(
                        **inner,
                        Self::Disjunction { .. } | Self::Conjunction { .. }
                    ),
                )
            }
        }
    }
}

/// Writes an operand, wrapped in parentheses when `group` is set.
fn write_operand(f: &mut fmt::Formatter<'_>, expr: &FilterExpr, group: bool) -> fmt::Result {
    if group {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

/// Writes text, quoting it when it would not lex back as a single symbol.
fn write_text(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    if needs_quotes(text) {
        write!(f, "\"{text}\"")
    } else {
        f.write_str(text)
    }
}

/// Returns true if `text` must be quoted to survive re-lexing.
fn needs_quotes(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return true;
    };
    matches!(first, '!' | '-' | '~')
        || text.starts_with("..")
        || matches!(text, "AND" | "OR" | "NOT")
        || text.chars().any(|c| {
            c.is_whitespace() || matches!(c, '(' | ')' | ':' | '"' | '&' | '|' | '<' | '>' | '*')
        })
}
