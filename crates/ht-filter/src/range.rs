//! Date and number ranges used as qualifier content.

use std::fmt;

use chrono::{Datelike, NaiveDate};
#[cfg(feature = "serde")]
use serde::Serialize;

/// Bound types that can appear in a range literal.
pub trait RangeBound: Copy + Ord {
    /// Writes the bound the way the query language spells it.
    fn fmt_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl RangeBound for i64 {
    fn fmt_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl RangeBound for NaiveDate {
    fn fmt_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year(), self.month(), self.day())
    }
}

/// An interval that may be open on either side.
///
/// With `strict` set, both boundaries are exclusive; otherwise inclusive. A
/// missing bound leaves that side unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Range<T> {
    /// Lower bound, if any.
    pub from: Option<T>,
    /// Upper bound, if any.
    pub to: Option<T>,
    /// Whether the boundaries are exclusive.
    pub strict: bool,
}

/// A range of calendar days.
pub type DateRange = Range<NaiveDate>;

/// A range of integers.
pub type NumberRange = Range<i64>;

impl<T: RangeBound> Range<T> {
    /// Creates an inclusive range.
    pub fn new(from: Option<T>, to: Option<T>) -> Self {
        Self {
            from,
            to,
            strict: false,
        }
    }

    /// Creates a range with exclusive boundaries.
    pub fn strict(from: Option<T>, to: Option<T>) -> Self {
        Self {
            from,
            to,
            strict: true,
        }
    }

    /// Returns true if `value` lies within the range.
    pub fn encloses(&self, value: T) -> bool {
        let above = self.from.is_none_or(|from| {
            if self.strict {
                value > from
            } else {
                value >= from
            }
        });
        let below = self.to.is_none_or(|to| {
            if self.strict {
                value < to
            } else {
                value <= to
            }
        });
        above && below
    }
}

impl<T: RangeBound> fmt::Display for Range<T> {
    /// Writes the shortest literal that parses back to this range.
    ///
    /// Bounded ranges and half-open ranges whose strictness differs from what
    /// `..` produces have no exact literal; they print as `a .. b` or `a .. *`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from, self.to) {
            (Some(from), Some(to)) => {
                from.fmt_literal(f)?;
                f.write_str(" .. ")?;
                to.fmt_literal(f)
            }
            (Some(from), None) => {
                f.write_str(if self.strict { ">" } else { ">=" })?;
                from.fmt_literal(f)
            }
            (None, Some(to)) => {
                f.write_str(if self.strict { "<" } else { "<=" })?;
                to.fmt_literal(f)
            }
            (None, None) => f.write_str("* .. *"),
        }
    }
}

/// Parses a `YYYY-M-D` date literal. Month and day may omit leading zeros.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if year.len() != 4 || !all_digits(year) || !all_digits(month) || !all_digits(day) {
        return None;
    }
    if month.len() > 2 || day.len() > 2 {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Parses an integer literal (digits only, no sign).
pub fn parse_number(text: &str) -> Option<i64> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
