//! Filter query language for issue lists.
//!
//! A filter is a compact boolean query over issue fields:
//!
//! - **Keywords**: `crash` - words in the title or body
//! - **Qualifiers**: `label:bug`, `milestone:0.4`, `state:open`
//! - **Dates**: `created:>=2014-6-1`, `created:2014-1-1 .. 2014-6-1`
//! - **Numbers**: `updated:7` - updated less than 7 days ago
//! - **Negation**: `-label:wontfix`, `NOT state:closed`
//! - **AND/OR**: `a b`, `a AND b`, `a OR b`, with `AND` binding tighter
//! - **Grouping**: `(label:a OR label:b) state:open`
//!
//! Parsed filters are immutable [`FilterExpr`] trees that evaluate against
//! any [`IssueAccessor`] and print back as query text that parses to an
//! equal tree.
//!
//! # Example
//!
//! ```
//! use ht_filter::parse;
//!
//! let filter = parse("milestone:0.4 state:open OR label:urgent").unwrap();
//! assert_eq!(filter.to_string(), "milestone:0.4 AND state:open OR label:urgent");
//! assert_eq!(filter.qualifier_names(), vec!["milestone", "state", "label"]);
//! ```

#![warn(missing_docs)]

mod apply;
mod ast;
mod error;
mod eval;
mod kind;
mod lexer;
mod parser;
mod range;

pub use apply::{FieldChange, IssueMutator};
pub use ast::{FilterExpr, Qualifier, QualifierContent};
pub use error::{ApplyError, ParseError};
pub use eval::{IssueAccessor, MetaQualifierInfo, parse_issue_ref};
pub use kind::{KNOWN_QUALIFIERS, QualifierKind, ValueType, value_type_of};
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::{MAX_DEPTH, parse, parse_optional};
pub use range::{DateRange, NumberRange, Range, RangeBound, parse_date, parse_number};
