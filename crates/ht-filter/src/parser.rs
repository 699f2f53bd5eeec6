//! Filter parser.
//!
//! Parses a token stream into a [`FilterExpr`] using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! filter      → disjunction EOF
//! disjunction → conjunction (OR conjunction)*
//! conjunction → unary (AND? unary)*
//! unary       → NOT unary | primary
//! primary     → "(" disjunction ")" | SYMBOL ":" content | SYMBOL
//! ```
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`
//! 2. Negation: `NOT`, `!`, `-`, `~`
//! 3. AND (explicit or implicit, between adjacent terms)
//! 4. OR
//!
//! Both binary operators associate to the left.
//!
//! # Content
//!
//! Qualifier content is parsed according to the qualifier's value type.
//! Date and number qualifiers accept comparators (`<`, `<=`, `>`, `>=`) and
//! ranges (`a .. b`, `a .. *`, `* .. b`); a bare date matches that day and a
//! bare number means "less than". Anything that does not form such a value is
//! kept as text.

use chrono::NaiveDate;
use tracing::trace;

use crate::{
    ast::{FilterExpr, Qualifier, QualifierContent},
    error::ParseError,
    kind::{ValueType, value_type_of},
    lexer::{Token, TokenKind, tokenize},
    range::{Range, RangeBound, parse_date, parse_number},
};

/// Deepest expression tree a filter may produce.
///
/// Chained terms count too: `a b c` is two levels of conjunction.
pub const MAX_DEPTH: usize = 128;

/// A parsed expression with the height of its tree.
type Parsed = (FilterExpr, usize);

/// Recursive descent parser for filter expressions.
struct Parser<'a> {
    /// Token stream to parse; always ends with `Eof`.
    tokens: Vec<Token>,
    /// Current position in token stream.
    position: usize,
    /// The text being parsed, for error reporting.
    input: &'a str,
    /// Set while re-parsing the text of a quoted value as range content.
    nested: bool,
    /// Groups and negations currently open.
    nesting: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser over the tokens of `input`.
    fn new(input: &'a str) -> Self {
        Self {
            tokens: tokenize(input),
            position: 0,
            input,
            nested: false,
            nesting: 0,
        }
    }

    /// Parses the whole token stream.
    fn parse(mut self) -> Result<FilterExpr, ParseError> {
        if self.check(TokenKind::Eof) {
            return Ok(FilterExpr::Empty);
        }

        let (expr, _) = self.parse_disjunction()?;

        if !self.check(TokenKind::Eof) {
            return Err(self.unexpected());
        }

        Ok(expr)
    }

    /// Parses: disjunction → conjunction (OR conjunction)*
    fn parse_disjunction(&mut self) -> Result<Parsed, ParseError> {
        let (mut left, mut height) = self.parse_conjunction()?;

        while self.check(TokenKind::Or) {
            self.advance();
            let (right, right_height) = self.parse_conjunction()?;
            height = self.deepen(height.max(right_height))?;
            left = FilterExpr::or(left, right);
        }

        Ok((left, height))
    }

    /// Parses: conjunction → unary (AND? unary)*
    fn parse_conjunction(&mut self) -> Result<Parsed, ParseError> {
        let (mut left, mut height) = self.parse_unary()?;

        loop {
            if self.check(TokenKind::And) {
                self.advance();
            } else if !self.can_start_unary() {
                break;
            }
            let (right, right_height) = self.parse_unary()?;
            height = self.deepen(height.max(right_height))?;
            left = FilterExpr::and(left, right);
        }

        Ok((left, height))
    }

    /// Checks if the current token can start a unary expression.
    fn can_start_unary(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Symbol | TokenKind::Not | TokenKind::LParen
        )
    }

    /// Parses: unary → NOT unary | primary
    fn parse_unary(&mut self) -> Result<Parsed, ParseError> {
        if self.check(TokenKind::Not) {
            self.advance();
            self.enter()?;
            let (inner, height) = self.parse_unary()?;
            self.nesting -= 1;
            let height = self.deepen(height)?;
            return Ok((FilterExpr::not(inner), height));
        }

        self.parse_primary()
    }

    /// Parses: primary → "(" disjunction ")" | qualifier | bareword
    fn parse_primary(&mut self) -> Result<Parsed, ParseError> {
        match self.peek().kind {
            TokenKind::LParen => self.parse_group(),
            TokenKind::Symbol if self.peek_at(1).kind == TokenKind::Colon => {
                Ok((self.parse_qualifier()?, 1))
            }
            TokenKind::Symbol => {
                let text = self.advance().text;
                Ok((Qualifier::keyword(text).into(), 1))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Parses a parenthesized group, consuming the surrounding parentheses.
    fn parse_group(&mut self) -> Result<Parsed, ParseError> {
        self.advance();
        self.enter()?;
        let inner = self.parse_disjunction()?;
        self.nesting -= 1;

        if !self.check(TokenKind::RParen) {
            return Err(self.error("expected ')' to close '('"));
        }
        self.advance();

        Ok(inner)
    }

    /// Steps into a group or negation, bounding the parser's recursion.
    fn enter(&mut self) -> Result<(), ParseError> {
        self.nesting += 1;
        if self.nesting > MAX_DEPTH {
            return Err(self.too_deep());
        }
        Ok(())
    }

    /// Height of a node whose deepest child has `height`.
    fn deepen(&self, height: usize) -> Result<usize, ParseError> {
        if height >= MAX_DEPTH {
            return Err(self.too_deep());
        }
        Ok(height + 1)
    }

    /// Error for a filter whose tree would exceed [`MAX_DEPTH`].
    fn too_deep(&self) -> ParseError {
        self.error(format!("filter is nested more than {MAX_DEPTH} levels deep"))
    }

    /// Parses `name ":" content`; the current token is the name.
    fn parse_qualifier(&mut self) -> Result<FilterExpr, ParseError> {
        let name = self.advance().text;
        self.advance();

        let content = self.parse_content(&name)?;
        trace!(qualifier = %name, ?content, "parsed qualifier");
        Ok(FilterExpr::qualifier(name, content))
    }

    /// Parses qualifier content according to the qualifier's value type.
    fn parse_content(&mut self, name: &str) -> Result<QualifierContent, ParseError> {
        let value_type = value_type_of(name);
        let next = self.peek();
        let empty = match next.kind {
            TokenKind::Symbol => {
                next.text.is_empty() || self.peek_at(1).kind == TokenKind::Colon
            }
            TokenKind::Lt | TokenKind::Lte | TokenKind::Gt | TokenKind::Gte | TokenKind::Star => {
                matches!(value_type, ValueType::Text | ValueType::Integer)
            }
            _ => true,
        };
        if empty {
            return Err(self.error(format!("empty content for qualifier '{name}'")));
        }

        match value_type {
            ValueType::Text => Ok(QualifierContent::Text(self.advance().text)),
            ValueType::Integer => {
                let text = self.advance().text;
                Ok(parse_number(&text).map_or(QualifierContent::Text(text), QualifierContent::Number))
            }
            ValueType::Date => self.parse_typed::<NaiveDate>(),
            ValueType::Number => self.parse_typed::<i64>(),
        }
    }

    /// Parses date or number content: a comparator, a range or a lone bound.
    fn parse_typed<T: TypedBound>(&mut self) -> Result<QualifierContent, ParseError> {
        let token = self.advance();
        let range = match token.kind {
            TokenKind::Lt => Range::strict(None, Some(self.expect_bound::<T>(&token)?)),
            TokenKind::Lte => Range::new(None, Some(self.expect_bound::<T>(&token)?)),
            TokenKind::Gt => Range::strict(Some(self.expect_bound::<T>(&token)?), None),
            TokenKind::Gte => Range::new(Some(self.expect_bound::<T>(&token)?), None),
            TokenKind::Star => {
                if !self.check(TokenKind::Ellipsis) {
                    return Err(self.error("expected '..' after '*'"));
                }
                let ellipsis = self.advance();
                if self.check(TokenKind::Star) {
                    return Err(self.error("a range needs at least one bound"));
                }
                Range::new(None, Some(self.expect_bound::<T>(&ellipsis)?))
            }
            TokenKind::Symbol => match T::literal(&token.text) {
                Some(from) if self.check(TokenKind::Ellipsis) => {
                    let ellipsis = self.advance();
                    if self.check(TokenKind::Star) {
                        self.advance();
                        Range::new(Some(from), None)
                    } else {
                        let to = self.expect_bound::<T>(&ellipsis)?;
                        Range {
                            from: Some(from),
                            to: Some(to),
                            strict: T::STRICT_BOUNDED,
                        }
                    }
                }
                Some(value) => return Ok(value.bare()),
                None if self.nested => {
                    return Err(ParseError::new(
                        format!("'{}' is not a {}", token.text, T::WANTED),
                        token.position,
                        self.input,
                    ));
                }
                None => {
                    return Ok(reparse_quoted::<T>(&token.text)
                        .unwrap_or(QualifierContent::Text(token.text)));
                }
            },
            kind => {
                return Err(ParseError::new(
                    format!("unexpected {kind}"),
                    token.position,
                    self.input,
                ));
            }
        };
        Ok(T::content(range))
    }

    /// Consumes a bound literal following the operator token `after`.
    fn expect_bound<T: TypedBound>(&mut self, after: &Token) -> Result<T, ParseError> {
        let token = self.peek();
        if token.kind == TokenKind::Symbol
            && let Some(value) = T::literal(&token.text)
        {
            self.advance();
            return Ok(value);
        }
        let message = if after.kind == TokenKind::Ellipsis {
            format!("expected a {} or '*' after '..'", T::WANTED)
        } else {
            format!("expected a {} after '{}'", T::WANTED, after.text)
        };
        Err(self.error(message))
    }

    /// Builds an error at the current token.
    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.peek().position, self.input)
    }

    /// Builds an error describing the current token as unexpected.
    fn unexpected(&self) -> ParseError {
        match self.peek().kind {
            TokenKind::Eof => self.error("unexpected end of input"),
            kind => self.error(format!("unexpected {kind}")),
        }
    }

    /// Returns the current token.
    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Returns the token `offset` places ahead, clamped to `Eof`.
    fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + offset).min(last)]
    }

    /// Checks if the current token has the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consumes and returns the current token; never moves past `Eof`.
    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
        token
    }
}

/// Bound types accepted by typed qualifier content.
trait TypedBound: RangeBound {
    /// Name of the bound type in error messages.
    const WANTED: &'static str;
    /// Whether `a .. b` excludes its bounds.
    const STRICT_BOUNDED: bool;

    /// Parses a bound literal.
    fn literal(text: &str) -> Option<Self>;

    /// Content for a lone bound written without an operator.
    fn bare(self) -> QualifierContent;

    /// Wraps a range as qualifier content.
    fn content(range: Range<Self>) -> QualifierContent;
}

impl TypedBound for NaiveDate {
    const WANTED: &'static str = "date";
    const STRICT_BOUNDED: bool = false;

    fn literal(text: &str) -> Option<Self> {
        parse_date(text)
    }

    fn bare(self) -> QualifierContent {
        QualifierContent::Date(self)
    }

    fn content(range: Range<Self>) -> QualifierContent {
        QualifierContent::DateRange(range)
    }
}

impl TypedBound for i64 {
    const WANTED: &'static str = "number";
    const STRICT_BOUNDED: bool = true;

    fn literal(text: &str) -> Option<Self> {
        parse_number(text)
    }

    // "updated:24" reads as "updated less than 24 days ago".
    fn bare(self) -> QualifierContent {
        QualifierContent::NumberRange(Range::strict(None, Some(self)))
    }

    fn content(range: Range<Self>) -> QualifierContent {
        QualifierContent::NumberRange(range)
    }
}

/// Re-reads the text of a quoted value as typed content.
///
/// Returns `None` unless the whole text forms a comparator, range or bound,
/// so `created:" > 2014-5-1 "` means `created:>2014-5-1` while
/// `created:"a b"` stays text.
fn reparse_quoted<T: TypedBound>(text: &str) -> Option<QualifierContent> {
    let mut parser = Parser::new(text);
    parser.nested = true;
    if parser.check(TokenKind::Eof) {
        return None;
    }
    let content = parser.parse_typed::<T>().ok()?;
    parser.check(TokenKind::Eof).then_some(content)
}

/// Parses filter text into an expression.
///
/// Empty or whitespace-only input yields [`FilterExpr::Empty`].
pub fn parse(input: &str) -> Result<FilterExpr, ParseError> {
    trace!(query = input, "parsing filter");
    Parser::new(input).parse()
}

/// Parses optional filter text.
///
/// `None` means no filter is configured and yields `Ok(None)`, which is
/// distinct from parsing the empty string.
pub fn parse_optional(input: Option<&str>) -> Result<Option<FilterExpr>, ParseError> {
    input.map(parse).transpose()
}
