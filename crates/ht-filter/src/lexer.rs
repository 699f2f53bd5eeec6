//! Filter lexer (tokenizer).
//!
//! Converts filter text into a flat token sequence for the parser. Lexing is
//! total: every input produces tokens, and the sequence always ends with a
//! single [`TokenKind::Eof`].

use std::{fmt, iter::Peekable, str::Chars};

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A bare or quoted word.
    Symbol,
    /// `:`
    Colon,
    /// `AND`, `&` or `&&`.
    And,
    /// `OR`, `|` or `||`.
    Or,
    /// `NOT`, `!`, `-` or `~`.
    Not,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// The range separator `..`.
    Ellipsis,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// The unbounded range marker `*`.
    Star,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Short human-readable name used in error messages and token dumps.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Colon => "':'",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Ellipsis => "'..'",
            Self::Lt => "'<'",
            Self::Lte => "'<='",
            Self::Gt => "'>'",
            Self::Gte => "'>='",
            Self::Star => "'*'",
            Self::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token in the filter language.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source text of the token; quoted symbols carry their unquoted interior.
    pub text: String,
    /// Character offset of the token's first character.
    pub position: usize,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }
}

/// Returns true for characters that end a bare symbol.
fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | ':' | '"' | '&' | '|' | '<' | '>' | '*')
}

/// Tokenizes filter text.
struct Lexer<'a> {
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Character offset of the next character.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Tokenizes the entire input.
    fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token() {
            tokens.push(token);
        }

        tokens.push(Token::new(TokenKind::Eof, "", self.position));
        tokens
    }

    /// Returns the next token, or None at end of input.
    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace();

        let start = self.position;
        let ch = self.advance()?;

        let token = match ch {
            '"' => self.read_quoted(start),
            '(' => Token::new(TokenKind::LParen, "(", start),
            ')' => Token::new(TokenKind::RParen, ")", start),
            ':' => Token::new(TokenKind::Colon, ":", start),
            '*' => Token::new(TokenKind::Star, "*", start),
            '!' | '-' | '~' => Token::new(TokenKind::Not, ch.to_string(), start),
            '&' => self.doubled(ch, TokenKind::And, start),
            '|' => self.doubled(ch, TokenKind::Or, start),
            '<' => self.comparison(ch, TokenKind::Lt, TokenKind::Lte, start),
            '>' => self.comparison(ch, TokenKind::Gt, TokenKind::Gte, start),
            '.' if self.chars.peek() == Some(&'.') => {
                self.advance();
                Token::new(TokenKind::Ellipsis, "..", start)
            }
            _ => self.read_symbol(ch, start),
        };

        Some(token)
    }

    /// Reads an operator that may be written single or doubled (`&`/`&&`).
    fn doubled(&mut self, ch: char, kind: TokenKind, start: usize) -> Token {
        if self.chars.peek() == Some(&ch) {
            self.advance();
            Token::new(kind, format!("{ch}{ch}"), start)
        } else {
            Token::new(kind, ch.to_string(), start)
        }
    }

    /// Reads `<`/`<=` or `>`/`>=`.
    fn comparison(
        &mut self,
        ch: char,
        strict: TokenKind,
        inclusive: TokenKind,
        start: usize,
    ) -> Token {
        if self.chars.peek() == Some(&'=') {
            self.advance();
            Token::new(inclusive, format!("{ch}="), start)
        } else {
            Token::new(strict, ch.to_string(), start)
        }
    }

    /// Reads a quoted segment; the opening quote is already consumed.
    ///
    /// An unterminated quote takes the rest of the input literally.
    fn read_quoted(&mut self, start: usize) -> Token {
        let mut content = String::new();

        while let Some(ch) = self.advance() {
            if ch == '"' {
                break;
            }
            content.push(ch);
        }

        Token::new(TokenKind::Symbol, content, start)
    }

    /// Reads a bare symbol starting with `first`, recognising keywords.
    fn read_symbol(&mut self, first: char, start: usize) -> Token {
        let mut word = String::from(first);

        while let Some(&ch) = self.chars.peek() {
            if is_delimiter(ch) {
                break;
            }
            word.push(ch);
            self.advance();
        }

        let kind = match word.as_str() {
            "AND" => TokenKind::And,
            "OR" => TokenKind::Or,
            "NOT" => TokenKind::Not,
            _ => TokenKind::Symbol,
        };

        Token::new(kind, word, start)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consumes and returns the next character.
    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position += 1;
        Some(ch)
    }
}

/// Tokenizes filter text. Never fails; the result always ends with `Eof`.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    fn texts(input: &str) -> Vec<String> {
        tokenize(input).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokenize(""), vec![Token::new(TokenKind::Eof, "", 0)]);
    }

    #[test]
    fn whitespace_only() {
        assert_eq!(tokenize(" \t\n "), vec![Token::new(TokenKind::Eof, "", 4)]);
    }

    #[test]
    fn apostrophes_stay_in_symbols() {
        assert_eq!(texts("a' b' c'"), vec!["a'", "b'", "c'", ""]);
        assert_eq!(
            kinds("a' b' c'"),
            vec![
                TokenKind::Symbol,
                TokenKind::Symbol,
                TokenKind::Symbol,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn qualifier() {
        assert_eq!(
            tokenize("label:bug"),
            vec![
                Token::new(TokenKind::Symbol, "label", 0),
                Token::new(TokenKind::Colon, ":", 5),
                Token::new(TokenKind::Symbol, "bug", 6),
                Token::new(TokenKind::Eof, "", 9),
            ]
        );
    }

    #[test]
    fn operators() {
        assert_eq!(
            kinds("& && | || ! - ~ AND OR NOT"),
            vec![
                TokenKind::And,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Not,
                TokenKind::Not,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn keywords_are_case_sensitive_whole_words() {
        assert_eq!(
            kinds("and or ANDROID ORder"),
            vec![
                TokenKind::Symbol,
                TokenKind::Symbol,
                TokenKind::Symbol,
                TokenKind::Symbol,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn comparisons_and_ranges() {
        assert_eq!(
            kinds("< <= > >= .. *"),
            vec![
                TokenKind::Lt,
                TokenKind::Lte,
                TokenKind::Gt,
                TokenKind::Gte,
                TokenKind::Ellipsis,
                TokenKind::Star,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn comparison_without_spaces() {
        assert_eq!(
            texts("updated:>=24"),
            vec!["updated", ":", ">=", "24", ""]
        );
    }

    #[test]
    fn dashes_and_dots_inside_symbols() {
        assert_eq!(texts("2014-6-1 priority.high 1..2"), vec![
            "2014-6-1",
            "priority.high",
            "1..2",
            ""
        ]);
    }

    #[test]
    fn leading_dash_is_negation() {
        assert_eq!(
            kinds("-milestone:"),
            vec![
                TokenKind::Not,
                TokenKind::Symbol,
                TokenKind::Colon,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn quoted_symbol_keeps_interior_whitespace() {
        let tokens = tokenize("created:\" > 2014-5-1 \"");
        assert_eq!(tokens[2], Token::new(TokenKind::Symbol, " > 2014-5-1 ", 8));
        assert_eq!(tokens[3].kind, TokenKind::Eof);
    }

    #[test]
    fn quoted_keyword_is_a_symbol() {
        assert_eq!(kinds("\"AND\""), vec![TokenKind::Symbol, TokenKind::Eof]);
    }

    #[test]
    fn unterminated_quote_takes_remainder() {
        let tokens = tokenize("a \"b c");
        assert_eq!(tokens[1], Token::new(TokenKind::Symbol, "b c", 2));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn parentheses_split_symbols() {
        assert_eq!(texts("a(b)"), vec!["a", "(", "b", ")", ""]);
    }

    #[test]
    fn positions_count_characters() {
        let tokens = tokenize("é:x");
        assert_eq!(tokens[1].position, 1);
        assert_eq!(tokens[2].position, 2);
        assert_eq!(tokens[3].position, 3);
    }

    #[test]
    fn exactly_one_eof() {
        let tokens = tokenize("a OR (b c) -d");
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        assert_eq!(eofs, 1);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }
}
