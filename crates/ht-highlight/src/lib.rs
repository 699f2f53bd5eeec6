//! Syntax highlighting and terminal colors for ht.
//!
//! This crate provides syntax-highlighted output of configuration files, colouring of filter
//! queries, and styled terminal output for headers and status messages.

#![warn(missing_docs)]

use ht_filter::{Token, TokenKind, tokenize};
use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// A syntax highlighter that can highlight code for terminal output.
pub struct Highlighter {
    /// The syntax set containing language definitions (including TOML).
    syntax_set: SyntaxSet,
    /// The theme set containing color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// The theme to use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a new highlighter with the default theme (Dracula).
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights TOML content for terminal output.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights content with the specified syntax for terminal output.
    ///
    /// If the syntax is not found, returns the content unchanged.
    fn highlight(&self, content: &str, syntax_name: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&escaped);
        }
        // Reset terminal colors at the end
        output.push_str("\x1b[0m");
        output
    }
}

/// ANSI color codes for terminal output.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for headers and qualifier names).
    pub const CYAN: &str = "\x1b[36m";
    /// Green text (for success and values).
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow text (for warnings and operators).
    pub const YELLOW: &str = "\x1b[33m";
    /// Magenta text (for range syntax).
    pub const MAGENTA: &str = "\x1b[35m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Colours filter query text for the terminal.
///
/// Qualifier names are cyan, values green, boolean operators bold yellow and
/// range syntax magenta. Whitespace and quoting are kept exactly as written.
pub fn paint_query(query: &str) -> String {
    let chars: Vec<char> = query.chars().collect();
    let tokens = tokenize(query);
    let mut output = String::new();
    let mut after_colon = false;

    for (i, token) in tokens.iter().enumerate() {
        let Some(next) = tokens.get(i + 1) else {
            break;
        };
        let span: String = chars[token.position..next.position].iter().collect();
        let text = span.trim_end();
        let gap = &span[text.len()..];

        let style = token_style(token, next, after_colon);
        after_colon = token.kind == TokenKind::Colon
            || (after_colon && is_range_syntax(token.kind));

        match style {
            Some(style) => output.push_str(&format!("{style}{text}{}", colors::RESET)),
            None => output.push_str(text),
        }
        output.push_str(gap);
    }

    // Leading whitespace precedes the first token.
    let leading: String = chars
        .iter()
        .take(tokens.first().map_or(0, |t| t.position))
        .collect();
    format!("{leading}{output}")
}

/// Returns true for tokens that continue a date or number value.
fn is_range_syntax(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Lt
            | TokenKind::Lte
            | TokenKind::Gt
            | TokenKind::Gte
            | TokenKind::Ellipsis
            | TokenKind::Star
    )
}

/// Chooses the style for one token; `None` leaves it unstyled.
fn token_style(token: &Token, next: &Token, after_colon: bool) -> Option<String> {
    match token.kind {
        TokenKind::Symbol if next.kind == TokenKind::Colon => Some(colors::CYAN.to_string()),
        TokenKind::Symbol if after_colon => Some(colors::GREEN.to_string()),
        TokenKind::Symbol | TokenKind::Eof => None,
        TokenKind::And | TokenKind::Or | TokenKind::Not => {
            Some(format!("{}{}", colors::BOLD, colors::YELLOW))
        }
        TokenKind::Colon | TokenKind::LParen | TokenKind::RParen => Some(colors::DIM.to_string()),
        TokenKind::Lt
        | TokenKind::Lte
        | TokenKind::Gt
        | TokenKind::Gte
        | TokenKind::Ellipsis
        | TokenKind::Star => Some(colors::MAGENTA.to_string()),
    }
}

/// Formats a header with bold cyan styling.
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a success message (green).
pub fn success(text: &str) -> String {
    format!("{}{}{}", colors::GREEN, text, colors::RESET)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Removes ANSI escape sequences.
    fn strip(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn highlighter_toml() {
        let hl = Highlighter::new();
        let toml = "[settings]\nlimit = 5\n";
        let output = hl.highlight_toml(toml);
        assert!(output.contains("\x1b["));
        assert!(output.ends_with("\x1b[0m"));
        assert_eq!(strip(&output), toml);
    }

    #[test]
    fn toml_syntax_available() {
        let ss = extra_syntaxes();
        assert!(ss.find_syntax_by_extension("toml").is_some());
    }

    #[test]
    fn paint_preserves_text() {
        for query in [
            "",
            "  a   b  ",
            "milestone:0.4 state:open OR label:urgent",
            "created : >= 2014-06-01",
            "label:\"help wanted\" -(a || b)",
            "updated:1 .. *",
            "a \"unterminated",
            "é:x",
        ] {
            assert_eq!(strip(&paint_query(query)), query, "{query:?}");
        }
    }

    #[test]
    fn paint_colours_parts() {
        let painted = paint_query("label:bug OR x");
        assert!(painted.contains(&format!("{}label{}", colors::CYAN, colors::RESET)));
        assert!(painted.contains(&format!("{}bug{}", colors::GREEN, colors::RESET)));
        assert!(painted.contains(&format!("{}{}OR{}", colors::BOLD, colors::YELLOW, colors::RESET)));
        assert!(painted.ends_with(" x"));
    }

    #[test]
    fn paint_colours_range_values() {
        let painted = paint_query("updated:1 .. 24");
        assert!(painted.contains(&format!("{}24{}", colors::GREEN, colors::RESET)));
        assert!(painted.contains(&format!("{}..{}", colors::MAGENTA, colors::RESET)));
    }

    #[test]
    fn header_formatting() {
        let h = header("Test");
        assert!(h.contains(colors::BOLD));
        assert!(h.contains(colors::CYAN));
        assert!(h.ends_with(colors::RESET));
    }

    #[test]
    fn status_formatting() {
        assert_eq!(strip(&dim("faint")), "faint");
        assert!(success("ok").starts_with(colors::GREEN));
        assert!(warning("careful").starts_with(colors::YELLOW));
    }
}
