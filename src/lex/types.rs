//! Types produced by the tokenizer and consumed by the word layer.

use serde::Serialize;

/// Syntactic role of a single input character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Plain word character.
    Ordinary,
    /// Separates words outside of quotes.
    Whitespace,
    /// `"` — contents may still be escaped.
    EscapingQuote,
    /// `'` — contents are literal.
    NonEscapingQuote,
    /// `\`
    EscapeMarker,
    /// `#` — starts a comment when seen between tokens.
    CommentMarker,
    /// `|`
    Pipe,
    /// `<` or `>`
    Redirect,
    /// No more characters in the source.
    EndOfStream,
}

/// Kind of a completed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Word,
    Pipe,
    Redirect,
    Comment,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Word => "word",
            TokenKind::Pipe => "pipe",
            TokenKind::Redirect => "redirect",
            TokenKind::Comment => "comment",
        }
    }
}

/// A classified, contiguous unit of input text.
///
/// Quotes and escape markers that only shape a word are not part of its
/// `value`: `a"b c"` yields a single word `ab c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn word(value: impl Into<String>) -> Self {
        Self::new(TokenKind::Word, value)
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{:?}", self.kind.as_str(), self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_compare_by_kind_and_value() {
        assert_eq!(Token::word("ls"), Token::new(TokenKind::Word, "ls"));
        assert_ne!(Token::word("|"), Token::new(TokenKind::Pipe, "|"));
        assert_ne!(Token::word("a"), Token::word("b"));
    }

    #[test]
    fn display_shows_kind_and_quoted_value() {
        assert_eq!(
            Token::new(TokenKind::Redirect, ">>").to_string(),
            "redirect:\">>\""
        );
    }

    #[test]
    fn serializes_kind_lowercase() {
        let json = serde_json::to_string(&Token::new(TokenKind::Pipe, "|")).unwrap();
        assert_eq!(json, r#"{"kind":"pipe","value":"|"}"#);
    }
}
