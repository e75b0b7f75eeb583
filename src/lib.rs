//! shsplit: shell-style splitting of command lines into typed tokens.
//!
//! Input is read one character at a time, classified by a [`Classifier`],
//! and fed through a small state machine in [`Tokenizer`] that honours
//! whitespace separation, single and double quotes, backslash escapes,
//! comments, pipes and redirects (`<`, `>`, `<<`, `>>`). Nothing is expanded
//! or executed.
//!
//! # Architecture
//!
//! - **[`lex`]** — Classifier, pushback character source, tokenizer state machine, word iterator.
//! - **[`config`]** — Classifier configuration: built-in defaults + user overlay merge.
//! - **[`logging`]** — stderr log backend for the `shsplit` binary.
//!
//! ```
//! let words = shsplit::split(r#"grep -n "two words" notes.txt | wc -l"#).unwrap();
//! assert_eq!(words, ["grep", "-n", "two words", "notes.txt", "|", "wc", "-l"]);
//! ```

/// Classifier configuration, loading, and overlay merge logic.
pub mod config;
/// Tokenizer core: character classes, state machine, word iterator.
pub mod lex;
/// Log backend setup.
pub mod logging;

pub use lex::{Classifier, Lexer, Token, TokenKind, TokenizeError, Tokenizer};

/// Split `s` into words with the canonical classifier, dropping comments.
///
/// Pipes and redirects are returned as words of their own.
pub fn split(s: &str) -> Result<Vec<String>, TokenizeError> {
    Lexer::new(s.as_bytes()).collect()
}

/// Like [`split`], with an explicit classifier.
pub fn split_with(s: &str, classifier: &Classifier) -> Result<Vec<String>, TokenizeError> {
    Lexer::with_classifier(s.as_bytes(), classifier).collect()
}

/// All tokens of `s`, comments included, with their kinds.
pub fn tokenize(s: &str) -> Result<Vec<Token>, TokenizeError> {
    Tokenizer::new(s.as_bytes()).collect()
}

/// Like [`tokenize`], with an explicit classifier.
pub fn tokenize_with(s: &str, classifier: &Classifier) -> Result<Vec<Token>, TokenizeError> {
    Tokenizer::with_classifier(s.as_bytes(), classifier).collect()
}
