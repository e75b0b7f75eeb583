//! Word-level iterator over the tokenizer.
//!
//! Comments are dropped; words, pipes and redirects are surfaced as plain
//! strings.

use std::io::BufRead;

use super::classifier::Classifier;
use super::error::TokenizeError;
use super::source::{CharSource, PushbackReader};
use super::tokenizer::Tokenizer;

/// Produces the words of a stream, skipping comments.
///
/// As an iterator it stops after the first error.
pub struct Lexer<'c, S> {
    tokenizer: Tokenizer<'c, S>,
    failed: bool,
}

impl<R: BufRead> Lexer<'static, PushbackReader<R>> {
    pub fn new(reader: R) -> Self {
        Self::from_tokenizer(Tokenizer::new(reader))
    }
}

impl<'c, R: BufRead> Lexer<'c, PushbackReader<R>> {
    pub fn with_classifier(reader: R, classifier: &'c Classifier) -> Self {
        Self::from_tokenizer(Tokenizer::with_classifier(reader, classifier))
    }
}

impl<'c, S: CharSource> Lexer<'c, S> {
    pub fn from_tokenizer(tokenizer: Tokenizer<'c, S>) -> Self {
        Self {
            tokenizer,
            failed: false,
        }
    }

    /// Next non-comment token value, `Ok(None)` at end of input.
    pub fn next_word(&mut self) -> Result<Option<String>, TokenizeError> {
        while let Some(token) = self.tokenizer.next_token()? {
            if token.is_comment() {
                log::trace!("skipping comment {:?}", token.value);
                continue;
            }
            return Ok(Some(token.value));
        }
        Ok(None)
    }
}

impl<S: CharSource> Iterator for Lexer<'_, S> {
    type Item = Result<String, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = self.next_word().transpose();
        if matches!(next, Some(Err(_))) {
            self.failed = true;
        }
        next
    }
}

impl<S: CharSource> std::iter::FusedIterator for Lexer<'_, S> {}
