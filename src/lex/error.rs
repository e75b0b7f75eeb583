//! Errors returned by the tokenizer.
//!
//! Every error ends the current `next_token` call. Resuming a tokenizer that
//! has returned an error is unsupported: its position in the source is
//! unspecified.

/// Failure while producing a token.
#[derive(thiserror::Error, Debug)]
pub enum TokenizeError {
    /// Input ended right after an escape marker.
    #[error("unterminated escape: input ended after '\\'")]
    UnterminatedEscape,

    /// Input ended inside a quoted region.
    #[error("unterminated quote: missing closing {quote}")]
    UnterminatedQuote { quote: char },

    /// A character outside every registered class (strict classifiers only).
    #[error("unclassifiable character {0:?}")]
    UnclassifiableCharacter(char),

    /// The character source failed for a reason other than end of input.
    #[error("failed to read input")]
    SourceRead(#[from] std::io::Error),
}
