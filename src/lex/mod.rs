pub mod classifier;
pub mod error;
pub mod lexer;
pub mod source;
pub mod tokenizer;
pub mod types;

pub use classifier::{Classifier, ClassifierBuilder, UnknownPolicy};
pub use error::TokenizeError;
pub use lexer::Lexer;
pub use source::{CharSource, PushbackReader};
pub use tokenizer::Tokenizer;
pub use types::{CharClass, Token, TokenKind};
