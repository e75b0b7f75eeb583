//! Character classification.
//!
//! A [`Classifier`] maps each character to a [`CharClass`]. It is built once
//! and never mutated afterwards, so one instance can back any number of
//! tokenizers.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::types::CharClass;
use crate::config::Config;

/// Letters, digits and the punctuation that may appear unquoted in a word.
pub const ORDINARY: &str = concat!(
    "abcdefghijklmnopqrstuvwxyz",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "0123456789",
    "._-,/@$*()+=:;&^%~!?[]{}",
);
pub const WHITESPACE: &str = " \t\r\n";
pub const ESCAPING_QUOTE: &str = "\"";
pub const NON_ESCAPING_QUOTE: &str = "'";
pub const ESCAPE: &str = "\\";
pub const COMMENT: &str = "#";
pub const PIPE: &str = "|";
pub const REDIRECT: &str = "<>";

static SHARED: LazyLock<Classifier> = LazyLock::new(Classifier::new);

/// What to do with a character no class claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPolicy {
    /// Tokenizing fails with `UnclassifiableCharacter`.
    #[default]
    Reject,
    /// The character is treated as part of a word.
    Ordinary,
}

/// Immutable character → class table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    table: HashMap<char, CharClass>,
    unknown: UnknownPolicy,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    /// The canonical strict classifier: comments enabled, unknown characters rejected.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Canonical classes without comment syntax; `#` is an ordinary character.
    pub fn without_comments() -> Self {
        Self::builder().comments(false).build()
    }

    /// Process-wide canonical classifier, created on first use.
    pub fn shared() -> &'static Classifier {
        &SHARED
    }

    pub fn builder() -> ClassifierBuilder {
        ClassifierBuilder::canonical()
    }

    /// Build a classifier from the `[classes]` and `[settings]` tables of a config.
    pub fn from_config(config: &Config) -> Self {
        let c = &config.classes;
        ClassifierBuilder::empty()
            .add(CharClass::Ordinary, &c.ordinary)
            .add(CharClass::Whitespace, &c.whitespace)
            .add(CharClass::EscapingQuote, &c.escaping_quote)
            .add(CharClass::NonEscapingQuote, &c.non_escaping_quote)
            .add(CharClass::EscapeMarker, &c.escape)
            .add(CharClass::CommentMarker, &c.comment)
            .add(CharClass::Pipe, &c.pipe)
            .add(CharClass::Redirect, &c.redirect)
            .comments(config.settings.comments)
            .unknown(config.settings.unknown)
            .build()
    }

    /// Class of `ch`, or `None` when no class claims it under a rejecting policy.
    pub fn classify(&self, ch: char) -> Option<CharClass> {
        match self.table.get(&ch) {
            Some(class) => Some(*class),
            None => match self.unknown {
                UnknownPolicy::Reject => None,
                UnknownPolicy::Ordinary => Some(CharClass::Ordinary),
            },
        }
    }

    pub fn has_comments(&self) -> bool {
        self.table.values().any(|c| *c == CharClass::CommentMarker)
    }
}

/// Registers character sets class by class.
///
/// Registration order matters only when sets overlap: the class added last
/// wins for a shared character. The canonical sets are disjoint.
#[derive(Debug, Clone)]
pub struct ClassifierBuilder {
    classes: Vec<(CharClass, String)>,
    comments: bool,
    unknown: UnknownPolicy,
}

impl ClassifierBuilder {
    fn empty() -> Self {
        Self {
            classes: Vec::new(),
            comments: true,
            unknown: UnknownPolicy::Reject,
        }
    }

    fn canonical() -> Self {
        Self::empty()
            .add(CharClass::Ordinary, ORDINARY)
            .add(CharClass::Whitespace, WHITESPACE)
            .add(CharClass::EscapingQuote, ESCAPING_QUOTE)
            .add(CharClass::NonEscapingQuote, NON_ESCAPING_QUOTE)
            .add(CharClass::EscapeMarker, ESCAPE)
            .add(CharClass::CommentMarker, COMMENT)
            .add(CharClass::Pipe, PIPE)
            .add(CharClass::Redirect, REDIRECT)
    }

    /// Assign every character of `chars` to `class`.
    pub fn add(mut self, class: CharClass, chars: &str) -> Self {
        self.classes.push((class, chars.to_string()));
        self
    }

    /// When disabled, comment markers fall back to `Ordinary`.
    pub fn comments(mut self, enabled: bool) -> Self {
        self.comments = enabled;
        self
    }

    pub fn unknown(mut self, policy: UnknownPolicy) -> Self {
        self.unknown = policy;
        self
    }

    pub fn build(self) -> Classifier {
        let mut table = HashMap::new();
        for (class, chars) in &self.classes {
            let class = match class {
                CharClass::CommentMarker if !self.comments => CharClass::Ordinary,
                // Never produced by a character.
                CharClass::EndOfStream => continue,
                other => *other,
            };
            for ch in chars.chars() {
                table.insert(ch, class);
            }
        }
        Classifier {
            table,
            unknown: self.unknown,
        }
    }
}
