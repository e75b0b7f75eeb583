//! Shell-style tokenizer: a character-at-a-time state machine.
//!
//! Each call to [`Tokenizer::next_token`] runs a fresh machine from
//! [`State::Start`]; the only thing carried between calls is the read
//! position of the source, including at most one pushed-back character.

use std::io::BufRead;

use super::classifier::Classifier;
use super::error::TokenizeError;
use super::source::{CharSource, PushbackReader};
use super::types::{CharClass, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing accumulated yet; whitespace is skipped.
    Start,
    /// Inside an unquoted part of a word.
    InWord,
    /// Right after an unquoted escape marker.
    AfterEscape,
    /// Right after an escape marker inside escaping quotes.
    AfterEscapeInDoubleQuote,
    InDoubleQuote,
    InSingleQuote,
    /// After a comment marker, up to end of line.
    InComment,
    /// Token complete.
    Emit,
}

/// Turns a character stream into a sequence of typed [`Token`]s.
///
/// Not meant to be resumed after it returns an error; as an iterator it
/// stops after the first one.
pub struct Tokenizer<'c, S> {
    source: S,
    classifier: &'c Classifier,
    failed: bool,
}

impl<R: BufRead> Tokenizer<'static, PushbackReader<R>> {
    /// Tokenize `reader` with the canonical classifier.
    pub fn new(reader: R) -> Self {
        Self::from_source(PushbackReader::new(reader), Classifier::shared())
    }
}

impl<'c, R: BufRead> Tokenizer<'c, PushbackReader<R>> {
    pub fn with_classifier(reader: R, classifier: &'c Classifier) -> Self {
        Self::from_source(PushbackReader::new(reader), classifier)
    }
}

impl<'c, S: CharSource> Tokenizer<'c, S> {
    pub fn from_source(source: S, classifier: &'c Classifier) -> Self {
        Self {
            source,
            classifier,
            failed: false,
        }
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Produce the next token, `Ok(None)` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token>, TokenizeError> {
        let result = self.run();
        match &result {
            Ok(Some(token)) => log::trace!("token {token}"),
            Ok(None) => log::trace!("end of input"),
            Err(e) => log::debug!("tokenize failed: {e}"),
        }
        result
    }

    fn run(&mut self) -> Result<Option<Token>, TokenizeError> {
        use crate::lex::types::CharClass as C;

        let mut state = State::Start;
        let mut kind = None;
        let mut value = String::new();
        let mut quote = None;

        while state != State::Emit {
            let (ch, class) = self.scan()?;
            state = match state {
                State::Start => match class {
                    C::EndOfStream => return Ok(None),
                    C::Whitespace => State::Start,
                    C::Ordinary => {
                        kind = Some(TokenKind::Word);
                        value.extend(ch);
                        State::InWord
                    }
                    C::EscapingQuote => {
                        kind = Some(TokenKind::Word);
                        quote = ch;
                        State::InDoubleQuote
                    }
                    C::NonEscapingQuote => {
                        kind = Some(TokenKind::Word);
                        quote = ch;
                        State::InSingleQuote
                    }
                    C::EscapeMarker => {
                        kind = Some(TokenKind::Word);
                        State::AfterEscape
                    }
                    C::CommentMarker => {
                        kind = Some(TokenKind::Comment);
                        State::InComment
                    }
                    C::Pipe => {
                        kind = Some(TokenKind::Pipe);
                        value.extend(ch);
                        State::Emit
                    }
                    C::Redirect => {
                        kind = Some(TokenKind::Redirect);
                        value.extend(ch);
                        // `<<` and `>>` are single tokens; `<>` is two.
                        match self.source.read_char()? {
                            Some(next) if Some(next) == ch => value.push(next),
                            Some(next) => self.source.unread_char(next),
                            None => {}
                        }
                        State::Emit
                    }
                },
                State::InWord => match class {
                    C::EndOfStream => State::Emit,
                    // `#` mid-word is literal: `seven#eight`.
                    C::Ordinary | C::CommentMarker => {
                        value.extend(ch);
                        State::InWord
                    }
                    C::Whitespace | C::Pipe | C::Redirect => {
                        self.push_back(ch);
                        State::Emit
                    }
                    C::EscapingQuote => {
                        quote = ch;
                        State::InDoubleQuote
                    }
                    C::NonEscapingQuote => {
                        quote = ch;
                        State::InSingleQuote
                    }
                    C::EscapeMarker => State::AfterEscape,
                },
                State::AfterEscape => match class {
                    C::EndOfStream => return Err(TokenizeError::UnterminatedEscape),
                    _ => {
                        value.extend(ch);
                        State::InWord
                    }
                },
                State::AfterEscapeInDoubleQuote => match class {
                    C::EndOfStream => return Err(TokenizeError::UnterminatedEscape),
                    _ => {
                        value.extend(ch);
                        State::InDoubleQuote
                    }
                },
                State::InDoubleQuote => match class {
                    C::EndOfStream => return Err(unterminated(quote)),
                    C::EscapingQuote => State::InWord,
                    C::EscapeMarker => State::AfterEscapeInDoubleQuote,
                    _ => {
                        value.extend(ch);
                        State::InDoubleQuote
                    }
                },
                State::InSingleQuote => match class {
                    C::EndOfStream => return Err(unterminated(quote)),
                    C::NonEscapingQuote => State::InWord,
                    _ => {
                        value.extend(ch);
                        State::InSingleQuote
                    }
                },
                State::InComment => match class {
                    C::EndOfStream => State::Emit,
                    // The newline ends the comment and belongs to no token.
                    C::Whitespace if ch == Some('\n') => State::Emit,
                    _ => {
                        value.extend(ch);
                        State::InComment
                    }
                },
                State::Emit => unreachable!("loop exits before reading in Emit"),
            };
        }

        match kind {
            Some(kind) => Ok(Some(Token { kind, value })),
            None => unreachable!("every path to Emit sets the token kind"),
        }
    }

    /// Read and classify one character; end of input is `(None, EndOfStream)`.
    fn scan(&mut self) -> Result<(Option<char>, CharClass), TokenizeError> {
        let Some(ch) = self.source.read_char()? else {
            return Ok((None, CharClass::EndOfStream));
        };
        match self.classifier.classify(ch) {
            Some(class) => Ok((Some(ch), class)),
            None => Err(TokenizeError::UnclassifiableCharacter(ch)),
        }
    }

    fn push_back(&mut self, ch: Option<char>) {
        if let Some(ch) = ch {
            self.source.unread_char(ch);
        }
    }
}

fn unterminated(quote: Option<char>) -> TokenizeError {
    TokenizeError::UnterminatedQuote {
        quote: quote.unwrap_or('"'),
    }
}

impl<S: CharSource> Iterator for Tokenizer<'_, S> {
    type Item = Result<Token, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = self.next_token().transpose();
        if matches!(next, Some(Err(_))) {
            self.failed = true;
        }
        next
    }
}

impl<S: CharSource> std::iter::FusedIterator for Tokenizer<'_, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex::classifier::UnknownPolicy;
    use assert_matches::assert_matches;

    fn tokens(input: &str) -> Vec<Token> {
        Tokenizer::new(input.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap_or_else(|e| panic!("tokenizing {input:?}: {e}"))
    }

    fn word(v: &str) -> Token {
        Token::word(v)
    }

    fn pipe() -> Token {
        Token::new(TokenKind::Pipe, "|")
    }

    fn redirect(v: &str) -> Token {
        Token::new(TokenKind::Redirect, v)
    }

    fn comment(v: &str) -> Token {
        Token::new(TokenKind::Comment, v)
    }

    fn first_error(input: &str) -> TokenizeError {
        let mut t = Tokenizer::new(input.as_bytes());
        loop {
            match t.next_token() {
                Ok(Some(_)) => continue,
                Ok(None) => panic!("expected an error for {input:?}"),
                Err(e) => return e,
            }
        }
    }

    #[test]
    fn empty_input_is_end_of_stream() {
        let mut t = Tokenizer::new("".as_bytes());
        assert_matches!(t.next_token(), Ok(None));
        assert_matches!(t.next_token(), Ok(None));
    }

    #[test]
    fn whitespace_only_is_end_of_stream() {
        assert!(tokens(" \t\r\n  ").is_empty());
    }

    #[test]
    fn words_split_on_whitespace() {
        assert_eq!(
            tokens("one two three"),
            vec![word("one"), word("two"), word("three")]
        );
        assert_eq!(tokens("  one\t\ttwo\n"), vec![word("one"), word("two")]);
    }

    #[test]
    fn double_quotes_group_words() {
        assert_eq!(
            tokens(r#"one "two three" four"#),
            vec![word("one"), word("two three"), word("four")]
        );
    }

    #[test]
    fn single_quotes_group_words() {
        assert_eq!(
            tokens("one 'two three' four"),
            vec![word("one"), word("two three"), word("four")]
        );
    }

    #[test]
    fn adjacent_regions_form_one_word() {
        assert_eq!(tokens(r#"a"b"c"#), vec![word("abc")]);
        assert_eq!(tokens(r#"a'b c'"d e"\ f"#), vec![word("ab cd e f")]);
    }

    #[test]
    fn empty_quotes_yield_empty_word() {
        assert_eq!(tokens(r#"echo "" ''"#), vec![word("echo"), word(""), word("")]);
    }

    #[test]
    fn escape_makes_next_char_literal() {
        assert_eq!(tokens(r"\a"), vec![word("a")]);
        assert_eq!(tokens(r"a\ b"), vec![word("a b")]);
        assert_eq!(tokens(r"\|x"), vec![word("|x")]);
        assert_eq!(tokens(r"\\"), vec![word(r"\")]);
        assert_eq!(tokens(r"\#not-a-comment"), vec![word("#not-a-comment")]);
        assert_eq!(tokens(r#"\"q"#), vec![word("\"q")]);
    }

    #[test]
    fn escape_inside_double_quotes() {
        assert_eq!(tokens(r#""a\"b""#), vec![word(r#"a"b"#)]);
        assert_eq!(tokens(r#""a\\b""#), vec![word(r"a\b")]);
        assert_eq!(
            tokens(r#""five \"six\"""#),
            vec![word(r#"five "six""#)]
        );
    }

    #[test]
    fn single_quotes_are_literal() {
        assert_eq!(tokens(r"'a\b'"), vec![word(r"a\b")]);
        assert_eq!(tokens(r#"'say "hi" | # >'"#), vec![word(r#"say "hi" | # >"#)]);
    }

    #[test]
    fn double_quotes_keep_operators_literal() {
        assert_eq!(tokens(r#""a | b > c # d 'e'""#), vec![word("a | b > c # d 'e'")]);
    }

    #[test]
    fn pipe_is_single_char_token() {
        assert_eq!(
            tokens("one two|three"),
            vec![word("one"), word("two"), pipe(), word("three")]
        );
        assert_eq!(tokens("||"), vec![pipe(), pipe()]);
    }

    #[test]
    fn redirects() {
        assert_eq!(
            tokens("a > b.txt"),
            vec![word("a"), redirect(">"), word("b.txt")]
        );
        assert_eq!(tokens("a << b"), vec![word("a"), redirect("<<"), word("b")]);
        assert_eq!(tokens("a>>b"), vec![word("a"), redirect(">>"), word("b")]);
    }

    #[test]
    fn doubled_redirect_lookahead() {
        assert_eq!(tokens(">>"), vec![redirect(">>")]);
        assert_eq!(tokens("><"), vec![redirect(">"), redirect("<")]);
        assert_eq!(tokens(">>>"), vec![redirect(">>"), redirect(">")]);
        assert_eq!(tokens(">"), vec![redirect(">")]);
        assert_eq!(tokens(">x"), vec![redirect(">"), word("x")]);
    }

    #[test]
    fn redirect_lookahead_leaves_unclassifiable_char_for_next_call() {
        let mut t = Tokenizer::new(">é".as_bytes());
        assert_eq!(t.next_token().unwrap(), Some(redirect(">")));
        assert_matches!(
            t.next_token(),
            Err(TokenizeError::UnclassifiableCharacter('é'))
        );
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        assert_eq!(
            tokens("# a comment\nword"),
            vec![comment(" a comment"), word("word")]
        );
    }

    #[test]
    fn comment_at_end_of_input() {
        assert_eq!(tokens("ls # trailing"), vec![word("ls"), comment(" trailing")]);
        assert_eq!(tokens("#"), vec![comment("")]);
    }

    #[test]
    fn hash_inside_word_is_literal() {
        assert_eq!(tokens("seven#eight"), vec![word("seven#eight")]);
    }

    #[test]
    fn mixed_line() {
        let input = "one two \"three four\" \"five \\\"six\\\"\" seven#eight # nine # ten\n eleven | sixteen > \"seventeen eighteen\" < nineteen";
        assert_eq!(
            tokens(input),
            vec![
                word("one"),
                word("two"),
                word("three four"),
                word("five \"six\""),
                word("seven#eight"),
                comment(" nine # ten"),
                word("eleven"),
                pipe(),
                word("sixteen"),
                redirect(">"),
                word("seventeen eighteen"),
                redirect("<"),
                word("nineteen"),
            ]
        );
    }

    #[test]
    fn unterminated_double_quote() {
        assert_matches!(
            first_error(r#""abc"#),
            TokenizeError::UnterminatedQuote { quote: '"' }
        );
    }

    #[test]
    fn unterminated_single_quote() {
        assert_matches!(
            first_error("ok 'abc"),
            TokenizeError::UnterminatedQuote { quote: '\'' }
        );
    }

    #[test]
    fn unterminated_escape() {
        assert_matches!(first_error("abc\\"), TokenizeError::UnterminatedEscape);
        assert_matches!(first_error("\\"), TokenizeError::UnterminatedEscape);
        assert_matches!(first_error("\"abc\\"), TokenizeError::UnterminatedEscape);
    }

    #[test]
    fn unclassifiable_character_in_strict_mode() {
        assert_matches!(
            first_error("ok caf\u{e9}"),
            TokenizeError::UnclassifiableCharacter('\u{e9}')
        );
    }

    #[test]
    fn permissive_classifier_accepts_unknown() {
        let classifier = Classifier::builder().unknown(UnknownPolicy::Ordinary).build();
        let found: Vec<Token> = Tokenizer::with_classifier("café `x`".as_bytes(), &classifier)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(found, vec![word("café"), word("`x`")]);
    }

    #[test]
    fn comments_disabled() {
        let classifier = Classifier::without_comments();
        let found: Vec<Token> = Tokenizer::with_classifier("a # b".as_bytes(), &classifier)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(found, vec![word("a"), word("#"), word("b")]);
    }

    #[test]
    fn classifier_shared_between_tokenizers() {
        let classifier = Classifier::new();
        let mut a = Tokenizer::with_classifier("x y".as_bytes(), &classifier);
        let mut b = Tokenizer::with_classifier("z".as_bytes(), &classifier);
        assert_eq!(a.next_token().unwrap(), Some(word("x")));
        assert_eq!(b.next_token().unwrap(), Some(word("z")));
        assert_eq!(a.next_token().unwrap(), Some(word("y")));
        assert_eq!(b.next_token().unwrap(), None);
    }

    #[test]
    fn read_failure_is_propagated() {
        let bytes: &[u8] = &[b'a', b' ', 0xff];
        let mut t = Tokenizer::new(bytes);
        assert_eq!(t.next_token().unwrap(), Some(word("a")));
        assert_matches!(t.next_token(), Err(TokenizeError::SourceRead(_)));
    }

    #[test]
    fn iterator_stops_after_error() {
        let found: Vec<_> = Tokenizer::new("a \u{e9} b".as_bytes()).collect();
        assert_eq!(found.len(), 2);
        assert_matches!(&found[0], Ok(t) if *t == word("a"));
        assert_matches!(
            &found[1],
            Err(TokenizeError::UnclassifiableCharacter('\u{e9}'))
        );
    }

    #[test]
    fn whitespace_terminator_is_pushed_back() {
        let mut t = Tokenizer::new("ab cd".as_bytes());
        assert_eq!(t.next_token().unwrap(), Some(word("ab")));
        assert_eq!(t.into_source().position(), 2);
    }
}
