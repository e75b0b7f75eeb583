//! Character source with one character of pushback.

use std::io::BufRead;

use utf8_chars::BufReadCharsExt;

/// Ordered characters with the ability to return the last one read.
pub trait CharSource {
    /// Next character, `Ok(None)` at end of input.
    fn read_char(&mut self) -> std::io::Result<Option<char>>;

    /// Put `ch` back so the next `read_char` returns it.
    ///
    /// At most one character may be pending at a time.
    fn unread_char(&mut self, ch: char);
}

/// [`CharSource`] over any buffered reader, decoding UTF-8.
#[derive(Debug)]
pub struct PushbackReader<R> {
    inner: R,
    pending: Option<char>,
    consumed: usize,
}

impl<R: BufRead> PushbackReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: None,
            consumed: 0,
        }
    }

    /// Number of characters handed out and not pushed back.
    pub fn position(&self) -> usize {
        self.consumed
    }
}

impl<R: BufRead> CharSource for PushbackReader<R> {
    fn read_char(&mut self) -> std::io::Result<Option<char>> {
        let next = match self.pending.take() {
            Some(ch) => Some(ch),
            None => self.inner.read_char()?,
        };
        if next.is_some() {
            self.consumed += 1;
        }
        Ok(next)
    }

    fn unread_char(&mut self, ch: char) {
        debug_assert!(self.pending.is_none(), "only one character of pushback");
        self.pending = Some(ch);
        self.consumed = self.consumed.saturating_sub(1);
    }
}
