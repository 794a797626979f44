//! Token cursor for navigating the token stream.

use garnet_ir::Span;

use crate::lexer::{Lexed, Token};

/// Position in the token stream. The last token is always `Eof`, and the
/// cursor never moves past it.
pub(super) struct Cursor<'a> {
    source: &'a str,
    tokens: Vec<Lexed>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(super) fn new(source: &'a str, tokens: Vec<Lexed>) -> Self {
        debug_assert!(
            tokens.last().is_some_and(|t| t.token == Token::Eof),
            "token stream must end with Eof"
        );
        Cursor {
            source,
            tokens,
            pos: 0,
        }
    }

    #[inline]
    pub(super) fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(super) fn current(&self) -> Lexed {
        self.tokens[self.pos]
    }

    #[inline]
    pub(super) fn peek(&self) -> Token {
        self.current().token
    }

    /// The token `n` places ahead, saturating at `Eof`.
    pub(super) fn peek_nth(&self, n: usize) -> Token {
        let last = self.tokens.len() - 1;
        self.tokens[(self.pos + n).min(last)].token
    }

    #[inline]
    pub(super) fn current_span(&self) -> Span {
        self.current().span
    }

    /// End offset of the last consumed token.
    pub(super) fn previous_end(&self) -> u32 {
        if self.pos == 0 {
            0
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }

    #[inline]
    pub(super) fn check(&self, token: Token) -> bool {
        self.peek() == token
    }

    /// Consume and return the current token.
    pub(super) fn bump(&mut self) -> Lexed {
        let current = self.current();
        if current.token != Token::Eof {
            self.pos += 1;
        }
        current
    }

    pub(super) fn eat(&mut self, token: Token) -> bool {
        if self.check(token) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(super) fn skip_newlines(&mut self) {
        while self.check(Token::Newline) {
            self.bump();
        }
    }

    pub(super) fn skip_terminators(&mut self) {
        while matches!(self.peek(), Token::Newline | Token::Semi) {
            self.bump();
        }
    }

    /// Skip to the next statement boundary.
    pub(super) fn recover(&mut self) {
        while !self.peek().is_terminator() {
            self.bump();
        }
    }

    pub(super) fn text(&self, span: Span) -> &'a str {
        &self.source[span.to_range()]
    }

    /// How a token reads in an error message.
    pub(super) fn describe(&self, lexed: Lexed) -> String {
        match lexed.token {
            Token::Newline => "end of line".to_owned(),
            Token::Eof => "end of file".to_owned(),
            _ => format!("`{}`", self.text(lexed.span)),
        }
    }
}
