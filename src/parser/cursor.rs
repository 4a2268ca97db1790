use std::sync::LazyLock;

use crate::lexer::{Token, TokenKind};
use crate::span::Span;

/// Returned when peeking past a stream that lacks its own `Eof`.
static EOF: LazyLock<Token> = LazyLock::new(|| Token::eof(Span::dummy(), 0, 0));

/// Saved cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// Read position over an immutable token slice.
#[derive(Debug, Clone)]
pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Token `k` positions ahead; `Eof` once past the end.
    pub fn peek(&self, k: usize) -> &'a Token {
        let tokens: &'a [Token] = self.tokens;
        match tokens.get(self.pos + k) {
            Some(tok) => tok,
            None => tokens.last().filter(|t| t.kind == TokenKind::Eof).unwrap_or(&*EOF),
        }
    }

    pub fn current(&self) -> &'a Token {
        self.peek(0)
    }

    pub fn previous(&self) -> Option<&'a Token> {
        let tokens: &'a [Token] = self.tokens;
        self.pos.checked_sub(1).and_then(|i| tokens.get(i))
    }

    /// Consume the current token and return it. Never moves past `Eof`.
    pub fn advance(&mut self) -> &'a Token {
        let tok = self.current();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    pub fn at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    pub fn restore(&mut self, mark: Mark) {
        self.pos = mark.0;
    }
}
