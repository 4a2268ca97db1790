pub mod ast;
mod cursor;
mod decl;
mod expr;
mod levels;
mod speculate;
mod stmt;
mod types;

pub use cursor::{Mark, TokenCursor};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::ParserConfig;
use crate::diagnostics::{CompileError, Diagnostic};
use crate::level::SyntaxLevel;
use crate::lexer::{Token, TokenKind};
use crate::span::{Span, Spanned};
use ast::*;

/// Failure of a single grammar rule. Structural errors are recorded and
/// recovered from; `CeilingExceeded` unwinds the whole parse.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{message}")]
    Structural { message: String, token: Box<Token> },
    #[error("more than {limit} diagnostics recorded")]
    CeilingExceeded { limit: usize },
}

pub(crate) type PResult<T> = Result<T, ParseError>;

/// Result of a completed parse: the program plus every recovered error, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutput {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Where a recovery happens; decides how far synchronisation may skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SyncScope {
    TopLevel,
    Block,
    Member,
}

pub struct Parser<'a> {
    cursor: TokenCursor<'a>,
    config: ParserConfig,
    level: SyntaxLevel,
    depth: usize,
    restrict_struct_lit: bool,
    /// Set while parsing a match guard, where `x =>` ends the guard.
    restrict_lambda: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self::with_config(tokens, ParserConfig::default())
    }

    pub fn with_config(tokens: &'a [Token], config: ParserConfig) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            level: config.default_level,
            config,
            depth: 0,
            restrict_struct_lit: false,
            restrict_lambda: false,
            diagnostics: Vec::new(),
        }
    }

    /// Parse the whole token stream into a program.
    ///
    /// Malformed top-level units are recorded as diagnostics and skipped; the
    /// only error is the diagnostic ceiling being exceeded.
    pub fn parse_program(mut self) -> Result<ParseOutput, CompileError> {
        debug!(level = %self.level, "parsing program");
        let mut statements = Vec::new();

        while !self.cursor.at_end() {
            let before = self.cursor.position();
            match self.parse_top_level() {
                Ok(Some(stmt)) => statements.push(stmt),
                Ok(None) => {}
                Err(err) => {
                    if let Err(fatal) = self.recover(err, SyncScope::TopLevel) {
                        return Err(self.abort(fatal));
                    }
                }
            }
            if self.cursor.position() == before {
                self.cursor.advance();
            }
        }

        debug!(
            statements = statements.len(),
            diagnostics = self.diagnostics.len(),
            "parse finished"
        );
        Ok(ParseOutput { program: Program { statements }, diagnostics: self.diagnostics })
    }

    /// Parse a single expression covering the entire stream.
    pub fn parse_standalone_expr(mut self) -> Result<Spanned<Expr>, ParseError> {
        self.parse_whole_expr()
    }

    pub(crate) fn parse_whole_expr(&mut self) -> PResult<Spanned<Expr>> {
        let expr = self.parse_expr()?;
        if !self.cursor.at_end() {
            return Err(self.expected("end of expression"));
        }
        Ok(expr)
    }

    fn abort(self, fatal: ParseError) -> CompileError {
        let limit = match fatal {
            ParseError::CeilingExceeded { limit } => limit,
            ParseError::Structural { .. } => self.config.max_diagnostics,
        };
        debug!(limit, "diagnostic ceiling exceeded, aborting parse");
        CompileError::CeilingExceeded { limit, diagnostics: self.diagnostics }
    }

    /// One top-level unit: a foreign-style header or any statement.
    pub(crate) fn parse_top_level(&mut self) -> PResult<Option<Spanned<Stmt>>> {
        if self.is_foreign_header_ahead() {
            return self.parse_foreign_header().map(Some);
        }
        self.parse_statement()
    }

    // ----- recovery -------------------------------------------------------

    /// Record a structural error and skip to a synchronisation point.
    /// Passes `CeilingExceeded` through untouched.
    pub(crate) fn recover(&mut self, err: ParseError, scope: SyncScope) -> PResult<()> {
        self.report(err)?;
        debug!(?scope, "synchronising");
        self.synchronize(scope);
        Ok(())
    }

    /// Record a structural error without moving the cursor.
    pub(crate) fn report(&mut self, err: ParseError) -> PResult<()> {
        match err {
            ParseError::Structural { message, token } => {
                debug!(line = token.line, column = token.column, %message, "syntax error");
                self.diagnostics.push(Diagnostic::new(message, *token));
                if self.diagnostics.len() > self.config.max_diagnostics {
                    return Err(ParseError::CeilingExceeded { limit: self.config.max_diagnostics });
                }
                Ok(())
            }
            fatal @ ParseError::CeilingExceeded { .. } => Err(fatal),
        }
    }

    fn synchronize(&mut self, scope: SyncScope) {
        if scope == SyncScope::Member {
            self.synchronize_member();
            return;
        }
        // The brace closing the enclosing block belongs to the block.
        if !(scope == SyncScope::Block && self.check(TokenKind::RBrace)) {
            let first = self.cursor.advance();
            match first.kind {
                TokenKind::Semi => return,
                TokenKind::LBrace => self.skip_braced_tail(),
                _ => {}
            }
        }
        loop {
            match self.cursor.current().kind {
                TokenKind::Eof | TokenKind::RBrace => return,
                TokenKind::Semi => {
                    self.cursor.advance();
                    return;
                }
                _ if self.starts_statement() => return,
                TokenKind::LBrace => {
                    self.cursor.advance();
                    self.skip_braced_tail();
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Member recovery: skip to the next modifier/declaration keyword, past a `;`,
    /// or to the closing `}`; nested `{ ... }` is skipped as a unit.
    fn synchronize_member(&mut self) {
        if self.check(TokenKind::RBrace) {
            return;
        }
        let first = self.cursor.advance();
        match first.kind {
            TokenKind::Semi => return,
            TokenKind::LBrace => {
                self.skip_braced_tail();
                return;
            }
            _ => {}
        }
        loop {
            match self.cursor.current().kind {
                TokenKind::Eof | TokenKind::RBrace => return,
                TokenKind::Semi => {
                    self.cursor.advance();
                    return;
                }
                TokenKind::LBrace => {
                    self.cursor.advance();
                    self.skip_braced_tail();
                    return;
                }
                _ if self.starts_member() => return,
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Skip to just past the `}` matching an already consumed `{`.
    fn skip_braced_tail(&mut self) {
        let mut depth = 1usize;
        while depth > 0 && !self.cursor.at_end() {
            match self.cursor.advance().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
        }
    }

    /// Does the current token begin a statement or declaration?
    fn starts_statement(&self) -> bool {
        let tok = self.cursor.current();
        match tok.kind {
            TokenKind::Namespace
            | TokenKind::Class
            | TokenKind::Interface
            | TokenKind::Struct
            | TokenKind::Union
            | TokenKind::Enum
            | TokenKind::Fn
            | TokenKind::Macro
            | TokenKind::Let
            | TokenKind::Var
            | TokenKind::If
            | TokenKind::While
            | TokenKind::For
            | TokenKind::Foreach
            | TokenKind::Do
            | TokenKind::Switch
            | TokenKind::Match
            | TokenKind::Try
            | TokenKind::Return
            | TokenKind::Break
            | TokenKind::Continue
            | TokenKind::Throw
            | TokenKind::Yield
            | TokenKind::Using
            | TokenKind::Lock
            | TokenKind::Unsafe
            | TokenKind::Fixed
            | TokenKind::Asm
            | TokenKind::LevelMarker => true,
            kind if kind.is_visibility() => true,
            kind if kind.is_storage_modifier() && kind != TokenKind::Mut => true,
            _ => self.starts_contextual_declaration(),
        }
    }

    fn starts_member(&self) -> bool {
        let tok = self.cursor.current();
        match tok.kind {
            TokenKind::Fn
            | TokenKind::Class
            | TokenKind::Interface
            | TokenKind::Struct
            | TokenKind::Union
            | TokenKind::Enum
            | TokenKind::LevelMarker => true,
            kind if kind.is_visibility() => true,
            kind if kind.is_storage_modifier() && kind != TokenKind::Mut => true,
            _ => tok.is_word("destructor"),
        }
    }

    /// `module`, `domain`, `trait`, `implement`, `destructor` or `extern`
    /// used as a declaration keyword.
    pub(crate) fn starts_contextual_declaration(&self) -> bool {
        let tok = self.cursor.current();
        if tok.kind != TokenKind::Ident {
            return false;
        }
        let next = self.cursor.peek(1).kind;
        match tok.text.as_str() {
            "module" | "domain" | "trait" => next == TokenKind::Ident,
            "implement" => matches!(next, TokenKind::Ident | TokenKind::Lt),
            "destructor" => matches!(next, TokenKind::LBrace | TokenKind::LParen),
            "extern" => matches!(
                next,
                TokenKind::StringLit | TokenKind::LBrace | TokenKind::Fn | TokenKind::Static
            ) || next.is_visibility(),
            _ => false,
        }
    }

    // ----- token helpers ---------------------------------------------------

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.cursor.current().kind == kind
    }

    pub(crate) fn check_at(&self, k: usize, kind: TokenKind) -> bool {
        self.cursor.peek(k).kind == kind
    }

    pub(crate) fn check_word(&self, word: &str) -> bool {
        self.cursor.current().is_word(word)
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.cursor.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_word(&mut self, word: &str) -> bool {
        if self.check_word(word) {
            self.cursor.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<&'a Token> {
        if self.check(kind) {
            Ok(self.cursor.advance())
        } else {
            Err(self.expected(&kind.describe()))
        }
    }

    pub(crate) fn expect_word(&mut self, word: &str) -> PResult<&'a Token> {
        if self.check_word(word) {
            Ok(self.cursor.advance())
        } else {
            Err(self.expected(&format!("'{word}'")))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> PResult<Ident> {
        let tok = self.cursor.current();
        if tok.kind == TokenKind::Ident {
            self.cursor.advance();
            Ok(Spanned::new(tok.text.clone(), tok.span))
        } else {
            Err(self.expected("identifier"))
        }
    }

    /// Terminators are optional; consume one if present.
    pub(crate) fn consume_terminator(&mut self) {
        self.eat(TokenKind::Semi);
    }

    pub(crate) fn error_at(&self, tok: &Token, message: impl Into<String>) -> ParseError {
        ParseError::Structural { message: message.into(), token: Box::new(tok.clone()) }
    }

    pub(crate) fn error_here(&self, message: impl Into<String>) -> ParseError {
        self.error_at(self.cursor.current(), message)
    }

    /// "expected {what}, found {current}"
    pub(crate) fn expected(&self, what: &str) -> ParseError {
        let found = self.cursor.current().describe();
        self.error_here(format!("expected {what}, found {found}"))
    }

    /// Span from `start` through the last consumed token.
    pub(crate) fn span_from(&self, start: Span) -> Span {
        match self.cursor.previous() {
            Some(prev) if prev.span.end >= start.start => start.to(prev.span),
            _ => start,
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.cursor.current().span
    }

    // ----- scoped state ----------------------------------------------------

    /// Run `f` one nesting level deeper, failing once `max_nesting` is reached.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= self.config.max_nesting {
            return Err(self.error_here("nesting too deep"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Run `f` with struct literals allowed or forbidden, restoring the previous setting.
    ///
    /// Allowing them means a bracket was just opened, so lambdas are allowed
    /// again as well.
    pub(crate) fn with_struct_literals<T>(&mut self, allowed: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.restrict_struct_lit, !allowed);
        let saved_lambda = self.restrict_lambda;
        if allowed {
            self.restrict_lambda = false;
        }
        let result = f(self);
        self.restrict_struct_lit = saved;
        self.restrict_lambda = saved_lambda;
        result
    }

    /// Run `f` with lambdas outside brackets allowed or forbidden, restoring
    /// the previous setting.
    pub(crate) fn with_lambdas<T>(&mut self, allowed: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.restrict_lambda, !allowed);
        let result = f(self);
        self.restrict_lambda = saved;
        result
    }

    pub(crate) fn require_low(&self, tok: &Token, what: &str) -> PResult<()> {
        if self.level.allows_pointers() {
            Ok(())
        } else {
            Err(self.error_at(tok, format!("{what} requires the low syntax level")))
        }
    }
}
