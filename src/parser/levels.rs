//! Syntax-level dispatch.
//!
//! High and Low add a handful of statements on top of the Medium grammar and
//! fall back to it for everything else; Assembly extends Low with `asm` blocks.

use tracing::debug;

use crate::level::SyntaxLevel;
use crate::lexer::{Token, TokenKind};
use crate::span::Spanned;

use super::ast::*;
use super::{PResult, Parser};

impl<'a> Parser<'a> {
    /// One statement or declaration under the current level. `Ok(None)` for an
    /// empty statement.
    pub(crate) fn parse_statement(&mut self) -> PResult<Option<Spanned<Stmt>>> {
        self.nested(|p| match p.level {
            SyntaxLevel::High => p.parse_high_statement(),
            SyntaxLevel::Medium => p.parse_medium_statement(),
            SyntaxLevel::Low => p.parse_low_statement(),
            // Assembly adds only `asm` blocks, which the shared grammar gates on the level.
            SyntaxLevel::Assembly => p.parse_low_statement(),
        })
    }

    /// Run `f` under `level`; the previous level is back in place however `f`
    /// returns.
    pub(crate) fn with_level<T>(&mut self, level: SyntaxLevel, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.level, level);
        if saved != level {
            debug!(from = %saved, to = %level, "switching syntax level");
        }
        let result = f(self);
        self.level = saved;
        result
    }

    /// Consume a level marker if one is at the cursor.
    pub(crate) fn parse_level_marker(&mut self) -> PResult<Option<SyntaxLevel>> {
        if !self.check(TokenKind::LevelMarker) {
            return Ok(None);
        }
        let tok = self.cursor.advance();
        match SyntaxLevel::from_marker(&tok.text) {
            Some(level) => Ok(Some(level)),
            None => Err(self.error_at(tok, format!("unknown syntax level marker '{}'", tok.text))),
        }
    }

    // ----- high ------------------------------------------------------------

    fn parse_high_statement(&mut self) -> PResult<Option<Spanned<Stmt>>> {
        if self.check_word("print") && self.is_print_statement() {
            return self.parse_print().map(Some);
        }
        if self.check(TokenKind::Ident) && self.check_at(1, TokenKind::ColonEq) {
            return self.parse_inferred_binding().map(Some);
        }
        self.parse_medium_statement()
    }

    /// `print` used as a statement keyword rather than as a name.
    fn is_print_statement(&self) -> bool {
        let next = self.cursor.peek(1).kind;
        !matches!(
            next,
            TokenKind::LParen
                | TokenKind::Dot
                | TokenKind::Eq
                | TokenKind::ColonEq
                | TokenKind::Semi
                | TokenKind::RBrace
                | TokenKind::Eof
        ) && !is_assign_token(next)
    }

    /// `print a, b;` is a call of `print`.
    fn parse_print(&mut self) -> PResult<Spanned<Stmt>> {
        let keyword = self.cursor.advance();
        let mut args = vec![self.parse_expr()?];
        while self.eat(TokenKind::Comma) {
            args.push(self.parse_expr()?);
        }
        self.consume_terminator();
        let span = self.span_from(keyword.span);
        let callee = Spanned::new(Expr::Ident(keyword.text.clone()), keyword.span);
        let call = Spanned::new(
            Expr::Call { callee: Box::new(callee), type_args: Vec::new(), args },
            span,
        );
        Ok(Spanned::new(Stmt::Expr(call), span))
    }

    /// `name := expr;`
    fn parse_inferred_binding(&mut self) -> PResult<Spanned<Stmt>> {
        let name = self.expect_ident()?;
        let start = name.span;
        self.expect(TokenKind::ColonEq)?;
        let value = self.parse_expr()?;
        self.consume_terminator();
        let decl = FieldDecl {
            modifiers: Modifiers::default(),
            names: vec![name],
            ty: None,
            value: Some(value),
            is_const: false,
            level: self.level,
        };
        Ok(Spanned::new(Stmt::Field(decl), self.span_from(start)))
    }

    // ----- low -------------------------------------------------------------

    fn parse_low_statement(&mut self) -> PResult<Option<Spanned<Stmt>>> {
        match self.cursor.current().kind {
            TokenKind::Unsafe if self.check_at(1, TokenKind::LBrace) => {
                let start = self.cursor.advance().span;
                let body = self.parse_block()?;
                Ok(Some(Spanned::new(Stmt::Unsafe(body), self.span_from(start))))
            }
            TokenKind::Fixed => self.parse_fixed().map(Some),
            TokenKind::For if self.check_at(1, TokenKind::Ident) && self.check_at(2, TokenKind::In) => {
                self.parse_range_for().map(Some)
            }
            _ => self.parse_medium_statement(),
        }
    }

    /// `fixed (byte* p = &buffer) body`
    fn parse_fixed(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        self.expect(TokenKind::LParen)?;
        let decl = self.parse_local_declaration()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_embedded()?;
        Ok(Spanned::new(Stmt::Fixed { decl: Box::new(decl), body }, self.span_from(start)))
    }

    /// `for i in a..b body`
    fn parse_range_for(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        let var = self.expect_ident()?;
        let in_tok = self.expect(TokenKind::In)?;
        let range = self.with_struct_literals(false, |p| p.parse_expr())?;
        let (start_expr, end_expr, inclusive) = match range.node {
            Expr::Binary { op: BinaryOp::Range, lhs, rhs } => (*lhs, *rhs, false),
            Expr::Binary { op: BinaryOp::RangeInclusive, lhs, rhs } => (*lhs, *rhs, true),
            _ => return Err(self.error_at(in_tok, "expected a range such as 'a..b' after 'in'")),
        };
        let body = self.parse_embedded()?;
        Ok(Spanned::new(
            Stmt::ForRange { var, start: start_expr, end: end_expr, inclusive, body },
            self.span_from(start),
        ))
    }

    // ----- assembly --------------------------------------------------------

    /// `asm { ... }` captured as text. Tokens on different lines are joined by
    /// a newline, tokens separated by whitespace by a single space.
    pub(crate) fn parse_asm_block(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        let open = self.expect(TokenKind::LBrace)?;
        let mut text = String::new();
        let mut depth = 1usize;
        let mut prev: Option<&Token> = None;
        loop {
            let tok = self.cursor.current();
            match tok.kind {
                TokenKind::Eof => return Err(self.error_at(open, "unterminated asm block")),
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.cursor.advance();
                        break;
                    }
                }
                _ => {}
            }
            if let Some(prev) = prev {
                if prev.line != tok.line {
                    text.push('\n');
                } else if prev.span.end < tok.span.start {
                    text.push(' ');
                }
            }
            text.push_str(&tok.text);
            prev = Some(tok);
            self.cursor.advance();
        }
        Ok(Spanned::new(Stmt::InlineAsm { text }, self.span_from(start)))
    }
}

fn is_assign_token(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::StarEq
            | TokenKind::StarStarEq
            | TokenKind::SlashEq
            | TokenKind::PercentEq
            | TokenKind::AmpEq
            | TokenKind::PipeEq
            | TokenKind::CaretEq
            | TokenKind::ShlEq
            | TokenKind::QuestionQuestionEq
    )
}
