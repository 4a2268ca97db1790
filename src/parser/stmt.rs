//! Medium-level statements and blocks.

use crate::lexer::{LiteralValue, TokenKind};
use crate::span::Spanned;

use super::ast::*;
use super::{PResult, Parser, SyncScope};

impl<'a> Parser<'a> {
    pub(crate) fn parse_medium_statement(&mut self) -> PResult<Option<Spanned<Stmt>>> {
        let tok = self.cursor.current();
        let stmt = match tok.kind {
            TokenKind::Semi => {
                self.cursor.advance();
                return Ok(None);
            }
            TokenKind::LBrace => self.parse_block()?.map(Stmt::Block),
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::Do => self.parse_do_while()?,
            TokenKind::For if self.check_at(1, TokenKind::Ident) && self.check_at(2, TokenKind::In) => {
                return Err(self.error_here("range-based for loop requires the low syntax level"));
            }
            TokenKind::For => self.parse_for()?,
            TokenKind::Foreach => self.parse_foreach()?,
            TokenKind::Switch => self.parse_switch()?,
            TokenKind::Match => self.parse_match_statement()?,
            TokenKind::Try => self.parse_try()?,
            TokenKind::Return => self.parse_return()?,
            TokenKind::Break => {
                self.cursor.advance();
                self.consume_terminator();
                Spanned::new(Stmt::Break, self.span_from(tok.span))
            }
            TokenKind::Continue => {
                self.cursor.advance();
                self.expect(TokenKind::Semi)?;
                Spanned::new(Stmt::Continue, self.span_from(tok.span))
            }
            TokenKind::Throw => self.parse_throw()?,
            TokenKind::Yield => self.parse_yield()?,
            TokenKind::Using => self.parse_using()?,
            TokenKind::Lock => self.parse_lock()?,
            TokenKind::Unsafe if self.check_at(1, TokenKind::LBrace) => {
                return Err(self.error_here("unsafe block requires the low syntax level"));
            }
            TokenKind::Fixed => return Err(self.error_here("fixed statement requires the low syntax level")),
            TokenKind::Asm if self.level.allows_asm() => self.parse_asm_block()?,
            TokenKind::Asm => {
                return Err(self.error_here("inline assembly requires the assembly syntax level"));
            }
            _ if self.starts_declaration() => self.parse_modified_declaration()?,
            TokenKind::Ident => self.parse_ident_statement()?,
            _ => self.parse_expr_statement()?,
        };
        Ok(Some(stmt))
    }

    /// Statements starting with an identifier: typed or colon declarations,
    /// otherwise an expression.
    fn parse_ident_statement(&mut self) -> PResult<Spanned<Stmt>> {
        if self.check_at(1, TokenKind::ColonEq) {
            let op = self.cursor.peek(1);
            return Err(self.error_at(op, "inferred declarations with ':=' require the high syntax level"));
        }
        if self.is_colon_declaration_ahead() || self.is_typed_declaration_ahead() {
            return self.parse_modified_declaration();
        }
        self.parse_expr_statement()
    }

    fn parse_expr_statement(&mut self) -> PResult<Spanned<Stmt>> {
        let expr = self.parse_expr()?;
        self.consume_terminator();
        let span = self.span_from(expr.span);
        Ok(Spanned::new(Stmt::Expr(expr), span))
    }

    // ----- blocks ----------------------------------------------------------

    /// `{ stmts }`. Statement errors inside are recovered here, so one bad
    /// statement does not lose the block.
    pub(crate) fn parse_block(&mut self) -> PResult<Spanned<Block>> {
        let start = self.expect(TokenKind::LBrace)?.span;
        let stmts = self.with_struct_literals(true, |p| p.parse_block_items())?;
        self.expect(TokenKind::RBrace)?;
        Ok(Spanned::new(Block { stmts }, self.span_from(start)))
    }

    fn parse_block_items(&mut self) -> PResult<Vec<Spanned<Stmt>>> {
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.cursor.at_end() {
            let before = self.cursor.position();
            match self.parse_statement() {
                Ok(Some(stmt)) => stmts.push(stmt),
                Ok(None) => {}
                Err(err) => self.recover(err, SyncScope::Block)?,
            }
            if self.cursor.position() == before && !self.check(TokenKind::RBrace) {
                self.cursor.advance();
            }
        }
        Ok(stmts)
    }

    /// The body of a control-flow statement. An empty statement becomes an
    /// empty block.
    pub(crate) fn parse_embedded(&mut self) -> PResult<Box<Spanned<Stmt>>> {
        let start = self.current_span();
        let stmt = self.with_struct_literals(true, |p| p.parse_statement())?;
        Ok(Box::new(stmt.unwrap_or_else(|| Spanned::new(Stmt::Block(Block::default()), start))))
    }

    /// Conditions of `if`, `while`, `switch` and friends. Parentheses are
    /// optional; struct literals are off so the body brace is not swallowed.
    fn parse_condition(&mut self) -> PResult<Spanned<Expr>> {
        self.with_struct_literals(false, |p| p.parse_expr())
    }

    // ----- control flow ----------------------------------------------------

    fn parse_if(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        let condition = self.parse_condition()?;
        let then_branch = self.parse_embedded()?;
        let else_branch = if self.eat(TokenKind::Else) { Some(self.parse_embedded()?) } else { None };
        Ok(Spanned::new(Stmt::If { condition, then_branch, else_branch }, self.span_from(start)))
    }

    fn parse_while(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        let condition = self.parse_condition()?;
        let body = self.parse_embedded()?;
        Ok(Spanned::new(Stmt::While { condition, body }, self.span_from(start)))
    }

    fn parse_do_while(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        let body = self.parse_embedded()?;
        self.expect(TokenKind::While)?;
        let condition = self.parse_condition()?;
        self.consume_terminator();
        Ok(Spanned::new(Stmt::DoWhile { body, condition }, self.span_from(start)))
    }

    /// `for (init; condition; update, ...) body`
    fn parse_for(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        self.expect(TokenKind::LParen)?;
        let init = if self.eat(TokenKind::Semi) {
            None
        } else {
            let init = self.with_struct_literals(true, |p| p.parse_for_init())?;
            self.expect(TokenKind::Semi)?;
            Some(Box::new(init))
        };
        let condition = if self.check(TokenKind::Semi) {
            None
        } else {
            Some(self.with_struct_literals(true, |p| p.parse_expr())?)
        };
        self.expect(TokenKind::Semi)?;
        let update = self.parse_expr_list_until(TokenKind::RParen)?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_embedded()?;
        Ok(Spanned::new(Stmt::For { init, condition, update, body }, self.span_from(start)))
    }

    fn parse_for_init(&mut self) -> PResult<Spanned<Stmt>> {
        if self.check(TokenKind::Let)
            || self.check(TokenKind::Var)
            || self.is_typed_declaration_ahead()
            || self.is_colon_declaration_ahead()
        {
            return self.parse_local_declaration();
        }
        let expr = self.parse_expr()?;
        let span = expr.span;
        Ok(Spanned::new(Stmt::Expr(expr), span))
    }

    /// `foreach (x in xs) body`, `foreach var x in xs body`, `foreach (T x in xs) body`.
    fn parse_foreach(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        let parens = self.eat(TokenKind::LParen);
        let ty = if self.eat(TokenKind::Var) || self.eat(TokenKind::Let) {
            None
        } else if self.check(TokenKind::Ident) && self.check_at(1, TokenKind::In) {
            None
        } else {
            Some(self.parse_type()?)
        };
        let var = self.expect_ident()?;
        self.expect(TokenKind::In)?;
        let iterable = if parens {
            let iterable = self.with_struct_literals(true, |p| p.parse_expr())?;
            self.expect(TokenKind::RParen)?;
            iterable
        } else {
            self.parse_condition()?
        };
        let body = self.parse_embedded()?;
        Ok(Spanned::new(Stmt::Foreach { var, ty, iterable, body }, self.span_from(start)))
    }

    fn parse_switch(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        let subject = self.parse_condition()?;
        self.expect(TokenKind::LBrace)?;
        let cases = self.with_struct_literals(true, |p| -> PResult<_> {
            let mut cases = Vec::new();
            while !p.check(TokenKind::RBrace) && !p.cursor.at_end() {
                cases.push(p.parse_switch_case()?);
            }
            Ok(cases)
        })?;
        self.expect(TokenKind::RBrace)?;
        Ok(Spanned::new(Stmt::Switch { subject, cases }, self.span_from(start)))
    }

    /// One or more `case v:` / `default:` labels and the statements after them.
    fn parse_switch_case(&mut self) -> PResult<SwitchCase> {
        let mut labels = Vec::new();
        let mut is_default = false;
        loop {
            if self.eat(TokenKind::Case) {
                labels.push(self.parse_expr()?);
                self.expect(TokenKind::Colon)?;
            } else if self.eat(TokenKind::Default) {
                is_default = true;
                self.expect(TokenKind::Colon)?;
            } else {
                break;
            }
        }
        if labels.is_empty() && !is_default {
            return Err(self.expected("'case' or 'default'"));
        }

        let mut body = Vec::new();
        while !matches!(
            self.cursor.current().kind,
            TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
        ) {
            let before = self.cursor.position();
            match self.parse_statement() {
                Ok(Some(stmt)) => body.push(stmt),
                Ok(None) => {}
                Err(err) => self.recover(err, SyncScope::Block)?,
            }
            if self.cursor.position() == before && !self.check(TokenKind::RBrace) {
                self.cursor.advance();
            }
        }
        Ok(SwitchCase { labels, is_default, body })
    }

    fn parse_match_statement(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        let subject = self.parse_condition()?;
        let arms = self.parse_match_arms()?;
        Ok(Spanned::new(Stmt::Match { subject, arms }, self.span_from(start)))
    }

    /// `{ pattern [if guard] => body, ... }`; separators between arms are optional.
    pub(crate) fn parse_match_arms(&mut self) -> PResult<Vec<MatchArm>> {
        self.expect(TokenKind::LBrace)?;
        let arms = self.with_struct_literals(true, |p| -> PResult<_> {
            let mut arms = Vec::new();
            while !p.check(TokenKind::RBrace) && !p.cursor.at_end() {
                let pattern = p.parse_pattern()?;
                let guard = if p.eat(TokenKind::If) {
                    Some(p.with_lambdas(false, |p| p.parse_expr())?)
                } else {
                    None
                };
                p.expect(TokenKind::FatArrow)?;
                let body = if p.check(TokenKind::LBrace) {
                    ArmBody::Block(p.parse_block()?)
                } else {
                    ArmBody::Expr(p.parse_expr()?)
                };
                arms.push(MatchArm { pattern, guard, body });
                if !p.eat(TokenKind::Comma) {
                    p.eat(TokenKind::Semi);
                }
            }
            Ok(arms)
        })?;
        self.expect(TokenKind::RBrace)?;
        Ok(arms)
    }

    pub(crate) fn parse_pattern(&mut self) -> PResult<Spanned<Pattern>> {
        self.nested(|p| {
            let tok = p.cursor.current();
            match tok.kind {
                TokenKind::Ident => {
                    p.cursor.advance();
                    let node = if tok.text == "_" { Pattern::Wildcard } else { Pattern::Binding(tok.text.clone()) };
                    Ok(Spanned::new(node, tok.span))
                }
                TokenKind::Minus if matches!(p.cursor.peek(1).kind, TokenKind::IntLit | TokenKind::FloatLit) => {
                    p.cursor.advance();
                    let lit = p.parse_literal()?;
                    let span = tok.span.to(lit.span);
                    Ok(Spanned::new(Pattern::Literal(negate(lit.node)), span))
                }
                kind if kind.is_literal() && kind != TokenKind::InterpStr => {
                    let lit = p.parse_literal()?;
                    Ok(lit.map(Pattern::Literal))
                }
                TokenKind::LParen => {
                    p.cursor.advance();
                    let mut elems = Vec::new();
                    while !p.check(TokenKind::RParen) && !p.cursor.at_end() {
                        elems.push(p.parse_pattern()?);
                        if !p.eat(TokenKind::Comma) {
                            break;
                        }
                    }
                    p.expect(TokenKind::RParen)?;
                    Ok(Spanned::new(Pattern::Tuple(elems), p.span_from(tok.span)))
                }
                _ => Err(p.expected("pattern")),
            }
        })
    }

    /// `try { } catch (T e) { } finally { }`; at least one handler is required.
    fn parse_try(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        let body = self.parse_block()?;
        let mut catches = Vec::new();
        while self.eat(TokenKind::Catch) {
            let (ty, name) = if self.eat(TokenKind::LParen) {
                let ty = self.parse_type()?;
                let name = if self.check(TokenKind::Ident) { Some(self.expect_ident()?) } else { None };
                self.expect(TokenKind::RParen)?;
                (Some(ty), name)
            } else {
                (None, None)
            };
            let body = self.parse_block()?;
            catches.push(CatchClause { ty, name, body });
        }
        let finally = if self.eat(TokenKind::Finally) { Some(self.parse_block()?) } else { None };
        if catches.is_empty() && finally.is_none() {
            return Err(self.expected("'catch' or 'finally' after try block"));
        }
        Ok(Spanned::new(Stmt::Try { body, catches, finally }, self.span_from(start)))
    }

    fn parse_return(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        let value = if self.ends_statement() { None } else { Some(self.parse_expr()?) };
        self.consume_terminator();
        Ok(Spanned::new(Stmt::Return(value), self.span_from(start)))
    }

    /// `throw e;` or a bare `throw;`. The terminator is mandatory.
    fn parse_throw(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        let value = if self.check(TokenKind::Semi) { None } else { Some(self.parse_expr()?) };
        self.expect(TokenKind::Semi)?;
        Ok(Spanned::new(Stmt::Throw(value), self.span_from(start)))
    }

    /// `yield return e`, `yield break`, `yield e`.
    fn parse_yield(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        let value = if self.eat(TokenKind::Break) {
            None
        } else {
            self.eat(TokenKind::Return);
            Some(self.parse_expr()?)
        };
        self.consume_terminator();
        Ok(Spanned::new(Stmt::Yield(value), self.span_from(start)))
    }

    /// `using (resource) body`, `using var x = e;` or the directive `using a.b;`.
    fn parse_using(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        if self.eat(TokenKind::LParen) {
            let resource = self.with_struct_literals(true, |p| p.parse_for_init())?;
            self.expect(TokenKind::RParen)?;
            let body = self.parse_embedded()?;
            return Ok(Spanned::new(
                Stmt::Using { resource: Box::new(resource), body: Some(body) },
                self.span_from(start),
            ));
        }
        let resource = if self.check(TokenKind::Var) || self.check(TokenKind::Let) {
            self.parse_local_declaration()?
        } else {
            let target = self.parse_expr()?;
            let span = target.span;
            Spanned::new(Stmt::Expr(target), span)
        };
        self.consume_terminator();
        Ok(Spanned::new(Stmt::Using { resource: Box::new(resource), body: None }, self.span_from(start)))
    }

    fn parse_lock(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.cursor.advance().span;
        let target = self.parse_condition()?;
        let body = self.parse_embedded()?;
        Ok(Spanned::new(Stmt::Lock { target, body }, self.span_from(start)))
    }

    /// `;`, `}` or end of input: nothing more belongs to this statement.
    fn ends_statement(&self) -> bool {
        matches!(
            self.cursor.current().kind,
            TokenKind::Semi | TokenKind::RBrace | TokenKind::Eof
        )
    }
}

fn negate(mut lit: Literal) -> Literal {
    lit.value = match lit.value {
        LiteralValue::Int(i) => LiteralValue::Int(-i),
        LiteralValue::Float(f) => LiteralValue::Float(-f),
        LiteralValue::Unit { value, unit } => LiteralValue::Unit { value: -value, unit },
        other => other,
    };
    lit.lexeme.insert(0, '-');
    lit
}
