//! Expression parsing.
//!
//! Precedence, loosest first: assignment, conditional, `??`, the `?.` chain
//! tier, then the binary operators handled by [`binding_power`], unary
//! prefixes, postfix operators and finally call/member/index chains.

use crate::diagnostics::CompileError;
use crate::lexer::{self, LiteralValue, Token, TokenKind, NUMERIC_SUFFIXES};
use crate::span::Spanned;

use super::ast::*;
use super::speculate::GenericFollow;
use super::{PResult, ParseError, Parser};

/// Left binding power of `*`, `/` and friends. Limit bodies extend over a
/// whole multiplicative term.
const MULTIPLICATIVE_BP: u8 = 21;

impl<'a> Parser<'a> {
    pub(crate) fn parse_expr(&mut self) -> PResult<Spanned<Expr>> {
        self.nested(|p| p.parse_assignment())
    }

    /// Assignment is right-associative: `a = b = c` is `a = (b = c)`.
    fn parse_assignment(&mut self) -> PResult<Spanned<Expr>> {
        let target = self.parse_ternary()?;
        let Some((op, width)) = self.assign_op_ahead() else {
            return Ok(target);
        };
        let op_tok = self.cursor.current();
        if !is_assignable(&target.node) {
            return Err(self.error_at(op_tok, "invalid assignment target"));
        }
        for _ in 0..width {
            self.cursor.advance();
        }
        let value = self.parse_expr()?;
        let span = target.span.to(value.span);
        Ok(Spanned::new(
            Expr::Assign { op, target: Box::new(target), value: Box::new(value) },
            span,
        ))
    }

    /// The assignment operator at the cursor and how many tokens it spans.
    /// `>>=` arrives as `>` followed directly by `>=`.
    fn assign_op_ahead(&self) -> Option<(AssignOp, usize)> {
        let op = match self.cursor.current().kind {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            TokenKind::PercentEq => AssignOp::Mod,
            TokenKind::StarStarEq => AssignOp::Pow,
            TokenKind::AmpEq => AssignOp::BitAnd,
            TokenKind::PipeEq => AssignOp::BitOr,
            TokenKind::CaretEq => AssignOp::BitXor,
            TokenKind::ShlEq => AssignOp::Shl,
            TokenKind::QuestionQuestionEq => AssignOp::Coalesce,
            TokenKind::Gt if self.adjacent_next(TokenKind::GtEq) => return Some((AssignOp::Shr, 2)),
            _ => return None,
        };
        Some((op, 1))
    }

    /// Is the token after the cursor of `kind` and touching the current one?
    fn adjacent_next(&self, kind: TokenKind) -> bool {
        let cur = self.cursor.current();
        let next = self.cursor.peek(1);
        next.kind == kind && cur.span.end == next.span.start
    }

    fn parse_ternary(&mut self) -> PResult<Spanned<Expr>> {
        let condition = self.parse_coalesce()?;
        if !self.eat(TokenKind::Question) {
            return Ok(condition);
        }
        let then_expr = self.parse_expr()?;
        self.expect(TokenKind::Colon)?;
        let else_expr = self.nested(|p| p.parse_ternary())?;
        let span = condition.span.to(else_expr.span);
        Ok(Spanned::new(
            Expr::Conditional {
                condition: Box::new(condition),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            span,
        ))
    }

    /// `a ?? b ?? c` groups to the right.
    fn parse_coalesce(&mut self) -> PResult<Spanned<Expr>> {
        let lhs = self.parse_optional_chain()?;
        if !self.eat(TokenKind::QuestionQuestion) {
            return Ok(lhs);
        }
        let rhs = self.nested(|p| p.parse_coalesce())?;
        let span = lhs.span.to(rhs.span);
        Ok(Spanned::new(
            Expr::Binary { op: BinaryOp::Coalesce, lhs: Box::new(lhs), rhs: Box::new(rhs) },
            span,
        ))
    }

    /// `obj?.a.b(c)?[i]`: everything after a `?.` up to the next operator is
    /// one chain, after which binary parsing resumes with the chain as lhs.
    fn parse_optional_chain(&mut self) -> PResult<Spanned<Expr>> {
        let mut expr = self.parse_binary(0)?;
        while self.eat(TokenKind::QuestionDot) {
            let start = expr.span;
            let mut chain = Vec::new();
            if self.eat(TokenKind::LBracket) {
                let index = self.with_struct_literals(true, |p| p.parse_expr())?;
                self.expect(TokenKind::RBracket)?;
                chain.push(ChainLink::Index(index));
            } else {
                let name = self.expect_member_name()?;
                chain.push(ChainLink::Member { access: MemberAccess::Dot, name });
            }
            loop {
                match self.cursor.current().kind {
                    TokenKind::Dot | TokenKind::Arrow | TokenKind::ColonColon => {
                        let access = member_access(self.cursor.advance().kind);
                        let name = self.expect_member_name()?;
                        chain.push(ChainLink::Member { access, name });
                    }
                    TokenKind::LParen => chain.push(ChainLink::Call(self.parse_call_args()?)),
                    TokenKind::LBracket => {
                        self.cursor.advance();
                        let index = self.with_struct_literals(true, |p| p.parse_expr())?;
                        self.expect(TokenKind::RBracket)?;
                        chain.push(ChainLink::Index(index));
                    }
                    _ => break,
                }
            }
            expr = Spanned::new(
                Expr::OptionalChain { object: Box::new(expr), chain },
                self.span_from(start),
            );
            expr = self.parse_binary_from(expr, 0)?;
        }
        Ok(expr)
    }

    fn parse_binary(&mut self, min_bp: u8) -> PResult<Spanned<Expr>> {
        let lhs = self.parse_unary()?;
        self.parse_binary_from(lhs, min_bp)
    }

    /// Precedence climbing over the binary operator table.
    fn parse_binary_from(&mut self, mut lhs: Spanned<Expr>, min_bp: u8) -> PResult<Spanned<Expr>> {
        while let Some((op, width)) = self.binary_op_ahead() {
            let (l_bp, r_bp) = binding_power(op);
            if l_bp < min_bp {
                break;
            }
            for _ in 0..width {
                self.cursor.advance();
            }

            if op == BinaryOp::Is && self.is_type_test_ahead() {
                let ty = self.parse_type()?;
                let binding = if self.check(TokenKind::Ident)
                    && !matches!(
                        self.cursor.peek(1).kind,
                        TokenKind::LParen | TokenKind::Dot | TokenKind::Eq
                    ) {
                    Some(self.expect_ident()?)
                } else {
                    None
                };
                let span = self.span_from(lhs.span);
                lhs = Spanned::new(Expr::TypeTest { expr: Box::new(lhs), ty, binding }, span);
                continue;
            }

            let rhs = self.nested(|p| p.parse_binary(r_bp))?;
            let span = lhs.span.to(rhs.span);
            lhs = Spanned::new(Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, span);
        }
        Ok(lhs)
    }

    fn binary_op_ahead(&self) -> Option<(BinaryOp, usize)> {
        let op = match self.cursor.current().kind {
            TokenKind::PipePipe => BinaryOp::Or,
            TokenKind::AmpAmp => BinaryOp::And,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::SetUnion => BinaryOp::Union,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::SetIntersect => BinaryOp::Intersection,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::BangEq | TokenKind::NotEqualSign => BinaryOp::Neq,
            TokenKind::Approx => BinaryOp::ApproxEq,
            TokenKind::In | TokenKind::ElementOf => BinaryOp::In,
            TokenKind::NotElementOf => BinaryOp::NotIn,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq | TokenKind::LessEqualSign => BinaryOp::LtEq,
            TokenKind::GtEq | TokenKind::GreaterEqualSign => BinaryOp::GtEq,
            TokenKind::Gt => {
                if self.adjacent_next(TokenKind::Gt) {
                    return Some((BinaryOp::Shr, 2));
                }
                if self.adjacent_next(TokenKind::GtEq) {
                    // `>>=`, left to the assignment tier
                    return None;
                }
                BinaryOp::Gt
            }
            TokenKind::Is => BinaryOp::Is,
            TokenKind::DotDot => BinaryOp::Range,
            TokenKind::DotDotEq | TokenKind::Ellipsis => BinaryOp::RangeInclusive,
            TokenKind::Shl => BinaryOp::Shl,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star | TokenKind::Times => BinaryOp::Mul,
            TokenKind::Slash | TokenKind::Divide => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::CDot => BinaryOp::Dot,
            TokenKind::StarStar => BinaryOp::Pow,
            _ => return None,
        };
        Some((op, 1))
    }

    // ----- prefix ----------------------------------------------------------

    fn parse_unary(&mut self) -> PResult<Spanned<Expr>> {
        let tok = self.cursor.current();
        let start = tok.span;
        let op = match tok.kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::PlusPlus => UnaryOp::PreIncrement,
            TokenKind::MinusMinus => UnaryOp::PreDecrement,
            TokenKind::Star => {
                self.require_low(tok, "pointer dereference")?;
                UnaryOp::Deref
            }
            TokenKind::Amp => return self.parse_ref(),
            TokenKind::Partial | TokenKind::Nabla | TokenKind::Sqrt => return self.parse_math_prefix(),
            TokenKind::Integral => return self.parse_integral(),
            TokenKind::Typeof | TokenKind::Sizeof | TokenKind::Nameof => return self.parse_type_query(),
            TokenKind::New => return self.parse_new(),
            TokenKind::Stackalloc => return self.parse_stackalloc(),
            TokenKind::Ident if self.is_limit_ahead() => return self.parse_limit(),
            _ => return self.parse_postfix(),
        };
        self.cursor.advance();
        let operand = self.nested(|p| p.parse_unary())?;
        Ok(Spanned::new(Expr::Unary { op, operand: Box::new(operand) }, self.span_from(start)))
    }

    /// `&x` / `&mut x`
    fn parse_ref(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.cursor.advance().span;
        let mutable = self.eat(TokenKind::Mut);
        let expr = self.nested(|p| p.parse_unary())?;
        Ok(Spanned::new(Expr::Ref { mutable, expr: Box::new(expr) }, self.span_from(start)))
    }

    fn parse_math_prefix(&mut self) -> PResult<Spanned<Expr>> {
        let tok = self.cursor.advance();
        let op = match tok.kind {
            TokenKind::Partial => MathOp::Partial,
            TokenKind::Nabla => MathOp::Nabla,
            _ => MathOp::Sqrt,
        };
        let operand = self.nested(|p| p.parse_unary())?;
        Ok(Spanned::new(
            Expr::MathPrefix { op, operand: Box::new(operand) },
            self.span_from(tok.span),
        ))
    }

    /// `∫ body dx` or `∫[lo, hi] body dx`.
    fn parse_integral(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.cursor.advance().span;
        let bounds = if self.eat(TokenKind::LBracket) {
            let (lo, hi) = self.with_struct_literals(true, |p| -> PResult<_> {
                let lo = p.parse_expr()?;
                p.expect(TokenKind::Comma)?;
                let hi = p.parse_expr()?;
                Ok((lo, hi))
            })?;
            self.expect(TokenKind::RBracket)?;
            Some((Box::new(lo), Box::new(hi)))
        } else {
            None
        };
        let body = self.nested(|p| p.parse_binary(0))?;

        let tok = self.cursor.current();
        let var = match tok.text.strip_prefix('d') {
            Some(rest) if tok.kind == TokenKind::Ident && !rest.is_empty() => {
                self.cursor.advance();
                let var_span = tok.span;
                Spanned::new(rest.to_string(), var_span)
            }
            _ => return Err(self.expected("integration variable such as 'dx'")),
        };
        Ok(Spanned::new(
            Expr::Integral { bounds, body: Box::new(body), var },
            self.span_from(start),
        ))
    }

    /// `lim[x -> a] body`; the body extends over one multiplicative term.
    fn parse_limit(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.cursor.advance().span;
        self.expect(TokenKind::LBracket)?;
        let var = self.expect_ident()?;
        self.expect(TokenKind::Arrow)?;
        let approach = self.with_struct_literals(true, |p| p.parse_expr())?;
        self.expect(TokenKind::RBracket)?;
        let body = self.nested(|p| p.parse_binary(MULTIPLICATIVE_BP))?;
        Ok(Spanned::new(
            Expr::Limit { var, approach: Box::new(approach), body: Box::new(body) },
            self.span_from(start),
        ))
    }

    /// `typeof(T)`, `sizeof(T)`, `nameof(expr)`.
    fn parse_type_query(&mut self) -> PResult<Spanned<Expr>> {
        let tok = self.cursor.advance();
        self.expect(TokenKind::LParen)?;
        let node = match tok.kind {
            TokenKind::Typeof => Expr::TypeOf(self.parse_type()?),
            TokenKind::Sizeof => Expr::SizeOf(self.parse_type()?),
            _ => Expr::NameOf(Box::new(self.with_struct_literals(true, |p| p.parse_expr())?)),
        };
        self.expect(TokenKind::RParen)?;
        Ok(Spanned::new(node, self.span_from(tok.span)))
    }

    /// `new T(args) { f = v }`, `new T[n]`, `new T[] { a, b }`.
    fn parse_new(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.cursor.advance().span;
        let ty = self.parse_type()?;

        if self.eat(TokenKind::LBracket) {
            let size = self.with_struct_literals(true, |p| p.parse_expr())?;
            self.expect(TokenKind::RBracket)?;
            let elements =
                if self.check(TokenKind::LBrace) { self.parse_brace_elements()? } else { Vec::new() };
            return Ok(Spanned::new(
                Expr::NewArray { element: ty, size: Some(Box::new(size)), elements },
                self.span_from(start),
            ));
        }
        if self.check(TokenKind::LBrace) {
            if let TypeExpr::Array(element) = ty.node {
                let elements = self.parse_brace_elements()?;
                return Ok(Spanned::new(
                    Expr::NewArray { element: *element, size: None, elements },
                    self.span_from(start),
                ));
            }
        }

        let has_args = self.check(TokenKind::LParen);
        let args = if has_args { self.parse_call_args()? } else { Vec::new() };
        let has_fields = self.check(TokenKind::LBrace) && !self.restrict_struct_lit;
        let fields = if has_fields {
            self.cursor.advance();
            let fields = self.parse_field_inits()?;
            self.expect(TokenKind::RBrace)?;
            fields
        } else {
            Vec::new()
        };
        if !has_args && !has_fields {
            return Err(self.expected("'(' or '{' after the type in a new expression"));
        }
        Ok(Spanned::new(Expr::New { ty, args, fields }, self.span_from(start)))
    }

    fn parse_stackalloc(&mut self) -> PResult<Spanned<Expr>> {
        let tok = self.cursor.current();
        self.require_low(tok, "stackalloc")?;
        self.cursor.advance();
        let element = self.parse_type()?;
        self.expect(TokenKind::LBracket)?;
        let size = self.with_struct_literals(true, |p| p.parse_expr())?;
        self.expect(TokenKind::RBracket)?;
        Ok(Spanned::new(
            Expr::StackAlloc { element, size: Box::new(size) },
            self.span_from(tok.span),
        ))
    }

    // ----- postfix and chains ----------------------------------------------

    fn parse_postfix(&mut self) -> PResult<Spanned<Expr>> {
        let mut expr = self.parse_call_chain()?;
        loop {
            let start = expr.span;
            let node = match self.cursor.current().kind {
                TokenKind::PlusPlus => {
                    self.cursor.advance();
                    Expr::Postfix { op: PostfixOp::Increment, operand: Box::new(expr) }
                }
                TokenKind::MinusMinus => {
                    self.cursor.advance();
                    Expr::Postfix { op: PostfixOp::Decrement, operand: Box::new(expr) }
                }
                TokenKind::As => {
                    self.cursor.advance();
                    let ty = self.parse_type()?;
                    Expr::Cast { expr: Box::new(expr), ty }
                }
                TokenKind::Bang if self.check_at(1, TokenKind::LParen) => {
                    self.cursor.advance();
                    let args = self.parse_call_args()?;
                    Expr::MacroCall { callee: Box::new(expr), args }
                }
                _ => break,
            };
            expr = Spanned::new(node, self.span_from(start));
        }
        Ok(expr)
    }

    fn parse_call_chain(&mut self) -> PResult<Spanned<Expr>> {
        let mut expr = self.parse_primary()?;
        loop {
            let start = expr.span;
            expr = match self.cursor.current().kind {
                TokenKind::LParen => {
                    let args = self.parse_call_args()?;
                    let node = Expr::Call { callee: Box::new(expr), type_args: Vec::new(), args };
                    Spanned::new(node, self.span_from(start))
                }
                TokenKind::Lt if is_callable_head(&expr.node) => match self.generic_follow_ahead() {
                    Some(GenericFollow::Call) => {
                        let type_args = self.parse_type_args()?;
                        let args = self.parse_call_args()?;
                        let node = Expr::Call { callee: Box::new(expr), type_args, args };
                        Spanned::new(node, self.span_from(start))
                    }
                    Some(GenericFollow::StructLit) => {
                        let type_args = self.parse_type_args()?;
                        self.parse_struct_literal(expr, type_args)?
                    }
                    None => break,
                },
                TokenKind::Dot | TokenKind::Arrow | TokenKind::ColonColon => {
                    let access = member_access(self.cursor.advance().kind);
                    let name = self.expect_member_name()?;
                    let node = Expr::Member { object: Box::new(expr), access, name };
                    Spanned::new(node, self.span_from(start))
                }
                TokenKind::LBracket => {
                    self.cursor.advance();
                    let index = self.with_struct_literals(true, |p| p.parse_expr())?;
                    self.expect(TokenKind::RBracket)?;
                    let node = Expr::Index { object: Box::new(expr), index: Box::new(index) };
                    Spanned::new(node, self.span_from(start))
                }
                TokenKind::Match if self.check_at(1, TokenKind::LBrace) => {
                    self.cursor.advance();
                    let arms = self.parse_match_arms()?;
                    Spanned::new(Expr::Match { subject: Box::new(expr), arms }, self.span_from(start))
                }
                TokenKind::LBrace if self.is_struct_literal_ahead(&expr.node) => {
                    self.parse_struct_literal(expr, Vec::new())?
                }
                _ => break,
            };
        }
        Ok(expr)
    }

    /// `Name { a: 1, b = 2 }` with the name already parsed.
    fn parse_struct_literal(
        &mut self,
        head: Spanned<Expr>,
        type_args: Vec<Spanned<TypeExpr>>,
    ) -> PResult<Spanned<Expr>> {
        let start = head.span;
        let name = Spanned::new(path_string(&head.node), head.span);
        self.expect(TokenKind::LBrace)?;
        let fields = self.parse_field_inits()?;
        self.expect(TokenKind::RBrace)?;
        Ok(Spanned::new(Expr::StructLit { name, type_args, fields }, self.span_from(start)))
    }

    /// `name: value` or `name = value` pairs up to (not including) `}`.
    fn parse_field_inits(&mut self) -> PResult<Vec<FieldInit>> {
        self.with_struct_literals(true, |p| {
            let mut fields = Vec::new();
            while !p.check(TokenKind::RBrace) && !p.cursor.at_end() {
                let name = p.expect_ident()?;
                if !p.eat(TokenKind::Colon) && !p.eat(TokenKind::Eq) {
                    return Err(p.expected("':' or '=' after field name"));
                }
                let value = p.parse_expr()?;
                fields.push(FieldInit { name, value });
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            Ok(fields)
        })
    }

    /// `{ a, b, c }` after `new T[]`.
    fn parse_brace_elements(&mut self) -> PResult<Vec<Spanned<Expr>>> {
        self.expect(TokenKind::LBrace)?;
        let elements = self.parse_expr_list_until(TokenKind::RBrace)?;
        self.expect(TokenKind::RBrace)?;
        Ok(elements)
    }

    pub(crate) fn parse_call_args(&mut self) -> PResult<Vec<Spanned<Expr>>> {
        self.expect(TokenKind::LParen)?;
        let args = self.parse_expr_list_until(TokenKind::RParen)?;
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    /// Comma-separated expressions up to (not including) `close`, with
    /// struct literals re-enabled.
    pub(crate) fn parse_expr_list_until(&mut self, close: TokenKind) -> PResult<Vec<Spanned<Expr>>> {
        self.with_struct_literals(true, |p| {
            let mut items = Vec::new();
            while !p.check(close) && !p.cursor.at_end() {
                items.push(p.parse_expr()?);
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            Ok(items)
        })
    }

    /// Member names after `.`, `->` or `::`. Keywords and tuple indices
    /// (`t.0`) are accepted.
    fn expect_member_name(&mut self) -> PResult<Ident> {
        let tok = self.cursor.current();
        let word_like = !tok.text.is_empty()
            && tok.text.chars().all(|c| c.is_alphanumeric() || c == '_')
            && tok.kind != TokenKind::Eof;
        if tok.kind == TokenKind::MathSymbol || word_like {
            self.cursor.advance();
            Ok(Spanned::new(tok.text.clone(), tok.span))
        } else {
            Err(self.expected("member name"))
        }
    }

    // ----- primary ---------------------------------------------------------

    fn parse_primary(&mut self) -> PResult<Spanned<Expr>> {
        let tok = self.cursor.current();
        match tok.kind {
            TokenKind::IntLit
            | TokenKind::FloatLit
            | TokenKind::UnitLit
            | TokenKind::StringLit
            | TokenKind::CharLit
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => {
                let lit = self.parse_literal()?;
                Ok(lit.map(Expr::Literal))
            }
            TokenKind::InterpStr => self.parse_interpolated(),
            TokenKind::Ident if !self.restrict_lambda && self.check_at(1, TokenKind::FatArrow) => {
                self.parse_lambda()
            }
            TokenKind::Ident | TokenKind::MathSymbol => {
                self.cursor.advance();
                Ok(Spanned::new(Expr::Ident(tok.text.clone()), tok.span))
            }
            TokenKind::Dollar => {
                self.cursor.advance();
                let name = self.expect_ident()?;
                Ok(Spanned::new(Expr::MacroParam(name.node), self.span_from(tok.span)))
            }
            TokenKind::LParen if self.is_lambda_ahead() => self.parse_lambda(),
            TokenKind::LParen => self.parse_paren(),
            TokenKind::LBracket => self.parse_array_or_matrix(),
            TokenKind::LBrace => self.parse_collection(),
            TokenKind::LAngle => {
                self.cursor.advance();
                let elems = self.parse_expr_list_until(TokenKind::RAngle)?;
                self.expect(TokenKind::RAngle)?;
                Ok(Spanned::new(Expr::Vector(elems), self.span_from(tok.span)))
            }
            TokenKind::Quaternion => self.parse_quaternion(),
            TokenKind::Throw => {
                self.cursor.advance();
                let operand = self.parse_expr()?;
                Ok(Spanned::new(Expr::Throw(Box::new(operand)), self.span_from(tok.span)))
            }
            TokenKind::Match => {
                self.cursor.advance();
                let subject = self.with_struct_literals(false, |p| p.parse_expr())?;
                let arms = self.parse_match_arms()?;
                Ok(Spanned::new(
                    Expr::Match { subject: Box::new(subject), arms },
                    self.span_from(tok.span),
                ))
            }
            _ => Err(self.expected("expression")),
        }
    }

    /// A literal token, fused with a directly adjacent numeric suffix
    /// (`10u8`, `2.5f`).
    pub(crate) fn parse_literal(&mut self) -> PResult<Spanned<Literal>> {
        let tok = self.cursor.current();
        let value = match (&tok.literal, tok.kind) {
            (Some(value), _) => value.clone(),
            (None, TokenKind::True) => LiteralValue::Bool(true),
            (None, TokenKind::False) => LiteralValue::Bool(false),
            (None, TokenKind::Null) => LiteralValue::Null,
            _ if tok.kind.is_literal() => {
                return Err(self.error_here(format!("malformed literal '{}'", tok.text)));
            }
            _ => return Err(self.expected("literal")),
        };
        self.cursor.advance();

        let mut lexeme = tok.text.clone();
        let mut span = tok.span;
        let mut suffix = None;
        let next = self.cursor.current();
        if matches!(tok.kind, TokenKind::IntLit | TokenKind::FloatLit)
            && next.kind == TokenKind::Ident
            && next.span.start == tok.span.end
            && NUMERIC_SUFFIXES.contains(&next.text.as_str())
        {
            self.cursor.advance();
            lexeme.push_str(&next.text);
            span = span.to(next.span);
            suffix = Some(next.text.clone());
        }
        Ok(Spanned::new(Literal { value, lexeme, suffix }, span))
    }

    /// `$"text {expr} text"`. Each hole is lexed and parsed on its own, at the
    /// current syntax level.
    fn parse_interpolated(&mut self) -> PResult<Spanned<Expr>> {
        let tok = self.cursor.advance();
        let raw = match &tok.literal {
            Some(LiteralValue::Str(s)) => s.as_str(),
            _ => tok
                .text
                .strip_prefix("$\"")
                .and_then(|s| s.strip_suffix('"'))
                .unwrap_or_default(),
        };
        // Hole offsets are relative to the body, which starts after `$"`.
        let body_start = tok.span.start + 2;

        let mut parts = Vec::new();
        let mut text = String::new();
        let mut chars = raw.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    text.push(c);
                    if let Some((_, escaped)) = chars.next() {
                        text.push(escaped);
                    }
                }
                '{' if chars.peek().map(|&(_, n)| n) == Some('{') => {
                    chars.next();
                    text.push_str("\\{");
                }
                '}' if chars.peek().map(|&(_, n)| n) == Some('}') => {
                    chars.next();
                    text.push_str("\\}");
                }
                '{' => {
                    let mut depth = 1usize;
                    let mut end = None;
                    for (j, d) in chars.by_ref() {
                        match d {
                            '{' => depth += 1,
                            '}' => {
                                depth -= 1;
                                if depth == 0 {
                                    end = Some(j);
                                    break;
                                }
                            }
                            _ => {}
                        }
                    }
                    let Some(end) = end else {
                        return Err(self.error_at(tok, "unterminated interpolation hole"));
                    };
                    if !text.is_empty() {
                        parts.push(InterpolationPart::Text(lexer::unescape(&std::mem::take(&mut text))));
                    }
                    let hole = &raw[i + 1..end];
                    parts.push(InterpolationPart::Expr(self.parse_hole(tok, hole, body_start + i + 1)?));
                }
                _ => text.push(c),
            }
        }
        if !text.is_empty() {
            parts.push(InterpolationPart::Text(lexer::unescape(&text)));
        }
        Ok(Spanned::new(Expr::Interpolated(parts), tok.span))
    }

    fn parse_hole(&mut self, tok: &Token, hole: &str, offset: usize) -> PResult<Spanned<Expr>> {
        if hole.trim().is_empty() {
            return Err(self.error_at(tok, "empty interpolation hole"));
        }
        let mut tokens = lexer::lex(hole, tok.span.file_id).map_err(|err| {
            let msg = match err {
                CompileError::Lex { msg, .. } => msg,
                other => other.to_string(),
            };
            self.error_at(tok, format!("invalid interpolation: {msg}"))
        })?;
        for t in &mut tokens {
            t.span = t.span.offset(offset);
            t.line = tok.line;
            t.column = tok.column;
            t.level = self.level;
        }
        let mut sub = Parser::with_config(&tokens, self.config.clone());
        sub.level = self.level;
        sub.depth = self.depth;
        let expr = sub.parse_whole_expr();
        // Errors recovered inside the hole count against this parse's ceiling.
        for diag in std::mem::take(&mut sub.diagnostics) {
            self.report(ParseError::Structural { message: diag.message, token: Box::new(diag.token) })?;
        }
        expr
    }

    fn parse_lambda(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.current_span();
        let params = if self.check(TokenKind::Ident) {
            let name = self.expect_ident()?;
            vec![Param { name, ty: None, default: None, variadic: false }]
        } else {
            self.expect(TokenKind::LParen)?;
            let mut params = Vec::new();
            while !self.check(TokenKind::RParen) && !self.cursor.at_end() {
                params.push(self.parse_lambda_param()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RParen)?;
            params
        };
        self.expect(TokenKind::FatArrow)?;
        let body = if self.check(TokenKind::LBrace) {
            LambdaBody::Block(self.parse_block()?)
        } else {
            LambdaBody::Expr(Box::new(self.parse_expr()?))
        };
        Ok(Spanned::new(Expr::Lambda { params, body }, self.span_from(start)))
    }

    /// `x`, `x: T` or `T x`.
    fn parse_lambda_param(&mut self) -> PResult<Param> {
        let untyped = self.check(TokenKind::Ident)
            && matches!(
                self.cursor.peek(1).kind,
                TokenKind::Comma | TokenKind::RParen | TokenKind::Colon
            );
        if untyped {
            let name = self.expect_ident()?;
            let ty = if self.eat(TokenKind::Colon) { Some(self.parse_type()?) } else { None };
            return Ok(Param { name, ty, default: None, variadic: false });
        }
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        Ok(Param { name, ty: Some(ty), default: None, variadic: false })
    }

    /// Grouping, tuple or unit.
    fn parse_paren(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.cursor.advance().span;
        if self.eat(TokenKind::RParen) {
            return Ok(Spanned::new(Expr::Tuple(Vec::new()), self.span_from(start)));
        }
        let first = self.with_struct_literals(true, |p| p.parse_expr())?;
        if self.eat(TokenKind::Comma) {
            let mut elems = vec![first];
            elems.extend(self.parse_expr_list_until(TokenKind::RParen)?);
            self.expect(TokenKind::RParen)?;
            return Ok(Spanned::new(Expr::Tuple(elems), self.span_from(start)));
        }
        self.expect(TokenKind::RParen)?;
        Ok(Spanned::new(first.node, self.span_from(start)))
    }

    /// `[a, b]` or, with `;` between rows, the matrix `[a, b; c, d]`.
    fn parse_array_or_matrix(&mut self) -> PResult<Spanned<Expr>> {
        let open = self.cursor.advance();
        let mut rows: Vec<Vec<Spanned<Expr>>> = vec![Vec::new()];
        let mut is_matrix = false;
        self.with_struct_literals(true, |p| -> PResult<()> {
            while !p.check(TokenKind::RBracket) && !p.cursor.at_end() {
                let elem = p.parse_expr()?;
                if let Some(row) = rows.last_mut() {
                    row.push(elem);
                }
                if p.eat(TokenKind::Comma) {
                    continue;
                }
                if p.eat(TokenKind::Semi) {
                    is_matrix = true;
                    rows.push(Vec::new());
                    continue;
                }
                break;
            }
            Ok(())
        })?;
        self.expect(TokenKind::RBracket)?;

        if !is_matrix {
            let elems = rows.pop().unwrap_or_default();
            return Ok(Spanned::new(Expr::Array(elems), self.span_from(open.span)));
        }
        if rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        let width = rows.first().map_or(0, |row| row.len());
        if rows.iter().any(|row| row.len() != width) {
            return Err(self.error_at(open, "matrix rows must all have the same number of elements"));
        }
        Ok(Spanned::new(Expr::Matrix(rows), self.span_from(open.span)))
    }

    /// `{ a, b }` or `{ key: value, ... }`.
    fn parse_collection(&mut self) -> PResult<Spanned<Expr>> {
        let start = self.cursor.advance().span;
        let items = self.with_struct_literals(true, |p| -> PResult<_> {
            let mut items = Vec::new();
            while !p.check(TokenKind::RBrace) && !p.cursor.at_end() {
                let first = p.parse_expr()?;
                let item = if p.eat(TokenKind::Colon) {
                    CollectionItem { key: Some(first), value: p.parse_expr()? }
                } else {
                    CollectionItem { key: None, value: first }
                };
                items.push(item);
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            Ok(items)
        })?;
        self.expect(TokenKind::RBrace)?;
        Ok(Spanned::new(Expr::Collection(items), self.span_from(start)))
    }

    /// `ℍ⟨w, x, y, z⟩`
    fn parse_quaternion(&mut self) -> PResult<Spanned<Expr>> {
        let tok = self.cursor.advance();
        self.expect(TokenKind::LAngle)?;
        let parts = self.parse_expr_list_until(TokenKind::RAngle)?;
        self.expect(TokenKind::RAngle)?;
        let found = parts.len();
        let parts: [Spanned<Expr>; 4] = parts.try_into().map_err(|_| {
            self.error_at(tok, format!("quaternion literal needs exactly four components, found {found}"))
        })?;
        Ok(Spanned::new(Expr::Quaternion(Box::new(parts)), self.span_from(tok.span)))
    }
}

fn binding_power(op: BinaryOp) -> (u8, u8) {
    match op {
        BinaryOp::Or => (1, 2),
        BinaryOp::And => (3, 4),
        BinaryOp::BitOr | BinaryOp::Union => (5, 6),
        BinaryOp::BitXor => (7, 8),
        BinaryOp::BitAnd | BinaryOp::Intersection => (9, 10),
        BinaryOp::Eq | BinaryOp::Neq | BinaryOp::ApproxEq | BinaryOp::In | BinaryOp::NotIn => (11, 12),
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq | BinaryOp::Is => (13, 14),
        BinaryOp::Range | BinaryOp::RangeInclusive => (15, 16),
        BinaryOp::Shl | BinaryOp::Shr => (17, 18),
        BinaryOp::Add | BinaryOp::Sub => (19, 20),
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod | BinaryOp::Dot => (MULTIPLICATIVE_BP, 22),
        // right-associative
        BinaryOp::Pow => (24, 23),
        // handled by its own tier
        BinaryOp::Coalesce => (0, 0),
    }
}

fn member_access(kind: TokenKind) -> MemberAccess {
    match kind {
        TokenKind::Arrow => MemberAccess::Arrow,
        TokenKind::ColonColon => MemberAccess::Path,
        _ => MemberAccess::Dot,
    }
}

fn is_assignable(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Ident(_)
            | Expr::MacroParam(_)
            | Expr::Member { .. }
            | Expr::Index { .. }
            | Expr::Unary { op: UnaryOp::Deref, .. }
    )
}

fn is_callable_head(expr: &Expr) -> bool {
    matches!(expr, Expr::Ident(_) | Expr::Member { .. })
}

/// `geo.Point` for the struct-literal name; `::` and `->` collapse to `.`.
fn path_string(expr: &Expr) -> String {
    match expr {
        Expr::Ident(name) => name.clone(),
        Expr::Member { object, name, .. } => format!("{}.{}", path_string(&object.node), name.node),
        _ => String::new(),
    }
}
