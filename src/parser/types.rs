use crate::lexer::TokenKind;
use crate::span::Spanned;

use super::ast::*;
use super::{PResult, Parser};

impl<'a> Parser<'a> {
    /// Parse a type expression.
    ///
    /// Pointer forms (`*T`, `*mut T`, `T*`) are only accepted at the Low and
    /// Assembly levels.
    pub(crate) fn parse_type(&mut self) -> PResult<Spanned<TypeExpr>> {
        self.nested(|p| p.parse_type_inner())
    }

    fn parse_type_inner(&mut self) -> PResult<Spanned<TypeExpr>> {
        let tok = self.cursor.current();
        let start = tok.span;
        let mut ty = match tok.kind {
            TokenKind::Star => {
                self.require_low(tok, "pointer type")?;
                self.cursor.advance();
                let mutable = self.eat(TokenKind::Mut);
                if !mutable {
                    self.eat(TokenKind::Const);
                }
                let inner = self.parse_type()?;
                Spanned::new(
                    TypeExpr::Pointer { inner: Box::new(inner), mutable },
                    self.span_from(start),
                )
            }
            TokenKind::Amp => {
                self.cursor.advance();
                let mutable = self.eat(TokenKind::Mut);
                let inner = self.parse_type()?;
                Spanned::new(
                    TypeExpr::Reference { inner: Box::new(inner), mutable },
                    self.span_from(start),
                )
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let elems = self.parse_type_list_until(TokenKind::RParen)?;
                self.expect(TokenKind::RParen)?;
                Spanned::new(TypeExpr::Tuple(elems), self.span_from(start))
            }
            TokenKind::Fn => {
                self.cursor.advance();
                self.expect(TokenKind::LParen)?;
                let params = self.parse_type_list_until(TokenKind::RParen)?;
                self.expect(TokenKind::RParen)?;
                let return_type = if self.eat(TokenKind::Arrow) || self.eat(TokenKind::Colon) {
                    Some(Box::new(self.parse_type()?))
                } else {
                    None
                };
                Spanned::new(TypeExpr::Function { params, return_type }, self.span_from(start))
            }
            TokenKind::Ident => self.parse_named_type()?,
            _ => return Err(self.expected("type")),
        };

        loop {
            match self.cursor.current().kind {
                TokenKind::LBracket if self.check_at(1, TokenKind::RBracket) => {
                    self.cursor.advance();
                    self.cursor.advance();
                    ty = Spanned::new(TypeExpr::Array(Box::new(ty)), self.span_from(start));
                }
                TokenKind::Question => {
                    self.cursor.advance();
                    ty = Spanned::new(TypeExpr::Nullable(Box::new(ty)), self.span_from(start));
                }
                TokenKind::Star if self.level.allows_pointers() => {
                    self.cursor.advance();
                    ty = Spanned::new(
                        TypeExpr::Pointer { inner: Box::new(ty), mutable: false },
                        self.span_from(start),
                    );
                }
                _ => break,
            }
        }
        Ok(ty)
    }

    /// `a.b.C<T, U>`; `::` separators are normalised to `.`.
    fn parse_named_type(&mut self) -> PResult<Spanned<TypeExpr>> {
        let first = self.expect_ident()?;
        let start = first.span;
        let mut name = first.node;
        while matches!(self.cursor.current().kind, TokenKind::Dot | TokenKind::ColonColon)
            && self.check_at(1, TokenKind::Ident)
        {
            self.cursor.advance();
            let segment = self.expect_ident()?;
            name.push('.');
            name.push_str(&segment.node);
        }
        let args = if self.check(TokenKind::Lt) { self.parse_type_args()? } else { Vec::new() };
        Ok(Spanned::new(TypeExpr::Named { name, args }, self.span_from(start)))
    }

    /// `<T, U>`. Each `>` closes exactly one list, so `List<List<int>>` needs
    /// no special casing.
    pub(crate) fn parse_type_args(&mut self) -> PResult<Vec<Spanned<TypeExpr>>> {
        self.expect(TokenKind::Lt)?;
        let args = self.parse_type_list_until(TokenKind::Gt)?;
        self.expect(TokenKind::Gt)?;
        Ok(args)
    }

    /// Comma-separated types up to (not including) `close`.
    pub(crate) fn parse_type_list_until(&mut self, close: TokenKind) -> PResult<Vec<Spanned<TypeExpr>>> {
        let mut types = Vec::new();
        while !self.check(close) && !self.cursor.at_end() {
            types.push(self.parse_type()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(types)
    }

    /// Base list after `:` in a type header, e.g. `: Shape, IComparable<T>`.
    pub(crate) fn parse_base_list(&mut self) -> PResult<Vec<Spanned<TypeExpr>>> {
        let mut bases = vec![self.parse_type()?];
        while self.eat(TokenKind::Comma) || self.eat(TokenKind::Plus) {
            bases.push(self.parse_type()?);
        }
        Ok(bases)
    }

    /// Generic parameter declarations: `<in T, out U: A + B, +V, -W>`.
    pub(crate) fn parse_type_params(&mut self) -> PResult<Vec<TypeParam>> {
        if !self.check(TokenKind::Lt) {
            return Ok(Vec::new());
        }
        self.cursor.advance();
        let mut params = Vec::new();
        while !self.check(TokenKind::Gt) && !self.cursor.at_end() {
            let variance = match self.cursor.current().kind {
                TokenKind::In | TokenKind::Minus => {
                    self.cursor.advance();
                    Some(Variance::Contravariant)
                }
                TokenKind::Plus => {
                    self.cursor.advance();
                    Some(Variance::Covariant)
                }
                TokenKind::Ident if self.check_word("out") && self.check_at(1, TokenKind::Ident) => {
                    self.cursor.advance();
                    Some(Variance::Covariant)
                }
                _ => None,
            };
            let name = self.expect_ident()?;
            let mut bounds = Vec::new();
            if self.eat(TokenKind::Colon) {
                bounds.push(self.parse_type()?);
                while self.eat(TokenKind::Plus) {
                    bounds.push(self.parse_type()?);
                }
            }
            params.push(TypeParam { name, variance, bounds });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt)?;
        Ok(params)
    }
}
