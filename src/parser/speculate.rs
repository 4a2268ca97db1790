//! Speculative lookahead predicates.
//!
//! Every probe takes a mark, tries the disambiguating shape, and rewinds
//! unconditionally. Probes never record diagnostics or build AST; the caller
//! re-parses for real once the shape is known.

use tracing::trace;

use crate::lexer::TokenKind;

use super::ast::Expr;
use super::Parser;

/// What follows a successfully probed `<...>` after a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GenericFollow {
    /// `name<T>(`
    Call,
    /// `Name<T> { field: v }`
    StructLit,
}

impl<'a> Parser<'a> {
    /// Run `probe` from the current position and rewind afterwards, whatever
    /// the outcome.
    pub(crate) fn lookahead(&mut self, probe: impl FnOnce(&mut Self) -> bool) -> bool {
        let mark = self.cursor.mark();
        let restrict = (self.restrict_struct_lit, self.restrict_lambda);
        let recorded = self.diagnostics.len();
        let matched = probe(self);
        self.cursor.restore(mark);
        (self.restrict_struct_lit, self.restrict_lambda) = restrict;
        debug_assert_eq!(self.diagnostics.len(), recorded, "probes must not record diagnostics");
        matched
    }

    /// Resolver 1: at `<` after a callable head, is this a type-argument list
    /// followed by `(` (or by a struct-literal body)?
    pub(crate) fn generic_follow_ahead(&mut self) -> Option<GenericFollow> {
        if !self.check(TokenKind::Lt) {
            return None;
        }
        let mut follow = None;
        self.lookahead(|p| {
            if p.parse_type_args().is_err() {
                return false;
            }
            if p.check(TokenKind::LParen) {
                follow = Some(GenericFollow::Call);
            } else if p.check(TokenKind::LBrace) && !p.restrict_struct_lit && p.struct_literal_body_ahead() {
                follow = Some(GenericFollow::StructLit);
            }
            follow.is_some()
        });
        trace!(?follow, "generic argument probe");
        follow
    }

    /// Resolver 2: does the `(` at the cursor open a lambda parameter list?
    /// Also true for a bare `x =>`.
    pub(crate) fn is_lambda_ahead(&mut self) -> bool {
        if self.restrict_lambda {
            return false;
        }
        if self.check(TokenKind::Ident) {
            return self.check_at(1, TokenKind::FatArrow);
        }
        if !self.check(TokenKind::LParen) {
            return false;
        }
        let matched = self.lookahead(|p| {
            p.cursor.advance();
            if p.eat(TokenKind::RParen) {
                return p.check(TokenKind::FatArrow);
            }
            loop {
                let untyped = p.check(TokenKind::Ident)
                    && matches!(
                        p.cursor.peek(1).kind,
                        TokenKind::Comma | TokenKind::RParen | TokenKind::Colon
                    );
                if untyped {
                    p.cursor.advance();
                    if p.eat(TokenKind::Colon) && p.parse_type().is_err() {
                        return false;
                    }
                } else {
                    if p.parse_type().is_err() || !p.check(TokenKind::Ident) {
                        return false;
                    }
                    p.cursor.advance();
                }
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            p.eat(TokenKind::RParen) && p.check(TokenKind::FatArrow)
        });
        trace!(matched, "lambda probe");
        matched
    }

    /// Resolver 3: after a name, does the `{` at the cursor open a struct literal
    /// rather than a block?
    pub(crate) fn is_struct_literal_ahead(&mut self, head: &Expr) -> bool {
        if self.restrict_struct_lit || !self.check(TokenKind::LBrace) || !is_struct_name(head) {
            return false;
        }
        let matched = self.struct_literal_body_ahead();
        trace!(matched, "struct literal probe");
        matched
    }

    /// `{}` or `{ field: ...` / `{ field = ...`, and no compound assignment
    /// targeting the literal later in the same statement.
    fn struct_literal_body_ahead(&mut self) -> bool {
        self.lookahead(|p| {
            p.cursor.advance();
            let empty = p.check(TokenKind::RBrace);
            let field_start = p.check(TokenKind::Ident)
                && matches!(p.cursor.peek(1).kind, TokenKind::Colon | TokenKind::Eq);
            if !empty && !field_start {
                return false;
            }
            p.skip_to_matching_brace();
            let mut depth = 0usize;
            loop {
                match p.cursor.current().kind {
                    TokenKind::Eof => return true,
                    TokenKind::Semi | TokenKind::Comma if depth == 0 => return true,
                    TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                    TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                        if depth == 0 {
                            return true;
                        }
                        depth -= 1;
                    }
                    kind if depth == 0 && is_compound_assign(kind) => return false,
                    _ => {}
                }
                p.cursor.advance();
            }
        })
    }

    /// Resolver 4: `public [static ...] Type Name[<T>](` at top level.
    pub(crate) fn is_foreign_header_ahead(&mut self) -> bool {
        if !self.cursor.current().kind.is_visibility() {
            return false;
        }
        let matched = self.lookahead(|p| {
            p.cursor.advance();
            while p.cursor.current().kind.is_storage_modifier() || p.check(TokenKind::Unsafe) {
                p.cursor.advance();
            }
            if !p.check(TokenKind::Ident) || p.parse_type().is_err() {
                return false;
            }
            if !p.check(TokenKind::Ident) {
                return false;
            }
            p.cursor.advance();
            if p.check(TokenKind::Lt) && p.parse_type_params().is_err() {
                return false;
            }
            p.check(TokenKind::LParen)
        });
        trace!(matched, "foreign header probe");
        matched
    }

    /// `Type name` followed by `=`, `;`, `,`, `(`, `<` or the end of the block:
    /// a C-style local, field or function declaration.
    pub(crate) fn is_typed_declaration_ahead(&mut self) -> bool {
        if !self.check(TokenKind::Ident) {
            return false;
        }
        self.lookahead(|p| {
            if p.parse_type().is_err() || !p.check(TokenKind::Ident) {
                return false;
            }
            p.cursor.advance();
            matches!(
                p.cursor.current().kind,
                TokenKind::Eq
                    | TokenKind::Semi
                    | TokenKind::Comma
                    | TokenKind::LParen
                    | TokenKind::Lt
                    | TokenKind::RBrace
                    | TokenKind::Eof
            )
        })
    }

    /// `name: Type` or the compact `a, b, c: Type`.
    pub(crate) fn is_colon_declaration_ahead(&mut self) -> bool {
        if !self.check(TokenKind::Ident) {
            return false;
        }
        self.lookahead(|p| {
            p.cursor.advance();
            while p.eat(TokenKind::Comma) {
                if !p.eat(TokenKind::Ident) {
                    return false;
                }
            }
            p.eat(TokenKind::Colon) && p.parse_type().is_ok()
        })
    }

    /// After `is`: does a type (not an arbitrary expression) follow?
    pub(crate) fn is_type_test_ahead(&mut self) -> bool {
        if !self.check(TokenKind::Ident) {
            return false;
        }
        self.lookahead(|p| {
            if p.parse_type().is_err() {
                return false;
            }
            // `x is T.y` / `x is T(...)` read as expressions
            !matches!(p.cursor.current().kind, TokenKind::LParen | TokenKind::Dot)
        })
    }

    /// `lim[var -> ...]`
    pub(crate) fn is_limit_ahead(&mut self) -> bool {
        self.check_word("lim")
            && self.check_at(1, TokenKind::LBracket)
            && self.check_at(2, TokenKind::Ident)
            && self.check_at(3, TokenKind::Arrow)
    }

    /// Inside a type body: `Type Name(` or `Type Name<T>(`.
    pub(crate) fn is_c_method_ahead(&mut self) -> bool {
        if !self.check(TokenKind::Ident) {
            return false;
        }
        self.lookahead(|p| {
            if p.parse_type().is_err() || !p.eat(TokenKind::Ident) {
                return false;
            }
            if p.check(TokenKind::Lt) && p.parse_type_params().is_err() {
                return false;
            }
            p.check(TokenKind::LParen)
        })
    }

    /// Advance past the `}` matching the `{` just consumed.
    fn skip_to_matching_brace(&mut self) {
        let mut depth = 1usize;
        while depth > 0 && !self.cursor.at_end() {
            match self.cursor.advance().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
        }
    }
}

/// Expressions that can name a struct: `Point`, `geo.Point`, `geo::Point`.
fn is_struct_name(expr: &Expr) -> bool {
    match expr {
        Expr::Ident(_) => true,
        Expr::Member { object, .. } => is_struct_name(&object.node),
        _ => false,
    }
}

fn is_compound_assign(kind: TokenKind) -> bool {
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
