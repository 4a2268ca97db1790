//! Declarations: namespaces, modules, types, enums, domains, traits,
//! implement blocks, functions, fields, macros, destructors and extern blocks.

use tracing::debug;

use crate::config::ForeignHeaderPolicy;
use crate::lexer::{LiteralValue, Token, TokenKind};
use crate::span::{Span, Spanned};

use super::ast::*;
use super::{PResult, Parser, SyncScope};

/// Where a declaration sits; member lists allow constructors and destructors.
#[derive(Clone, Copy)]
struct Owner<'n> {
    name: &'n str,
}

impl<'a> Parser<'a> {
    /// Does the current token begin a declaration (marker, modifier or
    /// declaration keyword)?
    pub(crate) fn starts_declaration(&self) -> bool {
        let tok = self.cursor.current();
        match tok.kind {
            TokenKind::LevelMarker
            | TokenKind::Namespace
            | TokenKind::Class
            | TokenKind::Interface
            | TokenKind::Struct
            | TokenKind::Union
            | TokenKind::Enum
            | TokenKind::Fn
            | TokenKind::Macro
            | TokenKind::Let
            | TokenKind::Var => true,
            TokenKind::Unsafe => !self.check_at(1, TokenKind::LBrace),
            kind if kind.is_visibility() => true,
            kind if kind.is_storage_modifier() && kind != TokenKind::Mut => true,
            TokenKind::Ident if tok.text == "thread_local" => true,
            _ => self.starts_contextual_declaration(),
        }
    }

    /// Level markers and modifiers in any order, then the declaration they
    /// apply to. A marker scopes its level to the whole declaration.
    pub(crate) fn parse_modified_declaration(&mut self) -> PResult<Spanned<Stmt>> {
        self.parse_modified_in(None)
    }

    fn parse_modified_in(&mut self, owner: Option<Owner<'_>>) -> PResult<Spanned<Stmt>> {
        let start = self.current_span();
        let mut level = None;
        let mut modifiers = Modifiers::default();
        let mut thread_local = None;
        loop {
            if let Some(marked) = self.parse_level_marker()? {
                level = Some(marked);
                continue;
            }
            if !self.parse_modifier(&mut modifiers, &mut thread_local)? {
                break;
            }
        }
        let level = level.unwrap_or(self.level);
        self.with_level(level, |p| {
            if let Some(tok) = thread_local {
                p.require_low(tok, "thread_local declaration")?;
            }
            p.parse_declaration(modifiers, owner, start)
        })
    }

    /// Consume one modifier into `modifiers`. Returns false when the current
    /// token is not a modifier.
    fn parse_modifier(
        &mut self,
        modifiers: &mut Modifiers,
        thread_local: &mut Option<&'a Token>,
    ) -> PResult<bool> {
        let tok = self.cursor.current();
        let flag = match tok.kind {
            kind if kind.is_visibility() => {
                if modifiers.visibility.is_some() {
                    return Err(self.error_at(tok, "duplicate visibility modifier"));
                }
                modifiers.visibility = Some(match kind {
                    TokenKind::Public => Visibility::Public,
                    TokenKind::Private => Visibility::Private,
                    TokenKind::Protected => Visibility::Protected,
                    _ => Visibility::Internal,
                });
                self.cursor.advance();
                return Ok(true);
            }
            TokenKind::Static => Modifier::Static,
            TokenKind::Const => Modifier::Const,
            TokenKind::Readonly => Modifier::Readonly,
            TokenKind::Abstract => Modifier::Abstract,
            TokenKind::Virtual => Modifier::Virtual,
            TokenKind::Override => Modifier::Override,
            TokenKind::Sealed => Modifier::Sealed,
            TokenKind::Async => Modifier::Async,
            TokenKind::Unsafe if !self.check_at(1, TokenKind::LBrace) => Modifier::Unsafe,
            TokenKind::Ident if tok.text == "thread_local" => {
                *thread_local = Some(tok);
                Modifier::ThreadLocal
            }
            // `extern "C" {` and `extern {` are blocks, not modifiers
            TokenKind::Ident
                if tok.text == "extern"
                    && !matches!(self.cursor.peek(1).kind, TokenKind::StringLit | TokenKind::LBrace) =>
            {
                Modifier::Extern
            }
            _ => return Ok(false),
        };
        self.cursor.advance();
        modifiers.insert(flag);
        Ok(true)
    }

    fn parse_declaration(
        &mut self,
        modifiers: Modifiers,
        owner: Option<Owner<'_>>,
        start: Span,
    ) -> PResult<Spanned<Stmt>> {
        let tok = self.cursor.current();
        let next = self.cursor.peek(1).kind;
        let node = match tok.kind {
            TokenKind::Namespace => self.parse_namespace()?,
            kind if kind.is_type_keyword() => Stmt::Type(self.parse_type_decl(modifiers)?),
            TokenKind::Enum => Stmt::Enum(self.parse_enum(modifiers)?),
            TokenKind::Fn => Stmt::Function(self.parse_function(modifiers)?),
            TokenKind::Macro => Stmt::Macro(self.parse_macro()?),
            TokenKind::Let | TokenKind::Var => {
                let field = self.parse_let(modifiers)?;
                self.consume_terminator();
                field
            }
            // `@low { ... }`
            TokenKind::LBrace if modifiers.is_empty() => Stmt::Block(self.parse_block()?.node),
            TokenKind::Tilde if owner.is_some() => Stmt::Destructor(self.parse_destructor(modifiers)?),
            _ if modifiers.has(Modifier::Const) => self.parse_constant(modifiers)?,
            TokenKind::Ident => match tok.text.as_str() {
                "module" if next == TokenKind::Ident => self.parse_module()?,
                "domain" if next == TokenKind::Ident => Stmt::Domain(self.parse_domain()?),
                "trait" if next == TokenKind::Ident => Stmt::Trait(self.parse_trait(modifiers)?),
                "implement" if matches!(next, TokenKind::Ident | TokenKind::Lt) => {
                    Stmt::Implement(self.parse_implement()?)
                }
                "destructor" if matches!(next, TokenKind::LBrace | TokenKind::LParen) => {
                    Stmt::Destructor(self.parse_destructor(modifiers)?)
                }
                "extern" if matches!(next, TokenKind::StringLit | TokenKind::LBrace) => {
                    Stmt::Extern(self.parse_extern_block()?)
                }
                name if owner.is_some_and(|o| o.name == name) && next == TokenKind::LParen => {
                    let name = self.expect_ident()?;
                    Stmt::Function(self.parse_function_rest(name, modifiers, None, true)?)
                }
                _ => {
                    let decl = self.parse_typed_declaration(modifiers)?;
                    if matches!(decl, Stmt::Field(_)) {
                        self.consume_terminator();
                    }
                    decl
                }
            },
            _ => return Err(self.expected("declaration")),
        };
        Ok(Spanned::new(node, self.span_from(start)))
    }

    /// A local binding without its terminator: `let`/`var`, `Type x = e` or
    /// `x: T = e`. Used by statement headers such as `for`, `fixed` and `using`.
    pub(crate) fn parse_local_declaration(&mut self) -> PResult<Spanned<Stmt>> {
        let start = self.current_span();
        let node = match self.cursor.current().kind {
            TokenKind::Let | TokenKind::Var => self.parse_let(Modifiers::default())?,
            _ => self.parse_typed_declaration(Modifiers::default())?,
        };
        Ok(Spanned::new(node, self.span_from(start)))
    }

    // ----- namespaces and modules ------------------------------------------

    /// `namespace A.B { ... }` or the file-scoped `namespace A.B;`.
    fn parse_namespace(&mut self) -> PResult<Stmt> {
        self.cursor.advance();
        let name = self.parse_dotted_name()?;
        let body = if self.check(TokenKind::LBrace) {
            Some(self.parse_block()?.node.stmts)
        } else {
            self.consume_terminator();
            None
        };
        Ok(Stmt::Namespace(NamespaceDecl { name, body }))
    }

    fn parse_module(&mut self) -> PResult<Stmt> {
        self.cursor.advance();
        let name = self.expect_ident()?;
        let body = self.parse_block()?.node.stmts;
        Ok(Stmt::Module(ModuleDecl { name, body }))
    }

    /// `a.b.c` or `a::b::c`, normalised to dots.
    fn parse_dotted_name(&mut self) -> PResult<Ident> {
        let first = self.expect_ident()?;
        let start = first.span;
        let mut name = first.node;
        while matches!(self.cursor.current().kind, TokenKind::Dot | TokenKind::ColonColon) {
            self.cursor.advance();
            name.push('.');
            name.push_str(&self.expect_ident()?.node);
        }
        Ok(Spanned::new(name, self.span_from(start)))
    }

    // ----- types -----------------------------------------------------------

    fn parse_type_decl(&mut self, modifiers: Modifiers) -> PResult<TypeDecl> {
        let kind = match self.cursor.advance().kind {
            TokenKind::Interface => TypeKind::Interface,
            TokenKind::Struct => TypeKind::Struct,
            TokenKind::Union => TypeKind::Union,
            _ => TypeKind::Class,
        };
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;
        let bases = if self.eat(TokenKind::Colon) { self.parse_base_list()? } else { Vec::new() };
        debug!(kind = kind.keyword(), name = %name.node, "parsing type declaration");
        let members = self.parse_member_list(&name.node, kind == TypeKind::Struct)?;
        Ok(TypeDecl { kind, name, modifiers, type_params, bases, members, level: self.level })
    }

    /// `{ members }` of a type or implement block. Each member is a recovery
    /// point: a malformed member is reported and skipped on its own.
    fn parse_member_list(&mut self, owner: &str, rejects_functions: bool) -> PResult<Vec<Spanned<Stmt>>> {
        self.expect(TokenKind::LBrace)?;
        let owner = Owner { name: owner };
        let mut members = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.cursor.at_end() {
            let before = self.cursor.position();
            let first = self.cursor.current();
            match self.parse_member(owner) {
                Ok(Some(member)) => {
                    let is_method = matches!(&member.node, Stmt::Function(f) if !f.is_constructor);
                    if rejects_functions && is_method {
                        let err = self.error_at(
                            first,
                            "functions are not allowed in struct bodies; use an implement block",
                        );
                        self.report(err)?;
                    } else {
                        members.push(member);
                    }
                }
                Ok(None) => {}
                Err(err) => self.recover(err, SyncScope::Member)?,
            }
            if self.cursor.position() == before && !self.check(TokenKind::RBrace) {
                self.cursor.advance();
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(members)
    }

    fn parse_member(&mut self, owner: Owner<'_>) -> PResult<Option<Spanned<Stmt>>> {
        if self.eat(TokenKind::Semi) {
            return Ok(None);
        }
        self.nested(|p| p.parse_modified_in(Some(owner))).map(Some)
    }

    fn parse_enum(&mut self, modifiers: Modifiers) -> PResult<EnumDecl> {
        self.cursor.advance();
        let name = self.expect_ident()?;
        let underlying = if self.eat(TokenKind::Colon) { Some(self.parse_type()?) } else { None };
        self.expect(TokenKind::LBrace)?;
        let mut variants = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.cursor.at_end() {
            let variant = self.expect_ident()?;
            let value = if self.eat(TokenKind::Eq) { Some(self.parse_expr()?) } else { None };
            variants.push(EnumVariant { name: variant, value });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(EnumDecl { name, modifiers, underlying, variants, level: self.level })
    }

    /// `domain Name { <symbol> means function [for Type]; ...declarations }`
    fn parse_domain(&mut self) -> PResult<DomainDecl> {
        self.cursor.advance();
        let name = self.expect_ident()?;
        self.expect(TokenKind::LBrace)?;
        let mut bindings = Vec::new();
        let mut members = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.cursor.at_end() {
            let before = self.cursor.position();
            let item = if self.cursor.peek(1).is_word("means") {
                self.parse_operator_binding().map(|b| bindings.push(b))
            } else {
                self.parse_statement().map(|stmt| members.extend(stmt))
            };
            if let Err(err) = item {
                self.recover(err, SyncScope::Block)?;
            }
            if self.cursor.position() == before && !self.check(TokenKind::RBrace) {
                self.cursor.advance();
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(DomainDecl { name, bindings, members, level: self.level })
    }

    fn parse_operator_binding(&mut self) -> PResult<OperatorBinding> {
        let tok = self.cursor.advance();
        let symbol = Spanned::new(tok.text.clone(), tok.span);
        self.expect_word("means")?;
        let function = self.expect_ident()?;
        let operand = if self.eat(TokenKind::For) { Some(self.parse_type()?) } else { None };
        self.consume_terminator();
        Ok(OperatorBinding { symbol, function, operand })
    }

    /// `trait Name<T> [: Super] { signatures }`. Members are implicitly abstract.
    fn parse_trait(&mut self, modifiers: Modifiers) -> PResult<TraitDecl> {
        self.cursor.advance();
        let name = self.expect_ident()?;
        let type_params = self.parse_type_params()?;
        let supertraits = if self.eat(TokenKind::Colon) { self.parse_base_list()? } else { Vec::new() };
        let members = self.parse_signature_list("trait members cannot have a body")?;
        let members = members
            .into_iter()
            .map(|mut sig| {
                sig.node.modifiers.insert(Modifier::Abstract);
                sig
            })
            .collect();
        Ok(TraitDecl { name, modifiers, type_params, supertraits, members, level: self.level })
    }

    /// `implement Trait for Type { ... }` or `implement Type { ... }`.
    fn parse_implement(&mut self) -> PResult<ImplementDecl> {
        self.cursor.advance();
        let type_params = self.parse_type_params()?;
        let first = self.parse_type()?;
        let (trait_ref, target) = if self.eat(TokenKind::For) {
            (Some(first), self.parse_type()?)
        } else {
            (None, first)
        };
        let owner = match &target.node {
            TypeExpr::Named { name, .. } => name.rsplit('.').next().unwrap_or(name).to_string(),
            _ => String::new(),
        };
        let members = self.parse_member_list(&owner, false)?;
        Ok(ImplementDecl { type_params, trait_ref, target, members, level: self.level })
    }

    // ----- functions -------------------------------------------------------

    fn parse_function(&mut self, modifiers: Modifiers) -> PResult<FunctionDecl> {
        self.cursor.advance();
        let name = self.expect_ident()?;
        self.parse_function_rest(name, modifiers, None, false)
    }

    /// Everything after the name: `<T>(params) [: T | -> T] [@level] body`.
    /// `c_return` is the return type already read in front of a C-style name.
    fn parse_function_rest(
        &mut self,
        name: Ident,
        modifiers: Modifiers,
        c_return: Option<Spanned<TypeExpr>>,
        is_constructor: bool,
    ) -> PResult<FunctionDecl> {
        let type_params = self.parse_type_params()?;
        let params = self.parse_params()?;
        let return_type = match c_return {
            Some(ty) => Some(ty),
            None if self.eat(TokenKind::Colon) || self.eat(TokenKind::Arrow) => Some(self.parse_type()?),
            None => None,
        };
        let level = self.parse_level_marker()?.unwrap_or(self.level);
        self.with_level(level, |p| {
            if modifiers.has(Modifier::Extern) && matches!(p.cursor.current().kind, TokenKind::LBrace | TokenKind::FatArrow) {
                return Err(p.error_here("extern functions cannot have a body"));
            }
            let body = p.parse_function_body()?;
            Ok(FunctionDecl { name, modifiers, type_params, params, return_type, body, is_constructor, level })
        })
    }

    /// A block, `=> expr;`, or nothing for a signature.
    fn parse_function_body(&mut self) -> PResult<Option<FunctionBody>> {
        match self.cursor.current().kind {
            TokenKind::LBrace => Ok(Some(FunctionBody::Block(self.parse_block()?))),
            TokenKind::FatArrow => {
                self.cursor.advance();
                let expr = self.parse_expr()?;
                self.consume_terminator();
                Ok(Some(FunctionBody::Expr(expr)))
            }
            TokenKind::Semi => {
                self.cursor.advance();
                Ok(None)
            }
            TokenKind::RBrace | TokenKind::Eof => Ok(None),
            _ if self.starts_statement() => Ok(None),
            _ => Err(self.expected("function body")),
        }
    }

    fn parse_params(&mut self) -> PResult<Vec<Param>> {
        self.expect(TokenKind::LParen)?;
        let mut params: Vec<Param> = Vec::new();
        while !self.check(TokenKind::RParen) && !self.cursor.at_end() {
            if params.last().is_some_and(|p| p.variadic) {
                return Err(self.error_here("variadic parameter must be last"));
            }
            params.push(self.parse_param()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    /// `name: T`, `T name`, or a bare `name`; `...` marks the variadic
    /// parameter and `= e` supplies a default.
    fn parse_param(&mut self) -> PResult<Param> {
        self.eat(TokenKind::Mut);
        let mut variadic = false;
        let (name, ty) = if self.check(TokenKind::Ident) && self.check_at(1, TokenKind::Colon) {
            let name = self.expect_ident()?;
            self.cursor.advance();
            (name, Some(self.parse_type()?))
        } else if self.check(TokenKind::Ident)
            && match self.cursor.peek(1).kind {
                TokenKind::Comma | TokenKind::RParen | TokenKind::Eq => true,
                // `rest...`, not `T... rest`
                TokenKind::Ellipsis => !self.check_at(2, TokenKind::Ident),
                _ => false,
            }
        {
            (self.expect_ident()?, None)
        } else {
            let ty = self.parse_type()?;
            variadic = self.eat(TokenKind::Ellipsis);
            (self.expect_ident()?, Some(ty))
        };
        variadic |= self.eat(TokenKind::Ellipsis);
        let default = if self.eat(TokenKind::Eq) {
            Some(self.with_struct_literals(true, |p| p.parse_expr())?)
        } else {
            None
        };
        Ok(Param { name, ty, default, variadic })
    }

    /// `{ signature; ... }` for traits and extern blocks; a body on any member
    /// is reported with `body_error`.
    fn parse_signature_list(&mut self, body_error: &str) -> PResult<Vec<Spanned<FunctionDecl>>> {
        self.expect(TokenKind::LBrace)?;
        let mut sigs = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.cursor.at_end() {
            let before = self.cursor.position();
            if !self.eat(TokenKind::Semi) {
                match self.parse_signature(body_error) {
                    Ok(sig) => sigs.push(sig),
                    Err(err) => self.recover(err, SyncScope::Member)?,
                }
            }
            if self.cursor.position() == before && !self.check(TokenKind::RBrace) {
                self.cursor.advance();
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(sigs)
    }

    /// `[modifiers] fn name<T>(params) [: T]` or C-style `T name(params)`.
    fn parse_signature(&mut self, body_error: &str) -> PResult<Spanned<FunctionDecl>> {
        let start = self.current_span();
        let mut modifiers = Modifiers::default();
        let mut thread_local = None;
        while self.parse_modifier(&mut modifiers, &mut thread_local)? {}
        if let Some(tok) = thread_local {
            return Err(self.error_at(tok, "thread_local is not allowed on a signature"));
        }

        let (name, c_return) = if self.eat(TokenKind::Fn) {
            (self.expect_ident()?, None)
        } else {
            let ty = self.parse_type()?;
            (self.expect_ident()?, Some(ty))
        };
        let type_params = self.parse_type_params()?;
        let params = self.parse_params()?;
        let return_type = match c_return {
            Some(ty) => Some(ty),
            None if self.eat(TokenKind::Colon) || self.eat(TokenKind::Arrow) => Some(self.parse_type()?),
            None => None,
        };
        if matches!(self.cursor.current().kind, TokenKind::LBrace | TokenKind::FatArrow) {
            return Err(self.error_here(body_error));
        }
        self.consume_terminator();
        let decl = FunctionDecl {
            name,
            modifiers,
            type_params,
            params,
            return_type,
            body: None,
            is_constructor: false,
            level: self.level,
        };
        Ok(Spanned::new(decl, self.span_from(start)))
    }

    // ----- fields and constants --------------------------------------------

    /// `let [mut] a[, b][: T] [= e]` / `var ...`, without the terminator.
    fn parse_let(&mut self, mut modifiers: Modifiers) -> PResult<Stmt> {
        self.cursor.advance();
        if self.eat(TokenKind::Mut) {
            modifiers.insert(Modifier::Mut);
        }
        let mut names = vec![self.expect_ident()?];
        while self.eat(TokenKind::Comma) {
            names.push(self.expect_ident()?);
        }
        let ty = if self.eat(TokenKind::Colon) { Some(self.parse_type()?) } else { None };
        let value = if self.eat(TokenKind::Eq) { Some(self.parse_expr()?) } else { None };
        Ok(Stmt::Field(FieldDecl { modifiers, names, ty, value, is_const: false, level: self.level }))
    }

    /// Colon-typed fields (`a, b: T`), C-style fields (`T a = e`, `T a, b`) and
    /// C-style functions (`T name(params) body`). Fields leave the terminator.
    fn parse_typed_declaration(&mut self, modifiers: Modifiers) -> PResult<Stmt> {
        let is_const = modifiers.has(Modifier::Const);
        if self.is_colon_declaration_ahead() {
            let mut names = vec![self.expect_ident()?];
            while self.eat(TokenKind::Comma) {
                names.push(self.expect_ident()?);
            }
            self.expect(TokenKind::Colon)?;
            let ty = Some(self.parse_type()?);
            let value = if self.eat(TokenKind::Eq) { Some(self.parse_expr()?) } else { None };
            return Ok(Stmt::Field(FieldDecl { modifiers, names, ty, value, is_const, level: self.level }));
        }
        if self.is_c_method_ahead() {
            let ty = self.parse_type()?;
            let name = self.expect_ident()?;
            return Ok(Stmt::Function(self.parse_function_rest(name, modifiers, Some(ty), false)?));
        }

        let ty = self.parse_type()?;
        let mut names = vec![self.expect_ident()?];
        let value = if self.eat(TokenKind::Eq) { Some(self.parse_expr()?) } else { None };
        if value.is_none() {
            while self.eat(TokenKind::Comma) {
                names.push(self.expect_ident()?);
            }
        }
        Ok(Stmt::Field(FieldDecl { modifiers, names, ty: Some(ty), value, is_const, level: self.level }))
    }

    /// `const NAME[: T] = e`, `const T NAME = e`. Names may span several tokens
    /// (`ε ₀`), which are concatenated.
    fn parse_constant(&mut self, modifiers: Modifiers) -> PResult<Stmt> {
        let mut ty = if self.is_typed_declaration_ahead() { Some(self.parse_type()?) } else { None };
        let name = self.parse_compound_name()?;
        if ty.is_none() && self.eat(TokenKind::Colon) {
            ty = Some(self.parse_type()?);
        }
        if !self.check(TokenKind::Eq) {
            return Err(self.expected("'=' and an initializer for constant"));
        }
        self.cursor.advance();
        let value = self.parse_expr()?;
        self.consume_terminator();
        Ok(Stmt::Field(FieldDecl {
            modifiers,
            names: vec![name],
            ty,
            value: Some(value),
            is_const: true,
            level: self.level,
        }))
    }

    fn parse_compound_name(&mut self) -> PResult<Ident> {
        let start = self.current_span();
        let mut name = String::new();
        while !matches!(
            self.cursor.current().kind,
            TokenKind::Eq
                | TokenKind::Colon
                | TokenKind::Semi
                | TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::Eof
        ) {
            name.push_str(&self.cursor.advance().text);
        }
        if name.is_empty() {
            return Err(self.expected("constant name"));
        }
        Ok(Spanned::new(name, self.span_from(start)))
    }

    // ----- macros, destructors, externs ------------------------------------

    /// `macro name($a, b, rest...) { body }`
    fn parse_macro(&mut self) -> PResult<MacroDecl> {
        self.cursor.advance();
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let mut params: Vec<MacroParam> = Vec::new();
        while !self.check(TokenKind::RParen) && !self.cursor.at_end() {
            if params.last().is_some_and(|p| p.variadic) {
                return Err(self.error_here("variadic macro parameter must be last"));
            }
            self.eat(TokenKind::Dollar);
            let param = self.expect_ident()?;
            let variadic = self.eat(TokenKind::Ellipsis);
            params.push(MacroParam { name: param, variadic });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(MacroDecl { name, params, body })
    }

    /// `destructor { }`, `destructor() { }` or `~Name() { }`.
    fn parse_destructor(&mut self, modifiers: Modifiers) -> PResult<DestructorDecl> {
        let name = if self.eat(TokenKind::Tilde) {
            Some(self.expect_ident()?)
        } else {
            self.cursor.advance();
            None
        };
        if self.eat(TokenKind::LParen) {
            if !self.check(TokenKind::RParen) {
                return Err(self.error_here("destructors take no parameters"));
            }
            self.cursor.advance();
        }
        if matches!(self.cursor.current().kind, TokenKind::Colon | TokenKind::Arrow) {
            return Err(self.error_here("destructors have no return type"));
        }
        let body = self.parse_block()?;
        Ok(DestructorDecl { name, modifiers, body })
    }

    /// `extern ["abi"] { signatures }`
    fn parse_extern_block(&mut self) -> PResult<ExternBlock> {
        self.cursor.advance();
        let abi = match &self.cursor.current().literal {
            Some(LiteralValue::Str(abi)) if self.check(TokenKind::StringLit) => {
                let abi = abi.clone();
                self.cursor.advance();
                Some(abi)
            }
            _ => None,
        };
        let functions = self.parse_signature_list("extern functions cannot have a body")?;
        Ok(ExternBlock { abi, functions })
    }

    // ----- foreign-style headers -------------------------------------------

    /// `public static int Main(string[] args) { ... }` at top level. Under the
    /// default policy the header is skipped and the body kept as a block.
    pub(crate) fn parse_foreign_header(&mut self) -> PResult<Spanned<Stmt>> {
        match self.config.foreign_headers {
            ForeignHeaderPolicy::Native => self.parse_modified_declaration(),
            ForeignHeaderPolicy::Wrap => {
                let start = self.current_span();
                debug!("wrapping foreign-style header");
                while !self.check(TokenKind::LBrace) {
                    if self.check(TokenKind::Semi) || self.cursor.at_end() {
                        return Err(self.expected("'{' after foreign-style header"));
                    }
                    self.cursor.advance();
                }
                let body = self.parse_block()?;
                Ok(Spanned::new(Stmt::Block(body.node), self.span_from(start)))
            }
        }
    }
}
