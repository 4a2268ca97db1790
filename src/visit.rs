//! AST visitor infrastructure
//!
//! Two traits with matching walk functions for traversing a parsed program:
//!
//! - `Visitor`: shared-reference traversal (analysis and collection passes)
//! - `VisitMut`: mutable traversal (in-place rewriting passes)
//!
//! ## Usage
//!
//! Implement a trait for your pass and override only the methods you need.
//! Call the matching `walk_*` function inside an override to keep the default
//! recursion; leave it out to prune the traversal at that node.
//!
//! ```rust
//! use quadra::parser::ast::Expr;
//! use quadra::span::Spanned;
//! use quadra::visit::{Visitor, walk_expr};
//! use std::collections::HashSet;
//!
//! #[derive(Default)]
//! struct IdentCollector {
//!     names: HashSet<String>,
//! }
//!
//! impl Visitor for IdentCollector {
//!     fn visit_expr(&mut self, expr: &Spanned<Expr>) {
//!         if let Expr::Ident(name) = &expr.node {
//!             self.names.insert(name.clone());
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//! ```
//!
//! The walks match every variant exhaustively, so adding a node kind to the
//! AST fails to compile here until its children are traversed.

use crate::parser::ast::*;
use crate::span::Spanned;

// ============================================================================
// Visitor Trait (Read-Only)
// ============================================================================

/// Read-only AST visitor. Default implementations recurse into all children.
pub trait Visitor: Sized {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_stmt(&mut self, stmt: &Spanned<Stmt>) {
        walk_stmt(self, stmt);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_type_decl(&mut self, decl: &TypeDecl) {
        walk_type_decl(self, decl);
    }

    fn visit_function(&mut self, func: &FunctionDecl) {
        walk_function(self, func);
    }

    fn visit_expr(&mut self, expr: &Spanned<Expr>) {
        walk_expr(self, expr);
    }

    fn visit_pattern(&mut self, pattern: &Spanned<Pattern>) {
        walk_pattern(self, pattern);
    }

    fn visit_type_expr(&mut self, te: &Spanned<TypeExpr>) {
        walk_type_expr(self, te);
    }
}

// ============================================================================
// Walk Functions (Read-Only)
// ============================================================================

pub fn walk_program<V: Visitor>(v: &mut V, program: &Program) {
    for stmt in &program.statements {
        v.visit_stmt(stmt);
    }
}

pub fn walk_block<V: Visitor>(v: &mut V, block: &Block) {
    for stmt in &block.stmts {
        v.visit_stmt(stmt);
    }
}

fn walk_type_params<V: Visitor>(v: &mut V, params: &[TypeParam]) {
    for param in params {
        for bound in &param.bounds {
            v.visit_type_expr(bound);
        }
    }
}

fn walk_params<V: Visitor>(v: &mut V, params: &[Param]) {
    for param in params {
        if let Some(ty) = &param.ty {
            v.visit_type_expr(ty);
        }
        if let Some(default) = &param.default {
            v.visit_expr(default);
        }
    }
}

fn walk_arms<V: Visitor>(v: &mut V, arms: &[MatchArm]) {
    for arm in arms {
        v.visit_pattern(&arm.pattern);
        if let Some(guard) = &arm.guard {
            v.visit_expr(guard);
        }
        match &arm.body {
            ArmBody::Expr(expr) => v.visit_expr(expr),
            ArmBody::Block(block) => v.visit_block(&block.node),
        }
    }
}

pub fn walk_type_decl<V: Visitor>(v: &mut V, decl: &TypeDecl) {
    walk_type_params(v, &decl.type_params);
    for base in &decl.bases {
        v.visit_type_expr(base);
    }
    for member in &decl.members {
        v.visit_stmt(member);
    }
}

pub fn walk_function<V: Visitor>(v: &mut V, func: &FunctionDecl) {
    walk_type_params(v, &func.type_params);
    walk_params(v, &func.params);
    if let Some(rt) = &func.return_type {
        v.visit_type_expr(rt);
    }
    match &func.body {
        Some(FunctionBody::Block(block)) => v.visit_block(&block.node),
        Some(FunctionBody::Expr(expr)) => v.visit_expr(expr),
        None => {}
    }
}

pub fn walk_stmt<V: Visitor>(v: &mut V, stmt: &Spanned<Stmt>) {
    match &stmt.node {
        Stmt::Namespace(ns) => {
            for s in ns.body.iter().flatten() {
                v.visit_stmt(s);
            }
        }
        Stmt::Module(module) => {
            for s in &module.body {
                v.visit_stmt(s);
            }
        }
        Stmt::Type(decl) => v.visit_type_decl(decl),
        Stmt::Enum(decl) => {
            if let Some(ty) = &decl.underlying {
                v.visit_type_expr(ty);
            }
            for variant in &decl.variants {
                if let Some(value) = &variant.value {
                    v.visit_expr(value);
                }
            }
        }
        Stmt::Domain(domain) => {
            for binding in &domain.bindings {
                if let Some(ty) = &binding.operand {
                    v.visit_type_expr(ty);
                }
            }
            for member in &domain.members {
                v.visit_stmt(member);
            }
        }
        Stmt::Trait(decl) => {
            walk_type_params(v, &decl.type_params);
            for sup in &decl.supertraits {
                v.visit_type_expr(sup);
            }
            for member in &decl.members {
                v.visit_function(&member.node);
            }
        }
        Stmt::Implement(decl) => {
            walk_type_params(v, &decl.type_params);
            if let Some(tr) = &decl.trait_ref {
                v.visit_type_expr(tr);
            }
            v.visit_type_expr(&decl.target);
            for member in &decl.members {
                v.visit_stmt(member);
            }
        }
        Stmt::Function(func) => v.visit_function(func),
        Stmt::Field(field) => {
            if let Some(ty) = &field.ty {
                v.visit_type_expr(ty);
            }
            if let Some(value) = &field.value {
                v.visit_expr(value);
            }
        }
        Stmt::Macro(decl) => v.visit_block(&decl.body.node),
        Stmt::Destructor(decl) => v.visit_block(&decl.body.node),
        Stmt::Extern(block) => {
            for func in &block.functions {
                v.visit_function(&func.node);
            }
        }
        Stmt::If { condition, then_branch, else_branch } => {
            v.visit_expr(condition);
            v.visit_stmt(then_branch);
            if let Some(else_branch) = else_branch {
                v.visit_stmt(else_branch);
            }
        }
        Stmt::While { condition, body } => {
            v.visit_expr(condition);
            v.visit_stmt(body);
        }
        Stmt::For { init, condition, update, body } => {
            if let Some(init) = init {
                v.visit_stmt(init);
            }
            if let Some(condition) = condition {
                v.visit_expr(condition);
            }
            for u in update {
                v.visit_expr(u);
            }
            v.visit_stmt(body);
        }
        Stmt::ForRange { start, end, body, .. } => {
            v.visit_expr(start);
            v.visit_expr(end);
            v.visit_stmt(body);
        }
        Stmt::Foreach { ty, iterable, body, .. } => {
            if let Some(ty) = ty {
                v.visit_type_expr(ty);
            }
            v.visit_expr(iterable);
            v.visit_stmt(body);
        }
        Stmt::DoWhile { body, condition } => {
            v.visit_stmt(body);
            v.visit_expr(condition);
        }
        Stmt::Switch { subject, cases } => {
            v.visit_expr(subject);
            for case in cases {
                for label in &case.labels {
                    v.visit_expr(label);
                }
                for s in &case.body {
                    v.visit_stmt(s);
                }
            }
        }
        Stmt::Match { subject, arms } => {
            v.visit_expr(subject);
            walk_arms(v, arms);
        }
        Stmt::Try { body, catches, finally } => {
            v.visit_block(&body.node);
            for catch in catches {
                if let Some(ty) = &catch.ty {
                    v.visit_type_expr(ty);
                }
                v.visit_block(&catch.body.node);
            }
            if let Some(finally) = finally {
                v.visit_block(&finally.node);
            }
        }
        Stmt::Unsafe(block) => v.visit_block(&block.node),
        Stmt::Fixed { decl, body } => {
            v.visit_stmt(decl);
            v.visit_stmt(body);
        }
        Stmt::Using { resource, body } => {
            v.visit_stmt(resource);
            if let Some(body) = body {
                v.visit_stmt(body);
            }
        }
        Stmt::Lock { target, body } => {
            v.visit_expr(target);
            v.visit_stmt(body);
        }
        Stmt::Block(block) => v.visit_block(block),
        Stmt::Return(expr) | Stmt::Throw(expr) | Stmt::Yield(expr) => {
            if let Some(expr) = expr {
                v.visit_expr(expr);
            }
        }
        Stmt::Expr(expr) => v.visit_expr(expr),
        Stmt::Break | Stmt::Continue | Stmt::InlineAsm { .. } => {}
    }
}

pub fn walk_expr<V: Visitor>(v: &mut V, expr: &Spanned<Expr>) {
    match &expr.node {
        Expr::Literal(_) | Expr::Ident(_) | Expr::MacroParam(_) => {}
        Expr::Binary { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        Expr::Unary { operand, .. }
        | Expr::MathPrefix { operand, .. }
        | Expr::Postfix { operand, .. } => v.visit_expr(operand),
        Expr::Assign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        Expr::Call { callee, type_args, args } => {
            v.visit_expr(callee);
            for ta in type_args {
                v.visit_type_expr(ta);
            }
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::MacroCall { callee, args } => {
            v.visit_expr(callee);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::Member { object, .. } => v.visit_expr(object),
        Expr::OptionalChain { object, chain } => {
            v.visit_expr(object);
            for link in chain {
                match link {
                    ChainLink::Member { .. } => {}
                    ChainLink::Call(args) => {
                        for arg in args {
                            v.visit_expr(arg);
                        }
                    }
                    ChainLink::Index(index) => v.visit_expr(index),
                }
            }
        }
        Expr::Index { object, index } => {
            v.visit_expr(object);
            v.visit_expr(index);
        }
        Expr::Lambda { params, body } => {
            walk_params(v, params);
            match body {
                LambdaBody::Expr(e) => v.visit_expr(e),
                LambdaBody::Block(block) => v.visit_block(&block.node),
            }
        }
        Expr::Conditional { condition, then_expr, else_expr } => {
            v.visit_expr(condition);
            v.visit_expr(then_expr);
            v.visit_expr(else_expr);
        }
        Expr::New { ty, args, fields } => {
            v.visit_type_expr(ty);
            for arg in args {
                v.visit_expr(arg);
            }
            for field in fields {
                v.visit_expr(&field.value);
            }
        }
        Expr::NewArray { element, size, elements } => {
            v.visit_type_expr(element);
            if let Some(size) = size {
                v.visit_expr(size);
            }
            for e in elements {
                v.visit_expr(e);
            }
        }
        Expr::StackAlloc { element, size } => {
            v.visit_type_expr(element);
            v.visit_expr(size);
        }
        Expr::Array(elements) | Expr::Tuple(elements) | Expr::Vector(elements) => {
            for e in elements {
                v.visit_expr(e);
            }
        }
        Expr::Collection(items) => {
            for item in items {
                if let Some(key) = &item.key {
                    v.visit_expr(key);
                }
                v.visit_expr(&item.value);
            }
        }
        Expr::StructLit { type_args, fields, .. } => {
            for ta in type_args {
                v.visit_type_expr(ta);
            }
            for field in fields {
                v.visit_expr(&field.value);
            }
        }
        Expr::Matrix(rows) => {
            for e in rows.iter().flatten() {
                v.visit_expr(e);
            }
        }
        Expr::Quaternion(parts) => {
            for e in parts.iter() {
                v.visit_expr(e);
            }
        }
        Expr::Interpolated(parts) => {
            for part in parts {
                if let InterpolationPart::Expr(e) = part {
                    v.visit_expr(e);
                }
            }
        }
        Expr::TypeTest { expr, ty, .. } | Expr::Cast { expr, ty } => {
            v.visit_expr(expr);
            v.visit_type_expr(ty);
        }
        Expr::TypeOf(ty) | Expr::SizeOf(ty) => v.visit_type_expr(ty),
        Expr::NameOf(e) | Expr::Ref { expr: e, .. } | Expr::Throw(e) => v.visit_expr(e),
        Expr::Match { subject, arms } => {
            v.visit_expr(subject);
            walk_arms(v, arms);
        }
        Expr::Limit { approach, body, .. } => {
            v.visit_expr(approach);
            v.visit_expr(body);
        }
        Expr::Integral { bounds, body, .. } => {
            if let Some((lo, hi)) = bounds {
                v.visit_expr(lo);
                v.visit_expr(hi);
            }
            v.visit_expr(body);
        }
    }
}

pub fn walk_pattern<V: Visitor>(v: &mut V, pattern: &Spanned<Pattern>) {
    if let Pattern::Tuple(items) = &pattern.node {
        for item in items {
            v.visit_pattern(item);
        }
    }
}

pub fn walk_type_expr<V: Visitor>(v: &mut V, te: &Spanned<TypeExpr>) {
    match &te.node {
        TypeExpr::Named { args, .. } | TypeExpr::Tuple(args) => {
            for arg in args {
                v.visit_type_expr(arg);
            }
        }
        TypeExpr::Array(inner)
        | TypeExpr::Nullable(inner)
        | TypeExpr::Pointer { inner, .. }
        | TypeExpr::Reference { inner, .. } => v.visit_type_expr(inner),
        TypeExpr::Function { params, return_type } => {
            for p in params {
                v.visit_type_expr(p);
            }
            if let Some(rt) = return_type {
                v.visit_type_expr(rt);
            }
        }
    }
}

// ============================================================================
// VisitMut Trait (Mutable)
// ============================================================================

/// Mutable AST visitor for rewriting passes. Default implementations recurse
/// into all children.
pub trait VisitMut: Sized {
    fn visit_program_mut(&mut self, program: &mut Program) {
        walk_program_mut(self, program);
    }

    fn visit_stmt_mut(&mut self, stmt: &mut Spanned<Stmt>) {
        walk_stmt_mut(self, stmt);
    }

    fn visit_block_mut(&mut self, block: &mut Block) {
        walk_block_mut(self, block);
    }

    fn visit_type_decl_mut(&mut self, decl: &mut TypeDecl) {
        walk_type_decl_mut(self, decl);
    }

    fn visit_function_mut(&mut self, func: &mut FunctionDecl) {
        walk_function_mut(self, func);
    }

    fn visit_expr_mut(&mut self, expr: &mut Spanned<Expr>) {
        walk_expr_mut(self, expr);
    }

    fn visit_pattern_mut(&mut self, pattern: &mut Spanned<Pattern>) {
        walk_pattern_mut(self, pattern);
    }

    fn visit_type_expr_mut(&mut self, te: &mut Spanned<TypeExpr>) {
        walk_type_expr_mut(self, te);
    }
}

// ============================================================================
// Walk Functions (Mutable)
// ============================================================================

pub fn walk_program_mut<V: VisitMut>(v: &mut V, program: &mut Program) {
    for stmt in &mut program.statements {
        v.visit_stmt_mut(stmt);
    }
}

pub fn walk_block_mut<V: VisitMut>(v: &mut V, block: &mut Block) {
    for stmt in &mut block.stmts {
        v.visit_stmt_mut(stmt);
    }
}

fn walk_type_params_mut<V: VisitMut>(v: &mut V, params: &mut [TypeParam]) {
    for param in params {
        for bound in &mut param.bounds {
            v.visit_type_expr_mut(bound);
        }
    }
}

fn walk_params_mut<V: VisitMut>(v: &mut V, params: &mut [Param]) {
    for param in params {
        if let Some(ty) = &mut param.ty {
            v.visit_type_expr_mut(ty);
        }
        if let Some(default) = &mut param.default {
            v.visit_expr_mut(default);
        }
    }
}

fn walk_arms_mut<V: VisitMut>(v: &mut V, arms: &mut [MatchArm]) {
    for arm in arms {
        v.visit_pattern_mut(&mut arm.pattern);
        if let Some(guard) = &mut arm.guard {
            v.visit_expr_mut(guard);
        }
        match &mut arm.body {
            ArmBody::Expr(expr) => v.visit_expr_mut(expr),
            ArmBody::Block(block) => v.visit_block_mut(&mut block.node),
        }
    }
}

pub fn walk_type_decl_mut<V: VisitMut>(v: &mut V, decl: &mut TypeDecl) {
    walk_type_params_mut(v, &mut decl.type_params);
    for base in &mut decl.bases {
        v.visit_type_expr_mut(base);
    }
    for member in &mut decl.members {
        v.visit_stmt_mut(member);
    }
}

pub fn walk_function_mut<V: VisitMut>(v: &mut V, func: &mut FunctionDecl) {
    walk_type_params_mut(v, &mut func.type_params);
    walk_params_mut(v, &mut func.params);
    if let Some(rt) = &mut func.return_type {
        v.visit_type_expr_mut(rt);
    }
    match &mut func.body {
        Some(FunctionBody::Block(block)) => v.visit_block_mut(&mut block.node),
        Some(FunctionBody::Expr(expr)) => v.visit_expr_mut(expr),
        None => {}
    }
}

pub fn walk_stmt_mut<V: VisitMut>(v: &mut V, stmt: &mut Spanned<Stmt>) {
    match &mut stmt.node {
        Stmt::Namespace(ns) => {
            for s in ns.body.iter_mut().flatten() {
                v.visit_stmt_mut(s);
            }
        }
        Stmt::Module(module) => {
            for s in &mut module.body {
                v.visit_stmt_mut(s);
            }
        }
        Stmt::Type(decl) => v.visit_type_decl_mut(decl),
        Stmt::Enum(decl) => {
            if let Some(ty) = &mut decl.underlying {
                v.visit_type_expr_mut(ty);
            }
            for variant in &mut decl.variants {
                if let Some(value) = &mut variant.value {
                    v.visit_expr_mut(value);
                }
            }
        }
        Stmt::Domain(domain) => {
            for binding in &mut domain.bindings {
                if let Some(ty) = &mut binding.operand {
                    v.visit_type_expr_mut(ty);
                }
            }
            for member in &mut domain.members {
                v.visit_stmt_mut(member);
            }
        }
        Stmt::Trait(decl) => {
            walk_type_params_mut(v, &mut decl.type_params);
            for sup in &mut decl.supertraits {
                v.visit_type_expr_mut(sup);
            }
            for member in &mut decl.members {
                v.visit_function_mut(&mut member.node);
            }
        }
        Stmt::Implement(decl) => {
            walk_type_params_mut(v, &mut decl.type_params);
            if let Some(tr) = &mut decl.trait_ref {
                v.visit_type_expr_mut(tr);
            }
            v.visit_type_expr_mut(&mut decl.target);
            for member in &mut decl.members {
                v.visit_stmt_mut(member);
            }
        }
        Stmt::Function(func) => v.visit_function_mut(func),
        Stmt::Field(field) => {
            if let Some(ty) = &mut field.ty {
                v.visit_type_expr_mut(ty);
            }
            if let Some(value) = &mut field.value {
                v.visit_expr_mut(value);
            }
        }
        Stmt::Macro(decl) => v.visit_block_mut(&mut decl.body.node),
        Stmt::Destructor(decl) => v.visit_block_mut(&mut decl.body.node),
        Stmt::Extern(block) => {
            for func in &mut block.functions {
                v.visit_function_mut(&mut func.node);
            }
        }
        Stmt::If { condition, then_branch, else_branch } => {
            v.visit_expr_mut(condition);
            v.visit_stmt_mut(then_branch);
            if let Some(else_branch) = else_branch {
                v.visit_stmt_mut(else_branch);
            }
        }
        Stmt::While { condition, body } => {
            v.visit_expr_mut(condition);
            v.visit_stmt_mut(body);
        }
        Stmt::For { init, condition, update, body } => {
            if let Some(init) = init {
                v.visit_stmt_mut(init);
            }
            if let Some(condition) = condition {
                v.visit_expr_mut(condition);
            }
            for u in update {
                v.visit_expr_mut(u);
            }
            v.visit_stmt_mut(body);
        }
        Stmt::ForRange { start, end, body, .. } => {
            v.visit_expr_mut(start);
            v.visit_expr_mut(end);
            v.visit_stmt_mut(body);
        }
        Stmt::Foreach { ty, iterable, body, .. } => {
            if let Some(ty) = ty {
                v.visit_type_expr_mut(ty);
            }
            v.visit_expr_mut(iterable);
            v.visit_stmt_mut(body);
        }
        Stmt::DoWhile { body, condition } => {
            v.visit_stmt_mut(body);
            v.visit_expr_mut(condition);
        }
        Stmt::Switch { subject, cases } => {
            v.visit_expr_mut(subject);
            for case in cases {
                for label in &mut case.labels {
                    v.visit_expr_mut(label);
                }
                for s in &mut case.body {
                    v.visit_stmt_mut(s);
                }
            }
        }
        Stmt::Match { subject, arms } => {
            v.visit_expr_mut(subject);
            walk_arms_mut(v, arms);
        }
        Stmt::Try { body, catches, finally } => {
            v.visit_block_mut(&mut body.node);
            for catch in catches {
                if let Some(ty) = &mut catch.ty {
                    v.visit_type_expr_mut(ty);
                }
                v.visit_block_mut(&mut catch.body.node);
            }
            if let Some(finally) = finally {
                v.visit_block_mut(&mut finally.node);
            }
        }
        Stmt::Unsafe(block) => v.visit_block_mut(&mut block.node),
        Stmt::Fixed { decl, body } => {
            v.visit_stmt_mut(decl);
            v.visit_stmt_mut(body);
        }
        Stmt::Using { resource, body } => {
            v.visit_stmt_mut(resource);
            if let Some(body) = body {
                v.visit_stmt_mut(body);
            }
        }
        Stmt::Lock { target, body } => {
            v.visit_expr_mut(target);
            v.visit_stmt_mut(body);
        }
        Stmt::Block(block) => v.visit_block_mut(block),
        Stmt::Return(expr) | Stmt::Throw(expr) | Stmt::Yield(expr) => {
            if let Some(expr) = expr {
                v.visit_expr_mut(expr);
            }
        }
        Stmt::Expr(expr) => v.visit_expr_mut(expr),
        Stmt::Break | Stmt::Continue | Stmt::InlineAsm { .. } => {}
    }
}

pub fn walk_expr_mut<V: VisitMut>(v: &mut V, expr: &mut Spanned<Expr>) {
    match &mut expr.node {
        Expr::Literal(_) | Expr::Ident(_) | Expr::MacroParam(_) => {}
        Expr::Binary { lhs, rhs, .. } => {
            v.visit_expr_mut(lhs);
            v.visit_expr_mut(rhs);
        }
        Expr::Unary { operand, .. }
        | Expr::MathPrefix { operand, .. }
        | Expr::Postfix { operand, .. } => v.visit_expr_mut(operand),
        Expr::Assign { target, value, .. } => {
            v.visit_expr_mut(target);
            v.visit_expr_mut(value);
        }
        Expr::Call { callee, type_args, args } => {
            v.visit_expr_mut(callee);
            for ta in type_args {
                v.visit_type_expr_mut(ta);
            }
            for arg in args {
                v.visit_expr_mut(arg);
            }
        }
        Expr::MacroCall { callee, args } => {
            v.visit_expr_mut(callee);
            for arg in args {
                v.visit_expr_mut(arg);
            }
        }
        Expr::Member { object, .. } => v.visit_expr_mut(object),
        Expr::OptionalChain { object, chain } => {
            v.visit_expr_mut(object);
            for link in chain {
                match link {
                    ChainLink::Member { .. } => {}
                    ChainLink::Call(args) => {
                        for arg in args {
                            v.visit_expr_mut(arg);
                        }
                    }
                    ChainLink::Index(index) => v.visit_expr_mut(index),
                }
            }
        }
        Expr::Index { object, index } => {
            v.visit_expr_mut(object);
            v.visit_expr_mut(index);
        }
        Expr::Lambda { params, body } => {
            walk_params_mut(v, params);
            match body {
                LambdaBody::Expr(e) => v.visit_expr_mut(e),
                LambdaBody::Block(block) => v.visit_block_mut(&mut block.node),
            }
        }
        Expr::Conditional { condition, then_expr, else_expr } => {
            v.visit_expr_mut(condition);
            v.visit_expr_mut(then_expr);
            v.visit_expr_mut(else_expr);
        }
        Expr::New { ty, args, fields } => {
            v.visit_type_expr_mut(ty);
            for arg in args {
                v.visit_expr_mut(arg);
            }
            for field in fields {
                v.visit_expr_mut(&mut field.value);
            }
        }
        Expr::NewArray { element, size, elements } => {
            v.visit_type_expr_mut(element);
            if let Some(size) = size {
                v.visit_expr_mut(size);
            }
            for e in elements {
                v.visit_expr_mut(e);
            }
        }
        Expr::StackAlloc { element, size } => {
            v.visit_type_expr_mut(element);
            v.visit_expr_mut(size);
        }
        Expr::Array(elements) | Expr::Tuple(elements) | Expr::Vector(elements) => {
            for e in elements {
                v.visit_expr_mut(e);
            }
        }
        Expr::Collection(items) => {
            for item in items {
                if let Some(key) = &mut item.key {
                    v.visit_expr_mut(key);
                }
                v.visit_expr_mut(&mut item.value);
            }
        }
        Expr::StructLit { type_args, fields, .. } => {
            for ta in type_args {
                v.visit_type_expr_mut(ta);
            }
            for field in fields {
                v.visit_expr_mut(&mut field.value);
            }
        }
        Expr::Matrix(rows) => {
            for e in rows.iter_mut().flatten() {
                v.visit_expr_mut(e);
            }
        }
        Expr::Quaternion(parts) => {
            for e in parts.iter_mut() {
                v.visit_expr_mut(e);
            }
        }
        Expr::Interpolated(parts) => {
            for part in parts {
                if let InterpolationPart::Expr(e) = part {
                    v.visit_expr_mut(e);
                }
            }
        }
        Expr::TypeTest { expr, ty, .. } | Expr::Cast { expr, ty } => {
            v.visit_expr_mut(expr);
            v.visit_type_expr_mut(ty);
        }
        Expr::TypeOf(ty) | Expr::SizeOf(ty) => v.visit_type_expr_mut(ty),
        Expr::NameOf(e) | Expr::Ref { expr: e, .. } | Expr::Throw(e) => v.visit_expr_mut(e),
        Expr::Match { subject, arms } => {
            v.visit_expr_mut(subject);
            walk_arms_mut(v, arms);
        }
        Expr::Limit { approach, body, .. } => {
            v.visit_expr_mut(approach);
            v.visit_expr_mut(body);
        }
        Expr::Integral { bounds, body, .. } => {
            if let Some((lo, hi)) = bounds {
                v.visit_expr_mut(lo);
                v.visit_expr_mut(hi);
            }
            v.visit_expr_mut(body);
        }
    }
}

pub fn walk_pattern_mut<V: VisitMut>(v: &mut V, pattern: &mut Spanned<Pattern>) {
    if let Pattern::Tuple(items) = &mut pattern.node {
        for item in items {
            v.visit_pattern_mut(item);
        }
    }
}

pub fn walk_type_expr_mut<V: VisitMut>(v: &mut V, te: &mut Spanned<TypeExpr>) {
    match &mut te.node {
        TypeExpr::Named { args, .. } | TypeExpr::Tuple(args) => {
            for arg in args {
                v.visit_type_expr_mut(arg);
            }
        }
        TypeExpr::Array(inner)
        | TypeExpr::Nullable(inner)
        | TypeExpr::Pointer { inner, .. }
        | TypeExpr::Reference { inner, .. } => v.visit_type_expr_mut(inner),
        TypeExpr::Function { params, return_type } => {
            for p in params {
                v.visit_type_expr_mut(p);
            }
            if let Some(rt) = return_type {
                v.visit_type_expr_mut(rt);
            }
        }
    }
}
