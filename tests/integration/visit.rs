// Visitor traversal over parsed programs.

mod common;
use common::*;

use quadra::lexer::LiteralValue;
use quadra::parser::ast::*;
use quadra::span::Spanned;
use quadra::visit::{walk_expr, walk_expr_mut, walk_function, walk_pattern, VisitMut, Visitor};

#[test]
fn visitor_reaches_functions_in_every_container() {
    struct FunctionNames(Vec<String>);

    impl Visitor for FunctionNames {
        fn visit_function(&mut self, func: &FunctionDecl) {
            self.0.push(func.name.node.clone());
            walk_function(self, func);
        }
    }

    let program = parse_ok(
        r#"
        namespace App {
            class A { fn m() { } A() { } }
            module util { fn helper() { } }
        }
        implement Show for A { fn show(): string => "a"; }
        fn main() { let f = (x) => x; }
        "#,
    );
    let mut names = FunctionNames(Vec::new());
    names.visit_program(&program);
    assert_eq!(names.0, ["m", "A", "helper", "show", "main"]);
}

#[test]
fn visitor_collects_direct_calls_in_order() {
    #[derive(Default)]
    struct Calls(Vec<String>);

    impl Visitor for Calls {
        fn visit_expr(&mut self, expr: &Spanned<Expr>) {
            if let Expr::Call { callee, .. } = &expr.node {
                if let Expr::Ident(name) = &callee.node {
                    self.0.push(name.clone());
                }
            }
            walk_expr(self, expr);
        }
    }

    let program = parse_ok("fn main() { log(1); x.send(2); if (ok()) { log(3); } }");
    let mut calls = Calls::default();
    calls.visit_program(&program);
    assert_eq!(calls.0, ["log", "ok", "log"]);
}

#[test]
fn visitor_sees_nested_patterns() {
    #[derive(Default)]
    struct Bindings(Vec<String>);

    impl Visitor for Bindings {
        fn visit_pattern(&mut self, pattern: &Spanned<Pattern>) {
            if let Pattern::Binding(name) = &pattern.node {
                self.0.push(name.clone());
            }
            walk_pattern(self, pattern);
        }
    }

    let program = parse_ok("match p { (a, _) => a, n => n }");
    let mut bindings = Bindings::default();
    bindings.visit_program(&program);
    assert_eq!(bindings.0, ["a", "n"]);
}

/// Folds `+` and `*` over integer literals, innermost first.
struct ConstantFolder;

impl VisitMut for ConstantFolder {
    fn visit_expr_mut(&mut self, expr: &mut Spanned<Expr>) {
        walk_expr_mut(self, expr);
        let Expr::Binary { op, lhs, rhs } = &expr.node else { return };
        let (Expr::Literal(l), Expr::Literal(r)) = (&lhs.node, &rhs.node) else { return };
        let (LiteralValue::Int(a), LiteralValue::Int(b)) = (&l.value, &r.value) else { return };
        let folded = match op {
            BinaryOp::Add => a + b,
            BinaryOp::Mul => a * b,
            _ => return,
        };
        expr.node = Expr::Literal(Literal {
            value: LiteralValue::Int(folded),
            lexeme: folded.to_string(),
            suffix: None,
        });
    }
}

#[test]
fn visit_mut_folds_constants_bottom_up() {
    let mut program = parse_ok("let x = 1 + 2 * 3; let y = n + 1;");
    ConstantFolder.visit_program_mut(&mut program);

    let Stmt::Field(x) = &program.statements[0].node else { panic!() };
    let Some(Expr::Literal(lit)) = x.value.as_ref().map(|v| &v.node) else { panic!() };
    assert_eq!(lit.value, LiteralValue::Int(7));
    assert_eq!(lit.lexeme, "7");

    let Stmt::Field(y) = &program.statements[1].node else { panic!() };
    assert!(matches!(y.value.as_ref().map(|v| &v.node), Some(Expr::Binary { .. })));
}
