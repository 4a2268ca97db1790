// Grammar ambiguities resolved by bounded lookahead: generic calls against
// comparisons, lambdas against grouping, struct literals against blocks,
// declarations against expressions, and foreign-style headers.

mod common;
use common::*;

use quadra::config::{ForeignHeaderPolicy, ParserConfig};
use quadra::level::SyntaxLevel;
use quadra::parser::ast::*;

fn initializer(src: &str) -> Expr {
    let Stmt::Field(field) = single_stmt(src) else { panic!("expected a declaration: {src}") };
    field.value.expect("initializer").node
}

// ============================================================
// `<` after a name
// ============================================================

#[test]
fn less_than_without_closing_angle_is_a_comparison() {
    assert!(matches!(initializer("let r = a < b;"), Expr::Binary { op: BinaryOp::Lt, .. }));
    let Stmt::If { condition, .. } = single_stmt("if (a < b && c > d) { }") else { panic!() };
    assert_eq!(sexp(&condition.node), "(&& (< a b) (> c d))");
}

#[test]
fn angle_list_followed_by_paren_is_a_generic_call() {
    let Expr::Call { type_args, .. } = initializer("let r = convert<float>(x);") else { panic!() };
    assert_eq!(type_args.len(), 1);
    // Same shape, same reading: a closed angle list directly before `(`.
    let Expr::Call { type_args, args, .. } = initializer("let r = x < y > (z);") else { panic!() };
    assert_eq!(type_args[0].node, TypeExpr::named("y"));
    assert_eq!(args.len(), 1);
}

#[test]
fn angle_list_followed_by_brace_is_a_generic_struct_literal() {
    let Expr::StructLit { name, type_args, fields } = initializer("let p = Pair<int, string> { first: 1, second: \"a\" };")
    else {
        panic!()
    };
    assert_eq!(name.node, "Pair");
    assert_eq!(type_args.len(), 2);
    assert_eq!(fields.len(), 2);
}

// ============================================================
// `(` at the start of an operand
// ============================================================

#[test]
fn parenthesised_parameter_list_is_a_lambda() {
    assert!(matches!(initializer("let f = (a, b) => a + b;"), Expr::Lambda { .. }));
    assert!(matches!(initializer("let f = (int a, string b) => a;"), Expr::Lambda { .. }));
    assert!(matches!(initializer("let f = () => 42;"), Expr::Lambda { .. }));
}

#[test]
fn parenthesised_expressions_stay_expressions() {
    assert!(matches!(initializer("let t = (a, b);"), Expr::Tuple(_)));
    assert_eq!(sexp(&initializer("let s = (a + b) * c;")), "(* (+ a b) c)");
}

// ============================================================
// `{` after a name
// ============================================================

#[test]
fn brace_after_name_in_expression_is_a_struct_literal() {
    let Expr::StructLit { name, .. } = initializer("let p = geo.Point { x: 1, y: 2 };") else { panic!() };
    assert_eq!(name.node, "geo.Point");
    assert!(matches!(initializer("let e = Empty {};"), Expr::StructLit { .. }));
}

#[test]
fn brace_after_condition_is_the_body() {
    let Stmt::While { condition, body } = single_stmt("while running { step(); }") else { panic!() };
    assert_eq!(condition.node, Expr::Ident("running".into()));
    assert!(matches!(body.node, Stmt::Block(ref b) if b.stmts.len() == 1));

    let Stmt::Match { subject, arms } = single_stmt("match shape { circle => 1, _ => 0 }") else { panic!() };
    assert_eq!(subject.node, Expr::Ident("shape".into()));
    assert_eq!(arms.len(), 2);
}

#[test]
fn brace_with_statements_is_not_a_literal() {
    let program = parse_ok("fn f() { result { return 1; } }");
    let Stmt::Function(f) = &program.statements[0].node else { panic!() };
    let Some(FunctionBody::Block(body)) = &f.body else { panic!() };
    assert_eq!(body.node.stmts.len(), 2);
    assert!(matches!(body.node.stmts[1].node, Stmt::Block(_)));
}

// ============================================================
// Declarations against expressions
// ============================================================

#[test]
fn type_then_name_is_a_declaration() {
    let Stmt::Field(f) = single_stmt("Map<string, List<int>> index = build();") else { panic!() };
    assert_eq!(f.names[0].node, "index");
    assert!(matches!(single_stmt("a < b;"), Stmt::Expr(_)));
    assert!(matches!(single_stmt("x * y;"), Stmt::Expr(_)));
}

#[test]
fn star_declares_a_pointer_only_at_low_level() {
    let out = parse_at("int * p;", SyntaxLevel::Low);
    assert!(!out.has_errors(), "{:?}", out.diagnostics);
    let Stmt::Field(f) = &out.program.statements[0].node else { panic!() };
    assert!(matches!(f.ty.as_ref().map(|t| &t.node), Some(TypeExpr::Pointer { .. })));

    let out = parse_at("int * p;", SyntaxLevel::Medium);
    assert!(!out.has_errors());
    assert!(matches!(out.program.statements[0].node, Stmt::Expr(_)));
}

// ============================================================
// Foreign-style headers
// ============================================================

const MAIN: &str = "public static void Main(string[] args) { Console.WriteLine(1); }";

#[test]
fn foreign_header_is_wrapped_by_default() {
    let program = parse_ok(MAIN);
    assert_eq!(program.statements.len(), 1);
    let Stmt::Block(block) = &program.statements[0].node else { panic!() };
    assert_eq!(block.stmts.len(), 1);
}

#[test]
fn foreign_header_parsed_natively_when_configured() {
    let config = ParserConfig { foreign_headers: ForeignHeaderPolicy::Native, ..ParserConfig::default() };
    let out = parse_with(MAIN, config);
    assert!(!out.has_errors(), "{:?}", out.diagnostics);
    let Stmt::Function(f) = &out.program.statements[0].node else { panic!() };
    assert_eq!(f.name.node, "Main");
    assert_eq!(f.modifiers.visibility, Some(Visibility::Public));
    assert!(f.modifiers.has(Modifier::Static));
    assert!(matches!(f.params[0].ty.as_ref().map(|t| &t.node), Some(TypeExpr::Array(_))));
}

#[test]
fn native_declarations_are_not_foreign_headers() {
    let program = parse_ok("public fn main() { } public int counter = 0;");
    assert!(matches!(program.statements[0].node, Stmt::Function(_)));
    assert!(matches!(program.statements[1].node, Stmt::Field(_)));
}
