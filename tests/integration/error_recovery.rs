// Recovery: every malformed unit is reported once, the parse continues at
// the next synchronisation point, and the ceiling aborts runaway input.

mod common;
use common::*;

use quadra::config::ParserConfig;
use quadra::diagnostics::CompileError;
use quadra::parser::ast::*;

#[test]
fn each_malformed_unit_reported_once() {
    let src = [
        "let a = 1;",
        "let = 2;",
        "let b = 3;",
        "class { }",
        "fn c() { }",
        ") ) )",
        "let d = 4;",
        "let x = 1 +;",
        "struct E { }",
        "let = 5;",
    ]
    .join("\n");
    let out = parse(&src);
    assert_eq!(
        messages(&out),
        [
            "expected identifier, found '='",
            "expected identifier, found '{'",
            "expected expression, found ')'",
            "expected expression, found ';'",
            "expected identifier, found '='",
        ]
    );
    let lines: Vec<_> = out.diagnostics.iter().map(|d| d.token.line).collect();
    assert_eq!(lines, [2, 4, 6, 8, 10]);
    assert_eq!(out.program.statements.len(), 5);
    assert!(matches!(out.program.statements[2].node, Stmt::Function(_)));
    assert!(matches!(out.program.statements[4].node, Stmt::Type(_)));
}

#[test]
fn braced_garbage_is_skipped_as_a_unit() {
    let out = parse("let x = ) { a; b; } let y = 1;");
    assert_eq!(messages(&out), ["expected expression, found ')'"]);
    assert_eq!(out.program.statements.len(), 1);
    let Stmt::Field(y) = &out.program.statements[0].node else { panic!() };
    assert_eq!(y.names[0].node, "y");
}

#[test]
fn unclosed_block_reports_at_end_of_file() {
    let out = parse("fn f() { let x = 1;");
    assert_eq!(messages(&out), ["expected '}', found end of file"]);
    assert!(out.program.statements.is_empty());
}

#[test]
fn member_errors_do_not_lose_the_type() {
    let out = parse("class C { int x = ; void ok() { } public int y; }");
    assert_eq!(messages(&out), ["expected expression, found ';'"]);
    let Stmt::Type(class) = &out.program.statements[0].node else { panic!() };
    assert_eq!(class.members.len(), 2);
    assert!(matches!(class.members[0].node, Stmt::Function(_)));
}

#[test]
fn struct_bodies_reject_methods_but_keep_constructors() {
    let out = parse("struct P { x: int; fn len(): int { return 1; } P(a: int) { } }");
    assert_eq!(
        messages(&out),
        ["functions are not allowed in struct bodies; use an implement block"]
    );
    let Stmt::Type(p) = &out.program.statements[0].node else { panic!() };
    assert_eq!(p.members.len(), 2);
    assert!(matches!(p.members[1].node, Stmt::Function(ref f) if f.is_constructor));
}

#[test]
fn level_is_restored_after_errors_inside_marked_code() {
    let out = parse("@low fn f() { let = 1; *p = 2; } fn g() { *q = 3; }");
    assert_eq!(
        messages(&out),
        [
            "expected identifier, found '='",
            "pointer dereference requires the low syntax level",
        ]
    );
    assert_eq!(out.program.statements.len(), 2);
}

#[test]
fn ceiling_aborts_with_collected_diagnostics() {
    let src = "let = 1;\n".repeat(10);
    let config = ParserConfig { max_diagnostics: 3, ..ParserConfig::default() };
    let err = quadra::parse_source(&src, &config).unwrap_err();
    let CompileError::CeilingExceeded { limit, diagnostics } = &err else { panic!("got {err:?}") };
    assert_eq!(*limit, 3);
    assert_eq!(diagnostics.len(), 4);
    assert_eq!(err.to_string(), "Too many errors: more than 3 diagnostics, parse aborted");
}

#[test]
fn up_to_the_ceiling_is_still_a_result() {
    let src = "let = 1;\n".repeat(3);
    let config = ParserConfig { max_diagnostics: 3, ..ParserConfig::default() };
    let out = parse_with(&src, config);
    assert_eq!(out.diagnostics.len(), 3);
}

#[test]
fn errors_inside_interpolation_holes_are_kept() {
    let out = parse(r#"let s = $"{ (x) => { let = 1; return x; } }";"#);
    assert_eq!(messages(&out), ["expected identifier, found '='"]);
    assert_eq!(out.program.statements.len(), 1);
}

#[test]
fn interpolation_holes_count_toward_the_ceiling() {
    let src = r#"let s = $"{ (x) => { let = 1; let = 2; return x; } }";"#;
    let config = ParserConfig { max_diagnostics: 1, ..ParserConfig::default() };
    let err = quadra::parse_source(src, &config).unwrap_err();
    let CompileError::CeilingExceeded { limit, diagnostics } = &err else { panic!("got {err:?}") };
    assert_eq!(*limit, 1);
    assert_eq!(diagnostics.len(), 2);
}
