// Syntax levels: default level, per-declaration markers, level-gated
// constructs, and the level stamp the lexer puts on every token.

mod common;
use common::*;

use quadra::level::SyntaxLevel;
use quadra::lexer::lex;
use quadra::parser::ast::*;

#[test]
fn high_level_conveniences() {
    let out = parse_at("total := 1 + 2\nprint total, \"done\"\nprint(total)", SyntaxLevel::High);
    assert!(!out.has_errors(), "{:?}", out.diagnostics);
    let stmts = &out.program.statements;
    assert_eq!(stmts.len(), 3);
    let Stmt::Field(binding) = &stmts[0].node else { panic!() };
    assert_eq!(binding.level, SyntaxLevel::High);
    let Stmt::Expr(call) = &stmts[1].node else { panic!() };
    assert!(matches!(call.node, Expr::Call { ref args, .. } if args.len() == 2));
}

#[test]
fn print_as_a_name_is_not_a_statement() {
    let out = parse_at("print = logger; print.flush();", SyntaxLevel::High);
    assert!(!out.has_errors(), "{:?}", out.diagnostics);
    let Stmt::Expr(first) = &out.program.statements[0].node else { panic!() };
    assert!(matches!(first.node, Expr::Assign { .. }));
}

#[test]
fn marker_block_switches_level_for_its_body() {
    let out = parse("@high { count := 0; print count; } x := 1;");
    assert_eq!(
        messages(&out),
        ["inferred declarations with ':=' require the high syntax level"]
    );
    let Stmt::Block(block) = &out.program.statements[0].node else { panic!() };
    assert_eq!(block.stmts.len(), 2);
}

#[test]
fn marker_on_function_scopes_low_level_constructs() {
    let src = r#"
        @low fn copy(dst: *mut byte, src: *byte, n: int) {
            for i in 0..n { dst[i] = src[i]; }
            unsafe { *dst = 0; }
        }
        fn safe() { *p = 1; }
    "#;
    let out = parse(src);
    assert_eq!(messages(&out), ["pointer dereference requires the low syntax level"]);
    let Stmt::Function(copy) = &out.program.statements[0].node else { panic!() };
    assert_eq!(copy.level, SyntaxLevel::Low);
    assert!(matches!(copy.params[0].ty.as_ref().map(|t| &t.node), Some(TypeExpr::Pointer { mutable: true, .. })));
}

#[test]
fn markers_interleave_with_modifiers() {
    let out = parse("public @low static fn raw() { int* p = null; }");
    assert!(!out.has_errors(), "{:?}", out.diagnostics);
    let Stmt::Function(f) = &out.program.statements[0].node else { panic!() };
    assert_eq!(f.level, SyntaxLevel::Low);
    assert!(f.modifiers.has(Modifier::Static));
}

#[test]
fn marked_class_members_inherit_the_level() {
    let out = parse("@low struct Node { next: *Node; value: int; }");
    assert!(!out.has_errors(), "{:?}", out.diagnostics);
    let Stmt::Type(node) = &out.program.statements[0].node else { panic!() };
    assert_eq!(node.level, SyntaxLevel::Low);
    let Stmt::Field(next) = &node.members[0].node else { panic!() };
    assert_eq!(next.level, SyntaxLevel::Low);
}

#[test]
fn assembly_level_captures_asm_text() {
    let out = parse("@asm fn halt() { asm { cli\n hlt } }");
    assert!(!out.has_errors(), "{:?}", out.diagnostics);
    let Stmt::Function(f) = &out.program.statements[0].node else { panic!() };
    assert_eq!(f.level, SyntaxLevel::Assembly);
    let Some(FunctionBody::Block(body)) = &f.body else { panic!() };
    assert_eq!(body.node.stmts[0].node, Stmt::InlineAsm { text: "cli\nhlt".into() });
}

#[test]
fn assembly_accepts_low_level_statements_too() {
    let out = parse_at("unsafe { *p = 1; } asm { nop }", SyntaxLevel::Assembly);
    assert!(!out.has_errors(), "{:?}", out.diagnostics);
    assert_eq!(out.program.statements.len(), 2);
}

#[test]
fn gated_constructs_report_the_level_they_need() {
    let out = parse("fn f() { unsafe { } asm { nop } let buf = stackalloc byte[16]; }");
    assert_eq!(
        messages(&out),
        [
            "unsafe block requires the low syntax level",
            "inline assembly requires the assembly syntax level",
            "stackalloc requires the low syntax level",
        ]
    );
}

#[test]
fn thread_local_needs_low_level() {
    let out = parse("thread_local static int counter = 0;");
    assert_eq!(messages(&out), ["thread_local declaration requires the low syntax level"]);
    let out = parse("@low thread_local static int counter = 0;");
    assert!(!out.has_errors(), "{:?}", out.diagnostics);
}

#[test]
fn unknown_level_names_are_not_markers() {
    // `@fast` is not a marker token, so lexing fails on the bare `@`.
    assert!(quadra::parse_source("@fast fn f() { }", &Default::default()).is_err());
}

#[test]
fn lexer_stamps_tokens_with_their_level() {
    let tokens = lex("@low fn f() { x; } y;", 0).unwrap();
    let level_of = |text: &str| tokens.iter().find(|t| t.text == text).map(|t| t.level);
    assert_eq!(level_of("f"), Some(SyntaxLevel::Low));
    assert_eq!(level_of("x"), Some(SyntaxLevel::Low));
    assert_eq!(level_of("y"), Some(SyntaxLevel::Medium));
}

#[test]
fn body_less_marked_declaration_does_not_leak() {
    let tokens = lex("@low extern fn poke(p: *int); { z; }", 0).unwrap();
    let z = tokens.iter().find(|t| t.text == "z").unwrap();
    assert_eq!(z.level, SyntaxLevel::Medium);
}
