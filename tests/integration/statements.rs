// Medium-level statements inside realistic function bodies.

mod common;
use common::*;

use quadra::parser::ast::*;

fn body_of(src: &str) -> Vec<Stmt> {
    let program = parse_ok(src);
    let Some(Stmt::Function(f)) = program.statements.into_iter().next().map(|s| s.node) else {
        panic!("expected a function")
    };
    match f.body {
        Some(FunctionBody::Block(block)) => block.node.stmts.into_iter().map(|s| s.node).collect(),
        other => panic!("expected a block body, got {other:?}"),
    }
}

#[test]
fn function_body_with_mixed_statements() {
    let stmts = body_of(
        r#"
        fn summarize(values: int[]): int {
            var total = 0;
            foreach (var v in values) {
                if (v < 0) continue;
                total += v;
            }
            for (int i = 0; i < 3; i++) {
                total = total * 2;
            }
            do { total--; } while (total > 100);
            return total;
        }
        "#,
    );
    assert_eq!(stmts.len(), 5);
    assert!(matches!(stmts[0], Stmt::Field(_)));
    assert!(matches!(stmts[1], Stmt::Foreach { ty: None, .. }));
    assert!(matches!(stmts[2], Stmt::For { init: Some(_), condition: Some(_), .. }));
    assert!(matches!(stmts[3], Stmt::DoWhile { .. }));
    assert!(matches!(stmts[4], Stmt::Return(Some(_))));
}

#[test]
fn dangling_else_binds_to_the_nearest_if() {
    let Stmt::If { then_branch, else_branch, .. } = single_stmt("if (a) if (b) x(); else y();") else {
        panic!()
    };
    assert!(else_branch.is_none());
    assert!(matches!(then_branch.node, Stmt::If { else_branch: Some(_), .. }));
}

#[test]
fn else_if_chains() {
    let src = "if (n < 0) { neg(); } else if (n == 0) { zero(); } else { pos(); }";
    let Stmt::If { else_branch: Some(first), .. } = single_stmt(src) else { panic!() };
    let Stmt::If { else_branch: Some(second), .. } = &first.node else { panic!() };
    assert!(matches!(second.node, Stmt::Block(_)));
}

#[test]
fn terminators_are_optional_between_statements() {
    let program = parse_ok("x = 1\ny = 2\nprint(x + y)");
    assert_eq!(program.statements.len(), 3);
}

#[test]
fn empty_bodies_become_empty_blocks() {
    let Stmt::While { body, .. } = single_stmt("while (poll()) ;") else { panic!() };
    assert_eq!(body.node, Stmt::Block(Block::default()));
}

#[test]
fn switch_with_fallthrough_labels() {
    let stmts = body_of(
        r#"
        fn classify(c: char): int {
            switch (c) {
                case 'a':
                case 'e':
                    return 1;
                case 'z':
                    log(c);
                    break;
                default:
                    return 0;
            }
        }
        "#,
    );
    let Stmt::Switch { cases, .. } = &stmts[0] else { panic!() };
    assert_eq!(cases.len(), 3);
    assert_eq!(cases[0].labels.len(), 2);
    assert_eq!(cases[1].body.len(), 2);
    assert!(cases[2].is_default);
    assert!(cases[2].labels.is_empty());
}

#[test]
fn match_statement_arms() {
    let src = r#"
        match response {
            200 => ok(),
            (code, _) => { retry(code); }
            _ => fail()
        }
    "#;
    let Stmt::Match { subject, arms } = single_stmt(src) else { panic!() };
    assert_eq!(subject.node, Expr::Ident("response".into()));
    assert_eq!(arms.len(), 3);
    assert!(matches!(arms[1].body, ArmBody::Block(_)));
}

#[test]
fn match_guard_ends_at_the_arm_arrow() {
    let Stmt::Match { arms, .. } = single_stmt("match x { n if ready => 1, _ => 0 }") else { panic!() };
    assert_eq!(arms.len(), 2);
    assert_eq!(arms[0].pattern.node, Pattern::Binding("n".into()));
    assert_eq!(arms[0].guard.as_ref().map(|g| &g.node), Some(&Expr::Ident("ready".into())));

    let Stmt::Match { arms, .. } = single_stmt("match x { n if (ready) => 1, _ => 0 }") else { panic!() };
    assert_eq!(arms[0].guard.as_ref().map(|g| &g.node), Some(&Expr::Ident("ready".into())));
}

#[test]
fn lambdas_inside_a_match_guard_call() {
    let Stmt::Match { arms, .. } = single_stmt("match x { n if any(xs, y => y > n) => 1, _ => 0 }") else {
        panic!()
    };
    let Some(Expr::Call { args, .. }) = arms[0].guard.as_ref().map(|g| &g.node) else { panic!() };
    assert!(matches!(args[1].node, Expr::Lambda { .. }));
}

#[test]
fn try_with_typed_and_bare_handlers() {
    let stmts = body_of(
        r#"
        fn load(path: string) {
            try {
                read(path);
            } catch (FileNotFound e) {
                throw new LoadError(e);
            } catch {
                throw;
            } finally {
                close();
            }
        }
        "#,
    );
    let Stmt::Try { catches, finally, .. } = &stmts[0] else { panic!() };
    assert_eq!(catches.len(), 2);
    assert_eq!(catches[0].ty.as_ref().map(|t| t.node.clone()), Some(TypeExpr::named("FileNotFound")));
    assert!(finally.is_some());
}

#[test]
fn generators_and_resources() {
    let stmts = body_of(
        r#"
        fn lines(path: string) {
            using (var reader = open(path)) {
                while (!reader.done) yield return reader.next();
            }
            lock (cache) { hits++; }
            yield break;
        }
        "#,
    );
    assert!(matches!(stmts[0], Stmt::Using { body: Some(_), .. }));
    assert!(matches!(stmts[1], Stmt::Lock { .. }));
    assert_eq!(stmts[2], Stmt::Yield(None));
}

#[test]
fn local_declaration_forms() {
    let stmts = body_of(
        r#"
        fn locals() {
            let a = 1;
            let mut b: float = 2.0;
            var c, d: int;
            Dictionary<string, int> counts = new Dictionary<string, int>();
            x, y: float = 0.0;
        }
        "#,
    );
    assert_eq!(stmts.len(), 5);
    let Stmt::Field(b) = &stmts[1] else { panic!() };
    assert!(b.modifiers.has(Modifier::Mut));
    let Stmt::Field(cd) = &stmts[2] else { panic!() };
    assert_eq!(cd.names.len(), 2);
    let Stmt::Field(counts) = &stmts[3] else { panic!() };
    assert!(matches!(counts.value.as_ref().map(|v| &v.node), Some(Expr::New { .. })));
    let Stmt::Field(xy) = &stmts[4] else { panic!() };
    assert_eq!(xy.names.len(), 2);
    assert!(xy.value.is_some());
}

#[test]
fn using_directives_at_top_level() {
    let program = parse_ok("using System.Text; using Json = Serde.Json;");
    assert_eq!(program.statements.len(), 2);
    assert!(program.statements.iter().all(|s| matches!(s.node, Stmt::Using { body: None, .. })));
}

#[test]
fn block_recovery_keeps_following_statements() {
    let out = parse("fn f() { let x = ; y(); z(); }");
    assert_eq!(messages(&out), ["expected expression, found ';'"]);
    let Stmt::Function(f) = &out.program.statements[0].node else { panic!() };
    let Some(FunctionBody::Block(body)) = &f.body else { panic!() };
    assert_eq!(body.node.stmts.len(), 2);
}
