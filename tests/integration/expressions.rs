// Expression grammar: precedence tiers, associativity, postfix chains and
// the error messages for malformed operands.

mod common;
use common::*;

use quadra::config::ParserConfig;
use quadra::parser::ast::*;

fn check(src: &str, expected: &str) {
    assert_eq!(sexp(&expr(src)), expected, "source: {src}");
}

// ============================================================
// Precedence
// ============================================================

#[test]
fn arithmetic_precedence() {
    check("1 + 2 * 3", "(+ 1 (* 2 3))");
    check("1 * 2 + 3", "(+ (* 1 2) 3)");
    check("a - b - c", "(- (- a b) c)");
    check("a / b % c", "(% (/ a b) c)");
    check("2 ** 3 ** 2", "(** 2 (** 3 2))");
    check("a * b ** c", "(* a (** b c))");
}

#[test]
fn logical_and_bitwise_tiers() {
    check("a || b && c", "(|| a (&& b c))");
    check("a && b || c && d", "(|| (&& a b) (&& c d))");
    check("a | b ^ c & d", "(| a (^ b (& c d)))");
    check("a & b == c", "(& a (== b c))");
}

#[test]
fn comparison_sits_between_equality_and_shift() {
    check("a == b < c", "(== a (< b c))");
    check("a < b == c > d", "(== (< a b) (> c d))");
    check("a << 1 + 2", "(<< a (+ 1 2))");
    check("x >> 2 < y", "(< (>> x 2) y)");
}

#[test]
fn ranges_bind_looser_than_arithmetic() {
    check("0 .. n + 1", "(.. 0 (+ n 1))");
    check("1 ..= 10", "(..= 1 10)");
    check("1 ... 10", "(..= 1 10)");
}

#[test]
fn unary_and_postfix() {
    check("-a * b", "(* (- a) b)");
    check("!a && b", "(&& (! a) b)");
    check("~mask & bits", "(& (~ mask) bits)");
    check("i++ + 1", "(+ (post++ i) 1)");
    check("++i * 2", "(* (++ i) 2)");
    check("x as int + 1", "(+ (as x) 1)");
}

// ============================================================
// Loose tiers: assignment, conditional, coalesce
// ============================================================

#[test]
fn assignment_chains_to_the_right() {
    check("a = b += c", "(Assign= a (Add= b c))");
    check("total *= x + 1", "(Mul= total (+ x 1))");
    check("slot ??= fallback", "(Coalesce= slot fallback)");
    check("bits <<= 2", "(Shl= bits 2)");
}

#[test]
fn conditional_nests_in_the_else_branch() {
    check("a ? b : c ? d : e", "(? a b (? c d e))");
    check("x ?? y ? 1 : 2", "(? (?? x y) 1 2)");
}

#[test]
fn coalesce_is_looser_than_logical_or() {
    check("a ?? b || c", "(?? a (|| b c))");
    check("a ?? b ?? c", "(?? a (?? b c))");
}

#[test]
fn optional_chain_feeds_back_into_binary_operators() {
    check("a?.b ?? c", "(?? <OptionalChain> c)");
    let Expr::Binary { op, lhs, .. } = expr("order?.lines[0].price * qty") else { panic!() };
    assert_eq!(op, BinaryOp::Mul);
    let Expr::OptionalChain { chain, .. } = &lhs.node else { panic!("got {:?}", lhs.node) };
    assert_eq!(chain.len(), 3);
}

// ============================================================
// Postfix chains
// ============================================================

#[test]
fn call_member_and_index_chain_left_to_right() {
    check("a.b(c)[d]", "([] (call (. a b) c) d)");
    check("f(x)(y)", "(call (call f x) y)");
    check("matrix[i][j]", "([] ([] matrix i) j)");
    check("node->next->value", "(. (. node next) value)");
}

#[test]
fn generic_calls_keep_their_type_arguments() {
    let Expr::Call { type_args, args, .. } = expr("Make<int, string>(1)") else { panic!() };
    assert_eq!(type_args.len(), 2);
    assert_eq!(args.len(), 1);

    let Expr::Call { callee, type_args, .. } = expr("list.Select<Row>(r => r.id)") else { panic!() };
    assert_eq!(sexp(&callee.node), "(. list Select)");
    assert_eq!(type_args[0].node, TypeExpr::named("Row"));
}

#[test]
fn grouping_and_tuples() {
    check("(a + b) * c", "(* (+ a b) c)");
    check("(1, 2)", "(tuple 1 2)");
    check("()", "(tuple )");
}

#[test]
fn literals_keep_their_spelling() {
    let Expr::Literal(lit) = expr("1_000") else { panic!() };
    assert_eq!(lit.lexeme, "1_000");
    let Expr::Literal(lit) = expr("3.5f") else { panic!() };
    assert_eq!(lit.suffix.as_deref(), Some("f"));
    let Expr::Literal(lit) = expr("10ms") else { panic!() };
    assert_eq!(lit.suffix, None);
    assert_eq!(lit.lexeme, "10ms");
}

#[test]
fn lambdas_as_arguments() {
    let Expr::Call { args, .. } = expr("items.Where(x => x > 0).Select((a, b) => a * b)") else {
        panic!()
    };
    assert!(matches!(args[0].node, Expr::Lambda { ref params, .. } if params.len() == 2));
}

#[test]
fn interpolation_holes_are_expressions() {
    let Expr::Interpolated(parts) = expr("$\"{a * b} items\"") else { panic!() };
    assert_eq!(parts.len(), 2);
    let InterpolationPart::Expr(hole) = &parts[0] else { panic!() };
    assert_eq!(sexp(&hole.node), "(* a b)");
}

// ============================================================
// Errors
// ============================================================

#[test]
fn missing_operands_and_delimiters() {
    assert_eq!(expr_err("1 +"), "expected expression, found end of file");
    assert_eq!(expr_err("(a"), "expected ')', found end of file");
    assert_eq!(expr_err("f(1,,2)"), "expected expression, found ','");
    assert_eq!(expr_err("a ? b"), "expected ':', found end of file");
}

#[test]
fn assignment_to_non_places_is_rejected() {
    assert_eq!(expr_err("a + b = c"), "invalid assignment target");
    assert_eq!(expr_err("(x, y) = pair"), "invalid assignment target");
}

#[test]
fn deep_nesting_is_an_error_not_a_crash() {
    let src = format!("{}1{}", "(".repeat(100), ")".repeat(100));
    assert_eq!(expr_err(&src), "nesting too deep");
}

fn on_small_stack(f: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(f)
        .unwrap()
        .join()
        .unwrap();
}

const NESTING_SHAPES: [(&str, &str); 4] = [("(", ")"), ("[", "]"), ("{", "}"), ("y => ", "")];

#[test]
fn nesting_limit_fits_a_small_thread_stack() {
    let limit = ParserConfig::default().max_nesting;
    for (open, close) in NESTING_SHAPES {
        // The outermost expression is one level, each opener adds one more.
        let at_limit = format!("{}1{}", open.repeat(limit - 1), close.repeat(limit - 1));
        let past_limit = format!("{}1{}", open.repeat(limit), close.repeat(limit));
        let far_past = format!("{}1{}", open.repeat(limit * 10), close.repeat(limit * 10));
        on_small_stack(move || {
            expr(&at_limit);
            assert_eq!(expr_err(&past_limit), "nesting too deep", "{past_limit}");
            assert_eq!(expr_err(&far_past), "nesting too deep");
        });
    }
}

#[test]
fn statement_nesting_limit_fits_a_small_thread_stack() {
    let limit = ParserConfig::default().max_nesting;
    for (open, close) in NESTING_SHAPES {
        // The statement and its initializer take two levels.
        let at_limit = format!("let x = {}1{};", open.repeat(limit - 2), close.repeat(limit - 2));
        let past_limit = format!("let x = {}1{};", open.repeat(limit - 1), close.repeat(limit - 1));
        on_small_stack(move || {
            parse_ok(&at_limit);
            let out = parse(&past_limit);
            assert_eq!(out.diagnostics[0].message, "nesting too deep", "{past_limit}");
        });
    }
}
