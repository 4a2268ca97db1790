// Mathematical notation: Unicode operators, Greek names, vectors,
// quaternions, matrices, calculus forms and units.

mod common;
use common::*;

use quadra::parser::ast::*;

fn check(src: &str, expected: &str) {
    assert_eq!(sexp(&expr(src)), expected, "source: {src}");
}

#[test]
fn unicode_arithmetic_operators() {
    check("a × b ÷ c · d", "(· (/ (* a b) c) d)");
    check("u · v + w", "(+ (· u v) w)");
}

#[test]
fn unicode_comparisons() {
    check("x ≤ y ≠ z", "(!= (<= x y) z)");
    check("a ≥ b && c ≈ d", "(&& (>= a b) (≈ c d))");
}

#[test]
fn set_operators() {
    check("A ∪ B ∩ C", "(∪ A (∩ B C))");
    check("x ∉ S && y ∈ T", "(&& (∉ x S) (in y T))");
}

#[test]
fn greek_identifiers_and_constants() {
    check("2 * π * r", "(* (* 2 π) r)");
    check("α * β + γ", "(+ (* α β) γ)");
    check("x < ∞", "(< x ∞)");
}

#[test]
fn prefix_math_operators() {
    check("√x + 1", "(+ (√ x) 1)");
    check("√(b ** 2 - 4 * a * c)", "(√ (- (** b 2) (* (* 4 a) c)))");
    check("∂f / ∂x", "(/ (∂ f) (∂ x))");
    check("∇φ", "(∇ φ)");
}

#[test]
fn definite_and_indefinite_integrals() {
    let Expr::Integral { bounds: Some((lo, hi)), var, .. } = expr("∫[0, ∞] e ** (-x) dx") else {
        panic!()
    };
    assert_eq!(sexp(&lo.node), "0");
    assert_eq!(sexp(&hi.node), "∞");
    assert_eq!(var.node, "x");
    check("∫ x dx + 1", "(+ (∫ x dx) 1)");
    assert_eq!(expr_err("∫[0, 1] x"), "expected integration variable such as 'dx', found end of file");
}

#[test]
fn limits_take_one_multiplicative_term() {
    check("lim[h -> 0] (f(x + h) - f(x)) / h", "(lim h 0 (/ (- (call f (+ x h)) (call f x)) h))");
    // `lim` on its own is an ordinary name
    check("lim + 1", "(+ lim 1)");
}

#[test]
fn vectors() {
    assert!(matches!(expr("⟨1, 2, 3⟩"), Expr::Vector(ref v) if v.len() == 3));
    check("⟨x, y⟩ · ⟨a, b⟩", "(· <Vector> <Vector>)");
    assert_eq!(expr_err("⟨1, 2"), "expected '⟩', found end of file");
}

#[test]
fn quaternions_need_four_components() {
    let Expr::Quaternion(parts) = expr("ℍ⟨w, x, y, z⟩") else { panic!() };
    let names: Vec<_> = parts.iter().map(|p| sexp(&p.node)).collect();
    assert_eq!(names, ["w", "x", "y", "z"]);
    assert_eq!(
        expr_err("ℍ⟨1, 2, 3⟩"),
        "quaternion literal needs exactly four components, found 3"
    );
}

#[test]
fn matrices() {
    let Expr::Matrix(rows) = expr("[1, 0, 0; 0, 1, 0; 0, 0, 1]") else { panic!() };
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.len() == 3));
    assert!(matches!(expr("[1, 2, 3]"), Expr::Array(_)));
}

#[test]
fn unit_literals() {
    let Expr::Binary { lhs, rhs, .. } = expr("9.81m * 2s") else { panic!() };
    let Expr::Literal(distance) = &lhs.node else { panic!() };
    assert_eq!(distance.lexeme, "9.81m");
    assert!(matches!(rhs.node, Expr::Literal(_)));
}

#[test]
fn math_in_declarations() {
    let program = parse_ok(
        r#"
        const τ = 2 * π;
        fn area(r: float): float => π * r * r;
        fn norm(v: Vec3): float { return √(v · v); }
        "#,
    );
    assert_eq!(program.statements.len(), 3);
    let Stmt::Field(tau) = &program.statements[0].node else { panic!() };
    assert_eq!(tau.names[0].node, "τ");
}
