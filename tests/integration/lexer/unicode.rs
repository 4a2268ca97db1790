// Greek letters, mathematical symbols and subscripts.

use super::*;

#[test]
fn greek_identifiers() {
    let tokens = lex_ok("α β γ Δ Ω λ1 x_α");
    assert!(tokens[..7].iter().all(|t| t.kind == TokenKind::Ident));
    assert_eq!(tokens[5].text, "λ1");
    assert_eq!(tokens[6].text, "x_α");
}

#[test]
fn subscripts_follow_the_name() {
    assert_kinds(
        "x₁ ε₀",
        &[TokenKind::Ident, TokenKind::Subscript, TokenKind::Ident, TokenKind::Subscript],
    );
}

#[test]
fn mathematical_constants() {
    assert!(kinds("∞ ℝ ℤ ℕ ∅").iter().all(|k| *k == TokenKind::MathSymbol));
}

#[test]
fn calculus_prefixes() {
    assert_kinds(
        "∂ ∇ √ ∫",
        &[TokenKind::Partial, TokenKind::Nabla, TokenKind::Sqrt, TokenKind::Integral],
    );
}

#[test]
fn quaternion_and_angle_brackets() {
    assert_kinds(
        "ℍ⟨1, 0, 0, 0⟩",
        &[
            TokenKind::Quaternion,
            TokenKind::LAngle,
            TokenKind::IntLit,
            TokenKind::Comma,
            TokenKind::IntLit,
            TokenKind::Comma,
            TokenKind::IntLit,
            TokenKind::Comma,
            TokenKind::IntLit,
            TokenKind::RAngle,
        ],
    );
}

#[test]
fn other_scripts_are_not_identifiers() {
    lex_fails("let café = 1;");
    lex_fails("let 🚀 = 1;");
}
