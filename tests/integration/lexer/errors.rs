// Input the lexer rejects, and the messages it gives.

use super::*;

use quadra::diagnostics::CompileError;

#[test]
fn unknown_character() {
    assert_eq!(lex_fails("let x = #;"), "Syntax error: unexpected character '#'");
}

#[test]
fn error_span_points_at_the_character() {
    let Err(CompileError::Lex { span, .. }) = lex("let x = #;", 0) else { panic!() };
    assert_eq!((span.start, span.end), (8, 9));
}

#[test]
fn multiple_decimal_points() {
    assert!(lex_fails("1.2.3").contains("multiple decimal points"));
    // with a space the dot is member access
    assert!(lex("1.2 .x", 0).is_ok());
}

#[test]
fn integer_out_of_range() {
    let msg = lex_fails("340282366920938463463374607431768211456");
    assert!(msg.contains("is out of range"), "{msg}");
}

#[test]
fn char_literal_with_two_characters() {
    assert!(lex_fails(r"'\u'").contains("must hold exactly one character"));
}

#[test]
fn unknown_level_marker() {
    lex_fails("@fast fn f() { }");
}
