// String, char and interpolated literals.

use super::*;

#[test]
fn escapes_are_decoded() {
    assert_eq!(literal(r#""a\tb\n""#), LiteralValue::Str("a\tb\n".into()));
    assert_eq!(literal(r#""say \"hi\"""#), LiteralValue::Str("say \"hi\"".into()));
    assert_eq!(literal(r#""\{not a hole\}""#), LiteralValue::Str("{not a hole}".into()));
}

#[test]
fn unknown_escapes_keep_the_backslash() {
    assert_eq!(literal(r#""\q""#), LiteralValue::Str("\\q".into()));
}

#[test]
fn empty_string() {
    assert_eq!(literal(r#""""#), LiteralValue::Str(String::new()));
}

#[test]
fn char_literals() {
    assert_eq!(literal("'x'"), LiteralValue::Char('x'));
    assert_eq!(literal(r"'\n'"), LiteralValue::Char('\n'));
    assert_eq!(literal(r"'\''"), LiteralValue::Char('\''));
}

#[test]
fn interpolated_strings_keep_the_raw_body() {
    let tokens = lex_ok(r#"$"x = {x + 1}""#);
    assert_eq!(tokens[0].kind, TokenKind::InterpStr);
    assert_eq!(tokens[0].literal, Some(LiteralValue::Str("x = {x + 1}".into())));
}

#[test]
fn strings_may_span_lines() {
    let tokens = lex_ok("\"first\nsecond\" after");
    assert_eq!(tokens[0].literal, Some(LiteralValue::Str("first\nsecond".into())));
    assert_eq!(tokens[1].line, 2);
}

#[test]
fn non_ascii_string_content() {
    assert_eq!(literal(r#""café 👋 你好""#), LiteralValue::Str("café 👋 你好".into()));
}
