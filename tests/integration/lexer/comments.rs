// Line and block comments are dropped from the stream.

use super::*;

#[test]
fn comment_only_source() {
    assert!(kinds("// nothing here").is_empty());
    assert!(kinds("/* nor here */").is_empty());
}

#[test]
fn comments_between_tokens() {
    assert_kinds("a /* inner */ b // trailing\nc", &[TokenKind::Ident, TokenKind::Ident, TokenKind::Ident]);
}

#[test]
fn block_comments_advance_lines() {
    let tokens = lex_ok("/* first\nsecond */ x");
    assert_eq!(tokens[0].line, 2);
}

#[test]
fn block_comments_do_not_nest() {
    assert_kinds("/* a /* b */ c */", &[TokenKind::Ident, TokenKind::Star, TokenKind::Slash]);
}

#[test]
fn comment_markers_inside_strings_are_text() {
    assert_eq!(literal(r#""// not a comment""#), LiteralValue::Str("// not a comment".into()));
}
