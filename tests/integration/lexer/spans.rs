// Byte spans, 1-based lines and char-counted columns.

use super::*;

#[test]
fn spans_cover_each_lexeme() {
    let src = "let x = 42;";
    assert_span(src, 0, 0, 3);
    assert_span(src, 1, 4, 5);
    assert_span(src, 2, 6, 7);
    assert_span(src, 3, 8, 10);
    assert_span(src, 4, 10, 11);
}

#[test]
fn eof_sits_at_the_end() {
    let tokens = lex_ok("a\n");
    let eof = tokens.last().unwrap();
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!(eof.span, Span::new(2, 2));
    assert_eq!((eof.line, eof.column), (2, 1));
}

#[test]
fn lines_and_columns() {
    let tokens = lex_ok("a\n  b\n\tc");
    let positions: Vec<_> = tokens.iter().map(|t| (t.line, t.column)).collect();
    assert_eq!(positions[..3], [(1, 1), (2, 3), (3, 2)]);
}

#[test]
fn columns_count_characters_not_bytes() {
    let tokens = lex_ok("α = 1");
    assert_eq!(tokens[1].span, Span::new(3, 4));
    assert_eq!(tokens[1].column, 3);
}

#[test]
fn file_id_is_carried() {
    let tokens = lex("a + b", 3).unwrap();
    assert!(tokens.iter().all(|t| t.span.file_id == 3));
}
