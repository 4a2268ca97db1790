#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use quadra::level::SyntaxLevel;
use quadra::lexer::{LiteralValue, Token, TokenKind};
use quadra::parser::Parser;
use quadra::span::Span;

/// Minimal fuzzing-friendly token representation
#[derive(Arbitrary, Debug)]
enum FuzzToken {
    Ident,
    IntLit,
    FloatLit,
    StringLit,
    Plus,
    Minus,
    Star,
    Slash,
    Lt,
    Gt,
    Eq,
    ColonEq,
    Colon,
    Comma,
    Semi,
    Dot,
    DotDot,
    FatArrow,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LAngle,
    RAngle,
    Integral,
    Fn,
    Let,
    Class,
    Struct,
    Public,
    Return,
    If,
    Else,
    While,
    For,
    In,
    Match,
    Unsafe,
    Asm,
    Marker(FuzzLevel),
}

#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzLevel {
    High,
    Medium,
    Low,
    Assembly,
}

impl FuzzToken {
    fn to_token(&self, offset: usize) -> Token {
        let (kind, text, literal) = match self {
            FuzzToken::Ident => (TokenKind::Ident, "x", None),
            FuzzToken::IntLit => (TokenKind::IntLit, "42", Some(LiteralValue::Int(42))),
            FuzzToken::FloatLit => (TokenKind::FloatLit, "2.5", Some(LiteralValue::Float(2.5))),
            FuzzToken::StringLit => (TokenKind::StringLit, "\"s\"", Some(LiteralValue::Str("s".into()))),
            FuzzToken::Plus => (TokenKind::Plus, "+", None),
            FuzzToken::Minus => (TokenKind::Minus, "-", None),
            FuzzToken::Star => (TokenKind::Star, "*", None),
            FuzzToken::Slash => (TokenKind::Slash, "/", None),
            FuzzToken::Lt => (TokenKind::Lt, "<", None),
            FuzzToken::Gt => (TokenKind::Gt, ">", None),
            FuzzToken::Eq => (TokenKind::Eq, "=", None),
            FuzzToken::ColonEq => (TokenKind::ColonEq, ":=", None),
            FuzzToken::Colon => (TokenKind::Colon, ":", None),
            FuzzToken::Comma => (TokenKind::Comma, ",", None),
            FuzzToken::Semi => (TokenKind::Semi, ";", None),
            FuzzToken::Dot => (TokenKind::Dot, ".", None),
            FuzzToken::DotDot => (TokenKind::DotDot, "..", None),
            FuzzToken::FatArrow => (TokenKind::FatArrow, "=>", None),
            FuzzToken::LParen => (TokenKind::LParen, "(", None),
            FuzzToken::RParen => (TokenKind::RParen, ")", None),
            FuzzToken::LBrace => (TokenKind::LBrace, "{", None),
            FuzzToken::RBrace => (TokenKind::RBrace, "}", None),
            FuzzToken::LBracket => (TokenKind::LBracket, "[", None),
            FuzzToken::RBracket => (TokenKind::RBracket, "]", None),
            FuzzToken::LAngle => (TokenKind::LAngle, "⟨", None),
            FuzzToken::RAngle => (TokenKind::RAngle, "⟩", None),
            FuzzToken::Integral => (TokenKind::Integral, "∫", None),
            FuzzToken::Fn => (TokenKind::Fn, "fn", None),
            FuzzToken::Let => (TokenKind::Let, "let", None),
            FuzzToken::Class => (TokenKind::Class, "class", None),
            FuzzToken::Struct => (TokenKind::Struct, "struct", None),
            FuzzToken::Public => (TokenKind::Public, "public", None),
            FuzzToken::Return => (TokenKind::Return, "return", None),
            FuzzToken::If => (TokenKind::If, "if", None),
            FuzzToken::Else => (TokenKind::Else, "else", None),
            FuzzToken::While => (TokenKind::While, "while", None),
            FuzzToken::For => (TokenKind::For, "for", None),
            FuzzToken::In => (TokenKind::In, "in", None),
            FuzzToken::Match => (TokenKind::Match, "match", None),
            FuzzToken::Unsafe => (TokenKind::Unsafe, "unsafe", None),
            FuzzToken::Asm => (TokenKind::Asm, "asm", None),
            FuzzToken::Marker(level) => {
                let text = match level {
                    FuzzLevel::High => "@high",
                    FuzzLevel::Medium => "@medium",
                    FuzzLevel::Low => "@low",
                    FuzzLevel::Assembly => "@asm",
                };
                (TokenKind::LevelMarker, text, None)
            }
        };
        let span = Span::new(offset, offset + 1);
        let token = Token::new(kind, text, span, 1, offset as u32 + 1);
        match literal {
            Some(value) => token.with_literal(value),
            None => token,
        }
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzTokens {
    level: FuzzLevel,
    tokens: Vec<FuzzToken>,
}

fuzz_target!(|input: FuzzTokens| {
    // Generate token stream; levels are stamped uniformly since there is no lexer here
    let level = match input.level {
        FuzzLevel::High => SyntaxLevel::High,
        FuzzLevel::Medium => SyntaxLevel::Medium,
        FuzzLevel::Low => SyntaxLevel::Low,
        FuzzLevel::Assembly => SyntaxLevel::Assembly,
    };
    let mut tokens: Vec<Token> = input
        .tokens
        .iter()
        .enumerate()
        .map(|(i, t)| t.to_token(i).with_level(level))
        .collect();

    // Always add EOF
    let last_offset = tokens.len();
    tokens.push(Token::eof(Span::new(last_offset, last_offset), 1, last_offset as u32 + 1).with_level(level));

    // Feed to parser - should never panic
    let _ = Parser::new(&tokens).parse_program();
});
