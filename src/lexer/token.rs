use std::fmt;

use logos::Logos;
use serde::Serialize;

use crate::level::SyntaxLevel;
use crate::span::Span;

/// Token category. Payloads live on [`Token::literal`], the kind is a plain tag.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // Keywords
    #[token("namespace")]
    Namespace,
    #[token("class")]
    Class,
    #[token("interface")]
    Interface,
    #[token("struct")]
    Struct,
    #[token("union")]
    Union,
    #[token("enum")]
    Enum,
    #[token("fn")]
    #[token("function")]
    Fn,
    #[token("macro")]
    Macro,
    #[token("let")]
    Let,
    #[token("var")]
    Var,
    #[token("const")]
    Const,
    #[token("static")]
    Static,
    #[token("readonly")]
    Readonly,
    #[token("public")]
    #[token("pub")]
    Public,
    #[token("private")]
    Private,
    #[token("protected")]
    Protected,
    #[token("internal")]
    Internal,
    #[token("abstract")]
    Abstract,
    #[token("virtual")]
    Virtual,
    #[token("override")]
    Override,
    #[token("sealed")]
    Sealed,
    #[token("async")]
    Async,
    #[token("mut")]
    Mut,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("foreach")]
    Foreach,
    #[token("in")]
    In,
    #[token("do")]
    Do,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("match")]
    Match,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("finally")]
    Finally,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("throw")]
    Throw,
    #[token("yield")]
    Yield,
    #[token("using")]
    Using,
    #[token("lock")]
    Lock,
    #[token("unsafe")]
    Unsafe,
    #[token("fixed")]
    Fixed,
    #[token("stackalloc")]
    Stackalloc,
    #[token("new")]
    New,
    #[token("typeof")]
    Typeof,
    #[token("sizeof")]
    Sizeof,
    #[token("nameof")]
    Nameof,
    #[token("is")]
    Is,
    #[token("as")]
    As,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("asm")]
    Asm,

    // Syntax-level markers: @high @medium @low @asm @assembly
    #[regex(r"@(high|medium|low|asm|assembly)")]
    LevelMarker,

    // Literals
    #[regex(r"0[xX][0-9a-fA-F_]+|0[bB][01_]+|[0-9][0-9_]*")]
    IntLit,
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?|[0-9][0-9_]*[eE][+-]?[0-9]+")]
    FloatLit,
    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?(ms|s|min|h|kg|g|m|km|cm|mm|N|J|W|Hz|rad|deg)")]
    UnitLit,
    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLit,
    #[regex(r#"\$"([^"\\]|\\.)*""#)]
    InterpStr,
    #[regex(r"'([^'\\\n]|\\.)'")]
    CharLit,

    // Identifiers (Latin and Greek letters)
    #[regex(r"[a-zA-Z_α-ωΑ-Ω][a-zA-Z0-9_α-ωΑ-Ω]*")]
    Ident,
    #[regex(r"[₀-₉]+")]
    Subscript,
    #[regex(r"[∞ℏℵℝℤℕℚℂ∅]")]
    MathSymbol,

    // Operators
    #[token("++")]
    PlusPlus,
    #[token("+")]
    Plus,
    #[token("--")]
    MinusMinus,
    #[token("-")]
    Minus,
    #[token("**")]
    StarStar,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("**=")]
    StarStarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,
    #[token("??=")]
    QuestionQuestionEq,
    #[token(":=")]
    ColonEq,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<<")]
    Shl,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token("??")]
    QuestionQuestion,
    #[token("?.")]
    QuestionDot,

    // Mathematical operators
    #[token("∪")]
    SetUnion,
    #[token("∩")]
    SetIntersect,
    #[token("∈")]
    ElementOf,
    #[token("∉")]
    NotElementOf,
    #[token("≈")]
    Approx,
    #[token("≠")]
    NotEqualSign,
    #[token("≤")]
    LessEqualSign,
    #[token("≥")]
    GreaterEqualSign,
    #[token("×")]
    Times,
    #[token("÷")]
    Divide,
    #[token("·")]
    CDot,
    #[token("∂")]
    Partial,
    #[token("∇")]
    Nabla,
    #[token("√")]
    Sqrt,
    #[token("∫")]
    Integral,
    #[token("⟨")]
    LAngle,
    #[token("⟩")]
    RAngle,
    #[token("ℍ")]
    Quaternion,

    // Punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token("...")]
    Ellipsis,
    #[token("..=")]
    DotDotEq,
    #[token("..")]
    DotDot,
    #[token(".")]
    Dot,
    #[token("$")]
    Dollar,

    // Comments (skipped by the driver)
    #[regex(r"//[^\n]*")]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    /// End-of-stream sentinel, never produced by logos itself.
    Eof,
}

impl TokenKind {
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntLit
                | TokenKind::FloatLit
                | TokenKind::UnitLit
                | TokenKind::StringLit
                | TokenKind::InterpStr
                | TokenKind::CharLit
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    pub fn is_visibility(self) -> bool {
        matches!(
            self,
            TokenKind::Public | TokenKind::Private | TokenKind::Protected | TokenKind::Internal
        )
    }

    /// Storage and behaviour modifiers that may follow or precede a visibility.
    pub fn is_storage_modifier(self) -> bool {
        matches!(
            self,
            TokenKind::Static
                | TokenKind::Const
                | TokenKind::Readonly
                | TokenKind::Abstract
                | TokenKind::Virtual
                | TokenKind::Override
                | TokenKind::Sealed
                | TokenKind::Async
                | TokenKind::Mut
        )
    }

    /// Description used in "expected ..." diagnostics: symbols are quoted, categories are not.
    pub fn describe(self) -> String {
        match self {
            TokenKind::Ident
            | TokenKind::IntLit
            | TokenKind::FloatLit
            | TokenKind::UnitLit
            | TokenKind::StringLit
            | TokenKind::InterpStr
            | TokenKind::CharLit
            | TokenKind::Subscript
            | TokenKind::MathSymbol
            | TokenKind::LevelMarker
            | TokenKind::Eof => self.to_string(),
            _ => format!("'{self}'"),
        }
    }

    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Class | TokenKind::Interface | TokenKind::Struct | TokenKind::Union
        )
    }
}

/// Decoded payload of a literal token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LiteralValue {
    Bool(bool),
    Int(i128),
    Float(f64),
    Str(String),
    Char(char),
    Unit { value: f64, unit: String },
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub literal: Option<LiteralValue>,
    pub span: Span,
    pub line: u32,
    pub column: u32,
    pub level: SyntaxLevel,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span, line: u32, column: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            literal: None,
            span,
            line,
            column,
            level: SyntaxLevel::default(),
        }
    }

    pub fn eof(span: Span, line: u32, column: u32) -> Self {
        Self::new(TokenKind::Eof, "", span, line, column)
    }

    pub fn with_literal(mut self, literal: LiteralValue) -> Self {
        self.literal = Some(literal);
        self
    }

    pub fn with_level(mut self, level: SyntaxLevel) -> Self {
        self.level = level;
        self
    }

    /// True for an identifier token spelled exactly `word`.
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == word
    }

    /// Human-readable description used in "found ..." diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Ident => format!("identifier '{}'", self.text),
            kind if kind.is_literal() && !matches!(kind, TokenKind::True | TokenKind::False | TokenKind::Null) => {
                format!("literal {}", self.text)
            }
            _ => format!("'{}'", self.text),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Namespace => "namespace",
            TokenKind::Class => "class",
            TokenKind::Interface => "interface",
            TokenKind::Struct => "struct",
            TokenKind::Union => "union",
            TokenKind::Enum => "enum",
            TokenKind::Fn => "fn",
            TokenKind::Macro => "macro",
            TokenKind::Let => "let",
            TokenKind::Var => "var",
            TokenKind::Const => "const",
            TokenKind::Static => "static",
            TokenKind::Readonly => "readonly",
            TokenKind::Public => "public",
            TokenKind::Private => "private",
            TokenKind::Protected => "protected",
            TokenKind::Internal => "internal",
            TokenKind::Abstract => "abstract",
            TokenKind::Virtual => "virtual",
            TokenKind::Override => "override",
            TokenKind::Sealed => "sealed",
            TokenKind::Async => "async",
            TokenKind::Mut => "mut",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::Foreach => "foreach",
            TokenKind::In => "in",
            TokenKind::Do => "do",
            TokenKind::Switch => "switch",
            TokenKind::Case => "case",
            TokenKind::Default => "default",
            TokenKind::Match => "match",
            TokenKind::Try => "try",
            TokenKind::Catch => "catch",
            TokenKind::Finally => "finally",
            TokenKind::Return => "return",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Throw => "throw",
            TokenKind::Yield => "yield",
            TokenKind::Using => "using",
            TokenKind::Lock => "lock",
            TokenKind::Unsafe => "unsafe",
            TokenKind::Fixed => "fixed",
            TokenKind::Stackalloc => "stackalloc",
            TokenKind::New => "new",
            TokenKind::Typeof => "typeof",
            TokenKind::Sizeof => "sizeof",
            TokenKind::Nameof => "nameof",
            TokenKind::Is => "is",
            TokenKind::As => "as",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Asm => "asm",
            TokenKind::LevelMarker => "level marker",
            TokenKind::IntLit => "integer literal",
            TokenKind::FloatLit => "float literal",
            TokenKind::UnitLit => "unit literal",
            TokenKind::StringLit => "string literal",
            TokenKind::InterpStr => "interpolated string",
            TokenKind::CharLit => "character literal",
            TokenKind::Ident => "identifier",
            TokenKind::Subscript => "subscript",
            TokenKind::MathSymbol => "mathematical symbol",
            TokenKind::PlusPlus => "++",
            TokenKind::Plus => "+",
            TokenKind::MinusMinus => "--",
            TokenKind::Minus => "-",
            TokenKind::StarStar => "**",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::StarStarEq => "**=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::AmpEq => "&=",
            TokenKind::PipeEq => "|=",
            TokenKind::CaretEq => "^=",
            TokenKind::ShlEq => "<<=",
            TokenKind::QuestionQuestionEq => "??=",
            TokenKind::ColonEq => ":=",
            TokenKind::Eq => "=",
            TokenKind::EqEq => "==",
            TokenKind::BangEq => "!=",
            TokenKind::Shl => "<<",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Bang => "!",
            TokenKind::Question => "?",
            TokenKind::QuestionQuestion => "??",
            TokenKind::QuestionDot => "?.",
            TokenKind::SetUnion => "∪",
            TokenKind::SetIntersect => "∩",
            TokenKind::ElementOf => "∈",
            TokenKind::NotElementOf => "∉",
            TokenKind::Approx => "≈",
            TokenKind::NotEqualSign => "≠",
            TokenKind::LessEqualSign => "≤",
            TokenKind::GreaterEqualSign => "≥",
            TokenKind::Times => "×",
            TokenKind::Divide => "÷",
            TokenKind::CDot => "·",
            TokenKind::Partial => "∂",
            TokenKind::Nabla => "∇",
            TokenKind::Sqrt => "√",
            TokenKind::Integral => "∫",
            TokenKind::LAngle => "⟨",
            TokenKind::RAngle => "⟩",
            TokenKind::Quaternion => "ℍ",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Semi => ";",
            TokenKind::Colon => ":",
            TokenKind::ColonColon => "::",
            TokenKind::Arrow => "->",
            TokenKind::FatArrow => "=>",
            TokenKind::Ellipsis => "...",
            TokenKind::DotDotEq => "..=",
            TokenKind::DotDot => "..",
            TokenKind::Dot => ".",
            TokenKind::Dollar => "$",
            TokenKind::Comment => "comment",
            TokenKind::Eof => "end of file",
        };
        f.write_str(s)
    }
}
