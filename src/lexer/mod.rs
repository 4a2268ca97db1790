pub mod token;

pub use token::{LiteralValue, Token, TokenKind};

use logos::Logos;

use crate::diagnostics::CompileError;
use crate::level::SyntaxLevel;
use crate::span::Span;

/// Numeric suffixes that fuse with a directly preceding number literal.
pub const NUMERIC_SUFFIXES: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize", "f32",
    "f64", "u", "l", "ul", "f", "d",
];

const UNITS: &[&str] = &[
    "ms", "min", "km", "cm", "mm", "kg", "Hz", "rad", "deg", "s", "h", "g", "m", "N", "J", "W",
];

/// Lex `source` into a token stream terminated by an `Eof` token.
pub fn lex(source: &str, file_id: u32) -> Result<Vec<Token>, CompileError> {
    let lines = LineIndex::new(source);
    let mut levels = LevelTracker::new(SyntaxLevel::default());
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let span = Span::with_file(range.start, range.end, file_id);
        let kind = match result {
            Ok(TokenKind::Comment) => continue,
            Ok(kind) => kind,
            Err(()) => {
                return Err(CompileError::lex(
                    format!("unexpected character '{}'", lexer.slice()),
                    span,
                ));
            }
        };
        let text = lexer.slice();
        let (line, column) = lines.position(range.start);
        let level = levels.stamp(kind, text);
        let mut tok = Token::new(kind, text, span, line, column).with_level(level);
        if let Some(literal) = literal_value(kind, text, span)? {
            tok = tok.with_literal(literal);
        }
        tokens.push(tok);
    }

    let end = Span::with_file(source.len(), source.len(), file_id);
    let (line, column) = lines.position(source.len());
    tokens.push(Token::eof(end, line, column).with_level(levels.current));

    // 1.2.3 would otherwise lex as FloatLit(1.2) Dot IntLit(3)
    for pair in tokens.windows(2) {
        if pair[0].kind == TokenKind::FloatLit
            && pair[1].kind == TokenKind::Dot
            && pair[0].span.end == pair[1].span.start
        {
            return Err(CompileError::lex(
                "invalid number format: multiple decimal points",
                pair[0].span.to(pair[1].span),
            ));
        }
    }

    Ok(tokens)
}

/// Decode the payload of a literal token.
fn literal_value(kind: TokenKind, text: &str, span: Span) -> Result<Option<LiteralValue>, CompileError> {
    let value = match kind {
        TokenKind::IntLit => LiteralValue::Int(parse_int(text).ok_or_else(|| {
            CompileError::lex(format!("integer literal '{text}' is out of range"), span)
        })?),
        TokenKind::FloatLit => LiteralValue::Float(parse_float(text).ok_or_else(|| {
            CompileError::lex(format!("malformed float literal '{text}'"), span)
        })?),
        TokenKind::UnitLit => {
            let (number, unit) = split_unit(text)
                .ok_or_else(|| CompileError::lex(format!("malformed unit literal '{text}'"), span))?;
            let value = parse_float(number)
                .ok_or_else(|| CompileError::lex(format!("malformed unit literal '{text}'"), span))?;
            LiteralValue::Unit { value, unit: unit.to_string() }
        }
        TokenKind::StringLit => LiteralValue::Str(unescape(&text[1..text.len() - 1])),
        TokenKind::InterpStr => LiteralValue::Str(text[2..text.len() - 1].to_string()),
        TokenKind::CharLit => {
            let decoded = unescape(&text[1..text.len() - 1]);
            let mut chars = decoded.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => LiteralValue::Char(c),
                _ => {
                    return Err(CompileError::lex(
                        format!("character literal {text} must hold exactly one character"),
                        span,
                    ));
                }
            }
        }
        TokenKind::True => LiteralValue::Bool(true),
        TokenKind::False => LiteralValue::Bool(false),
        TokenKind::Null => LiteralValue::Null,
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn parse_int(text: &str) -> Option<i128> {
    let cleaned = text.replace('_', "");
    if let Some(hex) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        if hex.is_empty() {
            return None;
        }
        i128::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = cleaned.strip_prefix("0b").or_else(|| cleaned.strip_prefix("0B")) {
        if bin.is_empty() {
            return None;
        }
        i128::from_str_radix(bin, 2).ok()
    } else {
        cleaned.parse::<i128>().ok()
    }
}

fn parse_float(text: &str) -> Option<f64> {
    text.replace('_', "").parse::<f64>().ok()
}

/// Split `5.0kg` into `("5.0", "kg")`. Longer units are tried first so `5ms` is not `5m` + `s`.
fn split_unit(text: &str) -> Option<(&str, &str)> {
    UNITS
        .iter()
        .filter(|unit| text.ends_with(*unit))
        .max_by_key(|unit| unit.len())
        .map(|unit| text.split_at(text.len() - unit.len()))
}

/// Resolve backslash escapes in a string or char literal body.
pub(crate) fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('0') => result.push('\0'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                Some('{') => result.push('{'),
                Some('}') => result.push('}'),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// Byte offset to 1-based line/column (columns count chars, not bytes).
struct LineIndex<'a> {
    source: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { source, starts }
    }

    fn position(&self, offset: usize) -> (u32, u32) {
        let line = match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let start = self.starts[line];
        let column = self.source.get(start..offset).map_or(0, |s| s.chars().count());
        (line as u32 + 1, column as u32 + 1)
    }
}

/// Stamps each token with the level of the innermost marked declaration around it.
///
/// A marker opens a pending level that takes over at the next `{` and ends at
/// the matching `}`. Header tokens between marker and brace already carry the
/// pending level; a `;` at the marker's depth drops it (body-less declaration).
struct LevelTracker {
    current: SyntaxLevel,
    pending: Option<(SyntaxLevel, usize)>,
    depth: usize,
    scopes: Vec<(SyntaxLevel, usize)>,
}

impl LevelTracker {
    fn new(base: SyntaxLevel) -> Self {
        Self { current: base, pending: None, depth: 0, scopes: Vec::new() }
    }

    fn stamp(&mut self, kind: TokenKind, text: &str) -> SyntaxLevel {
        match kind {
            TokenKind::LevelMarker => {
                let stamped = self.effective();
                if let Some(level) = SyntaxLevel::from_marker(text) {
                    self.pending = Some((level, self.depth));
                }
                stamped
            }
            TokenKind::LBrace => {
                self.depth += 1;
                if let Some((level, _)) = self.pending.take() {
                    self.scopes.push((self.current, self.depth));
                    self.current = level;
                }
                self.current
            }
            TokenKind::RBrace => {
                let stamped = self.current;
                if let Some(&(previous, depth)) = self.scopes.last() {
                    if depth == self.depth {
                        self.scopes.pop();
                        self.current = previous;
                    }
                }
                self.depth = self.depth.saturating_sub(1);
                stamped
            }
            TokenKind::Semi => {
                let stamped = self.effective();
                if matches!(self.pending, Some((_, depth)) if depth == self.depth) {
                    self.pending = None;
                }
                stamped
            }
            _ => self.effective(),
        }
    }

    fn effective(&self) -> SyntaxLevel {
        self.pending.map_or(self.current, |(level, _)| level)
    }
}
