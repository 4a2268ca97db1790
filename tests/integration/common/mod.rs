#![allow(dead_code)]

use std::process::Command;

use quadra::config::ParserConfig;
use quadra::level::SyntaxLevel;
use quadra::lexer::lex;
use quadra::parser::ast::*;
use quadra::parser::{ParseOutput, Parser};

pub fn quadrac() -> Command {
    Command::new(env!("CARGO_BIN_EXE_quadrac"))
}

pub fn parse(source: &str) -> ParseOutput {
    quadra::parse_source(source, &ParserConfig::default()).unwrap()
}

pub fn parse_with(source: &str, config: ParserConfig) -> ParseOutput {
    quadra::parse_source(source, &config).unwrap()
}

pub fn parse_at(source: &str, level: SyntaxLevel) -> ParseOutput {
    parse_with(source, ParserConfig { default_level: level, ..ParserConfig::default() })
}

/// Parse and assert that no diagnostics were recorded.
pub fn parse_ok(source: &str) -> Program {
    let out = parse(source);
    assert!(!out.has_errors(), "unexpected diagnostics for {source:?}: {:#?}", out.diagnostics);
    out.program
}

pub fn single_stmt(source: &str) -> Stmt {
    let mut program = parse_ok(source);
    assert_eq!(program.statements.len(), 1, "expected one statement: {:#?}", program.statements);
    program.statements.remove(0).node
}

pub fn messages(out: &ParseOutput) -> Vec<String> {
    out.diagnostics.iter().map(|d| d.message.clone()).collect()
}

pub fn expr(source: &str) -> Expr {
    expr_at(source, SyntaxLevel::Medium)
}

pub fn expr_at(source: &str, level: SyntaxLevel) -> Expr {
    let tokens = lex(source, 0).unwrap();
    let config = ParserConfig { default_level: level, ..ParserConfig::default() };
    match Parser::with_config(&tokens, config).parse_standalone_expr() {
        Ok(e) => e.node,
        Err(err) => panic!("failed to parse {source:?}: {err}"),
    }
}

pub fn expr_err(source: &str) -> String {
    let tokens = lex(source, 0).unwrap();
    match Parser::new(&tokens).parse_standalone_expr() {
        Ok(e) => panic!("expected {source:?} to fail, got {:?}", e.node),
        Err(err) => err.to_string(),
    }
}

/// Fully parenthesised rendering of an expression, for precedence checks.
pub fn sexp(e: &Expr) -> String {
    match e {
        Expr::Literal(lit) => lit.lexeme.clone(),
        Expr::Ident(name) => name.clone(),
        Expr::MacroParam(name) => format!("${name}"),
        Expr::Binary { op, lhs, rhs } => format!("({} {} {})", binop(*op), sexp(&lhs.node), sexp(&rhs.node)),
        Expr::Unary { op, operand } => {
            let sym = match op {
                UnaryOp::Not => "!",
                UnaryOp::Neg => "-",
                UnaryOp::Plus => "+",
                UnaryOp::BitNot => "~",
                UnaryOp::PreIncrement => "++",
                UnaryOp::PreDecrement => "--",
                UnaryOp::Deref => "*",
            };
            format!("({sym} {})", sexp(&operand.node))
        }
        Expr::MathPrefix { op, operand } => {
            let sym = match op {
                MathOp::Partial => "∂",
                MathOp::Nabla => "∇",
                MathOp::Sqrt => "√",
            };
            format!("({sym} {})", sexp(&operand.node))
        }
        Expr::Postfix { op, operand } => {
            let sym = if *op == PostfixOp::Increment { "++" } else { "--" };
            format!("(post{sym} {})", sexp(&operand.node))
        }
        Expr::Assign { op, target, value } => {
            format!("({op:?}= {} {})", sexp(&target.node), sexp(&value.node))
        }
        Expr::Conditional { condition, then_expr, else_expr } => format!(
            "(? {} {} {})",
            sexp(&condition.node),
            sexp(&then_expr.node),
            sexp(&else_expr.node)
        ),
        Expr::Call { callee, args, .. } => {
            let args: Vec<_> = args.iter().map(|a| sexp(&a.node)).collect();
            format!("(call {} {})", sexp(&callee.node), args.join(" "))
        }
        Expr::Member { object, name, .. } => format!("(. {} {})", sexp(&object.node), name.node),
        Expr::Index { object, index } => format!("([] {} {})", sexp(&object.node), sexp(&index.node)),
        Expr::TypeTest { expr, .. } => format!("(is-type {})", sexp(&expr.node)),
        Expr::Cast { expr, .. } => format!("(as {})", sexp(&expr.node)),
        Expr::Ref { mutable, expr } => format!("(&{} {})", if *mutable { "mut" } else { "" }, sexp(&expr.node)),
        Expr::Limit { var, approach, body } => {
            format!("(lim {} {} {})", var.node, sexp(&approach.node), sexp(&body.node))
        }
        Expr::Integral { body, var, .. } => format!("(∫ {} d{})", sexp(&body.node), var.node),
        Expr::Tuple(items) => {
            let items: Vec<_> = items.iter().map(|a| sexp(&a.node)).collect();
            format!("(tuple {})", items.join(" "))
        }
        other => format!("<{}>", variant_name(other)),
    }
}

fn binop(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Dot => "·",
        BinaryOp::Pow => "**",
        BinaryOp::Eq => "==",
        BinaryOp::Neq => "!=",
        BinaryOp::ApproxEq => "≈",
        BinaryOp::Lt => "<",
        BinaryOp::Gt => ">",
        BinaryOp::LtEq => "<=",
        BinaryOp::GtEq => ">=",
        BinaryOp::Is => "is",
        BinaryOp::In => "in",
        BinaryOp::NotIn => "∉",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
        BinaryOp::BitAnd => "&",
        BinaryOp::BitOr => "|",
        BinaryOp::BitXor => "^",
        BinaryOp::Shl => "<<",
        BinaryOp::Shr => ">>",
        BinaryOp::Union => "∪",
        BinaryOp::Intersection => "∩",
        BinaryOp::Range => "..",
        BinaryOp::RangeInclusive => "..=",
        BinaryOp::Coalesce => "??",
    }
}

fn variant_name(e: &Expr) -> String {
    let debug = format!("{e:?}");
    debug.split(|c: char| !c.is_alphanumeric()).next().unwrap_or_default().to_string()
}
