use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::lexer::Token;
use crate::span::Span;

/// A recovered syntax error: what went wrong and the token it was raised at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub token: Token,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, token: Token) -> Self {
        Self { message: message.into(), token }
    }

    pub fn span(&self) -> Span {
        self.token.span
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.token.line, self.token.column, self.message)
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Syntax error: {msg}")]
    Lex { msg: String, span: Span },

    #[error("Too many errors: more than {limit} diagnostics, parse aborted")]
    CeilingExceeded { limit: usize, diagnostics: Vec<Diagnostic> },

    #[error("Config error: {msg}")]
    Config { msg: String, path: PathBuf },

    #[error("I/O error: {msg}")]
    Io { msg: String, path: PathBuf },
}

impl CompileError {
    pub fn lex(msg: impl Into<String>, span: Span) -> Self {
        Self::Lex { msg: msg.into(), span }
    }

    pub fn config(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Config { msg: msg.into(), path }
    }

    pub fn io(err: &io::Error, path: PathBuf) -> Self {
        Self::Io { msg: err.to_string(), path }
    }
}

/// Render one recovered diagnostic with ariadne.
pub fn render_diagnostic(
    source: &str,
    filename: &str,
    diagnostic: &Diagnostic,
    out: impl io::Write,
    color: bool,
) -> io::Result<()> {
    use ariadne::{Config, Label, Report, ReportKind, Source};

    let span = diagnostic.span();
    Report::build(ReportKind::Error, (), span.start)
        .with_config(Config::default().with_color(color))
        .with_message(format!("syntax error in {filename}"))
        .with_label(Label::new(span.start..span.end.max(span.start)).with_message(&diagnostic.message))
        .finish()
        .write(Source::from(source), out)
}

/// Render a fatal CompileError for terminal output.
pub fn render_error(source: &str, filename: &str, err: &CompileError) -> io::Result<()> {
    use ariadne::{Label, Report, ReportKind, Source};

    match err {
        CompileError::Lex { msg, span } => Report::build(ReportKind::Error, (), span.start)
            .with_message(format!("syntax error in {filename}"))
            .with_label(Label::new(span.start..span.end).with_message(msg))
            .finish()
            .eprint(Source::from(source)),
        CompileError::CeilingExceeded { diagnostics, .. } => {
            for diagnostic in diagnostics {
                render_diagnostic(source, filename, diagnostic, io::stderr(), true)?;
            }
            eprintln!("error: {err}");
            Ok(())
        }
        CompileError::Config { msg, path } => {
            eprintln!("error[config]: {msg}");
            eprintln!("  --> {}", path.display());
            Ok(())
        }
        CompileError::Io { msg, path } => {
            eprintln!("error: {msg}");
            eprintln!("  --> {}", path.display());
            Ok(())
        }
    }
}
