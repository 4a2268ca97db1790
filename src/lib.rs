pub mod config;
pub mod diagnostics;
pub mod level;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod visit;

use std::path::Path;

use tracing::debug;

use config::ParserConfig;
use diagnostics::CompileError;
use parser::{ParseOutput, Parser};

/// Lex and parse a source string (lex → parse). No file I/O.
///
/// Recovered syntax errors come back in `ParseOutput::diagnostics`; `Err` is
/// reserved for lexer failures and the diagnostic ceiling.
pub fn parse_source(source: &str, config: &ParserConfig) -> Result<ParseOutput, CompileError> {
    let tokens = lexer::lex(source, 0)?;
    debug!(tokens = tokens.len(), "lexed source");
    Parser::with_config(&tokens, config.clone()).parse_program()
}

/// Read and parse a file. The configuration is taken as given; callers that
/// want `quadra.toml` discovery use [`load_config`] first.
pub fn parse_file(path: &Path, config: &ParserConfig) -> Result<(String, ParseOutput), CompileError> {
    let source = std::fs::read_to_string(path).map_err(|e| CompileError::io(&e, path.to_path_buf()))?;
    let output = parse_source(&source, config)?;
    Ok((source, output))
}

/// The configuration in effect for `file`: `explicit` if given, otherwise the
/// nearest `quadra.toml` above the file, otherwise the defaults.
pub fn load_config(file: &Path, explicit: Option<&Path>) -> Result<ParserConfig, CompileError> {
    let found = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => ParserConfig::find(file),
    };
    match found {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            ParserConfig::load(&path)
        }
        None => Ok(ParserConfig::default()),
    }
}
