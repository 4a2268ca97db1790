use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use quadra::config::ParserConfig;
use quadra::diagnostics::{self, CompileError};
use quadra::level::SyntaxLevel;
use quadra::parser::ParseOutput;

#[derive(Parser)]
#[command(name = "quadrac", version, about = "The Quadra front-end parser")]
struct Cli {
    /// Path to a quadra.toml (defaults to the nearest one above the input file)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Syntax level outside any marked declaration: high, medium, low or asm
    #[arg(long, global = true)]
    level: Option<SyntaxLevel>,

    /// Abort once more than this many syntax errors were recorded
    #[arg(long, global = true)]
    max_diagnostics: Option<usize>,

    /// Tracing filter, e.g. "debug" or "quadra::parser=trace" (falls back to QUADRA_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of a source file
    Tokens {
        /// Source file path
        file: PathBuf,
    },
    /// Parse a source file and print its syntax tree
    Parse {
        /// Source file path
        file: PathBuf,
        /// Output format for the tree
        #[arg(long, value_enum, default_value_t = OutputFormat::Debug)]
        format: OutputFormat,
    },
    /// Parse a source file and report syntax errors only
    Check {
        /// Source file path
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Debug,
    Json,
}

fn init_tracing(flag: Option<&str>) {
    let filter = flag
        .map(str::to_string)
        .or_else(|| std::env::var("QUADRA_LOG").ok())
        .unwrap_or_else(|| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn resolve_config(cli: &Cli, file: &Path) -> Result<ParserConfig, CompileError> {
    let mut config = quadra::load_config(file, cli.config.as_deref())?;
    if let Some(level) = cli.level {
        config.default_level = level;
    }
    if let Some(max) = cli.max_diagnostics {
        config.max_diagnostics = max;
    }
    Ok(config)
}

fn read_source(file: &Path) -> Result<String, CompileError> {
    std::fs::read_to_string(file).map_err(|e| CompileError::io(&e, file.to_path_buf()))
}

/// Render every recovered diagnostic to stderr; true when there were any.
fn report_diagnostics(source: &str, file: &Path, output: &ParseOutput) -> bool {
    let filename = file.to_string_lossy();
    let color = io::stderr().is_terminal();
    for diagnostic in &output.diagnostics {
        if let Err(err) = diagnostics::render_diagnostic(source, &filename, diagnostic, io::stderr(), color) {
            eprintln!("error: failed to render diagnostic: {err}");
            eprintln!("{filename}:{diagnostic}");
        }
    }
    if output.has_errors() {
        eprintln!("{}: {} syntax error(s)", filename, output.diagnostics.len());
    }
    output.has_errors()
}

fn fail(source: Option<&str>, file: &Path, err: &CompileError) -> ! {
    let filename = file.to_string_lossy();
    match source {
        Some(source) => {
            if diagnostics::render_error(source, &filename, err).is_err() {
                eprintln!("error [{filename}]: {err}");
            }
        }
        None => eprintln!("error [{filename}]: {err}"),
    }
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let file = match &cli.command {
        Commands::Tokens { file } | Commands::Parse { file, .. } | Commands::Check { file } => file.clone(),
    };
    let source = read_source(&file).unwrap_or_else(|err| fail(None, &file, &err));

    match &cli.command {
        Commands::Tokens { .. } => {
            let tokens = quadra::lexer::lex(&source, 0).unwrap_or_else(|err| fail(Some(&source), &file, &err));
            for tok in &tokens {
                println!("{}:{}\t{:?}\t{}\t{:?}", tok.line, tok.column, tok.kind, tok.level, tok.text);
            }
        }
        Commands::Parse { format, .. } => {
            let config = resolve_config(&cli, &file).unwrap_or_else(|err| fail(None, &file, &err));
            let output =
                quadra::parse_source(&source, &config).unwrap_or_else(|err| fail(Some(&source), &file, &err));
            match format {
                OutputFormat::Debug => println!("{:#?}", output.program),
                OutputFormat::Json => match serde_json::to_string_pretty(&output.program) {
                    Ok(json) => println!("{json}"),
                    Err(err) => {
                        eprintln!("error: failed to serialise syntax tree: {err}");
                        std::process::exit(1);
                    }
                },
            }
            if report_diagnostics(&source, &file, &output) {
                std::process::exit(1);
            }
        }
        Commands::Check { .. } => {
            let config = resolve_config(&cli, &file).unwrap_or_else(|err| fail(None, &file, &err));
            let output =
                quadra::parse_source(&source, &config).unwrap_or_else(|err| fail(Some(&source), &file, &err));
            if report_diagnostics(&source, &file, &output) {
                std::process::exit(1);
            }
            eprintln!("{}: ok", file.to_string_lossy());
        }
    }
}
