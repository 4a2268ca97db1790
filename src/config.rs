use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diagnostics::CompileError;
use crate::level::SyntaxLevel;

pub const CONFIG_FILE_NAME: &str = "quadra.toml";

/// What to do with a top-level `public Type Name(...)` header written in the
/// style of a foreign C-family language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForeignHeaderPolicy {
    /// Skip the header and keep only the body as a block statement.
    #[default]
    Wrap,
    /// Parse the header as a native C-style function declaration.
    Native,
}

/// Parser tuning knobs, read from the `[parser]` table of `quadra.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    /// Abort the parse once more than this many diagnostics were recorded.
    pub max_diagnostics: usize,
    /// Deepest allowed nesting of expressions, statements and types.
    ///
    /// Every level is a handful of native stack frames. The default keeps a
    /// parse at the limit inside a 2 MiB thread stack in debug builds; raise it
    /// only together with the stack size of the parsing thread.
    pub max_nesting: usize,
    /// Level in effect outside any marked declaration.
    pub default_level: SyntaxLevel,
    pub foreign_headers: ForeignHeaderPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_diagnostics: 100,
            max_nesting: 32,
            default_level: SyntaxLevel::Medium,
            foreign_headers: ForeignHeaderPolicy::Wrap,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    parser: ParserConfig,
}

impl ParserConfig {
    /// Parse the contents of a `quadra.toml`. `path` is only used in errors.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, CompileError> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| CompileError::config(format!("failed to parse {CONFIG_FILE_NAME}: {e}"), path.to_path_buf()))?;
        file.parser.validate(path)?;
        Ok(file.parser)
    }

    pub fn load(path: &Path) -> Result<Self, CompileError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CompileError::config(format!("could not read {}: {e}", path.display()), path.to_path_buf())
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Walk up from `start` looking for a `quadra.toml`.
    pub fn find(start: &Path) -> Option<PathBuf> {
        let mut dir = if start.is_file() { start.parent()? } else { start };
        loop {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            dir = dir.parent()?;
        }
    }

    fn validate(&self, path: &Path) -> Result<(), CompileError> {
        if self.max_nesting == 0 {
            return Err(CompileError::config("parser.max_nesting must be at least 1", path.to_path_buf()));
        }
        Ok(())
    }
}
