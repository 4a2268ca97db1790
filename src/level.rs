use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Grammar dialect active while parsing a region of source.
///
/// High adds terse conveniences on top of Medium, Low unlocks pointer and
/// memory constructs, Assembly additionally accepts raw `asm { }` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxLevel {
    High,
    #[default]
    Medium,
    Low,
    #[serde(alias = "asm")]
    Assembly,
}

impl SyntaxLevel {
    /// Level named by a marker lexeme such as `@low`.
    pub fn from_marker(text: &str) -> Option<Self> {
        text.strip_prefix('@').and_then(|name| name.parse().ok())
    }

    /// Low and Assembly accept pointers, dereference and raw memory constructs.
    pub fn allows_pointers(self) -> bool {
        matches!(self, SyntaxLevel::Low | SyntaxLevel::Assembly)
    }

    /// Only Assembly accepts `asm { ... }` blocks.
    pub fn allows_asm(self) -> bool {
        self == SyntaxLevel::Assembly
    }

    pub fn name(self) -> &'static str {
        match self {
            SyntaxLevel::High => "high",
            SyntaxLevel::Medium => "medium",
            SyntaxLevel::Low => "low",
            SyntaxLevel::Assembly => "assembly",
        }
    }
}

impl fmt::Display for SyntaxLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SyntaxLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(SyntaxLevel::High),
            "medium" => Ok(SyntaxLevel::Medium),
            "low" => Ok(SyntaxLevel::Low),
            "asm" | "assembly" => Ok(SyntaxLevel::Assembly),
            other => Err(format!(
                "unknown syntax level '{other}' (expected high, medium, low or asm)"
            )),
        }
    }
}
