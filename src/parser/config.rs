use serde::{Deserialize, Serialize};

/// Treatment of TEXT tokens made only of line terminators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitespaceMode {
    /// Drop them.
    #[default]
    Normalize,
    /// Keep them as a node shaped by [`LineBreakMode`].
    Preserve,
}

/// Node produced for a preserved standalone line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineBreakMode {
    /// A bare LINEBREAK at document level.
    #[default]
    Structural,
    /// A PARAGRAPH wrapping one LINEBREAK.
    Paragraph,
}

/// Configuration for the parser behavior and options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserConfig {
    /// Whether newline-only TEXT tokens produce nodes
    pub whitespace_mode: WhitespaceMode,
    /// Shape of preserved line breaks; only read in `Preserve` mode
    pub default_line_breaks: LineBreakMode,
}

impl ParserConfig {
    pub fn preserve(default_line_breaks: LineBreakMode) -> Self {
        Self {
            whitespace_mode: WhitespaceMode::Preserve,
            default_line_breaks,
        }
    }
}
