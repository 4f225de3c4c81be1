use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// Plain text run between two triggers.
    Text,
    /// `#` line at the start of a line, trailing whitespace trimmed.
    Header,
    /// Fenced span from an opening ```` ``` ```` through its closing fence.
    CodeBlock,
    /// Span from a `*` or `_` marker through the next occurrence of the same marker.
    Emphasis,
    /// Content the tokenizer could not classify. The parser skips it.
    Unknown,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Text => "TEXT",
            TokenKind::Header => "HEADER",
            TokenKind::CodeBlock => "CODE_BLOCK",
            TokenKind::Emphasis => "EMPHASIS",
            TokenKind::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// A resolved token.
///
/// `content` is the exact source substring, delimiters included, so the
/// contents of all tokens of a document concatenate back to its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
}

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(TokenKind::Text, content)
    }

    pub fn header(content: impl Into<String>) -> Self {
        Self::new(TokenKind::Header, content)
    }

    pub fn code_block(content: impl Into<String>) -> Self {
        Self::new(TokenKind::CodeBlock, content)
    }

    pub fn emphasis(content: impl Into<String>) -> Self {
        Self::new(TokenKind::Emphasis, content)
    }

    /// True for a TEXT token made only of line terminators.
    pub fn is_line_break_only(&self) -> bool {
        self.kind == TokenKind::Text
            && !self.content.is_empty()
            && self.content.bytes().all(|b| b == b'\n' || b == b'\r')
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.kind, self.content)
    }
}
