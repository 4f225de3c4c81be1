/// Lexical analysis module for tokenizing streamed Markdown input.
///
/// The `Tokenizer` accepts the document as an arbitrary sequence of chunks.
/// A construct whose extent cannot be decided from the text seen so far is
/// kept as pending content and re-scanned once the next chunk arrives, so
/// the emitted tokens never depend on where chunk boundaries fell.
///
/// ```text
/// pending + chunk ➜ scan (state machine) ➜ resolved tokens
///                        └─ undecided tail ➜ pending
/// ```
mod position;
mod token;

pub use position::Position;
pub use token::{Token, TokenKind};

use log::trace;
use memchr::{memchr, memmem};
use serde::{Deserialize, Serialize};

const FENCE: &[u8] = b"```";

/// How an emphasis marker without a closing marker is resolved at end of stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnterminatedEmphasis {
    /// Force-terminate the span at end of input and emit it as EMPHASIS.
    #[default]
    Emphasis,
    /// Emit the marker and the text after it as a TEXT token.
    Literal,
}

/// Configuration for the tokenizer component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenizerConfig {
    /// Resolution of emphasis markers that never close.
    pub unterminated_emphasis: UnterminatedEmphasis,
    /// Maximum input size in bytes, enforced by the stream and engine.
    pub max_input_size: Option<usize>,
}

/// The construct the tokenizer is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanState {
    /// Between constructs, or inside a text run whose end is not yet known.
    #[default]
    Scanning,
    /// Inside a `#` line, waiting for its newline.
    Header,
    /// Inside a fenced block, waiting for the closing fence.
    CodeBlock,
    /// Inside an emphasis span, waiting for the matching marker.
    Emphasis,
}

/// Everything the tokenizer carries between calls.
///
/// `buffer` always starts at the beginning of the unresolved construct.
/// `cursor` is the offset into `buffer` up to which the closing delimiter
/// has already been searched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerState {
    pub buffer: String,
    pub cursor: usize,
    pub state: ScanState,
    /// Whether `buffer[0]` sits at the start of a line.
    pub at_line_start: bool,
    /// Source position of `buffer[0]`.
    pub position: Position,
}

impl Default for TokenizerState {
    fn default() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            state: ScanState::Scanning,
            at_line_start: true,
            position: Position::new(),
        }
    }
}

/// Outcome of scanning one construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    /// The construct spans `pos..end`.
    Emit { kind: TokenKind, end: usize },
    /// Undecidable until more input arrives; delimiters were searched up to `searched`.
    Pending { state: ScanState, searched: usize },
}

/// Chunk-boundary tolerant Markdown tokenizer.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,
    state: TokenizerState,
}

impl Tokenizer {
    /// Creates a tokenizer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tokenizer with the given configuration.
    pub fn with_config(config: TokenizerConfig) -> Self {
        Self {
            config,
            state: TokenizerState::default(),
        }
    }

    /// Resumes tokenizing from a previously captured state.
    pub fn restore(config: TokenizerConfig, state: TokenizerState) -> Self {
        Self { config, state }
    }

    /// Captures the carried state.
    pub fn snapshot(&self) -> TokenizerState {
        self.state.clone()
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// The text held back for a construct that is not resolvable yet.
    pub fn pending(&self) -> &str {
        &self.state.buffer
    }

    pub fn scan_state(&self) -> ScanState {
        self.state.state
    }

    /// Source position of the first character not yet emitted as a token.
    pub fn position(&self) -> Position {
        self.state.position
    }

    /// Tokenizes the next chunk of the document.
    ///
    /// Returns only the tokens that are fully resolved. With `is_end` set,
    /// every pending construct is force-terminated at end of input and the
    /// tokenizer is left empty.
    pub fn tokenize(&mut self, chunk: &str, is_end: bool) -> Vec<Token> {
        let mut buffer = std::mem::take(&mut self.state.buffer);
        buffer.push_str(chunk);

        let mut tokens = Vec::new();
        let mut pos = 0;
        let mut resume = self.state.cursor;
        self.state.cursor = 0;
        self.state.state = ScanState::Scanning;

        while pos < buffer.len() {
            let line_start = if pos == 0 {
                self.state.at_line_start
            } else {
                buffer.as_bytes()[pos - 1] == b'\n'
            };

            match self.scan(&buffer, pos, line_start, pos + resume, is_end) {
                Scan::Emit { kind, end } => {
                    let content = &buffer[pos..end];
                    trace!(target: "mdflow::lexer", "emit {kind} {content:?}");
                    self.state.position.advance(content);
                    tokens.push(Token::new(kind, content));
                    pos = end;
                    resume = 0;
                }
                Scan::Pending { state, searched } => {
                    trace!(
                        target: "mdflow::lexer",
                        "holding {} bytes as pending {state:?}",
                        buffer.len() - pos
                    );
                    self.state.state = state;
                    self.state.cursor = searched - pos;
                    break;
                }
            }
        }

        if pos > 0 {
            self.state.at_line_start = buffer.as_bytes()[pos - 1] == b'\n';
            buffer.drain(..pos);
        }
        self.state.buffer = buffer;
        tokens
    }

    fn scan(&self, buffer: &str, pos: usize, line_start: bool, from: usize, is_end: bool) -> Scan {
        let bytes = buffer.as_bytes();
        match bytes[pos] {
            b'#' if line_start => scan_header(buffer, pos, from, is_end),
            b'`' => match fence_at(bytes, pos, is_end) {
                Some(true) => scan_code_block(bytes, pos, from, is_end),
                Some(false) => scan_text(bytes, pos, from, is_end),
                None => Scan::Pending {
                    state: ScanState::Scanning,
                    searched: pos,
                },
            },
            marker @ (b'*' | b'_') => self.scan_emphasis(bytes, pos, marker, from, is_end),
            _ => scan_text(bytes, pos, from, is_end),
        }
    }

    fn scan_emphasis(&self, bytes: &[u8], pos: usize, marker: u8, from: usize, is_end: bool) -> Scan {
        let search_from = from.max(pos + 1);
        if let Some(offset) = memchr(marker, &bytes[search_from..]) {
            return Scan::Emit {
                kind: TokenKind::Emphasis,
                end: search_from + offset + 1,
            };
        }

        if !is_end {
            return Scan::Pending {
                state: ScanState::Emphasis,
                searched: bytes.len(),
            };
        }

        match self.config.unterminated_emphasis {
            UnterminatedEmphasis::Emphasis => Scan::Emit {
                kind: TokenKind::Emphasis,
                end: bytes.len(),
            },
            UnterminatedEmphasis::Literal => scan_text(bytes, pos, pos + 1, true),
        }
    }
}

/// `#` line: runs to the next newline, trailing whitespace left for the next token.
fn scan_header(buffer: &str, pos: usize, from: usize, is_end: bool) -> Scan {
    let bytes = buffer.as_bytes();
    let search_from = from.max(pos + 1);
    let line_end = match memchr(b'\n', &bytes[search_from..]) {
        Some(offset) => search_from + offset,
        None if is_end => bytes.len(),
        None => {
            return Scan::Pending {
                state: ScanState::Header,
                searched: bytes.len(),
            };
        }
    };

    Scan::Emit {
        kind: TokenKind::Header,
        end: pos + buffer[pos..line_end].trim_end().len(),
    }
}

fn scan_code_block(bytes: &[u8], pos: usize, from: usize, is_end: bool) -> Scan {
    let search_from = from.max(pos + FENCE.len());
    match memmem::find(&bytes[search_from..], FENCE) {
        Some(offset) => Scan::Emit {
            kind: TokenKind::CodeBlock,
            end: search_from + offset + FENCE.len(),
        },
        None if is_end => Scan::Emit {
            kind: TokenKind::CodeBlock,
            end: bytes.len(),
        },
        // A closing fence may straddle the boundary, so re-check the last two bytes.
        None => Scan::Pending {
            state: ScanState::CodeBlock,
            searched: bytes.len().saturating_sub(2).max(pos + FENCE.len()),
        },
    }
}

/// Text run: always takes the byte at `pos`, then stops before the next trigger.
fn scan_text(bytes: &[u8], pos: usize, from: usize, is_end: bool) -> Scan {
    let mut i = from.max(pos + 1);
    while i < bytes.len() {
        match trigger_at(bytes, i, is_end) {
            Some(true) => {
                return Scan::Emit {
                    kind: TokenKind::Text,
                    end: i,
                };
            }
            Some(false) => i += 1,
            None => break,
        }
    }

    if is_end {
        Scan::Emit {
            kind: TokenKind::Text,
            end: bytes.len(),
        }
    } else {
        Scan::Pending {
            state: ScanState::Scanning,
            searched: i,
        }
    }
}

/// Whether a construct starts at `i > 0`; `None` when that depends on input not seen yet.
fn trigger_at(bytes: &[u8], i: usize, is_end: bool) -> Option<bool> {
    match bytes[i] {
        b'*' | b'_' => Some(true),
        b'#' => Some(bytes[i - 1] == b'\n'),
        b'`' => fence_at(bytes, i, is_end),
        _ => Some(false),
    }
}

fn fence_at(bytes: &[u8], i: usize, is_end: bool) -> Option<bool> {
    let available = &bytes[i..bytes.len().min(i + FENCE.len())];
    if available.iter().any(|&b| b != b'`') {
        Some(false)
    } else if available.len() == FENCE.len() {
        Some(true)
    } else if is_end {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests;
