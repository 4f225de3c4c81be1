/// Error handling module for the streaming Markdown pipeline.
///
/// Unterminated constructs and unrecognized tokens are not errors: the
/// tokenizer force-terminates the former at end of stream and the parser
/// skips the latter. What remains here are failures that make the current
/// document unrecoverable, plus misuse of the stream lifecycle.
use crate::lexer::Position;
use thiserror::Error;

/// Main error type for the Markdown pipeline.
#[derive(Debug, Error)]
pub enum MarkdownError {
    /// Lexical errors (input limits hit while tokenizing).
    #[error("Lexical error at line {}, column {}: {message}", position.line, position.column)]
    Lex { position: Position, message: String },

    /// The transformer received a tree it cannot project onto HTML.
    #[error("Transform error: {message}")]
    Transform { message: String },

    /// HTML generation errors.
    #[error("Generation error: {message}")]
    Generation { message: String },

    /// The stream was used outside of its `write`/`end`/`reset` lifecycle.
    #[error("Stream error: {message}")]
    Stream { message: String },

    /// I/O related errors.
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// UTF-8 encoding errors.
    #[error("UTF-8 encoding error: {source}")]
    Utf8 {
        #[from]
        source: std::str::Utf8Error,
    },
}

/// Convenience type alias for Results in the Markdown pipeline.
pub type Result<T> = std::result::Result<T, MarkdownError>;

impl MarkdownError {
    /// Creates a new lexical error with position information.
    pub fn lex_error(position: Position, message: impl Into<String>) -> Self {
        MarkdownError::Lex {
            position,
            message: message.into(),
        }
    }

    /// Creates a new transform error.
    pub fn transform_error(message: impl Into<String>) -> Self {
        MarkdownError::Transform {
            message: message.into(),
        }
    }

    /// Creates a new generation error.
    pub fn generation_error(message: impl Into<String>) -> Self {
        MarkdownError::Generation {
            message: message.into(),
        }
    }

    /// Creates a new stream lifecycle error.
    pub fn stream_error(message: impl Into<String>) -> Self {
        MarkdownError::Stream {
            message: message.into(),
        }
    }

    /// Returns the position associated with this error, if any.
    pub fn position(&self) -> Option<Position> {
        match self {
            MarkdownError::Lex { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Returns true if the error invalidates the document being processed.
    ///
    /// Lifecycle errors only reject the offending call; everything else halts
    /// the stream until `reset()`.
    pub fn is_document_fatal(&self) -> bool {
        match self {
            MarkdownError::Lex { .. } => true,
            MarkdownError::Transform { .. } => true,
            MarkdownError::Generation { .. } => true,
            MarkdownError::Stream { .. } => false,
            MarkdownError::Io { .. } => true,
            MarkdownError::Utf8 { .. } => true,
        }
    }
}
