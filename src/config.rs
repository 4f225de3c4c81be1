/// Configuration module for the Markdown engine public API.
///
/// This module provides configuration structs and the one-shot
/// MarkdownEngine, with a builder for easy configuration.
use crate::ast::Node;
use crate::codegen::{HtmlGenerator, OutputConfig};
use crate::dom::{DomNode, Transformer};
use crate::error::{MarkdownError, Result};
use crate::lexer::{Position, Token, Tokenizer, TokenizerConfig, UnterminatedEmphasis};
use crate::parser::{LineBreakMode, Parser, ParserConfig, WhitespaceMode};
use crate::streaming::{HtmlSink, MarkdownStream};
use serde::{Deserialize, Serialize};

/// Main configuration struct for the Markdown engine.
///
/// Fixed at construction; streams built from it keep it across `reset()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tokenizer configuration
    pub tokenizer: TokenizerConfig,
    /// Parser configuration
    pub parser: ParserConfig,
    /// HTML output configuration
    pub output: OutputConfig,
}

impl EngineConfig {
    /// Creates a builder for configuring the engine.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Fails with a lexical error when `size` bytes exceed the configured limit.
    pub(crate) fn check_input_size(&self, size: usize, position: Position) -> Result<()> {
        match self.tokenizer.max_input_size {
            Some(limit) if size > limit => Err(MarkdownError::lex_error(
                position,
                format!("input of {size} bytes exceeds maximum allowed size of {limit} bytes"),
            )),
            _ => Ok(()),
        }
    }
}

/// Builder for EngineConfig to provide a fluent configuration API.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tokenizer configuration.
    pub fn tokenizer(mut self, tokenizer_config: TokenizerConfig) -> Self {
        self.config.tokenizer = tokenizer_config;
        self
    }

    /// Sets the parser configuration.
    pub fn parser(mut self, parser_config: ParserConfig) -> Self {
        self.config.parser = parser_config;
        self
    }

    /// Sets the output configuration.
    pub fn output(mut self, output_config: OutputConfig) -> Self {
        self.config.output = output_config;
        self
    }

    /// Sets how newline-only text is treated.
    pub fn whitespace_mode(mut self, mode: WhitespaceMode) -> Self {
        self.config.parser.whitespace_mode = mode;
        self
    }

    /// Sets the node shape of preserved line breaks.
    pub fn default_line_breaks(mut self, mode: LineBreakMode) -> Self {
        self.config.parser.default_line_breaks = mode;
        self
    }

    /// Sets the policy for emphasis markers that never close.
    pub fn unterminated_emphasis(mut self, policy: UnterminatedEmphasis) -> Self {
        self.config.tokenizer.unterminated_emphasis = policy;
        self
    }

    /// Sets the maximum accepted input size in bytes.
    pub fn max_input_size(mut self, limit: Option<usize>) -> Self {
        self.config.tokenizer.max_input_size = limit;
        self
    }

    /// Enables or disables XHTML-style self-closing tags.
    pub fn xhtml_style(mut self, enabled: bool) -> Self {
        self.config.output.xhtml_style = enabled;
        self
    }

    /// Builds the final configuration.
    pub fn build(self) -> EngineConfig {
        self.config
    }
}

/// Main Markdown engine for whole-document conversion.
///
/// Every stage can be run on its own, and `stream` builds an incremental
/// [`MarkdownStream`] sharing the engine's configuration.
///
/// # Examples
///
/// ```
/// use mdflow::{EngineConfig, MarkdownEngine, WhitespaceMode};
///
/// let engine = MarkdownEngine::new();
/// let html = engine.parse_to_html("# Hello, World!").unwrap();
/// assert_eq!(
///     html,
///     "<div class=\"markdown-content\"><h1><span>Hello, World!</span></h1></div>"
/// );
///
/// let engine = MarkdownEngine::with_config(
///     EngineConfig::builder()
///         .whitespace_mode(WhitespaceMode::Preserve)
///         .xhtml_style(false)
///         .build(),
/// );
/// let html = engine.parse_to_html("# A\n*b*").unwrap();
/// assert!(html.contains("<br>"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarkdownEngine {
    config: EngineConfig,
}

impl MarkdownEngine {
    /// Creates a new Markdown engine with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new Markdown engine with custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tokenizes a complete document.
    pub fn tokenize(&self, markdown: &str) -> Result<Vec<Token>> {
        self.config.check_input_size(markdown.len(), Position::new())?;
        Ok(Tokenizer::with_config(self.config.tokenizer.clone()).tokenize(markdown, true))
    }

    /// Parses a complete document into its tree.
    pub fn parse_to_ast(&self, markdown: &str) -> Result<Node> {
        let tokens = self.tokenize(markdown)?;
        Ok(Parser::new(self.config.parser).parse(&tokens))
    }

    /// Transforms a document tree into its DOM.
    pub fn ast_to_dom(&self, document: &Node) -> Result<DomNode> {
        Transformer::new().transform(document)
    }

    /// Generates HTML from a DOM node.
    pub fn dom_to_html(&self, dom: &DomNode) -> String {
        HtmlGenerator::new(self.config.output.clone()).render(dom)
    }

    /// Runs the whole pipeline over a complete document.
    pub fn parse_to_html(&self, markdown: &str) -> Result<String> {
        let document = self.parse_to_ast(markdown)?;
        let dom = self.ast_to_dom(&document)?;
        Ok(self.dom_to_html(&dom))
    }

    /// Creates an incremental stream delivering HTML to `sink`.
    pub fn stream<S: HtmlSink>(&self, sink: S) -> MarkdownStream<S> {
        MarkdownStream::with_config(self.config.clone(), sink)
    }
}
