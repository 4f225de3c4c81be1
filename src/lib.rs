// Core modules
pub mod ast;
pub mod codegen;
pub mod dom;
pub mod error;
pub mod lexer;
pub mod parser;

// Re-export key types for public API
pub use ast::{Node, NodeMetadata, NodeType};
pub use codegen::{HtmlGenerator, HtmlWriter, OutputConfig, OutputConfigBuilder, escape_html};
pub use dom::{DomNode, Transformer};
pub use error::{MarkdownError, Result};
pub use lexer::{
    Position, ScanState, Token, TokenKind, Tokenizer, TokenizerConfig, TokenizerState,
    UnterminatedEmphasis,
};
pub use parser::{LineBreakMode, Parser, ParserConfig, WhitespaceMode};

// Public API configuration structs
pub use config::{EngineConfig, EngineConfigBuilder, MarkdownEngine};

// Streaming API exports
pub use streaming::{DEFAULT_CHUNK_SIZE, HtmlSink, MarkdownStream, StreamEvent};

// Configuration module for public API
pub mod config;

// Incremental conversion
pub mod streaming;

/// Converts a Markdown string to an HTML string.
///
/// Runs the complete pipeline with default configuration:
/// 1. **Tokenizing:** split the input into typed tokens
/// 2. **Parsing:** build the document tree from the tokens
/// 3. **Transforming:** project the tree onto DOM nodes
/// 4. **Rendering:** serialize the DOM to escaped HTML
///
/// # Examples
///
/// ```
/// use mdflow::to_html;
///
/// let html = to_html("# Hello, World!");
/// assert_eq!(html, "<div class=\"markdown-content\"><h1><span>Hello, World!</span></h1></div>");
/// ```
pub fn to_html(markdown: &str) -> String {
    let root = parse_to_ast(markdown);
    let dom = dom::from_ast(&root).unwrap_or_else(|_| {
        // Fallback to empty root on transformation error
        dom::DomNode::new("div").with_attribute("class", dom::ROOT_CLASS)
    });
    codegen::generate_html(&dom)
}

/// Tokenize a complete Markdown document.
pub fn tokenize(markdown: &str) -> Vec<Token> {
    Tokenizer::new().tokenize(markdown, true)
}

/// Parse Markdown text into its document tree.
pub fn parse_to_ast(markdown: &str) -> Node {
    parser::parse(&tokenize(markdown))
}

/// Convert a document tree to a DOM representation.
///
/// Fails when `ast` is not a well-formed document.
pub fn ast_to_dom(ast: &Node) -> Result<DomNode> {
    dom::from_ast(ast)
}

/// Generate HTML from a DOM representation.
pub fn dom_to_html(dom: &DomNode) -> String {
    codegen::generate_html(dom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let markdown = "# Hello, World!";
        let expected_html =
            "<div class=\"markdown-content\"><h1><span>Hello, World!</span></h1></div>";
        assert_eq!(to_html(markdown), expected_html);
    }

    #[test]
    fn test_stage_functions_compose() {
        let markdown = "Intro *with emphasis*\n```sh\necho hi\n```";

        let tokens = tokenize(markdown);
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Text,
                TokenKind::Emphasis,
                TokenKind::Text,
                TokenKind::CodeBlock
            ]
        );

        let ast = parse_to_ast(markdown);
        let dom = ast_to_dom(&ast).expect("document transforms");
        assert_eq!(dom_to_html(&dom), to_html(markdown));
        assert_eq!(
            to_html(markdown),
            "<div class=\"markdown-content\"><p><span>Intro</span></p><em><span>with emphasis</span></em><pre><code class=\"language-sh\">echo hi</code></pre></div>"
        );
    }

    #[test]
    fn test_content_is_escaped() {
        let html = to_html("a < b & \"c\"\n*'x'*");
        assert_eq!(
            html,
            "<div class=\"markdown-content\"><p><span>a &lt; b &amp; &quot;c&quot;</span></p><em><span>&#039;x&#039;</span></em></div>"
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert_eq!(to_html(""), "<div class=\"markdown-content\"></div>");
    }

    #[test]
    fn test_engine_matches_free_functions() {
        let markdown = "## Sub\n_under_ text";
        let engine = MarkdownEngine::new();
        assert_eq!(engine.parse_to_html(markdown).expect("converts"), to_html(markdown));
    }
}
