use crate::ast::Node;
use crate::error::{MarkdownError, Result};
use std::collections::BTreeMap;

/// Class carried by the root element of every rendered document.
pub const ROOT_CLASS: &str = "markdown-content";

/// Represents a node in the Document Object Model (DOM).
/// This is a generic, intermediate representation that decouples the AST
/// from the final output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomNode {
    pub tag_name: String,
    /// Ordered by name so serialization is deterministic.
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<DomNode>,
    pub text: Option<String>,
    pub self_closing: bool,
}

impl DomNode {
    /// Creates a new DOM node with a given tag name (e.g., "h1", "p").
    pub fn new(tag_name: impl Into<String>) -> Self {
        DomNode {
            tag_name: tag_name.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
            self_closing: false,
        }
    }

    /// Element with no content and no closing tag.
    pub fn void(tag_name: impl Into<String>) -> Self {
        DomNode {
            self_closing: true,
            ..DomNode::new(tag_name)
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_children(mut self, children: Vec<DomNode>) -> Self {
        self.children = children;
        self
    }
}

/// Projects a document tree onto HTML-shaped DOM nodes.
///
/// | AST node     | DOM                               |
/// |--------------|-----------------------------------|
/// | `Document`   | `div.markdown-content`            |
/// | `Paragraph`  | `p`                               |
/// | `Text`       | `span` with the text as content   |
/// | `Header`     | `h{level}`                        |
/// | `CodeBlock`  | `pre > code[.language-X]`         |
/// | `Emphasis`   | `em`                              |
/// | `LineBreak`  | self-closing `br`                 |
#[derive(Debug, Clone, Copy, Default)]
pub struct Transformer;

impl Transformer {
    pub fn new() -> Self {
        Self
    }

    /// Transforms a DOCUMENT node. Any other root, a nested document, or a
    /// level-zero header is rejected as an impossible tree.
    pub fn transform(&self, root: &Node) -> Result<DomNode> {
        match root {
            Node::Document { children } => Ok(DomNode::new("div")
                .with_attribute("class", ROOT_CLASS)
                .with_children(self.transform_children(children)?)),
            other => Err(MarkdownError::transform_error(format!(
                "expected a document root, found {}",
                other.node_type()
            ))),
        }
    }

    fn transform_children(&self, children: &[Node]) -> Result<Vec<DomNode>> {
        children.iter().map(|child| self.transform_node(child)).collect()
    }

    fn transform_node(&self, node: &Node) -> Result<DomNode> {
        let dom = match node {
            Node::Document { .. } => {
                return Err(MarkdownError::transform_error(
                    "document node nested inside a document",
                ));
            }
            Node::Paragraph { children } => {
                DomNode::new("p").with_children(self.transform_children(children)?)
            }
            Node::Text { value } => DomNode::new("span").with_text(value.as_str()),
            Node::Header { level: 0, .. } => {
                return Err(MarkdownError::transform_error("header level must be at least 1"));
            }
            Node::Header { level, children } => {
                DomNode::new(format!("h{level}")).with_children(self.transform_children(children)?)
            }
            Node::CodeBlock { value, language } => {
                let mut code = DomNode::new("code").with_text(value.as_str());
                if let Some(language) = language {
                    code = code.with_attribute("class", format!("language-{language}"));
                }
                DomNode::new("pre").with_children(vec![code])
            }
            Node::Emphasis { children } => {
                DomNode::new("em").with_children(self.transform_children(children)?)
            }
            Node::LineBreak => DomNode::void("br"),
        };
        Ok(dom)
    }
}

/// Converts an Abstract Syntax Tree (AST) into a Document Object Model (DOM).
pub fn from_ast(ast_root: &Node) -> Result<DomNode> {
    Transformer::new().transform(ast_root)
}
