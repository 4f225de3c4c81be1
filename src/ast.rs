use serde::{Deserialize, Serialize};
use std::fmt;

/// Document tree produced by the parser.
///
/// Each variant carries exactly the fields its kind may have: only
/// containers hold `children`, only `Text` and `CodeBlock` hold a `value`,
/// and `LineBreak` holds nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Root of a parsed document.
    Document { children: Vec<Node> },
    /// Run of text lines separated by line breaks.
    Paragraph { children: Vec<Node> },
    /// Leaf text.
    Text { value: String },
    /// `#` heading; `level` is the length of the leading `#` run.
    Header { level: usize, children: Vec<Node> },
    /// Fenced code with the optional language from its first line.
    CodeBlock {
        value: String,
        language: Option<String>,
    },
    /// Emphasized run of text lines.
    Emphasis { children: Vec<Node> },
    /// Line break between two lines of text.
    LineBreak,
}

/// Discriminant of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Document,
    Paragraph,
    Text,
    Header,
    CodeBlock,
    Emphasis,
    LineBreak,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Document => "document",
            NodeType::Paragraph => "paragraph",
            NodeType::Text => "text",
            NodeType::Header => "header",
            NodeType::CodeBlock => "code_block",
            NodeType::Emphasis => "emphasis",
            NodeType::LineBreak => "linebreak",
        };
        f.write_str(name)
    }
}

/// Kind-specific metadata: `level` on headers, `language` on code blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMetadata<'a> {
    pub level: Option<usize>,
    pub language: Option<&'a str>,
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Document { .. } => NodeType::Document,
            Node::Paragraph { .. } => NodeType::Paragraph,
            Node::Text { .. } => NodeType::Text,
            Node::Header { .. } => NodeType::Header,
            Node::CodeBlock { .. } => NodeType::CodeBlock,
            Node::Emphasis { .. } => NodeType::Emphasis,
            Node::LineBreak => NodeType::LineBreak,
        }
    }

    /// Leaf content of `Text` and `CodeBlock` nodes.
    pub fn value(&self) -> Option<&str> {
        match self {
            Node::Text { value } | Node::CodeBlock { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Children of container nodes, in document order.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Document { children }
            | Node::Paragraph { children }
            | Node::Header { children, .. }
            | Node::Emphasis { children } => Some(children),
            _ => None,
        }
    }

    /// Metadata for `Header` and `CodeBlock` nodes.
    pub fn metadata(&self) -> Option<NodeMetadata<'_>> {
        match self {
            Node::Header { level, .. } => Some(NodeMetadata {
                level: Some(*level),
                language: None,
            }),
            Node::CodeBlock { language, .. } => Some(NodeMetadata {
                level: None,
                language: language.as_deref(),
            }),
            _ => None,
        }
    }
}

pub mod utils {
    use super::*;

    /// Node creation helper functions
    pub struct NodeBuilder;

    impl NodeBuilder {
        pub fn document(children: Vec<Node>) -> Node {
            Node::Document { children }
        }

        pub fn paragraph(children: Vec<Node>) -> Node {
            Node::Paragraph { children }
        }

        pub fn text(value: impl Into<String>) -> Node {
            Node::Text {
                value: value.into(),
            }
        }

        pub fn header(level: usize, children: Vec<Node>) -> Node {
            Node::Header { level, children }
        }

        pub fn code_block(value: impl Into<String>, language: Option<String>) -> Node {
            Node::CodeBlock {
                value: value.into(),
                language,
            }
        }

        pub fn emphasis(children: Vec<Node>) -> Node {
            Node::Emphasis { children }
        }

        pub fn line_break() -> Node {
            Node::LineBreak
        }

        /// Text nodes for each line, with a line break before every line but the first.
        pub fn lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Node> {
            let mut nodes = Vec::new();
            for (index, line) in lines.into_iter().enumerate() {
                if index > 0 {
                    nodes.push(Self::line_break());
                }
                nodes.push(Self::text(line));
            }
            nodes
        }
    }
}
