use log::{trace, warn};

use super::config::{LineBreakMode, ParserConfig, WhitespaceMode};
use super::utils::{FENCE, fence_body, header_prefix, line_nodes, strip_marker};
use crate::ast::Node;
use crate::ast::utils::NodeBuilder;
use crate::lexer::{Token, TokenKind};

/// Builds a document tree from a finite token sequence.
///
/// A single left-to-right pass: every token contributes zero or one node
/// to the document, so node order always follows token order. Unknown
/// token kinds are skipped rather than reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses `tokens` into a DOCUMENT node.
    pub fn parse(&self, tokens: &[Token]) -> Node {
        let children = tokens
            .iter()
            .filter_map(|token| self.parse_token(token))
            .collect();
        NodeBuilder::document(children)
    }

    fn parse_token(&self, token: &Token) -> Option<Node> {
        trace!(target: "mdflow::parser", "parse {token}");
        match token.kind {
            TokenKind::Header => Some(parse_header(&token.content)),
            TokenKind::CodeBlock => Some(parse_code_block(&token.content)),
            TokenKind::Emphasis => Some(NodeBuilder::emphasis(line_nodes(strip_marker(
                &token.content,
            )))),
            TokenKind::Text if token.is_line_break_only() => self.line_break(),
            TokenKind::Text => {
                let children = line_nodes(&token.content);
                (!children.is_empty()).then(|| NodeBuilder::paragraph(children))
            }
            TokenKind::Unknown => {
                warn!(target: "mdflow::parser", "skipping unrecognized token {token}");
                None
            }
        }
    }

    fn line_break(&self) -> Option<Node> {
        match (self.config.whitespace_mode, self.config.default_line_breaks) {
            (WhitespaceMode::Normalize, _) => None,
            (WhitespaceMode::Preserve, LineBreakMode::Structural) => {
                Some(NodeBuilder::line_break())
            }
            (WhitespaceMode::Preserve, LineBreakMode::Paragraph) => Some(
                NodeBuilder::paragraph(vec![NodeBuilder::line_break()]),
            ),
        }
    }
}

fn parse_header(content: &str) -> Node {
    let (text, level) = match header_prefix(content) {
        Ok((text, level)) => (text, level),
        Err(_) => (content, 1),
    };
    NodeBuilder::header(level, vec![NodeBuilder::text(text.trim())])
}

fn parse_code_block(content: &str) -> Node {
    let body = match fence_body(content) {
        Ok((_, body)) => body,
        Err(_) => content,
    };
    let body = body.strip_suffix(FENCE).unwrap_or(body);

    match body.split_once('\n') {
        Some((info, code)) => {
            let info = info.trim();
            let language = (!info.is_empty()).then(|| info.to_string());
            NodeBuilder::code_block(code.trim(), language)
        }
        None => NodeBuilder::code_block(body.trim(), None),
    }
}
