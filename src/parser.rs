// Parser module: token sequence -> document tree
mod config;
mod core;
mod utils;


pub use config::{LineBreakMode, ParserConfig, WhitespaceMode};
pub use core::Parser;

use crate::ast::Node;
use crate::lexer::Token;

/// Parse tokens using the default parser configuration.
pub fn parse(tokens: &[Token]) -> Node {
    Parser::default().parse(tokens)
}

/// Parse function with custom configuration.
pub fn parse_with_config(tokens: &[Token], config: ParserConfig) -> Node {
    Parser::new(config).parse(tokens)
}
