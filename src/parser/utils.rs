use nom::IResult;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::space0;
use nom::combinator::rest;
use nom::sequence::{preceded, tuple};

use crate::ast::Node;
use crate::ast::utils::NodeBuilder;

pub(super) const FENCE: &str = "```";

/// Splits `content` into trimmed, non-blank lines joined by line breaks.
pub(super) fn line_nodes(content: &str) -> Vec<Node> {
    NodeBuilder::lines(
        content
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty()),
    )
}

/// `#` run and the whitespace after it; yields the level and the heading text.
pub(super) fn header_prefix(input: &str) -> IResult<&str, usize> {
    let (remaining, (hashes, _)) = tuple((take_while1(|c: char| c == '#'), space0))(input)?;
    Ok((remaining, hashes.len()))
}

/// Body of a fenced span with the opening fence removed.
pub(super) fn fence_body(input: &str) -> IResult<&str, &str> {
    preceded(tag(FENCE), rest)(input)
}

/// Removes one leading marker and one trailing marker matching it.
pub(super) fn strip_marker(content: &str) -> &str {
    let mut chars = content.chars();
    match chars.next() {
        Some(marker) => {
            let inner = chars.as_str();
            inner.strip_suffix(marker).unwrap_or(inner)
        }
        None => content,
    }
}
