use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Represents a position in the source text.
///
/// Columns count grapheme clusters so that emoji and combining sequences
/// occupy a single column; `offset` is a byte offset into the full input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    /// Advances past `text`, updating line and column.
    pub fn advance(&mut self, text: &str) {
        for grapheme in text.graphemes(true) {
            if grapheme == "\n" || grapheme == "\r\n" {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset += text.len();
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_lines_and_graphemes() {
        let mut position = Position::new();
        position.advance("# Hi\n");
        assert_eq!((position.line, position.column, position.offset), (2, 1, 5));

        position.advance("e\u{0301}👍");
        assert_eq!(position.line, 2);
        assert_eq!(position.column, 3);
        assert_eq!(position.offset, 5 + "e\u{0301}👍".len());
    }

    #[test]
    fn crlf_counts_as_one_line_break() {
        let mut position = Position::new();
        position.advance("a\r\nb");
        assert_eq!(position.line, 2);
        assert_eq!(position.column, 2);
    }
}
