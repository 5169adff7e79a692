//! Block-level types.

use super::{TextRun, TextStyle};
use serde::{Deserialize, Serialize};

/// Structural kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    /// Top-level heading
    Heading1,
    /// Second-level heading
    Heading2,
    /// Third-level heading
    Heading3,
    /// Fourth-level heading (also used for h5/h6)
    Heading4,
    /// Body paragraph
    Paragraph,
    /// Unordered list item
    ListBullet,
    /// Ordered list item
    ListNumber,
    /// Horizontal rule, carries no runs
    Divider,
}

impl BlockType {
    /// Map a heading level to a block type. Levels past 4 collapse to 4.
    pub fn heading(level: u8) -> Self {
        match level {
            0 | 1 => BlockType::Heading1,
            2 => BlockType::Heading2,
            3 => BlockType::Heading3,
            _ => BlockType::Heading4,
        }
    }

    /// Heading level (1-4) or None.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            BlockType::Heading1 => Some(1),
            BlockType::Heading2 => Some(2),
            BlockType::Heading3 => Some(3),
            BlockType::Heading4 => Some(4),
            _ => None,
        }
    }

    /// Check if this is a heading type.
    pub fn is_heading(&self) -> bool {
        self.heading_level().is_some()
    }

    /// Check if this is a list item type.
    pub fn is_list(&self) -> bool {
        matches!(self, BlockType::ListBullet | BlockType::ListNumber)
    }
}

/// One structural unit of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentBlock {
    /// Block kind
    #[serde(rename = "type")]
    pub block_type: BlockType,

    /// Styled text runs in source order
    pub runs: Vec<TextRun>,

    /// List nesting depth (0 for non-list blocks)
    pub indent: u8,
}

impl DocumentBlock {
    /// Create an empty block.
    pub fn new(block_type: BlockType) -> Self {
        Self {
            block_type,
            runs: Vec::new(),
            indent: 0,
        }
    }

    /// Create an empty list item block at the given depth.
    pub fn list_item(ordered: bool, indent: u8) -> Self {
        let block_type = if ordered {
            BlockType::ListNumber
        } else {
            BlockType::ListBullet
        };
        Self {
            block_type,
            runs: Vec::new(),
            indent,
        }
    }

    /// Create a divider block.
    pub fn divider() -> Self {
        Self::new(BlockType::Divider)
    }

    /// Create a paragraph with plain text.
    pub fn paragraph(text: impl Into<String>) -> Self {
        let mut block = Self::new(BlockType::Paragraph);
        block.push_text(&text.into(), &TextStyle::default());
        block
    }

    /// Create a heading with plain text.
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        let mut block = Self::new(BlockType::heading(level));
        block.push_text(&text.into(), &TextStyle::default());
        block
    }

    /// Append text, extending the last run when its style matches.
    ///
    /// Empty text is ignored, so runs are never empty.
    pub fn push_text(&mut self, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.style == *style => last.text.push_str(text),
            _ => self.runs.push(TextRun::styled(text, style.clone())),
        }
    }

    /// Append a whole run with the same coalescing rule as `push_text`.
    pub fn push_run(&mut self, run: TextRun) {
        self.push_text(&run.text, &run.style);
    }

    /// Check if any run carries non-whitespace text.
    pub fn has_content(&self) -> bool {
        self.runs.iter().any(TextRun::has_content)
    }

    /// Check if the block has no runs at all.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Check if this is a divider.
    pub fn is_divider(&self) -> bool {
        self.block_type == BlockType::Divider
    }

    /// Check if the accumulated text ends in whitespace.
    pub fn ends_with_whitespace(&self) -> bool {
        self.runs
            .last()
            .and_then(|run| run.text.chars().last())
            .map(char::is_whitespace)
            .unwrap_or(false)
    }

    /// Trim trailing whitespace, dropping runs that become empty.
    pub fn trim_end(&mut self) {
        while let Some(last) = self.runs.last_mut() {
            let trimmed_len = last.text.trim_end().len();
            last.text.truncate(trimmed_len);
            if last.text.is_empty() {
                self.runs.pop();
            } else {
                break;
            }
        }
    }

    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_text_coalesces_equal_styles() {
        let mut block = DocumentBlock::new(BlockType::Paragraph);
        block.push_text("Hello ", &TextStyle::default());
        block.push_text("world", &TextStyle::default());
        block.push_text("!", &TextStyle::bold());
        block.push_text("?", &TextStyle::bold());

        assert_eq!(block.runs.len(), 2);
        assert_eq!(block.runs[0].text, "Hello world");
        assert_eq!(block.runs[1].text, "!?");
    }

    #[test]
    fn test_push_text_ignores_empty() {
        let mut block = DocumentBlock::new(BlockType::Paragraph);
        block.push_text("", &TextStyle::bold());
        assert!(block.is_empty());
    }

    #[test]
    fn test_trim_end_drops_blank_runs() {
        let mut block = DocumentBlock::new(BlockType::Paragraph);
        block.push_text("a ", &TextStyle::default());
        block.push_text(" \n", &TextStyle::bold());
        block.trim_end();

        assert_eq!(block.runs.len(), 1);
        assert_eq!(block.plain_text(), "a");
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(BlockType::heading(1), BlockType::Heading1);
        assert_eq!(BlockType::heading(6), BlockType::Heading4);
        assert_eq!(BlockType::Heading3.heading_level(), Some(3));
        assert!(!BlockType::Paragraph.is_heading());
        assert!(BlockType::ListNumber.is_list());
    }

    #[test]
    fn test_block_type_serialization() {
        let json = serde_json::to_string(&BlockType::ListBullet).unwrap();
        assert_eq!(json, "\"list-bullet\"");
        let json = serde_json::to_string(&BlockType::Heading2).unwrap();
        assert_eq!(json, "\"heading2\"");
    }
}
