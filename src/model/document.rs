//! Document-level types.

use super::{BlockType, DocumentBlock};
use serde::{Deserialize, Serialize};

/// An ordered list of blocks produced by one conversion call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Blocks in source order
    pub blocks: Vec<DocumentBlock>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Wrap an existing block list.
    pub fn from_blocks(blocks: Vec<DocumentBlock>) -> Self {
        Self { blocks }
    }

    /// Add a block to the document.
    pub fn add_block(&mut self, block: DocumentBlock) {
        self.blocks.push(block);
    }

    /// Append blocks, e.g. the output of a section builder.
    pub fn extend(&mut self, blocks: impl IntoIterator<Item = DocumentBlock>) {
        self.blocks.extend(blocks);
    }

    /// Get the number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the document has any blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Count blocks of one type.
    pub fn count(&self, block_type: BlockType) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.block_type == block_type)
            .count()
    }

    /// Get plain text content of the entire document, one block per line.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter(|b| !b.is_divider())
            .map(DocumentBlock::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Vec<DocumentBlock>> for Document {
    fn from(blocks: Vec<DocumentBlock>) -> Self {
        Self::from_blocks(blocks)
    }
}
