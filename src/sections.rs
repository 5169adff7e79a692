//! Builders for sections appended after parsed content.
//!
//! These produce the same `DocumentBlock` shape as the markup parser, so
//! renderers treat generated and parsed content uniformly.

use serde::{Deserialize, Serialize};

use crate::model::{BlockType, DocumentBlock, Rgb, TextRun, TextStyle};

/// Color used for word bank terms.
pub const BRAND_COLOR: Rgb = Rgb::new(79.0 / 255.0, 70.0 / 255.0, 229.0 / 255.0);

/// Color used for instructor notes.
pub const MUTED_COLOR: Rgb = Rgb::new(107.0 / 255.0, 114.0 / 255.0, 128.0 / 255.0);

/// Heading of the word bank section.
pub const WORD_BANK_TITLE: &str = "Word Bank";

/// Heading of the instructions section.
pub const INSTRUCTIONS_TITLE: &str = "Teacher Instructions";

/// A term and its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordBankEntry {
    /// The vocabulary term
    pub term: String,
    /// Its definition
    #[serde(default)]
    pub definition: String,
}

impl WordBankEntry {
    /// Create a new entry.
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }
}

/// Build the word bank section.
///
/// Returns no blocks for an empty list. Entries with a blank term are
/// skipped.
pub fn build_word_bank_blocks(entries: &[WordBankEntry]) -> Vec<DocumentBlock> {
    let rows: Vec<DocumentBlock> = entries
        .iter()
        .filter(|entry| !entry.term.trim().is_empty())
        .map(word_bank_row)
        .collect();

    if rows.is_empty() {
        return Vec::new();
    }

    let mut blocks = Vec::with_capacity(rows.len() + 2);
    blocks.push(DocumentBlock::divider());
    blocks.push(DocumentBlock::heading(WORD_BANK_TITLE, 2));
    blocks.extend(rows);
    blocks
}

fn word_bank_row(entry: &WordBankEntry) -> DocumentBlock {
    let mut block = DocumentBlock::new(BlockType::Paragraph);
    block.push_run(TextRun::styled(
        entry.term.trim(),
        TextStyle::bold().with_color(BRAND_COLOR),
    ));

    let definition = entry.definition.trim();
    if !definition.is_empty() {
        block.push_run(TextRun::new(format!(" \u{2014} {}", definition)));
    }
    block
}

/// Build the instructor notes section.
///
/// Returns no blocks when the text is blank.
pub fn build_teacher_instructions_blocks(text: &str) -> Vec<DocumentBlock> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut body = DocumentBlock::new(BlockType::Paragraph);
    body.push_run(TextRun::styled(
        text,
        TextStyle::italic().with_color(MUTED_COLOR),
    ));

    vec![
        DocumentBlock::divider(),
        DocumentBlock::heading(INSTRUCTIONS_TITLE, 2),
        body,
    ]
}
