//! Plain text rendering.

use crate::model::DocumentBlock;

/// Convert blocks to plain text, one block per line.
///
/// Dividers become an empty line. List items are prefixed with two spaces
/// per nesting level.
pub fn to_text(blocks: &[DocumentBlock]) -> String {
    let lines: Vec<String> = blocks
        .iter()
        .map(|block| {
            if block.is_divider() {
                String::new()
            } else if block.block_type.is_list() {
                format!("{}{}", "  ".repeat(block.indent as usize), block.plain_text())
            } else {
                block.plain_text()
            }
        })
        .collect();

    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextRun;

    #[test]
    fn test_to_text() {
        let mut item = DocumentBlock::list_item(false, 1);
        item.push_run(TextRun::new("nested"));
        let blocks = vec![
            DocumentBlock::paragraph("Hello, world!"),
            DocumentBlock::divider(),
            DocumentBlock::paragraph("Second paragraph."),
            item,
        ];

        let result = to_text(&blocks);
        assert_eq!(result, "Hello, world!\n\nSecond paragraph.\n  nested");
    }

    #[test]
    fn test_to_text_empty() {
        assert_eq!(to_text(&[]), "");
    }
}
