//! Markdown preview rendering.

use crate::model::{BlockType, DocumentBlock, TextRun, TextStyle};

use super::MarkdownOptions;

/// Convert blocks to Markdown.
pub fn to_markdown(blocks: &[DocumentBlock], options: &MarkdownOptions) -> String {
    MarkdownRenderer::new(options.clone()).render(blocks)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: MarkdownOptions,
    counters: Vec<usize>,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: MarkdownOptions) -> Self {
        Self {
            options,
            counters: Vec::new(),
        }
    }

    /// Render blocks to Markdown.
    pub fn render(mut self, blocks: &[DocumentBlock]) -> String {
        let mut output = String::new();
        let mut in_list = false;

        for block in blocks {
            let is_list = block.block_type.is_list();
            if in_list && !is_list {
                output.push('\n');
            }
            if !is_list {
                self.counters.clear();
            }
            in_list = is_list;
            self.render_block(&mut output, block);
        }

        output.trim().to_string()
    }

    fn render_block(&mut self, output: &mut String, block: &DocumentBlock) {
        match block.block_type {
            BlockType::Divider => output.push_str("---\n\n"),
            BlockType::Paragraph => {
                self.render_runs(output, &block.runs);
                output.push_str("\n\n");
            }
            BlockType::ListBullet | BlockType::ListNumber => {
                self.render_list_item(output, block);
            }
            heading => {
                let level = heading.heading_level().unwrap_or(1);
                output.push_str(&"#".repeat(level as usize));
                output.push(' ');
                self.render_runs(output, &block.runs);
                output.push_str("\n\n");
            }
        }
    }

    fn render_list_item(&mut self, output: &mut String, block: &DocumentBlock) {
        let level = block.indent as usize;
        self.counters.resize(level + 1, 0);

        let marker = if block.block_type == BlockType::ListNumber {
            self.counters[level] += 1;
            format!("{}.", self.counters[level])
        } else {
            self.counters[level] = 0;
            self.options.list_marker.to_string()
        };

        output.push_str(&"  ".repeat(level));
        output.push_str(&marker);
        output.push(' ');
        self.render_runs(output, &block.runs);
        output.push('\n');
    }

    fn render_runs(&self, output: &mut String, runs: &[TextRun]) {
        for run in runs {
            for (index, line) in run.text.split('\n').enumerate() {
                if index > 0 {
                    if self.options.preserve_line_breaks {
                        output.push_str("  \n");
                    } else {
                        output.push(' ');
                    }
                }
                self.render_text(output, line, &run.style);
            }
        }
    }

    /// Style markers hug the text; surrounding whitespace stays outside.
    fn render_text(&self, output: &mut String, text: &str, style: &TextStyle) {
        let inner = text.trim();
        if inner.is_empty() {
            output.push_str(text);
            return;
        }
        let leading = &text[..text.len() - text.trim_start().len()];
        let trailing = &text[text.trim_end().len()..];

        let inner = if self.options.escape_special_chars {
            escape_markdown(inner)
        } else {
            inner.to_string()
        };

        output.push_str(leading);
        output.push_str(&apply_text_style(&inner, style));
        output.push_str(trailing);
    }
}

fn apply_text_style(text: &str, style: &TextStyle) -> String {
    let mut result = text.to_string();

    // Apply styles (innermost first)
    if style.italic {
        result = format!("*{}*", result);
    }
    if style.bold {
        result = format!("**{}**", result);
    }
    if style.underline {
        result = format!("<u>{}</u>", result);
    }
    if style.background_color.is_some() {
        result = format!("<mark>{}</mark>", result);
    }

    result
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as Markdown syntax.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rgb;

    fn render(blocks: &[DocumentBlock]) -> String {
        to_markdown(blocks, &MarkdownOptions::default())
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("[link]"), "\\[link\\]");
    }

    #[test]
    fn test_render_heading_and_paragraph() {
        let blocks = vec![
            DocumentBlock::heading("Chapter 1", 1),
            DocumentBlock::paragraph("Hello, world!"),
            DocumentBlock::divider(),
            DocumentBlock::heading("Deep", 4),
        ];
        assert_eq!(
            render(&blocks),
            "# Chapter 1\n\nHello, world!\n\n---\n\n#### Deep"
        );
    }

    #[test]
    fn test_render_inline_styles() {
        let mut block = DocumentBlock::new(BlockType::Paragraph);
        block.push_run(TextRun::new("a "));
        block.push_run(TextRun::styled("bold ", TextStyle::bold()));
        block.push_run(TextRun::styled(
            "hi",
            TextStyle {
                background_color: Some(Rgb::from_u8(255, 241, 118)),
                italic: true,
                ..Default::default()
            },
        ));
        assert_eq!(render(&[block]), "a **bold** <mark>*hi*</mark>");
    }

    #[test]
    fn test_render_lists() {
        let item = |ordered: bool, indent: u8, text: &str| {
            let mut block = DocumentBlock::list_item(ordered, indent);
            block.push_run(TextRun::new(text));
            block
        };
        let blocks = vec![
            item(true, 0, "one"),
            item(false, 1, "nested"),
            item(true, 0, "two"),
            DocumentBlock::paragraph("after"),
        ];
        assert_eq!(render(&blocks), "1. one\n  - nested\n2. two\n\nafter");
    }

    #[test]
    fn test_line_breaks() {
        let block = DocumentBlock::paragraph("one\ntwo");
        assert_eq!(render(&[block.clone()]), "one  \ntwo");

        let options = MarkdownOptions::new().with_line_breaks(false);
        assert_eq!(to_markdown(&[block], &options), "one two");
    }
}
