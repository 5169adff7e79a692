//! Block assembly from a token stream.
//!
//! A single linear scan threads three pieces of state through the tokens:
//! the open-tag stack with its parallel style frames, the list-type stack,
//! and the block currently being accumulated. Block boundaries flush the
//! current block into the output list; nothing else mutates it.

use regex::Regex;
use std::sync::OnceLock;

use crate::model::{BlockType, DocumentBlock, TextStyle};

use super::style::{extract_style_frame, merge_frames, StyleFrame};
use super::tokenizer::{Token, Tokenizer};
use super::ParseOptions;

/// How a tag affects block structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagRole {
    /// Starts a block of the given type
    Block(BlockType),
    /// `ul` / `ol`
    ListContainer { ordered: bool },
    /// `li`
    ListItem,
    /// `tr`
    TableRow,
    /// `td` / `th`
    TableCell,
    /// `table` and its row groups
    Table,
    /// Contributes style only
    Inline,
}

fn classify(tag: &str) -> TagRole {
    match tag {
        "p" => TagRole::Block(BlockType::Paragraph),
        "h1" => TagRole::Block(BlockType::heading(1)),
        "h2" => TagRole::Block(BlockType::heading(2)),
        "h3" => TagRole::Block(BlockType::heading(3)),
        "h4" | "h5" | "h6" => TagRole::Block(BlockType::heading(4)),
        "ul" => TagRole::ListContainer { ordered: false },
        "ol" => TagRole::ListContainer { ordered: true },
        "li" => TagRole::ListItem,
        "tr" => TagRole::TableRow,
        "td" | "th" => TagRole::TableCell,
        "table" | "thead" | "tbody" | "tfoot" => TagRole::Table,
        "div" | "blockquote" | "section" | "article" | "header" | "footer" | "main"
        | "aside" | "nav" | "figure" | "figcaption" | "pre" | "address" | "dl" | "dt"
        | "dd" | "body" | "html" => TagRole::Block(BlockType::Paragraph),
        _ => TagRole::Inline,
    }
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Converts markup into document blocks.
#[derive(Debug, Clone, Default)]
pub struct BlockAssembler {
    options: ParseOptions,
}

impl BlockAssembler {
    /// Create an assembler with the given options.
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Parse markup into an ordered list of blocks.
    ///
    /// Never fails: unmatched close tags are ignored and unclosed tags keep
    /// their style active until the end of input.
    pub fn parse(&self, markup: &str) -> Vec<DocumentBlock> {
        let tokens = Tokenizer::new()
            .with_normalization(self.options.normalize_unicode)
            .tokenize(markup);
        let token_count = tokens.len();

        let mut state = AssemblyState::new(&self.options.cell_separator);
        for token in tokens {
            state.process(token);
        }
        let blocks = state.finish();

        log::debug!(
            "Assembled {} blocks from {} tokens",
            blocks.len(),
            token_count
        );
        blocks
    }
}

/// Parse markup into blocks with default options.
pub fn parse_to_blocks(markup: &str) -> Vec<DocumentBlock> {
    BlockAssembler::default().parse(markup)
}

struct AssemblyState<'a> {
    cell_separator: &'a str,
    blocks: Vec<DocumentBlock>,
    current: Option<DocumentBlock>,
    open_tags: Vec<String>,
    frames: Vec<StyleFrame>,
    /// One entry per open list container, true when ordered
    lists: Vec<bool>,
}

impl<'a> AssemblyState<'a> {
    fn new(cell_separator: &'a str) -> Self {
        Self {
            cell_separator,
            blocks: Vec::new(),
            current: None,
            open_tags: Vec::new(),
            frames: Vec::new(),
            lists: Vec::new(),
        }
    }

    fn process(&mut self, token: Token) {
        match token {
            Token::Open {
                tag,
                attributes,
                self_closing,
            } => {
                self.open(&tag);
                if !self_closing {
                    let frame = extract_style_frame(&tag, &attributes);
                    self.open_tags.push(tag);
                    self.frames.push(frame);
                }
            }
            Token::Close { tag } => self.close(&tag),
            Token::Text(text) => self.text(&text),
        }
    }

    fn open(&mut self, tag: &str) {
        match tag {
            "br" => return self.line_break(),
            "hr" => {
                self.flush();
                self.blocks.push(DocumentBlock::divider());
                return;
            }
            _ => {}
        }

        match classify(tag) {
            TagRole::Block(block_type) => self.start_block(block_type),
            TagRole::ListContainer { ordered } => {
                self.flush();
                self.lists.push(ordered);
            }
            TagRole::ListItem => {
                self.flush();
                let ordered = self.lists.last().copied().unwrap_or(false);
                let depth = self.lists.len().saturating_sub(1);
                let indent = depth.min(u8::MAX as usize) as u8;
                self.current = Some(DocumentBlock::list_item(ordered, indent));
            }
            TagRole::TableRow => {
                self.flush();
                self.current = Some(DocumentBlock::new(BlockType::Paragraph));
            }
            TagRole::TableCell => {
                if let Some(block) = self.current.as_mut() {
                    if block.has_content() {
                        block.trim_end();
                        block.push_text(self.cell_separator, &TextStyle::default());
                    }
                }
            }
            TagRole::Table => self.flush(),
            TagRole::Inline => {}
        }
    }

    fn close(&mut self, tag: &str) {
        let Some(index) = self.open_tags.iter().rposition(|t| t == tag) else {
            log::trace!("Ignoring unmatched </{}>", tag);
            return;
        };
        self.open_tags.remove(index);
        self.frames.remove(index);

        match classify(tag) {
            TagRole::ListContainer { .. } => {
                self.flush();
                self.lists.pop();
            }
            TagRole::Block(_) | TagRole::ListItem | TagRole::TableRow | TagRole::Table => {
                self.flush()
            }
            TagRole::TableCell | TagRole::Inline => {}
        }
    }

    fn start_block(&mut self, block_type: BlockType) {
        // A paragraph wrapper directly inside a list item keeps the item.
        if block_type == BlockType::Paragraph {
            if let Some(current) = &self.current {
                if current.block_type.is_list() && current.is_empty() {
                    return;
                }
            }
        }
        self.flush();
        self.current = Some(DocumentBlock::new(block_type));
    }

    fn line_break(&mut self) {
        if let Some(block) = self.current.as_mut() {
            if let Some(style) = block.runs.last().map(|run| run.style.clone()) {
                block.push_text("\n", &style);
            }
        }
    }

    fn text(&mut self, raw: &str) {
        let collapsed = whitespace_regex().replace_all(raw, " ");

        let at_block_start = self.current.as_ref().map_or(true, DocumentBlock::is_empty);
        let collapsed: &str = collapsed.as_ref();
        let text = if at_block_start {
            collapsed.trim_start()
        } else if self
            .current
            .as_ref()
            .is_some_and(DocumentBlock::ends_with_whitespace)
        {
            collapsed.strip_prefix(' ').unwrap_or(collapsed)
        } else {
            collapsed
        };

        if text.is_empty() {
            return;
        }

        let style = merge_frames(&self.frames);
        self.current
            .get_or_insert_with(|| DocumentBlock::new(BlockType::Paragraph))
            .push_text(text, &style);
    }

    fn flush(&mut self) {
        if let Some(mut block) = self.current.take() {
            block.trim_end();
            if block.is_divider() || block.has_content() {
                self.blocks.push(block);
            } else {
                log::trace!("Discarding empty {:?} block", block.block_type);
            }
        }
    }

    fn finish(mut self) -> Vec<DocumentBlock> {
        self.flush();
        if !self.open_tags.is_empty() {
            log::debug!("{} tags left open at end of input", self.open_tags.len());
        }
        self.blocks
    }
}
