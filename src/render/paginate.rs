//! Rendering to a paginated drawing plan.
//!
//! Blocks are laid out top to bottom on fixed-size pages. Each page collects
//! draw operations (text, filled rectangles, rule lines) that a PDF writer
//! can replay directly. Coordinates are in points, origin at the top-left
//! corner, y growing downward. Text `y` is the baseline.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{BlockType, DocumentBlock, Rgb, TextStyle};

use super::{HelveticaMetrics, PageOptions, TextMeasure};

/// A single drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum DrawOp {
    /// Text drawn at a baseline position.
    Text {
        /// Left edge
        x: f32,
        /// Baseline
        y: f32,
        /// Text content
        text: String,
        /// Font size in points
        font_size: f32,
        /// Bold face
        bold: bool,
        /// Oblique face
        italic: bool,
        /// Fill color
        color: Rgb,
    },

    /// Filled rectangle.
    Rect {
        /// Left edge
        x: f32,
        /// Top edge
        y: f32,
        /// Width
        width: f32,
        /// Height
        height: f32,
        /// Fill color
        color: Rgb,
    },

    /// Straight stroked line.
    Line {
        /// Start x
        x1: f32,
        /// Start y
        y1: f32,
        /// End x
        x2: f32,
        /// End y
        y2: f32,
        /// Stroke width
        width: f32,
        /// Stroke color
        color: Rgb,
    },
}

impl DrawOp {
    /// Text content, for text operations.
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawOp::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// One page of draw operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanPage {
    /// Page number (1-indexed)
    pub number: usize,
    /// Operations in paint order
    pub ops: Vec<DrawOp>,
}

impl PlanPage {
    /// Create an empty page.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            ops: Vec::new(),
        }
    }

    /// Text strings drawn on this page, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops.iter().filter_map(DrawOp::text).collect()
    }
}

/// The full drawing plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePlan {
    /// Page width in points
    pub page_width: f32,
    /// Page height in points
    pub page_height: f32,
    /// Pages in order; never empty
    pub pages: Vec<PlanPage>,
}

impl PagePlan {
    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Renderer producing a [`PagePlan`].
pub struct PaginatedRenderer {
    options: PageOptions,
    measure: Box<dyn TextMeasure>,
}

impl Default for PaginatedRenderer {
    fn default() -> Self {
        Self {
            options: PageOptions::default(),
            measure: Box::new(HelveticaMetrics),
        }
    }
}

impl std::fmt::Debug for PaginatedRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedRenderer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl PaginatedRenderer {
    /// Create a renderer, validating the page geometry.
    pub fn new(options: PageOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            measure: Box::new(HelveticaMetrics),
        })
    }

    /// Replace the text measurement.
    pub fn with_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    /// Lay out blocks onto pages.
    pub fn render(&self, blocks: &[DocumentBlock]) -> PagePlan {
        let mut layout = Layout::new(&self.options, self.measure.as_ref());
        for block in blocks {
            layout.block(block);
        }
        let pages = layout.finish();

        log::debug!(
            "Laid out {} blocks on {} pages",
            blocks.len(),
            pages.len()
        );

        PagePlan {
            page_width: self.options.page_width,
            page_height: self.options.page_height,
            pages,
        }
    }
}

/// Lay out blocks with default page options and Helvetica metrics.
pub fn to_pages(blocks: &[DocumentBlock]) -> PagePlan {
    PaginatedRenderer::default().render(blocks)
}

/// A piece of a word coming from one run.
struct Piece<'a> {
    text: &'a str,
    run: usize,
}

enum Item<'a> {
    /// Pieces glued without whitespace, never broken.
    Word {
        pieces: Vec<Piece<'a>>,
        space_before: bool,
    },
    /// Hard line break.
    Break,
}

/// Split a block's runs into words and hard breaks.
fn split_items(block: &DocumentBlock) -> Vec<Item<'_>> {
    let mut items = Vec::new();
    let mut pending_space = false;

    for (run_index, run) in block.runs.iter().enumerate() {
        for (line_index, segment) in run.text.split('\n').enumerate() {
            if line_index > 0 {
                items.push(Item::Break);
                pending_space = false;
            }
            for (word_index, word) in segment.split(char::is_whitespace).enumerate() {
                if word_index > 0 {
                    pending_space = true;
                }
                if word.is_empty() {
                    continue;
                }
                let piece = Piece {
                    text: word,
                    run: run_index,
                };
                match items.last_mut() {
                    Some(Item::Word { pieces, .. }) if !pending_space => pieces.push(piece),
                    _ => {
                        let space_before = pending_space;
                        items.push(Item::Word {
                            pieces: vec![piece],
                            space_before,
                        })
                    }
                }
                pending_space = false;
            }
        }
    }
    items
}

struct Fragment<'a> {
    text: String,
    style: &'a TextStyle,
    run: usize,
    x: f32,
    width: f32,
    font_size: f32,
    bold: bool,
}

#[derive(Default)]
struct Line<'a> {
    fragments: Vec<Fragment<'a>>,
    width: f32,
}

impl Line<'_> {
    fn max_font_size(&self) -> Option<f32> {
        self.fragments
            .iter()
            .map(|f| f.font_size)
            .fold(None, |acc, size| Some(acc.map_or(size, |a: f32| a.max(size))))
    }
}

struct Layout<'a> {
    options: &'a PageOptions,
    measure: &'a dyn TextMeasure,
    pages: Vec<PlanPage>,
    current: PlanPage,
    cursor: f32,
    counter: usize,
}

impl<'a> Layout<'a> {
    fn new(options: &'a PageOptions, measure: &'a dyn TextMeasure) -> Self {
        Self {
            options,
            measure,
            pages: Vec::new(),
            current: PlanPage::new(1),
            cursor: options.top(),
            counter: 0,
        }
    }

    fn at_top(&self) -> bool {
        self.cursor <= self.options.top()
    }

    fn new_page(&mut self) {
        let number = self.current.number + 1;
        let done = std::mem::replace(&mut self.current, PlanPage::new(number));
        self.pages.push(done);
        self.cursor = self.options.top();
        log::trace!("Page break, starting page {}", number);
    }

    /// Break the page unless `height` fits below the cursor.
    fn reserve(&mut self, height: f32) {
        if self.cursor + height > self.options.bottom() && !self.at_top() {
            self.new_page();
        }
    }

    fn block(&mut self, block: &DocumentBlock) {
        let marker = match block.block_type {
            BlockType::ListBullet => {
                self.counter = 0;
                Some("\u{2022}".to_string())
            }
            BlockType::ListNumber => {
                self.counter += 1;
                Some(format!("{}.", self.counter))
            }
            _ => {
                self.counter = 0;
                None
            }
        };

        if block.is_divider() {
            self.divider();
            return;
        }

        if block.block_type.is_heading() && !self.at_top() {
            self.cursor += self.options.heading_space_before;
        }

        let margin = self.options.margin;
        let (text_x, marker_x) = if block.block_type.is_list() {
            let indent = block.indent as f32 * self.options.list_indent;
            (
                margin + indent + self.options.list_indent,
                margin + indent,
            )
        } else {
            (margin, margin)
        };
        let available = (self.options.page_width - margin - text_x).max(0.0);

        let lines = self.wrap(block, available);
        let block_size = self.options.font_size_for(block.block_type);

        for (index, line) in lines.iter().enumerate() {
            let font_size = line.max_font_size().unwrap_or(block_size).max(block_size);
            let line_height = font_size * self.options.line_height_factor;
            self.reserve(line_height);

            let top = self.cursor;
            let baseline = top + font_size;

            if index == 0 {
                if let Some(marker) = &marker {
                    self.current.ops.push(DrawOp::Text {
                        x: marker_x,
                        y: baseline,
                        text: marker.clone(),
                        font_size: block_size,
                        bold: false,
                        italic: false,
                        color: self.options.text_color,
                    });
                }
            }

            for fragment in &line.fragments {
                self.fragment(fragment, text_x, top, baseline, line_height);
            }
            self.cursor += line_height;
        }

        self.cursor += self.options.spacing_after(block.block_type);
    }

    fn fragment(&mut self, fragment: &Fragment<'_>, origin: f32, top: f32, baseline: f32, height: f32) {
        let x = origin + fragment.x;
        let style = fragment.style;

        if let Some(background) = style.background_color {
            self.current.ops.push(DrawOp::Rect {
                x,
                y: top,
                width: fragment.width,
                height,
                color: background,
            });
        }

        let color = style.color.unwrap_or(self.options.text_color);
        self.current.ops.push(DrawOp::Text {
            x,
            y: baseline,
            text: fragment.text.clone(),
            font_size: fragment.font_size,
            bold: fragment.bold,
            italic: style.italic,
            color,
        });

        if style.underline {
            let y = baseline + 1.5;
            self.current.ops.push(DrawOp::Line {
                x1: x,
                y1: y,
                x2: x + fragment.width,
                y2: y,
                width: self.options.rule_width,
                color,
            });
        }
    }

    fn divider(&mut self) {
        let gap = self.options.divider_gap;
        self.reserve(gap);
        let y = self.cursor + gap / 2.0;
        self.current.ops.push(DrawOp::Line {
            x1: self.options.margin,
            y1: y,
            x2: self.options.page_width - self.options.margin,
            y2: y,
            width: self.options.rule_width,
            color: self.options.rule_color,
        });
        self.cursor += gap;
    }

    /// Word-wrap a block into lines no wider than `available`, except for
    /// single words that do not fit on any line.
    fn wrap<'b>(&self, block: &'b DocumentBlock, available: f32) -> Vec<Line<'b>> {
        let block_size = self.options.font_size_for(block.block_type);
        let heading = block.block_type.is_heading();
        let metrics = |run: usize| {
            let style = &block.runs[run].style;
            (style.font_size.unwrap_or(block_size), heading || style.bold)
        };

        let mut lines = Vec::new();
        let mut line = Line::default();

        for item in split_items(block) {
            let (pieces, space_before) = match item {
                Item::Break => {
                    lines.push(std::mem::take(&mut line));
                    continue;
                }
                Item::Word {
                    pieces,
                    space_before,
                } => (pieces, space_before),
            };

            let widths: Vec<f32> = pieces
                .iter()
                .map(|piece| {
                    let (size, bold) = metrics(piece.run);
                    self.measure.width(piece.text, size, bold)
                })
                .collect();
            let word_width: f32 = widths.iter().sum();

            let mut space = if space_before && !line.fragments.is_empty() {
                let (size, bold) = metrics(pieces[0].run);
                self.measure.width(" ", size, bold)
            } else {
                0.0
            };

            if !line.fragments.is_empty() && line.width + space + word_width > available {
                lines.push(std::mem::take(&mut line));
                space = 0.0;
            }

            for (index, (piece, width)) in pieces.iter().zip(widths).enumerate() {
                let gap = if index == 0 { space } else { 0.0 };
                match line.fragments.last_mut() {
                    Some(last) if last.run == piece.run => {
                        if gap > 0.0 {
                            last.text.push(' ');
                        }
                        last.text.push_str(piece.text);
                        last.width += gap + width;
                    }
                    _ => {
                        let (font_size, bold) = metrics(piece.run);
                        line.fragments.push(Fragment {
                            text: piece.text.to_string(),
                            style: &block.runs[piece.run].style,
                            run: piece.run,
                            x: line.width + gap,
                            width,
                            font_size,
                            bold,
                        });
                    }
                }
                line.width += gap + width;
            }
        }

        if !line.fragments.is_empty() {
            lines.push(line);
        }
        lines
    }

    fn finish(mut self) -> Vec<PlanPage> {
        self.pages.push(self.current);
        self.pages
    }
}
