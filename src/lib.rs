//! # richdoc
//!
//! Rich-text markup conversion for Rust.
//!
//! This library parses tagged markup fragments with inline style
//! declarations into a normalized block/run document model, then renders
//! that model as index-addressed mutation requests for a remote structured
//! document service or as a paginated, fixed-page-size drawing plan.
//!
//! ## Quick Start
//!
//! ```
//! use richdoc::{parse_markup, to_pages, to_service_requests};
//!
//! let blocks = parse_markup("<h1>Title</h1><p>Hello <mark>world</mark></p>");
//!
//! // Requests for a document whose body starts at index 1
//! let batch = to_service_requests(&blocks, 1);
//! assert_eq!(batch.text, "Title\nHello world\n");
//!
//! // Drawing plan for letter-size pages
//! let plan = to_pages(&blocks);
//! assert_eq!(plan.page_count(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`parser`]: tokenizer, style resolution and block assembly
//! - [`model`]: blocks, runs and resolved styles
//! - [`sections`]: generated word bank and instructions sections
//! - [`render`]: service requests, page plans, Markdown, text and JSON
//! - [`convert`]: one-call conversion and parallel batches

pub mod convert;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod sections;

// Re-export commonly used types
pub use convert::{convert, convert_batch, ConvertOptions, ConvertResult, OutputFormat};
pub use error::{Error, Result};
pub use model::{BlockType, Document, DocumentBlock, Rgb, TextRun, TextStyle};
pub use parser::{BlockAssembler, ParseOptions};
pub use render::{
    JsonFormat, MarkdownOptions, PageOptions, PagePlan, PaginatedRenderer, ServiceBatch,
    ServiceOptions, ServiceRenderer,
};
pub use sections::{build_teacher_instructions_blocks, build_word_bank_blocks, WordBankEntry};

use std::path::Path;

/// Parse markup into blocks with default options.
///
/// Parsing never fails: unknown tags contribute nothing, unmatched closing
/// tags are ignored and malformed style values are skipped.
///
/// # Example
///
/// ```
/// use richdoc::{parse_markup, BlockType};
///
/// let blocks = parse_markup("<ul><li>one</li><li>two</li></ul>");
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[0].block_type, BlockType::ListBullet);
/// ```
pub fn parse_markup(markup: &str) -> Vec<DocumentBlock> {
    parser::parse_to_blocks(markup)
}

/// Read a markup file and parse it.
///
/// # Example
///
/// ```no_run
/// use richdoc::parse_file;
///
/// let blocks = parse_file("worksheet.html")?;
/// println!("Blocks: {}", blocks.len());
/// # Ok::<(), richdoc::Error>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<DocumentBlock>> {
    let markup = std::fs::read_to_string(path)?;
    Ok(parse_markup(&markup))
}

/// Read a markup file asynchronously and parse it.
#[cfg(feature = "async")]
pub async fn parse_file_async<P: AsRef<Path>>(path: P) -> Result<Vec<DocumentBlock>> {
    let markup = tokio::fs::read_to_string(path).await?;
    Ok(parse_markup(&markup))
}

/// Render blocks to remote service requests addressed from `start_index`.
///
/// # Example
///
/// ```
/// use richdoc::{parse_markup, to_service_requests};
///
/// let batch = to_service_requests(&parse_markup("<p>Hi</p>"), 1);
/// assert_eq!(batch.requests.len(), 1);
/// ```
pub fn to_service_requests(blocks: &[DocumentBlock], start_index: usize) -> ServiceBatch {
    render::to_service_requests(blocks, start_index)
}

/// Lay out blocks on letter-size pages with 54pt margins.
pub fn to_pages(blocks: &[DocumentBlock]) -> PagePlan {
    render::to_pages(blocks)
}

/// Builder for parsing markup and rendering it with appended sections.
///
/// # Example
///
/// ```
/// use richdoc::{Richdoc, WordBankEntry};
///
/// let result = Richdoc::new()
///     .with_word_bank(vec![WordBankEntry::new("cell", "basic unit of life")])
///     .with_instructions("Pair students before reading.")
///     .parse("<h2>Cells</h2><p>All living things are made of cells.</p>");
///
/// let batch = result.to_service_requests(1);
/// assert!(batch.text.contains("Word Bank"));
/// let plan = result.to_pages()?;
/// assert!(plan.page_count() >= 1);
/// # Ok::<(), richdoc::Error>(())
/// ```
pub struct Richdoc {
    parse_options: ParseOptions,
    service_options: ServiceOptions,
    page_options: PageOptions,
    markdown_options: MarkdownOptions,
    word_bank: Vec<WordBankEntry>,
    instructions: Option<String>,
}

impl Richdoc {
    /// Create a new Richdoc builder.
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions::default(),
            service_options: ServiceOptions::default(),
            page_options: PageOptions::default(),
            markdown_options: MarkdownOptions::default(),
            word_bank: Vec::new(),
            instructions: None,
        }
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Enable NFC normalization of text.
    pub fn normalized(mut self) -> Self {
        self.parse_options = self.parse_options.with_normalization(true);
        self
    }

    /// Set service renderer options.
    pub fn with_service_options(mut self, options: ServiceOptions) -> Self {
        self.service_options = options;
        self
    }

    /// Set page options.
    pub fn with_page_options(mut self, options: PageOptions) -> Self {
        self.page_options = options;
        self
    }

    /// Set Markdown options.
    pub fn with_markdown_options(mut self, options: MarkdownOptions) -> Self {
        self.markdown_options = options;
        self
    }

    /// Append a word bank section.
    pub fn with_word_bank(mut self, entries: Vec<WordBankEntry>) -> Self {
        self.word_bank = entries;
        self
    }

    /// Append an instructions section.
    pub fn with_instructions(mut self, text: impl Into<String>) -> Self {
        self.instructions = Some(text.into());
        self
    }

    /// Parse markup and return a result wrapper.
    pub fn parse(self, markup: &str) -> RichdocResult {
        let mut document =
            Document::from_blocks(BlockAssembler::new(self.parse_options).parse(markup));
        document.extend(build_word_bank_blocks(&self.word_bank));
        if let Some(ref text) = self.instructions {
            document.extend(build_teacher_instructions_blocks(text));
        }
        RichdocResult {
            document,
            service_options: self.service_options,
            page_options: self.page_options,
            markdown_options: self.markdown_options,
        }
    }

    /// Read and parse a markup file.
    pub fn parse_file<P: AsRef<Path>>(self, path: P) -> Result<RichdocResult> {
        let markup = std::fs::read_to_string(path)?;
        Ok(self.parse(&markup))
    }
}

impl Default for Richdoc {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing markup.
pub struct RichdocResult {
    /// The parsed document, including appended sections
    pub document: Document,
    service_options: ServiceOptions,
    page_options: PageOptions,
    markdown_options: MarkdownOptions,
}

impl RichdocResult {
    /// Render remote service requests addressed from `start_index`.
    pub fn to_service_requests(&self, start_index: usize) -> ServiceBatch {
        ServiceRenderer::new(self.service_options.clone()).render(&self.document.blocks, start_index)
    }

    /// Lay out the document on pages.
    pub fn to_pages(&self) -> Result<PagePlan> {
        let renderer = PaginatedRenderer::new(self.page_options.clone())?;
        Ok(renderer.render(&self.document.blocks))
    }

    /// Convert to Markdown.
    pub fn to_markdown(&self) -> String {
        render::to_markdown(&self.document.blocks, &self.markdown_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document.blocks)
    }

    /// Convert the block list to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get the parsed blocks.
    pub fn blocks(&self) -> &[DocumentBlock] {
        &self.document.blocks
    }
}
