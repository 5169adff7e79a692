//! One-call conversion from markup to a chosen output format.
//!
//! Parsing, appended sections and rendering are bundled behind
//! [`ConvertOptions`], so callers that only need a string in a given format do
//! not have to wire the pipeline themselves.
//!
//! # Example
//!
//! ```
//! use richdoc::convert::{convert, ConvertOptions, OutputFormat};
//!
//! let options = ConvertOptions::new().with_format(OutputFormat::Markdown);
//! let result = convert("<h1>Title</h1><p>Body</p>", &options)?;
//! assert_eq!(result.content, "# Title\n\nBody");
//! # Ok::<(), richdoc::Error>(())
//! ```

use rayon::prelude::*;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::{Document, DocumentBlock};
use crate::parser::{BlockAssembler, ParseOptions};
use crate::render::{
    self, JsonFormat, MarkdownOptions, PageOptions, PaginatedRenderer, ServiceOptions,
    ServiceRenderer,
};
use crate::sections::{build_teacher_instructions_blocks, build_word_bank_blocks, WordBankEntry};

/// Output format for conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Remote service batch update body
    #[default]
    Requests,

    /// Paginated drawing plan as JSON
    Pages,

    /// Parsed block list as JSON
    Blocks,

    /// Markdown preview
    Markdown,

    /// Plain text
    Text,
}

impl OutputFormat {
    /// All formats.
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Requests,
        OutputFormat::Pages,
        OutputFormat::Blocks,
        OutputFormat::Markdown,
        OutputFormat::Text,
    ];

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Requests => "requests",
            OutputFormat::Pages => "pages",
            OutputFormat::Blocks => "blocks",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Text => "text",
        }
    }

    /// MIME type of the output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Requests | OutputFormat::Pages | OutputFormat::Blocks => {
                "application/json"
            }
            OutputFormat::Markdown => "text/markdown",
            OutputFormat::Text => "text/plain",
        }
    }

    /// File extension for the output, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Requests | OutputFormat::Pages | OutputFormat::Blocks => "json",
            OutputFormat::Markdown => "md",
            OutputFormat::Text => "txt",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        OutputFormat::ALL
            .into_iter()
            .find(|f| f.name() == lower || (lower == "md" && *f == OutputFormat::Markdown))
            .ok_or_else(|| Error::InvalidOptions(format!("unknown output format: {}", s)))
    }
}

/// Options for document conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Markup parsing options
    pub parse: ParseOptions,

    /// Remote service renderer options
    pub service: ServiceOptions,

    /// Paginated renderer options
    pub page: PageOptions,

    /// Markdown renderer options
    pub markdown: MarkdownOptions,

    /// Document index where the text is inserted
    pub start_index: usize,

    /// Entries for an appended word bank section
    pub word_bank: Vec<WordBankEntry>,

    /// Text of an appended instructions section
    pub instructions: Option<String>,

    /// Output format
    pub output_format: OutputFormat,

    /// JSON layout for JSON formats
    pub json_format: JsonFormat,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set service renderer options.
    pub fn with_service_options(mut self, options: ServiceOptions) -> Self {
        self.service = options;
        self
    }

    /// Set page options.
    pub fn with_page_options(mut self, options: PageOptions) -> Self {
        self.page = options;
        self
    }

    /// Set Markdown options.
    pub fn with_markdown_options(mut self, options: MarkdownOptions) -> Self {
        self.markdown = options;
        self
    }

    /// Set the insertion index.
    pub fn with_start_index(mut self, index: usize) -> Self {
        self.start_index = index;
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

    /// Set output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Parse markup and append the configured sections.
    pub fn build_blocks(&self, markup: &str) -> Vec<DocumentBlock> {
        let mut blocks = BlockAssembler::new(self.parse.clone()).parse(markup);
        blocks.extend(build_word_bank_blocks(&self.word_bank));
        if let Some(ref text) = self.instructions {
            blocks.extend(build_teacher_instructions_blocks(text));
        }
        blocks
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            service: ServiceOptions::default(),
            page: PageOptions::default(),
            markdown: MarkdownOptions::default(),
            start_index: 1,
            word_bank: Vec::new(),
            instructions: None,
            output_format: OutputFormat::default(),
            json_format: JsonFormat::default(),
        }
    }
}

/// Result of document conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Converted content
    pub content: String,

    /// Number of blocks rendered, including appended sections
    pub block_count: usize,

    /// Format of the content
    pub format: OutputFormat,
}

impl ConvertResult {
    /// MIME type of the output.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Convert markup to the format selected in `options`.
pub fn convert(markup: &str, options: &ConvertOptions) -> Result<ConvertResult> {
    let blocks = options.build_blocks(markup);
    let block_count = blocks.len();
    let format = options.output_format;

    let content = match format {
        OutputFormat::Requests => ServiceRenderer::new(options.service.clone())
            .render(&blocks, options.start_index)
            .to_request_body(options.json_format)?,
        OutputFormat::Pages => {
            let plan = PaginatedRenderer::new(options.page.clone())?.render(&blocks);
            render::to_json(&plan, options.json_format)?
        }
        OutputFormat::Blocks => {
            render::to_json(&Document::from_blocks(blocks), options.json_format)?
        }
        OutputFormat::Markdown => render::to_markdown(&blocks, &options.markdown),
        OutputFormat::Text => render::to_text(&blocks),
    };

    log::debug!(
        "Converted {} bytes of markup to {} ({} bytes)",
        markup.len(),
        format.name(),
        content.len()
    );

    Ok(ConvertResult {
        content,
        block_count,
        format,
    })
}

/// Read a markup file and convert it.
pub fn convert_file<P: AsRef<Path>>(path: P, options: &ConvertOptions) -> Result<ConvertResult> {
    let markup = std::fs::read_to_string(path)?;
    convert(&markup, options)
}

/// Convert many independent inputs in parallel.
///
/// Results are returned in input order.
pub fn convert_batch<S>(inputs: &[S], options: &ConvertOptions) -> Vec<Result<ConvertResult>>
where
    S: AsRef<str> + Sync,
{
    inputs
        .par_iter()
        .map(|markup| convert(markup.as_ref(), options))
        .collect()
}
