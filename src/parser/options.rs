//! Parsing options and configuration.

/// Separator inserted between table cells that share one block.
pub const DEFAULT_CELL_SEPARATOR: &str = " | ";

/// Options for parsing markup.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Apply Unicode NFC normalization to text
    pub normalize_unicode: bool,

    /// Text inserted between table cells on the same row
    pub cell_separator: String,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable Unicode normalization.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Set the table cell separator.
    pub fn with_cell_separator(mut self, separator: impl Into<String>) -> Self {
        self.cell_separator = separator.into();
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            normalize_unicode: false,
            cell_separator: DEFAULT_CELL_SEPARATOR.to_string(),
        }
    }
}
