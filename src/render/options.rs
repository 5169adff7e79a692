//! Rendering options and configuration.

use crate::error::{Error, Result};
use crate::model::{BlockType, Rgb, TextStyle};

/// Options for the remote document service renderer.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Indentation per list nesting level, in points
    pub indent_unit_pt: f32,

    /// Character repeated to draw a divider
    pub divider_char: char,

    /// Number of divider characters
    pub divider_width: usize,

    /// Font size of the divider line, in points
    pub divider_font_size: f32,

    /// Color of the divider line
    pub divider_color: Rgb,
}

impl ServiceOptions {
    /// Create new service options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-level list indentation.
    pub fn with_indent_unit(mut self, points: f32) -> Self {
        self.indent_unit_pt = points;
        self
    }

    /// Set the divider glyph and repeat count.
    pub fn with_divider(mut self, ch: char, width: usize) -> Self {
        self.divider_char = ch;
        self.divider_width = width;
        self
    }

    /// Style applied to the divider line.
    pub fn divider_style(&self) -> TextStyle {
        TextStyle::default()
            .with_font_size(self.divider_font_size)
            .with_color(self.divider_color)
    }

    /// The divider line text, without its trailing newline.
    pub fn divider_text(&self) -> String {
        std::iter::repeat(self.divider_char)
            .take(self.divider_width)
            .collect()
    }
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            indent_unit_pt: 36.0,
            divider_char: '\u{2500}',
            divider_width: 40,
            divider_font_size: 8.0,
            divider_color: Rgb::from_u8(0x9c, 0xa3, 0xaf),
        }
    }
}

/// Options for the paginated renderer.
///
/// Coordinates are in points with the origin at the top-left corner of the
/// page and y growing downward.
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Page width in points
    pub page_width: f32,

    /// Page height in points
    pub page_height: f32,

    /// Margin on all four sides
    pub margin: f32,

    /// Line height as a multiple of the font size
    pub line_height_factor: f32,

    /// Font sizes for heading levels 1-4
    pub heading_sizes: [f32; 4],

    /// Font size for paragraphs and list items
    pub body_font_size: f32,

    /// Extra space before a heading not at the top of a page
    pub heading_space_before: f32,

    /// Space after paragraphs and headings
    pub paragraph_spacing: f32,

    /// Space after list items
    pub list_spacing: f32,

    /// Horizontal offset per list nesting level
    pub list_indent: f32,

    /// Vertical space taken by a divider
    pub divider_gap: f32,

    /// Default text color
    pub text_color: Rgb,

    /// Color of divider rules
    pub rule_color: Rgb,

    /// Stroke width of divider rules
    pub rule_width: f32,
}

impl PageOptions {
    /// Create new page options with defaults (US Letter, 54pt margins).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set the page margin.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the line height factor.
    pub fn with_line_height_factor(mut self, factor: f32) -> Self {
        self.line_height_factor = factor;
        self
    }

    /// Set the body font size.
    pub fn with_body_font_size(mut self, size: f32) -> Self {
        self.body_font_size = size;
        self
    }

    /// Font size used for a block type.
    pub fn font_size_for(&self, block_type: BlockType) -> f32 {
        match block_type.heading_level() {
            Some(level) => self.heading_sizes[(level as usize - 1).min(3)],
            None => self.body_font_size,
        }
    }

    /// Space left after a block of this type.
    pub fn spacing_after(&self, block_type: BlockType) -> f32 {
        if block_type.is_list() {
            self.list_spacing
        } else {
            self.paragraph_spacing
        }
    }

    /// Width available for text.
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Y coordinate of the top margin.
    pub fn top(&self) -> f32 {
        self.margin
    }

    /// Y coordinate of the bottom margin.
    pub fn bottom(&self) -> f32 {
        self.page_height - self.margin
    }

    /// Check that the geometry leaves room for content.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.page_width,
            self.page_height,
            self.margin,
            self.line_height_factor,
            self.body_font_size,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(Error::InvalidOptions("non-finite page geometry".into()));
        }
        if self.margin < 0.0 {
            return Err(Error::InvalidOptions(format!(
                "negative margin: {}",
                self.margin
            )));
        }
        if self.content_width() <= 0.0 || self.bottom() <= self.top() {
            return Err(Error::InvalidOptions(format!(
                "margin {} leaves no content area on a {}x{} page",
                self.margin, self.page_width, self.page_height
            )));
        }
        if self.line_height_factor <= 0.0 || self.body_font_size <= 0.0 {
            return Err(Error::InvalidOptions(
                "font size and line height must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin: 54.0,
            line_height_factor: 1.4,
            heading_sizes: [22.0, 18.0, 15.0, 13.0],
            body_font_size: 11.0,
            heading_space_before: 12.0,
            paragraph_spacing: 6.0,
            list_spacing: 2.0,
            list_indent: 18.0,
            divider_gap: 16.0,
            text_color: Rgb::from_u8(0x1f, 0x29, 0x37),
            rule_color: Rgb::from_u8(0xd1, 0xd5, 0xdb),
            rule_width: 0.75,
        }
    }
}

/// Options for the Markdown preview renderer.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Escape special Markdown characters in text
    pub escape_special_chars: bool,

    /// Marker for unordered list items
    pub list_marker: char,

    /// Emit hard line breaks for embedded newlines (otherwise a space)
    pub preserve_line_breaks: bool,
}

impl MarkdownOptions {
    /// Create new Markdown options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to escape special characters.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Set the unordered list marker.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }

    /// Set whether newlines become hard line breaks.
    pub fn with_line_breaks(mut self, preserve: bool) -> Self {
        self.preserve_line_breaks = preserve;
        self
    }
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            escape_special_chars: true,
            list_marker: '-',
            preserve_line_breaks: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_options_builder() {
        let options = MarkdownOptions::new()
            .with_escaping(false)
            .with_list_marker('*')
            .with_line_breaks(false);

        assert!(!options.escape_special_chars);
        assert_eq!(options.list_marker, '*');
        assert!(!options.preserve_line_breaks);
    }

    #[test]
    fn test_service_options_builder() {
        let options = ServiceOptions::new()
            .with_indent_unit(18.0)
            .with_divider('-', 3);

        assert_eq!(options.indent_unit_pt, 18.0);
        assert_eq!(options.divider_text(), "---");
    }

    #[test]
    fn test_divider_style() {
        let style = ServiceOptions::default().divider_style();
        assert_eq!(style.font_size, Some(8.0));
        assert!(style.color.is_some());
        assert!(!style.bold);
    }

    #[test]
    fn test_page_options_geometry() {
        let options = PageOptions::default();
        assert_eq!(options.content_width(), 504.0);
        assert_eq!(options.top(), 54.0);
        assert_eq!(options.bottom(), 738.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_font_size_lookup() {
        let options = PageOptions::default();
        assert_eq!(options.font_size_for(BlockType::Heading1), 22.0);
        assert_eq!(options.font_size_for(BlockType::Heading4), 13.0);
        assert_eq!(options.font_size_for(BlockType::ListNumber), 11.0);
        assert_eq!(options.spacing_after(BlockType::ListBullet), 2.0);
        assert_eq!(options.spacing_after(BlockType::Paragraph), 6.0);
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        assert!(PageOptions::new().with_margin(400.0).validate().is_err());
        assert!(PageOptions::new().with_margin(-1.0).validate().is_err());
        assert!(PageOptions::new()
            .with_line_height_factor(0.0)
            .validate()
            .is_err());
        assert!(PageOptions::new()
            .with_page_size(f32::NAN, 792.0)
            .validate()
            .is_err());
    }
}
