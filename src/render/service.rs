//! Rendering to remote document service mutation requests.
//!
//! All blocks are written into one text buffer that is inserted with a
//! single request. Every other request addresses ranges of that buffer, so
//! the insert must come first; paragraph and text style requests never change
//! the text length and their relative order is fixed only for determinism.
//!
//! Offsets are absolute document indices counted in UTF-16 code units.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{BlockType, DocumentBlock, Rgb, TextStyle};

use super::{JsonFormat, ServiceOptions};

/// A half-open range of document indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    /// First index covered
    pub start_index: usize,
    /// One past the last index covered
    pub end_index: usize,
}

impl Range {
    /// Create a range.
    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
        }
    }

    /// Check if two ranges share any index.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start_index < other.end_index && other.start_index < self.end_index
    }
}

/// Insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Document index
    pub index: usize,
}

/// Measurement unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    /// Typographic points
    #[serde(rename = "PT")]
    Pt,
}

/// A length with unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    /// Numeric size
    pub magnitude: f32,
    /// Unit of the magnitude
    pub unit: Unit,
}

impl Dimension {
    /// A length in points.
    pub fn pt(magnitude: f32) -> Self {
        Self {
            magnitude,
            unit: Unit::Pt,
        }
    }
}

/// Named paragraph styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamedStyleType {
    /// Level 1 heading
    #[serde(rename = "HEADING_1")]
    Heading1,
    /// Level 2 heading
    #[serde(rename = "HEADING_2")]
    Heading2,
    /// Level 3 heading
    #[serde(rename = "HEADING_3")]
    Heading3,
    /// Level 4 heading
    #[serde(rename = "HEADING_4")]
    Heading4,
}

impl NamedStyleType {
    fn for_block(block_type: BlockType) -> Option<Self> {
        match block_type {
            BlockType::Heading1 => Some(NamedStyleType::Heading1),
            BlockType::Heading2 => Some(NamedStyleType::Heading2),
            BlockType::Heading3 => Some(NamedStyleType::Heading3),
            BlockType::Heading4 => Some(NamedStyleType::Heading4),
            _ => None,
        }
    }
}

/// Bullet glyph presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulletPreset {
    /// Unordered lists
    BulletDiscCircleSquare,
    /// Ordered lists
    NumberedDecimalAlphaRoman,
}

/// Paragraph style fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    /// Named style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_style_type: Option<NamedStyleType>,
    /// Start indentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent_start: Option<Dimension>,
}

/// RGB color in the service's nesting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbColor {
    /// Red channel
    pub red: f32,
    /// Green channel
    pub green: f32,
    /// Blue channel
    pub blue: f32,
}

/// Color wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    /// The RGB value
    pub rgb_color: RgbColor,
}

/// Optional color wrapper, as used for foreground and background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionalColor {
    /// The color
    pub color: Color,
}

impl From<Rgb> for OptionalColor {
    fn from(rgb: Rgb) -> Self {
        Self {
            color: Color {
                rgb_color: RgbColor {
                    red: rgb.r,
                    green: rgb.g,
                    blue: rgb.b,
                },
            },
        }
    }
}

/// Text style fields. Only populated fields are serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTextStyle {
    /// Bold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    /// Italic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    /// Underline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    /// Font size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Dimension>,
    /// Text color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<OptionalColor>,
    /// Highlight color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<OptionalColor>,
}

impl ServiceTextStyle {
    /// Comma-joined names of the populated fields.
    pub fn fields(&self) -> String {
        let mut fields = Vec::new();
        if self.bold.is_some() {
            fields.push("bold");
        }
        if self.italic.is_some() {
            fields.push("italic");
        }
        if self.underline.is_some() {
            fields.push("underline");
        }
        if self.font_size.is_some() {
            fields.push("fontSize");
        }
        if self.foreground_color.is_some() {
            fields.push("foregroundColor");
        }
        if self.background_color.is_some() {
            fields.push("backgroundColor");
        }
        fields.join(",")
    }

    /// Check if no field is populated.
    pub fn is_empty(&self) -> bool {
        *self == ServiceTextStyle::default()
    }
}

impl From<&TextStyle> for ServiceTextStyle {
    fn from(style: &TextStyle) -> Self {
        Self {
            bold: style.bold.then_some(true),
            italic: style.italic.then_some(true),
            underline: style.underline.then_some(true),
            font_size: style.font_size.map(Dimension::pt),
            foreground_color: style.color.map(OptionalColor::from),
            background_color: style.background_color.map(OptionalColor::from),
        }
    }
}

/// A single mutation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceRequest {
    /// Insert text at a location.
    InsertText {
        /// Where to insert
        location: Location,
        /// Text to insert
        text: String,
    },

    /// Update paragraph-level style.
    #[serde(rename_all = "camelCase")]
    UpdateParagraphStyle {
        /// Affected paragraphs
        range: Range,
        /// Style values
        paragraph_style: ParagraphStyle,
        /// Field mask
        fields: String,
    },

    /// Turn paragraphs into list items.
    #[serde(rename_all = "camelCase")]
    CreateParagraphBullets {
        /// Affected paragraphs
        range: Range,
        /// Glyph preset
        bullet_preset: BulletPreset,
    },

    /// Update character-level style.
    #[serde(rename_all = "camelCase")]
    UpdateTextStyle {
        /// Affected text
        range: Range,
        /// Style values
        text_style: ServiceTextStyle,
        /// Field mask
        fields: String,
    },
}

impl ServiceRequest {
    /// The range addressed by this request, if any.
    pub fn range(&self) -> Option<Range> {
        match self {
            ServiceRequest::InsertText { .. } => None,
            ServiceRequest::UpdateParagraphStyle { range, .. }
            | ServiceRequest::CreateParagraphBullets { range, .. }
            | ServiceRequest::UpdateTextStyle { range, .. } => Some(*range),
        }
    }

    /// Request kind name, as it appears in JSON.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceRequest::InsertText { .. } => "insertText",
            ServiceRequest::UpdateParagraphStyle { .. } => "updateParagraphStyle",
            ServiceRequest::CreateParagraphBullets { .. } => "createParagraphBullets",
            ServiceRequest::UpdateTextStyle { .. } => "updateTextStyle",
        }
    }
}

/// Output of the service renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceBatch {
    /// The full inserted text
    pub text: String,
    /// Requests in the order they must be sent
    pub requests: Vec<ServiceRequest>,
}

#[derive(Serialize)]
struct RequestBody<'a> {
    requests: &'a [ServiceRequest],
}

impl ServiceBatch {
    /// Serialize as a batch update body: `{"requests": [...]}`.
    pub fn to_request_body(&self, format: JsonFormat) -> Result<String> {
        let body = RequestBody {
            requests: &self.requests,
        };
        let json = match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(&body)?,
            JsonFormat::Compact => serde_json::to_string(&body)?,
        };
        Ok(json)
    }

    /// Number of requests of one kind.
    pub fn count(&self, kind: &str) -> usize {
        self.requests.iter().filter(|r| r.kind() == kind).count()
    }
}

/// Length of a string in UTF-16 code units.
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Renderer producing service mutation requests.
#[derive(Debug, Clone, Default)]
pub struct ServiceRenderer {
    options: ServiceOptions,
}

struct ParagraphSpan {
    range: Range,
    block_type: BlockType,
    indent: u8,
}

impl ServiceRenderer {
    /// Create a renderer with the given options.
    pub fn new(options: ServiceOptions) -> Self {
        Self { options }
    }

    /// Render blocks into a text buffer and requests addressed from
    /// `start_index`.
    pub fn render(&self, blocks: &[DocumentBlock], start_index: usize) -> ServiceBatch {
        let mut text = String::new();
        let mut cursor = start_index;
        let mut paragraphs = Vec::new();
        let mut styled_runs: Vec<(Range, TextStyle)> = Vec::new();

        for block in blocks {
            let block_start = cursor;

            if block.is_divider() {
                let rule = self.options.divider_text();
                let len = utf16_len(&rule);
                text.push_str(&rule);
                if len > 0 {
                    styled_runs.push((
                        Range::new(cursor, cursor + len),
                        self.options.divider_style(),
                    ));
                }
                cursor += len;
            } else {
                for run in &block.runs {
                    let len = utf16_len(&run.text);
                    text.push_str(&run.text);
                    if len > 0 && !run.style.is_plain() {
                        styled_runs.push((Range::new(cursor, cursor + len), run.style.clone()));
                    }
                    cursor += len;
                }
            }

            text.push('\n');
            cursor += 1;

            if !block.is_divider() {
                paragraphs.push(ParagraphSpan {
                    range: Range::new(block_start, cursor),
                    block_type: block.block_type,
                    indent: block.indent,
                });
            }
        }

        let mut requests = Vec::with_capacity(1 + paragraphs.len() * 2 + styled_runs.len());
        requests.push(ServiceRequest::InsertText {
            location: Location { index: start_index },
            text: text.clone(),
        });

        for span in &paragraphs {
            self.push_paragraph_requests(&mut requests, span);
        }

        for (range, style) in &styled_runs {
            let text_style = ServiceTextStyle::from(style);
            if text_style.is_empty() {
                continue;
            }
            let fields = text_style.fields();
            requests.push(ServiceRequest::UpdateTextStyle {
                range: *range,
                text_style,
                fields,
            });
        }

        log::debug!(
            "Built {} service requests for {} blocks ({} UTF-16 units)",
            requests.len(),
            blocks.len(),
            cursor - start_index
        );

        ServiceBatch { text, requests }
    }

    fn push_paragraph_requests(&self, requests: &mut Vec<ServiceRequest>, span: &ParagraphSpan) {
        if let Some(named) = NamedStyleType::for_block(span.block_type) {
            requests.push(ServiceRequest::UpdateParagraphStyle {
                range: span.range,
                paragraph_style: ParagraphStyle {
                    named_style_type: Some(named),
                    indent_start: None,
                },
                fields: "namedStyleType".to_string(),
            });
            return;
        }

        let bullet_preset = match span.block_type {
            BlockType::ListBullet => BulletPreset::BulletDiscCircleSquare,
            BlockType::ListNumber => BulletPreset::NumberedDecimalAlphaRoman,
            _ => return,
        };
        requests.push(ServiceRequest::CreateParagraphBullets {
            range: span.range,
            bullet_preset,
        });

        if span.indent > 0 {
            requests.push(ServiceRequest::UpdateParagraphStyle {
                range: span.range,
                paragraph_style: ParagraphStyle {
                    named_style_type: None,
                    indent_start: Some(Dimension::pt(
                        span.indent as f32 * self.options.indent_unit_pt,
                    )),
                },
                fields: "indentStart".to_string(),
            });
        }
    }
}

/// Render blocks to service requests with default options.
pub fn to_service_requests(blocks: &[DocumentBlock], start_index: usize) -> ServiceBatch {
    ServiceRenderer::default().render(blocks, start_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextRun;

    #[test]
    fn test_insert_is_first_and_unique() {
        let blocks = vec![
            DocumentBlock::heading("Title", 1),
            DocumentBlock::paragraph("Body"),
        ];
        let batch = to_service_requests(&blocks, 1);

        assert_eq!(batch.text, "Title\nBody\n");
        assert_eq!(batch.count("insertText"), 1);
        assert_eq!(
            batch.requests[0],
            ServiceRequest::InsertText {
                location: Location { index: 1 },
                text: "Title\nBody\n".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_blocks_still_insert() {
        let batch = to_service_requests(&[], 5);
        assert_eq!(batch.text, "");
        assert_eq!(batch.requests.len(), 1);
    }

    #[test]
    fn test_heading_paragraph_style() {
        let batch = to_service_requests(&[DocumentBlock::heading("Hi", 3)], 1);
        assert_eq!(
            batch.requests[1],
            ServiceRequest::UpdateParagraphStyle {
                range: Range::new(1, 4),
                paragraph_style: ParagraphStyle {
                    named_style_type: Some(NamedStyleType::Heading3),
                    indent_start: None,
                },
                fields: "namedStyleType".to_string(),
            }
        );
    }

    #[test]
    fn test_list_bullets_and_indent() {
        let mut outer = DocumentBlock::list_item(true, 0);
        outer.push_run(TextRun::new("one"));
        let mut inner = DocumentBlock::list_item(false, 2);
        inner.push_run(TextRun::new("two"));

        let batch = to_service_requests(&[outer, inner], 1);
        let kinds: Vec<&str> = batch.requests.iter().map(ServiceRequest::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "insertText",
                "createParagraphBullets",
                "createParagraphBullets",
                "updateParagraphStyle",
            ]
        );
        assert_eq!(
            batch.requests[1],
            ServiceRequest::CreateParagraphBullets {
                range: Range::new(1, 5),
                bullet_preset: BulletPreset::NumberedDecimalAlphaRoman,
            }
        );
        match &batch.requests[3] {
            ServiceRequest::UpdateParagraphStyle {
                range,
                paragraph_style,
                fields,
            } => {
                assert_eq!(*range, Range::new(5, 9));
                assert_eq!(paragraph_style.indent_start, Some(Dimension::pt(72.0)));
                assert_eq!(fields, "indentStart");
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_text_style_minimal_fields() {
        let mut block = DocumentBlock::new(BlockType::Paragraph);
        block.push_run(TextRun::new("a"));
        block.push_run(TextRun::styled(
            "b",
            TextStyle {
                italic: true,
                font_size: Some(14.0),
                ..Default::default()
            },
        ));

        let batch = to_service_requests(&[block], 1);
        assert_eq!(batch.requests.len(), 2);
        match &batch.requests[1] {
            ServiceRequest::UpdateTextStyle {
                range,
                text_style,
                fields,
            } => {
                assert_eq!(*range, Range::new(2, 3));
                assert_eq!(text_style.italic, Some(true));
                assert_eq!(text_style.bold, None);
                assert_eq!(fields, "italic,fontSize");
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_divider_rule_line() {
        let blocks = vec![
            DocumentBlock::paragraph("a"),
            DocumentBlock::divider(),
            DocumentBlock::paragraph("b"),
        ];
        let batch = to_service_requests(&blocks, 1);
        let rule = "\u{2500}".repeat(40);
        assert_eq!(batch.text, format!("a\n{}\nb\n", rule));

        let styles: Vec<&ServiceRequest> = batch
            .requests
            .iter()
            .filter(|r| r.kind() == "updateTextStyle")
            .collect();
        assert_eq!(styles.len(), 1);
        assert_eq!(styles[0].range(), Some(Range::new(3, 43)));
    }

    #[test]
    fn test_utf16_offsets() {
        let mut block = DocumentBlock::new(BlockType::Paragraph);
        block.push_run(TextRun::new("\u{1F600}x"));
        block.push_run(TextRun::styled("y", TextStyle::bold()));

        let batch = to_service_requests(&[block], 1);
        // The emoji is a surrogate pair.
        assert_eq!(batch.requests[1].range(), Some(Range::new(4, 5)));
    }

    #[test]
    fn test_request_json_shape() {
        let mut block = DocumentBlock::new(BlockType::ListBullet);
        block.push_run(TextRun::styled("x", TextStyle::bold()));
        let batch = to_service_requests(&[block], 1);

        let json = batch.to_request_body(JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"requests":["#,
                r#"{"insertText":{"location":{"index":1},"text":"x\n"}},"#,
                r#"{"createParagraphBullets":{"range":{"startIndex":1,"endIndex":3},"bulletPreset":"BULLET_DISC_CIRCLE_SQUARE"}},"#,
                r#"{"updateTextStyle":{"range":{"startIndex":1,"endIndex":2},"textStyle":{"bold":true},"fields":"bold"}}"#,
                r#"]}"#
            )
        );
    }

    #[test]
    fn test_color_json_shape() {
        let style = TextStyle::default().with_color(Rgb::new(1.0, 0.0, 0.5));
        let value = serde_json::to_value(ServiceTextStyle::from(&style)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "foregroundColor": {"color": {"rgbColor": {"red": 1.0, "green": 0.0, "blue": 0.5}}}
            })
        );
    }

    #[test]
    fn test_range_overlap() {
        assert!(Range::new(1, 5).overlaps(&Range::new(4, 6)));
        assert!(!Range::new(1, 5).overlaps(&Range::new(5, 6)));
    }
}
