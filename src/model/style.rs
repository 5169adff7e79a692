//! Run-level style types.

use serde::{Deserialize, Serialize};

/// An RGB color with channels in the 0.0–1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Rgb {
    /// Black.
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    /// White.
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    /// Create a color from 0.0–1.0 channels. Values are not clamped.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// True when every channel is above 0.95.
    ///
    /// Such backgrounds are indistinguishable from the page and are never
    /// treated as highlights.
    pub fn is_near_white(&self) -> bool {
        self.r > 0.95 && self.g > 0.95 && self.b > 0.95
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

/// Fully resolved text styling.
///
/// Unset scalar fields mean "renderer default". This is the only style
/// representation renderers consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,

    /// Italic text
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,

    /// Underlined text
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,

    /// Font size in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,

    /// Foreground color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,

    /// Highlight color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Rgb>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl TextStyle {
    /// Bold style.
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Default::default()
        }
    }

    /// Italic style.
    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Default::default()
        }
    }

    /// Check that no field is set.
    pub fn is_plain(&self) -> bool {
        *self == TextStyle::default()
    }

    /// Set the foreground color.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the font size in points.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content, never empty inside a finished block
    pub text: String,

    /// Text styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a text run with the given style.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Check if this run carries visible text.
    pub fn has_content(&self) -> bool {
        self.text.chars().any(|c| !c.is_whitespace())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_white() {
        assert!(Rgb::WHITE.is_near_white());
        assert!(Rgb::from_u8(250, 250, 250).is_near_white());
        assert!(!Rgb::from_u8(255, 241, 118).is_near_white());
        assert!(!Rgb::BLACK.is_near_white());
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Rgb::from_u8(0x4f, 0x46, 0xe5).to_hex(), "#4f46e5");
        assert_eq!(Rgb::WHITE.to_hex(), "#ffffff");
    }

    #[test]
    fn test_text_style_plain() {
        assert!(TextStyle::default().is_plain());
        assert!(!TextStyle::bold().is_plain());
        assert!(!TextStyle::default().with_font_size(14.0).is_plain());
    }

    #[test]
    fn test_style_serialization_skips_defaults() {
        let json = serde_json::to_string(&TextStyle::italic()).unwrap();
        assert_eq!(json, r#"{"italic":true}"#);
    }

    #[test]
    fn test_run_has_content() {
        assert!(TextRun::new("a ").has_content());
        assert!(!TextRun::new(" \n").has_content());
    }
}
