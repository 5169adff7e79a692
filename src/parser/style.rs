//! Style resolution for inline markup.
//!
//! Each open tag contributes a `StyleFrame`. Frames live on a stack parallel
//! to the open-tag stack and are folded into a `TextStyle` whenever text is
//! seen. Only a fixed set of CSS properties is recognized; anything else is
//! treated as absent.

use crate::model::{Rgb, TextStyle};
use regex::Regex;
use std::sync::OnceLock;

/// Highlight applied by `<mark>`.
const MARK_COLOR: Rgb = Rgb::new(1.0, 241.0 / 255.0, 118.0 / 255.0);

/// The style contribution of a single open tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleFrame {
    /// Sets bold
    pub bold: bool,
    /// Sets italic
    pub italic: bool,
    /// Sets underline
    pub underline: bool,
    /// Font size in points
    pub font_size: Option<f32>,
    /// Foreground color
    pub color: Option<Rgb>,
    /// Highlight color (never near-white)
    pub background_color: Option<Rgb>,
}

impl StyleFrame {
    /// Check if the frame contributes nothing.
    pub fn is_empty(&self) -> bool {
        *self == StyleFrame::default()
    }
}

/// Compute the style frame for an open tag.
pub fn extract_style_frame(tag: &str, attributes: &[(String, String)]) -> StyleFrame {
    let mut frame = StyleFrame::default();

    match tag {
        "b" | "strong" | "th" => frame.bold = true,
        "i" | "em" => frame.italic = true,
        "u" | "ins" => frame.underline = true,
        "mark" => frame.background_color = Some(MARK_COLOR),
        _ => {}
    }

    let style = attributes
        .iter()
        .find(|(name, _)| name == "style")
        .map(|(_, value)| value.as_str());

    if let Some(style) = style {
        for (property, value) in parse_declarations(style) {
            apply_declaration(&mut frame, &property, value);
        }
    }

    frame
}

fn apply_declaration(frame: &mut StyleFrame, property: &str, value: &str) {
    match property {
        "font-weight" => {
            let value = value.to_ascii_lowercase();
            let numeric_bold = value.parse::<f32>().map(|w| w >= 700.0).unwrap_or(false);
            if value == "bold" || value == "bolder" || numeric_bold {
                frame.bold = true;
            }
        }
        "font-style" => {
            if value.eq_ignore_ascii_case("italic") {
                frame.italic = true;
            }
        }
        "text-decoration" | "text-decoration-line" => {
            if value.to_ascii_lowercase().contains("underline") {
                frame.underline = true;
            }
        }
        "color" => {
            if let Some(color) = parse_color(value) {
                frame.color = Some(color);
            }
        }
        "background-color" | "background" => {
            if let Some(color) = parse_background(value) {
                frame.background_color = Some(color);
            }
        }
        "font-size" => {
            if let Some(size) = parse_font_size(value) {
                frame.font_size = Some(size);
            }
        }
        _ => {}
    }
}

/// Split an inline `style` attribute into `(property, value)` pairs.
///
/// Property names are lowercased; values are trimmed and stripped of
/// `!important`. Declarations without a colon are skipped.
pub fn parse_declarations(style: &str) -> impl Iterator<Item = (String, &str)> {
    style.split(';').filter_map(|declaration| {
        let (property, value) = declaration.split_once(':')?;
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim();
        let value = value
            .strip_suffix("!important")
            .map(str::trim_end)
            .unwrap_or(value);
        if property.is_empty() || value.is_empty() {
            None
        } else {
            Some((property, value))
        }
    })
}

/// Parse a CSS color value.
///
/// Supports `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()` and a small
/// named-color table. Alpha is ignored. Unrecognized values yield `None`.
pub fn parse_color(value: &str) -> Option<Rgb> {
    let value = value.trim().to_ascii_lowercase();

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    if let Some(args) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
    {
        return parse_rgb_function(args.strip_suffix(')')?);
    }

    named_color(&value)
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let r = channel(&hex[0..1])? * 17;
            let g = channel(&hex[1..2])? * 17;
            let b = channel(&hex[2..3])? * 17;
            Some(Rgb::from_u8(r, g, b))
        }
        6 | 8 => Some(Rgb::from_u8(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

fn parse_rgb_function(args: &str) -> Option<Rgb> {
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() < 3 {
        return None;
    }

    let channel = |s: &str| -> Option<f32> {
        let v = match s.strip_suffix('%') {
            Some(pct) => pct.parse::<f32>().ok()? / 100.0,
            None => s.parse::<f32>().ok()? / 255.0,
        };
        v.is_finite().then(|| v.clamp(0.0, 1.0))
    };

    Some(Rgb::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
    ))
}

/// Named color lookup table
fn named_color(name: &str) -> Option<Rgb> {
    let (r, g, b) = match name {
        "black" => (0x00, 0x00, 0x00),
        "white" => (0xff, 0xff, 0xff),
        "red" => (0xff, 0x00, 0x00),
        "green" => (0x00, 0x80, 0x00),
        "lime" => (0x00, 0xff, 0x00),
        "blue" => (0x00, 0x00, 0xff),
        "yellow" => (0xff, 0xff, 0x00),
        "orange" => (0xff, 0xa5, 0x00),
        "purple" => (0x80, 0x00, 0x80),
        "gray" | "grey" => (0x80, 0x80, 0x80),
        "silver" => (0xc0, 0xc0, 0xc0),
        "navy" => (0x00, 0x00, 0x80),
        "maroon" => (0x80, 0x00, 0x00),
        "olive" => (0x80, 0x80, 0x00),
        "teal" => (0x00, 0x80, 0x80),
        "cyan" | "aqua" => (0x00, 0xff, 0xff),
        "magenta" | "fuchsia" => (0xff, 0x00, 0xff),
        "pink" => (0xff, 0xc0, 0xcb),
        "brown" => (0xa5, 0x2a, 0x2a),
        _ => return None,
    };
    Some(Rgb::from_u8(r, g, b))
}

fn color_token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)#[0-9a-f]+|rgba?\([^)]*\)|[a-z]+").expect("color token pattern is valid")
    })
}

/// Parse a `background` or `background-color` value into a highlight color.
///
/// Image and gradient values are rejected, and near-white colors are
/// treated as noise rather than an intentional highlight.
pub fn parse_background(value: &str) -> Option<Rgb> {
    let lower = value.to_ascii_lowercase();
    if lower.contains("url(") || lower.contains("gradient") {
        return None;
    }

    let color = parse_color(&lower).or_else(|| {
        color_token_regex()
            .find_iter(&lower)
            .find_map(|m| parse_color(m.as_str()))
    })?;

    if color.is_near_white() {
        None
    } else {
        Some(color)
    }
}

/// Parse a CSS font size into points.
///
/// `pt` is taken as is, `px` is scaled by 0.75 and `rem` by 12. Other units
/// and non-positive values are ignored.
pub fn parse_font_size(value: &str) -> Option<f32> {
    let value = value.trim().to_ascii_lowercase();
    let (number, factor) = if let Some(n) = value.strip_suffix("pt") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("px") {
        (n, 0.75)
    } else if let Some(n) = value.strip_suffix("rem") {
        (n, 12.0)
    } else {
        return None;
    };

    let size = number.trim().parse::<f32>().ok()? * factor;
    (size.is_finite() && size > 0.0).then_some(size)
}

/// Fold a stack of frames, outermost first, into a resolved style.
///
/// Flags are set if any frame sets them. Scalar fields take the value from
/// the innermost frame that specifies them.
pub fn merge_frames<'a, I>(frames: I) -> TextStyle
where
    I: IntoIterator<Item = &'a StyleFrame>,
{
    frames
        .into_iter()
        .fold(TextStyle::default(), |mut style, frame| {
            style.bold |= frame.bold;
            style.italic |= frame.italic;
            style.underline |= frame.underline;
            if frame.font_size.is_some() {
                style.font_size = frame.font_size;
            }
            if frame.color.is_some() {
                style.color = frame.color;
            }
            if frame.background_color.is_some() {
                style.background_color = frame.background_color;
            }
            style
        })
}
