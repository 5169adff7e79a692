//! Text measurement for layout.

/// Measures the advance width of text.
pub trait TextMeasure: Send + Sync {
    /// Width of `text` in points at `font_size`.
    fn width(&self, text: &str, font_size: f32, bold: bool) -> f32;
}

/// Glyph widths of the standard Helvetica faces, in 1/1000 em.
///
/// Oblique faces share the upright widths. Characters outside printable
/// ASCII use [`HelveticaMetrics::DEFAULT_WIDTH`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

// AFM widths for code points 32..=126.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

impl HelveticaMetrics {
    /// Width used for characters without a table entry.
    pub const DEFAULT_WIDTH: u16 = 556;

    /// Width of one character in 1/1000 em.
    pub fn char_width(c: char, bold: bool) -> u16 {
        let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
        match c as u32 {
            code @ 32..=126 => table[(code - 32) as usize],
            _ => Self::DEFAULT_WIDTH,
        }
    }
}

impl TextMeasure for HelveticaMetrics {
    fn width(&self, text: &str, font_size: f32, bold: bool) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| Self::char_width(c, bold) as u32)
            .sum();
        units as f32 / 1000.0 * font_size
    }
}
