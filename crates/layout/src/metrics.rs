//! Font metrics abstraction.
//!
//! Layout only needs advance widths and vertical metrics; glyph rendering is
//! the renderer's concern. The built-in metrics are deterministic per-class
//! approximations of a standard proportional face, so layout output is stable
//! without loading font files.

use quire_style::font::FontWeight;
use std::fmt::Debug;

pub trait FontMetrics: Debug + Send + Sync {
    /// Advance width of `ch` at `font_size`, in points.
    fn char_width(&self, ch: char, font_size: f32, weight: &FontWeight) -> f32;

    /// Distance from the baseline to the top of the em box at `font_size`.
    fn ascent(&self, font_size: f32) -> f32;

    /// Distance from the baseline down to the bottom of the em box at
    /// `font_size`, as a positive value.
    fn descent(&self, font_size: f32) -> f32;

    fn text_width(&self, text: &str, font_size: f32, weight: &FontWeight) -> f32 {
        text.chars()
            .map(|c| self.char_width(c, font_size, weight))
            .sum()
    }

    /// Distance from the top of a line box of `line_height` to the glyph
    /// baseline, centering the em box in the line (half-leading).
    fn baseline_in_line(&self, font_size: f32, line_height: f32) -> f32 {
        let ascent = self.ascent(font_size);
        let descent = self.descent(font_size);
        let half_leading = ((line_height - (ascent + descent)) / 2.0).max(0.0);
        half_leading + ascent
    }
}

/// Width-class table modeled on Helvetica advances.
#[derive(Debug, Clone, Default)]
pub struct BuiltinMetrics;

impl FontMetrics for BuiltinMetrics {
    fn char_width(&self, ch: char, font_size: f32, weight: &FontWeight) -> f32 {
        let em = match ch {
            ' ' => 0.278,
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.222,
            'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' | '"' | '/' => 0.333,
            'm' | 'M' | 'W' => 0.889,
            'w' => 0.722,
            'A'..='Z' => 0.667,
            '0'..='9' => 0.556,
            _ => 0.5,
        };
        let bold_factor = if weight.is_bold() { 1.08 } else { 1.0 };
        em * font_size * bold_factor
    }

    fn ascent(&self, font_size: f32) -> f32 {
        font_size * 0.718
    }

    fn descent(&self, font_size: f32) -> f32 {
        font_size * 0.207
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_scale_with_font_size() {
        let metrics = BuiltinMetrics;
        let at_10 = metrics.text_width("hello", 10.0, &FontWeight::Regular);
        let at_20 = metrics.text_width("hello", 20.0, &FontWeight::Regular);
        assert!((at_20 - at_10 * 2.0).abs() < 0.001);
    }

    #[test]
    fn baseline_centers_the_em_box_in_the_line() {
        let metrics = BuiltinMetrics;
        // At 12pt the em box spans 8.616 + 2.484 = 11.1pt; in a 14.4pt line
        // the half-leading is 1.65pt, putting the baseline at 10.266pt.
        let baseline = metrics.baseline_in_line(12.0, 14.4);
        assert!((baseline - 10.266).abs() < 0.001);
        // A line no taller than the em box puts the baseline at the ascent.
        let tight = metrics.baseline_in_line(12.0, 11.0);
        assert!((tight - metrics.ascent(12.0)).abs() < 0.001);
    }

    #[test]
    fn bold_is_wider_than_regular() {
        let metrics = BuiltinMetrics;
        let regular = metrics.text_width("word", 12.0, &FontWeight::Regular);
        let bold = metrics.text_width("word", 12.0, &FontWeight::Bold);
        assert!(bold > regular);
    }
}
