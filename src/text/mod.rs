//! Text layout: greedy word-wrap plus the retained [`TextLabel`] drawable.
//!
//! Wrapping measures the *candidate full line* (existing content + space +
//! next word) rather than summing independent word widths — under a real
//! metrics backend the width of concatenated text is not generally the sum
//! of its parts.

pub mod font;

use std::str::FromStr;
use std::sync::Arc;

use image::RgbaImage;

use crate::color::Color;
use crate::drawable::Body;
use crate::error::EngineError;
use crate::geometry::Rect;
use crate::raster;

pub use font::{Font, Glyph, REFERENCE_ALPHABET};

// ── Alignment ────────────────────────────────────────────────────────────────

/// Horizontal placement of each wrapped line within the label's width.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for Align {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Align::Left),
            "center" => Ok(Align::Center),
            "right" => Ok(Align::Right),
            other => Err(EngineError::validation(format!(
                "alignment must be \"left\", \"right\", or \"center\": got \"{other}\""
            ))),
        }
    }
}

// ── Word wrap ────────────────────────────────────────────────────────────────

/// Greedily wrap `text` into lines no wider than `max_width` under `measure`.
///
/// Newlines always force a line break; paragraphs wrap independently. Words
/// are joined by single spaces. A single word wider than `max_width` is
/// committed alone on its own line — there is no hyphenation, so such lines
/// overflow the declared width. Always yields at least one (possibly empty)
/// line.
pub fn wrap_lines(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut total_lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();

        for word in paragraph.split(' ') {
            let candidate_width = if line.is_empty() {
                measure(word)
            } else {
                measure(&format!("{line} {word}"))
            };

            if candidate_width > max_width {
                if line.is_empty() {
                    // A lone word wider than the wrap width gets its own line.
                    total_lines.push(word.to_string());
                    continue;
                }
                total_lines.push(std::mem::take(&mut line));
            }

            if line.is_empty() {
                line.push_str(word);
            } else {
                line.push(' ');
                line.push_str(word);
            }
        }

        total_lines.push(line);
    }

    total_lines
}

// ── TextLabel ────────────────────────────────────────────────────────────────

/// A wrapped, baseline-positioned text label.
///
/// `(x, y)` is the baseline origin of the first line. Wrapped lines are
/// recomputed whenever the text, wrap width, font, or font size changes;
/// alignment only affects per-line x placement at draw time.
pub struct TextLabel {
    pub body: Body,
    font: Arc<Font>,
    font_size: f32,
    wrap_width: f32,
    text: String,
    color: Color,
    align: Align,
    line_spacing: f32,
    lines: Vec<String>,
}

impl TextLabel {
    pub fn new(
        font: Arc<Font>,
        font_size: f32,
        x: f32,
        y: f32,
        wrap_width: f32,
    ) -> Result<Self, EngineError> {
        validate_font_size(font_size)?;
        if !x.is_finite() || !y.is_finite() {
            return Err(EngineError::validation("label position must be finite"));
        }
        if !wrap_width.is_finite() {
            return Err(EngineError::validation("label wrap width must be finite"));
        }
        let mut label = Self {
            body: Body::at(x, y),
            font,
            font_size,
            wrap_width,
            text: String::new(),
            color: Color::BLACK,
            align: Align::Left,
            line_spacing: 1.2,
            lines: Vec::new(),
        };
        label.reflow();
        Ok(label)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    // ── Mutators (each names the derived state it refreshes) ─────────────

    /// Replace the label text and rewrap.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.reflow();
    }

    /// Change the wrap width and rewrap.
    pub fn set_wrap_width(&mut self, width: f32) -> Result<(), EngineError> {
        if !width.is_finite() {
            return Err(EngineError::validation("label wrap width must be finite"));
        }
        self.wrap_width = width;
        self.reflow();
        Ok(())
    }

    /// Swap the font and rewrap; line height follows the new font's metrics.
    pub fn set_font(&mut self, font: Arc<Font>) {
        self.font = font;
        self.reflow();
    }

    /// Change the font size and rewrap.
    pub fn set_font_size(&mut self, size: f32) -> Result<(), EngineError> {
        validate_font_size(size)?;
        self.font_size = size;
        self.reflow();
        Ok(())
    }

    pub fn set_line_spacing(&mut self, spacing: f32) -> Result<(), EngineError> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(EngineError::validation(format!(
                "line spacing must be a positive number (got {spacing})"
            )));
        }
        self.line_spacing = spacing;
        Ok(())
    }

    pub fn set_align(&mut self, align: Align) {
        self.align = align;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn reflow(&mut self) {
        let font = Arc::clone(&self.font);
        let size = self.font_size;
        self.lines = wrap_lines(&self.text, self.wrap_width, |s| font.measure_at(s, size));
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn text(&self) -> &str { &self.text }
    pub fn lines(&self) -> &[String] { &self.lines }
    pub fn font(&self) -> &Arc<Font> { &self.font }
    pub fn font_size(&self) -> f32 { self.font_size }
    pub fn wrap_width(&self) -> f32 { self.wrap_width }
    pub fn align(&self) -> Align { self.align }
    pub fn color(&self) -> Color { self.color }
    pub fn line_spacing(&self) -> f32 { self.line_spacing }

    /// Uniform per-line advance in pixels: the tallest reference-alphabet
    /// glyph at the current size, times the line-spacing multiplier.
    pub fn line_height(&self) -> f32 {
        self.font.reference_height() as f32 * self.font.scale_for(self.font_size) * self.line_spacing
    }

    /// Distance from the first baseline up to the top of the bounding rect.
    fn ascent(&self) -> f32 {
        self.font.reference_height() as f32 * self.font.scale_for(self.font_size)
    }

    pub fn width(&self) -> f32 { self.wrap_width }

    pub fn height(&self) -> f32 {
        self.line_height() * self.lines.len() as f32
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.body.pos.x, self.body.pos.y - self.ascent(), self.width(), self.height())
    }

    /// X offset of one line under the current alignment.
    fn line_x(&self, line: &str) -> f32 {
        let line_width = self.font.measure_at(line, self.font_size);
        let x = self.body.pos.x;
        match self.align {
            Align::Left => x,
            Align::Right => (x + self.wrap_width) - line_width,
            Align::Center => x + self.wrap_width / 2.0 - line_width / 2.0,
        }
    }

    pub(crate) fn draw(&self, frame: &mut RgbaImage) {
        if self.body.visible {
            let ascent = self.ascent();
            let mut baseline = self.body.pos.y;
            for line in &self.lines {
                let x = self.line_x(line);
                self.font
                    .render_line(frame, x, baseline - ascent, line, self.font_size, self.color);
                if self.body.show_bounds && !self.text.is_empty() {
                    raster::hline(
                        frame,
                        self.body.pos.x,
                        self.body.pos.x + self.wrap_width,
                        baseline,
                        self.body.bounds_color,
                    );
                }
                baseline += self.line_height();
            }
        }

        if self.body.show_bounds && !self.text.is_empty() {
            raster::stroke_rect(frame, self.rect(), self.body.bounds_color, 2);
        }
    }
}

fn validate_font_size(size: f32) -> Result<(), EngineError> {
    if !size.is_finite() || size <= 0.0 {
        return Err(EngineError::validation(format!(
            "font size must be a positive number (got {size})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-width measure: 10px per character, spaces included.
    fn per_char(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    #[test]
    fn empty_text_yields_one_empty_line() {
        assert_eq!(wrap_lines("", 100.0, per_char), vec![String::new()]);
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_lines("hello", 100.0, per_char), vec!["hello"]);
    }

    #[test]
    fn wraps_before_exceeding_width() {
        // "aaa bbb" measures 70 ≤ 80, "aaa bbb ccc" measures 110 > 80.
        let lines = wrap_lines("aaa bbb ccc", 80.0, per_char);
        assert_eq!(lines, vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn every_line_fits_when_no_word_is_too_wide() {
        let text = "the quick brown fox jumps over the lazy dog again and again";
        for width in [50.0, 90.0, 150.0, 400.0] {
            for line in wrap_lines(text, width, per_char) {
                assert!(per_char(&line) <= width, "line {line:?} exceeds {width}");
            }
        }
    }

    #[test]
    fn newline_always_forces_a_break() {
        let lines = wrap_lines("ab\ncd", 1000.0, per_char);
        assert_eq!(lines, vec!["ab", "cd"]);
    }

    #[test]
    fn trailing_newline_yields_trailing_empty_line() {
        let lines = wrap_lines("ab\n", 1000.0, per_char);
        assert_eq!(lines, vec!["ab", ""]);
    }

    #[test]
    fn overwide_word_gets_its_own_line_unsplit() {
        let lines = wrap_lines("hi incomprehensibilities yo", 60.0, per_char);
        assert_eq!(lines, vec!["hi", "incomprehensibilities", "yo"]);
    }

    #[test]
    fn overwide_word_at_start_is_not_split() {
        let lines = wrap_lines("incomprehensibilities hi", 60.0, per_char);
        assert_eq!(lines, vec!["incomprehensibilities", "hi"]);
    }

    #[test]
    fn candidate_line_measurement_drives_the_split() {
        // Widths mimic a metrics backend where concatenation is not additive:
        // "The quick" fits at 95px but "The quick brown" overshoots at 130px.
        let measure = |s: &str| match s {
            "The" => 40.0,
            "The quick" => 95.0,
            "The quick brown" => 130.0,
            "brown" => 55.0,
            "brown fox" => 92.0,
            other => other.chars().count() as f32 * 10.0,
        };
        let lines = wrap_lines("The quick brown fox", 100.0, measure);
        assert_eq!(lines, vec!["The quick", "brown fox"]);
    }

    #[test]
    fn align_parses_case_insensitively() {
        assert_eq!("LEFT".parse::<Align>().unwrap(), Align::Left);
        assert_eq!("Center".parse::<Align>().unwrap(), Align::Center);
        assert_eq!("right".parse::<Align>().unwrap(), Align::Right);
        assert!("middle".parse::<Align>().is_err());
    }
}
