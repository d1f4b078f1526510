use std::collections::HashMap;
use std::path::Path;

use image::RgbaImage;
use serde::Deserialize;

use crate::color::Color;
use crate::error::EngineError;
use crate::raster;

/// Reference alphabet used to derive a uniform line height: the tallest
/// glyph among these characters sets the height applied to every line.
pub const REFERENCE_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!?0123456789/@#$%^&*()";

// ── Glyph ────────────────────────────────────────────────────────────────────

/// Metrics for a single character in the bitmap font atlas.
#[derive(Debug, Clone)]
pub struct Glyph {
    /// The Unicode character this glyph represents.
    pub id: char,
    /// Top-left pixel X of the glyph region in the atlas.
    pub x: u32,
    /// Top-left pixel Y of the glyph region in the atlas.
    pub y: u32,
    /// Pixel width of the glyph region.
    pub width: u32,
    /// Pixel height of the glyph region.
    pub height: u32,
    /// Horizontal offset applied when rendering (may be negative).
    pub x_offset: i32,
    /// Vertical offset applied when rendering (may be negative).
    pub y_offset: i32,
    /// How far to advance the cursor after drawing this glyph.
    pub x_advance: u32,
}

// ── Font ─────────────────────────────────────────────────────────────────────

/// A bitmap font: glyph metrics plus the backing atlas image.
///
/// All metrics are in the font's native pixel size; rendering and measurement
/// at another size scale uniformly by `font_size / line_height`.
pub struct Font {
    /// All glyphs in this font, keyed by character.
    pub glyphs: HashMap<char, Glyph>,
    /// Native vertical distance between successive baselines in pixels.
    pub line_height: u32,
    /// The glyph atlas. White-on-transparent; tinted at draw time.
    pub atlas: RgbaImage,
}

impl Font {
    /// Deserialise font metrics from a JSON descriptor and pair them with an
    /// already-decoded atlas image.
    pub fn from_json(json: &str, atlas: RgbaImage) -> Result<Self, EngineError> {
        let raw: RawFont = serde_json::from_str(json)?;

        let glyphs = raw
            .glyphs
            .into_iter()
            .filter_map(|g| {
                // Skip any code-point that isn't a valid Unicode scalar value.
                char::from_u32(g.id).map(|ch| {
                    (ch, Glyph {
                        id: ch,
                        x: g.x,
                        y: g.y,
                        width: g.width,
                        height: g.height,
                        x_offset: g.x_offset,
                        y_offset: g.y_offset,
                        x_advance: g.x_advance,
                    })
                })
            })
            .collect();

        Ok(Self { glyphs, line_height: raw.line_height, atlas })
    }

    /// Load a font from an atlas PNG and its JSON metrics file.
    pub fn load(atlas_path: impl AsRef<Path>, json_path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let atlas = image::open(atlas_path.as_ref())
            .map_err(|e| EngineError::ResourceLoad(format!("{}: {e}", atlas_path.as_ref().display())))?
            .to_rgba8();
        let json = std::fs::read_to_string(json_path.as_ref())?;
        Self::from_json(&json, atlas)
    }

    /// Uniform scale factor for rendering at `font_size` pixels per line.
    pub fn scale_for(&self, font_size: f32) -> f32 {
        if self.line_height == 0 {
            return 0.0;
        }
        font_size / self.line_height as f32
    }

    /// Measured width of `text` in native pixels. Characters without a glyph
    /// contribute nothing. `text` must not contain newlines; the layout
    /// engine splits paragraphs before measuring.
    pub fn measure(&self, text: &str) -> f32 {
        text.chars()
            .filter_map(|ch| self.glyphs.get(&ch))
            .map(|g| g.x_advance as f32)
            .sum()
    }

    /// Measured width of `text` rendered at `font_size`.
    pub fn measure_at(&self, text: &str, font_size: f32) -> f32 {
        self.measure(text) * self.scale_for(font_size)
    }

    /// Height of the tallest reference-alphabet glyph, in native pixels.
    /// Falls back to `line_height` for fonts missing the whole alphabet.
    pub fn reference_height(&self) -> u32 {
        REFERENCE_ALPHABET
            .chars()
            .filter_map(|ch| self.glyphs.get(&ch))
            .map(|g| g.height)
            .max()
            .unwrap_or(self.line_height)
    }

    /// Draw one line of text with its top edge at `(x, top_y)`, tinted with
    /// `color`. Characters absent from the font are silently skipped.
    pub fn render_line(
        &self,
        frame: &mut RgbaImage,
        x: f32,
        top_y: f32,
        text: &str,
        font_size: f32,
        color: Color,
    ) {
        let scale = self.scale_for(font_size);
        if scale <= 0.0 {
            return;
        }
        let mut cursor = x;
        for ch in text.chars() {
            let Some(glyph) = self.glyphs.get(&ch) else { continue };
            if glyph.width > 0 && glyph.height > 0 {
                let cell =
                    image::imageops::crop_imm(&self.atlas, glyph.x, glyph.y, glyph.width, glyph.height)
                        .to_image();
                let scaled = if (scale - 1.0).abs() < f32::EPSILON {
                    cell
                } else {
                    raster::scale(&cell, scale)
                };
                let gx = cursor + glyph.x_offset as f32 * scale;
                let gy = top_y + glyph.y_offset as f32 * scale;
                raster::blit_tinted(frame, &scaled, gx as i64, gy as i64, color);
            }
            cursor += glyph.x_advance as f32 * scale;
        }
    }
}

// ── Raw (JSON-facing) types ──────────────────────────────────────────────────
//
// Character IDs are stored as u32 in JSON (Unicode code points); we convert
// them to `char` when building the public `Font`.

#[derive(Deserialize)]
struct RawGlyph {
    /// Unicode code point (e.g. 65 for 'A').
    id: u32,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    x_offset: i32,
    y_offset: i32,
    x_advance: u32,
}

#[derive(Deserialize)]
struct RawFont {
    line_height: u32,
    glyphs: Vec<RawGlyph>,
}
