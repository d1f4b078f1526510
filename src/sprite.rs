//! Animated sprites: an ordered sequence of image cells, a per-cell display
//! time policy, and a memoized scale/flip/rotate transform cache.

use std::path::Path;

use glam::Vec2;
use image::RgbaImage;

use crate::drawable::Body;
use crate::error::EngineError;
use crate::geometry::Rect;
use crate::raster;
use crate::sheet::{ImageSheet, SheetMeta};

// ── AnimationRate ────────────────────────────────────────────────────────────

/// How quickly an animated sprite advances through its cells.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum AnimationRate {
    /// One cell per rendered frame, regardless of frame duration.
    #[default]
    PerFrame,
    /// Animation is frozen on the current cell.
    Frozen,
    /// N cells per second, accumulated across frames.
    PerSecond(f32),
}

impl AnimationRate {
    /// Build a rate from a cells-per-second value: `0` freezes the
    /// animation, positive values advance that many cells per second, and
    /// negative or non-finite values are rejected.
    pub fn from_cells_per_second(rate: f32) -> Result<Self, EngineError> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(EngineError::validation(format!(
                "animation rate must be >= 0 cells per second (got {rate})"
            )));
        }
        if rate == 0.0 {
            Ok(AnimationRate::Frozen)
        } else {
            Ok(AnimationRate::PerSecond(rate))
        }
    }
}

// ── Sprite ───────────────────────────────────────────────────────────────────

/// A persistent image on screen, possibly animated from a sprite sheet.
///
/// The transformed-cell cache is parallel to the raw cells and is invalidated
/// wholesale whenever scale, flip, or angle changes — any cell may become
/// current later, so partial invalidation would leave stale entries.
pub struct Sprite {
    pub body: Body,
    /// Originating file path, if this sprite was loaded from disk. Used to
    /// detect redundant `set_image` calls.
    descriptor: Option<String>,
    cells: Vec<RgbaImage>,
    transformed: Vec<Option<RgbaImage>>,
    current_index: usize,
    /// Milliseconds accumulated toward the next cell advance.
    elapsed_in_cell: f32,
    rate: AnimationRate,
    scale: f32,
    flip_x: bool,
    flip_y: bool,
    angle: f32,
}

impl Sprite {
    /// Load a sprite from an image file at position `(x, y)`.
    ///
    /// If a sidecar metadata file (`<stem>.json` with `rows`/`cols`) sits
    /// next to the image, the image is sliced into an animated cell grid;
    /// otherwise it is a single-cell static sprite.
    pub fn from_file(path: impl AsRef<Path>, x: f32, y: f32) -> Result<Self, EngineError> {
        let cells = load_cells(path.as_ref())?;
        let descriptor = Some(path.as_ref().to_string_lossy().into_owned());
        Self::from_parts(cells, descriptor, x, y)
    }

    /// Build a sprite from in-memory cells. Primarily for callers that
    /// generate pixel data rather than loading it from disk.
    pub fn from_cells(cells: Vec<RgbaImage>, x: f32, y: f32) -> Result<Self, EngineError> {
        Self::from_parts(cells, None, x, y)
    }

    fn from_parts(
        cells: Vec<RgbaImage>,
        descriptor: Option<String>,
        x: f32,
        y: f32,
    ) -> Result<Self, EngineError> {
        if cells.is_empty() {
            return Err(EngineError::validation("sprite requires at least one cell"));
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(EngineError::validation("sprite position must be finite"));
        }
        let transformed = vec![None; cells.len()];
        Ok(Self {
            body: Body::at(x, y),
            descriptor,
            cells,
            transformed,
            current_index: 0,
            elapsed_in_cell: 0.0,
            rate: AnimationRate::default(),
            scale: 1.0,
            flip_x: false,
            flip_y: false,
            angle: 0.0,
        })
    }

    // ── Image ────────────────────────────────────────────────────────────

    pub fn image(&self) -> Option<&str> {
        self.descriptor.as_deref()
    }

    /// Swap the sprite's image, resetting the animation to the first cell.
    ///
    /// Setting the descriptor the sprite already shows is a no-op, so a
    /// per-frame `set_image` call cannot pin an animation to its first
    /// cell. The configured animation rate is preserved. The on-screen
    /// center is preserved across differently-sized images.
    pub fn set_image(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = path.as_ref();
        let descriptor = path.to_string_lossy().into_owned();
        if self.descriptor.as_deref() == Some(descriptor.as_str()) {
            return Ok(());
        }
        let cells = load_cells(path)?;
        self.replace_cells(cells, Some(descriptor));
        Ok(())
    }

    /// Reload the current image from disk even if the descriptor is
    /// unchanged, discarding any pixel edits and restarting the animation.
    pub fn reset_image(&mut self) -> Result<(), EngineError> {
        let Some(descriptor) = self.descriptor.clone() else {
            return Err(EngineError::validation(
                "cannot reset a sprite built from in-memory cells",
            ));
        };
        let cells = load_cells(Path::new(&descriptor))?;
        self.replace_cells(cells, Some(descriptor));
        Ok(())
    }

    fn replace_cells(&mut self, cells: Vec<RgbaImage>, descriptor: Option<String>) {
        let old_center = self.center();
        self.transformed = vec![None; cells.len()];
        self.cells = cells;
        self.descriptor = descriptor;
        self.current_index = 0;
        self.elapsed_in_cell = 0.0;
        self.set_center(old_center);
    }

    // ── Animation ────────────────────────────────────────────────────────

    pub fn animation_rate(&self) -> AnimationRate {
        self.rate
    }

    /// Change the animation rate. Resets the cell timing accumulator so the
    /// current cell gets a full display period under the new rate.
    pub fn set_animation_rate(&mut self, rate: AnimationRate) -> Result<(), EngineError> {
        if let AnimationRate::PerSecond(r) = rate {
            if !r.is_finite() || r <= 0.0 {
                return Err(EngineError::validation(format!(
                    "animation rate must be positive (got {r})"
                )));
            }
        }
        self.rate = rate;
        self.elapsed_in_cell = 0.0;
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn current_cell_index(&self) -> usize {
        self.current_index
    }

    /// Advance the animation by `dt_ms` milliseconds of frame time.
    pub(crate) fn advance_animation(&mut self, dt_ms: f32) {
        match self.rate {
            AnimationRate::Frozen => {}
            AnimationRate::PerFrame => {
                if self.cells.len() > 1 {
                    self.current_index = (self.current_index + 1) % self.cells.len();
                }
            }
            AnimationRate::PerSecond(rate) => {
                self.elapsed_in_cell += dt_ms;
                let time_per_cell = 1000.0 / rate;
                if self.elapsed_in_cell >= time_per_cell {
                    let advance = (self.elapsed_in_cell / time_per_cell) as usize;
                    self.elapsed_in_cell -= advance as f32 * time_per_cell;
                    self.current_index = (self.current_index + advance) % self.cells.len();
                }
            }
        }
    }

    // ── Transform parameters ─────────────────────────────────────────────

    pub fn scale(&self) -> f32 { self.scale }
    pub fn angle(&self) -> f32 { self.angle }
    pub fn flip_x(&self) -> bool { self.flip_x }
    pub fn flip_y(&self) -> bool { self.flip_y }

    /// Set the uniform scale factor, keeping the on-screen center fixed.
    ///
    /// Rejected if the *un-transformed* current cell would shrink below one
    /// pixel in either dimension; sprite state is unchanged on failure.
    pub fn set_scale(&mut self, scale: f32) -> Result<(), EngineError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(EngineError::validation(format!(
                "scale must be a positive number (got {scale})"
            )));
        }
        let (w, h) = self.cells[self.current_index].dimensions();
        let (sw, sh) = raster::scaled_size(w, h, scale);
        if sw < 1 || sh < 1 {
            return Err(EngineError::validation(format!(
                "at scale {scale} the sprite image falls below 1 pixel ({w}x{h} cell)"
            )));
        }

        let old_center = self.center();
        self.scale = scale;
        self.invalidate_transformed_cells();
        self.set_center(old_center);
        Ok(())
    }

    /// Set the rotation angle in degrees (counter-clockwise), keeping the
    /// on-screen center fixed.
    pub fn set_angle(&mut self, angle: f32) -> Result<(), EngineError> {
        if !angle.is_finite() {
            return Err(EngineError::validation("angle must be finite"));
        }
        let old_center = self.center();
        self.angle = angle;
        self.invalidate_transformed_cells();
        self.set_center(old_center);
        Ok(())
    }

    pub fn set_flip_x(&mut self, flipped: bool) {
        if self.flip_x == flipped {
            return;
        }
        self.flip_x = flipped;
        self.invalidate_transformed_cells();
    }

    pub fn set_flip_y(&mut self, flipped: bool) {
        if self.flip_y == flipped {
            return;
        }
        self.flip_y = flipped;
        self.invalidate_transformed_cells();
    }

    /// Drop every cached transformed cell. Called whenever a parameter that
    /// feeds `transform_cell` changes; any cell may become current later, so
    /// the whole cache goes, not just the current entry.
    fn invalidate_transformed_cells(&mut self) {
        for slot in &mut self.transformed {
            *slot = None;
        }
    }

    fn transform_cell(cell: &RgbaImage, scale: f32, flip_x: bool, flip_y: bool, angle: f32) -> RgbaImage {
        // Fixed order: scale, then flip, then rotate.
        let mut out = if scale != 1.0 {
            raster::scale(cell, scale)
        } else {
            cell.clone()
        };
        if flip_x || flip_y {
            out = raster::flip(&out, flip_x, flip_y);
        }
        if angle.rem_euclid(360.0) != 0.0 {
            out = raster::rotate(&out, angle);
        }
        out
    }

    /// The current cell after scale, flip, and rotation, computing and
    /// caching it on first access.
    pub fn current_transformed_cell(&mut self) -> &RgbaImage {
        let idx = self.current_index;
        if self.transformed[idx].is_none() {
            let cell = Self::transform_cell(
                &self.cells[idx],
                self.scale,
                self.flip_x,
                self.flip_y,
                self.angle,
            );
            self.transformed[idx] = Some(cell);
        }
        self.transformed[idx].as_ref().expect("cache entry just filled")
    }

    // ── Geometry ─────────────────────────────────────────────────────────

    /// Post-transform pixel size of the current cell, computed analytically
    /// so size queries never force a pixel-buffer transform.
    pub fn size(&self) -> (u32, u32) {
        let (w, h) = self.cells[self.current_index].dimensions();
        let (sw, sh) = raster::scaled_size(w, h, self.scale);
        raster::rotated_bounds(sw.max(1), sh.max(1), self.angle)
    }

    pub fn width(&self) -> f32 {
        self.size().0 as f32
    }

    pub fn height(&self) -> f32 {
        self.size().1 as f32
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.body.pos.x, self.body.pos.y, self.width(), self.height())
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.body.pos = center - Vec2::new(self.width() / 2.0, self.height() / 2.0);
    }

    // ── Pixels ───────────────────────────────────────────────────────────

    /// The current transformed cell's pixels.
    pub fn pixels(&mut self) -> &RgbaImage {
        self.current_transformed_cell()
    }

    /// Overwrite the current transformed cell's pixels. The replacement must
    /// match the transformed cell's dimensions exactly.
    ///
    /// Edits live in the transform cache, so they last until the next
    /// scale/flip/angle change invalidates it.
    pub fn set_pixels(&mut self, pixels: RgbaImage) -> Result<(), EngineError> {
        let expected = self.current_transformed_cell().dimensions();
        if pixels.dimensions() != expected {
            return Err(EngineError::validation(format!(
                "pixel buffer must match sprite dimensions (expected {}x{}, got {}x{})",
                expected.0,
                expected.1,
                pixels.width(),
                pixels.height()
            )));
        }
        self.transformed[self.current_index] = Some(pixels);
        Ok(())
    }

    // ── Drawing ──────────────────────────────────────────────────────────

    pub(crate) fn draw(&mut self, frame: &mut RgbaImage) {
        if self.body.visible {
            let (x, y) = (self.body.pos.x as i64, self.body.pos.y as i64);
            let cell = self.current_transformed_cell();
            raster::blit(frame, cell, x, y);
        }
        if self.body.show_bounds {
            raster::stroke_rect(frame, self.rect(), self.body.bounds_color, 2);
        }
    }
}

fn load_cells(path: &Path) -> Result<Vec<RgbaImage>, EngineError> {
    match SheetMeta::for_image(path)? {
        Some(meta) => Ok(ImageSheet::load(path, meta.rows, meta.cols)?.into_cells()),
        None => {
            let img = image::open(path)
                .map_err(|e| EngineError::ResourceLoad(format!("{}: {e}", path.display())))?
                .to_rgba8();
            Ok(vec![img])
        }
    }
}
