//! Sprite-sheet slicing and optional sidecar metadata.
//!
//! A sheet image is divided into a `rows × cols` grid of equal cells, sliced
//! row-major. Cell size is integer division of the sheet size; remainder
//! pixels on the right and bottom edges are dropped, not distributed.
//!
//! Animation is auto-detected from a sidecar file: `hero.png` is animated when
//! a readable `hero.json` with `rows` and `cols` fields sits next to it.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::debug;
use serde::Deserialize;

use crate::error::EngineError;

/// Sidecar animation metadata, colocated with a sheet image under the same
/// file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SheetMeta {
    pub rows: u32,
    pub cols: u32,
}

impl SheetMeta {
    /// Path of the sidecar file for `image_path` (same stem, `.json`).
    pub fn sidecar_path(image_path: &Path) -> PathBuf {
        image_path.with_extension("json")
    }

    /// Read sidecar metadata for an image, if present.
    ///
    /// A missing file means "not animated" and returns `Ok(None)`; a file
    /// that exists but cannot be parsed is an error.
    pub fn for_image(image_path: &Path) -> Result<Option<Self>, EngineError> {
        let sidecar = Self::sidecar_path(image_path);
        let raw = match std::fs::read_to_string(&sidecar) {
            Ok(s) => s,
            Err(_) => {
                debug!("no sidecar metadata at {}; treating as static image", sidecar.display());
                return Ok(None);
            }
        };
        let meta: SheetMeta = serde_json::from_str(&raw)?;
        Ok(Some(meta))
    }
}

/// An image sliced into an ordered, row-major grid of animation cells.
#[derive(Debug, Clone)]
pub struct ImageSheet {
    cells: Vec<RgbaImage>,
    rows: u32,
    cols: u32,
}

impl ImageSheet {
    /// Slice an in-memory image into `rows × cols` cells.
    ///
    /// Fails with a validation error if either count is below 1, or if the
    /// image is too small to yield at least one pixel per cell.
    pub fn from_image(sheet: &RgbaImage, rows: u32, cols: u32) -> Result<Self, EngineError> {
        if rows < 1 || cols < 1 {
            return Err(EngineError::validation(format!(
                "sheet grid dimensions must be >= 1 (got {rows} rows, {cols} cols)"
            )));
        }
        let cell_w = sheet.width() / cols;
        let cell_h = sheet.height() / rows;
        if cell_w == 0 || cell_h == 0 {
            return Err(EngineError::validation(format!(
                "{}x{} sheet cannot be sliced into {rows}x{cols} cells",
                sheet.width(),
                sheet.height()
            )));
        }

        let mut cells = Vec::with_capacity((rows * cols) as usize);
        for gy in 0..rows {
            for gx in 0..cols {
                let view = image::imageops::crop_imm(sheet, gx * cell_w, gy * cell_h, cell_w, cell_h);
                cells.push(view.to_image());
            }
        }
        Ok(Self { cells, rows, cols })
    }

    /// Load a sheet image from disk and slice it.
    pub fn load(path: impl AsRef<Path>, rows: u32, cols: u32) -> Result<Self, EngineError> {
        let img = image::open(path.as_ref())
            .map_err(|e| EngineError::ResourceLoad(format!("{}: {e}", path.as_ref().display())))?
            .to_rgba8();
        Self::from_image(&img, rows, cols)
    }

    pub fn rows(&self) -> u32 { self.rows }
    pub fn cols(&self) -> u32 { self.cols }
    pub fn cell_count(&self) -> usize { self.cells.len() }

    /// Consume the sheet, yielding its cells in row-major order.
    pub fn into_cells(self) -> Vec<RgbaImage> {
        self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// A sheet where every pixel encodes its own coordinates, so cell origin
    /// can be verified after slicing.
    fn coord_sheet(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn slices_row_major_equal_cells() {
        let sheet = coord_sheet(8, 4);
        let cells = ImageSheet::from_image(&sheet, 2, 4).unwrap().into_cells();
        assert_eq!(cells.len(), 8);
        assert!(cells.iter().all(|c| c.dimensions() == (2, 2)));
        // Second cell of the first row starts at x=2, y=0.
        assert_eq!(cells[1].get_pixel(0, 0), &Rgba([2, 0, 0, 255]));
        // First cell of the second row starts at x=0, y=2.
        assert_eq!(cells[4].get_pixel(0, 0), &Rgba([0, 2, 0, 255]));
    }

    #[test]
    fn remainder_pixels_are_dropped() {
        let sheet = coord_sheet(7, 5);
        let s = ImageSheet::from_image(&sheet, 2, 3).unwrap();
        // 7 // 3 = 2 wide, 5 // 2 = 2 tall; the 7th column and 5th row vanish.
        assert!(s.into_cells().iter().all(|c| c.dimensions() == (2, 2)));
    }

    #[test]
    fn single_cell_grid_is_whole_image() {
        let sheet = coord_sheet(5, 3);
        let cells = ImageSheet::from_image(&sheet, 1, 1).unwrap().into_cells();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].dimensions(), (5, 3));
    }

    #[test]
    fn rejects_zero_grid_dimensions() {
        let sheet = coord_sheet(4, 4);
        assert!(matches!(
            ImageSheet::from_image(&sheet, 0, 2),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            ImageSheet::from_image(&sheet, 2, 0),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn rejects_grid_finer_than_pixels() {
        let sheet = coord_sheet(2, 2);
        assert!(ImageSheet::from_image(&sheet, 4, 1).is_err());
    }

    #[test]
    fn sidecar_path_swaps_extension() {
        let p = SheetMeta::sidecar_path(Path::new("assets/hero.png"));
        assert_eq!(p, Path::new("assets/hero.json"));
    }

    #[test]
    fn sheet_meta_parses_rows_and_cols() {
        let meta: SheetMeta = serde_json::from_str(r#"{"rows": 2, "cols": 5}"#).unwrap();
        assert_eq!(meta, SheetMeta { rows: 2, cols: 5 });
    }
}
