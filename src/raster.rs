//! CPU pixel-buffer operations: scale, flip, rotate, and alpha-blended blits.
//!
//! These are the primitive image transforms behind a sprite's transformed-cell
//! cache. Buffers are plain [`image::RgbaImage`]; everything here is pure and
//! GPU-free. Transform order is fixed: scale, then flip, then rotate.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::geometry::Rect;

/// Pixel dimensions of a buffer after scaling by `scale`.
///
/// Truncating, matching the scaler: a 3px-wide cell at scale 0.5 is 1px wide.
pub fn scaled_size(width: u32, height: u32, scale: f32) -> (u32, u32) {
    ((width as f32 * scale) as u32, (height as f32 * scale) as u32)
}

/// Pixel dimensions of the bounding box of a buffer rotated by `angle`
/// degrees. Exact multiples of 90° swap or keep the dimensions; any other
/// angle expands to the rotated bounding box.
pub fn rotated_bounds(width: u32, height: u32, angle: f32) -> (u32, u32) {
    let a = angle.rem_euclid(360.0);
    if a == 0.0 || a == 180.0 {
        return (width, height);
    }
    if a == 90.0 || a == 270.0 {
        return (height, width);
    }
    let (sin, cos) = a.to_radians().sin_cos();
    let w = (width as f32 * cos.abs() + height as f32 * sin.abs()).round() as u32;
    let h = (width as f32 * sin.abs() + height as f32 * cos.abs()).round() as u32;
    (w.max(1), h.max(1))
}

/// Scale a buffer by a uniform factor with nearest-neighbour sampling.
pub fn scale(src: &RgbaImage, factor: f32) -> RgbaImage {
    let (nw, nh) = scaled_size(src.width(), src.height(), factor);
    imageops::resize(src, nw.max(1), nh.max(1), FilterType::Nearest)
}

/// Mirror a buffer across the vertical and/or horizontal axis.
pub fn flip(src: &RgbaImage, flip_x: bool, flip_y: bool) -> RgbaImage {
    let mut out = src.clone();
    if flip_x {
        out = imageops::flip_horizontal(&out);
    }
    if flip_y {
        out = imageops::flip_vertical(&out);
    }
    out
}

/// Rotate a buffer counter-clockwise by `angle` degrees.
///
/// The output buffer is the rotated bounding box from [`rotated_bounds`];
/// uncovered corners are transparent. Right-angle rotations are lossless;
/// other angles use nearest-neighbour sampling.
pub fn rotate(src: &RgbaImage, angle: f32) -> RgbaImage {
    let a = angle.rem_euclid(360.0);
    if a == 0.0 {
        return src.clone();
    }
    if a == 90.0 {
        return imageops::rotate270(src);
    }
    if a == 180.0 {
        return imageops::rotate180(src);
    }
    if a == 270.0 {
        return imageops::rotate90(src);
    }

    let (sw, sh) = src.dimensions();
    let (dw, dh) = rotated_bounds(sw, sh, a);
    let rad = a.to_radians();
    let (sin, cos) = rad.sin_cos();
    let (scx, scy) = (sw as f32 / 2.0, sh as f32 / 2.0);
    let (dcx, dcy) = (dw as f32 / 2.0, dh as f32 / 2.0);

    let mut out = RgbaImage::new(dw, dh);
    for dy in 0..dh {
        for dx in 0..dw {
            let ox = dx as f32 + 0.5 - dcx;
            let oy = dy as f32 + 0.5 - dcy;
            // Inverse of a counter-clockwise screen rotation (y axis down).
            let sx = cos * ox - sin * oy + scx;
            let sy = sin * ox + cos * oy + scy;
            if sx >= 0.0 && sy >= 0.0 && (sx as u32) < sw && (sy as u32) < sh {
                out.put_pixel(dx, dy, *src.get_pixel(sx as u32, sy as u32));
            }
        }
    }
    out
}

/// Fill an entire buffer with a solid color.
pub fn fill(frame: &mut RgbaImage, color: Color) {
    let px: Rgba<u8> = color.into();
    for p in frame.pixels_mut() {
        *p = px;
    }
}

/// Alpha-blend `src` over `dst` with its top-left corner at `(x, y)`.
/// Portions falling outside `dst` are clipped.
pub fn blit(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    blit_inner(dst, src, x, y, None);
}

/// Like [`blit`], but multiplies every source pixel by `tint` first.
/// Used to colorize white-on-transparent glyph bitmaps.
pub fn blit_tinted(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64, tint: Color) {
    blit_inner(dst, src, x, y, Some(tint));
}

fn blit_inner(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64, tint: Option<Color>) {
    let (dw, dh) = (dst.width() as i64, dst.height() as i64);
    for (sx, sy, &pixel) in src.enumerate_pixels() {
        let tx = x + sx as i64;
        let ty = y + sy as i64;
        if tx < 0 || ty < 0 || tx >= dw || ty >= dh {
            continue;
        }
        let mut p = pixel;
        if let Some(t) = tint {
            for c in 0..4 {
                p.0[c] = ((p.0[c] as u16 * t.0[c] as u16) / 255) as u8;
            }
        }
        let out = dst.get_pixel_mut(tx as u32, ty as u32);
        *out = over(p, *out);
    }
}

/// Standard src-over compositing of two non-premultiplied RGBA pixels.
fn over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src.0[3] as u32;
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let da = dst.0[3] as u32;
    let out_a = sa + da * (255 - sa) / 255;
    if out_a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let s = src.0[c] as u32;
        let d = dst.0[c] as u32;
        out[c] = ((s * sa + d * da * (255 - sa) / 255) / out_a) as u8;
    }
    out[3] = out_a as u8;
    Rgba(out)
}

/// Stroke a rectangle outline `thickness` pixels wide (drawn inward from the
/// edge). Used by the `show_bounds` debug overlay.
pub fn stroke_rect(frame: &mut RgbaImage, rect: Rect, color: Color, thickness: u32) {
    let px: Rgba<u8> = color.into();
    let (fw, fh) = (frame.width() as i64, frame.height() as i64);
    let x0 = rect.x as i64;
    let y0 = rect.y as i64;
    let x1 = x0 + rect.width as i64;
    let y1 = y0 + rect.height as i64;
    let t = thickness as i64;
    for y in y0..y1 {
        for x in x0..x1 {
            if x < 0 || y < 0 || x >= fw || y >= fh {
                continue;
            }
            let on_edge = x < x0 + t || x >= x1 - t || y < y0 + t || y >= y1 - t;
            if on_edge {
                frame.put_pixel(x as u32, y as u32, px);
            }
        }
    }
}

/// Draw a 1px horizontal line from `(x0, y)` to `(x1, y)`, clipped.
pub fn hline(frame: &mut RgbaImage, x0: f32, x1: f32, y: f32, color: Color) {
    let px: Rgba<u8> = color.into();
    let yy = y as i64;
    if yy < 0 || yy >= frame.height() as i64 {
        return;
    }
    let (a, b) = ((x0.min(x1)) as i64, (x0.max(x1)) as i64);
    for x in a..=b {
        if x >= 0 && x < frame.width() as i64 {
            frame.put_pixel(x as u32, yy as u32, px);
        }
    }
}
