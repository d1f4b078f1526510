//! Sprite transform parameters and the transformed-cell cache.

use easel::Sprite;
use glam::Vec2;
use image::{Rgba, RgbaImage};

/// 4x2 cell with a marker pixel at (0, 0) so orientation is observable.
fn marked_sprite() -> Sprite {
    let mut cell = RgbaImage::from_pixel(4, 2, Rgba([0, 0, 255, 255]));
    cell.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    Sprite::from_cells(vec![cell], 10.0, 20.0).unwrap()
}

// ── Center anchoring ─────────────────────────────────────────────────────────

/// Scale and angle changes anchor the sprite at its center, not its
/// top-left corner.
#[test]
fn center_is_preserved_across_scale_and_angle_changes() {
    let mut sprite = marked_sprite();
    let before = sprite.center();

    sprite.set_scale(3.0).unwrap();
    assert_eq!(sprite.center(), before, "center moved on scale");

    sprite.set_angle(90.0).unwrap();
    assert_eq!(sprite.center(), before, "center moved on rotation");

    sprite.set_scale(1.0).unwrap();
    sprite.set_angle(45.0).unwrap();
    assert_eq!(sprite.center(), before, "center moved across a sequence");
}

#[test]
fn set_center_moves_the_sprite() {
    let mut sprite = marked_sprite();
    sprite.set_center(Vec2::new(50.0, 50.0));
    assert_eq!(sprite.center(), Vec2::new(50.0, 50.0));
    assert_eq!(sprite.body.pos, Vec2::new(48.0, 49.0));
}

// ── Scale validation ─────────────────────────────────────────────────────────

/// A scale that would shrink the un-transformed cell below one pixel fails
/// and leaves every parameter untouched.
#[test]
fn sub_pixel_scale_is_rejected_without_mutation() {
    let mut sprite = marked_sprite();
    sprite.set_scale(2.0).unwrap();
    let center = sprite.center();

    // Height 2 * 0.25 < 1 pixel.
    assert!(sprite.set_scale(0.25).is_err());
    assert_eq!(sprite.scale(), 2.0);
    assert_eq!(sprite.center(), center);
}

#[test]
fn non_positive_scales_are_rejected() {
    let mut sprite = marked_sprite();
    assert!(sprite.set_scale(0.0).is_err());
    assert!(sprite.set_scale(-1.0).is_err());
    assert!(sprite.set_scale(f32::NAN).is_err());
    assert_eq!(sprite.scale(), 1.0);
}

#[test]
fn non_finite_angle_is_rejected() {
    let mut sprite = marked_sprite();
    assert!(sprite.set_angle(f32::INFINITY).is_err());
    assert_eq!(sprite.angle(), 0.0);
}

// ── Size queries ─────────────────────────────────────────────────────────────

#[test]
fn size_follows_scale() {
    let mut sprite = marked_sprite();
    assert_eq!(sprite.size(), (4, 2));
    sprite.set_scale(2.5).unwrap();
    assert_eq!(sprite.size(), (10, 5));
}

/// A quarter turn swaps width and height exactly.
#[test]
fn size_swaps_axes_on_a_quarter_turn() {
    let mut sprite = marked_sprite();
    sprite.set_angle(90.0).unwrap();
    assert_eq!(sprite.size(), (2, 4));
    assert_eq!(sprite.width(), 2.0);
    assert_eq!(sprite.height(), 4.0);
}

/// The analytic size always matches the transformed pixel buffer.
#[test]
fn size_matches_transformed_cell_dimensions() {
    let mut sprite = marked_sprite();
    for (scale, angle) in [(1.0, 0.0), (2.0, 90.0), (3.0, 45.0), (1.5, 30.0)] {
        sprite.set_scale(scale).unwrap();
        sprite.set_angle(angle).unwrap();
        let size = sprite.size();
        assert_eq!(sprite.pixels().dimensions(), size, "scale {scale} angle {angle}");
    }
}

// ── Cache behavior ───────────────────────────────────────────────────────────

/// `pixels` always reflects the latest parameters; a stale transformed cell
/// is never observable.
#[test]
fn transform_changes_are_visible_immediately() {
    let mut sprite = marked_sprite();
    assert_eq!(sprite.pixels().get_pixel(0, 0), &Rgba([255, 0, 0, 255]));

    // Horizontal flip moves the marker to the right edge.
    sprite.set_flip_x(true);
    assert_eq!(sprite.pixels().get_pixel(3, 0), &Rgba([255, 0, 0, 255]));

    // Flip back: marker returns.
    sprite.set_flip_x(false);
    assert_eq!(sprite.pixels().get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
}

/// Flip happens before rotation: the marker flips along the pre-rotation
/// x axis, then the quarter turn carries it to a corner a rotate-then-flip
/// order would not produce.
#[test]
fn transform_order_is_scale_flip_rotate() {
    let mut sprite = marked_sprite();
    sprite.set_flip_x(true);
    sprite.set_angle(90.0).unwrap();

    // After flip the marker is at (3, 0) in a 4x2 cell; a 90 degree
    // counter-clockwise turn maps it to (0, 0) of the 2x4 result.
    assert_eq!(sprite.pixels().get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
}

/// Pixel edits live in the cache and survive until a parameter change
/// invalidates them.
#[test]
fn pixel_edits_last_until_invalidation() {
    let mut sprite = marked_sprite();
    let mut edited = sprite.pixels().clone();
    edited.put_pixel(2, 1, Rgba([0, 255, 0, 255]));
    sprite.set_pixels(edited).unwrap();
    assert_eq!(sprite.pixels().get_pixel(2, 1), &Rgba([0, 255, 0, 255]));

    // Any transform-parameter change recomputes from the raw cell.
    sprite.set_flip_y(true);
    sprite.set_flip_y(false);
    assert_eq!(sprite.pixels().get_pixel(2, 1), &Rgba([0, 0, 255, 255]));
}

#[test]
fn set_pixels_rejects_mismatched_dimensions() {
    let mut sprite = marked_sprite();
    let wrong = RgbaImage::new(3, 3);
    assert!(sprite.set_pixels(wrong).is_err());
}
