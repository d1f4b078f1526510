//! RGBA colors and the named palette.

use image::Rgba;

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub const fn r(self) -> u8 {
        self.0[0]
    }

    pub const fn g(self) -> u8 {
        self.0[1]
    }

    pub const fn b(self) -> u8 {
        self.0[2]
    }

    pub const fn a(self) -> u8 {
        self.0[3]
    }

    // HTML 4.01 basic palette.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const SILVER: Color = Color::rgb(192, 192, 192);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const MAROON: Color = Color::rgb(128, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const OLIVE: Color = Color::rgb(128, 128, 0);
    pub const LIME: Color = Color::rgb(0, 255, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const AQUA: Color = Color::rgb(0, 255, 255);
    pub const TEAL: Color = Color::rgb(0, 128, 128);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const NAVY: Color = Color::rgb(0, 0, 128);
    pub const FUCHSIA: Color = Color::rgb(255, 0, 255);
    pub const PURPLE: Color = Color::rgb(128, 0, 128);

    // Extended names.
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const PINK: Color = Color::rgb(255, 192, 203);
    pub const GOLD: Color = Color::rgb(255, 215, 0);
    pub const BROWN: Color = Color::rgb(165, 42, 42);
    pub const TAN: Color = Color::rgb(210, 180, 140);
    pub const CYAN: Color = Color::AQUA;
    pub const MAGENTA: Color = Color::FUCHSIA;
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
}

impl From<Color> for Rgba<u8> {
    fn from(color: Color) -> Self {
        Rgba(color.0)
    }
}

impl From<Rgba<u8>> for Color {
    fn from(px: Rgba<u8>) -> Self {
        Color(px.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_is_fully_opaque() {
        assert_eq!(Color::rgb(1, 2, 3), Color::rgba(1, 2, 3, 255));
        assert_eq!(Color::rgb(1, 2, 3).a(), 255);
    }

    #[test]
    fn converts_to_and_from_image_pixels() {
        let px: Rgba<u8> = Color::NAVY.into();
        assert_eq!(px, Rgba([0, 0, 128, 255]));
        assert_eq!(Color::from(px), Color::NAVY);
    }
}
