//! Drawable objects and the attributes every one of them shares.

use glam::Vec2;
use image::RgbaImage;

use crate::color::Color;
use crate::geometry::Rect;
use crate::sprite::Sprite;
use crate::text::TextLabel;

// ── Body ─────────────────────────────────────────────────────────────────────

/// State common to every drawable: position, linear velocity, visibility,
/// the deferred-destroy flag, and the debug bounds overlay.
#[derive(Debug, Clone)]
pub struct Body {
    pub pos: Vec2,
    /// Linear velocity in pixels per second, integrated each frame.
    pub velocity: Vec2,
    pub visible: bool,
    pub show_bounds: bool,
    pub bounds_color: Color,
    destroyed: bool,
}

impl Body {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            visible: true,
            show_bounds: false,
            bounds_color: Color::rgb(50, 50, 50),
            destroyed: false,
        }
    }

    /// Mark this object for removal. It is drawn at most once more (the
    /// frame that marks it) and reaped before the next frame's input capture.
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Advance position by `velocity * dt`, with `dt_ms` in milliseconds.
    pub(crate) fn integrate(&mut self, dt_ms: f32) {
        self.pos += self.velocity * (dt_ms / 1000.0);
    }
}

// ── Drawable ─────────────────────────────────────────────────────────────────

/// Any object that participates in the window's ordered draw list.
pub enum Drawable {
    Sprite(Sprite),
    Label(TextLabel),
}

impl Drawable {
    pub fn body(&self) -> &Body {
        match self {
            Drawable::Sprite(s) => &s.body,
            Drawable::Label(l) => &l.body,
        }
    }

    pub fn body_mut(&mut self) -> &mut Body {
        match self {
            Drawable::Sprite(s) => &mut s.body,
            Drawable::Label(l) => &mut l.body,
        }
    }

    pub fn as_sprite(&self) -> Option<&Sprite> {
        match self {
            Drawable::Sprite(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sprite_mut(&mut self) -> Option<&mut Sprite> {
        match self {
            Drawable::Sprite(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&TextLabel> {
        match self {
            Drawable::Label(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_label_mut(&mut self) -> Option<&mut TextLabel> {
        match self {
            Drawable::Label(l) => Some(l),
            _ => None,
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            Drawable::Sprite(s) => s.rect(),
            Drawable::Label(l) => l.rect(),
        }
    }

    /// True if `(x, y)` falls inside this object's bounds.
    pub fn is_colliding_point(&self, x: f32, y: f32) -> bool {
        self.rect().contains(x, y)
    }

    /// True if this object's bounds overlap `other`'s.
    pub fn is_colliding_rect(&self, other: &Drawable) -> bool {
        self.rect().intersects(&other.rect())
    }

    pub fn destroy(&mut self) {
        self.body_mut().destroy();
    }

    pub fn is_destroyed(&self) -> bool {
        self.body().is_destroyed()
    }

    pub(crate) fn draw(&mut self, frame: &mut RgbaImage) {
        match self {
            Drawable::Sprite(s) => s.draw(frame),
            Drawable::Label(l) => l.draw(frame),
        }
    }

    pub(crate) fn update(&mut self, dt_ms: f32) {
        self.body_mut().integrate(dt_ms);
        if let Drawable::Sprite(s) = self {
            s.advance_animation(dt_ms);
        }
    }
}

impl From<Sprite> for Drawable {
    fn from(s: Sprite) -> Self {
        Drawable::Sprite(s)
    }
}

impl From<TextLabel> for Drawable {
    fn from(l: TextLabel) -> Self {
        Drawable::Label(l)
    }
}
