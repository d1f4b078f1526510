//! The window context and the frame step.
//!
//! A [`GraphicsWindow`] owns the draw list, the frame clock, the composed
//! pixel buffer, and the current frame's input set. There is no global
//! active-window state; every operation that needs a render target goes
//! through a window value. The frame step is a single synchronous call and
//! the engine never runs its own loop: callers invoke [`finish_frame`]
//! (or [`step_frame`] with an explicit delta) while [`is_running`] holds.
//!
//! [`finish_frame`]: GraphicsWindow::finish_frame
//! [`step_frame`]: GraphicsWindow::step_frame
//! [`is_running`]: GraphicsWindow::is_running

use std::time::{Duration, Instant};

use glam::Vec2;
use image::RgbaImage;

use crate::backend::Backend;
use crate::color::Color;
use crate::drawable::Drawable;
use crate::error::{EngineError, Result};
use crate::input::FrameInput;
use crate::raster;
use crate::scene::{DrawList, ObjectId};
use crate::sprite::Sprite;
use crate::text::TextLabel;

pub const DEFAULT_FRAMERATE: u32 = 30;

/// Paces frames to a target rate and reports elapsed wall time.
struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    fn new() -> Self {
        Self { last: None }
    }

    /// Sleep out the remainder of the frame period, then return the
    /// milliseconds elapsed since the previous tick (0 on the first).
    fn tick(&mut self, target_period: Duration) -> f32 {
        if let Some(prev) = self.last {
            let elapsed = prev.elapsed();
            if elapsed < target_period {
                std::thread::sleep(target_period - elapsed);
            }
        }
        let now = Instant::now();
        let dt_ms = match self.last {
            Some(prev) => now.duration_since(prev).as_secs_f32() * 1000.0,
            None => 0.0,
        };
        self.last = Some(now);
        dt_ms
    }
}

/// A window: render target, scene, clock, and per-frame input.
pub struct GraphicsWindow<B: Backend> {
    backend: B,
    frame: RgbaImage,
    width: u32,
    height: u32,
    background_color: Color,
    framerate: u32,
    created: Instant,
    clock: FrameClock,
    scene: DrawList,
    input: FrameInput,
    is_running: bool,
}

impl<B: Backend> GraphicsWindow<B> {
    pub fn new(backend: B, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::validation(format!(
                "window dimensions must be at least 1x1 (got {width}x{height})"
            )));
        }
        let background_color = Color::WHITE;
        let mut frame = RgbaImage::new(width, height);
        raster::fill(&mut frame, background_color);
        Ok(Self {
            backend,
            frame,
            width,
            height,
            background_color,
            framerate: DEFAULT_FRAMERATE,
            created: Instant::now(),
            clock: FrameClock::new(),
            scene: DrawList::new(),
            input: FrameInput::new(),
            is_running: true,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn center_x(&self) -> f32 {
        self.width as f32 / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.height as f32 / 2.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.center_y())
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background_color = color;
    }

    pub fn framerate(&self) -> u32 {
        self.framerate
    }

    pub fn set_framerate(&mut self, framerate: u32) -> Result<()> {
        if framerate == 0 {
            return Err(EngineError::validation("framerate must be at least 1"));
        }
        self.framerate = framerate;
        Ok(())
    }

    /// Milliseconds since the window was created.
    pub fn program_duration(&self) -> u64 {
        self.created.elapsed().as_millis() as u64
    }

    /// The frame as composed by the most recent step.
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ── Scene ────────────────────────────────────────────────────────────

    /// Add a drawable at the front of the z-order. The returned id stays
    /// valid until the object is destroyed and reaped.
    pub fn add(&mut self, drawable: impl Into<Drawable>) -> ObjectId {
        self.scene.add(drawable)
    }

    pub fn object_count(&self) -> usize {
        self.scene.len()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.scene.contains(id)
    }

    pub fn get(&self, id: ObjectId) -> Result<&Drawable> {
        self.scene.get(id).ok_or(EngineError::NotInScene)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Result<&mut Drawable> {
        self.scene.get_mut(id).ok_or(EngineError::NotInScene)
    }

    pub fn sprite_mut(&mut self, id: ObjectId) -> Result<&mut Sprite> {
        self.get_mut(id)?
            .as_sprite_mut()
            .ok_or_else(|| EngineError::validation("object is not a sprite"))
    }

    pub fn label_mut(&mut self, id: ObjectId) -> Result<&mut TextLabel> {
        self.get_mut(id)?
            .as_label_mut()
            .ok_or_else(|| EngineError::validation("object is not a text label"))
    }

    pub fn layer_of(&self, id: ObjectId) -> Result<usize> {
        self.scene.layer_of(id)
    }

    pub fn move_forward(&mut self, id: ObjectId) -> Result<()> {
        self.scene.move_forward(id)
    }

    pub fn move_backward(&mut self, id: ObjectId) -> Result<()> {
        self.scene.move_backward(id)
    }

    pub fn move_to_front(&mut self, id: ObjectId) -> Result<()> {
        self.scene.move_to_front(id)
    }

    pub fn move_to_back(&mut self, id: ObjectId) -> Result<()> {
        self.scene.move_to_back(id)
    }

    pub fn set_layer(&mut self, id: ObjectId, layer: usize) -> Result<()> {
        self.scene.set_layer(id, layer)
    }

    // ── Input ────────────────────────────────────────────────────────────

    pub fn input(&self) -> &FrameInput {
        &self.input
    }

    pub fn was_key_pressed(&self, key: crate::input::KeyCode) -> bool {
        self.input.was_key_pressed(key)
    }

    pub fn was_any_key_pressed(&self) -> bool {
        self.input.was_any_key_pressed()
    }

    pub fn was_key_released(&self, key: crate::input::KeyCode) -> bool {
        self.input.was_key_released(key)
    }

    pub fn is_key_down(&self, key: crate::input::KeyCode) -> bool {
        self.input.is_key_down(key)
    }

    pub fn was_mouse_pressed(&self) -> bool {
        self.input.was_mouse_pressed()
    }

    pub fn was_mouse_released(&self) -> bool {
        self.input.was_mouse_released()
    }

    pub fn is_mouse_down(&self) -> bool {
        self.input.is_mouse_down()
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.input.mouse_position()
    }

    // ── Frame loop ───────────────────────────────────────────────────────

    /// The loop keeps going until a termination event arrives or [`close`]
    /// is called. Callers must stop stepping once this is false.
    ///
    /// [`close`]: GraphicsWindow::close
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Stop the loop explicitly, as if a termination event had arrived.
    pub fn close(&mut self) {
        self.is_running = false;
    }

    /// Complete one real-time frame: pace to the target framerate, then
    /// step with the measured elapsed time.
    pub fn finish_frame(&mut self) {
        let period = Duration::from_secs_f32(1.0 / self.framerate as f32);
        let dt_ms = self.clock.tick(period);
        self.step_frame(dt_ms);
    }

    /// One frame step with an explicit elapsed time in milliseconds.
    ///
    /// Order is fixed: clear, draw every drawable back to front, update
    /// every drawable with `dt_ms`, present, reap destroyed objects, then
    /// capture the backend's pending events as the new frame event set.
    /// Every drawable is drawn before any is updated, so the presented
    /// frame always reflects pre-update state. Each drawable's own draw
    /// skips its pixels while invisible (the bounds overlay still shows).
    /// A drawable destroyed since the previous step draws this one final
    /// frame and is reaped before the next frame's events are observed.
    pub fn step_frame(&mut self, dt_ms: f32) {
        raster::fill(&mut self.frame, self.background_color);

        for (_, drawable) in self.scene.iter_mut() {
            drawable.draw(&mut self.frame);
        }
        for (_, drawable) in self.scene.iter_mut() {
            drawable.update(dt_ms);
        }

        self.backend.present(&self.frame);
        self.scene.reap_destroyed();

        let quit = self.input.capture(self.backend.poll_events());
        if quit {
            self.is_running = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::backend::Headless;
    use crate::input::Event;
    use crate::sprite::Sprite;

    fn window(w: u32, h: u32) -> GraphicsWindow<Headless> {
        GraphicsWindow::new(Headless::new(), w, h).unwrap()
    }

    fn solid_sprite(color: Color, w: u32, h: u32) -> Sprite {
        let cell = RgbaImage::from_pixel(w, h, color.into());
        Sprite::from_cells(vec![cell], 0.0, 0.0).unwrap()
    }

    #[test]
    fn zero_sized_window_is_rejected() {
        assert!(GraphicsWindow::new(Headless::new(), 0, 10).is_err());
        assert!(GraphicsWindow::new(Headless::new(), 10, 0).is_err());
    }

    #[test]
    fn frame_clears_to_background_color() {
        let mut win = window(4, 4);
        win.set_background_color(Color::NAVY);
        win.step_frame(16.0);
        assert_eq!(win.frame().get_pixel(2, 2), &Rgba([0, 0, 128, 255]));
        assert_eq!(win.backend().frames_presented(), 1);
    }

    #[test]
    fn velocity_integrates_after_the_draw_pass() {
        let mut win = window(8, 8);
        let id = win.add(solid_sprite(Color::RED, 2, 2));
        win.sprite_mut(id).unwrap().body.velocity = glam::Vec2::new(10.0, 0.0);

        win.step_frame(500.0);
        let pos = win.get(id).unwrap().body().pos;
        assert_eq!(pos.x, 5.0, "pos += velocity * dt / 1000");
    }

    #[test]
    fn invisible_drawables_are_not_rendered_but_still_update() {
        let mut win = window(8, 8);
        win.set_background_color(Color::BLACK);
        let id = win.add(solid_sprite(Color::RED, 8, 8));
        let sprite = win.sprite_mut(id).unwrap();
        sprite.body.visible = false;
        sprite.body.velocity = glam::Vec2::new(2.0, 0.0);

        win.step_frame(1000.0);
        assert_eq!(win.frame().get_pixel(4, 4), &Rgba([0, 0, 0, 255]));
        assert_eq!(win.get(id).unwrap().body().pos.x, 2.0);
    }

    #[test]
    fn bounds_overlay_shows_for_an_invisible_drawable() {
        let mut win = window(8, 8);
        win.set_background_color(Color::BLACK);
        let id = win.add(solid_sprite(Color::RED, 8, 8));
        let sprite = win.sprite_mut(id).unwrap();
        sprite.body.visible = false;
        sprite.body.show_bounds = true;
        sprite.body.bounds_color = Color::LIME;

        win.step_frame(16.0);
        // The outline renders; the sprite's own pixels do not.
        assert_eq!(win.frame().get_pixel(0, 0), &Rgba([0, 255, 0, 255]));
        assert_eq!(win.frame().get_pixel(4, 4), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn destroyed_object_draws_its_last_frame_then_is_reaped() {
        let mut win = window(8, 8);
        win.set_background_color(Color::BLACK);
        let id = win.add(solid_sprite(Color::RED, 8, 8));
        win.get_mut(id).unwrap().destroy();

        // The frame in which the object is marked still shows it.
        win.step_frame(16.0);
        assert_eq!(win.frame().get_pixel(4, 4), &Rgba([255, 0, 0, 255]));
        assert!(!win.contains(id));

        win.step_frame(16.0);
        assert_eq!(win.frame().get_pixel(4, 4), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn quit_event_stops_the_loop() {
        let mut win = window(4, 4);
        assert!(win.is_running());
        win.backend_mut().push_event(Event::Quit);
        win.step_frame(16.0);
        assert!(!win.is_running());
    }

    #[test]
    fn events_are_replaced_each_frame() {
        let mut win = window(4, 4);
        win.backend_mut().push_event(Event::KeyDown(crate::input::KeyCode::Space));
        win.step_frame(16.0);
        assert!(win.was_key_pressed(crate::input::KeyCode::Space));

        win.step_frame(16.0);
        assert!(!win.was_key_pressed(crate::input::KeyCode::Space));
    }

    #[test]
    fn back_to_front_draw_order_lets_later_objects_cover_earlier() {
        let mut win = window(4, 4);
        win.add(solid_sprite(Color::RED, 4, 4));
        win.add(solid_sprite(Color::BLUE, 4, 4));
        win.step_frame(16.0);
        assert_eq!(win.frame().get_pixel(1, 1), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn finish_frame_paces_to_the_target_rate() {
        let mut win = window(4, 4);
        win.set_framerate(100).unwrap();
        win.finish_frame();
        let before = Instant::now();
        win.finish_frame();
        assert!(before.elapsed() >= Duration::from_millis(9));
    }

    #[test]
    fn center_helpers() {
        let win = window(10, 6);
        assert_eq!(win.center_x(), 5.0);
        assert_eq!(win.center_y(), 3.0);
        assert_eq!(win.center(), Vec2::new(5.0, 3.0));
    }
}
