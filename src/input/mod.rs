//! Per-frame input capture.
//!
//! The backend's pending events are drained exactly once per frame, strictly
//! after destroyed objects are reaped, and replace the previous frame's set
//! wholesale — events never accumulate across frames. `was_*` queries answer
//! "did at least one such event occur this frame"; multiple presses within a
//! single frame are not counted separately.

use std::collections::HashSet;

use glam::Vec2;
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// A single input event observed between two frame boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseDown { button: MouseButton, pos: Vec2 },
    MouseUp { button: MouseButton, pos: Vec2 },
    MouseMoved(Vec2),
    /// Window close / termination request. Clears the frame loop's
    /// `is_running` flag; the engine never self-terminates otherwise.
    Quit,
}

/// The input state for the current frame: the captured event set plus held
/// key/button state carried across frames.
#[derive(Debug, Default)]
pub struct FrameInput {
    events: Vec<Event>,
    keys_held: HashSet<KeyCode>,
    buttons_held: HashSet<MouseButton>,
    mouse_pos: Vec2,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the frame's event set and fold held-state transitions in.
    /// Returns true if a termination event was present.
    pub(crate) fn capture(&mut self, events: Vec<Event>) -> bool {
        self.events = events;
        let mut quit = false;
        for event in &self.events {
            match *event {
                Event::KeyDown(key) => {
                    self.keys_held.insert(key);
                }
                Event::KeyUp(key) => {
                    self.keys_held.remove(&key);
                }
                Event::MouseDown { button, pos } => {
                    self.buttons_held.insert(button);
                    self.mouse_pos = pos;
                }
                Event::MouseUp { button, pos } => {
                    self.buttons_held.remove(&button);
                    self.mouse_pos = pos;
                }
                Event::MouseMoved(pos) => {
                    self.mouse_pos = pos;
                }
                Event::Quit => {
                    quit = true;
                }
            }
        }
        quit
    }

    /// The raw ordered event set captured this frame.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    // ── Keyboard ─────────────────────────────────────────────────────────

    /// At least one key-down for `key` occurred this frame.
    pub fn was_key_pressed(&self, key: KeyCode) -> bool {
        self.events.iter().any(|e| matches!(e, Event::KeyDown(k) if *k == key))
    }

    /// At least one key-down for any key occurred this frame.
    pub fn was_any_key_pressed(&self) -> bool {
        self.events.iter().any(|e| matches!(e, Event::KeyDown(_)))
    }

    pub fn was_key_released(&self, key: KeyCode) -> bool {
        self.events.iter().any(|e| matches!(e, Event::KeyUp(k) if *k == key))
    }

    pub fn was_any_key_released(&self) -> bool {
        self.events.iter().any(|e| matches!(e, Event::KeyUp(_)))
    }

    /// The key is currently held, regardless of when it went down.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn is_any_key_down(&self) -> bool {
        !self.keys_held.is_empty()
    }

    // ── Mouse ────────────────────────────────────────────────────────────

    pub fn was_mouse_pressed(&self) -> bool {
        self.events.iter().any(|e| matches!(e, Event::MouseDown { .. }))
    }

    pub fn was_mouse_released(&self) -> bool {
        self.events.iter().any(|e| matches!(e, Event::MouseUp { .. }))
    }

    pub fn is_mouse_down(&self) -> bool {
        self.buttons_held.contains(&MouseButton::Left)
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_pos
    }

    pub fn mouse_x(&self) -> f32 {
        self.mouse_pos.x
    }

    pub fn mouse_y(&self) -> f32 {
        self.mouse_pos.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(x: f32, y: f32) -> Event {
        Event::MouseDown { button: MouseButton::Left, pos: Vec2::new(x, y) }
    }

    #[test]
    fn capture_replaces_prior_events_wholesale() {
        let mut input = FrameInput::new();
        input.capture(vec![Event::KeyDown(KeyCode::Space)]);
        assert!(input.was_key_pressed(KeyCode::Space));

        input.capture(vec![]);
        assert!(!input.was_key_pressed(KeyCode::Space), "events must not persist across frames");
    }

    #[test]
    fn held_state_survives_across_frames() {
        let mut input = FrameInput::new();
        input.capture(vec![Event::KeyDown(KeyCode::KeyW)]);
        input.capture(vec![]);
        assert!(input.is_key_down(KeyCode::KeyW));

        input.capture(vec![Event::KeyUp(KeyCode::KeyW)]);
        assert!(!input.is_key_down(KeyCode::KeyW));
        assert!(input.was_key_released(KeyCode::KeyW));
    }

    #[test]
    fn multiple_presses_in_one_frame_read_as_at_least_one() {
        let mut input = FrameInput::new();
        input.capture(vec![click(1.0, 1.0), click(2.0, 2.0)]);
        assert!(input.was_mouse_pressed());
    }

    #[test]
    fn mouse_position_tracks_latest_event() {
        let mut input = FrameInput::new();
        input.capture(vec![Event::MouseMoved(Vec2::new(3.0, 4.0)), click(10.0, 20.0)]);
        assert_eq!(input.mouse_position(), Vec2::new(10.0, 20.0));
        assert_eq!(input.mouse_x(), 10.0);
    }

    #[test]
    fn capture_reports_quit() {
        let mut input = FrameInput::new();
        assert!(!input.capture(vec![click(0.0, 0.0)]));
        assert!(input.capture(vec![Event::Quit]));
    }

    #[test]
    fn is_mouse_down_tracks_left_button_held() {
        let mut input = FrameInput::new();
        input.capture(vec![click(0.0, 0.0)]);
        input.capture(vec![]);
        assert!(input.is_mouse_down());
        input.capture(vec![Event::MouseUp { button: MouseButton::Left, pos: Vec2::ZERO }]);
        assert!(!input.is_mouse_down());
    }
}
