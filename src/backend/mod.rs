//! Presentation backends.
//!
//! The engine composes each frame into a CPU pixel buffer; a [`Backend`]
//! carries that buffer to a surface and feeds platform input back in. The
//! windowed backend is deliberately out of tree; [`Headless`] covers tests,
//! tools, and any host that drives the loop itself.

use image::RgbaImage;

use crate::input::Event;

/// Sink for finished frames and source of platform events.
pub trait Backend {
    /// Present a fully composed frame. Called exactly once per frame, after
    /// every drawable has been drawn and updated.
    fn present(&mut self, frame: &RgbaImage);

    /// Drain all events that arrived since the previous call.
    fn poll_events(&mut self) -> Vec<Event>;
}

/// Backend that presents nowhere and replays scripted events.
#[derive(Debug, Default)]
pub struct Headless {
    pending: Vec<Event>,
    frames_presented: u64,
    last_frame: Option<RgbaImage>,
}

impl Headless {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event to be observed on the next poll.
    pub fn push_event(&mut self, event: Event) {
        self.pending.push(event);
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// The most recently presented frame, if any.
    pub fn last_frame(&self) -> Option<&RgbaImage> {
        self.last_frame.as_ref()
    }
}

impl Backend for Headless {
    fn present(&mut self, frame: &RgbaImage) {
        self.frames_presented += 1;
        self.last_frame = Some(frame.clone());
    }

    fn poll_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Event, KeyCode};

    #[test]
    fn headless_drains_queued_events_once() {
        let mut backend = Headless::new();
        backend.push_event(Event::KeyDown(KeyCode::Escape));

        let events = backend.poll_events();
        assert_eq!(events.len(), 1);
        assert!(backend.poll_events().is_empty());
    }

    #[test]
    fn headless_records_presented_frames() {
        let mut backend = Headless::new();
        let frame = RgbaImage::new(4, 4);
        backend.present(&frame);
        backend.present(&frame);
        assert_eq!(backend.frames_presented(), 2);
        assert_eq!(backend.last_frame().unwrap().width(), 4);
    }
}
