//! Classroom random-picker built on the engine: a name list, a label that
//! reveals one name per click, and selection without replacement.
//!
//! Runs headless with scripted clicks so it works anywhere; a windowed
//! build would swap the backend and leave the rest untouched.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use easel::text::{Font, Glyph};
use easel::{Align, Color, Event, GraphicsWindow, Headless, MouseButton, TextLabel};
use glam::Vec2;
use image::{Rgba, RgbaImage};

const NAMES_FILE: &str = "demos/names.txt";

fn built_in_font() -> Arc<Font> {
    // 4x8 monospace glyphs, all pointing at the same white atlas region.
    let mut glyphs = HashMap::new();
    for ch in (' '..='~').filter(|c| !c.is_whitespace()) {
        glyphs.insert(ch, Glyph {
            id: ch,
            x: 0,
            y: 0,
            width: 4,
            height: 8,
            x_offset: 0,
            y_offset: 0,
            x_advance: 5,
        });
    }
    glyphs.insert(' ', Glyph {
        id: ' ',
        x: 0,
        y: 0,
        width: 0,
        height: 0,
        x_offset: 0,
        y_offset: 0,
        x_advance: 5,
    });
    let atlas = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
    Arc::new(Font { glyphs, line_height: 10, atlas })
}

fn load_names() -> Vec<String> {
    match std::fs::read_to_string(NAMES_FILE) {
        Ok(raw) => raw.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect(),
        Err(_) => ["Ada", "Grace", "Edsger", "Barbara", "Donald", "Radia"]
            .into_iter()
            .map(String::from)
            .collect(),
    }
}

struct Picker {
    remaining: Vec<String>,
    seed: u64,
}

impl Picker {
    fn new(names: Vec<String>) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1);
        Self { remaining: names, seed }
    }

    /// Pick and remove one name; None once everyone has had a turn.
    fn pick(&mut self) -> Option<String> {
        if self.remaining.is_empty() {
            return None;
        }
        self.seed = self.seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let index = ((self.seed >> 33) as usize) % self.remaining.len();
        Some(self.remaining.swap_remove(index))
    }
}

fn main() -> easel::Result<()> {
    let mut win = GraphicsWindow::new(Headless::new(), 640, 360)?;
    win.set_background_color(Color::NAVY);

    let font = built_in_font();
    let mut prompt = TextLabel::new(Arc::clone(&font), 24.0, 20.0, 40.0, 600.0)?
        .with_text("Click to pick a name")
        .with_color(Color::WHITE);
    prompt.set_align(Align::Center);
    win.add(prompt);

    let mut name_label = TextLabel::new(font, 48.0, 20.0, win.center_y(), 600.0)?
        .with_color(Color::GOLD);
    name_label.set_align(Align::Center);
    let name_id = win.add(name_label);

    let mut picker = Picker::new(load_names());
    let total = picker.remaining.len();

    // Scripted session: one click per name, then a close request.
    while win.is_running() {
        if picker.remaining.is_empty() {
            win.backend_mut().push_event(Event::Quit);
        } else {
            win.backend_mut().push_event(Event::MouseDown {
                button: MouseButton::Left,
                pos: Vec2::new(320.0, 180.0),
            });
        }

        win.finish_frame();

        if win.was_mouse_pressed() {
            if let Some(name) = picker.pick() {
                println!("picked: {name}");
                win.label_mut(name_id)?.set_text(name);
            }
        }
    }

    println!("{total} names picked over {} ms", win.program_duration());
    Ok(())
}
