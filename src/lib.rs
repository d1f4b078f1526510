//! A retained-mode 2D presentation engine: an ordered scene of sprites and
//! text labels, frame-synchronized animation and layout, per-frame input
//! capture, and channel-pooled audio.

pub mod audio;
pub mod backend;
pub mod color;
pub mod drawable;
pub mod error;
pub mod geometry;
pub mod input;
pub mod raster;
pub mod scene;
pub mod sheet;
pub mod sprite;
pub mod text;
pub mod window;

pub use audio::{Captions, KiraOutput, Mixer, Sound, MAX_AUDIO_CHANNELS};
pub use backend::{Backend, Headless};
pub use color::Color;
pub use drawable::{Body, Drawable};
pub use error::{EngineError, Result};
pub use geometry::Rect;
pub use input::{Event, FrameInput, KeyCode, MouseButton};
pub use scene::{DrawList, ObjectId};
pub use sheet::ImageSheet;
pub use sprite::{AnimationRate, Sprite};
pub use text::{Align, Font, TextLabel};
pub use window::GraphicsWindow;
