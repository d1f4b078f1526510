//! Kira-backed audio device output.

use std::path::Path;

use kira::{
    Volume,
    manager::{AudioManager, AudioManagerSettings, backend::DefaultBackend},
    sound::{
        PlaybackState,
        static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    },
    tween::Tween,
};
use log::warn;

use crate::audio::AudioOutput;
use crate::error::{EngineError, Result};

/// Real audio output. Holds `None` when no audio device could be opened
/// (headless hosts, CI); playback then fails with a `Playback` error while
/// loading and pool bookkeeping keep working.
pub struct KiraOutput {
    manager: Option<AudioManager>,
}

impl KiraOutput {
    pub fn new() -> Self {
        let manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(m) => Some(m),
            Err(e) => {
                warn!("failed to initialize audio device: {e}; playback disabled");
                None
            }
        };
        Self { manager }
    }

    pub fn is_available(&self) -> bool {
        self.manager.is_some()
    }
}

impl Default for KiraOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for KiraOutput {
    type Clip = StaticSoundData;
    type Handle = StaticSoundHandle;

    fn load(&mut self, path: &Path) -> Result<StaticSoundData> {
        StaticSoundData::from_file(path).map_err(|e| {
            EngineError::ResourceLoad(format!("cannot load audio '{}': {e}", path.display()))
        })
    }

    fn play(&mut self, clip: &StaticSoundData, looping: bool, volume: f32) -> Result<StaticSoundHandle> {
        let manager = self
            .manager
            .as_mut()
            .ok_or_else(|| EngineError::Playback("no audio device is available".into()))?;
        let mut settings = if looping {
            StaticSoundSettings::new().loop_region(0.0..)
        } else {
            StaticSoundSettings::new()
        };
        settings.volume = Volume::Amplitude(volume as f64).into();
        manager
            .play(clip.clone().with_settings(settings))
            .map_err(|e| EngineError::Playback(e.to_string()))
    }

    fn pause(&mut self, handle: &mut StaticSoundHandle) {
        let _ = handle.pause(Tween::default());
    }

    fn resume(&mut self, handle: &mut StaticSoundHandle) {
        let _ = handle.resume(Tween::default());
    }

    fn stop(&mut self, handle: &mut StaticSoundHandle) {
        let _ = handle.stop(Tween::default());
    }

    fn set_volume(&mut self, handle: &mut StaticSoundHandle, volume: f32) {
        let _ = handle.set_volume(Volume::Amplitude(volume as f64), Tween::default());
    }

    fn is_finished(&self, handle: &StaticSoundHandle) -> bool {
        handle.state() == PlaybackState::Stopped
    }
}
