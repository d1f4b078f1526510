//! Channel-pooled audio playback.
//!
//! The [`Mixer`] owns a bounded pool of playback channels and the loaded
//! clips; a [`Sound`] is a lightweight handle pairing a clip with playback
//! policy (looping, uniqueness, caption, volume). Pool exhaustion and
//! uniqueness conflicts are expected outcomes and surface as `Ok(false)`,
//! never as errors. The actual device output sits behind [`AudioOutput`] so
//! the pool logic runs identically against hardware or a test double.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{EngineError, Result};

mod output;
pub use output::KiraOutput;

/// Hard ceiling on concurrently playing channels. The pool grows on demand
/// up to this count and never beyond.
pub const MAX_AUDIO_CHANNELS: usize = 8;

/// Identifies a clip loaded into a particular mixer. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(u64);

/// Device-facing half of the audio stack. Implemented by [`KiraOutput`] for
/// real hardware and by mocks in tests.
pub trait AudioOutput {
    type Clip: Clone;
    type Handle;

    fn load(&mut self, path: &Path) -> Result<Self::Clip>;

    /// Start a channel playing. Fails when no audio device is available.
    fn play(&mut self, clip: &Self::Clip, looping: bool, volume: f32) -> Result<Self::Handle>;

    fn pause(&mut self, handle: &mut Self::Handle);
    fn resume(&mut self, handle: &mut Self::Handle);
    fn stop(&mut self, handle: &mut Self::Handle);
    fn set_volume(&mut self, handle: &mut Self::Handle, volume: f32);

    /// The channel has played to completion (or was stopped) and its slot
    /// can be reclaimed.
    fn is_finished(&self, handle: &Self::Handle) -> bool;
}

/// Caption emission policy for hearing-accessible output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Captions {
    #[default]
    Off,
    /// `[SOUND] caption [action]` lines.
    Verbose,
    /// Caption text only.
    Short,
}

/// A playable sound: one clip, possibly many concurrent channel instances.
#[derive(Debug, Clone)]
pub struct Sound {
    clip: ClipId,
    pub looping: bool,
    /// A unique sound refuses a new play while at least one instance is
    /// still active.
    pub unique: bool,
    paused: bool,
    /// Shown when captions are enabled. Defaults to the clip's file name.
    pub caption: String,
    volume: f32,
}

impl Sound {
    pub fn clip(&self) -> ClipId {
        self.clip
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

struct Channel<H> {
    clip: ClipId,
    handle: H,
}

/// The audio channel manager. Explicitly owned context; there is no global
/// mixer state.
pub struct Mixer<A: AudioOutput> {
    output: A,
    clips: HashMap<ClipId, A::Clip>,
    channels: Vec<Channel<A::Handle>>,
    next_clip: u64,
    captions: Captions,
}

impl<A: AudioOutput> Mixer<A> {
    pub fn new(output: A) -> Self {
        Self {
            output,
            clips: HashMap::new(),
            channels: Vec::new(),
            next_clip: 0,
            captions: Captions::Off,
        }
    }

    pub fn set_captions(&mut self, captions: Captions) {
        self.captions = captions;
    }

    /// Load a clip from disk and wrap it in a [`Sound`] with default policy
    /// (single-shot, non-unique, full volume).
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Sound> {
        let path = path.as_ref();
        let clip = self.output.load(path)?;
        let id = ClipId(self.next_clip);
        self.next_clip += 1;
        self.clips.insert(id, clip);
        let caption = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Sound {
            clip: id,
            looping: false,
            unique: false,
            paused: false,
            caption,
            volume: 1.0,
        })
    }

    /// Start one more instance of `sound`.
    ///
    /// Returns `Ok(false)` without playing when the sound is unique and
    /// already active, or when the channel pool is at its ceiling. Playing
    /// while any instance of the sound is paused is a usage error.
    pub fn play(&mut self, sound: &Sound) -> Result<bool> {
        if sound.paused {
            return Err(EngineError::Playback(
                "cannot play a new instance while existing instances are paused; \
                 unpause first"
                    .into(),
            ));
        }
        self.reap_finished();

        if sound.unique && self.count_instances(sound.clip) > 0 {
            return Ok(false);
        }
        if self.channels.len() >= MAX_AUDIO_CHANNELS {
            return Ok(false);
        }

        let clip = self
            .clips
            .get(&sound.clip)
            .ok_or_else(|| EngineError::validation("sound belongs to a different mixer"))?;
        let handle = self.output.play(clip, sound.looping, sound.volume)?;
        self.channels.push(Channel { clip: sound.clip, handle });

        match self.captions {
            Captions::Off => {}
            Captions::Verbose => println!("[SOUND] {} [plays]", sound.caption),
            Captions::Short => println!("{}", sound.caption),
        }
        Ok(true)
    }

    /// Pause every channel currently playing this sound's clip.
    pub fn pause(&mut self, sound: &mut Sound) {
        for channel in self.channels.iter_mut().filter(|c| c.clip == sound.clip) {
            self.output.pause(&mut channel.handle);
        }
        sound.paused = true;
        match self.captions {
            Captions::Off => {}
            Captions::Verbose => println!("[SOUND] {} [pauses]", sound.caption),
            Captions::Short => println!("{} pauses", sound.caption),
        }
    }

    /// Resume every channel currently playing this sound's clip.
    pub fn unpause(&mut self, sound: &mut Sound) {
        for channel in self.channels.iter_mut().filter(|c| c.clip == sound.clip) {
            self.output.resume(&mut channel.handle);
        }
        sound.paused = false;
        match self.captions {
            Captions::Off => {}
            Captions::Verbose => println!("[SOUND] {} [unpauses]", sound.caption),
            Captions::Short => println!("{} unpauses", sound.caption),
        }
    }

    /// Stop and reclaim every channel currently playing this sound's clip.
    /// Also clears the paused flag.
    pub fn stop(&mut self, sound: &mut Sound) {
        for channel in self.channels.iter_mut().filter(|c| c.clip == sound.clip) {
            self.output.stop(&mut channel.handle);
        }
        self.channels.retain(|c| c.clip != sound.clip);
        sound.paused = false;
        match self.captions {
            Captions::Off => {}
            Captions::Verbose => println!("[SOUND] {} [stops]", sound.caption),
            Captions::Short => println!("{} stops", sound.caption),
        }
    }

    /// Set the sound's volume (0 to 1) and apply it to all of its currently
    /// active channels. Future plays use the new volume too.
    pub fn set_volume(&mut self, sound: &mut Sound, volume: f32) -> Result<()> {
        if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
            return Err(EngineError::validation(format!(
                "sound volume must be between 0 and 1 (got {volume})"
            )));
        }
        if self.captions != Captions::Off {
            let change = if volume < sound.volume {
                "gets quieter"
            } else if volume > sound.volume {
                "gets louder"
            } else {
                "stays the same volume"
            };
            let mut line = match self.captions {
                Captions::Short => format!("{} {change}", sound.caption),
                _ => format!("[SOUND] {} [{change} ({volume})]", sound.caption),
            };
            if self.num_copies(sound) == 0 {
                line.push_str(" (no audio: no copies of this sound are playing)");
            } else if sound.paused {
                line.push_str(" (no audio: this sound is currently paused)");
            }
            println!("{line}");
        }
        for channel in self.channels.iter_mut().filter(|c| c.clip == sound.clip) {
            self.output.set_volume(&mut channel.handle, volume);
        }
        sound.volume = volume;
        Ok(())
    }

    /// How many instances of this sound are currently active.
    pub fn num_copies(&self, sound: &Sound) -> usize {
        self.count_instances(sound.clip)
    }

    /// Total active channels across all sounds.
    pub fn active_channels(&self) -> usize {
        self.channels
            .iter()
            .filter(|c| !self.output.is_finished(&c.handle))
            .count()
    }

    fn count_instances(&self, clip: ClipId) -> usize {
        self.channels
            .iter()
            .filter(|c| c.clip == clip && !self.output.is_finished(&c.handle))
            .count()
    }

    fn reap_finished(&mut self) {
        let output = &self.output;
        self.channels.retain(|c| !output.is_finished(&c.handle));
    }
}
