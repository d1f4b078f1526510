use thiserror::Error;

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

/// Everything that can go wrong inside the engine.
///
/// Validation failures are raised at the offending call and leave prior
/// state untouched. Expected audio outcomes (pool exhausted, uniqueness
/// conflict) are not errors; those surface as `Ok(false)` from the mixer.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Bad constructor or setter argument. State is unchanged.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// Layer operation on an object that is not in the draw list.
    #[error("object is not in the scene")]
    NotInScene,

    /// Audio misuse or device failure (play while paused, no device).
    #[error("playback error: {0}")]
    Playback(String),

    /// Missing or corrupt asset file.
    #[error("resource load failed: {0}")]
    ResourceLoad(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Sidecar sheet metadata or font glyph map failed to parse.
    #[error("metadata parse failed: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
