//! Motion Sampler error types

use contracts::ContractError;
use thiserror::Error;

/// Motion Sampler specific error
#[derive(Debug, Error)]
pub enum SamplerError {
    /// `start_recording` while a recording is in progress
    #[error("motion sampler is already recording")]
    AlreadyRecording,

    /// No motion reading could be obtained
    #[error("motion data unavailable: {message}")]
    MotionUnavailable { message: String },

    /// Polling thread could not be spawned
    #[error("failed to spawn sampler thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// Wrapped ContractError
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl SamplerError {
    /// Create motion unavailable error
    pub fn motion_unavailable(message: impl Into<String>) -> Self {
        Self::MotionUnavailable {
            message: message.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, SamplerError>;
