//! Recording Session Manager error types

use std::path::PathBuf;

use contracts::{ContractError, SessionId};
use motion_sampler::SamplerError;
use thiserror::Error;

/// Recording session error
#[derive(Debug, Error)]
pub enum SessionError {
    /// No video output is connected; nothing was started
    #[error("no video connection available")]
    NoVideoConnection,

    /// `start_session` while a session is active
    #[error("a recording session is already active")]
    AlreadyRecording,

    /// `stop_session` without an active session
    #[error("no active recording session")]
    NotRecording,

    /// `stop_session` with a handle from another session
    #[error("session handle '{got}' does not match active session '{active}'")]
    HandleMismatch { active: SessionId, got: SessionId },

    /// Every tried second already holds a finalized session; nothing was started
    #[error("session '{session_id}' already has recorded files in '{}'", folder.display())]
    SessionExists {
        session_id: SessionId,
        folder: PathBuf,
    },

    /// Session folder could not be created; nothing was started
    #[error("failed to create session folder '{}': {source}", path.display())]
    FolderCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Video recorder refused to start; the sampler was not started
    #[error("failed to start video for session '{session_id}': {source}")]
    VideoStart {
        session_id: SessionId,
        #[source]
        source: ContractError,
    },

    /// Motion sampler failed to start; the video was stopped again
    #[error("failed to start motion sampler: {0}")]
    Sampler(#[from] SamplerError),

    /// Video finalization failed; the motion file was still written
    #[error(
        "video finalization failed for session '{session_id}' (motion saved to '{}'): {source}",
        motion_path.display()
    )]
    VideoFinalize {
        session_id: SessionId,
        motion_path: PathBuf,
        #[source]
        source: ContractError,
    },

    /// The sampler's stop task did not complete; no motion file was written
    #[error("motion sampler did not stop cleanly for session '{session_id}': {source}")]
    SamplerStopped {
        session_id: SessionId,
        #[source]
        source: tokio::task::JoinError,
    },

    /// Motion JSON could not be written
    #[error("failed to write motion data for session '{session_id}': {source}")]
    MotionWrite {
        session_id: SessionId,
        #[source]
        source: ContractError,
    },

    /// Wrapped ContractError
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl SessionError {
    /// Create folder creation error
    pub fn folder_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FolderCreation {
            path: path.into(),
            source,
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, SessionError>;
