//! Session Store error types

use std::fmt;
use std::path::PathBuf;

use contracts::{ContractError, TrackingState};
use thiserror::Error;

/// Required artifact of a session folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// `.mov` movie
    Video,
    /// Motion `.json` (any `.json` other than `tracking.json`)
    Motion,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => f.write_str("video (.mov)"),
            Self::Motion => f.write_str("motion data (.json)"),
        }
    }
}

/// Session Store error
#[derive(Debug, Error)]
pub enum StoreError {
    // ===== Layout =====
    #[error("directory '{}' does not exist", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// One entry per missing artifact, so each kind can be reported
    #[error("directory '{}' is missing {}", path.display(), join_missing(missing))]
    MissingArtifacts {
        path: PathBuf,
        missing: Vec<ArtifactKind>,
    },

    #[error("session '{name}' not found in library")]
    SessionNotFound { name: String },

    #[error("invalid session folder name '{name}'")]
    InvalidSessionName { name: String },

    // ===== Manifest =====
    #[error("session '{}' has not been imported (no tracking.json)", folder.display())]
    ManifestNotFound { folder: PathBuf },

    /// Never silently replaced with defaults
    #[error("tracking.json in '{}' is malformed: {message}", folder.display())]
    ManifestMalformed { folder: PathBuf, message: String },

    // ===== Content =====
    #[error("motion file '{}' is malformed: {message}", path.display())]
    MotionMalformed { path: PathBuf, message: String },

    #[error("label file '{}' is malformed: {message}", path.display())]
    LabelsMalformed { path: PathBuf, message: String },

    #[error("movie '{}' is unreadable: {message}", path.display())]
    VideoMalformed { path: PathBuf, message: String },

    // ===== Tracking state =====
    #[error("session '{}' is {state}, playback requires a synced session", folder.display())]
    NotSynced {
        folder: PathBuf,
        state: TrackingState,
    },

    #[error("reconciliation of '{}' failed: {}", folder.display(), reasons.join("; "))]
    ReconcileFailed {
        folder: PathBuf,
        reasons: Vec<String>,
    },

    // ===== General =====
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Contract(ContractError),
}

fn join_missing(missing: &[ArtifactKind]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" and ")
}

impl From<ContractError> for StoreError {
    fn from(err: ContractError) -> Self {
        match err {
            ContractError::Malformed {
                kind: "motion",
                path,
                message,
            } => Self::MotionMalformed { path, message },
            ContractError::Io(e) => Self::Io(e),
            other => Self::Contract(other),
        }
    }
}

impl StoreError {
    /// Whether the error names the given missing artifact
    pub fn is_missing(&self, kind: ArtifactKind) -> bool {
        matches!(self, Self::MissingArtifacts { missing, .. } if missing.contains(&kind))
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, StoreError>;
