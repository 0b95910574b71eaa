//! Layered error definitions
//!
//! Categorized by source: config / layout / video / codec

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Session Layout Errors =====
    /// Session identifier does not follow `yyyyMMdd-HHmmss`
    #[error("invalid session id '{value}': expected yyyyMMdd-HHmmss")]
    InvalidSessionId { value: String },

    /// A file expected in a session folder is unreadable or malformed
    #[error("malformed {kind} file '{}': {message}", path.display())]
    Malformed {
        kind: &'static str,
        path: PathBuf,
        message: String,
    },

    // ===== Video Recorder Errors =====
    /// Video recorder refused to start
    #[error("video recorder start error: {message}")]
    VideoStart { message: String },

    /// Video recorder failed to finalize the movie file
    #[error("video recorder finalize error: {message}")]
    VideoFinalize { message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create malformed-file error
    pub fn malformed(kind: &'static str, path: &Path, message: impl ToString) -> Self {
        Self::Malformed {
            kind,
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Create video start error
    pub fn video_start(message: impl Into<String>) -> Self {
        Self::VideoStart {
            message: message.into(),
        }
    }

    /// Create video finalize error
    pub fn video_finalize(message: impl Into<String>) -> Self {
        Self::VideoFinalize {
            message: message.into(),
        }
    }
}
