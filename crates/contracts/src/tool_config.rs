//! ToolConfig - configuration of the session-sync tools
//!
//! Every section has serde defaults, so an empty file is a valid
//! configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Nominal motion sampling rate (Hz)
pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 200.0;

/// Top-level tool configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default)]
    pub recording: RecordingConfig,

    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub reconcile: ReconcileConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Capture side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Directory new session folders are created in
    #[serde(default = "default_recording_root")]
    pub root: PathBuf,

    #[serde(default = "default_sample_rate_hz")]
    pub sample_rate_hz: f64,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            root: default_recording_root(),
            sample_rate_hz: default_sample_rate_hz(),
        }
    }
}

fn default_recording_root() -> PathBuf {
    PathBuf::from("recordings")
}

fn default_sample_rate_hz() -> f64 {
    DEFAULT_SAMPLE_RATE_HZ
}

/// Desktop library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Directory imported sessions are copied into
    #[serde(default = "default_library_root")]
    pub root: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: default_library_root(),
        }
    }
}

fn default_library_root() -> PathBuf {
    PathBuf::from("library")
}

/// Video/motion reconciliation tolerances (seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Allowed difference between video duration and last motion timestamp
    #[serde(default = "default_one_second")]
    pub duration_tolerance_s: f64,

    /// Latest acceptable timestamp of the first motion sample
    #[serde(default = "default_one_second")]
    pub max_start_offset_s: f64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            duration_tolerance_s: default_one_second(),
            max_start_offset_s: default_one_second(),
        }
    }
}

fn default_one_second() -> f64 {
    1.0
}

/// Log output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `trace` | `debug` | `info` | `warn` | `error`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` | `pretty` | `compact`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}
