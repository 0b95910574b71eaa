//! SessionManifest - per-session tracking file (`tracking.json`)
//!
//! The manifest is the sole persistent record of a session's desktop
//! processing state. Its absence means "not imported yet".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::MOTION_SCHEMA_VERSION;

/// File name of the manifest inside a session folder
pub const MANIFEST_FILE_NAME: &str = "tracking.json";

/// Label CSV associated with a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvEntry {
    /// File name (or path) of the CSV, unique within a manifest
    pub path: String,

    /// Distinct primary labels present in the file
    #[serde(default)]
    pub labels: Vec<String>,

    /// Timestamp of the first row (seconds, motion time base)
    #[serde(default)]
    pub mov_start_time: f64,

    /// Timestamp of the last row
    #[serde(default)]
    pub mov_end_time: f64,

    #[serde(default)]
    pub number_of_rows: u64,

    #[serde(default)]
    pub number_of_labelled_rows: u64,
}

/// Tracking manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionManifest {
    /// Import time (RFC 3339)
    pub imported_at: DateTime<Utc>,

    /// Folder the session was imported from
    #[serde(alias = "path", default)]
    pub source_path: String,

    /// Video and motion have been reconciled
    #[serde(default)]
    pub synced: bool,

    /// Video duration (seconds)
    #[serde(default)]
    pub mov_length: f64,

    /// Motion sample count
    #[serde(default)]
    pub json_length: u64,

    /// Timestamp of the first motion sample (seconds)
    #[serde(default)]
    pub first_motion_timestamp: f64,

    #[serde(default = "default_schema_version")]
    pub motion_schema_version: u32,

    /// Associated label CSVs, in attachment order
    #[serde(default)]
    pub csvs: Vec<CsvEntry>,
}

fn default_schema_version() -> u32 {
    MOTION_SCHEMA_VERSION
}

impl SessionManifest {
    /// Fresh manifest for a just-imported session
    pub fn new(source_path: impl Into<String>) -> Self {
        Self::imported_at(source_path, Utc::now())
    }

    /// Fresh manifest with an explicit import time
    pub fn imported_at(source_path: impl Into<String>, imported_at: DateTime<Utc>) -> Self {
        Self {
            imported_at,
            source_path: source_path.into(),
            synced: false,
            mov_length: 0.0,
            json_length: 0,
            first_motion_timestamp: 0.0,
            motion_schema_version: MOTION_SCHEMA_VERSION,
            csvs: Vec::new(),
        }
    }

    /// Find a CSV entry by path
    pub fn csv(&self, path: &str) -> Option<&CsvEntry> {
        self.csvs.iter().find(|c| c.path == path)
    }

    /// Associate a CSV
    ///
    /// An entry with the same path is replaced in place; a new path is
    /// appended. Returns `true` when an entry was replaced.
    pub fn upsert_csv(&mut self, entry: CsvEntry) -> bool {
        match self.csvs.iter_mut().find(|c| c.path == entry.path) {
            Some(existing) => {
                *existing = entry;
                true
            }
            None => {
                self.csvs.push(entry);
                false
            }
        }
    }
}

/// Desktop processing state of a session folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    /// No manifest
    Unimported,
    /// Manifest present, not yet reconciled
    Imported,
    /// Manifest present with `synced = true`
    Synced,
}

impl TrackingState {
    pub fn from_manifest(manifest: Option<&SessionManifest>) -> Self {
        match manifest {
            None => Self::Unimported,
            Some(m) if m.synced => Self::Synced,
            Some(_) => Self::Imported,
        }
    }

    /// Playback is only offered for reconciled sessions
    pub fn allows_playback(self) -> bool {
        matches!(self, Self::Synced)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unimported => "unimported",
            Self::Imported => "imported",
            Self::Synced => "synced",
        }
    }
}

impl std::fmt::Display for TrackingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
