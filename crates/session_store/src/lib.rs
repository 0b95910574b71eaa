//! # Session Store
//!
//! Desktop side of a session's life.
//!
//! Responsibilities:
//! - Validate and import recorded session folders into a library
//! - Own the `tracking.json` manifest and its tracking state
//! - Attach and summarize label CSVs
//! - Reconcile video length against motion data
//! - Gate playback on the synced state
//!
//! A malformed manifest is always an error; it is never replaced by a
//! default one.

pub mod error;
pub mod import;
pub mod labels;
pub mod layout;
pub mod library;
pub mod manifest;
pub mod mov;
pub mod playback;
pub mod reconcile;

pub use aligner::{AlignedFrame, PlaybackAligner};
pub use contracts::{CsvEntry, LabelledRow, SessionManifest, TrackingState};
pub use error::{ArtifactKind, Result, StoreError};
pub use import::{import_session, import_sessions, ImportOutcome};
pub use labels::{attach_labels, read_label_csv, summarize_labels, write_label_csv};
pub use layout::{scan_session_dir, validate_session_dir, SessionFiles};
pub use library::{list_sessions, remove_session, session_folder, SessionSummary};
pub use manifest::ManifestStore;
pub use mov::read_duration;
pub use playback::{open_playback, PlaybackSession};
pub use reconcile::{check, reconcile, ReconcilePolicy, ReconcileReport};
