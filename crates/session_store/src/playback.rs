//! Playback gate: only synced sessions are opened

use std::path::{Path, PathBuf};

use aligner::PlaybackAligner;
use contracts::{read_motion_json, LabelledRow, MotionSample, SessionManifest, TrackingState};
use tracing::{debug, instrument, warn};

use crate::error::{Result, StoreError};
use crate::labels::{read_label_csv, sort_by_timestamp};
use crate::layout::scan_session_dir;
use crate::manifest::ManifestStore;

/// Everything needed to play a session back
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    pub folder: PathBuf,
    pub manifest: SessionManifest,
    pub video_path: PathBuf,
    pub samples: Vec<MotionSample>,
    /// Rows of the first attached CSV, sorted by timestamp
    pub labels: Option<Vec<LabelledRow>>,
    pub label_csv: Option<PathBuf>,
}

impl PlaybackSession {
    /// Video duration as recorded at reconciliation
    pub fn duration(&self) -> f64 {
        self.manifest.mov_length
    }

    /// Aligner over this session's data
    pub fn aligner(&self) -> PlaybackAligner<'_> {
        PlaybackAligner::new(&self.samples, self.labels.as_deref(), self.duration())
    }
}

/// Open a session for playback
///
/// # Errors
/// - `ManifestNotFound` / `NotSynced` when the session is not reconciled
/// - `MissingArtifacts` when the video or motion file disappeared
/// - `MotionMalformed` / `LabelsMalformed` on unparsable content
#[instrument(skip_all, fields(folder = %folder.display()))]
pub fn open_playback(folder: &Path) -> Result<PlaybackSession> {
    let manifest = ManifestStore::load(folder)?;
    let state = TrackingState::from_manifest(Some(&manifest));
    if !state.allows_playback() {
        return Err(StoreError::NotSynced {
            folder: folder.to_path_buf(),
            state,
        });
    }

    let files = scan_session_dir(folder)?;
    let (video, motion) = files.required()?;
    let samples = read_motion_json(motion)?;

    let (labels, label_csv) = match manifest.csvs.first() {
        Some(entry) => {
            let path = folder.join(&entry.path);
            if path.is_file() {
                let mut rows = read_label_csv(&path)?;
                sort_by_timestamp(&mut rows);
                (Some(rows), Some(path))
            } else {
                warn!(csv = %path.display(), "attached label file is missing");
                (None, None)
            }
        }
        None => (None, None),
    };

    debug!(
        samples = samples.len(),
        labels = labels.as_ref().map_or(0, Vec::len),
        "playback opened"
    );
    Ok(PlaybackSession {
        folder: folder.to_path_buf(),
        video_path: video.to_path_buf(),
        manifest,
        samples,
        labels,
        label_csv,
    })
}
