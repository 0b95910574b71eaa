//! Session folder layout
//!
//! ```text
//! <folder>/
//!     <id>.mov         video
//!     <id>.json        motion samples
//!     tracking.json    manifest (after import)
//!     *.csv            label files (optional)
//! ```

use std::path::{Path, PathBuf};

use contracts::MANIFEST_FILE_NAME;
use tracing::debug;

use crate::error::{ArtifactKind, Result, StoreError};

/// Files found in a session folder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionFiles {
    pub dir: PathBuf,
    pub video: Option<PathBuf>,
    pub motion: Option<PathBuf>,
    /// Sorted by file name
    pub labels: Vec<PathBuf>,
    pub manifest: Option<PathBuf>,
}

impl SessionFiles {
    /// Required artifacts that are absent
    pub fn missing(&self) -> Vec<ArtifactKind> {
        let mut missing = Vec::new();
        if self.video.is_none() {
            missing.push(ArtifactKind::Video);
        }
        if self.motion.is_none() {
            missing.push(ArtifactKind::Motion);
        }
        missing
    }

    /// Video and motion paths, or `MissingArtifacts`
    pub fn required(&self) -> Result<(&Path, &Path)> {
        match (&self.video, &self.motion) {
            (Some(video), Some(motion)) => Ok((video.as_path(), motion.as_path())),
            _ => Err(StoreError::MissingArtifacts {
                path: self.dir.clone(),
                missing: self.missing(),
            }),
        }
    }

    /// Folder name
    pub fn name(&self) -> Option<&str> {
        self.dir.file_name().and_then(|n| n.to_str())
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Prefer the file named after the folder, else the first candidate
fn pick(candidates: Vec<PathBuf>, preferred: Option<String>) -> Option<PathBuf> {
    if let Some(preferred) = preferred {
        if let Some(hit) = candidates
            .iter()
            .find(|p| p.file_name().and_then(|n| n.to_str()) == Some(preferred.as_str()))
        {
            return Some(hit.clone());
        }
    }
    candidates.into_iter().next()
}

/// Classify the entries of a session folder
///
/// `.mov` is video, `tracking.json` is the manifest, any other `.json` is
/// motion data, `.csv` are labels. When several candidates exist, the one
/// named after the folder wins.
pub fn scan_session_dir(dir: &Path) -> Result<SessionFiles> {
    if !dir.is_dir() {
        return Err(StoreError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut videos = Vec::new();
    let mut motions = Vec::new();
    let mut labels = Vec::new();
    let mut manifest = None;

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_manifest = path.file_name().and_then(|n| n.to_str()) == Some(MANIFEST_FILE_NAME);

        if is_manifest {
            manifest = Some(path);
        } else if has_extension(&path, "mov") {
            videos.push(path);
        } else if has_extension(&path, "json") {
            motions.push(path);
        } else if has_extension(&path, "csv") {
            labels.push(path);
        }
    }

    videos.sort();
    motions.sort();
    labels.sort();

    let stem = dir.file_name().and_then(|n| n.to_str()).map(str::to_string);
    let files = SessionFiles {
        dir: dir.to_path_buf(),
        video: pick(videos, stem.as_ref().map(|s| format!("{s}.mov"))),
        motion: pick(motions, stem.as_ref().map(|s| format!("{s}.json"))),
        labels,
        manifest,
    };

    debug!(
        dir = %dir.display(),
        video = ?files.video,
        motion = ?files.motion,
        labels = files.labels.len(),
        "session folder scanned"
    );
    Ok(files)
}

/// Scan and require both the video and the motion file
///
/// # Errors
/// - `DirectoryNotFound`
/// - `MissingArtifacts` listing every missing kind
pub fn validate_session_dir(dir: &Path) -> Result<SessionFiles> {
    let files = scan_session_dir(dir)?;
    files.required()?;
    Ok(files)
}
