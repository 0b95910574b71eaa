//! Importing session folders into the library

use std::fs;
use std::path::{Path, PathBuf};

use contracts::SessionManifest;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, StoreError};
use crate::layout::validate_session_dir;
use crate::manifest::ManifestStore;

/// Result of importing one folder
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    /// Folder name inside the library
    pub name: String,
    pub folder: PathBuf,
    pub manifest: SessionManifest,
    /// Whether a new manifest was written
    pub created: bool,
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn same_contents(a: &Path, b: &Path) -> Result<bool> {
    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(false);
    }
    Ok(fs::read(a)? == fs::read(b)?)
}

/// Copy `file` into `folder`; returns whether the library copy changed
fn copy_into(file: &Path, folder: &Path) -> Result<bool> {
    let name = file.file_name().ok_or_else(|| StoreError::InvalidSessionName {
        name: file.display().to_string(),
    })?;
    let destination = folder.join(name);
    if same_file(file, &destination) {
        debug!(file = %file.display(), "already in library");
        return Ok(false);
    }
    if destination.is_file() && same_contents(file, &destination)? {
        debug!(file = %file.display(), "library copy is up to date");
        return Ok(false);
    }
    fs::copy(file, &destination)?;
    Ok(true)
}

/// Import a recorded session folder into `library_root`
///
/// The video and motion files are copied into `<library_root>/<folder name>/`
/// and a manifest is created there unless one already exists. Importing a
/// folder that already lives in the library only ensures the manifest.
/// A re-import that replaces the video or motion file clears `synced`; label
/// files recorded in the manifest are kept.
#[instrument(skip_all, fields(source = %source.display()))]
pub fn import_session(source: &Path, library_root: &Path) -> Result<ImportOutcome> {
    let result = import_inner(source, library_root);
    observability::metrics::record_import(result.is_ok());
    match &result {
        Ok(outcome) => info!(
            name = %outcome.name,
            created = outcome.created,
            "session imported"
        ),
        Err(e) => warn!(error = %e, "import failed"),
    }
    result
}

fn import_inner(source: &Path, library_root: &Path) -> Result<ImportOutcome> {
    let files = validate_session_dir(source)?;
    let (video, motion) = files.required()?;
    let name = files
        .name()
        .ok_or_else(|| StoreError::InvalidSessionName {
            name: source.display().to_string(),
        })?
        .to_string();

    let folder = library_root.join(&name);
    fs::create_dir_all(&folder).map_err(StoreError::Io)?;

    let video_changed = copy_into(video, &folder)?;
    let motion_changed = copy_into(motion, &folder)?;

    let source_path = fs::canonicalize(source)
        .unwrap_or_else(|_| source.to_path_buf())
        .display()
        .to_string();
    let (mut manifest, created) = ManifestStore::load_or_init(&folder, &source_path)?;

    // Replaced data has not been reconciled yet
    if manifest.synced && (video_changed || motion_changed) {
        warn!(
            folder = %folder.display(),
            video_changed,
            motion_changed,
            "re-import replaced session data, reconcile again before playback"
        );
        manifest.synced = false;
        ManifestStore::save(&folder, &manifest)?;
    }

    Ok(ImportOutcome {
        name,
        folder,
        manifest,
        created,
    })
}

/// Import several folders, one result per source
///
/// A failing folder does not stop the others.
pub fn import_sessions<P: AsRef<Path>>(
    sources: &[P],
    library_root: &Path,
) -> Vec<(PathBuf, Result<ImportOutcome>)> {
    sources
        .iter()
        .map(|source| {
            let source = source.as_ref();
            (source.to_path_buf(), import_session(source, library_root))
        })
        .collect()
}
