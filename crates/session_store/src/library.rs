//! Library browsing and removal

use std::fs;
use std::path::{Path, PathBuf};

use contracts::{display_name, SessionManifest, TrackingState};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Result, StoreError};
use crate::manifest::ManifestStore;

/// One library entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub name: String,
    /// Human-readable start time, or the folder name
    pub display_name: String,
    pub folder: PathBuf,
    pub state: TrackingState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<SessionManifest>,
    /// Set when the manifest could not be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
}

/// Folders of `root`, sorted by name
///
/// A missing root is an empty library. A malformed manifest is reported on
/// its entry rather than failing the listing.
pub fn list_sessions(root: &Path) -> Result<Vec<SessionSummary>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut sessions = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let folder = entry.path();
        if !folder.is_dir() {
            continue;
        }
        let Some(name) = folder.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        let (manifest, problem) = match ManifestStore::try_load(&folder) {
            Ok(manifest) => (manifest, None),
            Err(e) => {
                warn!(folder = %folder.display(), error = %e, "unreadable manifest");
                (None, Some(e.to_string()))
            }
        };

        sessions.push(SessionSummary {
            display_name: display_name(&name),
            state: TrackingState::from_manifest(manifest.as_ref()),
            name,
            folder,
            manifest,
            problem,
        });
    }

    sessions.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(sessions)
}

/// Resolve a session folder by name
///
/// Names are single path components; anything else is rejected.
pub fn session_folder(root: &Path, name: &str) -> Result<PathBuf> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\']);
    if !valid {
        return Err(StoreError::InvalidSessionName {
            name: name.to_string(),
        });
    }

    let folder = root.join(name);
    if !folder.is_dir() {
        return Err(StoreError::SessionNotFound {
            name: name.to_string(),
        });
    }
    Ok(folder)
}

/// Delete a session folder and everything in it
pub fn remove_session(root: &Path, name: &str) -> Result<PathBuf> {
    let folder = session_folder(root, name)?;
    fs::remove_dir_all(&folder)?;
    info!(folder = %folder.display(), "session removed");
    Ok(folder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_sessions(&dir.path().join("none")).unwrap().is_empty());
    }

    #[test]
    fn test_list_sorted_with_states() {
        let root = tempfile::tempdir().unwrap();
        for name in ["20240814-090507", "20240101-120000", "broken"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }
        fs::write(root.path().join("stray.txt"), b"").unwrap();

        let mut synced = SessionManifest::new("/src");
        synced.synced = true;
        ManifestStore::save(&root.path().join("20240814-090507"), &synced).unwrap();
        fs::write(root.path().join("broken").join("tracking.json"), b"nope").unwrap();

        let sessions = list_sessions(root.path()).unwrap();
        let names: Vec<_> = sessions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["20240101-120000", "20240814-090507", "broken"]);

        assert_eq!(sessions[0].state, TrackingState::Unimported);
        assert_eq!(sessions[1].state, TrackingState::Synced);
        assert_ne!(sessions[1].display_name, sessions[1].name);
        assert!(sessions[2].problem.is_some());
        assert_eq!(sessions[2].display_name, "broken");
    }

    #[test]
    fn test_session_folder_rejects_paths() {
        let root = tempfile::tempdir().unwrap();
        for bad in ["", "..", "a/b", "."] {
            assert!(matches!(
                session_folder(root.path(), bad),
                Err(StoreError::InvalidSessionName { .. })
            ));
        }
        assert!(matches!(
            session_folder(root.path(), "absent"),
            Err(StoreError::SessionNotFound { .. })
        ));
    }

    #[test]
    fn test_remove_session() {
        let root = tempfile::tempdir().unwrap();
        let folder = root.path().join("s");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("s.mov"), b"x").unwrap();

        remove_session(root.path(), "s").unwrap();
        assert!(!folder.exists());
    }
}
