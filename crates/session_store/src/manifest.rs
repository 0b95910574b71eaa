//! ManifestStore - `tracking.json` persistence
//!
//! State machine:
//!
//! ```text
//! Unimported --import--> Imported --reconcile ok--> Synced
//!                           ^                          |
//!                           +---- reconcile failed ----+
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use contracts::{CsvEntry, SessionManifest, TrackingState, MANIFEST_FILE_NAME};
use tracing::{debug, info, instrument};

use crate::error::{Result, StoreError};

/// Manifest persistence
pub struct ManifestStore;

impl ManifestStore {
    /// Path of the manifest inside `folder`
    pub fn path(folder: &Path) -> PathBuf {
        folder.join(MANIFEST_FILE_NAME)
    }

    pub fn exists(folder: &Path) -> bool {
        Self::path(folder).is_file()
    }

    /// Read the manifest if present
    ///
    /// A present but unparsable file is an error, never `None`.
    pub fn try_load(folder: &Path) -> Result<Option<SessionManifest>> {
        let path = Self::path(folder);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::ManifestMalformed {
                folder: folder.to_path_buf(),
                message: e.to_string(),
            })
    }

    /// Read the manifest, which must exist
    pub fn load(folder: &Path) -> Result<SessionManifest> {
        Self::try_load(folder)?.ok_or_else(|| StoreError::ManifestNotFound {
            folder: folder.to_path_buf(),
        })
    }

    /// Read the existing manifest or write a default one
    ///
    /// Returns the manifest and whether it was created.
    #[instrument(skip_all, fields(folder = %folder.display()))]
    pub fn load_or_init(folder: &Path, source_path: &str) -> Result<(SessionManifest, bool)> {
        if let Some(existing) = Self::try_load(folder)? {
            debug!("keeping existing manifest");
            return Ok((existing, false));
        }

        let manifest = SessionManifest::new(source_path);
        Self::save(folder, &manifest)?;
        info!(source = source_path, "manifest created");
        Ok((manifest, true))
    }

    /// Write the manifest atomically (temp file + rename)
    pub fn save(folder: &Path, manifest: &SessionManifest) -> Result<()> {
        let path = Self::path(folder);
        let tmp = folder.join(format!("{MANIFEST_FILE_NAME}.tmp"));

        let content = serde_json::to_string_pretty(manifest).map_err(|e| {
            StoreError::ManifestMalformed {
                folder: folder.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Record a label CSV in the manifest
    ///
    /// A new path is appended; an existing path is replaced in place.
    pub fn attach_csv(folder: &Path, entry: CsvEntry) -> Result<SessionManifest> {
        let mut manifest = Self::load(folder)?;
        let path = entry.path.clone();
        let replaced = manifest.upsert_csv(entry);
        Self::save(folder, &manifest)?;
        info!(folder = %folder.display(), csv = %path, replaced, "label file attached");
        Ok(manifest)
    }

    /// Tracking state of a folder
    pub fn tracking_state(folder: &Path) -> Result<TrackingState> {
        Ok(TrackingState::from_manifest(Self::try_load(folder)?.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(path: &str) -> CsvEntry {
        CsvEntry {
            path: path.into(),
            labels: vec!["eating".into()],
            mov_start_time: 0.0,
            mov_end_time: 5.0,
            number_of_rows: 100,
            number_of_labelled_rows: 40,
        }
    }

    #[test]
    fn test_load_or_init_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, created) = ManifestStore::load_or_init(dir.path(), "/src/x").unwrap();

        assert!(created);
        assert!(!manifest.synced);
        assert_eq!(manifest.mov_length, 0.0);
        assert_eq!(manifest.json_length, 0);
        assert!(manifest.csvs.is_empty());
        assert!(ManifestStore::exists(dir.path()));
        assert_eq!(
            ManifestStore::tracking_state(dir.path()).unwrap(),
            TrackingState::Imported
        );
    }

    #[test]
    fn test_load_or_init_keeps_existing() {
        let dir = tempfile::tempdir().unwrap();
        let mut manifest = SessionManifest::new("/first");
        manifest.synced = true;
        manifest.upsert_csv(entry("a.csv"));
        ManifestStore::save(dir.path(), &manifest).unwrap();

        let (loaded, created) = ManifestStore::load_or_init(dir.path(), "/second").unwrap();
        assert!(!created);
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn test_malformed_is_never_defaulted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(ManifestStore::path(dir.path()), "{ not json").unwrap();

        let err = ManifestStore::load_or_init(dir.path(), "/src").unwrap_err();
        assert!(matches!(err, StoreError::ManifestMalformed { .. }));
        // File left untouched
        assert_eq!(
            fs::read_to_string(ManifestStore::path(dir.path())).unwrap(),
            "{ not json"
        );
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ManifestStore::load(dir.path()),
            Err(StoreError::ManifestNotFound { .. })
        ));
        assert_eq!(
            ManifestStore::tracking_state(dir.path()).unwrap(),
            TrackingState::Unimported
        );
    }

    #[test]
    fn test_two_csvs_round_trip_in_order() {
        let dir = tempfile::tempdir().unwrap();
        ManifestStore::load_or_init(dir.path(), "/src").unwrap();
        ManifestStore::attach_csv(dir.path(), entry("first.csv")).unwrap();
        ManifestStore::attach_csv(dir.path(), entry("second.csv")).unwrap();

        let loaded = ManifestStore::load(dir.path()).unwrap();
        let paths: Vec<_> = loaded.csvs.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, ["first.csv", "second.csv"]);

        // Re-attaching the first keeps its position
        let mut updated = entry("first.csv");
        updated.number_of_rows = 7;
        let loaded = ManifestStore::attach_csv(dir.path(), updated).unwrap();
        assert_eq!(loaded.csvs[0].number_of_rows, 7);
        assert_eq!(loaded.csvs[1].path, "second.csv");
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        ManifestStore::save(dir.path(), &SessionManifest::new("/src")).unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, ["tracking.json"]);
    }
}
