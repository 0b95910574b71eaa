//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - Contract snapshots (file formats shared by both sides)
//! - Mock e2e flow: record -> import -> reconcile -> attach -> align
//! - Failure paths that span crates

#[cfg(test)]
mod contract_tests {
    use contracts::{MotionSample, SessionManifest, ToolConfig, TransformedRotation};

    #[test]
    fn test_motion_sample_field_names() {
        let mut sample = MotionSample::zeroed(0.005);
        let json = serde_json::to_value(sample).unwrap();
        for key in ["timestamp", "attitude", "rotationRate", "userAcceleration", "gravity"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json.get("transformedRotation").is_none());

        sample.transformed_rotation = Some(TransformedRotation {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        });
        let json = serde_json::to_value(sample).unwrap();
        assert_eq!(json["transformedRotation"]["w"], 1.0);
    }

    #[test]
    fn test_empty_motion_sequence_serializes() {
        let samples: Vec<MotionSample> = Vec::new();
        assert_eq!(serde_json::to_string(&samples).unwrap(), "[]");
        assert_eq!(aligner::sample_index(0.5, samples.len()), None);
    }

    #[test]
    fn test_manifest_from_foreign_writer() {
        // Written by another tool: unknown keys and legacy `path`
        let json = r#"{
            "importedAt": "2024-08-14T10:00:00Z",
            "path": "/Volumes/device/20240814-090507",
            "synced": false,
            "movLength": 0,
            "jsonLength": 0,
            "csvs": [{"path": "a.csv", "labels": ["x"], "movStartTime": 0, "movEndTime": 1,
                      "numberOfRows": 2, "numberOfLabelledRows": 1}],
            "extra": true
        }"#;
        let manifest: SessionManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.csvs.len(), 1);
        assert_eq!(manifest.source_path, "/Volumes/device/20240814-090507");
    }

    #[test]
    fn test_default_config_is_valid() {
        config_loader::ConfigLoader::validate(&ToolConfig::default()).unwrap();
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{read_motion_json, LabelledRow, TrackingState};
    use motion_sampler::{ConstantMotionSource, MotionSampler, SamplerConfig};
    use pretty_assertions::assert_eq;
    use recorder::{MockVideoRecorder, SessionManager, SessionResult};
    use session_store::{
        attach_labels, import_session, list_sessions, open_playback, reconcile,
        write_label_csv, ArtifactKind, ManifestStore, ReconcilePolicy, StoreError,
    };

    async fn record(root: &Path, length: Duration) -> SessionResult {
        let source = Arc::new(ConstantMotionSource::at_rest());
        let sampler = Arc::new(MotionSampler::new(source, SamplerConfig::default()));
        let mut manager = SessionManager::new(root, MockVideoRecorder::default(), sampler.clone());

        let handle = manager.start_session().await.unwrap();
        tokio::time::sleep(length / 2).await;
        sampler.set_reference_frame().unwrap();
        tokio::time::sleep(length / 2).await;
        manager.stop_session(&handle).await.unwrap()
    }

    fn label_rows(samples: &[contracts::MotionSample]) -> Vec<LabelledRow> {
        samples
            .iter()
            .step_by(10)
            .enumerate()
            .map(|(i, sample)| LabelledRow {
                sample: *sample,
                primary_label: if i % 2 == 0 { "idle" } else { "nodding" }.into(),
                secondary_label: String::new(),
                body_activity: "sitting".into(),
                mouth_activity: String::new(),
            })
            .collect()
    }

    /// End-to-end: record -> import -> reconcile -> attach -> align
    #[tokio::test]
    async fn test_e2e_record_to_playback() {
        let device = tempfile::tempdir().unwrap();
        let library = tempfile::tempdir().unwrap();

        // 1. Record
        let result = record(device.path(), Duration::from_millis(300)).await;
        assert!(result.video_path.is_file());
        assert!(result.sample_count > 0);
        let samples = read_motion_json(&result.motion_path).unwrap();
        assert_eq!(samples.len(), result.sample_count);
        assert!(samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        // Reference set halfway: early samples untouched, late ones projected
        assert!(samples.first().unwrap().transformed_rotation.is_none());
        assert!(samples.last().unwrap().transformed_rotation.is_some());

        // 2. Import
        let outcome = import_session(&result.folder, library.path()).unwrap();
        assert!(outcome.created);
        assert_eq!(outcome.name, result.session_id.as_str());
        assert_eq!(
            ManifestStore::tracking_state(&outcome.folder).unwrap(),
            TrackingState::Imported
        );

        // Playback is gated until reconciled
        assert!(matches!(
            open_playback(&outcome.folder),
            Err(StoreError::NotSynced { .. })
        ));

        // 3. Reconcile
        let report = reconcile(&outcome.folder, &ReconcilePolicy::default()).unwrap();
        assert_eq!(report.json_length as usize, result.sample_count);
        let manifest = ManifestStore::load(&outcome.folder).unwrap();
        assert!(manifest.synced);
        assert!((manifest.mov_length - result.elapsed_s).abs() < 0.5);

        // 4. Attach labels
        let csv = device.path().join("labels.csv");
        write_label_csv(&csv, &label_rows(&samples)).unwrap();
        let manifest = attach_labels(&outcome.folder, &csv).unwrap();
        assert_eq!(manifest.csvs.len(), 1);
        assert!(manifest.csvs[0].labels.contains(&"idle".to_string()));
        assert!(manifest.synced, "attaching labels keeps the synced state");

        // 5. Align
        let playback = open_playback(&outcome.folder).unwrap();
        let aligner = playback.aligner();
        let frame = aligner.align(1.0);
        assert_eq!(frame.sample_index, Some(samples.len() - 1));
        assert!(aligner.label(&frame).is_some());
        let frame = aligner.align(0.0);
        assert_eq!(frame.sample_index, Some(0));
        assert_eq!(frame.label_index, Some(0));

        let sessions = list_sessions(library.path()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].state, TrackingState::Synced);
    }

    /// Manifest with two label files survives a re-import unchanged
    #[tokio::test]
    async fn test_reimport_keeps_two_csvs() {
        let device = tempfile::tempdir().unwrap();
        let library = tempfile::tempdir().unwrap();
        let result = record(device.path(), Duration::from_millis(100)).await;
        let samples = read_motion_json(&result.motion_path).unwrap();

        let outcome = import_session(&result.folder, library.path()).unwrap();
        for name in ["first.csv", "second.csv"] {
            let csv = device.path().join(name);
            write_label_csv(&csv, &label_rows(&samples)).unwrap();
            attach_labels(&outcome.folder, &csv).unwrap();
        }
        let before = ManifestStore::load(&outcome.folder).unwrap();

        let again = import_session(&result.folder, library.path()).unwrap();
        assert!(!again.created);
        assert_eq!(again.manifest, before);
        let paths: Vec<_> = again.manifest.csvs.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, ["first.csv", "second.csv"]);
    }

    #[test]
    fn test_import_reports_each_missing_artifact() {
        let device = tempfile::tempdir().unwrap();
        let library = tempfile::tempdir().unwrap();

        let no_movie = device.path().join("no_movie");
        fs::create_dir(&no_movie).unwrap();
        fs::write(no_movie.join("no_movie.json"), "[]").unwrap();

        let no_motion = device.path().join("no_motion");
        fs::create_dir(&no_motion).unwrap();
        fs::write(no_motion.join("no_motion.mov"), "").unwrap();

        let empty = device.path().join("empty");
        fs::create_dir(&empty).unwrap();

        let err = import_session(&no_movie, library.path()).unwrap_err();
        assert!(err.is_missing(ArtifactKind::Video) && !err.is_missing(ArtifactKind::Motion));

        let err = import_session(&no_motion, library.path()).unwrap_err();
        assert!(err.is_missing(ArtifactKind::Motion) && !err.is_missing(ArtifactKind::Video));

        let err = import_session(&empty, library.path()).unwrap_err();
        assert!(err.is_missing(ArtifactKind::Motion) && err.is_missing(ArtifactKind::Video));
    }

    /// A movie far longer than the motion data is not synced
    #[tokio::test]
    async fn test_reconcile_length_mismatch() {
        let device = tempfile::tempdir().unwrap();
        let library = tempfile::tempdir().unwrap();
        let result = record(device.path(), Duration::from_millis(100)).await;

        // Replace the movie with one declaring 60 s
        recorder::mock_video::write_quicktime(&result.video_path, Duration::from_secs(60))
            .unwrap();
        let outcome = import_session(&result.folder, library.path()).unwrap();

        let err = reconcile(&outcome.folder, &ReconcilePolicy::default()).unwrap_err();
        assert!(matches!(err, StoreError::ReconcileFailed { .. }));

        let manifest = ManifestStore::load(&outcome.folder).unwrap();
        assert!(!manifest.synced);
        assert_eq!(manifest.mov_length, 60.0);
        assert_eq!(manifest.json_length as usize, result.sample_count);
    }

    #[tokio::test]
    async fn test_stop_without_start() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = Arc::new(MotionSampler::new(
            Arc::new(ConstantMotionSource::at_rest()),
            SamplerConfig::default(),
        ));
        let mut manager = SessionManager::new(dir.path(), MockVideoRecorder::default(), sampler);
        let mut other = SessionManager::new(
            dir.path().join("other"),
            MockVideoRecorder::default(),
            Arc::new(MotionSampler::new(
                Arc::new(ConstantMotionSource::at_rest()),
                SamplerConfig::default(),
            )),
        );

        let handle = other.start_session().await.unwrap();
        assert!(matches!(
            manager.stop_session(&handle).await,
            Err(recorder::SessionError::NotRecording)
        ));
        other.stop_session(&handle).await.unwrap();
    }
}
