//! SessionManager - coordinated video + motion capture
//!
//! One session at a time. Both producers share a single start instant;
//! stopping waits for both before the motion JSON is written next to the
//! movie.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use contracts::{write_motion_json, MotionSample, SessionId, VideoRecorder};
use motion_sampler::MotionSampler;
use observability::{IntervalStats, SessionOutcome};
use serde::Serialize;
use tokio::task::JoinError;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{Result, SessionError};

/// Seconds tried before giving up on a free session id
const ALLOCATE_ATTEMPTS: u32 = 3;

/// Identifies the active session to `stop_session`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub session_id: SessionId,
    pub folder: PathBuf,
    pub started_at: DateTime<Local>,
}

/// Outcome of a completed session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub session_id: SessionId,
    pub folder: PathBuf,
    pub video_path: PathBuf,
    pub motion_path: PathBuf,
    pub sample_count: usize,
    pub started_at: DateTime<Local>,
    /// Wall-clock length of the session (seconds)
    pub elapsed_s: f64,
}

struct ActiveSession {
    handle: SessionHandle,
    start: Instant,
}

/// Recording Session Manager
///
/// # Example
///
/// ```ignore
/// let mut manager = SessionManager::new(root, MockVideoRecorder::default(), sampler);
/// let handle = manager.start_session().await?;
/// // ...
/// let result = manager.stop_session(&handle).await?;
/// println!("{} samples", result.sample_count);
/// ```
pub struct SessionManager<V> {
    root: PathBuf,
    video: V,
    sampler: Arc<MotionSampler>,
    active: Option<ActiveSession>,
}

impl<V: VideoRecorder> SessionManager<V> {
    pub fn new(root: impl Into<PathBuf>, video: V, sampler: Arc<MotionSampler>) -> Self {
        Self {
            root: root.into(),
            video,
            sampler,
            active: None,
        }
    }

    /// Directory session folders are created in
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sampler(&self) -> &Arc<MotionSampler> {
        &self.sampler
    }

    pub fn video(&self) -> &V {
        &self.video
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_session(&self) -> Option<&SessionHandle> {
        self.active.as_ref().map(|a| &a.handle)
    }

    /// Start a session
    ///
    /// # Errors
    /// - `AlreadyRecording` while a session is active
    /// - `NoVideoConnection` before any side effect
    /// - `SessionExists` when every tried second already holds a finalized session
    /// - `FolderCreation` when the session folder cannot be created
    /// - `VideoStart` / `Sampler` when a producer refuses to start
    #[instrument(name = "session_start", skip(self), fields(root = %self.root.display()))]
    pub async fn start_session(&mut self) -> Result<SessionHandle> {
        if self.active.is_some() {
            return Err(SessionError::AlreadyRecording);
        }
        if !self.video.has_video_connection() {
            return Err(SessionError::NoVideoConnection);
        }

        let (session_id, started_at, folder) = self.allocate_session().await?;
        let start = Instant::now();

        if folder.is_dir() {
            warn!(folder = %folder.display(), "session folder already exists, reusing it");
        } else {
            std::fs::create_dir_all(&folder)
                .map_err(|e| SessionError::folder_creation(&folder, e))?;
        }

        let video_path = folder.join(session_id.movie_file_name());
        self.video
            .start_recording(&video_path)
            .map_err(|source| SessionError::VideoStart {
                session_id: session_id.clone(),
                source,
            })?;

        if let Err(e) = self.sampler.start_recording(start) {
            error!(error = %e, "motion sampler failed to start, stopping video");
            if let Err(stop_err) = self.video.stop_recording().await {
                warn!(error = %stop_err, "video stop after failed start also failed");
            }
            return Err(e.into());
        }

        let handle = SessionHandle {
            session_id,
            folder,
            started_at,
        };
        self.active = Some(ActiveSession {
            handle: handle.clone(),
            start,
        });

        observability::record_session_started();
        info!(session_id = %handle.session_id, "recording session started");
        Ok(handle)
    }

    /// Pick a session id whose folder holds no finalized artifacts
    ///
    /// Ids have one-second resolution. A second already taken by a finished
    /// session is skipped by waiting for the next one.
    async fn allocate_session(&self) -> Result<(SessionId, DateTime<Local>, PathBuf)> {
        let mut attempt = 0;
        loop {
            let started_at = Local::now();
            let session_id = SessionId::from_start(&started_at);
            let folder = self.root.join(session_id.as_str());
            if !has_artifacts(&folder, &session_id) {
                return Ok((session_id, started_at, folder));
            }

            attempt += 1;
            if attempt >= ALLOCATE_ATTEMPTS {
                return Err(SessionError::SessionExists { session_id, folder });
            }
            debug!(session_id = %session_id, "session id taken, waiting for the next second");
            let nanos = 1_000_000_000 - started_at.timestamp_subsec_nanos().min(999_999_999);
            tokio::time::sleep(Duration::from_nanos(u64::from(nanos))).await;
        }
    }

    /// Stop the active session
    ///
    /// Both producers are stopped concurrently and awaited. The motion JSON
    /// is written even when video finalization fails.
    ///
    /// # Errors
    /// - `NotRecording` without an active session
    /// - `HandleMismatch` for a handle of another session
    /// - `SamplerStopped` when the sampler's stop task failed; no motion file is written
    /// - `MotionWrite` when the motion file cannot be written
    /// - `VideoFinalize` when the movie could not be finalized
    #[instrument(name = "session_stop", skip(self, handle), fields(session_id = %handle.session_id))]
    pub async fn stop_session(&mut self, handle: &SessionHandle) -> Result<SessionResult> {
        let Some(active) = self.active.as_ref() else {
            return Err(SessionError::NotRecording);
        };
        if active.handle.session_id != handle.session_id {
            return Err(SessionError::HandleMismatch {
                active: active.handle.session_id.clone(),
                got: handle.session_id.clone(),
            });
        }
        let Some(ActiveSession { handle, start }) = self.active.take() else {
            return Err(SessionError::NotRecording);
        };

        let sampler = Arc::clone(&self.sampler);
        let (video_result, samples) = tokio::join!(self.video.stop_recording(), async move {
            tokio::task::spawn_blocking(move || sampler.stop_recording()).await
        });
        let elapsed_s = start.elapsed().as_secs_f64();

        let samples = match collect_samples(samples, &handle.session_id) {
            Ok(samples) => samples,
            Err(e) => {
                observability::record_session_finished(SessionOutcome::MotionFailed, 0);
                if let Err(video_err) = &video_result {
                    error!(error = %video_err, "video finalization also failed");
                }
                return Err(e);
            }
        };
        let sample_count = samples.len();

        let period = self.sampler.config().period().as_secs_f64();
        let stats = IntervalStats::from_samples(&samples, period).summary();
        info!(
            samples = sample_count,
            effective_rate_hz = stats.effective_rate_hz,
            gaps = stats.gap_count,
            "motion capture summary"
        );

        let motion_path = handle.folder.join(handle.session_id.motion_file_name());
        if let Err(source) = write_motion_json(&motion_path, &samples) {
            observability::record_session_finished(SessionOutcome::MotionFailed, sample_count);
            if let Err(video_err) = &video_result {
                error!(error = %video_err, "video finalization also failed");
            }
            return Err(SessionError::MotionWrite {
                session_id: handle.session_id,
                source,
            });
        }

        let video_path = match video_result {
            Ok(path) => path,
            Err(source) => {
                observability::record_session_finished(SessionOutcome::VideoFailed, sample_count);
                error!(
                    error = %source,
                    motion_path = %motion_path.display(),
                    "video finalization failed, motion data saved"
                );
                return Err(SessionError::VideoFinalize {
                    session_id: handle.session_id,
                    motion_path,
                    source,
                });
            }
        };

        observability::record_session_finished(SessionOutcome::Finalized, sample_count);
        info!(
            video = %video_path.display(),
            motion = %motion_path.display(),
            samples = sample_count,
            elapsed_s,
            "recording session finalized"
        );

        Ok(SessionResult {
            session_id: handle.session_id,
            folder: handle.folder,
            video_path,
            motion_path,
            sample_count,
            started_at: handle.started_at,
            elapsed_s,
        })
    }
}

/// Whether `folder` already holds the movie or motion file of `session_id`
fn has_artifacts(folder: &Path, session_id: &SessionId) -> bool {
    folder.join(session_id.movie_file_name()).exists()
        || folder.join(session_id.motion_file_name()).exists()
}

fn collect_samples(
    joined: std::result::Result<Vec<MotionSample>, JoinError>,
    session_id: &SessionId,
) -> Result<Vec<MotionSample>> {
    joined.map_err(|source| {
        error!(error = %source, "motion sampler stop task failed");
        SessionError::SamplerStopped {
            session_id: session_id.clone(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_video::{MockVideoConfig, MockVideoRecorder};
    use contracts::read_motion_json;
    use motion_sampler::{ConstantMotionSource, SamplerConfig};

    fn sampler() -> Arc<MotionSampler> {
        Arc::new(MotionSampler::new(
            Arc::new(ConstantMotionSource::at_rest()),
            SamplerConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_stop_without_start() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = SessionManager::new(dir.path(), MockVideoRecorder::default(), sampler());
        let handle = SessionHandle {
            session_id: SessionId::parse("20240814-090507").unwrap(),
            folder: dir.path().join("20240814-090507"),
            started_at: Local::now(),
        };

        let err = manager.stop_session(&handle).await.unwrap_err();
        assert!(matches!(err, SessionError::NotRecording));
    }

    #[tokio::test]
    async fn test_no_video_connection_has_no_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = sampler();
        let mut manager =
            SessionManager::new(dir.path(), MockVideoRecorder::disconnected(), sampler.clone());

        let err = manager.start_session().await.unwrap_err();
        assert!(matches!(err, SessionError::NoVideoConnection));
        assert!(!manager.is_recording());
        assert!(!sampler.is_recording());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_full_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = SessionManager::new(dir.path(), MockVideoRecorder::default(), sampler());

        let handle = manager.start_session().await.unwrap();
        assert!(manager.is_recording());
        assert_eq!(manager.active_session(), Some(&handle));
        tokio::time::sleep(Duration::from_millis(50)).await;

        let result = manager.stop_session(&handle).await.unwrap();
        assert!(!manager.is_recording());

        let id = handle.session_id.as_str();
        assert_eq!(result.folder, dir.path().join(id));
        assert_eq!(result.video_path, result.folder.join(format!("{id}.mov")));
        assert_eq!(result.motion_path, result.folder.join(format!("{id}.json")));
        assert!(result.video_path.is_file());

        let samples = read_motion_json(&result.motion_path).unwrap();
        assert_eq!(samples.len(), result.sample_count);
        assert!(result.sample_count > 0);
        assert!(samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_second_start_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = SessionManager::new(dir.path(), MockVideoRecorder::default(), sampler());

        let handle = manager.start_session().await.unwrap();
        let err = manager.start_session().await.unwrap_err();
        assert!(matches!(err, SessionError::AlreadyRecording));
        manager.stop_session(&handle).await.unwrap();
    }

    #[tokio::test]
    async fn test_handle_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = SessionManager::new(dir.path(), MockVideoRecorder::default(), sampler());

        let handle = manager.start_session().await.unwrap();
        let stale = SessionHandle {
            session_id: SessionId::parse("20000101-000000").unwrap(),
            ..handle.clone()
        };

        let err = manager.stop_session(&stale).await.unwrap_err();
        assert!(matches!(err, SessionError::HandleMismatch { .. }));
        assert!(manager.is_recording());
        manager.stop_session(&handle).await.unwrap();
    }

    #[tokio::test]
    async fn test_video_failure_still_writes_motion() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = SessionManager::new(dir.path(), MockVideoRecorder::failing(), sampler());

        let handle = manager.start_session().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        match manager.stop_session(&handle).await {
            Err(SessionError::VideoFinalize {
                session_id,
                motion_path,
                ..
            }) => {
                assert_eq!(session_id, handle.session_id);
                assert!(motion_path.is_file());
                assert!(!read_motion_json(&motion_path).unwrap().is_empty());
            }
            other => panic!("expected VideoFinalize, got {other:?}"),
        }
        assert!(!manager.is_recording());
    }

    #[tokio::test]
    async fn test_sampler_busy_rolls_back_video() {
        let dir = tempfile::tempdir().unwrap();
        let sampler = sampler();
        sampler.start_recording(Instant::now()).unwrap();

        let mut manager = SessionManager::new(
            dir.path(),
            MockVideoRecorder::new(MockVideoConfig::default()),
            sampler.clone(),
        );
        let err = manager.start_session().await.unwrap_err();
        assert!(matches!(err, SessionError::Sampler(_)));
        assert!(!manager.is_recording());
        assert!(!manager.video().is_recording());

        sampler.stop_recording();
    }

    #[tokio::test]
    async fn test_folder_creation_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the root directory should be
        let root = dir.path().join("not-a-dir");
        std::fs::write(&root, b"").unwrap();

        let sampler = sampler();
        let mut manager = SessionManager::new(&root, MockVideoRecorder::default(), sampler.clone());
        let err = manager.start_session().await.unwrap_err();
        assert!(matches!(err, SessionError::FolderCreation { .. }));
        assert!(!sampler.is_recording());
        assert!(!manager.video().is_recording());
    }

    async fn wait_for_second_boundary() {
        let nanos = 1_000_000_000 - Local::now().timestamp_subsec_nanos().min(999_999_999);
        tokio::time::sleep(Duration::from_nanos(u64::from(nanos))).await;
    }

    #[tokio::test]
    async fn test_back_to_back_sessions_keep_first_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = SessionManager::new(dir.path(), MockVideoRecorder::default(), sampler());

        // Both sessions start inside the same wall-clock second
        wait_for_second_boundary().await;
        let handle = manager.start_session().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let first = manager.stop_session(&handle).await.unwrap();
        let first_motion = std::fs::read(&first.motion_path).unwrap();
        let first_video = std::fs::read(&first.video_path).unwrap();

        let handle = manager.start_session().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = manager.stop_session(&handle).await.unwrap();

        assert_ne!(first.session_id, second.session_id);
        assert_ne!(first.motion_path, second.motion_path);
        assert_eq!(std::fs::read(&first.motion_path).unwrap(), first_motion);
        assert_eq!(std::fs::read(&first.video_path).unwrap(), first_video);
        assert_eq!(
            read_motion_json(&first.motion_path).unwrap().len(),
            first.sample_count
        );
    }

    #[tokio::test]
    async fn test_taken_seconds_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let now = Local::now();
        for offset in -1..=6 {
            let id = SessionId::from_start(&(now + chrono::Duration::seconds(offset)));
            let folder = dir.path().join(id.as_str());
            std::fs::create_dir_all(&folder).unwrap();
            std::fs::write(folder.join(id.motion_file_name()), b"[]").unwrap();
        }

        let sampler = sampler();
        let mut manager = SessionManager::new(dir.path(), MockVideoRecorder::default(), sampler.clone());
        let err = manager.start_session().await.unwrap_err();
        assert!(matches!(err, SessionError::SessionExists { .. }));
        assert!(!manager.is_recording());
        assert!(!sampler.is_recording());
        assert!(!manager.video().is_recording());
    }

    #[tokio::test]
    async fn test_failed_sampler_join_is_an_error() {
        let joined = tokio::task::spawn_blocking(|| -> Vec<MotionSample> {
            panic!("sampler thread blew up")
        })
        .await;
        let id = SessionId::parse("20240814-090507").unwrap();

        match collect_samples(joined, &id) {
            Err(SessionError::SamplerStopped { session_id, .. }) => assert_eq!(session_id, id),
            other => panic!("expected SamplerStopped, got {other:?}"),
        }
        let ok = collect_samples(Ok(vec![MotionSample::zeroed(0.0)]), &id).unwrap();
        assert_eq!(ok.len(), 1);
    }
}
