//! Video / motion reconciliation
//!
//! A session is marked synced only when its motion data plausibly covers the
//! same span as its video.

use std::path::Path;

use contracts::{read_motion_json, MotionSample, ReconcileConfig};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::error::{Result, StoreError};
use crate::layout::{scan_session_dir, SessionFiles};
use crate::manifest::ManifestStore;
use crate::mov::read_duration;

/// Reconciliation thresholds (seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcilePolicy {
    /// Maximum `|movLength - lastTimestamp|`
    pub duration_tolerance_s: f64,
    /// Maximum timestamp of the first sample
    pub max_start_offset_s: f64,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            duration_tolerance_s: 1.0,
            max_start_offset_s: 1.0,
        }
    }
}

impl From<&ReconcileConfig> for ReconcilePolicy {
    fn from(config: &ReconcileConfig) -> Self {
        Self {
            duration_tolerance_s: config.duration_tolerance_s,
            max_start_offset_s: config.max_start_offset_s,
        }
    }
}

/// Measurements and verdict of one reconciliation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub mov_length: f64,
    pub json_length: u64,
    pub first_motion_timestamp: f64,
    pub last_motion_timestamp: f64,
    /// Empty when synced
    pub reasons: Vec<String>,
}

impl ReconcileReport {
    pub fn is_synced(&self) -> bool {
        self.reasons.is_empty()
    }
}

/// Check measured lengths against the policy
pub fn check(mov_length: f64, samples: &[MotionSample], policy: &ReconcilePolicy) -> ReconcileReport {
    let first = samples.first().map_or(0.0, |s| s.timestamp);
    let last = samples.last().map_or(0.0, |s| s.timestamp);
    let mut reasons = Vec::new();

    if samples.is_empty() {
        reasons.push("motion file has no samples".to_string());
    }

    if let Some(i) = samples
        .windows(2)
        .position(|w| w[1].timestamp < w[0].timestamp)
    {
        reasons.push(format!(
            "timestamps decrease at sample {} ({} -> {})",
            i + 1,
            samples[i].timestamp,
            samples[i + 1].timestamp
        ));
    }

    if !samples.is_empty() && first > policy.max_start_offset_s {
        reasons.push(format!(
            "first sample at {first:.3}s exceeds start offset {:.3}s",
            policy.max_start_offset_s
        ));
    }

    if !samples.is_empty() && (mov_length - last).abs() > policy.duration_tolerance_s {
        reasons.push(format!(
            "video length {mov_length:.3}s and motion length {last:.3}s differ by more than {:.3}s",
            policy.duration_tolerance_s
        ));
    }

    ReconcileReport {
        mov_length,
        json_length: samples.len() as u64,
        first_motion_timestamp: first,
        last_motion_timestamp: last,
        reasons,
    }
}

fn measure(files: &SessionFiles, policy: &ReconcilePolicy) -> Result<ReconcileReport> {
    let (video, motion) = files.required()?;
    let mov_length = read_duration(video)?;
    let samples = read_motion_json(motion)?;
    Ok(check(mov_length, &samples, policy))
}

/// Reconcile an imported session and persist the outcome
///
/// The measured lengths are written to the manifest either way; `synced`
/// is only set when every check passes.
#[instrument(skip_all, fields(folder = %folder.display()))]
pub fn reconcile(folder: &Path, policy: &ReconcilePolicy) -> Result<ReconcileReport> {
    let mut manifest = ManifestStore::load(folder)?;
    let files = scan_session_dir(folder)?;

    let report = match measure(&files, policy) {
        Ok(report) => report,
        Err(e) => {
            observability::metrics::record_reconcile(false);
            return Err(e);
        }
    };

    manifest.mov_length = report.mov_length;
    manifest.json_length = report.json_length;
    manifest.first_motion_timestamp = report.first_motion_timestamp;
    manifest.synced = report.is_synced();
    ManifestStore::save(folder, &manifest)?;
    observability::metrics::record_reconcile(manifest.synced);

    if manifest.synced {
        info!(
            mov_length = report.mov_length,
            samples = report.json_length,
            "session synced"
        );
        Ok(report)
    } else {
        warn!(reasons = ?report.reasons, "reconciliation failed");
        Err(StoreError::ReconcileFailed {
            folder: folder.to_path_buf(),
            reasons: report.reasons,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(timestamps: &[f64]) -> Vec<MotionSample> {
        timestamps.iter().map(|&t| MotionSample::zeroed(t)).collect()
    }

    #[test]
    fn test_check_passes() {
        let motion = samples(&[0.0, 0.005, 0.01, 9.8]);
        let report = check(10.0, &motion, &ReconcilePolicy::default());
        assert!(report.is_synced(), "{:?}", report.reasons);
        assert_eq!(report.json_length, 4);
        assert_eq!(report.last_motion_timestamp, 9.8);
    }

    #[test]
    fn test_check_empty() {
        let report = check(10.0, &[], &ReconcilePolicy::default());
        assert_eq!(report.reasons.len(), 1);
        assert!(report.reasons[0].contains("no samples"));
    }

    #[test]
    fn test_check_decreasing() {
        let report = check(1.0, &samples(&[0.0, 0.5, 0.4, 1.0]), &ReconcilePolicy::default());
        assert!(!report.is_synced());
        assert!(report.reasons[0].contains("sample 2"));
    }

    #[test]
    fn test_check_start_offset_and_length() {
        let report = check(30.0, &samples(&[2.0, 3.0]), &ReconcilePolicy::default());
        assert_eq!(report.reasons.len(), 2);
    }

    #[test]
    fn test_tolerance_from_config() {
        let policy = ReconcilePolicy::from(&ReconcileConfig {
            duration_tolerance_s: 5.0,
            max_start_offset_s: 0.0,
        });
        assert!(check(14.0, &samples(&[0.0, 10.0]), &policy).is_synced());
        assert!(!check(16.0, &samples(&[0.0, 10.0]), &policy).is_synced());
    }
}
