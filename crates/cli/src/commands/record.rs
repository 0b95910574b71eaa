//! `record` command implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use contracts::ToolConfig;
use motion_sampler::{ConstantMotionSource, MotionSampler, SamplerConfig};
use recorder::{MockVideoRecorder, SessionManager, SessionResult};
use tracing::{info, warn};

use super::print_json;
use crate::cli::RecordArgs;

/// Execute the `record` command
///
/// Records with the mock video recorder and a motion source at rest; the
/// output folder has the same layout as a device recording.
pub async fn run_record(args: &RecordArgs, config: &ToolConfig) -> Result<()> {
    if !(args.duration.is_finite() && args.duration > 0.0) {
        anyhow::bail!("--duration must be a positive number of seconds");
    }

    let root = args
        .root
        .clone()
        .unwrap_or_else(|| config.recording.root.clone());
    let rate = args.sample_rate.unwrap_or(config.recording.sample_rate_hz);
    if !(rate.is_finite() && rate > 0.0) {
        anyhow::bail!("sample rate must be positive");
    }

    let source = Arc::new(ConstantMotionSource::at_rest());
    let sampler = Arc::new(MotionSampler::new(source, SamplerConfig::with_rate(rate)));
    let mut manager = SessionManager::new(&root, MockVideoRecorder::default(), sampler.clone());

    let handle = manager
        .start_session()
        .await
        .context("Failed to start session")?;
    info!(
        session = %handle.session_id,
        folder = %handle.folder.display(),
        duration_s = args.duration,
        "Recording"
    );

    let capture = async {
        let total = Duration::from_secs_f64(args.duration);
        match args.reference_at {
            Some(at) if at >= 0.0 && at < args.duration => {
                tokio::time::sleep(Duration::from_secs_f64(at)).await;
                if let Err(e) = sampler.set_reference_frame() {
                    warn!(error = %e, "Could not set reference frame");
                }
                tokio::time::sleep(total.saturating_sub(Duration::from_secs_f64(at))).await;
            }
            Some(at) => {
                warn!(reference_at = at, "Reference time outside the recording, ignored");
                tokio::time::sleep(total).await;
            }
            None => tokio::time::sleep(total).await,
        }
    };

    tokio::select! {
        _ = capture => {}
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, finalizing session");
        }
    }

    let result = manager
        .stop_session(&handle)
        .await
        .context("Failed to finalize session")?;

    if args.json {
        print_json(&result)?;
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(result: &SessionResult) {
    println!("✓ Session recorded: {}", result.session_id);
    println!("   ├─ Folder: {}", result.folder.display());
    println!("   ├─ Video: {}", result.video_path.display());
    println!("   ├─ Motion: {}", result.motion_path.display());
    println!("   ├─ Samples: {}", result.sample_count);
    println!("   └─ Length: {:.3}s", result.elapsed_s);
}
