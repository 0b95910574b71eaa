//! `align` command implementation.

use anyhow::Result;
use contracts::{LabelledRow, MotionSample, ToolConfig};
use serde::Serialize;
use session_store::{open_playback, AlignedFrame};

use super::{library_root, print_json, resolve_session};
use crate::cli::AlignArgs;

/// Aligned frame plus the rows it points at
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlignOutput<'a> {
    #[serde(flatten)]
    frame: AlignedFrame,
    duration: f64,
    sample_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample: Option<&'a MotionSample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<LabelOutput<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LabelOutput<'a> {
    timestamp: f64,
    primary_label: &'a str,
    secondary_label: &'a str,
    body_activity: &'a str,
    mouth_activity: &'a str,
}

impl<'a> From<&'a LabelledRow> for LabelOutput<'a> {
    fn from(row: &'a LabelledRow) -> Self {
        Self {
            timestamp: row.timestamp(),
            primary_label: &row.primary_label,
            secondary_label: &row.secondary_label,
            body_activity: &row.body_activity,
            mouth_activity: &row.mouth_activity,
        }
    }
}

/// Execute the `align` command
pub fn run_align(args: &AlignArgs, config: &ToolConfig) -> Result<()> {
    let folder = resolve_session(&args.session, &library_root(&args.library, config))?;
    let playback = open_playback(&folder)?;
    let aligner = playback.aligner();

    let frame = match (args.position, args.time) {
        (_, Some(time)) => aligner.align_time(time),
        (Some(position), None) => aligner.align(position),
        (None, None) => anyhow::bail!("either --position or --time is required"),
    };

    let output = AlignOutput {
        frame,
        duration: aligner.duration(),
        sample_count: aligner.sample_count(),
        sample: aligner.sample(&frame),
        label: aligner.label(&frame).map(LabelOutput::from),
    };

    if args.json {
        return print_json(&output);
    }

    println!(
        "⏱  position {:.4} -> {:.3}s of {:.3}s",
        frame.position, frame.time, output.duration
    );
    match output.sample {
        Some(sample) => {
            let index = frame.sample_index.unwrap_or_default();
            println!(
                "   ├─ Sample {}/{} at {:.3}s: roll {:.3} pitch {:.3} yaw {:.3}",
                index, output.sample_count, sample.timestamp,
                sample.attitude.roll, sample.attitude.pitch, sample.attitude.yaw
            );
            if let Some(q) = &sample.transformed_rotation {
                println!(
                    "   ├─ Relative rotation: x {:.4} y {:.4} z {:.4} w {:.4}",
                    q.x, q.y, q.z, q.w
                );
            }
        }
        None => println!("   ├─ No motion samples"),
    }
    match &output.label {
        Some(label) => println!(
            "   └─ Label at {:.3}s: {} / {} / {} / {}",
            label.timestamp,
            label.primary_label,
            label.secondary_label,
            label.body_activity,
            label.mouth_activity
        ),
        None => println!("   └─ No labels"),
    }
    Ok(())
}
