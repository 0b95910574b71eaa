//! PlaybackAligner - aligned view over one session

use contracts::{LabelledRow, MotionSample};
use serde::Serialize;

use crate::{clamp_position, label_index, playback_time, sample_index};

/// Indices aligned to one playback position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedFrame {
    /// Clamped playback position in `[0, 1]`
    pub position: f64,
    /// Playback time (seconds)
    pub time: f64,
    pub sample_index: Option<usize>,
    pub label_index: Option<usize>,
}

/// Aligns playback positions against a session's motion and labels
///
/// Borrowed, immutable view: `align` can be called from any number of
/// places without coordination.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackAligner<'a> {
    samples: &'a [MotionSample],
    labels: Option<&'a [LabelledRow]>,
    duration: f64,
}

impl<'a> PlaybackAligner<'a> {
    /// `labels` must be sorted by timestamp
    pub fn new(
        samples: &'a [MotionSample],
        labels: Option<&'a [LabelledRow]>,
        duration: f64,
    ) -> Self {
        Self {
            samples,
            labels,
            duration,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Align a playback position
    ///
    /// The label row is matched on the playback time, so labels follow the
    /// motion time base.
    pub fn align(&self, position: f64) -> AlignedFrame {
        let position = clamp_position(position);
        let time = playback_time(position, self.duration);
        AlignedFrame {
            position,
            time,
            sample_index: sample_index(position, self.samples.len()),
            label_index: self.labels.and_then(|rows| label_index(rows, time)),
        }
    }

    /// Align a playback time (seconds)
    pub fn align_time(&self, time: f64) -> AlignedFrame {
        let position = if self.duration.is_finite() && self.duration > 0.0 {
            time / self.duration
        } else {
            0.0
        };
        self.align(position)
    }

    pub fn sample(&self, frame: &AlignedFrame) -> Option<&'a MotionSample> {
        frame.sample_index.and_then(|i| self.samples.get(i))
    }

    pub fn label(&self, frame: &AlignedFrame) -> Option<&'a LabelledRow> {
        let rows = self.labels?;
        frame.label_index.and_then(|i| rows.get(i))
    }
}
