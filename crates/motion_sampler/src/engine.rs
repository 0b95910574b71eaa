//! SamplerCore - synchronous tick engine
//!
//! Owns the sample buffer and the active reference frame. The polling
//! thread drives it with `Instant::now()`; tests drive it with synthetic
//! instants.

use std::time::Instant;

use contracts::{MotionSample, RawMotion};
use tracing::{info, warn};

use crate::reference::ReferenceFrame;

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// A sample was appended at this timestamp
    Sampled { timestamp: f64 },
    /// No reading this tick; nothing appended
    Gap,
    /// Not recording
    Idle,
}

/// Tick engine state
#[derive(Debug, Default)]
pub struct SamplerCore {
    start: Option<Instant>,
    samples: Vec<MotionSample>,
    reference: Option<ReferenceFrame>,
    motion_available: bool,
    gap_ticks: u64,
}

impl SamplerCore {
    pub fn new() -> Self {
        Self {
            motion_available: true,
            ..Self::default()
        }
    }

    /// Start a fresh buffer anchored at `start`
    ///
    /// The reference frame survives across recordings.
    pub fn begin(&mut self, start: Instant) {
        self.start = Some(start);
        self.samples.clear();
        self.gap_ticks = 0;
    }

    /// Process one polling tick
    ///
    /// The timestamp is the wall-clock delta since `start`, clamped so the
    /// sequence never decreases.
    pub fn tick(&mut self, now: Instant, reading: Option<RawMotion>) -> Tick {
        let Some(start) = self.start else {
            return Tick::Idle;
        };

        let Some(raw) = reading else {
            self.gap_ticks += 1;
            if self.motion_available {
                warn!(
                    elapsed_s = now.saturating_duration_since(start).as_secs_f64(),
                    "motion reading unavailable, skipping ticks until it returns"
                );
            }
            self.motion_available = false;
            return Tick::Gap;
        };

        if !self.motion_available {
            info!(gap_ticks = self.gap_ticks, "motion reading restored");
            self.motion_available = true;
        }

        let elapsed = now.saturating_duration_since(start).as_secs_f64();
        let timestamp = match self.samples.last() {
            Some(last) if elapsed < last.timestamp => {
                warn!(
                    elapsed,
                    last = last.timestamp,
                    "clock anomaly, clamping motion timestamp"
                );
                last.timestamp
            }
            _ => elapsed,
        };

        let mut sample = MotionSample::from_raw(timestamp, raw);
        if let Some(frame) = &self.reference {
            sample.transformed_rotation = Some(frame.project(&raw.attitude));
        }
        self.samples.push(sample);

        Tick::Sampled { timestamp }
    }

    /// Replace the reference frame; only samples after this call see it
    pub fn set_reference(&mut self, frame: ReferenceFrame) {
        self.reference = Some(frame);
    }

    pub fn clear_reference(&mut self) {
        self.reference = None;
    }

    pub fn reference(&self) -> Option<&ReferenceFrame> {
        self.reference.as_ref()
    }

    /// End the recording and hand over the buffer
    pub fn finish(&mut self) -> Vec<MotionSample> {
        self.start = None;
        std::mem::take(&mut self.samples)
    }

    pub fn samples(&self) -> &[MotionSample] {
        &self.samples
    }

    pub fn is_recording(&self) -> bool {
        self.start.is_some()
    }

    pub fn motion_available(&self) -> bool {
        self.motion_available
    }

    /// Ticks without a reading in the current recording
    pub fn gap_ticks(&self) -> u64 {
        self.gap_ticks
    }
}
