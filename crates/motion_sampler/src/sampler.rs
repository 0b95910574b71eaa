//! MotionSampler - fixed-cadence polling of a motion source
//!
//! A background thread ticks at the configured rate and stamps each reading
//! with the wall-clock time since the shared session start.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use contracts::{MotionSample, SharedMotionSource, DEFAULT_SAMPLE_RATE_HZ};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::engine::{SamplerCore, Tick};
use crate::error::{Result, SamplerError};
use crate::reference::ReferenceFrame;

/// Sampler configuration
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Polling rate (Hz)
    pub sample_rate_hz: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
        }
    }
}

impl SamplerConfig {
    pub fn with_rate(sample_rate_hz: f64) -> Self {
        Self { sample_rate_hz }
    }

    /// Nominal tick period
    pub fn period(&self) -> Duration {
        if self.sample_rate_hz > 0.0 && self.sample_rate_hz.is_finite() {
            Duration::from_secs_f64(1.0 / self.sample_rate_hz)
        } else {
            Duration::from_secs_f64(1.0 / DEFAULT_SAMPLE_RATE_HZ)
        }
    }
}

/// Observable sampler state
///
/// Receivers are woken when recording starts or stops and when motion
/// availability flips; `samples_collected` is kept current without waking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerStatus {
    pub recording: bool,
    pub motion_available: bool,
    pub samples_collected: usize,
}

struct Shared {
    core: Mutex<SamplerCore>,
    running: AtomicBool,
    status: watch::Sender<SamplerStatus>,
}

impl Shared {
    fn core(&self) -> MutexGuard<'_, SamplerCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Motion Sampler
///
/// # Example
///
/// ```ignore
/// let sampler = MotionSampler::new(source, SamplerConfig::default());
/// sampler.start_recording(Instant::now())?;
/// sampler.set_reference_frame()?;
/// // ...
/// let samples = sampler.stop_recording();
/// ```
pub struct MotionSampler {
    source: SharedMotionSource,
    config: SamplerConfig,
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl MotionSampler {
    pub fn new(source: SharedMotionSource, config: SamplerConfig) -> Self {
        let (status, _) = watch::channel(SamplerStatus {
            recording: false,
            motion_available: source.is_available(),
            samples_collected: 0,
        });

        Self {
            source,
            config,
            shared: Arc::new(Shared {
                core: Mutex::new(SamplerCore::new()),
                running: AtomicBool::new(false),
                status,
            }),
            worker: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Begin collecting samples relative to `start`
    ///
    /// Clears any previous buffer. Fails with `AlreadyRecording` when a
    /// recording is in progress.
    pub fn start_recording(&self, start: Instant) -> Result<()> {
        if self.shared.running.swap(true, Ordering::SeqCst) {
            return Err(SamplerError::AlreadyRecording);
        }

        self.shared.core().begin(start);
        self.shared.status.send_modify(|s| {
            s.recording = true;
            s.samples_collected = 0;
        });

        let shared = self.shared.clone();
        let source = self.source.clone();
        let period = self.config.period();

        let spawned = thread::Builder::new()
            .name("motion-sampler".into())
            .spawn(move || poll_loop(shared, source, period));

        match spawned {
            Ok(handle) => {
                *self.worker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
                info!(
                    sample_rate_hz = self.config.sample_rate_hz,
                    "motion sampler started"
                );
                Ok(())
            }
            Err(e) => {
                self.shared.running.store(false, Ordering::SeqCst);
                self.shared.core().finish();
                self.shared.status.send_modify(|s| s.recording = false);
                Err(SamplerError::Spawn(e))
            }
        }
    }

    /// Halt polling and return the collected samples
    ///
    /// Blocks until the polling thread has exited. Returns an empty vector
    /// when not recording.
    pub fn stop_recording(&self) -> Vec<MotionSample> {
        self.shared.running.store(false, Ordering::SeqCst);

        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("motion sampler thread panicked");
            }
        }

        let (samples, gaps) = {
            let mut core = self.shared.core();
            let gaps = core.gap_ticks();
            (core.finish(), gaps)
        };

        self.shared.status.send_modify(|s| {
            s.recording = false;
            s.samples_collected = samples.len();
        });

        info!(samples = samples.len(), gap_ticks = gaps, "motion sampler stopped");
        samples
    }

    /// Capture the current attitude as the reference frame
    ///
    /// Samples collected before this call keep their values.
    pub fn set_reference_frame(&self) -> Result<()> {
        if !self.source.is_available() {
            return Err(SamplerError::motion_unavailable("motion source not available"));
        }
        let raw = self
            .source
            .poll_current()
            .ok_or_else(|| SamplerError::motion_unavailable("no current motion reading"))?;

        self.shared
            .core()
            .set_reference(ReferenceFrame::capture(&raw.attitude));

        info!(
            roll = raw.attitude.roll,
            pitch = raw.attitude.pitch,
            yaw = raw.attitude.yaw,
            "reference frame set"
        );
        Ok(())
    }

    /// Drop the reference frame; later samples carry no transformed rotation
    pub fn clear_reference_frame(&self) {
        self.shared.core().clear_reference();
    }

    /// Whether the source currently delivers motion
    ///
    /// Also refreshes the observable availability flag.
    pub fn is_source_available(&self) -> bool {
        let available = self.source.is_available();
        self.shared.status.send_if_modified(|s| {
            let changed = s.motion_available != available;
            s.motion_available = available;
            changed
        });
        available
    }

    pub fn is_recording(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Snapshot of the current status
    pub fn status(&self) -> SamplerStatus {
        *self.shared.status.borrow()
    }

    /// Subscribe to status changes
    pub fn subscribe(&self) -> watch::Receiver<SamplerStatus> {
        self.shared.status.subscribe()
    }
}

impl Drop for MotionSampler {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::SeqCst);
    }
}

fn poll_loop(shared: Arc<Shared>, source: SharedMotionSource, period: Duration) {
    debug!(period_us = period.as_micros() as u64, "sampler thread running");

    let mut next_tick = Instant::now();
    let mut last_timestamp: Option<f64> = None;

    while shared.running.load(Ordering::Relaxed) {
        let now = Instant::now();
        let reading = if source.is_available() {
            source.poll_current()
        } else {
            None
        };

        let (tick, available, collected) = {
            let mut core = shared.core();
            let tick = core.tick(now, reading);
            (tick, core.motion_available(), core.samples().len())
        };

        match tick {
            Tick::Sampled { timestamp } => {
                observability::record_sample_collected();
                if let Some(last) = last_timestamp {
                    observability::record_sample_interval_ms((timestamp - last) * 1000.0);
                }
                last_timestamp = Some(timestamp);
            }
            Tick::Gap => observability::record_sensor_gap(),
            Tick::Idle => {}
        }

        shared.status.send_if_modified(|s| {
            let changed = s.motion_available != available;
            if changed {
                observability::record_motion_available(available);
            }
            s.motion_available = available;
            s.samples_collected = collected;
            changed
        });

        next_tick += period;
        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        } else {
            // Fell behind; do not burst to catch up
            next_tick = now;
        }
    }

    debug!("sampler thread exited");
}
