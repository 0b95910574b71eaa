//! Session metrics
//!
//! Facade recording for the sampler, the recording session manager and the
//! desktop store, plus in-memory interval statistics for a finished session.

use contracts::MotionSample;
use metrics::{counter, gauge, histogram};

/// Record one motion sample appended to the buffer
pub fn record_sample_collected() {
    counter!("session_sync_motion_samples_total").increment(1);
}

/// Record a sampler tick without a reading
pub fn record_sensor_gap() {
    counter!("session_sync_motion_gaps_total").increment(1);
}

/// Record the current motion availability
pub fn record_motion_available(available: bool) {
    gauge!("session_sync_motion_available").set(if available { 1.0 } else { 0.0 });
}

/// Record the wall-clock interval between two consecutive samples
pub fn record_sample_interval_ms(interval_ms: f64) {
    histogram!("session_sync_motion_interval_ms").record(interval_ms);
}

/// Record a session start
pub fn record_session_started() {
    counter!("session_sync_sessions_started_total").increment(1);
    gauge!("session_sync_session_active").set(1.0);
}

/// How a recording session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Video and motion both written
    Finalized,
    /// Motion written, video finalization failed
    VideoFailed,
    /// Motion file could not be written
    MotionFailed,
}

impl SessionOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Finalized => "finalized",
            Self::VideoFailed => "video_failed",
            Self::MotionFailed => "motion_failed",
        }
    }
}

/// Record a session stop
pub fn record_session_finished(outcome: SessionOutcome, sample_count: usize) {
    counter!(
        "session_sync_sessions_finished_total",
        "outcome" => outcome.as_str()
    )
    .increment(1);
    gauge!("session_sync_session_active").set(0.0);
    histogram!("session_sync_session_samples").record(sample_count as f64);
}

/// Record a desktop import attempt
pub fn record_import(success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!("session_sync_imports_total", "status" => status).increment(1);
}

/// Record a reconciliation attempt
pub fn record_reconcile(success: bool) {
    let status = if success { "synced" } else { "rejected" };
    counter!("session_sync_reconciliations_total", "status" => status).increment(1);
}

/// Inter-sample interval statistics of a recorded session
///
/// Summarises the delivered sampling rate and its jitter. Intervals longer
/// than twice the nominal period are counted as gaps.
#[derive(Debug, Clone, Default)]
pub struct IntervalStats {
    /// Interval statistics (milliseconds)
    intervals_ms: RunningStats,
    nominal_period_s: f64,
    sample_count: u64,
    gap_count: u64,
    first_timestamp: f64,
    last_timestamp: f64,
}

impl IntervalStats {
    /// Create an empty aggregator for the given nominal period (seconds)
    pub fn new(nominal_period_s: f64) -> Self {
        Self {
            nominal_period_s,
            ..Self::default()
        }
    }

    /// Build from a sample sequence
    pub fn from_samples(samples: &[MotionSample], nominal_period_s: f64) -> Self {
        let mut stats = Self::new(nominal_period_s);
        for sample in samples {
            stats.push(sample.timestamp);
        }
        stats
    }

    /// Add the next timestamp (seconds)
    pub fn push(&mut self, timestamp: f64) {
        self.sample_count += 1;
        if self.sample_count == 1 {
            self.first_timestamp = timestamp;
            self.last_timestamp = timestamp;
            return;
        }

        let interval = timestamp - self.last_timestamp;
        self.intervals_ms.push(interval * 1000.0);
        if self.nominal_period_s > 0.0 && interval > 2.0 * self.nominal_period_s {
            self.gap_count += 1;
        }
        self.last_timestamp = timestamp;
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    pub fn gap_count(&self) -> u64 {
        self.gap_count
    }

    /// Covered span (seconds)
    pub fn duration_s(&self) -> f64 {
        self.last_timestamp - self.first_timestamp
    }

    /// Delivered samples per second over the covered span
    pub fn effective_rate_hz(&self) -> f64 {
        let duration = self.duration_s();
        if self.sample_count < 2 || duration <= 0.0 {
            0.0
        } else {
            (self.sample_count - 1) as f64 / duration
        }
    }

    pub fn summary(&self) -> IntervalSummary {
        IntervalSummary {
            sample_count: self.sample_count,
            gap_count: self.gap_count,
            duration_s: self.duration_s(),
            effective_rate_hz: self.effective_rate_hz(),
            nominal_rate_hz: if self.nominal_period_s > 0.0 {
                1.0 / self.nominal_period_s
            } else {
                0.0
            },
            interval_ms: StatsSummary::from(&self.intervals_ms),
        }
    }
}

/// Interval statistics summary
#[derive(Debug, Clone, Default)]
pub struct IntervalSummary {
    pub sample_count: u64,
    pub gap_count: u64,
    pub duration_s: f64,
    pub effective_rate_hz: f64,
    pub nominal_rate_hz: f64,
    pub interval_ms: StatsSummary,
}

impl std::fmt::Display for IntervalSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Motion Sampling Summary ===")?;
        writeln!(f, "Samples: {}", self.sample_count)?;
        writeln!(f, "Duration: {:.3}s", self.duration_s)?;
        writeln!(
            f,
            "Rate: {:.1} Hz (nominal {:.1} Hz)",
            self.effective_rate_hz, self.nominal_rate_hz
        )?;
        writeln!(f, "Gaps: {}", self.gap_count)?;
        writeln!(f, "Interval (ms): {}", self.interval_ms)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_interval_stats_counts_gaps() {
        let samples: Vec<_> = [0.0, 0.005, 0.010, 0.030, 0.035]
            .into_iter()
            .map(MotionSample::zeroed)
            .collect();

        let stats = IntervalStats::from_samples(&samples, 0.005);
        assert_eq!(stats.sample_count(), 5);
        assert_eq!(stats.gap_count(), 1);
        assert!((stats.duration_s() - 0.035).abs() < 1e-12);

        let summary = stats.summary();
        assert_eq!(summary.interval_ms.count, 4);
        assert!((summary.interval_ms.max - 20.0).abs() < 1e-9);
        assert!((summary.nominal_rate_hz - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_interval_stats_empty() {
        let stats = IntervalStats::from_samples(&[], 0.005);
        let summary = stats.summary();
        assert_eq!(summary.sample_count, 0);
        assert_eq!(summary.effective_rate_hz, 0.0);
        assert!(format!("{summary}").contains("Interval (ms): N/A"));
    }

    #[test]
    fn test_effective_rate() {
        let mut stats = IntervalStats::new(0.005);
        for i in 0..=200 {
            stats.push(i as f64 * 0.005);
        }
        assert!((stats.effective_rate_hz() - 200.0).abs() < 1e-6);
        assert_eq!(stats.gap_count(), 0);
    }

    #[test]
    fn test_summary_display() {
        let summary = IntervalSummary {
            sample_count: 2000,
            gap_count: 3,
            duration_s: 10.0,
            effective_rate_hz: 199.9,
            nominal_rate_hz: 200.0,
            interval_ms: StatsSummary {
                count: 1999,
                min: 4.0,
                max: 12.0,
                mean: 5.0,
                std_dev: 0.4,
            },
        };

        let output = format!("{}", summary);
        assert!(output.contains("Samples: 2000"));
        assert!(output.contains("Gaps: 3"));
        assert!(output.contains("199.9 Hz"));
    }
}
