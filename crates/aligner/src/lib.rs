//! # Aligner
//!
//! Playback time alignment between a video position and the motion / label
//! sequences recorded alongside it.
//!
//! Everything here is a pure function of the playback position, the video
//! duration and the sequence lengths; there is no playback state.
//!
//! ```
//! use aligner::{playback_time, sample_index};
//!
//! assert_eq!(sample_index(0.5, 1000), Some(500));
//! assert_eq!(sample_index(1.0, 1000), Some(999));
//! assert_eq!(sample_index(0.3, 0), None);
//! assert_eq!(playback_time(0.25, 8.0), 2.0);
//! ```

mod playback;

pub use playback::{AlignedFrame, PlaybackAligner};

use contracts::LabelledRow;

/// Clamp a playback position into `[0, 1]`; NaN becomes 0
#[inline]
pub fn clamp_position(position: f64) -> f64 {
    if position.is_nan() {
        0.0
    } else {
        position.clamp(0.0, 1.0)
    }
}

/// Motion sample shown at playback position `position`
///
/// `floor(position * sample_count)` clamped to the last index. `None` when
/// there are no samples.
pub fn sample_index(position: f64, sample_count: usize) -> Option<usize> {
    if sample_count == 0 {
        return None;
    }
    let scaled = (clamp_position(position) * sample_count as f64).floor() as usize;
    Some(scaled.min(sample_count - 1))
}

/// Playback time (seconds) of `position` within a video of `duration`
///
/// Non-finite or negative durations yield 0.
pub fn playback_time(position: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 {
        return 0.0;
    }
    clamp_position(position) * duration
}

/// Label row closest to time `t`
///
/// `rows` must be sorted by timestamp. An exact match wins; otherwise the
/// nearest row, with ties going to the earlier row.
pub fn label_index(rows: &[LabelledRow], t: f64) -> Option<usize> {
    if rows.is_empty() {
        return None;
    }

    // First row at or after t
    let next = rows.partition_point(|row| row.timestamp() < t);
    if next == 0 {
        return Some(0);
    }
    if next == rows.len() {
        return Some(rows.len() - 1);
    }

    let prev = next - 1;
    let to_prev = t - rows[prev].timestamp();
    let to_next = rows[next].timestamp() - t;
    if to_next < to_prev {
        Some(next)
    } else {
        Some(prev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::MotionSample;

    fn rows(timestamps: &[f64]) -> Vec<LabelledRow> {
        timestamps
            .iter()
            .map(|&t| LabelledRow {
                sample: MotionSample::zeroed(t),
                primary_label: String::new(),
                secondary_label: String::new(),
                body_activity: String::new(),
                mouth_activity: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_sample_index_thousand_samples() {
        assert_eq!(sample_index(0.5, 1000), Some(500));
        assert_eq!(sample_index(1.0, 1000), Some(999));
        assert_eq!(sample_index(0.0, 1000), Some(0));
        assert_eq!(sample_index(0.9999, 1000), Some(999));
    }

    #[test]
    fn test_sample_index_out_of_range_positions() {
        assert_eq!(sample_index(-0.2, 10), Some(0));
        assert_eq!(sample_index(7.0, 10), Some(9));
        assert_eq!(sample_index(f64::NAN, 10), Some(0));
        assert_eq!(sample_index(f64::INFINITY, 10), Some(9));
    }

    #[test]
    fn test_sample_index_empty() {
        assert_eq!(sample_index(0.0, 0), None);
        assert_eq!(sample_index(1.0, 0), None);
    }

    #[test]
    fn test_sample_index_single() {
        assert_eq!(sample_index(0.0, 1), Some(0));
        assert_eq!(sample_index(1.0, 1), Some(0));
    }

    #[test]
    fn test_playback_time() {
        assert_eq!(playback_time(0.5, 10.0), 5.0);
        assert_eq!(playback_time(1.5, 10.0), 10.0);
        assert_eq!(playback_time(0.5, f64::NAN), 0.0);
        assert_eq!(playback_time(0.5, -3.0), 0.0);
    }

    #[test]
    fn test_label_index_exact_and_nearest() {
        let table = rows(&[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(label_index(&table, 2.0), Some(2));
        assert_eq!(label_index(&table, 2.4), Some(2));
        assert_eq!(label_index(&table, 2.6), Some(3));
        assert_eq!(label_index(&table, -1.0), Some(0));
        assert_eq!(label_index(&table, 99.0), Some(3));
    }

    #[test]
    fn test_label_index_tie_goes_to_earlier() {
        let table = rows(&[0.0, 1.0]);
        assert_eq!(label_index(&table, 0.5), Some(0));
    }

    #[test]
    fn test_label_index_duplicate_timestamps() {
        let table = rows(&[0.0, 1.0, 1.0, 2.0]);
        assert_eq!(label_index(&table, 1.0), Some(1));
    }

    #[test]
    fn test_label_index_empty() {
        assert_eq!(label_index(&[], 1.0), None);
    }
}
