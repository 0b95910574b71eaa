//! MotionSample - Motion Sampler output
//!
//! One fixed-field JSON object per sample, encoded in camelCase so files
//! written by the capture app and by this workspace are interchangeable.

use serde::{Deserialize, Serialize};

/// Schema version of the motion JSON array.
///
/// Version 1: a sensor gap is omitted from the array, no placeholder sample
/// is written. Consumers must not assume a constant sample period.
pub const MOTION_SCHEMA_VERSION: u32 = 1;

/// Device orientation (radians)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Attitude {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// 3D vector
///
/// Used for rotation rate (rad/s), user acceleration and gravity (g).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Rotation quaternion after reference-frame correction
///
/// Holds the mirror conjugation `M * R * M` of the relative rotation `R`,
/// with `M = diag(-1, 1, 1)`, so it is always a proper unit rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformedRotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

/// One reading delivered by the motion sensor driver, before timestamping.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawMotion {
    pub attitude: Attitude,
    pub rotation_rate: Vector3,
    pub user_acceleration: Vector3,
    pub gravity: Vector3,
}

/// Timestamped motion sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionSample {
    /// Seconds since session start (monotonically non-decreasing)
    pub timestamp: f64,

    /// Device orientation
    pub attitude: Attitude,

    /// Gyroscope (rad/s)
    pub rotation_rate: Vector3,

    /// Acceleration without gravity (g)
    pub user_acceleration: Vector3,

    /// Gravity vector (g)
    pub gravity: Vector3,

    /// Rotation relative to the active reference frame, if one was set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformed_rotation: Option<TransformedRotation>,
}

impl MotionSample {
    /// Zero-valued sample at the given timestamp
    pub fn zeroed(timestamp: f64) -> Self {
        Self::from_raw(timestamp, RawMotion::default())
    }

    /// Stamp a raw reading
    pub fn from_raw(timestamp: f64, raw: RawMotion) -> Self {
        Self {
            timestamp,
            attitude: raw.attitude,
            rotation_rate: raw.rotation_rate,
            user_acceleration: raw.user_acceleration,
            gravity: raw.gravity,
            transformed_rotation: None,
        }
    }

    /// Raw reading without timestamp or projection
    pub fn raw(&self) -> RawMotion {
        RawMotion {
            attitude: self.attitude,
            rotation_rate: self.rotation_rate,
            user_acceleration: self.user_acceleration,
            gravity: self.gravity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_json_field_names() {
        let sample = MotionSample::zeroed(0.25);
        let json = serde_json::to_value(sample).unwrap();

        assert_eq!(json["timestamp"], 0.25);
        assert!(json.get("rotationRate").is_some());
        assert!(json.get("userAcceleration").is_some());
        assert!(json.get("gravity").is_some());
        assert!(json["attitude"].get("yaw").is_some());
        // No reference frame set: field omitted
        assert!(json.get("transformedRotation").is_none());
    }

    #[test]
    fn test_sample_reads_capture_app_json() {
        let json = r#"{
            "timestamp": 1.5,
            "attitude": {"roll": 0.1, "pitch": 0.2, "yaw": 0.3},
            "rotationRate": {"x": 1.0, "y": 2.0, "z": 3.0},
            "userAcceleration": {"x": 0.0, "y": 0.0, "z": 0.0},
            "gravity": {"x": 0.0, "y": -1.0, "z": 0.0},
            "transformedRotation": {"x": 0.0, "y": 0.0, "z": 0.0, "w": 1.0}
        }"#;

        let sample: MotionSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.timestamp, 1.5);
        assert_eq!(sample.attitude.pitch, 0.2);
        assert_eq!(sample.gravity.y, -1.0);
        assert_eq!(sample.transformed_rotation.unwrap().w, 1.0);
    }

    #[test]
    fn test_empty_sequence_serializes() {
        let samples: Vec<MotionSample> = Vec::new();
        assert_eq!(serde_json::to_string(&samples).unwrap(), "[]");
    }
}
