//! LabelledRow - human-applied labels over the motion time base
//!
//! Label CSVs are produced outside this workspace. Their header uses dotted
//! names (`attitude.roll`, `rotationRate.x`, ...) for the nested motion
//! fields, so the on-disk record is flat and converted into the nested
//! `LabelledRow` after parsing.

use serde::{Deserialize, Serialize};

use crate::{Attitude, MotionSample, Vector3};

/// A motion sample with its labels
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledRow {
    pub sample: MotionSample,
    pub primary_label: String,
    pub secondary_label: String,
    pub body_activity: String,
    pub mouth_activity: String,
}

impl LabelledRow {
    /// Timestamp in the motion time base
    #[inline]
    pub fn timestamp(&self) -> f64 {
        self.sample.timestamp
    }

    /// Whether a human applied at least a primary label
    pub fn is_labelled(&self) -> bool {
        !self.primary_label.trim().is_empty()
    }
}

/// One CSV record, field-for-field with the label file header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub timestamp: f64,
    #[serde(rename = "attitude.roll")]
    pub attitude_roll: f64,
    #[serde(rename = "attitude.pitch")]
    pub attitude_pitch: f64,
    #[serde(rename = "attitude.yaw")]
    pub attitude_yaw: f64,
    #[serde(rename = "rotationRate.x")]
    pub rotation_rate_x: f64,
    #[serde(rename = "rotationRate.y")]
    pub rotation_rate_y: f64,
    #[serde(rename = "rotationRate.z")]
    pub rotation_rate_z: f64,
    #[serde(rename = "userAcceleration.x")]
    pub user_acceleration_x: f64,
    #[serde(rename = "userAcceleration.y")]
    pub user_acceleration_y: f64,
    #[serde(rename = "userAcceleration.z")]
    pub user_acceleration_z: f64,
    #[serde(rename = "gravity.x")]
    pub gravity_x: f64,
    #[serde(rename = "gravity.y")]
    pub gravity_y: f64,
    #[serde(rename = "gravity.z")]
    pub gravity_z: f64,
    #[serde(rename = "primaryLabel", default)]
    pub primary_label: String,
    #[serde(rename = "secondaryLabel", default)]
    pub secondary_label: String,
    #[serde(rename = "bodyActivity", default)]
    pub body_activity: String,
    #[serde(rename = "mouthActivity", default)]
    pub mouth_activity: String,
}

/// Header of a label CSV, in column order
pub const LABEL_CSV_HEADER: [&str; 17] = [
    "timestamp",
    "attitude.roll",
    "attitude.pitch",
    "attitude.yaw",
    "rotationRate.x",
    "rotationRate.y",
    "rotationRate.z",
    "userAcceleration.x",
    "userAcceleration.y",
    "userAcceleration.z",
    "gravity.x",
    "gravity.y",
    "gravity.z",
    "primaryLabel",
    "secondaryLabel",
    "bodyActivity",
    "mouthActivity",
];

impl From<LabelRecord> for LabelledRow {
    fn from(record: LabelRecord) -> Self {
        Self {
            sample: MotionSample {
                timestamp: record.timestamp,
                attitude: Attitude {
                    roll: record.attitude_roll,
                    pitch: record.attitude_pitch,
                    yaw: record.attitude_yaw,
                },
                rotation_rate: Vector3::new(
                    record.rotation_rate_x,
                    record.rotation_rate_y,
                    record.rotation_rate_z,
                ),
                user_acceleration: Vector3::new(
                    record.user_acceleration_x,
                    record.user_acceleration_y,
                    record.user_acceleration_z,
                ),
                gravity: Vector3::new(record.gravity_x, record.gravity_y, record.gravity_z),
                transformed_rotation: None,
            },
            primary_label: record.primary_label,
            secondary_label: record.secondary_label,
            body_activity: record.body_activity,
            mouth_activity: record.mouth_activity,
        }
    }
}

impl From<&LabelledRow> for LabelRecord {
    fn from(row: &LabelledRow) -> Self {
        let s = &row.sample;
        Self {
            timestamp: s.timestamp,
            attitude_roll: s.attitude.roll,
            attitude_pitch: s.attitude.pitch,
            attitude_yaw: s.attitude.yaw,
            rotation_rate_x: s.rotation_rate.x,
            rotation_rate_y: s.rotation_rate.y,
            rotation_rate_z: s.rotation_rate.z,
            user_acceleration_x: s.user_acceleration.x,
            user_acceleration_y: s.user_acceleration.y,
            user_acceleration_z: s.user_acceleration.z,
            gravity_x: s.gravity.x,
            gravity_y: s.gravity.y,
            gravity_z: s.gravity.z,
            primary_label: row.primary_label.clone(),
            secondary_label: row.secondary_label.clone(),
            body_activity: row.body_activity.clone(),
            mouth_activity: row.mouth_activity.clone(),
        }
    }
}
