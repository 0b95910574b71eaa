//! MotionSource trait - Motion sensor driver abstraction
//!
//! Decouples the sampler from the concrete sensor driver so headphone
//! motion, scripted test sources and replayed recordings share one API.

use std::sync::Arc;

use crate::RawMotion;

/// Motion sensor driver
///
/// The sampler polls the driver at its own cadence; the driver answers with
/// whatever reading it currently holds.
///
/// # Example
///
/// ```ignore
/// let source: SharedMotionSource = Arc::new(driver);
/// if source.is_available() {
///     if let Some(raw) = source.poll_current() {
///         println!("yaw = {}", raw.attitude.yaw);
///     }
/// }
/// ```
pub trait MotionSource: Send + Sync {
    /// Whether the device currently delivers motion
    fn is_available(&self) -> bool;

    /// Latest reading, or `None` while the sensor is transiently unavailable
    fn poll_current(&self) -> Option<RawMotion>;
}

/// Shared handle to a motion source
pub type SharedMotionSource = Arc<dyn MotionSource>;
