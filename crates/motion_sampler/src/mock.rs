//! Mock motion sources
//!
//! Implement `MotionSource` without hardware, for tests and the simulated
//! capture command.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use contracts::{Attitude, MotionSource, RawMotion, Vector3};

/// Steady reading with toggleable availability
pub struct ConstantMotionSource {
    reading: Mutex<RawMotion>,
    available: AtomicBool,
}

impl ConstantMotionSource {
    pub fn new(reading: RawMotion) -> Self {
        Self {
            reading: Mutex::new(reading),
            available: AtomicBool::new(true),
        }
    }

    /// Head upright and still, gravity straight down
    pub fn at_rest() -> Self {
        Self::new(RawMotion {
            attitude: Attitude::default(),
            rotation_rate: Vector3::default(),
            user_acceleration: Vector3::default(),
            gravity: Vector3::new(0.0, -1.0, 0.0),
        })
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_reading(&self, reading: RawMotion) {
        *self.reading.lock().unwrap_or_else(PoisonError::into_inner) = reading;
    }
}

impl MotionSource for ConstantMotionSource {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn poll_current(&self) -> Option<RawMotion> {
        if !self.is_available() {
            return None;
        }
        Some(*self.reading.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Pre-scripted readings
///
/// Each poll consumes one entry; `None` entries script a gap. Once the
/// script runs out every poll returns `None`.
pub struct ScriptedMotionSource {
    script: Mutex<VecDeque<Option<RawMotion>>>,
}

impl ScriptedMotionSource {
    pub fn new(script: Vec<Option<RawMotion>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }

    /// Remaining entries
    pub fn remaining(&self) -> usize {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl MotionSource for ScriptedMotionSource {
    fn is_available(&self) -> bool {
        true
    }

    fn poll_current(&self) -> Option<RawMotion> {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .flatten()
    }
}
