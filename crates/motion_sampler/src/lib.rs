//! # Motion Sampler
//!
//! Head-motion sampling for a recording session.
//!
//! Responsibilities:
//! - Poll a `MotionSource` at a fixed nominal rate (200 Hz by default)
//! - Stamp each reading with the wall-clock time since session start
//! - Skip ticks without a reading and expose availability changes
//! - Project attitude onto a user-set reference frame
//!
//! Timestamps always come from the clock, never from `index * period`, so
//! jitter and gaps are preserved in the output.

pub mod engine;
pub mod error;
pub mod mock;
pub mod reference;
pub mod sampler;

pub use engine::{SamplerCore, Tick};
pub use error::{Result, SamplerError};
pub use mock::{ConstantMotionSource, ScriptedMotionSource};
pub use reference::ReferenceFrame;
pub use sampler::{MotionSampler, SamplerConfig, SamplerStatus};
