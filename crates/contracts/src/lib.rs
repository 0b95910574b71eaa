//! # Contracts
//!
//! Frozen interface contracts shared by the recording side and the desktop
//! side. Every business crate depends on this crate; reverse dependencies are
//! prohibited.
//!
//! ## Time Model
//! - A session is identified by its wall-clock start (`yyyyMMdd-HHmmss`)
//! - Motion timestamps are seconds (f64) relative to the session start
//! - Label rows share the motion time base

mod error;
mod labels;
mod manifest;
mod motion;
mod motion_file;
mod motion_source;
mod session_id;
mod tool_config;
mod video;

pub use error::*;
pub use labels::*;
pub use manifest::*;
pub use motion::*;
pub use motion_file::{read_motion_json, write_motion_json};
pub use motion_source::{MotionSource, SharedMotionSource};
pub use session_id::{display_name, SessionId, SESSION_ID_FORMAT};
pub use tool_config::*;
pub use video::*;
