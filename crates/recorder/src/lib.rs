//! # Recorder
//!
//! Recording Session Manager.
//!
//! Responsibilities:
//! - Allocate a session id and folder from the wall-clock start
//! - Start video and motion capture from one shared start instant
//! - Stop both producers, wait for both, then persist the motion JSON
//! - Adapt callback-style video finalization into an awaitable
//!
//! ## Folder layout
//!
//! ```text
//! <root>/<yyyyMMdd-HHmmss>/
//!     <yyyyMMdd-HHmmss>.mov
//!     <yyyyMMdd-HHmmss>.json
//! ```

pub mod error;
pub mod finalize;
pub mod mock_video;
pub mod session;

pub use contracts::VideoRecorder;
pub use error::{Result, SessionError};
pub use finalize::{finalize_channel, FinalizeCallback, FinalizeFuture};
pub use mock_video::{MockVideoConfig, MockVideoRecorder};
pub use session::{SessionHandle, SessionManager, SessionResult};
