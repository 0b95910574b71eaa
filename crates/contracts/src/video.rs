//! VideoRecorder trait - Camera/video capture abstraction
//!
//! The recording session manager drives the platform video recorder through
//! this trait. Device selection, audio and preview are the implementor's
//! business.

use std::path::{Path, PathBuf};

use crate::ContractError;

/// Video recorder
///
/// At most one recording is in flight. `stop_recording` resolves once the
/// movie file is finalized on disk, with the path of that file.
///
/// # Example
///
/// ```ignore
/// use contracts::VideoRecorder;
///
/// async fn capture<R: VideoRecorder>(rec: &mut R, dest: &Path) -> Result<PathBuf, ContractError> {
///     rec.start_recording(dest)?;
///     // ...
///     rec.stop_recording().await
/// }
/// ```
#[trait_variant::make(VideoRecorder: Send)]
pub trait LocalVideoRecorder {
    /// Whether a video output is connected and able to record
    fn has_video_connection(&self) -> bool;

    /// Begin writing a movie to `destination`
    fn start_recording(&mut self, destination: &Path) -> Result<(), ContractError>;

    /// Stop and wait for the movie file to be finalized
    async fn stop_recording(&mut self) -> Result<PathBuf, ContractError>;
}
