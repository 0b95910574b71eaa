//! Mock video recorder
//!
//! Implements `VideoRecorder` without a camera. On stop it writes a minimal
//! QuickTime file (`ftyp` + `moov/mvhd`) whose header carries the elapsed
//! recording time, then reports completion through a finalize callback the
//! way a platform recorder's delegate does.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use contracts::{ContractError, VideoRecorder};
use tracing::{debug, instrument};

use crate::finalize::finalize_channel;

/// QuickTime default movie timescale (units per second)
pub const MOVIE_TIMESCALE: u32 = 600;

/// Mock recorder behaviour
#[derive(Debug, Clone)]
pub struct MockVideoConfig {
    /// Report a connected video output
    pub connected: bool,
    /// Fail finalization instead of writing the file
    pub fail_on_stop: bool,
    /// Movie duration to write instead of the elapsed time
    pub fixed_duration: Option<Duration>,
}

impl Default for MockVideoConfig {
    fn default() -> Self {
        Self {
            connected: true,
            fail_on_stop: false,
            fixed_duration: None,
        }
    }
}

/// Mock video recorder
#[derive(Debug, Default)]
pub struct MockVideoRecorder {
    config: MockVideoConfig,
    active: Option<(PathBuf, Instant)>,
}

impl MockVideoRecorder {
    pub fn new(config: MockVideoConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// Recorder without a video connection
    pub fn disconnected() -> Self {
        Self::new(MockVideoConfig {
            connected: false,
            ..MockVideoConfig::default()
        })
    }

    /// Recorder whose finalization always fails
    pub fn failing() -> Self {
        Self::new(MockVideoConfig {
            fail_on_stop: true,
            ..MockVideoConfig::default()
        })
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }
}

impl VideoRecorder for MockVideoRecorder {
    fn has_video_connection(&self) -> bool {
        self.config.connected
    }

    fn start_recording(&mut self, destination: &Path) -> Result<(), ContractError> {
        if !self.config.connected {
            return Err(ContractError::video_start("no video connection"));
        }
        if self.active.is_some() {
            return Err(ContractError::video_start("a recording is already in flight"));
        }

        debug!(destination = %destination.display(), "mock video recording started");
        self.active = Some((destination.to_path_buf(), Instant::now()));
        Ok(())
    }

    #[instrument(name = "mock_video_stop", skip(self))]
    async fn stop_recording(&mut self) -> Result<PathBuf, ContractError> {
        let (path, started) = self
            .active
            .take()
            .ok_or_else(|| ContractError::video_finalize("not recording"))?;

        let duration = self.config.fixed_duration.unwrap_or_else(|| started.elapsed());
        let fail = self.config.fail_on_stop;
        let (callback, finished) = finalize_channel();

        // Finalization completes off the caller's task, like a delegate callback
        tokio::task::spawn_blocking(move || {
            if fail {
                callback.failed(ContractError::video_finalize("simulated finalize failure"));
                return;
            }
            match write_quicktime(&path, duration) {
                Ok(()) => callback.finished(path),
                Err(e) => callback.failed(e.into()),
            }
        });

        finished.await
    }
}

/// Write a minimal QuickTime movie header declaring `duration`
pub fn write_quicktime(path: &Path, duration: Duration) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(&quicktime_header(duration))?;
    out.flush()
}

/// `ftyp` + `moov` containing a version-0 `mvhd`
pub fn quicktime_header(duration: Duration) -> Vec<u8> {
    let units = (duration.as_secs_f64() * MOVIE_TIMESCALE as f64).round() as u32;

    let mut ftyp = Vec::with_capacity(20);
    ftyp.extend_from_slice(&20u32.to_be_bytes());
    ftyp.extend_from_slice(b"ftyp");
    ftyp.extend_from_slice(b"qt  ");
    ftyp.extend_from_slice(&0u32.to_be_bytes());
    ftyp.extend_from_slice(b"qt  ");

    let mut mvhd = Vec::with_capacity(108);
    mvhd.extend_from_slice(&108u32.to_be_bytes());
    mvhd.extend_from_slice(b"mvhd");
    mvhd.extend_from_slice(&[0, 0, 0, 0]); // version 0, flags
    mvhd.extend_from_slice(&0u32.to_be_bytes()); // creation time
    mvhd.extend_from_slice(&0u32.to_be_bytes()); // modification time
    mvhd.extend_from_slice(&MOVIE_TIMESCALE.to_be_bytes());
    mvhd.extend_from_slice(&units.to_be_bytes());
    mvhd.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // rate 1.0
    mvhd.extend_from_slice(&0x0100u16.to_be_bytes()); // volume 1.0
    mvhd.extend_from_slice(&[0u8; 10]);
    for value in [0x0001_0000u32, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000] {
        mvhd.extend_from_slice(&value.to_be_bytes());
    }
    mvhd.extend_from_slice(&[0u8; 24]); // preview, poster, selection, current time
    mvhd.extend_from_slice(&1u32.to_be_bytes()); // next track id

    let mut moov = Vec::with_capacity(8 + mvhd.len());
    moov.extend_from_slice(&((8 + mvhd.len()) as u32).to_be_bytes());
    moov.extend_from_slice(b"moov");
    moov.extend_from_slice(&mvhd);

    let mut file = ftyp;
    file.extend_from_slice(&moov);
    file
}
