//! Motion JSON file - `<sessionId>.json`
//!
//! A JSON array of `MotionSample`, in collection order.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::{ContractError, MotionSample};

/// Write samples as a compact JSON array
pub fn write_motion_json(path: &Path, samples: &[MotionSample]) -> Result<(), ContractError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, samples)
        .map_err(|e| ContractError::malformed("motion", path, e))?;
    writer.flush()?;
    Ok(())
}

/// Read a motion JSON array
///
/// # Errors
/// - `Io` when the file cannot be opened
/// - `Malformed` when the content is not a motion sample array
pub fn read_motion_json(path: &Path) -> Result<Vec<MotionSample>, ContractError> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|e| ContractError::malformed("motion", path, e))
}
