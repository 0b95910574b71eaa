//! Movie duration from the QuickTime `moov/mvhd` atom
//!
//! Only the atom headers are walked; media data is skipped with `Seek`, so
//! large movies cost a handful of reads.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Result, StoreError};

const ATOM_HEADER: u64 = 8;

struct Atom {
    kind: [u8; 4],
    /// Offset of the payload
    body: u64,
    /// Offset one past the end
    end: u64,
}

fn malformed(path: &Path, message: impl Into<String>) -> StoreError {
    StoreError::VideoMalformed {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn read_u32<R: Read>(r: &mut R) -> std::io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

fn read_u64<R: Read>(r: &mut R) -> std::io::Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_be_bytes(buf))
}

/// Read the atom header at the current position, `None` at `limit`
fn next_atom<R: Read + Seek>(r: &mut R, limit: u64, path: &Path) -> Result<Option<Atom>> {
    let start = r.stream_position()?;
    if start + ATOM_HEADER > limit {
        return Ok(None);
    }

    let size = read_u32(r)?;
    let mut kind = [0u8; 4];
    r.read_exact(&mut kind)?;

    let (body, end) = match size {
        // Extends to the end of the enclosing container
        0 => (start + ATOM_HEADER, limit),
        // 64-bit size follows the type
        1 => {
            let large = read_u64(r)?;
            (start + ATOM_HEADER + 8, start.saturating_add(large))
        }
        n => (start + ATOM_HEADER, start + u64::from(n)),
    };

    if end < body || end > limit {
        return Err(malformed(
            path,
            format!(
                "atom '{}' at offset {start} overruns its container",
                String::from_utf8_lossy(&kind)
            ),
        ));
    }
    Ok(Some(Atom { kind, body, end }))
}

/// Find the first child atom of `kind` within `[from, limit)`
fn find_atom<R: Read + Seek>(
    r: &mut R,
    from: u64,
    limit: u64,
    kind: &[u8; 4],
    path: &Path,
) -> Result<Option<Atom>> {
    r.seek(SeekFrom::Start(from))?;
    while let Some(atom) = next_atom(r, limit, path)? {
        if &atom.kind == kind {
            return Ok(Some(atom));
        }
        r.seek(SeekFrom::Start(atom.end))?;
    }
    Ok(None)
}

/// Duration (seconds) of a QuickTime / MP4 movie
///
/// # Errors
/// `VideoMalformed` when there is no `moov/mvhd`, the header is truncated,
/// or the timescale is zero.
pub fn read_duration(path: &Path) -> Result<f64> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut r = BufReader::new(file);

    let moov = find_atom(&mut r, 0, len, b"moov", path)?
        .ok_or_else(|| malformed(path, "no moov atom"))?;
    let mvhd = find_atom(&mut r, moov.body, moov.end, b"mvhd", path)?
        .ok_or_else(|| malformed(path, "no mvhd atom"))?;

    r.seek(SeekFrom::Start(mvhd.body))?;
    let parse = |r: &mut BufReader<File>| -> std::io::Result<(u32, u64)> {
        let version = read_u32(r)? >> 24;
        if version == 1 {
            read_u64(r)?; // creation
            read_u64(r)?; // modification
            let timescale = read_u32(r)?;
            Ok((timescale, read_u64(r)?))
        } else {
            read_u32(r)?;
            read_u32(r)?;
            let timescale = read_u32(r)?;
            Ok((timescale, u64::from(read_u32(r)?)))
        }
    };
    let (timescale, units) = parse(&mut r).map_err(|e| malformed(path, format!("mvhd: {e}")))?;

    if timescale == 0 {
        return Err(malformed(path, "mvhd timescale is zero"));
    }
    Ok(units as f64 / f64::from(timescale))
}
