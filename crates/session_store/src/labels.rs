//! Label CSV reading, summarizing and attachment

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use contracts::{CsvEntry, LabelRecord, LabelledRow, SessionManifest};
use tracing::{info, instrument, warn};

use crate::error::{Result, StoreError};
use crate::manifest::ManifestStore;

fn malformed(path: &Path, err: impl ToString) -> StoreError {
    StoreError::LabelsMalformed {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Parse a label CSV
///
/// Rows are returned in file order.
pub fn read_label_csv(path: &Path) -> Result<Vec<LabelledRow>> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    reader
        .deserialize::<LabelRecord>()
        .map(|record| record.map(LabelledRow::from).map_err(|e| malformed(path, e)))
        .collect()
}

/// Write rows as a label CSV (header included)
pub fn write_label_csv(path: &Path, rows: &[LabelledRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| malformed(path, e))?;
    for row in rows {
        writer
            .serialize(LabelRecord::from(row))
            .map_err(|e| malformed(path, e))?;
    }
    writer.flush()?;
    Ok(())
}

/// Manifest entry describing a label file
///
/// `labels` holds the distinct non-blank primary labels in sorted order.
/// Start and end are the smallest and largest row timestamps (0 when empty).
pub fn summarize_labels(name: &str, rows: &[LabelledRow]) -> CsvEntry {
    let labels: BTreeSet<&str> = rows
        .iter()
        .filter(|row| row.is_labelled())
        .map(|row| row.primary_label.trim())
        .collect();

    let (start, end) = rows.iter().map(LabelledRow::timestamp).fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), t| (lo.min(t), hi.max(t)),
    );

    CsvEntry {
        path: name.to_string(),
        labels: labels.into_iter().map(str::to_string).collect(),
        mov_start_time: if rows.is_empty() { 0.0 } else { start },
        mov_end_time: if rows.is_empty() { 0.0 } else { end },
        number_of_rows: rows.len() as u64,
        number_of_labelled_rows: rows.iter().filter(|r| r.is_labelled()).count() as u64,
    }
}

/// Associate a label CSV with an imported session
///
/// The file is parsed first (a malformed CSV changes nothing), copied into
/// the folder when it lives elsewhere, then recorded in the manifest.
#[instrument(skip_all, fields(folder = %folder.display(), csv = %csv_path.display()))]
pub fn attach_labels(folder: &Path, csv_path: &Path) -> Result<SessionManifest> {
    // Must be imported
    ManifestStore::load(folder)?;

    let rows = read_label_csv(csv_path)?;
    let file_name = csv_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| malformed(csv_path, "label file has no usable file name"))?;

    let destination = folder.join(file_name);
    let same_file = match (fs::canonicalize(csv_path), fs::canonicalize(&destination)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if !same_file {
        if destination.exists() {
            warn!(destination = %destination.display(), "overwriting label file");
        }
        fs::copy(csv_path, &destination)?;
    }

    let entry = summarize_labels(file_name, &rows);
    info!(
        rows = entry.number_of_rows,
        labelled = entry.number_of_labelled_rows,
        labels = ?entry.labels,
        "labels summarized"
    );
    ManifestStore::attach_csv(folder, entry)
}

/// Sort rows by timestamp, keeping file order among equal timestamps
pub fn sort_by_timestamp(rows: &mut [LabelledRow]) {
    rows.sort_by(|a, b| a.timestamp().total_cmp(&b.timestamp()));
}
