//! JSON Lines codec for the recall backing file.
//!
//! Every non-blank line holds one record with exactly the `time`, `dir` and
//! `msg` keys. Decoding fails as a whole on the first malformed line,
//! rewrites directories into canonical form, and silently drops records whose
//! directory no longer exists.

use crate::error::RecallError;
use crate::path;
use crate::record::Recall;
use log::{debug, info, warn};
use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Decode a backing file into the records whose directories still exist.
pub fn decode(bytes: &[u8]) -> Result<Vec<Recall>, RecallError> {
    let mut recalls = Vec::new();
    let mut stale = 0usize;
    for (idx, raw_line) in bytes.split(|byte| *byte == b'\n').enumerate() {
        let line_no = idx + 1;
        let line = std::str::from_utf8(raw_line).map_err(|err| malformed(line_no, err))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut recall: Recall =
            serde_json::from_str(line).map_err(|err| malformed(line_no, err))?;
        if !path::is_well_formed_absolute(&recall.dir) {
            return Err(malformed(
                line_no,
                format!("invalid directory path: {}", recall.dir),
            ));
        }
        let dir = path::canonical_key(&recall.dir).map_err(|err| malformed(line_no, err))?;
        if dir != recall.dir {
            debug!(
                "normalized recall directory (line={line_no}, from={}, to={dir})",
                recall.dir
            );
            recall.dir = dir;
        }
        if !path::directory_exists(&recall.dir)? {
            debug!("dropping stale recall (line={line_no}, dir={})", recall.dir);
            stale += 1;
            continue;
        }
        recalls.push(recall);
    }
    if stale > 0 {
        info!("garbage collected stale recalls (count={stale})");
    }
    Ok(recalls)
}

/// Encode records, one JSON object per line.
pub fn encode(recalls: &[Recall]) -> Result<Vec<u8>, RecallError> {
    let mut bytes = Vec::new();
    for recall in recalls {
        serde_json::to_writer(&mut bytes, recall)?;
        bytes.push(b'\n');
    }
    Ok(bytes)
}

/// Read and decode the backing file. A missing file is an empty set.
pub fn read_file(path: &Path) -> Result<Vec<Recall>, RecallError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("recall file missing, starting empty (path={})", path.display());
            return Ok(Vec::new());
        }
        Err(err) => return Err(RecallError::Io(err)),
    };
    decode(&bytes)
}

/// Replace the backing file with the encoded records.
///
/// The records are written to a sibling temp file first and renamed over the
/// target, so readers never observe a partially written file.
pub fn write_file(path: &Path, recalls: &[Recall]) -> Result<(), RecallError> {
    let bytes = encode(recalls)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp_path = temp_path(path);
    let written = write_synced(&temp_path, &bytes).and_then(|()| fs::rename(&temp_path, path));
    if let Err(err) = written {
        match fs::remove_file(&temp_path) {
            Ok(()) => {}
            Err(cleanup) if cleanup.kind() == ErrorKind::NotFound => {}
            Err(cleanup) => warn!(
                "failed to remove temp recall file (path={}): {cleanup}",
                temp_path.display()
            ),
        }
        return Err(RecallError::Io(err));
    }
    debug!(
        "wrote recall file (path={}, records={})",
        path.display(),
        recalls.len()
    );
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Path of the temporary file used while rewriting `path`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn malformed(line: usize, err: impl Display) -> RecallError {
    RecallError::MalformedRecord {
        line,
        message: err.to_string(),
    }
}
