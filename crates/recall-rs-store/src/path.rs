//! Path resolution and validation for recall directory keys.
//!
//! Resolution is lexical: `.` and `..` segments are folded without touching
//! the filesystem. Existence checks are kept separate so the codec can tell a
//! missing directory (stale recall) apart from an IO failure.

use crate::error::RecallError;
use directories::BaseDirs;
use regex::Regex;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Root alone, or non-empty segments without whitespace and an optional trailing slash.
const WELL_FORMED_ABSOLUTE: &str = r"^(?:/|(?:/[^/\s]+)+/?)$";

/// Resolve a possibly relative path against the process working directory.
pub fn resolve(raw: impl AsRef<Path>) -> Result<PathBuf, RecallError> {
    let raw = raw.as_ref();
    if raw.is_absolute() {
        return Ok(normalize(raw));
    }
    let cwd = std::env::current_dir().map_err(|err| {
        RecallError::Resolution(format!("failed to read current directory: {err}"))
    })?;
    Ok(resolve_against(&cwd, raw))
}

/// Absolute, normalized working directory of the process.
pub fn current_dir() -> Result<PathBuf, RecallError> {
    resolve(".")
}

/// Resolve `raw` against an explicit base directory.
pub fn resolve_against(base: &Path, raw: &Path) -> PathBuf {
    if raw.is_absolute() {
        normalize(raw)
    } else {
        normalize(&base.join(raw))
    }
}

/// Expand a leading `~` or `~/` to the home directory.
///
/// Names that merely start with a tilde (`~backup`) are left alone.
pub fn expand_home(raw: &str) -> PathBuf {
    if raw != "~" && !raw.starts_with("~/") {
        return PathBuf::from(raw);
    }
    match home_dir() {
        Some(home) => home.join(raw.trim_start_matches('~').trim_start_matches('/')),
        None => PathBuf::from(raw),
    }
}

/// Home directory of the invoking user, if known.
pub fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Syntactic check for an absolute path. Never touches the filesystem.
pub fn is_well_formed_absolute(path: &str) -> bool {
    let Ok(regex) = Regex::new(WELL_FORMED_ABSOLUTE) else {
        return false;
    };
    regex.is_match(path)
}

/// Whether `path` exists and is a directory.
///
/// Missing paths (including a file standing in for an ancestor) are
/// `Ok(false)`; any other failure is returned as an error.
pub fn directory_exists(path: impl AsRef<Path>) -> Result<bool, RecallError> {
    match std::fs::metadata(path.as_ref()) {
        Ok(metadata) => Ok(metadata.is_dir()),
        Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
            Ok(false)
        }
        Err(err) => Err(RecallError::Io(err)),
    }
}

/// Convert a resolved directory into the key stored in records.
pub fn record_dir(path: &Path) -> Result<String, RecallError> {
    let Some(dir) = path.to_str() else {
        return Err(RecallError::Resolution(format!(
            "path is not valid UTF-8: {}",
            path.display()
        )));
    };
    if !path.is_absolute() || !is_well_formed_absolute(dir) {
        return Err(RecallError::Resolution(format!(
            "unsupported directory path: {dir}"
        )));
    }
    Ok(dir.to_string())
}

/// Canonical form of a stored directory: `.`/`..` folded, no trailing slash.
///
/// `dir` must already be absolute; the result is what [`record_dir`] would
/// produce for the same directory.
pub fn canonical_key(dir: &str) -> Result<String, RecallError> {
    record_dir(&normalize(Path::new(dir)))
}

/// Fold `.` and `..` segments and drop redundant separators.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}
