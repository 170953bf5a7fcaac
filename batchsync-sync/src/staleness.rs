//! Staleness resolution.
//!
//! The last-modified timestamp is the sole ordering signal; comparisons are
//! asymmetric so that neither side ever clobbers fresher data:
//! upload only when the local copy is strictly newer, download only when it
//! is strictly older. Equal timestamps transfer nothing in either direction.

use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};

use batchsync_core::{LocalFile, Resource};

use crate::error::{io_err, SyncError};

/// Whether a local file should be uploaded over `remote`.
///
/// True when no remote counterpart exists, otherwise only when the local
/// mtime is strictly newer than the remote creation time.
pub fn needs_upload(local: &LocalFile, remote: Option<&Resource>) -> bool {
    match remote {
        None => true,
        Some(resource) => local.modified_at > resource.created_at,
    }
}

/// Whether `remote` should be downloaded over a local copy.
///
/// True when no local copy exists, otherwise only when the local mtime is
/// strictly older than the remote creation time. An equal or newer local
/// copy is never overwritten.
pub fn needs_download(local: Option<&LocalFile>, remote: &Resource) -> bool {
    match local {
        None => true,
        Some(file) => file.modified_at < remote.created_at,
    }
}

/// Enumerate the regular files of `dir` as [`LocalFile`]s.
///
/// Directory enumeration order is preserved (not sorted). Subdirectories
/// are ignored; mtimes are normalized to UTC.
pub fn scan_dir(dir: &Path) -> Result<Vec<LocalFile>, SyncError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let metadata = match entry.metadata() {
            Ok(m) => m,
            // Entry vanished between readdir and stat; treat as absent.
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(err) => return Err(io_err(&path, err)),
        };
        if !metadata.is_file() {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_owned(),
            None => continue,
        };
        let modified = metadata.modified().map_err(|e| io_err(&path, e))?;
        let modified_at: DateTime<Utc> = modified.into();
        files.push(LocalFile {
            path,
            name,
            modified_at,
        });
    }
    Ok(files)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
