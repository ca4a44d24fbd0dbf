//! Atomic per-file writes: write-to-temp-in-same-directory, fsync,
//! rename. Grounded directly on the teacher's `file_tools::file_write`.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use xgen_core::FileWriteReason;

#[derive(Debug, thiserror::Error)]
#[error("{reason:?}: {path}")]
pub struct AtomicWriteError {
    pub path: String,
    pub reason: FileWriteReason,
    #[source]
    pub source: std::io::Error,
}

fn classify(path: &Path, err: std::io::Error) -> AtomicWriteError {
    let reason = match err.kind() {
        std::io::ErrorKind::PermissionDenied => FileWriteReason::Permission,
        std::io::ErrorKind::Other if err.raw_os_error() == Some(28) => FileWriteReason::NoSpace,
        std::io::ErrorKind::AlreadyExists => FileWriteReason::InUse,
        _ => FileWriteReason::Other,
    };
    AtomicWriteError { path: path.display().to_string(), reason, source: err }
}

/// Write `content` to `path` atomically: a sibling temp file is
/// written, fsynced, then renamed over the target (atomic on POSIX).
pub fn atomic_write(path: &Path, content: &str) -> Result<(), AtomicWriteError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| classify(path, e))?;
        }
    }

    let temp_path: PathBuf = path.with_extension("tmp");
    let mut file = File::create(&temp_path).map_err(|e| classify(path, e))?;
    file.write_all(content.as_bytes()).map_err(|e| classify(path, e))?;
    file.sync_all().map_err(|e| classify(path, e))?;
    fs::rename(&temp_path, path).map_err(|e| classify(path, e))?;
    Ok(())
}
