//! C6 contract: `write(GeneratedCode, project_name, backup) -> {paths, backups}`,
//! `rollback(partial)`.

use crate::atomic_write::{atomic_write, AtomicWriteError};
use crate::clock::{Clock, SystemClock};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{instrument, warn};
use xgen_core::{FileWriteReason, GeneratedCode};

#[derive(Debug, Clone)]
pub struct WrittenPaths {
    pub extractor: PathBuf,
    pub models: PathBuf,
    pub tests: PathBuf,
    pub marker: PathBuf,
}

#[derive(Debug, Clone)]
pub struct BackupRecord {
    pub original: PathBuf,
    pub backup: PathBuf,
}

#[derive(Debug, Clone)]
pub struct WriteOutcome {
    pub paths: WrittenPaths,
    pub backups: Vec<BackupRecord>,
}

/// What survived before a failed `write()`, handed to `rollback`.
#[derive(Debug, Clone, Default)]
pub struct PartialWrite {
    pub written: Vec<PathBuf>,
    pub backups: Vec<BackupRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    #[error("failed to write output files: {reason:?} ({path})")]
    Write { path: String, reason: FileWriteReason },
}

/// Returned alongside a failed `write()`: everything that survived up
/// to the failing step, so the caller can hand it straight to
/// `rollback` (spec §4.6 "if any step after (1) fails, the controller
/// invokes the writer's rollback(partial)").
#[derive(Debug)]
pub struct WriteFailure {
    pub error: WriterError,
    pub partial: PartialWrite,
}

impl From<AtomicWriteError> for WriterError {
    fn from(e: AtomicWriteError) -> Self {
        WriterError::Write { path: e.path, reason: e.reason }
    }
}

impl WriterError {
    pub fn path(&self) -> &str {
        match self {
            WriterError::Write { path, .. } => path,
        }
    }

    pub fn reason(&self) -> FileWriteReason {
        match self {
            WriterError::Write { reason, .. } => reason.clone(),
        }
    }
}

pub struct CodeWriter {
    base_dir: PathBuf,
    clock: Box<dyn Clock>,
}

impl CodeWriter {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into(), clock: Box::new(SystemClock) }
    }

    pub fn with_clock(base_dir: impl Into<PathBuf>, clock: impl Clock + 'static) -> Self {
        Self { base_dir: base_dir.into(), clock: Box::new(clock) }
    }

    fn project_dir(&self, project_name: &str) -> PathBuf {
        self.base_dir.join(project_name)
    }

    /// Backs up `path` if it already exists and its content differs
    /// from `new_content`; returns the backup record when one was made.
    fn backup_if_changed(&self, path: &Path, new_content: &str) -> Result<Option<BackupRecord>, WriterError> {
        if !path.exists() {
            return Ok(None);
        }
        let existing = fs::read_to_string(path).unwrap_or_default();
        if existing == new_content {
            return Ok(None);
        }
        let backup_path = path.with_extension(format!(
            "{}.bak.{}",
            path.extension().and_then(|e| e.to_str()).unwrap_or("py"),
            self.clock.now_utc_ms()
        ));
        fs::rename(path, &backup_path)
            .map_err(|e| WriterError::Write { path: path.display().to_string(), reason: classify_io(&e) })?;
        Ok(Some(BackupRecord { original: path.to_path_buf(), backup: backup_path }))
    }

    #[instrument(skip(self, code), fields(project = %project_name))]
    pub fn write(&self, code: &GeneratedCode, project_name: &str, backup: bool) -> Result<WriteOutcome, WriteFailure> {
        let dir = self.project_dir(project_name);
        let mut partial = PartialWrite::default();

        if let Err(e) = fs::create_dir_all(&dir) {
            let error = WriterError::Write { path: dir.display().to_string(), reason: classify_io(&e) };
            return Err(WriteFailure { error, partial });
        }

        let extractor_path = dir.join("extractor.py");
        let models_path = dir.join("models.py");
        let tests_path = dir.join("test_extractor.py");
        let marker_path = dir.join("__init__.py");

        if backup {
            for (path, content) in [
                (&extractor_path, &code.extractor_source),
                (&models_path, &code.models_source),
                (&tests_path, &code.tests_source),
            ] {
                match self.backup_if_changed(path, content) {
                    Ok(Some(record)) => partial.backups.push(record),
                    Ok(None) => {}
                    Err(error) => return Err(WriteFailure { error, partial }),
                }
            }
        }

        for (path, content) in [
            (&extractor_path, &code.extractor_source),
            (&models_path, &code.models_source),
            (&tests_path, &code.tests_source),
        ] {
            if let Err(e) = atomic_write(path, content) {
                return Err(WriteFailure { error: e.into(), partial });
            }
            partial.written.push(path.clone());
        }

        if !marker_path.exists() {
            if let Err(e) = atomic_write(&marker_path, &format!("# package marker for project '{project_name}'\n")) {
                return Err(WriteFailure { error: e.into(), partial });
            }
            partial.written.push(marker_path.clone());
        }

        Ok(WriteOutcome {
            paths: WrittenPaths { extractor: extractor_path, models: models_path, tests: tests_path, marker: marker_path },
            backups: partial.backups,
        })
    }

    /// Best-effort restoration: renames backups back over their
    /// originals and removes anything newly written. A failure here is
    /// logged, never propagated — it must not shadow the error that
    /// triggered the rollback (spec §4.6).
    pub fn rollback(&self, partial: &PartialWrite) {
        for record in &partial.backups {
            if let Err(e) = fs::rename(&record.backup, &record.original) {
                warn!(backup = %record.backup.display(), error = %e, "rollback failed to restore backup");
            }
        }
        for path in &partial.written {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    warn!(path = %path.display(), error = %e, "rollback failed to remove partial write");
                }
            }
        }
    }
}

fn classify_io(e: &std::io::Error) -> FileWriteReason {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => FileWriteReason::Permission,
        std::io::ErrorKind::AlreadyExists => FileWriteReason::InUse,
        _ => FileWriteReason::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use tempfile::tempdir;

    fn code() -> GeneratedCode {
        GeneratedCode {
            extractor_source: "class PeopleExtractor:\n    pass\n".to_string(),
            models_source: "class Person:\n    pass\n".to_string(),
            tests_source: "def test_x():\n    pass\n".to_string(),
        }
    }

    #[test]
    fn writes_three_files_and_marker() {
        let dir = tempdir().unwrap();
        let writer = CodeWriter::with_clock(dir.path(), FixedClock(1_000));
        let outcome = writer.write(&code(), "people", true).unwrap();
        assert!(outcome.paths.extractor.exists());
        assert!(outcome.paths.models.exists());
        assert!(outcome.paths.tests.exists());
        assert!(outcome.paths.marker.exists());
        assert!(outcome.backups.is_empty());
    }

    #[test]
    fn backs_up_changed_content_with_timestamped_name() {
        let dir = tempdir().unwrap();
        let writer = CodeWriter::with_clock(dir.path(), FixedClock(42));
        writer.write(&code(), "people", true).unwrap();

        let mut changed = code();
        changed.extractor_source = "class PeopleExtractor:\n    x = 1\n".to_string();
        let outcome = writer.write(&changed, "people", true).unwrap();
        assert_eq!(outcome.backups.len(), 1);
        assert!(outcome.backups[0].backup.to_string_lossy().contains("bak.42"));
    }

    #[test]
    fn identical_rewrite_produces_no_backup() {
        let dir = tempdir().unwrap();
        let writer = CodeWriter::with_clock(dir.path(), FixedClock(7));
        writer.write(&code(), "people", true).unwrap();
        let outcome = writer.write(&code(), "people", true).unwrap();
        assert!(outcome.backups.is_empty());
    }

    #[test]
    fn mid_sequence_failure_reports_partial_write_for_rollback() {
        let dir = tempdir().unwrap();
        let writer = CodeWriter::with_clock(dir.path(), FixedClock(7));

        // Pre-create models.py as a directory so the rename-over-target
        // step of its atomic write fails, simulating the S6 "write
        // crash mid-sequence" scenario: extractor.py is written first
        // and only then does models.py fail.
        let project_dir = dir.path().join("people");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::create_dir(project_dir.join("models.py")).unwrap();

        let failure = writer.write(&code(), "people", false).unwrap_err();

        assert!(failure.partial.backups.is_empty());
        assert_eq!(failure.partial.written, vec![project_dir.join("extractor.py")]);

        writer.rollback(&failure.partial);
        assert!(!project_dir.join("extractor.py").exists(), "rollback should remove the partial write");
    }

    #[test]
    fn rollback_restores_backup_and_removes_new_file() {
        let dir = tempdir().unwrap();
        let writer = CodeWriter::with_clock(dir.path(), FixedClock(7));
        let first = writer.write(&code(), "people", true).unwrap();

        let mut changed = code();
        changed.extractor_source = "class PeopleExtractor:\n    x = 2\n".to_string();
        let second = writer.write(&changed, "people", true).unwrap();

        let partial = PartialWrite { written: vec![second.paths.tests.clone()], backups: second.backups.clone() };
        writer.rollback(&partial);

        assert!(!second.paths.tests.exists());
        assert_eq!(std::fs::read_to_string(&first.paths.extractor).unwrap(), code().extractor_source);
    }
}
