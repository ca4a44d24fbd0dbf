//! The project-lifecycle collaborator (spec §6): a narrow trait so the
//! core stays testable against an in-memory fake, the same split the
//! teacher draws between `SyncTransport` and `FakeTransport`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

#[async_trait]
pub trait ProjectLifecycle: Send + Sync {
    async fn resolve_project_path(&self, name: &str) -> PathBuf;
    async fn project_exists(&self, name: &str) -> bool;
}

/// A fixed base directory: every project resolves to `base/<name>`,
/// existence determined purely by whether that directory is present
/// on disk. Suitable for production use with a real `base_dir`.
pub struct FsProjectLifecycle {
    base_dir: PathBuf,
}

impl FsProjectLifecycle {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }
}

#[async_trait]
impl ProjectLifecycle for FsProjectLifecycle {
    async fn resolve_project_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    async fn project_exists(&self, name: &str) -> bool {
        self.base_dir.join(name).is_dir()
    }
}

/// In-memory fake for tests: a fixed set of known project names, no
/// filesystem access.
pub struct FakeProjectLifecycle {
    base_dir: PathBuf,
    known: Mutex<HashMap<String, bool>>,
}

impl FakeProjectLifecycle {
    pub fn new(base_dir: impl Into<PathBuf>, known_projects: &[&str]) -> Self {
        let known = known_projects.iter().map(|n| (n.to_string(), true)).collect();
        Self { base_dir: base_dir.into(), known: Mutex::new(known) }
    }
}

#[async_trait]
impl ProjectLifecycle for FakeProjectLifecycle {
    async fn resolve_project_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    async fn project_exists(&self, name: &str) -> bool {
        self.known.lock().unwrap().contains_key(name)
    }
}
