use crate::primitives::{self, Options};
use crate::protection::Protection;
use crate::staging::queue::WorkQueue;
use crate::staging::root::StagingConfig;
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Performs filesystem mutations under the staging root.
///
/// Every mutating operation is dispatched onto the manager's [`WorkQueue`],
/// so awaiting it never blocks the calling task. Clones share the same queue.
/// Writes are atomic per target path: a reader going through the manager sees
/// either the old file or the complete new one.
///
/// Independent operations complete in any order. Sequences that must be
/// ordered ("write then move") are expressed by awaiting one before issuing
/// the next.
#[derive(Clone, Debug)]
pub struct StagingManager {
    config: StagingConfig,
    queue:  WorkQueue,
}

impl StagingManager {
    pub fn new(config: StagingConfig) -> Self {
        let queue = WorkQueue::new(config.get_max_concurrency());
        Self { config, queue }
    }

    pub fn config(&self) -> &StagingConfig {
        &self.config
    }

    pub fn queue(&self) -> &WorkQueue {
        &self.queue
    }

    /// See [`StagingConfig::resolve_root`]. Re-derived on every call.
    pub fn resolve_root(&self) -> Option<PathBuf> {
        self.config.resolve_root()
    }

    /// The staging root joined with `component`.
    pub fn path_for(&self, component: impl AsRef<Path>) -> Option<PathBuf> {
        self.resolve_root().map(|root| root.join(component))
    }

    /// Like [`path_for`](Self::path_for) but reports an unresolvable root as an error.
    pub fn require_path_for(&self, component: impl AsRef<Path>) -> Result<PathBuf> {
        self.path_for(component).ok_or(Error::RootUnavailable)
    }

    /// Create `path` and missing ancestors with the configured protection.
    /// No-op when it already exists.
    pub async fn create_directory_if_needed(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let protection = self.config.get_protection();
        self.dispatch("create directory", path.clone(), move || {
            create_directory_if_needed(protection, &path)
        })
        .await
    }

    pub async fn write_string(&self, string: impl Into<String>, path: impl Into<PathBuf>) -> Result<()> {
        self.write_bytes(string.into().into_bytes(), path).await
    }

    pub async fn write_bytes(&self, bytes: impl Into<Vec<u8>>, path: impl Into<PathBuf>) -> Result<()> {
        let bytes = bytes.into();
        let path = path.into();
        let options = Options::new().protection(self.config.get_protection());
        self.dispatch("write", path.clone(), move || {
            primitives::atomic_write(&path, &bytes, options)
        })
        .await
    }

    /// Fails if `from` is absent or `to` already exists.
    pub async fn copy_item(&self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Result<()> {
        let (from, to) = (from.into(), to.into());
        self.dispatch("copy", to.clone(), move || primitives::copy_item(&from, &to))
            .await
    }

    /// Fails if `from` is absent or `to` already exists.
    pub async fn move_item(&self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Result<()> {
        let (from, to) = (from.into(), to.into());
        self.dispatch("move", to.clone(), move || primitives::move_item(&from, &to))
            .await
    }

    /// Relocate every entry of `from` into `to`, creating `to` if needed.
    ///
    /// Succeeds without touching the filesystem when `from == to`. Stops at the
    /// first entry that cannot be moved; entries already moved stay moved.
    pub async fn move_contents_of_directory(
        &self,
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
    ) -> Result<()> {
        let (from, to) = (from.into(), to.into());
        if from == to {
            return Ok(());
        }
        let protection = self.config.get_protection();
        self.dispatch("move contents", to.clone(), move || {
            create_directory_if_needed(protection, &to)?;
            let mut moved = 0usize;
            for entry in fs::read_dir(&from).map_err(|e| Error::Read {
                path: from.clone(),
                source: e,
            })? {
                let entry = entry.map_err(|e| Error::Read {
                    path: from.clone(),
                    source: e,
                })?;
                primitives::move_item(entry.path(), to.join(entry.file_name()))?;
                moved += 1;
            }
            debug!(from = %from.display(), to = %to.display(), moved, "relocated directory contents");
            Ok(())
        })
        .await
    }

    /// Remove every entry directly inside `path`.
    pub async fn remove_directory_contents(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        self.dispatch("remove contents", path.clone(), move || {
            let removed = primitives::remove_dir_contents(&path)?;
            debug!(path = %path.display(), removed, "cleared directory");
            Ok(())
        })
        .await
    }

    async fn dispatch<F>(&self, operation: &'static str, target: PathBuf, job: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let result = self.queue.run(job).await;
        match &result {
            Ok(()) => debug!(operation, target = %target.display(), "staging operation completed"),
            Err(e) => warn!(operation, target = %target.display(), error = %e, "staging operation failed"),
        }
        result
    }
}

fn create_directory_if_needed(protection: Protection, path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    protection.create_dir_all(path)
}
