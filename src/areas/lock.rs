//! Single-writer guard
//!
//! A store handle holds an exclusive advisory lock on `.twig/lock` for its whole lifetime.
//! The lock is taken without blocking: a second process opening the same store fails
//! with `StoreLocked` instead of waiting. Locks are released when the handle is dropped.

use crate::artifacts::core::errors::RepositoryError;
use anyhow::Context;
use file_guard::{FileGuard, Lock};
use std::fs::File;
use std::path::Path;

pub struct StoreLock {
    _guard: FileGuard<Box<File>>,
}

impl StoreLock {
    pub fn acquire(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("Unable to open lock file {}", path.display()))?;

        match file_guard::try_lock(Box::new(file), Lock::Exclusive, 0, 1) {
            Ok(guard) => Ok(StoreLock { _guard: guard }),
            // fcntl reports a held lock as EAGAIN or EACCES depending on the platform
            Err(error)
                if matches!(
                    error.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::PermissionDenied
                ) =>
            {
                let store = path.parent().unwrap_or(path);
                Err(RepositoryError::StoreLocked(store.display().to_string()).into())
            }
            Err(error) => Err(error).with_context(|| format!("Unable to lock {}", path.display())),
        }
    }
}

impl std::fmt::Debug for StoreLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreLock").finish_non_exhaustive()
    }
}
