//! Replication registry
//!
//! One file per remote under `.twig/remotes/<name>`, holding the path of the remote's
//! store directory exactly as it was registered. Relative paths are resolved against the
//! working root when the remote is used.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::errors::RepositoryError;
use anyhow::Context;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Remotes {
    /// Path to the registry directory (`.twig/remotes`)
    path: Box<Path>,
}

impl Remotes {
    pub fn new(path: Box<Path>) -> Self {
        Remotes { path }
    }

    pub fn add(&self, name: &str, store_path: &str) -> anyhow::Result<()> {
        Self::validate_name(name)?;

        let remote_file = self.path.join(name);
        if remote_file.exists() {
            return Err(RepositoryError::RemoteAlreadyExists(name.to_string()).into());
        }

        std::fs::create_dir_all(&self.path)?;
        std::fs::write(&remote_file, store_path)
            .with_context(|| format!("failed to write remote file at {:?}", remote_file))?;
        tracing::info!(remote = name, path = store_path, "registered remote");

        Ok(())
    }

    pub fn remove(&self, name: &str) -> anyhow::Result<()> {
        let remote_file = self.remote_file(name)?;
        std::fs::remove_file(&remote_file)
            .with_context(|| format!("failed to delete remote file at {:?}", remote_file))?;

        Ok(())
    }

    /// Registered store path of `name`, as written by `add`
    pub fn store_path(&self, name: &str) -> anyhow::Result<PathBuf> {
        let remote_file = self.remote_file(name)?;
        let content = std::fs::read_to_string(&remote_file)
            .with_context(|| format!("failed to read remote file at {:?}", remote_file))?;

        Ok(PathBuf::from(content.trim_end_matches('\n')))
    }

    fn remote_file(&self, name: &str) -> anyhow::Result<PathBuf> {
        let remote_file = self.path.join(name);
        if name.contains('/') || !remote_file.is_file() {
            return Err(RepositoryError::RemoteNotFound(name.to_string()).into());
        }

        Ok(remote_file)
    }

    // remote names prefix tracking branches, so they follow branch rules minus the slash
    fn validate_name(name: &str) -> anyhow::Result<()> {
        if name.contains('/') {
            return Err(RepositoryError::IncorrectOperands.into());
        }
        BranchName::try_parse(name.to_string()).map_err(|_| RepositoryError::IncorrectOperands)?;

        Ok(())
    }
}
