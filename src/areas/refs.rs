//! Branch pointers and HEAD
//!
//! ## File Format
//!
//! - `HEAD` holds `ref: refs/heads/<branch>`, naming the current branch
//! - `refs/heads/<branch>` holds the 40-character ID of the branch head
//!
//! Branch names may contain `/`, in which case the ref file lives in a subdirectory
//! (remote-tracking branches look like `refs/heads/origin/master`).

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Prefix of every branch ref relative to the store directory
const HEADS_PREFIX: &str = "refs/heads/";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the store directory (`.twig`)
    path: Box<Path>,
}

impl Refs {
    /// Name of the branch HEAD points at
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;

        let symref = regex::Regex::new(SYMREF_REGEX)?
            .captures(content.trim())
            .and_then(|captures| captures.get(1))
            .map(|target| target.as_str().to_string())
            .with_context(|| format!("HEAD is not a symbolic ref: {:?}", content.trim()))?;
        let branch = symref
            .strip_prefix(HEADS_PREFIX)
            .with_context(|| format!("HEAD does not point at a branch: {symref}"))?;

        BranchName::try_parse(branch.to_string())
    }

    /// Point HEAD at `branch`
    pub fn set_head(&self, branch: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(&self.head_path(), format!("ref: {HEADS_PREFIX}{branch}"))
    }

    pub fn read_branch(&self, branch: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.branch_path(branch);
        if !branch_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {:?}", branch_path))?;

        Ok(Some(ObjectId::try_parse(content.trim().to_string())?))
    }

    pub fn branch_exists(&self, branch: &BranchName) -> bool {
        self.branch_path(branch).is_file()
    }

    /// Move (or create) `branch` so it points at `oid`
    pub fn update_branch(&self, branch: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        self.check_branch_path(branch)?;
        self.update_ref_file(&self.branch_path(branch), oid.to_string())?;
        tracing::debug!(%branch, %oid, "moved branch head");

        Ok(())
    }

    pub fn create_branch(&self, branch: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(branch) {
            return Err(RepositoryError::BranchAlreadyExists(branch.to_string()).into());
        }

        self.update_branch(branch, oid)
    }

    /// Fail when `branch` cannot get a ref file because another branch occupies its path,
    /// as `origin` does for `origin/master` and the other way round
    pub fn check_branch_path(&self, branch: &BranchName) -> anyhow::Result<()> {
        let heads_path = self.heads_path();
        let branch_path = self.branch_path(branch);

        let blocked = branch_path.is_dir()
            || branch_path
                .ancestors()
                .skip(1)
                .take_while(|dir| *dir != heads_path.as_path())
                .any(|dir| dir.is_file());
        if blocked {
            return Err(RepositoryError::InvalidBranchName(branch.to_string()).into());
        }

        Ok(())
    }

    /// Delete `branch`, returning the commit it pointed at
    pub fn delete_branch(&self, branch: &BranchName) -> anyhow::Result<ObjectId> {
        let oid = self
            .read_branch(branch)?
            .ok_or_else(|| RepositoryError::BranchNotFound(branch.to_string()))?;

        let branch_path = self.branch_path(branch);
        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;

        Ok(oid)
    }

    /// Every branch, sorted by name
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                let name = relative_path
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join("/");
                BranchName::try_parse(name).ok()
            })
            .collect::<Vec<_>>();

        branches.sort();
        Ok(branches)
    }

    fn update_ref_file(&self, path: &Path, raw_ref: String) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_path()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn branch_path(&self, branch: &BranchName) -> PathBuf {
        self.heads_path().join(branch.as_ref())
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join("HEAD")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.path.join(HEADS_PREFIX)
    }
}
