//! Replication between stores
//!
//! A remote is another store reachable through the filesystem. Commits move between
//! stores verbatim together with the blobs they reference; only branch pointers are
//! updated on the receiving side, never its working tree.
//!
//! ## Commands
//!
//! - `add_remote`: Register or forget a remote store
//! - `push`: Copy the current branch to a remote branch
//! - `fetch`: Copy a remote branch into a local `<remote>/<branch>` branch
//! - `pull`: Fetch, then merge the fetched branch

pub mod add_remote;
pub mod fetch;
pub mod pull;
pub mod push;

use crate::areas::database::Database;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashSet, VecDeque};

impl Repository {
    /// Open the store registered as `remote_name`
    pub(crate) fn open_remote(&self, remote_name: &str) -> anyhow::Result<Repository> {
        let store_path = self.remotes().store_path(remote_name)?;
        let store_path = if store_path.is_absolute() {
            store_path
        } else {
            self.path().join(store_path)
        };

        if !store_path.is_dir() {
            return Err(RepositoryError::RemoteUnreachable(remote_name.to_string()).into());
        }

        Repository::open_store(&store_path)
    }
}

/// Head of `branch` in `remote`, failing when the remote does not have it
pub(crate) fn remote_branch_head(
    remote: &Repository,
    branch: &str,
) -> anyhow::Result<(BranchName, ObjectId)> {
    let branch_name = BranchName::try_parse(branch.to_string())
        .map_err(|_| RepositoryError::RemoteBranchNotFound(branch.to_string()))?;
    let head = remote
        .refs()
        .read_branch(&branch_name)?
        .ok_or_else(|| RepositoryError::RemoteBranchNotFound(branch.to_string()))?;

    Ok((branch_name, head))
}

/// Commits reachable from `head` in `source` that `target` lacks, ancestors first.
///
/// A store holding a commit holds its whole ancestry, so the walk stops at the first
/// commit `target` already has on every path.
pub(crate) fn missing_ancestry(
    source: &Database,
    target: &Database,
    head: &ObjectId,
) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
    let mut missing = Vec::new();
    let mut visited = HashSet::from([head.clone()]);
    let mut queue = VecDeque::from([head.clone()]);

    while let Some(oid) = queue.pop_front() {
        if target.contains(&oid) {
            continue;
        }

        let commit = source.load_commit(&oid)?;
        for parent in commit.parents() {
            if visited.insert(parent.clone()) {
                queue.push_back(parent.clone());
            }
        }
        missing.push((oid, commit));
    }

    missing.reverse();
    Ok(missing)
}

/// Copy a commit's blobs from `source` into `target`, returning how many were new
pub(crate) fn copy_blobs(
    source: &Database,
    target: &Database,
    commit: &Commit,
) -> anyhow::Result<usize> {
    let mut copied = 0;
    for blob_id in commit.files().values() {
        if target.copy_from(source, blob_id)? {
            copied += 1;
        }
    }

    Ok(copied)
}
