use crate::areas::repository::Repository;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::object_id::ObjectId;
use crate::commands::remote::{copy_blobs, missing_ancestry, remote_branch_head};

impl Repository {
    /// Copy the current branch into `branch` of the remote `remote_name`.
    ///
    /// The remote branch head must already be in the history of the current head; the
    /// remote branch is then moved to the current head. Returns the number of commits
    /// copied.
    pub fn push(&mut self, remote_name: &str, branch: &str) -> anyhow::Result<usize> {
        let mut remote = self.open_remote(remote_name)?;
        let (branch_name, remote_head) = remote_branch_head(&remote, branch)?;
        let local_head = self.head_oid()?;

        if !self.database().contains(&remote_head)
            || !self.is_in_history(&remote_head, &local_head)?
        {
            return Err(RepositoryError::PullRequired.into());
        }

        let missing = missing_ancestry(self.database(), remote.database(), &local_head)?;
        for (oid, commit) in &missing {
            copy_blobs(self.database(), remote.database(), commit)?;
            remote.database().copy_from(self.database(), oid)?;
        }

        remote.set_branch_head(&branch_name, local_head.clone())?;
        tracing::info!(
            remote = remote_name,
            branch = %branch_name,
            head = %local_head,
            commits = missing.len(),
            "pushed"
        );

        Ok(missing.len())
    }

    /// Whether `ancestor` is `head` or reachable from it through any parent
    fn is_in_history(&self, ancestor: &ObjectId, head: &ObjectId) -> anyhow::Result<bool> {
        Ok(self.split_point(ancestor, head)?.as_ref() == Some(ancestor))
    }
}
