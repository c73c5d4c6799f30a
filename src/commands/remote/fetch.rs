use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::commands::remote::{copy_blobs, missing_ancestry, remote_branch_head};

impl Repository {
    /// Copy `branch` of the remote `remote_name` into the local branch `<remote>/<branch>`.
    ///
    /// Copied commits are relabelled with the tracking branch name; their IDs do not
    /// change. Returns the tracking branch.
    pub fn fetch(&mut self, remote_name: &str, branch: &str) -> anyhow::Result<BranchName> {
        let remote = self.open_remote(remote_name)?;
        let (branch_name, remote_head) = remote_branch_head(&remote, branch)?;
        let tracking = BranchName::remote_tracking(remote_name, &branch_name)?;
        self.refs().check_branch_path(&tracking)?;

        let missing = missing_ancestry(remote.database(), self.database(), &remote_head)?;
        for (oid, mut commit) in missing.iter().cloned() {
            copy_blobs(remote.database(), self.database(), &commit)?;

            commit.set_branch(tracking.to_string());
            let stored = self.database().store(&commit)?;
            if stored != oid {
                anyhow::bail!("fetched commit {oid} was stored as {stored}");
            }
        }

        self.set_branch_head(&tracking, remote_head.clone())?;
        tracing::info!(
            remote = remote_name,
            branch = %tracking,
            head = %remote_head,
            commits = missing.len(),
            "fetched"
        );

        Ok(tracking)
    }
}
