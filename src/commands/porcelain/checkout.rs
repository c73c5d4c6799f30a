use crate::areas::repository::Repository;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Switch to `branch`, replacing the working tree with its head commit
    pub fn checkout_branch(&mut self, branch: &str) -> anyhow::Result<()> {
        let target = self.find_branch(branch)?;
        let (name, head) = (target.name().clone(), target.head().clone());

        if &name == self.current_branch_name() {
            return Err(RepositoryError::AlreadyOnBranch(name.to_string()).into());
        }

        self.checkout_commit(&head)?;
        self.switch_branch(name)?;
        self.update_untracked()
    }

    /// Restore `name` as it is in the head commit
    pub fn checkout_file(&mut self, name: &str) -> anyhow::Result<()> {
        let head = self.head_oid()?;
        self.restore_file(&head, name)
    }

    /// Restore `name` as it is in the commit identified by `commit_id` (any unique prefix)
    pub fn checkout_file_in_commit(&mut self, commit_id: &str, name: &str) -> anyhow::Result<()> {
        let commit_id = self.database().resolve_commit_id(commit_id)?;
        self.restore_file(&commit_id, name)
    }

    fn restore_file(&mut self, commit_id: &ObjectId, name: &str) -> anyhow::Result<()> {
        let commit = self.database().load_commit(commit_id)?;
        let blob_id = self
            .workspace()
            .normalize_name(name)
            .ok()
            .and_then(|name| commit.blob_id(&name).cloned())
            .ok_or_else(|| RepositoryError::FileNotInCommit(name.to_string()))?;

        let blob = self.database().load_blob(&blob_id)?;
        self.workspace().write_file(blob.name(), blob.content())
    }

    /// Replace the working tree with the snapshot of `target_id`.
    ///
    /// Fails before touching any file if an untracked file would be overwritten with
    /// different content. Files tracked by the current head but not by the target are
    /// deleted, and the staging area is emptied.
    pub(crate) fn checkout_commit(&mut self, target_id: &ObjectId) -> anyhow::Result<()> {
        let target = self.database().load_commit(target_id)?;
        let current = self.head_commit()?;

        let mut blobs = Vec::with_capacity(target.files().len());
        for (name, blob_id) in target.files() {
            let blob = self.database().load_blob(blob_id)?;

            if self.is_untracked(name)
                && self.workspace().try_read_file(name)?.as_ref() != Some(blob.content())
            {
                return Err(RepositoryError::UntrackedFileInTheWay(name.clone()).into());
            }
            blobs.push(blob);
        }

        for blob in &blobs {
            self.workspace().write_file(blob.name(), blob.content())?;
        }
        for name in current.files().keys() {
            if !target.tracks(name) {
                self.workspace().delete_file(name)?;
            }
        }

        self.index_mut().clear()?;
        tracing::debug!(oid = %target_id, "checked out commit");

        Ok(())
    }
}
