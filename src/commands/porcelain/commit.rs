use crate::areas::repository::Repository;
use crate::artifacts::core::config;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Record the staged changes on the current branch and return the new commit ID
    pub fn commit(&mut self, message: &str) -> anyhow::Result<ObjectId> {
        self.commit_changes(message, None)
    }

    /// Build a child of the current head from the staging area.
    ///
    /// Merge commits (those with a `merge_parent`) are recorded even when nothing is staged.
    pub(crate) fn commit_changes(
        &mut self,
        message: &str,
        merge_parent: Option<ObjectId>,
    ) -> anyhow::Result<ObjectId> {
        if merge_parent.is_none() && self.stage().is_empty() {
            return Err(RepositoryError::NoChanges.into());
        }
        if message.is_empty() {
            return Err(RepositoryError::EmptyCommitMessage.into());
        }

        let parent_id = self.head_oid()?;
        let parent = self.database().load_commit(&parent_id)?;
        let files = parent.tree_after(self.stage().staged(), self.stage().removed());

        let commit = Commit::new(
            message.to_string(),
            self.current_branch_name().to_string(),
            config::commit_timestamp(),
            Some(parent_id),
            merge_parent,
            files,
        );
        let commit_id = self.database().store(&commit)?;

        let branch = self.current_branch_name().clone();
        self.set_branch_head(&branch, commit_id.clone())?;
        self.index_mut().clear()?;
        tracing::info!(%branch, oid = %commit_id, "committed");

        Ok(commit_id)
    }
}
