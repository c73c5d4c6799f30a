use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Check out any commit and force the current branch to point at it
    pub fn reset(&mut self, commit_id: &str) -> anyhow::Result<ObjectId> {
        let commit_id = self.database().resolve_commit_id(commit_id)?;

        self.checkout_commit(&commit_id)?;
        let branch = self.current_branch_name().clone();
        self.set_branch_head(&branch, commit_id.clone())?;
        self.update_untracked()?;

        Ok(commit_id)
    }
}
