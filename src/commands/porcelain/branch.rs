use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::errors::RepositoryError;

impl Repository {
    /// Create `branch_name` at the current head without switching to it
    pub fn create_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let head = self.head_oid()?;

        self.insert_branch(branch_name, head)
    }

    /// Delete the pointer `branch_name`; its commits stay in the store
    pub fn remove_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = self.find_branch(branch_name)?.name().clone();

        if &branch_name == self.current_branch_name() {
            return Err(RepositoryError::CannotRemoveCurrentBranch(branch_name.to_string()).into());
        }

        self.drop_branch(&branch_name)?;
        Ok(())
    }
}
