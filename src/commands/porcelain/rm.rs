use crate::areas::repository::Repository;
use crate::artifacts::core::errors::RepositoryError;

impl Repository {
    /// Unstage `name`; if the head commit tracks it, also delete the working file and
    /// record the removal for the next commit
    pub fn remove(&mut self, name: &str) -> anyhow::Result<()> {
        let name = self
            .workspace()
            .normalize_name(name)
            .map_err(|_| RepositoryError::NothingToRemove(name.to_string()))?;

        let tracked = self.current_branch()?.has_tracked(&name);
        let staged = self.stage().contains(&name);
        if !tracked && !staged {
            return Err(RepositoryError::NothingToRemove(name).into());
        }

        if staged {
            self.index_mut().remove(&name)?;
        }
        if tracked {
            self.workspace().delete_file(&name)?;
            self.index_mut().mark_removed(&name)?;
        } else if self.workspace().exists(&name) {
            // an unstaged new file is untracked again
            self.update_untracked()?;
        }

        Ok(())
    }
}
