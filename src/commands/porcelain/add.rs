use crate::areas::repository::Repository;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;

impl Repository {
    /// Stage the current contents of `name`.
    ///
    /// Staging a file identical to the version in the head commit drops any staged entry
    /// for it instead. Either way the name leaves the removed and untracked sets.
    pub fn add(&mut self, name: &str) -> anyhow::Result<()> {
        let name = self.workspace().normalize_name(name)?;
        if !self.workspace().exists(&name) {
            return Err(RepositoryError::FileNotFound(name).into());
        }

        let blob = Blob::new(name.clone(), self.workspace().read_file(&name)?);
        let blob_id = blob.object_id()?;

        if self.head_commit()?.blob_id(&name) == Some(&blob_id) {
            self.index_mut().remove(&name)?;
        } else {
            self.database().store(&blob)?;
            self.index_mut().add(&blob, blob_id)?;
        }

        self.index_mut().unmark_removed(&name);
        self.clear_untracked(&name);

        Ok(())
    }
}
