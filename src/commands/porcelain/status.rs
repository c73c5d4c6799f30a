use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChange;
use crate::artifacts::status::status_info::StatusInfo;
use std::collections::BTreeMap;

// Terminology:
// - staged files: files added since the last commit
// - removed files: files removed since the last commit
// - unstaged changes: tracked or staged files whose working copy differs or is gone
// - untracked files: working files neither tracked by head nor staged
impl Repository {
    pub fn status(&self) -> anyhow::Result<StatusInfo> {
        let stage = self.stage();
        let head = self.head_commit()?;

        let mut unstaged = BTreeMap::new();
        let head_files = head
            .files()
            .iter()
            .filter(|(name, _)| !stage.contains(name) && !stage.is_removed(name));

        for (name, blob_id) in head_files {
            if let Some(change) = self.detect_workspace_change(name, blob_id)? {
                unstaged.insert(name.clone(), change);
            }
        }
        for name in stage.staged().keys() {
            if let Some(change) = self.detect_staged_change(name)? {
                unstaged.insert(name.clone(), change);
            }
        }

        Ok(StatusInfo {
            current_branch: self.current_branch_name().clone(),
            branches: self.branches().map(|branch| branch.name().clone()).collect(),
            staged: stage.staged().keys().cloned().collect(),
            removed: stage.removed().clone(),
            unstaged,
            untracked: self.untracked().clone(),
        })
    }

    /// Compare the working copy against the side copy taken when `name` was staged
    fn detect_staged_change(&self, name: &str) -> anyhow::Result<Option<WorkspaceChange>> {
        let working = self.workspace().try_read_file(name)?;
        let staged = self.index().staged_content(name)?;

        Ok(match (working, staged) {
            (None, _) => Some(WorkspaceChange::Deleted),
            (Some(working), Some(staged)) if working == staged => None,
            (Some(_), _) => Some(WorkspaceChange::Modified),
        })
    }

    fn detect_workspace_change(
        &self,
        name: &str,
        expected: &ObjectId,
    ) -> anyhow::Result<Option<WorkspaceChange>> {
        match self.workspace().try_read_file(name)? {
            None => Ok(Some(WorkspaceChange::Deleted)),
            Some(content) => {
                let blob = Blob::new(name.to_string(), content);
                if &blob.object_id()? != expected {
                    Ok(Some(WorkspaceChange::Modified))
                } else {
                    Ok(None)
                }
            }
        }
    }
}
