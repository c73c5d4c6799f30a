use crate::areas::repository::Repository;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::merge::MergeOutcome;
use crate::artifacts::merge::classifier::{self, FileVersions, MergeAction};
use crate::artifacts::merge::conflict;
use crate::artifacts::merge::split_point::SplitPointFinder;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

/// The split point, merged-in and working versions of every file a merge looks at
#[derive(Debug, Default)]
struct MergeInputs {
    split: BTreeMap<String, Bytes>,
    from: BTreeMap<String, Bytes>,
    working: BTreeMap<String, Bytes>,
}

impl MergeInputs {
    fn versions(&self, name: &str) -> FileVersions<'_> {
        FileVersions {
            split: self.split.get(name),
            from: self.from.get(name),
            working: self.working.get(name),
        }
    }
}

impl Repository {
    /// Merge the branch `from` into the current branch.
    ///
    /// Nothing is modified unless every precondition holds and no planned action would
    /// touch an untracked file. Conflicts do not stop the merge: conflicting files are
    /// written with both versions, staged and committed like any other change.
    pub fn merge(&mut self, from: &str) -> anyhow::Result<MergeOutcome> {
        let from_branch = self.find_branch(from)?;
        let (from_name, from_head) = (from_branch.name().clone(), from_branch.head().clone());

        if !self.stage().is_empty() {
            return Err(RepositoryError::UncommittedChanges.into());
        }
        if &from_name == self.current_branch_name() {
            return Err(RepositoryError::MergeWithSelf.into());
        }

        let current_name = self.current_branch_name().clone();
        let current_head = self.head_oid()?;
        let split_point = self.split_point(&current_head, &from_head)?.ok_or_else(|| {
            RepositoryError::NoCommonAncestor(current_name.to_string(), from_name.to_string())
        })?;

        if split_point == from_head {
            return Ok(MergeOutcome::AlreadyMerged);
        }
        if split_point == current_head {
            self.checkout_commit(&from_head)?;
            self.set_branch_head(&current_name, from_head)?;
            self.update_untracked()?;

            return Ok(MergeOutcome::FastForward);
        }

        let split_commit = self.database().load_commit(&split_point)?;
        let from_commit = self.database().load_commit(&from_head)?;
        let inputs = self.merge_inputs(&split_commit, &from_commit)?;

        let names = split_commit
            .files()
            .keys()
            .chain(from_commit.files().keys())
            .collect::<BTreeSet<_>>();
        let plan = classifier::plan(
            names
                .into_iter()
                .map(|name| (name.clone(), inputs.versions(name))),
        );

        if let Some(name) = plan.keys().find(|name| self.is_untracked(name)) {
            return Err(RepositoryError::UntrackedFileInTheWay(name.clone()).into());
        }

        let mut conflicts = false;
        for (name, action) in &plan {
            tracing::debug!(name, ?action, "applying merge action");

            match action {
                MergeAction::Delete => {
                    self.workspace().delete_file(name)?;
                    self.index_mut().mark_removed(name)?;
                }
                MergeAction::AdoptRemote => {
                    let content = inputs.from.get(name).cloned().unwrap_or_default();
                    self.workspace().write_file(name, &content)?;
                    self.add(name)?;
                }
                MergeAction::Conflict => {
                    let content = conflict::materialize(
                        inputs.working.get(name).map(|content| content.as_ref()),
                        inputs.from.get(name).map(|content| content.as_ref()),
                    );
                    self.workspace().write_file(name, &content)?;
                    self.add(name)?;
                    conflicts = true;
                }
            }
        }

        let message = format!("Merged {from_name} into {current_name}.");
        self.commit_changes(&message, Some(from_head))?;
        if conflicts {
            tracing::warn!(from = %from_name, into = %current_name, "merge produced conflicts");
        }

        Ok(MergeOutcome::Merged { conflicts })
    }

    /// Best common ancestor of two commits in this store
    pub fn split_point(
        &self,
        current: &ObjectId,
        target: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let finder = SplitPointFinder::new(|oid: &ObjectId| {
            let commit = self.database().load_commit(oid)?;
            Ok(SlimCommit {
                oid: oid.clone(),
                parents: commit.parents().cloned().collect(),
            })
        });

        finder.find(current, target)
    }

    fn merge_inputs(&self, split: &Commit, from: &Commit) -> anyhow::Result<MergeInputs> {
        let mut inputs = MergeInputs::default();

        for (name, blob_id) in split.files() {
            let blob = self.database().load_blob(blob_id)?;
            inputs.split.insert(name.clone(), blob.into_content());
        }
        for (name, blob_id) in from.files() {
            let blob = self.database().load_blob(blob_id)?;
            inputs.from.insert(name.clone(), blob.into_content());
        }
        for name in inputs.split.keys().chain(inputs.from.keys()) {
            if let Some(content) = self.workspace().try_read_file(name)? {
                inputs.working.insert(name.clone(), content);
            }
        }

        Ok(inputs)
    }
}
