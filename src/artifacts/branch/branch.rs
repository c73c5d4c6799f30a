use crate::areas::database::Database;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeSet;

/// A named, movable pointer into the commit graph
///
/// Keeps a cache of the file names tracked by its head commit. The cache is rebuilt
/// from the head commit whenever the head moves; it is never patched incrementally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    name: BranchName,
    head: ObjectId,
    tracked: BTreeSet<String>,
}

impl Branch {
    /// Load a branch pointing at `head`, filling the tracked-file cache
    pub fn load(name: BranchName, head: ObjectId, database: &Database) -> anyhow::Result<Self> {
        let mut branch = Branch {
            name,
            head: head.clone(),
            tracked: BTreeSet::new(),
        };
        branch.update_head(head, database)?;

        Ok(branch)
    }

    pub fn update_head(&mut self, head: ObjectId, database: &Database) -> anyhow::Result<()> {
        let commit = database.load_commit(&head)?;

        self.tracked = commit.files().keys().cloned().collect();
        self.head = head;

        Ok(())
    }

    pub fn has_tracked(&self, name: &str) -> bool {
        self.tracked.contains(name)
    }

    pub fn name(&self) -> &BranchName {
        &self.name
    }

    pub fn head(&self) -> &ObjectId {
        &self.head
    }

    pub fn tracked(&self) -> &BTreeSet<String> {
        &self.tracked
    }
}
