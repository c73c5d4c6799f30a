//! Repository handle
//!
//! The aggregate every operation runs against. Opening a handle locks the store, loads the
//! staging area and every branch, and computes the untracked set once; operations then
//! mutate the handle and `save` writes the staging area back.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::lock::StoreLock;
use crate::areas::refs::Refs;
use crate::areas::remotes::Remotes;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch::Branch;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::config::STORE_DIR;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::index::stage::Stage;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug)]
pub struct Repository {
    /// Working root
    path: Box<Path>,
    database: Database,
    workspace: Workspace,
    index: Index,
    refs: Refs,
    remotes: Remotes,
    branches: BTreeMap<BranchName, Branch>,
    current_branch: BranchName,
    untracked: BTreeSet<String>,
    _lock: StoreLock,
}

impl Repository {
    /// Open the store of the working tree rooted at `root`
    pub fn open(root: &Path) -> anyhow::Result<Self> {
        let store_path = root.join(STORE_DIR);
        if !store_path.is_dir() {
            return Err(RepositoryError::NotInitialized.into());
        }

        Self::open_store(&store_path)
    }

    /// Open a store given the path of its store directory; the working root is its parent
    pub fn open_store(store_path: &Path) -> anyhow::Result<Self> {
        let store_path = store_path
            .canonicalize()
            .with_context(|| format!("Unable to resolve store {}", store_path.display()))?;
        let root = store_path
            .parent()
            .with_context(|| format!("Store {} has no working root", store_path.display()))?
            .to_path_buf();

        let lock = StoreLock::acquire(&store_path.join("lock"))?;

        let database = Database::new(store_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(root.clone().into_boxed_path());
        let mut index = Index::new(
            store_path.join("index").into_boxed_path(),
            store_path.join("stage").into_boxed_path(),
        );
        let refs = Refs::new(store_path.clone().into_boxed_path());
        let remotes = Remotes::new(store_path.join("remotes").into_boxed_path());

        index.rehydrate()?;

        let mut branches = BTreeMap::new();
        for name in refs.list_branches()? {
            if let Some(head) = refs.read_branch(&name)? {
                let branch = Branch::load(name.clone(), head, &database)?;
                branches.insert(name, branch);
            }
        }
        let current_branch = refs.current_branch()?;
        if !branches.contains_key(&current_branch) {
            anyhow::bail!("HEAD points at missing branch {current_branch}");
        }

        let mut repository = Repository {
            path: root.into_boxed_path(),
            database,
            workspace,
            index,
            refs,
            remotes,
            branches,
            current_branch,
            untracked: BTreeSet::new(),
            _lock: lock,
        };
        repository.update_untracked()?;

        Ok(repository)
    }

    /// Persist the staging area
    pub fn save(&mut self) -> anyhow::Result<()> {
        self.index.write_updates()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut Index {
        &mut self.index
    }

    pub fn stage(&self) -> &Stage {
        self.index.stage()
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn remotes(&self) -> &Remotes {
        &self.remotes
    }

    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.values()
    }

    pub fn branch(&self, name: &BranchName) -> Option<&Branch> {
        self.branches.get(name)
    }

    /// Look a branch up by its user-supplied name
    pub fn find_branch(&self, name: &str) -> anyhow::Result<&Branch> {
        BranchName::try_parse(name.to_string())
            .ok()
            .and_then(|name| self.branches.get(&name))
            .ok_or_else(|| RepositoryError::BranchNotFound(name.to_string()).into())
    }

    pub fn current_branch_name(&self) -> &BranchName {
        &self.current_branch
    }

    pub fn current_branch(&self) -> anyhow::Result<&Branch> {
        self.branches
            .get(&self.current_branch)
            .with_context(|| format!("current branch {} is not loaded", self.current_branch))
    }

    pub fn head_oid(&self) -> anyhow::Result<ObjectId> {
        Ok(self.current_branch()?.head().clone())
    }

    pub fn head_commit(&self) -> anyhow::Result<Commit> {
        self.database.load_commit(&self.head_oid()?)
    }

    pub fn untracked(&self) -> &BTreeSet<String> {
        &self.untracked
    }

    pub fn is_untracked(&self, name: &str) -> bool {
        self.untracked.contains(name)
    }

    pub fn clear_untracked(&mut self, name: &str) {
        self.untracked.remove(name);
    }

    /// Recompute the untracked set: working files minus head-tracked minus staged
    pub fn update_untracked(&mut self) -> anyhow::Result<()> {
        let head = self.current_branch()?;
        let stage = self.index.stage();

        self.untracked = self
            .workspace
            .list_files()?
            .into_iter()
            .filter(|name| !head.has_tracked(name) && !stage.contains(name))
            .collect();

        Ok(())
    }

    /// Point `name` at `head`, creating the branch if needed, and refresh its cache
    pub fn set_branch_head(&mut self, name: &BranchName, head: ObjectId) -> anyhow::Result<()> {
        match self.branches.get_mut(name) {
            Some(branch) => branch.update_head(head.clone(), &self.database)?,
            None => {
                let branch = Branch::load(name.clone(), head.clone(), &self.database)?;
                self.branches.insert(name.clone(), branch);
            }
        }

        self.refs.update_branch(name, &head)
    }

    pub(crate) fn insert_branch(&mut self, name: BranchName, head: ObjectId) -> anyhow::Result<()> {
        self.refs.create_branch(&name, &head)?;
        let branch = Branch::load(name.clone(), head, &self.database)?;
        self.branches.insert(name, branch);

        Ok(())
    }

    pub(crate) fn drop_branch(&mut self, name: &BranchName) -> anyhow::Result<ObjectId> {
        let oid = self.refs.delete_branch(name)?;
        self.branches.remove(name);

        Ok(oid)
    }

    /// Make `name` the current branch without touching the working tree
    pub(crate) fn switch_branch(&mut self, name: BranchName) -> anyhow::Result<()> {
        if !self.branches.contains_key(&name) {
            return Err(RepositoryError::BranchNotFound(name.to_string()).into());
        }

        self.refs.set_head(&name)?;
        self.current_branch = name;

        Ok(())
    }
}
