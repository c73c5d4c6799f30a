use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::config::{self, STORE_DIR};
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::objects::commit::Commit;
use anyhow::Context;
use std::path::Path;

impl Repository {
    /// Create a store at `root` with its root commit on the default branch
    pub fn init(root: &Path) -> anyhow::Result<Self> {
        let store_path = root.join(STORE_DIR);
        if store_path.exists() {
            return Err(RepositoryError::AlreadyInitialized.into());
        }

        for dir in ["objects", "refs/heads", "stage", "remotes"] {
            let dir_path = store_path.join(dir);
            std::fs::create_dir_all(&dir_path)
                .with_context(|| format!("Unable to create {}", dir_path.display()))?;
        }

        let database = Database::new(store_path.join("objects").into_boxed_path());
        let refs = Refs::new(store_path.clone().into_boxed_path());

        // every store starts from the same root commit so their histories can meet
        let root_commit = Commit::root(
            config::INITIAL_COMMIT_MESSAGE.to_string(),
            config::DEFAULT_BRANCH.to_string(),
            config::epoch(),
        );
        let root_id = database.store(&root_commit)?;
        let default_branch = BranchName::try_parse(config::DEFAULT_BRANCH.to_string())?;
        refs.update_branch(&default_branch, &root_id)?;
        refs.set_head(&default_branch)?;
        tracing::info!(path = %store_path.display(), "initialized empty store");

        Self::open(root)
    }
}
