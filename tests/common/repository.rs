use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;
use twig::areas::repository::Repository;
use twig::artifacts::core::errors::RepositoryError;
use twig::artifacts::objects::object_id::ObjectId;

/// A temporary working root with a freshly initialized store
pub struct Sandbox {
    pub repository: Repository,
    pub dir: TempDir,
}

#[fixture]
pub fn sandbox() -> Sandbox {
    new_sandbox()
}

pub fn new_sandbox() -> Sandbox {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let repository = Repository::init(dir.path()).expect("Failed to initialize store");

    Sandbox { repository, dir }
}

impl Sandbox {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) {
        write_file(FileSpec::new(self.root().join(name), content.to_string()));
    }

    pub fn read(&self, name: &str) -> Option<String> {
        std::fs::read_to_string(self.root().join(name)).ok()
    }

    pub fn delete(&self, name: &str) {
        std::fs::remove_file(self.root().join(name)).expect("Failed to delete file");
    }

    /// Write `name`, stage it and commit it alone
    pub fn commit_file(&mut self, name: &str, content: &str, message: &str) -> ObjectId {
        self.write(name, content);
        self.repository.add(name).expect("Failed to add file");
        self.repository.commit(message).expect("Failed to commit")
    }

    /// Persist the staging area, release the store and open it again
    pub fn reopen(&mut self) {
        self.repository.save().expect("Failed to save staging area");
        let root = self.root().to_path_buf();
        self.repository = Repository::open(&root).expect("Failed to reopen store");
    }
}

/// The typed error behind `result`, panicking if it succeeded or failed otherwise
pub fn repository_error<T: std::fmt::Debug>(result: anyhow::Result<T>) -> RepositoryError {
    let error = result.expect_err("operation should have failed");
    RepositoryError::find(&error)
        .cloned()
        .unwrap_or_else(|| panic!("unexpected error: {error:?}"))
}
