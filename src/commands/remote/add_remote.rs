use crate::areas::repository::Repository;

impl Repository {
    /// Register the store at `store_path` under `name`
    pub fn add_remote(&mut self, name: &str, store_path: &str) -> anyhow::Result<()> {
        self.remotes().add(name, store_path)
    }

    pub fn remove_remote(&mut self, name: &str) -> anyhow::Result<()> {
        self.remotes().remove(name)
    }
}
