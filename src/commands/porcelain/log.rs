use crate::areas::repository::Repository;
use crate::artifacts::core::errors::RepositoryError;
use crate::artifacts::log::LogEntry;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// History of the current branch, following first parents back to the root commit
    pub fn log(&self) -> anyhow::Result<Vec<LogEntry>> {
        RevList::new(self.database(), self.head_oid()?)
            .into_iter()
            .collect()
    }

    /// Every commit in the store, in ID order
    pub fn global_log(&self) -> anyhow::Result<Vec<LogEntry>> {
        self.database()
            .list_commits()?
            .into_iter()
            .map(|oid| {
                let commit = self.database().load_commit(&oid)?;
                Ok(LogEntry { oid, commit })
            })
            .collect()
    }

    /// IDs of all commits whose message is exactly `message`
    pub fn find(&self, message: &str) -> anyhow::Result<Vec<ObjectId>> {
        let matches = self
            .global_log()?
            .into_iter()
            .filter(|entry| entry.commit.message() == message)
            .map(|entry| entry.oid)
            .collect::<Vec<_>>();

        if matches.is_empty() {
            return Err(RepositoryError::NoCommitWithMessage(message.to_string()).into());
        }

        Ok(matches)
    }
}
