use crate::areas::database::Database;
use crate::artifacts::log::LogEntry;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

/// Walks first parents from `start` back to the root commit
#[derive(Debug, Clone, new)]
pub struct RevList<'d> {
    database: &'d Database,
    start: ObjectId,
}

impl<'d> IntoIterator for RevList<'d> {
    type Item = anyhow::Result<LogEntry>;
    type IntoIter = RevListIntoIter<'d>;

    fn into_iter(self) -> Self::IntoIter {
        RevListIntoIter {
            database: self.database,
            current_commit_oid: Some(self.start),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RevListIntoIter<'d> {
    database: &'d Database,
    current_commit_oid: Option<ObjectId>,
}

impl Iterator for RevListIntoIter<'_> {
    type Item = anyhow::Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.current_commit_oid.take()?;

        match self.database.load_commit(&oid) {
            Ok(commit) => {
                // Move to the parent commit for the next iteration
                self.current_commit_oid = commit.parent().cloned();
                Some(Ok(LogEntry { oid, commit }))
            }
            Err(error) => Some(Err(error)),
        }
    }
}
