//! Commit history
//!
//! - `rev_list`: first-parent walk from a head back to the root commit
//!
//! `LogEntry` renders one commit the way `log`, `global-log` and `find` print it:
//!
//! ```text
//! ===
//! commit <id>
//! Merge: <parent7> <merge-parent7>     (merge commits only)
//! Date: <timestamp>
//! <message>
//! ```

pub mod rev_list;

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub oid: ObjectId,
    pub commit: Commit,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "===")?;
        writeln!(f, "{}", format!("commit {}", self.oid).yellow())?;
        if let (Some(parent), Some(merge_parent)) =
            (self.commit.parent(), self.commit.merge_parent())
        {
            writeln!(
                f,
                "Merge: {} {}",
                parent.to_short_oid(),
                merge_parent.to_short_oid()
            )?;
        }
        writeln!(f, "Date: {}", self.commit.readable_timestamp())?;
        writeln!(f, "{}", self.commit.message())
    }
}
