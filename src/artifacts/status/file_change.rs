use colored::Colorize;

/// A change in the working tree that is not staged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkspaceChange {
    Modified,
    Deleted,
}

impl From<&WorkspaceChange> for &str {
    fn from(change: &WorkspaceChange) -> Self {
        match change {
            WorkspaceChange::Modified => "modified",
            WorkspaceChange::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for WorkspaceChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label: &str = self.into();
        write!(f, "{}", label.red())
    }
}
