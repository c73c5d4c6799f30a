use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::status::file_change::WorkspaceChange;
use colored::Colorize;
use std::collections::{BTreeMap, BTreeSet};

/// Snapshot of the repository state shown by `status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub current_branch: BranchName,
    pub branches: Vec<BranchName>,
    pub staged: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub unstaged: BTreeMap<String, WorkspaceChange>,
    pub untracked: BTreeSet<String>,
}

impl std::fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Branches ===")?;
        for branch in &self.branches {
            if branch == &self.current_branch {
                writeln!(f, "{}", format!("*{branch}").green())?;
            } else {
                writeln!(f, "{branch}")?;
            }
        }
        writeln!(f)?;

        writeln!(f, "=== Staged Files ===")?;
        for name in &self.staged {
            writeln!(f, "{}", name.green())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Removed Files ===")?;
        for name in &self.removed {
            writeln!(f, "{}", name.green())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Modifications Not Staged For Commit ===")?;
        for (name, change) in &self.unstaged {
            writeln!(f, "{name} ({change})")?;
        }
        writeln!(f)?;

        writeln!(f, "=== Untracked Files ===")?;
        for name in &self.untracked {
            writeln!(f, "{}", name.red())?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_every_section_in_order() {
        colored::control::set_override(false);

        let branch = |name: &str| BranchName::try_parse(name.to_string()).unwrap();
        let status = StatusInfo {
            current_branch: branch("master"),
            branches: vec![branch("master"), branch("other-branch")],
            staged: BTreeSet::from(["wug.txt".to_string()]),
            removed: BTreeSet::from(["goodbye.txt".to_string()]),
            unstaged: BTreeMap::from([
                ("junk.txt".to_string(), WorkspaceChange::Deleted),
                ("wug3.txt".to_string(), WorkspaceChange::Modified),
            ]),
            untracked: BTreeSet::from(["random.stuff".to_string()]),
        };

        assert_eq!(
            status.to_string(),
            "=== Branches ===\n*master\nother-branch\n\n\
             === Staged Files ===\nwug.txt\n\n\
             === Removed Files ===\ngoodbye.txt\n\n\
             === Modifications Not Staged For Commit ===\njunk.txt (deleted)\nwug3.txt (modified)\n\n\
             === Untracked Files ===\nrandom.stuff\n\n"
        );
    }
}
