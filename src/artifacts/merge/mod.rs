//! Merge engine
//!
//! - `split_point`: best common ancestor of two branch heads
//! - `classifier`: per-file three-way classification into merge actions
//! - `conflict`: content written for conflicting files

pub mod classifier;
pub mod conflict;
pub mod split_point;

/// What a merge did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The merged-in branch is an ancestor of the current branch; nothing changed
    AlreadyMerged,
    /// The current branch was behind and now points at the merged-in head
    FastForward,
    /// A merge commit was created
    Merged { conflicts: bool },
}

impl std::fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeOutcome::AlreadyMerged => {
                write!(f, "Given branch is an ancestor of the current branch.")
            }
            MergeOutcome::FastForward => write!(f, "Current branch fast-forwarded."),
            MergeOutcome::Merged { conflicts: true } => write!(f, "Encountered a merge conflict."),
            MergeOutcome::Merged { conflicts: false } => Ok(()),
        }
    }
}
